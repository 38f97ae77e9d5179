//! Permutation: a bijection over the indices of an alphabet.
//!
//! Built once from cycle notation such as `"(AELTP) (BKNW) (S)"` and stored
//! as a pair of forward/inverse tables, so both directions are a single
//! array lookup.

use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};

/// A permutation of `0..alphabet.size()` with O(1) forward and inverse lookup.
///
/// Invariant: `forward[inverse[x]] == x` and `inverse[forward[x]] == x`
/// for every index `x`.
///
/// Two permutations are equal when they map the same alphabet the same way,
/// whatever cycle text they were written with.
#[derive(Debug, Clone)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
    cycles: String,
}

impl Permutation {
    /// Parses `cycles` as cycle notation over `alphabet`.
    ///
    /// Each group `(c0 c1 ... cm)` maps `c0 -> c1 -> ... -> cm -> c0`.
    /// Characters that appear in no cycle map to themselves. Whitespace is
    /// ignored everywhere.
    ///
    /// # Errors
    /// - [`EnigmaError::MalformedCycle`] for unbalanced or nested parentheses,
    ///   characters outside a cycle, empty cycles, or a character listed twice.
    /// - [`EnigmaError::UnknownCharacter`] for a character outside `alphabet`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation};
    ///
    /// let alpha = Arc::new(Alphabet::range('A', 'D').unwrap());
    /// let perm = Permutation::new("(ABC)", &alpha).unwrap();
    /// assert_eq!(perm.permute(0), 1);
    /// assert_eq!(perm.invert(0), 2);
    /// assert_eq!(perm.permute(3), 3);
    /// assert!(Permutation::new("(AB) (BC)", &alpha).is_err());
    /// ```
    pub fn new(cycles: &str, alphabet: &Arc<Alphabet>) -> Result<Self> {
        let size = alphabet.size();
        let mut forward: Vec<usize> = (0..size).collect();
        let mut inverse: Vec<usize> = (0..size).collect();

        for cycle in parse_cycles(cycles, alphabet)? {
            let len = cycle.len();
            for (i, &from) in cycle.iter().enumerate() {
                let to = cycle[(i + 1) % len];
                forward[from] = to;
                inverse[to] = from;
            }
        }

        Ok(Permutation {
            alphabet: Arc::clone(alphabet),
            forward,
            inverse,
            cycles: cycles.to_string(),
        })
    }

    /// Returns the identity permutation over `alphabet`.
    pub fn identity(alphabet: &Arc<Alphabet>) -> Self {
        let size = alphabet.size();
        Permutation {
            alphabet: Arc::clone(alphabet),
            forward: (0..size).collect(),
            inverse: (0..size).collect(),
            cycles: String::new(),
        }
    }

    /// Reduces `p` into `0..size()`, wrapping negative values upward.
    pub fn wrap(&self, p: isize) -> usize {
        p.rem_euclid(self.size() as isize) as usize
    }

    /// Returns the number of indices permuted.
    pub fn size(&self) -> usize {
        self.forward.len()
    }

    /// Returns the alphabet this permutation is defined over.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the cycle notation this permutation was built from.
    pub fn cycles(&self) -> &str {
        &self.cycles
    }

    /// Applies the permutation to `p` taken modulo the alphabet size.
    pub fn permute(&self, p: isize) -> usize {
        self.forward[self.wrap(p)]
    }

    /// Applies the inverse permutation to `c` taken modulo the alphabet size.
    pub fn invert(&self, c: isize) -> usize {
        self.inverse[self.wrap(c)]
    }

    /// Applies the permutation to a character of the alphabet.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidCharacter`] if `p` is not in the alphabet.
    pub fn permute_char(&self, p: char) -> Result<char> {
        let index = self.alphabet.to_index(p)?;
        self.alphabet.to_char(self.forward[index])
    }

    /// Applies the inverse permutation to a character of the alphabet.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidCharacter`] if `c` is not in the alphabet.
    pub fn invert_char(&self, c: char) -> Result<char> {
        let index = self.alphabet.to_index(c)?;
        self.alphabet.to_char(self.inverse[index])
    }

    /// Returns true if the permutation is its own inverse.
    pub fn is_involution(&self) -> bool {
        self.forward == self.inverse
    }

    /// Returns true if no index maps to itself.
    pub fn is_derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &f)| i != f)
    }
}

impl PartialEq for Permutation {
    fn eq(&self, other: &Self) -> bool {
        self.alphabet == other.alphabet && self.forward == other.forward
    }
}

impl Eq for Permutation {}

/// Splits cycle notation into index cycles, rejecting anything that would
/// not describe a bijection.
fn parse_cycles(text: &str, alphabet: &Alphabet) -> Result<Vec<Vec<usize>>> {
    let mut cycles = Vec::new();
    let mut seen = vec![false; alphabet.size()];
    let mut current: Option<Vec<usize>> = None;

    for c in text.chars().filter(|c| !c.is_whitespace()) {
        match c {
            '(' => {
                if current.is_some() {
                    return Err(malformed(format!("nested '(' in \"{}\"", text)));
                }
                current = Some(Vec::new());
            }
            ')' => {
                let cycle = current
                    .take()
                    .ok_or_else(|| malformed(format!("unbalanced ')' in \"{}\"", text)))?;
                if cycle.is_empty() {
                    return Err(malformed(format!("empty cycle in \"{}\"", text)));
                }
                cycles.push(cycle);
            }
            _ => {
                let cycle = current.as_mut().ok_or_else(|| {
                    malformed(format!("character '{}' outside a cycle in \"{}\"", c, text))
                })?;
                let index = alphabet
                    .to_index(c)
                    .map_err(|_| EnigmaError::UnknownCharacter(c))?;
                if seen[index] {
                    return Err(malformed(format!(
                        "character '{}' repeated in \"{}\"",
                        c, text
                    )));
                }
                seen[index] = true;
                cycle.push(index);
            }
        }
    }

    if current.is_some() {
        return Err(malformed(format!("unbalanced '(' in \"{}\"", text)));
    }
    Ok(cycles)
}

fn malformed(reason: String) -> EnigmaError {
    EnigmaError::MalformedCycle(reason)
}
