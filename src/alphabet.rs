//! Alphabet: the character set a machine operates over.
//!
//! Maps each character to a contiguous index `0..size` and back. An alphabet
//! is built once from configuration and shared read-only (behind an `Arc`) by
//! every permutation and rotor of a machine.

use std::collections::HashMap;

use crate::error::{EnigmaError, Result};

/// An ordered set of distinct characters with O(1) lookups in both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
    indices: HashMap<char, usize>,
}

impl Alphabet {
    /// Creates an alphabet from the characters of `chars`, in order.
    ///
    /// # Errors
    /// Returns [`EnigmaError::EmptyAlphabet`] if `chars` is empty and
    /// [`EnigmaError::DuplicateAlphabetCharacter`] if a character repeats.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::Alphabet;
    ///
    /// let alpha = Alphabet::new("ABCD").unwrap();
    /// assert_eq!(alpha.size(), 4);
    /// assert_eq!(alpha.to_index('C').unwrap(), 2);
    /// assert!(Alphabet::new("ABA").is_err());
    /// ```
    pub fn new(chars: &str) -> Result<Self> {
        let chars: Vec<char> = chars.chars().collect();
        if chars.is_empty() {
            return Err(EnigmaError::EmptyAlphabet);
        }
        let mut indices = HashMap::with_capacity(chars.len());
        for (i, &c) in chars.iter().enumerate() {
            if indices.insert(c, i).is_some() {
                return Err(EnigmaError::DuplicateAlphabetCharacter(c));
            }
        }
        Ok(Alphabet { chars, indices })
    }

    /// Creates an alphabet covering the inclusive character range `first..=last`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::EmptyAlphabet`] if `last` precedes `first`.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::Alphabet;
    ///
    /// let alpha = Alphabet::range('A', 'Z').unwrap();
    /// assert_eq!(alpha.size(), 26);
    /// assert_eq!(alpha.to_char(25).unwrap(), 'Z');
    /// ```
    pub fn range(first: char, last: char) -> Result<Self> {
        let text: String = (first..=last).collect();
        Self::new(&text)
    }

    /// The 26 upper-case Latin letters.
    pub fn upper() -> Self {
        let chars: Vec<char> = ('A'..='Z').collect();
        let indices = chars.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Alphabet { chars, indices }
    }

    /// Returns the number of characters.
    pub fn size(&self) -> usize {
        self.chars.len()
    }

    /// Returns true if `c` belongs to this alphabet.
    pub fn contains(&self, c: char) -> bool {
        self.indices.contains_key(&c)
    }

    /// Returns the index of `c`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidCharacter`] if `c` is not a member.
    pub fn to_index(&self, c: char) -> Result<usize> {
        self.indices
            .get(&c)
            .copied()
            .ok_or(EnigmaError::InvalidCharacter(c))
    }

    /// Returns the character at `index`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::IndexOutOfRange`] if `index >= size()`.
    pub fn to_char(&self, index: usize) -> Result<char> {
        self.chars
            .get(index)
            .copied()
            .ok_or(EnigmaError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Iterates over the characters in index order.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }
}
