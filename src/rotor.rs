//! Rotor: a wired disc holding a permutation and a rotational setting.
//!
//! Three kinds of rotor exist, modelled as a tagged variant rather than a
//! class hierarchy:
//!
//! - **Reflector**: stationary, involutive wiring, always at setting 0.
//! - **Fixed**: may be indexed by hand to any setting, never steps.
//! - **Moving**: steps under a pawl and carries at its notch positions.
//!
//! Rotors live in a [`RotorArena`] owned by the machine and are referenced
//! by [`RotorId`], so a slot assignment is just a list of indices.

use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;

/// Configuration tag for a rotor kind (`M`, `N` or `R`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotorType {
    /// `M`: a rotor that steps.
    Moving,
    /// `N`: a rotor that never steps.
    Fixed,
    /// `R`: a reflector.
    Reflector,
}

impl RotorType {
    /// Parses a one-letter type tag, ignoring case.
    ///
    /// # Errors
    /// Returns [`EnigmaError::UnknownRotorType`] for any other character.
    pub fn from_tag(tag: char) -> Result<Self> {
        match tag.to_ascii_uppercase() {
            'M' => Ok(RotorType::Moving),
            'N' => Ok(RotorType::Fixed),
            'R' => Ok(RotorType::Reflector),
            _ => Err(EnigmaError::UnknownRotorType(tag)),
        }
    }

    /// Returns the one-letter tag for this type.
    pub fn tag(self) -> char {
        match self {
            RotorType::Moving => 'M',
            RotorType::Fixed => 'N',
            RotorType::Reflector => 'R',
        }
    }
}

/// Variant-specific rotor data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    Reflector,
    Fixed,
    /// Notch positions as alphabet indices.
    Moving { notches: Vec<usize> },
}

impl RotorKind {
    /// Returns the configuration tag for this kind.
    pub fn rotor_type(&self) -> RotorType {
        match self {
            RotorKind::Reflector => RotorType::Reflector,
            RotorKind::Fixed => RotorType::Fixed,
            RotorKind::Moving { .. } => RotorType::Moving,
        }
    }
}

/// A rotor: name, wiring, current setting and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotor {
    name: String,
    permutation: Permutation,
    setting: usize,
    kind: RotorKind,
}

impl Rotor {
    /// Creates a reflector named `name` wired as `permutation`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::NonInvolutiveReflector`] if the wiring is not
    /// its own inverse.
    pub fn reflector(name: &str, permutation: Permutation) -> Result<Self> {
        if !permutation.is_involution() {
            return Err(EnigmaError::NonInvolutiveReflector(name.to_string()));
        }
        Ok(Self::build(name, permutation, RotorKind::Reflector))
    }

    /// Creates a non-stepping rotor named `name` wired as `permutation`.
    pub fn fixed(name: &str, permutation: Permutation) -> Self {
        Self::build(name, permutation, RotorKind::Fixed)
    }

    /// Creates a stepping rotor whose notches are the characters of `notches`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidCharacter`] if a notch is not in the
    /// permutation's alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation, Rotor};
    ///
    /// let alpha = Arc::new(Alphabet::range('A', 'D').unwrap());
    /// let mut rotor = Rotor::moving("R2", Permutation::new("(ABCD)", &alpha).unwrap(), "C").unwrap();
    /// rotor.set_char('C').unwrap();
    /// assert!(rotor.at_notch());
    /// rotor.advance();
    /// assert_eq!(rotor.setting(), 3);
    /// assert!(!rotor.at_notch());
    /// ```
    pub fn moving(name: &str, permutation: Permutation, notches: &str) -> Result<Self> {
        let alphabet = Arc::clone(permutation.alphabet());
        let mut positions = Vec::with_capacity(notches.len());
        for c in notches.chars() {
            let index = alphabet.to_index(c)?;
            if !positions.contains(&index) {
                positions.push(index);
            }
        }
        Ok(Self::build(
            name,
            permutation,
            RotorKind::Moving { notches: positions },
        ))
    }

    fn build(name: &str, permutation: Permutation, kind: RotorKind) -> Self {
        Rotor {
            name: name.to_string(),
            permutation,
            setting: 0,
            kind,
        }
    }

    /// Returns the rotor's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if `name` matches this rotor's name, ignoring case.
    pub fn is_named(&self, name: &str) -> bool {
        same_name(&self.name, name)
    }

    /// Returns the variant data.
    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Returns the wiring at setting 0.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Returns the alphabet the rotor is wired over.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        self.permutation.alphabet()
    }

    /// Returns the size of the rotor's alphabet.
    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    /// Returns the notch positions; empty unless the rotor moves.
    pub fn notches(&self) -> &[usize] {
        match &self.kind {
            RotorKind::Moving { notches } => notches,
            RotorKind::Reflector | RotorKind::Fixed => &[],
        }
    }

    /// True only for moving rotors.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// True only for reflectors.
    pub fn reflecting(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }

    /// True if this is a moving rotor whose setting is one of its notches.
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => notches.contains(&self.setting),
            RotorKind::Reflector | RotorKind::Fixed => false,
        }
    }

    /// Returns the current setting.
    pub fn setting(&self) -> usize {
        self.setting
    }

    /// Sets the rotor to `setting`.
    ///
    /// # Errors
    /// - [`EnigmaError::IndexOutOfRange`] if `setting >= size()`.
    /// - [`EnigmaError::ReflectorSetting`] for a nonzero reflector setting.
    pub fn set(&mut self, setting: usize) -> Result<()> {
        if setting >= self.size() {
            return Err(EnigmaError::IndexOutOfRange {
                index: setting,
                size: self.size(),
            });
        }
        if self.reflecting() && setting != 0 {
            return Err(EnigmaError::ReflectorSetting(self.name.clone()));
        }
        self.setting = setting;
        Ok(())
    }

    /// Sets the rotor to the position of character `c`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidCharacter`] if `c` is not in the
    /// alphabet, otherwise as [`set`](Self::set).
    pub fn set_char(&mut self, c: char) -> Result<()> {
        let index = self.alphabet().to_index(c)?;
        self.set(index)
    }

    /// Returns the rotor to setting 0.
    pub(crate) fn reset(&mut self) {
        self.setting = 0;
    }

    /// Steps a moving rotor one position. Stationary rotors are left alone;
    /// the machine never asks them to step.
    pub fn advance(&mut self) {
        if let RotorKind::Moving { .. } = self.kind {
            self.setting = (self.setting + 1) % self.size();
        }
    }

    /// Converts a contact entering from the right (towards the reflector).
    pub fn convert_forward(&self, contact: usize) -> usize {
        let shift = self.setting as isize;
        let out = self.permutation.permute(contact as isize + shift);
        self.permutation.wrap(out as isize - shift)
    }

    /// Converts a contact entering from the left (away from the reflector).
    pub fn convert_backward(&self, contact: usize) -> usize {
        let shift = self.setting as isize;
        let out = self.permutation.invert(contact as isize + shift);
        self.permutation.wrap(out as isize - shift)
    }
}

/// Compares rotor names without regard to case.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Identifier of a rotor within a [`RotorArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotorId(pub usize);

/// Pool of every rotor available to a machine.
///
/// Rotors are stored contiguously and addressed by [`RotorId`]; slot
/// assignments hold ids instead of references.
#[derive(Debug, Clone, Default)]
pub struct RotorArena {
    rotors: Vec<Rotor>,
}

impl RotorArena {
    /// Creates a new empty arena.
    pub fn new() -> Self {
        RotorArena { rotors: Vec::new() }
    }

    /// Creates a new empty arena with room for `capacity` rotors.
    pub fn with_capacity(capacity: usize) -> Self {
        RotorArena {
            rotors: Vec::with_capacity(capacity),
        }
    }

    /// Adds `rotor` to the pool.
    ///
    /// # Errors
    /// Returns [`EnigmaError::DuplicateRotorName`] if a rotor with the same
    /// name (ignoring case) is already present.
    pub fn insert(&mut self, rotor: Rotor) -> Result<RotorId> {
        if self.find(rotor.name()).is_some() {
            return Err(EnigmaError::DuplicateRotorName(rotor.name().to_string()));
        }
        let id = RotorId(self.rotors.len());
        self.rotors.push(rotor);
        Ok(id)
    }

    /// Looks up a rotor by name, ignoring case.
    pub fn find(&self, name: &str) -> Option<RotorId> {
        self.rotors
            .iter()
            .position(|r| r.is_named(name))
            .map(RotorId)
    }

    /// Returns the rotor with the given id.
    pub fn get(&self, id: RotorId) -> &Rotor {
        &self.rotors[id.0]
    }

    /// Returns the rotor with the given id, mutably.
    pub fn get_mut(&mut self, id: RotorId) -> &mut Rotor {
        &mut self.rotors[id.0]
    }

    /// Returns the number of rotors in the pool.
    pub fn len(&self) -> usize {
        self.rotors.len()
    }

    /// Returns true if the pool holds no rotors.
    pub fn is_empty(&self) -> bool {
        self.rotors.is_empty()
    }

    /// Iterates over every rotor in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Rotor> {
        self.rotors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abcd() -> Arc<Alphabet> {
        Arc::new(Alphabet::range('A', 'D').unwrap())
    }

    fn perm(cycles: &str, alpha: &Arc<Alphabet>) -> Permutation {
        Permutation::new(cycles, alpha).unwrap()
    }

    #[test]
    fn test_rotor_type_tags() {
        assert_eq!(RotorType::from_tag('M').unwrap(), RotorType::Moving);
        assert_eq!(RotorType::from_tag('n').unwrap(), RotorType::Fixed);
        assert_eq!(RotorType::from_tag('R').unwrap(), RotorType::Reflector);
        assert_eq!(
            RotorType::from_tag('X'),
            Err(EnigmaError::UnknownRotorType('X'))
        );
        assert_eq!(RotorType::Moving.tag(), 'M');
    }

    #[test]
    fn test_capabilities_by_kind() {
        let alpha = abcd();
        let refl = Rotor::reflector("B", perm("(AC) (BD)", &alpha)).unwrap();
        let fixed = Rotor::fixed("Beta", perm("(ABCD)", &alpha));
        let moving = Rotor::moving("I", perm("(ABCD)", &alpha), "C").unwrap();

        assert!(refl.reflecting() && !refl.rotates());
        assert!(!fixed.reflecting() && !fixed.rotates());
        assert!(!moving.reflecting() && moving.rotates());
        assert_eq!(refl.kind().rotor_type(), RotorType::Reflector);
        assert_eq!(moving.notches(), &[2]);
        assert!(fixed.notches().is_empty());
    }

    #[test]
    fn test_non_involutive_reflector_rejected() {
        let alpha = abcd();
        assert_eq!(
            Rotor::reflector("B", perm("(ABC)", &alpha)),
            Err(EnigmaError::NonInvolutiveReflector("B".to_string()))
        );
    }

    #[test]
    fn test_invalid_notch_rejected() {
        let alpha = abcd();
        assert_eq!(
            Rotor::moving("I", perm("(ABCD)", &alpha), "E"),
            Err(EnigmaError::InvalidCharacter('E'))
        );
    }

    #[test]
    fn test_advance_wraps() {
        let alpha = abcd();
        let mut rotor = Rotor::moving("I", perm("(ABCD)", &alpha), "A").unwrap();
        rotor.set(3).unwrap();
        rotor.advance();
        assert_eq!(rotor.setting(), 0);
        assert!(rotor.at_notch());
    }

    #[test]
    fn test_advance_ignored_by_stationary_rotors() {
        let alpha = abcd();
        let mut fixed = Rotor::fixed("Beta", perm("(ABCD)", &alpha));
        fixed.set(2).unwrap();
        fixed.advance();
        assert_eq!(fixed.setting(), 2);
        assert!(!fixed.at_notch());
    }

    #[test]
    fn test_set_rejects_out_of_range() {
        let alpha = abcd();
        let mut rotor = Rotor::fixed("Beta", perm("", &alpha));
        assert_eq!(
            rotor.set(4),
            Err(EnigmaError::IndexOutOfRange { index: 4, size: 4 })
        );
        assert_eq!(rotor.set_char('Z'), Err(EnigmaError::InvalidCharacter('Z')));
    }

    #[test]
    fn test_reflector_single_position() {
        let alpha = abcd();
        let mut refl = Rotor::reflector("B", perm("(AC) (BD)", &alpha)).unwrap();
        assert!(refl.set(0).is_ok());
        assert_eq!(
            refl.set_char('B'),
            Err(EnigmaError::ReflectorSetting("B".to_string()))
        );
    }

    #[test]
    fn test_convert_at_setting_zero_matches_permutation() {
        let alpha = abcd();
        let rotor = Rotor::moving("I", perm("(ABCD)", &alpha), "C").unwrap();
        for i in 0..4 {
            assert_eq!(rotor.convert_forward(i), (i + 1) % 4);
            assert_eq!(rotor.convert_backward(i), (i + 3) % 4);
        }
    }

    #[test]
    fn test_convert_with_offset() {
        // Rotor I at setting B: A enters contact B, wired B->K, exits at J.
        let alpha = Arc::new(Alphabet::upper());
        let wiring = perm("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)", &alpha);
        let mut rotor = Rotor::moving("I", wiring, "Q").unwrap();
        rotor.set_char('B').unwrap();
        assert_eq!(rotor.convert_forward(0), 9);
        assert_eq!(rotor.convert_backward(9), 0);
        // Z enters contact A, wired A->E, exits at D.
        assert_eq!(rotor.convert_forward(25), 3);
    }

    #[test]
    fn test_forward_backward_inverse_at_every_setting() {
        let alpha = Arc::new(Alphabet::upper());
        let wiring = perm("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)", &alpha);
        let mut rotor = Rotor::moving("I", wiring, "Q").unwrap();
        for s in 0..26 {
            rotor.set(s).unwrap();
            for c in 0..26 {
                assert_eq!(rotor.convert_backward(rotor.convert_forward(c)), c);
            }
        }
    }

    #[test]
    fn test_same_name_ignores_case() {
        assert!(same_name("Beta", "BETA"));
        assert!(same_name("iv", "IV"));
        assert!(!same_name("IV", "V"));
    }

    #[test]
    fn test_arena_insert_and_find() {
        let alpha = abcd();
        let mut arena = RotorArena::new();
        assert!(arena.is_empty());
        let a = arena.insert(Rotor::fixed("Beta", perm("", &alpha))).unwrap();
        let b = arena
            .insert(Rotor::moving("I", perm("(AB)", &alpha), "A").unwrap())
            .unwrap();
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.find("beta"), Some(a));
        assert_eq!(arena.find("i"), Some(b));
        assert_eq!(arena.find("II"), None);
        assert_eq!(arena.get(b).name(), "I");
    }

    #[test]
    fn test_arena_rejects_duplicate_names() {
        let alpha = abcd();
        let mut arena = RotorArena::with_capacity(2);
        arena.insert(Rotor::fixed("Beta", perm("", &alpha))).unwrap();
        assert_eq!(
            arena.insert(Rotor::fixed("BETA", perm("", &alpha))),
            Err(EnigmaError::DuplicateRotorName("BETA".to_string()))
        );
    }

    #[test]
    fn test_arena_get_mut() {
        let alpha = abcd();
        let mut arena = RotorArena::new();
        let id = arena
            .insert(Rotor::moving("I", perm("(AB)", &alpha), "A").unwrap())
            .unwrap();
        arena.get_mut(id).advance();
        assert_eq!(arena.get(id).setting(), 1);
    }
}
