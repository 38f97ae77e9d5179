//! Machine: the rotor stack, plugboard and per-keystroke pipeline.
//!
//! A machine owns the pool of every available rotor in a [`RotorArena`]
//! and an ordered list of slot assignments. Slot 0 holds the reflector and
//! the rightmost `pawls` slots hold the rotors that step.
//!
//! Each keystroke first steps the rotors, deciding every advance from the
//! settings as they were before the key was pressed, then sends the signal
//! through the plugboard, right to left through the stack into the
//! reflector, back out left to right, and through the plugboard again.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::alphabet::Alphabet;
use crate::config::Setup;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;
use crate::rotor::{Rotor, RotorArena, RotorId};

/// A configured rotor cipher machine.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use enigma::{Alphabet, Machine, Permutation, Rotor};
///
/// let alpha = Arc::new(Alphabet::range('A', 'D').unwrap());
/// let wiring = |c: &str| Permutation::new(c, &alpha).unwrap();
/// let rotors = vec![
///     Rotor::reflector("R1", wiring("(AC) (BD)")).unwrap(),
///     Rotor::moving("R2", wiring("(ABCD)"), "C").unwrap(),
///     Rotor::moving("R3", wiring("(ABCD)"), "C").unwrap(),
///     Rotor::moving("R4", wiring("(ABCD)"), "C").unwrap(),
/// ];
/// let mut machine = Machine::new(Arc::clone(&alpha), 4, 3, rotors).unwrap();
/// machine.insert_rotors(&["R1", "R2", "R3", "R4"]).unwrap();
/// machine.set_rotors("AAA").unwrap();
///
/// let cipher = machine.convert_message("ABCD").unwrap();
/// machine.set_rotors("AAA").unwrap();
/// assert_eq!(machine.convert_message(&cipher).unwrap(), "ABCD");
/// ```
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    pawls: usize,
    arena: RotorArena,
    slots: Vec<RotorId>,
    plugboard: Option<Permutation>,
}

impl Machine {
    /// Creates a machine over `alphabet` with `num_rotors` slots, `pawls`
    /// stepping slots and the given pool of available rotors.
    ///
    /// No rotors are installed until [`insert_rotors`](Self::insert_rotors)
    /// or [`apply_setup`](Self::apply_setup) is called.
    ///
    /// # Errors
    /// - [`EnigmaError::InvalidMachineShape`] unless `num_rotors >= 3` and
    ///   `0 < pawls < num_rotors`.
    /// - [`EnigmaError::AlphabetMismatch`] if a pool rotor is wired over a
    ///   different alphabet.
    /// - [`EnigmaError::DuplicateRotorName`] if two pool rotors share a name.
    pub fn new<I>(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        pawls: usize,
        rotors: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = Rotor>,
    {
        if num_rotors < 3 || pawls == 0 || pawls >= num_rotors {
            return Err(EnigmaError::InvalidMachineShape {
                slots: num_rotors,
                pawls,
            });
        }

        let rotors = rotors.into_iter();
        let mut arena = RotorArena::with_capacity(rotors.size_hint().0);
        for rotor in rotors {
            if rotor.alphabet() != &alphabet {
                return Err(EnigmaError::AlphabetMismatch(format!(
                    "rotor {}",
                    rotor.name()
                )));
            }
            arena.insert(rotor)?;
        }

        debug!(
            slots = num_rotors,
            pawls,
            pool = arena.len(),
            alphabet = alphabet.size(),
            "machine created"
        );

        Ok(Machine {
            alphabet,
            num_rotors,
            pawls,
            arena,
            slots: Vec::with_capacity(num_rotors),
            plugboard: None,
        })
    }

    /// Returns the number of rotor slots, including the reflector's.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the number of pawls, i.e. of stepping slots.
    pub fn num_pawls(&self) -> usize {
        self.pawls
    }

    /// Returns the machine's alphabet.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Iterates over every rotor in the pool.
    pub fn available_rotors(&self) -> impl Iterator<Item = &Rotor> {
        self.arena.iter()
    }

    /// Iterates over the installed rotors from slot 0 to the rightmost slot.
    pub fn installed(&self) -> impl Iterator<Item = &Rotor> {
        self.slots.iter().map(move |&id| self.arena.get(id))
    }

    /// Returns the rotor in `slot`, if rotors are installed.
    pub fn rotor(&self, slot: usize) -> Option<&Rotor> {
        self.slots.get(slot).map(|&id| self.arena.get(id))
    }

    /// Returns the installed plugboard, if any.
    pub fn plugboard(&self) -> Option<&Permutation> {
        self.plugboard.as_ref()
    }

    /// Returns the setting of every installed rotor as alphabet characters,
    /// slot 0 first.
    pub fn settings(&self) -> String {
        self.installed()
            .filter_map(|r| self.alphabet.to_char(r.setting()).ok())
            .collect()
    }

    /// Installs the rotors named by `names` (slot 0 first), matching names
    /// without regard to case. Every installed rotor starts at setting 0.
    ///
    /// # Errors
    /// - [`EnigmaError::WrongRotorCount`] unless exactly `num_rotors()` names are given.
    /// - [`EnigmaError::UnknownRotorName`] if a name is not in the pool.
    /// - [`EnigmaError::DuplicateRotorName`] if a name is repeated.
    /// - [`EnigmaError::MissingReflector`], [`EnigmaError::WrongPawlCount`]
    ///   or [`EnigmaError::MisplacedRotor`] if the rotors do not fit their
    ///   slots, as for [`apply_setup`](Self::apply_setup).
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        let ids = self.resolve(names)?;
        self.check_placement(&ids)?;
        self.install(ids);
        Ok(())
    }

    /// Sets every non-reflector slot from `setting`, leftmost slot first.
    ///
    /// Nothing changes unless the whole string is valid.
    ///
    /// # Errors
    /// - [`EnigmaError::NotConfigured`] if no rotors are installed.
    /// - [`EnigmaError::WrongSettingLength`] unless `setting` has
    ///   `num_rotors() - 1` characters.
    /// - [`EnigmaError::InvalidCharacter`] for a character outside the alphabet.
    pub fn set_rotors(&mut self, setting: &str) -> Result<()> {
        if self.slots.is_empty() {
            return Err(EnigmaError::NotConfigured);
        }
        let positions = self.parse_settings(&self.slots, setting)?;
        self.apply_settings(&positions)
    }

    /// Installs `plugboard`, applied before and after the rotor stack.
    ///
    /// # Errors
    /// Returns [`EnigmaError::AlphabetMismatch`] if `plugboard` is not over
    /// the machine's alphabet; the current plugboard is kept.
    pub fn set_plugboard(&mut self, plugboard: Permutation) -> Result<()> {
        if plugboard.alphabet() != &self.alphabet {
            return Err(EnigmaError::AlphabetMismatch("plugboard".to_string()));
        }
        self.install_plugboard(plugboard);
        Ok(())
    }

    fn install_plugboard(&mut self, plugboard: Permutation) {
        if !plugboard.is_involution() {
            warn!(
                cycles = plugboard.cycles(),
                "plugboard is not an involution; conversion will not be reciprocal"
            );
        }
        self.plugboard = Some(plugboard);
    }

    /// Removes the plugboard, so that no letters are swapped.
    pub fn remove_plugboard(&mut self) {
        self.plugboard = None;
    }

    /// Applies a full setup directive: rotor choice, settings and plugboard.
    ///
    /// Everything is validated before any state changes, so a failed setup
    /// leaves the machine exactly as it was.
    ///
    /// # Errors
    /// In order of checking: [`EnigmaError::WrongRotorCount`],
    /// [`EnigmaError::UnknownRotorName`], [`EnigmaError::DuplicateRotorName`],
    /// [`EnigmaError::MissingReflector`], [`EnigmaError::WrongPawlCount`],
    /// [`EnigmaError::MisplacedRotor`], [`EnigmaError::WrongSettingLength`],
    /// [`EnigmaError::InvalidCharacter`], then any plugboard permutation error.
    pub fn apply_setup(&mut self, setup: &Setup) -> Result<()> {
        let ids = self.resolve(&setup.rotors)?;
        self.check_placement(&ids)?;

        let positions = match &setup.settings {
            Some(text) => self.parse_settings(&ids, text)?,
            None => vec![0; ids.len() - 1],
        };

        let plugboard = if setup.plugboard.is_empty() {
            None
        } else {
            Some(Permutation::new(&setup.plugboard_cycles(), &self.alphabet)?)
        };

        self.install(ids);
        self.apply_settings(&positions)?;
        match plugboard {
            Some(p) => self.install_plugboard(p),
            None => self.remove_plugboard(),
        }

        debug!(
            rotors = ?setup.rotors,
            settings = %self.settings(),
            plugboard = self.plugboard.is_some(),
            "setup applied"
        );
        Ok(())
    }

    /// Converts the character index `c`, stepping the rotors first.
    ///
    /// # Errors
    /// - [`EnigmaError::NotConfigured`] if no rotors are installed.
    /// - [`EnigmaError::MissingReflector`] if slot 0 is not a reflector.
    /// - [`EnigmaError::IndexOutOfRange`] if `c` is not a valid index.
    pub fn convert(&mut self, c: usize) -> Result<usize> {
        self.ensure_ready()?;
        self.check_index(c)?;
        Ok(self.convert_index(c))
    }

    /// Converts a sequence of indices, carrying rotor state from one to the
    /// next. No rotor moves unless every index is valid.
    ///
    /// # Errors
    /// As [`convert`](Self::convert).
    pub fn convert_indices(&mut self, indices: &[usize]) -> Result<Vec<usize>> {
        self.ensure_ready()?;
        for &c in indices {
            self.check_index(c)?;
        }
        Ok(indices.iter().map(|&c| self.convert_index(c)).collect())
    }

    /// Encodes or decodes `msg`, whose characters must all belong to the
    /// alphabet. The output has the same length as the input.
    ///
    /// # Errors
    /// - [`EnigmaError::NotConfigured`] or [`EnigmaError::MissingReflector`]
    ///   as for [`convert`](Self::convert).
    /// - [`EnigmaError::InvalidCharacter`] for a character outside the
    ///   alphabet; no rotor moves in that case.
    pub fn convert_message(&mut self, msg: &str) -> Result<String> {
        self.ensure_ready()?;
        let indices = msg
            .chars()
            .map(|c| self.alphabet.to_index(c))
            .collect::<Result<Vec<_>>>()?;

        let mut out = String::with_capacity(msg.len());
        for c in indices {
            let converted = self.convert_index(c);
            out.push(self.alphabet.to_char(converted)?);
        }
        Ok(out)
    }

    // ──────── Setup helpers ────────

    /// Resolves `names` against the pool.
    fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<RotorId>> {
        if names.len() != self.num_rotors {
            return Err(EnigmaError::WrongRotorCount {
                expected: self.num_rotors,
                actual: names.len(),
            });
        }
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let id = self
                .arena
                .find(name)
                .ok_or_else(|| EnigmaError::UnknownRotorName(name.to_string()))?;
            if ids.contains(&id) {
                return Err(EnigmaError::DuplicateRotorName(name.to_string()));
            }
            ids.push(id);
        }
        Ok(ids)
    }

    /// Checks that a slot assignment puts a reflector in slot 0 and moving
    /// rotors in exactly the pawl slots.
    fn check_placement(&self, ids: &[RotorId]) -> Result<()> {
        if !self.arena.get(ids[0]).reflecting() {
            return Err(EnigmaError::MissingReflector);
        }

        let moving = ids.iter().filter(|&&id| self.arena.get(id).rotates()).count();
        if moving != self.pawls {
            return Err(EnigmaError::WrongPawlCount {
                expected: self.pawls,
                actual: moving,
            });
        }

        let first_pawl = self.num_rotors - self.pawls;
        for (slot, &id) in ids.iter().enumerate().skip(1) {
            let rotor = self.arena.get(id);
            if rotor.reflecting() || rotor.rotates() != (slot >= first_pawl) {
                return Err(EnigmaError::MisplacedRotor {
                    name: rotor.name().to_string(),
                    slot,
                });
            }
        }
        Ok(())
    }

    /// Converts a settings string into one position per non-reflector slot
    /// of `ids`, rejecting reflector positions other than 0.
    fn parse_settings(&self, ids: &[RotorId], setting: &str) -> Result<Vec<usize>> {
        let expected = self.num_rotors - 1;
        let actual = setting.chars().count();
        if actual != expected {
            return Err(EnigmaError::WrongSettingLength { expected, actual });
        }

        let mut positions = Vec::with_capacity(expected);
        for (c, &id) in setting.chars().zip(&ids[1..]) {
            let position = self.alphabet.to_index(c)?;
            let rotor = self.arena.get(id);
            if rotor.reflecting() && position != 0 {
                return Err(EnigmaError::ReflectorSetting(rotor.name().to_string()));
            }
            positions.push(position);
        }
        Ok(positions)
    }

    /// Replaces the slot assignment, resetting every newly installed rotor.
    fn install(&mut self, ids: Vec<RotorId>) {
        for &id in &ids {
            self.arena.get_mut(id).reset();
        }
        self.slots = ids;
    }

    /// Sets slots 1.. to `positions`.
    fn apply_settings(&mut self, positions: &[usize]) -> Result<()> {
        for (&id, &position) in self.slots[1..].iter().zip(positions) {
            self.arena.get_mut(id).set(position)?;
        }
        Ok(())
    }

    // ──────── Conversion ────────

    fn ensure_ready(&self) -> Result<()> {
        match self.slots.first() {
            None => Err(EnigmaError::NotConfigured),
            Some(&id) if !self.arena.get(id).reflecting() => Err(EnigmaError::MissingReflector),
            Some(_) => Ok(()),
        }
    }

    fn check_index(&self, c: usize) -> Result<()> {
        if c >= self.alphabet.size() {
            return Err(EnigmaError::IndexOutOfRange {
                index: c,
                size: self.alphabet.size(),
            });
        }
        Ok(())
    }

    /// Steps the rotors, then runs `c` through the full pipeline.
    fn convert_index(&mut self, c: usize) -> usize {
        self.advance_rotors();

        let mut c = c;
        if let Some(plugboard) = &self.plugboard {
            c = plugboard.permute(c as isize);
        }
        for &id in self.slots.iter().rev() {
            c = self.arena.get(id).convert_forward(c);
        }
        for &id in &self.slots[1..] {
            c = self.arena.get(id).convert_backward(c);
        }
        if let Some(plugboard) = &self.plugboard {
            c = plugboard.permute(c as isize);
        }
        c
    }

    /// Decides which stepping slots advance on this keystroke and advances
    /// them.
    ///
    /// All notch tests read the settings as they were before the keystroke:
    /// - the rightmost slot always advances;
    /// - any other stepping slot advances if its right neighbour is at a notch;
    /// - a stepping slot at its own notch also advances when the slot to its
    ///   left is a stepping slot (the double step).
    fn advance_rotors(&mut self) {
        let advances = self.step_decisions();
        trace!(?advances, "stepping");
        for (&id, &advance) in self.slots.iter().zip(&advances) {
            if advance {
                self.arena.get_mut(id).advance();
            }
        }
    }

    fn step_decisions(&self) -> Vec<bool> {
        let n = self.slots.len();
        let first_pawl = n - self.pawls;
        let at_notch: Vec<bool> = self.installed().map(Rotor::at_notch).collect();

        let mut advances = vec![false; n];
        advances[n - 1] = true;
        for (i, advance) in advances.iter_mut().enumerate().take(n - 1).skip(first_pawl) {
            *advance = at_notch[i + 1] || (at_notch[i] && i > first_pawl);
        }
        advances
    }
}
