//! Typed machine configuration.
//!
//! A configuration describes the alphabet, the slot and pawl counts and the
//! pool of available rotors; a [`Setup`] describes one setup directive
//! (which rotors go where, their settings and the plugboard). Both are
//! already tokenised: reading them from text is left to the caller.

use std::sync::Arc;

use tracing::debug;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::{Rotor, RotorType};

/// Description of one rotor in the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotorSpec {
    pub name: String,
    pub rotor_type: RotorType,
    /// Notch characters; only meaningful for moving rotors.
    pub notches: String,
    /// Wiring in cycle notation.
    pub cycles: String,
}

impl RotorSpec {
    /// A moving rotor with the given notches.
    pub fn moving(name: &str, notches: &str, cycles: &str) -> Self {
        Self::build_spec(name, RotorType::Moving, notches, cycles)
    }

    /// A rotor that never steps.
    pub fn fixed(name: &str, cycles: &str) -> Self {
        Self::build_spec(name, RotorType::Fixed, "", cycles)
    }

    /// A reflector.
    pub fn reflector(name: &str, cycles: &str) -> Self {
        Self::build_spec(name, RotorType::Reflector, "", cycles)
    }

    /// Builds a spec from a type token such as `"MQ"`, `"N"` or `"R"`: the
    /// first character is the type tag and, for moving rotors, the rest are
    /// the notches.
    ///
    /// # Errors
    /// Returns [`EnigmaError::UnknownRotorType`] if the tag is missing or
    /// not one of `M`, `N`, `R`.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::{RotorSpec, RotorType};
    ///
    /// let spec = RotorSpec::from_tag("VI", "MZM", "(AJQDVLEOZWIYTS) (CGMNHFUX) (BPRK)").unwrap();
    /// assert_eq!(spec.rotor_type, RotorType::Moving);
    /// assert_eq!(spec.notches, "ZM");
    /// assert!(RotorSpec::from_tag("X", "Q", "").is_err());
    /// ```
    pub fn from_tag(name: &str, tag: &str, cycles: &str) -> Result<Self> {
        let mut chars = tag.chars();
        let rotor_type = match chars.next() {
            Some(c) => RotorType::from_tag(c)?,
            None => return Err(EnigmaError::UnknownRotorType(' ')),
        };
        let notches = match rotor_type {
            RotorType::Moving => chars.as_str(),
            RotorType::Fixed | RotorType::Reflector => "",
        };
        Ok(Self::build_spec(name, rotor_type, notches, cycles))
    }

    fn build_spec(name: &str, rotor_type: RotorType, notches: &str, cycles: &str) -> Self {
        RotorSpec {
            name: name.to_string(),
            rotor_type,
            notches: notches.to_string(),
            cycles: cycles.to_string(),
        }
    }

    /// Builds the rotor over `alphabet`.
    ///
    /// # Errors
    /// Any permutation error from the cycles, [`EnigmaError::InvalidCharacter`]
    /// for a bad notch, or [`EnigmaError::NonInvolutiveReflector`].
    pub fn build(&self, alphabet: &Arc<Alphabet>) -> Result<Rotor> {
        let permutation = Permutation::new(&self.cycles, alphabet)?;
        match self.rotor_type {
            RotorType::Moving => Rotor::moving(&self.name, permutation, &self.notches),
            RotorType::Fixed => Ok(Rotor::fixed(&self.name, permutation)),
            RotorType::Reflector => Rotor::reflector(&self.name, permutation),
        }
    }
}

/// Description of a machine: alphabet, shape and rotor pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineSpec {
    pub alphabet: Alphabet,
    pub slots: usize,
    pub pawls: usize,
    pub rotors: Vec<RotorSpec>,
}

impl MachineSpec {
    /// Creates a spec with an empty rotor pool.
    pub fn new(alphabet: Alphabet, slots: usize, pawls: usize) -> Self {
        MachineSpec {
            alphabet,
            slots,
            pawls,
            rotors: Vec::new(),
        }
    }

    /// Adds a rotor to the pool.
    pub fn with_rotor(mut self, rotor: RotorSpec) -> Self {
        self.rotors.push(rotor);
        self
    }

    /// The four-rotor naval machine: 26 letters, 5 slots, 3 pawls, and the
    /// historical rotors I to VIII, Beta, Gamma and thin reflectors B and C.
    pub fn naval() -> Self {
        MachineSpec::new(Alphabet::upper(), 5, 3)
            .with_rotor(RotorSpec::moving(
                "I",
                "Q",
                "(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)",
            ))
            .with_rotor(RotorSpec::moving(
                "II",
                "E",
                "(FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)",
            ))
            .with_rotor(RotorSpec::moving(
                "III",
                "V",
                "(ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)",
            ))
            .with_rotor(RotorSpec::moving(
                "IV",
                "J",
                "(AEPLIYWCOXMRFZBSTGJQNH) (DV) (KU)",
            ))
            .with_rotor(RotorSpec::moving(
                "V",
                "Z",
                "(AVOLDRWFIUQ) (BZKSMNHYC) (EGTJPX)",
            ))
            .with_rotor(RotorSpec::moving(
                "VI",
                "ZM",
                "(AJQDVLEOZWIYTS) (CGMNHFUX) (BPRK)",
            ))
            .with_rotor(RotorSpec::moving(
                "VII",
                "ZM",
                "(ANOUPFRIMBZTLWKSVEGCJYDHXQ)",
            ))
            .with_rotor(RotorSpec::moving(
                "VIII",
                "ZM",
                "(AFLSETWUNDHOZVICQ) (BKJ) (GXY) (MPR)",
            ))
            .with_rotor(RotorSpec::fixed(
                "Beta",
                "(ALBEVFCYODJWUGNMQTZSKPR) (HIX)",
            ))
            .with_rotor(RotorSpec::fixed(
                "Gamma",
                "(AFNIRLBSQWVXGUZDKMTPCOYJHE)",
            ))
            .with_rotor(RotorSpec::reflector(
                "B",
                "(AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)",
            ))
            .with_rotor(RotorSpec::reflector(
                "C",
                "(AR) (BD) (CO) (EJ) (FN) (GT) (HK) (IV) (LM) (PW) (QZ) (SX) (UY)",
            ))
    }

    /// Builds every rotor and the machine.
    ///
    /// # Errors
    /// The first error raised by a rotor spec or by [`Machine::new`].
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::{MachineSpec, Setup};
    ///
    /// let mut machine = MachineSpec::naval().build().unwrap();
    /// machine
    ///     .apply_setup(&Setup::new(["B", "Beta", "I", "II", "III"]).with_settings("AAAA"))
    ///     .unwrap();
    /// assert_eq!(machine.convert_message("AAAAA").unwrap(), "BDZGO");
    /// ```
    pub fn build(&self) -> Result<Machine> {
        let alphabet = Arc::new(self.alphabet.clone());
        let rotors = self
            .rotors
            .iter()
            .map(|spec| spec.build(&alphabet))
            .collect::<Result<Vec<_>>>()?;
        debug!(rotors = rotors.len(), "rotor pool built");
        Machine::new(alphabet, self.slots, self.pawls, rotors)
    }
}

/// One setup directive: the rotors for each slot (reflector first), an
/// optional settings string and optional plugboard cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Setup {
    pub rotors: Vec<String>,
    pub settings: Option<String>,
    pub plugboard: Vec<String>,
}

impl Setup {
    /// A setup installing `rotors` at setting 0 with no plugboard.
    pub fn new<I, S>(rotors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Setup {
            rotors: rotors.into_iter().map(Into::into).collect(),
            settings: None,
            plugboard: Vec::new(),
        }
    }

    /// Sets the settings string, one character per non-reflector slot.
    pub fn with_settings(mut self, settings: impl Into<String>) -> Self {
        self.settings = Some(settings.into());
        self
    }

    /// Sets the plugboard cycle tokens, e.g. `["(AB)", "(CD)"]`.
    pub fn with_plugboard<I, S>(mut self, cycles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plugboard = cycles.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the plugboard tokens joined into one cycle-notation string.
    pub fn plugboard_cycles(&self) -> String {
        self.plugboard.join(" ")
    }
}
