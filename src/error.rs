//! Error types for the rotor machine engine.
//!
//! Every error is a configuration or usage error. None of them is transient,
//! so callers report the message and stop processing the current session.

use thiserror::Error;

/// Errors produced by the rotor machine engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnigmaError {
    /// Cycle notation could not be parsed.
    #[error("malformed cycle notation: {0}")]
    MalformedCycle(String),

    /// A character listed in a cycle is not part of the alphabet.
    #[error("cycle character '{0}' is not in the alphabet")]
    UnknownCharacter(char),

    /// A character is not part of the alphabet.
    #[error("character '{0}' is not in the alphabet")]
    InvalidCharacter(char),

    /// An index is outside `0..size`.
    #[error("index {index} is out of range for an alphabet of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    /// An alphabet needs at least one character.
    #[error("alphabet must contain at least one character")]
    EmptyAlphabet,

    /// An alphabet lists the same character twice.
    #[error("character '{0}' appears more than once in the alphabet")]
    DuplicateAlphabetCharacter(char),

    /// A rotor name does not match any rotor in the pool.
    #[error("bad rotor name: {0}")]
    UnknownRotorName(String),

    /// A rotor name appears more than once.
    #[error("duplicate rotor name: {0}")]
    DuplicateRotorName(String),

    /// A rotor type tag is not one of `M`, `N` or `R`.
    #[error("unknown rotor type '{0}'")]
    UnknownRotorType(char),

    /// Setup names the wrong number of rotors.
    #[error("wrong number of rotors: expected {expected}, got {actual}")]
    WrongRotorCount { expected: usize, actual: usize },

    /// Settings string does not cover every non-reflector slot.
    #[error("wheel settings have length {actual}, expected {expected}")]
    WrongSettingLength { expected: usize, actual: usize },

    /// Setup asks for a different number of moving rotors than there are pawls.
    #[error("wrong number of moving rotors: machine has {expected} pawls, got {actual}")]
    WrongPawlCount { expected: usize, actual: usize },

    /// Slot 0 is empty or holds a rotor that cannot reflect.
    #[error("reflector in wrong place: slot 0 must hold a reflector")]
    MissingReflector,

    /// A rotor sits in a slot its kind cannot occupy.
    #[error("rotor {name} cannot occupy slot {slot}")]
    MisplacedRotor { name: String, slot: usize },

    /// Reflectors have a single position.
    #[error("reflector {0} has only one position")]
    ReflectorSetting(String),

    /// Reflector wiring is not its own inverse.
    #[error("reflector {0} wiring is not an involution")]
    NonInvolutiveReflector(String),

    /// A rotor or plugboard is wired over a different alphabet than the machine.
    #[error("{0} is wired over a different alphabet than the machine")]
    AlphabetMismatch(String),

    /// Slot and pawl counts do not describe a usable machine.
    #[error("invalid machine shape: {slots} slots with {pawls} pawls")]
    InvalidMachineShape { slots: usize, pawls: usize },

    /// Conversion was requested before any rotors were installed.
    #[error("no configuration: rotors have not been installed")]
    NotConfigured,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EnigmaError>;
