//! Enigma-style rotor cipher engine.
//!
//! A machine is a stack of rotors over an arbitrary alphabet: a reflector in
//! the leftmost slot, optional fixed rotors, and a run of moving rotors on
//! the right that step like an odometer (including the historical double
//! step). An optional plugboard swaps characters before and after the stack.
//! Because every part is a bijection and the reflector is an involution,
//! the same machine state both encodes and decodes.
//!
//! # Architecture
//!
//! ```text
//! Alphabet     (character <-> index, shared behind an Arc)
//!     ↓
//! Permutation  (cycle notation -> forward/inverse tables)
//!     ↓
//! Rotor        (permutation + setting; Reflector | Fixed | Moving{notches})
//!     ↓ pooled in a RotorArena, installed by RotorId
//! Machine      (slots + pawls + plugboard; steps then converts each key)
//! ```
//!
//! [`MachineSpec`] and [`Setup`] describe a machine and a setup directive in
//! typed form; [`MachineSpec::naval`] is the historical four-rotor machine.
//!
//! # Examples
//!
//! Encipher with the historical rotor set, then decipher from the same
//! starting state:
//!
//! ```
//! use enigma::{MachineSpec, Setup};
//!
//! let setup = Setup::new(["B", "Beta", "III", "IV", "I"])
//!     .with_settings("AXLE")
//!     .with_plugboard(["(HQ)", "(EX)", "(IP)", "(TR)", "(BY)"]);
//!
//! let mut machine = MachineSpec::naval().build().unwrap();
//! machine.apply_setup(&setup).unwrap();
//! let cipher = machine.convert_message("FROMHISSHOULDERHIAWATHA").unwrap();
//! assert_eq!(cipher, "QVPQSOKOILPUBKJZPISFXDW");
//!
//! machine.apply_setup(&setup).unwrap();
//! assert_eq!(machine.convert_message(&cipher).unwrap(), "FROMHISSHOULDERHIAWATHA");
//! ```
//!
//! Build a small machine by hand over a custom alphabet:
//!
//! ```
//! use enigma::{Alphabet, MachineSpec, RotorSpec, Setup};
//!
//! let mut machine = MachineSpec::new(Alphabet::new("ABCD").unwrap(), 3, 2)
//!     .with_rotor(RotorSpec::reflector("R", "(AC) (BD)"))
//!     .with_rotor(RotorSpec::moving("X", "C", "(ABCD)"))
//!     .with_rotor(RotorSpec::moving("Y", "A", "(AB) (CD)"))
//!     .build()
//!     .unwrap();
//! machine.apply_setup(&Setup::new(["R", "X", "Y"])).unwrap();
//! assert_eq!(machine.convert_message("ABCD").unwrap().len(), 4);
//! ```

#![deny(clippy::all)]

pub mod error;

mod alphabet;
mod config;
mod machine;
mod permutation;
mod rotor;

pub use alphabet::Alphabet;
pub use config::{MachineSpec, RotorSpec, Setup};
pub use error::{EnigmaError, Result};
pub use machine::Machine;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorArena, RotorId, RotorKind, RotorType};
