//! Known-answer tests against the historical machines, plus end-to-end
//! checks of the setup and conversion rules through the public API.

use std::sync::Arc;

use enigma::{Alphabet, EnigmaError, Machine, MachineSpec, Permutation, RotorSpec, Setup};

fn naval() -> Machine {
    MachineSpec::naval().build().unwrap()
}

/// The army machine: three moving rotors and the wide reflector B.
fn army() -> Machine {
    let mut spec = MachineSpec::naval();
    spec.slots = 4;
    spec.rotors.push(RotorSpec::reflector(
        "UKW-B",
        "(AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)",
    ));
    spec.build().unwrap()
}

fn hiawatha_setup() -> Setup {
    Setup::new(["B", "Beta", "III", "IV", "I"])
        .with_settings("AXLE")
        .with_plugboard(["(HQ)", "(EX)", "(IP)", "(TR)", "(BY)"])
}

// ═══════════════════════════════════════════════════════════════════════
// Historical vectors
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn army_i_ii_iii_at_aaa() {
    let mut m = army();
    m.apply_setup(&Setup::new(["UKW-B", "I", "II", "III"]).with_settings("AAA"))
        .unwrap();
    assert_eq!(m.convert_message("AAAAA").unwrap(), "BDZGO");
}

#[test]
fn thin_reflector_with_beta_at_a_matches_army() {
    let mut m = naval();
    m.apply_setup(&Setup::new(["B", "Beta", "I", "II", "III"]).with_settings("AAAA"))
        .unwrap();
    assert_eq!(m.convert_message("AAAAA").unwrap(), "BDZGO");
}

#[test]
fn naval_message_carries_state_across_lines() {
    let mut m = naval();
    m.apply_setup(&hiawatha_setup()).unwrap();
    assert_eq!(
        m.convert_message("FROMHISSHOULDERHIAWATHA").unwrap(),
        "QVPQSOKOILPUBKJZPISFXDW"
    );
    assert_eq!(
        m.convert_message("TOOKTHECAMERAOFROSEWOOD").unwrap(),
        "BHCNSCXNUOAATZXSRCFYDGU"
    );
}

#[test]
fn naval_message_decodes() {
    let mut m = naval();
    m.apply_setup(&hiawatha_setup()).unwrap();
    let plain = m
        .convert_message("QVPQSOKOILPUBKJZPISFXDWBHCNSCXNUOAATZXSRCFYDGU")
        .unwrap();
    assert_eq!(plain, "FROMHISSHOULDERHIAWATHATOOKTHECAMERAOFROSEWOOD");
}

#[test]
fn no_character_encodes_to_itself() {
    let mut m = naval();
    m.apply_setup(&hiawatha_setup()).unwrap();
    let plain: String = std::iter::repeat("ABCDEFGHIJKLMNOPQRSTUVWXYZ")
        .take(20)
        .collect();
    let cipher = m.convert_message(&plain).unwrap();
    for (p, c) in plain.chars().zip(cipher.chars()) {
        assert_ne!(p, c);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Setup rules
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn setup_rejections() {
    let mut m = naval();
    let cases: Vec<(Setup, EnigmaError)> = vec![
        (
            Setup::new(["B", "Beta", "I", "II"]),
            EnigmaError::WrongRotorCount { expected: 5, actual: 4 },
        ),
        (
            Setup::new(["B", "Beta", "I", "II", "IX"]),
            EnigmaError::UnknownRotorName("IX".to_string()),
        ),
        (
            Setup::new(["B", "Beta", "I", "I", "II"]),
            EnigmaError::DuplicateRotorName("I".to_string()),
        ),
        (
            Setup::new(["Beta", "B", "I", "II", "III"]),
            EnigmaError::MissingReflector,
        ),
        (
            Setup::new(["B", "I", "II", "III", "IV"]),
            EnigmaError::WrongPawlCount { expected: 3, actual: 4 },
        ),
        (
            Setup::new(["B", "I", "Beta", "II", "III"]),
            EnigmaError::MisplacedRotor { name: "I".to_string(), slot: 1 },
        ),
        (
            Setup::new(["B", "Beta", "I", "II", "III"]).with_settings("AAA"),
            EnigmaError::WrongSettingLength { expected: 4, actual: 3 },
        ),
        (
            Setup::new(["B", "Beta", "I", "II", "III"]).with_settings("AAa1"),
            EnigmaError::InvalidCharacter('a'),
        ),
    ];
    for (setup, want) in cases {
        assert_eq!(m.apply_setup(&setup), Err(want), "setup {:?}", setup);
    }
}

#[test]
fn rotor_names_ignore_case() {
    let mut m = naval();
    m.apply_setup(&Setup::new(["b", "BETA", "i", "Ii", "iii"]).with_settings("AAAA"))
        .unwrap();
    assert_eq!(m.convert_message("AAAAA").unwrap(), "BDZGO");
}

#[test]
fn failed_setup_keeps_previous_state() {
    let mut m = naval();
    m.apply_setup(&hiawatha_setup()).unwrap();
    m.convert_message("FROMHIS").unwrap();
    let before = m.settings();

    let bad = Setup::new(["B", "Gamma", "V", "VI", "VII"])
        .with_settings("ZZZZ")
        .with_plugboard(["(AB)", "(B"]);
    assert!(matches!(
        m.apply_setup(&bad),
        Err(EnigmaError::MalformedCycle(_))
    ));
    assert_eq!(m.settings(), before);
    assert_eq!(
        m.convert_message("SHOULDERHIAWATHA").unwrap(),
        "OILPUBKJZPISFXDW"
    );
}

#[test]
fn plugboard_must_be_a_valid_permutation() {
    let mut m = naval();
    let setup = Setup::new(["B", "Beta", "I", "II", "III"]).with_plugboard(["(AB)", "(BC)"]);
    assert!(matches!(
        m.apply_setup(&setup),
        Err(EnigmaError::MalformedCycle(_))
    ));
}

#[test]
fn non_involutive_plugboard_is_accepted() {
    let mut m = naval();
    m.apply_setup(&Setup::new(["B", "Beta", "I", "II", "III"]).with_plugboard(["(ABC)"]))
        .unwrap();
    let plugboard = m.plugboard().unwrap();
    assert!(!plugboard.is_involution());
    assert_eq!(m.convert_message("HELLO").unwrap().len(), 5);
}

#[test]
fn empty_plugboard_removes_previous_one() {
    let mut m = naval();
    m.apply_setup(&hiawatha_setup()).unwrap();
    assert!(m.plugboard().is_some());
    m.apply_setup(&Setup::new(["B", "Beta", "I", "II", "III"]).with_settings("AAAA"))
        .unwrap();
    assert!(m.plugboard().is_none());
    assert_eq!(m.convert_message("AAAAA").unwrap(), "BDZGO");
}

// ═══════════════════════════════════════════════════════════════════════
// Conversion rules
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn unconfigured_machine_refuses_input() {
    let mut m = naval();
    assert_eq!(m.convert_message("A"), Err(EnigmaError::NotConfigured));
    assert_eq!(m.convert(0), Err(EnigmaError::NotConfigured));
}

#[test]
fn bad_character_leaves_rotors_untouched() {
    let mut m = naval();
    m.apply_setup(&hiawatha_setup()).unwrap();
    assert_eq!(
        m.convert_message("FROM HIS"),
        Err(EnigmaError::InvalidCharacter(' '))
    );
    assert_eq!(m.settings(), "AAXLE");
    assert_eq!(m.convert_message("FROM").unwrap(), "QVPQ");
}

#[test]
fn empty_message_is_empty() {
    let mut m = naval();
    m.apply_setup(&hiawatha_setup()).unwrap();
    assert_eq!(m.convert_message("").unwrap(), "");
    assert_eq!(m.settings(), "AAXLE");
}

#[test]
fn manual_plugboard_matches_setup_plugboard() {
    let mut a = naval();
    a.apply_setup(&hiawatha_setup()).unwrap();

    let mut b = naval();
    b.insert_rotors(&["B", "Beta", "III", "IV", "I"]).unwrap();
    b.set_rotors("AXLE").unwrap();
    let alpha: Arc<Alphabet> = Arc::clone(b.alphabet());
    b.set_plugboard(Permutation::new("(HQ) (EX) (IP) (TR) (BY)", &alpha).unwrap())
        .unwrap();

    let msg = "FROMHISSHOULDERHIAWATHA";
    assert_eq!(a.convert_message(msg).unwrap(), b.convert_message(msg).unwrap());
}
