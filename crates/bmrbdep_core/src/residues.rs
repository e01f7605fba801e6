//! Controlled vocabulary for single-letter polymer residue codes.
//!
//! # Invariants
//! - Built once on first use and never mutated.
//! - Keys are single uppercase letters; values are non-empty residue codes.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Letter -> canonical residue code for one polymer class.
pub type ResidueMap = BTreeMap<&'static str, &'static str>;

const POLYPEPTIDE_L: &[(&str, &str)] = &[
    ("P", "PRO"),
    ("G", "GLY"),
    ("A", "ALA"),
    ("R", "ARG"),
    ("N", "ASN"),
    ("D", "ASP"),
    ("C", "CYS"),
    ("Q", "GLN"),
    ("E", "GLU"),
    ("H", "HIS"),
    ("I", "ILE"),
    ("L", "LEU"),
    ("K", "LYS"),
    ("M", "MET"),
    ("F", "PHE"),
    ("S", "SER"),
    ("T", "THR"),
    ("W", "TRP"),
    ("Y", "TYR"),
    ("V", "VAL"),
    ("U", "SEC"),
];

const POLYRIBONUCLEOTIDE: &[(&str, &str)] =
    &[("A", "A"), ("C", "C"), ("G", "G"), ("T", "T"), ("U", "U")];

const POLYDEOXYRIBONUCLEOTIDE: &[(&str, &str)] =
    &[("A", "DA"), ("C", "DC"), ("G", "DG"), ("T", "DT"), ("U", "DU")];

static RESIDUE_MAPPINGS: Lazy<BTreeMap<&'static str, ResidueMap>> = Lazy::new(|| {
    PolymerClass::ALL
        .iter()
        .map(|class| (class.as_str(), class.codes().iter().copied().collect()))
        .collect()
});

/// Polymer classes with a residue vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolymerClass {
    PolypeptideL,
    Polyribonucleotide,
    Polydeoxyribonucleotide,
}

impl PolymerClass {
    pub const ALL: [PolymerClass; 3] = [
        Self::PolypeptideL,
        Self::Polyribonucleotide,
        Self::Polydeoxyribonucleotide,
    ];

    /// Canonical spelling used as the mapping key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PolypeptideL => "polypeptide(L)",
            Self::Polyribonucleotide => "polyribonucleotide",
            Self::Polydeoxyribonucleotide => "polydeoxyribonucleotide",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.as_str() == value)
    }

    fn codes(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::PolypeptideL => POLYPEPTIDE_L,
            Self::Polyribonucleotide => POLYRIBONUCLEOTIDE,
            Self::Polydeoxyribonucleotide => POLYDEOXYRIBONUCLEOTIDE,
        }
    }
}

impl Display for PolymerClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the full class -> letter -> code table.
pub fn residue_mappings() -> &'static BTreeMap<&'static str, ResidueMap> {
    &RESIDUE_MAPPINGS
}

/// Looks up the canonical residue code for `letter` within `class`.
pub fn residue_code(class: PolymerClass, letter: &str) -> Option<&'static str> {
    RESIDUE_MAPPINGS
        .get(class.as_str())
        .and_then(|codes| codes.get(letter))
        .copied()
}
