//! Derived classifications.
//!
//! Every classification is a closed enumeration over the feed's internal
//! codes plus an `Other` variant that carries unrecognized codes through
//! unchanged. Classification never fails.

use serde::{Serialize, Serializer};

// =============================================================================
// Relic tier
// =============================================================================

/// Relic tier of a fissure or void storm, from its `VoidT*` code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RelicTier {
    /// `VoidT1`.
    Lith,
    /// `VoidT2`.
    Meso,
    /// `VoidT3`.
    Neo,
    /// `VoidT4`.
    Axi,
    /// `VoidT5`.
    Requiem,
    /// `VoidT6`.
    Omnia,
    /// Unrecognized code, kept verbatim.
    Other(String),
}

impl RelicTier {
    /// Classify a modifier code.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "VoidT1" => Self::Lith,
            "VoidT2" => Self::Meso,
            "VoidT3" => Self::Neo,
            "VoidT4" => Self::Axi,
            "VoidT5" => Self::Requiem,
            "VoidT6" => Self::Omnia,
            other => Self::Other(other.to_string()),
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Lith => "Lith",
            Self::Meso => "Meso",
            Self::Neo => "Neo",
            Self::Axi => "Axi",
            Self::Requiem => "Requiem",
            Self::Omnia => "Omnia",
            Self::Other(code) => code,
        }
    }

    /// Numeric level, 1 for Lith through 6 for Omnia.
    #[must_use]
    pub const fn level(&self) -> Option<u8> {
        match self {
            Self::Lith => Some(1),
            Self::Meso => Some(2),
            Self::Neo => Some(3),
            Self::Axi => Some(4),
            Self::Requiem => Some(5),
            Self::Omnia => Some(6),
            Self::Other(_) => None,
        }
    }
}

impl Serialize for RelicTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// =============================================================================
// Challenge cadence
// =============================================================================

/// How often a seasonal challenge rotates, derived from its path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChallengeCadence {
    /// Rotates daily.
    Daily,
    /// Rotates weekly.
    Weekly,
    /// Harder weekly variant.
    EliteWeekly,
    /// Path matched no known cadence.
    Other(String),
}

impl ChallengeCadence {
    /// Classify a challenge path.
    ///
    /// `WeeklyHard` is checked before `Weekly` since the latter is a
    /// substring of the former. The feed's own daily flag is honoured when
    /// the path carries no marker.
    #[must_use]
    pub fn classify(path: &str, daily_flag: bool) -> Self {
        if path.contains("WeeklyHard") {
            Self::EliteWeekly
        } else if path.contains("Weekly") {
            Self::Weekly
        } else if path.contains("Daily") || daily_flag {
            Self::Daily
        } else {
            Self::Other(path.to_string())
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::EliteWeekly => "Elite weekly",
            Self::Other(path) => path,
        }
    }

    /// Standing awarded on completion.
    #[must_use]
    pub const fn standing(&self) -> u32 {
        match self {
            Self::Daily => 1000,
            Self::Weekly => 4500,
            Self::EliteWeekly => 7000,
            Self::Other(_) => 0,
        }
    }
}

impl Serialize for ChallengeCadence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// =============================================================================
// Circuit tier
// =============================================================================

/// Which circuit a choice set belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CircuitTier {
    /// `EXC_NORMAL`.
    Normal,
    /// `EXC_HARD`.
    SteelPath,
    /// Unrecognized code.
    Other(String),
}

impl CircuitTier {
    /// Classify a circuit category code.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "EXC_NORMAL" => Self::Normal,
            "EXC_HARD" => Self::SteelPath,
            other => Self::Other(other.to_string()),
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Normal => "Normal",
            Self::SteelPath => "Steel Path",
            Self::Other(code) => code,
        }
    }
}

impl Serialize for CircuitTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// =============================================================================
// Conquest kind
// =============================================================================

/// Archimedea variant of a conquest rotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConquestKind {
    /// `CT_LAB`.
    Deep,
    /// `CT_HEX`.
    Temporal,
    /// Unrecognized code.
    Other(String),
}

impl ConquestKind {
    /// Classify a conquest type code.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "CT_LAB" => Self::Deep,
            "CT_HEX" => Self::Temporal,
            other => Self::Other(other.to_string()),
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Deep => "Deep Archimedea",
            Self::Temporal => "Temporal Archimedea",
            Self::Other(code) => code,
        }
    }
}

impl Serialize for ConquestKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Insert spaces at lower-to-upper case boundaries: `"SomeName"` becomes
/// `"Some Name"`.
#[must_use]
pub fn split_camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev: Option<char> = None;
    for c in input.chars() {
        if let Some(p) = prev
            && c.is_uppercase()
            && (p.is_lowercase() || p.is_ascii_digit())
        {
            out.push(' ');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}
