//! Categorical Yield Factors
//!
//! Each per-request categorical input (irrigation, soil, experience, water
//! quality, region, season) is an explicit enum with an exhaustive-match
//! multiplier, so the "unknown value → default" policy is visible in one
//! place per category instead of buried in string comparisons.
//!
//! Parsing is deliberately permissive: a label the enum does not recognize
//! parses to `None` and the caller applies that category's documented
//! default. The single asymmetry is irrigation, whose unknown default is 0.8
//! (below average) rather than the neutral 1.0 — an unknown irrigation setup
//! is treated as a liability, not a wash.

/// Irrigation method. Unknown labels default to [`IrrigationType::UNKNOWN_MULTIPLIER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrrigationType {
    Canal,
    TubeWell,
    RainFed,
    Drip,
    Sprinkler,
}

impl IrrigationType {
    /// Applied when the request's irrigation label is unrecognized.
    /// Below-average on purpose; see module docs.
    pub const UNKNOWN_MULTIPLIER: f64 = 0.8;

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Canal" => Some(Self::Canal),
            "Tube-well" => Some(Self::TubeWell),
            "Rain-fed" => Some(Self::RainFed),
            "Drip" => Some(Self::Drip),
            "Sprinkler" => Some(Self::Sprinkler),
            _ => None,
        }
    }

    /// Irrigation efficiency applied to the running yield.
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Canal => 0.7,
            Self::TubeWell => 0.8,
            Self::RainFed => 0.5,
            Self::Drip => 0.95,
            Self::Sprinkler => 0.85,
        }
    }
}

/// Soil type. Unknown labels default to the neutral 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoilType {
    Loamy,
    Sandy,
    Clay,
    Alluvial,
    Black,
    Red,
}

impl SoilType {
    pub const UNKNOWN_MULTIPLIER: f64 = 1.0;

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Loamy" => Some(Self::Loamy),
            "Sandy" => Some(Self::Sandy),
            "Clay" => Some(Self::Clay),
            "Alluvial" => Some(Self::Alluvial),
            "Black" => Some(Self::Black),
            "Red" => Some(Self::Red),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Self::Loamy => 1.0,
            Self::Sandy => 0.8,
            Self::Clay => 0.9,
            Self::Alluvial => 1.1,
            Self::Black => 1.05,
            Self::Red => 0.75,
        }
    }
}

/// Farmer experience level. Unknown labels default to the neutral 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Expert,
}

impl ExperienceLevel {
    pub const UNKNOWN_MULTIPLIER: f64 = 1.0;

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Beginner" => Some(Self::Beginner),
            "Intermediate" => Some(Self::Intermediate),
            "Expert" => Some(Self::Expert),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Self::Beginner => 0.8,
            Self::Intermediate => 1.0,
            Self::Expert => 1.15,
        }
    }
}

/// Water quality. Unknown labels default to the neutral 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterQuality {
    Poor,
    Average,
    Good,
    Excellent,
}

impl WaterQuality {
    pub const UNKNOWN_MULTIPLIER: f64 = 1.0;

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Poor" => Some(Self::Poor),
            "Average" => Some(Self::Average),
            "Good" => Some(Self::Good),
            "Excellent" => Some(Self::Excellent),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Self::Poor => 0.7,
            Self::Average => 0.85,
            Self::Good => 1.0,
            Self::Excellent => 1.1,
        }
    }
}

/// Farm region. Unknown labels default to the neutral 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    North,
    South,
    East,
    West,
    Central,
}

impl Region {
    pub const UNKNOWN_MULTIPLIER: f64 = 1.0;

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "North" => Some(Self::North),
            "South" => Some(Self::South),
            "East" => Some(Self::East),
            "West" => Some(Self::West),
            "Central" => Some(Self::Central),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Self::North => 1.0,
            Self::South => 1.05,
            Self::East => 0.95,
            Self::West => 1.02,
            Self::Central => 0.98,
        }
    }
}

/// Growing season. Unknown labels default to the neutral 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Kharif,
    Rabi,
    Zaid,
    WholeYear,
}

impl Season {
    pub const UNKNOWN_MULTIPLIER: f64 = 1.0;

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Kharif" => Some(Self::Kharif),
            "Rabi" => Some(Self::Rabi),
            "Zaid" => Some(Self::Zaid),
            "Whole Year" => Some(Self::WholeYear),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Self::Kharif => 1.0,
            Self::Rabi => 1.05,
            Self::Zaid => 0.9,
            Self::WholeYear => 1.02,
        }
    }
}
