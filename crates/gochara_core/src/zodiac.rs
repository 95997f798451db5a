//! Zodiac signs: twelve equal 30° divisions of the ecliptic starting at 0° Aries.

use serde::{Serialize, Serializer};

use crate::angle::normalize_360;

/// Width of one sign in degrees.
pub const SIGN_WIDTH_DEG: f64 = 30.0;

/// The 12 tropical zodiac signs starting from Aries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// All 12 signs in zodiacal order (0 = Aries, 11 = Pisces).
pub const ALL_SIGNS: [ZodiacSign; 12] = [
    ZodiacSign::Aries,
    ZodiacSign::Taurus,
    ZodiacSign::Gemini,
    ZodiacSign::Cancer,
    ZodiacSign::Leo,
    ZodiacSign::Virgo,
    ZodiacSign::Libra,
    ZodiacSign::Scorpio,
    ZodiacSign::Sagittarius,
    ZodiacSign::Capricorn,
    ZodiacSign::Aquarius,
    ZodiacSign::Pisces,
];

impl ZodiacSign {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }

    /// 0-based index in zodiacal order.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Sign for a 0-based index; indices wrap modulo 12.
    pub const fn from_index(index: u8) -> Self {
        ALL_SIGNS[(index % 12) as usize]
    }

    /// Sign containing an ecliptic longitude (any real value, wrapped first).
    pub fn from_longitude(lon_deg: f64) -> Self {
        let idx = (normalize_360(lon_deg) / SIGN_WIDTH_DEG).floor() as u8;
        Self::from_index(idx.min(11))
    }

    /// Longitude of this sign's first degree.
    pub fn start_longitude(self) -> f64 {
        self.index() as f64 * SIGN_WIDTH_DEG
    }

    /// The following sign in zodiacal order.
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// The preceding sign in zodiacal order.
    pub const fn previous(self) -> Self {
        Self::from_index(self.index() + 11)
    }
}

impl std::fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ZodiacSign {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
