//! Conventional SPI drought/wetness classes (McKee et al., 1993).

use std::fmt;

/// Drought or wetness class of an SPI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DroughtCategory {
    /// SPI <= -2.0
    ExtremelyDry,
    /// -2.0 < SPI <= -1.5
    SeverelyDry,
    /// -1.5 < SPI <= -1.0
    ModeratelyDry,
    /// -1.0 < SPI < 1.0
    NearNormal,
    /// 1.0 <= SPI < 1.5
    ModeratelyWet,
    /// 1.5 <= SPI < 2.0
    VeryWet,
    /// SPI >= 2.0
    ExtremelyWet,
}

impl DroughtCategory {
    /// Classifies an SPI value. NaN falls into [`DroughtCategory::ExtremelyDry`].
    pub fn from_spi(spi: f64) -> Self {
        if spi >= 2.0 {
            Self::ExtremelyWet
        } else if spi >= 1.5 {
            Self::VeryWet
        } else if spi >= 1.0 {
            Self::ModeratelyWet
        } else if spi > -1.0 {
            Self::NearNormal
        } else if spi > -1.5 {
            Self::ModeratelyDry
        } else if spi > -2.0 {
            Self::SeverelyDry
        } else {
            Self::ExtremelyDry
        }
    }

    /// Stable snake_case label used in output files.
    pub fn label(self) -> &'static str {
        match self {
            Self::ExtremelyDry => "extremely_dry",
            Self::SeverelyDry => "severely_dry",
            Self::ModeratelyDry => "moderately_dry",
            Self::NearNormal => "near_normal",
            Self::ModeratelyWet => "moderately_wet",
            Self::VeryWet => "very_wet",
            Self::ExtremelyWet => "extremely_wet",
        }
    }

    /// Returns `true` for the three dry classes.
    pub fn is_drought(self) -> bool {
        self <= Self::ModeratelyDry
    }
}

impl fmt::Display for DroughtCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
