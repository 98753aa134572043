//! Composite identifier of a geographic reporting unit.

use std::fmt;

/// Region key: district, sub-district and sub-district code.
///
/// Ordering is lexicographic over the three components, which fixes the
/// row order of every output table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionKey {
    district: String,
    sub_district: String,
    code: String,
}

impl RegionKey {
    /// Creates a new region key.
    pub fn new(
        district: impl Into<String>,
        sub_district: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            district: district.into(),
            sub_district: sub_district.into(),
            code: code.into(),
        }
    }

    /// District name.
    pub fn district(&self) -> &str {
        &self.district
    }

    /// Sub-district name.
    pub fn sub_district(&self) -> &str {
        &self.sub_district
    }

    /// Sub-district code.
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.district, self.sub_district, self.code)
    }
}
