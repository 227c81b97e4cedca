//! Document version numbers.
//!
//! Versions are exposed as decimal numbers (`1.0`, `2.0`, ...) but only ever move in whole
//! units, so they are held as an integer count. Incrementing therefore never drifts the way
//! repeated floating-point addition would.

use std::fmt;
use std::str::FromStr;

/// Errors produced when constructing a [`Version`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("version must be a positive whole number, got {0}")]
    NotWholePositive(String),
    #[error("version counter overflow")]
    Overflow,
}

/// A positive, whole-unit document version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u32);

impl Version {
    /// The version every brand-new logical document starts at (`1.0`).
    pub const INITIAL: Version = Version(1);

    /// Builds a version from its whole-unit count.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::NotWholePositive`] for zero.
    pub fn from_units(units: u32) -> Result<Self, VersionError> {
        if units == 0 {
            return Err(VersionError::NotWholePositive(units.to_string()));
        }
        Ok(Self(units))
    }

    /// Builds a version from its external decimal form.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::NotWholePositive`] for fractional, non-finite, zero, negative
    /// or out-of-range values.
    pub fn from_f64(value: f64) -> Result<Self, VersionError> {
        if !value.is_finite() || value.fract() != 0.0 || value < 1.0 || value > u32::MAX as f64 {
            return Err(VersionError::NotWholePositive(value.to_string()));
        }
        Ok(Self(value as u32))
    }

    /// Parses `"3"`, `"3.0"` or `" 3.0 "`.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        let whole = trimmed
            .strip_suffix(".0")
            .unwrap_or(trimmed)
            .parse::<u32>()
            .map_err(|_| VersionError::NotWholePositive(input.to_owned()))?;
        Self::from_units(whole).map_err(|_| VersionError::NotWholePositive(input.to_owned()))
    }

    /// Returns the version that follows this one.
    pub fn next(self) -> Result<Self, VersionError> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or(VersionError::Overflow)
    }

    /// Whole-unit count, as persisted.
    pub fn units(self) -> u32 {
        self.0
    }

    /// External decimal form.
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.0", self.0)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> serde::Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct VersionVisitor;

        impl serde::de::Visitor<'_> for VersionVisitor {
            type Value = Version;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a positive whole version number such as 1.0 or \"2.0\"")
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Version, E> {
                let units = u32::try_from(v)
                    .map_err(|_| E::custom(VersionError::NotWholePositive(v.to_string())))?;
                Version::from_units(units).map_err(E::custom)
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Version, E> {
                let units = u32::try_from(v)
                    .map_err(|_| E::custom(VersionError::NotWholePositive(v.to_string())))?;
                Version::from_units(units).map_err(E::custom)
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Version, E> {
                Version::from_f64(v).map_err(E::custom)
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Version, E> {
                Version::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(VersionVisitor)
    }
}
