//! Scaling functions applied to aggregate values before color mapping.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Result, ShadeError};

/// Elementwise transform applied before span normalization.
///
/// `Custom` carries an arbitrary function. It should be monotonic
/// non-decreasing for a sensible result; this is not checked.
#[derive(Clone, Default)]
pub enum Scaling {
    Linear,
    /// `ln(1 + x)`.
    Log,
    /// Real cube root, defined for negative inputs.
    #[default]
    Cbrt,
    Custom(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl Scaling {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Scaling::Custom(Arc::new(f))
    }

    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Scaling::Linear => x,
            Scaling::Log => x.ln_1p(),
            Scaling::Cbrt => x.cbrt(),
            Scaling::Custom(f) => f(x),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scaling::Linear => "linear",
            Scaling::Log => "log",
            Scaling::Cbrt => "cbrt",
            Scaling::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Scaling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Scaling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scaling {
    type Err = ShadeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(Scaling::Linear),
            "log" => Ok(Scaling::Log),
            "cbrt" => Ok(Scaling::Cbrt),
            _ => Err(ShadeError::InvalidScaling(s.to_owned())),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Scaling {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Scaling::Custom(_) => Err(serde::ser::Error::custom(
                "custom scaling functions cannot be serialized",
            )),
            named => serializer.serialize_str(named.name()),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Scaling {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
