//! Easing curves used to perturb chase velocity
//!
//! Curves take the Penner signature `(t, b, c, d)`: elapsed time, start value,
//! change in value and duration. The chaser always calls them as
//! `(closeness, 0, 1, 1)`.

use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use crate::config::EasingType;

/// Penner style easing function
pub type EaseFn = dyn Fn(f64, f64, f64, f64) -> f64 + Send + Sync;

/// Easing applied by a chaser, either a named curve or a user closure
#[derive(Clone)]
pub enum Ease {
    Named(EasingType),
    Custom(Arc<EaseFn>),
}

impl Ease {
    /// Wrap a closure as a custom easing curve
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64, f64, f64, f64) -> f64 + Send + Sync + 'static,
    {
        Ease::Custom(Arc::new(f))
    }

    /// Evaluate the curve with the full Penner signature
    pub fn call(&self, t: f64, b: f64, c: f64, d: f64) -> f64 {
        match self {
            Ease::Named(kind) => kind.call(t, b, c, d),
            Ease::Custom(f) => f(t, b, c, d),
        }
    }

    /// Evaluate the curve on the unit interval
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        self.call(t, 0.0, 1.0, 1.0)
    }

    pub fn named(&self) -> Option<EasingType> {
        match self {
            Ease::Named(kind) => Some(*kind),
            Ease::Custom(_) => None,
        }
    }
}

impl From<EasingType> for Ease {
    fn from(kind: EasingType) -> Self {
        Ease::Named(kind)
    }
}

impl fmt::Debug for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ease::Named(kind) => write!(f, "Named({})", kind),
            Ease::Custom(_) => write!(f, "Custom"),
        }
    }
}

impl Serialize for Ease {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Ease::Named(kind) => kind.serialize(serializer),
            Ease::Custom(_) => Err(serde::ser::Error::custom(
                "custom easing functions cannot be serialized",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Ease {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        EasingType::deserialize(deserializer).map(Ease::Named)
    }
}

impl EasingType {
    pub fn call(&self, t: f64, b: f64, c: f64, d: f64) -> f64 {
        match self {
            EasingType::Linear => c * t / d + b,
            EasingType::InQuad => {
                let t = t / d;
                c * t * t + b
            }
            EasingType::OutQuad => {
                let t = t / d;
                -c * t * (t - 2.0) + b
            }
            EasingType::InOutQuad => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * t * t + b
                } else {
                    let t = t - 1.0;
                    -c / 2.0 * (t * (t - 2.0) - 1.0) + b
                }
            }
            EasingType::InCubic => {
                let t = t / d;
                c * t * t * t + b
            }
            EasingType::OutCubic => {
                let t = t / d - 1.0;
                c * (t * t * t + 1.0) + b
            }
            EasingType::InOutCubic => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    c / 2.0 * t * t * t + b
                } else {
                    let t = t - 2.0;
                    c / 2.0 * (t * t * t + 2.0) + b
                }
            }
            EasingType::InCirc => {
                let t = t / d;
                -c * ((1.0 - t * t).sqrt() - 1.0) + b
            }
            EasingType::OutCirc => {
                let t = t / d - 1.0;
                c * (1.0 - t * t).sqrt() + b
            }
            EasingType::InOutCirc => {
                let t = t / (d / 2.0);
                if t < 1.0 {
                    -c / 2.0 * ((1.0 - t * t).sqrt() - 1.0) + b
                } else {
                    let t = t - 2.0;
                    c / 2.0 * ((1.0 - t * t).sqrt() + 1.0) + b
                }
            }
            EasingType::OutExpo => {
                if t == d {
                    b + c
                } else {
                    c * (1.0 - 2.0_f64.powf(-10.0 * t / d)) + b
                }
            }
            EasingType::InSine => -c * (t / d * FRAC_PI_2).cos() + c + b,
            EasingType::OutSine => c * (t / d * FRAC_PI_2).sin() + b,
        }
    }
}
