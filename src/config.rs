use crate::error::Result;
use crate::geodetic::Ellipsoid;
use crate::gesture::GestureComposer;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters for turning samples into path and gesture geometry.
///
/// The core never reads this from disk; outer tools can deserialize it from whatever format they
/// use, and any omitted field takes its [`Default`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GestureConfig {
    /// Length, in meters, of the drawn axis indicators.
    pub scale: f64,
    /// Reference ellipsoid for geodetic conversion.
    pub ellipsoid: Ellipsoid,
}

impl GestureConfig {
    /// Default length of the drawn axis indicators.
    pub const DEFAULT_SCALE: f64 = 10.;

    /// Builds the composer this configuration describes.
    pub fn composer(&self) -> Result<GestureComposer> {
        GestureComposer::new(self.scale)
    }

    /// Fails with [`crate::Error::InvalidScale`] if the scale could never compose a gesture, and
    /// with [`crate::Error::InvalidEllipsoid`] if the ellipsoid could never convert a position.
    pub fn validate(&self) -> Result<()> {
        self.ellipsoid.validate()?;
        self.composer().map(|_| ())
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            scale: Self::DEFAULT_SCALE,
            ellipsoid: Ellipsoid::WGS84,
        }
    }
}
