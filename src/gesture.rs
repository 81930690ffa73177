//! Gesture geometry: a path point plus the tips of its three (scaled) body axes.

use crate::error::{ensure_same_len, Dataset, Error, Result};
use crate::geodetic::PathPoint;
use crate::orientation::AxisTriad;
use log::debug;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};
#[cfg(any(test, feature = "approx"))]
use uom::si::f64::Length;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The four points that draw an orientation indicator at one path sample.
///
/// The tips are `origin + axis · scale` for the X, Y, and Z body axes respectively.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GestureRecord {
    origin: PathPoint,
    x_tip: PathPoint,
    y_tip: PathPoint,
    z_tip: PathPoint,
}

impl GestureRecord {
    #[must_use]
    pub fn origin(&self) -> PathPoint {
        self.origin
    }

    #[must_use]
    pub fn x_tip(&self) -> PathPoint {
        self.x_tip
    }

    #[must_use]
    pub fn y_tip(&self) -> PathPoint {
        self.y_tip
    }

    #[must_use]
    pub fn z_tip(&self) -> PathPoint {
        self.z_tip
    }

    /// The X, Y, and Z tips in that order.
    #[must_use]
    pub fn tips(&self) -> [PathPoint; 3] {
        [self.x_tip, self.y_tip, self.z_tip]
    }

    /// Origin followed by the three tips, 12 values in meters.
    #[must_use]
    pub fn to_array(&self) -> [f64; 12] {
        let mut out = [0.; 12];
        let points = [self.origin, self.x_tip, self.y_tip, self.z_tip];
        for (chunk, point) in out.chunks_exact_mut(3).zip(points) {
            chunk.copy_from_slice(&point.to_array());
        }
        out
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for GestureRecord {
    type Epsilon = Length;

    fn default_epsilon() -> Self::Epsilon {
        PathPoint::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.origin.abs_diff_eq(&other.origin, epsilon)
            && self
                .tips()
                .iter()
                .zip(other.tips())
                .all(|(a, b)| a.abs_diff_eq(&b, epsilon))
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for GestureRecord {
    fn default_max_relative() -> Self::Epsilon {
        PathPoint::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.origin.relative_eq(&other.origin, epsilon, max_relative)
            && self
                .tips()
                .iter()
                .zip(other.tips())
                .all(|(a, b)| a.relative_eq(&b, epsilon, max_relative))
    }
}

/// Places scaled body axes onto path points.
///
/// The scale only sets how long the drawn axis indicators are. It has no physical meaning, and
/// the stored [`AxisTriad`]s are never modified by it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureComposer {
    scale: f64,
}

impl GestureComposer {
    /// Fails with [`Error::InvalidScale`] unless `scale` is positive and finite.
    pub fn new(scale: f64) -> Result<Self> {
        if !(scale.is_finite() && scale > 0.) {
            return Err(Error::InvalidScale(scale));
        }
        Ok(Self { scale })
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Composes the gesture for a single row.
    #[must_use]
    pub fn compose_one(&self, origin: PathPoint, triad: &AxisTriad) -> GestureRecord {
        let [x, y, z] = triad.axes().map(|axis| origin + axis * self.scale);
        GestureRecord {
            origin,
            x_tip: x,
            y_tip: y,
            z_tip: z,
        }
    }

    /// Composes one gesture per row of the row-aligned `path_points` and `axis_triads`.
    ///
    /// Nothing is computed if either batch is empty or their lengths differ.
    pub fn compose(
        &self,
        path_points: &[PathPoint],
        axis_triads: &[AxisTriad],
    ) -> Result<Vec<GestureRecord>> {
        if path_points.is_empty() {
            return Err(Error::EmptyInput {
                dataset: Dataset::PathPoints,
            });
        }
        if axis_triads.is_empty() {
            return Err(Error::EmptyInput {
                dataset: Dataset::AxisTriads,
            });
        }
        ensure_same_len(
            Dataset::PathPoints,
            path_points.len(),
            Dataset::AxisTriads,
            axis_triads.len(),
        )?;

        debug!(
            "composing {} gestures at scale {}",
            path_points.len(),
            self.scale
        );
        Ok(path_points
            .iter()
            .zip(axis_triads)
            .map(|(origin, triad)| self.compose_one(*origin, triad))
            .collect())
    }
}
