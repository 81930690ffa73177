//! Owns one pair of input tables and everything derived from them.

use crate::align::{filter_gestures, filter_path_points};
use crate::config::GestureConfig;
use crate::error::{ensure_same_len, Dataset, Error, Result};
use crate::geodetic::{Ellipsoid, GeodeticSample, PathPoint};
use crate::gesture::{GestureComposer, GestureRecord};
use crate::orientation::{axis_triads, AxisTriad, OrientationSample};
use crate::record::{combine, CombinedRecord};
use log::{debug, warn};

/// Path and gesture geometry for one recording.
///
/// The input samples are fixed at construction. Path points and axis triads are computed
/// eagerly; gestures are composed on request with [`GesturePath::compose_gestures`]. Accessors
/// return filtered copies and never modify what is stored.
#[derive(Debug, Clone)]
pub struct GesturePath {
    positions: Vec<GeodeticSample>,
    orientations: Vec<OrientationSample>,
    ellipsoid: Ellipsoid,
    path_points: Vec<PathPoint>,
    axis_triads: Vec<AxisTriad>,
    gestures: Vec<GestureRecord>,
}

impl GesturePath {
    /// Converts `positions` on the WGS84 ellipsoid and derives the axes of `orientations`.
    ///
    /// Fails with [`Error::EmptyInput`] if either table has no rows.
    pub fn new(
        positions: Vec<GeodeticSample>,
        orientations: Vec<OrientationSample>,
    ) -> Result<Self> {
        Self::with_ellipsoid(positions, orientations, Ellipsoid::WGS84)
    }

    /// Like [`GesturePath::new`] on another ellipsoid, which is checked first.
    pub fn with_ellipsoid(
        positions: Vec<GeodeticSample>,
        orientations: Vec<OrientationSample>,
        ellipsoid: Ellipsoid,
    ) -> Result<Self> {
        ellipsoid.validate()?;
        if positions.is_empty() {
            return Err(Error::EmptyInput {
                dataset: Dataset::Position,
            });
        }
        if orientations.is_empty() {
            return Err(Error::EmptyInput {
                dataset: Dataset::Orientation,
            });
        }

        let path_points = ellipsoid.to_path_points(&positions);
        let axis_triads = axis_triads(&orientations);
        Ok(Self {
            positions,
            orientations,
            ellipsoid,
            path_points,
            axis_triads,
            gestures: Vec::new(),
        })
    }

    /// Like [`GesturePath::with_ellipsoid`], then composes gestures at the configured scale.
    pub fn with_config(
        positions: Vec<GeodeticSample>,
        orientations: Vec<OrientationSample>,
        config: &GestureConfig,
    ) -> Result<Self> {
        let mut path = Self::with_ellipsoid(positions, orientations, config.ellipsoid)?;
        path.compose_gestures(config.scale)?;
        Ok(path)
    }

    /// (Re)composes the gestures with axes `scale` meters long.
    ///
    /// If this fails, previously composed gestures are kept as they were.
    pub fn compose_gestures(&mut self, scale: f64) -> Result<&[GestureRecord]> {
        let gestures = self.try_compose(scale).inspect_err(|e| {
            warn!("not composing gestures: {e}");
        })?;
        self.gestures = gestures;
        Ok(&self.gestures)
    }

    fn try_compose(&self, scale: f64) -> Result<Vec<GestureRecord>> {
        let composer = GestureComposer::new(scale)?;
        ensure_same_len(
            Dataset::Position,
            self.positions.len(),
            Dataset::Orientation,
            self.orientations.len(),
        )?;
        composer.compose(&self.path_points, &self.axis_triads)
    }

    #[must_use]
    pub fn positions(&self) -> &[GeodeticSample] {
        &self.positions
    }

    #[must_use]
    pub fn orientations(&self) -> &[OrientationSample] {
        &self.orientations
    }

    #[must_use]
    pub fn ellipsoid(&self) -> Ellipsoid {
        self.ellipsoid
    }

    /// Every path point, including degenerate ones.
    #[must_use]
    pub fn raw_path_points(&self) -> &[PathPoint] {
        &self.path_points
    }

    /// Every axis triad, one per orientation sample.
    #[must_use]
    pub fn axis_triads(&self) -> &[AxisTriad] {
        &self.axis_triads
    }

    /// Every composed gesture, including degenerate ones. Empty until gestures are composed.
    #[must_use]
    pub fn raw_gestures(&self) -> &[GestureRecord] {
        &self.gestures
    }

    /// Path points with degenerate rows removed.
    pub fn path_points(&self) -> Result<Vec<PathPoint>> {
        filter_path_points(&self.path_points)
    }

    /// Gestures with degenerate rows removed.
    ///
    /// Fails with [`Error::EmptyInput`] if no gestures have been composed yet.
    pub fn gestures(&self) -> Result<Vec<GestureRecord>> {
        if self.gestures.is_empty() {
            return Err(Error::EmptyInput {
                dataset: Dataset::Gestures,
            });
        }
        filter_gestures(&self.gestures)
    }

    /// Merges path points, axes, and gesture tips per row; see [`crate::combine`].
    pub fn combined_records(&self) -> Result<Vec<CombinedRecord>> {
        let records = combine(&self.path_points, &self.axis_triads, &self.gestures)?;
        debug!(
            "combined {} of {} rows",
            records.len(),
            self.path_points.len()
        );
        Ok(records)
    }
}
