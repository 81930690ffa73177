//! Row-count checks and degenerate-row filtering across the derived collections.
//!
//! A row is degenerate when its path point has a Z of exactly `0.0`, which is how samples that
//! were never populated upstream show up after geodetic conversion. The comparison is exact, so a
//! point legitimately computed on the equatorial plane is dropped as well.

use crate::error::{ensure_same_len, Dataset, Error, Result};
use crate::geodetic::PathPoint;
use crate::gesture::GestureRecord;
use crate::orientation::AxisTriad;
use log::debug;

/// Path points, axis triads, and gestures that are guaranteed to be row-aligned and free of
/// degenerate rows.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedBatches {
    path_points: Vec<PathPoint>,
    axis_triads: Vec<AxisTriad>,
    gestures: Vec<GestureRecord>,
}

impl AlignedBatches {
    #[must_use]
    pub fn path_points(&self) -> &[PathPoint] {
        &self.path_points
    }

    #[must_use]
    pub fn axis_triads(&self) -> &[AxisTriad] {
        &self.axis_triads
    }

    #[must_use]
    pub fn gestures(&self) -> &[GestureRecord] {
        &self.gestures
    }

    /// Number of rows, which is the same for all three collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.path_points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path_points.is_empty()
    }

    /// Iterates over the rows as `(path point, axis triad, gesture)`.
    pub fn rows(&self) -> impl Iterator<Item = (&PathPoint, &AxisTriad, &GestureRecord)> {
        self.path_points
            .iter()
            .zip(&self.axis_triads)
            .zip(&self.gestures)
            .map(|((p, a), g)| (p, a, g))
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<PathPoint>, Vec<AxisTriad>, Vec<GestureRecord>) {
        (self.path_points, self.axis_triads, self.gestures)
    }
}

/// Checks that the three collections have the same number of rows, and returns that number.
pub fn check_lengths(
    path_points: &[PathPoint],
    axis_triads: &[AxisTriad],
    gestures: &[GestureRecord],
) -> Result<usize> {
    ensure_same_len(
        Dataset::PathPoints,
        path_points.len(),
        Dataset::AxisTriads,
        axis_triads.len(),
    )?;
    ensure_same_len(
        Dataset::PathPoints,
        path_points.len(),
        Dataset::Gestures,
        gestures.len(),
    )?;
    Ok(path_points.len())
}

/// Drops degenerate rows from all three collections in lockstep, keeping the relative order of
/// the rest.
///
/// Fails with [`Error::Alignment`] if the collections differ in length, and with
/// [`Error::EmptyResult`] if no row survives filtering.
pub fn align(
    path_points: &[PathPoint],
    axis_triads: &[AxisTriad],
    gestures: &[GestureRecord],
) -> Result<AlignedBatches> {
    let total = check_lengths(path_points, axis_triads, gestures)?;

    let mut aligned = AlignedBatches {
        path_points: Vec::with_capacity(total),
        axis_triads: Vec::with_capacity(total),
        gestures: Vec::with_capacity(total),
    };
    for ((point, triad), gesture) in path_points.iter().zip(axis_triads).zip(gestures) {
        if point.is_degenerate() {
            continue;
        }
        aligned.path_points.push(*point);
        aligned.axis_triads.push(*triad);
        aligned.gestures.push(*gesture);
    }

    log_dropped(total, aligned.len());
    if aligned.is_empty() {
        return Err(Error::EmptyResult { total });
    }
    Ok(aligned)
}

/// Drops degenerate path points.
pub fn filter_path_points(path_points: &[PathPoint]) -> Result<Vec<PathPoint>> {
    retain_non_degenerate(path_points, |p| p)
}

/// Drops gestures whose origin is degenerate.
pub fn filter_gestures(gestures: &[GestureRecord]) -> Result<Vec<GestureRecord>> {
    retain_non_degenerate(gestures, |g| g.origin())
}

fn retain_non_degenerate<T: Copy>(items: &[T], origin: impl Fn(T) -> PathPoint) -> Result<Vec<T>> {
    let kept: Vec<T> = items
        .iter()
        .copied()
        .filter(|item| !origin(*item).is_degenerate())
        .collect();
    log_dropped(items.len(), kept.len());
    if kept.is_empty() {
        return Err(Error::EmptyResult { total: items.len() });
    }
    Ok(kept)
}

fn log_dropped(total: usize, kept: usize) {
    if kept < total {
        debug!("dropped {} of {total} rows with z == 0", total - kept);
    }
}
