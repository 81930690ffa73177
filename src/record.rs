//! The merged per-sample record handed to visualization and export.

use crate::align::align;
use crate::error::{Dataset, Error, Result};
use crate::geodetic::PathPoint;
use crate::gesture::GestureRecord;
use crate::orientation::AxisTriad;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One row of output: the path point, its unit body axes, and the three scaled axis tips.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CombinedRecord {
    path_point: PathPoint,
    axes: AxisTriad,
    tips: [PathPoint; 3],
}

impl CombinedRecord {
    /// Number of scalar fields in [`CombinedRecord::to_array`].
    pub const FIELD_COUNT: usize = 21;

    /// Names of the fields of [`CombinedRecord::to_array`], in order.
    pub const COLUMNS: [&'static str; Self::FIELD_COUNT] = [
        "x",
        "y",
        "z",
        "unit_xaxis_x",
        "unit_xaxis_y",
        "unit_xaxis_z",
        "unit_yaxis_x",
        "unit_yaxis_y",
        "unit_yaxis_z",
        "unit_zaxis_x",
        "unit_zaxis_y",
        "unit_zaxis_z",
        "pos_xaxis_x",
        "pos_xaxis_y",
        "pos_xaxis_z",
        "pos_yaxis_x",
        "pos_yaxis_y",
        "pos_yaxis_z",
        "pos_zaxis_x",
        "pos_zaxis_y",
        "pos_zaxis_z",
    ];

    /// Combines the pieces of one row.
    ///
    /// Returns `None` if `gesture` is not anchored at `path_point`.
    #[must_use]
    pub fn new(path_point: PathPoint, axes: AxisTriad, gesture: &GestureRecord) -> Option<Self> {
        // bitwise, so a non-finite point still matches itself
        let bits = |p: PathPoint| p.to_array().map(f64::to_bits);
        if bits(gesture.origin()) != bits(path_point) {
            return None;
        }
        Some(Self {
            path_point,
            axes,
            tips: gesture.tips(),
        })
    }

    #[must_use]
    pub fn path_point(&self) -> PathPoint {
        self.path_point
    }

    #[must_use]
    pub fn axes(&self) -> AxisTriad {
        self.axes
    }

    /// The X, Y, and Z axis tips, as absolute Earth-fixed points.
    #[must_use]
    pub fn tips(&self) -> [PathPoint; 3] {
        self.tips
    }

    /// Flattens the record in [`CombinedRecord::COLUMNS`] order.
    #[must_use]
    pub fn to_array(&self) -> [f64; Self::FIELD_COUNT] {
        let mut out = [0.; Self::FIELD_COUNT];
        out[..3].copy_from_slice(&self.path_point.to_array());
        out[3..12].copy_from_slice(&self.axes.to_array());
        for (chunk, tip) in out[12..].chunks_exact_mut(3).zip(self.tips) {
            chunk.copy_from_slice(&tip.to_array());
        }
        out
    }
}

/// Merges row-aligned path points, axis triads, and gestures into [`CombinedRecord`]s.
///
/// Degenerate rows are filtered first (see [`crate::align`]). Fails with
/// [`Error::EmptyInput`] if any collection is empty, with [`Error::Alignment`] if their lengths
/// differ, and with [`Error::EmptyResult`] if every row is degenerate. No record is produced
/// unless all rows can be.
pub fn combine(
    path_points: &[PathPoint],
    axis_triads: &[AxisTriad],
    gestures: &[GestureRecord],
) -> Result<Vec<CombinedRecord>> {
    for (dataset, len) in [
        (Dataset::PathPoints, path_points.len()),
        (Dataset::AxisTriads, axis_triads.len()),
        (Dataset::Gestures, gestures.len()),
    ] {
        if len == 0 {
            return Err(Error::EmptyInput { dataset });
        }
    }

    let aligned = align(path_points, axis_triads, gestures)?;

    aligned
        .rows()
        .enumerate()
        .map(|(i, (point, axes, gesture))| {
            CombinedRecord::new(*point, *axes, gesture).ok_or_else(|| {
                Error::malformed(
                    Dataset::CombinedRecords,
                    format!("gesture {i} is not anchored at its path point"),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{combine, CombinedRecord};
    use crate::error::{Dataset, Error};
    use crate::geodetic::{Ellipsoid, GeodeticSample, PathPoint};
    use crate::gesture::GestureComposer;
    use crate::orientation::{axis_triads, AxisTriad, OrientationSample};
    use approx::assert_abs_diff_eq;

    fn sample_rows() -> (Vec<PathPoint>, Vec<AxisTriad>, Vec<crate::GestureRecord>) {
        let positions = [
            GeodeticSample::from_degrees_and_meters(31.2, 121.5, 10.),
            GeodeticSample::from_degrees_and_meters(31.3, 121.6, 12.),
            GeodeticSample::from_degrees_and_meters(31.4, 121.7, 14.),
        ];
        let orientations = [
            OrientationSample::from_degrees(0., 0., 0.),
            OrientationSample::from_degrees(45., 10., -5.),
            OrientationSample::from_degrees(90., 0., 0.),
        ];
        let points = Ellipsoid::WGS84.to_path_points(&positions);
        let triads = axis_triads(&orientations);
        let gestures = GestureComposer::new(10.)
            .unwrap()
            .compose(&points, &triads)
            .unwrap();
        (points, triads, gestures)
    }

    #[test]
    fn merges_into_21_fields() {
        let (points, triads, gestures) = sample_rows();
        let records = combine(&points, &triads, &gestures).unwrap();
        assert_eq!(records.len(), 3);

        let row = records[1].to_array();
        assert_eq!(row.len(), CombinedRecord::FIELD_COUNT);
        assert_eq!(row[..3], points[1].to_array());
        assert_eq!(row[3..12], triads[1].to_array());
        assert_eq!(row[12..], gestures[1].to_array()[3..]);

        // the trailing nine are absolute tips: origin + 10 · axis
        for (k, axis) in triads[1].axes().iter().enumerate() {
            for c in 0..3 {
                assert_abs_diff_eq!(
                    row[12 + 3 * k + c],
                    row[c] + 10. * axis[c],
                    epsilon = 1e-6
                );
            }
        }
    }

    #[test]
    fn mismatched_lengths_fail_before_any_row() {
        let (points, triads, gestures) = sample_rows();
        let err = combine(&points, &triads[..2], &gestures).unwrap_err();
        assert!(matches!(
            err,
            Error::Alignment {
                left: Dataset::PathPoints,
                left_len: 3,
                right: Dataset::AxisTriads,
                right_len: 2,
            }
        ));
    }

    #[test]
    fn empty_collections_are_rejected() {
        let (points, triads, gestures) = sample_rows();
        assert!(matches!(
            combine(&points, &triads, &[]),
            Err(Error::EmptyInput {
                dataset: Dataset::Gestures
            })
        ));
        assert!(matches!(
            combine(&[], &triads, &gestures),
            Err(Error::EmptyInput {
                dataset: Dataset::PathPoints
            })
        ));
    }

    #[test]
    fn degenerate_rows_are_dropped() {
        let (mut points, triads, _) = sample_rows();
        points[0] = PathPoint::new(0., 0., 0.);
        let gestures = GestureComposer::new(10.)
            .unwrap()
            .compose(&points, &triads)
            .unwrap();
        let records = combine(&points, &triads, &gestures).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].path_point(), points[1]);
        assert_eq!(records[1].axes(), triads[2]);
    }

    #[test]
    fn gestures_must_belong_to_their_path_point() {
        let (points, triads, gestures) = sample_rows();
        let mut shuffled = gestures.clone();
        shuffled.swap(0, 2);
        let err = combine(&points, &triads, &shuffled).unwrap_err();
        insta::assert_snapshot!(
            err,
            @"malformed combined records input: gesture 0 is not anchored at its path point"
        );
    }

    #[test]
    fn non_finite_points_still_anchor_their_gestures() {
        let (mut points, triads, _) = sample_rows();
        points[0] = PathPoint::new(f64::NAN, 1., 2.);
        let gestures = GestureComposer::new(10.)
            .unwrap()
            .compose(&points, &triads)
            .unwrap();
        let records = combine(&points, &triads, &gestures).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].to_array()[0].is_nan());
        assert_eq!(records[1].path_point(), points[1]);
    }

    #[test]
    fn record_serde() {
        let (points, triads, gestures) = sample_rows();
        let record = CombinedRecord::new(points[2], triads[2], &gestures[2]).unwrap();
        let ser = serde_yaml::to_string(&record).unwrap();
        let de = serde_yaml::from_str::<CombinedRecord>(&ser).unwrap();
        assert_eq!(record, de);
    }
}
