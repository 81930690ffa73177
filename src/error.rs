use std::fmt;

/// The collection an [`Error`] was raised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// The geodetic position table (latitude, longitude, altitude).
    Position,
    /// The orientation table (yaw, pitch, roll).
    Orientation,
    /// Earth-fixed path points derived from [`Dataset::Position`].
    PathPoints,
    /// Body-axis triads derived from [`Dataset::Orientation`].
    AxisTriads,
    /// Gesture geometry composed from path points and axis triads.
    Gestures,
    /// The merged per-sample records.
    CombinedRecords,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dataset::Position => "position",
            Dataset::Orientation => "orientation",
            Dataset::PathPoints => "path points",
            Dataset::AxisTriads => "axis triads",
            Dataset::Gestures => "gestures",
            Dataset::CombinedRecords => "combined records",
        })
    }
}

/// Errors raised while reading samples or deriving path and gesture geometry.
///
/// All of these are raised at the point of detection. Transformations are pure, so none of them
/// can succeed on retry without changed input.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input does not have the expected shape or header.
    #[error("malformed {dataset} input: {reason}")]
    MalformedInput {
        /// Which table or batch was malformed.
        dataset: Dataset,
        /// What was wrong with it.
        reason: String,
    },

    /// A table or batch has no rows at all.
    #[error("{dataset} input has no data rows")]
    EmptyInput {
        /// Which table or batch was empty.
        dataset: Dataset,
    },

    /// Two collections that must be row-aligned have different lengths.
    #[error("row count mismatch: {left} ({left_len}) != {right} ({right_len})")]
    Alignment {
        /// Label for the left-hand collection.
        left: Dataset,
        /// Length of the left-hand collection.
        left_len: usize,
        /// Label for the right-hand collection.
        right: Dataset,
        /// Length of the right-hand collection.
        right_len: usize,
    },

    /// Every row was dropped as degenerate (path point with `z == 0`).
    #[error("all {total} rows were filtered out as degenerate (z == 0)")]
    EmptyResult {
        /// How many rows there were before filtering.
        total: usize,
    },

    /// The gesture scale factor was not a positive, finite number.
    #[error("gesture scale must be a positive finite number, got {0}")]
    InvalidScale(f64),

    /// The reference ellipsoid needs a positive, finite equatorial radius and `0 <= e² < 1`.
    #[error("invalid ellipsoid: equatorial radius {semi_major_axis} m, e² {eccentricity_sq}")]
    InvalidEllipsoid {
        /// Equatorial radius in meters.
        semi_major_axis: f64,
        /// Squared eccentricity.
        eccentricity_sq: f64,
    },

    /// Reading or writing a table failed.
    #[error("error reading or writing {dataset} table")]
    Io {
        /// Which table was being read or written.
        dataset: Dataset,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn malformed(dataset: Dataset, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            dataset,
            reason: reason.into(),
        }
    }

    pub(crate) fn from_csv(dataset: Dataset, err: csv::Error) -> Self {
        let reason = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) => Self::Io { dataset, source },
            _ => Self::MalformedInput { dataset, reason },
        }
    }
}

/// Checks that two row-aligned collections have the same number of rows.
pub(crate) fn ensure_same_len(
    left: Dataset,
    left_len: usize,
    right: Dataset,
    right_len: usize,
) -> Result<()> {
    if left_len != right_len {
        return Err(Error::Alignment {
            left,
            left_len,
            right,
            right_len,
        });
    }
    Ok(())
}

/// Shorthand for results whose error is this crate's [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
