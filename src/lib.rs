//! This library turns a recorded trajectory into geometry you can draw: where a device was, and
//! which way it was facing while it was there.
//!
//! The inputs are two row-aligned tables of samples. [`GeodeticSample`]s hold latitude, longitude,
//! and altitude on a reference [`Ellipsoid`]; [`OrientationSample`]s hold yaw, pitch, and roll.
//! From those the library derives
//!
//! - a [`PathPoint`] per position, in Earth-centered Earth-fixed (ECEF) meters;
//! - an [`AxisTriad`] per orientation, the three unit body axes of the device;
//! - a [`GestureRecord`] per row, the path point plus the tips of its body axes scaled to a
//!   drawable length;
//! - a [`CombinedRecord`] per row merging all of the above into 21 numbers for export.
//!
//! Rows whose path point has a Z of exactly zero are treated as missing samples and dropped from
//! every derived collection together (see [`align()`]).
//!
//! The functions that do each step are available on their own ([`to_path_points`],
//! [`axis_triads`], [`GestureComposer`], [`combine`]), and [`GesturePath`] ties them together
//! for one recording. The [`ingest`] module reads the sample tables from CSV and writes results
//! back out.
//!
//! # Examples
//!
//! ```
//! use gesture_path::{GestureConfig, GesturePath, ingest};
//!
//! let positions = ingest::read_positions(
//!     "pos_lat (deg),pos_lon (deg),pos_alt (m)\n\
//!      35.3606,138.7274,3776\n\
//!      35.3610,138.7280,3770\n"
//!         .as_bytes(),
//! )?;
//! let orientations = ingest::read_orientations(
//!     "Yaw (deg),Pitch (deg),Roll (deg)\n\
//!      0,0,0\n\
//!      90,10,0\n"
//!         .as_bytes(),
//! )?;
//!
//! let path = GesturePath::with_config(positions, orientations, &GestureConfig::default())?;
//! let records = path.combined_records()?;
//! assert_eq!(records.len(), 2);
//!
//! // the first sample faces along the reference axes, so its X tip is 10 m along ECEF X
//! let [x_tip, _, _] = records[0].tips();
//! let offset = x_tip - records[0].path_point();
//! assert!((offset.x - 10.).abs() < 1e-6);
//!
//! let mut csv = Vec::new();
//! ingest::write_combined_records(&mut csv, &records)?;
//! # Ok::<(), gesture_path::Error>(())
//! ```

mod align;
mod config;
mod error;
mod geodetic;
mod gesture;
mod orientation;
mod pipeline;
mod record;

pub mod ingest;

pub type Point3 = nalgebra::Point3<f64>;
pub type Vector3 = nalgebra::Vector3<f64>;
pub type Matrix3 = nalgebra::Matrix3<f64>;

pub use align::{align, check_lengths, filter_gestures, filter_path_points, AlignedBatches};
pub use config::GestureConfig;
pub use error::{Dataset, Error, Result};
pub use geodetic::{to_path_points, Ellipsoid, GeodeticSample, PathPoint};
pub use gesture::{GestureComposer, GestureRecord};
pub use orientation::{
    axis_triads, AxisTriad, Complete, NeedsPitch, NeedsRoll, NeedsYaw, OrientationSample,
    TaitBryanBuilder,
};
pub use pipeline::GesturePath;
pub use record::{combine, CombinedRecord};
