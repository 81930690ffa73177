//! Yaw/pitch/roll samples and the body-axis triads they induce.
//!
//! An [`OrientationSample`] holds [intrinsic] [Tait-Bryan angles][tb]. Its rotation matrix is
//! composed as `R = Rz(yaw) · Ry(pitch) · Rx(roll)` from the standard right-handed elementary
//! rotations, and the columns of `R` are the body's X, Y, and Z axes expressed in the reference
//! frame (see [`AxisTriad`]).
//!
//! To determine the direction of rotation (ie, in which direction a positive angle goes), use
//! the [right-hand rule for rotations][rhrot]: point your thumb along the positive axis being
//! rotated about, and your fingers curl in the direction of positive rotation.
//!
//! [intrinsic]: https://dominicplein.medium.com/extrinsic-intrinsic-rotation-do-i-multiply-from-right-or-left-357c38c1abfd
//! [tb]: https://en.wikipedia.org/wiki/Euler_angles#Tait%E2%80%93Bryan_angles
//! [rhrot]: https://en.wikipedia.org/wiki/Right-hand_rule#Rotations

use crate::error::{Dataset, Error, Result};
use crate::{Matrix3, Vector3};
use std::fmt;
use std::fmt::Display;
use std::marker::PhantomData;
use uom::si::angle::{degree, radian};
use uom::si::f64::Angle;
use uom::ConstZero;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One orientation sample as yaw, pitch, and roll.
///
/// - yaw is rotation about the Z axis;
/// - pitch is rotation about the Y axis (after yaw); and
/// - roll is rotation about the X axis (after yaw and pitch).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrientationSample {
    yaw: Angle,
    pitch: Angle,
    roll: Angle,
}

impl OrientationSample {
    /// Provides a type-safe builder for a sample, taking angles in yaw → pitch → roll order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gesture_path::OrientationSample;
    /// use uom::si::{f64::Angle, angle::degree};
    ///
    /// let sample = OrientationSample::tait_bryan_builder()
    ///     .yaw(Angle::new::<degree>(90.0))
    ///     .pitch(Angle::new::<degree>(45.0))
    ///     .roll(Angle::new::<degree>(5.0))
    ///     .build();
    /// ```
    ///
    /// Setting the angles out of order does not compile:
    ///
    /// ```compile_fail
    /// # use gesture_path::OrientationSample;
    /// # use uom::si::{f64::Angle, angle::degree};
    /// let sample = OrientationSample::tait_bryan_builder()
    ///     .yaw(Angle::new::<degree>(90.0))
    ///     .roll(Angle::new::<degree>(5.0))
    ///     .pitch(Angle::new::<degree>(45.0))
    ///     .build();
    /// ```
    pub fn tait_bryan_builder() -> TaitBryanBuilder<NeedsYaw> {
        TaitBryanBuilder::new()
    }

    /// Constructs a sample from yaw, pitch, and roll in degrees.
    #[doc(alias = "from_ypr")]
    pub fn from_degrees(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self::tait_bryan_builder()
            .yaw(Angle::new::<degree>(yaw))
            .pitch(Angle::new::<degree>(pitch))
            .roll(Angle::new::<degree>(roll))
            .build()
    }

    /// The sample that leaves the reference axes untouched.
    #[must_use]
    pub fn aligned() -> Self {
        Self::tait_bryan_builder()
            .yaw(Angle::ZERO)
            .pitch(Angle::ZERO)
            .roll(Angle::ZERO)
            .build()
    }

    /// Builds samples from raw `[yaw_deg, pitch_deg, roll_deg]` rows.
    ///
    /// Fails on the first row that does not have exactly three columns.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Vec<Self>> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                let row = row.as_ref();
                Self::try_from(row).map_err(|_| {
                    Error::malformed(
                        Dataset::Orientation,
                        format!("row {i}: expected 3 columns, got {}", row.len()),
                    )
                })
            })
            .collect()
    }

    #[must_use]
    pub fn yaw(&self) -> Angle {
        self.yaw
    }

    #[must_use]
    pub fn pitch(&self) -> Angle {
        self.pitch
    }

    #[must_use]
    pub fn roll(&self) -> Angle {
        self.roll
    }

    /// Returns `Rz(yaw) · Ry(pitch) · Rx(roll)`.
    ///
    /// The product is not re-orthonormalized; residual floating-point error is left as is.
    #[must_use]
    pub fn rotation_matrix(&self) -> Matrix3 {
        rotation_about_z(self.yaw) * rotation_about_y(self.pitch) * rotation_about_x(self.roll)
    }

    /// Returns the body axes of this orientation.
    #[must_use]
    pub fn axis_triad(&self) -> AxisTriad {
        AxisTriad::from_rotation_matrix(&self.rotation_matrix())
    }
}

impl Default for OrientationSample {
    fn default() -> Self {
        Self::aligned()
    }
}

impl TryFrom<&[f64]> for OrientationSample {
    type Error = Error;

    /// Interprets `[yaw, pitch, roll]` in degrees.
    fn try_from(row: &[f64]) -> Result<Self> {
        match *row {
            [yaw, pitch, roll] => Ok(Self::from_degrees(yaw, pitch, roll)),
            _ => Err(Error::malformed(
                Dataset::Orientation,
                format!("expected 3 columns, got {}", row.len()),
            )),
        }
    }
}

impl Display for OrientationSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "yaw {}°, pitch {}°, roll {}°",
            self.yaw.get::<degree>(),
            self.pitch.get::<degree>(),
            self.roll.get::<degree>()
        )
    }
}

pub(crate) fn rotation_about_x(angle: Angle) -> Matrix3 {
    let (s, c) = angle.get::<radian>().sin_cos();
    #[rustfmt::skip]
    let m = Matrix3::new(
        1., 0., 0.,
        0., c, -s,
        0., s, c,
    );
    m
}

pub(crate) fn rotation_about_y(angle: Angle) -> Matrix3 {
    let (s, c) = angle.get::<radian>().sin_cos();
    #[rustfmt::skip]
    let m = Matrix3::new(
        c, 0., s,
        0., 1., 0.,
        -s, 0., c,
    );
    m
}

pub(crate) fn rotation_about_z(angle: Angle) -> Matrix3 {
    let (s, c) = angle.get::<radian>().sin_cos();
    #[rustfmt::skip]
    let m = Matrix3::new(
        c, -s, 0.,
        s, c, 0.,
        0., 0., 1.,
    );
    m
}

/// Computes the axis triad of every sample, row by row.
#[must_use]
pub fn axis_triads(samples: &[OrientationSample]) -> Vec<AxisTriad> {
    samples.iter().map(OrientationSample::axis_triad).collect()
}

/// The three body axes of an orientation, as unit vectors in the reference frame.
///
/// These are the columns of the orientation's rotation matrix. They are orthonormal up to
/// floating-point error and are never rescaled; gesture tips scale a copy.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisTriad {
    x_axis: Vector3,
    y_axis: Vector3,
    z_axis: Vector3,
}

impl AxisTriad {
    /// The canonical basis.
    #[must_use]
    pub fn canonical() -> Self {
        Self::from_rotation_matrix(&Matrix3::identity())
    }

    /// Takes the columns of `rotation` as the X, Y, and Z axes.
    #[must_use]
    pub fn from_rotation_matrix(rotation: &Matrix3) -> Self {
        Self {
            x_axis: rotation.column(0).into_owned(),
            y_axis: rotation.column(1).into_owned(),
            z_axis: rotation.column(2).into_owned(),
        }
    }

    #[must_use]
    pub fn x_axis(&self) -> Vector3 {
        self.x_axis
    }

    #[must_use]
    pub fn y_axis(&self) -> Vector3 {
        self.y_axis
    }

    #[must_use]
    pub fn z_axis(&self) -> Vector3 {
        self.z_axis
    }

    /// The X, Y, and Z axes in that order.
    #[must_use]
    pub fn axes(&self) -> [Vector3; 3] {
        [self.x_axis, self.y_axis, self.z_axis]
    }

    /// Reassembles the rotation matrix with the axes as columns.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix3 {
        Matrix3::from_columns(&self.axes())
    }

    /// `[x.x, x.y, x.z, y.x, y.y, y.z, z.x, z.y, z.z]`
    #[must_use]
    pub fn to_array(&self) -> [f64; 9] {
        let mut out = [0.; 9];
        for (chunk, axis) in out.chunks_exact_mut(3).zip(self.axes()) {
            chunk.copy_from_slice(axis.as_slice());
        }
        out
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for AxisTriad {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        1e-9
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.to_matrix().abs_diff_eq(&other.to_matrix(), epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for AxisTriad {
    fn default_max_relative() -> Self::Epsilon {
        Matrix3::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.to_matrix()
            .relative_eq(&other.to_matrix(), epsilon, max_relative)
    }
}

/// State marker indicating the yaw angle is needed next.
pub struct NeedsYaw;

/// State marker indicating the pitch angle is needed next.
pub struct NeedsPitch;

/// State marker indicating the roll angle is needed next.
pub struct NeedsRoll;

/// State marker indicating all angles are set and ready to build.
pub struct Complete;

/// Builder for [`OrientationSample`] that enforces yaw → pitch → roll at compile time.
#[must_use]
pub struct TaitBryanBuilder<State> {
    yaw: Angle,
    pitch: Angle,
    roll: Angle,
    _state: PhantomData<State>,
}

// manual impls of Clone and Copy to avoid requiring State: Copy + Clone
impl<State> Clone for TaitBryanBuilder<State> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<State> Copy for TaitBryanBuilder<State> {}

impl<State> fmt::Debug for TaitBryanBuilder<State> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaitBryanBuilder")
            .field("yaw", &self.yaw)
            .field("pitch", &self.pitch)
            .field("roll", &self.roll)
            .finish()
    }
}

impl<State> TaitBryanBuilder<State> {
    fn advance<Next>(self) -> TaitBryanBuilder<Next> {
        TaitBryanBuilder {
            yaw: self.yaw,
            pitch: self.pitch,
            roll: self.roll,
            _state: PhantomData,
        }
    }
}

impl TaitBryanBuilder<NeedsYaw> {
    fn new() -> Self {
        Self {
            yaw: Angle::ZERO,
            pitch: Angle::ZERO,
            roll: Angle::ZERO,
            _state: PhantomData,
        }
    }

    /// Sets the yaw angle (rotation about Z).
    pub fn yaw(mut self, angle: impl Into<Angle>) -> TaitBryanBuilder<NeedsPitch> {
        self.yaw = angle.into();
        self.advance()
    }
}

impl TaitBryanBuilder<NeedsPitch> {
    /// Sets the pitch angle (rotation about Y' after yaw is applied).
    pub fn pitch(mut self, angle: impl Into<Angle>) -> TaitBryanBuilder<NeedsRoll> {
        self.pitch = angle.into();
        self.advance()
    }
}

impl TaitBryanBuilder<NeedsRoll> {
    /// Sets the roll angle (rotation about X'' after yaw and pitch are applied).
    pub fn roll(mut self, angle: impl Into<Angle>) -> TaitBryanBuilder<Complete> {
        self.roll = angle.into();
        self.advance()
    }
}

impl TaitBryanBuilder<Complete> {
    #[must_use]
    pub fn build(self) -> OrientationSample {
        OrientationSample {
            yaw: self.yaw,
            pitch: self.pitch,
            roll: self.roll,
        }
    }
}
