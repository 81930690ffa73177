//! Geodetic (latitude, longitude, altitude) samples and their conversion to Earth-fixed
//! Cartesian path points.

use crate::error::{Dataset, Error, Result};
use crate::{Point3, Vector3};
use std::fmt;
use std::fmt::Display;
use std::ops::{Add, Sub};
use uom::si::f64::{Angle, Length};
use uom::si::{
    angle::{degree, radian},
    length::meter,
};

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// Parameters required for WGS84 ellipsoid
// https://nsgreg.nga.mil/doc/view?i=4085 table 3.1
#[doc(alias = "equatorial radius")]
#[doc(alias = "a")]
const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
#[doc(alias = "1/f")]
const FLATTENING_FACTOR: f64 = 298.257_223_563;
#[doc(alias = "f")]
const FLATTENING: f64 = 1.0 / FLATTENING_FACTOR;
#[doc(alias = "e^2")]
// e^2 = 1 - b^2/a^2 with b = a * (1 - f)
//     = 2 * f - f^2
const ECCENTRICITY_SQ: f64 = 2.0 * FLATTENING - FLATTENING * FLATTENING;

/// A reference ellipsoid used to turn geodetic samples into Earth-fixed (ECEF) coordinates.
///
/// Almost everyone wants [`Ellipsoid::WGS84`], which is also the [`Default`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// deserialized values go through the same checks as `Ellipsoid::new`
#[cfg_attr(
    feature = "serde",
    serde(try_from = "RawEllipsoid", into = "RawEllipsoid")
)]
pub struct Ellipsoid {
    /// Equatorial radius in meters.
    semi_major_axis: f64,
    eccentricity_sq: f64,
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct RawEllipsoid {
    semi_major_axis: f64,
    eccentricity_sq: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawEllipsoid> for Ellipsoid {
    type Error = Error;

    fn try_from(raw: RawEllipsoid) -> Result<Self> {
        Self::checked(raw.semi_major_axis, raw.eccentricity_sq)
    }
}

#[cfg(feature = "serde")]
impl From<Ellipsoid> for RawEllipsoid {
    fn from(ellipsoid: Ellipsoid) -> Self {
        Self {
            semi_major_axis: ellipsoid.semi_major_axis,
            eccentricity_sq: ellipsoid.eccentricity_sq,
        }
    }
}

impl Ellipsoid {
    /// The [World Geodetic System '84](https://en.wikipedia.org/wiki/World_Geodetic_System#WGS_84)
    /// reference ellipsoid.
    pub const WGS84: Self = Self {
        semi_major_axis: SEMI_MAJOR_AXIS,
        eccentricity_sq: ECCENTRICITY_SQ,
    };

    /// Constructs an ellipsoid from its equatorial radius and squared eccentricity.
    ///
    /// Returns `None` unless the radius is positive and finite and `0 <= e² < 1`.
    #[must_use]
    pub fn new(equatorial_radius: impl Into<Length>, eccentricity_sq: f64) -> Option<Self> {
        Self::checked(equatorial_radius.into().get::<meter>(), eccentricity_sq).ok()
    }

    fn checked(semi_major_axis: f64, eccentricity_sq: f64) -> Result<Self> {
        let ellipsoid = Self {
            semi_major_axis,
            eccentricity_sq,
        };
        ellipsoid.validate()?;
        Ok(ellipsoid)
    }

    /// Fails with [`Error::InvalidEllipsoid`] unless the radius is positive and finite and
    /// `0 <= e² < 1`.
    pub fn validate(&self) -> Result<()> {
        let radius_ok = self.semi_major_axis.is_finite() && self.semi_major_axis > 0.;
        if !radius_ok || !(0. ..1.).contains(&self.eccentricity_sq) {
            return Err(Error::InvalidEllipsoid {
                semi_major_axis: self.semi_major_axis,
                eccentricity_sq: self.eccentricity_sq,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn equatorial_radius(&self) -> Length {
        Length::new::<meter>(self.semi_major_axis)
    }

    #[must_use]
    pub fn eccentricity_sq(&self) -> f64 {
        self.eccentricity_sq
    }

    /// Radius of curvature in the prime vertical at the given latitude.
    ///
    /// See <https://en.wikipedia.org/wiki/Earth_radius#Prime_vertical>.
    #[must_use]
    pub fn prime_vertical_radius(&self, latitude: Angle) -> Length {
        let sin_lat = latitude.get::<radian>().sin();
        Length::new::<meter>(self.prime_vertical_radius_m(sin_lat))
    }

    fn prime_vertical_radius_m(&self, sin_lat: f64) -> f64 {
        self.semi_major_axis / (1.0 - self.eccentricity_sq * sin_lat * sin_lat).sqrt()
    }

    /// Converts one geodetic sample into the Earth-Centered, Earth-Fixed frame.
    ///
    /// No range checks are applied to latitude or longitude. Out-of-range values are processed
    /// as-is, which is almost certainly a caller error.
    ///
    /// See:
    /// <https://en.wikipedia.org/wiki/Geographic_coordinate_conversion#From_geodetic_to_ECEF_coordinates>
    #[must_use]
    pub fn to_path_point(&self, sample: &GeodeticSample) -> PathPoint {
        let lat = sample.latitude.get::<radian>();
        let lon = sample.longitude.get::<radian>();
        let alt = sample.altitude.get::<meter>();

        let sl = lat.sin();
        let cl = lat.cos();
        let r = self.prime_vertical_radius_m(sl);
        let rho = (r + alt) * cl;

        PathPoint::new(
            rho * lon.cos(),
            rho * lon.sin(),
            (r * (1.0 - self.eccentricity_sq) + alt) * sl,
        )
    }

    /// Converts a whole batch, preserving row order.
    #[must_use]
    pub fn to_path_points(&self, samples: &[GeodeticSample]) -> Vec<PathPoint> {
        samples.iter().map(|s| self.to_path_point(s)).collect()
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

/// Converts a batch of geodetic samples to ECEF path points on the WGS84 ellipsoid.
#[must_use]
pub fn to_path_points(samples: &[GeodeticSample]) -> Vec<PathPoint> {
    Ellipsoid::WGS84.to_path_points(samples)
}

/// One geodetic position sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeodeticSample {
    latitude: Angle,
    longitude: Angle,
    altitude: Length,
}

impl GeodeticSample {
    /// Constructs a sample from latitude, longitude, and altitude above the ellipsoid.
    ///
    /// Unlike most geodetic types, this does not reject latitudes outside [-90°, 90°]: samples
    /// are taken as recorded.
    pub fn new(
        latitude: impl Into<Angle>,
        longitude: impl Into<Angle>,
        altitude: impl Into<Length>,
    ) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
            altitude: altitude.into(),
        }
    }

    pub fn from_degrees_and_meters(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self::new(
            Angle::new::<degree>(latitude),
            Angle::new::<degree>(longitude),
            Length::new::<meter>(altitude),
        )
    }

    /// Builds samples from raw `[latitude_rad, longitude_rad, altitude_m]` rows.
    ///
    /// Fails on the first row that does not have exactly three columns.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Vec<Self>> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                Self::try_from(row.as_ref()).map_err(|e| match e {
                    Error::MalformedInput { dataset, reason } => {
                        Error::malformed(dataset, format!("row {i}: {reason}"))
                    }
                    other => other,
                })
            })
            .collect()
    }

    #[must_use]
    pub fn latitude(&self) -> Angle {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> Angle {
        self.longitude
    }

    #[must_use]
    pub fn altitude(&self) -> Length {
        self.altitude
    }
}

impl TryFrom<&[f64]> for GeodeticSample {
    type Error = Error;

    /// Interprets `[latitude, longitude, altitude]` in radians, radians, and meters.
    fn try_from(row: &[f64]) -> Result<Self> {
        match *row {
            [lat, lon, alt] => Ok(Self::new(
                Angle::new::<radian>(lat),
                Angle::new::<radian>(lon),
                Length::new::<meter>(alt),
            )),
            _ => Err(Error::malformed(
                Dataset::Position,
                format!("expected 3 columns, got {}", row.len()),
            )),
        }
    }
}

impl Display for GeodeticSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat = self.latitude.get::<degree>();
        let lon = self.longitude.get::<degree>();
        let alt = self.altitude.get::<meter>();
        let ns = if lat.is_sign_negative() { 'S' } else { 'N' };
        let ew = if lon.is_sign_negative() { 'W' } else { 'E' };
        write!(f, "{}°{ns}, {}°{ew}, {alt}m", lat.abs(), lon.abs())
    }
}

/// A point of the path in the Earth-Centered, Earth-Fixed frame, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// no need for the "point": indirection
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PathPoint {
    pub(crate) point: Point3,
}

impl PathPoint {
    /// Constructs a point from ECEF X, Y, and Z in meters.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            point: Point3::new(x, y, z),
        }
    }

    pub(crate) fn from_nalgebra_point(point: Point3) -> Self {
        Self { point }
    }

    #[must_use]
    pub fn x(&self) -> Length {
        Length::new::<meter>(self.point.x)
    }

    #[must_use]
    pub fn y(&self) -> Length {
        Length::new::<meter>(self.point.y)
    }

    #[must_use]
    pub fn z(&self) -> Length {
        Length::new::<meter>(self.point.z)
    }

    /// X, Y, and Z in meters.
    #[must_use]
    pub fn to_array(&self) -> [f64; 3] {
        [self.point.x, self.point.y, self.point.z]
    }

    /// Distance from the center of the ellipsoid.
    #[must_use]
    pub fn distance_from_center(&self) -> Length {
        Length::new::<meter>(self.point.coords.norm())
    }

    /// Whether this point is the "never populated" marker, ie has a Z of exactly zero.
    ///
    /// Note that a legitimately computed point on the equatorial plane also has `z == 0`.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.point.z == 0.
    }
}

impl Display for PathPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.point)
    }
}

impl Add<Vector3> for PathPoint {
    type Output = Self;

    fn add(self, rhs: Vector3) -> Self::Output {
        Self::from_nalgebra_point(self.point + rhs)
    }
}

impl Sub<Self> for PathPoint {
    type Output = Vector3;

    fn sub(self, rhs: Self) -> Self::Output {
        self.point - rhs.point
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for PathPoint {
    type Epsilon = Length;

    fn default_epsilon() -> Self::Epsilon {
        // micrometers; well below what any position source resolves
        Length::new::<meter>(1e-6)
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        // per-component, not the magnitude of the difference
        self.point.abs_diff_eq(&other.point, epsilon.get::<meter>())
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for PathPoint {
    fn default_max_relative() -> Self::Epsilon {
        Length::new::<meter>(Point3::default_max_relative())
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.point.relative_eq(
            &other.point,
            epsilon.get::<meter>(),
            max_relative.get::<meter>(),
        )
    }
}
