//! Reading the position and orientation tables, and writing derived batches back out as CSV.
//!
//! Headers are checked by meaning rather than by exact text. Each header cell names a quantity
//! and a unit, either as `name (unit)` or `name_unit`, so `pos_lat (deg)`, `Latitude (degrees)`,
//! and `lat_rad` are all a latitude column. Columns must appear in the canonical order:
//! latitude, longitude, altitude for positions and yaw, pitch, roll for orientations.

use crate::error::{Dataset, Error, Result};
use crate::geodetic::{GeodeticSample, PathPoint};
use crate::orientation::OrientationSample;
use crate::record::CombinedRecord;
use log::debug;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;
use uom::si::angle::{degree, radian};
use uom::si::f64::{Angle, Length};
use uom::si::length::meter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quantity {
    Latitude,
    Longitude,
    Altitude,
    Yaw,
    Pitch,
    Roll,
}

impl Quantity {
    fn parse(name: &str) -> Option<Self> {
        let name = name.strip_prefix("pos_").unwrap_or(name);
        Some(match name {
            "lat" | "latitude" => Self::Latitude,
            "lon" | "lng" | "long" | "longitude" => Self::Longitude,
            "alt" | "altitude" | "height" => Self::Altitude,
            "yaw" | "heading" => Self::Yaw,
            "pitch" => Self::Pitch,
            "roll" | "bank" => Self::Roll,
            _ => return None,
        })
    }

    fn is_angle(self) -> bool {
        !matches!(self, Self::Altitude)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::Altitude => "altitude",
            Self::Yaw => "yaw",
            Self::Pitch => "pitch",
            Self::Roll => "roll",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Degree,
    Radian,
    Meter,
}

impl Unit {
    fn parse(unit: &str) -> Option<Self> {
        Some(match unit {
            "deg" | "degree" | "degrees" | "°" => Self::Degree,
            "rad" | "radian" | "radians" => Self::Radian,
            "m" | "meter" | "meters" | "metre" | "metres" => Self::Meter,
            _ => return None,
        })
    }

    fn is_angle(self) -> bool {
        !matches!(self, Self::Meter)
    }
}

/// A parsed header cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Column {
    quantity: Quantity,
    unit: Unit,
}

impl Column {
    fn parse(cell: &str) -> Option<Self> {
        let cell = cell.trim().to_lowercase();
        let (name, unit) = match cell.split_once('(') {
            Some((name, rest)) => (name.trim_end(), rest.strip_suffix(')')?.trim()),
            None => cell.rsplit_once('_')?,
        };
        let column = Self {
            quantity: Quantity::parse(name)?,
            unit: Unit::parse(unit)?,
        };
        (column.quantity.is_angle() == column.unit.is_angle()).then_some(column)
    }

    fn angle(&self, value: f64) -> Angle {
        match self.unit {
            Unit::Radian => Angle::new::<radian>(value),
            _ => Angle::new::<degree>(value),
        }
    }

    fn length(&self, value: f64) -> Length {
        Length::new::<meter>(value)
    }
}

const POSITION_COLUMNS: [Quantity; 3] = [Quantity::Latitude, Quantity::Longitude, Quantity::Altitude];
const ORIENTATION_COLUMNS: [Quantity; 3] = [Quantity::Yaw, Quantity::Pitch, Quantity::Roll];

/// Reads a position table: latitude, longitude, and altitude per row.
///
/// The exact headers `pos_lat (deg)`, `pos_lon (deg)`, `pos_alt (m)` are accepted, as is any
/// header naming the same quantities in the same order with an angle unit for latitude and
/// longitude and a length unit for altitude.
///
/// Fails with [`Error::EmptyInput`] if the table has no data rows, and with
/// [`Error::MalformedInput`] if the header does not describe those columns, a row has the wrong
/// number of fields, or a value is not a finite number.
pub fn read_positions<R: io::Read>(reader: R) -> Result<Vec<GeodeticSample>> {
    read_table(reader, Dataset::Position, POSITION_COLUMNS, |[lat, lon, alt], row| {
        GeodeticSample::new(lat.angle(row[0]), lon.angle(row[1]), alt.length(row[2]))
    })
}

/// Reads an orientation table: yaw, pitch, and roll per row.
///
/// The exact headers `Yaw (deg)`, `Pitch (deg)`, `Roll (deg)` are accepted, along with any header
/// naming the same angles in the same order. Fails like [`read_positions`].
pub fn read_orientations<R: io::Read>(reader: R) -> Result<Vec<OrientationSample>> {
    read_table(
        reader,
        Dataset::Orientation,
        ORIENTATION_COLUMNS,
        |[yaw, pitch, roll], row| {
            OrientationSample::tait_bryan_builder()
                .yaw(yaw.angle(row[0]))
                .pitch(pitch.angle(row[1]))
                .roll(roll.angle(row[2]))
                .build()
        },
    )
}

pub fn read_positions_from_path(path: impl AsRef<Path>) -> Result<Vec<GeodeticSample>> {
    read_positions(open(path.as_ref(), Dataset::Position)?)
}

pub fn read_orientations_from_path(path: impl AsRef<Path>) -> Result<Vec<OrientationSample>> {
    read_orientations(open(path.as_ref(), Dataset::Orientation)?)
}

fn open(path: &Path, dataset: Dataset) -> Result<File> {
    File::open(path).map_err(|source| Error::Io { dataset, source })
}

fn read_table<R, T>(
    reader: R,
    dataset: Dataset,
    expected: [Quantity; 3],
    make: impl Fn([Column; 3], [f64; 3]) -> T,
) -> Result<Vec<T>>
where
    R: io::Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = rdr
        .headers()
        .map_err(|e| Error::from_csv(dataset, e))?
        .clone();
    if header.is_empty() {
        return Err(Error::EmptyInput { dataset });
    }
    let columns = parse_header(&header, dataset, expected)?;

    let mut out = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| Error::from_csv(dataset, e))?;
        let mut row = [0.; 3];
        for (j, (value, field)) in row.iter_mut().zip(&record).enumerate() {
            *value = field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    Error::malformed(
                        dataset,
                        format!("row {i}: {} value `{field}` is not a finite number", expected[j]),
                    )
                })?;
        }
        out.push(make(columns, row));
    }

    if out.is_empty() {
        return Err(Error::EmptyInput { dataset });
    }
    debug!("read {} {dataset} rows", out.len());
    Ok(out)
}

fn parse_header(
    header: &csv::StringRecord,
    dataset: Dataset,
    expected: [Quantity; 3],
) -> Result<[Column; 3]> {
    if header.len() != expected.len() {
        return Err(Error::malformed(
            dataset,
            format!("expected {} columns, got {}", expected.len(), header.len()),
        ));
    }

    let mut columns = [Column {
        quantity: Quantity::Latitude,
        unit: Unit::Degree,
    }; 3];
    for ((column, cell), quantity) in columns.iter_mut().zip(header).zip(expected) {
        *column = Column::parse(cell)
            .filter(|c| c.quantity == quantity)
            .ok_or_else(|| {
                Error::malformed(
                    dataset,
                    format!("header `{cell}` does not describe {quantity} with a suitable unit"),
                )
            })?;
    }
    Ok(columns)
}

/// Writes path points as a CSV table with an `x,y,z` header, in meters.
pub fn write_path_points<W: io::Write>(writer: W, path_points: &[PathPoint]) -> Result<()> {
    write_table(
        writer,
        Dataset::PathPoints,
        ["x", "y", "z"],
        path_points.iter().map(PathPoint::to_array),
    )
}

/// Writes combined records as a CSV table with the [`CombinedRecord::COLUMNS`] header.
pub fn write_combined_records<W: io::Write>(writer: W, records: &[CombinedRecord]) -> Result<()> {
    write_table(
        writer,
        Dataset::CombinedRecords,
        CombinedRecord::COLUMNS,
        records.iter().map(CombinedRecord::to_array),
    )
}

fn write_table<W, const N: usize>(
    writer: W,
    dataset: Dataset,
    header: [&str; N],
    rows: impl Iterator<Item = [f64; N]>,
) -> Result<()>
where
    W: io::Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header)
        .map_err(|e| Error::from_csv(dataset, e))?;
    let mut n = 0;
    for row in rows {
        wtr.write_record(row.iter().map(f64::to_string))
            .map_err(|e| Error::from_csv(dataset, e))?;
        n += 1;
    }
    wtr.flush().map_err(|source| Error::Io { dataset, source })?;
    debug!("wrote {n} {dataset} rows");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{read_orientations, read_positions, write_combined_records, write_path_points, Column};
    use crate::error::{Dataset, Error};
    use crate::geodetic::PathPoint;
    use crate::orientation::OrientationSample;
    use crate::record::CombinedRecord;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;
    use uom::si::angle::{degree, radian};
    use uom::si::length::meter;

    const POSITIONS: &str = "\
pos_lat (deg),pos_lon (deg),pos_alt (m)
31.2304,121.4737,12.5
31.2305,121.4738,13.0
";

    const ORIENTATIONS: &str = "\
Yaw (deg),Pitch (deg),Roll (deg)
90,0,0
45.5, -10 , 3
";

    #[test]
    fn reads_canonical_positions() {
        let samples = read_positions(POSITIONS.as_bytes()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_abs_diff_eq!(samples[0].latitude().get::<degree>(), 31.2304, epsilon = 1e-12);
        assert_abs_diff_eq!(samples[1].longitude().get::<degree>(), 121.4738, epsilon = 1e-12);
        assert_eq!(samples[1].altitude().get::<meter>(), 13.);
    }

    #[test]
    fn reads_canonical_orientations() {
        let samples = read_orientations(ORIENTATIONS.as_bytes()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], OrientationSample::from_degrees(90., 0., 0.));
        assert_abs_diff_eq!(samples[1].pitch().get::<degree>(), -10., epsilon = 1e-12);
        assert_abs_diff_eq!(samples[1].roll().get::<degree>(), 3., epsilon = 1e-12);
    }

    #[rstest]
    #[case("pos_lat (deg)", true)]
    #[case("Latitude (Degrees)", true)]
    #[case("lat_deg", true)]
    #[case("pos_lat_rad", true)]
    #[case("lat (m)", false)]
    #[case("alt (deg)", false)]
    #[case("lat", false)]
    #[case("speed (m)", false)]
    #[case("lat (deg", false)]
    fn header_cells(#[case] cell: &str, #[case] valid: bool) {
        assert_eq!(Column::parse(cell).is_some(), valid, "{cell}");
    }

    #[test]
    fn alternative_headers_and_units() {
        let csv = "latitude_rad,longitude_rad,altitude_m\n0.5,-1.0,100\n";
        let samples = read_positions(csv.as_bytes()).unwrap();
        assert_eq!(samples[0].latitude().get::<radian>(), 0.5);
        assert_eq!(samples[0].longitude().get::<radian>(), -1.);
    }

    #[test]
    fn header_only_orientation_table_is_empty() {
        let err = read_orientations("Yaw (deg),Pitch (deg),Roll (deg)\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            Error::EmptyInput {
                dataset: Dataset::Orientation
            }
        ));
    }

    #[test]
    fn empty_file_is_empty() {
        assert!(matches!(
            read_positions(&b""[..]),
            Err(Error::EmptyInput {
                dataset: Dataset::Position
            })
        ));
    }

    #[test]
    fn columns_out_of_order_are_malformed() {
        let err = read_orientations("Pitch (deg),Yaw (deg),Roll (deg)\n1,2,3\n".as_bytes())
            .unwrap_err();
        insta::assert_snapshot!(
            err,
            @"malformed orientation input: header `Pitch (deg)` does not describe yaw with a suitable unit"
        );
    }

    #[test]
    fn wrong_header_width_is_malformed() {
        let err = read_positions("pos_lat (deg),pos_lon (deg)\n1,2\n".as_bytes()).unwrap_err();
        insta::assert_snapshot!(err, @"malformed position input: expected 3 columns, got 2");
    }

    #[test]
    fn ragged_rows_are_malformed() {
        let csv = "pos_lat (deg),pos_lon (deg),pos_alt (m)\n1,2,3\n4,5\n";
        assert!(matches!(
            read_positions(csv.as_bytes()),
            Err(Error::MalformedInput {
                dataset: Dataset::Position,
                ..
            })
        ));
    }

    #[test]
    fn non_numeric_values_are_malformed() {
        let csv = "pos_lat (deg),pos_lon (deg),pos_alt (m)\n1,2,3\n4,east,6\n";
        let err = read_positions(csv.as_bytes()).unwrap_err();
        insta::assert_snapshot!(
            err,
            @"malformed position input: row 1: longitude value `east` is not a finite number"
        );
    }

    #[rstest]
    #[case("lat_deg,lon_deg,alt_m\nNaN,10,5\n45,10,5\n", "row 0: latitude value `NaN`")]
    #[case("lat_deg,lon_deg,alt_m\n45,10,5\n45,10,inf\n", "row 1: altitude value `inf`")]
    #[case("lat_deg,lon_deg,alt_m\n45,-infinity,5\n", "row 0: longitude value `-infinity`")]
    fn non_finite_positions_are_malformed(#[case] csv: &str, #[case] names: &str) {
        match read_positions(csv.as_bytes()) {
            Err(Error::MalformedInput {
                dataset: Dataset::Position,
                reason,
            }) => assert!(reason.starts_with(names), "{reason}"),
            other => panic!("expected malformed position input, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_orientations_are_malformed() {
        let err = read_orientations("yaw_deg,pitch_deg,roll_deg\n0,nan,0\n".as_bytes())
            .unwrap_err();
        insta::assert_snapshot!(
            err,
            @"malformed orientation input: row 0: pitch value `nan` is not a finite number"
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = super::read_positions_from_path("/nonexistent/positions.csv").unwrap_err();
        assert!(matches!(
            err,
            Error::Io {
                dataset: Dataset::Position,
                ..
            }
        ));
    }

    #[test]
    fn writes_path_points() {
        let mut out = Vec::new();
        write_path_points(
            &mut out,
            &[PathPoint::new(1., 2., 3.), PathPoint::new(-4.5, 0., 6.25)],
        )
        .unwrap();
        insta::assert_snapshot!(String::from_utf8(out).unwrap().trim_end(), @r"
        x,y,z
        1,2,3
        -4.5,0,6.25
        ");
    }

    #[test]
    fn writes_combined_header_without_rows() {
        let mut out = Vec::new();
        write_combined_records(&mut out, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let header: Vec<_> = text.trim_end().split(',').collect();
        assert_eq!(header, CombinedRecord::COLUMNS);
    }
}
