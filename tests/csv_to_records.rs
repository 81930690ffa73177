use approx::assert_abs_diff_eq;
use gesture_path::{ingest, CombinedRecord, Dataset, Error, GestureConfig, GesturePath};

const POSITIONS: &str = "\
pos_lat (deg),pos_lon (deg),pos_alt (m)
48.1372,11.5756,519
0,25,0
48.1375,11.5760,521
48.1380,11.5765,523
";

const ORIENTATIONS: &str = "\
Yaw (deg),Pitch (deg),Roll (deg)
0,0,0
15,0,0
90,0,0
180,30,-10
";

#[test]
fn csv_tables_to_combined_records() {
    let positions = ingest::read_positions(POSITIONS.as_bytes()).unwrap();
    let orientations = ingest::read_orientations(ORIENTATIONS.as_bytes()).unwrap();
    let config = GestureConfig {
        scale: 25.,
        ..Default::default()
    };
    let path = GesturePath::with_config(positions, orientations, &config).unwrap();

    // the second sample sits on the equator at zero altitude and is dropped everywhere
    assert_eq!(path.raw_path_points().len(), 4);
    assert_eq!(path.path_points().unwrap().len(), 3);
    assert_eq!(path.gestures().unwrap().len(), 3);
    let records = path.combined_records().unwrap();
    assert_eq!(records.len(), 3);

    // yaw 90 turns body X onto reference Y
    let rotated = &records[1];
    assert_abs_diff_eq!(rotated.axes().x_axis().y, 1., epsilon = 1e-12);
    let row = rotated.to_array();
    assert_abs_diff_eq!(row[13] - row[1], 25., epsilon = 1e-6);

    for record in &records {
        for (tip, axis) in record.tips().iter().zip(record.axes().axes()) {
            let offset = *tip - record.path_point();
            assert_abs_diff_eq!(offset / 25., axis, epsilon = 1e-9);
        }
    }

    let mut out = Vec::new();
    ingest::write_combined_records(&mut out, &records).unwrap();
    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap().split(',').collect::<Vec<_>>(),
        CombinedRecord::COLUMNS
    );
    let first: Vec<f64> = lines
        .next()
        .unwrap()
        .split(',')
        .map(|v| v.parse().unwrap())
        .collect();
    assert_eq!(first.len(), CombinedRecord::FIELD_COUNT);
    assert_eq!(first[..], records[0].to_array()[..]);
    assert_eq!(lines.count(), 2);
}

#[test]
fn mismatched_tables_fail_without_partial_output() {
    let positions = ingest::read_positions(POSITIONS.as_bytes()).unwrap();
    let orientations =
        ingest::read_orientations("Yaw (deg),Pitch (deg),Roll (deg)\n1,2,3\n".as_bytes()).unwrap();

    let err = GesturePath::with_config(positions, orientations, &GestureConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Alignment {
            left: Dataset::Position,
            left_len: 4,
            right: Dataset::Orientation,
            right_len: 1,
        }
    ));
}

#[test]
fn all_degenerate_recording_is_an_empty_result() {
    let positions =
        ingest::read_positions("lat_deg,lon_deg,alt_m\n0,0,0\n0,90,0\n".as_bytes()).unwrap();
    let orientations =
        ingest::read_orientations("yaw_deg,pitch_deg,roll_deg\n0,0,0\n0,0,0\n".as_bytes())
            .unwrap();
    let path =
        GesturePath::with_config(positions, orientations, &GestureConfig::default()).unwrap();

    assert!(matches!(
        path.combined_records(),
        Err(Error::EmptyResult { total: 2 })
    ));
    assert!(matches!(
        path.path_points(),
        Err(Error::EmptyResult { total: 2 })
    ));
}

#[test]
fn path_points_export() {
    let positions = ingest::read_positions(POSITIONS.as_bytes()).unwrap();
    let orientations = ingest::read_orientations(ORIENTATIONS.as_bytes()).unwrap();
    let path = GesturePath::new(positions, orientations).unwrap();

    let mut out = Vec::new();
    ingest::write_path_points(&mut out, &path.path_points().unwrap()).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("x,y,z\n"));
    assert_eq!(text.lines().count(), 4);
}
