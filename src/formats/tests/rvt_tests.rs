//! Time-series reader tests

use crate::error::RavenError;
use crate::formats::RvtFile;
use crate::test_support::{init_logging, write_fixture};
use tempfile::TempDir;

const MULTIDATA_GAUGE: &str = "\
:Gauge A
  :Latitude 45.0
  :Longitude -75.0
  :Elevation 120.5
  :MultiData
    2000-01-01 00:00:00 1.0 3
    :Parameters PRECIP TEMP
    :Units mm C
    1.0 10.0
    2.0 11.0
    3.0 12.0
  :EndMultiData
:EndGauge
";

#[test]
fn test_multidata_gauge() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "met.rvt", MULTIDATA_GAUGE);

    let rvt = RvtFile::from_path(&path).unwrap();

    assert_eq!(rvt.nmetgauges(), 1);
    assert_eq!(rvt.nobsgauges(), 0);

    let gauge = rvt.met_gauge("A").unwrap();
    assert_eq!(gauge.latitude, Some(45.0));
    assert_eq!(gauge.longitude, Some(-75.0));
    assert_eq!(gauge.elevation, Some(120.5));
    assert_eq!(gauge.kind, "MultiData");
    assert_eq!(gauge.units, vec!["mm", "C"]);

    let data = &gauge.data;
    assert_eq!(data.n_rows(), 3);
    assert_eq!(data.names(), vec!["PRECIP", "TEMP"]);
    assert_eq!(
        data.column("TEMP").unwrap().as_floats().unwrap(),
        &[Some(10.0), Some(11.0), Some(12.0)]
    );

    let index: Vec<String> = data.index().unwrap().iter().map(|t| t.to_string()).collect();
    assert_eq!(
        index,
        vec![
            "2000-01-01 00:00:00",
            "2000-01-02 00:00:00",
            "2000-01-03 00:00:00"
        ]
    );
}

#[test]
fn test_hydrograph_observation() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "obs.rvt",
        ":ObservationData HYDROGRAPH 5 m3/s\n2001-06-01 00:00:00 1.0 2\n12.5\n-1.2345\n:EndObservationData\n",
    );

    let rvt = RvtFile::from_path(&path).unwrap();
    assert_eq!(rvt.nobsgauges(), 1);

    let gauge = rvt.obs_gauge(5).unwrap();
    assert_eq!(gauge.kind, "HYDROGRAPH");
    assert_eq!(gauge.units.as_deref(), Some("m3/s"));
    assert_eq!(gauge.data.names(), vec!["QObs"]);
    assert_eq!(
        gauge.data.column("QObs").unwrap().as_floats().unwrap(),
        &[Some(12.5), None]
    );
    assert_eq!(gauge.data.index().unwrap().len(), 2);
}

#[test]
fn test_other_observation_keeps_column_name() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "obs.rvt",
        ":ObservationData RESERVOIR_STAGE 7\n2001-06-01 00:00:00 1.0 1\n101.2\n",
    );

    let rvt = RvtFile::from_path(&path).unwrap();
    let gauge = rvt.obs_gauge(7).unwrap();
    assert_eq!(gauge.units, None);
    assert_eq!(gauge.data.names(), vec!["0"]);
}

#[test]
fn test_single_data_gauge() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "rain.rvt",
        ":Gauge Rain_1\n:Data RAINFALL mm/d\n2000-01-01 00:00:00 0.5 4\n0.0\n1.5\n-1.2345\n3.0\n:EndData\n:EndGauge\n",
    );

    let rvt = RvtFile::from_path(&path).unwrap();
    let gauge = rvt.met_gauge("Rain_1").unwrap();

    assert_eq!(gauge.kind, "RAINFALL");
    assert_eq!(gauge.units, vec!["mm/d"]);
    assert_eq!(gauge.latitude, None);
    assert_eq!(gauge.data.n_rows(), 4);
    assert_eq!(gauge.data.column("0").unwrap().data.null_count(), 1);
    assert_eq!(
        gauge.data.index().unwrap()[3].to_string(),
        "2000-01-02 12:00:00"
    );
}

#[test]
fn test_repeated_gauge_overwrites_in_place() {
    let dir = TempDir::new().unwrap();
    let content = "\
:Gauge A
:Data RAINFALL mm/d
2000-01-01 00:00:00 1.0 1
1.0
:EndGauge
:Gauge B
:Data RAINFALL mm/d
2000-01-01 00:00:00 1.0 1
2.0
:EndGauge
:Gauge A
:Data SNOWFALL mm/d
2000-01-01 00:00:00 1.0 2
3.0
4.0
:EndGauge
";
    let path = write_fixture(&dir, "met.rvt", content);

    let rvt = RvtFile::from_path(&path).unwrap();
    assert_eq!(rvt.nmetgauges(), 2);

    let names: Vec<&str> = rvt.met_gauges().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(rvt.met_gauge("A").unwrap().kind, "SNOWFALL");
    assert_eq!(rvt.imet(0).unwrap().n_rows(), 2);
    assert_eq!(rvt.imet(1).unwrap().n_rows(), 1);
}

#[test]
fn test_unknown_tags_are_skipped() {
    let dir = TempDir::new().unwrap();
    let content = "\
:MonthlyAveTemperature 1 2 3
:Gauge A
  :RainCorrection 1.1
  :Data TEMP_AVE C
  2000-01-01 00:00:00 1.0 1
  5.0
:EndGauge
:SomethingElse
";
    let path = write_fixture(&dir, "met.rvt", content);

    let rvt = RvtFile::from_path(&path).unwrap();
    assert_eq!(rvt.nmetgauges(), 1);
}

#[test]
fn test_gauge_without_data_is_not_stored() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "met.rvt", ":Gauge A\n:Latitude 1.0\n:EndGauge\n");

    let rvt = RvtFile::from_path(&path).unwrap();
    assert_eq!(rvt.nmetgauges(), 0);
}

#[test]
fn test_gauge_split_across_redirects() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "model.rvt",
        ":Gauge A\n:Latitude 45.0\n:RedirectToFile data/a.rvt\n:EndGauge\n:RedirectToFile obs.rvt\n",
    );
    write_fixture(
        &dir,
        "data/a.rvt",
        ":MultiData\n2000-01-01 00:00:00 1.0 2\n:Parameters PRECIP\n:Units mm\n1.0\n2.0\n:EndMultiData\n",
    );
    write_fixture(
        &dir,
        "obs.rvt",
        ":ObservationData HYDROGRAPH 3 m3/s\n2000-01-01 00:00:00 1.0 1\n9.0\n",
    );

    let rvt = RvtFile::from_path(&path).unwrap();
    assert_eq!(rvt.nmetgauges(), 1);
    assert_eq!(rvt.nobsgauges(), 1);
    assert_eq!(rvt.met_gauge("A").unwrap().data.n_rows(), 2);
    assert_eq!(rvt.iobs(0).unwrap().names(), vec!["QObs"]);
}

#[test]
fn test_index_equal_to_count_is_out_of_range() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "met.rvt", MULTIDATA_GAUGE);
    let rvt = RvtFile::from_path(&path).unwrap();

    assert!(rvt.imet(0).is_ok());
    match rvt.imet(1).unwrap_err() {
        RavenError::IndexOutOfRange { index, count } => {
            assert_eq!(index, 1);
            assert_eq!(count, 1);
        }
        other => panic!("Expected IndexOutOfRange error, got {:?}", other),
    }
    assert!(matches!(
        rvt.iobs(0),
        Err(RavenError::IndexOutOfRange { index: 0, count: 0 })
    ));
}

#[test]
fn test_unterminated_gauge_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "met.rvt", ":Gauge A\n:Latitude 45.0\n");

    assert!(matches!(
        RvtFile::from_path(&path),
        Err(RavenError::UnexpectedEndOfInput { .. })
    ));
}

#[test]
fn test_malformed_gauge_tags() {
    let dir = TempDir::new().unwrap();

    let path = write_fixture(&dir, "a.rvt", ":Gauge\n:EndGauge\n");
    assert!(matches!(
        RvtFile::from_path(&path),
        Err(RavenError::MalformedTag { .. })
    ));

    let path = write_fixture(&dir, "b.rvt", ":Gauge A\n:Latitude north\n:EndGauge\n");
    assert!(matches!(
        RvtFile::from_path(&path),
        Err(RavenError::MalformedTag { .. })
    ));

    let path = write_fixture(&dir, "c.rvt", ":ObservationData HYDROGRAPH five\n");
    assert!(matches!(
        RvtFile::from_path(&path),
        Err(RavenError::MalformedTag { .. })
    ));
}

#[test]
fn test_bad_date_line_in_gauge() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "met.rvt",
        ":Gauge A\n:Data RAINFALL mm/d\n2000/01/01 00:00:00 1.0 1\n1.0\n:EndGauge\n",
    );

    match RvtFile::from_path(&path).unwrap_err() {
        RavenError::MalformedDateLine { path: file, line, .. } => {
            assert_eq!(file, path);
            assert!(line.starts_with("2000/01/01"));
        }
        other => panic!("Expected MalformedDateLine error, got {:?}", other),
    }
}

#[test]
fn test_multidata_exports_to_dataframe() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "met.rvt", MULTIDATA_GAUGE);
    let rvt = RvtFile::from_path(&path).unwrap();

    let df = rvt
        .imet(0)
        .unwrap()
        .to_dataframe(&rvt.config().datetime_column)
        .unwrap();
    assert_eq!(df.shape(), (3, 3));
    assert_eq!(df.get_column_names_str(), vec!["Datetime", "PRECIP", "TEMP"]);
}

#[test]
fn test_step_beyond_date_range_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "obs.rvt",
        ":ObservationData HYDROGRAPH 5\n2000-01-01 00:00:00 100000000 2\n1.0\n2.0\n",
    );

    match RvtFile::from_path(&path).unwrap_err() {
        RavenError::MalformedDateLine { line, .. } => {
            assert_eq!(line, "2000-01-01 00:00:00 100000000 2");
        }
        other => panic!("Expected MalformedDateLine error, got {:?}", other),
    }
}

#[test]
fn test_data_block_does_not_continue_in_parent() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "model.rvt", ":RedirectToFile child.rvt\n2.0\n");
    write_fixture(
        &dir,
        "child.rvt",
        ":ObservationData HYDROGRAPH 1\n2000-01-01 00:00:00 1.0 2\n1.0\n",
    );

    match RvtFile::from_path(&path).unwrap_err() {
        RavenError::UnexpectedEndOfInput { path: file, .. } => {
            assert!(file.ends_with("child.rvt"));
        }
        other => panic!("Expected UnexpectedEndOfInput error, got {:?}", other),
    }
}

#[test]
fn test_failed_read_keeps_previous_gauges() {
    let dir = TempDir::new().unwrap();
    let good = write_fixture(&dir, "good.rvt", MULTIDATA_GAUGE);
    let bad = write_fixture(
        &dir,
        "bad.rvt",
        "\
:Gauge B
:Data RAINFALL mm/d
2000-01-01 00:00:00 1.0 1
4.0
:EndGauge
:ObservationData HYDROGRAPH 7
2000-01-01 00:00:00 1.0 1
9.0
:Gauge C
:Latitude north
:EndGauge
",
    );

    let mut rvt = RvtFile::new();
    rvt.read(&good).unwrap();
    assert!(matches!(
        rvt.read(&bad),
        Err(RavenError::MalformedTag { .. })
    ));

    assert_eq!(rvt.nmetgauges(), 1);
    assert_eq!(rvt.nobsgauges(), 0);
    assert!(rvt.met_gauge("B").is_none());
    assert!(rvt.obs_gauge(7).is_none());
    assert_eq!(rvt.met_gauge("A").unwrap().data.n_rows(), 3);
}

#[test]
fn test_second_read_adds_to_gauges() {
    let dir = TempDir::new().unwrap();
    let first = write_fixture(&dir, "first.rvt", MULTIDATA_GAUGE);
    let second = write_fixture(
        &dir,
        "second.rvt",
        ":Gauge B\n:Data RAINFALL mm/d\n2000-01-01 00:00:00 1.0 1\n4.0\n:EndGauge\n",
    );

    let mut rvt = RvtFile::new();
    rvt.read(&first).unwrap();
    rvt.read(&second).unwrap();

    let names: Vec<&str> = rvt.met_gauges().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
}
