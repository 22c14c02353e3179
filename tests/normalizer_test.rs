//! Normalizer integration tests: file I/O, all-or-nothing writes, ordering.

use std::fs;
use tempfile::TempDir;

use natal_batch::normalizer::{decode_canonical_stream, normalize_file, normalize_str};
use natal_batch::BatchError;

const TWO_PROFILES: &str = r#"
[
  {
    "name": "",
    "date": "1972-10-18",
    "time": "20:44",
    "lat": 41.133806,
    "lon": 28.835051,
    "country": "",
    "state": ""
  },
  {
    "name": "",
    "date": "1961-01-28",
    "time": "03:38",
    "lat": 10.312158,
    "lon": -67.14608,
    "country": "",
    "state": ""
  }
]
"#;

#[test]
fn normalize_file_writes_canonical_stream() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("profiles.json");
    let output = temp_dir.path().join("profiles_converted.txt");
    fs::write(&input, TWO_PROFILES).unwrap();

    let report = normalize_file(&input, &output).unwrap();
    assert_eq!(report.accepted, 2);
    assert!(report.rejected.is_empty());

    let stream = fs::read_to_string(&output).unwrap();
    let profiles = decode_canonical_stream(&stream).unwrap();
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0].date, "1972-10-18");
    assert_eq!(profiles[1].lon, -67.14608);
    assert!(stream.ends_with("}\n"));
}

#[test]
fn malformed_container_leaves_no_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("profiles.json");
    let output = temp_dir.path().join("profiles_converted.txt");
    fs::write(&input, "[{\"date\": \"1972-10-18\"").unwrap();

    let err = normalize_file(&input, &output).unwrap_err();
    assert!(matches!(err, BatchError::MalformedBatchInput(_)));
    assert!(!output.exists());

    // No staging files left behind either
    let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn malformed_container_keeps_previous_output_intact() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("profiles.json");
    let output = temp_dir.path().join("profiles_converted.txt");

    fs::write(&input, TWO_PROFILES).unwrap();
    normalize_file(&input, &output).unwrap();
    let before = fs::read(&output).unwrap();

    fs::write(&input, "not json at all").unwrap();
    assert!(normalize_file(&input, &output).is_err());
    assert_eq!(fs::read(&output).unwrap(), before);
}

#[test]
fn missing_input_is_an_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = normalize_file(
        &temp_dir.path().join("absent.json"),
        &temp_dir.path().join("out.txt"),
    )
    .unwrap_err();
    assert!(matches!(err, BatchError::Io(_)));
}

#[test]
fn rejected_records_do_not_abort_the_batch() {
    let input = r#"[
        {"name": "first", "date": "1972-10-18", "time": "20:44", "lat": 41.1, "lon": 28.8},
        {"name": "bad", "date": "1972-10-18", "time": "8pm", "lat": 41.1, "lon": 28.8},
        {"name": "third", "date": "1961-01-28", "time": "03:38", "lat": 10.3, "lon": -67.1}
    ]"#;

    let (stream, report) = normalize_str(input).unwrap();
    assert_eq!(report.accepted, 2);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].index, 1);
    assert!(report.rejected[0].reason.contains("time"));

    let names: Vec<String> = decode_canonical_stream(&stream)
        .unwrap()
        .into_iter()
        .map(|profile| profile.name)
        .collect();
    assert_eq!(names, vec!["first", "third"]);
}

#[test]
fn repeated_runs_are_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("profiles.json");
    let first = temp_dir.path().join("first.txt");
    let second = temp_dir.path().join("second.txt");
    fs::write(&input, TWO_PROFILES).unwrap();

    normalize_file(&input, &first).unwrap();
    normalize_file(&input, &second).unwrap();
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn non_utf8_input_is_malformed() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("profiles.json");
    let output = temp_dir.path().join("profiles_converted.txt");
    fs::write(&input, b"[\xff\xfe]").unwrap();

    let err = normalize_file(&input, &output).unwrap_err();
    assert!(matches!(err, BatchError::MalformedBatchInput(_)), "{err:?}");
    assert!(!output.exists());
}

#[test]
fn failed_rename_leaves_destination_and_directory_clean() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("profiles.json");
    fs::write(&input, TWO_PROFILES).unwrap();

    // A directory cannot be replaced by the staged file
    let output = temp_dir.path().join("profiles_converted.txt");
    fs::create_dir(&output).unwrap();

    let err = normalize_file(&input, &output).unwrap_err();
    assert!(matches!(err, BatchError::Io(_)), "{err:?}");

    assert!(output.is_dir());
    assert_eq!(fs::read_dir(&output).unwrap().count(), 0);

    let mut entries: Vec<String> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();
    assert_eq!(entries, vec!["profiles.json", "profiles_converted.txt"]);
}
