// File: crates/tiden-core/tests/config.rs
// Purpose: Chart config parsing, defaults, validation and file loading through the config crate.

use std::io::Write;

use tiden_core::types::DEFAULT_SIZE_RATIO;
use tiden_core::{ChartConfig, ConfigError, Insets};

#[test]
fn defaults_from_empty_object() {
    let cfg = ChartConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, ChartConfig::default());
    assert_eq!(cfg.size_ratio, DEFAULT_SIZE_RATIO);
    assert!(!cfg.animate_line);
    assert_eq!(cfg.labels.unit, "cm");
    assert_eq!(cfg.margin, Insets::new(20.0, 40.0, 30.0, 40.0));
}

#[test]
fn parses_camel_case_keys() {
    let cfg = ChartConfig::from_json_str(
        r#"{
            "baseurl": "https://example.org/tiden/",
            "data": "mthw.csv",
            "sizeRatio": 0.5,
            "animateLine": true,
            "labels": { "yAxis": "Tidehochwasser (cm)" }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.data_location(), "https://example.org/tiden/mthw.csv");
    assert_eq!(cfg.size_ratio, 0.5);
    assert!(cfg.animate_line);
    assert_eq!(cfg.labels.y_axis, "Tidehochwasser (cm)");
    assert_eq!(cfg.labels.unit, "cm");
}

#[test]
fn rejects_bad_size_ratio() {
    for raw in [r#"{"sizeRatio": 0}"#, r#"{"sizeRatio": -1.5}"#] {
        assert!(matches!(ChartConfig::from_json_str(raw), Err(ConfigError::InvalidSizeRatio(_))));
    }
    assert!(matches!(ChartConfig::from_json_str("{\"sizeRatio\": \"wide\"}"), Err(ConfigError::Parse(_))));
}

#[test]
fn loads_from_json_file() {
    let path = std::env::temp_dir().join(format!("tiden-config-{}.json", std::process::id()));
    {
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, r#"{{"data": "tiden.csv", "sizeRatio": 0.75, "margin": {{"left": 60}}}}"#).unwrap();
    }
    let cfg = ChartConfig::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(cfg.data, "tiden.csv");
    assert_eq!(cfg.size_ratio, 0.75);
    assert_eq!(cfg.margin.left, 60.0);
    assert_eq!(cfg.margin.top, 20.0);
}

#[test]
fn missing_file_is_a_load_error() {
    let err = ChartConfig::from_file("/definitely/not/here/tiden.json").unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}
