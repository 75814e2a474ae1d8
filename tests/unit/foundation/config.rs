use super::*;
use serde_json::json;

#[test]
fn defaults_validate() {
    EngineConfig::default().validate().unwrap();
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg: EngineConfig = serde_json::from_value(json!({
        "projection": { "scale": 0.5 },
        "scene": { "palette": ["#ff0000", [0, 255, 0]] }
    }))
    .unwrap();
    assert_eq!(cfg.projection.scale, 0.5);
    assert_eq!(cfg.projection.base_lat, ProjectionConfig::default().base_lat);
    assert_eq!(cfg.playback, PlaybackConfig::default());
    assert_eq!(
        cfg.scene.palette,
        vec![Rgba8::rgb(255, 0, 0), Rgba8::rgb(0, 255, 0)]
    );
    cfg.validate().unwrap();
}

#[test]
fn validate_rejects_empty_palette() {
    let mut cfg = EngineConfig::default();
    cfg.scene.palette.clear();
    assert!(cfg.validate().is_err());
}

#[test]
fn validate_rejects_bad_speed_bounds() {
    let mut cfg = EngineConfig::default();
    cfg.playback.min_speed = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = EngineConfig::default();
    cfg.playback.min_speed = 5;
    cfg.playback.max_speed = 4;
    assert!(cfg.validate().is_err());
}

#[test]
fn validate_rejects_non_finite_projection() {
    let mut cfg = EngineConfig::default();
    cfg.projection.scale = f64::NAN;
    assert!(cfg.validate().is_err());
}

#[test]
fn from_path_reads_json() {
    let dir = std::env::temp_dir().join(format!("routeplay_cfg_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("cfg.json");
    std::fs::write(&path, r#"{ "metrics": { "minutes_per_km": 3.0 } }"#).unwrap();
    let cfg = EngineConfig::from_path(&path).unwrap();
    assert_eq!(cfg.metrics.minutes_per_km, 3.0);
    assert!(EngineConfig::from_path(dir.join("missing.json")).is_err());
}
