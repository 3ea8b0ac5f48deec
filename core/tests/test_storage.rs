use std::fs;
use std::path::PathBuf;

use pedometer_core::{
    AccelSample, JsonFileStore, KeyValueStore, ManualClock, MemoryStore, Pedometer,
    PedometerConfig, StoredValue,
};

fn sample(k: u64) -> AccelSample {
    let m = 100.0 + 50.0 * (2.0 * std::f64::consts::PI * k as f64 / 100.0).sin();
    AccelSample::new(k * 10, (m as f32).sqrt(), 0.0, 0.0)
}

fn tmp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pedometer_{}_{}", name, std::process::id()));
    fs::create_dir_all(&dir).expect("create tmp dir");
    dir
}

#[test]
fn save_and_restore_from_same_store() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(0);
    let mut p = Pedometer::with_clock(
        PedometerConfig::default(),
        store.clone(),
        Box::new(clock.clone()),
    )
    .expect("pedometer");

    p.set_stride_length(0.81).expect("stride");
    p.start();
    for k in 0..1500 {
        p.on_accelerometer(&sample(k));
    }
    clock.advance(15_000);
    p.save().expect("save");
    assert_eq!(p.metrics().saves_total().get(), 1);

    let restored = Pedometer::with_clock(PedometerConfig::default(), store, Box::new(clock))
        .expect("restored");
    assert_eq!(restored.stride_length(), p.stride_length());
    assert_eq!(restored.distance(), p.distance());
    assert_eq!(restored.simple_steps(), p.simple_steps());
    assert_eq!(restored.walk_steps(), p.simple_steps());
    assert_eq!(restored.elapsed_time(), 15_000);
}

#[test]
fn empty_store_gives_factory_settings() {
    let p = Pedometer::new(PedometerConfig::default(), MemoryStore::new()).expect("pedometer");
    assert_eq!(p.stride_length(), 0.73);
    assert_eq!(p.stop_detection_timeout(), 2000);
    assert_eq!(p.simple_steps(), 0);
    assert_eq!(p.distance(), 0.0);
}

#[test]
fn json_file_store_roundtrip() {
    let dir = tmp_dir("roundtrip");
    let path = dir.join("PedometerPrefs.json");
    fs::remove_file(&path).ok();

    {
        let mut store = JsonFileStore::open(&dir, "PedometerPrefs").expect("open");
        assert!(store.get("Pedometer.distance").is_none());
        store.put("Pedometer.stridelength", StoredValue::Float(0.73));
        store.put("Pedometer.distance", StoredValue::Float(12.41));
        store.put("Pedometer.prevStepCount", StoredValue::Int(17));
        store.put("Pedometer.clockTime", StoredValue::Long(5_000_000_000));
        store.commit().expect("commit");
    }
    assert!(path.exists());

    let store = JsonFileStore::open(&dir, "PedometerPrefs").expect("reopen");
    assert_eq!(store.get_float("Pedometer.stridelength", 0.0), 0.73);
    assert_eq!(store.get_float("Pedometer.distance", 0.0), 12.41);
    assert_eq!(store.get_int("Pedometer.prevStepCount", 0), 17);
    assert_eq!(store.get_long("Pedometer.clockTime", 0), 5_000_000_000);
    assert_eq!(store.get_int("missing", 3), 3);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn pedometer_persists_through_json_file() {
    let dir = tmp_dir("pedometer");
    let config = PedometerConfig::default();
    fs::remove_file(dir.join(format!("{}.json", config.prefs_name))).ok();

    let store = JsonFileStore::open(&dir, &config.prefs_name).expect("open");
    let mut p = Pedometer::new(config.clone(), store).expect("pedometer");
    p.start();
    for k in 0..1200 {
        p.on_accelerometer(&sample(k));
    }
    p.stop();
    p.save().expect("save");

    let store = JsonFileStore::open(&dir, &config.prefs_name).expect("reopen");
    let restored = Pedometer::new(config, store).expect("restored");
    assert!(restored.simple_steps() > 0);
    assert_eq!(restored.simple_steps(), p.simple_steps());
    assert_eq!(restored.distance(), p.distance());
    assert_eq!(restored.stride_length(), 0.73);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn corrupt_stored_stride_falls_back_to_config() {
    let mut store = MemoryStore::new();
    store.put("Pedometer.stridelength", StoredValue::Float(-1.0));
    store.put("Pedometer.prevStepCount", StoredValue::Int(4));
    let p = Pedometer::new(PedometerConfig::default(), store).expect("pedometer");
    assert_eq!(p.stride_length(), 0.73);
    assert_eq!(p.simple_steps(), 4);
}
