use pedometer_core::cli::{load_samples_json, replay_samples};
use pedometer_core::{AccelSample, PedometerConfig};

// 20 s innspilt gange @100 Hz, en syklus per `period` samples.
fn walking_csv(period: usize, phase: usize) -> String {
    let mut csv = String::from("timestamp_ms,x,y,z\n");
    for k in 0..2000usize {
        let angle = 2.0 * std::f64::consts::PI * (k + phase) as f64 / period as f64;
        let m = 100.0 + 50.0 * angle.sin();
        csv.push_str(&format!("{},{},0,0\n", k * 10, (m as f32).sqrt()));
    }
    csv
}

#[test]
fn replay_csv_session() {
    for period in [60, 100, 150] {
        for phase in (0..period).step_by(10) {
            let data = walking_csv(period, phase);
            let mut rdr = csv::Reader::from_reader(data.as_bytes());
            let samples: Vec<AccelSample> = rdr
                .deserialize()
                .collect::<Result<_, _>>()
                .expect("parse csv");
            assert_eq!(samples.len(), 2000);

            let case = format!("period {period} phase {phase}");
            let report = replay_samples(&samples, &PedometerConfig::default());
            assert_eq!(report.samples, 2000);
            assert_eq!(report.duration_ms, 19_990);
            assert!(report.simple_steps > 10, "{case}");
            assert_eq!(report.walk_steps, report.simple_steps, "{case}");
            assert!((report.distance_m - report.simple_steps as f32 * 0.73).abs() < 1e-3);

            // litt under signalets takt: første og siste syklus gir ikke steg
            let expected = 60_000.0 / (period as f32 * 10.0);
            let cadence = report.cadence_spm.expect("cadence");
            assert!(
                cadence > 0.8 * expected && cadence < 1.05 * expected,
                "{case}: cadence {cadence}, signal {expected}"
            );
            let simple_events = report
                .events
                .iter()
                .filter(|e| e.name() == "SimpleStep")
                .count();
            assert_eq!(simple_events as u32, report.simple_steps);
        }
    }
}

#[test]
fn empty_replay_has_no_cadence() {
    let report = replay_samples(&[], &PedometerConfig::default());
    assert_eq!(report.simple_steps, 0);
    assert_eq!(report.duration_ms, 0);
    assert!(report.cadence_spm.is_none());
}

#[test]
fn load_samples_from_json_file() {
    let path = std::env::temp_dir().join(format!("pedometer_samples_{}.json", std::process::id()));
    let samples = vec![
        AccelSample::new(0, 0.0, 0.0, 9.81),
        AccelSample::new(10, 0.1, 0.2, 9.7),
    ];
    std::fs::write(&path, serde_json::to_string(&samples).unwrap()).expect("write");

    let loaded = load_samples_json(&path).expect("load");
    assert_eq!(loaded, samples);

    std::fs::remove_file(&path).ok();
    assert!(load_samples_json(&path).is_err());
}
