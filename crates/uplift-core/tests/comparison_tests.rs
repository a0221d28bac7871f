//! Integration tests for the comparison engine
//!
//! Drives payloads through parsing, comparison, ticks and violin layout, and
//! checks the geometry invariants with property tests.

use proptest::prelude::*;
use rstest::rstest;
use uplift_core::{
    build_violin, compare_groups, compare_input, density_for, parse_payload, percent_ticks,
    tick_step, widened_percent_ticks, ComparisonInput, DensityCurve, DensitySource,
    EngineConfig, Group, GroupId, Tone, ViolinConfig, MAX_TICKS,
};

fn ramp(center: f64, spread: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| center + spread * (i as f64 / (n - 1) as f64 - 0.5))
        .collect()
}

fn bell(lo: f64, hi: f64, n: usize) -> DensityCurve {
    let xs = uplift_stats::linspace(lo, hi, n);
    let mid = (lo + hi) / 2.0;
    let width = (hi - lo).max(1e-9);
    let mut density: Vec<f64> = xs
        .iter()
        .map(|x| (-((x - mid) / width).powi(2) * 8.0).exp())
        .collect();
    density[0] = 0.0;
    density[n - 1] = 0.0;
    DensityCurve {
        xs,
        density,
        bandwidth: width / 10.0,
    }
}

// === Orchestration ===

#[test]
fn test_three_groups_compare_against_group_one() {
    let config = EngineConfig::default();
    let groups = vec![
        Group::new(2, 1.05, ramp(1.05, 0.2, 120)),
        Group::new(1, 1.00, ramp(1.00, 0.2, 120)),
        Group::new(3, 0.95, ramp(0.95, 0.2, 120)),
    ];

    let records = compare_groups(&groups, &config);

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.baseline.id == GroupId::Int(1)));
    assert_eq!(records[0].treatment.id, GroupId::Int(2));
    assert_eq!(records[1].treatment.id, GroupId::Int(3));
    assert!(records.iter().all(|r| r.cohort.is_none()));
}

#[test]
fn test_fewer_than_two_groups() {
    let config = EngineConfig::default();
    assert!(compare_groups(&[], &config).is_empty());
    assert!(compare_groups(&[Group::new(1, 0.5, vec![0.5, 0.6])], &config).is_empty());
}

#[test]
fn test_cohort_payload_end_to_end() {
    let config = EngineConfig::default();
    let payload = format!(
        r#"{{
            "d3": [
                {{"group": 1, "mean": 0.30, "total_revenue": 30, "total_order": 100,
                  "posterior_samples": {c}}},
                {{"group": 2, "mean": 0.36, "total_revenue": 36, "total_order": 100,
                  "posterior_samples": {t}}}
            ],
            "d1": [
                {{"group": 1, "mean": 0.50, "posterior_samples": null}},
                {{"group": 2, "mean": 0.52}}
            ]
        }}"#,
        c = serde_json::to_string(&ramp(0.30, 0.02, 100)).unwrap(),
        t = serde_json::to_string(&ramp(0.36, 0.02, 100)).unwrap(),
    );

    let input = parse_payload(&payload, &config.cohorts).unwrap();
    assert!(matches!(input, ComparisonInput::Cohorts(_)));
    assert_eq!(input.group_count(), 4);

    let records = compare_input(&input, &config);
    let keys: Vec<_> = records.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["d1_2", "d3_2"]);

    let d1 = &records[0];
    assert_eq!(d1.cohort.as_deref(), Some("d1"));
    assert!(d1.uplift.is_none());
    assert_eq!(d1.density_source, DensitySource::Unavailable);

    let d3 = &records[1];
    assert_eq!(d3.group_label, "D3 - 2");
    assert_eq!(d3.baseline.numerator, Some(30.0));
    assert_eq!(d3.treatment.denominator, Some(100.0));
    assert_eq!(d3.density_source, DensitySource::Posterior);
    let summary = d3.uplift.as_ref().unwrap();
    assert!((summary.mean_uplift - 0.2).abs() < 1e-9);
    assert!(d3.violin.is_some());
}

#[test]
fn test_near_zero_baseline_stays_bounded() {
    let config = EngineConfig::default();
    let control: Vec<f64> = (0..100).map(|i| 1e-9 * (i + 1) as f64).collect();
    let groups = vec![
        Group::new(1, 5e-8, control),
        Group::new(2, 1.0, vec![1.0; 100]),
    ];

    let records = compare_groups(&groups, &config);
    assert_eq!(records.len(), 1);

    let record = &records[0];
    let summary = record.uplift.as_ref().unwrap();
    assert!(summary.ci_high > 1e7 && summary.ci_high.is_finite());
    assert!(record.ticks.is_none());
    assert!(record.violin.is_none());

    let json = serde_json::to_string(&records).unwrap();
    assert!(json.len() < 100_000);
}

#[test]
fn test_records_serialize() {
    let config = EngineConfig::default();
    let groups = vec![
        Group::new("a", 2.0, ramp(2.0, 0.5, 60)),
        Group::new("b", 2.1, ramp(2.1, 0.5, 60)),
    ];
    let records = compare_groups(&groups, &config);
    let json = serde_json::to_value(&records).unwrap();

    assert_eq!(json[0]["key"], "b");
    assert_eq!(json[0]["density_source"], "posterior");
    assert!(json[0]["violin"]["lobes"].is_array());
}

#[test]
fn test_synthesized_fallback_is_deterministic() {
    let config = EngineConfig::default();
    let summary = uplift_core::UpliftSummary {
        mean_uplift: 0.04,
        ci_low: 0.01,
        ci_high: 0.07,
        win_probability: 0.99,
        risk_probability: 0.01,
        risk_magnitude: 0.0002,
        verdict: uplift_core::Verdict::Won,
    };

    let (source, first) = density_for(Some(&summary), &[], &config);
    let (_, second) = density_for(Some(&summary), &[], &config);

    assert_eq!(source, DensitySource::Synthesized);
    assert_eq!(first, second);
    let curve = first.unwrap();
    assert_eq!(curve.len(), config.density.grid_points);
    assert_eq!(curve.density[0], 0.0);
}

#[test]
fn test_config_from_partial_json() {
    let config = EngineConfig::from_json(r#"{"density": {"grid_points": 64}}"#).unwrap();
    assert_eq!(config.density.grid_points, 64);
    assert_eq!(config.uplift.win_above, 0.95);

    let groups = vec![
        Group::new(1, 10.0, ramp(10.0, 1.0, 80)),
        Group::new(2, 10.5, ramp(10.5, 1.0, 80)),
    ];
    let records = compare_groups(&groups, &config);
    assert_eq!(records[0].density.as_ref().unwrap().len(), 64);
}

// === Ticks ===

#[rstest]
#[case(0, 1)]
#[case(10, 1)]
#[case(11, 5)]
#[case(30, 5)]
#[case(31, 10)]
#[case(250, 10)]
fn test_tick_step_thresholds(#[case] range: i64, #[case] step: i32) {
    assert_eq!(tick_step(range), step);
}

#[rstest]
#[case(-0.032, 0.051, vec![-3, -2, -1, 0, 1, 2, 3, 4, 5])]
#[case(-0.123, 0.08, vec![-10, -5, 0, 5])]
#[case(0.015, 0.455, vec![10, 20, 30, 40])]
fn test_percent_ticks(#[case] min: f64, #[case] max: f64, #[case] expected: Vec<i32>) {
    assert_eq!(percent_ticks(min, max).values, expected);
}

#[test]
fn test_narrow_range_is_widened() {
    assert!(percent_ticks(0.101, 0.104).len() < 2);
    assert!(widened_percent_ticks(0.101, 0.104).len() >= 2);
}

// === Properties ===

fn tick_bound() -> impl Strategy<Value = f64> {
    prop_oneof![-1.5f64..1.5, -1e9f64..1e9]
}

proptest! {
    #[test]
    fn prop_ticks_ascending_on_step(min in tick_bound(), max in tick_bound()) {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let ticks = percent_ticks(min, max);
        let span = ((hi * 100.0).floor() as i64).saturating_sub((lo * 100.0).ceil() as i64);

        prop_assert_eq!(ticks.step, tick_step(span));
        prop_assert!(ticks.len() as i64 <= MAX_TICKS);
        for pair in ticks.values.windows(2) {
            prop_assert_eq!(pair[1] - pair[0], ticks.step);
        }
        for &v in &ticks.values {
            prop_assert_eq!(v % ticks.step, 0);
            prop_assert!(v as f64 >= (lo * 100.0).ceil());
            prop_assert!(v as f64 <= (hi * 100.0).floor());
        }
    }

    #[test]
    fn prop_split_iff_straddle(
        lo in -0.5f64..0.5,
        width in 0.002f64..0.5,
        n in 4usize..200,
    ) {
        let hi = lo + width;
        let curve = bell(lo, hi, n);
        let ticks = widened_percent_ticks(lo, hi);
        prop_assume!(ticks.len() >= 2);

        let violin = build_violin(&curve, (lo + hi) / 2.0, &ticks, &ViolinConfig::default())
            .expect("violin");

        let straddles = curve.xs[0] < 0.0 && curve.xs[n - 1] > 0.0;
        let interior_zero = curve
            .xs
            .iter()
            .position(|&x| x >= 0.0)
            .map_or(false, |z| z > 0 && z < n - 1);

        prop_assert_eq!(violin.is_split(), straddles && interior_zero);
        if violin.is_split() {
            prop_assert_eq!(violin.lobes[0].tone, Tone::Loss);
            prop_assert_eq!(violin.lobes[1].tone, Tone::Gain);
        } else if curve.xs[0] >= 0.0 {
            prop_assert_eq!(violin.lobes[0].tone, Tone::Gain);
        } else {
            prop_assert_eq!(violin.lobes[0].tone, Tone::Loss);
        }
        for lobe in &violin.lobes {
            prop_assert_eq!(lobe.points.first(), lobe.points.last());
        }
    }
}
