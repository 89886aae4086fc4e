//! JSON (de)serialization of cover configurations.
//!
//! Configurations travel as flat parameter objects: `n_cubes` as an integer or
//! a per-dimension array, `limits` as `[lower, upper]` rows where `null` marks a
//! side derived from data, and the legacy names `nr_cubes` / `overlap_perc`
//! accepted on input only.

use cubical_cover::prelude::*;
use ndarray::array;
use serde_json::json;

#[test]
fn test_scalar_n_cubes_deserializes_to_uniform() {
    let config: CoverConfig<f64> =
        serde_json::from_value(json!({ "n_cubes": 15, "perc_overlap": 0.75 })).unwrap();

    assert_eq!(config.n_cubes(), &NCubes::Uniform(15));
    assert!((config.perc_overlap() - 0.75).abs() < f64::EPSILON);
    assert!(config.limits().is_none());
    assert!(config.warnings().is_empty());
}

#[test]
fn test_array_n_cubes_deserializes_per_dimension() {
    let config: CoverConfig<f64> = serde_json::from_value(json!({ "n_cubes": [2, 3] })).unwrap();
    assert_eq!(config.n_cubes(), &NCubes::PerDimension(vec![2, 3]));
}

#[test]
fn test_missing_fields_take_defaults() {
    let config: CoverConfig<f32> = serde_json::from_str("{}").unwrap();
    assert_eq!(config, CoverConfig::default());
}

#[test]
fn test_null_limit_sides_are_derived_from_data() {
    let config: CoverConfig<f64> = serde_json::from_value(json!({
        "n_cubes": 3,
        "limits": [[0.0, null]]
    }))
    .unwrap();
    assert_eq!(config.limits(), Some(&[Limit::lower_only(0.0)][..]));

    let data = array![[0.0, 0.1], [1.0, 0.5], [2.0, 0.9]];
    let layout = compute_bins(&config, data.view()).unwrap();
    assert_eq!(layout.geometry().lower_bound(), &[0.0]);
    assert_eq!(layout.geometry().upper_bound(), &[0.9]);
}

#[test]
fn test_legacy_names_are_accepted_with_warnings() {
    let config: CoverConfig<f64> = serde_json::from_value(json!({
        "n_cubes": 4,
        "nr_cubes": 6,
        "overlap_perc": 0.5
    }))
    .unwrap();

    assert_eq!(config.n_cubes(), &NCubes::Uniform(6));
    assert!((config.perc_overlap() - 0.5).abs() < f64::EPSILON);
    assert_eq!(config.warnings().len(), 2);
    assert!(
        config
            .warnings()
            .iter()
            .all(|warning| warning.is_deprecated_parameter())
    );
}

#[test]
fn test_unknown_fields_are_rejected() {
    let result = serde_json::from_value::<CoverConfig<f64>>(json!({ "n_cube": 4 }));
    assert!(result.is_err());
}

#[test]
fn test_invalid_values_are_rejected_on_deserialization() {
    let cases = [
        json!({ "limits": [[0.0, 1.0, 2.0]] }),
        json!({ "limits": [[1.0, 0.0]] }),
        json!({ "n_cubes": [2, 0] }),
        json!({ "perc_overlap": -0.1 }),
    ];
    for case in cases {
        let result = serde_json::from_value::<CoverConfig<f64>>(case.clone());
        assert!(result.is_err(), "{case} should be rejected");
    }
}

#[test]
fn test_serialization_writes_canonical_names_only() {
    #[expect(deprecated)]
    let config = CoverConfig::<f64>::builder()
        .nr_cubes([2, 5])
        .perc_overlap(0.25)
        .limits([Limit::new(0.0, 1.0), Limit::upper_only(2.0)])
        .build()
        .unwrap();

    let value = serde_json::to_value(&config).unwrap();
    assert_eq!(
        value,
        json!({
            "n_cubes": [2, 5],
            "perc_overlap": 0.25,
            "limits": [[0.0, 1.0], [null, 2.0]]
        })
    );
}

#[test]
fn test_config_survives_json() {
    let config = CoverConfig::<f64>::builder()
        .n_cubes(7)
        .perc_overlap(0.4)
        .limits([Limit::unbounded(), Limit::new(-1.0, 1.0)])
        .build()
        .unwrap();

    let text = serde_json::to_string(&config).unwrap();
    let restored: CoverConfig<f64> = serde_json::from_str(&text).unwrap();
    assert_eq!(restored, config);
}

#[test]
fn test_legacy_config_equals_its_round_trip() {
    let legacy: CoverConfig<f64> =
        serde_json::from_value(json!({ "nr_cubes": [3, 4], "overlap_perc": 0.1 })).unwrap();
    let restored: CoverConfig<f64> =
        serde_json::from_value(serde_json::to_value(&legacy).unwrap()).unwrap();

    assert_eq!(legacy.warnings().len(), 2);
    assert!(restored.warnings().is_empty());
    assert_eq!(restored, legacy);
}
