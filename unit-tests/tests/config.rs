//! Integration tests for configuration, merging and easing helpers.

use myrtio_dimmer::{ConfigError, DimConfig, DimConfigUpdate, easing};

// -----------------------------------------------------------------------------
// DimConfig
// -----------------------------------------------------------------------------

#[test]
fn default_config_matches_node_defaults() {
    let config = DimConfig::default();

    assert_eq!(config.tick_interval_ms, 200);
    assert_eq!(config.min_value, 0.0);
    assert_eq!(config.max_value, 100.0);
    assert_eq!(config.step_fraction, 0.1);
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn zero_interval_is_rejected() {
    assert_eq!(
        DimConfig::new(0, 0.0, 100.0, 0.1),
        Err(ConfigError::ZeroTickInterval)
    );
}

#[test]
fn inverted_bounds_are_rejected() {
    assert_eq!(
        DimConfig::new(10, 60.0, 40.0, 0.1),
        Err(ConfigError::InvertedBounds {
            min: 60.0,
            max: 40.0
        })
    );
    assert!(matches!(
        DimConfig::new(10, f64::NAN, 40.0, 0.1),
        Err(ConfigError::InvertedBounds { .. })
    ));
}

#[test]
fn equal_bounds_are_accepted() {
    let config = DimConfig::new(10, 40.0, 40.0, 0.1).unwrap();

    assert_eq!(config.clamp_value(0.0), 40.0);
    assert_eq!(config.clamp_value(100.0), 40.0);
}

#[test]
fn non_positive_step_is_rejected() {
    assert_eq!(
        DimConfig::new(10, 0.0, 1.0, 0.0),
        Err(ConfigError::InvalidStep(0.0))
    );
    assert_eq!(
        DimConfig::new(10, 0.0, 1.0, -0.5),
        Err(ConfigError::InvalidStep(-0.5))
    );
    assert!(DimConfig::new(10, 0.0, 1.0, f64::INFINITY).is_err());
}

#[test]
fn tick_interval_converts_to_duration() {
    let config = DimConfig::new(35, 0.0, 1.0, 0.5).unwrap();

    assert_eq!(config.tick_interval().as_millis(), 35);
}

#[test]
fn config_error_messages() {
    assert_eq!(
        ConfigError::ZeroTickInterval.to_string(),
        "tick interval must be greater than zero"
    );
    assert_eq!(
        ConfigError::InvertedBounds { min: 5.0, max: 1.0 }.to_string(),
        "min value 5 is greater than max value 1"
    );
}

// -----------------------------------------------------------------------------
// DimConfigUpdate
// -----------------------------------------------------------------------------

#[test]
fn empty_update_changes_nothing() {
    let update = DimConfigUpdate::new();
    let config = DimConfig::default();

    assert!(update.is_empty());
    assert_eq!(config.merged(&update), Ok(config));
}

#[test]
fn present_fields_overwrite_absent_fields_stay() {
    let update = DimConfigUpdate::new()
        .with_tick_interval_ms(20)
        .with_max_value(255.0);

    let merged = DimConfig::default().merged(&update).unwrap();

    assert!(!update.is_empty());
    assert_eq!(merged.tick_interval_ms, 20);
    assert_eq!(merged.max_value, 255.0);
    assert_eq!(merged.min_value, 0.0);
    assert_eq!(merged.step_fraction, 0.1);
}

#[test]
fn steps_set_the_step_fraction() {
    let update = DimConfigUpdate::new().with_steps(4.0);

    assert_eq!(update.step_fraction, Some(0.25));
}

#[test]
fn merge_validates_the_result() {
    let update = DimConfigUpdate::new().with_min_value(150.0);

    assert_eq!(
        DimConfig::default().merged(&update),
        Err(ConfigError::InvertedBounds {
            min: 150.0,
            max: 100.0
        })
    );
}

#[test]
fn apply_to_mutates_in_place() {
    let mut config = DimConfig::default();

    DimConfigUpdate::new()
        .with_min_value(5.0)
        .with_step_fraction(0.5)
        .apply_to(&mut config);

    assert_eq!(config.min_value, 5.0);
    assert_eq!(config.step_fraction, 0.5);
}

// -----------------------------------------------------------------------------
// Easing
// -----------------------------------------------------------------------------

#[test]
fn round3_rounds_half_away_from_zero() {
    assert_eq!(easing::round3(1.23456), 1.235);
    assert_eq!(easing::round3(-1.23456), -1.235);
    assert_eq!(easing::round3(2.0004), 2.0);
    assert_eq!(easing::round3(30.000_000_000_000_004), 30.0);
    assert_eq!(easing::round3(99.999_999_999_999_99), 100.0);
}

#[test]
fn round3_passes_non_finite_values_through() {
    assert!(easing::round3(f64::NAN).is_nan());
    assert_eq!(easing::round3(f64::INFINITY), f64::INFINITY);
    assert_eq!(easing::round3(1e300), 1e300);
}

#[test]
fn curves_span_the_unit_range() {
    for ease in [easing::linear, easing::quad_in_out, easing::cubic_in_out] {
        assert_eq!(ease(0.0), 0.0);
        assert_eq!(ease(1.0), 1.0);
        assert_eq!(ease(0.5), 0.5);
    }
}

#[test]
fn curves_are_monotonic() {
    for ease in [easing::linear, easing::quad_in_out, easing::cubic_in_out] {
        let mut last = ease(0.0);
        for i in 1..=100 {
            let value = ease(f64::from(i) / 100.0);
            assert!(value >= last);
            last = value;
        }
    }
}
