use serde_json::json;
use series_fit_rs::core::{DedupePolicy, FitStrategy, MalformedPolicy, ScalarValue, XDomain};
use series_fit_rs::error::SeriesError;
use series_fit_rs::{SeriesConfig, SeriesEngine};

fn config() -> SeriesConfig {
    SeriesConfig::new("spec1", "x", "y", DedupePolicy::LastWins)
}

#[test]
fn end_to_end_carry_fit_over_unified_domain() {
    let records = vec![
        json!({ "x": 1, "y": null }),
        json!({ "x": 2, "y": 5.0 }),
        json!({ "x": 3, "y": null }),
    ];
    let engine = SeriesEngine::new(config().with_fit_function(FitStrategy::Carry))
        .expect("engine init");

    let output = engine.run(&records).expect("run");

    assert_eq!(output.domain, XDomain::Continuous(vec![1.0, 2.0, 3.0]));
    assert_eq!(output.series.len(), 1);
    let series = &output.series[0];
    assert_eq!(series.key, "spec1");
    assert_eq!(series.data[0].y1, None);
    assert_eq!(series.data[1].y1, Some(5.0));
    assert_eq!(series.data[2].y1, Some(5.0));
    assert_eq!(series.data[2].initial_y1, None);

    let full = series.full_data();
    assert_eq!(full.len(), 2);
    assert_eq!(full[1].fitting_index, 1);
}

#[test]
fn split_series_share_the_unified_domain() {
    let records = vec![
        json!({ "x": 1, "y": 2.0, "g": "a" }),
        json!({ "x": 3, "y": 10.0, "g": "a" }),
        json!({ "x": 2, "y": 4.0, "g": "b" }),
    ];
    let engine = SeriesEngine::new(
        config()
            .with_split_accessors(vec!["g".to_owned()])
            .with_fit_function(FitStrategy::Average),
    )
    .expect("engine init");

    let output = engine.run(&records).expect("run");

    assert_eq!(output.domain, XDomain::Continuous(vec![1.0, 2.0, 3.0]));
    assert_eq!(output.series.len(), 2);
    // Series "a" never reported x=2; average fills the interior gap.
    assert_eq!(output.series[0].key, "a");
    assert_eq!(output.series[0].data[1].y1, Some(6.0));
    assert_eq!(output.series[0].data[1].datum, None);
    // Series "b" only resolves x=2; edge gaps stay unfilled.
    assert_eq!(output.series[1].key, "b");
    assert_eq!(output.series[1].data[0].y1, None);
    assert_eq!(output.series[1].data[2].y1, None);
}

#[test]
fn ordinal_records_run_end_to_end() {
    let records = vec![
        json!({ "x": "a", "y": 1.0 }),
        json!({ "x": "c", "y": 3.0 }),
        json!({ "x": "b", "y": 2.0 }),
    ];
    let engine = SeriesEngine::new(config()).expect("engine init");

    let output = engine.run(&records).expect("run");

    assert_eq!(
        output.domain,
        XDomain::Ordinal(vec![
            ScalarValue::Str("a".to_owned()),
            ScalarValue::Str("c".to_owned()),
            ScalarValue::Str("b".to_owned()),
        ])
    );
}

#[test]
fn unknown_strategy_identifier_fails_before_any_data() {
    let err = config()
        .with_fit_function_id("bogus", None)
        .expect_err("unknown id must fail");
    assert!(matches!(err, SeriesError::UnknownFitStrategy(_)));
}

#[test]
fn strategy_identifiers_resolve_through_config() {
    let config = config()
        .with_fit_function_id("explicit", Some(7.0))
        .expect("explicit id resolves");
    assert_eq!(config.fit.default, FitStrategy::Explicit { value: 7.0 });
}

#[test]
fn engine_rejects_structurally_invalid_config() {
    let err = SeriesEngine::new(config().with_y_accessors(Vec::new()))
        .expect_err("empty y accessors must fail");
    assert!(matches!(err, SeriesError::InvalidConfig(_)));

    let err = SeriesEngine::new(
        config().with_y0_accessors(vec!["low".to_owned(), "extra".to_owned()]),
    )
    .expect_err("mismatched y0 accessors must fail");
    assert!(matches!(err, SeriesError::InvalidConfig(_)));
}

#[test]
fn malformed_records_surface_in_stats() {
    let records = vec![
        json!({ "x": 1 }),
        json!({ "x": 2, "y": 5.0 }),
        json!({ "y": 7.0 }),
    ];
    let engine = SeriesEngine::new(config()).expect("engine init");

    let output = engine.run(&records).expect("run");

    assert_eq!(output.stats.records, 3);
    assert_eq!(output.stats.malformed_skipped, 2);
    assert_eq!(output.series[0].data.len(), 1);
}

#[test]
fn abort_policy_propagates_from_the_store() {
    let records = vec![json!({ "x": 1 })];
    let engine = SeriesEngine::new(config().with_malformed_policy(MalformedPolicy::Abort))
        .expect("engine init");

    let err = engine.run(&records).expect_err("abort must fail");
    assert!(matches!(err, SeriesError::MalformedDatum { .. }));
}

#[test]
fn empty_input_yields_empty_output() {
    let engine = SeriesEngine::new(config()).expect("engine init");
    let output = engine.run(&[]).expect("run");
    assert!(output.series.is_empty());
    assert!(output.domain.is_empty());
    assert_eq!(output.stats.records, 0);
}

#[test]
fn config_round_trips_through_json() {
    let config = config()
        .with_split_accessors(vec!["g".to_owned()])
        .with_mark_accessor("size")
        .with_fit_function(FitStrategy::Linear);

    let encoded = config.to_json_pretty().expect("serialize");
    let decoded = SeriesConfig::from_json_str(&encoded).expect("parse");
    assert_eq!(decoded, config);
}

#[test]
fn identical_runs_produce_identical_output() {
    let records = vec![
        json!({ "x": 3, "y": 1.0, "g": "a" }),
        json!({ "x": 1, "y": null, "g": "b" }),
        json!({ "x": 2, "y": 2.5, "g": "a" }),
    ];
    let engine = SeriesEngine::new(
        config()
            .with_split_accessors(vec!["g".to_owned()])
            .with_fit_function(FitStrategy::Linear),
    )
    .expect("engine init");

    let first = engine.run(&records).expect("first run");
    let second = engine.run(&records).expect("second run");
    assert_eq!(first.series, second.series);
    assert_eq!(first.domain, second.domain);
}
