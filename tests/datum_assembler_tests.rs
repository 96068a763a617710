use indexmap::IndexMap;
use serde_json::json;
use series_fit_rs::core::{
    FitConfig, FitKind, FitStrategy, RawDataSeries, RawDataSeriesDatum, ScalarValue, ScaleKind,
    assemble_series, fit_series, index_domain,
};

fn raw_series(data: Vec<RawDataSeriesDatum>) -> RawDataSeries {
    RawDataSeries {
        spec_id: "spec1".to_owned(),
        series_keys: vec!["spec1".to_owned()],
        y_accessor: "y".to_owned(),
        split_accessors: IndexMap::new(),
        key: "spec1".to_owned(),
        data,
    }
}

fn assemble(series: &RawDataSeries, strategy: FitStrategy) -> series_fit_rs::core::DataSeries {
    let bound = std::slice::from_ref(series);
    let index = index_domain(bound, ScaleKind::Auto).expect("indexing");
    let fits = fit_series(&index.aligned[0], FitConfig::uniform(strategy));
    assemble_series(series, &index.domain, &index.aligned[0], &fits)
}

#[test]
fn initial_values_copy_pre_fit_values() {
    let series = raw_series(vec![
        RawDataSeriesDatum::new(1.0, Some(3.0)),
        RawDataSeriesDatum::new(2.0, None),
        RawDataSeriesDatum::new(3.0, Some(5.0)),
    ]);

    let fitted = assemble(&series, FitStrategy::Carry);

    // Originally present: initial equals the fitted value, nothing flagged.
    assert_eq!(fitted.data[0].initial_y1, Some(3.0));
    assert_eq!(fitted.data[0].y1, Some(3.0));
    assert!(!fitted.data[0].filled.any());

    // Filled: initial stays null while the fitted value resolves.
    assert_eq!(fitted.data[1].initial_y1, None);
    assert_eq!(fitted.data[1].y1, Some(3.0));
    let fill = fitted.data[1].filled.y1.expect("y1 was filled");
    assert_eq!(fill.strategy, FitKind::Carry);
    assert_eq!(fill.donor, Some(0));
}

#[test]
fn datum_field_keeps_only_original_records() {
    let record = json!({ "x": 1, "y": 3.0 });
    let series = raw_series(vec![
        RawDataSeriesDatum::new(1.0, Some(3.0)).with_datum(record.clone()),
    ]);
    let other = raw_series(vec![
        RawDataSeriesDatum::new(1.0, Some(1.0)),
        RawDataSeriesDatum::new(2.0, Some(2.0)),
    ]);

    let bound = vec![series, other];
    let index = index_domain(&bound, ScaleKind::Auto).expect("indexing");
    let fits = fit_series(&index.aligned[0], FitConfig::uniform(FitStrategy::Carry));
    let fitted = assemble_series(&bound[0], &index.domain, &index.aligned[0], &fits);

    // x=1 was observed, x=2 exists only in the unified domain.
    assert_eq!(fitted.data[0].datum, Some(record));
    assert_eq!(fitted.data[1].y1, Some(3.0));
    assert_eq!(fitted.data[1].datum, None);
}

#[test]
fn full_datum_filter_and_fitting_index_under_carry() {
    let series = raw_series(vec![
        RawDataSeriesDatum::new(1.0, None),
        RawDataSeriesDatum::new(2.0, Some(5.0)),
        RawDataSeriesDatum::new(3.0, None),
    ]);

    let fitted = assemble(&series, FitStrategy::Carry);
    let full = fitted.full_data();

    assert_eq!(full.len(), 2);
    assert_eq!(full[0].x, ScalarValue::Num(2.0));
    assert_eq!(full[0].y1, 5.0);
    assert_eq!(full[0].fitting_index, 1);
    assert_eq!(full[1].x, ScalarValue::Num(3.0));
    assert_eq!(full[1].y1, 5.0);
    assert_eq!(full[1].fitting_index, 1);
}

#[test]
fn empty_flag_set_when_no_full_datum_survives() {
    let series = raw_series(vec![
        RawDataSeriesDatum::new(1.0, None),
        RawDataSeriesDatum::new(2.0, None),
    ]);

    let fitted = assemble(&series, FitStrategy::None);

    assert!(fitted.empty);
    // The series is retained, not dropped.
    assert_eq!(fitted.data.len(), 2);
    assert!(fitted.full_data().is_empty());
}

#[test]
fn empty_flag_clears_once_fitting_resolves_a_value() {
    let series = raw_series(vec![
        RawDataSeriesDatum::new(1.0, None),
        RawDataSeriesDatum::new(2.0, None),
    ]);

    let fitted = assemble(&series, FitStrategy::Zero);

    assert!(!fitted.empty);
    assert_eq!(fitted.full_data().len(), 2);
}

#[test]
fn constant_fill_reports_own_position_as_fitting_index() {
    let series = raw_series(vec![
        RawDataSeriesDatum::new(1.0, None),
        RawDataSeriesDatum::new(2.0, Some(4.0)),
    ]);

    let fitted = assemble(&series, FitStrategy::Zero);
    let full = fitted.full_data();

    assert_eq!(full[0].y1, 0.0);
    assert_eq!(full[0].fitting_index, 0);
    assert_eq!(full[1].fitting_index, 1);
}

#[test]
fn identity_metadata_carries_over_unchanged() {
    let mut splits = IndexMap::new();
    splits.insert("region".to_owned(), ScalarValue::Str("eu".to_owned()));
    let series = RawDataSeries {
        spec_id: "spec9".to_owned(),
        series_keys: vec!["eu".to_owned()],
        y_accessor: "cpu".to_owned(),
        split_accessors: splits.clone(),
        key: "eu".to_owned(),
        data: vec![RawDataSeriesDatum::new(1.0, Some(1.0))],
    };

    let bound = std::slice::from_ref(&series);
    let index = index_domain(bound, ScaleKind::Auto).expect("indexing");
    let fits = fit_series(&index.aligned[0], FitConfig::default());
    let fitted = assemble_series(&series, &index.domain, &index.aligned[0], &fits);

    assert_eq!(fitted.spec_id, "spec9");
    assert_eq!(fitted.series_keys, vec!["eu".to_owned()]);
    assert_eq!(fitted.y_accessor, "cpu");
    assert_eq!(fitted.split_accessors, splits);
    assert_eq!(fitted.key, "eu");
}

#[test]
fn y0_channel_is_fitted_independently() {
    let series = raw_series(vec![
        RawDataSeriesDatum::new(1.0, Some(10.0)).with_y0(Some(2.0)),
        RawDataSeriesDatum::new(2.0, Some(12.0)),
        RawDataSeriesDatum::new(3.0, Some(14.0)).with_y0(Some(6.0)),
    ]);

    let fitted = assemble(&series, FitStrategy::Average);

    assert_eq!(fitted.data[1].y0, Some(4.0));
    assert_eq!(fitted.data[1].initial_y0, None);
    assert_eq!(
        fitted.data[1].filled.y0.expect("y0 filled").strategy,
        FitKind::Average
    );
    assert_eq!(fitted.data[0].initial_y0, Some(2.0));
    assert_eq!(fitted.data[0].y0, Some(2.0));
}
