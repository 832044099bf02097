//! Windowed calculations over the saved IBM daily history.

use std::sync::Arc;

use alphav::math::round_to;
use alphav::{
    Builtin, Calculations, CancellationToken, DailyInformation, DailyOptions, DailySeries,
    DataError, Session, WindowAverage, WindowChange, WindowFunction, WindowOptions,
    WindowPercentageChange,
    compute, compute_by_name, parse,
};
use approx::assert_relative_eq;
use chrono::{TimeZone, Utc};

const IBM_HISTORY: &str = include_str!("../../alphav-client/testdata/ibm_history.json");

fn history() -> DailySeries {
    parse::daily(IBM_HISTORY, &DailyOptions::new().with_full_history(true)).unwrap()
}

fn limited(limit: i64) -> WindowOptions {
    WindowOptions::new()
        .with_element_processing_limit(limit)
        .unwrap()
}

#[test]
fn average_over_full_history() {
    let data = history();
    let calcs = Calculations::new().with("Average", WindowAverage);
    let result = compute(
        &data,
        1,
        DailyInformation::AdjustedClose,
        &calcs,
        WindowOptions::new(),
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(result.get("Average").unwrap().len(), data.len() - 1);
}

#[test]
fn single_day_change() {
    let data = history();
    let calcs = Calculations::new()
        .with("Change", WindowChange)
        .with("PercentageChange", WindowPercentageChange);
    let result = compute(
        &data,
        1,
        DailyInformation::AdjustedClose,
        &calcs,
        limited(1),
        &CancellationToken::new(),
    )
    .unwrap();

    let change = result.get("Change").unwrap();
    assert_eq!(change.len(), 1);
    assert_eq!(
        change[0].window_start,
        Utc.with_ymd_and_hms(2025, 8, 19, 0, 0, 0).unwrap()
    );
    assert_eq!(round_to(change[0].value, 2), 1.83);

    let pct = result.get("PercentageChange").unwrap();
    assert_eq!(round_to(pct[0].value, 2), 0.76);
}

#[test]
fn fifteen_day_change() {
    let data = history();
    let calcs = Calculations::new()
        .with_builtin("change", Builtin::Change)
        .with_builtin("pct", Builtin::PercentageChange);
    let result = compute(
        &data,
        15,
        DailyInformation::AdjustedClose,
        &calcs,
        limited(30),
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(result.len(), 30);
    assert_eq!(round_to(result.get("change").unwrap()[0].value, 2), -19.32);
    assert_eq!(round_to(result.get("pct").unwrap()[0].value, 2), -7.41);
}

#[test]
fn limit_clamped_to_usable_offsets() {
    let data = history();
    let calcs = Calculations::new().with_builtin("avg", Builtin::Average);
    let result = compute(
        &data,
        15,
        DailyInformation::AdjustedClose,
        &calcs,
        limited(10_000),
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(result.len(), data.len() - 15);
    assert_eq!(
        result.meta.options.element_processing_limit,
        Some(data.len() - 15)
    );
}

#[test]
fn zero_limit_yields_empty_sequences() {
    let data = history();
    let calcs = Calculations::new().with_builtin("avg", Builtin::Average);
    let result = compute(
        &data,
        5,
        DailyInformation::AdjustedClose,
        &calcs,
        limited(0),
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(result.len(), 0);
    assert!(result.get("avg").unwrap().is_empty());
    assert_eq!(result.meta.options.element_processing_limit, Some(0));
}

#[test]
fn average_matches_manual_mean() {
    let data = history();
    let calcs = Calculations::new().with_builtin("avg", Builtin::Average);
    let result = compute(
        &data,
        5,
        DailyInformation::Close,
        &calcs,
        limited(3),
        &CancellationToken::new(),
    )
    .unwrap();

    for (offset, e) in result.get("avg").unwrap().iter().enumerate() {
        let expected: f64 = (offset..offset + 5)
            .map(|i| data.value(i, DailyInformation::Close).unwrap())
            .sum::<f64>()
            / 5.0;
        assert_relative_eq!(e.value, expected, epsilon = 1e-9);
        assert_eq!(e.window_start, data.elements[offset].timestamp);
    }
}

#[test]
fn information_type_by_name() {
    let data = history();
    let calcs = Calculations::new().with_builtin("change", Builtin::Change);
    let cancel = CancellationToken::new();

    let result =
        compute_by_name(&data, 1, "5. adjusted close", &calcs, limited(1), &cancel).unwrap();
    assert_eq!(round_to(result.get("change").unwrap()[0].value, 2), 1.83);

    let err = compute_by_name(&data, 1, "turnover", &calcs, limited(1), &cancel).unwrap_err();
    assert!(matches!(err, DataError::InvalidInformationType(_)));
}

#[test]
fn unrequested_information_type() {
    let options = DailyOptions::new()
        .with_information(&[DailyInformation::Close])
        .unwrap();
    let data = parse::daily(IBM_HISTORY, &options).unwrap();
    let calcs = Calculations::new().with_builtin("avg", Builtin::Average);

    let err = compute(
        &data,
        1,
        DailyInformation::AdjustedClose,
        &calcs,
        WindowOptions::new(),
        &CancellationToken::new(),
    )
    .unwrap_err();
    assert!(matches!(err, DataError::MissingInformationType(_)));
}

#[test]
fn window_longer_than_series_is_rejected() {
    let data = history();
    let calcs = Calculations::new().with_builtin("avg", Builtin::Average);
    let err = compute(
        &data,
        data.len() + 1,
        DailyInformation::AdjustedClose,
        &calcs,
        WindowOptions::new(),
        &CancellationToken::new(),
    )
    .unwrap_err();
    assert!(matches!(err, DataError::InvalidWindowLength { .. }));
}

#[test]
fn concurrent_calculations_share_one_series() {
    let data = Arc::new(history());
    let handles: Vec<_> = (1..=4)
        .map(|window_length| {
            let data = Arc::clone(&data);
            std::thread::spawn(move || {
                let calcs = Calculations::new().with_builtin("avg", Builtin::Average);
                compute(
                    &data,
                    window_length,
                    DailyInformation::AdjustedClose,
                    &calcs,
                    WindowOptions::new(),
                    &CancellationToken::new(),
                )
                .map(|r| r.len())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap().unwrap(), data.len() - (i + 1));
    }
}

#[tokio::test]
async fn session_timeout_cancels_calculation() {
    let data = Arc::new(history());
    let cancel = CancellationToken::new();
    let calcs = Calculations::new().with(
        "slow",
        |s: &DailySeries, offset: usize, len: usize, tag: DailyInformation| {
            std::thread::sleep(std::time::Duration::from_millis(20));
            WindowAverage.compute(s, offset, len, tag)
        },
    );

    let deadline = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        deadline.cancel();
    });

    let err = Session::new()
        .windowed(
            data,
            1,
            DailyInformation::AdjustedClose,
            calcs,
            WindowOptions::new(),
            cancel,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::ContextEnded));
}
