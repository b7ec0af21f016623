//! End-to-end scanning scenarios for the uscan library.
//!
//! These tests drive the public API the way a screening job would:
//! build a series, scan it, turn matches into events.

use std::collections::HashMap;

use uscan::prelude::*;

const DAY: i64 = 86_400;

fn series_from(closes: &[f64]) -> Series {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, c)| Bar::flat(i as i64 * DAY, *c))
        .collect();
    Series::new(bars).unwrap()
}

/// Falls to a trough at 2, rallies to 6, retests at 10, settles at 100
fn cup_closes(len: usize) -> Vec<f64> {
    let mut closes = vec![
        100.0, 95.0, 90.0, 95.0, 100.0, 105.0, 110.0, 105.0, 100.0, 95.0, 92.0, 95.0, 98.0,
        101.0, 103.0, 101.0,
    ];
    closes.resize(len, 100.0);
    closes
}

/// Trough 100 at 5, peak 104 at 9, deep retest 97 at 16
fn retest_closes(len: usize) -> Vec<f64> {
    let mut closes = vec![
        105.0, 104.0, 103.0, 102.0, 101.0, 100.0, 101.0, 102.0, 103.0, 104.0, 103.0, 102.0,
        101.0, 100.0, 99.0, 98.0, 97.0, 98.0, 99.0,
    ];
    closes.resize(len, 100.0);
    closes
}

fn rising(len: usize) -> Vec<f64> {
    (0..len).map(|i| 20.0 + i as f64 * 0.5).collect()
}

fn ratio_proximity_raw() -> ScanParams {
    ScanParams {
        smoothing_window: 1,
        ..ScanParams::ratio_proximity()
    }
}

// ============================================================
// CORE SCENARIOS
// ============================================================

#[test]
fn test_two_trough_finds_cup() {
    let series = series_from(&cup_closes(50));
    let result = scan(&series, &ScanParams::two_trough()).unwrap();

    assert!(!result.is_empty());
    let m = result.matches()[0];
    assert_eq!(m.trough_index, 2);
    assert_eq!(m.peak_index, 6);
    assert_eq!(m.retest_index, 10);
    assert_eq!(m.observed_index, 49);
    assert_eq!(m.window_start, 0);
    assert!((m.halfway - 100.0).abs() < 1e-6);
    assert!(m.deviation < 0.05);
}

#[test]
fn test_monotonic_series_has_no_match() {
    let series = series_from(&rising(100));

    let a = scan(&series, &ScanParams::two_trough()).unwrap();
    assert!(a.is_empty());
    assert_eq!(a.windows_scanned(), 51);

    let b = scan(&series, &ScanParams::ratio_proximity()).unwrap();
    assert!(b.is_empty());
}

#[test]
fn test_empty_series_is_an_error() {
    let series = Series::default();

    for params in [ScanParams::two_trough(), ScanParams::ratio_proximity()] {
        let err = scan(&series, &params).unwrap_err();
        assert_eq!(err, PatternError::EmptyInput);
        assert!(err.is_recoverable());
    }
}

#[test]
fn test_short_series_is_insufficient() {
    let series = series_from(&cup_closes(49));
    let err = scan(&series, &ScanParams::two_trough()).unwrap_err();
    assert_eq!(err, PatternError::InsufficientData { need: 50, got: 49 });
}

#[test]
fn test_ratio_proximity_requires_look_ahead() {
    let series = series_from(&rising(60));
    let params = ScanParams {
        window_size: 50,
        ..ScanParams::ratio_proximity()
    };
    let err = scan(&series, &params).unwrap_err();
    assert_eq!(err, PatternError::InsufficientData { need: 70, got: 60 });
}

#[test]
fn test_ratio_proximity_finds_retest() {
    let series = series_from(&retest_closes(70));
    let result = scan(&series, &ratio_proximity_raw()).unwrap();

    assert_eq!(result.policy(), PolicyId("RATIO_PROXIMITY"));
    assert_eq!(result.matches().len(), 1);
    assert_eq!(result.matches()[0].indices(), (5, 9, 16, 16));
}

#[test]
fn test_ratio_proximity_stops_at_first_match() {
    let mut closes = vec![105.0; 10];
    closes.extend(retest_closes(70));
    let series = series_from(&closes);

    let result = scan(&series, &ratio_proximity_raw()).unwrap();

    // Window 0 sees the trough at its 15th bar, just past the opening span
    assert_eq!(result.windows_scanned(), 2);
    assert_eq!(result.matches().len(), 1);
    let m = result.matches()[0];
    assert_eq!(m.window_start, 1);
    assert_eq!(m.indices(), (15, 19, 26, 26));
}

#[test]
fn test_equal_trough_and_peak_is_degenerate() {
    let mut closes = vec![7.0, 6.0, 5.0, 6.0, 7.0, 7.0, 4.0, 3.0, 5.0, 4.0, 3.0, 2.0, 3.0];
    closes.resize(70, 4.0);

    let matcher = ratio_proximity_raw().matcher().unwrap();
    let err = matcher.match_window(&closes, 0).unwrap_err();
    assert_eq!(err, PatternError::DegenerateRatio { index: 8 });

    // The scan skips the window instead of failing
    let series = series_from(&closes);
    let result = scan(&series, &ratio_proximity_raw()).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.degenerate_windows(), 1);
}

#[test]
fn test_at_or_below_accepts_low_close() {
    let mut closes = cup_closes(50);
    closes[47] = 80.0;
    closes[48] = 80.0;
    closes[49] = 80.0;
    let series = series_from(&closes);

    let within = scan(&series, &ScanParams::two_trough()).unwrap();
    assert!(within.is_empty());

    let params = ScanParams {
        policy: Policy::TwoTroughAtOrBelow,
        ..ScanParams::two_trough()
    };
    let below = scan(&series, &params).unwrap();
    assert_eq!(below.matches().len(), 1);
    assert_eq!(below.matches()[0].observed_value, 80.0);
}

#[test]
fn test_scan_result_exposes_smoothed_series() {
    let series = series_from(&cup_closes(50));
    let result = scan(&series, &ScanParams::two_trough()).unwrap();

    assert_eq!(result.smoothed().len(), series.len());
    assert_eq!(result.smoothed().window(), 3);
    assert!(std::ptr::eq(result.series(), &series));
}

// ============================================================
// SERIES CONSTRUCTION
// ============================================================

#[test]
fn test_unsorted_timestamps_rejected() {
    let bars = vec![Bar::flat(2 * DAY, 10.0), Bar::flat(DAY, 10.0)];
    assert_eq!(
        Series::new(bars).unwrap_err(),
        PatternError::UnsortedTimestamps { index: 1 }
    );
}

#[test]
fn test_incomplete_bars_dropped_before_scan() {
    let mut bars: Vec<PartialBar> = cup_closes(50)
        .iter()
        .enumerate()
        .map(|(i, c)| PartialBar::from(Bar::flat(i as i64 * DAY, *c)))
        .collect();
    bars.push(PartialBar {
        timestamp: 50 * DAY,
        close: None,
        ..PartialBar::from(Bar::flat(50 * DAY, 100.0))
    });

    let series = Series::from_partial(bars).unwrap();
    assert_eq!(series.len(), 50);

    let result = scan(&series, &ScanParams::two_trough()).unwrap();
    assert_eq!(result.matches()[0].peak_index, 6);
}

// ============================================================
// MULTI-INSTRUMENT
// ============================================================

#[test]
fn test_scan_parallel_preserves_order_and_skips_errors() {
    let scanner = ScannerBuilder::from_params(&ScanParams::two_trough())
        .unwrap()
        .build()
        .unwrap();

    let cup = series_from(&cup_closes(80));
    let up = series_from(&rising(80));
    let empty = Series::default();
    let short = series_from(&rising(20));

    let instruments: Vec<(&str, &Series)> = vec![
        ("CUP", &cup),
        ("EMPTY", &empty),
        ("UP", &up),
        ("SHORT", &short),
    ];
    let (results, errors) = scan_parallel(&scanner, instruments);

    let symbols: Vec<&str> = results.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["CUP", "UP"]);
    assert!(!results[0].result.is_empty());
    assert!(results[1].result.is_empty());

    let failed: Vec<&str> = errors.iter().map(|e| e.symbol.as_str()).collect();
    assert_eq!(failed, vec!["EMPTY", "SHORT"]);
    assert!(errors.iter().all(|e| e.error.is_recoverable()));
}

#[test]
fn test_parallel_matches_sequential_across_thread_counts() {
    let scanner = ScannerBuilder::new()
        .with_two_trough_defaults()
        .build()
        .unwrap();

    let all: Vec<Series> = (0..8)
        .map(|k| {
            let mut closes = vec![100.0 + k as f64; k * 3];
            closes.extend(cup_closes(60));
            series_from(&closes)
        })
        .collect();
    let names: Vec<String> = (0..all.len()).map(|k| format!("SYM{k}")).collect();
    let instruments: Vec<(&str, &Series)> =
        names.iter().map(|n| n.as_str()).zip(all.iter()).collect();

    let (sequential, _) = scan_all(&scanner, instruments.clone());
    let expected: Vec<Vec<PatternMatch>> = sequential
        .iter()
        .map(|r| r.result.matches().to_vec())
        .collect();

    for threads in [1, 4] {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();
        let (parallel, errors) = pool.install(|| scan_parallel(&scanner, instruments.clone()));
        assert!(errors.is_empty());

        let got: Vec<Vec<PatternMatch>> = parallel
            .iter()
            .map(|r| r.result.matches().to_vec())
            .collect();
        assert_eq!(got, expected);
    }
}

// ============================================================
// CONFIGURATION
// ============================================================

#[test]
fn test_scan_params_json() {
    let params: ScanParams =
        serde_json::from_str(r#"{"policy":"two_trough_at_or_below","tolerance":0.02}"#).unwrap();
    assert_eq!(params.policy, Policy::TwoTroughAtOrBelow);
    assert_eq!(params.window_size, 50);
    assert_eq!(params.smoothing_window, 3);
    assert!(params.validate().is_ok());

    let json = serde_json::to_string(&ScanParams::ratio_proximity()).unwrap();
    let back: ScanParams = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ScanParams::ratio_proximity());
}

#[test]
fn test_invalid_params_rejected_at_build() {
    let params = ScanParams {
        window_size: 6,
        ..ScanParams::two_trough()
    };
    assert!(matches!(
        ScannerBuilder::from_params(&params).unwrap().build(),
        Err(PatternError::InvalidConfig(_))
    ));

    let params = ScanParams {
        tolerance: 1.5,
        ..ScanParams::two_trough()
    };
    assert!(matches!(
        ScannerBuilder::from_params(&params),
        Err(PatternError::OutOfRange { .. })
    ));
}

#[test]
fn test_matcher_from_param_grid() {
    let meta = TwoTroughMatcher::param_meta();
    let windows = meta
        .iter()
        .find(|m| m.name == "window_size")
        .unwrap()
        .generate_grid();
    assert!(!windows.is_empty());

    let series = series_from(&cup_closes(100));
    for window in windows {
        let mut params = HashMap::new();
        params.insert("window_size", window);
        let matcher = TwoTroughMatcher::with_params(&params).unwrap();
        let scanner = ScannerBuilder::new()
            .matcher(BuiltinMatcher::TwoTrough(matcher))
            .build()
            .unwrap();

        let result = scanner.scan(&series).unwrap();
        assert!(result.matches().iter().all(|m| m.is_ordered()));
    }
}

// ============================================================
// DOWNSTREAM CONSUMERS
// ============================================================

#[test]
fn test_match_to_alert() {
    let mut closes = cup_closes(50);
    closes[48] = 98.0;
    closes[49] = 99.0;
    let series = series_from(&closes);

    let result = scan(&series, &ScanParams::two_trough()).unwrap();
    let m = result.latest().unwrap();

    let ts = series.locate(m).unwrap();
    assert_eq!(ts.trough, 2 * DAY);
    assert_eq!(ts.observed, 49 * DAY);

    let event = MatchEvent::from_match("ACME", &series, m).unwrap();
    assert_eq!(event.observed_price, 99.0);
    assert!((event.percent_change - (1.0 / 98.0 * 100.0)).abs() < 1e-9);

    let mut ledger = AlertLedger::new();
    let fresh = ledger
        .filter_fresh(vec![event.clone(), event.clone()])
        .unwrap();
    assert_eq!(fresh.len(), 1);
    assert!(ledger.filter_fresh(vec![event]).unwrap().is_empty());

    let shares = PositionLimits::default().shares_at(99.0).unwrap();
    assert_eq!(shares, 5);
}
