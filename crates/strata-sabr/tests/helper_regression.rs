//! Regression cases for the percent-unit helper.
//!
//! | Case | Mode | Query |
//! |------|------|-------|
//! | 3m × 0.25y | ATM | strike 2% |
//! | 6m × 1y | ATM | strike 0.03% |
//! | 20y × 1y | full smile, 14-column asset grid | strike 7% |
//! | 6m × 1y | full smile, 10-column asset grid | strike 2.5% |
//! | 6M × 1y | full smile, multi-tenor vol grid | nine strikes |

use approx::assert_relative_eq;
use strata_sabr::prelude::*;

const SETTINGS: &str = "AUD swaptions";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn helper() -> SabrHelper {
    let helper = SabrHelper::default();
    let handle = helper
        .add_sabr_calibration_settings(SETTINGS, "Swaption", "AUD", 1.0)
        .unwrap();
    assert_eq!(handle, SETTINGS);
    helper
}

fn header(cells: &[&str]) -> Vec<GridCell> {
    cells.iter().map(|&c| GridCell::from(c)).collect()
}

fn numeric_header(first: &str, tenors: &[f64]) -> Vec<GridCell> {
    std::iter::once(GridCell::from(first))
        .chain(tenors.iter().map(|&t| GridCell::from(t)))
        .collect()
}

fn row(label: &str, values: &[f64]) -> Vec<GridCell> {
    std::iter::once(GridCell::from(label))
        .chain(values.iter().map(|&v| GridCell::from(v)))
        .collect()
}

const SHORT: [f64; 14] = [
    7.23, 7.10, 7.12, 7.16, 7.15, 7.13, 7.12, 7.11, 7.11, 7.10, 7.10, 7.00, 7.00, 7.00,
];
const FLAT: [f64; 14] = [6.71; 14];

fn asset_rows() -> Vec<(&'static str, [f64; 14])> {
    let y5 = [
        7.01, 7.00, 7.01, 7.05, 7.04, 7.02, 7.00, 6.97, 6.94, 6.92, 6.92, 6.71, 6.71, 6.71,
    ];
    let y8 = [
        6.71, 6.71, 6.71, 6.71, 6.71, 6.71, 6.71, 6.71, 6.71, 6.71, 6.92, 6.71, 6.71, 6.71,
    ];
    vec![
        ("0m", SHORT),
        ("1m", SHORT),
        ("2m", SHORT),
        ("3m", SHORT),
        ("6m", SHORT),
        (
            "1y",
            [7.01, 7.01, 7.08, 7.11, 7.11, 7.09, 7.09, 7.08, 7.08, 7.06, 7.06, 6.97, 6.97, 6.97],
        ),
        (
            "2y",
            [7.00, 7.10, 7.09, 7.12, 7.10, 7.10, 7.09, 7.08, 7.07, 7.05, 7.05, 6.92, 6.92, 6.92],
        ),
        (
            "3y",
            [7.21, 7.13, 7.10, 7.12, 7.11, 7.10, 7.09, 7.07, 7.05, 7.02, 7.02, 6.87, 6.87, 6.87],
        ),
        (
            "4y",
            [7.02, 7.03, 7.01, 7.06, 7.06, 7.05, 7.03, 7.01, 6.98, 6.96, 6.96, 6.79, 6.79, 6.79],
        ),
        ("5y", y5),
        ("6y", y5),
        (
            "7y",
            [7.02, 7.01, 7.00, 7.01, 6.97, 6.94, 6.91, 6.87, 6.82, 6.78, 6.92, 6.50, 6.71, 6.71],
        ),
        ("8y", y8),
        ("9y", y8),
        (
            "10y",
            [6.83, 6.79, 6.76, 6.77, 6.74, 6.68, 6.62, 6.56, 6.50, 6.45, 6.92, 6.08, 6.71, 6.71],
        ),
        (
            "12y",
            [6.69, 6.65, 6.61, 6.58, 6.51, 6.45, 6.38, 6.31, 6.22, 6.14, 6.92, 5.78, 6.71, 6.71],
        ),
        (
            "15y",
            [6.26, 6.23, 6.16, 6.12, 6.04, 5.94, 5.84, 5.75, 5.67, 5.59, 6.92, 5.25, 6.71, 6.71],
        ),
        ("20y", FLAT),
        ("30y", FLAT),
    ]
}

/// Tenors 1 to 30 years.
fn long_asset_grid() -> Vec<Vec<GridCell>> {
    let tenors = [
        1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 12.0, 15.0, 20.0, 30.0,
    ];
    std::iter::once(numeric_header("Option Expiry", &tenors))
        .chain(asset_rows().iter().map(|(l, v)| row(l, v)))
        .collect()
}

/// Tenors 1 to 10 years.
fn short_asset_grid() -> Vec<Vec<GridCell>> {
    let tenors = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
    std::iter::once(numeric_header("Option Expiry", &tenors))
        .chain(asset_rows().iter().map(|(l, v)| row(l, &v[..10])))
        .collect()
}

fn vol_grid_20y() -> Vec<Vec<GridCell>> {
    vec![
        header(&[
            "Swap Tenor",
            "ATM - 193.810720549067",
            "ATM - 93.8107205490671",
            "ATM - 43.8107205490671",
            "ATM - 18.8107205490671",
            "ATM",
            "ATM + 6.18927945093288",
            "ATM + 31.1892794509329",
            "ATM + 56.1892794509329",
            "ATM + 106.189279450933",
            "ATM + 206.189279450933",
        ]),
        row(
            "1y",
            &[18.55, 16.32, 15.60, 15.35, 15.20, 15.16, 15.01, 14.91, 14.80, 14.83],
        ),
    ]
}

#[test]
fn test_atm_3m() {
    init_tracing();
    let helper = helper();
    let handle = helper
        .calibrate_atm(
            "3m0.25y ATM VOLGRID Calibration",
            SETTINGS,
            &AtmRow {
                expiry: "3m".into(),
                tenor: "0.25y".into(),
                nu: 0.7561,
                rho: -0.3702,
                atm_vol: 20.0,
                asset: 3.44,
            },
        )
        .unwrap();
    assert_eq!(handle, "3m0.25y ATM VOLGRID Calibration");

    let vol = helper.implied_volatility(&handle, "3m", "0.25y", 2.0).unwrap();
    assert_relative_eq!(vol, 0.31687, epsilon = 1e-5);
    let batch = helper
        .interpolate_volatilities(&handle, "3m", "0.25y", &[0.02, 0.03])
        .unwrap();
    assert_relative_eq!(batch[0], 0.31687, epsilon = 1e-5);
    assert_eq!(batch[0], vol);
}

#[test]
fn test_atm_6m() {
    init_tracing();
    let helper = helper();
    let handle = helper
        .calibrate_atm(
            "6m1y ATM VOLGRID Calibration",
            SETTINGS,
            &AtmRow {
                expiry: "6m".into(),
                tenor: "1y".into(),
                nu: 0.9211,
                rho: -0.2823,
                atm_vol: 23.18,
                asset: 5.0587,
            },
        )
        .unwrap();
    let vol = helper.implied_volatility(&handle, "6m", "1y", 0.03).unwrap();
    assert_relative_eq!(vol, 1.3829, epsilon = 1e-4);
}

#[test]
fn test_full_20y_1y() {
    init_tracing();
    let helper = helper();
    let handle = helper
        .calibrate_model("20y surface", SETTINGS, &vol_grid_20y(), &long_asset_grid(), "20y")
        .unwrap();
    assert_eq!(handle, "20y surface");

    let vol = helper.implied_volatility(&handle, "20y", "1y", 7.0).unwrap();
    assert_relative_eq!(vol, 0.149_766_076_068_191, epsilon = 1e-8);
    assert!(helper.is_calibrated(&handle, "20y", "1y").unwrap());
    assert!(helper.calibration_error(&handle, "20y", "1y").unwrap() < 1e-4);

    let engine = helper.engine(&handle, "20Y", "1Y").unwrap();
    assert_eq!(engine.mode(), CalibrationMode::Full);
    assert_relative_eq!(engine.forward(), 0.0671, epsilon = 1e-15);
    assert!(engine.rho() < 0.0);
}

#[test]
fn test_full_20y_1y_legacy_layout() {
    init_tracing();
    let helper = helper();
    let mut legacy = vec![vec![GridCell::Empty; 15]];
    legacy.extend(long_asset_grid());

    helper
        .calibrate_model("standard", SETTINGS, &vol_grid_20y(), &long_asset_grid(), "20y")
        .unwrap();
    helper
        .calibrate_model("legacy", SETTINGS, &vol_grid_20y(), &legacy, "20y")
        .unwrap();

    let standard = helper.implied_volatility("standard", "20y", "1y", 7.0).unwrap();
    let from_legacy = helper.implied_volatility("legacy", "20y", "1y", 7.0).unwrap();
    assert_eq!(standard, from_legacy);
}

#[test]
fn test_full_6m_1y() {
    init_tracing();
    let helper = helper();
    let vols = vec![
        header(&[
            "Swap Tenor",
            "ATM - 199.054193939524",
            "ATM - 99.0541939395239",
            "ATM - 49.0541939395239",
            "ATM - 24.0541939395239",
            "ATM",
            "ATM + 0.945806060476073",
            "ATM + 25.9458060604761",
            "ATM + 50.9458060604761",
            "ATM + 100.945806060476",
            "ATM + 200.945806060476",
        ]),
        row(
            "1y",
            &[39.10, 33.00, 31.10, 30.43, 29.93, 29.91, 29.50, 29.21, 28.96, 29.28],
        ),
    ];
    let handle = helper
        .calibrate_model("6m surface", SETTINGS, &vols, &short_asset_grid(), "6m")
        .unwrap();
    let vol = helper.implied_volatility(&handle, "6m", "1y", 2.5).unwrap();
    assert_relative_eq!(vol, 0.6210, epsilon = 1e-4);
}

fn multi_tenor_assets() -> Vec<Vec<GridCell>> {
    let notes = |label: &str, note: GridCell, values: &[f64]| -> Vec<GridCell> {
        let mut r = row(label, values);
        r.insert(1, note);
        r
    };
    let mut grid = vec![{
        let mut h = numeric_header("Option Expiry", &[1.0, 2.0, 3.0, 4.0, 5.0, 7.0, 10.0]);
        h.insert(1, GridCell::from("Swap Tenor"));
        h
    }];
    let short = [6.8, 6.8, 6.8, 6.8, 6.8, 6.7, 6.6];
    grid.push(notes("1m", GridCell::Empty, &short));
    grid.push(notes("2m", GridCell::Empty, &short));
    grid.push(notes("3m", GridCell::from("Years to E"), &short));
    grid.push(notes("6m", GridCell::from(0.5), &short));
    grid.push(notes("1yr", GridCell::from(1.0), &[6.8, 6.8, 6.9, 6.9, 6.8, 6.7, 6.6]));
    grid.push(notes("2yr", GridCell::from(2.0), &[6.85, 6.8, 6.8, 6.775, 6.7, 6.6, 6.55]));
    grid.push(notes("3yr", GridCell::from(3.0), &[6.9, 6.8, 6.7, 6.65, 6.6, 6.5, 6.5]));
    grid.push(notes("4yr", GridCell::from(4.0), &[6.7, 6.6, 6.55, 6.525, 6.5, 6.45, 6.4]));
    grid.push(notes("5yr", GridCell::from(5.0), &[6.4, 6.4, 6.4, 6.4, 6.4, 6.4, 6.3]));
    grid.push(notes("7yr", GridCell::from(7.0), &[6.4, 6.4, 6.3, 6.4, 6.35, 6.4, 6.2]));
    grid.push(notes("10yr", GridCell::from(10.0), &[6.4, 6.4, 6.3, 6.4, 6.3, 6.4, 6.1]));
    grid
}

fn multi_tenor_vols() -> Vec<Vec<GridCell>> {
    vec![
        header(&[
            "Swap Tenor",
            "ATM - 100",
            "ATM - 75",
            "ATM - 50",
            "ATM - 25",
            "ATM",
            "ATM + 25",
            "ATM + 50",
            "ATM + 75",
            "ATM + 100",
        ]),
        row("1yr", &[10.50, 10.30, 10.04, 9.87, 9.77, 9.65, 9.61, 9.61, 9.69]),
        row("2yr", &[10.68, 10.40, 10.16, 10.03, 9.94, 9.83, 9.79, 9.78, 9.83]),
        row("3yr", &[10.86, 10.60, 10.40, 10.25, 10.14, 10.05, 10.01, 10.01, 10.06]),
        row("4yr", &[0.0; 9]),
        row("5yr", &[10.82, 10.60, 10.39, 10.26, 10.16, 10.02, 9.99, 10.00, 10.07]),
        row("7yr", &[10.94, 10.81, 10.56, 10.41, 10.31, 10.15, 10.12, 10.13, 10.20]),
        row("10yr", &[11.15, 10.92, 10.74, 10.62, 10.52, 10.31, 10.27, 10.29, 10.38]),
    ]
}

#[test]
fn test_multi_tenor_grid() {
    init_tracing();
    let helper = helper();
    let handle = helper
        .calibrate_model("6M grid", SETTINGS, &multi_tenor_vols(), &multi_tenor_assets(), "6M")
        .unwrap();

    let table = helper.store().table(&handle).unwrap();
    assert_eq!(table.len(), 6, "4yr row has no vols");

    let expected = [
        (5.8, 0.1052),
        (6.05, 0.1027),
        (6.3, 0.1006),
        (6.55, 0.0989),
        (6.8, 0.0977),
        (7.05, 0.0969),
        (7.3, 0.0964),
        (7.55, 0.0963),
        (7.8, 0.0966),
    ];
    for (strike, vol) in expected {
        let actual = helper.implied_volatility(&handle, "6m", "1y", strike).unwrap();
        assert_relative_eq!(actual, vol, epsilon = 1e-4);
    }

    let strikes: Vec<f64> = expected.iter().map(|(k, _)| k / 100.0).collect();
    let batch = helper
        .interpolate_volatilities(&handle, "6M", "1yr", &strikes)
        .unwrap();
    for ((strike, _), vol) in expected.iter().zip(batch) {
        let single = helper.implied_volatility(&handle, "6M", "1Y", *strike).unwrap();
        assert_relative_eq!(vol, single, epsilon = 1e-15);
    }

    assert!(helper.engine(&handle, "6m", "4y").is_err());
}

#[test]
fn test_interpolated_from_surface() {
    init_tracing();
    let helper = helper();
    helper
        .calibrate_model("6M grid", SETTINGS, &multi_tenor_vols(), &multi_tenor_assets(), "6M")
        .unwrap();
    helper
        .calibrate_interpolated("6M interp", "6M grid", "6M", "4y", 10.2, 6.8)
        .unwrap();

    let nu3 = helper.nu("6M grid", "6m", "3y").unwrap();
    let nu5 = helper.nu("6M grid", "6m", "5y").unwrap();
    let nu4 = helper.nu("6M interp", "6m", "4y").unwrap();
    assert_relative_eq!(nu4, 0.5 * (nu3 + nu5), epsilon = 1e-12);

    let atm = helper.implied_volatility("6M interp", "6m", "4y", 6.8).unwrap();
    assert_relative_eq!(atm, 0.102, epsilon = 1e-12);
}
