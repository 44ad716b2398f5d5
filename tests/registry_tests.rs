use std::path::PathBuf;
use std::sync::Arc;

use coin_forecast::error::{ErrorKind, ForecastError};
use coin_forecast::forecast::{LinearOracle, OracleRegistry};
use coin_forecast::instrument::{InstrumentSpec, InstrumentTable};
use coin_forecast::model::horizon::Granularity;
use uuid::Uuid;

fn temp_model_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("coin-forecast-models-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn table(symbols: &[&str]) -> InstrumentTable {
    let specs: Vec<InstrumentSpec> = symbols
        .iter()
        .map(|s| InstrumentSpec {
            symbol: s.to_string(),
            pair: format!("{}USDT", s),
        })
        .collect();
    InstrumentTable::from_specs(&specs).unwrap()
}

#[test]
fn key_matches_artifact_naming() {
    let registry = OracleRegistry::new("inr");
    assert_eq!(registry.key_for("btc", Granularity::Daily), "BTC-INR_daily");
    assert_eq!(registry.key_for("ETH", Granularity::Hourly), "ETH-INR_hourly");
}

#[test]
fn unregistered_pair_is_oracle_not_found_with_key() {
    let mut registry = OracleRegistry::new("INR");
    registry.register(
        "BTC",
        Granularity::Daily,
        Arc::new(LinearOracle::new(vec![1.0], 0.0).unwrap()),
    );
    assert!(registry.get("btc", Granularity::Daily).is_ok());

    let Err(err) = registry.get("BTC", Granularity::Hourly) else {
        panic!("hourly BTC oracle should not be registered");
    };
    assert_eq!(err.kind(), ErrorKind::OracleNotFound);
    match err {
        ForecastError::OracleNotFound { key } => assert_eq!(key, "BTC-INR_hourly"),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn load_dir_registers_present_artifacts_and_reports_missing() {
    let dir = temp_model_dir();
    std::fs::write(
        dir.join("BTC-INR_daily.json"),
        r#"{"lookback": 3, "weights": [0.2, 0.3, 0.5], "bias": 0.01}"#,
    )
    .unwrap();
    std::fs::write(
        dir.join("ETH-INR_hourly.json"),
        r#"{"name": "eth-h", "lookback": 2, "weights": [0.5, 0.5]}"#,
    )
    .unwrap();

    let instruments = table(&["BTC", "ETH"]);
    let registry = OracleRegistry::load_dir(&dir, "INR", &instruments).unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(
        registry.keys(),
        vec!["BTC-INR_daily".to_string(), "ETH-INR_hourly".to_string()]
    );
    assert_eq!(
        registry.missing(&instruments),
        vec!["BTC-INR_hourly".to_string(), "ETH-INR_daily".to_string()]
    );

    let btc = registry.get("BTC", Granularity::Daily).unwrap();
    assert_eq!(btc.lookback(), 3);
    assert_eq!(btc.name(), "BTC-INR_daily");
    assert_eq!(registry.get("ETH", Granularity::Hourly).unwrap().name(), "eth-h");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn malformed_artifact_fails_the_load() {
    let dir = temp_model_dir();
    std::fs::write(
        dir.join("BTC-INR_daily.json"),
        r#"{"lookback": 3, "weights": [0.2, 0.3]}"#,
    )
    .unwrap();
    let err = OracleRegistry::load_dir(&dir, "INR", &table(&["BTC"])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn empty_dir_yields_empty_registry() {
    let dir = temp_model_dir();
    let registry = OracleRegistry::load_dir(&dir, "INR", &table(&["SOL"])).unwrap();
    assert!(registry.is_empty());
    std::fs::remove_dir_all(&dir).ok();
}
