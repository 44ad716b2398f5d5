use coin_forecast::forecast::{Direction, ResultAssembler};
use coin_forecast::model::horizon::{Granularity, Horizon};
use coin_forecast::model::window::MarketSnapshot;

fn snapshot(close: f64) -> MarketSnapshot {
    MarketSnapshot {
        close,
        high: close + 2.0,
        low: close - 3.0,
    }
}

#[test]
fn tie_is_classified_down() {
    assert_eq!(Direction::classify(100.0, 100.0), Direction::Down);
    assert_eq!(Direction::classify(100.01, 100.0), Direction::Up);
    assert_eq!(Direction::classify(99.99, 100.0), Direction::Down);
}

#[test]
fn assembles_daily_record() {
    let horizon = Horizon::new(Granularity::Daily, 3).unwrap();
    let out = ResultAssembler::assemble("BTC", "BTCUSDT", &horizon, snapshot(100.0), 104.5, Some(87.2));
    assert_eq!(out.symbol, "BTC");
    assert_eq!(out.pair, "BTCUSDT");
    assert_eq!(out.mode, Granularity::Daily);
    assert_eq!(out.value, 3);
    assert_eq!(out.timeframe, "3 days 0 hours");
    assert_eq!(out.current_price, 100.0);
    assert_eq!(out.high, 102.0);
    assert_eq!(out.low, 97.0);
    assert_eq!(out.direction, Direction::Up);
    assert_eq!(out.confidence, Some(87.2));
}

#[test]
fn serializes_direction_and_skips_absent_fields() {
    let horizon = Horizon::new(Granularity::Hourly, 6).unwrap();
    let out = ResultAssembler::assemble("ETH", "ETHUSDT", &horizon, snapshot(50.0), 49.0, None);
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["direction"], "DOWN");
    assert_eq!(json["mode"], "hourly");
    assert_eq!(json["timeframe"], "0 days 6 hours");
    assert!(json.get("confidence").is_none());
    assert!(json.get("predicted_series").is_none());

    let with_series = out.with_series(vec![49.5, 49.2, 49.0]);
    let json = serde_json::to_value(&with_series).unwrap();
    assert_eq!(json["predicted_series"].as_array().unwrap().len(), 3);
}
