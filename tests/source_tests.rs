use coin_forecast::error::ErrorKind;
use coin_forecast::model::candle::Candle;
use coin_forecast::model::horizon::Granularity;
use coin_forecast::source::{StaticWindowSource, WindowSource};

fn candle(i: u64, close: f64) -> Candle {
    Candle {
        open: close - 0.5,
        high: close + 1.0,
        low: close - 1.5,
        close,
        open_time: i * 60_000,
        close_time: (i + 1) * 60_000 - 1,
    }
}

#[test]
fn serves_trailing_bars_and_latest_snapshot() {
    let mut source = StaticWindowSource::new().with_limit(5);
    source.insert(
        "ethusdt",
        Granularity::Hourly,
        (0..10).map(|i| candle(i, 10.0 + i as f64)).collect(),
    );

    let window = tokio_test::block_on(source.fetch("ETHUSDT", Granularity::Hourly, 3)).unwrap();
    assert_eq!(window.closes(), &[15.0, 16.0, 17.0, 18.0, 19.0]);
    let latest = window.latest();
    assert_eq!(latest.close, 19.0);
    assert_eq!(latest.high, 20.0);
    assert_eq!(latest.low, 17.5);
}

#[test]
fn minimum_length_overrides_a_smaller_limit() {
    let mut source = StaticWindowSource::new().with_limit(5);
    source.insert_closes("BTCUSDT", Granularity::Daily, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    let window = tokio_test::block_on(source.fetch("BTCUSDT", Granularity::Daily, 7)).unwrap();
    assert_eq!(window.len(), 7);
}

#[test]
fn absent_series_and_malformed_candles_fail() {
    let mut source = StaticWindowSource::new();
    let mut bad = candle(1, 5.0);
    bad.high = 1.0;
    source.insert("BNBUSDT", Granularity::Daily, vec![candle(0, 5.0), bad]);

    let err = tokio_test::block_on(source.fetch("BNBUSDT", Granularity::Hourly, 1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataSourceFailure);
    let err = tokio_test::block_on(source.fetch("BNBUSDT", Granularity::Daily, 1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataSourceFailure);
}
