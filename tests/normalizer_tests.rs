use std::io;
use std::sync::{Arc, Mutex};

use coin_forecast::forecast::{fit_transform, inverse, transform, Transform};
use coin_forecast::model::window::PriceWindow;

fn window(closes: &[f64]) -> PriceWindow {
    PriceWindow::from_closes(closes.to_vec(), 1).unwrap()
}

#[test]
fn fit_maps_window_onto_unit_interval() {
    let w = window(&[10.0, 20.0, 15.0, 30.0]);
    let (scaled, t) = fit_transform(&w);
    assert_eq!(t.min(), 10.0);
    assert_eq!(t.max(), 30.0);
    assert_eq!(scaled.values(), &[0.0, 0.5, 0.25, 1.0]);
    assert_eq!(scaled.transform(), t);
}

#[test]
fn inverse_undoes_transform() {
    let w = window(&[101.5, 99.25, 104.0, 100.0, 102.75]);
    let (scaled, t) = fit_transform(&w);
    for (s, close) in scaled.values().iter().zip(w.closes()) {
        assert!((inverse(*s, &t) - close).abs() < 1e-9);
    }
}

#[test]
fn values_outside_fitted_range_are_not_clipped() {
    let t = Transform::fit(&[10.0, 30.0]);
    assert!((transform(40.0, &t) - 1.5).abs() < 1e-12);
    assert!((transform(0.0, &t) + 0.5).abs() < 1e-12);
    assert!((inverse(1.5, &t) - 40.0).abs() < 1e-12);
}

#[test]
fn degenerate_window_scales_to_zero_and_inverts_to_constant() {
    let w = window(&[50.0; 60]);
    let (scaled, t) = fit_transform(&w);
    assert!(t.is_degenerate());
    assert!(scaled.values().iter().all(|v| *v == 0.0));
    assert_eq!(inverse(0.7, &t), 50.0);
    assert_eq!(inverse(-3.0, &t), 50.0);
}

#[test]
fn tail_requires_enough_observations() {
    let w = window(&[1.0, 2.0, 3.0, 4.0]);
    let (scaled, _) = fit_transform(&w);
    assert_eq!(scaled.tail(2).unwrap().len(), 2);
    assert!(scaled.tail(5).is_none());
    assert!(scaled.tail(0).is_none());
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn fit_with_captured_logs(closes: &[f64]) -> String {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let w = window(closes);
    tracing::subscriber::with_default(subscriber, || {
        let _ = fit_transform(&w);
    });
    logs.text()
}

#[test]
fn flat_window_logs_degenerate_warning() {
    let out = fit_with_captured_logs(&[42.0; 60]);
    assert!(out.contains("WARN"), "{}", out);
    assert!(out.contains("DegenerateWindow"), "{}", out);
}

#[test]
fn varying_window_logs_nothing() {
    let out = fit_with_captured_logs(&[1.0, 2.0, 3.0]);
    assert!(!out.contains("DegenerateWindow"), "{}", out);
}
