//! Integration tests for timer-driven playback.

use parking_lot::Mutex;
use sonicforge_audio::AmplitudeSeries;
use sonicforge_core::{EditorConfig, TimeRange};
use sonicforge_ui::{EditorState, Modifiers, TimerDriver, WaveformCanvas};
use std::sync::Arc;
use std::time::Duration;

fn canvas(driver: TimerDriver) -> WaveformCanvas {
    let config = EditorConfig::default();
    let series = AmplitudeSeries::new(vec![0.5; 2000]);
    WaveformCanvas::new(series, 180.0, &config).with_driver(driver)
}

#[tokio::test(start_paused = true)]
async fn selection_playback_returns_to_start_and_releases_timer() {
    let mut c = canvas(TimerDriver::current());
    c.seek(2.0);
    c.mark_in();
    c.seek(3.0);
    c.mark_out();
    c.play();
    assert_eq!(c.position(), 2.0);

    tokio::time::sleep(Duration::from_millis(950)).await;
    assert_eq!(c.poll_timer(), 9);
    assert!(c.is_playing());

    tokio::time::sleep(Duration::from_millis(100)).await;
    c.poll_timer();
    assert!(!c.is_playing());
    assert_eq!(c.position(), 2.0);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(c.poll_timer(), 0);
    assert_eq!(c.position(), 2.0);
}

#[tokio::test(start_paused = true)]
async fn canvases_tick_independently() {
    let mut a = canvas(TimerDriver::current());
    let mut b = canvas(TimerDriver::current());
    a.play();
    tokio::time::sleep(Duration::from_millis(550)).await;
    b.play();
    tokio::time::sleep(Duration::from_millis(480)).await;

    assert_eq!(a.poll_timer(), 10);
    assert_eq!(b.poll_timer(), 4);
    assert!((a.position() - 1.0).abs() < 1e-9);
    assert!((b.position() - 0.4).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn stop_during_playback_cancels_ticks() {
    let mut c = canvas(TimerDriver::current());
    c.play();
    tokio::time::sleep(Duration::from_millis(350)).await;
    c.poll_timer();
    c.stop();

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(c.poll_timer(), 0);
    assert_eq!(c.position(), 0.0);
    assert_eq!(c.selection(), None);
}

#[tokio::test(start_paused = true)]
async fn editor_frames_apply_ticks_and_feed_meters() {
    let dir = tempfile::tempdir().unwrap();
    let config = EditorConfig {
        library_path: Some(dir.path().join("library.json")),
        ..EditorConfig::default()
    };
    let mut ed = EditorState::new(config, TimerDriver::current());
    ed.canvas.play();

    tokio::time::sleep(Duration::from_millis(1050)).await;
    ed.frame_update();
    assert!((ed.canvas.position() - 1.0).abs() < 1e-9);
    assert!(ed.meters.levels.left > 0.0 || ed.meters.levels.right > 0.0);
    assert!(ed.spectrum.bands().iter().any(|&b| b > 0));
}

#[test]
fn drag_reports_every_distinct_selection() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let mut c = canvas(TimerDriver::Manual);
    c.set_on_selection_change(move |sel| sink.lock().push(sel));

    c.pointer_down(400.0, Modifiers::NONE);
    c.pointer_move(400.0);
    c.pointer_move(200.0);
    c.pointer_up();

    let seen = seen.lock();
    assert_eq!(seen.first(), Some(&Some(TimeRange::new(90.0, 90.0))));
    assert_eq!(seen.last(), Some(&Some(TimeRange::new(45.0, 90.0))));
    let mut deduped = seen.clone();
    deduped.dedup();
    assert_eq!(deduped.len(), seen.len());
}
