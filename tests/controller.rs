//! Callback contract of the countdown controller, on tokio's paused clock

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use precise_countdown::{
    countdown::{self, CountdownConfig, CountdownController, CountdownEvent, EngineState, FnListener},
    CountdownError,
};
use tokio::{sync::mpsc, time};

fn controller(
    duration_ms: u64,
    interval_ms: u64,
    delay_ms: u64,
) -> (CountdownController, mpsc::UnboundedReceiver<CountdownEvent>) {
    let config = CountdownConfig::new(duration_ms, interval_ms, delay_ms).unwrap();
    let (listener, rx) = countdown::channel();
    (CountdownController::new(config, listener), rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<CountdownEvent>) -> Vec<CountdownEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn ticks(values: impl IntoIterator<Item = u64>) -> Vec<CountdownEvent> {
    values
        .into_iter()
        .map(|remaining_ms| CountdownEvent::Tick { remaining_ms })
        .collect()
}

async fn advance_ms(ms: u64) {
    time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn seventy_five_seconds_tick_down_to_one_then_finish() {
    let (mut controller, mut rx) = controller(75_000, 1_000, 0);
    controller.start().unwrap();

    advance_ms(80_000).await;

    let mut expected = ticks((1..=75).rev().map(|s| s * 1_000));
    expected.push(CountdownEvent::Finished);
    assert_eq!(drain(&mut rx), expected);
    assert_eq!(controller.state().unwrap(), EngineState::Finished);
}

#[tokio::test(start_paused = true)]
async fn finishes_exactly_at_duration() {
    let (mut controller, mut rx) = controller(3_000, 1_000, 0);
    controller.start().unwrap();

    advance_ms(2_500).await;
    assert_eq!(drain(&mut rx), ticks([3_000, 2_000, 1_000]));
    assert_eq!(controller.state().unwrap(), EngineState::Running);

    advance_ms(1_000).await;
    assert_eq!(drain(&mut rx), vec![CountdownEvent::Finished]);
    assert_eq!(controller.state().unwrap(), EngineState::Finished);
}

#[tokio::test(start_paused = true)]
async fn zero_duration_finishes_without_a_tick() {
    let (mut controller, mut rx) = controller(0, 1_000, 0);
    controller.start().unwrap();

    advance_ms(5_000).await;
    assert_eq!(drain(&mut rx), vec![CountdownEvent::Finished]);
}

#[tokio::test(start_paused = true)]
async fn interval_longer_than_duration() {
    let (mut controller, mut rx) = controller(5_000, 10_000, 0);
    controller.start().unwrap();

    advance_ms(25_000).await;
    let mut expected = ticks([5_000]);
    expected.push(CountdownEvent::Finished);
    assert_eq!(drain(&mut rx), expected);
}

#[tokio::test(start_paused = true)]
async fn initial_delay_postpones_the_first_tick() {
    let (mut controller, mut rx) = controller(2_000, 1_000, 500);
    controller.start().unwrap();

    advance_ms(400).await;
    assert!(drain(&mut rx).is_empty());

    advance_ms(200).await;
    assert_eq!(drain(&mut rx), ticks([2_000]));
}

#[tokio::test(start_paused = true)]
async fn cancel_before_any_fire_delivers_nothing() {
    let (mut controller, mut rx) = controller(10_000, 1_000, 500);
    controller.start().unwrap();
    controller.cancel().unwrap();

    advance_ms(30_000).await;
    assert!(drain(&mut rx).is_empty());
    assert_eq!(controller.state().unwrap(), EngineState::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn cancel_without_delay_before_the_ticker_runs() {
    let (mut controller, mut rx) = controller(10_000, 1_000, 0);
    controller.start().unwrap();
    controller.stop().unwrap();

    advance_ms(30_000).await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancel_mid_run_stops_ticks_without_finishing() {
    let (mut controller, mut rx) = controller(10_000, 1_000, 0);
    controller.start().unwrap();

    advance_ms(3_500).await;
    assert_eq!(drain(&mut rx), ticks([10_000, 9_000, 8_000, 7_000]));

    controller.cancel().unwrap();
    advance_ms(30_000).await;
    assert!(drain(&mut rx).is_empty());

    // Stopping again is a no-op
    controller.stop().unwrap();
    assert_eq!(controller.state().unwrap(), EngineState::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn restart_while_running_resets_the_next_tick() {
    let (mut controller, mut rx) = controller(10_000, 1_000, 0);
    controller.start().unwrap();

    advance_ms(3_500).await;
    assert_eq!(drain(&mut rx), ticks([10_000, 9_000, 8_000, 7_000]));

    controller.restart().unwrap();
    assert_eq!(controller.state().unwrap(), EngineState::Running);

    advance_ms(20_000).await;
    let mut expected = ticks((1..=10).rev().map(|s| s * 1_000));
    expected.push(CountdownEvent::Finished);
    assert_eq!(drain(&mut rx), expected);
}

#[tokio::test(start_paused = true)]
async fn restart_after_cancel_begins_a_fresh_run() {
    let (mut controller, mut rx) = controller(5_000, 1_000, 0);
    controller.start().unwrap();

    advance_ms(2_500).await;
    assert_eq!(drain(&mut rx), ticks([5_000, 4_000, 3_000]));
    controller.cancel().unwrap();

    advance_ms(10_000).await;
    controller.restart().unwrap();
    advance_ms(10_000).await;

    let mut expected = ticks([5_000, 4_000, 3_000, 2_000, 1_000]);
    expected.push(CountdownEvent::Finished);
    assert_eq!(drain(&mut rx), expected);
}

#[tokio::test(start_paused = true)]
async fn restart_before_start_acts_as_start() {
    let (mut controller, mut rx) = controller(2_000, 1_000, 0);
    assert!(!controller.was_started());
    controller.restart().unwrap();
    assert!(controller.was_started());

    advance_ms(5_000).await;
    let mut expected = ticks([2_000, 1_000]);
    expected.push(CountdownEvent::Finished);
    assert_eq!(drain(&mut rx), expected);
}

#[tokio::test(start_paused = true)]
async fn finished_countdown_can_start_and_restart_again() {
    let (mut controller, mut rx) = controller(1_000, 1_000, 0);
    controller.start().unwrap();
    advance_ms(2_000).await;
    assert_eq!(drain(&mut rx).last(), Some(&CountdownEvent::Finished));

    controller.start().unwrap();
    advance_ms(2_000).await;
    let mut expected = ticks([1_000]);
    expected.push(CountdownEvent::Finished);
    assert_eq!(drain(&mut rx), expected);

    controller.restart().unwrap();
    advance_ms(2_000).await;
    assert_eq!(drain(&mut rx), expected);
}

#[tokio::test(start_paused = true)]
async fn double_start_never_arms_a_second_schedule() {
    let (mut controller, mut rx) = controller(3_000, 1_000, 0);
    controller.start().unwrap();
    assert!(matches!(
        controller.start(),
        Err(CountdownError::InvalidTransition {
            state: EngineState::Running,
            ..
        })
    ));

    advance_ms(5_000).await;
    let mut expected = ticks([3_000, 2_000, 1_000]);
    expected.push(CountdownEvent::Finished);
    assert_eq!(drain(&mut rx), expected);
}

#[tokio::test(start_paused = true)]
async fn dispose_after_finish_is_quiet() {
    let (mut controller, mut rx) = controller(1_000, 1_000, 0);
    controller.start().unwrap();
    advance_ms(2_000).await;
    drain(&mut rx);

    controller.dispose();
    advance_ms(5_000).await;
    assert!(drain(&mut rx).is_empty());
    assert!(matches!(controller.restart(), Err(CountdownError::Disposed { .. })));
}

#[tokio::test(start_paused = true)]
async fn dispose_mid_run_stops_delivery() {
    let (mut controller, mut rx) = controller(10_000, 1_000, 0);
    controller.start().unwrap();
    advance_ms(1_500).await;
    assert_eq!(drain(&mut rx), ticks([10_000, 9_000]));

    controller.dispose();
    advance_ms(20_000).await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn dropping_a_controller_cancels_its_ticker() {
    let (mut controller, mut rx) = controller(10_000, 1_000, 0);
    controller.start().unwrap();
    advance_ms(500).await;
    drop(controller);

    advance_ms(20_000).await;
    assert_eq!(drain(&mut rx), ticks([10_000]));
}

#[tokio::test(start_paused = true)]
async fn instances_are_cancelled_independently() {
    let (mut first, mut first_rx) = controller(3_000, 1_000, 0);
    let (mut second, mut second_rx) = controller(3_000, 1_000, 0);
    first.start().unwrap();
    second.start().unwrap();

    advance_ms(500).await;
    first.cancel().unwrap();
    advance_ms(5_000).await;

    assert_eq!(drain(&mut first_rx), ticks([3_000]));
    let mut expected = ticks([3_000, 2_000, 1_000]);
    expected.push(CountdownEvent::Finished);
    assert_eq!(drain(&mut second_rx), expected);
}

#[tokio::test(start_paused = true)]
async fn panicking_listener_stops_the_ticker_and_poisons_the_state() {
    let calls = Arc::new(AtomicU64::new(0));
    let finished = Arc::new(AtomicBool::new(false));
    let listener = FnListener::new(
        {
            let calls = Arc::clone(&calls);
            move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                panic!("listener failed");
            }
        },
        {
            let finished = Arc::clone(&finished);
            move || finished.store(true, Ordering::SeqCst)
        },
    );
    let config = CountdownConfig::new(5_000, 1_000, 0).unwrap();
    let mut controller = CountdownController::new(config, listener);
    controller.start().unwrap();

    advance_ms(10_000).await;

    assert!(matches!(controller.state(), Err(CountdownError::StateUnavailable(_))));
    assert!(matches!(controller.remaining_ms(), Err(CountdownError::StateUnavailable(_))));
    assert!(matches!(controller.stop(), Err(CountdownError::StateUnavailable(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!finished.load(Ordering::SeqCst));

    controller.dispose();
    assert!(controller.is_disposed());
}
