//! BDD step definitions for the monitor loop feature

use cucumber::{given, then, when};

use ratewatch::{Direction, LoopPhase, StopReason};

use crate::world::{RateWatchWorld, Scripted};

fn parse_direction(s: &str) -> Direction {
    match s {
        "first_observation" => Direction::FirstObservation,
        "increased" => Direction::Increased,
        "decreased" => Direction::Decreased,
        "unchanged" => Direction::Unchanged,
        other => panic!("Unknown direction: {}", other),
    }
}

fn parse_reason(s: &str) -> StopReason {
    match s {
        "attempts_exhausted" => StopReason::AttemptsExhausted,
        "cancelled" => StopReason::Cancelled,
        other => panic!("Unknown stop reason: {}", other),
    }
}

#[given(expr = "the endpoint serves the rates {string}")]
fn endpoint_serves(world: &mut RateWatchWorld, rates: String) {
    world.script = rates.split(',').map(Scripted::parse).collect();
}

#[given(expr = "a threshold of {float}")]
fn threshold_of(world: &mut RateWatchWorld, threshold: f64) {
    world.threshold = Some(threshold);
}

#[given(expr = "a limit of {int} attempts")]
fn limit_of(world: &mut RateWatchWorld, max_attempts: u32) {
    world.max_attempts = Some(max_attempts);
}

#[when("the monitor runs to completion")]
async fn runs_to_completion(world: &mut RateWatchWorld) {
    let watch = world.watch();
    if watch.phase() == LoopPhase::Idle {
        watch.start();
    }
    let outcome = watch.wait().await;
    world.outcome = outcome;
}

#[then(expr = "{int} notification(s) should have been emitted")]
fn notifications_emitted(world: &mut RateWatchWorld, count: usize) {
    let events = world.events();
    assert_eq!(
        events.len(),
        count,
        "expected {} notifications, got {:?}",
        count,
        events
    );
}

#[then(expr = "notification {int} should be {string} at {float} with delta {float}")]
fn notification_matches(
    world: &mut RateWatchWorld,
    index: usize,
    direction: String,
    rate: f64,
    delta: f64,
) {
    let events = world.events();
    let event = events
        .get(index - 1)
        .unwrap_or_else(|| panic!("no notification {} in {:?}", index, events));
    assert_eq!(event.direction, parse_direction(&direction));
    assert_eq!(event.current_rate, rate);
    assert!(
        (event.delta - delta).abs() < 1e-9,
        "expected delta {}, got {}",
        delta,
        event.delta
    );
}

#[then(expr = "the endpoint should have been fetched {int} time(s)")]
fn fetched_times(world: &mut RateWatchWorld, count: u32) {
    assert_eq!(world.fetch_count(), count);
}

#[then(expr = "the monitor should have stopped because {string}")]
fn stopped_because(world: &mut RateWatchWorld, reason: String) {
    let outcome = world.outcome.as_ref().expect("monitor has not finished");
    assert_eq!(outcome.reason, parse_reason(&reason));
}

#[then(expr = "the last notified rate should be {float}")]
fn last_notified(world: &mut RateWatchWorld, rate: f64) {
    let outcome = world.outcome.as_ref().expect("monitor has not finished");
    assert_eq!(outcome.last_notified_rate, Some(rate));
}
