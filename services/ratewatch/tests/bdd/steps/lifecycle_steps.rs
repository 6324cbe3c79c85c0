//! BDD step definitions for start/stop lifecycle feature

use std::time::Duration;

use cucumber::{given, then, when};

use ratewatch::LoopPhase;

use crate::world::RateWatchWorld;

fn parse_phase(s: &str) -> LoopPhase {
    match s {
        "idle" => LoopPhase::Idle,
        "running" => LoopPhase::Running,
        "scheduled" => LoopPhase::Scheduled,
        "stopped" => LoopPhase::Stopped,
        other => panic!("Unknown phase: {}", other),
    }
}

#[given(expr = "a polling interval of {int} seconds")]
fn polling_interval(world: &mut RateWatchWorld, seconds: u64) {
    world.interval = Some(Duration::from_secs(seconds));
}

#[when("the monitor is started")]
fn monitor_started(world: &mut RateWatchWorld) {
    world.watch().start();
}

#[when("the monitor is started twice")]
fn monitor_started_twice(world: &mut RateWatchWorld) {
    let watch = world.watch();
    watch.start();
    watch.start();
}

#[when("the monitor is stopped")]
fn monitor_stopped(world: &mut RateWatchWorld) {
    world.watch().stop();
}

#[when("the monitor is started and immediately stopped")]
async fn started_and_stopped(world: &mut RateWatchWorld) {
    let watch = world.watch();
    watch.start();
    watch.stop();
    let outcome = watch.wait().await;
    world.outcome = outcome;
}

#[when("the monitor is stopped while waiting for the next poll")]
async fn stopped_while_waiting(world: &mut RateWatchWorld) {
    let watch = world.watch();
    let mut phase = watch.subscribe();
    watch.start();
    tokio::time::timeout(
        Duration::from_secs(5),
        phase.wait_for(|p| *p == LoopPhase::Scheduled),
    )
    .await
    .expect("monitor never reached the scheduled phase")
    .expect("phase channel closed");
    watch.stop();
    let outcome = watch.wait().await;
    world.outcome = outcome;
}

#[then(expr = "the monitor phase should be {string}")]
fn phase_is(world: &mut RateWatchWorld, expected: String) {
    let phase = world.watch().phase();
    assert_eq!(phase, parse_phase(&expected));
}

#[then("the monitor should not be running")]
fn not_running(world: &mut RateWatchWorld) {
    assert!(!world.watch().is_running());
}

#[then("the monitor should not have finished a run")]
fn no_outcome(world: &mut RateWatchWorld) {
    assert!(world.outcome.is_none());
}
