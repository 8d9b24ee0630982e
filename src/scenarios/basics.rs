//! Scenarios built from simulated work only.
//!
//! Every duration is expressed in `unit`s so the same scenario runs in
//! seconds from the CLI and in milliseconds from tests.

use std::time::Duration;

use serde::Serialize;

use crate::future::resolve_after;
use crate::ops::delay::delay;
use crate::ops::types::{OpError, OpResult, Outcome};
use crate::ops::Scope;
use crate::resilience::{shield, wait_for};
use crate::wait::gather;

pub async fn add_one(number: u32) -> u32 {
    number + 1
}

pub async fn hello_world_message(unit: Duration) -> String {
    delay(unit * 2).await;
    "Hello World!".to_string()
}

/// Await two coroutines one after the other.
pub async fn sequential(unit: Duration) -> (String, u32) {
    let message = hello_world_message(unit).await;
    let one_plus_one = add_one(1).await;
    (message, one_plus_one)
}

/// Schedule delays of 3, 2 and 1 units, then await them in that order.
///
/// Total wall time is about 3 units, not 6.
pub async fn concurrent(scope: &Scope, unit: Duration) -> OpResult<Vec<Duration>> {
    let ops = [3u32, 2, 1].map(|n| scope.delay(unit * n));

    let mut finished = Vec::with_capacity(ops.len());
    for op in &ops {
        let slept = op.result().await?;
        tracing::info!(slept = ?slept, "Delay finished");
        finished.push(slept);
    }
    Ok(finished)
}

/// Result of [`overlap_background_task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverlapReport {
    pub foreground: u32,
    pub background: Duration,
}

/// Spawn a 3-unit delay, do 1 unit of foreground work, then await the delay.
///
/// The foreground work runs while the spawned delay sleeps, so the whole
/// call takes about 3 units.
pub async fn overlap_background_task(scope: &Scope, unit: Duration) -> OpResult<OverlapReport> {
    let sleep_for_three = scope.delay(unit * 3);
    tracing::info!(operation = ?sleep_for_three, "Spawned background delay");

    delay(unit).await;
    let foreground = add_one(1).await;
    tracing::info!(foreground, "Foreground work finished");

    let background = sleep_for_three.result().await?;
    Ok(OverlapReport { foreground, background })
}

/// Result of [`cancel_long_task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CancelReport {
    pub ticks: u32,
    pub cancelled: bool,
}

/// Poll a 5-unit task once per unit and cancel it after `cancel_at` ticks.
pub async fn cancel_long_task(scope: &Scope, unit: Duration, cancel_at: u32) -> CancelReport {
    let long_task = scope.delay(unit * 5);
    let mut ticks = 0;

    while !long_task.is_done() {
        tokio::time::sleep(unit).await;
        ticks += 1;
        tracing::info!(ticks, "Long task not done yet");
        if ticks == cancel_at {
            long_task.cancel();
        }
    }

    let cancelled = long_task.wait().await == Outcome::Cancelled;
    if cancelled {
        tracing::info!("Long task has been cancelled");
    } else {
        tracing::info!("Long task has been completed");
    }
    CancelReport { ticks, cancelled }
}

/// Bound a 5-unit task by 1 unit with a cancelling timeout.
///
/// Returns whether the task ended up cancelled.
pub async fn wait_for_demo(scope: &Scope, unit: Duration) -> bool {
    let delay_task = scope.delay(unit * 5);
    if let Err(e) = wait_for(&delay_task, unit).await {
        tracing::info!(error = %e, cancelled = delay_task.is_cancelled(), "Got timeout");
    }
    delay_task.is_cancelled()
}

/// Result of [`shield_demo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShieldReport {
    pub timed_out: bool,
    pub result: Duration,
}

/// Shield a `total`-unit task behind a `boundary`-unit wait, then collect it.
pub async fn shield_demo(scope: &Scope, unit: Duration, total: u32, boundary: u32) -> OpResult<ShieldReport> {
    let task = scope.delay(unit * total);

    match shield(&task, unit * boundary).await {
        Ok(result) => Ok(ShieldReport {
            timed_out: false,
            result,
        }),
        Err(OpError::Timeout(_)) => {
            tracing::info!("Task took longer than expected, it will finish soon");
            let result = task.result().await?;
            Ok(ShieldReport {
                timed_out: true,
                result,
            })
        }
        Err(e) => Err(e),
    }
}

/// Wait on a future that a background producer resolves after 2 units.
pub async fn futures_demo(unit: Duration) -> OpResult<u32> {
    let future = resolve_after(unit * 2, 10u32);
    tracing::info!(done = future.is_resolved(), "Is the future done?");

    let value = future.wait().await?;
    tracing::info!(done = future.is_resolved(), value, "Is the future done?");
    Ok(value)
}

/// Gather delays of 5 and 1 units; results come back in submission order.
pub async fn out_of_order(scope: &Scope, unit: Duration) -> OpResult<Vec<Duration>> {
    let ops = vec![scope.delay(unit * 5), scope.delay(unit)];
    gather(&ops).await.into_iter().map(Outcome::into_result).collect()
}
