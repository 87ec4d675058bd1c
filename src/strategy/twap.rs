use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::OrderDispatcher;
use crate::domain::{OrderSpec, TwapRequest, TwapResult};
use crate::error::Result;

/// Per-run policy knobs for TWAP execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwapPolicy {
    /// Halt after this many consecutive failed slices. None preserves
    /// fire-and-continue behavior: every slice is attempted no matter how
    /// many before it failed.
    pub max_consecutive_failures: Option<u32>,
}

/// Splits a total quantity into equal MARKET slices dispatched at a fixed
/// interval.
///
/// Slicing is plain division: when it is inexact the last slice is not
/// adjusted, so the dispatched total can drift from the requested total by
/// the accumulated remainder.
pub struct TwapStrategy {
    dispatcher: OrderDispatcher,
    policy: TwapPolicy,
}

impl TwapStrategy {
    pub fn new(dispatcher: OrderDispatcher) -> Self {
        Self {
            dispatcher,
            policy: TwapPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: TwapPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run the full TWAP schedule to completion.
    pub async fn place(&self, request: &TwapRequest) -> Result<TwapResult> {
        self.place_with_cancel(request, None).await
    }

    /// Run the TWAP schedule with an optional cancellation flag.
    ///
    /// The flag is checked before each slice dispatch and while waiting
    /// between slices; `None` runs to completion. A cancelled (or
    /// policy-halted) run returns the slices dispatched so far.
    pub async fn place_with_cancel(
        &self,
        request: &TwapRequest,
        mut cancel: Option<watch::Receiver<bool>>,
    ) -> Result<TwapResult> {
        request.validate()?;

        let slice_quantity = request.slice_quantity();
        info!(
            symbol = %request.symbol,
            side = %request.side,
            total_quantity = %request.total_quantity,
            slices = request.slice_count,
            interval_seconds = request.interval_seconds,
            slice_quantity = %slice_quantity,
            "starting TWAP execution"
        );

        let mut slices = Vec::with_capacity(request.slice_count as usize);
        let mut consecutive_failures = 0u32;

        for i in 0..request.slice_count {
            if is_cancelled(cancel.as_ref()) {
                warn!(completed = slices.len(), "TWAP cancelled before slice dispatch");
                break;
            }

            let spec = OrderSpec::market(request.symbol.clone(), request.side, slice_quantity);
            info!(
                slice = i + 1,
                slices = request.slice_count,
                "dispatching TWAP slice"
            );

            let result = self.dispatcher.dispatch(&spec).await;
            consecutive_failures = if result.success {
                0
            } else {
                consecutive_failures + 1
            };
            slices.push(result);

            if let Some(limit) = self.policy.max_consecutive_failures {
                if consecutive_failures >= limit {
                    warn!(
                        failures = consecutive_failures,
                        completed = slices.len(),
                        "TWAP halted after consecutive slice failures"
                    );
                    break;
                }
            }

            if i + 1 < request.slice_count && request.interval_seconds > 0 {
                debug!(
                    seconds = request.interval_seconds,
                    "waiting before next slice"
                );
                let interval = Duration::from_secs(request.interval_seconds);
                if wait_or_cancel(interval, cancel.as_mut()).await {
                    warn!(completed = slices.len(), "TWAP cancelled during interval wait");
                    break;
                }
            }
        }

        let result = TwapResult {
            slices,
            slice_quantity,
        };
        info!(
            placed = result.placed_count(),
            failed = result.failed_count(),
            "TWAP execution finished"
        );

        Ok(result)
    }
}

fn is_cancelled(cancel: Option<&watch::Receiver<bool>>) -> bool {
    cancel.map(|rx| *rx.borrow()).unwrap_or(false)
}

/// Sleep for `interval`, returning true early if the cancel flag flips while
/// waiting.
async fn wait_or_cancel(
    interval: Duration,
    cancel: Option<&mut watch::Receiver<bool>>,
) -> bool {
    let Some(rx) = cancel else {
        sleep(interval).await;
        return false;
    };

    let sleep_fut = sleep(interval);
    tokio::pin!(sleep_fut);

    loop {
        tokio::select! {
            _ = &mut sleep_fut => return false,
            changed = rx.changed() => match changed {
                Ok(()) if *rx.borrow() => return true,
                Ok(()) => continue,
                Err(_) => {
                    // Sender dropped: no cancellation can ever arrive.
                    (&mut sleep_fut).await;
                    return false;
                }
            },
        }
    }
}
