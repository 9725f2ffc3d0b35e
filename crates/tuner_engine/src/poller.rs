use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio_util::sync::CancellationToken;
use tuner_logging::{tuner_debug, tuner_info};

use crate::{EngineEvent, JobStore, ServiceApi};

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2500),
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Recurring reconciliation of the local registry against the server.
///
/// Each pass snapshots the registry, fetches every job concurrently, and
/// publishes the successes as ONE event in registry order. A job that fails
/// to fetch is skipped for this pass and retried on the next; it is never
/// removed from the registry. Passes never overlap: the loop awaits the
/// whole pass before sleeping again, and due ticks missed by a slow pass
/// are skipped. Cancellation is honored before a pass issues any fetches.
pub async fn poll_loop(
    api: Arc<dyn ServiceApi>,
    store: Arc<JobStore>,
    settings: PollSettings,
    cancel: CancellationToken,
    sink: Arc<dyn EventSink>,
) {
    let mut interval = tokio::time::interval(settings.interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut pass: u64 = 0;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }
        if cancel.is_cancelled() {
            break;
        }
        pass += 1;
        tuner_logging::set_poll_tick(pass);

        let ids = store.load();
        let results = join_all(ids.iter().map(|id| api.fetch_job(*id))).await;

        let mut jobs = Vec::with_capacity(results.len());
        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(record) => jobs.push(record),
                // Non-fatal: the id stays registered for the next pass.
                Err(err) => tuner_debug!("pass {pass}: job {id} skipped: {err}"),
            }
        }
        sink.emit(EngineEvent::PollPublished { jobs });
    }
    tuner_info!("poll loop stopped after {pass} passes");
}
