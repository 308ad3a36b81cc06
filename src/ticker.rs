use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::debug;

/// A running tick task; dropping it stops the task.
struct ArmedTick {
    generation: u64,
    handle: JoinHandle<()>,
}

impl Drop for ArmedTick {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Periodic, cancellable tick source.
///
/// Each tick is the generation it was armed for, sent over `tx`. At most one task runs;
/// [`Ticker::sync`] replaces or stops it to match the engine's armed generation. Ticks
/// already queued when a task is replaced still carry the old generation and are rejected
/// by the engine.
pub struct Ticker {
    period: Duration,
    tx: UnboundedSender<u64>,
    armed: Option<ArmedTick>,
}

impl Ticker {
    pub fn new(period: Duration, tx: UnboundedSender<u64>) -> Self {
        Self {
            period,
            tx,
            armed: None,
        }
    }

    /// Make the running task match `wanted`. Must be called within a tokio runtime.
    pub fn sync(&mut self, wanted: Option<u64>) {
        if self.armed_generation() == wanted {
            return;
        }
        self.armed = None;
        if let Some(generation) = wanted {
            debug!(generation, "arming tick source");
            self.armed = Some(ArmedTick {
                generation,
                handle: tokio::spawn(run(self.period, generation, self.tx.clone())),
            });
        }
    }

    pub fn armed_generation(&self) -> Option<u64> {
        self.armed.as_ref().map(|armed| armed.generation)
    }
}

async fn run(period: Duration, generation: u64, tx: UnboundedSender<u64>) {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        if tx.send(generation).is_err() {
            break;
        }
    }
}
