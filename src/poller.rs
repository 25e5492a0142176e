use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::event::AppEvent;

/// Periodic refresh timer for the containers view.
///
/// Sends [`AppEvent::PollTick`] every `every`, starting one period after
/// creation. The task stops when the poller is cancelled or dropped, or
/// when the receiving side goes away.
pub struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    pub fn start(every: Duration, tx: UnboundedSender<AppEvent>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // first tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                if tx.send(AppEvent::PollTick).is_err() {
                    break;
                }
            }
        });
        tracing::debug!(every_secs = every.as_secs(), "poller started");
        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_ticks_arrive() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _poller = Poller::start(Duration::from_millis(10), tx);

        let event = timeout(Duration::from_secs(2), rx.recv()).await.unwrap();
        assert!(matches!(event, Some(AppEvent::PollTick)));
    }

    #[tokio::test]
    async fn test_drop_stops_the_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let poller = Poller::start(Duration::from_millis(10), tx);
        drop(poller);

        // the sender lives in the aborted task, so the channel closes
        let drained = timeout(Duration::from_secs(2), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(drained.is_ok());
    }

    #[tokio::test]
    async fn test_cancel() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let poller = Poller::start(Duration::from_secs(30), tx);
        assert!(poller.is_running());
        poller.cancel();
        timeout(Duration::from_secs(2), async {
            while poller.is_running() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }
}
