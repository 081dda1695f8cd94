//! Input debouncing.
//!
//! [`Debouncer`] is the handle side of a handle/task pair: every
//! [`Debouncer::notify`] restarts the quiet period, and the spawned
//! [`DebounceTask`] calls `on_settled` with the latest value once the input has
//! been quiet for the whole interval. Each handle owns its own task, so two
//! controllers never share a timer.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

/// Quiet period the search input waits for before a query settles.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Debouncer<T>
where
    T: Send + 'static,
{
    /// Spawns the debounce task on the current tokio runtime.
    pub fn new<F>(interval: Duration, on_settled: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = DebounceTask {
            receiver: rx,
            interval,
            on_settled,
        };
        tokio::spawn(task.run());
        Self { tx }
    }

    /// Records a new raw value and restarts the quiet period. The previously
    /// scheduled value, if any, is dropped without being delivered.
    pub fn notify(&self, value: T) {
        let _ = self.tx.send(value);
    }
}

struct DebounceTask<T, F> {
    receiver: mpsc::UnboundedReceiver<T>,
    interval: Duration,
    on_settled: F,
}

impl<T, F> DebounceTask<T, F>
where
    F: FnMut(T),
{
    /// Runs until the handle is dropped. A value still waiting out its quiet
    /// period at that point is discarded.
    async fn run(mut self) {
        let mut pending: Option<(Instant, T)> = None;
        loop {
            let Some((deadline, value)) = pending.take() else {
                let Some(value) = self.receiver.recv().await else {
                    break;
                };
                pending = Some((Instant::now() + self.interval, value));
                continue;
            };

            tokio::select! {
                next = self.receiver.recv() => {
                    let Some(next) = next else {
                        break;
                    };
                    pending = Some((Instant::now() + self.interval, next));
                }
                _ = tokio::time::sleep_until(deadline) => {
                    (self.on_settled)(value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::time;
    use tokio_util::time::FutureExt;

    fn collecting_debouncer(
        interval: Duration,
    ) -> (Debouncer<String>, mpsc::UnboundedReceiver<String>) {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let debouncer = Debouncer::new(interval, move |value: String| {
            let _ = settled_tx.send(value);
        });
        (debouncer, settled_rx)
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn burst_settles_once_with_last_value() {
        let (debouncer, mut settled) = collecting_debouncer(DEFAULT_DEBOUNCE);

        debouncer.notify("a".to_string());
        time::advance(Duration::from_millis(50)).await;
        debouncer.notify("ab".to_string());
        time::advance(Duration::from_millis(50)).await;
        debouncer.notify("abc".to_string());

        let early = settled.recv().timeout(Duration::from_millis(150)).await;
        assert!(early.is_err(), "settled before the quiet period elapsed");

        let value = settled
            .recv()
            .timeout(Duration::from_millis(100))
            .await
            .expect("timed out waiting for settled value");
        assert_eq!(value.as_deref(), Some("abc"));

        let extra = settled.recv().timeout(Duration::from_secs(1)).await;
        assert!(extra.is_err(), "unexpected extra settled value");
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn separated_inputs_settle_separately() {
        let (debouncer, mut settled) = collecting_debouncer(DEFAULT_DEBOUNCE);

        debouncer.notify("dune".to_string());
        let first = settled
            .recv()
            .timeout(Duration::from_secs(1))
            .await
            .expect("first value");
        assert_eq!(first.as_deref(), Some("dune"));

        debouncer.notify("herbert".to_string());
        let second = settled
            .recv()
            .timeout(Duration::from_secs(1))
            .await
            .expect("second value");
        assert_eq!(second.as_deref(), Some("herbert"));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn dropping_the_handle_cancels_pending_value() {
        let (debouncer, mut settled) = collecting_debouncer(DEFAULT_DEBOUNCE);

        debouncer.notify("abandoned".to_string());
        time::advance(Duration::from_millis(10)).await;
        drop(debouncer);

        // The task exits and drops the callback, closing the channel.
        let result = settled
            .recv()
            .timeout(Duration::from_secs(1))
            .await
            .expect("channel should close promptly");
        assert_eq!(result, None);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn instances_keep_independent_timers() {
        let (fast, mut fast_settled) = collecting_debouncer(Duration::from_millis(20));
        let (slow, mut slow_settled) = collecting_debouncer(Duration::from_millis(500));

        slow.notify("slow".to_string());
        fast.notify("fast".to_string());

        let value = fast_settled
            .recv()
            .timeout(Duration::from_millis(100))
            .await
            .expect("fast debouncer should settle");
        assert_eq!(value.as_deref(), Some("fast"));
        assert!(slow_settled.try_recv().is_err());

        let value = slow_settled
            .recv()
            .timeout(Duration::from_secs(1))
            .await
            .expect("slow debouncer should settle");
        assert_eq!(value.as_deref(), Some("slow"));
    }
}
