//! Debouncer - collapses bursts of calls to an async function into one execution
//!
//! Every call to [`Debouncer::call`] cancels the timer of the previous call
//! (if it has not fired yet) and starts a new one. When a timer fires, the
//! wrapped function runs once with the most recent input and every caller
//! that joined the burst receives a clone of that single outcome.
//!
//! Errors are not special: when the wrapped function returns `Result`, an
//! `Err` reaches every waiter unchanged. The only error the debouncer
//! produces itself is [`DebounceError::Disposed`], when it is torn down
//! while callers are still waiting.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Errors produced by the debouncer itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DebounceError {
    /// The debouncer was disposed (or dropped) before the pending call ran
    #[error("debouncer disposed before the pending call ran")]
    Disposed,
}

type Callback<I, O> = Arc<dyn Fn(I) -> BoxFuture<'static, O> + Send + Sync>;

/// The single pending-call slot of a debouncer instance
struct Slot<O> {
    timer: Option<JoinHandle<()>>,
    waiters: Vec<oneshot::Sender<O>>,
    /// Bumped on every call and on dispose. A timer task only fires if the
    /// generation it was spawned with is still current.
    generation: u64,
}

fn lock<O>(slot: &Mutex<Slot<O>>) -> MutexGuard<'_, Slot<O>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Wraps an async `Fn(I) -> O` so that rapid calls collapse into one
///
/// Must be used from within a tokio runtime: timers are spawned tasks.
pub struct Debouncer<I, O> {
    callback: Callback<I, O>,
    delay: Duration,
    slot: Arc<Mutex<Slot<O>>>,
    /// Held for the duration of each execution of `callback`
    running: Arc<tokio::sync::Mutex<()>>,
}

impl<I, O> Debouncer<I, O>
where
    I: Send + 'static,
    O: Clone + Send + 'static,
{
    pub fn new<F, Fut>(delay: Duration, callback: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = O> + Send + 'static,
    {
        Debouncer {
            callback: Arc::new(move |input: I| callback(input).boxed()),
            delay,
            slot: Arc::new(Mutex::new(Slot {
                timer: None,
                waiters: Vec::new(),
                generation: 0,
            })),
            running: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Schedule a call with `input`, superseding any call that has not fired yet
    ///
    /// The returned future resolves with the outcome of whichever call ends
    /// the current burst.
    pub fn call(&self, input: I) -> Pending<O> {
        let (tx, rx) = oneshot::channel();

        let mut slot = lock(&self.slot);
        if let Some(timer) = slot.timer.take() {
            timer.abort();
            tracing::trace!(waiters = slot.waiters.len(), "Superseded pending call");
        }
        slot.generation = slot.generation.wrapping_add(1);
        slot.waiters.push(tx);

        let timer = Timer {
            callback: Arc::clone(&self.callback),
            delay: self.delay,
            slot: Arc::clone(&self.slot),
            running: Arc::clone(&self.running),
            generation: slot.generation,
        };
        slot.timer = Some(tokio::spawn(timer.fire(input)));

        Pending { rx }
    }
}

impl<I, O> Debouncer<I, O> {
    /// Cancel the pending timer, if any. Waiting callers resolve with
    /// [`DebounceError::Disposed`]. An execution already in flight still
    /// completes and serves the callers of its own burst.
    pub fn dispose(&self) {
        let mut slot = lock(&self.slot);
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        if !slot.waiters.is_empty() {
            tracing::debug!(waiters = slot.waiters.len(), "Disposing debouncer with waiting callers");
        }
        slot.waiters.clear();
        slot.generation = slot.generation.wrapping_add(1);
    }

    /// Whether a timer is scheduled and has not fired yet
    pub fn is_pending(&self) -> bool {
        lock(&self.slot).timer.is_some()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<I, O> Drop for Debouncer<I, O> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Everything a spawned timer needs, detached from the `Debouncer` borrow
struct Timer<I, O> {
    callback: Callback<I, O>,
    delay: Duration,
    slot: Arc<Mutex<Slot<O>>>,
    running: Arc<tokio::sync::Mutex<()>>,
    generation: u64,
}

impl<I, O: Clone> Timer<I, O> {
    async fn fire(self, input: I) {
        tokio::time::sleep(self.delay).await;

        // Claim the burst. A call that slipped in between the wake-up and
        // this lock has bumped the generation and owns the waiters now.
        let waiters = {
            let mut slot = lock(&self.slot);
            if slot.generation != self.generation {
                return;
            }
            slot.timer = None;
            std::mem::take(&mut slot.waiters)
        };

        let _running = self.running.lock().await;
        tracing::debug!(waiters = waiters.len(), "Debounced call firing");
        let outcome = (self.callback)(input).await;

        for waiter in waiters {
            // The caller may have stopped waiting; that is fine.
            let _ = waiter.send(outcome.clone());
        }
    }
}

/// Deferred result of a [`Debouncer::call`]
#[must_use = "a pending call does nothing useful unless awaited"]
pub struct Pending<O> {
    rx: oneshot::Receiver<O>,
}

impl<O> Future for Pending<O> {
    type Output = Result<O, DebounceError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.map_err(|_| DebounceError::Disposed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::{sleep, Instant};

    type Calls = Arc<Mutex<Vec<(String, Instant)>>>;

    /// A debouncer that echoes its input and records when it was invoked
    fn recording(delay_ms: u64) -> (Debouncer<String, String>, Calls) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&calls);
        let debouncer = Debouncer::new(Duration::from_millis(delay_ms), move |input: String| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push((input.clone(), Instant::now()));
                format!("result:{}", input)
            }
        });
        (debouncer, calls)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_once_with_last_input() {
        let (debouncer, calls) = recording(600);
        let start = Instant::now();

        let first = debouncer.call("ger".to_string());
        sleep(Duration::from_millis(100)).await;
        let second = debouncer.call("germ".to_string());
        sleep(Duration::from_millis(100)).await;
        let third = debouncer.call("germany".to_string());

        let (a, b, c) = tokio::join!(first, second, third);
        assert_eq!(a.unwrap(), "result:germany");
        assert_eq!(b.unwrap(), "result:germany");
        assert_eq!(c.unwrap(), "result:germany");

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "germany");
        let fired_at = calls[0].1 - start;
        assert!(fired_at >= Duration::from_millis(800), "fired at {:?}", fired_at);
        assert!(fired_at < Duration::from_millis(810), "fired at {:?}", fired_at);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_calls_run_individually() {
        let (debouncer, calls) = recording(100);

        for query in ["fr", "de", "it"] {
            let result = debouncer.call(query.to_string()).await.unwrap();
            assert_eq!(result, format!("result:{}", query));
            sleep(Duration::from_millis(150)).await;
        }

        let inputs: Vec<String> = calls.lock().unwrap().iter().map(|(i, _)| i.clone()).collect();
        assert_eq!(inputs, vec!["fr", "de", "it"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_caller_gets_superseding_result() {
        let (debouncer, calls) = recording(600);

        let superseded = debouncer.call("france".to_string());
        sleep(Duration::from_millis(300)).await;
        let latest = debouncer.call("germany".to_string());

        assert_eq!(superseded.await.unwrap(), "result:germany");
        assert_eq!(latest.await.unwrap(), "result:germany");
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_reaches_every_waiter() {
        let debouncer: Debouncer<String, Result<usize, String>> =
            Debouncer::new(Duration::from_millis(50), |input: String| async move {
                Err(format!("lookup failed for {}", input))
            });

        let a = debouncer.call("x".to_string());
        let b = debouncer.call("xy".to_string());

        assert_eq!(a.await.unwrap(), Err("lookup failed for xy".to_string()));
        assert_eq!(b.await.unwrap(), Err("lookup failed for xy".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_after_settle_is_not_cached() {
        let (debouncer, calls) = recording(200);

        debouncer.call("spain".to_string()).await.unwrap();
        debouncer.call("spain".to_string()).await.unwrap();

        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_cancels_pending_call() {
        let (debouncer, calls) = recording(600);

        let pending = debouncer.call("norway".to_string());
        assert!(debouncer.is_pending());
        debouncer.dispose();
        assert!(!debouncer.is_pending());

        assert_eq!(pending.await, Err(DebounceError::Disposed));
        sleep(Duration::from_secs(2)).await;
        assert!(calls.lock().unwrap().is_empty());

        // Still usable afterwards
        assert_eq!(debouncer.call("peru".to_string()).await.unwrap(), "result:peru");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_disposes() {
        let (debouncer, calls) = recording(600);

        let pending = debouncer.call("chile".to_string());
        drop(debouncer);

        assert_eq!(pending.await, Err(DebounceError::Disposed));
        sleep(Duration::from_secs(1)).await;
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_is_not_synchronous() {
        let (debouncer, calls) = recording(0);

        let pending = debouncer.call("japan".to_string());
        assert!(calls.lock().unwrap().is_empty());

        assert_eq!(pending.await.unwrap(), "result:japan");
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_executions_do_not_overlap() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_in_flight = Arc::new(AtomicUsize::new(0));

        let debouncer = {
            let in_flight = Arc::clone(&in_flight);
            let max_in_flight = Arc::clone(&max_in_flight);
            Debouncer::new(Duration::from_millis(100), move |input: u32| {
                let in_flight = Arc::clone(&in_flight);
                let max_in_flight = Arc::clone(&max_in_flight);
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_in_flight.fetch_max(now, Ordering::SeqCst);
                    sleep(Duration::from_millis(500)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    input * 2
                }
            })
        };

        let first = debouncer.call(1);
        // First timer fires at 100 and runs until 600; second fires at 250.
        sleep(Duration::from_millis(150)).await;
        let second = debouncer.call(2);

        let (a, b) = tokio::join!(first, second);
        assert_eq!(a.unwrap(), 2);
        assert_eq!(b.unwrap(), 4);
        assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_waiter_does_not_block_others() {
        let (debouncer, _calls) = recording(100);

        let abandoned = debouncer.call("a".to_string());
        let kept = debouncer.call("ab".to_string());
        drop(abandoned);

        assert_eq!(kept.await.unwrap(), "result:ab");
        assert_eq!(debouncer.delay(), Duration::from_millis(100));
    }
}
