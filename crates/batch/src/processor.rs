//! Request coalescing over a single evaluator
//!
//! States: idle → accumulating → (flush) → idle. The tick loop only runs
//! while something is queued; it is spawned by the first `submit` after a
//! flush and exits right after flushing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::config::BatchConfig;
use crate::error::BatchError;

/// Boxed evaluator future.
pub type EvalFuture<O> = Pin<Box<dyn Future<Output = anyhow::Result<Vec<O>>> + Send>>;

type Evaluator<I, O> = Box<dyn Fn(Vec<I>) -> EvalFuture<O> + Send + Sync>;

type Reply<O> = oneshot::Sender<Result<Vec<O>, BatchError>>;

/// One caller's inputs and where to send its slice of the outputs.
struct Request<I, O> {
    inputs: Vec<I>,
    reply: Reply<O>,
}

/// What the loop should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickAction {
    Wait,
    Flush,
}

/// Queue plus the counters the tick loop inspects.
pub(crate) struct QueueState<I, O> {
    requests: Vec<Request<I, O>>,
    queue_size: usize,
    last_queue_size: usize,
    idle_ticks: u32,
    running: bool,
}

impl<I, O> Default for QueueState<I, O> {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
            queue_size: 0,
            last_queue_size: 0,
            idle_ticks: 0,
            running: false,
        }
    }
}

impl<I, O> QueueState<I, O> {
    /// Enqueue a request. Returns true if the tick loop needs starting.
    fn push(&mut self, inputs: Vec<I>, reply: Reply<O>) -> bool {
        self.queue_size += inputs.len();
        self.requests.push(Request { inputs, reply });
        self.idle_ticks = 0;

        let start = !self.running;
        self.running = true;
        start
    }

    /// Advance one tick.
    pub(crate) fn tick(&mut self, config: &BatchConfig) -> TickAction {
        if self.queue_size >= config.batch_size_threshold {
            return TickAction::Flush;
        }

        if self.queue_size > self.last_queue_size {
            self.last_queue_size = self.queue_size;
            self.idle_ticks = 0;
            return TickAction::Wait;
        }

        self.idle_ticks += 1;
        if self.idle_ticks >= config.idle_ticks {
            TickAction::Flush
        } else {
            TickAction::Wait
        }
    }

    /// Take every queued request and return to idle.
    fn drain(&mut self) -> Vec<Request<I, O>> {
        self.queue_size = 0;
        self.last_queue_size = 0;
        self.idle_ticks = 0;
        self.running = false;
        std::mem::take(&mut self.requests)
    }

    pub(crate) fn queue_size(&self) -> usize {
        self.queue_size
    }

    #[cfg(test)]
    fn idle_ticks(&self) -> u32 {
        self.idle_ticks
    }

    #[cfg(test)]
    fn running(&self) -> bool {
        self.running
    }
}

struct Shared<I, O> {
    config: BatchConfig,
    evaluator: Evaluator<I, O>,
    state: Mutex<QueueState<I, O>>,
}

/// Coalesces many small `submit` calls into few evaluator calls.
///
/// Cloning is cheap and clones share one queue. Independent processors
/// share nothing.
pub struct BatchProcessor<I, O> {
    shared: Arc<Shared<I, O>>,
}

impl<I, O> Clone for BatchProcessor<I, O> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<I, O> BatchProcessor<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Wrap a synchronous evaluator.
    pub fn new<F>(config: BatchConfig, evaluator: F) -> Self
    where
        F: Fn(Vec<I>) -> anyhow::Result<Vec<O>> + Send + Sync + 'static,
    {
        Self::from_boxed(
            config,
            Box::new(move |inputs| Box::pin(std::future::ready(evaluator(inputs)))),
        )
    }

    /// Wrap an asynchronous evaluator.
    pub fn new_async<F, Fut>(config: BatchConfig, evaluator: F) -> Self
    where
        F: Fn(Vec<I>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Vec<O>>> + Send + 'static,
    {
        Self::from_boxed(config, Box::new(move |inputs| Box::pin(evaluator(inputs))))
    }

    fn from_boxed(config: BatchConfig, evaluator: Evaluator<I, O>) -> Self {
        Self {
            shared: Arc::new(Shared {
                config: config.normalized(),
                evaluator,
                state: Mutex::new(QueueState::default()),
            }),
        }
    }

    pub fn config(&self) -> BatchConfig {
        self.shared.config
    }

    /// Inputs queued and not yet flushed.
    pub fn pending_inputs(&self) -> usize {
        self.shared.state.lock().queue_size()
    }

    /// Queue `inputs` and return a handle to their outputs.
    ///
    /// The inputs are enqueued before this returns. The handle resolves with
    /// exactly one output per input, in order, or with the failure of the
    /// flush the inputs were part of. Outside a tokio runtime the handle
    /// resolves with [`BatchError::NoRuntime`] and nothing is queued.
    pub fn submit(&self, inputs: Vec<I>) -> BatchHandle<O> {
        let (reply, rx) = oneshot::channel();

        if inputs.is_empty() {
            let _ = reply.send(Ok(Vec::new()));
            return BatchHandle { rx };
        }

        let Ok(runtime) = Handle::try_current() else {
            let _ = reply.send(Err(BatchError::NoRuntime));
            return BatchHandle { rx };
        };

        let start = self.shared.state.lock().push(inputs, reply);
        if start {
            runtime.spawn(TickLoop::new(Arc::clone(&self.shared)).run());
        }

        BatchHandle { rx }
    }
}

/// Owns one tick loop cycle.
///
/// If the loop is dropped before it drains the queue (its runtime shut
/// down, or the task was never polled), every queued caller gets
/// [`BatchError::Dropped`] and the next `submit` starts a fresh cycle.
struct TickLoop<I, O> {
    shared: Arc<Shared<I, O>>,
    drained: bool,
}

impl<I, O> TickLoop<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    fn new(shared: Arc<Shared<I, O>>) -> Self {
        Self {
            shared,
            drained: false,
        }
    }

    async fn run(mut self) {
        loop {
            tokio::task::yield_now().await;

            let requests = {
                let mut state = self.shared.state.lock();
                match state.tick(&self.shared.config) {
                    TickAction::Wait => continue,
                    TickAction::Flush => state.drain(),
                }
            };
            self.drained = true;

            self.shared.flush(requests).await;
            return;
        }
    }
}

impl<I, O> Drop for TickLoop<I, O> {
    fn drop(&mut self) {
        if self.drained {
            return;
        }

        let requests = self.shared.state.lock().drain();
        if !requests.is_empty() {
            warn!(callers = requests.len(), "tick loop stopped before flushing");
        }
        for request in requests {
            let _ = request.reply.send(Err(BatchError::Dropped));
        }
    }
}

impl<I, O> Shared<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{

    async fn flush(&self, mut requests: Vec<Request<I, O>>) {
        let lens: Vec<usize> = requests.iter().map(|r| r.inputs.len()).collect();
        let expected: usize = lens.iter().sum();
        let inputs: Vec<I> = requests
            .iter_mut()
            .flat_map(|r| std::mem::take(&mut r.inputs))
            .collect();

        debug!(callers = requests.len(), inputs = expected, "flushing batch");

        let failure = match (self.evaluator)(inputs).await {
            Ok(outputs) if outputs.len() == expected => {
                let mut outputs = outputs.into_iter();
                for (request, len) in requests.into_iter().zip(lens) {
                    let slice: Vec<O> = outputs.by_ref().take(len).collect();
                    let _ = request.reply.send(Ok(slice));
                }
                return;
            }
            Ok(outputs) => BatchError::LengthMismatch {
                expected,
                actual: outputs.len(),
            },
            Err(err) => BatchError::Evaluator(Arc::new(err)),
        };

        warn!(callers = requests.len(), error = %failure, "batch evaluation failed");
        for request in requests {
            let _ = request.reply.send(Err(failure.clone()));
        }
    }
}

/// Pending outputs of one `submit` call.
pub struct BatchHandle<O> {
    rx: oneshot::Receiver<Result<Vec<O>, BatchError>>,
}

impl<O> Future for BatchHandle<O> {
    type Output = Result<Vec<O>, BatchError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(BatchError::Dropped)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    fn config(threshold: usize) -> BatchConfig {
        BatchConfig::new(threshold)
    }

    /// Doubles its inputs and records every batch it sees.
    fn recording(threshold: usize) -> (BatchProcessor<u32, u32>, Arc<Mutex<Vec<Vec<u32>>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&calls);
        let processor = BatchProcessor::new(config(threshold), move |inputs: Vec<u32>| {
            seen.lock().push(inputs.clone());
            Ok(inputs.into_iter().map(|x| x * 2).collect())
        });
        (processor, calls)
    }

    fn queue_with(size: usize) -> QueueState<u32, u32> {
        let mut state = QueueState::default();
        let (reply, _rx) = oneshot::channel();
        state.push(vec![0; size], reply);
        state
    }

    #[test]
    fn tick_flushes_at_threshold() {
        let mut state = queue_with(4);
        assert_eq!(state.tick(&config(4)), TickAction::Flush);
    }

    #[test]
    fn tick_flushes_after_idle_window() {
        let mut state = queue_with(1);
        let config = config(100);

        // First tick sees growth, then three quiet ticks.
        assert_eq!(state.tick(&config), TickAction::Wait);
        assert_eq!(state.idle_ticks(), 0);
        assert_eq!(state.tick(&config), TickAction::Wait);
        assert_eq!(state.tick(&config), TickAction::Wait);
        assert_eq!(state.tick(&config), TickAction::Flush);
    }

    #[test]
    fn growth_resets_idle_count() {
        let mut state = queue_with(1);
        let config = config(100);

        state.tick(&config);
        state.tick(&config);
        state.tick(&config);
        assert_eq!(state.idle_ticks(), 2);

        let (reply, _rx) = oneshot::channel();
        assert!(!state.push(vec![0], reply));
        assert_eq!(state.tick(&config), TickAction::Wait);
        assert_eq!(state.idle_ticks(), 0);
    }

    #[test]
    fn drain_returns_to_idle() {
        let mut state = queue_with(3);
        assert!(state.running());

        let drained = state.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(state.queue_size(), 0);
        assert!(!state.running());

        let (reply, _rx) = oneshot::channel();
        assert!(state.push(vec![1], reply), "next push restarts the loop");
    }

    #[tokio::test]
    async fn outputs_are_sliced_per_caller_in_order() {
        let (processor, calls) = recording(100);

        let a = processor.submit(vec![1, 2]);
        let b = processor.submit(vec![3]);
        let c = processor.submit(vec![4, 5, 6]);
        assert_eq!(processor.pending_inputs(), 6);

        assert_eq!(a.await.unwrap(), vec![2, 4]);
        assert_eq!(b.await.unwrap(), vec![6]);
        assert_eq!(c.await.unwrap(), vec![8, 10, 12]);
        assert_eq!(*calls.lock(), vec![vec![1, 2, 3, 4, 5, 6]]);
    }

    #[tokio::test]
    async fn threshold_coalesces_into_one_call() {
        let (processor, calls) = recording(8);

        let handles: Vec<_> = (0..8).map(|x| processor.submit(vec![x])).collect();
        for (x, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await.unwrap(), vec![2 * x as u32]);
        }

        assert_eq!(calls.lock().len(), 1);
        assert_eq!(calls.lock()[0].len(), 8);
    }

    #[tokio::test]
    async fn single_input_flushes_once_after_idle() {
        let (processor, calls) = recording(512);

        assert_eq!(processor.submit(vec![21]).await.unwrap(), vec![42]);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(calls.lock().len(), 1);
        assert_eq!(processor.pending_inputs(), 0);
    }

    #[tokio::test]
    async fn empty_submit_resolves_immediately() {
        let (processor, calls) = recording(4);
        assert!(processor.submit(Vec::new()).await.unwrap().is_empty());
        assert!(calls.lock().is_empty());
    }

    #[tokio::test]
    async fn failure_reaches_every_caller_and_queue_recovers() {
        let fail = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&fail);
        let processor = BatchProcessor::new(config(100), move |inputs: Vec<u32>| {
            if flag.load(Ordering::SeqCst) {
                anyhow::bail!("model not loaded");
            }
            Ok(inputs)
        });

        let a = processor.submit(vec![1]);
        let b = processor.submit(vec![2, 3]);
        for result in [a.await, b.await] {
            match result {
                Err(BatchError::Evaluator(err)) => assert_eq!(err.to_string(), "model not loaded"),
                other => panic!("expected evaluator failure, got {other:?}"),
            }
        }

        fail.store(false, Ordering::SeqCst);
        assert_eq!(processor.pending_inputs(), 0);
        assert_eq!(processor.submit(vec![7]).await.unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn wrong_output_count_is_a_failure() {
        let processor = BatchProcessor::new(config(100), |_inputs: Vec<u32>| Ok(vec![0u32]));

        let a = processor.submit(vec![1]);
        let b = processor.submit(vec![2]);

        for result in [a.await, b.await] {
            assert!(matches!(
                result,
                Err(BatchError::LengthMismatch {
                    expected: 2,
                    actual: 1
                })
            ));
        }
    }

    #[tokio::test]
    async fn async_evaluator_is_awaited() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let processor = BatchProcessor::new_async(config(2), move |inputs: Vec<u32>| {
            let counter = Arc::clone(&counter);
            async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, anyhow::Error>(inputs.into_iter().map(|x| x + 1).collect())
            }
        });

        let a = processor.submit(vec![1]);
        let b = processor.submit(vec![2]);
        assert_eq!(a.await.unwrap(), vec![2]);
        assert_eq!(b.await.unwrap(), vec![3]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn submit_outside_runtime_fails_without_jamming() {
        let (processor, calls) = recording(512);

        let orphan = processor.submit(vec![1]);
        assert_eq!(processor.pending_inputs(), 0);

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        assert!(matches!(rt.block_on(orphan), Err(BatchError::NoRuntime)));

        let out = rt.block_on(async {
            tokio::time::timeout(Duration::from_millis(500), processor.submit(vec![2])).await
        });
        assert_eq!(out.unwrap().unwrap(), vec![4]);
        assert_eq!(*calls.lock(), vec![vec![2]]);
    }

    #[test]
    fn dropped_runtime_releases_waiters_and_resets_loop() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&calls);
        let config = BatchConfig {
            batch_size_threshold: 512,
            idle_ticks: 1_000,
        };
        let processor = BatchProcessor::new(config, move |inputs: Vec<u32>| {
            seen.lock().push(inputs.clone());
            Ok(inputs)
        });

        let first = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let stranded = first.block_on(async { processor.submit(vec![1]) });
        drop(first);
        assert_eq!(processor.pending_inputs(), 0);

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        assert!(matches!(rt.block_on(stranded), Err(BatchError::Dropped)));

        let out = rt.block_on(async {
            tokio::time::timeout(Duration::from_millis(500), processor.submit(vec![2])).await
        });
        assert_eq!(out.unwrap().unwrap(), vec![2]);
        assert_eq!(*calls.lock(), vec![vec![2]]);
    }

    #[tokio::test]
    async fn separate_processors_do_not_share_queues() {
        let (first, first_calls) = recording(100);
        let (second, second_calls) = recording(100);

        let a = first.submit(vec![1]);
        let b = second.submit(vec![2]);
        assert_eq!(a.await.unwrap(), vec![2]);
        assert_eq!(b.await.unwrap(), vec![4]);

        assert_eq!(*first_calls.lock(), vec![vec![1]]);
        assert_eq!(*second_calls.lock(), vec![vec![2]]);
    }
}
