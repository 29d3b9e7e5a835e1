//! The callback registry.
//!
//! [`CallbackRegistry`] is a mutex-guarded [`CallbackQueue`] plus a condition
//! variable. Producers on any thread enqueue callbacks; each enqueue signals
//! the condition variable once. A single consumer waits for the earliest due
//! time, drains everything due in `(due, id)` order, and runs the actions
//! after the lock has been released.
//!
//! # Consumer Loop
//!
//! ```
//! use deferral::{CallbackRegistry, WaitOutcome};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let registry = Arc::new(CallbackRegistry::new());
//!
//! let producer = {
//!     let registry = Arc::clone(&registry);
//!     thread::spawn(move || {
//!         registry.add(|| println!("tick"), 0.01);
//!     })
//! };
//!
//! producer.join().unwrap();
//! while registry.wait(1.0) == WaitOutcome::Due {
//!     registry.run_due(0);
//!     if registry.is_empty() {
//!         break;
//!     }
//! }
//! ```
//!
//! # Locking
//!
//! Every public operation takes the lock exactly once and works on the
//! guarded [`CallbackQueue`] through its lock-free helpers, so no operation
//! re-enters the lock and a plain (non-recursive) mutex suffices.

mod builder;
pub mod callback;
pub mod interrupt;
pub mod queue;
pub mod role;

pub use builder::RegistryBuilder;
pub use callback::{Action, Callback, PendingCallback};
pub use interrupt::{InterruptCheck, InterruptFlag, NeverInterrupt};
pub use queue::CallbackQueue;
pub use role::{AnyThread, ConsumerRole, OwnerThread};

use crate::config::RegistryConfig;
use crate::time::{TimeSource, WallClock};
use crate::tracing_compat::{debug, info, trace, warn};
use crate::types::{CallbackId, Time};
use parking_lot::{Condvar, Mutex};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// How a call to [`CallbackRegistry::wait`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitOutcome {
    /// At least one callback is due.
    Due,
    /// The timeout elapsed and nothing is due.
    TimedOut,
    /// The interrupt source fired before anything became due.
    Interrupted,
}

impl WaitOutcome {
    /// Returns true if a callback is due.
    #[must_use]
    pub const fn is_due(self) -> bool {
        matches!(self, Self::Due)
    }

    /// Returns true if the wait was interrupted.
    #[must_use]
    pub const fn is_interrupted(self) -> bool {
        matches!(self, Self::Interrupted)
    }
}

impl fmt::Display for WaitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Due => write!(f, "due"),
            Self::TimedOut => write!(f, "timed out"),
            Self::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// Thread-safe registry of deferred callbacks.
///
/// # Roles
///
/// - **Producers** (any thread): [`add`](Self::add), [`add_at`](Self::add_at),
///   [`add_labeled`](Self::add_labeled), [`add_fn`](Self::add_fn),
///   [`wake`](Self::wake).
/// - **Observers** (any thread, point-in-time answers):
///   [`is_empty`](Self::is_empty), [`len`](Self::len),
///   [`next_timestamp`](Self::next_timestamp), [`due`](Self::due).
/// - **Consumer** (the single role checked by the injected
///   [`ConsumerRole`]): [`take`](Self::take), [`wait`](Self::wait),
///   [`run_due`](Self::run_due), [`list`](Self::list).
///
/// Pending callbacks still in the registry when it is dropped are dropped
/// without being run.
pub struct CallbackRegistry<T: TimeSource = WallClock> {
    clock: Arc<T>,
    queue: Mutex<CallbackQueue>,
    wakeup: Condvar,
    config: RegistryConfig,
    interrupt: Arc<dyn InterruptCheck>,
    role: Arc<dyn ConsumerRole>,
}

impl CallbackRegistry<WallClock> {
    /// Creates a registry on a fresh [`WallClock`] with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(WallClock::new()))
    }

    /// Starts a [`RegistryBuilder`].
    #[must_use]
    pub fn builder() -> RegistryBuilder<WallClock> {
        RegistryBuilder::new()
    }
}

impl Default for CallbackRegistry<WallClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSource> CallbackRegistry<T> {
    /// Creates a registry on the given time source with default settings.
    #[must_use]
    pub fn with_clock(clock: Arc<T>) -> Self {
        Self::from_parts(
            clock,
            RegistryConfig::default(),
            Arc::new(NeverInterrupt),
            Arc::new(AnyThread),
        )
    }

    pub(crate) fn from_parts(
        clock: Arc<T>,
        config: RegistryConfig,
        interrupt: Arc<dyn InterruptCheck>,
        role: Arc<dyn ConsumerRole>,
    ) -> Self {
        info!(
            max_wait_slice_ms = config.max_wait_slice.as_millis() as u64,
            unbounded_wait_secs = config.unbounded_wait_secs,
            clock = std::any::type_name::<T>(),
            "callback registry created"
        );
        Self {
            clock,
            queue: Mutex::new(CallbackQueue::new()),
            wakeup: Condvar::new(),
            config,
            interrupt,
            role,
        }
    }

    /// Returns the current time from the registry's clock.
    #[must_use]
    pub fn now(&self) -> Time {
        self.clock.now()
    }

    /// Returns the registry's clock.
    #[must_use]
    pub fn clock(&self) -> &Arc<T> {
        &self.clock
    }

    /// Returns the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // =========================================================================
    // Producers
    // =========================================================================

    /// Schedules `f` to run `delay_secs` seconds from now.
    ///
    /// A zero or negative delay makes the callback due immediately. Negative
    /// delays still order by their due time: `add(a, -1.0)` followed by
    /// `add(b, -5.0)` drains `b` first.
    pub fn add<F>(&self, f: F, delay_secs: f64) -> CallbackId
    where
        F: FnOnce() + Send + 'static,
    {
        let due = self.now().saturating_add_secs_f64(delay_secs);
        self.enqueue(due, Cow::Borrowed(callback::CLOSURE_LABEL), Box::new(f))
    }

    /// Schedules `f` with a description that shows up in [`list`](Self::list).
    pub fn add_labeled<F>(
        &self,
        label: impl Into<Cow<'static, str>>,
        f: F,
        delay_secs: f64,
    ) -> CallbackId
    where
        F: FnOnce() + Send + 'static,
    {
        let due = self.now().saturating_add_secs_f64(delay_secs);
        self.enqueue(due, label.into(), Box::new(f))
    }

    /// Schedules `func(data)` to run `delay_secs` seconds from now.
    pub fn add_fn<D>(&self, func: fn(D), data: D, delay_secs: f64) -> CallbackId
    where
        D: Send + 'static,
    {
        let due = self.now().saturating_add_secs_f64(delay_secs);
        self.enqueue(
            due,
            Cow::Borrowed(callback::FN_LABEL),
            Box::new(move || func(data)),
        )
    }

    /// Schedules `f` to run once the clock reaches `due`.
    pub fn add_at<F>(&self, due: Time, f: F) -> CallbackId
    where
        F: FnOnce() + Send + 'static,
    {
        self.enqueue(due, Cow::Borrowed(callback::CLOSURE_LABEL), Box::new(f))
    }

    fn enqueue(&self, due: Time, label: Cow<'static, str>, action: Action) -> CallbackId {
        let mut queue = self.queue.lock();
        // Sequence numbers are assigned under the lock so that the id order
        // matches insertion order.
        let callback = Callback::from_action(due, label, action);
        let id = callback.id();
        queue.push(callback);
        let pending = queue.len();
        self.wakeup.notify_one();
        drop(queue);

        trace!(id = %id, due = %due, pending, "callback enqueued");
        id
    }

    /// Wakes the consumer's current wait slice without enqueueing anything.
    ///
    /// The consumer re-evaluates its wake condition and its interrupt source.
    pub fn wake(&self) {
        let _queue = self.queue.lock();
        self.wakeup.notify_all();
    }

    // =========================================================================
    // Observers
    // =========================================================================

    /// Returns true if no callbacks are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Returns the number of pending callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    /// Returns the earliest due time, if any callback is pending.
    #[must_use]
    pub fn next_timestamp(&self) -> Option<Time> {
        self.queue.lock().next_due()
    }

    /// Returns true if the earliest callback's due time is not after `at`.
    #[must_use]
    pub fn due(&self, at: Time) -> bool {
        self.queue.lock().is_due(at)
    }

    /// Returns true if a callback is due right now.
    #[must_use]
    pub fn due_now(&self) -> bool {
        let now = self.now();
        self.due(now)
    }

    // =========================================================================
    // Consumer
    // =========================================================================

    /// Removes and returns every callback due at `at`, in `(due, id)` order.
    ///
    /// At most `max_count` callbacks are returned; `0` means no limit. The
    /// whole drain happens under one lock acquisition. The returned actions
    /// have not been run.
    #[must_use]
    pub fn take(&self, max_count: usize, at: Time) -> Vec<Callback> {
        self.check_consumer("take");
        self.take_inner(max_count, at)
    }

    fn take_inner(&self, max_count: usize, at: Time) -> Vec<Callback> {
        let mut queue = self.queue.lock();
        let taken = queue.take_due(max_count, at);
        let remaining = queue.len();
        drop(queue);

        if !taken.is_empty() {
            trace!(
                taken = taken.len(),
                remaining,
                at = %at,
                "took due callbacks"
            );
        }
        taken
    }

    /// Takes every callback due now (up to `max_count`, `0` for no limit)
    /// and runs them in order after releasing the lock.
    ///
    /// Returns the number of callbacks run. A panicking action propagates;
    /// callbacks taken in the same batch after it are dropped unrun.
    pub fn run_due(&self, max_count: usize) -> usize {
        self.check_consumer("run_due");
        let ready = self.take_inner(max_count, self.now());
        let count = ready.len();
        for callback in ready {
            trace!(id = %callback.id(), label = callback.label(), "running callback");
            callback.invoke();
        }
        count
    }

    /// Blocks until a callback is due, the timeout elapses, or the interrupt
    /// source fires.
    ///
    /// A negative `timeout_secs` waits "forever": the configured
    /// `unbounded_wait_secs` is used instead. The thread sleeps at most
    /// `max_wait_slice` at a time and re-evaluates everything after each
    /// slice, so spurious wake-ups and enqueues of later callbacks are
    /// harmless.
    ///
    /// The timeout and due times are measured on the registry's clock while
    /// the slices sleep on real time. On a [`VirtualClock`](crate::VirtualClock)
    /// that nobody advances, a positive timeout therefore never expires and
    /// `wait` only returns once another thread advances the clock, enqueues
    /// a due callback, or raises the interrupt source.
    pub fn wait(&self, timeout_secs: f64) -> WaitOutcome {
        self.check_consumer("wait");
        let timeout_secs = if timeout_secs < 0.0 {
            self.config.unbounded_wait_secs
        } else {
            timeout_secs
        };
        let expires = self.now().saturating_add_secs_f64(timeout_secs);

        let mut queue = self.queue.lock();
        loop {
            let target = queue.next_due().map_or(expires, |next| next.min(expires));
            let now = self.clock.now();
            if target <= now {
                break;
            }
            if self.interrupt.interrupt_requested() {
                debug!("wait interrupted");
                return WaitOutcome::Interrupted;
            }
            let slice =
                Duration::from_nanos(target.duration_since(now)).min(self.config.max_wait_slice);
            debug!(
                slice_ms = slice.as_millis() as u64,
                target = %target,
                "waiting for next due callback"
            );
            let _ = self.wakeup.wait_for(&mut queue, slice);
        }

        let outcome = if queue.is_due(self.clock.now()) {
            WaitOutcome::Due
        } else {
            WaitOutcome::TimedOut
        };
        drop(queue);
        debug!(outcome = %outcome, "wait finished");
        outcome
    }

    /// Lists every pending callback in drain order without removing any.
    ///
    /// `when` in each entry is the signed offset, in seconds, from now.
    #[must_use]
    pub fn list(&self) -> Vec<PendingCallback> {
        self.check_consumer("list");
        let now = self.now();
        self.queue.lock().pending(now)
    }

    fn check_consumer(&self, operation: &'static str) {
        let is_consumer = self.role.is_consumer();
        if !is_consumer {
            warn!(
                operation,
                thread = ?std::thread::current().id(),
                "consumer-only operation called outside the consumer role"
            );
        }
        debug_assert!(is_consumer, "{operation} called outside the consumer role");
    }
}

impl<T: TimeSource> fmt::Debug for CallbackRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pending = self.queue.try_lock().map(|queue| queue.len());
        f.debug_struct("CallbackRegistry")
            .field("clock", &std::any::type_name::<T>())
            .field("pending", &pending)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
