use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::errors::CoreError;
use super::refresh::RefreshBroadcaster;

/// Message stored when a producer fails in a way that carries no
/// recognizable error (e.g. it panicked).
pub const GENERIC_FETCH_ERROR: &str = "An error occurred";

type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T, CoreError>> + Send + 'static>>;
type Producer<T, D> = Arc<dyn Fn(D) -> BoxFuture<T> + Send + Sync>;

/// Loading / error / data state of one asynchronous call.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    /// Last successful result. Kept across re-runs until replaced.
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }
}

/// What a view should show. Exactly one variant applies at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FetchView<'a, T> {
    Loading,
    Error(&'a str),
    Empty,
    Ready(&'a T),
}

impl<T> FetchState<T> {
    /// Classify the state; any present data counts as content.
    #[must_use]
    pub fn view(&self) -> FetchView<'_, T> {
        self.view_with(|_| false)
    }

    /// Classify the state, treating data for which `is_empty` holds as empty.
    ///
    /// Precedence: loading, then error, then empty, then content.
    pub fn view_with<F>(&self, is_empty: F) -> FetchView<'_, T>
    where
        F: Fn(&T) -> bool,
    {
        if self.loading {
            return FetchView::Loading;
        }
        if let Some(message) = self.error.as_deref() {
            return FetchView::Error(message);
        }
        match &self.data {
            Some(data) if !is_empty(data) => FetchView::Ready(data),
            _ => FetchView::Empty,
        }
    }
}

struct Inner<T, D> {
    producer: Producer<T, D>,
    state: watch::Sender<FetchState<T>>,
    deps: Mutex<Option<D>>,
    generation: AtomicU64,
    mounted: AtomicBool,
}

impl<T, D> Inner<T, D> {
    fn is_current(&self, generation: u64) -> bool {
        self.mounted.load(Ordering::SeqCst) && self.generation.load(Ordering::SeqCst) == generation
    }
}

/// Runs a producer whenever its dependencies change and publishes the
/// outcome as a [`FetchState`].
///
/// Each run gets a generation number. Only the latest run of a mounted
/// orchestrator may publish; results of superseded runs are dropped when
/// they arrive. In-flight requests are never aborted, only ignored.
///
/// Handles are cheap to clone and share the same state. Runs are spawned
/// on the ambient tokio runtime.
pub struct FetchOrchestrator<T, D> {
    inner: Arc<Inner<T, D>>,
}

impl<T, D> Clone for FetchOrchestrator<T, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, D> std::fmt::Debug for FetchOrchestrator<T, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchOrchestrator")
            .field("generation", &self.inner.generation.load(Ordering::SeqCst))
            .field("mounted", &self.inner.mounted.load(Ordering::SeqCst))
            .finish()
    }
}

impl<T, D> FetchOrchestrator<T, D>
where
    T: Send + Sync + 'static,
    D: Clone + PartialEq + Send + 'static,
{
    /// Create an orchestrator around `producer`. Nothing runs until the
    /// first call to [`set_dependencies`](Self::set_dependencies).
    pub fn new<F, Fut>(producer: F) -> Self
    where
        F: Fn(D) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
    {
        let producer: Producer<T, D> = Arc::new(move |deps| Box::pin(producer(deps)));
        let (state, _) = watch::channel(FetchState::default());
        Self {
            inner: Arc::new(Inner {
                producer,
                state,
                deps: Mutex::new(None),
                generation: AtomicU64::new(0),
                mounted: AtomicBool::new(true),
            }),
        }
    }

    /// Record new dependency values and re-run if they differ from the
    /// previous ones. Returns whether a run was started.
    pub fn set_dependencies(&self, deps: D) -> bool {
        if !self.is_mounted() {
            return false;
        }
        {
            let mut current = self.inner.deps.lock().unwrap_or_else(|p| p.into_inner());
            if current.as_ref() == Some(&deps) {
                return false;
            }
            *current = Some(deps.clone());
        }
        self.start(deps);
        true
    }

    /// Re-run with the current dependencies. Returns `false` when no
    /// dependencies were set yet or the orchestrator is unmounted.
    pub fn refresh(&self) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let deps = self
            .inner
            .deps
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        match deps {
            Some(deps) => {
                self.start(deps);
                true
            }
            None => false,
        }
    }

    /// Re-run every time `broadcaster` fires, until unmounted.
    pub fn follow(&self, broadcaster: &RefreshBroadcaster) -> JoinHandle<()> {
        self.spawn_follower(broadcaster, |orchestrator| {
            orchestrator.refresh();
        })
    }

    /// Like [`follow`](Self::follow), but reads fresh dependencies from
    /// `current` on every tick. Changed values start a run through
    /// [`set_dependencies`](Self::set_dependencies); unchanged ones re-run
    /// as a plain refresh.
    pub fn follow_with<F>(&self, broadcaster: &RefreshBroadcaster, current: F) -> JoinHandle<()>
    where
        F: Fn() -> D + Send + 'static,
    {
        self.spawn_follower(broadcaster, move |orchestrator| {
            if !orchestrator.set_dependencies(current()) {
                orchestrator.refresh();
            }
        })
    }

    fn spawn_follower<F>(&self, broadcaster: &RefreshBroadcaster, on_tick: F) -> JoinHandle<()>
    where
        F: Fn(&Self) + Send + 'static,
    {
        let mut updates = broadcaster.subscribe();
        let weak: Weak<Inner<T, D>> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let Some(inner) = weak.upgrade() else { break };
                let orchestrator = FetchOrchestrator { inner };
                if !orchestrator.is_mounted() {
                    break;
                }
                on_tick(&orchestrator);
            }
        })
    }

    /// Stop publishing. Results still in flight are discarded.
    pub fn unmount(&self) {
        self.inner.mounted.store(false, Ordering::SeqCst);
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.load(Ordering::SeqCst)
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.inner.state.subscribe()
    }

    /// Current generation. Bumped by every run and by `unmount`.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    fn start(&self, deps: D) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        let fut = (self.inner.producer)(deps);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            // A nested task turns a panicking producer into an ordinary failure.
            let outcome = match tokio::spawn(fut).await {
                Ok(Ok(data)) => Ok(data),
                Ok(Err(e)) => {
                    warn!(error = %e, "Fetch failed");
                    Err(e.user_message())
                }
                Err(join_err) => {
                    warn!(error = %join_err, "Fetch task aborted");
                    Err(GENERIC_FETCH_ERROR.to_string())
                }
            };

            let applied = inner.state.send_if_modified(|state| {
                if !inner.is_current(generation) {
                    return false;
                }
                match outcome {
                    Ok(data) => state.data = Some(data),
                    Err(message) => state.error = Some(message),
                }
                state.loading = false;
                true
            });
            if !applied {
                debug!(generation, "Discarded superseded fetch result");
            }
        });
    }
}

impl<T, D> FetchOrchestrator<T, D>
where
    T: Clone + Send + Sync + 'static,
    D: Clone + PartialEq + Send + 'static,
{
    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> FetchState<T> {
        self.inner.state.borrow().clone()
    }

    /// Wait until no run is in flight, then return the state.
    /// Before the first run the state counts as loading, so this waits for it.
    pub async fn wait_until_settled(&self) -> FetchState<T> {
        let mut rx = self.subscribe();
        let settled = match rx.wait_for(|state| !state.loading).await {
            Ok(state) => FetchState::clone(&state),
            Err(_) => self.state(),
        };
        settled
    }
}
