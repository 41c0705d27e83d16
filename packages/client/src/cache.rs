use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use common::{ProblemMap, ProblemModelMap};
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, info, warn};

use crate::error::{CacheError, ClientError};
use crate::source::ReferenceSource;

/// The reference collections the cache knows how to load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Problems,
    ProblemModels,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Problems => "problems",
            Self::ProblemModels => "problem models",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Loaded<T> = Result<Arc<T>, Arc<ClientError>>;
type PendingFetch<T> = Shared<BoxFuture<'static, Loaded<T>>>;

enum Slot<T> {
    Empty,
    Pending(PendingFetch<T>),
    Ready(Arc<T>),
}

/// Memo for one collection. The lock is never held across an `.await`.
struct Memo<T> {
    kind: RequestKind,
    slot: Mutex<Slot<T>>,
}

impl<T: Send + Sync + 'static> Memo<T> {
    fn new(kind: RequestKind) -> Self {
        Self {
            kind,
            slot: Mutex::new(Slot::Empty),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn get<F>(&self, start: F) -> Result<Arc<T>, CacheError>
    where
        F: FnOnce() -> BoxFuture<'static, Loaded<T>>,
    {
        let kind = self.kind;
        let pending = {
            let mut slot = self.lock();
            let joined = match &*slot {
                Slot::Ready(data) => return Ok(Arc::clone(data)),
                Slot::Pending(fetch) => Some(fetch.clone()),
                Slot::Empty => None,
            };
            match joined {
                Some(fetch) => {
                    debug!(%kind, "Joining in-flight reference fetch");
                    fetch
                }
                None => {
                    debug!(%kind, "Starting reference fetch");
                    let fetch = start().shared();
                    *slot = Slot::Pending(fetch.clone());
                    fetch
                }
            }
        };

        let result = pending.clone().await;
        self.settle(&pending, &result);
        result.map_err(|source| CacheError::Fetch { kind, source })
    }

    /// Record the outcome of `fetch`, unless the slot has since been
    /// invalidated or replaced by a newer request.
    fn settle(&self, fetch: &PendingFetch<T>, result: &Loaded<T>) {
        let mut slot = self.lock();
        if !matches!(&*slot, Slot::Pending(current) if current.ptr_eq(fetch)) {
            return;
        }
        match result {
            Ok(data) => *slot = Slot::Ready(Arc::clone(data)),
            Err(e) => {
                *slot = Slot::Empty;
                warn!(kind = %self.kind, error = %e, "Reference fetch failed");
            }
        }
    }

    fn is_cached(&self) -> bool {
        matches!(*self.lock(), Slot::Ready(_))
    }

    fn invalidate(&self) {
        let previous = std::mem::replace(&mut *self.lock(), Slot::Empty);
        if !matches!(previous, Slot::Empty) {
            info!(kind = %self.kind, "Reference data invalidated");
        }
    }
}

/// Process-wide memo of immutable reference collections.
///
/// Each kind is fetched at most once while it stays cached. Callers that
/// arrive while a fetch is outstanding await that same request and get the
/// same `Arc`. A failed fetch is reported to every waiter and then forgotten,
/// so the next call starts a fresh request. Nothing is retried automatically.
pub struct ReferenceCache {
    source: Arc<dyn ReferenceSource>,
    problems: Memo<ProblemMap>,
    problem_models: Memo<ProblemModelMap>,
}

impl ReferenceCache {
    pub fn new(source: Arc<dyn ReferenceSource>) -> Self {
        Self {
            source,
            problems: Memo::new(RequestKind::Problems),
            problem_models: Memo::new(RequestKind::ProblemModels),
        }
    }

    pub async fn problems(&self) -> Result<Arc<ProblemMap>, CacheError> {
        let source = Arc::clone(&self.source);
        self.problems.get(move || load_problems(source).boxed()).await
    }

    pub async fn problem_models(&self) -> Result<Arc<ProblemModelMap>, CacheError> {
        let source = Arc::clone(&self.source);
        self.problem_models
            .get(move || load_problem_models(source).boxed())
            .await
    }

    /// Load both collections concurrently.
    pub async fn reference_data(
        &self,
    ) -> Result<(Arc<ProblemMap>, Arc<ProblemModelMap>), CacheError> {
        futures::try_join!(self.problems(), self.problem_models())
    }

    /// Whether a resolved value is held for `kind`.
    pub fn is_cached(&self, kind: RequestKind) -> bool {
        match kind {
            RequestKind::Problems => self.problems.is_cached(),
            RequestKind::ProblemModels => self.problem_models.is_cached(),
        }
    }

    /// Drop whatever is held for `kind`. An in-flight request keeps running
    /// for its current waiters but will not repopulate the slot.
    pub fn invalidate(&self, kind: RequestKind) {
        match kind {
            RequestKind::Problems => self.problems.invalidate(),
            RequestKind::ProblemModels => self.problem_models.invalidate(),
        }
    }
}

async fn load_problems(source: Arc<dyn ReferenceSource>) -> Loaded<ProblemMap> {
    let map = source.fetch_problems().await.map_err(Arc::new)?;
    info!(kind = %RequestKind::Problems, count = map.len(), "Reference data loaded");
    Ok(Arc::new(map))
}

async fn load_problem_models(source: Arc<dyn ReferenceSource>) -> Loaded<ProblemModelMap> {
    let map = source.fetch_problem_models().await.map_err(Arc::new)?;
    info!(kind = %RequestKind::ProblemModels, count = map.len(), "Reference data loaded");
    Ok(Arc::new(map))
}
