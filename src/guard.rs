//! Once-only initialization for a single logical instance.
//!
//! An [`InitCell`] moves through `vacant -> initializing -> ready` exactly once.
//! The check-and-construct sequence runs under a reentrant lock, so concurrent
//! callers wait for the first constructor to finish, while a constructor that
//! asks for its own instance is told so instead of deadlocking.
//!
//! Constructors that depend on each other from different threads are caught
//! the same way: before blocking on a cell, a thread checks the process-wide
//! wait graph, and if the cell's constructor is (transitively) waiting on the
//! caller the request is reported as [`Outcome::Reentered`].

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, OnceLock};
use std::thread::{self, ThreadId};

use parking_lot::{Mutex, ReentrantMutex};

/// What a call to [`InitCell::get_or_init`] observed.
#[derive(Debug)]
pub(crate) enum Outcome<T> {
    /// The constructor ran during this call.
    Created(Arc<T>),
    /// The instance already existed; the constructor was not called.
    Existing(Arc<T>),
    /// The calling thread is inside this cell's constructor, or waiting would
    /// close a cycle of constructors blocked on each other.
    Reentered,
}

/// Cell addresses stand in for cell identities; cells are never freed while
/// a constructor runs in them.
type CellId = usize;

/// Which thread is constructing each cell, and which cell each blocked thread waits for.
#[derive(Default)]
struct WaitGraph {
    owners: HashMap<CellId, ThreadId>,
    waiting: HashMap<ThreadId, CellId>,
}

impl WaitGraph {
    /// Whether `me` blocking on `cell` would wait, through the chain of
    /// owners and what they wait for, on `me` itself.
    fn closes_cycle(&self, me: ThreadId, mut cell: CellId) -> bool {
        // Every edge but the new one is acyclic, so the walk is bounded.
        for _ in 0..=self.waiting.len() {
            let Some(&owner) = self.owners.get(&cell) else {
                return false;
            };
            if owner == me {
                return true;
            }
            match self.waiting.get(&owner) {
                Some(&next) => cell = next,
                None => return false,
            }
        }
        false
    }
}

static WAIT_GRAPH: LazyLock<Mutex<WaitGraph>> = LazyLock::new(|| Mutex::new(WaitGraph::default()));

pub(crate) struct InitCell<T> {
    value: OnceLock<Arc<T>>,
    initializing: ReentrantMutex<Cell<bool>>,
}

impl<T> InitCell<T> {
    pub(crate) fn new() -> Self {
        Self {
            value: OnceLock::new(),
            initializing: ReentrantMutex::new(Cell::new(false)),
        }
    }

    /// Returns the instance if the constructor has completed. Never blocks.
    pub(crate) fn get(&self) -> Option<&Arc<T>> {
        self.value.get()
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.value.get().is_some()
    }

    /// Returns the instance, running `init` first if no instance exists yet.
    ///
    /// `init` is called at most once per cell across all threads, unless it
    /// panics, in which case the cell stays vacant and a later call retries.
    ///
    /// If another thread is constructing this cell, the call waits for it,
    /// unless that constructor is itself waiting on the caller. Such a cycle
    /// returns [`Outcome::Reentered`] instead of blocking.
    pub(crate) fn get_or_init(&self, init: impl FnOnce() -> T) -> Outcome<T> {
        if let Some(value) = self.value.get() {
            return Outcome::Existing(Arc::clone(value));
        }

        let me = thread::current().id();
        let initializing = match self.initializing.try_lock() {
            Some(initializing) => initializing,
            None => {
                {
                    let mut graph = WAIT_GRAPH.lock();
                    if graph.closes_cycle(me, self.id()) {
                        return Outcome::Reentered;
                    }
                    graph.waiting.insert(me, self.id());
                }
                let initializing = self.initializing.lock();
                WAIT_GRAPH.lock().waiting.remove(&me);
                initializing
            }
        };
        if let Some(value) = self.value.get() {
            return Outcome::Existing(Arc::clone(value));
        }
        if initializing.get() {
            return Outcome::Reentered;
        }

        initializing.set(true);
        WAIT_GRAPH.lock().owners.insert(self.id(), me);
        let reset = ResetOnDrop {
            initializing: &*initializing,
            cell: self.id(),
        };
        let value = Arc::new(init());
        // Only ever set while holding `initializing` with the cell still empty.
        let value = Arc::clone(self.value.get_or_init(|| value));
        drop(reset);

        Outcome::Created(value)
    }

    fn id(&self) -> CellId {
        self as *const Self as CellId
    }
}

impl<T> Default for InitCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the initializing flag and the cell's owner when construction ends,
/// including by unwinding.
struct ResetOnDrop<'a> {
    initializing: &'a Cell<bool>,
    cell: CellId,
}

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        WAIT_GRAPH.lock().owners.remove(&self.cell);
        self.initializing.set(false);
    }
}
