//! Lock-guarded monotonic counters.
//!
//! [`Atomic`] is the counter itself. [`AbsoluteAtomic`] and [`MultitonAtomic`]
//! only decide its scope by handing it out through the singleton or multiton
//! registry; they add no counting logic.
//!
//! Every observation advances the sequence. There is no side-effect-free read.

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::ReentrantMutex;

use crate::{Multiton, Named, Singleton, TypexError};

/// A monotonically increasing counter. The first value handed out is `0`.
///
/// Increments are serialized by a reentrant lock: concurrent callers never see
/// the same value, and a thread already holding the lock (see
/// [`exclusive`](Atomic::exclusive)) may call [`next`](Atomic::next) again.
pub struct Atomic {
    count: ReentrantMutex<Cell<i64>>,
}

impl Atomic {
    pub fn new() -> Self {
        Self {
            count: ReentrantMutex::new(Cell::new(-1)),
        }
    }

    /// Allocates and returns the next value.
    ///
    /// # Panics
    ///
    /// Panics once the sequence is exhausted, after `i64::MAX` has been handed out.
    pub fn next(&self) -> i64 {
        let count = self.count.lock();
        let Some(next) = count.get().checked_add(1) else {
            panic!("counter exhausted after i64::MAX");
        };
        count.set(next);
        next
    }

    /// Same as [`next`](Atomic::next).
    pub fn get_count(&self) -> i64 {
        self.next()
    }

    /// Same as [`next`](Atomic::next): reading the count allocates it.
    pub fn count(&self) -> i64 {
        self.next()
    }

    /// Same as [`next`](Atomic::next).
    pub fn value(&self) -> i64 {
        self.next()
    }

    /// Runs `f` while holding the counter lock.
    ///
    /// Values allocated inside `f` form a contiguous run; no other thread can
    /// allocate until `f` returns.
    ///
    /// ```
    /// use typex::Atomic;
    ///
    /// let counter = Atomic::new();
    /// let run = counter.exclusive(|c| [c.next(), c.next(), c.next()]);
    /// assert_eq!(run, [0, 1, 2]);
    /// ```
    pub fn exclusive<R>(&self, f: impl FnOnce(&Self) -> R) -> R {
        let _held = self.count.lock();
        f(self)
    }
}

#[cfg(test)]
impl Atomic {
    fn resuming_after(last: i64) -> Self {
        Self {
            count: ReentrantMutex::new(Cell::new(last)),
        }
    }
}

impl Default for Atomic {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Atomic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Printing the count would advance it.
        f.debug_struct("Atomic").finish_non_exhaustive()
    }
}

/// The process-wide counter for scope `S`.
///
/// Every call site that asks for `AbsoluteAtomic<S>` shares one sequence.
/// Distinct scope tags yield distinct counters.
///
/// ```
/// use typex::AbsoluteAtomic;
///
/// struct Requests;
///
/// let a = AbsoluteAtomic::<Requests>::shared().unwrap();
/// let b = AbsoluteAtomic::<Requests>::shared().unwrap();
/// assert_eq!(a.next(), 0);
/// assert_eq!(b.next(), 1);
/// ```
pub struct AbsoluteAtomic<S: 'static = ()> {
    counter: Atomic,
    _scope: PhantomData<fn() -> S>,
}

impl<S: 'static> AbsoluteAtomic<S> {
    /// Returns the shared counter, creating it on first use.
    pub fn shared() -> Result<Arc<Self>, TypexError> {
        Self::get_instance()
    }
}

impl<S: 'static> Singleton for AbsoluteAtomic<S> {
    type Args = ();

    fn construct(_: ()) -> Self {
        AbsoluteAtomic {
            counter: Atomic::new(),
            _scope: PhantomData,
        }
    }
}

impl<S: 'static> Deref for AbsoluteAtomic<S> {
    type Target = Atomic;

    fn deref(&self) -> &Atomic {
        &self.counter
    }
}

impl<S: 'static> fmt::Debug for AbsoluteAtomic<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbsoluteAtomic")
            .field("scope", &std::any::type_name::<S>())
            .finish_non_exhaustive()
    }
}

/// A counter per instance name, within scope `S`.
///
/// Counters under the same name share one sequence; counters under different
/// names are seeded and locked independently.
///
/// ```
/// use typex::MultitonAtomic;
///
/// let orders = MultitonAtomic::<()>::named("orders").unwrap();
/// let users = MultitonAtomic::<()>::named("users").unwrap();
/// assert_eq!(orders.next(), 0);
/// assert_eq!(orders.next(), 1);
/// assert_eq!(users.next(), 0);
/// ```
pub struct MultitonAtomic<S: 'static = ()> {
    counter: Atomic,
    _scope: PhantomData<fn() -> S>,
}

impl<S: 'static> MultitonAtomic<S> {
    /// Returns the counter named `instance_name`, creating it on first use.
    pub fn named(instance_name: &str) -> Result<Arc<Named<Self>>, TypexError> {
        <Self as Multiton>::named(instance_name)
    }
}

impl<S: 'static> Multiton for MultitonAtomic<S> {
    type Args = ();

    fn construct(_: &str, _: ()) -> Self {
        MultitonAtomic {
            counter: Atomic::new(),
            _scope: PhantomData,
        }
    }
}

impl<S: 'static> Deref for MultitonAtomic<S> {
    type Target = Atomic;

    fn deref(&self) -> &Atomic {
        &self.counter
    }
}

impl<S: 'static> fmt::Debug for MultitonAtomic<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultitonAtomic")
            .field("scope", &std::any::type_name::<S>())
            .finish_non_exhaustive()
    }
}
