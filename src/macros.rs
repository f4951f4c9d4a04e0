//! Declaration macros for types whose constructor takes no arguments.

/// Implements [`Singleton`](crate::Singleton) for a type with `Args = ()`.
///
/// The second argument is the constructor body, written as a closure taking
/// no parameters.
///
/// # Examples
///
/// ```rust
/// use typex::{singleton, Singleton};
/// use std::sync::Arc;
///
/// struct Clock {
///     started: u64,
/// }
///
/// singleton!(Clock, || Clock { started: 42 });
///
/// let clock: Arc<Clock> = Clock::get_instance().unwrap();
/// assert_eq!(clock.started, 42);
/// ```
///
/// An abstract base is declared with a leading `abstract`:
///
/// ```rust
/// use typex::{singleton, Singleton, TypexError};
///
/// struct Base;
/// singleton!(abstract Base, || Base);
///
/// assert!(matches!(Base::get_instance(), Err(TypexError::InvalidUse { .. })));
/// ```
#[macro_export]
macro_rules! singleton {
    (abstract $ty:ty, || $body:expr) => {
        impl $crate::Singleton for $ty {
            type Args = ();
            const ABSTRACT: bool = true;

            fn construct(_: ()) -> Self {
                $body
            }
        }
    };
    ($ty:ty, || $body:expr) => {
        impl $crate::Singleton for $ty {
            type Args = ();

            fn construct(_: ()) -> Self {
                $body
            }
        }
    };
}

/// Implements [`Multiton`](crate::Multiton) for a type with `Args = ()`.
///
/// The constructor body is written as a closure over the instance name.
///
/// # Examples
///
/// ```rust
/// use typex::{multiton, Multiton};
///
/// struct Queue {
///     topic: String,
/// }
///
/// multiton!(Queue, |name| Queue { topic: format!("q.{name}") });
///
/// let jobs = Queue::named("jobs").unwrap();
/// assert_eq!(jobs.topic, "q.jobs");
/// assert_eq!(jobs.instance_name(), "jobs");
/// ```
#[macro_export]
macro_rules! multiton {
    (abstract $ty:ty, |$name:ident| $body:expr) => {
        impl $crate::Multiton for $ty {
            type Args = ();
            const ABSTRACT: bool = true;

            fn construct($name: &str, _: ()) -> Self {
                $body
            }
        }
    };
    ($ty:ty, |$name:ident| $body:expr) => {
        impl $crate::Multiton for $ty {
            type Args = ();

            fn construct($name: &str, _: ()) -> Self {
                $body
            }
        }
    };
}
