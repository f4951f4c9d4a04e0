//! # typex
//!
//! Control over how many instances of a type exist and when their constructor runs.
//!
//! - [`Singleton`]: exactly one instance per type for the lifetime of the process.
//! - [`Multiton`]: exactly one instance per (type, name) pair.
//! - [`Atomic`]: a lock-guarded, monotonically increasing counter, with
//!   [`AbsoluteAtomic`] (one shared counter per scope) and [`MultitonAtomic`]
//!   (one counter per name) built on the two patterns above.
//! - [`Static`] and [`Abstract`]: markers for types that refuse instantiation.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use typex::{Multiton, Singleton};
//!
//! struct Config {
//!     env: &'static str,
//! }
//!
//! impl Singleton for Config {
//!     type Args = &'static str;
//!
//!     fn construct(env: &'static str) -> Self {
//!         Config { env }
//!     }
//! }
//!
//! let config = Config::instance("production").unwrap();
//! // Arguments after the first call are ignored: the constructor ran once.
//! let again = Config::instance("staging").unwrap();
//! assert!(Arc::ptr_eq(&config, &again));
//! assert_eq!(again.env, "production");
//!
//! struct Worker;
//!
//! impl Multiton for Worker {
//!     type Args = ();
//!
//!     fn construct(_instance_name: &str, _: ()) -> Self {
//!         Worker
//!     }
//! }
//!
//! let a = Worker::named("a").unwrap();
//! assert_eq!(a.instance_name(), "a");
//! assert!(Arc::ptr_eq(&a, &Worker::named("a").unwrap()));
//! assert!(Arc::ptr_eq(&Worker::instance(()).unwrap(), &Worker::named("default").unwrap()));
//! ```
//!
//! ## Guarantees
//!
//! - **Once-only construction**: the constructor body runs exactly once per
//!   identity, also when several threads race on the first lookup.
//! - **Cycle detection**: a constructor that needs its own instance, or
//!   constructors on different threads that need each other, get
//!   [`TypexError::RecursiveConstruction`] instead of blocking forever.
//! - **Stable identity**: once created, an instance is never replaced or dropped
//!   by the registry.
//! - **Tracing support**: optional callback for every lookup, see
//!   [`set_trace_callback`]; the same events go to `tracing`.

mod atomic;
mod error;
mod event;
mod guard;
mod macros;
mod marker;
mod multiton;
mod registry;
mod singleton;
mod trace;

pub use atomic::{AbsoluteAtomic, Atomic, MultitonAtomic};
pub use error::TypexError;
pub use event::PatternEvent;
pub use marker::{Abstract, Static};
pub use multiton::{Multiton, Named};
pub use singleton::Singleton;
pub use trace::{clear_trace_callback, set_trace_callback, TraceCallback};

/// The instance name used when none is given.
pub const DEFAULT_INSTANCE_NAME: &str = "default";
