//! One instance per type.
//!
//! Implement [`Singleton`] by supplying the constructor body; every lookup goes
//! through [`Singleton::instance`], which runs that body on the first call and
//! returns the cached instance afterwards.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use typex::Singleton;
//!
//! struct Settings {
//!     verbose: bool,
//! }
//!
//! impl Singleton for Settings {
//!     type Args = bool;
//!
//!     fn construct(verbose: bool) -> Self {
//!         Settings { verbose }
//!     }
//! }
//!
//! let first = Settings::instance(true).unwrap();
//! // Arguments after the first call are ignored.
//! let second = Settings::instance(false).unwrap();
//!
//! assert!(Arc::ptr_eq(&first, &second));
//! assert!(second.verbose);
//! ```

use std::sync::Arc;

use crate::guard::{InitCell, Outcome};
use crate::{registry, trace, PatternEvent, TypexError};

/// The per-type singleton record: the captured constructor and the slot it fills.
struct SingletonRecord<T: Singleton> {
    constructor: fn(T::Args) -> T,
    slot: InitCell<T>,
}

/// A type with exactly one instance for the lifetime of the process.
///
/// Only [`construct`](Singleton::construct) is required; all lookups are provided.
pub trait Singleton: Send + Sync + Sized + 'static {
    /// Arguments accepted by the constructor.
    type Args: 'static;

    /// Marks a base that exists only to be specialized. Such a type can
    /// never be instantiated; [`instance`](Singleton::instance) fails with
    /// [`TypexError::InvalidUse`].
    const ABSTRACT: bool = false;

    /// The constructor body. Runs exactly once per process.
    fn construct(args: Self::Args) -> Self;

    /// Returns the sole instance, constructing it from `args` on the first call.
    ///
    /// Once the instance exists, `args` are dropped without being used.
    ///
    /// # Errors
    ///
    /// - [`TypexError::InvalidUse`] if the type is an abstract base
    /// - [`TypexError::RecursiveConstruction`] if called from inside `construct`,
    ///   or if another thread is constructing the instance while itself waiting,
    ///   directly or through further constructors, on one the caller is building
    fn instance(args: Self::Args) -> Result<Arc<Self>, TypexError> {
        instance_of::<Self>(args)
    }

    /// Returns the sole instance, constructing it with default arguments if needed.
    fn get_instance() -> Result<Arc<Self>, TypexError>
    where
        Self::Args: Default,
    {
        Self::instance(Default::default())
    }

    /// Whether the constructor has completed. Has no side effects.
    fn is_initialized() -> bool {
        registry::existing::<SingletonRecord<Self>>()
            .is_some_and(|record| record.slot.is_initialized())
    }
}

fn instance_of<T: Singleton>(args: T::Args) -> Result<Arc<T>, TypexError> {
    let type_name = std::any::type_name::<T>();

    if T::ABSTRACT {
        trace::emit(PatternEvent::Reject {
            type_name,
            instance_name: None,
        });
        return Err(TypexError::abstract_base::<T>());
    }

    let record = registry::record(|| SingletonRecord::<T> {
        constructor: T::construct,
        slot: InitCell::new(),
    });

    // Fast path: skip the guard entirely once the slot is filled.
    if let Some(instance) = record.slot.get() {
        let instance = Arc::clone(instance);
        trace::emit(PatternEvent::Reuse {
            type_name,
            instance_name: None,
        });
        return Ok(instance);
    }

    match record.slot.get_or_init(|| (record.constructor)(args)) {
        Outcome::Created(instance) => {
            trace::emit(PatternEvent::Initialize {
                type_name,
                instance_name: None,
            });
            Ok(instance)
        }
        Outcome::Existing(instance) => {
            trace::emit(PatternEvent::Reuse {
                type_name,
                instance_name: None,
            });
            Ok(instance)
        }
        Outcome::Reentered => {
            trace::emit(PatternEvent::Reject {
                type_name,
                instance_name: None,
            });
            Err(TypexError::RecursiveConstruction {
                type_name,
                instance_name: None,
            })
        }
    }
}
