//! One instance per (type, name) pair.
//!
//! Implement [`Multiton`] by supplying the constructor body. Instances are
//! handed out as [`Named`] wrappers that carry their instance name and
//! dereference to the constructed value.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use typex::Multiton;
//!
//! struct Worker {
//!     label: String,
//! }
//!
//! impl Multiton for Worker {
//!     type Args = ();
//!
//!     fn construct(instance_name: &str, _: ()) -> Self {
//!         Worker { label: format!("worker-{instance_name}") }
//!     }
//! }
//!
//! let a = Worker::named("a").unwrap();
//! assert_eq!(a.instance_name(), "a");
//! assert_eq!(a.label, "worker-a");
//!
//! assert!(Arc::ptr_eq(&a, &Worker::named("a").unwrap()));
//! assert!(!Arc::ptr_eq(&a, &Worker::named("b").unwrap()));
//! assert!(Arc::ptr_eq(&Worker::instance(()).unwrap(), &Worker::named("default").unwrap()));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::guard::{InitCell, Outcome};
use crate::{registry, trace, PatternEvent, TypexError, DEFAULT_INSTANCE_NAME};

/// A multiton instance together with the name it was registered under.
pub struct Named<T> {
    instance_name: String,
    value: T,
}

impl<T> Named<T> {
    /// The name of the instance. Fixed at construction.
    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    pub fn get(&self) -> &T {
        &self.value
    }
}

impl<T> Deref for Named<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> AsRef<T> for Named<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Named<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Named")
            .field("instance_name", &self.instance_name)
            .field("value", &self.value)
            .finish()
    }
}

type Slot<T> = Arc<InitCell<Named<T>>>;

/// The per-type multiton record: the captured constructor and the name map.
struct MultitonRecord<T: Multiton> {
    constructor: fn(&str, T::Args) -> T,
    instances: Mutex<HashMap<String, Slot<T>>>,
}

impl<T: Multiton> MultitonRecord<T> {
    /// Finds or inserts the cell for `name`. The map lock is released on return,
    /// so construction under one name never blocks lookups of another.
    fn cell(&self, name: &str) -> Slot<T> {
        let mut instances = self.instances.lock();
        if let Some(cell) = instances.get(name) {
            return Arc::clone(cell);
        }
        let cell = Arc::new(InitCell::new());
        instances.insert(name.to_owned(), Arc::clone(&cell));
        cell
    }
}

/// A type with exactly one instance per name for the lifetime of the process.
///
/// Different types keep independent name maps; `"a"` under one type is
/// unrelated to `"a"` under another.
pub trait Multiton: Send + Sync + Sized + 'static {
    /// Arguments accepted by the constructor.
    type Args: 'static;

    /// Marks a base that exists only to be specialized; see
    /// [`Singleton::ABSTRACT`](crate::Singleton::ABSTRACT).
    const ABSTRACT: bool = false;

    /// The constructor body. Runs exactly once per instance name.
    ///
    /// The instance name is already recorded when this runs.
    fn construct(instance_name: &str, args: Self::Args) -> Self;

    /// Returns the instance registered under `instance_name`, constructing it
    /// from `args` if the name is new.
    ///
    /// For a name that already has an instance, `args` are dropped unused.
    ///
    /// # Errors
    ///
    /// - [`TypexError::InvalidUse`] if the type is an abstract base
    /// - [`TypexError::RecursiveConstruction`] if called for the same name from
    ///   inside `construct`, or if another thread is constructing that name
    ///   while itself waiting, directly or through further constructors, on an
    ///   instance the caller is building
    fn get_instance(instance_name: &str, args: Self::Args) -> Result<Arc<Named<Self>>, TypexError> {
        instance_of::<Self>(instance_name, args)
    }

    /// Returns the instance named [`DEFAULT_INSTANCE_NAME`].
    fn instance(args: Self::Args) -> Result<Arc<Named<Self>>, TypexError> {
        Self::get_instance(DEFAULT_INSTANCE_NAME, args)
    }

    /// Returns the instance named `instance_name`, constructing it with default
    /// arguments if needed.
    fn named(instance_name: &str) -> Result<Arc<Named<Self>>, TypexError>
    where
        Self::Args: Default,
    {
        Self::get_instance(instance_name, Default::default())
    }

    /// Whether an instance has been constructed under `instance_name`.
    /// Has no side effects.
    fn contains(instance_name: &str) -> bool {
        registry::existing::<MultitonRecord<Self>>().is_some_and(|record| {
            record
                .instances
                .lock()
                .get(instance_name)
                .is_some_and(|cell| cell.is_initialized())
        })
    }

    /// Names of all constructed instances, sorted.
    fn instance_names() -> Vec<String> {
        let Some(record) = registry::existing::<MultitonRecord<Self>>() else {
            return Vec::new();
        };
        let mut names: Vec<String> = record
            .instances
            .lock()
            .iter()
            .filter(|(_, cell)| cell.is_initialized())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}

fn instance_of<T: Multiton>(
    instance_name: &str,
    args: T::Args,
) -> Result<Arc<Named<T>>, TypexError> {
    let type_name = std::any::type_name::<T>();
    let event_name = || Some(instance_name.to_owned());

    if T::ABSTRACT {
        trace::emit(PatternEvent::Reject {
            type_name,
            instance_name: event_name(),
        });
        return Err(TypexError::abstract_base::<T>());
    }

    let record = registry::record(|| MultitonRecord::<T> {
        constructor: T::construct,
        instances: Mutex::new(HashMap::new()),
    });
    let cell = record.cell(instance_name);

    let outcome = match cell.get() {
        Some(instance) => Outcome::Existing(Arc::clone(instance)),
        None => cell.get_or_init(|| Named {
            instance_name: instance_name.to_owned(),
            value: (record.constructor)(instance_name, args),
        }),
    };

    match outcome {
        Outcome::Created(instance) => {
            trace::emit(PatternEvent::Initialize {
                type_name,
                instance_name: event_name(),
            });
            Ok(instance)
        }
        Outcome::Existing(instance) => {
            trace::emit(PatternEvent::Reuse {
                type_name,
                instance_name: event_name(),
            });
            Ok(instance)
        }
        Outcome::Reentered => {
            trace::emit(PatternEvent::Reject {
                type_name,
                instance_name: event_name(),
            });
            Err(TypexError::RecursiveConstruction {
                type_name,
                instance_name: event_name(),
            })
        }
    }
}
