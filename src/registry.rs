//! Process-wide store of per-type records.
//!
//! Each participating type owns one record (its singleton slot or multiton map),
//! created lazily on the first construction attempt and kept for the rest of the
//! process. Records are keyed by the `TypeId` of the record type itself, so the
//! singleton and multiton records of one type never collide.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::{Arc, LazyLock},
};

use parking_lot::Mutex;

/// Global thread-safe store of type records.
///
/// The lock is held only to find or insert a record, never while user code runs.
static TYPE_RECORDS: LazyLock<Mutex<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Returns the record of type `R`, creating it with `create` on first use.
///
/// `create` runs under the store lock and must not touch the store. Exactly one
/// record per `R` is ever created.
pub(crate) fn record<R, F>(create: F) -> Arc<R>
where
    R: Send + Sync + 'static,
    F: FnOnce() -> R,
{
    let mut records = TYPE_RECORDS.lock();
    if let Some(found) = lookup::<R>(&records) {
        return found;
    }
    let created = Arc::new(create());
    records.insert(TypeId::of::<R>(), Arc::clone(&created) as Arc<dyn Any + Send + Sync>);
    created
}

/// Returns the record of type `R` if one has been created.
pub(crate) fn existing<R: Send + Sync + 'static>() -> Option<Arc<R>> {
    lookup::<R>(&TYPE_RECORDS.lock())
}

/// Entries are keyed by their own `TypeId`, so the downcast only fails for an
/// absent key.
fn lookup<R: Send + Sync + 'static>(
    records: &HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
) -> Option<Arc<R>> {
    let any_record = Arc::clone(records.get(&TypeId::of::<R>())?);
    any_record.downcast::<R>().ok()
}
