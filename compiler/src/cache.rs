use crate::{
    compiler::{compile, CompiledRecord},
    error::ChompError,
    traits::Record,
};
use lazy_static::lazy_static;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

lazy_static! {
    static ref COMPILED: RwLock<HashMap<TypeId, Arc<CompiledRecord>>> = RwLock::new(HashMap::new());
}

/// Returns the compiled plan and layout of `T`, compiling on first use.
///
/// Compiled records are immutable and shared by every reader and writer of
/// the same type for the life of the process. Failed compilations are not
/// cached, so every use of a broken record reports its schema error.
pub fn compiled<T: Record>() -> Result<Arc<CompiledRecord>, ChompError> {
    let id = TypeId::of::<T>();

    if let Some(found) = COMPILED
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(&id)
    {
        return Ok(Arc::clone(found));
    }

    let fresh = Arc::new(compile(&T::schema())?);
    let mut cache = COMPILED
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    // Another thread may have won the race; keep whichever landed first.
    Ok(Arc::clone(cache.entry(id).or_insert(fresh)))
}
