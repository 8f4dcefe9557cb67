//! Process-wide cache slot.
//!
//! Embedders that want one shared [`MirrorCache`] install it here; tests
//! and tools that need isolation construct their own caches instead.
//! [`reset`] swaps in an empty cache over the same provider, discarding
//! every memoized descriptor.

use crate::MirrorCache;
use crate::cache::MirrorOptions;
use crate::metadata::DeclarationProvider;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

static GLOBAL: RwLock<Option<Arc<MirrorCache>>> = RwLock::new(None);

/// Install a fresh cache over `provider`, replacing any previous one.
pub fn install(provider: Arc<dyn DeclarationProvider>) -> Arc<MirrorCache> {
    install_with_options(provider, MirrorOptions::default())
}

pub fn install_with_options(
    provider: Arc<dyn DeclarationProvider>,
    options: MirrorOptions,
) -> Arc<MirrorCache> {
    let cache = Arc::new(MirrorCache::with_options(provider, options));
    debug!(instance_id = cache.instance_id(), "global::install");
    *GLOBAL.write().unwrap_or_else(PoisonError::into_inner) = Some(cache.clone());
    cache
}

/// The installed cache, if any.
pub fn global() -> Option<Arc<MirrorCache>> {
    GLOBAL.read().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Replace the installed cache with an empty one over the same provider and
/// options. Returns the new cache, or `None` when nothing is installed.
pub fn reset() -> Option<Arc<MirrorCache>> {
    let mut slot = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    let previous = slot.as_ref()?;
    let cache = Arc::new(MirrorCache::with_options(
        previous.provider().clone(),
        previous.options(),
    ));
    debug!(
        previous = previous.instance_id(),
        instance_id = cache.instance_id(),
        "global::reset"
    );
    *slot = Some(cache.clone());
    Some(cache)
}

/// Remove the installed cache, returning it.
pub fn teardown() -> Option<Arc<MirrorCache>> {
    let previous = GLOBAL.write().unwrap_or_else(PoisonError::into_inner).take();
    if let Some(cache) = &previous {
        debug!(instance_id = cache.instance_id(), "global::teardown");
    }
    previous
}

#[cfg(test)]
#[path = "../tests/global_tests.rs"]
mod tests;
