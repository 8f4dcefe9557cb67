//! Structured query tracing for cache entry points.
//!
//! Events use target `mirror::query_json` and are intended to be consumed with:
//! `MIRROR_LOG=mirror::query_json=trace MIRROR_LOG_FORMAT=json`.
//!
//! Environment:
//! - `MIRROR_QUERY_RUN_ID`: optional run identifier attached to every event.

use crate::handle::HostType;
use crate::types::TypeId;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Level, trace};

static NEXT_QUERY_ID: AtomicU64 = AtomicU64::new(1);
static QUERY_RUN_ID: OnceLock<String> = OnceLock::new();

#[inline]
pub(crate) fn enabled() -> bool {
    tracing::enabled!(target: "mirror::query_json", Level::TRACE)
}

#[inline]
pub(crate) fn next_query_id() -> u64 {
    NEXT_QUERY_ID.fetch_add(1, Ordering::Relaxed)
}

#[inline]
fn run_id() -> &'static str {
    QUERY_RUN_ID
        .get_or_init(|| std::env::var("MIRROR_QUERY_RUN_ID").unwrap_or_else(|_| "default".into()))
        .as_str()
}

fn handle_kind(handle: &HostType) -> &'static str {
    match handle {
        HostType::Class(_) => "class",
        HostType::Parameterized { .. } => "parameterized",
        HostType::GenericArray(_) => "generic_array",
        HostType::Variable(_) => "variable",
        HostType::Wildcard { .. } => "wildcard",
        HostType::Void => "void",
        HostType::Foreign { .. } => "foreign",
    }
}

#[inline]
pub(crate) fn reflect_start(query_id: u64, handle: &HostType) {
    trace!(
        target: "mirror::query_json",
        event = "query",
        phase = "start",
        run_id = run_id(),
        query_id,
        op = "reflect",
        handle_kind = handle_kind(handle)
    );
}

#[inline]
pub(crate) fn reflect_end(query_id: u64, result: TypeId) {
    trace!(
        target: "mirror::query_json",
        event = "query",
        phase = "end",
        run_id = run_id(),
        query_id,
        op = "reflect",
        result_type_id = result.0
    );
}

#[inline]
pub(crate) fn specialize(raw: TypeId, result: TypeId) {
    trace!(
        target: "mirror::query_json",
        event = "specialize",
        run_id = run_id(),
        raw_type_id = raw.0,
        result_type_id = result.0
    );
}

#[inline]
pub(crate) fn relation_start(query_id: u64, op: &'static str, target: TypeId, source: TypeId) {
    trace!(
        target: "mirror::query_json",
        event = "query",
        phase = "start",
        run_id = run_id(),
        query_id,
        op,
        target_type_id = target.0,
        source_type_id = source.0
    );
}

#[inline]
pub(crate) fn relation_end(query_id: u64, op: &'static str, result: bool, cache_hit: bool) {
    trace!(
        target: "mirror::query_json",
        event = "query",
        phase = "end",
        run_id = run_id(),
        query_id,
        op,
        result,
        cache_hit
    );
}

#[cfg(test)]
#[path = "../tests/query_trace_tests.rs"]
mod tests;
