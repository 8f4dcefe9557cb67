//! Recursion guard for hierarchy walks and assignability checks.
//!
//! `RecursionGuard` tracks the keys currently being evaluated on one call
//! stack, the nesting depth, and the total number of entries. Self-bounded
//! declarations (`class Node<T extends Node<T>>`) revisit the same pair of
//! descriptors; the guard turns that revisit into [`RecursionResult::Cycle`]
//! instead of unbounded recursion.
//!
//! Limits come from [`RecursionProfile`] presets, which in turn read
//! `mirror_common::limits`.

use mirror_common::limits;
use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Named recursion limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Pairwise assignability, including type arguments and bounds.
    Assignability,
    /// Depth-first search of superclasses and interfaces.
    AncestorSearch,
    /// Variable replacement through nested arguments and bounds.
    Substitution,
    /// Explicit limits, for tests and unusual embedders.
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::Assignability => limits::MAX_ASSIGNABILITY_DEPTH,
            Self::AncestorSearch => limits::MAX_ANCESTOR_DEPTH,
            Self::Substitution => limits::MAX_SUBSTITUTION_DEPTH,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::Assignability => limits::MAX_ASSIGNABILITY_CHECKS,
            Self::AncestorSearch => limits::MAX_ANCESTOR_VISITS,
            Self::Substitution => u32::MAX,
            Self::Custom { max_iterations, .. } => max_iterations,
        }
    }
}

/// Outcome of [`RecursionGuard::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    Entered,
    /// The key is already on the stack.
    Cycle,
    DepthExceeded,
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    #[inline]
    pub fn is_cycle(self) -> bool {
        matches!(self, Self::Cycle)
    }

    #[inline]
    pub fn is_exceeded(self) -> bool {
        matches!(self, Self::DepthExceeded | Self::IterationExceeded)
    }
}

/// Cycle, depth and iteration tracking for one recursive computation.
///
/// Every successful [`enter`](Self::enter) must be paired with a
/// [`leave`](Self::leave) for the same key. Debug builds panic when a guard is
/// dropped with keys still on the stack.
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
    exceeded: bool,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            iterations: 0,
            max_depth,
            max_iterations,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    /// Try to push `key`. Anything but `Entered` leaves the guard unchanged
    /// apart from the iteration count and the sticky exceeded flag.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);

        if self.iterations > self.max_iterations {
            self.exceeded = true;
            return RecursionResult::IterationExceeded;
        }
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return RecursionResult::DepthExceeded;
        }
        if !self.visiting.insert(key) {
            return RecursionResult::Cycle;
        }

        self.depth += 1;
        RecursionResult::Entered
    }

    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);
        debug_assert!(
            was_present,
            "RecursionGuard::leave() without a matching enter()"
        );
        self.depth = self.depth.saturating_sub(1);
    }

    /// Run `f` between `enter(key)` and `leave(key)`.
    pub fn scope<T>(&mut self, key: K, f: impl FnOnce() -> T) -> Result<T, RecursionResult> {
        match self.enter(key) {
            RecursionResult::Entered => {
                let result = f();
                self.leave(key);
                Ok(result)
            }
            denied => Err(denied),
        }
    }

    #[inline]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.visiting.contains(key)
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Sticky: stays set after the depth drops back below the limit.
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} active entries",
                self.visiting.len(),
            );
        }
    }
}

/// Depth-only counter for walks that may legitimately revisit a key.
pub struct DepthCounter {
    depth: u32,
    max_depth: u32,
}

impl DepthCounter {
    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self {
            depth: 0,
            max_depth: profile.max_depth(),
        }
    }

    /// Returns `false` (without incrementing) once the limit is reached.
    #[inline]
    pub fn enter(&mut self) -> bool {
        if self.depth >= self.max_depth {
            return false;
        }
        self.depth += 1;
        true
    }

    #[inline]
    pub fn leave(&mut self) {
        debug_assert!(self.depth > 0, "DepthCounter::leave() at depth 0");
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod tests;
