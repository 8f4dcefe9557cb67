//! Centralized limits for the reflection engine.
//!
//! Recursion guards in `mirror-types` pick their limits from named profiles
//! (`mirror_types::recursion::RecursionProfile`); the profiles read the values
//! below so there is one place to tune them.

// =============================================================================
// Assignability
// =============================================================================

/// Maximum nesting of assignability checks.
///
/// Each nested type argument, wildcard bound or variable bound adds a level.
/// Declarations such as `class Node<T extends Node<T>>` reach a cycle long
/// before this depth; the limit only protects against pathological metadata.
pub const MAX_ASSIGNABILITY_DEPTH: u32 = 100;

/// Total assignability checks allowed under one top-level query.
pub const MAX_ASSIGNABILITY_CHECKS: u32 = 100_000;

// =============================================================================
// Hierarchy traversal
// =============================================================================

/// Maximum superclass/interface nesting explored by an ancestor search.
///
/// Real hierarchies are shallow; a malformed provider that reports a class as
/// its own supertype is caught as a cycle well before this.
pub const MAX_ANCESTOR_DEPTH: u32 = 256;

/// Total supertype visits allowed under one ancestor search.
pub const MAX_ANCESTOR_VISITS: u32 = 50_000;

// =============================================================================
// Substitution
// =============================================================================

/// Maximum nesting of a type while substituting type variables.
///
/// Substitution walks the finite structure of an already-built descriptor, so
/// this only bounds stack usage for absurdly nested argument lists.
pub const MAX_SUBSTITUTION_DEPTH: u32 = 512;
