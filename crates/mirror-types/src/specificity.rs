//! Specificity ordering of descriptors.
//!
//! `a` is more specific than `b` when `b` accepts `a` but `a` does not
//! accept `b`. The order is partial: mutually assignable or unrelated pairs
//! compare `Equal`.

use crate::MirrorCache;
use crate::error::MirrorResult;
use crate::relations::AssignabilityChecker;
use crate::types::TypeId;
use std::cmp::Ordering;

impl MirrorCache {
    /// `Greater` when `a` is strictly more specific than `b`, `Less` in the
    /// mirror case, `Equal` otherwise.
    pub fn compare_specificity(&self, a: TypeId, b: TypeId) -> MirrorResult<Ordering> {
        AssignabilityChecker::new(self).compare_specificity(a, b)
    }

    /// Candidates that no other candidate is strictly more specific than,
    /// in input order and without duplicates.
    pub fn most_specific(&self, candidates: &[TypeId]) -> MirrorResult<Vec<TypeId>> {
        let mut checker = AssignabilityChecker::new(self);
        let mut result = Vec::new();
        'candidates: for (index, &candidate) in candidates.iter().enumerate() {
            if candidates[..index].contains(&candidate) {
                continue;
            }
            for &other in candidates {
                if checker.compare_specificity(other, candidate)? == Ordering::Greater {
                    continue 'candidates;
                }
            }
            result.push(candidate);
        }
        Ok(result)
    }
}

#[cfg(test)]
#[path = "../tests/specificity_tests.rs"]
mod tests;
