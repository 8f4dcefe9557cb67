//! Assignability and ancestor search.
//!
//! `target.is_assignable_from(source)` follows the descriptor kind of the
//! target:
//!
//! | Target | Accepts |
//! |--------|---------|
//! | class | itself; anything but void and primitives if it is the root; a variable with an accepted bound; a class with a matching ancestor |
//! | array | arrays with an accepted component |
//! | variable | itself, variables and wildcards bounded by it |
//! | wildcard | wildcards whose bounds it accepts position by position; types within its bounds |
//! | void | void |
//!
//! Declarations may be self-referential (`Node<T extends Node<T>>`), so one
//! [`AssignabilityChecker`] carries the pairs currently being evaluated. A
//! pair met again while in progress is assumed to hold; a result that relied
//! on such an assumption, or on a limit being hit, is returned but not
//! memoized.

use crate::MirrorCache;
use crate::error::{MirrorError, MirrorResult};
use crate::handle::ClassId;
use crate::query_trace;
use crate::recursion::{RecursionGuard, RecursionResult};
use crate::types::{TypeId, TypeKind, TypeShape};
use std::cmp::Ordering;
use tracing::trace;

pub(crate) struct AssignabilityChecker<'a> {
    cache: &'a MirrorCache,
    pairs: RecursionGuard<(TypeId, TypeId)>,
    searches: RecursionGuard<(TypeId, ClassId)>,
    /// Bumped whenever a result depends on an assumption.
    provisional: u32,
}

impl<'a> AssignabilityChecker<'a> {
    pub(crate) fn new(cache: &'a MirrorCache) -> Self {
        AssignabilityChecker {
            cache,
            pairs: RecursionGuard::with_profile(cache.options.assignability),
            searches: RecursionGuard::with_profile(cache.options.ancestor_search),
            provisional: 0,
        }
    }

    pub(crate) fn is_assignable_from(
        &mut self,
        target: TypeId,
        source: TypeId,
    ) -> MirrorResult<bool> {
        if target == source {
            return Ok(true);
        }
        if let Some(known) = self.cache.relations.get(&(target, source)) {
            return Ok(*known);
        }
        match self.pairs.enter((target, source)) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => {
                self.provisional += 1;
                return Ok(true);
            }
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                trace!(target = target.0, source = source.0, "assignability limit reached");
                self.provisional += 1;
                return Ok(false);
            }
        }
        let before = self.provisional;
        let result = self.check(target, source);
        self.pairs.leave((target, source));
        let result = result?;
        if self.provisional == before {
            self.cache.relations.insert((target, source), result);
        }
        Ok(result)
    }

    fn check(&mut self, target: TypeId, source: TypeId) -> MirrorResult<bool> {
        let cache = self.cache;
        let data = cache.data(target)?;
        match &data.shape {
            TypeShape::Class(_) => self.check_class(target, source),
            TypeShape::Array(_) => {
                if cache.kind(source)? != TypeKind::Array {
                    return Ok(false);
                }
                let target_component = cache.component(target)?;
                let source_component = cache.component(source)?;
                self.is_assignable_from(target_component, source_component)
            }
            TypeShape::Variable(_) => {
                if data.raw == cache.raw(source)? {
                    return Ok(true);
                }
                let bounds = match cache.kind(source)? {
                    TypeKind::Variable => cache.bounds(source)?,
                    TypeKind::Wildcard => cache.upper_bounds(source)?,
                    _ => return Ok(false),
                };
                self.accepts_any(target, &bounds)
            }
            TypeShape::Wildcard(_) => self.check_wildcard(target, source),
            TypeShape::Void(_) => Ok(data.raw == cache.raw(source)?),
        }
    }

    fn accepts_any(&mut self, target: TypeId, candidates: &[TypeId]) -> MirrorResult<bool> {
        for &candidate in candidates {
            if self.is_assignable_from(target, candidate)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn check_class(&mut self, target: TypeId, source: TypeId) -> MirrorResult<bool> {
        let cache = self.cache;
        if cache.is_top(target)? {
            return Ok(cache.kind(source)? != TypeKind::Void && !cache.is_primitive(source)?);
        }
        match cache.kind(source)? {
            TypeKind::Class => {}
            TypeKind::Variable => {
                let bounds = cache.bounds(source)?;
                return self.accepts_any(target, &bounds);
            }
            _ => return Ok(false),
        }

        let Some(ancestor) = self.find_ancestor(source, cache.erasure(target)?)? else {
            return Ok(false);
        };
        if let Some(arguments) = cache.type_arguments(target)? {
            let ancestor_arguments = cache.type_parameters(ancestor)?;
            if arguments.len() != ancestor_arguments.len() {
                return Ok(false);
            }
            for (&expected, &actual) in arguments.iter().zip(ancestor_arguments.iter()) {
                if !self.is_assignable_from(expected, actual)? {
                    return Ok(false);
                }
            }
        }
        if let Some(outer) = cache.explicit_enclosing_class(target)? {
            let Some(ancestor_outer) = cache.enclosing_class(ancestor)? else {
                return Ok(false);
            };
            return self.is_assignable_from(outer, ancestor_outer);
        }
        Ok(true)
    }

    fn check_wildcard(&mut self, target: TypeId, source: TypeId) -> MirrorResult<bool> {
        let cache = self.cache;
        let upper = cache.upper_bounds(target)?;
        let lower = cache.lower_bounds(target)?;
        if cache.kind(source)? == TypeKind::Wildcard {
            // Bounds pair up by position; unmatched trailing bounds are ignored.
            let source_upper = cache.upper_bounds(source)?;
            let source_lower = cache.lower_bounds(source)?;
            let pairs = upper
                .iter()
                .zip(source_upper.iter())
                .chain(lower.iter().zip(source_lower.iter()));
            for (&bound, &other) in pairs {
                if !self.is_assignable_from(bound, other)? {
                    return Ok(false);
                }
            }
            return Ok(true);
        }
        for &bound in upper.iter() {
            if !self.is_assignable_from(bound, source)? {
                return Ok(false);
            }
        }
        for &bound in lower.iter() {
            if !self.is_assignable_from(source, bound)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The supertype of `ty` (or `ty` itself) that erases to `target`.
    ///
    /// Depth-first over the superclass and then the interfaces. When several
    /// paths reach `target`, a later match replaces the current candidate
    /// only if it is strictly more specific.
    pub(crate) fn find_ancestor(
        &mut self,
        ty: TypeId,
        target: ClassId,
    ) -> MirrorResult<Option<TypeId>> {
        let cache = self.cache;
        if cache.kind(ty)? != TypeKind::Class {
            return Ok(None);
        }
        if cache.erasure(ty)? == target {
            return Ok(Some(ty));
        }
        if let Some(known) = cache.ancestors.get(&(ty, target)) {
            return Ok(*known);
        }
        match self.searches.enter((ty, target)) {
            RecursionResult::Entered => {}
            _ => {
                self.provisional += 1;
                return Ok(None);
            }
        }
        let before = self.provisional;
        let result = self.search_supertypes(ty, target);
        self.searches.leave((ty, target));
        let result = result?;
        if self.provisional == before {
            cache.ancestors.insert((ty, target), result);
        }
        Ok(result)
    }

    fn search_supertypes(&mut self, ty: TypeId, target: ClassId) -> MirrorResult<Option<TypeId>> {
        let cache = self.cache;
        let mut supertypes: Vec<TypeId> = cache.superclass(ty)?.into_iter().collect();
        supertypes.extend(cache.interfaces(ty)?.iter().copied());

        let mut best: Option<TypeId> = None;
        for supertype in supertypes {
            let Some(found) = self.find_ancestor(supertype, target)? else {
                continue;
            };
            best = match best {
                Some(current) if self.compare_specificity(found, current)? != Ordering::Greater => {
                    Some(current)
                }
                _ => Some(found),
            };
        }
        Ok(best)
    }

    /// `Greater` when `a` is strictly more specific than `b`.
    pub(crate) fn compare_specificity(&mut self, a: TypeId, b: TypeId) -> MirrorResult<Ordering> {
        if a == b {
            return Ok(Ordering::Equal);
        }
        let a_accepts_b = self.is_assignable_from(a, b)?;
        let b_accepts_a = self.is_assignable_from(b, a)?;
        Ok(match (a_accepts_b, b_accepts_a) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            _ => Ordering::Equal,
        })
    }
}

impl MirrorCache {
    /// True when a value of type `source` can be used where `target` is
    /// expected.
    pub fn is_assignable_from(&self, target: TypeId, source: TypeId) -> MirrorResult<bool> {
        let query_id = query_trace::enabled().then(query_trace::next_query_id);
        if let Some(query_id) = query_id {
            query_trace::relation_start(query_id, "is_assignable_from", target, source);
        }
        let cache_hit = self.relations.contains_key(&(target, source));
        let result = AssignabilityChecker::new(self).is_assignable_from(target, source);
        if let (Some(query_id), Ok(result)) = (query_id, &result) {
            query_trace::relation_end(query_id, "is_assignable_from", *result, cache_hit);
        }
        result
    }

    /// The supertype of `ty` erasing to `target`, `ty` itself included.
    pub fn find_ancestor(&self, ty: TypeId, target: ClassId) -> MirrorResult<Option<TypeId>> {
        AssignabilityChecker::new(self).find_ancestor(ty, target)
    }

    /// [`find_ancestor`](Self::find_ancestor), failing with `NoSuchMember`
    /// when `target` is not an ancestor.
    pub fn get_ancestor(&self, ty: TypeId, target: ClassId) -> MirrorResult<TypeId> {
        self.find_ancestor(ty, target)?.ok_or_else(|| {
            MirrorError::no_such_member(format!(
                "{} is not an ancestor of {}",
                self.display_class(target),
                self.display(ty)
            ))
        })
    }
}

#[cfg(test)]
#[path = "../tests/relations_tests.rs"]
mod tests;
