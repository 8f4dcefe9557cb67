//! Substitution maps and type-variable substitution.
//!
//! A [`TypeMapping`] binds raw type-variable descriptors to the descriptors
//! they stand for in one declaration scope, and points at the mapping of the
//! enclosing scope. Lookups walk outward: declaring class, then enclosing
//! class, then enclosing executable, until a binding is found or the chain
//! ends. Mappings are never mutated; [`TypeMapping::compose`] builds a new
//! chain that shares its inputs.

use crate::MirrorCache;
use crate::error::{MirrorError, MirrorResult};
use crate::recursion::DepthCounter;
use crate::specialization::{
    ArraySpecialization, ClassSpecialization, TypeList, TypeSpecialization, WildcardSpecialization,
};
use crate::types::{TypeId, TypeShape};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::sync::Arc;

/// How a lookup miss is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionMode {
    /// Unbound variables stay as they are.
    #[default]
    Lenient,
    /// Unbound variables raise `UnresolvedTypeVariable`.
    Strict,
}

#[derive(Debug, Default)]
pub struct TypeMapping {
    local: Arc<FxHashMap<TypeId, TypeId>>,
    parent: Option<Arc<TypeMapping>>,
}

impl TypeMapping {
    pub fn empty() -> Arc<TypeMapping> {
        Arc::new(TypeMapping::default())
    }

    /// A single scope binding each raw variable to its replacement.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (TypeId, TypeId)>) -> TypeMapping {
        TypeMapping {
            local: Arc::new(pairs.into_iter().collect()),
            parent: None,
        }
    }

    /// Resolve `variable` (a raw variable descriptor) through the chain.
    pub fn lookup(&self, variable: TypeId) -> Option<TypeId> {
        let mut scope = Some(self);
        while let Some(mapping) = scope {
            if let Some(&target) = mapping.local.get(&variable) {
                return Some(target);
            }
            scope = mapping.parent.as_deref();
        }
        None
    }

    /// `self + outer`: consult `self`'s chain first, then `outer`.
    pub fn compose(self: &Arc<Self>, outer: &Arc<TypeMapping>) -> Arc<TypeMapping> {
        if outer.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return outer.clone();
        }
        let parent = match &self.parent {
            Some(parent) => parent.compose(outer),
            None => outer.clone(),
        };
        Arc::new(TypeMapping {
            local: self.local.clone(),
            parent: Some(parent),
        })
    }

    /// True when no scope in the chain binds anything.
    pub fn is_empty(&self) -> bool {
        self.scopes().all(|scope| scope.local.is_empty())
    }

    /// Total bindings across the chain; shadowed bindings count too.
    pub fn len(&self) -> usize {
        self.scopes().map(|scope| scope.local.len()).sum()
    }

    /// Number of scopes in the chain.
    pub fn depth(&self) -> usize {
        self.scopes().count()
    }

    fn scopes(&self) -> impl Iterator<Item = &TypeMapping> {
        std::iter::successors(Some(self), |scope| scope.parent.as_deref())
    }
}

impl MirrorCache {
    /// Replace the type variables in `ty` according to `mapping`.
    ///
    /// Class arguments, explicit enclosing classes, array components and
    /// wildcard bounds are rewritten; the rebuilt descriptors come from the
    /// cache like any other specialization. Bounds are not re-validated.
    pub fn substitute(
        &self,
        mapping: &TypeMapping,
        ty: TypeId,
        mode: ResolutionMode,
    ) -> MirrorResult<TypeId> {
        if mode == ResolutionMode::Lenient && mapping.is_empty() {
            return Ok(ty);
        }
        let mut depth = DepthCounter::with_profile(self.options.substitution);
        self.substitute_inner(mapping, ty, mode, &mut depth)
            .map_err(|err| match err {
                MirrorError::UnresolvedTypeVariable { variable, context } if context.is_empty() => {
                    MirrorError::UnresolvedTypeVariable {
                        variable,
                        context: self.display(ty),
                    }
                }
                other => other,
            })
    }

    fn substitute_inner(
        &self,
        mapping: &TypeMapping,
        ty: TypeId,
        mode: ResolutionMode,
        depth: &mut DepthCounter,
    ) -> MirrorResult<TypeId> {
        if !depth.enter() {
            return Err(MirrorError::DepthLimitExceeded {
                operation: "substitution",
                context: self.display(ty),
            });
        }
        let result = self.substitute_node(mapping, ty, mode, depth);
        depth.leave();
        result
    }

    fn substitute_list(
        &self,
        mapping: &TypeMapping,
        list: &TypeList,
        mode: ResolutionMode,
        depth: &mut DepthCounter,
    ) -> MirrorResult<Option<TypeList>> {
        let mut changed = false;
        let mut out: SmallVec<[TypeId; 4]> = SmallVec::with_capacity(list.len());
        for &item in list.iter() {
            let replaced = self.substitute_inner(mapping, item, mode, depth)?;
            changed |= replaced != item;
            out.push(replaced);
        }
        Ok(changed.then(|| out.into_iter().collect()))
    }

    fn substitute_node(
        &self,
        mapping: &TypeMapping,
        ty: TypeId,
        mode: ResolutionMode,
        depth: &mut DepthCounter,
    ) -> MirrorResult<TypeId> {
        let data = self.data(ty)?;
        match &data.shape {
            TypeShape::Variable(shape) => match mapping.lookup(data.raw) {
                Some(target) => {
                    let annotations = self.type_annotations(ty)?;
                    if annotations.is_empty() || target == ty {
                        return Ok(target);
                    }
                    let mut merged = self.type_annotations(target)?.to_vec();
                    merged.extend(annotations.iter().cloned());
                    self.with_type_annotations(target, merged)
                }
                None if mode == ResolutionMode::Strict => {
                    Err(MirrorError::UnresolvedTypeVariable {
                        variable: self.interner().resolve(shape.info.name).to_string(),
                        context: String::new(),
                    })
                }
                None => Ok(ty),
            },
            TypeShape::Class(_) => {
                let Some(TypeSpecialization::Class(spec)) = &data.specialization else {
                    return Ok(ty);
                };
                let arguments = match &spec.arguments {
                    Some(arguments) => self.substitute_list(mapping, arguments, mode, depth)?,
                    None => None,
                };
                let enclosing_class = match spec.enclosing_class {
                    Some(outer) => {
                        let replaced = self.substitute_inner(mapping, outer, mode, depth)?;
                        (replaced != outer).then_some(replaced)
                    }
                    None => None,
                };
                if arguments.is_none() && enclosing_class.is_none() {
                    return Ok(ty);
                }
                self.specialize(
                    data.raw,
                    TypeSpecialization::Class(ClassSpecialization {
                        annotations: spec.annotations.clone(),
                        arguments: arguments.or_else(|| spec.arguments.clone()),
                        enclosing_class: enclosing_class.or(spec.enclosing_class),
                        enclosing_executable: spec.enclosing_executable,
                    }),
                )
            }
            TypeShape::Array(_) => {
                let component = self.component(ty)?;
                let replaced = self.substitute_inner(mapping, component, mode, depth)?;
                if replaced == component {
                    return Ok(ty);
                }
                let annotations = self.type_annotations(ty)?;
                self.specialize(
                    data.raw,
                    TypeSpecialization::Array(ArraySpecialization {
                        annotations,
                        component: Some(replaced),
                    }),
                )
            }
            TypeShape::Wildcard(_) => {
                let upper = self.upper_bounds(ty)?;
                let lower = self.lower_bounds(ty)?;
                let new_upper = self.substitute_list(mapping, &upper, mode, depth)?;
                let new_lower = self.substitute_list(mapping, &lower, mode, depth)?;
                if new_upper.is_none() && new_lower.is_none() {
                    return Ok(ty);
                }
                let annotations = self.type_annotations(ty)?;
                self.specialize(
                    data.raw,
                    TypeSpecialization::Wildcard(WildcardSpecialization {
                        annotations,
                        upper_bounds: Some(new_upper.unwrap_or(upper)),
                        lower_bounds: Some(new_lower.unwrap_or(lower)),
                    }),
                )
            }
            TypeShape::Void(_) => Ok(ty),
        }
    }

    /// Resolve `ty` against the generic mapping of `class`.
    pub fn resolve_in(
        &self,
        class: TypeId,
        ty: TypeId,
        mode: ResolutionMode,
    ) -> MirrorResult<TypeId> {
        let mapping = self.generic_mapping(class)?;
        self.substitute(&mapping, ty, mode)
    }
}

#[cfg(test)]
#[path = "../tests/mapping_tests.rs"]
mod tests;
