//! Member views of class descriptors.
//!
//! Declared members are re-anchored to the class they are requested from,
//! so `ArrayList<String>`'s `get` returns `String` while raw `ArrayList`'s
//! returns `E`. Inherited views apply the Java rules for which supertype
//! methods a class inherits:
//!
//! - private methods are never inherited;
//! - package-access methods are inherited only within the same package;
//! - a method overridden by a declared method is not inherited;
//! - an abstract or default method overridden by another supertype method is
//!   not inherited;
//! - static interface methods are not inherited.

use crate::MirrorCache;
use crate::class::class_shape;
use crate::error::{MirrorError, MirrorResult};
use crate::handle::{ClassId, FieldId, MethodId};
use crate::metadata::{Access, ClassInfo, Modifiers};
use crate::specialization::{ExecutableSpecialization, TypeList, empty_types};
use crate::types::{ClassMembers, ExecutableId, FieldMirrorId, TypeId, TypeKind, memo};
use mirror_common::Atom;
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Keep the first item per key, in order.
fn dedup_by<T: Copy, K: Eq + std::hash::Hash>(
    items: impl IntoIterator<Item = T>,
    mut key: impl FnMut(T) -> MirrorResult<K>,
) -> MirrorResult<Vec<T>> {
    let mut seen = FxHashSet::default();
    let mut kept = Vec::new();
    for item in items {
        if seen.insert(key(item)?) {
            kept.push(item);
        }
    }
    Ok(kept)
}

/// Keep the items whose modifiers include `PUBLIC`, in order.
fn retain_public<T: Copy>(
    items: impl IntoIterator<Item = T>,
    mut modifiers: impl FnMut(T) -> MirrorResult<Modifiers>,
) -> MirrorResult<Vec<T>> {
    let mut public = Vec::new();
    for item in items {
        if modifiers(item)?.contains(Modifiers::PUBLIC) {
            public.push(item);
        }
    }
    Ok(public)
}

impl MirrorCache {
    fn with_members<T>(
        &self,
        class: TypeId,
        f: impl FnOnce(&ClassMembers, &ClassInfo) -> MirrorResult<T>,
    ) -> MirrorResult<T> {
        let data = self.expect_kind(class, TypeKind::Class)?;
        let shape = class_shape(&data).ok_or(MirrorError::UnknownDescriptor { id: class.0 })?;
        f(&shape.members, &shape.info)
    }

    // =========================================================================
    // Declared members
    // =========================================================================

    pub fn declared_fields(&self, class: TypeId) -> MirrorResult<Arc<[FieldMirrorId]>> {
        self.with_members(class, |members, info| {
            memo(&members.declared_fields, || {
                info.fields
                    .iter()
                    .map(|&field| {
                        let raw = self.reflect_field(field)?;
                        self.specialize_field(raw, class)
                    })
                    .collect()
            })
        })
    }

    pub fn declared_methods(&self, class: TypeId) -> MirrorResult<Arc<[ExecutableId]>> {
        self.with_members(class, |members, info| {
            memo(&members.declared_methods, || self.anchor_executables(class, &info.methods))
        })
    }

    pub fn declared_constructors(&self, class: TypeId) -> MirrorResult<Arc<[ExecutableId]>> {
        self.with_members(class, |members, info| {
            memo(&members.declared_constructors, || {
                self.anchor_executables(class, &info.constructors)
            })
        })
    }

    fn anchor_executables(
        &self,
        class: TypeId,
        methods: &[MethodId],
    ) -> MirrorResult<Arc<[ExecutableId]>> {
        methods
            .iter()
            .map(|&method| {
                let raw = self.reflect_executable(method)?;
                self.specialize_executable(
                    raw,
                    ExecutableSpecialization {
                        declaring_class: Some(class),
                        arguments: None,
                    },
                )
            })
            .collect()
    }

    /// Member classes; non-static ones are viewed as members of `class`.
    pub fn declared_member_classes(&self, class: TypeId) -> MirrorResult<TypeList> {
        self.with_members(class, |members, info| {
            memo(&members.declared_member_classes, || {
                info.member_classes
                    .iter()
                    .map(|&member| {
                        let raw = self.reflect_class(member)?;
                        if self.class_declaration(raw)?.is_static() {
                            Ok(raw)
                        } else {
                            self.with_enclosing_class(raw, Some(class))
                        }
                    })
                    .collect()
            })
        })
    }

    // =========================================================================
    // Inherited views
    // =========================================================================

    /// Supertype methods this class inherits.
    pub fn inherited_methods(&self, class: TypeId) -> MirrorResult<Arc<[ExecutableId]>> {
        self.with_members(class, |members, info| {
            memo(&members.inherited_methods, || {
                let mut candidates = Vec::new();
                if let Some(superclass) = self.superclass(class)? {
                    candidates.extend(self.visible_methods(superclass)?.iter().copied());
                }
                for &interface in self.interfaces(class)?.iter() {
                    for &method in self.visible_methods(interface)?.iter() {
                        if !self.executable_modifiers(method)?.contains(Modifiers::STATIC) {
                            candidates.push(method);
                        }
                    }
                }
                let candidates = dedup_by(candidates, |method| self.raw_executable(method))?;
                let declared = self.declared_methods(class)?;

                let mut inherited = Vec::new();
                for &method in &candidates {
                    let method_info = self.executable_declaration(method)?;
                    match method_info.modifiers.access() {
                        Access::Private => continue,
                        Access::Package => {
                            let owner = self.class_info(method_info.declaring_class)?;
                            if owner.package != info.package {
                                continue;
                            }
                        }
                        Access::Public | Access::Protected => {}
                    }
                    if self.overridden_by_any(method, declared.iter().copied())? {
                        continue;
                    }
                    if method_info.is_overridable_declaration()
                        && self.overridden_by_any(method, candidates.iter().copied())?
                    {
                        continue;
                    }
                    inherited.push(method);
                }
                Ok(inherited.into())
            })
        })
    }

    /// Declared methods followed by inherited ones.
    pub fn visible_methods(&self, class: TypeId) -> MirrorResult<Arc<[ExecutableId]>> {
        self.with_members(class, |members, _| {
            memo(&members.visible_methods, || {
                let mut visible = self.declared_methods(class)?.to_vec();
                visible.extend(self.inherited_methods(class)?.iter().copied());
                Ok(visible.into())
            })
        })
    }

    pub fn public_methods(&self, class: TypeId) -> MirrorResult<Vec<ExecutableId>> {
        retain_public(self.visible_methods(class)?.iter().copied(), |method| {
            self.executable_modifiers(method)
        })
    }

    /// Every method of the hierarchy that no other method in it overrides.
    pub fn methods(&self, class: TypeId) -> MirrorResult<Arc<[ExecutableId]>> {
        self.with_members(class, |members, _| {
            memo(&members.methods, || {
                let mut all = self.declared_methods(class)?.to_vec();
                for supertype in self.supertypes(class)? {
                    all.extend(self.methods(supertype)?.iter().copied());
                }
                let all = dedup_by(all, |method| self.raw_executable(method))?;
                let mut methods = Vec::with_capacity(all.len());
                for &method in &all {
                    if !self.overridden_by_any(method, all.iter().copied())? {
                        methods.push(method);
                    }
                }
                Ok(methods.into())
            })
        })
    }

    /// Declared fields, then those of the superclass and interfaces.
    pub fn fields(&self, class: TypeId) -> MirrorResult<Arc<[FieldMirrorId]>> {
        self.with_members(class, |members, _| {
            memo(&members.fields, || {
                let mut fields = self.declared_fields(class)?.to_vec();
                for supertype in self.supertypes(class)? {
                    fields.extend(self.fields(supertype)?.iter().copied());
                }
                Ok(dedup_by(fields, |field| self.raw_field(field))?.into())
            })
        })
    }

    /// Declared member classes, then inherited ones; a simple name already
    /// seen hides later classes with the same name.
    pub fn member_classes(&self, class: TypeId) -> MirrorResult<TypeList> {
        self.with_members(class, |members, _| {
            memo(&members.member_classes, || {
                let mut all = self.declared_member_classes(class)?.to_vec();
                for supertype in self.supertypes(class)? {
                    all.extend(self.member_classes(supertype)?.iter().copied());
                }
                let mut names = FxHashSet::default();
                let mut classes = Vec::with_capacity(all.len());
                for member in all {
                    if names.insert(self.class_declaration(member)?.simple_name) {
                        classes.push(member);
                    }
                }
                if classes.is_empty() {
                    return Ok(empty_types());
                }
                Ok(classes.into())
            })
        })
    }

    fn supertypes(&self, class: TypeId) -> MirrorResult<Vec<TypeId>> {
        let mut supertypes: Vec<TypeId> = self.superclass(class)?.into_iter().collect();
        supertypes.extend(self.interfaces(class)?.iter().copied());
        Ok(supertypes)
    }

    // =========================================================================
    // Overriding
    // =========================================================================

    /// True when `method` overrides `base`: distinct mirrors with the same
    /// name and erased parameters, where `base`'s declaring class is a
    /// supertype of `method`'s.
    pub fn overrides(&self, method: ExecutableId, base: ExecutableId) -> MirrorResult<bool> {
        if method == base {
            return Ok(false);
        }
        let method_info = self.executable_declaration(method)?;
        let base_info = self.executable_declaration(base)?;
        if method_info.name != base_info.name
            || method_info.is_constructor()
            || base_info.is_constructor()
        {
            return Ok(false);
        }
        let base_class = self.reflect_class(base_info.declaring_class)?;
        let method_class = self.reflect_class(method_info.declaring_class)?;
        if !self.is_assignable_from(base_class, method_class)? {
            return Ok(false);
        }
        Ok(self.erased_parameter_types(method)? == self.erased_parameter_types(base)?)
    }

    fn overridden_by_any(
        &self,
        base: ExecutableId,
        others: impl IntoIterator<Item = ExecutableId>,
    ) -> MirrorResult<bool> {
        for other in others {
            if self.raw_executable(other)? != self.raw_executable(base)?
                && self.overrides(other, base)?
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    // =========================================================================
    // Public views
    // =========================================================================

    pub fn public_fields(&self, class: TypeId) -> MirrorResult<Vec<FieldMirrorId>> {
        retain_public(self.fields(class)?.iter().copied(), |field| self.field_modifiers(field))
    }

    pub fn public_constructors(&self, class: TypeId) -> MirrorResult<Vec<ExecutableId>> {
        retain_public(self.declared_constructors(class)?.iter().copied(), |constructor| {
            self.executable_modifiers(constructor)
        })
    }

    pub fn public_member_classes(&self, class: TypeId) -> MirrorResult<Vec<TypeId>> {
        retain_public(self.member_classes(class)?.iter().copied(), |member| {
            Ok(self.class_declaration(member)?.modifiers)
        })
    }

    // =========================================================================
    // Lookup by declaration
    // =========================================================================

    /// The mirror of `method` as seen from `class`, found in `class` itself
    /// or in the ancestor that declares it.
    pub fn get_method(&self, class: TypeId, method: MethodId) -> MirrorResult<ExecutableId> {
        let owner = self.method_info(method)?.declaring_class;
        self.search_declaration(
            class,
            owner,
            "method",
            |this, anchor| {
                for &candidate in this.declared_methods(anchor)?.iter() {
                    if this.executable_method(candidate)? == method {
                        return Ok(Some(candidate));
                    }
                }
                Ok(None)
            },
            |this, ancestor| this.get_method(ancestor, method),
        )
    }

    pub fn get_field(&self, class: TypeId, field: FieldId) -> MirrorResult<FieldMirrorId> {
        let owner = self.field_info(field)?.declaring_class;
        self.search_declaration(
            class,
            owner,
            "field",
            |this, anchor| {
                for &candidate in this.declared_fields(anchor)?.iter() {
                    if this.field_id(candidate)? == field {
                        return Ok(Some(candidate));
                    }
                }
                Ok(None)
            },
            |this, ancestor| this.get_field(ancestor, field),
        )
    }

    pub fn get_member_class(&self, class: TypeId, member: ClassId) -> MirrorResult<TypeId> {
        let owner = self
            .class_info(member)?
            .enclosing_class
            .ok_or_else(|| {
                MirrorError::no_such_member(format!(
                    "{} is not a member class",
                    self.display_class(member)
                ))
            })?;
        self.search_declaration(
            class,
            owner,
            "member class",
            |this, anchor| {
                for &candidate in this.declared_member_classes(anchor)?.iter() {
                    if this.class_id(candidate)? == member {
                        return Ok(Some(candidate));
                    }
                }
                Ok(None)
            },
            |this, ancestor| this.get_member_class(ancestor, member),
        )
    }

    /// Constructors are not inherited, so only `class` itself is searched.
    pub fn get_constructor(
        &self,
        class: TypeId,
        constructor: MethodId,
    ) -> MirrorResult<ExecutableId> {
        for &candidate in self.declared_constructors(class)?.iter() {
            if self.executable_method(candidate)? == constructor {
                return Ok(candidate);
            }
        }
        Err(MirrorError::no_such_member(format!(
            "{} declares no constructor #{}",
            self.display(class),
            constructor.0
        )))
    }

    /// Search `class` when it is the declaring class `owner`; otherwise
    /// delegate to the ancestor erasing to `owner` and wrap any failure with
    /// this hop.
    fn search_declaration<T>(
        &self,
        class: TypeId,
        owner: ClassId,
        what: &str,
        search_here: impl FnOnce(&Self, TypeId) -> MirrorResult<Option<T>>,
        search_ancestor: impl FnOnce(&Self, TypeId) -> MirrorResult<T>,
    ) -> MirrorResult<T> {
        if self.erasure(class)? == owner {
            return search_here(self, class)?.ok_or_else(|| {
                MirrorError::no_such_member(format!(
                    "{} does not declare the requested {what}",
                    self.display(class)
                ))
            });
        }
        match self.find_ancestor(class, owner)? {
            Some(ancestor) if ancestor != class => search_ancestor(self, ancestor).map_err(|err| {
                err.while_searching(format!(
                    "{what} not found in {} while searching {}",
                    self.display(ancestor),
                    self.display(class)
                ))
            }),
            _ => Err(MirrorError::no_such_member(format!(
                "{} is not an ancestor of {}, so it cannot supply the requested {what}",
                self.display_class(owner),
                self.display(class)
            ))),
        }
    }

    // =========================================================================
    // Lookup by name
    // =========================================================================

    fn name_atom(&self, name: &str) -> Option<Atom> {
        self.interner().lookup(name)
    }

    fn field_named(
        &self,
        fields: impl IntoIterator<Item = FieldMirrorId>,
        name: &str,
    ) -> MirrorResult<Option<FieldMirrorId>> {
        let Some(name) = self.name_atom(name) else {
            return Ok(None);
        };
        for field in fields {
            if self.field_name(field)? == name {
                return Ok(Some(field));
            }
        }
        Ok(None)
    }

    pub fn find_declared_field(
        &self,
        class: TypeId,
        name: &str,
    ) -> MirrorResult<Option<FieldMirrorId>> {
        self.field_named(self.declared_fields(class)?.iter().copied(), name)
    }

    /// The first field named `name` in declaration-then-supertype order.
    pub fn find_field(&self, class: TypeId, name: &str) -> MirrorResult<Option<FieldMirrorId>> {
        self.field_named(self.fields(class)?.iter().copied(), name)
    }

    /// Like [`Self::find_field`], but a non-public first match hides any
    /// public field of the same name further up.
    pub fn find_public_field(
        &self,
        class: TypeId,
        name: &str,
    ) -> MirrorResult<Option<FieldMirrorId>> {
        match self.find_field(class, name)? {
            Some(field) if self.field_modifiers(field)?.contains(Modifiers::PUBLIC) => {
                Ok(Some(field))
            }
            _ => Ok(None),
        }
    }

    pub fn find_methods(&self, class: TypeId, name: &str) -> MirrorResult<Vec<ExecutableId>> {
        let Some(name) = self.name_atom(name) else {
            return Ok(Vec::new());
        };
        let mut found = Vec::new();
        for &method in self.methods(class)?.iter() {
            if self.executable_name(method)? == name {
                found.push(method);
            }
        }
        Ok(found)
    }

    /// The method named `name` whose erased parameters are the erasures of
    /// `parameters`.
    pub fn find_method(
        &self,
        class: TypeId,
        name: &str,
        parameters: &[TypeId],
    ) -> MirrorResult<Option<ExecutableId>> {
        let erased = self.erase_all(parameters)?;
        for method in self.find_methods(class, name)? {
            if self.erased_parameter_types(method)? == erased {
                return Ok(Some(method));
            }
        }
        Ok(None)
    }

    pub fn find_declared_constructor(
        &self,
        class: TypeId,
        parameters: &[TypeId],
    ) -> MirrorResult<Option<ExecutableId>> {
        let erased = self.erase_all(parameters)?;
        for &constructor in self.declared_constructors(class)?.iter() {
            if self.erased_parameter_types(constructor)? == erased {
                return Ok(Some(constructor));
            }
        }
        Ok(None)
    }

    fn member_class_named(
        &self,
        members: &[TypeId],
        simple_name: &str,
    ) -> MirrorResult<Option<TypeId>> {
        let Some(name) = self.name_atom(simple_name) else {
            return Ok(None);
        };
        for &member in members {
            if self.class_declaration(member)?.simple_name == name {
                return Ok(Some(member));
            }
        }
        Ok(None)
    }

    pub fn find_declared_member_class(
        &self,
        class: TypeId,
        simple_name: &str,
    ) -> MirrorResult<Option<TypeId>> {
        self.member_class_named(&self.declared_member_classes(class)?, simple_name)
    }

    pub fn find_member_class(
        &self,
        class: TypeId,
        simple_name: &str,
    ) -> MirrorResult<Option<TypeId>> {
        self.member_class_named(&self.member_classes(class)?, simple_name)
    }

    /// Like [`Self::find_member_class`], restricted to a public match.
    pub fn find_public_member_class(
        &self,
        class: TypeId,
        simple_name: &str,
    ) -> MirrorResult<Option<TypeId>> {
        match self.find_member_class(class, simple_name)? {
            Some(member)
                if self.class_declaration(member)?.modifiers.contains(Modifiers::PUBLIC) =>
            {
                Ok(Some(member))
            }
            _ => Ok(None),
        }
    }

    fn erase_all(&self, types: &[TypeId]) -> MirrorResult<Vec<ClassId>> {
        types.iter().map(|&ty| self.erasure(ty)).collect()
    }

    pub fn get_field_by_name(&self, class: TypeId, name: &str) -> MirrorResult<FieldMirrorId> {
        self.find_field(class, name)?.ok_or_else(|| {
            MirrorError::no_such_member(format!("{} has no field {name}", self.display(class)))
        })
    }

    pub fn get_declared_field(&self, class: TypeId, name: &str) -> MirrorResult<FieldMirrorId> {
        self.find_declared_field(class, name)?.ok_or_else(|| {
            MirrorError::no_such_member(format!("{} declares no field {name}", self.display(class)))
        })
    }

    pub fn get_public_field(&self, class: TypeId, name: &str) -> MirrorResult<FieldMirrorId> {
        self.find_public_field(class, name)?.ok_or_else(|| {
            MirrorError::no_such_member(format!(
                "{} has no public field {name}",
                self.display(class)
            ))
        })
    }

    pub fn get_method_by_signature(
        &self,
        class: TypeId,
        name: &str,
        parameters: &[TypeId],
    ) -> MirrorResult<ExecutableId> {
        self.find_method(class, name, parameters)?.ok_or_else(|| {
            MirrorError::no_such_member(format!(
                "{} has no method {name}({})",
                self.display(class),
                self.display_list(parameters)
            ))
        })
    }

    pub fn get_declared_constructor_by_signature(
        &self,
        class: TypeId,
        parameters: &[TypeId],
    ) -> MirrorResult<ExecutableId> {
        self.find_declared_constructor(class, parameters)?.ok_or_else(|| {
            MirrorError::no_such_member(format!(
                "{} declares no constructor ({})",
                self.display(class),
                self.display_list(parameters)
            ))
        })
    }

    pub fn get_member_class_by_name(
        &self,
        class: TypeId,
        simple_name: &str,
    ) -> MirrorResult<TypeId> {
        self.find_member_class(class, simple_name)?.ok_or_else(|| {
            MirrorError::no_such_member(format!(
                "{} has no member class {simple_name}",
                self.display(class)
            ))
        })
    }

    pub fn get_declared_member_class(
        &self,
        class: TypeId,
        simple_name: &str,
    ) -> MirrorResult<TypeId> {
        self.find_declared_member_class(class, simple_name)?.ok_or_else(|| {
            MirrorError::no_such_member(format!(
                "{} declares no member class {simple_name}",
                self.display(class)
            ))
        })
    }

    pub fn get_public_member_class(
        &self,
        class: TypeId,
        simple_name: &str,
    ) -> MirrorResult<TypeId> {
        self.find_public_member_class(class, simple_name)?.ok_or_else(|| {
            MirrorError::no_such_member(format!(
                "{} has no public member class {simple_name}",
                self.display(class)
            ))
        })
    }
}

#[cfg(test)]
#[path = "../tests/members_tests.rs"]
mod tests;
