//! The descriptor cache.
//!
//! `MirrorCache` is the single source of descriptor identity. It owns four
//! tables for types:
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `types` | `TypeId` | descriptor storage |
//! | `handles` | host handle | descriptor for that handle |
//! | `annotated` | annotated handle | descriptor for that tree |
//! | `specialized` | (raw, record) | canonical specialization |
//!
//! and the same raw/specialized pair for executables and fields.
//!
//! Shallow descriptors (classes, array classes, variables, wildcards, void)
//! are allocated inside the handle table's vacant entry with every dependent
//! property left unresolved, so a self-referential declaration that asks for
//! itself again finds the registered descriptor. Composite handles
//! (parameterized types, generic arrays) are resolved by recursive calls made
//! with no table entry held, then published first-writer-wins.
//!
//! Specialization never validates; the public `with_*` operations validate
//! before calling [`MirrorCache::specialize`].

use crate::error::{MirrorError, MirrorResult};
use crate::handle::{
    AnnotatedChildren, AnnotatedType, Annotation, ClassId, FieldId, HostType, MethodId, TypeVarId,
};
use crate::metadata::{
    ClassInfo, ClassKind, DeclarationProvider, FieldInfo, MethodInfo, TypeVarInfo,
};
use crate::query_trace;
use crate::recursion::RecursionProfile;
use crate::specialization::{
    Annotations, ArraySpecialization, ClassSpecialization, ExecutableSpecialization, RawDefaults,
    TypeList, TypeSpecialization, WildcardSpecialization, no_annotations,
};
use crate::types::{
    ArrayShape, ClassShape, ExecutableData, ExecutableId, FieldData, FieldMirrorId, TypeData,
    TypeId, TypeKind, TypeShape, VariableShape, WildcardShape,
};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use mirror_common::ShardedInterner;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::{debug, trace};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Recursion limits used by one cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorOptions {
    pub assignability: RecursionProfile,
    pub ancestor_search: RecursionProfile,
    pub substitution: RecursionProfile,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        MirrorOptions {
            assignability: RecursionProfile::Assignability,
            ancestor_search: RecursionProfile::AncestorSearch,
            substitution: RecursionProfile::Substitution,
        }
    }
}

/// Identity-preserving cache of type, executable and field mirrors.
pub struct MirrorCache {
    instance_id: u64,
    provider: Arc<dyn DeclarationProvider>,
    pub(crate) options: MirrorOptions,

    types: DashMap<TypeId, Arc<TypeData>>,
    next_type: AtomicU32,
    handles: DashMap<HostType, TypeId>,
    annotated: DashMap<AnnotatedType, TypeId>,
    specialized: DashMap<(TypeId, TypeSpecialization), TypeId>,

    executables: DashMap<ExecutableId, Arc<ExecutableData>>,
    next_executable: AtomicU32,
    raw_executables: DashMap<MethodId, ExecutableId>,
    specialized_executables: DashMap<(ExecutableId, ExecutableSpecialization), ExecutableId>,

    fields: DashMap<FieldMirrorId, Arc<FieldData>>,
    next_field: AtomicU32,
    raw_fields: DashMap<FieldId, FieldMirrorId>,
    specialized_fields: DashMap<(FieldMirrorId, TypeId), FieldMirrorId>,

    /// Memoized `is_assignable_from` results, keyed (target, source).
    pub(crate) relations: DashMap<(TypeId, TypeId), bool>,
    /// Memoized ancestor searches, keyed (descriptor, target erasure).
    pub(crate) ancestors: DashMap<(TypeId, ClassId), Option<TypeId>>,
}

impl MirrorCache {
    pub fn new(provider: Arc<dyn DeclarationProvider>) -> Self {
        Self::with_options(provider, MirrorOptions::default())
    }

    pub fn with_options(provider: Arc<dyn DeclarationProvider>, options: MirrorOptions) -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        debug!(instance_id, ?options, "MirrorCache::new");
        MirrorCache {
            instance_id,
            provider,
            options,
            types: DashMap::new(),
            next_type: AtomicU32::new(1),
            handles: DashMap::new(),
            annotated: DashMap::new(),
            specialized: DashMap::new(),
            executables: DashMap::new(),
            next_executable: AtomicU32::new(1),
            raw_executables: DashMap::new(),
            specialized_executables: DashMap::new(),
            fields: DashMap::new(),
            next_field: AtomicU32::new(1),
            raw_fields: DashMap::new(),
            specialized_fields: DashMap::new(),
            relations: DashMap::new(),
            ancestors: DashMap::new(),
        }
    }

    /// A cache whose assignability checks and ancestor searches both run
    /// under `profile`.
    pub fn with_profile(provider: Arc<dyn DeclarationProvider>, profile: RecursionProfile) -> Self {
        Self::with_options(
            provider,
            MirrorOptions {
                assignability: profile,
                ancestor_search: profile,
                ..MirrorOptions::default()
            },
        )
    }

    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    pub fn provider(&self) -> &Arc<dyn DeclarationProvider> {
        &self.provider
    }

    pub fn options(&self) -> MirrorOptions {
        self.options
    }

    pub fn interner(&self) -> &ShardedInterner {
        self.provider.interner()
    }

    /// Number of type descriptors allocated so far.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    // =========================================================================
    // Provider access
    // =========================================================================

    pub(crate) fn class_info(&self, class: ClassId) -> MirrorResult<Arc<ClassInfo>> {
        self.provider
            .class(class)
            .ok_or_else(|| MirrorError::missing(format!("class #{}", class.0)))
    }

    pub(crate) fn type_var_info(&self, var: TypeVarId) -> MirrorResult<Arc<TypeVarInfo>> {
        self.provider
            .type_var(var)
            .ok_or_else(|| MirrorError::missing(format!("type variable #{}", var.0)))
    }

    pub(crate) fn method_info(&self, method: MethodId) -> MirrorResult<Arc<MethodInfo>> {
        self.provider
            .method(method)
            .ok_or_else(|| MirrorError::missing(format!("method #{}", method.0)))
    }

    pub(crate) fn field_info(&self, field: FieldId) -> MirrorResult<Arc<FieldInfo>> {
        self.provider
            .field(field)
            .ok_or_else(|| MirrorError::missing(format!("field #{}", field.0)))
    }

    // =========================================================================
    // Descriptor storage
    // =========================================================================

    pub(crate) fn data(&self, id: TypeId) -> MirrorResult<Arc<TypeData>> {
        self.types
            .get(&id)
            .map(|r| r.clone())
            .ok_or(MirrorError::UnknownDescriptor { id: id.0 })
    }

    pub(crate) fn executable_data(&self, id: ExecutableId) -> MirrorResult<Arc<ExecutableData>> {
        self.executables
            .get(&id)
            .map(|r| r.clone())
            .ok_or(MirrorError::UnknownDescriptor { id: id.0 })
    }

    pub(crate) fn field_data(&self, id: FieldMirrorId) -> MirrorResult<Arc<FieldData>> {
        self.fields
            .get(&id)
            .map(|r| r.clone())
            .ok_or(MirrorError::UnknownDescriptor { id: id.0 })
    }

    fn allocate_type(
        &self,
        raw: Option<TypeId>,
        specialization: Option<TypeSpecialization>,
        shape: TypeShape,
    ) -> TypeId {
        let id = TypeId(self.next_type.fetch_add(1, Ordering::SeqCst));
        let data = TypeData {
            id,
            raw: raw.unwrap_or(id),
            specialization,
            shape,
        };
        trace!(
            instance_id = self.instance_id,
            type_id = id.0,
            raw = data.raw.0,
            kind = ?data.kind(),
            "MirrorCache::allocate_type"
        );
        self.types.insert(id, Arc::new(data));
        id
    }

    // =========================================================================
    // Reflection entry points
    // =========================================================================

    /// The descriptor for a host type handle.
    pub fn reflect(&self, handle: &HostType) -> MirrorResult<TypeId> {
        if let Some(id) = self.handles.get(handle) {
            return Ok(*id);
        }
        let query_id = query_trace::enabled().then(query_trace::next_query_id);
        if let Some(query_id) = query_id {
            query_trace::reflect_start(query_id, handle);
        }

        let result = self.reflect_uncached(handle);

        if let (Some(query_id), Ok(id)) = (query_id, &result) {
            query_trace::reflect_end(query_id, *id);
        }
        result
    }

    /// Shorthand for `reflect(&HostType::Class(class))`.
    pub fn reflect_class(&self, class: ClassId) -> MirrorResult<TypeId> {
        self.reflect(&HostType::Class(class))
    }

    fn reflect_uncached(&self, handle: &HostType) -> MirrorResult<TypeId> {
        match handle {
            HostType::Class(class) => {
                let info = self.class_info(*class)?;
                let shape = match info.kind {
                    ClassKind::Void => TypeShape::Void(*class),
                    ClassKind::Array { component } => {
                        TypeShape::Array(ArrayShape::new(*class, component))
                    }
                    _ => TypeShape::Class(ClassShape::new(*class, info)),
                };
                Ok(self.register_handle(handle, shape))
            }
            HostType::Variable(var) => {
                let info = self.type_var_info(*var)?;
                let shape = TypeShape::Variable(VariableShape::new(*var, info));
                Ok(self.register_handle(handle, shape))
            }
            HostType::Wildcard { upper, lower } => Ok(self.register_handle(
                handle,
                TypeShape::Wildcard(WildcardShape::new(
                    upper.as_slice().into(),
                    lower.as_slice().into(),
                )),
            )),
            HostType::Void => {
                let id = self.reflect_class(self.provider.void_class())?;
                Ok(self.publish_handle(handle, id))
            }
            HostType::Parameterized {
                raw,
                arguments,
                owner,
            } => {
                let class = self.reflect_class(*raw)?;
                let arguments = arguments
                    .iter()
                    .map(|argument| self.reflect(argument))
                    .collect::<MirrorResult<Vec<_>>>()?;
                let mut id = self.with_type_arguments(class, &arguments)?;
                if let Some(owner) = owner {
                    let outer = self.reflect(owner)?;
                    id = self.with_enclosing_class(id, Some(outer))?;
                }
                Ok(self.publish_handle(handle, id))
            }
            HostType::GenericArray(component) => {
                let component = self.reflect(component)?;
                let array = self.array_type_for(component)?;
                let id = self.specialize(
                    array,
                    TypeSpecialization::Array(ArraySpecialization {
                        annotations: no_annotations(),
                        component: Some(component),
                    }),
                )?;
                Ok(self.publish_handle(handle, id))
            }
            HostType::Foreign { kind } => Err(MirrorError::UnrecognizedTypeKind {
                kind: self.interner().resolve(*kind).to_string(),
            }),
        }
    }

    /// Allocate inside the vacant entry so the handle is visible before any
    /// of the descriptor's properties are computed.
    fn register_handle(&self, handle: &HostType, shape: TypeShape) -> TypeId {
        match self.handles.entry(handle.clone()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = self.allocate_type(None, None, shape);
                entry.insert(id);
                id
            }
        }
    }

    fn publish_handle(&self, handle: &HostType, id: TypeId) -> TypeId {
        *self.handles.entry(handle.clone()).or_insert(id)
    }

    /// Raw array descriptor whose component class is the erasure of `component`.
    pub(crate) fn array_type_for(&self, component: TypeId) -> MirrorResult<TypeId> {
        let erasure = self.erasure(component)?;
        let array_class = self.provider.array_class_of(erasure).ok_or_else(|| {
            MirrorError::missing(format!("array class of {}", self.display(component)))
        })?;
        self.reflect_class(array_class)
    }

    /// The descriptor for an annotated handle: the bare handle, with each
    /// annotated child specialized in, then this node's annotations applied.
    pub fn reflect_annotated(&self, handle: &AnnotatedType) -> MirrorResult<TypeId> {
        if handle.is_plain() {
            return self.reflect(&handle.ty);
        }
        if let Some(id) = self.annotated.get(handle) {
            return Ok(*id);
        }

        let base = match (&handle.ty, &handle.children) {
            (_, AnnotatedChildren::None) => self.reflect(&handle.ty)?,
            (
                HostType::Parameterized { raw, owner, .. },
                AnnotatedChildren::Arguments {
                    arguments,
                    owner: annotated_owner,
                },
            ) => {
                let class = self.reflect_class(*raw)?;
                let arguments = arguments
                    .iter()
                    .map(|argument| self.reflect_annotated(argument))
                    .collect::<MirrorResult<Vec<_>>>()?;
                let mut id = self.with_type_arguments(class, &arguments)?;
                let outer = match (annotated_owner, owner) {
                    (Some(annotated_owner), _) => Some(self.reflect_annotated(annotated_owner)?),
                    (None, Some(owner)) => Some(self.reflect(owner)?),
                    (None, None) => None,
                };
                if outer.is_some() {
                    id = self.with_enclosing_class(id, outer)?;
                }
                id
            }
            (
                HostType::GenericArray(_) | HostType::Class(_),
                AnnotatedChildren::Component(component),
            ) => {
                let component = self.reflect_annotated(component)?;
                let array = match &handle.ty {
                    HostType::GenericArray(_) => self.array_type_for(component)?,
                    _ => self.reflect(&handle.ty)?,
                };
                self.expect_kind(array, TypeKind::Array)?;
                self.specialize(
                    array,
                    TypeSpecialization::Array(ArraySpecialization {
                        annotations: no_annotations(),
                        component: Some(component),
                    }),
                )?
            }
            (HostType::Wildcard { .. }, AnnotatedChildren::Bounds { upper, lower }) => {
                let wildcard = self.reflect(&handle.ty)?;
                let upper = self.reflect_annotated_list(upper)?;
                let lower = self.reflect_annotated_list(lower)?;
                self.specialize(
                    wildcard,
                    TypeSpecialization::Wildcard(WildcardSpecialization {
                        annotations: no_annotations(),
                        upper_bounds: Some(upper),
                        lower_bounds: Some(lower),
                    }),
                )?
            }
            (ty, _) => {
                return Err(MirrorError::invalid(format!(
                    "annotated children do not match the shape of {ty:?}"
                )));
            }
        };

        let id = if handle.annotations.is_empty() {
            base
        } else {
            self.with_type_annotations(base, handle.annotations.clone())?
        };
        Ok(*self.annotated.entry(handle.clone()).or_insert(id))
    }

    pub(crate) fn reflect_annotated_list(
        &self,
        handles: &[AnnotatedType],
    ) -> MirrorResult<TypeList> {
        handles
            .iter()
            .map(|handle| self.reflect_annotated(handle))
            .collect()
    }

    // =========================================================================
    // Specialization
    // =========================================================================

    /// Canonical descriptor for `raw` with `record` applied.
    ///
    /// Normalizes the record against `raw` and returns `raw` itself when
    /// nothing is left to specialize. Performs no validation.
    pub(crate) fn specialize(
        &self,
        raw: TypeId,
        record: TypeSpecialization,
    ) -> MirrorResult<TypeId> {
        let raw_data = self.data(raw)?;
        debug_assert!(raw_data.is_raw(), "specialize() expects a raw descriptor");
        let defaults = self.raw_defaults(&raw_data)?;
        let record = record.normalize(&defaults);
        if record.is_degenerate() {
            return Ok(raw);
        }

        let key = (raw, record);
        if let Some(id) = self.specialized.get(&key) {
            return Ok(*id);
        }
        let shape = raw_data.shape.fresh();
        let id = match self.specialized.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let record = entry.key().1.clone();
                let id = self.allocate_type(Some(raw), Some(record), shape);
                entry.insert(id);
                id
            }
        };
        if query_trace::enabled() {
            query_trace::specialize(raw, id);
        }
        Ok(id)
    }

    fn raw_defaults(&self, raw: &TypeData) -> MirrorResult<RawDefaults> {
        Ok(match &raw.shape {
            TypeShape::Class(_) => RawDefaults::Class {
                type_parameters: self.type_parameters(raw.id)?,
                enclosing_class: self.enclosing_class(raw.id)?,
                enclosing_executable: self.enclosing_executable(raw.id)?,
            },
            TypeShape::Array(_) => RawDefaults::Array {
                component: self.component(raw.id)?,
            },
            TypeShape::Wildcard(_) => RawDefaults::Wildcard {
                upper_bounds: self.upper_bounds(raw.id)?,
                lower_bounds: self.lower_bounds(raw.id)?,
            },
            TypeShape::Variable(_) | TypeShape::Void(_) => RawDefaults::None,
        })
    }

    // =========================================================================
    // Properties shared by every descriptor kind
    // =========================================================================

    pub fn kind(&self, id: TypeId) -> MirrorResult<TypeKind> {
        Ok(self.data(id)?.kind())
    }

    pub fn raw(&self, id: TypeId) -> MirrorResult<TypeId> {
        Ok(self.data(id)?.raw)
    }

    pub fn is_raw(&self, id: TypeId) -> MirrorResult<bool> {
        Ok(self.data(id)?.is_raw())
    }

    pub fn specialization(&self, id: TypeId) -> MirrorResult<Option<TypeSpecialization>> {
        Ok(self.data(id)?.specialization.clone())
    }

    pub fn type_annotations(&self, id: TypeId) -> MirrorResult<Annotations> {
        Ok(self
            .data(id)?
            .specialization
            .as_ref()
            .map(|spec| spec.annotations().clone())
            .unwrap_or_else(no_annotations))
    }

    /// Same descriptor with its use-site annotations replaced.
    pub fn with_type_annotations(
        &self,
        id: TypeId,
        annotations: Vec<Annotation>,
    ) -> MirrorResult<TypeId> {
        let data = self.data(id)?;
        let annotations: Annotations = annotations.into();
        let record = match (&data.shape, data.specialization.clone()) {
            (TypeShape::Class(_), Some(TypeSpecialization::Class(spec))) => {
                TypeSpecialization::Class(ClassSpecialization { annotations, ..spec })
            }
            (TypeShape::Class(_), _) => TypeSpecialization::Class(ClassSpecialization {
                annotations,
                ..ClassSpecialization::default()
            }),
            (TypeShape::Array(_), Some(TypeSpecialization::Array(spec))) => {
                TypeSpecialization::Array(ArraySpecialization { annotations, ..spec })
            }
            (TypeShape::Array(_), _) => TypeSpecialization::Array(ArraySpecialization {
                annotations,
                ..ArraySpecialization::default()
            }),
            (TypeShape::Wildcard(_), Some(TypeSpecialization::Wildcard(spec))) => {
                TypeSpecialization::Wildcard(WildcardSpecialization { annotations, ..spec })
            }
            (TypeShape::Wildcard(_), _) => TypeSpecialization::Wildcard(WildcardSpecialization {
                annotations,
                ..WildcardSpecialization::default()
            }),
            (TypeShape::Variable(_) | TypeShape::Void(_), _) => {
                TypeSpecialization::Common { annotations }
            }
        };
        self.specialize(data.raw, record)
    }

    /// The class this descriptor erases to.
    ///
    /// Variables and wildcards erase through their first (upper) bound and
    /// fall back to the root class.
    pub fn erasure(&self, id: TypeId) -> MirrorResult<ClassId> {
        let mut current = id;
        // Legal declarations never chain variable bounds this far.
        for _ in 0..64 {
            let data = self.data(current)?;
            let next = match &data.shape {
                TypeShape::Class(shape) => return Ok(shape.class),
                TypeShape::Array(shape) => return Ok(shape.class),
                TypeShape::Void(class) => return Ok(*class),
                TypeShape::Variable(_) => self.bounds(current)?.first().copied(),
                TypeShape::Wildcard(_) => self.upper_bounds(current)?.first().copied(),
            };
            match next {
                Some(next) => current = next,
                None => break,
            }
        }
        Ok(self.provider.object_class())
    }

    /// [`erasure`](Self::erasure) as a raw descriptor.
    pub fn erased_type(&self, id: TypeId) -> MirrorResult<TypeId> {
        let erasure = self.erasure(id)?;
        self.reflect_class(erasure)
    }

    pub(crate) fn expect_kind(
        &self,
        id: TypeId,
        expected: TypeKind,
    ) -> MirrorResult<Arc<TypeData>> {
        let data = self.data(id)?;
        if data.kind() != expected {
            return Err(MirrorError::WrongKind {
                expected: expected.name(),
                found: self.display(id),
            });
        }
        Ok(data)
    }

    /// True for descriptors of the universal top class.
    pub fn is_top(&self, id: TypeId) -> MirrorResult<bool> {
        Ok(match &self.data(id)?.shape {
            TypeShape::Class(shape) => shape.class == self.provider.object_class(),
            _ => false,
        })
    }

    pub fn is_primitive(&self, id: TypeId) -> MirrorResult<bool> {
        Ok(match &self.data(id)?.shape {
            TypeShape::Class(shape) => shape.info.is_primitive(),
            _ => false,
        })
    }

    // =========================================================================
    // Executable and field tables
    // =========================================================================

    /// The raw mirror of a method or constructor declaration.
    pub fn reflect_executable(&self, method: MethodId) -> MirrorResult<ExecutableId> {
        if let Some(id) = self.raw_executables.get(&method) {
            return Ok(*id);
        }
        let info = self.method_info(method)?;
        let id = match self.raw_executables.entry(method) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = ExecutableId(self.next_executable.fetch_add(1, Ordering::SeqCst));
                trace!(
                    instance_id = self.instance_id,
                    executable_id = id.0,
                    method_id = method.0,
                    "MirrorCache::reflect_executable"
                );
                self.executables
                    .insert(id, Arc::new(ExecutableData::new(id, id, method, info, None)));
                entry.insert(id);
                id
            }
        };
        Ok(id)
    }

    pub(crate) fn specialize_executable(
        &self,
        raw: ExecutableId,
        record: ExecutableSpecialization,
    ) -> MirrorResult<ExecutableId> {
        let raw_data = self.executable_data(raw)?;
        let raw_declaring = self.declaring_class(raw)?;
        let raw_parameters = self.executable_type_parameters(raw)?;
        let record = record.normalize(raw_declaring, &raw_parameters);
        if record.is_degenerate() {
            return Ok(raw);
        }
        let key = (raw, record);
        if let Some(id) = self.specialized_executables.get(&key) {
            return Ok(*id);
        }
        let id = match self.specialized_executables.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = ExecutableId(self.next_executable.fetch_add(1, Ordering::SeqCst));
                let data = ExecutableData::new(
                    id,
                    raw,
                    raw_data.method,
                    raw_data.info.clone(),
                    Some(entry.key().1.clone()),
                );
                self.executables.insert(id, Arc::new(data));
                entry.insert(id);
                id
            }
        };
        Ok(id)
    }

    /// The raw mirror of a field declaration.
    pub fn reflect_field(&self, field: FieldId) -> MirrorResult<FieldMirrorId> {
        if let Some(id) = self.raw_fields.get(&field) {
            return Ok(*id);
        }
        let info = self.field_info(field)?;
        let id = match self.raw_fields.entry(field) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = FieldMirrorId(self.next_field.fetch_add(1, Ordering::SeqCst));
                self.fields
                    .insert(id, Arc::new(FieldData::new(id, field, info, None)));
                entry.insert(id);
                id
            }
        };
        Ok(id)
    }

    pub(crate) fn specialize_field(
        &self,
        raw: FieldMirrorId,
        declaring_class: TypeId,
    ) -> MirrorResult<FieldMirrorId> {
        let raw_data = self.field_data(raw)?;
        if self.field_declaring_class(raw)? == declaring_class {
            return Ok(raw);
        }
        let key = (raw, declaring_class);
        if let Some(id) = self.specialized_fields.get(&key) {
            return Ok(*id);
        }
        let id = match self.specialized_fields.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = FieldMirrorId(self.next_field.fetch_add(1, Ordering::SeqCst));
                let data = FieldData::new(
                    raw,
                    raw_data.field,
                    raw_data.info.clone(),
                    Some(declaring_class),
                );
                self.fields.insert(id, Arc::new(data));
                entry.insert(id);
                id
            }
        };
        Ok(id)
    }
}

impl std::fmt::Debug for MirrorCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MirrorCache")
            .field("instance_id", &self.instance_id)
            .field("types", &self.types.len())
            .field("executables", &self.executables.len())
            .field("fields", &self.fields.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/cache_tests.rs"]
mod tests;
