//! Descriptor identifiers and per-descriptor storage.
//!
//! A descriptor is addressed by a [`TypeId`] handed out by one
//! [`MirrorCache`](crate::MirrorCache). Equal ids mean the same descriptor;
//! the cache guarantees that structurally equal requests produce equal ids.
//!
//! Each descriptor's lazily computed properties live in single-assignment
//! cells on its [`TypeData`]. [`memo`] computes a value without holding the
//! cell and publishes the first result, so a computation that re-enters the
//! cache for the same descriptor never blocks on itself.

use crate::error::MirrorResult;
use crate::handle::{ClassId, FieldId, HostType, MethodId, TypeVarId};
use crate::mapping::TypeMapping;
use crate::metadata::{ClassInfo, FieldInfo, MethodInfo, TypeVarInfo};
use crate::specialization::{ExecutableSpecialization, TypeList, TypeSpecialization};
use std::sync::{Arc, OnceLock};

/// A type descriptor within one cache.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

/// A method or constructor mirror within one cache.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExecutableId(pub u32);

/// A field mirror within one cache.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldMirrorId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Array,
    Variable,
    Wildcard,
    Void,
}

impl TypeKind {
    pub fn name(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Array => "array",
            TypeKind::Variable => "type variable",
            TypeKind::Wildcard => "wildcard",
            TypeKind::Void => "void",
        }
    }
}

/// Memoize `compute` into `cell`. Errors are returned, never stored.
pub(crate) fn memo<T: Clone>(
    cell: &OnceLock<T>,
    compute: impl FnOnce() -> MirrorResult<T>,
) -> MirrorResult<T> {
    if let Some(value) = cell.get() {
        return Ok(value.clone());
    }
    let value = compute()?;
    Ok(cell.get_or_init(|| value).clone())
}

pub(crate) struct TypeData {
    pub(crate) id: TypeId,
    /// Equals `id` for raw descriptors.
    pub(crate) raw: TypeId,
    pub(crate) specialization: Option<TypeSpecialization>,
    pub(crate) shape: TypeShape,
}

impl TypeData {
    #[inline]
    pub(crate) fn is_raw(&self) -> bool {
        self.id == self.raw
    }

    pub(crate) fn kind(&self) -> TypeKind {
        match self.shape {
            TypeShape::Class(_) => TypeKind::Class,
            TypeShape::Array(_) => TypeKind::Array,
            TypeShape::Variable(_) => TypeKind::Variable,
            TypeShape::Wildcard(_) => TypeKind::Wildcard,
            TypeShape::Void(_) => TypeKind::Void,
        }
    }
}

pub(crate) enum TypeShape {
    Class(ClassShape),
    Array(ArrayShape),
    Variable(VariableShape),
    Wildcard(WildcardShape),
    Void(ClassId),
}

impl TypeShape {
    /// Same declaration, all lazy cells empty.
    pub(crate) fn fresh(&self) -> TypeShape {
        match self {
            TypeShape::Class(shape) => {
                TypeShape::Class(ClassShape::new(shape.class, shape.info.clone()))
            }
            TypeShape::Array(shape) => {
                TypeShape::Array(ArrayShape::new(shape.class, shape.component_class))
            }
            TypeShape::Variable(shape) => {
                TypeShape::Variable(VariableShape::new(shape.var, shape.info.clone()))
            }
            TypeShape::Wildcard(shape) => TypeShape::Wildcard(WildcardShape::new(
                shape.upper_handles.clone(),
                shape.lower_handles.clone(),
            )),
            TypeShape::Void(class) => TypeShape::Void(*class),
        }
    }
}

pub(crate) struct ClassShape {
    pub(crate) class: ClassId,
    pub(crate) info: Arc<ClassInfo>,
    pub(crate) type_parameters: OnceLock<TypeList>,
    pub(crate) superclass: OnceLock<Option<TypeId>>,
    pub(crate) interfaces: OnceLock<TypeList>,
    pub(crate) enclosing_class: OnceLock<Option<TypeId>>,
    pub(crate) enclosing_executable: OnceLock<Option<ExecutableId>>,
    pub(crate) generic_mapping: OnceLock<Arc<TypeMapping>>,
    pub(crate) members: ClassMembers,
}

/// Member views of a class, each computed on first access.
#[derive(Default)]
pub(crate) struct ClassMembers {
    pub(crate) declared_fields: OnceLock<Arc<[FieldMirrorId]>>,
    pub(crate) declared_methods: OnceLock<Arc<[ExecutableId]>>,
    pub(crate) declared_constructors: OnceLock<Arc<[ExecutableId]>>,
    pub(crate) declared_member_classes: OnceLock<TypeList>,
    pub(crate) inherited_methods: OnceLock<Arc<[ExecutableId]>>,
    pub(crate) visible_methods: OnceLock<Arc<[ExecutableId]>>,
    pub(crate) methods: OnceLock<Arc<[ExecutableId]>>,
    pub(crate) fields: OnceLock<Arc<[FieldMirrorId]>>,
    pub(crate) member_classes: OnceLock<TypeList>,
}

impl ClassShape {
    pub(crate) fn new(class: ClassId, info: Arc<ClassInfo>) -> Self {
        ClassShape {
            class,
            info,
            type_parameters: OnceLock::new(),
            superclass: OnceLock::new(),
            interfaces: OnceLock::new(),
            enclosing_class: OnceLock::new(),
            enclosing_executable: OnceLock::new(),
            generic_mapping: OnceLock::new(),
            members: ClassMembers::default(),
        }
    }
}

pub(crate) struct ArrayShape {
    /// The array class itself.
    pub(crate) class: ClassId,
    pub(crate) component_class: ClassId,
    pub(crate) component: OnceLock<TypeId>,
}

impl ArrayShape {
    pub(crate) fn new(class: ClassId, component_class: ClassId) -> Self {
        ArrayShape {
            class,
            component_class,
            component: OnceLock::new(),
        }
    }
}

pub(crate) struct VariableShape {
    pub(crate) var: TypeVarId,
    pub(crate) info: Arc<TypeVarInfo>,
    pub(crate) bounds: OnceLock<TypeList>,
}

impl VariableShape {
    pub(crate) fn new(var: TypeVarId, info: Arc<TypeVarInfo>) -> Self {
        VariableShape {
            var,
            info,
            bounds: OnceLock::new(),
        }
    }
}

pub(crate) struct WildcardShape {
    pub(crate) upper_handles: Arc<[HostType]>,
    pub(crate) lower_handles: Arc<[HostType]>,
    pub(crate) upper_bounds: OnceLock<TypeList>,
    pub(crate) lower_bounds: OnceLock<TypeList>,
}

impl WildcardShape {
    pub(crate) fn new(upper_handles: Arc<[HostType]>, lower_handles: Arc<[HostType]>) -> Self {
        WildcardShape {
            upper_handles,
            lower_handles,
            upper_bounds: OnceLock::new(),
            lower_bounds: OnceLock::new(),
        }
    }
}

pub(crate) struct ExecutableData {
    pub(crate) id: ExecutableId,
    pub(crate) raw: ExecutableId,
    pub(crate) method: MethodId,
    pub(crate) info: Arc<MethodInfo>,
    pub(crate) specialization: Option<ExecutableSpecialization>,
    pub(crate) declaring_class: OnceLock<TypeId>,
    pub(crate) type_parameters: OnceLock<TypeList>,
    pub(crate) generic_mapping: OnceLock<Arc<TypeMapping>>,
    pub(crate) return_type: OnceLock<TypeId>,
    pub(crate) parameter_types: OnceLock<TypeList>,
    pub(crate) exception_types: OnceLock<TypeList>,
}

impl ExecutableData {
    pub(crate) fn new(
        id: ExecutableId,
        raw: ExecutableId,
        method: MethodId,
        info: Arc<MethodInfo>,
        specialization: Option<ExecutableSpecialization>,
    ) -> Self {
        ExecutableData {
            id,
            raw,
            method,
            info,
            specialization,
            declaring_class: OnceLock::new(),
            type_parameters: OnceLock::new(),
            generic_mapping: OnceLock::new(),
            return_type: OnceLock::new(),
            parameter_types: OnceLock::new(),
            exception_types: OnceLock::new(),
        }
    }
}

pub(crate) struct FieldData {
    pub(crate) raw: FieldMirrorId,
    pub(crate) field: FieldId,
    pub(crate) info: Arc<FieldInfo>,
    /// `None` for the raw mirror.
    pub(crate) declaring_override: Option<TypeId>,
    pub(crate) declaring_class: OnceLock<TypeId>,
    pub(crate) ty: OnceLock<TypeId>,
}

impl FieldData {
    pub(crate) fn new(
        raw: FieldMirrorId,
        field: FieldId,
        info: Arc<FieldInfo>,
        declaring_override: Option<TypeId>,
    ) -> Self {
        FieldData {
            raw,
            field,
            info,
            declaring_override,
            declaring_class: OnceLock::new(),
            ty: OnceLock::new(),
        }
    }
}
