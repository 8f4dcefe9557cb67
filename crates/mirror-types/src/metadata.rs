//! Declaration metadata consumed by the engine.
//!
//! The engine never inspects a host runtime directly. Everything it knows
//! about classes, type variables and members comes through
//! [`DeclarationProvider`], which returns immutable snapshots of the
//! declarations. [`DeclarationStore`](crate::store::DeclarationStore) is the
//! in-memory implementation.

use crate::handle::{AnnotatedType, Annotation, ClassId, FieldId, MethodId, TypeVarId};
use bitflags::bitflags;
use mirror_common::{Atom, ShardedInterner};
use std::sync::Arc;

bitflags! {
    /// Declaration modifiers as reported by the host.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u16 {
        const PUBLIC    = 1 << 0;
        const PRIVATE   = 1 << 1;
        const PROTECTED = 1 << 2;
        const STATIC    = 1 << 3;
        const FINAL     = 1 << 4;
        const ABSTRACT  = 1 << 5;
        /// Interface method with a body.
        const DEFAULT   = 1 << 6;
        const SYNTHETIC = 1 << 7;
        const VARARGS   = 1 << 8;
    }
}

/// Access level derived from [`Modifiers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Public,
    Protected,
    /// Default (package-private) access.
    Package,
    Private,
}

impl Modifiers {
    pub fn access(self) -> Access {
        if self.contains(Modifiers::PUBLIC) {
            Access::Public
        } else if self.contains(Modifiers::PROTECTED) {
            Access::Protected
        } else if self.contains(Modifiers::PRIVATE) {
            Access::Private
        } else {
            Access::Package
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Annotation,
    Enum,
    Primitive,
    /// The class of the "no type" sentinel.
    Void,
    /// An array class; `component` is the element class.
    Array { component: ClassId },
}

/// Snapshot of a class declaration.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    /// Binary name, e.g. `java.util.Map$Entry`.
    pub name: Atom,
    pub simple_name: Atom,
    pub package: Atom,
    pub kind: ClassKind,
    pub modifiers: Modifiers,
    pub type_parameters: Vec<TypeVarId>,
    /// Generic superclass; `None` for interfaces, primitives and the root.
    pub superclass: Option<AnnotatedType>,
    /// Generic interfaces in declaration order.
    pub interfaces: Vec<AnnotatedType>,
    pub enclosing_class: Option<ClassId>,
    /// Set for local and anonymous classes declared inside a method body.
    pub enclosing_executable: Option<MethodId>,
    pub fields: Vec<FieldId>,
    pub methods: Vec<MethodId>,
    pub constructors: Vec<MethodId>,
    pub member_classes: Vec<ClassId>,
}

impl ClassInfo {
    pub fn new(name: Atom, simple_name: Atom, package: Atom, kind: ClassKind) -> Self {
        ClassInfo {
            name,
            simple_name,
            package,
            kind,
            modifiers: Modifiers::PUBLIC,
            type_parameters: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            enclosing_class: None,
            enclosing_executable: None,
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            member_classes: Vec::new(),
        }
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }

    #[inline]
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, ClassKind::Interface | ClassKind::Annotation)
    }

    #[inline]
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, ClassKind::Primitive)
    }

    #[inline]
    pub fn array_component(&self) -> Option<ClassId> {
        match self.kind {
            ClassKind::Array { component } => Some(component),
            _ => None,
        }
    }
}

/// The declaration that introduces a type variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericDeclaration {
    Class(ClassId),
    Executable(MethodId),
}

#[derive(Debug, Clone)]
pub struct TypeVarInfo {
    pub name: Atom,
    pub owner: GenericDeclaration,
    /// Declared bounds; an unbounded variable reports the root class.
    pub bounds: Vec<AnnotatedType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutableKind {
    Method,
    Constructor,
}

#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub name: Atom,
    pub declaring_class: ClassId,
    pub kind: ExecutableKind,
    pub modifiers: Modifiers,
    pub type_parameters: Vec<TypeVarId>,
    pub parameters: Vec<AnnotatedType>,
    /// Per-parameter declaration details, by position. May be shorter than
    /// `parameters`; missing entries read as [`ParameterInfo::default`].
    pub parameter_details: Vec<ParameterInfo>,
    /// Constructors report the void type.
    pub return_type: AnnotatedType,
    pub exceptions: Vec<AnnotatedType>,
}

impl MethodInfo {
    #[inline]
    pub fn is_constructor(&self) -> bool {
        self.kind == ExecutableKind::Constructor
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }

    /// Declaration details of the parameter at `index`.
    pub fn parameter_detail(&self, index: usize) -> ParameterInfo {
        self.parameter_details.get(index).cloned().unwrap_or_default()
    }

    /// Abstract or interface-default: methods that inheritance may drop when
    /// another supertype overrides them.
    #[inline]
    pub fn is_overridable_declaration(&self) -> bool {
        self.modifiers
            .intersects(Modifiers::ABSTRACT | Modifiers::DEFAULT)
    }
}

/// Name, modifiers and declaration annotations of one parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterInfo {
    /// `None` when the host did not record parameter names.
    pub name: Option<Atom>,
    /// Only `FINAL` is meaningful.
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub name: Atom,
    pub declaring_class: ClassId,
    pub modifiers: Modifiers,
    pub ty: AnnotatedType,
}

/// Read-only source of declaration metadata.
///
/// Implementations must be cheap to query repeatedly; the engine caches what
/// it derives but asks for the snapshots again when building new descriptors.
/// Returning `None` for an id the provider itself handed out is a contract
/// violation and surfaces as `MirrorError::MissingDeclaration`.
pub trait DeclarationProvider: Send + Sync {
    fn class(&self, id: ClassId) -> Option<Arc<ClassInfo>>;

    fn type_var(&self, id: TypeVarId) -> Option<Arc<TypeVarInfo>>;

    fn method(&self, id: MethodId) -> Option<Arc<MethodInfo>>;

    fn field(&self, id: FieldId) -> Option<Arc<FieldInfo>>;

    /// The universal top class (`java.lang.Object`).
    fn object_class(&self) -> ClassId;

    /// The class standing for "no type" (`void`).
    fn void_class(&self) -> ClassId;

    /// The array class whose component class is `component`.
    fn array_class_of(&self, component: ClassId) -> Option<ClassId>;

    /// Interner used for every [`Atom`] in the snapshots.
    fn interner(&self) -> &ShardedInterner;
}
