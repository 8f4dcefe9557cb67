//! Host-side type handles.
//!
//! These are the shapes a [`DeclarationProvider`](crate::metadata::DeclarationProvider)
//! hands to the engine: plain class references, parameterized uses, generic
//! arrays, type variables, wildcards and the void sentinel. An
//! [`AnnotatedType`] wraps a handle together with the type-use annotations
//! attached to each node of its tree.

use mirror_common::Atom;

/// Host class declaration (ordinary classes, interfaces, array classes,
/// primitive classes and the void class).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

/// Host type-variable declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVarId(pub u32);

/// Host method or constructor declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(pub u32);

/// Host field declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u32);

/// A type as reported by the host, before it is mirrored.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    /// A class used without type arguments. Array, primitive and void
    /// classes are reported this way too.
    Class(ClassId),
    /// `raw<arguments>`, optionally qualified by an owner (`Outer<A>.Inner<B>`).
    Parameterized {
        raw: ClassId,
        arguments: Vec<HostType>,
        owner: Option<Box<HostType>>,
    },
    /// `component[]` where the component is generic.
    GenericArray(Box<HostType>),
    /// A use of a declared type variable.
    Variable(TypeVarId),
    /// `?`, `? extends X` or `? super X`.
    Wildcard {
        upper: Vec<HostType>,
        lower: Vec<HostType>,
    },
    /// The "no type" sentinel.
    Void,
    /// A kind the host knows about but which has no mirror representation.
    Foreign { kind: Atom },
}

impl HostType {
    pub fn parameterized(raw: ClassId, arguments: Vec<HostType>) -> Self {
        HostType::Parameterized {
            raw,
            arguments,
            owner: None,
        }
    }

    pub fn nested(owner: HostType, raw: ClassId, arguments: Vec<HostType>) -> Self {
        HostType::Parameterized {
            raw,
            arguments,
            owner: Some(Box::new(owner)),
        }
    }

    pub fn generic_array(component: HostType) -> Self {
        HostType::GenericArray(Box::new(component))
    }

    /// `? extends bound`.
    pub fn extends(bound: HostType) -> Self {
        HostType::Wildcard {
            upper: vec![bound],
            lower: Vec::new(),
        }
    }

    /// `? super bound`; `top` is the implicit upper bound.
    pub fn super_of(top: ClassId, bound: HostType) -> Self {
        HostType::Wildcard {
            upper: vec![HostType::Class(top)],
            lower: vec![bound],
        }
    }

    /// `?`; `top` is the implicit upper bound.
    pub fn unbounded(top: ClassId) -> Self {
        HostType::Wildcard {
            upper: vec![HostType::Class(top)],
            lower: Vec::new(),
        }
    }
}

impl From<ClassId> for HostType {
    fn from(id: ClassId) -> Self {
        HostType::Class(id)
    }
}

impl From<TypeVarId> for HostType {
    fn from(id: TypeVarId) -> Self {
        HostType::Variable(id)
    }
}

// =============================================================================
// Annotations
// =============================================================================

/// A type-use annotation instance.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Annotation {
    /// The annotation interface.
    pub class: ClassId,
    /// Element values in declaration order.
    pub elements: Vec<(Atom, AnnotationValue)>,
}

impl Annotation {
    /// A marker annotation (no elements).
    pub fn marker(class: ClassId) -> Self {
        Annotation {
            class,
            elements: Vec::new(),
        }
    }

    pub fn with_element(mut self, name: Atom, value: AnnotationValue) -> Self {
        self.elements.push((name, value));
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnnotationValue {
    Bool(bool),
    Int(i64),
    Str(Atom),
    Class(ClassId),
    Enum { class: ClassId, constant: Atom },
    Array(Vec<AnnotationValue>),
}

/// A host type together with the annotations attached to each node.
///
/// `children` mirrors the structure of `ty`: parameterized types carry their
/// arguments (and owner), arrays their component, wildcards their bounds.
/// When `children` is [`AnnotatedChildren::None`] the nested nodes carry no
/// annotations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnnotatedType {
    pub ty: HostType,
    pub annotations: Vec<Annotation>,
    pub children: AnnotatedChildren,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum AnnotatedChildren {
    #[default]
    None,
    Arguments {
        arguments: Vec<AnnotatedType>,
        owner: Option<Box<AnnotatedType>>,
    },
    Component(Box<AnnotatedType>),
    Bounds {
        upper: Vec<AnnotatedType>,
        lower: Vec<AnnotatedType>,
    },
}

impl AnnotatedType {
    /// A handle with no annotations anywhere in its tree.
    pub fn plain(ty: HostType) -> Self {
        AnnotatedType {
            ty,
            annotations: Vec::new(),
            children: AnnotatedChildren::None,
        }
    }

    pub fn annotated(ty: HostType, annotations: Vec<Annotation>) -> Self {
        AnnotatedType {
            ty,
            annotations,
            children: AnnotatedChildren::None,
        }
    }

    /// Annotated type arguments for a parameterized handle.
    pub fn with_arguments(mut self, arguments: Vec<AnnotatedType>) -> Self {
        self.children = AnnotatedChildren::Arguments {
            arguments,
            owner: None,
        };
        self
    }

    pub fn with_component(mut self, component: AnnotatedType) -> Self {
        self.children = AnnotatedChildren::Component(Box::new(component));
        self
    }

    pub fn with_bounds(mut self, upper: Vec<AnnotatedType>, lower: Vec<AnnotatedType>) -> Self {
        self.children = AnnotatedChildren::Bounds { upper, lower };
        self
    }

    /// True when neither this node nor any child carries an annotation.
    pub fn is_plain(&self) -> bool {
        self.annotations.is_empty()
            && match &self.children {
                AnnotatedChildren::None => true,
                AnnotatedChildren::Arguments { arguments, owner } => {
                    arguments.iter().all(AnnotatedType::is_plain)
                        && owner.as_deref().is_none_or(AnnotatedType::is_plain)
                }
                AnnotatedChildren::Component(component) => component.is_plain(),
                AnnotatedChildren::Bounds { upper, lower } => {
                    upper.iter().chain(lower).all(AnnotatedType::is_plain)
                }
            }
    }
}

impl From<HostType> for AnnotatedType {
    fn from(ty: HostType) -> Self {
        AnnotatedType::plain(ty)
    }
}

impl From<ClassId> for AnnotatedType {
    fn from(id: ClassId) -> Self {
        AnnotatedType::plain(HostType::Class(id))
    }
}

impl From<TypeVarId> for AnnotatedType {
    fn from(id: TypeVarId) -> Self {
        AnnotatedType::plain(HostType::Variable(id))
    }
}
