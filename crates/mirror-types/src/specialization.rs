//! Specialization records.
//!
//! A record is the structural diff between a raw descriptor and one of its
//! specializations. Records are plain values with structural `Hash`/`Eq`;
//! together with the raw id they key the specialization table. Before a
//! lookup every field that repeats the raw descriptor's own value is
//! normalized to `None`, so that two requests describing the same type share
//! one key.

use crate::handle::Annotation;
use crate::types::{ExecutableId, TypeId};
use std::sync::Arc;

pub type TypeList = Arc<[TypeId]>;
pub type Annotations = Arc<[Annotation]>;

pub(crate) fn empty_types() -> TypeList {
    Arc::from(Vec::new())
}

pub(crate) fn no_annotations() -> Annotations {
    Arc::from(Vec::new())
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeSpecialization {
    /// Type variables and void: annotations only.
    Common { annotations: Annotations },
    Class(ClassSpecialization),
    Array(ArraySpecialization),
    Wildcard(WildcardSpecialization),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassSpecialization {
    pub annotations: Annotations,
    /// `None` keeps the raw type parameters.
    pub arguments: Option<TypeList>,
    pub enclosing_class: Option<TypeId>,
    pub enclosing_executable: Option<ExecutableId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArraySpecialization {
    pub annotations: Annotations,
    pub component: Option<TypeId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WildcardSpecialization {
    pub annotations: Annotations,
    pub upper_bounds: Option<TypeList>,
    pub lower_bounds: Option<TypeList>,
}

impl Default for ClassSpecialization {
    fn default() -> Self {
        ClassSpecialization {
            annotations: no_annotations(),
            arguments: None,
            enclosing_class: None,
            enclosing_executable: None,
        }
    }
}

impl Default for ArraySpecialization {
    fn default() -> Self {
        ArraySpecialization {
            annotations: no_annotations(),
            component: None,
        }
    }
}

impl Default for WildcardSpecialization {
    fn default() -> Self {
        WildcardSpecialization {
            annotations: no_annotations(),
            upper_bounds: None,
            lower_bounds: None,
        }
    }
}

/// The values a raw descriptor supplies when a record leaves a field unset.
/// Used only for normalization.
pub(crate) enum RawDefaults {
    None,
    Class {
        type_parameters: TypeList,
        enclosing_class: Option<TypeId>,
        enclosing_executable: Option<ExecutableId>,
    },
    Array {
        component: TypeId,
    },
    Wildcard {
        upper_bounds: TypeList,
        lower_bounds: TypeList,
    },
}

impl TypeSpecialization {
    pub fn annotations(&self) -> &Annotations {
        match self {
            TypeSpecialization::Common { annotations } => annotations,
            TypeSpecialization::Class(spec) => &spec.annotations,
            TypeSpecialization::Array(spec) => &spec.annotations,
            TypeSpecialization::Wildcard(spec) => &spec.annotations,
        }
    }

    /// Drop fields that repeat the raw descriptor's values.
    pub(crate) fn normalize(self, raw: &RawDefaults) -> Self {
        match (self, raw) {
            (
                TypeSpecialization::Class(mut spec),
                RawDefaults::Class {
                    type_parameters,
                    enclosing_class,
                    enclosing_executable,
                },
            ) => {
                if spec
                    .arguments
                    .as_ref()
                    .is_some_and(|args| args.is_empty() || args == type_parameters)
                {
                    spec.arguments = None;
                }
                if spec.enclosing_class.is_some() && spec.enclosing_class == *enclosing_class {
                    spec.enclosing_class = None;
                }
                if spec.enclosing_executable.is_some()
                    && spec.enclosing_executable == *enclosing_executable
                {
                    spec.enclosing_executable = None;
                }
                TypeSpecialization::Class(spec)
            }
            (TypeSpecialization::Array(mut spec), RawDefaults::Array { component }) => {
                if spec.component == Some(*component) {
                    spec.component = None;
                }
                TypeSpecialization::Array(spec)
            }
            (
                TypeSpecialization::Wildcard(mut spec),
                RawDefaults::Wildcard {
                    upper_bounds,
                    lower_bounds,
                },
            ) => {
                if spec.upper_bounds.as_ref() == Some(upper_bounds) {
                    spec.upper_bounds = None;
                }
                if spec.lower_bounds.as_ref() == Some(lower_bounds) {
                    spec.lower_bounds = None;
                }
                TypeSpecialization::Wildcard(spec)
            }
            (other, _) => other,
        }
    }

    /// True when applying the record would reproduce the raw descriptor.
    pub(crate) fn is_degenerate(&self) -> bool {
        if !self.annotations().is_empty() {
            return false;
        }
        match self {
            TypeSpecialization::Common { .. } => true,
            TypeSpecialization::Class(spec) => {
                spec.arguments.is_none()
                    && spec.enclosing_class.is_none()
                    && spec.enclosing_executable.is_none()
            }
            TypeSpecialization::Array(spec) => spec.component.is_none(),
            TypeSpecialization::Wildcard(spec) => {
                spec.upper_bounds.is_none() && spec.lower_bounds.is_none()
            }
        }
    }
}

/// Diff between a raw executable and one of its specializations.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct ExecutableSpecialization {
    pub declaring_class: Option<TypeId>,
    pub arguments: Option<TypeList>,
}

impl ExecutableSpecialization {
    pub(crate) fn normalize(mut self, raw_declaring: TypeId, raw_parameters: &TypeList) -> Self {
        if self.declaring_class == Some(raw_declaring) {
            self.declaring_class = None;
        }
        if self
            .arguments
            .as_ref()
            .is_some_and(|args| args.is_empty() || args == raw_parameters)
        {
            self.arguments = None;
        }
        self
    }

    pub(crate) fn is_degenerate(&self) -> bool {
        self.declaring_class.is_none() && self.arguments.is_none()
    }
}

#[cfg(test)]
#[path = "../tests/specialization_tests.rs"]
mod tests;
