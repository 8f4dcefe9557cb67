//! Class-like descriptors: specialization and lazily derived structure.
//!
//! Every derived property of a class (supertypes, enclosing scope, members)
//! is computed through its generic mapping: the raw type parameters zipped
//! with this descriptor's arguments, followed by the enclosing class's
//! mapping and then the enclosing executable's.

use crate::MirrorCache;
use crate::error::{MirrorError, MirrorResult};
use crate::handle::{ClassId, HostType};
use crate::mapping::{ResolutionMode, TypeMapping};
use crate::metadata::ClassInfo;
use crate::specialization::{ClassSpecialization, TypeList, TypeSpecialization, empty_types};
use crate::types::{ClassShape, ExecutableId, TypeData, TypeId, TypeKind, TypeShape, memo};
use std::sync::Arc;

pub(crate) fn class_shape(data: &TypeData) -> Option<&ClassShape> {
    match &data.shape {
        TypeShape::Class(shape) => Some(shape),
        _ => None,
    }
}

fn current_record(data: &TypeData) -> ClassSpecialization {
    match &data.specialization {
        Some(TypeSpecialization::Class(spec)) => spec.clone(),
        _ => ClassSpecialization::default(),
    }
}

impl MirrorCache {
    fn class_data(&self, class: TypeId) -> MirrorResult<Arc<TypeData>> {
        self.expect_kind(class, TypeKind::Class)
    }

    /// The declaration snapshot behind a class descriptor.
    pub fn class_declaration(&self, class: TypeId) -> MirrorResult<Arc<ClassInfo>> {
        let data = self.class_data(class)?;
        match class_shape(&data) {
            Some(shape) => Ok(shape.info.clone()),
            None => Err(MirrorError::WrongKind {
                expected: TypeKind::Class.name(),
                found: self.display(class),
            }),
        }
    }

    /// The host class of a class descriptor.
    pub fn class_id(&self, class: TypeId) -> MirrorResult<ClassId> {
        let data = self.class_data(class)?;
        class_shape(&data)
            .map(|shape| shape.class)
            .ok_or(MirrorError::UnknownDescriptor { id: class.0 })
    }

    /// Explicit type arguments, or `None` when the class uses its raw
    /// type parameters.
    pub fn type_arguments(&self, class: TypeId) -> MirrorResult<Option<TypeList>> {
        Ok(match &self.data(class)?.specialization {
            Some(TypeSpecialization::Class(spec)) => spec.arguments.clone(),
            _ => None,
        })
    }

    /// The enclosing class override, or `None` when the raw one applies.
    pub fn explicit_enclosing_class(&self, class: TypeId) -> MirrorResult<Option<TypeId>> {
        Ok(match &self.data(class)?.specialization {
            Some(TypeSpecialization::Class(spec)) => spec.enclosing_class,
            _ => None,
        })
    }

    // =========================================================================
    // Specialization requests
    // =========================================================================

    /// Specialize with `arguments`; an empty slice clears the arguments and
    /// keeps everything else.
    pub fn with_type_arguments(&self, class: TypeId, arguments: &[TypeId]) -> MirrorResult<TypeId> {
        let data = self.class_data(class)?;
        let mut record = current_record(&data);
        if arguments.is_empty() {
            record.arguments = None;
        } else {
            let declared = self.type_parameters(data.raw)?.len();
            if arguments.len() != declared {
                return Err(MirrorError::invalid(format!(
                    "{} declares {} type parameter(s) but {} argument(s) were given",
                    self.display(data.raw),
                    declared,
                    arguments.len()
                )));
            }
            for &argument in arguments {
                let kind = self.kind(argument)?;
                if kind == TypeKind::Void || self.is_primitive(argument)? {
                    return Err(MirrorError::invalid(format!(
                        "{} cannot be used as a type argument of {}",
                        self.display(argument),
                        self.display(data.raw)
                    )));
                }
            }
            record.arguments = Some(arguments.into());
        }
        self.specialize(data.raw, TypeSpecialization::Class(record))
    }

    /// Specialize the enclosing class. `outer` must be the raw enclosing
    /// class or a specialization of it; `None` reverts to the raw one.
    pub fn with_enclosing_class(
        &self,
        class: TypeId,
        outer: Option<TypeId>,
    ) -> MirrorResult<TypeId> {
        let data = self.class_data(class)?;
        let mut record = current_record(&data);
        match outer {
            None => record.enclosing_class = None,
            Some(outer) => {
                let Some(raw_enclosing) = self.enclosing_class(data.raw)? else {
                    return Err(MirrorError::invalid(format!(
                        "{} has no enclosing class, cannot use {}",
                        self.display(data.raw),
                        self.display(outer)
                    )));
                };
                // Annotations on the enclosing class are not part of the identity.
                let outer = self.with_type_annotations(outer, Vec::new())?;
                if self.raw(outer)? != raw_enclosing {
                    return Err(MirrorError::invalid(format!(
                        "{} is not a specialization of {}, the enclosing class of {}",
                        self.display(outer),
                        self.display(raw_enclosing),
                        self.display(data.raw)
                    )));
                }
                let is_static = class_shape(&data).is_some_and(|shape| shape.info.is_static());
                if is_static && outer != raw_enclosing {
                    return Err(MirrorError::invalid(format!(
                        "static member class {} cannot be specialized with enclosing class {}",
                        self.display(data.raw),
                        self.display(outer)
                    )));
                }
                record.enclosing_class = Some(outer);
            }
        }
        self.specialize(data.raw, TypeSpecialization::Class(record))
    }

    /// Specialize the enclosing executable of a local class.
    pub fn with_enclosing_executable(
        &self,
        class: TypeId,
        executable: Option<ExecutableId>,
    ) -> MirrorResult<TypeId> {
        let data = self.class_data(class)?;
        let mut record = current_record(&data);
        match executable {
            None => record.enclosing_executable = None,
            Some(executable) => {
                let raw_enclosing = self.enclosing_executable(data.raw)?;
                let raw_executable = self.executable_data(executable)?.raw;
                if raw_enclosing != Some(raw_executable) {
                    return Err(MirrorError::invalid(format!(
                        "{} is not the enclosing executable of {}",
                        self.display_executable(executable),
                        self.display(data.raw)
                    )));
                }
                record.enclosing_executable = Some(executable);
            }
        }
        self.specialize(data.raw, TypeSpecialization::Class(record))
    }

    // =========================================================================
    // Lazily derived structure
    // =========================================================================

    /// Type parameters of a class descriptor: its arguments when specialized,
    /// the declared variables otherwise. Empty for other kinds.
    pub fn type_parameters(&self, ty: TypeId) -> MirrorResult<TypeList> {
        let data = self.data(ty)?;
        let Some(shape) = class_shape(&data) else {
            return Ok(empty_types());
        };
        memo(&shape.type_parameters, || {
            if let Some(TypeSpecialization::Class(ClassSpecialization {
                arguments: Some(arguments),
                ..
            })) = &data.specialization
            {
                return Ok(arguments.clone());
            }
            shape
                .info
                .type_parameters
                .iter()
                .map(|&var| self.reflect(&HostType::Variable(var)))
                .collect()
        })
    }

    /// The generic superclass, resolved through this class's mapping.
    pub fn superclass(&self, class: TypeId) -> MirrorResult<Option<TypeId>> {
        let data = self.data(class)?;
        let Some(shape) = class_shape(&data) else {
            return Ok(None);
        };
        memo(&shape.superclass, || {
            let Some(declared) = &shape.info.superclass else {
                return Ok(None);
            };
            let declared = self.reflect_annotated(declared)?;
            let mapping = self.generic_mapping(class)?;
            self.substitute(&mapping, declared, ResolutionMode::Lenient)
                .map(Some)
        })
    }

    /// Generic interfaces in declaration order, resolved through this
    /// class's mapping.
    pub fn interfaces(&self, class: TypeId) -> MirrorResult<TypeList> {
        let data = self.data(class)?;
        let Some(shape) = class_shape(&data) else {
            return Ok(empty_types());
        };
        memo(&shape.interfaces, || {
            if shape.info.interfaces.is_empty() {
                return Ok(empty_types());
            }
            let mapping = self.generic_mapping(class)?;
            shape
                .info
                .interfaces
                .iter()
                .map(|declared| {
                    let declared = self.reflect_annotated(declared)?;
                    self.substitute(&mapping, declared, ResolutionMode::Lenient)
                })
                .collect()
        })
    }

    pub fn enclosing_class(&self, class: TypeId) -> MirrorResult<Option<TypeId>> {
        let data = self.data(class)?;
        let Some(shape) = class_shape(&data) else {
            return Ok(None);
        };
        memo(&shape.enclosing_class, || {
            if let Some(TypeSpecialization::Class(ClassSpecialization {
                enclosing_class: Some(outer),
                ..
            })) = &data.specialization
            {
                return Ok(Some(*outer));
            }
            shape
                .info
                .enclosing_class
                .map(|outer| self.reflect_class(outer))
                .transpose()
        })
    }

    pub fn enclosing_executable(&self, class: TypeId) -> MirrorResult<Option<ExecutableId>> {
        let data = self.data(class)?;
        let Some(shape) = class_shape(&data) else {
            return Ok(None);
        };
        memo(&shape.enclosing_executable, || {
            if let Some(TypeSpecialization::Class(ClassSpecialization {
                enclosing_executable: Some(executable),
                ..
            })) = &data.specialization
            {
                return Ok(Some(*executable));
            }
            shape
                .info
                .enclosing_executable
                .map(|method| self.reflect_executable(method))
                .transpose()
        })
    }

    /// Raw type parameters bound to this descriptor's type parameters,
    /// falling through to the enclosing class and then the enclosing
    /// executable. Empty for non-class descriptors.
    pub fn generic_mapping(&self, class: TypeId) -> MirrorResult<Arc<TypeMapping>> {
        let data = self.data(class)?;
        let Some(shape) = class_shape(&data) else {
            return Ok(TypeMapping::empty());
        };
        memo(&shape.generic_mapping, || {
            let raw_parameters = self.type_parameters(data.raw)?;
            let parameters = self.type_parameters(class)?;
            let mut mapping = Arc::new(TypeMapping::from_pairs(
                raw_parameters.iter().copied().zip(parameters.iter().copied()),
            ));
            if let Some(outer) = self.enclosing_class(class)? {
                mapping = mapping.compose(&self.generic_mapping(outer)?);
            }
            if let Some(executable) = self.enclosing_executable(class)? {
                mapping = mapping.compose(&self.executable_generic_mapping(executable)?);
            }
            Ok(mapping)
        })
    }
}

#[cfg(test)]
#[path = "../tests/class_tests.rs"]
mod tests;
