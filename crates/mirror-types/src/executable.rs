//! Executable (method and constructor) and field mirrors.
//!
//! A raw executable is anchored at the class that declares it. Specializing
//! its declaring class (to `ArrayList<String>` say) or binding its own type
//! parameters changes the generic mapping through which its signature is
//! resolved. Fields follow the same scheme with the declaring class as the
//! only specializable part.

use crate::MirrorCache;
use crate::error::{MirrorError, MirrorResult};
use crate::handle::{ClassId, FieldId, HostType, MethodId};
use crate::mapping::{ResolutionMode, TypeMapping};
use crate::metadata::{FieldInfo, MethodInfo, Modifiers};
use crate::specialization::{TypeList, empty_types};
use crate::types::{ExecutableId, FieldMirrorId, TypeId, TypeKind, memo};
use mirror_common::Atom;
use std::sync::Arc;

impl MirrorCache {
    // =========================================================================
    // Executables
    // =========================================================================

    pub fn executable_declaration(
        &self,
        executable: ExecutableId,
    ) -> MirrorResult<Arc<MethodInfo>> {
        Ok(self.executable_data(executable)?.info.clone())
    }

    pub fn executable_method(&self, executable: ExecutableId) -> MirrorResult<MethodId> {
        Ok(self.executable_data(executable)?.method)
    }

    pub fn raw_executable(&self, executable: ExecutableId) -> MirrorResult<ExecutableId> {
        Ok(self.executable_data(executable)?.raw)
    }

    pub fn executable_name(&self, executable: ExecutableId) -> MirrorResult<Atom> {
        Ok(self.executable_data(executable)?.info.name)
    }

    pub fn executable_modifiers(&self, executable: ExecutableId) -> MirrorResult<Modifiers> {
        Ok(self.executable_data(executable)?.info.modifiers)
    }

    pub fn is_constructor(&self, executable: ExecutableId) -> MirrorResult<bool> {
        Ok(self.executable_data(executable)?.info.is_constructor())
    }

    /// The class the executable is viewed from.
    pub fn declaring_class(&self, executable: ExecutableId) -> MirrorResult<TypeId> {
        let data = self.executable_data(executable)?;
        memo(&data.declaring_class, || {
            match data.specialization.as_ref().and_then(|spec| spec.declaring_class) {
                Some(class) => Ok(class),
                None => self.reflect_class(data.info.declaring_class),
            }
        })
    }

    /// Own type parameters: explicit arguments when bound, the declared
    /// variables otherwise.
    pub fn executable_type_parameters(&self, executable: ExecutableId) -> MirrorResult<TypeList> {
        let data = self.executable_data(executable)?;
        memo(&data.type_parameters, || {
            let bound = data.specialization.as_ref().and_then(|spec| spec.arguments.clone());
            if let Some(arguments) = bound {
                return Ok(arguments);
            }
            if data.info.type_parameters.is_empty() {
                return Ok(empty_types());
            }
            data.info
                .type_parameters
                .iter()
                .map(|&var| self.reflect(&HostType::Variable(var)))
                .collect()
        })
    }

    /// Own type parameters bound to their arguments, then the declaring
    /// class's mapping.
    pub fn executable_generic_mapping(
        &self,
        executable: ExecutableId,
    ) -> MirrorResult<Arc<TypeMapping>> {
        let data = self.executable_data(executable)?;
        memo(&data.generic_mapping, || {
            let raw_parameters = self.executable_type_parameters(data.raw)?;
            let parameters = self.executable_type_parameters(executable)?;
            let own = Arc::new(TypeMapping::from_pairs(
                raw_parameters.iter().copied().zip(parameters.iter().copied()),
            ));
            let declaring = self.declaring_class(executable)?;
            Ok(own.compose(&self.generic_mapping(declaring)?))
        })
    }

    pub fn return_type(&self, executable: ExecutableId) -> MirrorResult<TypeId> {
        let data = self.executable_data(executable)?;
        memo(&data.return_type, || {
            let declared = self.reflect_annotated(&data.info.return_type)?;
            self.resolve_in_executable(executable, declared, ResolutionMode::Lenient)
        })
    }

    pub fn parameter_types(&self, executable: ExecutableId) -> MirrorResult<TypeList> {
        let data = self.executable_data(executable)?;
        memo(&data.parameter_types, || {
            data.info
                .parameters
                .iter()
                .map(|parameter| {
                    let declared = self.reflect_annotated(parameter)?;
                    self.resolve_in_executable(executable, declared, ResolutionMode::Lenient)
                })
                .collect()
        })
    }

    pub fn exception_types(&self, executable: ExecutableId) -> MirrorResult<TypeList> {
        let data = self.executable_data(executable)?;
        memo(&data.exception_types, || {
            data.info
                .exceptions
                .iter()
                .map(|exception| {
                    let declared = self.reflect_annotated(exception)?;
                    self.resolve_in_executable(executable, declared, ResolutionMode::Lenient)
                })
                .collect()
        })
    }

    /// Erasures of the declared parameter types. Identical for every
    /// specialization of one declaration.
    pub fn erased_parameter_types(&self, executable: ExecutableId) -> MirrorResult<Vec<ClassId>> {
        let raw = self.executable_data(executable)?.raw;
        self.parameter_types(raw)?
            .iter()
            .map(|&parameter| self.erasure(parameter))
            .collect()
    }

    /// Resolve `ty` against the executable's generic mapping.
    pub fn resolve_in_executable(
        &self,
        executable: ExecutableId,
        ty: TypeId,
        mode: ResolutionMode,
    ) -> MirrorResult<TypeId> {
        let mapping = self.executable_generic_mapping(executable)?;
        self.substitute(&mapping, ty, mode)
    }

    /// View the executable from `class`, which must erase to the declaring
    /// class. `None` reverts to the raw declaring class.
    pub fn executable_with_declaring_class(
        &self,
        executable: ExecutableId,
        class: Option<TypeId>,
    ) -> MirrorResult<ExecutableId> {
        let data = self.executable_data(executable)?;
        let mut record = data.specialization.clone().unwrap_or_default();
        match class {
            None => record.declaring_class = None,
            Some(class) => {
                self.expect_kind(class, TypeKind::Class)?;
                if self.erasure(class)? != data.info.declaring_class {
                    return Err(MirrorError::invalid(format!(
                        "{} cannot declare {}",
                        self.display(class),
                        self.display_executable(executable)
                    )));
                }
                record.declaring_class = Some(class);
            }
        }
        self.specialize_executable(data.raw, record)
    }

    /// Bind the executable's own type parameters; an empty slice clears them.
    pub fn executable_with_type_arguments(
        &self,
        executable: ExecutableId,
        arguments: &[TypeId],
    ) -> MirrorResult<ExecutableId> {
        let data = self.executable_data(executable)?;
        let mut record = data.specialization.clone().unwrap_or_default();
        if arguments.is_empty() {
            record.arguments = None;
        } else {
            let declared = data.info.type_parameters.len();
            if arguments.len() != declared {
                return Err(MirrorError::invalid(format!(
                    "{} declares {} type parameter(s) but {} argument(s) were given",
                    self.display_executable(executable),
                    declared,
                    arguments.len()
                )));
            }
            record.arguments = Some(arguments.into());
        }
        self.specialize_executable(data.raw, record)
    }

    // =========================================================================
    // Fields
    // =========================================================================

    pub fn field_declaration(&self, field: FieldMirrorId) -> MirrorResult<Arc<FieldInfo>> {
        Ok(self.field_data(field)?.info.clone())
    }

    pub fn field_id(&self, field: FieldMirrorId) -> MirrorResult<FieldId> {
        Ok(self.field_data(field)?.field)
    }

    pub fn raw_field(&self, field: FieldMirrorId) -> MirrorResult<FieldMirrorId> {
        Ok(self.field_data(field)?.raw)
    }

    pub fn field_name(&self, field: FieldMirrorId) -> MirrorResult<Atom> {
        Ok(self.field_data(field)?.info.name)
    }

    pub fn field_modifiers(&self, field: FieldMirrorId) -> MirrorResult<Modifiers> {
        Ok(self.field_data(field)?.info.modifiers)
    }

    pub fn field_declaring_class(&self, field: FieldMirrorId) -> MirrorResult<TypeId> {
        let data = self.field_data(field)?;
        memo(&data.declaring_class, || match data.declaring_override {
            Some(class) => Ok(class),
            None => self.reflect_class(data.info.declaring_class),
        })
    }

    /// The field's type resolved through its declaring class.
    pub fn field_type(&self, field: FieldMirrorId) -> MirrorResult<TypeId> {
        let data = self.field_data(field)?;
        memo(&data.ty, || {
            let declared = self.reflect_annotated(&data.info.ty)?;
            let declaring = self.field_declaring_class(field)?;
            self.resolve_in(declaring, declared, ResolutionMode::Lenient)
        })
    }

    pub fn field_with_declaring_class(
        &self,
        field: FieldMirrorId,
        class: Option<TypeId>,
    ) -> MirrorResult<FieldMirrorId> {
        let data = self.field_data(field)?;
        let Some(class) = class else {
            return Ok(data.raw);
        };
        self.expect_kind(class, TypeKind::Class)?;
        if self.erasure(class)? != data.info.declaring_class {
            return Err(MirrorError::invalid(format!(
                "{} cannot declare {}",
                self.display(class),
                self.display_field(field)
            )));
        }
        self.specialize_field(data.raw, class)
    }
}

#[cfg(test)]
#[path = "../tests/executable_tests.rs"]
mod tests;
