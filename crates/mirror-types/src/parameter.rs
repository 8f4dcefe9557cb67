//! Parameter mirrors.
//!
//! A parameter is addressed by its executable mirror and position, so the
//! `E e` parameter of `ArrayList<String>.add` reports `String` while the raw
//! executable's reports `E`. Names and declaration annotations come from the
//! declaration and are shared by every specialization.

use crate::MirrorCache;
use crate::error::{MirrorError, MirrorResult};
use crate::handle::Annotation;
use crate::metadata::{Modifiers, ParameterInfo};
use crate::types::{ExecutableId, TypeId};
use mirror_common::Atom;

/// One parameter of an executable mirror.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterMirror {
    executable: ExecutableId,
    index: u32,
}

impl ParameterMirror {
    pub fn executable(self) -> ExecutableId {
        self.executable
    }

    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl MirrorCache {
    /// The parameters of `executable`, in declaration order.
    pub fn parameters(&self, executable: ExecutableId) -> MirrorResult<Vec<ParameterMirror>> {
        let count = self.executable_declaration(executable)?.parameters.len();
        Ok((0..count as u32)
            .map(|index| ParameterMirror { executable, index })
            .collect())
    }

    /// The parameter at `index`, or `NoSuchMember` past the end.
    pub fn parameter(
        &self,
        executable: ExecutableId,
        index: usize,
    ) -> MirrorResult<ParameterMirror> {
        let count = self.executable_declaration(executable)?.parameters.len();
        if index >= count {
            return Err(MirrorError::no_such_member(format!(
                "{} has no parameter {index}",
                self.display_executable(executable)
            )));
        }
        Ok(ParameterMirror {
            executable,
            index: index as u32,
        })
    }

    fn parameter_info(&self, parameter: ParameterMirror) -> MirrorResult<ParameterInfo> {
        let info = self.executable_declaration(parameter.executable)?;
        Ok(info.parameter_detail(parameter.index()))
    }

    /// `None` when the host did not record the name.
    pub fn parameter_name(&self, parameter: ParameterMirror) -> MirrorResult<Option<Atom>> {
        Ok(self.parameter_info(parameter)?.name)
    }

    /// Declaration annotations; type annotations live on the parameter type.
    pub fn parameter_annotations(
        &self,
        parameter: ParameterMirror,
    ) -> MirrorResult<Vec<Annotation>> {
        Ok(self.parameter_info(parameter)?.annotations)
    }

    pub fn parameter_modifiers(&self, parameter: ParameterMirror) -> MirrorResult<Modifiers> {
        Ok(self.parameter_info(parameter)?.modifiers)
    }

    pub fn parameter_is_final(&self, parameter: ParameterMirror) -> MirrorResult<bool> {
        Ok(self.parameter_modifiers(parameter)?.contains(Modifiers::FINAL))
    }

    /// True for the last parameter of a varargs executable.
    pub fn parameter_is_varargs(&self, parameter: ParameterMirror) -> MirrorResult<bool> {
        let info = self.executable_declaration(parameter.executable)?;
        Ok(info.modifiers.contains(Modifiers::VARARGS)
            && parameter.index() + 1 == info.parameters.len())
    }

    /// The parameter type resolved through the executable's generic mapping.
    pub fn parameter_type(&self, parameter: ParameterMirror) -> MirrorResult<TypeId> {
        let types = self.parameter_types(parameter.executable)?;
        types.get(parameter.index()).copied().ok_or_else(|| {
            MirrorError::no_such_member(format!(
                "{} has no parameter {}",
                self.display_executable(parameter.executable),
                parameter.index
            ))
        })
    }

    /// The same parameter of the raw executable.
    pub fn raw_parameter(&self, parameter: ParameterMirror) -> MirrorResult<ParameterMirror> {
        Ok(ParameterMirror {
            executable: self.raw_executable(parameter.executable)?,
            index: parameter.index,
        })
    }

    /// View the parameter through `executable`, a specialization of the same
    /// declaration. `None` reverts to the raw executable.
    pub fn parameter_with_declaring_executable(
        &self,
        parameter: ParameterMirror,
        executable: Option<ExecutableId>,
    ) -> MirrorResult<ParameterMirror> {
        let Some(executable) = executable else {
            return self.raw_parameter(parameter);
        };
        if self.raw_executable(executable)? != self.raw_executable(parameter.executable)? {
            return Err(MirrorError::invalid(format!(
                "{} does not declare parameter {} of {}",
                self.display_executable(executable),
                parameter.index,
                self.display_executable(parameter.executable)
            )));
        }
        Ok(ParameterMirror {
            executable,
            index: parameter.index,
        })
    }
}

#[cfg(test)]
#[path = "../tests/parameter_tests.rs"]
mod tests;
