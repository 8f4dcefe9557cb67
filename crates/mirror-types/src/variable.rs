//! Type-variable descriptors.

use crate::MirrorCache;
use crate::error::{MirrorError, MirrorResult};
use crate::handle::TypeVarId;
use crate::metadata::GenericDeclaration;
use crate::specialization::TypeList;
use crate::types::{TypeData, TypeId, TypeKind, TypeShape, VariableShape, memo};
use mirror_common::Atom;

fn variable_shape(data: &TypeData) -> MirrorResult<&VariableShape> {
    match &data.shape {
        TypeShape::Variable(shape) => Ok(shape),
        _ => Err(MirrorError::UnknownDescriptor { id: data.id.0 }),
    }
}

impl MirrorCache {
    /// Declared bounds, unsubstituted. Annotated uses of a variable share
    /// the bounds of the raw variable.
    pub fn bounds(&self, variable: TypeId) -> MirrorResult<TypeList> {
        let data = self.expect_kind(variable, TypeKind::Variable)?;
        if !data.is_raw() {
            return self.bounds(data.raw);
        }
        let shape = variable_shape(&data)?;
        memo(&shape.bounds, || self.reflect_annotated_list(&shape.info.bounds))
    }

    /// The host variable behind a variable descriptor.
    pub fn type_variable(&self, variable: TypeId) -> MirrorResult<TypeVarId> {
        let data = self.expect_kind(variable, TypeKind::Variable)?;
        Ok(variable_shape(&data)?.var)
    }

    pub fn variable_name(&self, variable: TypeId) -> MirrorResult<Atom> {
        let data = self.expect_kind(variable, TypeKind::Variable)?;
        Ok(variable_shape(&data)?.info.name)
    }

    /// The class or executable that declares the variable.
    pub fn generic_declaration(&self, variable: TypeId) -> MirrorResult<GenericDeclaration> {
        let data = self.expect_kind(variable, TypeKind::Variable)?;
        Ok(variable_shape(&data)?.info.owner)
    }
}

#[cfg(test)]
#[path = "../tests/variable_tests.rs"]
mod tests;
