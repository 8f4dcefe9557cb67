//! Array descriptors.

use crate::MirrorCache;
use crate::error::{MirrorError, MirrorResult};
use crate::specialization::{ArraySpecialization, TypeSpecialization};
use crate::types::{TypeId, TypeKind, TypeShape, memo};

impl MirrorCache {
    /// The component descriptor: the specialized component when one was
    /// supplied, the raw component class otherwise.
    pub fn component(&self, array: TypeId) -> MirrorResult<TypeId> {
        let data = self.expect_kind(array, TypeKind::Array)?;
        let TypeShape::Array(shape) = &data.shape else {
            return Err(MirrorError::UnknownDescriptor { id: array.0 });
        };
        memo(&shape.component, || {
            if let Some(TypeSpecialization::Array(ArraySpecialization {
                component: Some(component),
                ..
            })) = &data.specialization
            {
                return Ok(*component);
            }
            self.reflect_class(shape.component_class)
        })
    }

    /// Specialize the component. The replacement must be assignable to the
    /// raw component class.
    pub fn with_component(&self, array: TypeId, component: TypeId) -> MirrorResult<TypeId> {
        let data = self.expect_kind(array, TypeKind::Array)?;
        let raw_component = self.component(data.raw)?;
        if !self.is_assignable_from(raw_component, component)? {
            return Err(MirrorError::invalid(format!(
                "{} is not assignable to the component {} of {}",
                self.display(component),
                self.display(raw_component),
                self.display(data.raw)
            )));
        }
        let annotations = self.type_annotations(array)?;
        self.specialize(
            data.raw,
            TypeSpecialization::Array(ArraySpecialization {
                annotations,
                component: Some(component),
            }),
        )
    }

    /// `component[]`, built from the array class of the component's erasure.
    pub fn array_of(&self, component: TypeId) -> MirrorResult<TypeId> {
        let array = self.array_type_for(component)?;
        self.with_component(array, component)
    }
}

#[cfg(test)]
#[path = "../tests/array_tests.rs"]
mod tests;
