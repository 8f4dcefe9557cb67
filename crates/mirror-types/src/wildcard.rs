//! Wildcard descriptors.
//!
//! A raw wildcard takes its bounds from the host handle; a specialized one
//! carries replacement bounds in its record. Replacements are checked
//! position by position against the raw bounds.

use crate::MirrorCache;
use crate::error::{MirrorError, MirrorResult};
use crate::handle::HostType;
use crate::specialization::{TypeList, TypeSpecialization, WildcardSpecialization};
use crate::types::{TypeData, TypeId, TypeKind, TypeShape, WildcardShape, memo};
use std::sync::Arc;

fn wildcard_shape(data: &TypeData) -> MirrorResult<&WildcardShape> {
    match &data.shape {
        TypeShape::Wildcard(shape) => Ok(shape),
        _ => Err(MirrorError::UnknownDescriptor { id: data.id.0 }),
    }
}

fn current_record(data: &TypeData) -> WildcardSpecialization {
    match &data.specialization {
        Some(TypeSpecialization::Wildcard(spec)) => spec.clone(),
        _ => WildcardSpecialization::default(),
    }
}

impl MirrorCache {
    pub fn upper_bounds(&self, wildcard: TypeId) -> MirrorResult<TypeList> {
        let data = self.expect_kind(wildcard, TypeKind::Wildcard)?;
        let shape = wildcard_shape(&data)?;
        memo(&shape.upper_bounds, || {
            if let Some(TypeSpecialization::Wildcard(WildcardSpecialization {
                upper_bounds: Some(bounds),
                ..
            })) = &data.specialization
            {
                return Ok(bounds.clone());
            }
            self.reflect_handles(&shape.upper_handles)
        })
    }

    pub fn lower_bounds(&self, wildcard: TypeId) -> MirrorResult<TypeList> {
        let data = self.expect_kind(wildcard, TypeKind::Wildcard)?;
        let shape = wildcard_shape(&data)?;
        memo(&shape.lower_bounds, || {
            if let Some(TypeSpecialization::Wildcard(WildcardSpecialization {
                lower_bounds: Some(bounds),
                ..
            })) = &data.specialization
            {
                return Ok(bounds.clone());
            }
            self.reflect_handles(&shape.lower_handles)
        })
    }

    fn reflect_handles(&self, handles: &Arc<[HostType]>) -> MirrorResult<TypeList> {
        handles.iter().map(|handle| self.reflect(handle)).collect()
    }

    /// Replace either list of bounds; `None` keeps the current list.
    ///
    /// Each replacement must have as many entries as the raw list, and each
    /// entry must be assignable to the raw bound at the same position.
    pub fn with_bounds(
        &self,
        wildcard: TypeId,
        upper: Option<&[TypeId]>,
        lower: Option<&[TypeId]>,
    ) -> MirrorResult<TypeId> {
        let data = self.expect_kind(wildcard, TypeKind::Wildcard)?;
        let mut record = current_record(&data);
        if let Some(upper) = upper {
            let raw_upper = self.upper_bounds(data.raw)?;
            self.check_bounds("upper", data.raw, &raw_upper, upper)?;
            record.upper_bounds = Some(upper.into());
        }
        if let Some(lower) = lower {
            let raw_lower = self.lower_bounds(data.raw)?;
            self.check_bounds("lower", data.raw, &raw_lower, lower)?;
            record.lower_bounds = Some(lower.into());
        }
        self.specialize(data.raw, TypeSpecialization::Wildcard(record))
    }

    fn check_bounds(
        &self,
        which: &str,
        raw: TypeId,
        raw_bounds: &TypeList,
        replacements: &[TypeId],
    ) -> MirrorResult<()> {
        if raw_bounds.len() != replacements.len() {
            return Err(MirrorError::invalid(format!(
                "{} has {} {which} bound(s) but {} replacement(s) were given",
                self.display(raw),
                raw_bounds.len(),
                replacements.len()
            )));
        }
        for (&bound, &replacement) in raw_bounds.iter().zip(replacements) {
            if !self.is_assignable_from(bound, replacement)? {
                return Err(MirrorError::invalid(format!(
                    "{which} bound {} of {} is not assignable to {}",
                    self.display(replacement),
                    self.display(raw),
                    self.display(bound)
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/wildcard_tests.rs"]
mod tests;
