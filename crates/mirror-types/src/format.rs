//! Java-syntax rendering of descriptors, executables and fields.
//!
//! Used in every error message, so rendering never fails from the caller's
//! point of view: [`MirrorCache::display`] falls back to `#id` when a
//! descriptor cannot be read.

use crate::MirrorCache;
use crate::error::MirrorResult;
use crate::handle::ClassId;
use crate::metadata::ClassKind;
use crate::types::{ExecutableId, FieldMirrorId, TypeId, TypeShape};
use std::fmt::Write;

/// Renders descriptors as Java source would spell them.
pub struct TypeFormatter<'a> {
    cache: &'a MirrorCache,
    /// Package-qualified class names; simple names otherwise.
    qualified: bool,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(cache: &'a MirrorCache) -> Self {
        TypeFormatter {
            cache,
            qualified: true,
        }
    }

    pub fn with_simple_names(mut self) -> Self {
        self.qualified = false;
        self
    }

    pub fn format(&self, id: TypeId) -> MirrorResult<String> {
        let mut out = String::new();
        self.write_type(&mut out, id)?;
        Ok(out)
    }

    pub fn format_executable(&self, executable: ExecutableId) -> MirrorResult<String> {
        let cache = self.cache;
        let mut out = String::new();
        self.write_type(&mut out, cache.declaring_class(executable)?)?;
        out.push('.');
        out.push_str(&cache.interner().resolve(cache.executable_name(executable)?));
        out.push('(');
        self.write_list(&mut out, &cache.parameter_types(executable)?, ", ")?;
        out.push(')');
        Ok(out)
    }

    pub fn format_field(&self, field: FieldMirrorId) -> MirrorResult<String> {
        let cache = self.cache;
        let mut out = String::new();
        self.write_type(&mut out, cache.field_declaring_class(field)?)?;
        out.push('.');
        out.push_str(&cache.interner().resolve(cache.field_name(field)?));
        Ok(out)
    }

    /// The class name alone, without arguments or annotations.
    pub fn format_class(&self, class: ClassId) -> MirrorResult<String> {
        let info = self.cache.class_info(class)?;
        let interner = self.cache.interner();
        let bare = matches!(info.kind, ClassKind::Primitive | ClassKind::Void);
        if info.enclosing_executable.is_some() || bare {
            return Ok(interner.resolve(info.simple_name).to_string());
        }
        if let ClassKind::Array { component } = info.kind {
            return Ok(format!("{}[]", self.format_class(component)?));
        }
        if let Some(outer) = info.enclosing_class {
            return Ok(format!(
                "{}.{}",
                self.format_class(outer)?,
                interner.resolve(info.simple_name)
            ));
        }
        if self.qualified {
            Ok(interner.resolve(info.name).to_string())
        } else {
            Ok(interner.resolve(info.simple_name).to_string())
        }
    }

    fn write_list(&self, out: &mut String, ids: &[TypeId], separator: &str) -> MirrorResult<()> {
        for (index, &id) in ids.iter().enumerate() {
            if index > 0 {
                out.push_str(separator);
            }
            self.write_type(out, id)?;
        }
        Ok(())
    }

    fn write_annotations(&self, out: &mut String, id: TypeId) -> MirrorResult<()> {
        let interner = self.cache.interner();
        for annotation in self.cache.type_annotations(id)?.iter() {
            let info = self.cache.class_info(annotation.class)?;
            let _ = write!(out, "@{} ", interner.resolve(info.simple_name));
        }
        Ok(())
    }

    fn write_type(&self, out: &mut String, id: TypeId) -> MirrorResult<()> {
        let cache = self.cache;
        let data = cache.data(id)?;
        self.write_annotations(out, id)?;
        match &data.shape {
            TypeShape::Class(shape) => {
                match cache.explicit_enclosing_class(id)? {
                    Some(outer) => {
                        self.write_type(out, outer)?;
                        out.push('.');
                        out.push_str(&cache.interner().resolve(shape.info.simple_name));
                    }
                    None => out.push_str(&self.format_class(shape.class)?),
                }
                if let Some(arguments) = cache.type_arguments(id)? {
                    out.push('<');
                    self.write_list(out, &arguments, ", ")?;
                    out.push('>');
                }
            }
            TypeShape::Array(_) => {
                self.write_type(out, cache.component(id)?)?;
                out.push_str("[]");
            }
            TypeShape::Variable(shape) => {
                out.push_str(&cache.interner().resolve(shape.info.name));
            }
            TypeShape::Wildcard(_) => {
                out.push('?');
                let lower = cache.lower_bounds(id)?;
                if !lower.is_empty() {
                    out.push_str(" super ");
                    self.write_list(out, &lower, " & ")?;
                } else {
                    let upper = cache.upper_bounds(id)?;
                    let mut shown = Vec::with_capacity(upper.len());
                    for &bound in upper.iter() {
                        if !cache.is_top(bound)? || !cache.type_annotations(bound)?.is_empty() {
                            shown.push(bound);
                        }
                    }
                    if !shown.is_empty() {
                        out.push_str(" extends ");
                        self.write_list(out, &shown, " & ")?;
                    }
                }
            }
            TypeShape::Void(_) => out.push_str("void"),
        }
        Ok(())
    }
}

impl MirrorCache {
    /// Java rendering of `id`, or `#id` if it cannot be read.
    pub fn display(&self, id: TypeId) -> String {
        TypeFormatter::new(self)
            .format(id)
            .unwrap_or_else(|_| format!("#{}", id.0))
    }

    pub fn display_executable(&self, executable: ExecutableId) -> String {
        TypeFormatter::new(self)
            .format_executable(executable)
            .unwrap_or_else(|_| format!("executable #{}", executable.0))
    }

    pub fn display_field(&self, field: FieldMirrorId) -> String {
        TypeFormatter::new(self)
            .format_field(field)
            .unwrap_or_else(|_| format!("field #{}", field.0))
    }

    pub fn display_class(&self, class: ClassId) -> String {
        TypeFormatter::new(self)
            .format_class(class)
            .unwrap_or_else(|_| format!("class #{}", class.0))
    }

    /// Comma-separated renderings of `ids`.
    pub fn display_list(&self, ids: &[TypeId]) -> String {
        ids.iter()
            .map(|&id| self.display(id))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
