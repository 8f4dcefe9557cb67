//! Generics-aware type descriptors over a host object model.
//!
//! This crate mirrors the types of a class-based host (classes, arrays, type
//! variables, wildcards and void) as descriptors addressed by [`TypeId`].
//! It uses:
//!
//! - **`DeclarationProvider`**: read-only declaration metadata supplied by
//!   the embedder (`DeclarationStore` is the in-memory one)
//! - **Identity-preserving specialization**: equal requests produce the same
//!   `TypeId`, so descriptor equality is id equality
//! - **Lazy derived structure**: supertypes, members and mappings are
//!   computed on first access and memoized per descriptor
//! - **Coinductive relations**: assignability terminates on self-referential
//!   declarations such as `Node<T extends Node<T>>`
//!
//! ```ignore
//! let store = Arc::new(DeclarationStore::new());
//! // ... declare classes ...
//! let cache = MirrorCache::new(store.clone());
//! let list = cache.reflect_class(list_class)?;
//! let strings = cache.with_type_arguments(list, &[string])?;
//! assert!(cache.is_assignable_from(list, strings)?);
//! ```
mod array;
mod cache;
mod class;
pub mod error;
mod executable;
pub mod format;
pub mod global;
pub mod handle;
pub mod mapping;
mod members;
pub mod metadata;
mod parameter;
mod query_trace;
pub mod recursion;
mod relations;
pub mod specialization;
mod specificity;
pub mod store;
pub mod types;
mod variable;
mod wildcard;

#[cfg(test)]
mod test_fixtures;

pub use cache::{MirrorCache, MirrorOptions};
pub use error::{MirrorError, MirrorResult};
pub use format::TypeFormatter;
pub use handle::{
    AnnotatedChildren, AnnotatedType, Annotation, AnnotationValue, ClassId, FieldId, HostType,
    MethodId, TypeVarId,
};
pub use mapping::{ResolutionMode, TypeMapping};
pub use metadata::{
    Access, ClassInfo, ClassKind, DeclarationProvider, ExecutableKind, FieldInfo,
    GenericDeclaration, MethodInfo, Modifiers, ParameterInfo, TypeVarInfo,
};
pub use parameter::ParameterMirror;
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
pub use specialization::{
    ArraySpecialization, ClassSpecialization, ExecutableSpecialization, TypeList,
    TypeSpecialization, WildcardSpecialization,
};
pub use store::DeclarationStore;
pub use types::{ExecutableId, FieldMirrorId, TypeId, TypeKind};
