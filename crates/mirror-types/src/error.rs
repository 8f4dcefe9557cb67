//! Errors raised by the reflection engine.

use thiserror::Error;

/// Errors raised by descriptor construction, specialization and lookup.
///
/// Every error is raised where it is detected and returned to the caller;
/// the cache is never left holding a partially applied specialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MirrorError {
    /// A requested specialization violates a structural constraint.
    #[error("invalid specialization: {message}")]
    InvalidSpecialization { message: String },

    /// A member or ancestor lookup found no match. `source` holds the failure
    /// one level further up the hierarchy.
    #[error("{message}")]
    NoSuchMember {
        message: String,
        #[source]
        source: Option<Box<MirrorError>>,
    },

    /// Strict resolution met a type variable with no binding.
    #[error("unresolved type variable {variable} in {context}")]
    UnresolvedTypeVariable { variable: String, context: String },

    /// The provider reported a type kind with no descriptor representation.
    #[error("unrecognized type kind `{kind}`")]
    UnrecognizedTypeKind { kind: String },

    /// The provider returned no metadata for an id it handed out.
    #[error("declaration provider has no metadata for {what}")]
    MissingDeclaration { what: String },

    /// A descriptor id this cache did not produce.
    #[error("unknown descriptor #{id}")]
    UnknownDescriptor { id: u32 },

    /// A walk over nested descriptors hit its configured depth limit.
    #[error("{operation} exceeded its depth limit at {context}")]
    DepthLimitExceeded {
        operation: &'static str,
        context: String,
    },

    /// An operation applied to a descriptor of the wrong variant.
    #[error("expected {expected} descriptor, found {found}")]
    WrongKind {
        expected: &'static str,
        found: String,
    },
}

pub type MirrorResult<T> = Result<T, MirrorError>;

impl MirrorError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        MirrorError::InvalidSpecialization {
            message: message.into(),
        }
    }

    pub(crate) fn no_such_member(message: impl Into<String>) -> Self {
        MirrorError::NoSuchMember {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap `self` with one more hop of lookup context.
    pub(crate) fn while_searching(self, message: impl Into<String>) -> Self {
        match self {
            inner @ MirrorError::NoSuchMember { .. } => MirrorError::NoSuchMember {
                message: message.into(),
                source: Some(Box::new(inner)),
            },
            other => other,
        }
    }

    pub(crate) fn missing(what: impl Into<String>) -> Self {
        MirrorError::MissingDeclaration { what: what.into() }
    }

    /// Messages of a `NoSuchMember` chain, outermost first.
    pub fn search_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = Some(self);
        while let Some(MirrorError::NoSuchMember { message, source }) = current {
            path.push(message.as_str());
            current = source.as_deref();
        }
        path
    }

    /// True for violations of the provider contract, which callers should
    /// not retry.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MirrorError::UnrecognizedTypeKind { .. } | MirrorError::MissingDeclaration { .. }
        )
    }
}
