//! Error types.
//!
//! Only structural problems are errors. Runtime outcomes such as a failed
//! module execution or an unpaid mana drain are plain `bool` results
//! consumed by the chain walk, and persisted chains are read leniently.

use crate::attributes::AttributeId;

/// Structural violations found while compiling a chain.
///
/// Every variant is fatal for the composition being built.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// No rings were supplied.
    #[error("cannot compile an empty chain")]
    EmptyChain,

    /// A ring names a child index that does not exist.
    #[error("ring {ring} links to missing child {child}")]
    DanglingLink { ring: usize, child: usize },

    /// Two rings claim the same child.
    #[error("ring {child} has more than one parent")]
    SharedChild { child: usize },

    /// More than one ring has no parent.
    #[error("chain has {roots} roots, expected exactly one")]
    DisconnectedChain { roots: usize },

    /// Following child links returns to a ring already visited.
    #[error("composition references itself through ring {ring}")]
    CyclicComposition { ring: usize },

    /// More rings than a chain may hold.
    #[error("chain has {len} rings, at most {max} are allowed")]
    ChainTooLong { len: usize, max: usize },

    /// A modifier targets a ring position past the end of the chain.
    #[error("modifier targets ring {position} but the chain has {len} rings")]
    ModifierOutOfRange { position: usize, len: usize },
}

impl CompileError {
    /// Compile errors always abort construction.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        true
    }
}

/// Errors surfaced by registries, persistence and configuration.
#[derive(Debug, thiserror::Error)]
pub enum SpellError {
    /// Lookup of an attribute id the registry does not know.
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(AttributeId),

    /// Registering an attribute id twice.
    #[error("attribute '{0}' is already registered")]
    DuplicateAttribute(AttributeId),

    /// Lookup of a module id the registry does not know.
    #[error("unknown module '{0}'")]
    UnknownModule(String),

    /// Registering a module id twice.
    #[error("module '{0}' is already registered")]
    DuplicateModule(String),

    /// Chain construction failed.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// A persisted chain could not be parsed at all.
    #[error("malformed persisted chain: {0}")]
    MalformedChain(#[source] serde_json::Error),

    /// A configuration value is out of range or unparsable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SpellError {
    /// True for errors that indicate a broken composition rather than a
    /// recoverable lookup miss.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            SpellError::Compile(err) => err.is_fatal(),
            SpellError::MalformedChain(_) | SpellError::InvalidConfig(_) => true,
            SpellError::UnknownAttribute(_)
            | SpellError::DuplicateAttribute(_)
            | SpellError::UnknownModule(_)
            | SpellError::DuplicateModule(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_messages() {
        let err = CompileError::CyclicComposition { ring: 2 };
        assert_eq!(err.to_string(), "composition references itself through ring 2");

        let err = CompileError::ModifierOutOfRange { position: 4, len: 3 };
        assert!(err.to_string().contains("ring 4"));
    }

    #[test]
    fn test_spell_error_from_compile() {
        let err: SpellError = CompileError::EmptyChain.into();
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "cannot compile an empty chain");
    }

    #[test]
    fn test_lookup_errors_not_fatal() {
        let err = SpellError::UnknownAttribute(AttributeId::new("warmth"));
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "unknown attribute 'warmth'");
    }
}
