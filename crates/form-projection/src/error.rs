//! Compile and render failure types.

use form_validate::CheckError;
use thiserror::Error;

/// Errors from compiling a schema or walking its instruction sequence.
///
/// All variants are data errors: they are returned, never thrown, and a
/// failed compile yields no partial instruction list.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ProjectionError {
    /// Schema, path, depth or argument validation failed.
    #[error(transparent)]
    Check(#[from] CheckError),

    /// A field key failed the identifier pattern.
    #[error("build_render_instructions(), '{identifier}' in '{path}' fails {pattern}")]
    BadIdentifier {
        identifier: String,
        path: String,
        pattern: String,
    },

    /// A schema entry was not an object at all.
    #[error("build_render_instructions(), '{key}' in '{path}' is not an object")]
    EntryNotObject { key: String, path: String },

    /// A step closed a fieldset that was never opened.
    #[error("render(): steps[{index}] closes a fieldset that was never opened")]
    StackUnderflow { index: usize },

    /// The step sequence ended with fieldsets still open.
    #[error("render(): {open} fieldset(s) left open at end of steps")]
    UnclosedFieldsets { open: usize },
}

impl ProjectionError {
    /// Stable code for categorising this failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Check(err) => err.code(),
            Self::BadIdentifier { .. } => "BAD_IDENTIFIER",
            Self::EntryNotObject { .. } => "ENTRY_NOT_OBJECT",
            Self::StackUnderflow { .. } => "STACK_UNDERFLOW",
            Self::UnclosedFieldsets { .. } => "UNCLOSED_FIELDSETS",
        }
    }
}
