//! # Transform Warnings
//!
//! Data-shape problems never abort a transform. A malformed link token, a
//! credential reference the store cannot resolve, or a payload that matches
//! no known layout each becomes a [`TransformWarning`] carried next to the
//! best-effort output in [`Transformed`]. Each warning is also logged at
//! `warn` level when recorded.

use serde::Serialize;

use crate::section::SectionKind;

/// A recoverable problem found while transforming resume data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TransformWarning {
    /// A `credentialLink` token was dropped.
    #[serde(rename_all = "camelCase")]
    MalformedToken {
        section: SectionKind,
        index: usize,
        position: usize,
        detail: String,
    },
    /// A credential reference had no body in the credential store.
    #[serde(rename_all = "camelCase")]
    UnresolvableReference {
        section: SectionKind,
        index: usize,
        reference: String,
    },
    /// The payload matched no known resume layout.
    #[serde(rename_all = "camelCase")]
    SchemaMismatch { detail: String },
}

impl std::fmt::Display for TransformWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedToken {
                section,
                index,
                position,
                detail,
            } => write!(
                f,
                "{section}[{index}]: dropped credential link token {position}: {detail}"
            ),
            Self::UnresolvableReference {
                section,
                index,
                reference,
            } => write!(
                f,
                "{section}[{index}]: credential {reference:?} not found in store"
            ),
            Self::SchemaMismatch { detail } => write!(f, "unrecognized payload: {detail}"),
        }
    }
}

/// A transform result plus the warnings raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed<T> {
    pub value: T,
    pub warnings: Vec<TransformWarning>,
}

impl<T> Transformed<T> {
    /// A result with no warnings.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_parts(self) -> (T, Vec<TransformWarning>) {
        (self.value, self.warnings)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Transformed<U> {
        Transformed {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

/// Log and collect a warning.
pub(crate) fn record(warnings: &mut Vec<TransformWarning>, warning: TransformWarning) {
    tracing::warn!(%warning, "resume transform warning");
    warnings.push(warning);
}
