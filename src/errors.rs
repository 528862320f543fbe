//! Error taxonomy for the harness.
//!
//! - [`InstanceError`]: an instance that cannot exist (no terminals) or a fixture whose text does not
//!   follow the exchange format. Parse failures carry the offending span so they render as source
//!   diagnostics.
//! - [`InvocationError`]: a solver process that could not be started or waited on.
//! - [`HarnessError`]: everything that stops a campaign before or while it runs.
//!
//! A solver disagreeing with its oracle is *not* an error; see [`crate::oracle::Verdict`].

use std::io;
use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Errors raised while building or reading a [`crate::instance::ProblemInstance`].
#[derive(Debug, Error, Diagnostic)]
pub enum InstanceError {
    #[error("an instance needs at least one terminal")]
    #[diagnostic(code(instance::empty))]
    Empty,

    #[error("{requested} terminals requested, at most {limit} are supported")]
    #[diagnostic(code(instance::too_large))]
    TooLarge { requested: usize, limit: usize },

    #[error("malformed instance: {message}")]
    #[diagnostic(
        code(instance::malformed),
        help("expected a terminal count followed by one `x y z` line per terminal")
    )]
    Malformed {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },
}

impl InstanceError {
    pub(crate) fn malformed(
        name: &str,
        text: &str,
        offset: usize,
        len: usize,
        message: impl Into<String>,
    ) -> Self {
        InstanceError::Malformed {
            message: message.into(),
            src: NamedSource::new(name, text.to_string()),
            span: (offset, len).into(),
        }
    }
}

/// Errors from spawning or awaiting a solver process.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("failed to launch `{binary}`: {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors that abort a campaign.
///
/// Configuration errors are raised before any solver runs; I/O errors can also happen mid-campaign
/// when the shared instance file cannot be rewritten.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("configuration error: {0}")]
    #[diagnostic(code(harness::configuration))]
    Configuration(String),

    #[error("fixture `{name}` is invalid")]
    #[diagnostic(code(harness::fixture))]
    Fixture {
        name: String,
        #[source]
        #[diagnostic_source]
        source: InstanceError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Instance(#[from] InstanceError),

    #[error("I/O error on `{}`: {source}", path.display())]
    #[diagnostic(code(harness::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HarnessError {
    pub fn configuration(message: impl Into<String>) -> Self {
        HarnessError::Configuration(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HarnessError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the campaign was rejected before entering `Running`.
    pub fn is_configuration(&self) -> bool {
        matches!(self, HarnessError::Configuration(_) | HarnessError::Fixture { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_carries_span() {
        let err = InstanceError::malformed("i01", "3\n0 0 x\n", 6, 1, "bad coordinate");
        match err {
            InstanceError::Malformed { span, message, .. } => {
                assert_eq!(span.offset(), 6);
                assert_eq!(span.len(), 1);
                assert_eq!(message, "bad coordinate");
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_configuration_classification() {
        assert!(HarnessError::configuration("min > max").is_configuration());
        let fixture = HarnessError::Fixture {
            name: "i01".into(),
            source: InstanceError::Empty,
        };
        assert!(fixture.is_configuration());
        let io = HarnessError::io("instance.txt", io::Error::other("disk full"));
        assert!(!io.is_configuration());
    }

    #[test]
    fn test_io_display_names_path() {
        let err = HarnessError::io("/tmp/x", io::Error::other("denied"));
        assert_eq!(err.to_string(), "I/O error on `/tmp/x`: denied");
    }
}
