//! Unified error types for milkrate.
//!
//! The matcher and the leaderboard aggregator are infallible; errors only
//! arise at the edges (loading input files, configuration) and inside the
//! compressor, where they are logged and downgraded to "keep the original".

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for milkrate operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MilkrateError {
    /// Errors while reading rows or candidate lists
    #[error("Failed to load input: {context}")]
    Input {
        context: String,
        #[source]
        source: InputErrorKind,
    },

    /// Errors while decoding or re-encoding an image
    #[error("Image compression failed: {context}")]
    Compression {
        context: String,
        #[source]
        source: CompressionErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Specific input error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum InputErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Expected a JSON array of {0}")]
    NotAnArray(&'static str),
}

/// Specific compression error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CompressionErrorKind {
    #[error("Could not decode image: {0}")]
    Decode(String),

    #[error("Could not encode image: {0}")]
    Encode(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, MilkrateError>;

impl MilkrateError {
    pub fn input(context: impl Into<String>, source: InputErrorKind) -> Self {
        Self::Input {
            context: context.into(),
            source,
        }
    }

    pub fn compression(context: impl Into<String>, source: CompressionErrorKind) -> Self {
        Self::Compression {
            context: context.into(),
            source,
        }
    }

    /// Wrap an IO failure on `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: Some(path.into()),
            message: source.to_string(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Prefix the human-readable part of the error with `outer`.
    #[must_use]
    pub fn prefixed(self, outer: &str) -> Self {
        let join = |inner: String| {
            if inner.is_empty() {
                outer.to_string()
            } else {
                format!("{outer}: {inner}")
            }
        };
        match self {
            Self::Input { context, source } => Self::Input {
                context: join(context),
                source,
            },
            Self::Compression { context, source } => Self::Compression {
                context: join(context),
                source,
            },
            Self::Io {
                path,
                message,
                source,
            } => Self::Io {
                path,
                message: join(message),
                source,
            },
            Self::Config(message) => Self::Config(join(message)),
        }
    }
}

impl From<std::io::Error> for MilkrateError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for MilkrateError {
    fn from(err: serde_json::Error) -> Self {
        Self::input("parsing JSON", InputErrorKind::InvalidJson(err.to_string()))
    }
}

/// `with_context` for any result whose error converts into [`MilkrateError`].
///
/// The closure only runs on the error path. Nested calls read outermost
/// first: `"writing image out.jpg: No such file or directory"`.
pub trait ErrorContext<T> {
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: AsRef<str>;
}

impl<T, E: Into<MilkrateError>> ErrorContext<T> for std::result::Result<T, E> {
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: AsRef<str>,
    {
        self.map_err(|e| e.into().prefixed(f().as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MilkrateError::input("rows.json", InputErrorKind::NotAnArray("taste tests"));
        assert_eq!(err.to_string(), "Failed to load input: rows.json");

        let err = MilkrateError::compression(
            "photo.heic",
            CompressionErrorKind::Decode("unsupported".to_string()),
        );
        assert!(err.to_string().starts_with("Image compression failed"));
    }

    #[test]
    fn test_io_error_carries_path() {
        let err = MilkrateError::io(
            "/data/brands.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("/data/brands.json"));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_with_context_nests_outermost_first() {
        fn load() -> Result<()> {
            Err(MilkrateError::input(
                "brands.json",
                InputErrorKind::InvalidJson("eof".to_string()),
            ))
        }
        fn sync_catalogue() -> Result<()> {
            load().with_context(|| "refreshing brands")
        }

        match sync_catalogue().with_context(|| "nightly sync") {
            Err(MilkrateError::Input { context, .. }) => {
                assert_eq!(context, "nightly sync: refreshing brands: brands.json");
            }
            other => panic!("expected an input error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_is_lazy() {
        let mut evaluated = false;
        let ok: std::result::Result<u8, std::io::Error> = Ok(1);
        let _ = ok.with_context(|| {
            evaluated = true;
            "unused"
        });
        assert!(!evaluated);
    }

    #[test]
    fn test_io_context_goes_into_message() {
        let failed: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        let err = failed.with_context(|| "writing image out.jpg").unwrap_err();
        assert_eq!(
            err.to_string(),
            "IO error at None: writing image out.jpg: denied"
        );
    }

    #[test]
    fn test_serde_json_error_becomes_input_error() {
        let parsed: std::result::Result<Vec<u32>, _> = serde_json::from_str("[1, 2,");
        let err: MilkrateError = parsed.unwrap_err().into();
        assert!(matches!(
            err,
            MilkrateError::Input {
                source: InputErrorKind::InvalidJson(_),
                ..
            }
        ));
    }
}
