use thiserror::Error;

/// Result type for stepdefs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for stepdefs operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parsing errors when processing source code
    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },

    /// A source shape the engine relies on did not hold
    #[error("Assertion error: {0}")]
    Assertion(String),

    /// The parent chain of a member path is deeper than the resolver allows
    #[error("Parent chain depth limit ({depth}) exceeded while resolving {path}")]
    DepthLimit { path: String, depth: usize },

    /// Catalog (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Any other error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a parse error
    pub fn parse(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Creates an assertion error
    pub fn assertion(msg: impl Into<String>) -> Self {
        Self::Assertion(msg.into())
    }

    /// Creates a depth limit error
    pub fn depth_limit(path: impl Into<String>, depth: usize) -> Self {
        Self::DepthLimit {
            path: path.into(),
            depth,
        }
    }

    /// Adds context to any error
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// True for errors raised because the input did not have an expected shape
    pub fn is_fatal_shape(&self) -> bool {
        matches!(self, Self::Assertion(_) | Self::DepthLimit { .. })
    }
}

/// Fails with an [`Error::Assertion`] when `condition` does not hold
pub fn ensure(condition: bool, msg: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::assertion(msg()))
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}
