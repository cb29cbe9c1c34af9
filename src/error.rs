//! Error types for the deployment orchestrator.
//!
//! Explicit, typed errors. No `anyhow` leakage.
//!
//! Two layers. [`ProviderError`] is what every boundary call returns: it
//! carries a structured [`ErrorKind`] so callers decide fatal-vs-tolerable by
//! tag, never by matching message text. [`DeployError`] is what the
//! orchestrator surfaces once it has attached the failing step.

/// Structured classification of a control-plane failure.
///
/// Providers bury this in error codes; backend implementations are expected
/// to translate their SDK's codes into one of these tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The target resource does not exist.
    NotFound,
    /// The resource or permission statement already exists.
    AlreadyExists,
    /// The provider throttled the request. The only retryable kind.
    Throttled,
    /// Everything else: access denied, validation, network.
    Other,
}

/// A failure reported by a single control-plane call.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ProviderError {
    pub kind: ErrorKind,
    /// Provider-specific error code, e.g. `ResourceNotFoundException`.
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, code, message)
    }

    pub fn already_exists(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyExists, code, message)
    }

    pub fn throttled(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Throttled, code, message)
    }

    pub fn other(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Other, code, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    pub fn is_already_exists(&self) -> bool {
        self.kind == ErrorKind::AlreadyExists
    }

    pub fn is_throttled(&self) -> bool {
        self.kind == ErrorKind::Throttled
    }
}

/// Orchestrator-level error.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// A deploy step failed and could not be recovered.
    #[error("deploy step {step} failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: ProviderError,
    },

    /// A boundary call failed before a step label was attached.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The caller-supplied deployment spec is unusable.
    #[error("invalid deployment spec: {0}")]
    InvalidSpec(String),

    /// Log delivery wiring failed permanently. This variant is never
    /// retried, throttled or not.
    #[error("deploy step {step} halted: {source}")]
    Halted {
        step: &'static str,
        #[source]
        source: ProviderError,
    },
}

impl DeployError {
    /// Whether the retry executor may try this again.
    pub fn is_throttled(&self) -> bool {
        match self {
            DeployError::Provider(err) => err.is_throttled(),
            DeployError::Step { .. } | DeployError::InvalidSpec(_) | DeployError::Halted { .. } => {
                false
            }
        }
    }

    /// Attach the failing step's name. A label already present wins.
    pub(crate) fn at_step(self, step: &'static str) -> Self {
        match self {
            DeployError::Provider(source) => DeployError::Step { step, source },
            other => other,
        }
    }
}
