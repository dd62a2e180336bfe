pub type Result<T> = std::result::Result<T, Error>;

/// Fatal structural errors. These indicate caller-supplied corrupt input and abort the
/// operation that detected them; no partially rebuilt graph is ever installed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("node {child} references parent node {parent}, which is not in the collection")]
    MissingParent { child: String, parent: String },

    #[error("parent chain of node {node} contains a cycle")]
    ParentCycle { node: String },
}

impl Error {
    /// Stable string code, matching the codes emitted on the recoverable channel.
    pub fn code(&self) -> &'static str {
        match self {
            Error::MissingParent { .. } => "004",
            Error::ParentCycle { .. } => "011",
        }
    }
}

/// Recoverable conditions. These are reported through the error channel and never thrown;
/// the operation that hit them degrades gracefully and continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A node with a parent-constrained extent has no parent or no measured dimensions.
    ParentExtent,
    /// An edge references a marker type that is not recognized.
    UnknownMarker,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::ParentExtent => "005",
            ErrorCode::UnknownMarker => "009",
        }
    }
}

pub type OnError = Box<dyn Fn(ErrorCode, &str)>;

/// Optional-handler error channel. Reports are forwarded to the configured handler if one is
/// present; either way they end up in the trace log.
#[derive(Default)]
pub struct ErrorChannel {
    handler: Option<OnError>,
}

impl std::fmt::Debug for ErrorChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorChannel")
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

impl ErrorChannel {
    pub fn new(handler: OnError) -> Self {
        Self {
            handler: Some(handler),
        }
    }

    pub fn set_handler(&mut self, handler: Option<OnError>) {
        self.handler = handler;
    }

    pub fn report(&self, code: ErrorCode, message: &str) {
        tracing::warn!(code = code.code(), detail = message, "recoverable error");
        if let Some(handler) = &self.handler {
            handler(code, message);
        }
    }
}
