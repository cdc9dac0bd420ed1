use std::path::Path;

/// Coarse error category, mapped onto a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required input file is absent or unreadable.
    InputMissing,
    /// A check-frequency file contains a non-numeric line.
    MalformedFrequencyEntry,
    /// A network file is not valid 2-port Touchstone data.
    MalformedNetwork,
    /// Invalid flags, band ranges or threshold windows.
    Config,
    /// Nothing left to evaluate (e.g. every device failed to load).
    NoDevices,
    /// Writing a report, export or plot failed.
    Output,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::InputMissing
            | ErrorKind::MalformedFrequencyEntry
            | ErrorKind::MalformedNetwork
            | ErrorKind::Config => 2,
            ErrorKind::NoDevices => 3,
            ErrorKind::Output => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn input_missing(what: &str, path: &Path, err: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorKind::InputMissing,
            format!("Failed to read {what} '{}': {err}", path.display()),
        )
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Output, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code())
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
