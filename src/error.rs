//! Application error type.
//!
//! Every fallible path returns an [`AppError`] carrying the process exit code
//! alongside a human-readable message. Exit codes:
//!
//! - `2`: the source could not be read, a CLI value was invalid, or an export failed
//! - `3`: the dataset did not match the expected schema
//! - `4`: terminal/TUI failure

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub const SOURCE: u8 = 2;
    pub const PARSE: u8 = 3;
    pub const TERMINAL: u8 = 4;

    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Missing/unreadable input, bad CLI value, failed export.
    pub fn source(message: impl Into<String>) -> Self {
        Self::new(Self::SOURCE, message)
    }

    /// Input that was read but does not match the schema.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(Self::PARSE, message)
    }

    pub fn terminal(message: impl Into<String>) -> Self {
        Self::new(Self::TERMINAL, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
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
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
