//! Exit codes for the oscli application
//!
//! These follow the BSD sysexits.h conventions where possible, with a few
//! application-specific codes above 100.

/// Process exit code reported for each kind of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = exitcode::OK,
    /// Command line usage error
    UsageError = exitcode::USAGE,
    /// Malformed data received or supplied
    DataError = exitcode::DATAERR,
    /// The requested resource does not exist
    NotFound = exitcode::NOUSER,
    /// No endpoint could be resolved for a service
    Unavailable = exitcode::UNAVAILABLE,
    /// Internal software error
    SoftwareError = exitcode::SOFTWARE,
    /// Local file could not be read or written
    IoError = exitcode::IOERR,
    /// Configuration error
    ConfigError = exitcode::CONFIG,
    /// Login or token issues
    AuthError = 100,
    /// Connection or communication issues
    NetworkError = 101,
    /// Remote API returned an error
    ApiError = 102,
}

impl ExitCode {
    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn message(&self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::UsageError => "Command line usage error",
            ExitCode::DataError => "Data format error",
            ExitCode::NotFound => "Resource not found",
            ExitCode::Unavailable => "Service unavailable",
            ExitCode::SoftwareError => "Internal software error",
            ExitCode::IoError => "Input/output error",
            ExitCode::ConfigError => "Configuration error",
            ExitCode::AuthError => "Authentication error",
            ExitCode::NetworkError => "Network communication error",
            ExitCode::ApiError => "Remote API error",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sysexits_values() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::UsageError.code(), 64);
        assert_eq!(ExitCode::NotFound.code(), 67);
        assert_eq!(ExitCode::ConfigError.code(), 78);
        assert_eq!(i32::from(ExitCode::ApiError), 102);
    }
}
