//! CLI-specific types.
//!
//! # Examples
//!
//! ```
//! use raglib_core::cli::{ExitCode, ServePort};
//!
//! let code = ExitCode::from_success(true);
//! assert_eq!(code.as_i32(), 0);
//!
//! let port: ServePort = "8080".parse().unwrap();
//! assert_eq!(port.get(), 8080);
//! ```

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// CLI exit code.
///
/// Every command exits with 0 on success and 1 on failure.
///
/// # Examples
///
/// ```
/// use raglib_core::cli::ExitCode;
///
/// let code = ExitCode::SUCCESS;
/// assert!(code.is_success());
///
/// let code = ExitCode::from_i32(1);
/// assert!(!code.is_success());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Successful execution (exit code 0).
    pub const SUCCESS: Self = Self(0);

    /// Any failure (exit code 1).
    pub const ERROR: Self = Self(1);

    /// Creates an exit code from an integer value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        Self(code)
    }

    /// Maps a command's success flag to an exit code.
    #[must_use]
    pub const fn from_success(success: bool) -> Self {
        if success { Self::SUCCESS } else { Self::ERROR }
    }

    /// Returns the exit code as an integer.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Checks if the exit code represents success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }
}

impl Default for ExitCode {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Port for the local documentation preview server.
///
/// Port 0 is rejected: the preview URL must be known before the server
/// starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServePort(u16);

impl ServePort {
    /// Default preview port.
    pub const DEFAULT: Self = Self(8000);

    /// Creates a validated port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] for port 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use raglib_core::cli::ServePort;
    ///
    /// assert!(ServePort::new(8000).is_ok());
    /// assert!(ServePort::new(0).is_err());
    /// ```
    pub fn new(port: u16) -> crate::Result<Self> {
        if port == 0 {
            return Err(Error::ValidationError {
                field: "port".to_string(),
                reason: "must be between 1 and 65535".to_string(),
            });
        }
        Ok(Self(port))
    }

    /// Returns the port number.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }

    /// Returns the `localhost:PORT` address passed to the site builder.
    #[must_use]
    pub fn dev_addr(&self) -> String {
        format!("localhost:{}", self.0)
    }
}

impl Default for ServePort {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ServePort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ServePort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let port = s.trim().parse::<u16>().map_err(|_| Error::ValidationError {
            field: "port".to_string(),
            reason: format!("'{s}' is not a valid port number"),
        })?;
        Self::new(port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_constants() {
        assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
        assert_eq!(ExitCode::ERROR.as_i32(), 1);
    }

    #[test]
    fn test_exit_code_from_success() {
        assert_eq!(ExitCode::from_success(true), ExitCode::SUCCESS);
        assert_eq!(ExitCode::from_success(false), ExitCode::ERROR);
    }

    #[test]
    fn test_exit_code_into_i32() {
        let value: i32 = ExitCode::ERROR.into();
        assert_eq!(value, 1);
        assert_eq!(ExitCode::default(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_serve_port_parse() {
        assert_eq!("8000".parse::<ServePort>().unwrap(), ServePort::DEFAULT);
        assert!("0".parse::<ServePort>().is_err());
        assert!("70000".parse::<ServePort>().is_err());
        assert!("http".parse::<ServePort>().is_err());
    }

    #[test]
    fn test_serve_port_dev_addr() {
        let port = ServePort::new(9001).unwrap();
        assert_eq!(port.dev_addr(), "localhost:9001");
        assert_eq!(port.to_string(), "9001");
    }
}
