//! External tool invocation and the site-builder seam.

use raglib_core::cli::ServePort;
use raglib_core::config::SiteConfig;
use raglib_core::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Captured output of a successful tool run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

/// Runs `program` with `args` in `cwd`, capturing its output.
///
/// The program is resolved on `PATH` first so a missing binary is reported
/// distinctly from a failing one. No timeout is imposed.
///
/// # Errors
///
/// Returns [`Error::ExternalToolError`] if the binary is not found, cannot
/// be spawned, or exits with a nonzero status.
pub fn run_tool(program: &str, args: &[String], cwd: &Path) -> Result<ToolOutput> {
    let binary = locate(program)?;
    debug!("Running {program} {} in {}", args.join(" "), cwd.display());

    let output = Command::new(&binary)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| Error::ExternalToolError {
            tool: program.to_string(),
            message: format!("failed to spawn: {e}"),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    if !output.status.success() {
        return Err(Error::ExternalToolError {
            tool: program.to_string(),
            message: format!("exited with {}: {}", output.status, stderr.trim()),
        });
    }
    Ok(ToolOutput { stdout, stderr })
}

fn locate(program: &str) -> Result<PathBuf> {
    which::which(program).map_err(|e| Error::ExternalToolError {
        tool: program.to_string(),
        message: format!("not found on PATH ({e})"),
    })
}

/// Builds and serves the documentation site.
#[cfg_attr(test, mockall::automock)]
pub trait SiteBuilder {
    /// Builds the site for the project at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExternalToolError`] if the builder fails.
    fn build(&self, root: &Path) -> Result<ToolOutput>;

    /// Serves the site on `port` until interrupted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExternalToolError`] if the builder fails.
    fn serve(&self, root: &Path, port: ServePort) -> Result<()>;
}

/// [`SiteBuilder`] backed by the `mkdocs` command line.
///
/// # Examples
///
/// ```
/// use raglib_core::config::SiteConfig;
/// use raglib_pipeline::MkDocs;
///
/// let mkdocs = MkDocs::from_config(&SiteConfig::default());
/// assert_eq!(mkdocs.build_args(), ["build", "--config-file", "mkdocs.yml"]);
/// ```
#[derive(Debug, Clone)]
pub struct MkDocs {
    command: String,
    config_file: PathBuf,
}

impl MkDocs {
    /// Creates a builder from site configuration.
    #[must_use]
    pub fn from_config(site: &SiteConfig) -> Self {
        Self {
            command: site.command.clone(),
            config_file: site.config_file.clone(),
        }
    }

    /// Arguments passed for a build.
    #[must_use]
    pub fn build_args(&self) -> Vec<String> {
        vec![
            "build".to_string(),
            "--config-file".to_string(),
            self.config_file.display().to_string(),
        ]
    }

    /// Arguments passed to serve on `port`.
    #[must_use]
    pub fn serve_args(&self, port: ServePort) -> Vec<String> {
        let mut args = self.build_args();
        args[0] = "serve".to_string();
        args.push("--dev-addr".to_string());
        args.push(port.dev_addr());
        args
    }
}

impl SiteBuilder for MkDocs {
    fn build(&self, root: &Path) -> Result<ToolOutput> {
        run_tool(&self.command, &self.build_args(), root)
    }

    fn serve(&self, root: &Path, port: ServePort) -> Result<()> {
        let binary = locate(&self.command)?;
        let status = Command::new(binary)
            .args(self.serve_args(port))
            .current_dir(root)
            .status()
            .map_err(|e| Error::ExternalToolError {
                tool: self.command.clone(),
                message: format!("failed to spawn: {e}"),
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::ExternalToolError {
                tool: self.command.clone(),
                message: format!("exited with {status}"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_args_include_dev_addr() {
        let mkdocs = MkDocs::from_config(&SiteConfig::default());
        assert_eq!(
            mkdocs.serve_args(ServePort::new(9000).unwrap()),
            ["serve", "--config-file", "mkdocs.yml", "--dev-addr", "localhost:9000"]
        );
    }

    #[test]
    fn test_missing_binary_is_tool_error() {
        let err = run_tool("raglib-no-such-binary", &[], Path::new(".")).unwrap_err();
        assert!(matches!(
            err,
            Error::ExternalToolError { ref tool, .. } if tool == "raglib-no-such-binary"
        ));
    }

    #[test]
    fn test_missing_site_builder_reported() {
        let site = SiteConfig {
            command: "raglib-no-such-mkdocs".to_string(),
            ..SiteConfig::default()
        };
        assert!(MkDocs::from_config(&site).build(Path::new(".")).is_err());
    }
}
