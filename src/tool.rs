//! Backup tool boundary.
//!
//! Bulk dump/load in a format compatible with third-party dump tools is
//! handled outside this crate; the tool here only owns option handling and
//! exit status.

use std::io::Write;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database location must not be empty")]
    MissingDsn,
    #[error("'{command}' against {dsn} requires an external bulk transfer backend")]
    Unsupported { command: &'static str, dsn: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOptions {
    /// Print the version and exit.
    pub version: bool,
}

#[derive(Debug, Clone)]
pub struct Tool {
    dsn: String,
    options: ToolOptions,
}

impl Tool {
    pub fn new(dsn: impl Into<String>, options: ToolOptions) -> Self {
        Self {
            dsn: dsn.into(),
            options,
        }
    }

    pub fn version_line() -> String {
        format!("docmapper backup tool - version: {}", env!("CARGO_PKG_VERSION"))
    }

    pub fn dump(&self, out: &mut impl Write) -> Result<(), ToolError> {
        self.run("dump", out)
    }

    pub fn load(&self, out: &mut impl Write) -> Result<(), ToolError> {
        self.run("load", out)
    }

    fn run(&self, command: &'static str, out: &mut impl Write) -> Result<(), ToolError> {
        if self.options.version {
            writeln!(out, "{}", Self::version_line())?;
            return Ok(());
        }
        if self.dsn.trim().is_empty() {
            return Err(ToolError::MissingDsn);
        }
        log::info!("{command} requested for {}", self.dsn);
        Err(ToolError::Unsupported {
            command,
            dsn: self.dsn.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_flag_prints_and_succeeds() {
        let tool = Tool::new("http://localhost:5984/test", ToolOptions { version: true });
        let mut out = Vec::new();
        tool.dump(&mut out).unwrap();
        tool.load(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("docmapper backup tool - version: "));
    }

    #[test]
    fn transfer_without_backend_fails() {
        let tool = Tool::new("http://localhost:5984/test", ToolOptions::default());
        let mut out = Vec::new();
        assert!(matches!(tool.dump(&mut out), Err(ToolError::Unsupported { command: "dump", .. })));
        assert!(out.is_empty());

        let tool = Tool::new("", ToolOptions::default());
        assert!(matches!(tool.load(&mut out), Err(ToolError::MissingDsn)));
    }
}
