use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub enum Severity {
    Warning,
    Error,
}

/// A user-facing message. Codegen diagnostics are not anchored to source
/// text, so there are no spans or snippets here.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            message: None,
        }
    }

    pub fn warning() -> Self {
        Self::new(Severity::Warning)
    }

    pub fn error() -> Self {
        Self::new(Severity::Error)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

pub trait DiagnosticEmitter {
    fn emit_diagnostic(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticEmitter for Vec<Diagnostic> {
    fn emit_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

#[derive(Debug)]
pub struct PrettyDiagnosticEmitter {
    pub stream: StandardStream,
}

impl Default for PrettyDiagnosticEmitter {
    fn default() -> Self {
        Self {
            stream: StandardStream::stderr(ColorChoice::Auto),
        }
    }
}

impl DiagnosticEmitter for PrettyDiagnosticEmitter {
    fn emit_diagnostic(&mut self, diagnostic: Diagnostic) {
        write_diagnostic(&mut self.stream, &diagnostic).expect("failed to emit diagnostic");
    }
}

fn write_diagnostic(stream: &mut StandardStream, diagnostic: &Diagnostic) -> std::io::Result<()> {
    let (label, color) = match diagnostic.severity {
        Severity::Warning => ("warning", Color::Yellow),
        Severity::Error => ("error", Color::Red),
    };

    stream.set_color(ColorSpec::new().set_bold(true).set_fg(Some(color)))?;
    write!(stream, "{label}")?;
    stream.reset()?;

    match &diagnostic.message {
        Some(message) => writeln!(stream, ": {message}"),
        None => writeln!(stream),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_carries_severity_and_message() {
        let diagnostic = Diagnostic::warning().with_message("ignoring relax-all");

        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(diagnostic.message.as_deref(), Some("ignoring relax-all"));
        assert!(Severity::Warning < Severity::Error);
    }
}
