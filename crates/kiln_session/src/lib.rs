pub mod config;
pub mod diagnostics;

use diagnostics::{Diagnostic, DiagnosticEmitter, Severity};

pub struct ErrorsEmitted;

/// State shared across one driver invocation: where diagnostics go.
pub struct Session<D: DiagnosticEmitter> {
    pub diagnostics: D,
}

impl<D: DiagnosticEmitter> Session<D> {
    pub fn new(diagnostics: D) -> Self {
        Self { diagnostics }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) -> Result<(), ErrorsEmitted> {
        let severity = diagnostic.severity;

        self.diagnostics.emit_diagnostic(diagnostic);

        if severity < Severity::Error {
            Ok(())
        } else {
            Err(ErrorsEmitted)
        }
    }
}
