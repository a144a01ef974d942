use bind_diagnostic::DiagnosticConfig;

/// Driver configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompilerOptions {
    pub diagnostics: DiagnosticConfig,
    /// Compile identical binding requests once and share the unit.
    pub share_delegates: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            diagnostics: DiagnosticConfig::default(),
            share_delegates: true,
        }
    }
}

impl CompilerOptions {
    /// Every diagnostic, no sharing. Used by tests.
    pub fn unlimited() -> Self {
        CompilerOptions {
            diagnostics: DiagnosticConfig::unlimited(),
            share_delegates: false,
        }
    }
}
