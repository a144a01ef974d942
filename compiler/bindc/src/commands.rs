//! Command handlers for the `bindc` CLI.
//!
//! Handlers render to a `String`; `main` decides where it goes.

use bind_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use bind_diagnostic::{Diagnostic, ErrorCode};
use bind_ir::StringInterner;
use bind_parse::TypeHint;

/// Token stream of `source`, one token per line.
pub fn lex_expr(source: &str) -> String {
    let interner = StringInterner::new();
    let lexed = bind_lexer::lex(source, &interner);
    let mut out = format!("Tokens for `{source}` ({} tokens):\n", lexed.tokens.len());
    for tok in lexed.tokens.iter() {
        out.push_str(&format!("  {:?} @ {}\n", tok.kind, tok.span));
    }
    let diagnostics: Vec<Diagnostic> = lexed.errors.iter().map(|e| e.to_diagnostic()).collect();
    out.push_str(&render_diagnostics(source, &diagnostics));
    out
}

/// S-expression of `source`, or its rendered syntax error.
pub fn parse_expr(source: &str) -> Result<String, String> {
    let interner = StringInterner::new();
    match bind_parse::parse(source, TypeHint::None, &interner) {
        Ok(parsed) => Ok(bind_parse::to_sexpr(&parsed, &interner)),
        Err(err) => Err(render_diagnostics(source, &[err.to_diagnostic()])),
    }
}

/// Description of an error code such as `E2005`.
pub fn explain_error(code: &str) -> Result<String, String> {
    let code: ErrorCode = code.parse()?;
    Ok(format!("{code}: {}", code.description()))
}

/// Render diagnostics without colors.
pub fn render_diagnostics(source: &str, diagnostics: &[Diagnostic]) -> String {
    let mut buffer = Vec::new();
    {
        let mut emitter = TerminalEmitter::new(&mut buffer, source, ColorMode::Never, false);
        for diagnostic in diagnostics {
            emitter.emit(diagnostic);
        }
        emitter.flush();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests;
