//! Terminal output for diagnostics.
//!
//! Renders `error[E2004]: message` headers followed by `line:col` labels and
//! an underlined source excerpt, with optional ANSI colors.

use std::io::{self, Write};

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, Severity};

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const WARNING: &str = "\x1b[1;33m";
    pub const NOTE: &str = "\x1b[1;36m";
    pub const HELP: &str = "\x1b[1;32m";
    pub const BOLD: &str = "\x1b[1m";
    pub const SECONDARY: &str = "\x1b[1;34m";
    pub const RESET: &str = "\x1b[0m";
}

/// Color output mode for the terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Use colors when the output is a TTY.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Trait for emitting diagnostics.
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic);

    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            self.emit(diag);
        }
    }

    fn flush(&mut self);
}

/// Human-readable emitter over a source text.
pub struct TerminalEmitter<'src, W: Write> {
    writer: W,
    colors: bool,
    source: &'src str,
    lines: LineOffsetTable,
}

impl<'src, W: Write> TerminalEmitter<'src, W> {
    pub fn new(writer: W, source: &'src str, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            source,
            lines: LineOffsetTable::build(source),
        }
    }

    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn severity_color(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Note => colors::NOTE,
        }
    }

    /// Source line plus a `^^^` (primary) or `---` (secondary) underline.
    fn write_excerpt(&mut self, start: u32, end: u32, primary: bool) {
        let (line, col) = self.lines.offset_to_line_col(self.source, start);
        let text = self.lines.line_text(self.source, line);
        let width = self
            .source
            .get(start as usize..end as usize)
            .map_or(1, |s| s.chars().count().max(1));
        let gutter = line.to_string();
        let pad = " ".repeat(gutter.len());

        let _ = writeln!(self.writer, "  {pad} |");
        let _ = writeln!(self.writer, "  {gutter} | {text}");
        let marker = if primary { "^" } else { "-" }.repeat(width);
        let _ = write!(self.writer, "  {pad} | {}", " ".repeat((col - 1) as usize));
        let color = if primary { colors::ERROR } else { colors::SECONDARY };
        self.write_colored(&marker, color);
        let _ = writeln!(self.writer);
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<'_, W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        let severity = diagnostic.severity.to_string();
        self.write_colored(&severity, Self::severity_color(diagnostic.severity));
        let code = format!("[{}]", diagnostic.code);
        self.write_colored(&code, colors::BOLD);
        let _ = writeln!(self.writer, ": {}", diagnostic.message);

        for label in &diagnostic.labels {
            let (line, col) = self.lines.offset_to_line_col(self.source, label.span.start);
            let marker = if label.is_primary { "-->" } else { ":::" };
            let _ = write!(self.writer, "  {marker} {line}:{col}: ");
            let color = if label.is_primary {
                colors::ERROR
            } else {
                colors::SECONDARY
            };
            self.write_colored(&label.message, color);
            let _ = writeln!(self.writer);
            if !self.source.is_empty() {
                self.write_excerpt(label.span.start, label.span.end, label.is_primary);
            }
        }

        for note in &diagnostic.notes {
            let _ = write!(self.writer, "  = ");
            self.write_colored("note", colors::BOLD);
            let _ = writeln!(self.writer, ": {note}");
        }

        for suggestion in &diagnostic.suggestions {
            let _ = write!(self.writer, "  = ");
            self.write_colored("help", colors::HELP);
            let _ = writeln!(self.writer, ": {suggestion}");
        }

        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

/// Emitter for stderr.
pub fn stderr_emitter(source: &str, mode: ColorMode, is_tty: bool) -> TerminalEmitter<'_, io::Stderr> {
    TerminalEmitter::new(io::stderr(), source, mode, is_tty)
}

#[cfg(test)]
mod tests;
