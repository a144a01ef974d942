//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! A markup document carries many binding expressions; the driver compiles
//! all of them and funnels every failure through one queue so that an
//! error in one attribute never hides the others.
//!
//! Features:
//! - Error limit to prevent overwhelming output
//! - Deduplication of same-line errors
//! - Follow-on error filtering

use std::hash::{Hash, Hasher};

use bind_ir::Span;

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, ErrorCode};

/// Number of characters to use for message prefix deduplication.
const MESSAGE_PREFIX_LEN: usize = 30;

#[inline]
fn message_prefix_hash(msg: &str) -> u64 {
    let byte_end = msg
        .char_indices()
        .nth(MESSAGE_PREFIX_LEN)
        .map_or(msg.len(), |(idx, _)| idx);
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    msg[..byte_end].hash(&mut hasher);
    hasher.finish()
}

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before stopping (0 = unlimited).
    pub error_limit: usize,
    /// Filter out follow-on errors that result from previous errors.
    pub filter_follow_on: bool,
    /// Deduplicate diagnostics with same line and similar content.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 10,
            filter_follow_on: true,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            filter_follow_on: false,
            deduplicate: false,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct QueuedDiagnostic {
    diagnostic: Diagnostic,
    line: u32,
    column: u32,
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DiagnosticQueue {
    diagnostics: Vec<QueuedDiagnostic>,
    error_count: usize,
    /// Last line with a syntax error (for dedup).
    last_syntax_line: Option<u32>,
    /// Last (line, message prefix hash) for non-syntax error dedup.
    last_error: Option<(u32, u64)>,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Add a diagnostic at a known 1-based position.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic, line: u32, column: u32) -> bool {
        if self.limit_reached() {
            return false;
        }

        if self.config.filter_follow_on && Self::is_follow_on(&diag) {
            return false;
        }

        if self.config.deduplicate && self.is_duplicate(&diag, line) {
            return false;
        }

        let is_error = diag.is_error();
        if is_error {
            if diag.code.is_parser_error() {
                self.last_syntax_line = Some(line);
            } else {
                self.last_error = Some((line, message_prefix_hash(&diag.message)));
            }
            self.error_count += 1;
        }

        self.diagnostics.push(QueuedDiagnostic {
            diagnostic: diag,
            line,
            column,
        });
        true
    }

    /// Add a diagnostic, computing its position in `source` from the
    /// primary span.
    pub fn add_with_source(&mut self, diag: Diagnostic, table: &LineOffsetTable, source: &str) -> bool {
        let (line, column) = diag
            .primary_span()
            .map_or((1, 1), |span| table.offset_to_line_col(source, span.start));
        self.add(diag, line, column)
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Sort diagnostics by position and return them, clearing the queue.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let already_sorted = self
            .diagnostics
            .windows(2)
            .all(|w| (w[0].line, w[0].column) <= (w[1].line, w[1].column));

        if !already_sorted {
            self.diagnostics.sort_by_key(|d| (d.line, d.column));
        }

        let result: Vec<Diagnostic> = self.diagnostics.drain(..).map(|d| d.diagnostic).collect();

        self.error_count = 0;
        self.last_syntax_line = None;
        self.last_error = None;

        result
    }

    /// Get diagnostics without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().map(|d| &d.diagnostic)
    }

    /// Follow-on errors mention a type that only exists because of an
    /// earlier error.
    fn is_follow_on(diag: &Diagnostic) -> bool {
        diag.is_error() && diag.message.contains("<error>")
    }

    fn is_duplicate(&self, diag: &Diagnostic, line: u32) -> bool {
        if !diag.is_error() {
            return false;
        }

        if diag.code.is_parser_error() {
            self.last_syntax_line == Some(line)
        } else {
            self.last_error
                .is_some_and(|(last_line, last_hash)| {
                    last_line == line && message_prefix_hash(&diag.message) == last_hash
                })
        }
    }
}

/// Create a "too many errors" diagnostic.
#[cold]
pub fn too_many_errors(limit: usize, span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9002)
        .with_message(format!("aborting due to {limit} previous errors"))
        .with_label(span, "error limit reached here")
        .with_note("raise `DiagnosticConfig::error_limit` to see more")
}
