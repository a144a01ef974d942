//! Compilation sessions.
//!
//! A [`Session`] compiles the binding expressions of one enclosing
//! declaration. [`Session::compile_document`] compiles every expression of a
//! markup document; failures are collected, never fatal to the rest.

use std::rc::Rc;

use bind_compile::{compile_expression, BindingMode, CompiledExpr, TargetSlot};
use bind_diagnostic::span_utils::LineOffsetTable;
use bind_diagnostic::{Diagnostic, DiagnosticQueue};
use bind_ir::{ClassId, Type};
use bind_types::Scope;
use rustc_hash::FxHashMap;

use crate::host::HostModel;
use crate::options::CompilerOptions;

/// One expression to compile.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct BindingRequest {
    pub source: String,
    pub slot: TargetSlot,
    pub mode: BindingMode,
    /// Byte offset of `source` in the enclosing document.
    pub origin: u32,
}

impl BindingRequest {
    pub fn new(source: impl Into<String>, slot: Type) -> Self {
        BindingRequest {
            source: source.into(),
            slot: TargetSlot::new(slot),
            mode: BindingMode::Once,
            origin: 0,
        }
    }

    #[must_use]
    pub fn bidirectional(mut self) -> Self {
        self.mode = BindingMode::Bidirectional;
        self
    }

    #[must_use]
    pub fn at(mut self, origin: u32) -> Self {
        self.origin = origin;
        self
    }
}

/// Result of compiling a document.
#[derive(Debug, Default)]
pub struct DocumentOutput {
    /// One entry per request, `None` where compilation failed.
    pub results: Vec<Option<CompiledExpr>>,
    /// Sorted by position in the document.
    pub diagnostics: Vec<Diagnostic>,
}

impl DocumentOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Number of requests that compiled to a live binding.
    pub fn live_count(&self) -> usize {
        self.results
            .iter()
            .flatten()
            .filter(|c| c.is_live())
            .count()
    }
}

pub struct Session {
    host: Rc<HostModel>,
    scope: Scope,
    options: CompilerOptions,
}

impl Session {
    /// Session for expressions inside an instance of `this_class`.
    pub fn new(host: Rc<HostModel>, this_class: ClassId, options: CompilerOptions) -> Self {
        let scope = Scope::new(host.registry(), this_class, host.interner());
        Session {
            host,
            scope,
            options,
        }
    }

    pub fn host(&self) -> &Rc<HostModel> {
        &self.host
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Make `name` load local slot `slot` (a document id such as a sibling
    /// object). Shadows members of the enclosing class.
    pub fn declare_local(&mut self, name: &str, slot: u16, ty: Type) {
        let name = self.host.interner().intern(name);
        self.scope.insert_named(name, slot, ty);
    }

    /// Compile one request. Diagnostic spans are shifted by the request's
    /// origin.
    pub fn compile(&self, request: &BindingRequest) -> Result<CompiledExpr, Diagnostic> {
        compile_expression(
            &request.source,
            &request.slot,
            request.mode,
            &self.scope,
            self.host.registry(),
            self.host.interner(),
        )
        .map_err(|err| err.to_diagnostic().shifted(request.origin))
    }

    /// Compile every request of `document`.
    #[tracing::instrument(level = "debug", skip_all, fields(requests = requests.len()))]
    pub fn compile_document(&self, document: &str, requests: &[BindingRequest]) -> DocumentOutput {
        let table = LineOffsetTable::build(document);
        let mut queue = DiagnosticQueue::with_config(self.options.diagnostics.clone());
        let mut shared: FxHashMap<(&str, &TargetSlot, BindingMode), CompiledExpr> =
            FxHashMap::default();
        let mut results = Vec::with_capacity(requests.len());

        for request in requests {
            let key = (request.source.as_str(), &request.slot, request.mode);
            if self.options.share_delegates {
                if let Some(compiled) = shared.get(&key) {
                    tracing::trace!(source = %request.source, "sharing compiled unit");
                    results.push(Some(compiled.clone()));
                    continue;
                }
            }
            match self.compile(request) {
                Ok(compiled) => {
                    if self.options.share_delegates {
                        shared.insert(key, compiled.clone());
                    }
                    results.push(Some(compiled));
                }
                Err(diagnostic) => {
                    queue.add_with_source(diagnostic, &table, document);
                    results.push(None);
                }
            }
        }

        DocumentOutput {
            results,
            diagnostics: queue.flush(),
        }
    }
}
