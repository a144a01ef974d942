//! Native method bodies.
//!
//! The type checker only knows method signatures; the host supplies the
//! bodies here, keyed by [`MethodId`].

use std::fmt;
use std::rc::Rc;

use bind_ir::MethodId;
use rustc_hash::FxHashMap;

use crate::error::RuntimeError;
use crate::value::Value;

/// Body of a host method: receiver, then arguments.
pub type NativeFn = Rc<dyn Fn(&Value, &[Value]) -> Result<Value, RuntimeError>>;

#[derive(Clone, Default)]
pub struct NativeTable {
    methods: FxHashMap<MethodId, NativeFn>,
}

impl NativeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the body of `method`.
    pub fn register(
        &mut self,
        method: MethodId,
        body: impl Fn(&Value, &[Value]) -> Result<Value, RuntimeError> + 'static,
    ) {
        self.methods.insert(method, Rc::new(body));
    }

    pub fn contains(&self, method: MethodId) -> bool {
        self.methods.contains_key(&method)
    }

    pub fn call(
        &self,
        method: MethodId,
        receiver: &Value,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        let body = self
            .methods
            .get(&method)
            .ok_or(RuntimeError::UnknownMethod(method.0))?;
        body(receiver, args)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Debug for NativeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<u32> = self.methods.keys().map(|m| m.0).collect();
        ids.sort_unstable();
        f.debug_struct("NativeTable").field("methods", &ids).finish()
    }
}
