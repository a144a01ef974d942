//! Host objects and their identities.
//!
//! Bean identity is a counter handed out by a [`Heap`], never an address.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use bind_ir::{ClassId, FieldId};
use rustc_hash::FxHashMap;

use crate::value::Value;

/// Stable identity of a host object.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct BeanId(pub u32);

impl BeanId {
    /// Owner of dependencies that hang off no object (local slots).
    pub const DETACHED: BeanId = BeanId(0);
}

impl fmt::Display for BeanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bean#{}", self.0)
    }
}

/// An instance of a declared class.
pub struct HostObject {
    id: BeanId,
    class: ClassId,
    fields: RefCell<FxHashMap<FieldId, Value>>,
}

pub type ObjRef = Rc<HostObject>;

impl HostObject {
    pub fn id(&self) -> BeanId {
        self.id
    }

    pub fn class(&self) -> ClassId {
        self.class
    }

    /// Field value; unset fields read as `null`.
    pub fn get_field(&self, field: FieldId) -> Value {
        self.fields
            .borrow()
            .get(&field)
            .cloned()
            .unwrap_or(Value::Null)
    }

    pub fn set_field(&self, field: FieldId, value: Value) {
        self.fields.borrow_mut().insert(field, value);
    }
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostObject")
            .field("id", &self.id)
            .field("class", &self.class)
            .finish_non_exhaustive()
    }
}

/// Allocates host objects with fresh bean ids.
#[derive(Debug)]
pub struct Heap {
    next: Cell<u32>,
}

impl Default for Heap {
    fn default() -> Self {
        Heap { next: Cell::new(1) }
    }
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&self, class: ClassId) -> ObjRef {
        let id = BeanId(self.next.get());
        self.next.set(id.0 + 1);
        Rc::new(HostObject {
            id,
            class,
            fields: RefCell::new(FxHashMap::default()),
        })
    }
}
