//! Scope, type and overload resolution for binding expressions.
//!
//! - [`ClassRegistry`]: the host classes an expression can reach
//! - [`Scope`]: identifiers free in an expression, as [`Loadable`]s
//! - [`check`]: types every node and resolves members and overloads
//!
//! Assignability, operator typing and the property convention are exposed
//! so the continuation compiler inserts exactly the conversions the
//! checker accepted.

pub mod assign;
pub mod builtins;
mod checker;
mod error;
pub mod operators;
pub mod overload;
mod property;
mod registry;
mod scope;
pub mod suggest;

pub use assign::{coercion, is_assignable, operand_coercion, slot_coercion, Coercion};
pub use checker::{check, Resolution, TypedExpr};
pub use error::{MismatchContext, TypeError, TypeErrorKind};
pub use property::{property_names, resolve_property, Property, PropertyAccess};
pub use registry::{ClassDef, ClassRegistry, FieldDef, MethodDef};
pub use scope::{Emit, Loadable, Scope};
