//! Load-time runtime for compiled bindings.
//!
//! - [`Value`], [`Heap`] and [`HostObject`]: the host object model
//! - [`ObservableValue`]: the observable abstraction, with [`SimpleProperty`]
//! - [`evaluate`]: the stack machine running emitted programs
//! - [`ListenerRuntime`]: the listener directory generated delegates call
//! - [`BindingDelegate`]: one live binding instance

mod delegate;
mod error;
mod eval;
mod heap;
mod listener;
mod native;
mod observable;
mod value;

pub use delegate::BindingDelegate;
pub use error::RuntimeError;
pub use eval::{evaluate, evaluate_on, evaluate_write_back, EvalEnv};
pub use heap::{BeanId, Heap, HostObject, ObjRef};
pub use listener::ListenerRuntime;
pub use native::{NativeFn, NativeTable};
pub use observable::{
    Listener, ObservableRef, ObservableValue, ReadOnlyView, SimpleProperty, SubscriptionId,
};
pub use value::Value;
