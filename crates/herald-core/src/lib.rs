//! # Herald Core
//!
//! In-process, synchronous publish/subscribe registry. Listeners register for
//! a named event at an integer priority; dispatching an event invokes every
//! matching listener in ascending priority order, on the caller's thread,
//! stopping early when a stoppable event reports that propagation was halted.
//!
//! ```
//! use herald_core::event::{EventDispatcher, Listener, StoppableEvent};
//!
//! let mut dispatcher = EventDispatcher::new();
//! dispatcher.add_listener("order.created", Listener::new(|event, _name| {
//!     event.stop_propagation();
//! }), 0);
//! dispatcher.add_listener("order.created", Listener::new(|_, _| {
//!     unreachable!("runs after the stopping listener");
//! }), 10);
//!
//! let mut event = StoppableEvent::new(42u32);
//! let outcome = dispatcher.dispatch(&mut event, "order.created");
//! assert_eq!(outcome.invoked, 1);
//! assert!(outcome.stopped);
//! ```
pub mod config;
pub mod error;
pub mod event;

// Re-export key public types for easier use by the binary
pub use config::{ConfigFormat, DispatcherConfig};
pub use error::{HeraldError, Result};
pub use event::{
    DispatchOutcome, Event, EventDispatcher, EventName, Listener, ListenerKey, Priority,
    SharedEventDispatcher, Stoppable, StoppableEvent,
};
