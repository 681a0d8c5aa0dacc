pub mod dispatcher;
pub mod listener;
pub mod types;

use std::any::Any;
use std::borrow::{Borrow, Cow};
use std::fmt;

/// Listener priority; lower values are dispatched first
pub type Priority = i32;

/// Name identifying a class of dispatchable events
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventName(Cow<'static, str>);

impl EventName {
    /// Create an event name from a static string without allocating
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for EventName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EventName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventName {
    fn from(name: &str) -> Self {
        Self(Cow::Owned(name.to_owned()))
    }
}

impl From<String> for EventName {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl From<&String> for EventName {
    fn from(name: &String) -> Self {
        Self(Cow::Owned(name.clone()))
    }
}

impl PartialEq<str> for EventName {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for EventName {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Propagation control, optionally exposed by an event through
/// [`Event::as_stoppable`]
pub trait Stoppable {
    /// Whether a listener has already halted propagation
    fn is_propagation_stopped(&self) -> bool;

    /// Halt propagation; no listener after the current one will run
    fn stop_propagation(&mut self);
}

/// Cast to `Any` for downcasting, implemented for every `'static` type
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Core event trait
///
/// Any value can travel through a dispatch. Implementors that want listeners
/// to be able to halt a dispatch override [`as_stoppable`](Event::as_stoppable)
/// and [`as_stoppable_mut`](Event::as_stoppable_mut); everything else is
/// delivered to every listener unconditionally.
pub trait Event: AsAny + fmt::Debug + 'static {
    /// Propagation control view of this event, if it has one
    fn as_stoppable(&self) -> Option<&dyn Stoppable> {
        None
    }

    /// Mutable propagation control view of this event, if it has one
    fn as_stoppable_mut(&mut self) -> Option<&mut dyn Stoppable> {
        None
    }
}

impl dyn Event {
    /// Whether this event supports propagation control
    pub fn is_stoppable(&self) -> bool {
        self.as_stoppable().is_some()
    }

    /// Always `false` for events without propagation control
    pub fn is_propagation_stopped(&self) -> bool {
        self.as_stoppable()
            .is_some_and(|stoppable| stoppable.is_propagation_stopped())
    }

    /// Halt propagation. Returns `false` (and does nothing) when the event
    /// does not support propagation control.
    pub fn stop_propagation(&mut self) -> bool {
        match self.as_stoppable_mut() {
            Some(stoppable) => {
                stoppable.stop_propagation();
                true
            }
            None => false,
        }
    }

    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Re-export important types
pub use dispatcher::{DispatchOutcome, EventDispatcher, SharedEventDispatcher};
pub use listener::{Listener, ListenerKey};
pub use types::StoppableEvent;

// Test module declaration
#[cfg(test)]
mod tests;
