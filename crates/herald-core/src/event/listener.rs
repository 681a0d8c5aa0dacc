use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::event::{Event, EventName};

/// Callback signature shared by all listeners
pub type ListenerFn = dyn Fn(&mut dyn Event, &EventName) + Send + Sync;

static NEXT_LISTENER_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Identity of a listener, used when removing it from a dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListenerKey {
    /// Unique token handed out by [`Listener::new`]; only clones share it
    Token(u64),
    /// Caller-chosen function name; every listener built with the same name
    /// is the same listener as far as removal is concerned
    Named(Cow<'static, str>),
}

impl fmt::Display for ListenerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerKey::Token(token) => write!(f, "#{}", token),
            ListenerKey::Named(name) => f.write_str(name),
        }
    }
}

/// A registered callback.
///
/// Cloning a listener is cheap and keeps its identity, so the clone can later
/// be handed to [`EventDispatcher::remove_listener`](crate::event::EventDispatcher::remove_listener)
/// to remove every registration of the original.
#[derive(Clone)]
pub struct Listener {
    key: ListenerKey,
    callback: Arc<ListenerFn>,
}

impl Listener {
    /// Create a listener with a fresh identity
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&mut dyn Event, &EventName) + Send + Sync + 'static,
    {
        let token = NEXT_LISTENER_TOKEN.fetch_add(1, Ordering::Relaxed);
        Self {
            key: ListenerKey::Token(token),
            callback: Arc::new(callback),
        }
    }

    /// Create a listener whose identity is `name`.
    ///
    /// Two listeners with the same name compare equal even when their
    /// callbacks differ.
    pub fn named<N, F>(name: N, callback: F) -> Self
    where
        N: Into<Cow<'static, str>>,
        F: Fn(&mut dyn Event, &EventName) + Send + Sync + 'static,
    {
        Self {
            key: ListenerKey::Named(name.into()),
            callback: Arc::new(callback),
        }
    }

    pub fn key(&self) -> &ListenerKey {
        &self.key
    }

    /// Name of a listener built with [`Listener::named`]
    pub fn name(&self) -> Option<&str> {
        match &self.key {
            ListenerKey::Named(name) => Some(&**name),
            ListenerKey::Token(_) => None,
        }
    }

    /// Invoke the callback
    pub fn call(&self, event: &mut dyn Event, name: &EventName) {
        (self.callback)(event, name)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
