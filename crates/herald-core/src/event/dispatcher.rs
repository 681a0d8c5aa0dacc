use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;

use log::{debug, trace};
use parking_lot::RwLock;

use crate::config::DispatcherConfig;
use crate::event::{Event, EventName, Listener, Priority};

/// Listener groups for one event name, ascending by priority
type PriorityLevels = BTreeMap<Priority, Vec<Listener>>;

/// What happened during a single dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Number of listeners that were invoked
    pub invoked: usize,
    /// The event reported propagation stopped when dispatch returned
    pub stopped: bool,
}

//--------------------------------------------------
// EventDispatcher
//--------------------------------------------------

/// Registry of listeners keyed by event name and priority.
///
/// Mutation needs `&mut self`, so a listener cannot change this registry
/// while it is being dispatched. Use [`SharedEventDispatcher`] when listeners
/// need to register or remove listeners from inside a dispatch.
pub struct EventDispatcher {
    registry: HashMap<EventName, PriorityLevels>,
    config: DispatcherConfig,
}

// Manual Debug implementation for EventDispatcher
impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listener_count: usize = self
            .registry
            .values()
            .flat_map(|levels| levels.values())
            .map(Vec::len)
            .sum();
        f.debug_struct("EventDispatcher")
            .field("event_names", &self.registry.len())
            .field("listener_count", &listener_count)
            .field("config", &self.config)
            .finish()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            registry: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Register `listener` for `name` at `priority`.
    ///
    /// Listeners at the same priority run in registration order. Adding the
    /// same listener twice registers it twice. Always returns `true`.
    pub fn add_listener(
        &mut self,
        name: impl Into<EventName>,
        listener: Listener,
        priority: Priority,
    ) -> bool {
        let name = name.into();
        debug!(
            "Adding listener {} for event '{}' at priority {}",
            listener.key(),
            name,
            priority
        );
        self.registry
            .entry(name)
            .or_default()
            .entry(priority)
            .or_default()
            .push(listener);
        true
    }

    /// Whether anything is registered for `name`
    pub fn has_listener(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    /// Remove every registration of `listener` for `name` at exactly
    /// `priority`. Returns whether at least one registration was removed.
    pub fn remove_listener(&mut self, name: &str, listener: &Listener, priority: Priority) -> bool {
        let Some(levels) = self.registry.get_mut(name) else {
            return false;
        };
        let Some(listeners) = levels.get_mut(&priority) else {
            return false;
        };

        let before = listeners.len();
        listeners.retain(|registered| registered != listener);
        let removed = before - listeners.len();
        if removed == 0 {
            return false;
        }
        debug!(
            "Removed {} registration(s) of listener {} for event '{}' at priority {}",
            removed,
            listener.key(),
            name,
            priority
        );

        if self.config.prune_empty_entries && listeners.is_empty() {
            levels.remove(&priority);
            trace!("Pruned empty priority {} for event '{}'", priority, name);
            if levels.is_empty() {
                self.registry.remove(name);
                trace!("Pruned event '{}' with no remaining listeners", name);
            }
        }
        true
    }

    /// Drop every registration for `name`
    pub fn clear(&mut self, name: &str) -> bool {
        let cleared = self.registry.remove(name).is_some();
        if cleared {
            debug!("Cleared all listeners for event '{}'", name);
        }
        cleared
    }

    pub fn clear_all(&mut self) {
        self.registry.clear();
    }

    /// Number of registrations for `name` across all priorities
    pub fn listener_count(&self, name: &str) -> usize {
        self.registry
            .get(name)
            .map_or(0, |levels| levels.values().map(Vec::len).sum())
    }

    /// Registered priority levels for `name`, ascending
    pub fn priorities(&self, name: &str) -> Vec<Priority> {
        self.registry
            .get(name)
            .map(|levels| levels.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Every event name with a registry entry, sorted
    pub fn event_names(&self) -> Vec<EventName> {
        let mut names: Vec<EventName> = self.registry.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Invoke the listeners of `name` with `event`, lowest priority first.
    ///
    /// Before each listener the event is asked whether propagation was
    /// stopped; if it was, dispatch returns without invoking anything else.
    /// Unknown names are a no-op. A panicking listener unwinds through here.
    pub fn dispatch(&self, event: &mut dyn Event, name: &str) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        let Some((name, levels)) = self.registry.get_key_value(name) else {
            trace!("No listeners registered for event '{}'", name);
            outcome.stopped = event.is_propagation_stopped();
            return outcome;
        };

        for listeners in levels.values() {
            if invoke_level(listeners, event, name, &mut outcome).is_break() {
                break;
            }
        }
        outcome.stopped = event.is_propagation_stopped();
        outcome
    }

    /// Name entry and its priority sequence, copied
    fn snapshot_priorities(&self, name: &str) -> Option<(EventName, Vec<Priority>)> {
        self.registry
            .get_key_value(name)
            .map(|(name, levels)| (name.clone(), levels.keys().copied().collect()))
    }

    /// Listeners at one priority level, copied
    fn snapshot_level(&self, name: &str, priority: Priority) -> Vec<Listener> {
        self.registry
            .get(name)
            .and_then(|levels| levels.get(&priority))
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Invoke one priority level in insertion order, checking for a stopped
/// event before every call
fn invoke_level(
    listeners: &[Listener],
    event: &mut dyn Event,
    name: &EventName,
    outcome: &mut DispatchOutcome,
) -> ControlFlow<()> {
    for listener in listeners {
        if event.is_propagation_stopped() {
            debug!(
                "Propagation of event '{}' stopped after {} listener(s)",
                name, outcome.invoked
            );
            return ControlFlow::Break(());
        }
        trace!("Dispatching event '{}' to listener {}", name, listener.key());
        listener.call(event, name);
        outcome.invoked += 1;
    }
    ControlFlow::Continue(())
}

//--------------------------------------------------
// SharedEventDispatcher (Public API)
//--------------------------------------------------

/// Thread-safe shared event dispatcher.
///
/// Clones share one registry. No lock is held while a listener runs, so
/// listeners may add, remove or dispatch through a clone of the dispatcher.
///
/// Dispatch copies the priority sequence of the event name when it starts,
/// and copies each priority's listener list right before walking it. A
/// listener added to the level currently being walked first runs on the next
/// dispatch, and a listener removed from that level still runs in this pass.
/// Changes to later levels that existed at the start are seen.
///
/// A listener that captures a clone of the dispatcher it is registered on
/// keeps the registry alive until that listener is removed or cleared.
#[derive(Clone, Default)]
pub struct SharedEventDispatcher {
    dispatcher: Arc<RwLock<EventDispatcher>>,
}

// Manual Debug impl for SharedEventDispatcher
impl fmt::Debug for SharedEventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedEventDispatcher")
            .finish_non_exhaustive()
    }
}

impl SharedEventDispatcher {
    pub fn new() -> Self {
        Self::from(EventDispatcher::new())
    }

    pub fn with_config(config: DispatcherConfig) -> Self {
        Self::from(EventDispatcher::with_config(config))
    }

    pub fn config(&self) -> DispatcherConfig {
        self.dispatcher.read().config().clone()
    }

    pub fn add_listener(
        &self,
        name: impl Into<EventName>,
        listener: Listener,
        priority: Priority,
    ) -> bool {
        self.dispatcher
            .write()
            .add_listener(name, listener, priority)
    }

    pub fn has_listener(&self, name: &str) -> bool {
        self.dispatcher.read().has_listener(name)
    }

    pub fn remove_listener(&self, name: &str, listener: &Listener, priority: Priority) -> bool {
        self.dispatcher
            .write()
            .remove_listener(name, listener, priority)
    }

    pub fn clear(&self, name: &str) -> bool {
        self.dispatcher.write().clear(name)
    }

    pub fn clear_all(&self) {
        self.dispatcher.write().clear_all()
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.dispatcher.read().listener_count(name)
    }

    pub fn priorities(&self, name: &str) -> Vec<Priority> {
        self.dispatcher.read().priorities(name)
    }

    pub fn event_names(&self) -> Vec<EventName> {
        self.dispatcher.read().event_names()
    }

    pub fn is_empty(&self) -> bool {
        self.dispatcher.read().is_empty()
    }

    pub fn dispatch(&self, event: &mut dyn Event, name: &str) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        let snapshot = self.dispatcher.read().snapshot_priorities(name);
        let Some((name, priorities)) = snapshot else {
            trace!("No listeners registered for event '{}'", name);
            outcome.stopped = event.is_propagation_stopped();
            return outcome;
        };

        for priority in priorities {
            let listeners = self.dispatcher.read().snapshot_level(name.as_str(), priority);
            if invoke_level(&listeners, event, &name, &mut outcome).is_break() {
                break;
            }
        }
        outcome.stopped = event.is_propagation_stopped();
        outcome
    }
}

impl From<EventDispatcher> for SharedEventDispatcher {
    fn from(dispatcher: EventDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(RwLock::new(dispatcher)),
        }
    }
}
