use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::event::{Event, Stoppable};

/// Wraps a payload so that listeners can halt its dispatch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoppableEvent<T> {
    payload: T,
    stopped: bool,
}

impl<T> StoppableEvent<T> {
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            stopped: false,
        }
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }

    pub fn into_inner(self) -> T {
        self.payload
    }
}

impl<T> Deref for StoppableEvent<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.payload
    }
}

impl<T> DerefMut for StoppableEvent<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.payload
    }
}

impl<T> Stoppable for StoppableEvent<T> {
    fn is_propagation_stopped(&self) -> bool {
        self.stopped
    }

    fn stop_propagation(&mut self) {
        self.stopped = true;
    }
}

impl<T: fmt::Debug + 'static> Event for StoppableEvent<T> {
    fn as_stoppable(&self) -> Option<&dyn Stoppable> {
        Some(self)
    }

    fn as_stoppable_mut(&mut self) -> Option<&mut dyn Stoppable> {
        Some(self)
    }
}

// Plain payloads: delivered to every listener, cannot be stopped
macro_rules! plain_events {
    ($($ty:ty),* $(,)?) => {
        $(impl Event for $ty {})*
    };
}

plain_events!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
    serde_json::Value,
);

impl<T: fmt::Debug + 'static> Event for Vec<T> {}
