//! Event handling.
//!
//! Besides the [hooks](crate::hooks::Hooks), which control a run, this library exposes an
//! event-based interface for observing the state changes of the machine in real-time.
//! [EventListeners](EventListener) can be registered on a [Run](crate::run::Run) with the
//! [add_listener](crate::run::Run::add_listener) method.
//!
//! A blanket implementation of [EventListener] for all `FnMut(&Event)` is provided.

/// Represents an event that occurred while executing a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The pointer moved.
    PointerMove {
        /// The new address of the pointer.
        address: i64,
    },

    /// The program modified a cell, either arithmetically or by storing input.
    CellChange {
        /// The address of the changed cell.
        address: i64,

        /// New value of the changed cell.
        value: u8,
    },

    /// The program sent a cell to the write hook.
    Output {
        value: u8,
    },

    /// The cursor was moved by a bracket instead of advancing by one.
    Jump {
        /// Position of the bracket that caused the jump.
        from: usize,

        /// The next instruction to execute.
        to: usize,
    },
}

/// Trait for consuming events.
pub trait EventListener {
    /// Called whenever a new event has been created.
    fn event(&mut self, event: &Event);
}

impl<F> EventListener for F where F: FnMut(&Event) {
    fn event(&mut self, event: &Event) {
        self(event)
    }
}

/// Fans every event out to the registered listeners, in registration order.
#[derive(Default)]
pub(crate) struct EventDispatcher {
    listeners: Vec<Box<dyn EventListener>>,
}

impl EventDispatcher {
    pub fn add_listener<L: EventListener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    pub fn dispatch(&mut self, event: &Event) {
        self.listeners.iter_mut().for_each(|listener| listener.event(event));
    }
}
