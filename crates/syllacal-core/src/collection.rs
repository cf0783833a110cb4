//! The session's event store.
//!
//! [`EventCollection`] keeps events in insertion order; list position is the
//! only identity an event has. Queries sort stably, so events sharing a start
//! keep the order they were inserted in.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::{SessionError, SessionResult};
use crate::event::Event;

/// An ordered, single-writer sequence of events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCollection {
    events: Vec<Event>,
}

impl EventCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps the whole stored sequence for `events`.
    pub fn replace_all(&mut self, events: Vec<Event>) {
        debug!(old = self.events.len(), new = events.len(), "Replacing events");
        self.events = events;
    }

    /// Appends one event. No duplicate or overlap checks.
    pub fn append(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Replaces the event at `index`, returning the previous value.
    ///
    /// # Errors
    ///
    /// Fails when `index` is out of range or `event` ends before it starts.
    pub fn replace(&mut self, index: usize, event: Event) -> SessionResult<Event> {
        event.span()?;
        let len = self.events.len();
        let slot = self
            .events
            .get_mut(index)
            .ok_or_else(|| SessionError::index_out_of_range(index, len))?;
        Ok(std::mem::replace(slot, event))
    }

    /// Removes every event.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Events starting at or after `now`, earliest first, at most `limit`.
    pub fn upcoming(&self, now: NaiveDateTime, limit: usize) -> Vec<&Event> {
        let mut future: Vec<&Event> = self.events.iter().filter(|e| e.is_upcoming_at(now)).collect();
        future.sort_by_key(|e| e.start);
        future.truncate(limit);
        future
    }

    /// The event with the smallest start at or after `now`.
    ///
    /// Ties go to the earliest inserted.
    pub fn nearest_future_start(&self, now: NaiveDateTime) -> Option<&Event> {
        self.events
            .iter()
            .filter(|e| e.is_upcoming_at(now))
            .min_by_key(|e| e.start)
    }

    /// All events sorted by start (stable).
    pub fn chronological(&self) -> Vec<&Event> {
        let mut all: Vec<&Event> = self.events.iter().collect();
        all.sort_by_key(|e| e.start);
        all
    }

    /// Returns the event at `index`.
    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// The events as a slice, in insertion order.
    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl From<Vec<Event>> for EventCollection {
    fn from(events: Vec<Event>) -> Self {
        Self { events }
    }
}

impl<'a> IntoIterator for &'a EventCollection {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
