//! Reminder evaluation.
//!
//! Reminders are computed on demand from an event and an explicit "now";
//! nothing is scheduled and nothing remembers what was already sent. Delivery
//! goes through a [`NotificationSink`], which may be absent.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::event::Event;
use crate::time::is_within_imminent_window;

/// A notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Notification title, `Upcoming: <event title>`.
    pub title: String,
    /// Notification body, `Starts at <start>`.
    pub body: String,
    /// Whether the event starts within the imminent window.
    pub imminent: bool,
}

/// Something that can show a reminder to the user.
pub trait NotificationSink {
    /// Delivers one reminder. Returns `false` if delivery failed.
    fn deliver(&self, reminder: &Reminder) -> bool;
}

/// Returns the reminder for `event`, or `None` if it has already started.
pub fn reminder_for(event: &Event, now: NaiveDateTime) -> Option<Reminder> {
    if !event.is_upcoming_at(now) {
        return None;
    }
    Some(Reminder {
        title: format!("Upcoming: {}", event.title),
        body: format!("Starts at {}", event.start.format("%m/%d/%Y, %-I:%M %p")),
        imminent: is_imminent(event, now),
    })
}

/// Returns `true` if `event` starts in the future and less than 24 hours away.
///
/// Display-only; it never changes the event's category.
pub fn is_imminent(event: &Event, now: NaiveDateTime) -> bool {
    is_within_imminent_window(event.start, now)
}

/// Delivers a reminder for every future event to `sink`.
///
/// Returns how many deliveries succeeded. Without a sink this does nothing.
/// Failed deliveries are logged and skipped.
pub fn dispatch_reminders<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    now: NaiveDateTime,
    sink: Option<&dyn NotificationSink>,
) -> usize {
    let Some(sink) = sink else {
        debug!("No notification sink, skipping reminders");
        return 0;
    };

    let mut delivered = 0;
    for reminder in events.into_iter().filter_map(|e| reminder_for(e, now)) {
        if sink.deliver(&reminder) {
            delivered += 1;
        } else {
            warn!(title = %reminder.title, "Failed to deliver reminder");
        }
    }

    info!(delivered, "Dispatched reminders");
    delivered
}
