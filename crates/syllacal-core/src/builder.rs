//! Event construction from located expressions.
//!
//! The pipeline stage between the locator and the collection: each
//! [`TemporalMatch`] becomes exactly one [`Event`] lasting
//! [`DEFAULT_EVENT_DURATION`](crate::time::DEFAULT_EVENT_DURATION).

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::classify::{CategoryRule, classify_with};
use crate::event::{Event, EventCategory};
use crate::locate::{LocatorOptions, TemporalLocator, TemporalMatch};

/// Builds the event for one match. Never fails.
pub fn build_event(found: &TemporalMatch, category: EventCategory) -> Event {
    Event::starting_at(found.matched_text.trim(), found.instant, category)
}

/// Runs the whole pipeline over `text`: locate, classify, build.
///
/// Returns events in source order. Text without temporal expressions yields
/// an empty vector.
pub fn extract_events(
    text: &str,
    now: NaiveDateTime,
    options: LocatorOptions,
    rules: &[CategoryRule],
) -> Vec<Event> {
    let events: Vec<Event> = TemporalLocator::new(options)
        .locate(text, now)
        .map(|found| {
            let category = classify_with(rules, &found.matched_text);
            debug!(
                title = %found.matched_text,
                category = category.as_str(),
                "Built event"
            );
            build_event(&found, category)
        })
        .collect();

    info!(count = events.len(), "Extracted events from text");
    events
}
