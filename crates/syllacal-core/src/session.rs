//! One user session: extraction, manual edits, export and reminders.
//!
//! The session owns the event collection and the calendar's display anchor.
//! Every fallible operation checks its inputs before touching state, so an
//! error leaves the session exactly as it was.

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::builder::extract_events;
use crate::classify::{CategoryRule, DEFAULT_RULES};
use crate::collection::EventCollection;
use crate::error::{SessionError, SessionResult};
use crate::event::{Event, EventCategory};
use crate::export::{CalendarEncoder, ExportFile, encode_events};
use crate::format::CalendarView;
use crate::locate::LocatorOptions;
use crate::reminder::{NotificationSink, Reminder, dispatch_reminders, reminder_for};
use crate::time::TimeSpan;

/// A single-writer session over one syllabus.
#[derive(Debug, Clone)]
pub struct Session {
    events: EventCollection,
    anchor: NaiveDateTime,
    options: LocatorOptions,
    rules: &'static [CategoryRule],
}

impl Session {
    /// Creates an empty session anchored at `now`.
    pub fn new(now: NaiveDateTime) -> Self {
        Self::with_options(now, LocatorOptions::default())
    }

    pub fn with_options(now: NaiveDateTime, options: LocatorOptions) -> Self {
        Self {
            events: EventCollection::new(),
            anchor: now,
            options,
            rules: DEFAULT_RULES,
        }
    }

    /// Uses a custom classification table.
    #[must_use]
    pub fn with_rules(mut self, rules: &'static [CategoryRule]) -> Self {
        self.rules = rules;
        self
    }

    /// Replaces the session's events with those found in `text`.
    ///
    /// Moves the anchor to the nearest future event, if there is one.
    /// Returns the number of events extracted.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoInput`] if `text` is empty or whitespace.
    pub fn extract(&mut self, text: &str, now: NaiveDateTime) -> SessionResult<usize> {
        if text.trim().is_empty() {
            warn!("Extraction requested without input text");
            return Err(SessionError::NoInput);
        }

        let events = extract_events(text, now, self.options, self.rules);
        let count = events.len();
        self.events.replace_all(events);

        if let Some(next) = self.events.nearest_future_start(now) {
            debug!(anchor = %next.start, "Moving anchor to nearest future event");
            self.anchor = next.start;
        }

        info!(count, "Extraction finished");
        Ok(count)
    }

    /// Adds a manually created event and returns it.
    ///
    /// Manual events are always assignments; the title is not classified.
    ///
    /// # Errors
    ///
    /// [`SessionError::EmptyTitle`] if `title` is blank.
    pub fn add_manual(&mut self, title: &str, span: TimeSpan) -> SessionResult<&Event> {
        let title = title.trim();
        if title.is_empty() {
            return Err(SessionError::EmptyTitle);
        }
        self.events
            .append(Event::new(title, span, EventCategory::Assignment));
        debug!(title, start = %span.start, "Added manual event");
        Ok(&self.events.as_slice()[self.events.len() - 1])
    }

    /// Renderer insertion hook: a selected slot plus a title becomes an event.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidSpan`] when `end` is before `start`, and
    /// [`SessionError::EmptyTitle`] for a blank title.
    pub fn insert_selection(
        &mut self,
        title: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> SessionResult<&Event> {
        let span = TimeSpan::new(start, end)?;
        self.add_manual(title, span)
    }

    /// Replaces the event at `index` with an edited copy.
    pub fn edit(&mut self, index: usize, event: Event) -> SessionResult<Event> {
        self.events.replace(index, event)
    }

    /// Removes every event.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn events(&self) -> &EventCollection {
        &self.events
    }

    /// The date the calendar should open on.
    pub fn anchor(&self) -> NaiveDateTime {
        self.anchor
    }

    pub fn options(&self) -> LocatorOptions {
        self.options
    }

    /// Events starting at or after `now`, earliest first.
    pub fn upcoming(&self, now: NaiveDateTime, limit: usize) -> Vec<&Event> {
        self.events.upcoming(now, limit)
    }

    /// The renderer's view of the session.
    pub fn view(&self, now: NaiveDateTime) -> CalendarView<'_> {
        CalendarView::new(self.events.as_slice(), self.anchor, now)
    }

    /// Reminders for every future event, in insertion order.
    pub fn reminders(&self, now: NaiveDateTime) -> Vec<Reminder> {
        self.events
            .iter()
            .filter_map(|event| reminder_for(event, now))
            .collect()
    }

    /// Delivers reminders for future events to `sink`, if any.
    pub fn notify(&self, now: NaiveDateTime, sink: Option<&dyn NotificationSink>) -> usize {
        dispatch_reminders(&self.events, now, sink)
    }

    /// Encodes all events into an export file.
    ///
    /// # Errors
    ///
    /// [`SessionError::EmptyExport`] when there are no events, otherwise
    /// [`SessionError::Encoding`] if the encoder rejects them.
    pub fn export_file(&self, encoder: &dyn CalendarEncoder) -> SessionResult<ExportFile> {
        if self.events.is_empty() {
            warn!("Export requested with no events");
            return Err(SessionError::EmptyExport);
        }
        let file = encode_events(self.events.as_slice(), encoder)?;
        info!(
            events = self.events.len(),
            bytes = file.bytes.len(),
            file = %file.file_name,
            "Exported calendar"
        );
        Ok(file)
    }

    /// Exports and hands the outcome to `on_done`, exactly once.
    pub fn export<F>(&self, encoder: &dyn CalendarEncoder, on_done: F)
    where
        F: FnOnce(SessionResult<ExportFile>),
    {
        on_done(self.export_file(encoder));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncodingError;
    use crate::export::ExportRecord;
    use chrono::NaiveDate;
    use std::cell::RefCell;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    struct CountingEncoder;

    impl CalendarEncoder for CountingEncoder {
        fn encode(&self, records: &[ExportRecord]) -> Result<Vec<u8>, EncodingError> {
            Ok(records.len().to_string().into_bytes())
        }
    }

    struct FailingEncoder;

    impl CalendarEncoder for FailingEncoder {
        fn encode(&self, _records: &[ExportRecord]) -> Result<Vec<u8>, EncodingError> {
            Err(EncodingError::backend("boom"))
        }
    }

    const SYLLABUS: &str = "\
Week 1: Syllabus quiz 9/6 at 10am
Homework 1 due 9/13
Midterm exam on 10/15 at 2pm
Project proposal due 11/01
";

    mod extraction {
        use super::*;

        #[test]
        fn extracts_and_anchors() {
            let now = dt(2024, 9, 20, 9, 0);
            let mut session = Session::new(now);
            let count = session.extract(SYLLABUS, now).unwrap();
            assert_eq!(count, 4);
            assert_eq!(session.anchor(), dt(2024, 10, 15, 14, 0));
        }

        #[test]
        fn blank_input_keeps_state() {
            let now = dt(2024, 9, 1, 9, 0);
            let mut session = Session::new(now);
            session.extract(SYLLABUS, now).unwrap();
            let before = session.events().clone();

            assert_eq!(session.extract("   \n\t", now), Err(SessionError::NoInput));
            assert_eq!(session.extract("", now), Err(SessionError::NoInput));
            assert_eq!(session.events(), &before);
        }

        #[test]
        fn no_dates_is_not_an_error() {
            let now = dt(2024, 9, 1, 9, 0);
            let mut session = Session::new(now);
            session.extract(SYLLABUS, now).unwrap();
            assert_eq!(session.extract("No deadlines here.", now), Ok(0));
            assert!(session.events().is_empty());
        }

        #[test]
        fn anchor_unchanged_when_all_past() {
            let start = dt(2024, 9, 1, 9, 0);
            let mut session = Session::new(start);
            session.extract("Lab yesterday", start).unwrap();
            assert_eq!(session.anchor(), start);
        }
    }

    mod manual {
        use super::*;

        #[test]
        fn insert_selection_is_an_assignment() {
            let mut session = Session::new(dt(2024, 9, 1, 9, 0));
            let event = session
                .insert_selection("Final review", dt(2024, 12, 1, 10, 0), dt(2024, 12, 1, 12, 0))
                .unwrap();
            // "Final" would classify as an exam; manual events are not classified.
            assert_eq!(event.category, EventCategory::Assignment);
            assert_eq!(event.title, "Final review");
            assert_eq!(event.end, dt(2024, 12, 1, 12, 0));
            assert_eq!(session.events().len(), 1);
        }

        #[test]
        fn rejects_inverted_span() {
            let mut session = Session::new(dt(2024, 9, 1, 9, 0));
            let err = session
                .insert_selection("Lab", dt(2024, 12, 1, 12, 0), dt(2024, 12, 1, 10, 0))
                .unwrap_err();
            assert!(matches!(err, SessionError::InvalidSpan(_)));
            assert!(session.events().is_empty());
        }

        #[test]
        fn rejects_empty_title() {
            let mut session = Session::new(dt(2024, 9, 1, 9, 0));
            let span = TimeSpan::new(dt(2024, 12, 1, 10, 0), dt(2024, 12, 1, 11, 0)).unwrap();
            assert_eq!(session.add_manual("  ", span).unwrap_err(), SessionError::EmptyTitle);
            assert!(session.events().is_empty());
        }

        #[test]
        fn duplicates_are_allowed() {
            let mut session = Session::new(dt(2024, 9, 1, 9, 0));
            let span = TimeSpan::new(dt(2024, 12, 1, 10, 0), dt(2024, 12, 1, 11, 0)).unwrap();
            session.add_manual("Lab", span).unwrap();
            session.add_manual("Lab", span).unwrap();
            assert_eq!(session.events().len(), 2);
        }

        #[test]
        fn edit_replaces_in_place() {
            let now = dt(2024, 9, 1, 9, 0);
            let mut session = Session::new(now);
            session.extract(SYLLABUS, now).unwrap();
            let edited = session.events().get(1).unwrap().with_title("HW 1");
            session.edit(1, edited).unwrap();
            assert_eq!(session.events().get(1).unwrap().title, "HW 1");
            assert_eq!(session.events().len(), 4);
        }
    }

    mod export {
        use super::*;

        #[test]
        fn empty_session_cannot_export() {
            let session = Session::new(dt(2024, 9, 1, 9, 0));
            assert_eq!(
                session.export_file(&CountingEncoder).unwrap_err(),
                SessionError::EmptyExport
            );
        }

        #[test]
        fn callback_receives_file_once() {
            let now = dt(2024, 9, 1, 9, 0);
            let mut session = Session::new(now);
            session.extract(SYLLABUS, now).unwrap();

            let received = RefCell::new(Vec::new());
            session.export(&CountingEncoder, |result| received.borrow_mut().push(result));

            let received = received.into_inner();
            assert_eq!(received.len(), 1);
            let file = received[0].as_ref().unwrap();
            assert_eq!(file.bytes, b"4");
            assert_eq!(file.file_name, "syllabus-calendar.ics");
        }

        #[test]
        fn encoder_failure_is_reported() {
            let now = dt(2024, 9, 1, 9, 0);
            let mut session = Session::new(now);
            session.extract(SYLLABUS, now).unwrap();
            let mut outcome = None;
            session.export(&FailingEncoder, |result| outcome = Some(result));
            assert_eq!(
                outcome,
                Some(Err(SessionError::Encoding(EncodingError::backend("boom"))))
            );
            assert_eq!(session.events().len(), 4);
        }
    }

    #[test]
    fn reminders_and_view() {
        let loaded = dt(2024, 9, 1, 9, 0);
        let mut session = Session::new(loaded);
        session.extract(SYLLABUS, loaded).unwrap();

        let now = dt(2024, 10, 15, 9, 0);

        let reminders = session.reminders(now);
        let titles: Vec<_> = reminders.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Upcoming: Midterm exam on 10/15 at 2pm",
                "Upcoming: Project proposal due 11/01",
            ]
        );
        assert!(reminders[0].imminent);

        let view = session.view(now);
        assert_eq!(view.anchor, dt(2024, 9, 6, 10, 0));
        assert_eq!(view.events.len(), 4);
        assert_eq!(session.notify(now, None), 0);
        assert_eq!(session.upcoming(now, 5).len(), 2);
    }
}
