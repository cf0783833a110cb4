//! Temporal expression location for syllabus text.
//!
//! This module scans free text for dates and times and resolves each one to a
//! calendar instant relative to an explicit reference "now":
//! - ISO dates (`2024-10-15`, `2024-10-15T14:00`)
//! - Numeric dates (`10/15`, `10/15/2024`), month first unless configured otherwise
//! - Month-name dates (`Oct 15`, `Friday, October 15th, 2024`, `15th of Oct`)
//! - Weekdays (`Friday`, `next Monday`, `last Wed`)
//! - Casual days and offsets (`tomorrow`, `tonight`, `in 3 days`, `next week`)
//! - Times of day attached to a date (`10/15 at 2pm`, `11:59 PM on Friday`)
//!   or standing alone (`at noon`, `3:30pm`)
//!
//! Each hit becomes a [`TemporalMatch`] carrying the expression itself and the
//! clause around it, which later stages use for titles and classification.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use syllacal_core::locate::locate;
//!
//! let now = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let matches: Vec<_> = locate("Midterm exam on 10/15 at 2pm", now).collect();
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].expression, "10/15 at 2pm");
//! ```

use std::ops::Range;
use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::time::at_time;

const MONTHS: &str = r"jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:tember|t)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

const WEEKDAYS: &str = r"monday|mon|tuesday|tues|tue|wednesday|wed|thursday|thurs|thur|thu|friday|fri|saturday|sat|sunday|sun";

const TIME: &str = r"(?:(?P<noon>noon)|(?P<midnight>midnight)|(?P<h>\d{1,2})(?::(?P<m>\d{2}))?\s*(?P<ap>[ap])(?:\.m\.|m\b)|(?P<h24>\d{1,2}):(?P<m24>\d{2})\b)";

/// How far back (in bytes) to look for a time written before its date.
const TIME_BEFORE_WINDOW: usize = 40;

/// Hour assumed for expressions that name a day but no time.
const IMPLIED_HOUR: u32 = 12;

/// Hour implied by "tonight".
const TONIGHT_HOUR: u32 = 22;

/// How many years ahead to search for a month/day without a year (Feb 29).
const MAX_YEAR_LOOKAHEAD: i32 = 8;

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?P<y>\d{4})-(?P<mo>\d{1,2})-(?P<d>\d{1,2})(?:(?:T|\s+)(?P<h>\d{1,2}):(?P<mi>\d{2}))?\b",
    )
    .expect("Invalid ISO date regex")
});

static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:(?:{WEEKDAYS})\.?,?\s+)?(?P<a>\d{{1,2}})/(?P<b>\d{{1,2}})(?:/(?P<y>\d{{4}}|\d{{2}}))?\b"
    ))
    .expect("Invalid numeric date regex")
});

static MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:(?:{WEEKDAYS})\.?,?\s+)?(?P<month>{MONTHS})\.?\s+(?P<day>\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s+(?P<y>\d{{4}})\b)?"
    ))
    .expect("Invalid month-day regex")
});

static DAY_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:(?:{WEEKDAYS})\.?,?\s+)?(?:the\s+)?(?P<day>\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?(?P<month>{MONTHS})\b(?:,?\s+(?P<y>\d{{4}})\b)?"
    ))
    .expect("Invalid day-month regex")
});

/// A day number right after a month name: `Nov 12` in `Quiz 4 Nov 12`.
static DAY_AFTER_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\.?\s+\d{1,2}(?:st|nd|rd|th)?\b").expect("Invalid day-after-month regex")
});

/// Connector splitting the text between two dates in one clause.
static DATE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i),|&|\b(?:and|then|or|while)\b").expect("Invalid date separator regex")
});

static WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:(?P<modifier>this|next|last|coming)\s+)?(?P<wd>{WEEKDAYS})\b"
    ))
    .expect("Invalid weekday regex")
});

static CASUAL_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?P<word>today|tonight|tomorrow|yesterday)\b")
        .expect("Invalid casual day regex")
});

static OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:in\s+(?P<n>\d{1,3}|an?|one|two|three|four|five|six|seven|eight|nine|ten)\s+(?P<unit>days?|weeks?)|(?P<next_week>next\s+week))\b",
    )
    .expect("Invalid offset regex")
});

static TIME_AFTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^[ \t]*,?[ \t]*(?:(?:at|by|from|before|around)[ \t]+|@[ \t]*)?\b{TIME}"
    ))
    .expect("Invalid trailing time regex")
});

static TIME_BEFORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b{TIME}[ \t]*,?[ \t]*(?:on[ \t]+)?$")).expect("Invalid leading time regex")
});

static RANGE_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)^[ \t]*(?:-|–|—|to|until|till)[ \t]*\b{TIME}"))
        .expect("Invalid range tail regex")
});

static STANDALONE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(?:(?P<at>\bat\s+|@\s*))?\b{TIME}"))
        .expect("Invalid standalone time regex")
});

/// Field order for ambiguous numeric dates such as `12/10`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// `12/10` is December 10 (US convention).
    #[default]
    MonthFirst,
    /// `12/10` is October 12.
    DayFirst,
}

/// How a month/day without a year picks its year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearPolicy {
    /// The first year in which the date, at its resolved time, is not before
    /// the reference instant. `10/15 at 2pm` read at 3pm on October 15 means
    /// next year.
    #[default]
    NextOccurrence,
    /// Whichever of last, this or next year lands closest to the reference date.
    Closest,
}

/// Options controlling how ambiguous expressions resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorOptions {
    /// Field order for numeric dates.
    pub date_order: DateOrder,
    /// Year selection for dates written without one.
    pub year_policy: YearPolicy,
}

/// A temporal expression found in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalMatch {
    /// The clause containing the expression, trimmed. Never empty.
    ///
    /// A clause holding several dates is split between them, so each match
    /// gets its own part.
    pub matched_text: String,
    /// The temporal expression exactly as written.
    pub expression: String,
    /// Byte range of `expression` in the source text.
    pub range: Range<usize>,
    /// The resolved instant.
    pub instant: NaiveDateTime,
}

impl TemporalMatch {
    /// Creates a match whose expression is the whole matched text.
    pub fn new(matched_text: impl Into<String>, instant: NaiveDateTime) -> Self {
        let matched_text = matched_text.into();
        Self {
            range: 0..matched_text.len(),
            expression: matched_text.clone(),
            matched_text,
            instant,
        }
    }
}

/// Locates temporal expressions with fixed options.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemporalLocator {
    options: LocatorOptions,
}

impl TemporalLocator {
    /// Creates a locator with the given options.
    pub fn new(options: LocatorOptions) -> Self {
        Self { options }
    }

    /// Returns the options in use.
    pub fn options(&self) -> LocatorOptions {
        self.options
    }

    /// Returns the matches in `text`, in source order.
    pub fn locate<'t>(&self, text: &'t str, now: NaiveDateTime) -> Matches<'t> {
        let candidates = scan(text);
        trace!(candidates = candidates.len(), "Scanned text for temporal expressions");
        Matches {
            text,
            now,
            options: self.options,
            pending: candidates.into_iter(),
        }
    }
}

/// Locates temporal expressions with default options.
pub fn locate(text: &str, now: NaiveDateTime) -> Matches<'_> {
    TemporalLocator::default().locate(text, now)
}

/// Lazy sequence of [`TemporalMatch`] values.
///
/// Candidates are found up front; each one is resolved against the reference
/// instant only when pulled, and candidates without a calendar meaning
/// (e.g. `2/30`) are skipped.
#[derive(Debug)]
pub struct Matches<'t> {
    text: &'t str,
    now: NaiveDateTime,
    options: LocatorOptions,
    pending: std::vec::IntoIter<Candidate>,
}

impl Iterator for Matches<'_> {
    type Item = TemporalMatch;

    fn next(&mut self) -> Option<TemporalMatch> {
        while let Some(candidate) = self.pending.next() {
            let expression = &self.text[candidate.start..candidate.end];
            let Some(instant) = candidate.resolve(self.now, &self.options) else {
                trace!(expression, "Skipping unresolvable expression");
                continue;
            };

            let (lo, hi) = clause_bounds(self.text, candidate.start, candidate.end);
            let (lo, hi) = (lo.max(candidate.floor), hi.min(candidate.ceiling));
            let clause = clean_clause(&self.text[lo..hi]);
            let matched_text = if clause.is_empty() {
                expression.trim()
            } else {
                clause
            };

            debug!(expression, %instant, text = matched_text, "Located temporal expression");

            return Some(TemporalMatch {
                matched_text: matched_text.to_string(),
                expression: expression.to_string(),
                range: candidate.start..candidate.end,
                instant,
            });
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.pending.len()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClockTime {
    hour: u32,
    minute: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeekdayModifier {
    This,
    Next,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateSpec {
    /// A calendar date; the year is filled in by policy when absent.
    Calendar {
        year: Option<i32>,
        month: u32,
        day: u32,
    },
    /// A numeric date whose field order depends on [`DateOrder`].
    Numeric {
        first: u32,
        second: u32,
        year: Option<i32>,
    },
    /// Reference date plus a number of days.
    DaysFromNow(i64),
    /// Reference instant plus a duration.
    Offset(Duration),
    Weekday {
        weekday: Weekday,
        modifier: WeekdayModifier,
    },
}

#[derive(Debug, Clone)]
struct Candidate {
    start: usize,
    end: usize,
    date: DateSpec,
    time: Option<ClockTime>,
    implied_time: Option<ClockTime>,
    /// How far the clause may reach before `start` and after `end`; set by
    /// the neighbouring candidates.
    floor: usize,
    ceiling: usize,
}

impl Candidate {
    fn new(range: Range<usize>, date: DateSpec) -> Self {
        Self {
            start: range.start,
            end: range.end,
            date,
            time: None,
            implied_time: None,
            floor: 0,
            ceiling: usize::MAX,
        }
    }

    fn resolve(&self, now: NaiveDateTime, options: &LocatorOptions) -> Option<NaiveDateTime> {
        let today = now.date();
        let time = self
            .time
            .or(self.implied_time)
            .unwrap_or(ClockTime {
                hour: IMPLIED_HOUR,
                minute: 0,
            });
        let date = match self.date {
            DateSpec::Calendar { year, month, day } => {
                resolve_calendar(year, month, day, time, now, options.year_policy)?
            }
            DateSpec::Numeric {
                first,
                second,
                year,
            } => {
                let (month, day) = match options.date_order {
                    DateOrder::MonthFirst => (first, second),
                    DateOrder::DayFirst => (second, first),
                };
                resolve_calendar(year, month, day, time, now, options.year_policy)?
            }
            DateSpec::DaysFromNow(days) => today.checked_add_signed(Duration::days(days))?,
            DateSpec::Offset(offset) => {
                let shifted = now.checked_add_signed(offset)?;
                return match self.time {
                    Some(time) => at_time(shifted.date(), time.hour, time.minute),
                    None => Some(shifted),
                };
            }
            DateSpec::Weekday { weekday, modifier } => resolve_weekday(today, weekday, modifier)?,
        };
        at_time(date, time.hour, time.minute)
    }
}

/// Finds every candidate expression in `text`, sorted by position.
fn scan(text: &str) -> Vec<Candidate> {
    let mut found = Vec::new();
    found.extend(ISO_DATE.captures_iter(text).filter_map(|c| iso_candidate(&c)));
    found.extend(
        NUMERIC_DATE
            .captures_iter(text)
            .filter_map(|c| numeric_candidate(text, &c)),
    );
    found.extend(MONTH_DAY.captures_iter(text).filter_map(|c| named_month_candidate(&c)));
    found.extend(
        DAY_MONTH
            .captures_iter(text)
            .filter_map(|c| day_month_candidate(text, &c)),
    );
    found.extend(WEEKDAY.captures_iter(text).filter_map(|c| weekday_candidate(&c)));
    found.extend(CASUAL_DAY.captures_iter(text).filter_map(|c| casual_candidate(&c)));
    found.extend(OFFSET.captures_iter(text).filter_map(|c| offset_candidate(&c)));

    // Earliest start wins, then the longest expression.
    found.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
    let mut dates: Vec<Candidate> = Vec::with_capacity(found.len());
    for candidate in found {
        if dates.last().is_none_or(|last| candidate.start >= last.end) {
            dates.push(candidate);
        }
    }

    attach_times(text, &mut dates);

    let standalone = standalone_times(text, &dates);
    dates.extend(standalone);
    dates.sort_by_key(|c| c.start);
    split_shared_clauses(text, &mut dates);
    dates
}

/// Divides the text between consecutive candidates so that two dates in one
/// clause do not share a title.
///
/// The gap splits at its first connector (`,`, `&`, `and`, ...); everything
/// before it stays with the earlier date. Without a connector the whole gap
/// belongs to the later date, as in `HW 1 10/1 Quiz 10/3`.
fn split_shared_clauses(text: &str, dates: &mut [Candidate]) {
    for i in 1..dates.len() {
        let (gap_start, gap_end) = (dates[i - 1].end, dates[i].start);
        if gap_end < gap_start {
            continue;
        }
        let (ceiling, floor) = match DATE_SEPARATOR.find(&text[gap_start..gap_end]) {
            Some(sep) => (gap_start + sep.start(), gap_start + sep.end()),
            None => (gap_start, gap_start),
        };
        dates[i - 1].ceiling = ceiling;
        dates[i].floor = floor;
    }
}

fn iso_candidate(caps: &Captures<'_>) -> Option<Candidate> {
    let whole = caps.get(0)?;
    let mut candidate = Candidate::new(
        whole.range(),
        DateSpec::Calendar {
            year: Some(number(caps, "y")? as i32),
            month: number(caps, "mo")?,
            day: number(caps, "d")?,
        },
    );
    if let (Some(hour), Some(minute)) = (number(caps, "h"), number(caps, "mi")) {
        candidate.time = Some(checked_clock(hour, minute)?);
    }
    Some(candidate)
}

fn numeric_candidate(text: &str, caps: &Captures<'_>) -> Option<Candidate> {
    let whole = caps.get(0)?;
    let first = caps.name("a")?;

    // Skip pieces of longer runs like 1/2/3/4, paths, scores such as 8.5/10.
    let before = text[..first.start()].chars().next_back();
    if matches!(before, Some('/' | '.' | ':' | '-')) {
        return None;
    }
    let after = &text[whole.end()..];
    if after.starts_with('/') || after.starts_with(['.', ','].as_slice()) && starts_with_digit(&after[1..]) {
        return None;
    }

    let year = caps
        .name("y")
        .and_then(|y| y.as_str().parse::<i32>().ok())
        .map(|y| if y < 100 { 2000 + y } else { y });

    Some(Candidate::new(
        whole.range(),
        DateSpec::Numeric {
            first: first.as_str().parse().ok()?,
            second: number(caps, "b")?,
            year,
        },
    ))
}

fn named_month_candidate(caps: &Captures<'_>) -> Option<Candidate> {
    let whole = caps.get(0)?;
    let month_token = caps.name("month")?.as_str();
    // "may" is only a month when capitalised.
    if month_token.eq_ignore_ascii_case("may") && !is_capitalized(month_token) {
        return None;
    }
    Some(Candidate::new(
        whole.range(),
        DateSpec::Calendar {
            year: number(caps, "y").map(|y| y as i32),
            month: month_from_name(month_token)?,
            day: number(caps, "day")?,
        },
    ))
}

/// `15 October`, unless the month already opens a month-first date
/// (`Quiz 4 Nov 12` is November 12, not November 4).
fn day_month_candidate(text: &str, caps: &Captures<'_>) -> Option<Candidate> {
    let month = caps.name("month")?;
    if DAY_AFTER_MONTH.is_match(&text[month.end()..]) {
        return None;
    }
    named_month_candidate(caps)
}

fn weekday_candidate(caps: &Captures<'_>) -> Option<Candidate> {
    let whole = caps.get(0)?;
    let token = caps.name("wd")?.as_str();
    let weekday = weekday_from_name(token)?;
    // Abbreviations such as "sun", "wed" or "sat" are ordinary words unless capitalised.
    if !is_full_weekday_name(token) && !is_capitalized(token) {
        return None;
    }
    let modifier = match caps
        .name("modifier")
        .map(|m| m.as_str().to_ascii_lowercase())
        .as_deref()
    {
        Some("next") => WeekdayModifier::Next,
        Some("last") => WeekdayModifier::Last,
        _ => WeekdayModifier::This,
    };
    Some(Candidate::new(
        whole.range(),
        DateSpec::Weekday { weekday, modifier },
    ))
}

fn casual_candidate(caps: &Captures<'_>) -> Option<Candidate> {
    let whole = caps.get(0)?;
    let word = caps.name("word")?.as_str().to_ascii_lowercase();
    let (days, implied_hour) = match word.as_str() {
        "today" => (0, None),
        "tonight" => (0, Some(TONIGHT_HOUR)),
        "tomorrow" => (1, None),
        "yesterday" => (-1, None),
        _ => return None,
    };
    let mut candidate = Candidate::new(whole.range(), DateSpec::DaysFromNow(days));
    candidate.implied_time = implied_hour.map(|hour| ClockTime { hour, minute: 0 });
    Some(candidate)
}

fn offset_candidate(caps: &Captures<'_>) -> Option<Candidate> {
    let whole = caps.get(0)?;
    if caps.name("next_week").is_some() {
        return Some(Candidate::new(whole.range(), DateSpec::DaysFromNow(7)));
    }
    let amount = count_from_word(caps.name("n")?.as_str())?;
    let unit = caps.name("unit")?.as_str().to_ascii_lowercase();
    let offset = if unit.starts_with("week") {
        Duration::weeks(amount)
    } else {
        Duration::days(amount)
    };
    Some(Candidate::new(whole.range(), DateSpec::Offset(offset)))
}

/// Extends date candidates with a time written right after or right before them.
fn attach_times(text: &str, dates: &mut [Candidate]) {
    for i in 0..dates.len() {
        let limit = dates.get(i + 1).map_or(text.len(), |next| next.start);
        let prev_end = if i == 0 { 0 } else { dates[i - 1].end };
        let candidate = &mut dates[i];

        if candidate.time.is_none() {
            if let Some((len, time)) = time_after(&text[candidate.end..limit]) {
                candidate.time = Some(time);
                candidate.end += len;
            } else {
                let lo = window_start(text, prev_end, candidate.start);
                if let Some((offset, time)) = time_before(&text[lo..candidate.start]) {
                    candidate.time = Some(time);
                    candidate.start = lo + offset;
                }
            }
        }

        if candidate.time.is_some()
            && let Some(tail) = RANGE_TAIL.find(&text[candidate.end..limit])
        {
            candidate.end += tail.end();
        }
    }
}

/// Times that are not part of any date: "at 2pm", "noon", "at 14:30".
fn standalone_times(text: &str, dates: &[Candidate]) -> Vec<Candidate> {
    let mut taken: Vec<Range<usize>> = dates.iter().map(|c| c.start..c.end).collect();
    let mut found = Vec::new();

    for caps in STANDALONE_TIME.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if taken.iter().any(|r| r.start < whole.end() && whole.start() < r.end) {
            continue;
        }
        // A bare 24-hour clock needs "at" to count as a time.
        if caps.name("h24").is_some() && caps.name("at").is_none() {
            continue;
        }
        let Some(time) = clock_time(&caps) else { continue };

        let mut end = whole.end();
        if let Some(tail) = RANGE_TAIL.find(&text[end..]) {
            end += tail.end();
        }
        taken.push(whole.start()..end);

        let mut candidate = Candidate::new(whole.start()..end, DateSpec::DaysFromNow(0));
        candidate.time = Some(time);
        found.push(candidate);
    }

    found
}

fn time_after(slice: &str) -> Option<(usize, ClockTime)> {
    let caps = TIME_AFTER.captures(slice)?;
    Some((caps.get(0)?.end(), clock_time(&caps)?))
}

fn time_before(slice: &str) -> Option<(usize, ClockTime)> {
    let caps = TIME_BEFORE.captures(slice)?;
    Some((caps.get(0)?.start(), clock_time(&caps)?))
}

/// Start of the look-behind window for a leading time, on a char boundary.
fn window_start(text: &str, floor: usize, start: usize) -> usize {
    let mut lo = floor.max(start.saturating_sub(TIME_BEFORE_WINDOW));
    while lo < start && !text.is_char_boundary(lo) {
        lo += 1;
    }
    lo
}

fn clock_time(caps: &Captures<'_>) -> Option<ClockTime> {
    if caps.name("noon").is_some() {
        return Some(ClockTime {
            hour: 12,
            minute: 0,
        });
    }
    if caps.name("midnight").is_some() {
        return Some(ClockTime { hour: 0, minute: 0 });
    }
    if let Some(meridiem) = caps.name("ap") {
        let hour = number(caps, "h")?;
        let minute = number(caps, "m").unwrap_or(0);
        if !(1..=12).contains(&hour) {
            return None;
        }
        let pm = meridiem.as_str().eq_ignore_ascii_case("p");
        let hour = if pm { hour % 12 + 12 } else { hour % 12 };
        return checked_clock(hour, minute);
    }
    checked_clock(number(caps, "h24")?, number(caps, "m24")?)
}

fn checked_clock(hour: u32, minute: u32) -> Option<ClockTime> {
    (hour < 24 && minute < 60).then_some(ClockTime { hour, minute })
}

/// Picks the year for `month`/`day`, comparing the full instant (date at
/// `time`) against `now`.
fn resolve_calendar(
    year: Option<i32>,
    month: u32,
    day: u32,
    time: ClockTime,
    now: NaiveDateTime,
    policy: YearPolicy,
) -> Option<NaiveDate> {
    if let Some(year) = year {
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    let this_year = now.year();
    let instant = |y: i32| {
        let date = NaiveDate::from_ymd_opt(y, month, day)?;
        Some((date, at_time(date, time.hour, time.minute)?))
    };
    match policy {
        YearPolicy::NextOccurrence => (this_year..=this_year + MAX_YEAR_LOOKAHEAD)
            .filter_map(instant)
            .find(|(_, at)| *at >= now)
            .map(|(date, _)| date),
        YearPolicy::Closest => [this_year, this_year + 1, this_year - 1]
            .into_iter()
            .filter_map(instant)
            .min_by_key(|(_, at)| (*at - now).num_minutes().abs())
            .map(|(date, _)| date),
    }
}

fn resolve_weekday(today: NaiveDate, weekday: Weekday, modifier: WeekdayModifier) -> Option<NaiveDate> {
    let target = i64::from(weekday.num_days_from_sunday());
    let current = i64::from(today.weekday().num_days_from_sunday());
    let days = match modifier {
        WeekdayModifier::This => (target - current).rem_euclid(7),
        // The named day in the following Sunday-started week.
        WeekdayModifier::Next => 7 - current + target,
        WeekdayModifier::Last => {
            let back = (current - target).rem_euclid(7);
            -(if back == 0 { 7 } else { back })
        }
    };
    today.checked_add_signed(Duration::days(days))
}

/// Byte bounds of the clause around `start..end`.
///
/// Clauses end at newlines, `;`, `|`, bullets, or a sentence-ending
/// punctuation mark followed by whitespace and an upper-case letter.
fn clause_bounds(text: &str, start: usize, end: usize) -> (usize, usize) {
    let mut lo = 0;
    for (i, c) in text[..start].char_indices().rev() {
        if is_hard_break(c) {
            lo = i + c.len_utf8();
            break;
        }
        if is_sentence_end(text, i, c) {
            lo = i + c.len_utf8();
            break;
        }
    }

    let mut hi = text.len();
    for (i, c) in text[end..].char_indices() {
        let at = end + i;
        if is_hard_break(c) || is_sentence_end(text, at, c) {
            hi = at;
            break;
        }
    }

    (lo, hi)
}

fn is_hard_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | ';' | '|' | '•')
}

fn is_sentence_end(text: &str, at: usize, c: char) -> bool {
    if !matches!(c, '.' | '!' | '?') {
        return false;
    }
    let rest = &text[at + c.len_utf8()..];
    rest.starts_with(char::is_whitespace) && rest.trim_start().starts_with(char::is_uppercase)
}

fn clean_clause(clause: &str) -> &str {
    clause
        .trim()
        .trim_start_matches(['-', '*', '•', '·', '–'])
        .trim()
}

fn number(caps: &Captures<'_>, name: &str) -> Option<u32> {
    caps.name(name)?.as_str().parse().ok()
}

fn starts_with_digit(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_digit())
}

fn is_capitalized(s: &str) -> bool {
    s.chars().next().is_some_and(char::is_uppercase)
}

fn month_from_name(name: &str) -> Option<u32> {
    let prefix = name.get(..3)?.to_ascii_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    let prefix = name.get(..3)?.to_ascii_lowercase();
    let weekday = match prefix.as_str() {
        "mon" => Weekday::Mon,
        "tue" => Weekday::Tue,
        "wed" => Weekday::Wed,
        "thu" => Weekday::Thu,
        "fri" => Weekday::Fri,
        "sat" => Weekday::Sat,
        "sun" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

fn is_full_weekday_name(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with("day")
}

fn count_from_word(word: &str) -> Option<i64> {
    let count = match word.to_ascii_lowercase().as_str() {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        digits => digits.parse().ok()?,
    };
    Some(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    /// Wednesday, September 4 2024, 09:00.
    fn reference() -> NaiveDateTime {
        dt(2024, 9, 4, 9, 0)
    }

    fn instants(text: &str) -> Vec<NaiveDateTime> {
        locate(text, reference()).map(|m| m.instant).collect()
    }

    fn expressions(text: &str) -> Vec<String> {
        locate(text, reference()).map(|m| m.expression).collect()
    }

    mod absolute {
        use super::*;

        #[test]
        fn numeric_with_time() {
            let matches: Vec<_> = locate("Midterm exam on 10/15 at 2pm", reference()).collect();
            assert_eq!(matches.len(), 1);
            assert_eq!(matches[0].instant, dt(2024, 10, 15, 14, 0));
            assert_eq!(matches[0].expression, "10/15 at 2pm");
            assert_eq!(matches[0].matched_text, "Midterm exam on 10/15 at 2pm");
            assert_eq!(matches[0].range, 16..28);
        }

        #[test]
        fn numeric_without_time_is_noon() {
            assert_eq!(instants("Project proposal due 11/01"), vec![dt(2024, 11, 1, 12, 0)]);
        }

        #[test]
        fn numeric_with_year() {
            assert_eq!(instants("due 1/15/2025"), vec![dt(2025, 1, 15, 12, 0)]);
            assert_eq!(instants("due 1/15/25"), vec![dt(2025, 1, 15, 12, 0)]);
        }

        #[test]
        fn iso_dates() {
            assert_eq!(instants("Exam 2024-12-10"), vec![dt(2024, 12, 10, 12, 0)]);
            assert_eq!(instants("Exam 2024-12-10T09:30"), vec![dt(2024, 12, 10, 9, 30)]);
            assert_eq!(instants("Exam 2024-12-10 16:45"), vec![dt(2024, 12, 10, 16, 45)]);
        }

        #[test]
        fn month_names() {
            assert_eq!(instants("Quiz Oct 15"), vec![dt(2024, 10, 15, 12, 0)]);
            assert_eq!(instants("Quiz October 15th, 2025"), vec![dt(2025, 10, 15, 12, 0)]);
            assert_eq!(instants("Quiz Sept. 30 at 9:15 am"), vec![dt(2024, 9, 30, 9, 15)]);
            assert_eq!(instants("Quiz 15 October"), vec![dt(2024, 10, 15, 12, 0)]);
            assert_eq!(instants("Quiz the 3rd of Dec"), vec![dt(2024, 12, 3, 12, 0)]);
        }

        #[test]
        fn weekday_prefix_is_part_of_the_date() {
            assert_eq!(
                expressions("Essay due Friday, October 18 by 11:59pm"),
                vec!["Friday, October 18 by 11:59pm"]
            );
            assert_eq!(instants("Essay due Friday, October 18 by 11:59pm"), vec![dt(2024, 10, 18, 23, 59)]);
        }

        #[test]
        fn invalid_dates_are_skipped() {
            assert!(instants("due 2/30").is_empty());
            assert!(instants("due 13/01").is_empty());
            assert!(instants("2024-02-30").is_empty());
        }

        #[test]
        fn slash_runs_and_scores_are_ignored() {
            assert!(instants("see docs/1/2/3 for details").is_empty());
            assert!(instants("grade 8.5/10 counts").is_empty());
        }

        #[test]
        fn lowercase_may_is_a_verb() {
            assert!(instants("you may 3 times resubmit").is_empty());
            assert_eq!(instants("Due May 3"), vec![dt(2025, 5, 3, 12, 0)]);
        }

        #[test]
        fn numbered_item_before_month_first_date() {
            assert_eq!(instants("Quiz 4 Nov 12"), vec![dt(2024, 11, 12, 12, 0)]);
            assert_eq!(instants("Homework 2 Oct 3"), vec![dt(2024, 10, 3, 12, 0)]);
            assert_eq!(expressions("Quiz 4 Nov 12"), vec!["Nov 12"]);
        }

        #[test]
        fn numbered_item_keeps_its_time() {
            let found: Vec<_> = locate("Lab 5 Sept 20 at 2pm", reference()).collect();
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].instant, dt(2024, 9, 20, 14, 0));
            assert_eq!(found[0].expression, "Sept 20 at 2pm");
            assert_eq!(found[0].matched_text, "Lab 5 Sept 20 at 2pm");
        }

        #[test]
        fn day_first_with_year_is_still_day_first() {
            assert_eq!(instants("Exam 15 Oct 2024"), vec![dt(2024, 10, 15, 12, 0)]);
        }
    }

    mod ambiguity {
        use super::*;

        #[test]
        fn month_first_by_default() {
            assert_eq!(instants("due 12/10"), vec![dt(2024, 12, 10, 12, 0)]);
        }

        #[test]
        fn day_first_option() {
            let locator = TemporalLocator::new(LocatorOptions {
                date_order: DateOrder::DayFirst,
                ..Default::default()
            });
            let found: Vec<_> = locator.locate("due 12/10", reference()).map(|m| m.instant).collect();
            assert_eq!(found, vec![dt(2024, 10, 12, 12, 0)]);
        }

        #[test]
        fn out_of_range_is_not_swapped() {
            assert!(instants("due 25/10").is_empty());
        }

        #[test]
        fn next_occurrence_rolls_to_next_year() {
            // September 4 reference: March has already passed.
            assert_eq!(instants("Final 3/10"), vec![dt(2025, 3, 10, 12, 0)]);
            // Later today still counts as this year.
            assert_eq!(instants("Lab 9/4"), vec![dt(2024, 9, 4, 12, 0)]);
        }

        #[test]
        fn earlier_today_rolls_to_next_year() {
            // Reference is 09:00 on September 4.
            assert_eq!(instants("Lab 9/4 at 8am"), vec![dt(2025, 9, 4, 8, 0)]);
            assert_eq!(instants("Lab Sep 4 at 9am"), vec![dt(2024, 9, 4, 9, 0)]);

            let afternoon = dt(2024, 10, 15, 15, 0);
            let found: Vec<_> = locate("Midterm exam on 10/15 at 2pm", afternoon)
                .map(|m| m.instant)
                .collect();
            assert_eq!(found, vec![dt(2025, 10, 15, 14, 0)]);
        }

        #[test]
        fn leap_day_searches_forward() {
            assert_eq!(instants("Feb 29"), vec![dt(2028, 2, 29, 12, 0)]);
        }

        #[test]
        fn closest_year_policy() {
            let locator = TemporalLocator::new(LocatorOptions {
                year_policy: YearPolicy::Closest,
                ..Default::default()
            });
            let found: Vec<_> = locator
                .locate("Review 8/20, Final 1/10", reference())
                .map(|m| m.instant)
                .collect();
            assert_eq!(found, vec![dt(2024, 8, 20, 12, 0), dt(2025, 1, 10, 12, 0)]);
        }
    }

    mod relative {
        use super::*;

        #[test]
        fn casual_days() {
            assert_eq!(instants("Reading due tomorrow"), vec![dt(2024, 9, 5, 12, 0)]);
            assert_eq!(instants("Quiz today at 3pm"), vec![dt(2024, 9, 4, 15, 0)]);
            assert_eq!(instants("Review tonight"), vec![dt(2024, 9, 4, 22, 0)]);
            assert_eq!(instants("Posted yesterday"), vec![dt(2024, 9, 3, 12, 0)]);
        }

        #[test]
        fn weekdays() {
            // Reference is a Wednesday.
            assert_eq!(instants("Lab Friday"), vec![dt(2024, 9, 6, 12, 0)]);
            assert_eq!(instants("Lab Wednesday"), vec![dt(2024, 9, 4, 12, 0)]);
            assert_eq!(instants("Lab this Monday"), vec![dt(2024, 9, 9, 12, 0)]);
            assert_eq!(instants("Lab next Friday"), vec![dt(2024, 9, 13, 12, 0)]);
            assert_eq!(instants("Lab next Monday"), vec![dt(2024, 9, 9, 12, 0)]);
            assert_eq!(instants("Lab last Wednesday"), vec![dt(2024, 8, 28, 12, 0)]);
            assert_eq!(instants("Lab Thu at 10am"), vec![dt(2024, 9, 5, 10, 0)]);
        }

        #[test]
        fn lowercase_abbreviations_are_words() {
            assert!(instants("sit in the sun and wed the ideas").is_empty());
        }

        #[test]
        fn offsets() {
            assert_eq!(instants("Draft in 3 days"), vec![dt(2024, 9, 7, 9, 0)]);
            assert_eq!(instants("Draft in two weeks"), vec![dt(2024, 9, 18, 9, 0)]);
            assert_eq!(instants("Draft next week"), vec![dt(2024, 9, 11, 12, 0)]);
        }
    }

    mod times {
        use super::*;

        #[test]
        fn time_before_date() {
            assert_eq!(
                expressions("Paper due 11:59 PM on Oct 3"),
                vec!["11:59 PM on Oct 3"]
            );
            assert_eq!(instants("Paper due 11:59 PM on Oct 3"), vec![dt(2024, 10, 3, 23, 59)]);
        }

        #[test]
        fn meridiem_variants() {
            assert_eq!(instants("Exam 10/15 at 9 a.m."), vec![dt(2024, 10, 15, 9, 0)]);
            assert_eq!(instants("Exam 10/15 12am"), vec![dt(2024, 10, 15, 0, 0)]);
            assert_eq!(instants("Exam 10/15 12pm"), vec![dt(2024, 10, 15, 12, 0)]);
            assert_eq!(instants("Exam 10/15 @ 14:30"), vec![dt(2024, 10, 15, 14, 30)]);
            assert_eq!(instants("Exam 10/15 at noon"), vec![dt(2024, 10, 15, 12, 0)]);
            assert_eq!(instants("Exam 10/15 at midnight"), vec![dt(2024, 10, 15, 0, 0)]);
        }

        #[test]
        fn invalid_time_is_not_attached() {
            assert_eq!(instants("Exam 10/15 at 13pm"), vec![dt(2024, 10, 15, 12, 0)]);
        }

        #[test]
        fn ranges_keep_start() {
            assert_eq!(expressions("Review 10/15 2pm-4pm"), vec!["10/15 2pm-4pm"]);
            assert_eq!(instants("Review 10/15 2pm-4pm"), vec![dt(2024, 10, 15, 14, 0)]);
        }

        #[test]
        fn standalone_times_use_reference_date() {
            assert_eq!(instants("Office hours at 3:30pm"), vec![dt(2024, 9, 4, 15, 30)]);
            assert_eq!(instants("Meet at 14:00"), vec![dt(2024, 9, 4, 14, 0)]);
            assert_eq!(instants("Lunch at noon to 1pm"), vec![dt(2024, 9, 4, 12, 0)]);
        }

        #[test]
        fn bare_clock_needs_at() {
            assert!(instants("Read pages 10:30 of the transcript").is_empty());
        }
    }

    mod clauses {
        use super::*;

        #[test]
        fn lines_are_separate_clauses() {
            let text = "Schedule\n- Homework 1 due 9/10\n- Midterm exam 10/15 at 2pm\n";
            let found: Vec<_> = locate(text, reference()).map(|m| m.matched_text).collect();
            assert_eq!(found, vec!["Homework 1 due 9/10", "Midterm exam 10/15 at 2pm"]);
        }

        #[test]
        fn sentences_split_clauses() {
            let text = "Project proposal due Oct 1. Final exam on Dec 12.";
            let found: Vec<_> = locate(text, reference()).map(|m| m.matched_text).collect();
            assert_eq!(found, vec!["Project proposal due Oct 1", "Final exam on Dec 12."]);
        }

        #[test]
        fn dates_in_one_clause_split_at_the_connector() {
            let text = "Project proposal due 11/01 and final exam on 12/12";
            let found: Vec<_> = locate(text, reference()).map(|m| m.matched_text).collect();
            assert_eq!(found, vec!["Project proposal due 11/01", "final exam on 12/12"]);

            let text = "Review 8/20, Final 1/10";
            let found: Vec<_> = locate(text, reference()).map(|m| m.matched_text).collect();
            assert_eq!(found, vec!["Review 8/20", "Final 1/10"]);
        }

        #[test]
        fn gap_without_connector_goes_to_later_date() {
            let found: Vec<_> = locate("HW 1 10/1 Quiz 10/3", reference()).collect();
            assert_eq!(found.len(), 2);
            assert_eq!(found[0].matched_text, "HW 1 10/1");
            assert_eq!(found[1].matched_text, "Quiz 10/3");
            assert!(found[0].range.end <= found[1].range.start);
        }

        #[test]
        fn source_order() {
            let text = "Final Dec 12; Quiz tomorrow; HW 2024-09-20";
            let found: Vec<_> = locate(text, reference()).map(|m| m.instant).collect();
            assert_eq!(
                found,
                vec![dt(2024, 12, 12, 12, 0), dt(2024, 9, 5, 12, 0), dt(2024, 9, 20, 12, 0)]
            );
        }
    }

    #[test]
    fn no_temporal_expressions() {
        assert!(instants("Welcome to Intro to Biology. Be kind.").is_empty());
        assert!(instants("").is_empty());
    }

    #[test]
    fn unicode_text_is_handled() {
        let text = "Résumé workshop • Café exam 10/15 — bring ID";
        let found: Vec<_> = locate(text, reference()).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].matched_text, "Café exam 10/15 — bring ID");
    }

    #[test]
    fn size_hint_is_an_upper_bound() {
        let matches = locate("2/30 and 3/1", reference());
        assert_eq!(matches.size_hint(), (0, Some(2)));
        assert_eq!(matches.count(), 1);
    }
}
