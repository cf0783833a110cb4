//! iCalendar export for syllacal.
//!
//! [`IcsEncoder`] implements the core's [`CalendarEncoder`](syllacal_core::CalendarEncoder)
//! seam; [`read_entries`] parses an exported stream back for verification.

pub mod encoder;
pub mod error;
pub mod read;

pub use encoder::{BUSY_STATUS_PROPERTY, IcsEncoder};
pub use error::{IcsError, IcsResult};
pub use read::{IcsEntry, read_entries};
