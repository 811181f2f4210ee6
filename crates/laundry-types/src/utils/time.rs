//! Clock helpers.

use chrono::{Local, NaiveDate};

/// Seconds since the UNIX epoch, or 0 if the system clock is set before it.
pub fn current_timestamp() -> u64 {
	u64::try_from(Local::now().timestamp()).unwrap_or(0)
}

/// Today's date in the local time zone. Drafts are validated against it.
pub fn local_today() -> NaiveDate {
	Local::now().date_naive()
}
