//! Resolving the configured timezone to get the local date.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// Get the current UTC offset of the timezone named `canonical_timezone`,
/// e.g. "America/Sao_Paulo".
///
/// Returns `None` if there is no timezone with that name.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Today's date in the timezone named `canonical_timezone`.
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if there is no timezone with that name.
pub fn local_today(canonical_timezone: &str) -> Result<Date, Error> {
    let Some(offset) = get_local_offset(canonical_timezone) else {
        tracing::error!("Invalid timezone {canonical_timezone}");
        return Err(Error::InvalidTimezoneError(canonical_timezone.to_owned()));
    };

    Ok(OffsetDateTime::now_utc().to_offset(offset).date())
}
