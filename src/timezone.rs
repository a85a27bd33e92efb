use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Get the current UTC offset of the timezone named `canonical_timezone`,
/// e.g. "Pacific/Auckland".
///
/// Returns `None` if the name is not a known timezone.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The current wall clock time in `canonical_timezone`, truncated to whole seconds.
pub(crate) fn local_now(canonical_timezone: &str) -> Option<PrimitiveDateTime> {
    let offset = get_local_offset(canonical_timezone)?;
    let now = OffsetDateTime::now_utc().to_offset(offset);
    let now = PrimitiveDateTime::new(now.date(), now.time());

    now.replace_nanosecond(0).ok()
}

#[cfg(test)]
mod tests {
    use super::{get_local_offset, local_now};

    #[test]
    fn utc_has_zero_offset() {
        let offset = get_local_offset("Etc/UTC").unwrap();

        assert!(offset.is_utc());
    }

    #[test]
    fn unknown_timezone_is_none() {
        assert_eq!(get_local_offset("Middle/Earth"), None);
        assert_eq!(local_now("Middle/Earth"), None);
    }

    #[test]
    fn local_now_has_no_subseconds() {
        let now = local_now("Pacific/Auckland").unwrap();

        assert_eq!(now.nanosecond(), 0);
    }
}
