//! The token stored in the auth cookie.

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::auth::UserID;

mod datetime_format {
    //! Serializes a [time::OffsetDateTime] with a fixed width hour.
    //!
    //! The default serializer writes midnight as "0:00:00.0", which the
    //! default deserializer then rejects because it expects two hour digits.
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{
        OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
    };

    /// e.g. "2021-01-01 00:00:00.0 +00:00:00".
    const DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour \
             sign:mandatory]:[offset_minute]:[offset_second]"
    );

    pub fn serialize<S>(date_time: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date_time
            .format(DATE_TIME_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&raw, DATE_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Who the session belongs to and when it stops being valid.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub user_id: UserID,

    #[serde(
        serialize_with = "datetime_format::serialize",
        deserialize_with = "datetime_format::deserialize"
    )]
    pub expires_at: OffsetDateTime,
}

impl Token {
    /// A token for `user_id` that expires `duration` from now.
    ///
    /// Returns `None` if the expiry would overflow.
    pub fn new(user_id: UserID, duration: Duration) -> Option<Self> {
        let expires_at = OffsetDateTime::now_utc().checked_add(duration)?;

        Some(Self {
            user_id,
            expires_at,
        })
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= OffsetDateTime::now_utc()
    }
}

#[cfg(test)]
mod tests {
    use time::{Duration, UtcOffset, macros::datetime};

    use crate::auth::UserID;

    use super::Token;

    #[test]
    fn serializes_with_fixed_width_hour() {
        let token = Token {
            user_id: UserID::new(7),
            expires_at: datetime!(2025-12-21 03:54:00).assume_offset(UtcOffset::UTC),
        };

        let serialized = serde_json::to_string(&token).unwrap();

        assert_eq!(
            serialized,
            r#"{"user_id":7,"expires_at":"2025-12-21 03:54:00.0 +00:00:00"}"#
        );
    }

    #[test]
    fn deserializes_midnight_expiry() {
        let want = Token {
            user_id: UserID::new(7),
            expires_at: datetime!(2025-12-21 00:00:00).assume_offset(UtcOffset::UTC),
        };

        let got: Token =
            serde_json::from_str(r#"{"user_id":7,"expires_at":"2025-12-21 00:00:00.0 +00:00:00"}"#)
                .unwrap();

        assert_eq!(got, want);
    }

    #[test]
    fn round_trips_through_json() {
        let token = Token::new(UserID::new(3), Duration::minutes(5)).unwrap();

        let serialized = serde_json::to_string(&token).unwrap();
        let got: Token = serde_json::from_str(&serialized).unwrap();

        assert_eq!(got, token);
    }

    #[test]
    fn expiry() {
        let fresh = Token::new(UserID::new(1), Duration::minutes(5)).unwrap();
        let stale = Token::new(UserID::new(1), Duration::seconds(-1)).unwrap();

        assert!(!fresh.is_expired());
        assert!(stale.is_expired());
    }
}
