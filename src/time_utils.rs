// SPDX-License-Identifier: MIT
// Copyright 2026 PT Mate contributors

//! Shared helpers for date/time formatting and calendar windows.
//!
//! Stored timestamps use a fixed-width RFC3339 form (UTC, millisecond
//! precision, `Z` suffix) so that string comparison in the document store
//! matches chronological order.

use chrono::{DateTime, Datelike, Duration, FixedOffset, SecondsFormat, TimeZone, Utc};

/// Format a UTC timestamp as fixed-width RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC3339 timestamp (any offset) into UTC.
pub fn parse_rfc3339(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a range bound from a query string: a full RFC3339 timestamp, or a
/// bare `YYYY-MM-DD` date taken as local midnight in `tz`.
pub fn parse_time_bound(raw: &str, tz: FixedOffset) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    parse_rfc3339(raw).or_else(|| {
        chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(|date| local_midnight(date, tz))
    })
}

/// Parse a `+HH:MM` / `-HH:MM` offset string.
pub fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Half-open `[start, end)` interval in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Midnight-to-midnight window containing `now` in the given zone.
pub fn day_window(now: DateTime<Utc>, tz: FixedOffset) -> Window {
    let local = now.with_timezone(&tz).date_naive();
    let start = local_midnight(local, tz);
    Window {
        start,
        end: start + Duration::days(1),
    }
}

/// Sunday-to-Sunday week window containing `now` in the given zone.
pub fn week_window(now: DateTime<Utc>, tz: FixedOffset) -> Window {
    let local = now.with_timezone(&tz).date_naive();
    let back = local.weekday().num_days_from_sunday() as i64;
    let start = local_midnight(local - Duration::days(back), tz);
    Window {
        start,
        end: start + Duration::days(7),
    }
}

fn local_midnight(date: chrono::NaiveDate, tz: FixedOffset) -> DateTime<Utc> {
    // Fixed offsets have no gaps, so a local midnight always maps to one instant.
    let naive = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    Utc.from_utc_datetime(&(naive - Duration::seconds(tz.local_minus_utc() as i64)))
}

/// Serde adapter storing `DateTime<Utc>` in the fixed-width form.
pub mod rfc3339 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_utc_rfc3339(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_rfc3339(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    /// Same as the parent module, for optional timestamps.
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            date: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => s.serialize_str(&super::super::format_utc_rfc3339(*d)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<String>::deserialize(d)?
                .map(|raw| {
                    super::super::parse_rfc3339(&raw).ok_or_else(|| {
                        serde::de::Error::custom(format!("invalid timestamp: {raw}"))
                    })
                })
                .transpose()
        }
    }
}
