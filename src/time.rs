// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Timestamp rendering for heartbeat records.
//!
//! The managed device fleet operates in Indian Standard Time, so every
//! stored heartbeat carries the arrival instant three ways: an RFC 3339
//! UTC string (source of truth), the same instant shifted to IST with an
//! explicit `+05:30` offset, and a human-readable IST string for log
//! lines and dashboards.
//!
//! All functions here are pure: they take the instant as an argument and
//! never read the clock, so the same input always yields the same string.
//!
//! # Examples
//!
//! ```
//! use chrono::DateTime;
//! use tether::time;
//!
//! let instant = "2024-01-15T10:30:00.000Z".parse::<DateTime<chrono::Utc>>().unwrap();
//! assert_eq!(time::ist_timestamp(instant), "2024-01-15T16:00:00.000+05:30");
//! assert_eq!(time::readable_ist(instant), "15 Jan 2024, 04:00:00 PM");
//! ```

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

/// Indian Standard Time, UTC+5:30. No daylight saving.
pub const IST_OFFSET: FixedOffset = match FixedOffset::east_opt(5 * 3600 + 30 * 60) {
    Some(offset) => offset,
    None => panic!("5:30 hours east is a valid offset"),
};

/// Renders the instant as an RFC 3339 UTC string with millisecond
/// precision, e.g. `2024-01-15T10:30:00.000Z`.
#[must_use]
pub fn utc_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Renders the instant shifted to IST, with the `+05:30` offset spelled
/// out, e.g. `2024-01-15T16:00:00.000+05:30`.
///
/// The offset designator always matches the shifted wall-clock digits;
/// the string never carries a misleading `Z`.
#[must_use]
pub fn ist_timestamp(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&IST_OFFSET)
        .to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// Renders the instant as a human-readable IST string:
/// day, abbreviated month, year, 12-hour clock with seconds and an
/// AM/PM marker, e.g. `15 Jan 2024, 04:00:00 PM`.
#[must_use]
pub fn readable_ist(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&IST_OFFSET)
        .format("%d %b %Y, %I:%M:%S %p")
        .to_string()
}
