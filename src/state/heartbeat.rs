// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heartbeat records and the opaque device payload.
//!
//! A heartbeat body is whatever JSON object the device chooses to send:
//! battery level, app version, location, anything. The server never
//! interprets it beyond looking for one well-known field, the push
//! token. Everything else is stored and reported back verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::time;

/// The JSON object a device POSTs on each heartbeat, passed through
/// unmodified.
pub type HeartbeatPayload = serde_json::Map<String, Value>;

/// Payload field a device uses to advertise its FCM registration token.
pub const TOKEN_FIELD: &str = "fcmToken";

/// Returns the payload's push token, when present as a JSON string.
///
/// A token of any other JSON type is treated as absent; the heartbeat
/// itself is still accepted.
#[must_use]
pub fn token_in(payload: &HeartbeatPayload) -> Option<&str> {
    payload.get(TOKEN_FIELD)?.as_str()
}

/// A stored heartbeat: the arrival instant rendered three ways plus the
/// device payload.
///
/// Wire field names (`receivedAtUTC`, `receivedAtIST`, `readableTime`)
/// are what the dashboard already consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatRecord {
    /// Arrival instant; source of truth for the derived strings.
    #[serde(rename = "receivedAtUTC", serialize_with = "utc_millis")]
    pub received_at_utc: DateTime<Utc>,
    /// Arrival instant shifted to IST, with an explicit `+05:30` offset.
    #[serde(rename = "receivedAtIST")]
    pub received_at_ist: String,
    /// Human-readable IST arrival time, e.g. `21 Aug 2026, 07:46:33 PM`.
    #[serde(rename = "readableTime")]
    pub readable_time: String,
    /// Device-reported body, stored verbatim.
    pub payload: HeartbeatPayload,
}

impl HeartbeatRecord {
    /// Stamps a record for a payload that arrived at `received_at`.
    #[must_use]
    pub fn new(received_at: DateTime<Utc>, payload: HeartbeatPayload) -> Self {
        Self {
            received_at_ist: time::ist_timestamp(received_at),
            readable_time: time::readable_ist(received_at),
            received_at_utc: received_at,
            payload,
        }
    }

    /// Returns the push token advertised in the payload, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        token_in(&self.payload)
    }
}

/// Keeps the UTC wire string at fixed millisecond precision.
fn utc_millis<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&time::utc_timestamp(*instant))
}
