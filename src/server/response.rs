// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request and response bodies for the device and admin endpoints.
//!
//! These types serialize to exactly the JSON documents the device app
//! and the dashboard already consume, so an embedding HTTP layer can
//! pass them straight through.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::notify::{DeviceToken, PushCommand, PushMessage};
use crate::state::{DeviceConfig, HeartbeatRecord};

/// Title used when an ad-hoc notification omits one.
const DEFAULT_TITLE: &str = "Notification";
/// Command marker used when an ad-hoc notification omits one. The
/// device shows such pushes without acting on them.
const DEFAULT_COMMAND: &str = "NONE";

/// Acknowledgement returned to the device for a stored heartbeat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeartbeatAck {
    /// Always `success`; storing a heartbeat cannot fail.
    pub status: &'static str,
    /// Fixed confirmation text.
    pub message: &'static str,
    /// Readable IST time the heartbeat was stamped with.
    #[serde(rename = "serverTimeIST")]
    pub server_time_ist: String,
    /// Configuration snapshot for the device to apply on this cycle.
    pub config: DeviceConfig,
}

impl HeartbeatAck {
    pub(crate) fn new(server_time_ist: String, config: DeviceConfig) -> Self {
        Self {
            status: "success",
            message: "Heartbeat logged",
            server_time_ist,
            config,
        }
    }
}

/// The admin's view of the device: the latest heartbeat merged with the
/// current configuration and push token, or an explicit empty marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LatestReport {
    /// No heartbeat has arrived since the server started.
    ///
    /// Serializes to exactly `{"status":"empty"}` so the dashboard can
    /// tell "no data yet" apart from a missing response.
    Empty {
        /// Always `empty`.
        status: &'static str,
    },
    /// At least one heartbeat is on file.
    Report {
        /// The stored heartbeat, flattened into the document.
        #[serde(flatten)]
        record: HeartbeatRecord,
        /// Configuration at read time.
        #[serde(rename = "currentConfig")]
        current_config: DeviceConfig,
        /// Registered push token; `null` when none was advertised yet.
        #[serde(rename = "deviceToken")]
        device_token: Option<DeviceToken>,
    },
}

impl LatestReport {
    /// The empty-state marker.
    #[must_use]
    pub fn empty() -> Self {
        Self::Empty { status: "empty" }
    }

    pub(crate) fn report(
        record: HeartbeatRecord,
        current_config: DeviceConfig,
        device_token: Option<DeviceToken>,
    ) -> Self {
        Self::Report {
            record,
            current_config,
            device_token,
        }
    }

    /// Returns true if no heartbeat is on file.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

/// Outcome of a configuration update.
///
/// The update itself always succeeds; the interesting part is what
/// happened to the notification tied to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigUpdateOutcome {
    /// Always `success`; invalid fields are skipped, not rejected.
    pub status: &'static str,
    /// Fixed confirmation text.
    pub message: &'static str,
    /// What happened to the launcher-visibility push.
    #[serde(rename = "notificationStatus")]
    pub notification_status: NotificationStatus,
    /// The full configuration after the merge.
    #[serde(rename = "currentConfig")]
    pub current_config: DeviceConfig,
}

impl ConfigUpdateOutcome {
    pub(crate) fn new(
        notification_status: NotificationStatus,
        current_config: DeviceConfig,
    ) -> Self {
        Self {
            status: "success",
            message: "Config updated",
            notification_status,
            current_config,
        }
    }
}

/// What happened to the push notification tied to a config update.
///
/// Serializes as a human-readable string in `notificationStatus`:
/// `sent`, `not attempted: <reason>`, or `failed to send: <reason>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationStatus {
    /// The gateway accepted the push.
    Sent,
    /// No push was attempted; nothing to announce or nobody to tell.
    NotAttempted {
        /// Why the push was skipped.
        reason: String,
    },
    /// A push was due but delivery failed. The config change itself
    /// stays committed.
    Failed {
        /// The delivery error, rendered for the admin.
        reason: String,
    },
}

impl NotificationStatus {
    /// Returns true if the gateway accepted a push.
    #[must_use]
    pub fn was_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }

    pub(crate) fn not_attempted(reason: impl Into<String>) -> Self {
        Self::NotAttempted {
            reason: reason.into(),
        }
    }

    pub(crate) fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent => write!(f, "sent"),
            Self::NotAttempted { reason } => write!(f, "not attempted: {reason}"),
            Self::Failed { reason } => write!(f, "failed to send: {reason}"),
        }
    }
}

impl Serialize for NotificationStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Body of an ad-hoc notification request.
///
/// Every field is optional; omitted fields fall back to neutral
/// defaults so an admin can fire a test push with an empty body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NotifyRequest {
    /// Notification title.
    #[serde(default)]
    pub title: Option<String>,
    /// Notification body text.
    #[serde(default)]
    pub body: Option<String>,
    /// Command marker for the device-side handler.
    #[serde(default)]
    pub command: Option<String>,
}

impl NotifyRequest {
    /// Creates an empty request that sends the default notification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the body text.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the command marker.
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub(crate) fn into_message(self) -> PushMessage {
        PushMessage::new(
            self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            self.body.unwrap_or_default(),
            self.command
                .map_or_else(|| PushCommand::from(DEFAULT_COMMAND), PushCommand::from),
        )
    }
}

/// Acknowledgement for a delivered ad-hoc notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotifyAck {
    /// Always `success`; failures surface as [`crate::Error`] instead.
    pub status: &'static str,
    /// The gateway's receipt, forwarded verbatim.
    #[serde(rename = "firebaseResponse")]
    pub firebase_response: serde_json::Value,
}

impl NotifyAck {
    pub(crate) fn new(firebase_response: serde_json::Value) -> Self {
        Self {
            status: "success",
            firebase_response,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn heartbeat_ack_wire_shape() {
        let ack = HeartbeatAck::new(
            "21 Aug 2026, 07:46:33 PM".to_string(),
            DeviceConfig::default(),
        );

        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(
            json,
            json!({
                "status": "success",
                "message": "Heartbeat logged",
                "serverTimeIST": "21 Aug 2026, 07:46:33 PM",
                "config": { "launcherVisible": true, "lockDevice": false },
            })
        );
    }

    #[test]
    fn empty_report_is_exactly_the_sentinel() {
        let json = serde_json::to_value(LatestReport::empty()).unwrap();
        assert_eq!(json, json!({ "status": "empty" }));
    }

    #[test]
    fn report_merges_record_config_and_token() {
        let received = "2024-01-15T10:30:00.000Z".parse().unwrap();
        let payload = serde_json::from_value(json!({ "battery": 88 })).unwrap();
        let report = LatestReport::report(
            HeartbeatRecord::new(received, payload),
            DeviceConfig::default(),
            Some(DeviceToken::new("abc123")),
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            json!({
                "receivedAtUTC": "2024-01-15T10:30:00.000Z",
                "receivedAtIST": "2024-01-15T16:00:00.000+05:30",
                "readableTime": "15 Jan 2024, 04:00:00 PM",
                "payload": { "battery": 88 },
                "currentConfig": { "launcherVisible": true, "lockDevice": false },
                "deviceToken": "abc123",
            })
        );
    }

    #[test]
    fn report_without_token_serializes_null() {
        let payload = serde_json::from_value(json!({})).unwrap();
        let report = LatestReport::report(
            HeartbeatRecord::new("2024-01-15T10:30:00Z".parse().unwrap(), payload),
            DeviceConfig::default(),
            None,
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["deviceToken"], json!(null));
        assert!(!report.is_empty());
    }

    #[test]
    fn notification_status_strings() {
        assert_eq!(NotificationStatus::Sent.to_string(), "sent");
        assert_eq!(
            NotificationStatus::not_attempted("no device token registered").to_string(),
            "not attempted: no device token registered"
        );
        assert_eq!(
            NotificationStatus::failed("HTTP 503").to_string(),
            "failed to send: HTTP 503"
        );
    }

    #[test]
    fn config_outcome_wire_shape() {
        let outcome = ConfigUpdateOutcome::new(
            NotificationStatus::Sent,
            DeviceConfig {
                launcher_visible: false,
                lock_device: false,
            },
        );

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            json!({
                "status": "success",
                "message": "Config updated",
                "notificationStatus": "sent",
                "currentConfig": { "launcherVisible": false, "lockDevice": false },
            })
        );
    }

    #[test]
    fn notify_request_defaults() {
        let message = NotifyRequest::new().into_message();
        assert_eq!(message.title, "Notification");
        assert_eq!(message.body, "");
        assert_eq!(message.command, PushCommand::Custom("NONE".to_string()));
    }

    #[test]
    fn notify_request_sync_command_maps_to_marker() {
        let message = NotifyRequest::new()
            .with_title("Hello")
            .with_body("world")
            .with_command("SYNC")
            .into_message();

        assert_eq!(message.title, "Hello");
        assert_eq!(message.body, "world");
        assert_eq!(message.command, PushCommand::Sync);
    }

    #[test]
    fn notify_request_deserializes_sparse_bodies() {
        let request: NotifyRequest = serde_json::from_value(json!({ "title": "Hi" })).unwrap();
        assert_eq!(request.title.as_deref(), Some("Hi"));
        assert_eq!(request.body, None);
        assert_eq!(request.command, None);

        let request: NotifyRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(request, NotifyRequest::new());
    }

    #[test]
    fn notify_ack_wire_shape() {
        let ack = NotifyAck::new(json!({ "success": 1, "failure": 0 }));

        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(
            json,
            json!({
                "status": "success",
                "firebaseResponse": { "success": 1, "failure": 0 },
            })
        );
    }
}
