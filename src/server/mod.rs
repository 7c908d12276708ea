// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The backend core: one handler per exposed endpoint.
//!
//! [`DeviceServer`] owns the device state and the push gateway client.
//! It deliberately stops short of HTTP: an embedding layer binds the
//! port, parses JSON bodies, and maps routes onto these handlers
//! one-to-one:
//!
//! - `POST /heartbeat` → [`DeviceServer::handle_heartbeat`]
//! - `GET /heartbeat/latest` → [`DeviceServer::latest_report`]
//! - `GET /admin/config` → [`DeviceServer::current_config`]
//! - `POST /admin/config` → [`DeviceServer::apply_config_update`]
//! - `POST /admin/notify` → [`DeviceServer::send_notification`]
//!
//! Handler return values serialize to the exact response documents;
//! handler errors classify themselves via [`Error::is_client_error`]
//! and [`Error::is_server_error`] for status-code mapping.
//!
//! # Examples
//!
//! ```no_run
//! use serde_json::json;
//! use tether::{ConfigUpdate, DeviceServer, FcmConfig};
//!
//! # async fn example() -> tether::Result<()> {
//! let push = FcmConfig::new("AAAA...server-key").into_client()?;
//! let server = DeviceServer::new(push);
//!
//! // Device reports in and registers its push token
//! let payload = serde_json::from_value(json!({ "battery": 88, "fcmToken": "abc" })).unwrap();
//! let ack = server.handle_heartbeat(payload);
//! assert_eq!(ack.status, "success");
//!
//! // Admin hides the launcher; the device gets a SYNC push
//! let outcome = server
//!     .apply_config_update(ConfigUpdate::new().with_launcher_visible(false))
//!     .await;
//! assert!(outcome.notification_status.was_sent());
//! # Ok(())
//! # }
//! ```

mod response;

pub use response::{
    ConfigUpdateOutcome, HeartbeatAck, LatestReport, NotificationStatus, NotifyAck, NotifyRequest,
};

use crate::error::{Error, Result};
use crate::notify::{DeviceToken, PushClient, PushMessage};
use crate::state::{ConfigUpdate, DeviceConfig, DeviceStore, HeartbeatPayload, token_in};

/// The management backend for one device.
///
/// Generic over the push gateway so tests can substitute an in-memory
/// recorder for the real FCM client. All handlers take `&self`; wrap
/// the server in an `Arc` to share it across request tasks.
#[derive(Debug)]
pub struct DeviceServer<P: PushClient> {
    store: DeviceStore,
    push: P,
}

impl<P: PushClient> DeviceServer<P> {
    /// Creates a server with an empty store and default configuration.
    #[must_use]
    pub fn new(push: P) -> Self {
        Self {
            store: DeviceStore::new(),
            push,
        }
    }

    /// Returns the underlying state store.
    #[must_use]
    pub fn store(&self) -> &DeviceStore {
        &self.store
    }

    // ========== Device-facing ==========

    /// Stores a heartbeat and acknowledges it.
    ///
    /// The payload is stored verbatim, whatever the device chose to
    /// send; a heartbeat cannot fail. When the payload advertises a
    /// push token, the registration is updated before the ack is built.
    /// The ack carries the readable IST arrival time and the current
    /// configuration, so the device applies config changes on the same
    /// cycle that reported them.
    pub fn handle_heartbeat(&self, payload: HeartbeatPayload) -> HeartbeatAck {
        let token = token_in(&payload).map(DeviceToken::from);
        let (record, token_changed) = self.store.record_heartbeat(payload, token.clone());

        if token_changed {
            tracing::info!(token = ?token, "Device push token registered");
        }
        tracing::info!(received = %record.readable_time, "Heartbeat received");
        tracing::debug!(payload = ?record.payload, "Heartbeat payload");

        HeartbeatAck::new(record.readable_time, self.store.config())
    }

    // ========== Admin-facing ==========

    /// Returns the latest heartbeat merged with the current
    /// configuration and push token, or the explicit empty marker when
    /// no device has reported since startup.
    #[must_use]
    pub fn latest_report(&self) -> LatestReport {
        match self.store.latest() {
            Some(record) => {
                LatestReport::report(record, self.store.config(), self.store.token())
            }
            None => LatestReport::empty(),
        }
    }

    /// Returns the current configuration document.
    #[must_use]
    pub fn current_config(&self) -> DeviceConfig {
        self.store.config()
    }

    /// Merges a partial configuration update and announces launcher
    /// visibility changes to the device.
    ///
    /// The merge commits first; the push happens after and its failure
    /// never rolls the merge back. Lock transitions are not announced;
    /// the device picks them up with its next heartbeat ack. Fields the
    /// update omitted (or sent with a non-boolean value) stay as they
    /// were.
    pub async fn apply_config_update(&self, update: ConfigUpdate) -> ConfigUpdateOutcome {
        let (before, after) = self.store.merge_config(update);

        if before == after {
            tracing::debug!(config = ?after, "Config update changed nothing");
        } else {
            tracing::info!(before = ?before, after = ?after, "Config updated");
        }

        let notification_status = self.announce_visibility_change(before, after).await;
        ConfigUpdateOutcome::new(notification_status, after)
    }

    /// Sends an ad-hoc push notification to the device.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTokenRegistered`] when no device has
    /// advertised a push token yet (the caller's problem: there is
    /// nobody to notify), or [`Error::Notify`] when the gateway call
    /// fails.
    pub async fn send_notification(&self, request: NotifyRequest) -> Result<NotifyAck> {
        let Some(target) = self.store.token() else {
            return Err(Error::NoTokenRegistered);
        };

        let message = request.into_message();
        let receipt = self.push.send(&target, &message).await?;

        tracing::info!(command = %message.command, "Ad-hoc notification delivered");

        Ok(NotifyAck::new(receipt.to_json()))
    }

    // ========== Helpers ==========

    /// Pushes a `SYNC` notification when launcher visibility actually
    /// changed and a device token is registered. Everything else is a
    /// silent no-op reported in the returned status.
    async fn announce_visibility_change(
        &self,
        before: DeviceConfig,
        after: DeviceConfig,
    ) -> NotificationStatus {
        if before.launcher_visible == after.launcher_visible {
            return NotificationStatus::not_attempted("launcher visibility unchanged");
        }

        let Some(target) = self.store.token() else {
            return NotificationStatus::not_attempted("no device token registered");
        };

        let body = if after.launcher_visible {
            "visibility enabled"
        } else {
            "visibility disabled"
        };
        let message = PushMessage::sync("Configuration changed", body);

        match self.push.send(&target, &message).await {
            Ok(receipt) => {
                tracing::debug!(receipt = %receipt.body(), "Visibility change announced");
                NotificationStatus::Sent
            }
            Err(err) => {
                // The merge is already committed and stays that way
                tracing::warn!(error = %err, "Visibility change push failed");
                NotificationStatus::failed(err.to_string())
            }
        }
    }
}
