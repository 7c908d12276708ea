// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The single-device state store.

use chrono::Utc;
use parking_lot::RwLock;

use crate::notify::DeviceToken;
use crate::state::config::{ConfigUpdate, DeviceConfig};
use crate::state::heartbeat::{HeartbeatPayload, HeartbeatRecord};

/// Everything the server remembers about the managed device: the latest
/// heartbeat, the registered push token, and the configuration.
///
/// All three entities live behind one lock, so each mutation is atomic
/// with respect to concurrent handlers. The store is in-memory only;
/// a restart forgets the heartbeat and the token and resets the
/// configuration to its defaults.
///
/// The store never logs and never talks to the gateway. Side effects
/// belong to the handlers in [`crate::server`].
#[derive(Debug, Default)]
pub struct DeviceStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    latest: Option<HeartbeatRecord>,
    token: Option<DeviceToken>,
    config: DeviceConfig,
}

impl DeviceStore {
    /// Creates an empty store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a heartbeat stamped with the current instant and returns
    /// the stored record plus whether the push token changed.
    ///
    /// The previous record is replaced wholesale. A `token` of `None`
    /// leaves the registered token untouched; re-sending the stored
    /// token reports no change.
    pub fn record_heartbeat(
        &self,
        payload: HeartbeatPayload,
        token: Option<DeviceToken>,
    ) -> (HeartbeatRecord, bool) {
        let mut inner = self.inner.write();

        // Stamped under the guard so the newest record is also the
        // newest instant
        let record = HeartbeatRecord::new(Utc::now(), payload);
        inner.latest = Some(record.clone());

        let token_changed = match token {
            Some(token) if inner.token.as_ref() != Some(&token) => {
                inner.token = Some(token);
                true
            }
            _ => false,
        };

        (record, token_changed)
    }

    /// Returns the most recent heartbeat, or `None` if no device has
    /// reported since startup.
    #[must_use]
    pub fn latest(&self) -> Option<HeartbeatRecord> {
        self.inner.read().latest.clone()
    }

    /// Returns a snapshot of the current configuration.
    #[must_use]
    pub fn config(&self) -> DeviceConfig {
        self.inner.read().config
    }

    /// Applies the update's present fields and returns the
    /// configuration before and after the merge.
    ///
    /// Compare and write happen under one write guard; a concurrent
    /// update cannot interleave between them.
    pub fn merge_config(&self, update: ConfigUpdate) -> (DeviceConfig, DeviceConfig) {
        let mut inner = self.inner.write();
        let before = inner.config;
        inner.config = before.merged(update);
        (before, inner.config)
    }

    /// Returns the registered push token, if any.
    #[must_use]
    pub fn token(&self) -> Option<DeviceToken> {
        self.inner.read().token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> HeartbeatPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn fresh_store_is_empty_with_default_config() {
        let store = DeviceStore::new();

        assert!(store.latest().is_none());
        assert!(store.token().is_none());
        assert_eq!(store.config(), DeviceConfig::default());
    }

    #[test]
    fn heartbeat_is_stored_and_returned() {
        let store = DeviceStore::new();
        let (record, _) = store.record_heartbeat(payload(json!({ "battery": 55 })), None);

        assert_eq!(store.latest(), Some(record));
    }

    #[test]
    fn newer_heartbeat_replaces_older_wholesale() {
        let store = DeviceStore::new();
        store.record_heartbeat(payload(json!({ "battery": 55, "extra": true })), None);
        let (second, _) = store.record_heartbeat(payload(json!({ "battery": 54 })), None);

        let latest = store.latest().unwrap();
        assert_eq!(latest, second);
        assert!(!latest.payload.contains_key("extra"));
    }

    #[test]
    fn first_token_counts_as_changed() {
        let store = DeviceStore::new();
        let (_, changed) =
            store.record_heartbeat(payload(json!({})), Some(DeviceToken::new("abc123")));

        assert!(changed);
        assert_eq!(store.token(), Some(DeviceToken::new("abc123")));
    }

    #[test]
    fn resending_same_token_is_not_a_change() {
        let store = DeviceStore::new();
        store.record_heartbeat(payload(json!({})), Some(DeviceToken::new("abc123")));
        let (_, changed) =
            store.record_heartbeat(payload(json!({})), Some(DeviceToken::new("abc123")));

        assert!(!changed);
    }

    #[test]
    fn new_token_overwrites_the_single_slot() {
        let store = DeviceStore::new();
        store.record_heartbeat(payload(json!({})), Some(DeviceToken::new("old")));
        let (_, changed) = store.record_heartbeat(payload(json!({})), Some(DeviceToken::new("new")));

        assert!(changed);
        assert_eq!(store.token(), Some(DeviceToken::new("new")));
    }

    #[test]
    fn heartbeat_without_token_keeps_registration() {
        let store = DeviceStore::new();
        store.record_heartbeat(payload(json!({})), Some(DeviceToken::new("abc123")));
        let (_, changed) = store.record_heartbeat(payload(json!({ "battery": 9 })), None);

        assert!(!changed);
        assert_eq!(store.token(), Some(DeviceToken::new("abc123")));
    }

    #[test]
    fn merge_reports_before_and_after() {
        let store = DeviceStore::new();
        let (before, after) = store.merge_config(ConfigUpdate::new().with_launcher_visible(false));

        assert!(before.launcher_visible);
        assert!(!after.launcher_visible);
        assert_eq!(store.config(), after);
    }

    #[test]
    fn merge_without_fields_changes_nothing() {
        let store = DeviceStore::new();
        store.merge_config(ConfigUpdate::new().with_lock_device(true));

        let (before, after) = store.merge_config(ConfigUpdate::new());
        assert_eq!(before, after);
        assert!(after.lock_device);
    }
}
