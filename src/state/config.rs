// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remote configuration toggles and partial updates.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The configuration document the managed device obeys.
///
/// Serialized with the wire names the device expects
/// (`launcherVisible`, `lockDevice`).
///
/// # Examples
///
/// ```
/// use tether::DeviceConfig;
///
/// let config = DeviceConfig::default();
/// assert!(config.launcher_visible);
/// assert!(!config.lock_device);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConfig {
    /// Whether the device's launcher is visible to the person holding it.
    pub launcher_visible: bool,
    /// Whether the device is remotely locked.
    pub lock_device: bool,
}

impl DeviceConfig {
    /// Returns a copy with the update's present fields applied and the
    /// absent fields left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use tether::{ConfigUpdate, DeviceConfig};
    ///
    /// let before = DeviceConfig::default();
    /// let after = before.merged(ConfigUpdate::new().with_launcher_visible(false));
    /// assert!(!after.launcher_visible);
    /// assert_eq!(after.lock_device, before.lock_device);
    /// ```
    #[must_use]
    pub fn merged(self, update: ConfigUpdate) -> Self {
        Self {
            launcher_visible: update.launcher_visible.unwrap_or(self.launcher_visible),
            lock_device: update.lock_device.unwrap_or(self.lock_device),
        }
    }
}

impl Default for DeviceConfig {
    /// Launcher visible, device unlocked.
    fn default() -> Self {
        Self {
            launcher_visible: true,
            lock_device: false,
        }
    }
}

/// A partial configuration update submitted by the admin.
///
/// Deserialization is lenient per field: a field is picked up only when
/// it is present *and* a JSON boolean. Any other JSON type for that
/// field (string, number, null, array, object) leaves it `None` without
/// failing the request, so the rest of the update still applies.
/// Unrecognized fields are ignored entirely.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tether::ConfigUpdate;
///
/// let update: ConfigUpdate =
///     serde_json::from_value(json!({ "launcherVisible": "yes", "lockDevice": true })).unwrap();
/// assert_eq!(update.launcher_visible, None);
/// assert_eq!(update.lock_device, Some(true));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    /// Requested launcher visibility, if validly present.
    #[serde(default, deserialize_with = "boolean_or_ignored")]
    pub launcher_visible: Option<bool>,
    /// Requested lock state, if validly present.
    #[serde(default, deserialize_with = "boolean_or_ignored")]
    pub lock_device: Option<bool>,
}

impl ConfigUpdate {
    /// Creates an empty update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a launcher visibility value.
    #[must_use]
    pub fn with_launcher_visible(mut self, visible: bool) -> Self {
        self.launcher_visible = Some(visible);
        self
    }

    /// Requests a lock state.
    #[must_use]
    pub fn with_lock_device(mut self, locked: bool) -> Self {
        self.lock_device = Some(locked);
        self
    }

    /// Returns true if no field survived validation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.launcher_visible.is_none() && self.lock_device.is_none()
    }
}

/// Accepts a JSON boolean, maps every other JSON value to `None`.
fn boolean_or_ignored<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_bool())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_config_shows_launcher_unlocked() {
        let config = DeviceConfig::default();
        assert!(config.launcher_visible);
        assert!(!config.lock_device);
    }

    #[test]
    fn config_wire_names() {
        let json = serde_json::to_value(DeviceConfig::default()).unwrap();
        assert_eq!(json, json!({ "launcherVisible": true, "lockDevice": false }));
    }

    #[test]
    fn merged_applies_present_fields_only() {
        let before = DeviceConfig::default();
        let after = before.merged(ConfigUpdate::new().with_lock_device(true));

        assert_eq!(after.launcher_visible, before.launcher_visible);
        assert!(after.lock_device);
    }

    #[test]
    fn merged_with_empty_update_is_identity() {
        let config = DeviceConfig::default();
        assert_eq!(config.merged(ConfigUpdate::new()), config);
    }

    #[test]
    fn merged_applies_both_fields() {
        let after = DeviceConfig::default().merged(
            ConfigUpdate::new()
                .with_launcher_visible(false)
                .with_lock_device(true),
        );
        assert!(!after.launcher_visible);
        assert!(after.lock_device);
    }

    #[test]
    fn deserialize_reads_wire_names() {
        let update: ConfigUpdate =
            serde_json::from_value(json!({ "launcherVisible": false, "lockDevice": true }))
                .unwrap();
        assert_eq!(update.launcher_visible, Some(false));
        assert_eq!(update.lock_device, Some(true));
    }

    #[test]
    fn deserialize_ignores_non_boolean_values() {
        for bad in [json!("yes"), json!(1), json!(null), json!([true]), json!({})] {
            let update: ConfigUpdate =
                serde_json::from_value(json!({ "launcherVisible": bad, "lockDevice": false }))
                    .unwrap();
            assert_eq!(update.launcher_visible, None, "rejected value: {bad}");
            assert_eq!(update.lock_device, Some(false));
        }
    }

    #[test]
    fn deserialize_ignores_unknown_fields() {
        let update: ConfigUpdate =
            serde_json::from_value(json!({ "wipeDevice": true, "lockDevice": true })).unwrap();
        assert_eq!(update.launcher_visible, None);
        assert_eq!(update.lock_device, Some(true));
    }

    #[test]
    fn deserialize_empty_body_is_empty_update() {
        let update: ConfigUpdate = serde_json::from_value(json!({})).unwrap();
        assert!(update.is_empty());
    }
}
