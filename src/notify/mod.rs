// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Push notification dispatch.
//!
//! The server talks to the push gateway exclusively through the
//! [`PushClient`] trait, so the gateway can be swapped out: the real
//! [`FcmClient`] in production, an in-memory recorder in tests.
//!
//! A notification is three pieces of text: a title and body shown in the
//! device's notification tray, and a command marker its management app
//! reads. Only [`PushCommand::Sync`] has device-side meaning; it makes
//! the app re-fetch its full configuration immediately instead of
//! waiting for the next heartbeat cycle.

mod fcm;

pub use fcm::{FcmClient, FcmConfig};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// FCM registration token addressing the managed device.
///
/// The device advertises it inside heartbeat payloads; the server keeps
/// exactly one, overwriting it whenever the device re-registers.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceToken(String);

impl DeviceToken {
    /// Wraps a raw registration token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tokens are long and mildly sensitive; show only a prefix
        let short: String = self.0.chars().take(8).collect();
        write!(f, "DeviceToken({short}...)")
    }
}

impl fmt::Display for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DeviceToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl From<String> for DeviceToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Command marker carried in the push payload's data section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushCommand {
    /// The device must re-fetch its full configuration immediately.
    Sync,
    /// Forwarded verbatim; the device treats unknown markers as
    /// display-only.
    Custom(String),
}

impl PushCommand {
    /// Returns the wire form of the marker.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sync => "SYNC",
            Self::Custom(marker) => marker,
        }
    }
}

impl From<&str> for PushCommand {
    fn from(marker: &str) -> Self {
        if marker == "SYNC" {
            Self::Sync
        } else {
            Self::Custom(marker.to_string())
        }
    }
}

impl From<String> for PushCommand {
    fn from(marker: String) -> Self {
        if marker == "SYNC" {
            Self::Sync
        } else {
            Self::Custom(marker)
        }
    }
}

impl fmt::Display for PushCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The content of one push notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    /// Title shown in the device's notification tray.
    pub title: String,
    /// Body text shown under the title.
    pub body: String,
    /// Command marker for the device-side handler.
    pub command: PushCommand,
}

impl PushMessage {
    /// Creates a message with an explicit command marker.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>, command: PushCommand) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            command,
        }
    }

    /// Creates a message carrying the `SYNC` marker.
    #[must_use]
    pub fn sync(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(title, body, PushCommand::Sync)
    }
}

/// Response document returned by the push gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// The raw response body.
    body: String,
}

impl DeliveryReceipt {
    /// Creates a receipt with the given body.
    #[must_use]
    pub fn new(body: String) -> Self {
        Self { body }
    }

    /// Returns the raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the receipt as JSON.
    ///
    /// If the gateway returned something unparseable, the raw body is
    /// wrapped in a JSON string so it still reaches the caller.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|_| serde_json::Value::String(self.body.clone()))
    }
}

/// Trait for gateways that deliver push notifications to the device.
///
/// The server is generic over this trait; tests substitute an in-memory
/// recorder for the real FCM gateway.
#[allow(async_fn_in_trait)]
pub trait PushClient {
    /// Delivers `message` to the device addressed by `target`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the gateway rejects the request or
    /// the transport fails.
    async fn send(
        &self,
        target: &DeviceToken,
        message: &PushMessage,
    ) -> Result<DeliveryReceipt, NotifyError>;
}
