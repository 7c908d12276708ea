// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! FCM implementation of the push gateway.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::error::NotifyError;
use crate::notify::{DeliveryReceipt, DeviceToken, PushClient, PushMessage};

// ============================================================================
// FcmConfig - Configuration for the FCM gateway connection
// ============================================================================

/// Configuration for the FCM legacy HTTP gateway.
///
/// Each notification is an independent request. No persistent
/// connection, no delivery tracking beyond the receipt.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tether::FcmConfig;
///
/// // Simple configuration
/// let config = FcmConfig::new("AAAA...server-key");
///
/// // With all options
/// let config = FcmConfig::new("AAAA...server-key")
///     .with_endpoint("https://fcm.example.test/send")
///     .with_timeout(Duration::from_secs(5));
/// ```
#[derive(Clone)]
pub struct FcmConfig {
    server_key: String,
    endpoint: String,
    timeout: Duration,
}

impl FcmConfig {
    /// Default gateway endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://fcm.googleapis.com/fcm/send";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the given FCM server key.
    #[must_use]
    pub fn new(server_key: impl Into<String>) -> Self {
        Self {
            server_key: server_key.into(),
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the gateway endpoint.
    ///
    /// Used for self-hosted relays and in tests, where the endpoint
    /// points at a local mock server.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the gateway endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates an [`FcmClient`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<FcmClient, NotifyError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(NotifyError::Http)?;

        Ok(FcmClient {
            endpoint: self.endpoint,
            server_key: self.server_key,
            client,
        })
    }
}

impl fmt::Debug for FcmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FcmConfig")
            .field("server_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ============================================================================
// FcmClient - Push gateway client
// ============================================================================

/// Push gateway client speaking the FCM legacy HTTP API.
///
/// Posts a notification envelope and authenticates with the
/// `Authorization: key=<server key>` header.
///
/// # Examples
///
/// ```no_run
/// use tether::{DeviceToken, FcmConfig, PushClient, PushMessage};
///
/// # async fn example() -> Result<(), tether::NotifyError> {
/// let client = FcmConfig::new("AAAA...server-key").into_client()?;
/// let target = DeviceToken::new("registration-token");
/// let receipt = client
///     .send(&target, &PushMessage::sync("Configuration changed", "visibility disabled"))
///     .await?;
/// println!("{}", receipt.body());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FcmClient {
    endpoint: String,
    server_key: String,
    client: Client,
}

impl FcmClient {
    /// Creates a client for the given server key with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(server_key: impl Into<String>) -> Result<Self, NotifyError> {
        FcmConfig::new(server_key).into_client()
    }

    /// Returns the gateway endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for FcmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FcmClient")
            .field("endpoint", &self.endpoint)
            .field("server_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// FCM legacy HTTP envelope.
#[derive(Serialize)]
struct Envelope<'a> {
    to: &'a str,
    notification: Notification<'a>,
    data: Data<'a>,
    priority: &'static str,
}

#[derive(Serialize)]
struct Notification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Serialize)]
struct Data<'a> {
    command: &'a str,
}

impl PushClient for FcmClient {
    async fn send(
        &self,
        target: &DeviceToken,
        message: &PushMessage,
    ) -> Result<DeliveryReceipt, NotifyError> {
        let envelope = Envelope {
            to: target.as_str(),
            notification: Notification {
                title: &message.title,
                body: &message.body,
            },
            data: Data {
                command: message.command.as_str(),
            },
            // High priority wakes dozing Android devices so lock and
            // hide commands take effect promptly
            priority: "high",
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            target = ?target,
            command = %message.command,
            "Dispatching push notification"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("key={}", self.server_key))
            .json(&envelope)
            .send()
            .await
            .map_err(NotifyError::Http)?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(NotifyError::Unauthorized);
        }

        let status = response.status();
        let body = response.text().await.map_err(NotifyError::Http)?;

        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(body = %body, "Received push gateway response");

        Ok(DeliveryReceipt::new(body))
    }
}
