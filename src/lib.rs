// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `tether` - a backend library for managing one remote device.
//!
//! A device in the field posts heartbeats; an admin reads the latest
//! state, flips configuration toggles, and pushes notifications to the
//! device through FCM. This library implements that whole loop except
//! the HTTP plumbing: route binding and JSON body parsing stay in the
//! embedding application, which maps each endpoint onto one
//! [`DeviceServer`] handler.
//!
//! # Supported Features
//!
//! - **Heartbeats**: arbitrary JSON payloads stored verbatim, stamped
//!   in UTC and IST (the fleet's timezone)
//! - **Remote configuration**: launcher visibility and device lock
//!   toggles, updated partially and validated leniently
//! - **Push notifications**: an automatic `SYNC` push when launcher
//!   visibility changes, plus ad-hoc pushes on demand
//! - **Pluggable gateway**: handlers are generic over [`PushClient`],
//!   so tests swap FCM for an in-memory recorder
//!
//! # Quick Start
//!
//! ```no_run
//! use serde_json::json;
//! use tether::{ConfigUpdate, DeviceServer, FcmConfig, NotifyRequest};
//!
//! #[tokio::main]
//! async fn main() -> tether::Result<()> {
//!     let push = FcmConfig::new("AAAA...server-key").into_client()?;
//!     let server = DeviceServer::new(push);
//!
//!     // The device posts heartbeats with whatever payload it likes
//!     let payload = serde_json::from_value(json!({
//!         "battery": 88,
//!         "fcmToken": "registration-token",
//!     }))
//!     .unwrap();
//!     let ack = server.handle_heartbeat(payload);
//!     println!("device config is now {:?}", ack.config);
//!
//!     // The admin hides the launcher; the device is told to re-sync
//!     let outcome = server
//!         .apply_config_update(ConfigUpdate::new().with_launcher_visible(false))
//!         .await;
//!     println!("notification: {}", outcome.notification_status);
//!
//!     // Ad-hoc push, e.g. for a "call the office" banner
//!     server
//!         .send_notification(NotifyRequest::new().with_title("Call the office"))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod notify;
pub mod server;
pub mod state;
pub mod time;

pub use error::{Error, NotifyError, Result};
pub use notify::{
    DeliveryReceipt, DeviceToken, FcmClient, FcmConfig, PushClient, PushCommand, PushMessage,
};
pub use server::{
    ConfigUpdateOutcome, DeviceServer, HeartbeatAck, LatestReport, NotificationStatus, NotifyAck,
    NotifyRequest,
};
pub use state::{ConfigUpdate, DeviceConfig, DeviceStore, HeartbeatPayload, HeartbeatRecord};
