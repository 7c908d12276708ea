// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state: heartbeat records, configuration, and the store.
//!
//! The [`DeviceStore`] tracks exactly one device. [`HeartbeatRecord`]
//! holds what the device last reported, [`DeviceConfig`] holds what the
//! admin wants the device to do, and [`ConfigUpdate`] is a partial,
//! leniently-validated change to the latter.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use tether::state::{ConfigUpdate, DeviceStore};
//!
//! let store = DeviceStore::new();
//!
//! let payload = serde_json::from_value(json!({ "battery": 88 })).unwrap();
//! let (record, _token_changed) = store.record_heartbeat(payload, None);
//! assert_eq!(store.latest(), Some(record));
//!
//! let (before, after) = store.merge_config(ConfigUpdate::new().with_lock_device(true));
//! assert!(!before.lock_device);
//! assert!(after.lock_device);
//! ```

mod config;
mod heartbeat;
mod store;

pub use config::{ConfigUpdate, DeviceConfig};
pub use heartbeat::{HeartbeatPayload, HeartbeatRecord, TOKEN_FIELD, token_in};
pub use store::DeviceStore;
