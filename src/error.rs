// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `tether` backend.
//!
//! Handlers return [`Error`]; the notification transport reports the
//! finer-grained [`NotifyError`], which handlers wrap. The store and the
//! read handlers are infallible, so most operations never produce an
//! error at all.

use thiserror::Error;

/// The main error type for this library.
///
/// Only the ad-hoc notification path can fail: every other handler
/// absorbs bad input (invalid config values are skipped, missing
/// state is reported as an empty document).
#[derive(Debug, Error)]
pub enum Error {
    /// A notification was requested before any device registered a
    /// push token.
    #[error("no device token registered yet")]
    NoTokenRegistered,

    /// The push gateway call failed.
    #[error("notification delivery failed: {0}")]
    Notify(#[from] NotifyError),
}

impl Error {
    /// Returns true if the caller is at fault.
    ///
    /// An embedding HTTP layer should answer these with a 400-class
    /// status.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NoTokenRegistered)
    }

    /// Returns true if the failure is on the server side or beyond it.
    ///
    /// An embedding HTTP layer should answer these with a 500-class
    /// status.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Notify(_))
    }
}

/// Errors from the push gateway transport.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The HTTP request failed: connect error, TLS failure, or the
    /// configured timeout elapsed.
    #[error("push request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway rejected the server key.
    #[error("push gateway rejected the server key")]
    Unauthorized,

    /// The gateway answered with a non-success status.
    #[error("push gateway rejected the request: HTTP {status}: {body}")]
    Rejected {
        /// HTTP status code returned by the gateway.
        status: u16,
        /// Response body, for the admin to inspect.
        body: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
