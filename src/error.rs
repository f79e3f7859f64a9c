// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Error types for balance store access and charge authorization.
//!
//! Insufficient funds is not an error: it is reported as a rejected
//! [`ChargeResult`](crate::ChargeResult). Everything here is an
//! infrastructure failure and must never be turned into a rejection.

use thiserror::Error;

/// Balance store failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or the connection dropped
    #[error("balance store unreachable: {0}")]
    Connection(String),

    /// The store did not answer within the configured timeout
    #[error("balance store timed out")]
    Timeout,

    /// The store answered with something we cannot interpret
    #[error("balance store protocol error: {0}")]
    Protocol(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_timeout() {
            StoreError::Timeout
        } else if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
            StoreError::Connection(err.to_string())
        } else {
            StoreError::Protocol(err.to_string())
        }
    }
}

/// Authorization service failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
