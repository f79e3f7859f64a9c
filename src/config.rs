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

//! Process configuration.
//!
//! Every option can be given as a flag or through the environment.

use crate::charge::AmountPolicy;
use crate::service::AuthorizationService;
use clap::{Parser, ValueEnum};
use std::time::Duration;

/// Which balance store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// Shared Redis instance
    Redis,
    /// Process memory, for local runs only
    Memory,
}

/// Charge Authorizer - HTTP service that authorizes per-account charges
///
/// Balances are kept in Redis and debited atomically, so several instances
/// can serve the same accounts.
#[derive(Parser, Debug, Clone)]
#[command(name = "charge-authorizer")]
#[command(about = "Authorizes charges against per-account balances", long_about = None)]
pub struct Config {
    /// Redis host
    #[arg(long, env = "REDIS_HOST", default_value = "localhost")]
    pub redis_host: String,

    /// Redis port
    #[arg(long, env = "REDIS_PORT", default_value_t = 6379)]
    pub redis_port: u16,

    /// Address the HTTP server binds to
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1")]
    pub bind: String,

    /// Port the HTTP server listens on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Balance an account holds after a reset
    #[arg(long, env = "DEFAULT_BALANCE", default_value_t = AuthorizationService::DEFAULT_BALANCE)]
    pub default_balance: i64,

    /// Balance store backend
    #[arg(long, env = "BALANCE_STORE", value_enum, default_value_t = StoreKind::Redis)]
    pub store: StoreKind,

    /// Timeout for a single store operation, in milliseconds
    #[arg(long, env = "STORE_TIMEOUT_MS", default_value_t = 2000)]
    pub store_timeout_ms: u64,

    /// Reject zero and negative charges instead of passing them to the store
    #[arg(long, env = "REJECT_NON_POSITIVE")]
    pub reject_non_positive: bool,
}

impl Config {
    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}", self.redis_host, self.redis_port)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn amount_policy(&self) -> AmountPolicy {
        if self.reject_non_positive {
            AmountPolicy::RejectNonPositive
        } else {
            AmountPolicy::PassThrough
        }
    }
}
