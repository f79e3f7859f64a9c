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

//! Redis-backed balance store.
//!
//! The check-and-debit runs as a Lua script, which Redis executes without
//! interleaving any other command. That makes the debit atomic across every
//! process talking to the same Redis instance.

use super::{BalanceStore, DebitOutcome};
use crate::base::AccountId;
use crate::error::StoreError;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, Script};
use std::future::Future;
use std::time::Duration;

/// Returns the new balance as a string, or `false` (a nil reply) when funds
/// are short or the result would overflow.
///
/// `DECRBY` does the arithmetic on 64-bit integers. Lua numbers are doubles,
/// so the script only reads the sign of the result and hands the stored
/// value back untouched.
const CONDITIONAL_DEBIT_SCRIPT: &str = r#"
local existed = redis.call('EXISTS', KEYS[1]) == 1
local remaining = redis.pcall('DECRBY', KEYS[1], ARGV[1])
if type(remaining) == 'table' and remaining.err then
    if string.find(remaining.err, 'overflow') then
        return false
    end
    return redis.error_reply(remaining.err)
end
if remaining < 0 then
    if existed then
        redis.call('INCRBY', KEYS[1], ARGV[1])
    else
        redis.call('DEL', KEYS[1])
    end
    return false
end
return redis.call('GET', KEYS[1])
"#;

/// Balance store living in Redis.
///
/// A connection is opened for each logical operation and dropped when the
/// operation finishes, fails or times out.
pub struct RedisStore {
    client: Client,
    script: Script,
    timeout: Duration,
}

impl RedisStore {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

    /// Creates a store for `url` (e.g. `redis://localhost:6379`).
    ///
    /// Only the URL is validated here; no connection is made until the
    /// first operation.
    pub fn open(url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::open(url)?;
        Ok(Self {
            client,
            script: Script::new(CONDITIONAL_DEBIT_SCRIPT),
            timeout,
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, StoreError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    /// Runs `operation` under the store timeout.
    async fn bounded<T>(
        &self,
        operation: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        tokio::time::timeout(self.timeout, operation)
            .await
            .map_err(|_| StoreError::Timeout)?
    }
}

#[async_trait]
impl BalanceStore for RedisStore {
    async fn conditional_debit(
        &self,
        account: &AccountId,
        amount: i64,
    ) -> Result<DebitOutcome, StoreError> {
        self.bounded(async {
            let mut conn = self.connection().await?;
            let remaining: Option<i64> = self
                .script
                .key(account.balance_key())
                .arg(amount)
                .invoke_async(&mut conn)
                .await?;
            let outcome = match remaining {
                Some(balance) => DebitOutcome::Debited { balance },
                None => DebitOutcome::Rejected,
            };
            tracing::debug!(%account, amount, ?outcome, "conditional debit");
            Ok(outcome)
        })
        .await
    }

    async fn set(&self, account: &AccountId, balance: i64) -> Result<(), StoreError> {
        self.bounded(async {
            let mut conn = self.connection().await?;
            let _: () = conn.set(account.balance_key(), balance).await?;
            tracing::debug!(%account, balance, "balance set");
            Ok(())
        })
        .await
    }

    async fn balance(&self, account: &AccountId) -> Result<i64, StoreError> {
        self.bounded(async {
            let mut conn = self.connection().await?;
            let balance: Option<i64> = conn.get(account.balance_key()).await?;
            Ok(balance.unwrap_or(0))
        })
        .await
    }
}
