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

//! Balance storage.
//!
//! A [`BalanceStore`] owns one integer balance per account and exposes a
//! single atomic check-and-debit primitive. The atomicity must live in the
//! store itself: several service processes may contend on the same account,
//! so locking in service memory cannot be what keeps balances consistent.
//!
//! # Implementations
//!
//! - [`RedisStore`]: shared store, the debit runs as one server-side script.
//! - [`MemoryStore`]: single-process store for tests and local runs.

mod memory;
mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use crate::base::AccountId;
use crate::error::StoreError;
use async_trait::async_trait;

/// Outcome of [`BalanceStore::conditional_debit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebitOutcome {
    /// The amount was debited; `balance` is the value after the debit.
    Debited { balance: i64 },
    /// The balance was lower than the amount and was left untouched.
    Rejected,
}

/// Key-value store of account balances.
///
/// # Invariants
///
/// - A missing account reads as balance `0`.
/// - Each `set` and each `conditional_debit` is applied as one indivisible
///   unit. Concurrent calls on the same account are serialized in whatever
///   order the store picks, and no partial application is ever observable.
/// - Failures to reach the store are reported as [`StoreError`], never as a
///   zero balance or a rejection.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// Debits `amount` if the current balance covers it.
    async fn conditional_debit(
        &self,
        account: &AccountId,
        amount: i64,
    ) -> Result<DebitOutcome, StoreError>;

    /// Overwrites the balance unconditionally.
    async fn set(&self, account: &AccountId, balance: i64) -> Result<(), StoreError>;

    /// Reads the current balance.
    async fn balance(&self, account: &AccountId) -> Result<i64, StoreError>;
}
