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

//! In-process balance store.

use super::{BalanceStore, DebitOutcome};
use crate::base::AccountId;
use crate::error::StoreError;
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Balance store held in process memory.
///
/// The [`DashMap`] entry API keeps the shard locked for the whole
/// read-check-write, so debits on one account never interleave. Balances
/// are not shared across processes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    balances: DashMap<AccountId, i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            balances: DashMap::new(),
        }
    }
}

#[async_trait]
impl BalanceStore for MemoryStore {
    async fn conditional_debit(
        &self,
        account: &AccountId,
        amount: i64,
    ) -> Result<DebitOutcome, StoreError> {
        // A debit whose result does not fit in an i64 cannot be applied.
        let outcome = match self.balances.entry(account.clone()) {
            Entry::Occupied(mut entry) => match entry.get().checked_sub(amount) {
                Some(remaining) if remaining >= 0 => {
                    entry.insert(remaining);
                    DebitOutcome::Debited { balance: remaining }
                }
                _ => DebitOutcome::Rejected,
            },
            // Missing accounts hold 0 and are only created by a debit that passes.
            Entry::Vacant(entry) => match 0i64.checked_sub(amount) {
                Some(remaining) if remaining >= 0 => {
                    entry.insert(remaining);
                    DebitOutcome::Debited { balance: remaining }
                }
                _ => DebitOutcome::Rejected,
            },
        };
        tracing::debug!(%account, amount, ?outcome, "conditional debit");
        Ok(outcome)
    }

    async fn set(&self, account: &AccountId, balance: i64) -> Result<(), StoreError> {
        self.balances.insert(account.clone(), balance);
        tracing::debug!(%account, balance, "balance set");
        Ok(())
    }

    async fn balance(&self, account: &AccountId) -> Result<i64, StoreError> {
        Ok(self.balances.get(account).map(|b| *b).unwrap_or(0))
    }
}
