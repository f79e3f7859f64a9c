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

//! Charge outcomes and the policy applied to requested amounts.
//!
//! A charge either debits the full amount or leaves the balance alone:
//! - authorized → `remainingBalance` is the balance after the debit
//! - rejected → `remainingBalance` is [`ChargeResult::REJECTED_BALANCE`], nothing is charged

use serde::{Deserialize, Serialize};

/// Result of a single charge attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeResult {
    pub is_authorized: bool,
    pub remaining_balance: i64,
    pub charges: i64,
}

impl ChargeResult {
    /// Sentinel reported as the remaining balance of a rejected charge.
    pub const REJECTED_BALANCE: i64 = -1;

    pub fn authorized(remaining_balance: i64, charges: i64) -> Self {
        Self {
            is_authorized: true,
            remaining_balance,
            charges,
        }
    }

    pub fn rejected() -> Self {
        Self {
            is_authorized: false,
            remaining_balance: Self::REJECTED_BALANCE,
            charges: 0,
        }
    }
}

/// How the service treats amounts that are zero or negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AmountPolicy {
    /// Hand every amount to the store unchecked. A zero charge is
    /// authorized and a negative one credits the account.
    #[default]
    PassThrough,
    /// Reject amounts `<= 0` without touching the store.
    RejectNonPositive,
}

impl AmountPolicy {
    pub fn admits(&self, amount: i64) -> bool {
        match self {
            Self::PassThrough => true,
            Self::RejectNonPositive => amount > 0,
        }
    }
}
