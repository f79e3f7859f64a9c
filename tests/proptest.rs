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

//! Property-based tests for the authorization service.
//!
//! These tests verify invariants that should hold for any sequence of
//! resets and charges.

use charge_authorizer::{AccountId, AmountPolicy, AuthorizationService, MemoryStore};
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Op {
    Reset,
    Charge(i64),
}

// =============================================================================
// Arbitrary Strategies
// =============================================================================

/// Generate a positive charge amount.
fn arb_amount() -> impl Strategy<Value = i64> {
    1i64..=150
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Reset),
        6 => arb_amount().prop_map(Op::Charge),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

// =============================================================================
// Invariant Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Balance is never negative and always matches a reference model.
    #[test]
    fn balance_follows_model_and_never_goes_negative(
        ops in prop::collection::vec(arb_op(), 1..60),
    ) {
        let rt = runtime();
        let service = AuthorizationService::new(Arc::new(MemoryStore::new()));
        let account = AccountId::default();
        let mut model = 0i64;

        for op in ops {
            match op {
                Op::Reset => {
                    rt.block_on(service.reset(&account)).unwrap();
                    model = service.default_balance();
                }
                Op::Charge(amount) => {
                    let result = rt.block_on(service.charge(&account, amount)).unwrap();
                    if model >= amount {
                        model -= amount;
                        prop_assert!(result.is_authorized);
                        prop_assert_eq!(result.remaining_balance, model);
                        prop_assert_eq!(result.charges, amount);
                    } else {
                        prop_assert!(!result.is_authorized);
                        prop_assert_eq!(result.charges, 0);
                        prop_assert_eq!(result.remaining_balance, -1);
                    }
                }
            }

            let balance = rt.block_on(service.balance(&account)).unwrap();
            prop_assert!(balance >= 0);
            prop_assert_eq!(balance, model);
        }
    }

    /// Total charged after a reset never exceeds the default balance.
    #[test]
    fn charges_never_exceed_balance(
        amounts in prop::collection::vec(arb_amount(), 1..40),
    ) {
        let rt = runtime();
        let service = AuthorizationService::new(Arc::new(MemoryStore::new()));
        let account = AccountId::default();
        rt.block_on(service.reset(&account)).unwrap();

        let charged: i64 = amounts
            .iter()
            .map(|amount| rt.block_on(service.charge(&account, *amount)).unwrap().charges)
            .sum();

        prop_assert!(charged <= service.default_balance());
        let balance = rt.block_on(service.balance(&account)).unwrap();
        prop_assert_eq!(balance, service.default_balance() - charged);
    }

    /// Under the strict policy no amount can raise the balance.
    #[test]
    fn strict_policy_never_increases_balance(
        amounts in prop::collection::vec(-100i64..=100, 1..40),
    ) {
        let rt = runtime();
        let service = AuthorizationService::new(Arc::new(MemoryStore::new()))
            .with_amount_policy(AmountPolicy::RejectNonPositive);
        let account = AccountId::default();
        rt.block_on(service.reset(&account)).unwrap();

        let mut previous = service.default_balance();
        for amount in amounts {
            rt.block_on(service.charge(&account, amount)).unwrap();
            let balance = rt.block_on(service.balance(&account)).unwrap();
            prop_assert!(balance <= previous);
            prop_assert!(balance >= 0);
            previous = balance;
        }
    }
}
