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

//! Charge authorization service.
//!
//! The [`AuthorizationService`] is stateless: every decision is delegated to
//! a single atomic [`BalanceStore`] call, so there is no retry loop and no
//! rollback path. Any number of service instances may share one store.

use crate::base::AccountId;
use crate::charge::{AmountPolicy, ChargeResult};
use crate::error::ServiceError;
use crate::store::{BalanceStore, DebitOutcome};
use std::sync::Arc;

/// Authorizes and applies charges against account balances.
#[derive(Clone)]
pub struct AuthorizationService {
    store: Arc<dyn BalanceStore>,
    default_balance: i64,
    amount_policy: AmountPolicy,
}

impl AuthorizationService {
    /// Balance an account holds right after [`reset`](Self::reset).
    pub const DEFAULT_BALANCE: i64 = 100;

    pub fn new(store: Arc<dyn BalanceStore>) -> Self {
        Self {
            store,
            default_balance: Self::DEFAULT_BALANCE,
            amount_policy: AmountPolicy::default(),
        }
    }

    pub fn with_default_balance(mut self, default_balance: i64) -> Self {
        self.default_balance = default_balance;
        self
    }

    pub fn with_amount_policy(mut self, amount_policy: AmountPolicy) -> Self {
        self.amount_policy = amount_policy;
        self
    }

    pub fn default_balance(&self) -> i64 {
        self.default_balance
    }

    /// Overwrites the account balance with the default balance.
    pub async fn reset(&self, account: &AccountId) -> Result<(), ServiceError> {
        self.store.set(account, self.default_balance).await?;
        Ok(())
    }

    /// Debits `amount` from the account if the balance covers it.
    ///
    /// Insufficient funds is a normal outcome and comes back as
    /// [`ChargeResult::rejected`].
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Store`] - The store failed; the balance is unchanged.
    pub async fn charge(
        &self,
        account: &AccountId,
        amount: i64,
    ) -> Result<ChargeResult, ServiceError> {
        if !self.amount_policy.admits(amount) {
            return Ok(ChargeResult::rejected());
        }

        let result = match self.store.conditional_debit(account, amount).await? {
            DebitOutcome::Debited { balance } => ChargeResult::authorized(balance, amount),
            DebitOutcome::Rejected => ChargeResult::rejected(),
        };
        Ok(result)
    }

    /// Current balance of the account, `0` if it was never reset.
    pub async fn balance(&self, account: &AccountId) -> Result<i64, ServiceError> {
        Ok(self.store.balance(account).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStore;
    use async_trait::async_trait;

    struct UnreachableStore;

    #[async_trait]
    impl BalanceStore for UnreachableStore {
        async fn conditional_debit(
            &self,
            _account: &AccountId,
            _amount: i64,
        ) -> Result<DebitOutcome, StoreError> {
            Err(StoreError::Connection("connection refused".into()))
        }

        async fn set(&self, _account: &AccountId, _balance: i64) -> Result<(), StoreError> {
            Err(StoreError::Connection("connection refused".into()))
        }

        async fn balance(&self, _account: &AccountId) -> Result<i64, StoreError> {
            Err(StoreError::Connection("connection refused".into()))
        }
    }

    fn service() -> AuthorizationService {
        AuthorizationService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn reset_sets_default_balance() {
        let service = service();
        let account = AccountId::default();
        service.reset(&account).await.unwrap();
        assert_eq!(service.balance(&account).await.unwrap(), 100);
    }

    #[tokio::test]
    async fn custom_default_balance() {
        let service = service().with_default_balance(250);
        let account = AccountId::default();
        service.reset(&account).await.unwrap();
        assert_eq!(service.balance(&account).await.unwrap(), 250);
    }

    #[tokio::test]
    async fn authorized_charge_reports_remaining_balance() {
        let service = service();
        let account = AccountId::default();
        service.reset(&account).await.unwrap();

        let result = service.charge(&account, 10).await.unwrap();
        assert_eq!(result, ChargeResult::authorized(90, 10));
    }

    #[tokio::test]
    async fn rejected_charge_reports_sentinel() {
        let service = service();
        let account = AccountId::default();
        service.reset(&account).await.unwrap();

        let result = service.charge(&account, 101).await.unwrap();
        assert_eq!(result, ChargeResult::rejected());
        assert_eq!(service.balance(&account).await.unwrap(), 100);
    }

    #[tokio::test]
    async fn charge_on_never_reset_account_is_rejected() {
        let result = service().charge(&AccountId::new("new"), 1).await.unwrap();
        assert!(!result.is_authorized);
    }

    #[tokio::test]
    async fn zero_charge_passes_through_by_default() {
        let service = service();
        let account = AccountId::default();
        service.reset(&account).await.unwrap();

        let result = service.charge(&account, 0).await.unwrap();
        assert_eq!(result, ChargeResult::authorized(100, 0));
    }

    #[tokio::test]
    async fn strict_policy_rejects_without_touching_store() {
        let service = service().with_amount_policy(AmountPolicy::RejectNonPositive);
        let account = AccountId::default();
        service.reset(&account).await.unwrap();

        assert_eq!(service.charge(&account, 0).await.unwrap(), ChargeResult::rejected());
        assert_eq!(service.charge(&account, -10).await.unwrap(), ChargeResult::rejected());
        assert_eq!(service.balance(&account).await.unwrap(), 100);
    }

    #[tokio::test]
    async fn store_failure_propagates_from_charge() {
        let service = AuthorizationService::new(Arc::new(UnreachableStore));
        let err = service.charge(&AccountId::default(), 10).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::Connection(_))));
    }

    #[tokio::test]
    async fn store_failure_propagates_from_reset() {
        let service = AuthorizationService::new(Arc::new(UnreachableStore));
        assert!(service.reset(&AccountId::default()).await.is_err());
    }
}
