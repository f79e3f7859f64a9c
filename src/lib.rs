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

//! # Charge Authorizer
//!
//! This library authorizes charges against per-account spending balances.
//! A charge is granted only if the balance covers it, and the check and the
//! debit happen as one atomic step inside the balance store.
//!
//! ## Core Components
//!
//! - [`AuthorizationService`]: `reset` and `charge` operations
//! - [`BalanceStore`]: atomic conditional debit, backed by [`RedisStore`] or [`MemoryStore`]
//! - [`ChargeResult`]: outcome of a charge attempt
//! - [`StoreError`] / [`ServiceError`]: infrastructure failures, never rejections
//! - [`create_router`]: HTTP routes for `POST /reset` and `POST /charge`
//!
//! ## Example
//!
//! ```
//! use charge_authorizer::{AccountId, AuthorizationService, ChargeResult, MemoryStore};
//! use std::sync::Arc;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let service = AuthorizationService::new(Arc::new(MemoryStore::new()));
//! let account = AccountId::new("alice");
//!
//! service.reset(&account).await.unwrap();
//! assert_eq!(
//!     service.charge(&account, 30).await.unwrap(),
//!     ChargeResult::authorized(70, 30)
//! );
//! assert_eq!(service.charge(&account, 80).await.unwrap(), ChargeResult::rejected());
//! # });
//! ```
//!
//! ## Concurrency
//!
//! The service keeps no account state of its own. Concurrent charges on the
//! same account are serialized by the store, so exactly as many charges are
//! authorized as the balance allows, however the requests interleave.

mod base;
mod charge;
pub mod config;
pub mod error;
mod server;
mod service;
pub mod store;

pub use base::AccountId;
pub use charge::{AmountPolicy, ChargeResult};
pub use config::{Config, StoreKind};
pub use error::{ServiceError, StoreError};
pub use server::{
    AppError, AppState, ChargeRequest, DEFAULT_CHARGE, ErrorResponse, ResetRequest, create_router,
};
pub use service::AuthorizationService;
pub use store::{BalanceStore, DebitOutcome, MemoryStore, RedisStore};
