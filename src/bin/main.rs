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

use charge_authorizer::{
    AppState, AuthorizationService, BalanceStore, Config, MemoryStore, RedisStore, StoreKind,
    create_router,
};
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("charge_authorizer=info")),
        )
        .init();

    let store = build_store(&config)?;
    let service = AuthorizationService::new(store)
        .with_default_balance(config.default_balance)
        .with_amount_policy(config.amount_policy());

    let app = create_router(AppState { service });

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("charge authorizer listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn build_store(
    config: &Config,
) -> Result<Arc<dyn BalanceStore>, Box<dyn std::error::Error + Send + Sync>> {
    let store: Arc<dyn BalanceStore> = match config.store {
        StoreKind::Redis => {
            let url = config.redis_url();
            tracing::info!("using redis URL {url}");
            Arc::new(RedisStore::open(&url, config.store_timeout())?)
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory balance store, balances are not shared between processes");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
