use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

use crate::config::Config;
use crate::db::{QueryCatalog, Store};
use crate::services::{
    Argon2Hasher, AuthGate, AuthService, SeaOrmUserService, TokenCodec, UserAdminService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth: Arc<dyn AuthService>,

    pub users: Arc<dyn UserAdminService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = connect_store(&config).await?;
        Self::with_store(config, store)
    }

    /// Wires services around an already-connected store.
    pub fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        let hasher = Argon2Hasher::from_config(&config.security)
            .context("Invalid password hashing parameters")?;

        let ttl = i64::try_from(config.security.token_ttl_seconds)
            .context("security.token_ttl_seconds is too large")?;
        let tokens = TokenCodec::new(&signing_secret(&config), ttl);

        let auth = Arc::new(AuthGate::new(Arc::new(store.clone()), hasher, tokens))
            as Arc<dyn AuthService>;

        let users = Arc::new(SeaOrmUserService::new(store.clone())) as Arc<dyn UserAdminService>;

        Ok(Self {
            config: Arc::new(config),
            store,
            auth,
            users,
        })
    }
}

/// Loads the query catalog, connects the pool and runs migrations.
pub async fn connect_store(config: &Config) -> anyhow::Result<Store> {
    let queries = match config.general.queries_dir.as_deref() {
        Some(dir) => QueryCatalog::with_overrides(Path::new(dir))?,
        None => QueryCatalog::builtin()?,
    };

    Store::with_pool_options(
        &config.general.database_url,
        config.general.max_db_connections,
        config.general.min_db_connections,
        Arc::new(queries),
    )
    .await
}

fn signing_secret(config: &Config) -> Vec<u8> {
    let configured = &config.security.jwt_secret;
    if !configured.trim().is_empty() {
        return configured.as_bytes().to_vec();
    }

    warn!("JWT_SECRET is not set; using a random secret, tokens will not survive a restart");
    let secret: [u8; 32] = rand::random();
    secret.to_vec()
}
