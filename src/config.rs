use std::sync::Arc;

use chrono::Duration;
use log::{debug, error, info, warn};
use mongodb::Client as MongoClient;
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::error::Result;
use crate::model::{api::admin::AdminCredentials, db::admin::NewAdmin};
use crate::store::{MemoryStore, MongoStore, PollStore, Store};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Deserialize)]
pub struct Config {
    // non-secrets
    auth_ttl: u32,
    admin_username: Option<String>,
    // secrets
    jwt_secret: String,
    admin_password: Option<String>,
}

impl Config {
    /// Valid lifetime of auth token cookies in seconds.
    pub fn auth_ttl(&self) -> Duration {
        Duration::seconds(self.auth_ttl.into())
    }

    /// Secret key used to sign JWTs.
    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Credentials of the admin to create on start-up, if both halves are configured.
    pub fn bootstrap_admin(&self) -> Option<AdminCredentials> {
        Some(AdminCredentials {
            username: self.admin_username.clone()?,
            password: self.admin_password.clone()?,
        })
    }
}

/// A fairing that loads the application config and puts it in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Configuration for the store.
#[derive(Deserialize)]
struct StoreConfig {
    // secrets
    db_uri: Option<String>,
}

/// A fairing that sets up the store, makes sure the bootstrap admin exists,
/// and places the [`Store`] into managed state.
///
/// Unless given a store up front, it connects to MongoDB when `db_uri` is
/// configured and falls back to an in-memory store otherwise.
/// Must be attached after [`ConfigFairing`].
pub struct StoreFairing {
    preset: Option<Store>,
}

impl StoreFairing {
    /// Choose the store from the configuration.
    pub fn from_config() -> Self {
        Self { preset: None }
    }

    /// Use the given store.
    pub fn with_store(store: Store) -> Self {
        Self {
            preset: Some(store),
        }
    }
}

#[rocket::async_trait]
impl Fairing for StoreFairing {
    fn info(&self) -> Info {
        Info {
            name: "Store",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        let store = match &self.preset {
            Some(store) => store.clone(),
            None => {
                // Load the config.
                let config = match rocket.figment().extract::<StoreConfig>() {
                    Ok(config) => config,
                    Err(e) => {
                        error!("Failed to load store config");
                        rocket::config::pretty_print_error(e);
                        return Err(rocket);
                    }
                };
                match connect_store(config).await {
                    Some(store) => store,
                    None => return Err(rocket),
                }
            }
        };

        let config = match rocket.state::<Config>() {
            Some(config) => config,
            None => {
                error!("Store set up before the application config was loaded");
                return Err(rocket);
            }
        };
        let bootstrapped = ensure_admin_exists(store.as_ref(), config).await;
        if let Err(e) = bootstrapped {
            error!("Failed to create the bootstrap admin: {e}");
            return Err(rocket);
        }
        info!("...store online!");

        // Manage the state.
        rocket = rocket.manage(store);
        Ok(rocket)
    }
}

/// Build the store described by the configuration, logging any failure.
async fn connect_store(config: StoreConfig) -> Option<Store> {
    let db_uri = match config.db_uri {
        Some(db_uri) => db_uri,
        None => {
            warn!("No `db_uri` configured, keeping polls in memory only");
            return Some(Arc::new(MemoryStore::new()));
        }
    };

    info!("Loaded database config, connecting...");
    let client = match MongoClient::with_uri_str(db_uri).await {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to connect to database: {e}");
            return None;
        }
    };
    let db = client.database(&get_database_name());
    match MongoStore::connect(&db).await {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            error!("Failed to set up database: {e}");
            None
        }
    }
}

/// Create the configured bootstrap admin unless an admin with that username exists.
///
/// This operation is idempotent.
pub async fn ensure_admin_exists(store: &dyn PollStore, config: &Config) -> Result<()> {
    let credentials = match config.bootstrap_admin() {
        Some(credentials) => credentials,
        None => {
            debug!("No bootstrap admin configured");
            return Ok(());
        }
    };
    if store.admin_by_username(&credentials.username).await?.is_some() {
        return Ok(());
    }

    let admin = NewAdmin::try_from(credentials)?;
    let admin = store.insert_admin(admin).await?;
    info!("Created bootstrap admin '{}'", admin.username);
    Ok(())
}

/// Get the name of the database to use (production version).
#[cfg(not(test))]
pub fn get_database_name() -> String {
    "polls".to_string()
}

/// Get the name of the database to use (test version).
/// Use a random name to avoid collisions between tests.
#[cfg(test)]
pub fn get_database_name() -> String {
    let random: u32 = rand::random();
    let db = format!("test{random}");
    info!("Using database {db}");
    db
}

#[cfg(test)]
mod tests {
    use rocket::figment::Figment;

    use super::*;

    fn config(admin: Option<&AdminCredentials>) -> Config {
        let mut figment = Figment::new()
            .merge(("jwt_secret", "secret"))
            .merge(("auth_ttl", 60));
        if let Some(admin) = admin {
            figment = figment
                .merge(("admin_username", &admin.username))
                .merge(("admin_password", &admin.password));
        }
        figment.extract().unwrap()
    }

    #[rocket::async_test]
    async fn bootstrap_admin_created_once() {
        let credentials = AdminCredentials::example();
        let config = config(Some(&credentials));
        let store = MemoryStore::new();

        ensure_admin_exists(&store, &config).await.unwrap();
        ensure_admin_exists(&store, &config).await.unwrap();

        let admin = store
            .admin_by_username(&credentials.username)
            .await
            .unwrap()
            .unwrap();
        assert!(admin.verify_password(&credentials.password));
        assert_eq!(admin.id, 1);
    }

    #[rocket::async_test]
    async fn no_bootstrap_admin_without_credentials() {
        let config = config(None);
        assert!(config.bootstrap_admin().is_none());

        let store = MemoryStore::new();
        ensure_admin_exists(&store, &config).await.unwrap();
        let username = AdminCredentials::example().username;
        assert!(store.admin_by_username(&username).await.unwrap().is_none());
    }

    #[test]
    fn auth_ttl_in_seconds() {
        assert_eq!(config(None).auth_ttl(), Duration::seconds(60));
    }
}
