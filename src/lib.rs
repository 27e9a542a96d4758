#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{figment::Figment, Build, Rocket};

use crate::config::{ConfigFairing, StoreFairing};
use crate::logging::LoggerFairing;
use crate::store::Store;

pub use crate::config::Config;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod store;

/// Build the server from the default figment, choosing the store from its `db_uri`.
pub fn build() -> Rocket<Build> {
    assemble(rocket::build(), StoreFairing::from_config())
}

/// Build the server from the given figment, backed by the given store.
pub fn rocket_for_store(figment: Figment, store: Store) -> Rocket<Build> {
    assemble(rocket::custom(figment), StoreFairing::with_store(store))
}

fn assemble(rocket: Rocket<Build>, store: StoreFairing) -> Rocket<Build> {
    rocket
        .mount("/", api::routes())
        .attach(LoggerFairing)
        .attach(ConfigFairing)
        .attach(store)
}

/// The figment used by HTTP tests, with the example admin configured for bootstrap.
#[cfg(test)]
pub(crate) fn test_figment() -> Figment {
    let admin = model::api::admin::AdminCredentials::example();
    rocket::Config::figment()
        .merge(("jwt_secret", "test-secret"))
        .merge(("auth_ttl", 600))
        .merge(("admin_username", admin.username))
        .merge(("admin_password", admin.password))
        .merge(("log_level", "off"))
}

/// A fresh store for one test, plus the database to drop afterwards if it is MongoDB-backed.
///
/// Tests run against MongoDB when `POLLS_TEST_DB_URI` is set.
#[cfg(test)]
pub(crate) async fn test_store() -> (Store, Option<mongodb::Database>) {
    use std::sync::Arc;

    use crate::store::{MemoryStore, MongoStore};

    match std::env::var("POLLS_TEST_DB_URI") {
        Ok(db_uri) => {
            let client = mongodb::Client::with_uri_str(db_uri).await.unwrap();
            let db = client.database(&config::get_database_name());
            let store = MongoStore::connect(&db).await.unwrap();
            (Arc::new(store), Some(db))
        }
        Err(_) => (Arc::new(MemoryStore::new()), None),
    }
}
