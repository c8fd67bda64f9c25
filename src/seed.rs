//! One-time reference-data seeding.
//!
//! Services and users are seeded exactly once per storage lifetime: the first
//! successful (or fallback) seed sets a marker key and later calls return
//! without touching storage. The data comes from a [`ReferenceSource`], with
//! the built-in defaults standing in whenever the source fails.

use crate::error::Result;
use crate::model::{Role, Service, User};
use crate::store::{Store, KEY_SEEDED, KEY_SERVICES, KEY_USERS};
use crate::StorageBackend;
use std::env;

/// Trait for reference-data sources.
///
/// Abstracts where the seed lists come from: bundled JSON files, a remote
/// endpoint, a test fixture. Implementations that can fail should return
/// `Err`; the loader falls back to [`default_services`]/[`default_users`].
#[allow(async_fn_in_trait)]
pub trait ReferenceSource: Send + Sync {
    /// Load the service reference list.
    ///
    /// # Errors
    /// Returns `Err` if the source is unavailable or its payload is invalid
    async fn load_services(&self) -> Result<Vec<Service>>;

    /// Load the initial user list.
    ///
    /// # Errors
    /// Returns `Err` if the source is unavailable or its payload is invalid
    async fn load_users(&self) -> Result<Vec<User>>;
}

/// Reference source that always yields the built-in defaults.
#[derive(Clone, Copy, Default)]
pub struct BuiltinDefaults;

impl ReferenceSource for BuiltinDefaults {
    async fn load_services(&self) -> Result<Vec<Service>> {
        Ok(default_services())
    }

    async fn load_users(&self) -> Result<Vec<User>> {
        Ok(default_users())
    }
}

/// The built-in service list used when no external source is available.
pub fn default_services() -> Vec<Service> {
    let services = [
        ("SVC-001", "Account Opening"),
        ("SVC-002", "Loan Application"),
        ("SVC-003", "Card Replacement"),
        ("SVC-004", "Customer Support"),
        ("SVC-005", "Business Banking"),
    ];

    services
        .into_iter()
        .map(|(id, name)| Service {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect()
}

/// The built-in accounts used when no external source is available.
///
/// Passwords come from `ADMIN_PASSWORD` / `STAFF_PASSWORD`; a warning is
/// logged whenever a default password is in effect. These accounts exist so
/// a fresh deployment is reachable, nothing more.
pub fn default_users() -> Vec<User> {
    vec![
        User {
            username: "admin".to_string(),
            password: default_password("ADMIN_PASSWORD", "admin123"),
            role: Role::Admin,
            display_name: "Admin User".to_string(),
        },
        User {
            username: "staff".to_string(),
            password: default_password("STAFF_PASSWORD", "staff123"),
            role: Role::Staff,
            display_name: "Staff User".to_string(),
        },
    ]
}

fn default_password(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(value) if !value.is_empty() => value,
        _ => {
            warn!(
                "{} not set. Using default password '{}'. Set {} in production.",
                var, fallback, var
            );
            fallback.to_string()
        }
    }
}

/// Seeds reference data into a store, once per storage lifetime.
#[derive(Clone)]
pub struct SeedLoader<B: StorageBackend> {
    store: Store<B>,
}

impl<B: StorageBackend> SeedLoader<B> {
    pub fn new(store: Store<B>) -> Self {
        SeedLoader { store }
    }

    /// Seed services and users from `source` unless seeding already happened.
    ///
    /// Returns `true` when this call performed the seed, `false` when the
    /// marker was already set. A failing source downgrades to the built-in
    /// defaults rather than leaving storage unseeded.
    ///
    /// # Errors
    /// Returns `Err` only if the seeded data cannot be written
    pub async fn seed_once<S: ReferenceSource>(&self, source: &S) -> Result<bool> {
        if self.store.get_or(KEY_SEEDED, false).await {
            debug!("Seed marker present, skipping seed");
            return Ok(false);
        }

        let services = match source.load_services().await {
            Ok(services) if !services.is_empty() => services,
            Ok(_) => {
                warn!("Reference source returned no services, using built-in list");
                default_services()
            }
            Err(e) => {
                warn!("Service seed source failed ({}), using built-in list", e);
                default_services()
            }
        };

        let users = match source.load_users().await {
            Ok(users) if !users.is_empty() => users,
            Ok(_) => {
                warn!("Reference source returned no users, using built-in accounts");
                default_users()
            }
            Err(e) => {
                warn!("User seed source failed ({}), using built-in accounts", e);
                default_users()
            }
        };

        self.store.set(KEY_SERVICES, &services).await?;
        self.store.set(KEY_USERS, &users).await?;
        self.store.set(KEY_SEEDED, &true).await?;

        info!(
            "Seeded {} services and {} users",
            services.len(),
            users.len()
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::error::Error;

    struct FailingSource;

    impl ReferenceSource for FailingSource {
        async fn load_services(&self) -> Result<Vec<Service>> {
            Err(Error::Backend("fetch failed".to_string()))
        }

        async fn load_users(&self) -> Result<Vec<User>> {
            Err(Error::Backend("fetch failed".to_string()))
        }
    }

    struct StaticSource(Vec<Service>);

    impl ReferenceSource for StaticSource {
        async fn load_services(&self) -> Result<Vec<Service>> {
            Ok(self.0.clone())
        }

        async fn load_users(&self) -> Result<Vec<User>> {
            Ok(default_users())
        }
    }

    fn store() -> Store<InMemoryBackend> {
        Store::new(InMemoryBackend::new())
    }

    #[tokio::test]
    async fn test_seed_once_writes_defaults() {
        let store = store();
        let loader = SeedLoader::new(store.clone());

        let seeded = loader
            .seed_once(&BuiltinDefaults)
            .await
            .expect("Failed to seed");
        assert!(seeded);

        let services: Vec<Service> = store.get_or(KEY_SERVICES, Vec::new()).await;
        assert_eq!(services.len(), 5);
        assert_eq!(services[0].id, "SVC-001");

        let users: Vec<User> = store.get_or(KEY_USERS, Vec::new()).await;
        assert_eq!(users.len(), 2);
    }

    #[tokio::test]
    async fn test_seed_once_is_idempotent() {
        let store = store();
        let loader = SeedLoader::new(store.clone());

        assert!(loader
            .seed_once(&BuiltinDefaults)
            .await
            .expect("Failed to seed"));

        // Mutate the seeded list, then seed again: the marker must win.
        let custom = vec![Service {
            id: "SVC-XXX".to_string(),
            name: "Custom".to_string(),
        }];
        store
            .set(KEY_SERVICES, &custom)
            .await
            .expect("Failed to set");

        assert!(!loader
            .seed_once(&BuiltinDefaults)
            .await
            .expect("Failed to seed"));

        let services: Vec<Service> = store.get_or(KEY_SERVICES, Vec::new()).await;
        assert_eq!(services, custom);
    }

    #[tokio::test]
    async fn test_seed_falls_back_when_source_fails() {
        let store = store();
        let loader = SeedLoader::new(store.clone());

        let seeded = loader
            .seed_once(&FailingSource)
            .await
            .expect("Failed to seed");
        assert!(seeded);

        let services: Vec<Service> = store.get_or(KEY_SERVICES, Vec::new()).await;
        assert_eq!(services.len(), 5);
        assert!(store.get_or(KEY_SEEDED, false).await);
    }

    #[tokio::test]
    async fn test_seed_uses_source_data_when_available() {
        let store = store();
        let loader = SeedLoader::new(store.clone());

        let custom = vec![Service {
            id: "SVC-100".to_string(),
            name: "Notary".to_string(),
        }];
        loader
            .seed_once(&StaticSource(custom.clone()))
            .await
            .expect("Failed to seed");

        let services: Vec<Service> = store.get_or(KEY_SERVICES, Vec::new()).await;
        assert_eq!(services, custom);
    }
}
