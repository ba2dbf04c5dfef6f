//! Embedded PostgreSQL for the Diesel adapter suites.
//!
//! Each test gets its own temporary database on a cluster shared by the
//! whole test binary, migrated with the same embedded migrations the server
//! runs at startup. Set `SKIP_TEST_CLUSTER=1` where the cluster cannot start.

#![allow(dead_code)]

use std::time::Duration;

use chrono::{DateTime, SubsecRound, Utc};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;
use wanderlust::domain::ports::UserRepository;
use wanderlust::domain::{
    EmailAddress, Listing, ListingDraft, ListingId, ListingImage, PasswordHash, Price, Rating,
    Review, ReviewDraft, User, UserId, Username,
};
use wanderlust::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
};

const CLUSTER_RETRIES: usize = 5;
const CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// A migrated database plus the runtime that drives its pool.
pub struct PgWorld {
    pub pool: DbPool,
    pub runtime: Runtime,
    pub database_url: String,
    _database: TemporaryDatabase,
}

impl PgWorld {
    /// Run `fut` to completion on this world's runtime.
    pub fn block_on<F: std::future::Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }

    /// Insert an account named `username` and return it.
    pub fn seed_user(&self, username: &str) -> User {
        let user = User::new(
            UserId::random(),
            Username::new(username).expect("username"),
            EmailAddress::new(format!("{username}@example.com")).expect("email"),
            stored_now(),
        );
        let users = DieselUserRepository::new(self.pool.clone());
        self.block_on(users.insert(&user, &PasswordHash::new("$argon2id$seeded")))
            .expect("seed user");
        user
    }
}

/// A priced listing owned by `owner`, created at `now`.
pub fn listing_by(owner: &User, title: &str, now: DateTime<Utc>) -> Listing {
    let draft = ListingDraft {
        title: title.to_owned(),
        description: "Sea view".to_owned(),
        location: "Goa".to_owned(),
        country: "India".to_owned(),
        price: Price::new(1200.0).expect("price"),
        image: None,
    };
    let image = ListingImage {
        url: "/uploads/listings/hut.png".to_owned(),
        filename: "listings/hut.png".to_owned(),
    };
    Listing::create(draft, *owner.id(), image, now)
}

/// A review by `author` on `listing`, created at `now`.
pub fn review_by(author: &User, listing: &ListingId, rating: u8, now: DateTime<Utc>) -> Review {
    let draft = ReviewDraft {
        rating: Rating::new(rating).expect("rating"),
        comment: format!("{rating} stars from {}", author.username().as_ref()),
    };
    Review::create(draft, *author.id(), *listing, now)
}

/// Current time at the microsecond precision PostgreSQL keeps.
pub fn stored_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn should_skip() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

// The embedded cluster generates a random password per call; a reused data
// directory keeps the first one, so later binaries must present the same.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster bootstrap spawns any threads.
        unsafe {
            std::env::set_var("PG_PASSWORD", "wanderlust_embedded_test");
        }
    }
}

fn cluster() -> Result<&'static ClusterHandle, String> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(err) if attempt >= CLUSTER_RETRIES => return Err(format!("{err:?}")),
            Err(_) => {
                std::thread::sleep(CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

fn setup() -> Result<PgWorld, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let database = cluster()?
        .temporary_database(format!("wanderlust_test_{}", uuid::Uuid::new_v4().simple()))
        .map_err(|err| format!("create database: {err:?}"))?;
    let database_url = database.url().to_string();

    runtime
        .block_on(run_pending_migrations(&database_url))
        .map_err(|err| err.to_string())?;
    let pool = runtime
        .block_on(DbPool::new(PoolConfig::new(database_url.as_str()).with_max_size(2)))
        .map_err(|err| err.to_string())?;

    Ok(PgWorld {
        pool,
        runtime,
        database_url,
        _database: database,
    })
}

/// Provision a fresh database, or `None` when the cluster is unavailable
/// and `SKIP_TEST_CLUSTER` is set.
///
/// # Panics
///
/// Panics when setup fails and skipping was not requested, so CI never
/// passes silently without a database.
pub fn pg_world() -> Option<PgWorld> {
    match setup() {
        Ok(world) => Some(world),
        Err(reason) if should_skip() => {
            eprintln!("SKIP-TEST-CLUSTER: {reason}");
            None
        }
        Err(reason) => panic!("test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip."),
    }
}
