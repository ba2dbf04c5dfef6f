//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use crate::domain::ports::{
    AccountsService, MockAccountsService, MockListingsCommand, MockListingsQuery,
    MockReviewsCommand, MockReviewsQuery,
};
use crate::domain::{EmailAddress, User, UserId, Username};

use super::state::{HttpState, HttpStatePorts};

/// Token accepted by [`MockPorts::authenticating`].
pub const TEST_TOKEN: &str = "test-token";

/// Mocked driving ports; set expectations before calling [`MockPorts::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockAccountsService,
    pub listings: MockListingsCommand,
    pub listings_query: MockListingsQuery,
    pub reviews: MockReviewsCommand,
    pub reviews_query: MockReviewsQuery,
}

impl MockPorts {
    /// Resolve [`TEST_TOKEN`] to `user` for any number of requests.
    pub fn authenticating(user: &User) -> Self {
        let mut ports = Self::default();
        let user = user.clone();
        ports
            .accounts
            .expect_authenticate()
            .withf(|token| token == TEST_TOKEN)
            .returning(move |_| Ok(user.clone()));
        ports
    }

    /// Wrap the mocks into handler state.
    pub fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            accounts: Arc::new(self.accounts),
            listings: Arc::new(self.listings),
            listings_query: Arc::new(self.listings_query),
            reviews: Arc::new(self.reviews),
            reviews_query: Arc::new(self.reviews_query),
        })
    }
}

/// State whose only configured port is `accounts`.
pub fn state_with_accounts(accounts: Arc<dyn AccountsService>) -> HttpState {
    let ports = MockPorts::default();
    HttpState::new(HttpStatePorts {
        accounts,
        listings: Arc::new(ports.listings),
        listings_query: Arc::new(ports.listings_query),
        reviews: Arc::new(ports.reviews),
        reviews_query: Arc::new(ports.reviews_query),
    })
}

/// A registered account with a fixed creation time.
pub fn sample_user(username: &str) -> User {
    let created_at = Utc
        .with_ymd_and_hms(2025, 6, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp");
    User::new(
        UserId::random(),
        Username::new(username).expect("valid username"),
        EmailAddress::new(format!("{username}@example.com")).expect("valid email"),
        created_at,
    )
}

/// `Authorization` header carrying [`TEST_TOKEN`].
pub fn bearer() -> (&'static str, String) {
    ("Authorization", format!("Bearer {TEST_TOKEN}"))
}
