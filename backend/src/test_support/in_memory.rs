//! In-memory implementation of the persistence ports.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{
    ListingPersistenceError, ListingRepository, ReviewPersistenceError, ReviewRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Listing, ListingDetail, ListingId, ListingSummary, PasswordHash, Review, ReviewId, ReviewView,
    StoredCredentials, User, UserId, UserProfile, UserSummary,
};

use super::lock;

#[derive(Default)]
struct State {
    users: Vec<(User, PasswordHash)>,
    listings: Vec<Listing>,
    reviews: Vec<Review>,
}

impl State {
    fn user(&self, id: &UserId) -> Option<&User> {
        self.users
            .iter()
            .map(|(user, _)| user)
            .find(|user| user.id() == id)
    }

    fn reviews_newest_first(&self, listing_id: &ListingId) -> Vec<&Review> {
        let mut reviews: Vec<&Review> = self
            .reviews
            .iter()
            .filter(|review| review.listing() == listing_id)
            .collect();
        reviews.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        reviews
    }

    fn review_view(&self, review: &Review) -> Option<ReviewView> {
        self.user(review.author()).map(|author| ReviewView {
            review: review.clone(),
            author: UserSummary::from(author),
        })
    }
}

/// Users, listings and reviews held in process memory.
///
/// Enforces unique usernames and emails, one review per (author, listing),
/// and deletes reviews together with their listing.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored listings.
    #[must_use]
    pub fn listing_count(&self) -> usize {
        lock(&self.state).listings.len()
    }

    /// Number of stored reviews referencing `listing_id`.
    #[must_use]
    pub fn review_count_for(&self, listing_id: &ListingId) -> usize {
        lock(&self.state)
            .reviews
            .iter()
            .filter(|review| review.listing() == listing_id)
            .count()
    }

    /// Snapshot of a stored listing.
    #[must_use]
    pub fn listing(&self, listing_id: &ListingId) -> Option<Listing> {
        lock(&self.state)
            .listings
            .iter()
            .find(|listing| listing.id() == listing_id)
            .cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut state = lock(&self.state);
        if state
            .users
            .iter()
            .any(|(existing, _)| existing.username() == user.username())
        {
            return Err(UserPersistenceError::duplicate("username"));
        }
        if state
            .users
            .iter()
            .any(|(existing, _)| existing.email() == user.email())
        {
            return Err(UserPersistenceError::duplicate("email"));
        }
        state.users.push((user.clone(), password_hash.clone()));
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(lock(&self.state).user(id).cloned())
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(lock(&self.state)
            .users
            .iter()
            .find(|(user, _)| user.username().as_ref() == username)
            .map(|(user, hash)| StoredCredentials {
                user: user.clone(),
                password_hash: hash.clone(),
            }))
    }
}

#[async_trait]
impl ListingRepository for InMemoryStore {
    async fn list_summaries(&self) -> Result<Vec<ListingSummary>, ListingPersistenceError> {
        let state = lock(&self.state);
        let mut listings: Vec<&Listing> = state.listings.iter().collect();
        listings.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(listings
            .into_iter()
            .filter_map(|listing| {
                let owner = state.user(listing.owner())?;
                Some(ListingSummary {
                    listing: listing.clone(),
                    owner: UserSummary::from(owner),
                    review_ids: state
                        .reviews_newest_first(listing.id())
                        .into_iter()
                        .map(|review| *review.id())
                        .collect(),
                })
            })
            .collect())
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingPersistenceError> {
        Ok(self.listing(id))
    }

    async fn find_detail(
        &self,
        id: &ListingId,
    ) -> Result<Option<ListingDetail>, ListingPersistenceError> {
        let state = lock(&self.state);
        let Some(listing) = state.listings.iter().find(|listing| listing.id() == id) else {
            return Ok(None);
        };
        let owner = state
            .user(listing.owner())
            .ok_or_else(|| ListingPersistenceError::query("listing owner missing"))?;
        let reviews = state
            .reviews_newest_first(id)
            .into_iter()
            .filter_map(|review| state.review_view(review))
            .collect();
        Ok(Some(ListingDetail {
            listing: listing.clone(),
            owner: UserProfile::from(owner),
            reviews,
        }))
    }

    async fn insert(&self, listing: &Listing) -> Result<(), ListingPersistenceError> {
        let mut state = lock(&self.state);
        if state.user(listing.owner()).is_none() {
            return Err(ListingPersistenceError::query("owner does not exist"));
        }
        state.listings.push(listing.clone());
        Ok(())
    }

    async fn update(&self, listing: &Listing) -> Result<(), ListingPersistenceError> {
        let mut state = lock(&self.state);
        let slot = state
            .listings
            .iter_mut()
            .find(|stored| stored.id() == listing.id())
            .ok_or_else(|| ListingPersistenceError::not_found(*listing.id()))?;
        *slot = listing.clone();
        Ok(())
    }

    async fn delete_with_reviews(&self, id: &ListingId) -> Result<usize, ListingPersistenceError> {
        let mut state = lock(&self.state);
        let before = state.listings.len();
        state.listings.retain(|listing| listing.id() != id);
        if state.listings.len() == before {
            return Err(ListingPersistenceError::not_found(*id));
        }
        let reviews_before = state.reviews.len();
        state.reviews.retain(|review| review.listing() != id);
        Ok(reviews_before - state.reviews.len())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn list_for_listing(
        &self,
        listing_id: &ListingId,
    ) -> Result<Vec<ReviewView>, ReviewPersistenceError> {
        let state = lock(&self.state);
        Ok(state
            .reviews_newest_first(listing_id)
            .into_iter()
            .filter_map(|review| state.review_view(review))
            .collect())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewPersistenceError> {
        Ok(lock(&self.state)
            .reviews
            .iter()
            .find(|review| review.id() == id)
            .cloned())
    }

    async fn find_view(&self, id: &ReviewId) -> Result<Option<ReviewView>, ReviewPersistenceError> {
        let state = lock(&self.state);
        Ok(state
            .reviews
            .iter()
            .find(|review| review.id() == id)
            .and_then(|review| state.review_view(review)))
    }

    async fn exists_for_author(
        &self,
        author: &UserId,
        listing_id: &ListingId,
    ) -> Result<bool, ReviewPersistenceError> {
        Ok(lock(&self.state)
            .reviews
            .iter()
            .any(|review| review.author() == author && review.listing() == listing_id))
    }

    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError> {
        let mut state = lock(&self.state);
        if !state
            .listings
            .iter()
            .any(|listing| listing.id() == review.listing())
        {
            return Err(ReviewPersistenceError::listing_missing(*review.listing()));
        }
        if state.reviews.iter().any(|existing| {
            existing.author() == review.author() && existing.listing() == review.listing()
        }) {
            return Err(ReviewPersistenceError::duplicate(
                *review.author(),
                *review.listing(),
            ));
        }
        state.reviews.push(review.clone());
        Ok(())
    }

    async fn update(&self, review: &Review) -> Result<(), ReviewPersistenceError> {
        let mut state = lock(&self.state);
        let slot = state
            .reviews
            .iter_mut()
            .find(|stored| stored.id() == review.id())
            .ok_or_else(|| ReviewPersistenceError::not_found(*review.id()))?;
        *slot = review.clone();
        Ok(())
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewPersistenceError> {
        let mut state = lock(&self.state);
        let before = state.reviews.len();
        state.reviews.retain(|review| review.id() != id);
        Ok(state.reviews.len() != before)
    }
}
