//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live here
//! so every repository decodes stored values the same way.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    EmailAddress, Listing, ListingId, ListingImage, ListingRecord, Price, Rating, Review,
    ReviewId, ReviewRecord, User, UserId, UserProfile, UserSummary, Username,
};

use super::diesel_helpers::decode;
use super::schema::{listings, reviews, users};

// ---------------------------------------------------------------------------
// User models
// ---------------------------------------------------------------------------

/// Full account row, including the credential hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<(User, String), String> {
        let user = User::new(
            UserId::from_uuid(self.id),
            decode(Username::new(&self.username), "username")?,
            decode(EmailAddress::new(&self.email), "email")?,
            self.created_at,
        );
        Ok((user, self.password_hash))
    }
}

/// Owner columns shown on a listing detail.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl ProfileRow {
    pub(crate) fn into_profile(self) -> Result<UserProfile, String> {
        Ok(UserProfile {
            id: UserId::from_uuid(self.id),
            username: decode(Username::new(&self.username), "username")?,
            email: decode(EmailAddress::new(&self.email), "email")?,
        })
    }
}

/// Author or owner columns shown in lists.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SummaryRow {
    pub id: Uuid,
    pub username: String,
}

impl SummaryRow {
    pub(crate) fn into_summary(self) -> Result<UserSummary, String> {
        Ok(UserSummary {
            id: UserId::from_uuid(self.id),
            username: decode(Username::new(&self.username), "username")?,
        })
    }
}

/// Insertable struct for creating new accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Listing models
// ---------------------------------------------------------------------------

/// Row struct for reading from the listings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ListingRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub country: String,
    pub price: f64,
    pub image_url: String,
    pub image_filename: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ListingRow {
    pub(crate) fn into_listing(self) -> Result<Listing, String> {
        Ok(Listing::from_record(ListingRecord {
            id: ListingId::from_uuid(self.id),
            title: self.title,
            description: self.description,
            location: self.location,
            country: self.country,
            price: decode(Price::new(self.price), "price")?,
            image: ListingImage {
                url: self.image_url,
                filename: self.image_filename,
            },
            owner: UserId::from_uuid(self.owner_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Insertable struct for creating new listings.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = listings)]
pub(crate) struct NewListingRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub country: &'a str,
    pub price: f64,
    pub image_url: &'a str,
    pub image_filename: &'a str,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Listing> for NewListingRow<'a> {
    fn from(listing: &'a Listing) -> Self {
        Self {
            id: *listing.id().as_uuid(),
            title: listing.title(),
            description: listing.description(),
            location: listing.location(),
            country: listing.country(),
            price: listing.price().value(),
            image_url: &listing.image().url,
            image_filename: &listing.image().filename,
            owner_id: *listing.owner().as_uuid(),
            created_at: listing.created_at(),
            updated_at: listing.updated_at(),
        }
    }
}

/// Changeset for the mutable listing columns. `owner_id` is absent on purpose.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = listings)]
pub(crate) struct ListingChangeset<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub country: &'a str,
    pub price: f64,
    pub image_url: &'a str,
    pub image_filename: &'a str,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Listing> for ListingChangeset<'a> {
    fn from(listing: &'a Listing) -> Self {
        Self {
            title: listing.title(),
            description: listing.description(),
            location: listing.location(),
            country: listing.country(),
            price: listing.price().value(),
            image_url: &listing.image().url,
            image_filename: &listing.image().filename,
            updated_at: listing.updated_at(),
        }
    }
}

// ---------------------------------------------------------------------------
// Review models
// ---------------------------------------------------------------------------

/// Row struct for reading from the reviews table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub comment: String,
    pub rating: i16,
    pub author_id: Uuid,
    pub listing_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReviewRow {
    pub(crate) fn into_review(self) -> Result<Review, String> {
        let raw = decode(u8::try_from(self.rating), "rating")?;
        Ok(Review::from_record(ReviewRecord {
            id: ReviewId::from_uuid(self.id),
            comment: self.comment,
            rating: decode(Rating::new(raw), "rating")?,
            author: UserId::from_uuid(self.author_id),
            listing: ListingId::from_uuid(self.listing_id),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

/// Insertable struct for creating new reviews.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub id: Uuid,
    pub comment: &'a str,
    pub rating: i16,
    pub author_id: Uuid,
    pub listing_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Review> for NewReviewRow<'a> {
    fn from(review: &'a Review) -> Self {
        Self {
            id: *review.id().as_uuid(),
            comment: review.comment(),
            rating: i16::from(review.rating().value()),
            author_id: *review.author().as_uuid(),
            listing_id: *review.listing().as_uuid(),
            created_at: review.created_at(),
            updated_at: review.updated_at(),
        }
    }
}

/// Changeset for the mutable review columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = reviews)]
pub(crate) struct ReviewChangeset<'a> {
    pub comment: &'a str,
    pub rating: i16,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Review> for ReviewChangeset<'a> {
    fn from(review: &'a Review) -> Self {
        Self {
            comment: review.comment(),
            rating: i16::from(review.rating().value()),
            updated_at: review.updated_at(),
        }
    }
}
