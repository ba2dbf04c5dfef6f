//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations in `backend/migrations`
//! exactly. Regenerate with `diesel print-schema` after schema changes.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login handle.
        username -> Varchar,
        /// Unique, lower-cased contact address.
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Rentable places.
    listings (id) {
        id -> Uuid,
        title -> Text,
        description -> Text,
        location -> Text,
        country -> Text,
        /// Nightly price, never negative (CHECK constraint).
        price -> Float8,
        image_url -> Text,
        image_filename -> Text,
        /// Creator of the listing; never rewritten after insert.
        owner_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ratings left on listings; at most one per (author, listing).
    reviews (id) {
        id -> Uuid,
        comment -> Text,
        /// Integer in `[1, 5]` (CHECK constraint).
        rating -> Int2,
        author_id -> Uuid,
        /// Parent listing; rows are removed with it (ON DELETE CASCADE).
        listing_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(listings -> users (owner_id));
diesel::joinable!(reviews -> listings (listing_id));
diesel::joinable!(reviews -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(listings, reviews, users);
