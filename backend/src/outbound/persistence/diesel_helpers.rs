//! Shared helpers for Diesel repository implementations.
//!
//! Repositories classify raw Diesel failures once, here, and then translate
//! the classification into their own port error. Constraint names come from
//! the migrations in `backend/migrations`.

use tracing::{debug, warn};

use super::pool::PoolError;

/// Unique constraint on `users.username`.
pub const USERS_USERNAME_KEY: &str = "users_username_key";
/// Unique constraint on `users.email`.
pub const USERS_EMAIL_KEY: &str = "users_email_key";
/// Unique constraint on `reviews (author_id, listing_id)`.
pub const REVIEWS_AUTHOR_LISTING_KEY: &str = "reviews_author_id_listing_id_key";
/// Foreign key from `reviews.listing_id` to `listings.id`.
pub const REVIEWS_LISTING_FKEY: &str = "reviews_listing_id_fkey";

/// Storage failure reduced to what repositories care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DieselFailure {
    /// The connection was lost or could not be used.
    Connection(String),
    /// Any other query failure.
    Query(String),
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key rejected the write.
    ForeignKeyViolation { constraint: Option<String> },
}

impl DieselFailure {
    /// Whether this is a unique violation on `name`.
    pub fn is_unique(&self, name: &str) -> bool {
        matches!(self, Self::UniqueViolation { constraint: Some(c) } if c == name)
    }

    /// Whether this is a foreign key violation on `name`.
    pub fn is_foreign_key(&self, name: &str) -> bool {
        matches!(self, Self::ForeignKeyViolation { constraint: Some(c) } if c == name)
    }

    /// Human readable message for connection and query errors.
    pub fn into_message(self) -> String {
        match self {
            Self::Connection(message) | Self::Query(message) => message,
            Self::UniqueViolation { constraint } => {
                format!("unique violation on {}", constraint.as_deref().unwrap_or("unknown"))
            }
            Self::ForeignKeyViolation { constraint } => format!(
                "foreign key violation on {}",
                constraint.as_deref().unwrap_or("unknown")
            ),
        }
    }
}

/// Extract a readable message from a pool error.
pub fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error and emit debug context.
pub fn classify_diesel_error(error: diesel::result::Error, operation: &str) -> DieselFailure {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            %operation,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => {
            DieselFailure::Query("database query error".to_owned())
        }
        DieselError::DatabaseError(kind, info) => match kind {
            DatabaseErrorKind::UniqueViolation => DieselFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            },
            DatabaseErrorKind::ForeignKeyViolation => DieselFailure::ForeignKeyViolation {
                constraint: info.constraint_name().map(str::to_owned),
            },
            DatabaseErrorKind::ClosedConnection => {
                DieselFailure::Connection("database connection error".to_owned())
            }
            _ => DieselFailure::Query("database error".to_owned()),
        },
        _ => DieselFailure::Query("database error".to_owned()),
    }
}

/// Log a constraint violation that no repository mapping recognised.
pub fn warn_unmapped(failure: &DieselFailure, operation: &str) {
    warn!(?failure, %operation, "unmapped constraint violation");
}

/// Convert a stored column into a domain value, reporting corrupt rows.
pub fn decode<T, E: std::fmt::Display>(
    result: Result<T, E>,
    column: &'static str,
) -> Result<T, String> {
    result.map_err(|err| format!("stored {column} is invalid: {err}"))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for Diesel error classification.
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    use super::*;

    struct Info {
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "violation"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info { constraint }))
    }

    #[rstest]
    fn unique_violation_keeps_constraint_name() {
        let failure = classify_diesel_error(
            database_error(DatabaseErrorKind::UniqueViolation, Some(USERS_EMAIL_KEY)),
            "insert user",
        );
        assert!(failure.is_unique(USERS_EMAIL_KEY));
        assert!(!failure.is_unique(USERS_USERNAME_KEY));
    }

    #[rstest]
    fn foreign_key_violation_keeps_constraint_name() {
        let failure = classify_diesel_error(
            database_error(DatabaseErrorKind::ForeignKeyViolation, Some(REVIEWS_LISTING_FKEY)),
            "insert review",
        );
        assert!(failure.is_foreign_key(REVIEWS_LISTING_FKEY));
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::ClosedConnection, None), DieselFailure::Connection("database connection error".to_owned()))]
    #[case(DieselError::NotFound, DieselFailure::Query("record not found".to_owned()))]
    #[case(database_error(DatabaseErrorKind::CheckViolation, None), DieselFailure::Query("database error".to_owned()))]
    fn other_errors_collapse(#[case] error: DieselError, #[case] expected: DieselFailure) {
        assert_eq!(classify_diesel_error(error, "test"), expected);
    }

    #[rstest]
    fn pool_errors_expose_message() {
        assert_eq!(pool_error_message(PoolError::checkout("timed out")), "timed out");
    }

    #[rstest]
    fn decode_names_the_column() {
        let err = decode::<u8, _>(Err("out of range"), "rating").expect_err("invalid");
        assert_eq!(err, "stored rating is invalid: out of range");
    }
}
