//! Ownership checks shared by every mutable resource.
//!
//! A resource names the user that controls it through [`Controlled`]; the
//! same predicate then guards listings (owner) and reviews (author).

use super::{Error, Listing, Review, UserId};

/// A resource with a single controlling user.
pub trait Controlled {
    /// Identifier of the user allowed to mutate the resource.
    fn controller_id(&self) -> &UserId;
}

impl Controlled for Listing {
    fn controller_id(&self) -> &UserId {
        self.owner()
    }
}

impl Controlled for Review {
    fn controller_id(&self) -> &UserId {
        self.author()
    }
}

/// Whether `principal` controls `entity`.
///
/// # Examples
/// ```
/// use wanderlust::domain::{is_controller, Controlled, UserId};
///
/// struct Note(UserId);
/// impl Controlled for Note {
///     fn controller_id(&self) -> &UserId { &self.0 }
/// }
///
/// let author = UserId::random();
/// assert!(is_controller(&author, &Note(author)));
/// assert!(!is_controller(&UserId::random(), &Note(author)));
/// ```
#[must_use]
pub fn is_controller<E: Controlled + ?Sized>(principal: &UserId, entity: &E) -> bool {
    entity.controller_id() == principal
}

/// Mutation being attempted, used to phrase the denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Update,
    Delete,
}

impl Action {
    const fn verb(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Resource kind named in denial messages.
pub trait Named {
    /// Lower-case noun such as `listing`.
    const NOUN: &'static str;
}

impl Named for Listing {
    const NOUN: &'static str = "listing";
}

impl Named for Review {
    const NOUN: &'static str = "review";
}

/// Allow the mutation or fail with [`ErrorCode::Forbidden`](super::ErrorCode::Forbidden).
pub fn authorize<E: Controlled + Named>(
    principal: &UserId,
    entity: &E,
    action: Action,
) -> Result<(), Error> {
    if is_controller(principal, entity) {
        Ok(())
    } else {
        Err(Error::forbidden(format!(
            "You are not authorized to {} this {}",
            action.verb(),
            E::NOUN
        )))
    }
}
