//! Review aggregate: one author's rating and comment on one listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ListingId, ReviewId, UserId, UserSummary};

/// Lowest accepted rating.
pub const RATING_MIN: u8 = 1;
/// Highest accepted rating.
pub const RATING_MAX: u8 = 5;

/// Problems found while validating review input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    #[error("Rating is required")]
    RatingRequired,
    #[error("Rating must be a number")]
    RatingNotNumber,
    #[error("Rating must be a whole number")]
    RatingNotInteger,
    #[error("Rating must be at least 1")]
    RatingTooLow,
    #[error("Rating must be at most 5")]
    RatingTooHigh,
    #[error("Comment is required")]
    CommentRequired,
}

/// Rating as supplied by the client.
#[derive(Debug, Clone, PartialEq)]
pub enum RatingInput {
    /// JSON number.
    Number(f64),
    /// Form text still to be parsed.
    Text(String),
}

/// Integer rating in `[1, 5]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Validate an integer rating.
    ///
    /// # Examples
    /// ```
    /// use wanderlust::domain::Rating;
    ///
    /// assert_eq!(Rating::new(4).map(|r| r.value()), Ok(4));
    /// assert!(Rating::new(0).is_err());
    /// assert!(Rating::new(6).is_err());
    /// ```
    pub const fn new(value: u8) -> Result<Self, ReviewValidationError> {
        if value < RATING_MIN {
            return Err(ReviewValidationError::RatingTooLow);
        }
        if value > RATING_MAX {
            return Err(ReviewValidationError::RatingTooHigh);
        }
        Ok(Self(value))
    }

    /// Parse client input, rejecting fractions and out-of-range values.
    pub fn parse(input: &RatingInput) -> Result<Self, ReviewValidationError> {
        let value = match input {
            RatingInput::Number(value) => *value,
            RatingInput::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(ReviewValidationError::RatingRequired);
                }
                trimmed
                    .parse::<f64>()
                    .map_err(|_| ReviewValidationError::RatingNotNumber)?
            }
        };
        if !value.is_finite() {
            return Err(ReviewValidationError::RatingNotNumber);
        }
        if value < f64::from(RATING_MIN) {
            return Err(ReviewValidationError::RatingTooLow);
        }
        if value > f64::from(RATING_MAX) {
            return Err(ReviewValidationError::RatingTooHigh);
        }
        if value.fract() != 0.0 {
            return Err(ReviewValidationError::RatingNotInteger);
        }
        let whole = (RATING_MIN..=RATING_MAX)
            .find(|candidate| f64::from(*candidate) == value)
            .ok_or(ReviewValidationError::RatingNotInteger)?;
        Self::new(whole)
    }

    /// Numeric value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = ReviewValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// Unvalidated review fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewFieldsInput {
    pub rating: Option<RatingInput>,
    pub comment: Option<String>,
}

fn comment_text(value: Option<&String>, errors: &mut Vec<ReviewValidationError>) -> Option<String> {
    match value.map(|text| text.trim()) {
        Some(text) if !text.is_empty() => Some(text.to_owned()),
        _ => {
            errors.push(ReviewValidationError::CommentRequired);
            None
        }
    }
}

fn collect_rating(
    value: Option<&RatingInput>,
    errors: &mut Vec<ReviewValidationError>,
) -> Option<Rating> {
    value.and_then(|input| Rating::parse(input).map_err(|err| errors.push(err)).ok())
}

/// Validated fields for a new review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub rating: Rating,
    pub comment: String,
}

impl ReviewDraft {
    /// Validate create input; both fields are required.
    pub fn try_from_input(input: ReviewFieldsInput) -> Result<Self, Vec<ReviewValidationError>> {
        let mut errors = Vec::new();
        if input.rating.is_none() {
            errors.push(ReviewValidationError::RatingRequired);
        }
        let rating = collect_rating(input.rating.as_ref(), &mut errors);
        let comment = comment_text(input.comment.as_ref(), &mut errors);
        match (rating, comment) {
            (Some(rating), Some(comment)) if errors.is_empty() => Ok(Self { rating, comment }),
            _ => Err(errors),
        }
    }
}

/// Validated partial update of a review.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewPatch {
    pub rating: Option<Rating>,
    pub comment: Option<String>,
}

impl ReviewPatch {
    /// Validate only the fields that are present.
    ///
    /// # Examples
    /// ```
    /// use wanderlust::domain::{ReviewFieldsInput, ReviewPatch};
    ///
    /// let patch = ReviewPatch::try_from_input(ReviewFieldsInput {
    ///     rating: None,
    ///     comment: Some("Even better second time".into()),
    /// })
    /// .unwrap();
    /// assert!(patch.rating.is_none());
    /// ```
    pub fn try_from_input(input: ReviewFieldsInput) -> Result<Self, Vec<ReviewValidationError>> {
        let mut errors = Vec::new();
        let rating = collect_rating(input.rating.as_ref(), &mut errors);
        let comment = input
            .comment
            .as_ref()
            .and_then(|text| comment_text(Some(text), &mut errors));
        if errors.is_empty() {
            Ok(Self { rating, comment })
        } else {
            Err(errors)
        }
    }
}

/// A review of a listing.
///
/// ## Invariants
/// - `author` and `listing` are fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    id: ReviewId,
    comment: String,
    rating: Rating,
    author: UserId,
    listing: ListingId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Persisted column values used to rebuild a [`Review`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    pub id: ReviewId,
    pub comment: String,
    pub rating: Rating,
    pub author: UserId,
    pub listing: ListingId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Create a review by `author` on `listing`.
    #[must_use]
    pub fn create(
        draft: ReviewDraft,
        author: UserId,
        listing: ListingId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReviewId::random(),
            comment: draft.comment,
            rating: draft.rating,
            author,
            listing,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a review from stored values.
    #[must_use]
    pub fn from_record(record: ReviewRecord) -> Self {
        Self {
            id: record.id,
            comment: record.comment,
            rating: record.rating,
            author: record.author,
            listing: record.listing,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    /// Overwrite present fields and bump `updated_at`.
    pub fn apply(&mut self, patch: ReviewPatch, now: DateTime<Utc>) {
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(comment) = patch.comment {
            self.comment = comment;
        }
        self.updated_at = now.max(self.created_at);
    }

    #[must_use]
    pub const fn id(&self) -> &ReviewId {
        &self.id
    }

    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    #[must_use]
    pub const fn rating(&self) -> Rating {
        self.rating
    }

    /// The user who wrote the review.
    #[must_use]
    pub const fn author(&self) -> &UserId {
        &self.author
    }

    /// The listing under review.
    #[must_use]
    pub const fn listing(&self) -> &ListingId {
        &self.listing
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Review joined with its author's public projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewView {
    pub review: Review,
    pub author: UserSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RatingInput::Number(0.0), ReviewValidationError::RatingTooLow)]
    #[case(RatingInput::Number(6.0), ReviewValidationError::RatingTooHigh)]
    #[case(RatingInput::Number(3.5), ReviewValidationError::RatingNotInteger)]
    #[case(RatingInput::Text("five".to_owned()), ReviewValidationError::RatingNotNumber)]
    #[case(RatingInput::Text(String::new()), ReviewValidationError::RatingRequired)]
    fn rating_rejects_invalid(#[case] input: RatingInput, #[case] expected: ReviewValidationError) {
        assert_eq!(Rating::parse(&input), Err(expected));
    }

    #[rstest]
    #[case(RatingInput::Number(1.0), 1)]
    #[case(RatingInput::Number(5.0), 5)]
    #[case(RatingInput::Text(" 4 ".to_owned()), 4)]
    fn rating_accepts_valid(#[case] input: RatingInput, #[case] expected: u8) {
        assert_eq!(Rating::parse(&input).map(Rating::value), Ok(expected));
    }

    #[rstest]
    fn draft_requires_both_fields() {
        let errors = ReviewDraft::try_from_input(ReviewFieldsInput::default())
            .expect_err("empty draft");
        assert_eq!(
            errors,
            vec![
                ReviewValidationError::RatingRequired,
                ReviewValidationError::CommentRequired,
            ]
        );
    }

    #[rstest]
    fn validation_messages_name_the_bounds() {
        assert_eq!(
            ReviewValidationError::RatingTooLow.to_string(),
            "Rating must be at least 1"
        );
        assert_eq!(
            ReviewValidationError::RatingTooHigh.to_string(),
            "Rating must be at most 5"
        );
    }

    #[rstest]
    fn apply_comment_only_keeps_rating() {
        let draft = ReviewDraft {
            rating: Rating::new(4).expect("rating"),
            comment: "Lovely".to_owned(),
        };
        let mut review = Review::create(draft, UserId::random(), ListingId::random(), Utc::now());
        review.apply(
            ReviewPatch {
                rating: None,
                comment: Some("Still lovely".to_owned()),
            },
            Utc::now(),
        );
        assert_eq!(review.rating().value(), 4);
        assert_eq!(review.comment(), "Still lovely");
    }

    #[rstest]
    fn patch_rejects_blank_comment() {
        let errors = ReviewPatch::try_from_input(ReviewFieldsInput {
            rating: None,
            comment: Some("  ".to_owned()),
        })
        .expect_err("blank comment");
        assert_eq!(errors, vec![ReviewValidationError::CommentRequired]);
    }
}
