//! Listing aggregate and its validated inputs.
//!
//! Raw client input arrives as [`ListingFieldsInput`]; it becomes either a
//! [`ListingDraft`] (create, every field required) or a [`ListingPatch`]
//! (update, only present fields are checked and applied). Both collect every
//! problem rather than stopping at the first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ListingId, ReviewId, ReviewView, UserId, UserProfile, UserSummary};

/// Placeholder image URL used when a listing has no image.
pub const DEFAULT_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1501785888041-af3ef285b470?ixlib=rb-4.0.3";
/// Storage key paired with [`DEFAULT_IMAGE_URL`].
pub const DEFAULT_IMAGE_FILENAME: &str = "listingimage";

/// Problems found while validating listing input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingValidationError {
    /// A required text field was absent or blank.
    #[error("{} is required", .0.label())]
    Required(ListingField),
    /// Price could not be read as a number.
    #[error("Price must be a number")]
    PriceNotNumber,
    /// Price was negative or not finite.
    #[error("Price must be a positive number")]
    PriceNegative,
}

/// Text fields of a listing, used to label validation problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingField {
    Title,
    Description,
    Location,
    Country,
    Price,
}

impl ListingField {
    const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::Location => "Location",
            Self::Country => "Country",
            Self::Price => "Price",
        }
    }
}

/// Price as supplied by the client: JSON numbers or form text.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceInput {
    /// Already numeric.
    Number(f64),
    /// Text still to be parsed.
    Text(String),
}

/// Nightly price; finite and never negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(f64);

impl Price {
    /// Validate a numeric price.
    ///
    /// # Examples
    /// ```
    /// use wanderlust::domain::Price;
    ///
    /// assert!(Price::new(0.0).is_ok());
    /// assert!(Price::new(-5.0).is_err());
    /// ```
    pub fn new(value: f64) -> Result<Self, ListingValidationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ListingValidationError::PriceNegative);
        }
        Ok(Self(value))
    }

    /// Parse client input, accepting numbers or numeric text.
    pub fn parse(input: &PriceInput) -> Result<Self, ListingValidationError> {
        match input {
            PriceInput::Number(value) => Self::new(*value),
            PriceInput::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(ListingValidationError::Required(ListingField::Price));
                }
                let value: f64 = trimmed
                    .parse()
                    .map_err(|_| ListingValidationError::PriceNotNumber)?;
                Self::new(value)
            }
        }
    }

    /// Numeric value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Price {
    type Error = ListingValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for f64 {
    fn from(value: Price) -> Self {
        value.0
    }
}

/// Image reference stored verbatim on a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListingImage {
    /// Public URL of the image.
    pub url: String,
    /// Storage key returned by the image store.
    pub filename: String,
}

impl Default for ListingImage {
    fn default() -> Self {
        Self {
            url: DEFAULT_IMAGE_URL.to_owned(),
            filename: DEFAULT_IMAGE_FILENAME.to_owned(),
        }
    }
}

/// Explicit image reference supplied in a request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageInput {
    /// Optional URL; blank means "no image supplied".
    pub url: Option<String>,
    /// Optional storage key.
    pub filename: Option<String>,
}

impl ImageInput {
    /// Convert to a stored reference, or `None` when no URL was given.
    #[must_use]
    pub fn into_image(self) -> Option<ListingImage> {
        let url = self.url.map(|url| url.trim().to_owned())?;
        if url.is_empty() {
            return None;
        }
        let filename = self
            .filename
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_FILENAME.to_owned());
        Some(ListingImage { url, filename })
    }
}

/// Unvalidated listing fields. Any `owner` sent by a client is never read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFieldsInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub price: Option<PriceInput>,
    pub image: Option<ImageInput>,
}

fn required_text(
    value: Option<&String>,
    field: ListingField,
    errors: &mut Vec<ListingValidationError>,
) -> Option<String> {
    match value.map(|text| text.trim()) {
        Some(text) if !text.is_empty() => Some(text.to_owned()),
        _ => {
            errors.push(ListingValidationError::Required(field));
            None
        }
    }
}

fn optional_text(
    value: Option<&String>,
    field: ListingField,
    errors: &mut Vec<ListingValidationError>,
) -> Option<String> {
    value.and_then(|text| required_text(Some(text), field, errors))
}

fn collect_price(
    value: Option<&PriceInput>,
    errors: &mut Vec<ListingValidationError>,
) -> Option<Price> {
    value.and_then(|input| Price::parse(input).map_err(|err| errors.push(err)).ok())
}

/// Validated fields for a new listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub country: String,
    pub price: Price,
    /// Explicit body image, used only when no file was uploaded.
    pub image: Option<ListingImage>,
}

impl ListingDraft {
    /// Validate create input; every field except `image` is required.
    pub fn try_from_input(input: ListingFieldsInput) -> Result<Self, Vec<ListingValidationError>> {
        let mut errors = Vec::new();
        let title = required_text(input.title.as_ref(), ListingField::Title, &mut errors);
        let description = required_text(
            input.description.as_ref(),
            ListingField::Description,
            &mut errors,
        );
        let location = required_text(input.location.as_ref(), ListingField::Location, &mut errors);
        let country = required_text(input.country.as_ref(), ListingField::Country, &mut errors);
        if input.price.is_none() {
            errors.push(ListingValidationError::Required(ListingField::Price));
        }
        let price = collect_price(input.price.as_ref(), &mut errors);

        match (title, description, location, country, price) {
            (Some(title), Some(description), Some(location), Some(country), Some(price))
                if errors.is_empty() =>
            {
                Ok(Self {
                    title,
                    description,
                    location,
                    country,
                    price,
                    image: input.image.and_then(ImageInput::into_image),
                })
            }
            _ => Err(errors),
        }
    }
}

/// Validated partial update; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub price: Option<Price>,
    pub image: Option<ListingImage>,
}

impl ListingPatch {
    /// Validate only the fields that are present.
    pub fn try_from_input(input: ListingFieldsInput) -> Result<Self, Vec<ListingValidationError>> {
        let mut errors = Vec::new();
        let patch = Self {
            title: optional_text(input.title.as_ref(), ListingField::Title, &mut errors),
            description: optional_text(
                input.description.as_ref(),
                ListingField::Description,
                &mut errors,
            ),
            location: optional_text(input.location.as_ref(), ListingField::Location, &mut errors),
            country: optional_text(input.country.as_ref(), ListingField::Country, &mut errors),
            price: collect_price(input.price.as_ref(), &mut errors),
            image: input.image.and_then(ImageInput::into_image),
        };
        if errors.is_empty() {
            Ok(patch)
        } else {
            Err(errors)
        }
    }
}

/// A travel listing.
///
/// ## Invariants
/// - `owner` is fixed at creation.
/// - `updated_at >= created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    id: ListingId,
    title: String,
    description: String,
    location: String,
    country: String,
    price: Price,
    image: ListingImage,
    owner: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Persisted column values used to rebuild a [`Listing`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub country: String,
    pub price: Price,
    pub image: ListingImage,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Create a new listing owned by `owner`.
    #[must_use]
    pub fn create(
        draft: ListingDraft,
        owner: UserId,
        image: ListingImage,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ListingId::random(),
            title: draft.title,
            description: draft.description,
            location: draft.location,
            country: draft.country,
            price: draft.price,
            image,
            owner,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a listing from stored values.
    #[must_use]
    pub fn from_record(record: ListingRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            location: record.location,
            country: record.country,
            price: record.price,
            image: record.image,
            owner: record.owner,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    /// Overwrite every field present in `patch` and bump `updated_at`.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use wanderlust::domain::{
    ///     Listing, ListingDraft, ListingFieldsInput, ListingImage, ListingPatch, PriceInput, UserId,
    /// };
    ///
    /// let draft = ListingDraft::try_from_input(ListingFieldsInput {
    ///     title: Some("Beach Hut".into()),
    ///     description: Some("Cozy".into()),
    ///     location: Some("Goa".into()),
    ///     country: Some("India".into()),
    ///     price: Some(PriceInput::Number(2000.0)),
    ///     image: None,
    /// })
    /// .unwrap();
    /// let mut listing = Listing::create(draft, UserId::random(), ListingImage::default(), Utc::now());
    /// listing.apply(ListingPatch { title: Some("Hut".into()), ..ListingPatch::default() }, Utc::now());
    /// assert_eq!(listing.title(), "Hut");
    /// assert_eq!(listing.location(), "Goa");
    /// ```
    pub fn apply(&mut self, patch: ListingPatch, now: DateTime<Utc>) {
        let ListingPatch {
            title,
            description,
            location,
            country,
            price,
            image,
        } = patch;
        if let Some(value) = title {
            self.title = value;
        }
        if let Some(value) = description {
            self.description = value;
        }
        if let Some(value) = location {
            self.location = value;
        }
        if let Some(value) = country {
            self.country = value;
        }
        if let Some(value) = price {
            self.price = value;
        }
        if let Some(value) = image {
            self.image = value;
        }
        self.updated_at = now.max(self.created_at);
    }

    #[must_use]
    pub const fn id(&self) -> &ListingId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    #[must_use]
    pub const fn image(&self) -> &ListingImage {
        &self.image
    }

    /// The user who created the listing.
    #[must_use]
    pub const fn owner(&self) -> &UserId {
        &self.owner
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

/// Listing as it appears in the index: owner username and review ids only.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSummary {
    pub listing: Listing,
    pub owner: UserSummary,
    pub review_ids: Vec<ReviewId>,
}

/// Fully populated listing: owner profile and every review with its author.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDetail {
    pub listing: Listing,
    pub owner: UserProfile,
    pub reviews: Vec<ReviewView>,
}
