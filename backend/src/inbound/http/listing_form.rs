//! Listing create/update body extractor.
//!
//! Browsers post `multipart/form-data` with the text fields (plain `title` or
//! nested `listing[title]`), optional `image[url]`/`image[filename]` and an
//! optional file part named `image`. API clients may send the same fields as
//! JSON. Both shapes end up as [`ListingFieldsInput`] plus an optional upload.

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::TryStreamExt;
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::ports::{ImageStoreError, ImageUpload};
use crate::domain::{Error, ImageInput, ListingFieldsInput, PriceInput};

use super::state::{DEFAULT_MAX_UPLOAD_BYTES, HttpState};
use super::validation::malformed_body_error;

/// Upper bound for a single text part.
const TEXT_FIELD_LIMIT: usize = 64 * 1024;

/// Price as sent in JSON: a number or numeric text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Number(f64),
    Text(String),
}

impl From<PriceValue> for PriceInput {
    fn from(value: PriceValue) -> Self {
        match value {
            PriceValue::Number(number) => Self::Number(number),
            PriceValue::Text(text) => Self::Text(text),
        }
    }
}

/// Explicit image reference in a request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ImagePayload {
    pub url: Option<String>,
    pub filename: Option<String>,
}

/// JSON body for listing create and update.
///
/// Example JSON:
/// `{"title":"Beach Hut","description":"Cozy","location":"Goa","country":"India","price":2000}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ListingPayload {
    #[schema(example = "Beach Hut")]
    pub title: Option<String>,
    #[schema(example = "Cozy")]
    pub description: Option<String>,
    #[schema(example = "Goa")]
    pub location: Option<String>,
    #[schema(example = "India")]
    pub country: Option<String>,
    #[schema(value_type = Option<f64>, example = 2000)]
    pub price: Option<PriceValue>,
    pub image: Option<ImagePayload>,
}

impl From<ListingPayload> for ListingFieldsInput {
    fn from(payload: ListingPayload) -> Self {
        Self {
            title: payload.title,
            description: payload.description,
            location: payload.location,
            country: payload.country,
            price: payload.price.map(PriceInput::from),
            image: payload.image.map(|image| ImageInput {
                url: image.url,
                filename: image.filename,
            }),
        }
    }
}

/// Parsed listing body: raw fields plus the uploaded file, if any.
#[derive(Debug, Default)]
pub struct ListingForm {
    pub fields: ListingFieldsInput,
    pub upload: Option<ImageUpload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Title,
    Description,
    Location,
    Country,
    Price,
    ImageUrl,
    ImageFilename,
    ImageFile,
    Ignored,
}

fn classify(name: &str) -> FormField {
    let name = name.trim();
    let name = name
        .strip_prefix("listing[")
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(name);
    match name {
        "title" => FormField::Title,
        "description" => FormField::Description,
        "location" => FormField::Location,
        "country" => FormField::Country,
        "price" => FormField::Price,
        "image[url]" => FormField::ImageUrl,
        "image[filename]" => FormField::ImageFilename,
        "image" => FormField::ImageFile,
        _ => FormField::Ignored,
    }
}

fn upload_error(reason: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("File upload error: {reason}"))
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            value
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
}

async fn read_bytes(
    field: &mut Field,
    limit: usize,
    too_large: impl Fn() -> Error,
) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|err: MultipartError| upload_error(err))?
    {
        if bytes.len() + chunk.len() > limit {
            return Err(too_large());
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn read_text(field: &mut Field) -> Result<String, Error> {
    let bytes = read_bytes(field, TEXT_FIELD_LIMIT, || {
        malformed_body_error("form field too large")
    })
    .await?;
    String::from_utf8(bytes).map_err(|_| malformed_body_error("form field is not UTF-8"))
}

async fn read_multipart(mut multipart: Multipart, limit: usize) -> Result<ListingForm, Error> {
    let mut form = ListingForm::default();
    let mut image = ImageInput::default();

    while let Some(mut field) = multipart.try_next().await.map_err(upload_error)? {
        let kind = field.name().map_or(FormField::Ignored, classify);
        match kind {
            FormField::Title => form.fields.title = Some(read_text(&mut field).await?),
            FormField::Description => {
                form.fields.description = Some(read_text(&mut field).await?);
            }
            FormField::Location => form.fields.location = Some(read_text(&mut field).await?),
            FormField::Country => form.fields.country = Some(read_text(&mut field).await?),
            FormField::Price => {
                form.fields.price = Some(PriceInput::Text(read_text(&mut field).await?));
            }
            FormField::ImageUrl => image.url = Some(read_text(&mut field).await?),
            FormField::ImageFilename => image.filename = Some(read_text(&mut field).await?),
            FormField::ImageFile => {
                let original_name = field
                    .content_disposition()
                    .and_then(|disposition| disposition.get_filename())
                    .map(str::to_owned)
                    .filter(|name| !name.is_empty());
                let content_type = field.content_type().map(|mime| mime.essence_str().to_owned());
                let bytes = read_bytes(&mut field, limit, || {
                    upload_error(ImageStoreError::too_large(limit))
                })
                .await?;
                // An untouched file input posts an empty, unnamed part.
                if original_name.is_some() || !bytes.is_empty() {
                    debug!(size = bytes.len(), "received listing image part");
                    form.upload = Some(ImageUpload {
                        original_name,
                        content_type,
                        bytes,
                    });
                }
            }
            FormField::Ignored => {
                while field.try_next().await.map_err(upload_error)?.is_some() {}
            }
        }
    }

    if image != ImageInput::default() {
        form.fields.image = Some(image);
    }
    Ok(form)
}

impl FromRequest for ListingForm {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let limit = req
            .app_data::<web::Data<HttpState>>()
            .map_or(DEFAULT_MAX_UPLOAD_BYTES, |state| state.max_upload_bytes);

        if is_multipart(req) {
            let multipart = Multipart::new(req.headers(), payload.take());
            Box::pin(read_multipart(multipart, limit))
        } else {
            let json = web::Json::<ListingPayload>::from_request(req, payload);
            Box::pin(async move {
                let payload = json.await.map_err(malformed_body_error)?;
                Ok(Self {
                    fields: payload.into_inner().into(),
                    upload: None,
                })
            })
        }
    }
}

#[cfg(test)]
mod tests {
    //! Field-name mapping and JSON conversion.
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case("title", FormField::Title)]
    #[case("listing[title]", FormField::Title)]
    #[case(" listing[price] ", FormField::Price)]
    #[case("country", FormField::Country)]
    #[case("image[url]", FormField::ImageUrl)]
    #[case("image[filename]", FormField::ImageFilename)]
    #[case("image", FormField::ImageFile)]
    #[case("owner", FormField::Ignored)]
    #[case("listing[owner]", FormField::Ignored)]
    fn form_field_names_are_classified(#[case] name: &str, #[case] expected: FormField) {
        assert_eq!(classify(name), expected);
    }

    #[rstest]
    #[case(json!(2000), PriceInput::Number(2000.0))]
    #[case(json!("2000"), PriceInput::Text("2000".to_owned()))]
    fn json_price_accepts_numbers_and_text(
        #[case] raw: serde_json::Value,
        #[case] expected: PriceInput,
    ) {
        let payload: ListingPayload =
            serde_json::from_value(json!({ "price": raw })).expect("payload");
        let fields = ListingFieldsInput::from(payload);
        assert_eq!(fields.price, Some(expected));
    }

    #[rstest]
    fn json_owner_field_is_ignored() {
        let payload: ListingPayload = serde_json::from_value(json!({
            "title": "Beach Hut",
            "owner": "00000000-0000-0000-0000-000000000000",
            "image": {"url": "https://cdn.test/hut.png"}
        }))
        .expect("unknown fields are ignored");
        let fields = ListingFieldsInput::from(payload);
        assert_eq!(fields.title.as_deref(), Some("Beach Hut"));
        assert_eq!(
            fields.image.and_then(|image| image.url).as_deref(),
            Some("https://cdn.test/hut.png")
        );
    }
}
