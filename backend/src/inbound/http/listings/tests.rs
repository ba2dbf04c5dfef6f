//! Handler tests for the listing endpoints.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use chrono::Utc;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::{Error, Price, User};
use crate::inbound::http::state::HttpState as State;
use crate::inbound::http::test_utils::{MockPorts, bearer, sample_user};
use crate::inbound::http::validation::json_config;

const BOUNDARY: &str = "wanderlust-test-boundary";

#[fixture]
fn host() -> User {
    sample_user("host")
}

fn beach_hut(owner: &User) -> ListingDetail {
    let draft = ListingDraft {
        title: "Beach Hut".to_owned(),
        description: "Cozy".to_owned(),
        location: "Goa".to_owned(),
        country: "India".to_owned(),
        price: Price::new(2000.0).expect("price"),
        image: None,
    };
    ListingDetail {
        listing: Listing::create(draft, *owner.id(), ListingImage::default(), Utc::now()),
        owner: UserProfile::from(owner),
        reviews: Vec::new(),
    }
}

/// One multipart part: field name, optional (file name, content type), body.
type Part<'a> = (&'a str, Option<(&'a str, &'a str)>, &'a str);

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file {
            Some((file_name, content_type)) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(parts: &[Part<'_>]) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/api/listings")
        .insert_header(bearer())
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(parts))
}

async fn call_with(state: State, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .configure(configure),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body: Value = actix_test::read_body_json(response).await;
    (status, body)
}

async fn call(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
    call_with(ports.into_state(), request).await
}

#[rstest]
#[actix_web::test]
async fn index_lists_summaries_with_count(host: User) {
    let mut ports = MockPorts::default();
    let detail = beach_hut(&host);
    let review = ReviewId::random();
    let summary = ListingSummary {
        listing: detail.listing.clone(),
        owner: UserSummary::from(&host),
        review_ids: vec![review],
    };
    ports
        .listings_query
        .expect_list()
        .return_once(move || Ok(vec![summary]));

    let (status, body) = call(ports, actix_test::TestRequest::get().uri("/api/listings")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    let first = &body["data"]["listings"][0];
    assert_eq!(first["title"], "Beach Hut");
    assert_eq!(first["owner"]["username"], "host");
    assert!(first["owner"].get("email").is_none());
    assert_eq!(first["reviews"], json!([review.to_string()]));
    assert!(first.get("createdAt").is_some());
}

#[rstest]
#[actix_web::test]
async fn detail_includes_owner_profile(host: User) {
    let detail = beach_hut(&host);
    let id = *detail.listing.id();
    let mut ports = MockPorts::default();
    ports
        .listings_query
        .expect_get()
        .withf(move |requested| *requested == id)
        .return_once(move |_| Ok(detail));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::get().uri(&format!("/api/listings/{id}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["listing"]["id"], id.to_string());
    assert_eq!(body["data"]["listing"]["price"], 2000.0);
    assert_eq!(body["data"]["listing"]["owner"]["email"], "host@example.com");
    assert_eq!(body["data"]["listing"]["reviews"], json!([]));
}

#[rstest]
#[case("/api/listings/not-a-uuid", StatusCode::BAD_REQUEST, "Invalid ID format")]
#[case(
    "/api/listings/6f1c3b1e-4a5d-4a43-9d7e-3f2a1b0c9d8e",
    StatusCode::NOT_FOUND,
    "Listing not found"
)]
#[actix_web::test]
async fn detail_distinguishes_malformed_and_absent_ids(
    #[case] uri: &str,
    #[case] status: StatusCode,
    #[case] message: &str,
) {
    let mut ports = MockPorts::default();
    ports
        .listings_query
        .expect_get()
        .returning(|_| Err(Error::not_found("Listing not found")));

    let (actual, body) = call(ports, actix_test::TestRequest::get().uri(uri)).await;

    assert_eq!(actual, status);
    assert_eq!(body["message"], message);
}

#[rstest]
#[actix_web::test]
async fn json_create_uses_principal_as_owner(host: User) {
    let mut ports = MockPorts::authenticating(&host);
    let owner = *host.id();
    let detail = beach_hut(&host);
    ports
        .listings
        .expect_create()
        .withf(move |request| {
            request.principal == owner
                && request.draft.title == "Beach Hut"
                && request.draft.price.value() == 2000.0
                && request.upload.is_none()
        })
        .times(1)
        .return_once(move |_| Ok(detail));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/listings")
            .insert_header(bearer())
            .set_json(json!({
                "title": "Beach Hut",
                "description": "Cozy",
                "location": "Goa",
                "country": "India",
                "price": 2000,
                "owner": "00000000-0000-0000-0000-000000000000",
            })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Listing created successfully");
    assert_eq!(body["data"]["listing"]["owner"]["id"], owner.to_string());
}

#[rstest]
#[actix_web::test]
async fn multipart_create_forwards_nested_fields_and_file(host: User) {
    let mut ports = MockPorts::authenticating(&host);
    let detail = beach_hut(&host);
    ports
        .listings
        .expect_create()
        .withf(|request| {
            let upload_ok = request.upload.as_ref().is_some_and(|upload| {
                upload.original_name.as_deref() == Some("hut.png")
                    && upload.content_type.as_deref() == Some("image/png")
                    && upload.bytes == b"PNG-bytes"
            });
            upload_ok && request.draft.country == "India" && request.draft.price.value() == 2000.0
        })
        .times(1)
        .return_once(move |_| Ok(detail));

    let (status, _) = call(
        ports,
        multipart_request(&[
            ("listing[title]", None, "Beach Hut"),
            ("listing[description]", None, "Cozy"),
            ("listing[location]", None, "Goa"),
            ("country", None, "India"),
            ("listing[price]", None, "2000"),
            ("listing[owner]", None, "someone-else"),
            ("image", Some(("hut.png", "image/png")), "PNG-bytes"),
        ]),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
}

#[rstest]
#[actix_web::test]
async fn multipart_body_image_reaches_the_draft(host: User) {
    let mut ports = MockPorts::authenticating(&host);
    let detail = beach_hut(&host);
    ports
        .listings
        .expect_create()
        .withf(|request| {
            request.upload.is_none()
                && request.draft.image
                    == Some(ListingImage {
                        url: "https://cdn.test/seed.jpg".to_owned(),
                        filename: "seed".to_owned(),
                    })
        })
        .return_once(move |_| Ok(detail));

    let (status, _) = call(
        ports,
        multipart_request(&[
            ("title", None, "Beach Hut"),
            ("description", None, "Cozy"),
            ("location", None, "Goa"),
            ("country", None, "India"),
            ("price", None, "2000"),
            ("image[url]", None, "https://cdn.test/seed.jpg"),
            ("image[filename]", None, "seed"),
        ]),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
}

#[rstest]
#[actix_web::test]
async fn oversized_upload_is_rejected(host: User) {
    let mut ports = MockPorts::authenticating(&host);
    ports.listings.expect_create().never();
    let state = ports.into_state().with_max_upload_bytes(4);

    let (status, body) = call_with(
        state,
        multipart_request(&[
            ("title", None, "Beach Hut"),
            ("image", Some(("hut.png", "image/png")), "far too many bytes"),
        ]),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("File upload error:"))
    );
}

#[rstest]
#[case(
    json!({"title": "Beach Hut", "description": "Cozy", "location": "Goa", "country": "India", "price": -5}),
    json!(["Price must be a positive number"])
)]
#[case(
    json!({"title": "Beach Hut", "description": "Cozy", "location": "Goa", "country": "India", "price": "cheap"}),
    json!(["Price must be a number"])
)]
#[case(
    json!({}),
    json!([
        "Title is required",
        "Description is required",
        "Location is required",
        "Country is required",
        "Price is required",
    ])
)]
#[actix_web::test]
async fn invalid_create_is_rejected_before_persistence(
    host: User,
    #[case] payload: Value,
    #[case] errors: Value,
) {
    let mut ports = MockPorts::authenticating(&host);
    ports.listings.expect_create().never();

    let (status, body) = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/listings")
            .insert_header(bearer())
            .set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation error");
    assert_eq!(body["errors"], errors);
}

#[rstest]
#[actix_web::test]
async fn create_requires_a_token() {
    let mut ports = MockPorts::default();
    ports.listings.expect_create().never();

    let (status, body) = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/listings")
            .set_json(json!({"title": "Beach Hut"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        "Unauthorized. Please login to access this resource."
    );
}

#[rstest]
#[actix_web::test]
async fn update_sends_only_present_fields(host: User) {
    let mut ports = MockPorts::authenticating(&host);
    let detail = beach_hut(&host);
    let id = *detail.listing.id();
    ports
        .listings
        .expect_update()
        .withf(move |request| {
            request.listing_id == id
                && request.patch
                    == ListingPatch {
                        title: Some("Beach Villa".to_owned()),
                        ..ListingPatch::default()
                    }
        })
        .return_once(move |_| Ok(detail));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::put()
            .uri(&format!("/api/listings/{id}"))
            .insert_header(bearer())
            .set_json(json!({"title": "Beach Villa"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Listing updated successfully");
}

#[rstest]
#[actix_web::test]
async fn non_owner_update_is_forbidden(host: User) {
    let mut ports = MockPorts::authenticating(&host);
    ports.listings.expect_update().return_once(|_| {
        Err(Error::forbidden("You are not authorized to update this listing"))
    });

    let (status, body) = call(
        ports,
        actix_test::TestRequest::put()
            .uri(&format!("/api/listings/{}", ListingId::random()))
            .insert_header(bearer())
            .set_json(json!({"price": 10})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");
    assert_eq!(body["message"], "You are not authorized to update this listing");
}

#[rstest]
#[actix_web::test]
async fn delete_acknowledges(host: User) {
    let id = ListingId::random();
    let owner = *host.id();
    let mut ports = MockPorts::authenticating(&host);
    ports
        .listings
        .expect_delete()
        .withf(move |principal, listing| *principal == owner && *listing == id)
        .times(1)
        .return_once(|_, _| Ok(()));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/listings/{id}"))
            .insert_header(bearer()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "message": "Listing deleted successfully"})
    );
}
