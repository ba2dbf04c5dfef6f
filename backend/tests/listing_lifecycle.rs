//! Listing scenarios: publishing, ownership, uploads and cascade delete.

mod support;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::{Value, json};

use support::{World, bearer, beach_hut, create_listing, create_review, register, send};
use wanderlust::domain::ListingId;

const BOUNDARY: &str = "listing-scenario-boundary";

fn multipart(parts: &[(&str, Option<&str>, &str)]) -> Vec<u8> {
    let mut body = String::new();
    for (name, file_name, content) in parts {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        match file_name {
            Some(file_name) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
            )),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body.into_bytes()
}

#[actix_rt::test]
async fn created_listing_reads_back_with_owner() {
    let world = World::default();
    let app = world.app().await;
    let host = register(&app, "host").await;

    let mut body = beach_hut();
    body["owner"] = json!("00000000-0000-0000-0000-000000000000");
    let id = create_listing(&app, &host.token, body).await;

    let (status, body) = send(&app, TestRequest::get().uri(&format!("/api/listings/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let listing = &body["data"]["listing"];
    assert_eq!(listing["title"], "Beach Hut");
    assert_eq!(listing["description"], "Cozy");
    assert_eq!(listing["location"], "Goa");
    assert_eq!(listing["country"], "India");
    assert_eq!(listing["price"], 2000.0);
    assert_eq!(listing["owner"]["id"], host.id.as_str());
    assert_eq!(listing["owner"]["email"], "host@example.com");
    assert!(listing["createdAt"].is_string());
    assert!(listing["image"]["url"].is_string());
    assert_eq!(listing["reviews"], json!([]));
}

#[rstest]
#[case(json!({"price": -5}))]
#[case(json!({"price": "lots"}))]
#[case(json!({"title": "  "}))]
#[actix_rt::test]
async fn invalid_listing_is_not_persisted(#[case] overrides: Value) {
    let world = World::default();
    let app = world.app().await;
    let host = register(&app, "host").await;
    let mut body = beach_hut();
    for (key, value) in overrides.as_object().expect("object") {
        body[key] = value.clone();
    }

    let (status, response) = send(
        &app,
        TestRequest::post()
            .uri("/api/listings")
            .insert_header(bearer(&host.token))
            .set_json(body),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "Validation error");
    assert_eq!(world.store.listing_count(), 0);
}

#[actix_rt::test]
async fn index_is_newest_first_with_review_ids() {
    let world = World::default();
    let app = world.app().await;
    let host = register(&app, "host").await;
    let guest = register(&app, "guest").await;
    let older = create_listing(&app, &host.token, beach_hut()).await;
    let mut loft = beach_hut();
    loft["title"] = json!("City Loft");
    let newer = create_listing(&app, &host.token, loft).await;
    let review = create_review(&app, &guest.token, &older, 5, "Lovely").await;

    let (status, body) = send(&app, TestRequest::get().uri("/api/listings")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    let listings = &body["data"]["listings"];
    assert_eq!(listings[0]["id"], newer.as_str());
    assert_eq!(listings[1]["id"], older.as_str());
    assert_eq!(listings[1]["reviews"], json!([review]));
    assert_eq!(listings[1]["owner"]["username"], "host");
    assert!(listings[1]["owner"].get("email").is_none());
}

#[actix_rt::test]
async fn only_the_owner_may_change_a_listing() {
    let world = World::default();
    let app = world.app().await;
    let host = register(&app, "host").await;
    let intruder = register(&app, "intruder").await;
    let id = create_listing(&app, &host.token, beach_hut()).await;

    let (status, body) = send(
        &app,
        TestRequest::put()
            .uri(&format!("/api/listings/{id}"))
            .insert_header(bearer(&intruder.token))
            .set_json(json!({"price": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You are not authorized to update this listing");

    let (status, _) = send(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/listings/{id}"))
            .insert_header(bearer(&intruder.token)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let listing_id: ListingId = id.parse().expect("listing id");
    let stored = world.store.listing(&listing_id).expect("listing still stored");
    assert_eq!(stored.price().value(), 2000.0);
}

#[actix_rt::test]
async fn owner_update_changes_only_the_given_fields() {
    let world = World::default();
    let app = world.app().await;
    let host = register(&app, "host").await;
    let id = create_listing(&app, &host.token, beach_hut()).await;

    let (status, body) = send(
        &app,
        TestRequest::put()
            .uri(&format!("/api/listings/{id}"))
            .insert_header(bearer(&host.token))
            .set_json(json!({"price": "2500", "description": "Cozier"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Listing updated successfully");
    let listing = &body["data"]["listing"];
    assert_eq!(listing["price"], 2500.0);
    assert_eq!(listing["description"], "Cozier");
    assert_eq!(listing["title"], "Beach Hut");
    assert_ne!(listing["updatedAt"], listing["createdAt"]);
}

#[actix_rt::test]
async fn multipart_upload_becomes_the_listing_image() {
    let world = World::default();
    let app = world.app().await;
    let host = register(&app, "host").await;

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/api/listings")
            .insert_header(bearer(&host.token))
            .insert_header((
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart(&[
                ("listing[title]", None, "Beach Hut"),
                ("listing[description]", None, "Cozy"),
                ("listing[location]", None, "Goa"),
                ("listing[country]", None, "India"),
                ("listing[price]", None, "2000"),
                ("image", Some("hut.png"), "PNG-bytes"),
            ])),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    let image = &body["data"]["listing"]["image"];
    assert!(
        image["url"]
            .as_str()
            .is_some_and(|url| url.starts_with("https://images.test/"))
    );
    assert_eq!(world.images.uploads().len(), 1);
    assert_eq!(world.images.uploads()[0].bytes, b"PNG-bytes".to_vec());
}

#[actix_rt::test]
async fn oversized_upload_is_rejected() {
    let world = World::default().with_max_upload_bytes(4);
    let app = world.app().await;
    let host = register(&app, "host").await;

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/api/listings")
            .insert_header(bearer(&host.token))
            .insert_header((
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart(&[
                ("title", None, "Beach Hut"),
                ("image", Some("hut.png"), "far too many bytes"),
            ])),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("File upload error:"))
    );
    assert_eq!(world.store.listing_count(), 0);
}

#[actix_rt::test]
async fn deleting_a_listing_removes_its_reviews() {
    let world = World::default();
    let app = world.app().await;
    let host = register(&app, "host").await;
    let id = create_listing(&app, &host.token, beach_hut()).await;
    for guest in ["ana", "ben", "cho"] {
        let account = register(&app, guest).await;
        create_review(&app, &account.token, &id, 4, "Nice").await;
    }
    let listing_id: ListingId = id.parse().expect("listing id");
    assert_eq!(world.store.review_count_for(&listing_id), 3);

    let (status, body) = send(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/listings/{id}"))
            .insert_header(bearer(&host.token)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Listing deleted successfully");
    assert_eq!(world.store.review_count_for(&listing_id), 0);
    let (status, _) = send(&app, TestRequest::get().uri(&format!("/api/listings/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[case("/api/listings/not-a-uuid", StatusCode::BAD_REQUEST, "Invalid ID format")]
#[case(
    "/api/listings/6f1c3b1e-4a5d-4a43-9d7e-3f2a1b0c9d8e",
    StatusCode::NOT_FOUND,
    "Listing not found"
)]
#[case("/api/bookings", StatusCode::NOT_FOUND, "API endpoint not found")]
#[actix_rt::test]
async fn lookups_distinguish_malformed_absent_and_unknown(
    #[case] uri: &str,
    #[case] status: StatusCode,
    #[case] message: &str,
) {
    let world = World::default();
    let app = world.app().await;

    let (actual, body) = send(&app, TestRequest::get().uri(uri)).await;

    assert_eq!(actual, status);
    assert_eq!(body["message"], message);
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
async fn health_reports_running() {
    let world = World::default();
    let app = world.app().await;

    let (status, body) = send(&app, TestRequest::get().uri("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["message"], "Server is running");
}
