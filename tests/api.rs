use std::io::Cursor;
use std::path::Path;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use image::{DynamicImage, ImageFormat};
use serde_json::{Value, json};

use recipe_api::config::ServerConfig;
use recipe_api::repository::DieselRepository;
use recipe_api::routes::configure;

mod common;

const ALICE_TOKEN: &str = "alice-token-0000000000000000000000000000";
const BOB_TOKEN: &str = "bob-token-00000000000000000000000000000000";
const BOUNDARY: &str = "recipe-api-test-boundary";

struct TestContext {
    _db: common::TestDb,
    media: tempfile::TempDir,
    repo: DieselRepository,
    config: ServerConfig,
}

fn setup(db_name: &str) -> TestContext {
    let db = common::TestDb::new(db_name);
    let repo = DieselRepository::new(db.pool());
    common::create_user_with_token(&repo, "alice@example.com", ALICE_TOKEN);
    common::create_user_with_token(&repo, "bob@example.com", BOB_TOKEN);

    let media = tempfile::tempdir().expect("media dir");
    let config = ServerConfig {
        database_url: db_name.to_string(),
        address: "127.0.0.1".to_string(),
        port: 8080,
        media_root: media.path().to_path_buf(),
        media_url: "/media".to_string(),
    };

    TestContext {
        _db: db,
        media,
        repo,
        config,
    }
}

macro_rules! init_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .configure(configure)
                .app_data(web::Data::new($ctx.repo.clone()))
                .app_data(web::Data::new($ctx.config.clone())),
        )
        .await
    };
}

fn auth(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Token {token}"))
}

fn png_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::new_rgb8(8, 8)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode png");
    bytes
}

fn multipart_image(file_name: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn names(items: &Value) -> Vec<String> {
    items
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|item| item["name"].as_str().map(str::to_string))
        .collect()
}

#[actix_web::test]
async fn requests_without_valid_token_are_unauthorized() {
    let ctx = setup("api_requests_without_valid_token_are_unauthorized.db");
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/api/recipes").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok()),
        Some("Token")
    );

    let req = test::TestRequest::get()
        .uri("/api/tags")
        .insert_header(auth("unknown"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/recipes")
        .insert_header((header::AUTHORIZATION, format!("Bearer {ALICE_TOKEN}")))
        .set_json(json!({"title": "x", "time_minutes": 1, "price": "1.00"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_recipe_with_nested_tags_and_ingredients() {
    let ctx = setup("api_create_recipe_with_nested_tags_and_ingredients.db");
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/recipes")
        .insert_header(auth(ALICE_TOKEN))
        .set_json(json!({
            "title": "Thai Prawn Curry",
            "time_minutes": 30,
            "price": "5.50",
            "tags": [{"name": "Thai"}, {"name": "Dinner"}, {"name": "Thai"}],
            "ingredients": [{"name": "Prawns"}],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["price"], "5.50");
    assert_eq!(body["description"], "");
    assert_eq!(body["image"], Value::Null);
    assert_eq!(names(&body["tags"]), vec!["Dinner", "Thai"]);
    assert_eq!(names(&body["ingredients"]), vec!["Prawns"]);

    let req = test::TestRequest::get()
        .uri("/api/tags")
        .insert_header(auth(ALICE_TOKEN))
        .to_request();
    let tags: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(names(&tags), vec!["Thai", "Dinner"]);

    let req = test::TestRequest::get()
        .uri("/api/recipes")
        .insert_header(auth(ALICE_TOKEN))
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    let first = &list.as_array().expect("array")[0];
    assert_eq!(first["title"], "Thai Prawn Curry");
    assert!(first.get("description").is_none());
}

#[actix_web::test]
async fn recipes_are_isolated_per_user() {
    let ctx = setup("api_recipes_are_isolated_per_user.db");
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/recipes")
        .insert_header(auth(ALICE_TOKEN))
        .set_json(json!({"title": "Cake", "time_minutes": 60, "price": 10}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let recipe_id = created["id"].as_i64().expect("id");

    let req = test::TestRequest::get()
        .uri("/api/recipes")
        .insert_header(auth(BOB_TOKEN))
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list, json!([]));

    let req = test::TestRequest::get()
        .uri(&format!("/api/recipes/{recipe_id}"))
        .insert_header(auth(BOB_TOKEN))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/recipes/{recipe_id}"))
        .insert_header(auth(BOB_TOKEN))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/recipes/{recipe_id}"))
        .insert_header(auth(ALICE_TOKEN))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["price"], "10.00");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/recipes/{recipe_id}"))
        .insert_header(auth(ALICE_TOKEN))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn patch_replaces_tags_and_ignores_owner_field() {
    let ctx = setup("api_patch_replaces_tags_and_ignores_owner_field.db");
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/recipes")
        .insert_header(auth(ALICE_TOKEN))
        .set_json(json!({
            "title": "Porridge",
            "time_minutes": 10,
            "price": "2.00",
            "tags": [{"name": "Breakfast"}],
        }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let recipe_id = created["id"].as_i64().expect("id");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/recipes/{recipe_id}"))
        .insert_header(auth(ALICE_TOKEN))
        .set_json(json!({"tags": [{"name": "Lunch"}], "user": 2}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(names(&updated["tags"]), vec!["Lunch"]);
    assert_eq!(updated["title"], "Porridge");

    let req = test::TestRequest::get()
        .uri(&format!("/api/recipes/{recipe_id}"))
        .insert_header(auth(ALICE_TOKEN))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/tags?assigned_only=1")
        .insert_header(auth(ALICE_TOKEN))
        .to_request();
    let assigned: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(names(&assigned), vec!["Lunch"]);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/recipes/{recipe_id}"))
        .insert_header(auth(ALICE_TOKEN))
        .set_json(json!({"tags": []}))
        .to_request();
    let cleared: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(cleared["tags"], json!([]));
}

#[actix_web::test]
async fn put_requires_full_payload() {
    let ctx = setup("api_put_requires_full_payload.db");
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/recipes")
        .insert_header(auth(ALICE_TOKEN))
        .set_json(json!({
            "title": "Omelette",
            "time_minutes": 5,
            "price": "3.00",
            "description": "Eggs",
        }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let recipe_id = created["id"].as_i64().expect("id");

    let req = test::TestRequest::put()
        .uri(&format!("/api/recipes/{recipe_id}"))
        .insert_header(auth(ALICE_TOKEN))
        .set_json(json!({"title": "Frittata"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["detail"].is_string());

    let req = test::TestRequest::put()
        .uri(&format!("/api/recipes/{recipe_id}"))
        .insert_header(auth(ALICE_TOKEN))
        .set_json(json!({"title": "Frittata", "time_minutes": 15, "price": 4.5}))
        .to_request();
    let replaced: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(replaced["title"], "Frittata");
    assert_eq!(replaced["price"], "4.50");
    assert_eq!(replaced["description"], "");
}

#[actix_web::test]
async fn tag_endpoints_enforce_uniqueness_and_ownership() {
    let ctx = setup("api_tag_endpoints_enforce_uniqueness_and_ownership.db");
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/tags")
        .insert_header(auth(ALICE_TOKEN))
        .set_json(json!({"name": "Vegan"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let tag: Value = test::read_body_json(resp).await;
    let tag_id = tag["id"].as_i64().expect("id");

    let req = test::TestRequest::post()
        .uri("/api/tags")
        .insert_header(auth(ALICE_TOKEN))
        .set_json(json!({"name": "Vegan"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/tags")
        .insert_header(auth(BOB_TOKEN))
        .set_json(json!({"name": "Vegan"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/tags/{tag_id}"))
        .insert_header(auth(BOB_TOKEN))
        .set_json(json!({"name": "Stolen"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/tags/{tag_id}"))
        .insert_header(auth(ALICE_TOKEN))
        .set_json(json!({"name": "Plant Based"}))
        .to_request();
    let renamed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(renamed, json!({"id": tag_id, "name": "Plant Based"}));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tags/{tag_id}"))
        .insert_header(auth(ALICE_TOKEN))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn ingredient_listing_filters_assigned_only() {
    let ctx = setup("api_ingredient_listing_filters_assigned_only.db");
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/ingredients")
        .insert_header(auth(ALICE_TOKEN))
        .set_json(json!({"name": "Saffron"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    for title in ["Bread", "Sandwich"] {
        let req = test::TestRequest::post()
            .uri("/api/recipes")
            .insert_header(auth(ALICE_TOKEN))
            .set_json(json!({
                "title": title,
                "time_minutes": 10,
                "price": "1.00",
                "ingredients": [{"name": "Flour"}],
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/ingredients?assigned_only=true")
        .insert_header(auth(ALICE_TOKEN))
        .to_request();
    let assigned: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(names(&assigned), vec!["Flour"]);

    let req = test::TestRequest::get()
        .uri("/api/ingredients")
        .insert_header(auth(ALICE_TOKEN))
        .to_request();
    let all: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(names(&all), vec!["Saffron", "Flour"]);
}

#[actix_web::test]
async fn upload_image_stores_file_and_rejects_garbage() {
    let ctx = setup("api_upload_image_stores_file_and_rejects_garbage.db");
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/recipes")
        .insert_header(auth(ALICE_TOKEN))
        .set_json(json!({"title": "Pizza", "time_minutes": 40, "price": "9.99"}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let recipe_id = created["id"].as_i64().expect("id");
    let content_type = format!("multipart/form-data; boundary={BOUNDARY}");

    let req = test::TestRequest::post()
        .uri(&format!("/api/recipes/{recipe_id}/image"))
        .insert_header(auth(ALICE_TOKEN))
        .insert_header((header::CONTENT_TYPE, content_type.clone()))
        .set_payload(multipart_image("pizza.png", &png_bytes()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let uploaded: Value = test::read_body_json(resp).await;
    assert_eq!(uploaded["id"].as_i64(), Some(recipe_id));
    let url = uploaded["image"].as_str().expect("image url").to_string();
    assert!(url.starts_with("/media/uploads/recipe/"));
    assert!(url.ends_with(".png"));
    let stored = ctx.media.path().join(url.trim_start_matches("/media/"));
    assert!(Path::new(&stored).exists());

    let req = test::TestRequest::get()
        .uri(&format!("/api/recipes/{recipe_id}"))
        .insert_header(auth(ALICE_TOKEN))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["image"].as_str(), Some(url.as_str()));

    let req = test::TestRequest::post()
        .uri(&format!("/api/recipes/{recipe_id}/image"))
        .insert_header(auth(ALICE_TOKEN))
        .insert_header((header::CONTENT_TYPE, content_type.clone()))
        .set_payload(multipart_image("notes.txt", b"notimage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri(&format!("/api/recipes/{recipe_id}/image"))
        .insert_header(auth(BOB_TOKEN))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(multipart_image("pizza.png", &png_bytes()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // The rejected uploads left the stored image in place.
    assert!(Path::new(&stored).exists());
}

#[actix_web::test]
async fn recipe_listing_filters_by_tag_ids() {
    let ctx = setup("api_recipe_listing_filters_by_tag_ids.db");
    let app = init_app!(ctx);

    let mut tag_ids = Vec::new();
    for (title, tag) in [("Ramen", "Japanese"), ("Tacos", "Mexican")] {
        let req = test::TestRequest::post()
            .uri("/api/recipes")
            .insert_header(auth(ALICE_TOKEN))
            .set_json(json!({
                "title": title,
                "time_minutes": 20,
                "price": "6.00",
                "tags": [{"name": tag}],
            }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        tag_ids.push(created["tags"][0]["id"].as_i64().expect("tag id"));
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/recipes?tags={}", tag_ids[0]))
        .insert_header(auth(ALICE_TOKEN))
        .to_request();
    let filtered: Value = test::call_and_read_body_json(&app, req).await;
    let titles: Vec<&str> = filtered
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|recipe| recipe["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Ramen"]);

    let req = test::TestRequest::get()
        .uri("/api/recipes?tags=1,abc")
        .insert_header(auth(ALICE_TOKEN))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
