//! The HTTP contract, exercised against the in-memory store.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use api_server::handlers::configure_routes;
use api_server::state::AppState;
use folio_core::ports::{LookupColumn, LookupValue, PostRepository, RecordLookup};
use folio_infra::{Argon2PasswordService, InMemoryStore, JwtConfig, JwtTokenSigner};

fn state(store: &Arc<InMemoryStore>) -> AppState {
    AppState::in_memory(
        store.clone(),
        Arc::new(Argon2PasswordService::with_cost(1024, 1).unwrap()),
        Arc::new(JwtTokenSigner::new(JwtConfig {
            secret: "api-test-secret".to_string(),
            issuer: "folio-tests".to_string(),
        })),
    )
}

macro_rules! spawn_app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(state(&$store)))
                .configure(configure_routes),
        )
        .await
    };
}

/// Send a request and return the status with the decoded body (`Null` when empty).
macro_rules! call {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let bytes = test::read_body(resp).await;
        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }};
}

/// Register a user and return its bearer token.
macro_rules! register {
    ($app:expr, $email:expr) => {{
        let (status, body) = call!(
            $app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(json!({ "name": "A", "email": $email, "password": "p" }))
        );
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["access_token"].as_str().unwrap().to_string()
    }};
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

fn post_body(slug: &str, author_id: i64) -> Value {
    json!({ "title": "T", "slug": slug, "body": "B", "author_id": author_id })
}

async fn count(store: &InMemoryStore, column: LookupColumn, value: &str) -> u64 {
    store
        .count(column, &LookupValue::Text(value.to_string()), None)
        .await
        .unwrap()
}

#[actix_web::test]
async fn test_login_success_and_failure() {
    let store = Arc::new(InMemoryStore::new());
    let app = spawn_app!(store);
    register!(app, "a@x.com");

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "a@x.com", "password": "p" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Success Login");
    assert!(!body["data"]["access_token"].as_str().unwrap().is_empty());

    for credentials in [
        json!({ "email": "a@x.com", "password": "wrong" }),
        json!({ "email": "ghost@x.com", "password": "p" }),
    ] {
        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(credentials)
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");
        assert_eq!(body["errors"]["email"][0], "Invalid credentials");
    }
}

#[actix_web::test]
async fn test_login_with_malformed_input_is_unprocessable() {
    let store = Arc::new(InMemoryStore::new());
    let app = spawn_app!(store);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "not-an-email" }))
    );

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["email"].is_array());
    assert_eq!(body["errors"]["password"][0], "The password field is required.");
}

#[actix_web::test]
async fn test_register_persists_one_user() {
    let store = Arc::new(InMemoryStore::new());
    let app = spawn_app!(store);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "name": "A", "email": "a@x.com", "password": "p" }))
    );

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully");
    assert!(body["data"]["access_token"].is_string());
    assert_eq!(count(&store, LookupColumn::UserEmail, "a@x.com").await, 1);
}

#[actix_web::test]
async fn test_register_duplicate_email() {
    let store = Arc::new(InMemoryStore::new());
    let app = spawn_app!(store);
    register!(app, "a@x.com");

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "name": "B", "email": "a@x.com", "password": "q" }))
    );

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "The email has already been taken.");
    assert_eq!(body["errors"]["email"][0], "The email has already been taken.");
    assert_eq!(count(&store, LookupColumn::UserEmail, "a@x.com").await, 1);
}

#[actix_web::test]
async fn test_register_lists_every_missing_field() {
    let store = Arc::new(InMemoryStore::new());
    let app = spawn_app!(store);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({}))
    );

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["message"],
        "The name field is required. (and 2 more errors)"
    );
    for field in ["name", "email", "password"] {
        assert_eq!(
            body["errors"][field][0],
            format!("The {field} field is required.")
        );
    }
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let store = Arc::new(InMemoryStore::new());
    let app = spawn_app!(store);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn test_protected_routes_require_a_valid_token() {
    let store = Arc::new(InMemoryStore::new());
    let app = spawn_app!(store);

    let (status, body) = call!(app, test::TestRequest::get().uri("/api/posts"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Unauthenticated." }));

    let (status, _) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/movies")
            .insert_header(bearer("not-a-token"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .set_json(post_body("t", 1))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(count(&store, LookupColumn::PostSlug, "t").await, 0);
}

#[actix_web::test]
async fn test_create_post_rejects_duplicate_slug() {
    let store = Arc::new(InMemoryStore::new());
    let app = spawn_app!(store);
    let token = register!(app, "a@x.com");

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .set_json(post_body("hello", 1))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Post created successfully");
    assert_eq!(count(&store, LookupColumn::PostSlug, "hello").await, 1);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .set_json(post_body("hello", 1))
    );
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["slug"][0], "The slug has already been taken.");
    assert_eq!(count(&store, LookupColumn::PostSlug, "hello").await, 1);
}

#[actix_web::test]
async fn test_create_post_requires_existing_author() {
    let store = Arc::new(InMemoryStore::new());
    let app = spawn_app!(store);
    let token = register!(app, "a@x.com");

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .set_json(post_body("orphan", 999))
    );

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"]["author_id"][0],
        "The selected author id is invalid."
    );
    assert_eq!(count(&store, LookupColumn::PostSlug, "orphan").await, 0);
}

#[actix_web::test]
async fn test_list_posts_pages_in_id_order() {
    let store = Arc::new(InMemoryStore::new());
    let app = spawn_app!(store);
    let token = register!(app, "a@x.com");

    for i in 1..=7 {
        let (status, _) = call!(
            app,
            test::TestRequest::post()
                .uri("/api/posts")
                .insert_header(bearer(&token))
                .set_json(post_body(&format!("post-{i}"), 1))
        );
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/posts")
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Success");
    let posts = body["data"]["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 5);
    assert_eq!(posts[0]["slug"], "post-1");
    assert_eq!(posts[0]["author"], json!({ "id": 1, "name": "A" }));

    let (_, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/posts?limit=3&page=3")
            .insert_header(bearer(&token))
    );
    let posts = body["data"]["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["slug"], "post-7");

    let (status, _) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/posts?limit=abc")
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_list_posts_with_huge_page_is_empty() {
    let store = Arc::new(InMemoryStore::new());
    let app = spawn_app!(store);
    let token = register!(app, "a@x.com");
    call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .set_json(post_body("only", 1))
    );

    for uri in [
        format!("/api/posts?limit={}&page=3", i64::MAX),
        format!("/api/movies?limit={}&page={}", i64::MAX, i64::MAX),
    ] {
        let (status, body) = call!(
            app,
            test::TestRequest::get()
                .uri(&uri)
                .insert_header(bearer(&token))
        );
        assert_eq!(status, StatusCode::OK, "{uri}");
        let items = body["data"]
            .as_object()
            .and_then(|data| data.values().next())
            .and_then(Value::as_array)
            .unwrap();
        assert!(items.is_empty(), "{uri}");
    }
}

#[actix_web::test]
async fn test_deleted_post_is_hidden_but_retained() {
    let store = Arc::new(InMemoryStore::new());
    let app = spawn_app!(store);
    let token = register!(app, "a@x.com");

    let (_, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .set_json(post_body("gone", 1))
    );
    let id = body["data"]["post"]["id"].as_i64().unwrap();

    let (status, body) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/posts/{id}"))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/posts/{id}"))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("Post {id} not found"));

    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/posts/{id}"))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let row = store.find_with_trashed(id).await.unwrap().unwrap();
    assert!(row.is_deleted());
    assert_eq!(count(&store, LookupColumn::PostSlug, "gone").await, 1);
}

#[actix_web::test]
async fn test_update_post_slug_uniqueness_excludes_self() {
    let store = Arc::new(InMemoryStore::new());
    let app = spawn_app!(store);
    let token = register!(app, "a@x.com");

    for slug in ["first", "second"] {
        call!(
            app,
            test::TestRequest::post()
                .uri("/api/posts")
                .insert_header(bearer(&token))
                .set_json(post_body(slug, 1))
        );
    }

    let (status, body) = call!(
        app,
        test::TestRequest::put()
            .uri("/api/posts/1")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "New", "slug": "first", "body": "B2", "author_id": "1" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Post updated successfully");
    assert_eq!(body["data"]["post"]["title"], "New");
    assert_eq!(body["data"]["post"]["slug"], "first");

    let (status, body) = call!(
        app,
        test::TestRequest::put()
            .uri("/api/posts/1")
            .insert_header(bearer(&token))
            .set_json(post_body("second", 1))
    );
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["slug"][0], "The slug has already been taken.");
}

#[actix_web::test]
async fn test_update_missing_post_is_not_found_before_validation() {
    let store = Arc::new(InMemoryStore::new());
    let app = spawn_app!(store);
    let token = register!(app, "a@x.com");

    let (status, body) = call!(
        app,
        test::TestRequest::put()
            .uri("/api/posts/42")
            .insert_header(bearer(&token))
            .set_json(json!({}))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Post 42 not found");

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/posts/abc")
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not Found");
}

#[actix_web::test]
async fn test_movie_crud() {
    let store = Arc::new(InMemoryStore::new());
    let app = spawn_app!(store);
    let token = register!(app, "a@x.com");

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/movies")
            .insert_header(bearer(&token))
            .set_json(json!({ "name": "Alien", "title": "Alien (1979)", "author": "Ridley Scott" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Movie created successfully");
    let id = body["data"]["movie"]["id"].as_i64().unwrap();
    assert_eq!(
        body["data"]["movie"],
        json!({ "id": id, "name": "Alien", "title": "Alien (1979)", "author": "Ridley Scott" })
    );

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/movies")
            .insert_header(bearer(&token))
            .set_json(json!({ "name": "Heat" }))
    );
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["title"][0], "The title field is required.");
    assert_eq!(body["errors"]["author"][0], "The author field is required.");

    let (status, body) = call!(
        app,
        test::TestRequest::put()
            .uri(&format!("/api/movies/{id}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "name": "Aliens", "title": "Aliens (1986)", "author": "James Cameron" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Movie updated successfully");
    assert_eq!(body["data"]["movie"]["author"], "James Cameron");

    let (status, body) = call!(
        app,
        test::TestRequest::get()
            .uri("/api/movies")
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["movies"].as_array().unwrap().len(), 1);

    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/movies/{id}"))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::NO_CONTENT);

    for req in [
        test::TestRequest::get().uri(&format!("/api/movies/{id}")),
        test::TestRequest::delete().uri(&format!("/api/movies/{id}")),
    ] {
        let (status, body) = call!(app, req.insert_header(bearer(&token)));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], format!("Movie {id} not found"));
    }
}

#[actix_web::test]
async fn test_register_login_then_create_post() {
    let store = Arc::new(InMemoryStore::new());
    let app = spawn_app!(store);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "name": "A", "email": "a@x.com", "password": "p" }))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "a@x.com", "password": "p" }))
    );
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    let user_id = 1;
    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "T", "slug": "t", "body": "B", "author_id": user_id }))
    );

    assert_eq!(status, StatusCode::CREATED);
    let post = &body["data"]["post"];
    assert_eq!(post["title"], "T");
    assert_eq!(post["slug"], "t");
    assert_eq!(post["body"], "B");
    assert_eq!(post["author"]["id"], user_id);
    assert!(post["created_at"].is_string());
}

#[actix_web::test]
async fn test_openapi_document_is_served_without_auth() {
    let store = Arc::new(InMemoryStore::new());
    let app = spawn_app!(store);

    let (status, body) = call!(
        app,
        test::TestRequest::get().uri("/api/docs/openapi.json")
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Folio API");
    assert!(body["paths"]["/api/posts/{id}"]["delete"].is_object());
    assert_eq!(
        body["paths"]["/api/movies"]["get"]["security"][0]["bearerAuth"],
        json!([])
    );
    assert!(body["paths"]["/api/auth/login"]["post"]["security"].is_null());
}
