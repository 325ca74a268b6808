//! End-to-end tests through `Server::dispatch`.

use argus_schema::{Field, FieldKind, Location, Schema};
use argus_server::{JsonResponse, Server, UseArgs};
use bytes::Bytes;
use http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};

fn hello_server() -> Server {
    let hello = UseArgs::new(Schema::builder().field("name", Field::string().required()).build())
        .handler(|_req, args| async move {
            format!("Hello {}", args.str("name").unwrap_or_default())
        });

    let user = UseArgs::new(
        Schema::builder()
            .field("id", Field::integer().location(Location::ViewArgs))
            .build(),
    )
    .handler(|_req, args| async move { JsonResponse::new(args.to_json()) });

    let echo = UseArgs::new(
        Schema::builder()
            .field("name", Field::string().location(Location::Json))
            .field("tags", Field::list(FieldKind::String).location(Location::Json))
            .build(),
    )
    .error_status(StatusCode::BAD_REQUEST)
    .error_header("x-args", "rejected")
    .handler(|_req, args| async move { JsonResponse::new(args.to_json()) });

    let strict = UseArgs::new(Schema::builder().field("n", Field::integer().required()).build())
        .error_header("x-args", "rejected")
        .handler(|_req, args| async move { format!("{}", args.int("n").unwrap_or_default()) });

    let greet = UseArgs::new(Schema::builder().field("name", Field::string()).build())
        .location(Location::ViewArgs)
        .handler(|_req, args| async move {
            format!("Hello {}", args.str("name").unwrap_or_default())
        });

    Server::builder()
        .route(Method::GET, "/", "index", hello)
        .and_then(|b| b.route(Method::GET, "/greet/<name>", "greet", greet))
        .and_then(|b| b.route(Method::GET, "/users/<id>", "get_user", user))
        .and_then(|b| b.route(Method::POST, "/echo", "echo", echo))
        .and_then(|b| b.route(Method::GET, "/strict", "strict", strict))
        .unwrap()
        .build()
}

fn get(uri: &str) -> Request<Bytes> {
    Request::builder().uri(uri).body(Bytes::new()).unwrap()
}

fn post_json(uri: &str, body: &'static str) -> Request<Bytes> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Bytes::from_static(body.as_bytes()))
        .unwrap()
}

async fn body_text(response: http::Response<http_body_util::Full<Bytes>>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: http::Response<http_body_util::Full<Bytes>>) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

#[tokio::test]
async fn test_hello_with_name() {
    let response = hello_server().dispatch(get("/?name=Ann")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Hello Ann");
}

#[tokio::test]
async fn test_hello_without_name() {
    let response = hello_server().dispatch(get("/")).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(
        body_json(response).await,
        json!({
            "code": 422,
            "status": "Unprocessable Entity",
            "messages": {"name": ["Missing data for required field."]},
        })
    );
}

#[tokio::test]
async fn test_view_args() {
    let response = hello_server().dispatch(get("/users/42")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"id": 42}));
}

#[tokio::test]
async fn test_view_args_are_decoded() {
    let response = hello_server().dispatch(get("/greet/Ann%20Lee")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Hello Ann Lee");
}

#[tokio::test]
async fn test_encoded_integer_view_arg() {
    let response = hello_server().dispatch(get("/users/%34%32")).await;
    assert_eq!(body_json(response).await, json!({"id": 42}));
}

#[tokio::test]
async fn test_view_args_not_an_integer() {
    let response = hello_server().dispatch(get("/users/abc")).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await["messages"],
        json!({"id": ["Not a valid integer."]})
    );
}

#[tokio::test]
async fn test_json_body() {
    let response = hello_server()
        .dispatch(post_json("/echo", r#"{"name": "Ann", "tags": ["a", "b"]}"#))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"name": "Ann", "tags": ["a", "b"]})
    );
}

#[tokio::test]
async fn test_invalid_json_is_bad_request() {
    let response = hello_server().dispatch(post_json("/echo", "{not json")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get("x-args").is_none());
    assert_eq!(
        body_json(response).await,
        json!({
            "code": 400,
            "status": "Bad Request",
            "messages": {"json": ["Invalid JSON body."]},
        })
    );
}

#[tokio::test]
async fn test_empty_json_body_is_missing() {
    let response = hello_server().dispatch(post_json("/echo", "")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({}));
}

#[tokio::test]
async fn test_error_status_and_headers() {
    let response = hello_server()
        .dispatch(post_json("/echo", r#"{"name": 5}"#))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["x-args"], "rejected");
}

#[tokio::test]
async fn test_error_headers_with_default_status() {
    let response = hello_server().dispatch(get("/strict?n=x")).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.headers()["x-args"], "rejected");
}

#[tokio::test]
async fn test_unknown_route() {
    let response = hello_server().dispatch(get("/missing")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], 404);
}
