use marketplace_service::auth::TokenKeys;
use marketplace_service::handlers::{app, AppState};
use marketplace_service::model::User;
use marketplace_service::store::InMemoryMarketStore;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

const SECRET: &str = "integration-test-secret-0123456789abcdef";

/// 트레이싱 초기화
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .without_time()
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// 테스트 서버
struct TestApp {
    base_url: String,
    client: Client,
    store: Arc<InMemoryMarketStore>,
    keys: TokenKeys,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn user(&self, name: &str, admin: bool) -> (User, String) {
        let user = self
            .store
            .insert_user(name, &format!("{}@example.com", name), admin)
            .await;
        let token = self.keys.issue(user.id).unwrap();
        (user, token)
    }
}

/// 메모리 저장소로 서버를 임의 포트에 띄운다
async fn setup() -> TestApp {
    setup_with_body_limit(1024 * 1024).await
}

async fn setup_with_body_limit(body_limit_bytes: usize) -> TestApp {
    init_tracing();
    let store = Arc::new(InMemoryMarketStore::new());
    let keys = TokenKeys::new(SECRET, 1);
    let state = AppState {
        store: store.clone(),
        keys: keys.clone(),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app(state, body_limit_bytes).into_make_service())
            .await
            .unwrap();
    });

    TestApp {
        base_url: format!("http://{}", addr),
        client: Client::new(),
        store,
        keys,
    }
}

fn product_body(name: &str, original_price: f64) -> Value {
    json!({
        "name": name,
        "description": "Film camera in working condition",
        "category": "camera",
        "originalPrice": original_price,
        "pictureUrl": "https://img.example/camera.png",
        "endDate": "2030-01-01T00:00:00Z"
    })
}

/// 테스트용 상품 생성
async fn create_test_product(app: &TestApp, token: &str, name: &str) -> Value {
    let response = app
        .client
        .post(app.url("/api/products"))
        .bearer_auth(token)
        .json(&product_body(name, 100.0))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

/// 테스트용 입찰 생성
async fn place_bid(app: &TestApp, token: &str, product_id: i64, price: Value) -> reqwest::Response {
    app.client
        .post(app.url(&format!("/api/products/{}/bids", product_id)))
        .bearer_auth(token)
        .json(&json!({ "price": price }))
        .send()
        .await
        .expect("Failed to send request")
}

/// 상품 등록 후 조회 시 판매자 id 확인
#[tokio::test]
async fn test_created_product_is_owned_by_creator() {
    let app = setup().await;
    let (seller, token) = app.user("seller", false).await;

    let created = create_test_product(&app, &token, "Leica M6").await;
    assert_eq!(created["sellerId"], seller.id);
    let product_id = created["id"].as_i64().unwrap();

    let response = app
        .client
        .get(app.url(&format!("/api/products/{}", product_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let product: Value = response.json().await.unwrap();
    assert_eq!(product["sellerId"], seller.id);
    assert_eq!(product["seller"]["id"], seller.id);
    assert_eq!(product["bids"], json!([]));
}

/// 인증 없이 상품 목록과 사용자 프로필 조회
#[tokio::test]
async fn test_public_reads_need_no_identity() {
    let app = setup().await;
    let (seller, token) = app.user("seller", false).await;
    let (bidder, bidder_token) = app.user("bidder", false).await;
    let product = create_test_product(&app, &token, "Tripod").await;
    let product_id = product["id"].as_i64().unwrap();
    let response = place_bid(&app, &bidder_token, product_id, json!(120)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.client.get(app.url("/api/products")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let products: Value = response.json().await.unwrap();
    assert_eq!(products.as_array().unwrap().len(), 1);
    assert_eq!(products[0]["bids"][0]["bidder"]["id"], bidder.id);

    let response = app
        .client
        .get(app.url(&format!("/api/users/{}", seller.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile: Value = response.json().await.unwrap();
    assert_eq!(profile["admin"], false);
    assert_eq!(profile["products"][0]["id"], product_id);

    let response = app
        .client
        .get(app.url(&format!("/api/users/{}", bidder.id)))
        .send()
        .await
        .unwrap();
    let profile: Value = response.json().await.unwrap();
    assert_eq!(profile["bids"][0]["product"]["id"], product_id);

    let response = app.client.get(app.url("/api/users/999")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = app.client.get(app.url("/api/users/abc")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// 필수 필드가 하나라도 비면 400
#[tokio::test]
async fn test_create_product_rejects_falsy_fields() {
    let app = setup().await;
    let (_, token) = app.user("seller", false).await;

    let falsy = [
        ("name", json!("")),
        ("description", Value::Null),
        ("category", json!("")),
        ("originalPrice", json!(0)),
        ("pictureUrl", json!("")),
        ("endDate", Value::Null),
    ];
    for (field, value) in falsy {
        let mut body = product_body("Broken", 100.0);
        body[field] = value;
        let response = app
            .client
            .post(app.url("/api/products"))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "field {}", field);
        let error: Value = response.json().await.unwrap();
        assert_eq!(error["error"], "Invalid or missing fields");
        assert_eq!(error["details"].as_array().unwrap().len(), 6);
    }

    let response = app
        .client
        .get(app.url("/api/products"))
        .send()
        .await
        .unwrap();
    let products: Value = response.json().await.unwrap();
    assert_eq!(products, json!([]));
}

/// 입찰 가격 검증과 없는 상품
#[tokio::test]
async fn test_bid_validation() {
    let app = setup().await;
    let (_, seller_token) = app.user("seller", false).await;
    let (_, bidder_token) = app.user("bidder", false).await;
    let product = create_test_product(&app, &seller_token, "Lens").await;
    let product_id = product["id"].as_i64().unwrap();

    for price in [json!(0), json!(-10), Value::Null] {
        let response = place_bid(&app, &bidder_token, product_id, price).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: Value = response.json().await.unwrap();
        assert_eq!(error["details"], json!(["price"]));
    }

    let response = app
        .client
        .post(app.url(&format!("/api/products/{}/bids", product_id)))
        .bearer_auth(&bidder_token)
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // 없는 상품이면 가격과 관계없이 404
    for price in [json!(50), json!(0), Value::Null] {
        let response = place_bid(&app, &bidder_token, 9999, price).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // 숫자 문자열 가격
    let response = place_bid(&app, &bidder_token, product_id, json!("150")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let bid: Value = response.json().await.unwrap();
    assert_eq!(bid["price"], 150.0);

    // 판매자 본인 입찰 허용
    let response = place_bid(&app, &seller_token, product_id, json!(101)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// 소유자/관리자가 아니면 삭제 불가, 삭제 후 404
#[tokio::test]
async fn test_delete_authorization() {
    let app = setup().await;
    let (_, seller_token) = app.user("seller", false).await;
    let (_, bidder_token) = app.user("bidder", false).await;
    let (_, stranger_token) = app.user("stranger", false).await;

    let product = create_test_product(&app, &seller_token, "Drone").await;
    let product_id = product["id"].as_i64().unwrap();
    let bid: Value = place_bid(&app, &bidder_token, product_id, json!(150))
        .await
        .json()
        .await
        .unwrap();
    let bid_id = bid["id"].as_i64().unwrap();

    // 입찰 삭제
    let response = app
        .client
        .delete(app.url(&format!("/api/bids/{}", bid_id)))
        .bearer_auth(&stranger_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .client
        .delete(app.url(&format!("/api/bids/{}", bid_id)))
        .bearer_auth(&bidder_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.bytes().await.unwrap().is_empty());

    let response = app
        .client
        .delete(app.url(&format!("/api/bids/{}", bid_id)))
        .bearer_auth(&bidder_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // 상품 삭제
    let response = app
        .client
        .delete(app.url(&format!("/api/products/{}", product_id)))
        .bearer_auth(&stranger_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .client
        .delete(app.url(&format!("/api/products/{}", product_id)))
        .bearer_auth(&seller_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .client
        .get(app.url(&format!("/api/products/{}", product_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"], "Product not found !");
}

/// 부분 수정은 항상 400, 전체 수정만 반영
#[tokio::test]
async fn test_update_requires_every_field() {
    let app = setup().await;
    let (_, seller_token) = app.user("seller", false).await;
    let (_, stranger_token) = app.user("stranger", false).await;
    let product = create_test_product(&app, &seller_token, "Guitar").await;
    let product_id = product["id"].as_i64().unwrap();
    let url = app.url(&format!("/api/products/{}", product_id));

    let response = app
        .client
        .put(&url)
        .bearer_auth(&seller_token)
        .json(&json!({ "name": "Only the name" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .client
        .put(&url)
        .bearer_auth(&stranger_token)
        .json(&product_body("Stolen", 1.0))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .client
        .put(app.url("/api/products/4242"))
        .bearer_auth(&seller_token)
        .json(&product_body("Ghost", 1.0))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .client
        .put(&url)
        .bearer_auth(&seller_token)
        .json(&product_body("Guitar (restrung)", 120.0))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["name"], "Guitar (restrung)");
    assert_eq!(updated["originalPrice"], 120.0);
    assert_eq!(updated["sellerId"], product["sellerId"]);
}

/// 보호된 경로는 유효한 토큰이 필요하다
#[tokio::test]
async fn test_protected_routes_require_identity() {
    let app = setup().await;

    let response = app
        .client
        .post(app.url("/api/products"))
        .json(&product_body("Anonymous", 10.0))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"], "Unauthorized !");

    let response = app
        .client
        .delete(app.url("/api/bids/1"))
        .bearer_auth("garbage.token.value")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // 저장소에 없는 사용자의 토큰
    let ghost_token = app.keys.issue(777).unwrap();
    let response = place_bid(&app, &ghost_token, 1, json!(10)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// 판매자 등록 -> 입찰 -> 관리자 삭제 -> 404
#[tokio::test]
async fn test_auction_lifecycle_with_admin_removal() {
    let app = setup().await;
    let (seller, seller_token) = app.user("seller", false).await;
    let (bidder, bidder_token) = app.user("bidder", false).await;
    let (_, admin_token) = app.user("admin", true).await;

    let response = app
        .client
        .post(app.url("/api/products"))
        .bearer_auth(&seller_token)
        .json(&product_body("Vintage watch", 100.0))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let product: Value = response.json().await.unwrap();
    let product_id = product["id"].as_i64().unwrap();
    assert_eq!(product["sellerId"], seller.id);

    let response = place_bid(&app, &bidder_token, product_id, json!(150)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let bid: Value = response.json().await.unwrap();
    info!("입찰 생성: {}", bid);
    assert_eq!(bid["productId"], product_id);
    assert_eq!(bid["bidderId"], bidder.id);
    assert_eq!(bid["price"], 150.0);
    assert!(bid["date"].is_string());
    let bid_id = bid["id"].as_i64().unwrap();

    let response = app
        .client
        .delete(app.url(&format!("/api/products/{}", product_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .client
        .get(app.url(&format!("/api/products/{}", product_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // 입찰도 함께 삭제된다
    let response = app
        .client
        .delete(app.url(&format!("/api/bids/{}", bid_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// 날짜만 있는 마감일과 문자열 가격도 받는다
#[tokio::test]
async fn test_create_product_accepts_loose_field_shapes() {
    let app = setup().await;
    let (_, token) = app.user("seller", false).await;

    let mut body = product_body("Bicycle", 100.0);
    body["originalPrice"] = json!("250");
    body["endDate"] = json!("2030-01-01");
    let response = app
        .client
        .post(app.url("/api/products"))
        .bearer_auth(&token)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let product: Value = response.json().await.unwrap();
    assert_eq!(product["originalPrice"], 250.0);
    assert!(product["endDate"]
        .as_str()
        .unwrap()
        .starts_with("2030-01-01T00:00:00"));

    body["endDate"] = json!("someday");
    let response = app
        .client
        .post(app.url("/api/products"))
        .bearer_auth(&token)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// 크기 제한을 넘는 본문은 413
#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let app = setup_with_body_limit(1024).await;
    let (_, seller_token) = app.user("seller", false).await;
    let product = create_test_product(&app, &seller_token, "Poster").await;
    let product_id = product["id"].as_i64().unwrap();

    let padding = "x".repeat(4096);
    let response = app
        .client
        .post(app.url(&format!("/api/products/{}/bids", product_id)))
        .bearer_auth(&seller_token)
        .json(&json!({ "price": 120, "note": padding }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"], "Payload too large !");
}
