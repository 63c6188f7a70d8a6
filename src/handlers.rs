// region:    --- Imports
use crate::auth::{AuthUser, TokenKeys};
use crate::bidding::commands as bid_commands;
use crate::bidding::model::PlaceBidCommand;
use crate::error::AppError;
use crate::product::commands as product_commands;
use crate::product::commands::PRODUCT_NOT_FOUND;
use crate::product::model::ProductPayload;
use crate::query;
use crate::store::MarketStore;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, FromRef, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- App State
/// 요청 간 공유 상태 (저장소 핸들, 토큰 키)
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MarketStore>,
    pub keys: TokenKeys,
}

impl FromRef<AppState> for Arc<dyn MarketStore> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.store)
    }
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

/// 라우터 설정
pub fn app(state: AppState, body_limit_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/products",
            get(handle_get_products).post(handle_create_product),
        )
        .route(
            "/api/products/:id",
            get(handle_get_product)
                .put(handle_update_product)
                .delete(handle_delete_product),
        )
        .route("/api/products/:id/bids", post(handle_create_bid))
        .route("/api/bids/:id", delete(handle_delete_bid))
        .route("/api/users/:id", get(handle_get_user))
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .with_state(state)
}

// endregion: --- App State

// region:    --- Command Handlers

/// 상품 등록
pub async fn handle_create_product(
    State(state): State<AppState>,
    caller: AuthUser,
    body: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = read_body(body)?;
    let product =
        product_commands::handle_create_product(state.store.as_ref(), caller, payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// 상품 수정
pub async fn handle_update_product(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let product_id = parse_id(&id, PRODUCT_NOT_FOUND)?;
    let payload = read_body(body)?;
    let product =
        product_commands::handle_update_product(state.store.as_ref(), caller, product_id, payload)
            .await?;
    Ok((StatusCode::OK, Json(product)))
}

/// 상품 삭제
pub async fn handle_delete_product(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let product_id = parse_id(&id, PRODUCT_NOT_FOUND)?;
    product_commands::handle_delete_product(state.store.as_ref(), caller, product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 입찰
pub async fn handle_create_bid(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<PlaceBidCommand>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let product_id = parse_id(&id, PRODUCT_NOT_FOUND)?;
    let cmd = read_body(body)?;
    let bid = bid_commands::handle_place_bid(state.store.as_ref(), caller, product_id, cmd).await?;
    Ok((StatusCode::CREATED, Json(bid)))
}

/// 입찰 삭제
pub async fn handle_delete_bid(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let bid_id = parse_id(&id, bid_commands::BID_NOT_FOUND)?;
    bid_commands::handle_delete_bid(state.store.as_ref(), caller, bid_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 모든 상품 조회
pub async fn handle_get_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    info!("{:<12} --> 모든 상품 조회", "HandlerQuery");
    let products = query::handlers::get_all_products(state.store.as_ref()).await?;
    Ok(Json(products))
}

/// 상품 조회
pub async fn handle_get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    info!("{:<12} --> 상품 조회 id: {}", "HandlerQuery", id);
    let product_id = parse_id(&id, PRODUCT_NOT_FOUND)?;
    let product = query::handlers::get_product(state.store.as_ref(), product_id).await?;
    Ok(Json(product))
}

/// 사용자 조회
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    info!("{:<12} --> 사용자 조회 id: {}", "HandlerQuery", id);
    let user_id = parse_id(&id, query::handlers::USER_NOT_FOUND)?;
    let user = query::handlers::get_user(state.store.as_ref(), user_id).await?;
    Ok(Json(user))
}

// endregion: --- Query Handlers

// region:    --- Helpers

/// 정수가 아닌 id 는 어떤 엔티티도 가리킬 수 없다
fn parse_id(raw: &str, not_found: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::NotFound(not_found.to_string()))
}

/// 읽을 수 없는 본문은 빈 요청으로 보고 검증 단계에서 걸러낸다
/// 크기 제한 초과는 그대로 413 으로 돌려준다.
fn read_body<T: Default>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            warn!("{:<12} --> 요청 본문 크기 초과: {}", "Handler", rejection);
            Err(AppError::PayloadTooLarge)
        }
        Err(rejection) => {
            warn!("{:<12} --> 요청 본문 파싱 실패: {}", "Handler", rejection);
            Ok(T::default())
        }
    }
}

// endregion: --- Helpers
