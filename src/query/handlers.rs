// region:    --- Imports
use crate::error::AppError;
use crate::model::{ProductDetail, UserProfile};
use crate::product::commands::PRODUCT_NOT_FOUND;
use crate::store::MarketStore;
use tracing::info;

// endregion: --- Imports

pub const USER_NOT_FOUND: &str = "User not found !";

// region:    --- Query Handlers

/// 모든 상품 조회 (판매자, 입찰 + 입찰자 포함)
pub async fn get_all_products(store: &dyn MarketStore) -> Result<Vec<ProductDetail>, AppError> {
    info!("{:<12} --> 모든 상품 조회", "Query");
    store.list_products().await
}

/// 상품 조회
pub async fn get_product(
    store: &dyn MarketStore,
    product_id: i64,
) -> Result<ProductDetail, AppError> {
    info!("{:<12} --> 상품 조회 id: {}", "Query", product_id);
    store
        .find_product_detail(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))
}

/// 사용자 프로필 조회
/// 인가 없이 누구나 조회할 수 있다.
pub async fn get_user(store: &dyn MarketStore, user_id: i64) -> Result<UserProfile, AppError> {
    info!("{:<12} --> 사용자 조회 id: {}", "Query", user_id);
    store
        .find_user_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))
}

// endregion: --- Query Handlers

// endregion: --- Tests
