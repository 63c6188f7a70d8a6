/// 상품 관련 커맨드 처리
/// 1. 등록
/// 2. 전체 수정
/// 3. 삭제
// region:    --- Imports
use super::model::ProductPayload;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::model::Product;
use crate::store::MarketStore;
use tracing::info;

// endregion: --- Imports

pub const PRODUCT_NOT_FOUND: &str = "Product not found !";
pub const PRODUCT_UPDATE_FORBIDDEN: &str = "User not allowed to update this product !";
pub const PRODUCT_DELETE_FORBIDDEN: &str = "User not allowed to delete this product !";

// region:    --- Commands
/// 1. 상품 등록 (판매자 = 요청자)
pub async fn handle_create_product(
    store: &dyn MarketStore,
    caller: AuthUser,
    payload: ProductPayload,
) -> Result<Product, AppError> {
    info!("{:<12} --> 상품 등록 요청 seller: {}", "Command", caller.id);
    let fields = payload.validate()?;
    let product = store.create_product(caller.id, &fields).await?;
    info!("{:<12} --> 상품 등록 완료 id: {}", "Command", product.id);
    Ok(product)
}

/// 2. 상품 전체 수정
/// 조회 -> 권한 -> 검증 순서. 부분 수정은 지원하지 않는다.
pub async fn handle_update_product(
    store: &dyn MarketStore,
    caller: AuthUser,
    product_id: i64,
    payload: ProductPayload,
) -> Result<Product, AppError> {
    info!(
        "{:<12} --> 상품 수정 요청 id: {}, user: {}",
        "Command", product_id, caller.id
    );
    let product = find_existing(store, product_id).await?;
    caller.ensure_can_modify(product.seller_id, PRODUCT_UPDATE_FORBIDDEN)?;

    let fields = payload.validate()?;
    store
        .update_product(product_id, &fields)
        .await?
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))
}

/// 3. 상품 삭제 (입찰은 저장소에서 함께 삭제)
pub async fn handle_delete_product(
    store: &dyn MarketStore,
    caller: AuthUser,
    product_id: i64,
) -> Result<(), AppError> {
    info!(
        "{:<12} --> 상품 삭제 요청 id: {}, user: {}",
        "Command", product_id, caller.id
    );
    let product = find_existing(store, product_id).await?;
    caller.ensure_can_modify(product.seller_id, PRODUCT_DELETE_FORBIDDEN)?;

    store.delete_product(product_id).await?;
    info!("{:<12} --> 상품 삭제 완료 id: {}", "Command", product_id);
    Ok(())
}

async fn find_existing(store: &dyn MarketStore, product_id: i64) -> Result<Product, AppError> {
    store
        .find_product(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))
}

// endregion: --- Commands

// endregion: --- Tests
