/// 입찰 관련 커맨드 처리
/// 1. 입찰
/// 2. 입찰 삭제
// region:    --- Imports
use super::model::{BidCreated, PlaceBidCommand};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::product::commands::PRODUCT_NOT_FOUND;
use crate::store::MarketStore;
use chrono::Utc;
use tracing::info;

// endregion: --- Imports

pub const BID_NOT_FOUND: &str = "Bid not found !";
pub const BID_FORBIDDEN: &str = "User not allowed to delete this bid !";

// region:    --- Commands
/// 1. 입찰
/// 상품 조회 -> 가격 검증 순서. 판매자 본인의 입찰도 허용한다.
pub async fn handle_place_bid(
    store: &dyn MarketStore,
    caller: AuthUser,
    product_id: i64,
    cmd: PlaceBidCommand,
) -> Result<BidCreated, AppError> {
    info!(
        "{:<12} --> 입찰 요청 처리 시작: product={}, bidder={}, {:?}",
        "Command", product_id, caller.id, cmd
    );
    if store.find_product(product_id).await?.is_none() {
        return Err(AppError::NotFound(PRODUCT_NOT_FOUND.to_string()));
    }

    let price = cmd.validate()?;

    let bid = store
        .create_bid(product_id, caller.id, price, Utc::now())
        .await?;
    info!("{:<12} --> 입찰 성공 id: {}", "Command", bid.id);

    Ok(BidCreated::from(bid))
}

/// 2. 입찰 삭제 (입찰자 또는 관리자)
pub async fn handle_delete_bid(
    store: &dyn MarketStore,
    caller: AuthUser,
    bid_id: i64,
) -> Result<(), AppError> {
    info!(
        "{:<12} --> 입찰 삭제 요청 id: {}, user: {}",
        "Command", bid_id, caller.id
    );
    let found = store
        .find_bid(bid_id)
        .await?
        .ok_or_else(|| AppError::NotFound(BID_NOT_FOUND.to_string()))?;

    caller.ensure_can_modify(found.bid.bidder_id, BID_FORBIDDEN)?;

    store.delete_bid(bid_id).await?;
    info!("{:<12} --> 입찰 삭제 완료 id: {}", "Command", bid_id);
    Ok(())
}

// endregion: --- Commands

// endregion: --- Tests
