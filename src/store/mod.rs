// region:    --- Imports
use crate::error::AppError;
use crate::model::{Bid, BidWithProduct, Product, ProductDetail, ProductFields, User, UserProfile};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

// endregion: --- Imports

// region:    --- Modules
pub mod memory;
pub mod postgres;
pub mod queries;

pub use memory::InMemoryMarketStore;
pub use postgres::PgMarketStore;

// endregion: --- Modules

// region:    --- Market Store Trait
/// 영속 저장소 트레이트
/// 요청마다 새로 조회하며, 연관 엔티티는 조회 시점에 함께 로드한다.
#[async_trait]
pub trait MarketStore: Send + Sync {
    async fn find_user(&self, user_id: i64) -> Result<Option<User>, AppError>;

    /// 사용자 + 등록 상품 + 입찰(상품 포함)
    async fn find_user_profile(&self, user_id: i64) -> Result<Option<UserProfile>, AppError>;

    /// 전체 상품 (판매자, 입찰 + 입찰자 포함)
    async fn list_products(&self) -> Result<Vec<ProductDetail>, AppError>;

    async fn find_product_detail(&self, product_id: i64)
        -> Result<Option<ProductDetail>, AppError>;

    async fn find_product(&self, product_id: i64) -> Result<Option<Product>, AppError>;

    async fn create_product(
        &self,
        seller_id: i64,
        fields: &ProductFields,
    ) -> Result<Product, AppError>;

    /// 여섯 필드 전체 교체, 대상이 없으면 None
    async fn update_product(
        &self,
        product_id: i64,
        fields: &ProductFields,
    ) -> Result<Option<Product>, AppError>;

    /// 입찰은 저장소 수준에서 함께 삭제된다
    async fn delete_product(&self, product_id: i64) -> Result<(), AppError>;

    async fn find_bid(&self, bid_id: i64) -> Result<Option<BidWithProduct>, AppError>;

    async fn create_bid(
        &self,
        product_id: i64,
        bidder_id: i64,
        price: f64,
        date: DateTime<Utc>,
    ) -> Result<Bid, AppError>;

    async fn delete_bid(&self, bid_id: i64) -> Result<(), AppError>;
}

// endregion: --- Market Store Trait
