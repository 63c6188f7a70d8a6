// region:    --- Imports
use super::{queries, MarketStore};
use crate::database::DatabaseManager;
use crate::error::AppError;
use crate::model::{
    Bid, BidWithBidder, BidWithProduct, Product, ProductDetail, ProductFields, User, UserProfile,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- Postgres Market Store
/// PostgreSQL 저장소 구현체
pub struct PgMarketStore {
    db_manager: Arc<DatabaseManager>,
}

impl PgMarketStore {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }
}

#[async_trait]
impl MarketStore for PgMarketStore {
    async fn find_user(&self, user_id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(queries::GET_USER)
            .bind(user_id)
            .fetch_optional(&*self.db_manager.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_profile(&self, user_id: i64) -> Result<Option<UserProfile>, AppError> {
        info!("{:<12} --> 사용자 프로필 조회 id: {}", "Store", user_id);
        self.db_manager
            .transaction::<_, _, AppError>(|tx| {
                Box::pin(async move {
                    let Some(user) = sqlx::query_as::<_, User>(queries::GET_USER)
                        .bind(user_id)
                        .fetch_optional(&mut **tx)
                        .await?
                    else {
                        return Ok(None);
                    };

                    let products = sqlx::query_as::<_, Product>(queries::GET_PRODUCTS_BY_SELLER)
                        .bind(user_id)
                        .fetch_all(&mut **tx)
                        .await?;

                    let bids = sqlx::query(queries::GET_BIDS_WITH_PRODUCT_BY_BIDDER)
                        .bind(user_id)
                        .fetch_all(&mut **tx)
                        .await?
                        .iter()
                        .map(bid_with_product_from_row)
                        .collect::<Result<Vec<_>, _>>()?;

                    Ok(Some(UserProfile {
                        user,
                        products,
                        bids,
                    }))
                })
            })
            .await
    }

    async fn list_products(&self) -> Result<Vec<ProductDetail>, AppError> {
        info!("{:<12} --> 모든 상품 조회", "Store");
        self.db_manager
            .transaction::<_, _, AppError>(|tx| {
                Box::pin(async move {
                    let rows = sqlx::query(queries::GET_ALL_PRODUCTS_WITH_SELLER)
                        .fetch_all(&mut **tx)
                        .await?
                        .iter()
                        .map(product_with_seller_from_row)
                        .collect::<Result<Vec<_>, _>>()?;

                    let ids: Vec<i64> = rows.iter().map(|(product, _)| product.id).collect();
                    let bids = fetch_bids_with_bidder(&mut **tx, ids).await?;

                    Ok(ProductDetail::assemble(rows, bids))
                })
            })
            .await
    }

    async fn find_product_detail(
        &self,
        product_id: i64,
    ) -> Result<Option<ProductDetail>, AppError> {
        info!("{:<12} --> 상품 상세 조회 id: {}", "Store", product_id);
        self.db_manager
            .transaction::<_, _, AppError>(|tx| {
                Box::pin(async move {
                    let Some(row) = sqlx::query(queries::GET_PRODUCT_WITH_SELLER)
                        .bind(product_id)
                        .fetch_optional(&mut **tx)
                        .await?
                    else {
                        return Ok(None);
                    };
                    let pair = product_with_seller_from_row(&row)?;

                    let bids = fetch_bids_with_bidder(&mut **tx, vec![product_id]).await?;

                    Ok(ProductDetail::assemble(vec![pair], bids).pop())
                })
            })
            .await
    }

    async fn find_product(&self, product_id: i64) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(queries::GET_PRODUCT)
            .bind(product_id)
            .fetch_optional(&*self.db_manager.pool)
            .await?;
        Ok(product)
    }

    async fn create_product(
        &self,
        seller_id: i64,
        fields: &ProductFields,
    ) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(queries::INSERT_PRODUCT)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(&fields.category)
            .bind(fields.original_price)
            .bind(&fields.picture_url)
            .bind(fields.end_date)
            .bind(seller_id)
            .fetch_one(&*self.db_manager.pool)
            .await?;
        Ok(product)
    }

    async fn update_product(
        &self,
        product_id: i64,
        fields: &ProductFields,
    ) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(queries::UPDATE_PRODUCT)
            .bind(product_id)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(&fields.category)
            .bind(fields.original_price)
            .bind(&fields.picture_url)
            .bind(fields.end_date)
            .fetch_optional(&*self.db_manager.pool)
            .await?;
        Ok(product)
    }

    async fn delete_product(&self, product_id: i64) -> Result<(), AppError> {
        sqlx::query(queries::DELETE_PRODUCT)
            .bind(product_id)
            .execute(&*self.db_manager.pool)
            .await?;
        Ok(())
    }

    async fn find_bid(&self, bid_id: i64) -> Result<Option<BidWithProduct>, AppError> {
        let row = sqlx::query(queries::GET_BID_WITH_PRODUCT)
            .bind(bid_id)
            .fetch_optional(&*self.db_manager.pool)
            .await?;
        Ok(row.as_ref().map(bid_with_product_from_row).transpose()?)
    }

    async fn create_bid(
        &self,
        product_id: i64,
        bidder_id: i64,
        price: f64,
        date: DateTime<Utc>,
    ) -> Result<Bid, AppError> {
        sqlx::query_as::<_, Bid>(queries::INSERT_BID)
            .bind(price)
            .bind(date)
            .bind(product_id)
            .bind(bidder_id)
            .fetch_one(&*self.db_manager.pool)
            .await
            .map_err(|e| {
                // 조회 이후 상품이 삭제된 경우
                let missing_product = matches!(
                    &e,
                    sqlx::Error::Database(db) if db.is_foreign_key_violation()
                );
                if missing_product {
                    AppError::NotFound(crate::product::commands::PRODUCT_NOT_FOUND.to_string())
                } else {
                    AppError::from(e)
                }
            })
    }

    async fn delete_bid(&self, bid_id: i64) -> Result<(), AppError> {
        sqlx::query(queries::DELETE_BID)
            .bind(bid_id)
            .execute(&*self.db_manager.pool)
            .await?;
        Ok(())
    }
}

// endregion: --- Postgres Market Store

// region:    --- Row Mapping
/// 상품들의 입찰 + 입찰자 조회
async fn fetch_bids_with_bidder(
    conn: &mut PgConnection,
    product_ids: Vec<i64>,
) -> Result<Vec<BidWithBidder>, sqlx::Error> {
    if product_ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query(queries::GET_BIDS_WITH_BIDDER_FOR_PRODUCTS)
        .bind(product_ids)
        .fetch_all(&mut *conn)
        .await?
        .iter()
        .map(|row| {
            Ok(BidWithBidder {
                bid: bid_from_row(row, "")?,
                bidder: user_from_row(row, "u_")?,
            })
        })
        .collect()
}

fn product_with_seller_from_row(row: &PgRow) -> Result<(Product, User), sqlx::Error> {
    Ok((product_from_row(row, "")?, user_from_row(row, "s_")?))
}

fn bid_with_product_from_row(row: &PgRow) -> Result<BidWithProduct, sqlx::Error> {
    Ok(BidWithProduct {
        bid: bid_from_row(row, "")?,
        product: product_from_row(row, "p_")?,
    })
}

// 조인 결과는 접두사로 테이블을 구분한다
fn user_from_row(row: &PgRow, prefix: &str) -> Result<User, sqlx::Error> {
    let col = |name: &str| format!("{prefix}{name}");
    Ok(User {
        id: row.try_get(col("id").as_str())?,
        username: row.try_get(col("username").as_str())?,
        email: row.try_get(col("email").as_str())?,
        admin: row.try_get(col("admin").as_str())?,
        created_at: row.try_get(col("created_at").as_str())?,
        updated_at: row.try_get(col("updated_at").as_str())?,
    })
}

fn product_from_row(row: &PgRow, prefix: &str) -> Result<Product, sqlx::Error> {
    let col = |name: &str| format!("{prefix}{name}");
    Ok(Product {
        id: row.try_get(col("id").as_str())?,
        name: row.try_get(col("name").as_str())?,
        description: row.try_get(col("description").as_str())?,
        category: row.try_get(col("category").as_str())?,
        original_price: row.try_get(col("original_price").as_str())?,
        picture_url: row.try_get(col("picture_url").as_str())?,
        end_date: row.try_get(col("end_date").as_str())?,
        seller_id: row.try_get(col("seller_id").as_str())?,
        created_at: row.try_get(col("created_at").as_str())?,
        updated_at: row.try_get(col("updated_at").as_str())?,
    })
}

fn bid_from_row(row: &PgRow, prefix: &str) -> Result<Bid, sqlx::Error> {
    let col = |name: &str| format!("{prefix}{name}");
    Ok(Bid {
        id: row.try_get(col("id").as_str())?,
        price: row.try_get(col("price").as_str())?,
        date: row.try_get(col("date").as_str())?,
        product_id: row.try_get(col("product_id").as_str())?,
        bidder_id: row.try_get(col("bidder_id").as_str())?,
        created_at: row.try_get(col("created_at").as_str())?,
        updated_at: row.try_get(col("updated_at").as_str())?,
    })
}

// endregion: --- Row Mapping
