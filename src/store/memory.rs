// region:    --- Imports
use super::MarketStore;
use crate::error::AppError;
use crate::model::{
    Bid, BidWithBidder, BidWithProduct, Product, ProductDetail, ProductFields, User, UserProfile,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

// endregion: --- Imports

// region:    --- In-Memory Market Store
#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    products: BTreeMap<i64, Product>,
    bids: BTreeMap<i64, Bid>,
    next_user_id: i64,
    next_product_id: i64,
    next_bid_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn product_detail(&self, product: &Product) -> Result<ProductDetail, AppError> {
        let seller = self.user(product.seller_id)?;
        let bids = self
            .bids
            .values()
            .filter(|bid| bid.product_id == product.id)
            .map(|bid| {
                Ok(BidWithBidder {
                    bid: bid.clone(),
                    bidder: self.user(bid.bidder_id)?,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;
        Ok(ProductDetail {
            product: product.clone(),
            seller,
            bids,
        })
    }

    fn bid_with_product(&self, bid: &Bid) -> Result<BidWithProduct, AppError> {
        let product = self.products.get(&bid.product_id).cloned().ok_or_else(|| {
            AppError::Internal(format!("bid {} references missing product", bid.id))
        })?;
        Ok(BidWithProduct {
            bid: bid.clone(),
            product,
        })
    }

    // 외래 키가 깨진 경우는 저장소 오류로 본다
    fn user(&self, user_id: i64) -> Result<User, AppError> {
        self.users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("missing user {}", user_id)))
    }
}

/// 메모리 저장소 구현체 (테스트, 로컬 개발용)
/// 외래 키와 상품 삭제 시 입찰 연쇄 삭제를 PostgreSQL 스키마와 같게 흉내낸다.
#[derive(Default)]
pub struct InMemoryMarketStore {
    tables: RwLock<Tables>,
}

impl InMemoryMarketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 사용자 등록 (가입 기능은 이 서비스 밖에 있다)
    pub async fn insert_user(&self, username: &str, email: &str, admin: bool) -> User {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let user = User {
            id: Tables::next_id(&mut tables.next_user_id),
            username: username.to_string(),
            email: email.to_string(),
            admin,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        user
    }
}

#[async_trait]
impl MarketStore for InMemoryMarketStore {
    async fn find_user(&self, user_id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(&user_id).cloned())
    }

    async fn find_user_profile(&self, user_id: i64) -> Result<Option<UserProfile>, AppError> {
        let tables = self.tables.read().await;
        let Some(user) = tables.users.get(&user_id).cloned() else {
            return Ok(None);
        };
        let products = tables
            .products
            .values()
            .filter(|product| product.seller_id == user_id)
            .cloned()
            .collect();
        let bids = tables
            .bids
            .values()
            .filter(|bid| bid.bidder_id == user_id)
            .map(|bid| tables.bid_with_product(bid))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(UserProfile {
            user,
            products,
            bids,
        }))
    }

    async fn list_products(&self) -> Result<Vec<ProductDetail>, AppError> {
        let tables = self.tables.read().await;
        tables
            .products
            .values()
            .map(|product| tables.product_detail(product))
            .collect()
    }

    async fn find_product_detail(
        &self,
        product_id: i64,
    ) -> Result<Option<ProductDetail>, AppError> {
        let tables = self.tables.read().await;
        tables
            .products
            .get(&product_id)
            .map(|product| tables.product_detail(product))
            .transpose()
    }

    async fn find_product(&self, product_id: i64) -> Result<Option<Product>, AppError> {
        Ok(self.tables.read().await.products.get(&product_id).cloned())
    }

    async fn create_product(
        &self,
        seller_id: i64,
        fields: &ProductFields,
    ) -> Result<Product, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&seller_id) {
            return Err(AppError::Internal(format!("missing seller {}", seller_id)));
        }
        let now = Utc::now();
        let product = Product {
            id: Tables::next_id(&mut tables.next_product_id),
            name: fields.name.clone(),
            description: fields.description.clone(),
            category: fields.category.clone(),
            original_price: fields.original_price,
            picture_url: fields.picture_url.clone(),
            end_date: fields.end_date,
            seller_id,
            created_at: now,
            updated_at: now,
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        product_id: i64,
        fields: &ProductFields,
    ) -> Result<Option<Product>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(product) = tables.products.get_mut(&product_id) else {
            return Ok(None);
        };
        product.name = fields.name.clone();
        product.description = fields.description.clone();
        product.category = fields.category.clone();
        product.original_price = fields.original_price;
        product.picture_url = fields.picture_url.clone();
        product.end_date = fields.end_date;
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, product_id: i64) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if tables.products.remove(&product_id).is_some() {
            tables.bids.retain(|_, bid| bid.product_id != product_id);
        }
        Ok(())
    }

    async fn find_bid(&self, bid_id: i64) -> Result<Option<BidWithProduct>, AppError> {
        let tables = self.tables.read().await;
        tables
            .bids
            .get(&bid_id)
            .map(|bid| tables.bid_with_product(bid))
            .transpose()
    }

    async fn create_bid(
        &self,
        product_id: i64,
        bidder_id: i64,
        price: f64,
        date: DateTime<Utc>,
    ) -> Result<Bid, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&product_id) {
            return Err(AppError::NotFound(
                crate::product::commands::PRODUCT_NOT_FOUND.to_string(),
            ));
        }
        if !tables.users.contains_key(&bidder_id) {
            return Err(AppError::Internal(format!("missing bidder {}", bidder_id)));
        }
        let bid = Bid {
            id: Tables::next_id(&mut tables.next_bid_id),
            price,
            date,
            product_id,
            bidder_id,
            created_at: date,
            updated_at: date,
        };
        tables.bids.insert(bid.id, bid.clone());
        Ok(bid)
    }

    async fn delete_bid(&self, bid_id: i64) -> Result<(), AppError> {
        self.tables.write().await.bids.remove(&bid_id);
        Ok(())
    }
}

// endregion: --- In-Memory Market Store

// endregion: --- Tests
