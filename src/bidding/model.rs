use crate::error::AppError;
use crate::model::{lenient, Bid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 입찰 요청 본문
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PlaceBidCommand {
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: Option<f64>,
}

impl PlaceBidCommand {
    pub const FIELDS: &'static [&'static str] = &["price"];

    /// 가격이 있고 0보다 커야 한다
    pub fn validate(&self) -> Result<f64, AppError> {
        match self.price {
            Some(price) if price > 0.0 => Ok(price),
            _ => Err(AppError::validation(Self::FIELDS)),
        }
    }
}

/// 입찰 생성 응답
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidCreated {
    pub id: i64,
    pub product_id: i64,
    pub price: f64,
    pub date: DateTime<Utc>,
    pub bidder_id: i64,
}

impl From<Bid> for BidCreated {
    fn from(bid: Bid) -> Self {
        Self {
            id: bid.id,
            product_id: bid.product_id,
            price: bid.price,
            date: bid.created_at,
            bidder_id: bid.bidder_id,
        }
    }
}
