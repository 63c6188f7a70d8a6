use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// 사용자 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 상품 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub original_price: f64,
    pub picture_url: String,
    pub end_date: DateTime<Utc>,
    pub seller_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 입찰 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: i64,
    pub price: f64,
    pub date: DateTime<Utc>,
    pub product_id: i64,
    pub bidder_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 검증을 통과한 상품 필드 (생성/전체 수정 공용)
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub category: String,
    pub original_price: f64,
    pub picture_url: String,
    pub end_date: DateTime<Utc>,
}

// region:    --- Nested Views
/// 입찰 + 입찰자
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidWithBidder {
    #[serde(flatten)]
    pub bid: Bid,
    pub bidder: User,
}

/// 입찰 + 대상 상품
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidWithProduct {
    #[serde(flatten)]
    pub bid: Bid,
    pub product: Product,
}

/// 상품 + 판매자 + 입찰 목록
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub seller: User,
    pub bids: Vec<BidWithBidder>,
}

/// 사용자 + 등록 상품 + 입찰 목록
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub products: Vec<Product>,
    pub bids: Vec<BidWithProduct>,
}

impl ProductDetail {
    /// 상품/판매자 목록에 입찰 목록을 상품 id 기준으로 붙인다
    pub fn assemble(rows: Vec<(Product, User)>, bids: Vec<BidWithBidder>) -> Vec<ProductDetail> {
        let mut details: Vec<ProductDetail> = rows
            .into_iter()
            .map(|(product, seller)| ProductDetail {
                product,
                seller,
                bids: Vec::new(),
            })
            .collect();
        let index: HashMap<i64, usize> = details
            .iter()
            .enumerate()
            .map(|(pos, detail)| (detail.product.id, pos))
            .collect();
        for bid in bids {
            if let Some(&pos) = index.get(&bid.bid.product_id) {
                details[pos].bids.push(bid);
            }
        }
        details
    }
}

// endregion: --- Nested Views

// region:    --- Lenient Fields
/// 요청 본문의 느슨한 필드 해석
/// 해석할 수 없는 값은 빠진 값(None)으로 보고 검증 단계에서 걸러낸다.
pub mod lenient {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// 숫자 또는 숫자 문자열 ("150")
    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        })
    }

    /// RFC 3339 일시 또는 날짜만 있는 값 ("2030-01-01", UTC 자정)
    pub fn date_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => parse_date_time(s.trim()),
            _ => None,
        })
    }

    fn parse_date_time(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| Utc.from_utc_datetime(&midnight))
    }
}

// endregion: --- Lenient Fields

// endregion: --- Tests
