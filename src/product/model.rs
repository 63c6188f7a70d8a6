use crate::error::AppError;
use crate::model::{lenient, ProductFields};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 상품 등록/수정 요청 본문
/// 필드가 빠지거나 비어 있으면 검증에서 걸러낸다.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub original_price: Option<f64>,
    pub picture_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::date_time")]
    pub end_date: Option<DateTime<Utc>>,
}

impl ProductPayload {
    pub const FIELDS: &'static [&'static str] = &[
        "name",
        "description",
        "category",
        "originalPrice",
        "pictureUrl",
        "endDate",
    ];

    /// 여섯 필드가 모두 있어야 한다.
    /// 어느 필드가 빠졌든 오류에는 전체 목록을 담는다.
    pub fn validate(self) -> Result<ProductFields, AppError> {
        let invalid = || AppError::validation(Self::FIELDS);
        Ok(ProductFields {
            name: non_blank(self.name).ok_or_else(invalid)?,
            description: non_blank(self.description).ok_or_else(invalid)?,
            category: non_blank(self.category).ok_or_else(invalid)?,
            original_price: self
                .original_price
                .filter(|price| *price > 0.0)
                .ok_or_else(invalid)?,
            picture_url: non_blank(self.picture_url).ok_or_else(invalid)?,
            end_date: self.end_date.ok_or_else(invalid)?,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
