use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Shelf-life class of a product
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProductState {
    #[default]
    Unspecified,
    Perishable,
    NonPerishable,
}

/// Availability of a product
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Unspecified,
    InStock,
    OutOfStock,
    Discontinued,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClothingVariant {
    pub size: String,
    pub color: String,
    pub material: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ElectronicsVariant {
    pub brand: String,
    pub model: String,
    pub warranty_months: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FoodVariant {
    pub ingredients: String,
    pub calories: i32,
    pub is_vegetarian: bool,
}

/// Category-specific payload. Exactly one shape, or none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductVariant {
    #[default]
    None,
    Clothing(ClothingVariant),
    Electronics(ElectronicsVariant),
    Food(FoodVariant),
}

impl ProductVariant {
    pub fn is_none(&self) -> bool {
        matches!(self, ProductVariant::None)
    }
}

/// A catalog entry as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub tags: Vec<String>,
    pub state: ProductState,
    pub status: ProductStatus,
    pub variant: ProductVariant,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Every caller-settable field. Used whole for create and for update, which
/// replaces all of them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub tags: Vec<String>,
    pub state: ProductState,
    pub status: ProductStatus,
    pub variant: ProductVariant,
}

/// Parameters for one page of a listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListProducts {
    /// `<= 0` selects the configured default
    pub page_size: i32,
    /// Empty starts from the beginning
    pub page_token: String,
    /// Case-insensitive substring of `name`; blank means no filter
    pub search_term: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Empty when this is the last page
    pub next_page_token: String,
}
