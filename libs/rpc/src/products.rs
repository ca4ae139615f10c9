//! `products.v1` messages and the generated `ProductService` stubs.
//!
//! Every message carrying a variation uses the same `oneof` tags
//! (9 clothing, 10 electronics, 11 food).

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ProductState {
    Unspecified = 0,
    Perishable = 1,
    NonPerishable = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ProductStatus {
    Unspecified = 0,
    InStock = 1,
    OutOfStock = 2,
    Discontinued = 3,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ClothingVariation {
    #[prost(string, tag = "1")]
    pub size: String,
    #[prost(string, tag = "2")]
    pub color: String,
    #[prost(string, tag = "3")]
    pub material: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ElectronicsVariation {
    #[prost(string, tag = "1")]
    pub brand: String,
    #[prost(string, tag = "2")]
    pub model: String,
    #[prost(uint32, tag = "3")]
    pub warranty_months: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct FoodVariation {
    #[prost(string, tag = "1")]
    pub ingredients: String,
    #[prost(int32, tag = "2")]
    pub calories: i32,
    #[prost(bool, tag = "3")]
    pub is_vegetarian: bool,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum Variation {
    #[prost(message, tag = "9")]
    Clothing(ClothingVariation),
    #[prost(message, tag = "10")]
    Electronics(ElectronicsVariation),
    #[prost(message, tag = "11")]
    Food(FoodVariation),
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Product {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(double, tag = "4")]
    pub price: f64,
    #[prost(string, tag = "5")]
    pub category: String,
    #[prost(string, repeated, tag = "6")]
    pub tags: Vec<String>,
    #[prost(enumeration = "ProductState", tag = "7")]
    pub product_state: i32,
    #[prost(enumeration = "ProductStatus", tag = "8")]
    pub product_status: i32,
    #[prost(oneof = "Variation", tags = "9, 10, 11")]
    pub variation: Option<Variation>,
    #[prost(message, optional, tag = "12")]
    pub created_at: Option<prost_types::Timestamp>,
    #[prost(message, optional, tag = "13")]
    pub updated_at: Option<prost_types::Timestamp>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateProductRequest {
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(double, tag = "4")]
    pub price: f64,
    #[prost(string, tag = "5")]
    pub category: String,
    #[prost(string, repeated, tag = "6")]
    pub tags: Vec<String>,
    #[prost(enumeration = "ProductState", tag = "7")]
    pub product_state: i32,
    #[prost(enumeration = "ProductStatus", tag = "8")]
    pub product_status: i32,
    #[prost(oneof = "Variation", tags = "9, 10, 11")]
    pub variation: Option<Variation>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateProductResponse {
    #[prost(message, optional, tag = "1")]
    pub product: Option<Product>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetProductRequest {
    #[prost(uint64, tag = "1")]
    pub id: u64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetProductResponse {
    #[prost(message, optional, tag = "1")]
    pub product: Option<Product>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateProductRequest {
    #[prost(uint64, tag = "1")]
    pub id: u64,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(double, tag = "4")]
    pub price: f64,
    #[prost(string, tag = "5")]
    pub category: String,
    #[prost(string, repeated, tag = "6")]
    pub tags: Vec<String>,
    #[prost(enumeration = "ProductState", tag = "7")]
    pub product_state: i32,
    #[prost(enumeration = "ProductStatus", tag = "8")]
    pub product_status: i32,
    #[prost(oneof = "Variation", tags = "9, 10, 11")]
    pub variation: Option<Variation>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateProductResponse {
    #[prost(message, optional, tag = "1")]
    pub product: Option<Product>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteProductRequest {
    #[prost(uint64, tag = "1")]
    pub product_id: u64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteProductResponse {
    #[prost(bool, tag = "1")]
    pub deleted: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ListProductsRequest {
    #[prost(int32, tag = "1")]
    pub page_size: i32,
    #[prost(string, tag = "2")]
    pub page_token: String,
    #[prost(string, tag = "3")]
    pub search_term: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ListProductsResponse {
    #[prost(message, repeated, tag = "1")]
    pub products: Vec<Product>,
    #[prost(string, tag = "2")]
    pub next_page_token: String,
}

include!(concat!(env!("OUT_DIR"), "/products.v1.ProductService.rs"));
