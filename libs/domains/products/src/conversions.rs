//! Product proto ↔ domain conversions
//!
//! Enum values outside the proto definition are rejected as invalid
//! arguments. Timestamps go through `grpc_client::conversions`.

use rpc::products as pb;

use crate::error::ProductError;
use crate::models::{
    ClothingVariant, ElectronicsVariant, FoodVariant, ListProducts, Product, ProductInput,
    ProductPage, ProductState, ProductStatus, ProductVariant,
};

pub use grpc_client::conversions::*;

// ============================================================================
// Enum Conversions
// ============================================================================

impl From<ProductState> for i32 {
    fn from(state: ProductState) -> Self {
        match state {
            ProductState::Unspecified => pb::ProductState::Unspecified as i32,
            ProductState::Perishable => pb::ProductState::Perishable as i32,
            ProductState::NonPerishable => pb::ProductState::NonPerishable as i32,
        }
    }
}

impl TryFrom<i32> for ProductState {
    type Error = ProductError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match pb::ProductState::try_from(value) {
            Ok(pb::ProductState::Unspecified) => Ok(ProductState::Unspecified),
            Ok(pb::ProductState::Perishable) => Ok(ProductState::Perishable),
            Ok(pb::ProductState::NonPerishable) => Ok(ProductState::NonPerishable),
            Err(_) => Err(ProductError::invalid(format!("invalid product state: {value}"))),
        }
    }
}

impl From<ProductStatus> for i32 {
    fn from(status: ProductStatus) -> Self {
        match status {
            ProductStatus::Unspecified => pb::ProductStatus::Unspecified as i32,
            ProductStatus::InStock => pb::ProductStatus::InStock as i32,
            ProductStatus::OutOfStock => pb::ProductStatus::OutOfStock as i32,
            ProductStatus::Discontinued => pb::ProductStatus::Discontinued as i32,
        }
    }
}

impl TryFrom<i32> for ProductStatus {
    type Error = ProductError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match pb::ProductStatus::try_from(value) {
            Ok(pb::ProductStatus::Unspecified) => Ok(ProductStatus::Unspecified),
            Ok(pb::ProductStatus::InStock) => Ok(ProductStatus::InStock),
            Ok(pb::ProductStatus::OutOfStock) => Ok(ProductStatus::OutOfStock),
            Ok(pb::ProductStatus::Discontinued) => Ok(ProductStatus::Discontinued),
            Err(_) => Err(ProductError::invalid(format!("invalid product status: {value}"))),
        }
    }
}

// ============================================================================
// Variation Conversions
// ============================================================================

impl From<Option<pb::Variation>> for ProductVariant {
    fn from(variation: Option<pb::Variation>) -> Self {
        match variation {
            None => ProductVariant::None,
            Some(pb::Variation::Clothing(v)) => ProductVariant::Clothing(ClothingVariant {
                size: v.size,
                color: v.color,
                material: v.material,
            }),
            Some(pb::Variation::Electronics(v)) => ProductVariant::Electronics(ElectronicsVariant {
                brand: v.brand,
                model: v.model,
                warranty_months: v.warranty_months,
            }),
            Some(pb::Variation::Food(v)) => ProductVariant::Food(FoodVariant {
                ingredients: v.ingredients,
                calories: v.calories,
                is_vegetarian: v.is_vegetarian,
            }),
        }
    }
}

impl From<ProductVariant> for Option<pb::Variation> {
    fn from(variant: ProductVariant) -> Self {
        match variant {
            ProductVariant::None => None,
            ProductVariant::Clothing(v) => Some(pb::Variation::Clothing(pb::ClothingVariation {
                size: v.size,
                color: v.color,
                material: v.material,
            })),
            ProductVariant::Electronics(v) => {
                Some(pb::Variation::Electronics(pb::ElectronicsVariation {
                    brand: v.brand,
                    model: v.model,
                    warranty_months: v.warranty_months,
                }))
            }
            ProductVariant::Food(v) => Some(pb::Variation::Food(pb::FoodVariation {
                ingredients: v.ingredients,
                calories: v.calories,
                is_vegetarian: v.is_vegetarian,
            })),
        }
    }
}

// ============================================================================
// Message Conversions
// ============================================================================

impl From<Product> for pb::Product {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            category: product.category,
            tags: product.tags,
            product_state: product.state.into(),
            product_status: product.status.into(),
            variation: product.variant.into(),
            created_at: Some(datetime_to_timestamp(product.created_at)),
            updated_at: Some(datetime_to_timestamp(product.updated_at)),
        }
    }
}

impl TryFrom<pb::CreateProductRequest> for ProductInput {
    type Error = ProductError;

    fn try_from(req: pb::CreateProductRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: req.name,
            description: req.description,
            price: req.price,
            category: req.category,
            tags: req.tags,
            state: req.product_state.try_into()?,
            status: req.product_status.try_into()?,
            variant: req.variation.into(),
        })
    }
}

/// Splits an update request into the target id and its replacement fields.
pub fn update_from_proto(req: pb::UpdateProductRequest) -> Result<(u64, ProductInput), ProductError> {
    let input = ProductInput {
        name: req.name,
        description: req.description,
        price: req.price,
        category: req.category,
        tags: req.tags,
        state: req.product_state.try_into()?,
        status: req.product_status.try_into()?,
        variant: req.variation.into(),
    };
    Ok((req.id, input))
}

impl From<pb::ListProductsRequest> for ListProducts {
    fn from(req: pb::ListProductsRequest) -> Self {
        Self {
            page_size: req.page_size,
            page_token: req.page_token,
            search_term: Some(req.search_term).filter(|term| !term.trim().is_empty()),
        }
    }
}

impl From<ProductPage> for pb::ListProductsResponse {
    fn from(page: ProductPage) -> Self {
        Self {
            products: page.products.into_iter().map(Into::into).collect(),
            next_page_token: page.next_page_token,
        }
    }
}
