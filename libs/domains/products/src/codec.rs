//! Storage format for the `variation` column.
//!
//! A variant is written as a JSON object with a `kind` discriminant next to the
//! shape's own fields:
//!
//! ```text
//! {"kind":"food","ingredients":"Cheese, Bread","calories":250,"is_vegetarian":true}
//! ```
//!
//! `ProductVariant::None` is stored as SQL NULL. Reads are tolerant: the
//! discriminant is matched case-insensitively, a missing one falls back to the
//! row's category, and an unknown one decodes to `ProductVariant::None`.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::{ClothingVariant, ElectronicsVariant, FoodVariant, ProductVariant};

const KIND_FIELD: &str = "kind";

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("variation payload is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("variation payload must be a JSON object")]
    NotAnObject,

    #[error("variation '{kind}' has invalid fields: {source}")]
    InvalidShape {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode variation: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Encodes and decodes [`ProductVariant`] for the single storage column.
pub struct VariantCodec;

impl VariantCodec {
    /// `Ok(None)` means "store NULL".
    pub fn encode(variant: &ProductVariant) -> Result<Option<Vec<u8>>, CodecError> {
        if variant.is_none() {
            return Ok(None);
        }
        serde_json::to_vec(variant).map(Some).map_err(CodecError::Encode)
    }

    /// Rebuild the variant from stored bytes. `category_hint` is the row's
    /// category and only matters when the payload has no discriminant.
    pub fn decode(bytes: &[u8], category_hint: &str) -> Result<ProductVariant, CodecError> {
        if bytes.is_empty() {
            return Ok(ProductVariant::None);
        }

        let mut fields = match serde_json::from_slice(bytes).map_err(CodecError::Malformed)? {
            Value::Object(fields) => fields,
            Value::Null => return Ok(ProductVariant::None),
            _ => return Err(CodecError::NotAnObject),
        };

        let kind = match fields.remove(KIND_FIELD) {
            Some(Value::String(kind)) => kind.trim().to_ascii_lowercase(),
            Some(other) => {
                debug!(discriminant = %other, "Non-string variation kind, treating as unset");
                return Ok(ProductVariant::None);
            }
            None => category_hint.trim().to_ascii_lowercase(),
        };
        let body = Value::Object(fields);

        match kind.as_str() {
            "clothing" => shape::<ClothingVariant>(body, "clothing").map(ProductVariant::Clothing),
            "electronics" => {
                shape::<ElectronicsVariant>(body, "electronics").map(ProductVariant::Electronics)
            }
            "food" => shape::<FoodVariant>(body, "food").map(ProductVariant::Food),
            other => {
                debug!(kind = other, "Unknown variation kind, treating as unset");
                Ok(ProductVariant::None)
            }
        }
    }

    /// Convenience for nullable columns.
    pub fn decode_column(
        bytes: Option<&[u8]>,
        category_hint: &str,
    ) -> Result<ProductVariant, CodecError> {
        match bytes {
            Some(bytes) => Self::decode(bytes, category_hint),
            None => Ok(ProductVariant::None),
        }
    }
}

fn shape<T: DeserializeOwned>(body: Value, kind: &'static str) -> Result<T, CodecError> {
    serde_json::from_value(body).map_err(|source| CodecError::InvalidShape { kind, source })
}
