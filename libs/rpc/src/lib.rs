//! Wire types for the product catalog service.

pub mod products;
