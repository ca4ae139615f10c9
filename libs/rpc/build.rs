//! Generates the ProductService server and client stubs.
//!
//! Messages are hand-written prost structs in `src/products.rs`, so no `.proto`
//! file or protoc install is needed.

use tonic_build::manual::{Builder, Method, Service};

const CODEC: &str = "tonic::codec::ProstCodec";

fn unary(name: &str, route: &str, input: &str, output: &str) -> Method {
    Method::builder()
        .name(name)
        .route_name(route)
        .input_type(format!("crate::products::{input}"))
        .output_type(format!("crate::products::{output}"))
        .codec_path(CODEC)
        .build()
}

fn main() {
    let service = Service::builder()
        .name("ProductService")
        .package("products.v1")
        .method(unary("create_product", "CreateProduct", "CreateProductRequest", "CreateProductResponse"))
        .method(unary("get_product", "GetProduct", "GetProductRequest", "GetProductResponse"))
        .method(unary("update_product", "UpdateProduct", "UpdateProductRequest", "UpdateProductResponse"))
        .method(unary("delete_product", "DeleteProduct", "DeleteProductRequest", "DeleteProductResponse"))
        .method(unary("list_products", "ListProducts", "ListProductsRequest", "ListProductsResponse"))
        .build();

    Builder::new().compile(&[service]);
}
