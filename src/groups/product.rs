//! Catalog browsing, search and ratings.

use crate::groups::delegated;
use crate::routing::{RouteGroup, RouteTable};

pub struct ProductRoutes;

impl RouteGroup for ProductRoutes {
    fn name(&self) -> &str {
        "product"
    }

    fn routes(&self) -> RouteTable {
        RouteTable::new()
            .get("/api/products", delegated("product.list"))
            .get("/api/products/search/:name", delegated("product.search"))
            .post("/api/rate-product", delegated("product.rate"))
            .get("/api/deal-of-day", delegated("product.deal_of_day"))
    }
}
