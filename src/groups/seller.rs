//! Seller onboarding and storefront management.

use crate::groups::delegated;
use crate::routing::{RouteGroup, RouteTable};

pub struct SellerRoutes;

impl RouteGroup for SellerRoutes {
    fn name(&self) -> &str {
        "seller"
    }

    fn routes(&self) -> RouteTable {
        RouteTable::new()
            .post("/seller/register", delegated("seller.register"))
            .get("/seller/products", delegated("seller.products"))
            .post("/seller/add-product", delegated("seller.add_product"))
            .get("/seller/orders", delegated("seller.orders"))
    }
}
