//! Back-office catalog and order management.

use crate::groups::delegated;
use crate::routing::{RouteGroup, RouteTable};

pub struct AdminRoutes;

impl RouteGroup for AdminRoutes {
    fn name(&self) -> &str {
        "admin"
    }

    fn routes(&self) -> RouteTable {
        RouteTable::new()
            .post("/admin/add-product", delegated("admin.add_product"))
            .get("/admin/get-products", delegated("admin.get_products"))
            .post("/admin/delete-product", delegated("admin.delete_product"))
            .get("/admin/get-orders", delegated("admin.get_orders"))
            .post("/admin/change-order-status", delegated("admin.change_order_status"))
            .get("/admin/analytics", delegated("admin.analytics"))
    }
}
