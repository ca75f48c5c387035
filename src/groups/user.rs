//! Cart, address and order placement for signed-in users.

use crate::groups::delegated;
use crate::routing::{RouteGroup, RouteTable};

pub struct UserRoutes;

impl RouteGroup for UserRoutes {
    fn name(&self) -> &str {
        "user"
    }

    fn routes(&self) -> RouteTable {
        RouteTable::new()
            .post("/api/add-to-cart", delegated("user.add_to_cart"))
            .delete("/api/remove-from-cart/:id", delegated("user.remove_from_cart"))
            .post("/api/save-user-address", delegated("user.save_address"))
            .post("/api/order", delegated("user.place_order"))
            .get("/api/orders/me", delegated("user.my_orders"))
    }
}
