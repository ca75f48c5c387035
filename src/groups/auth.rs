//! Account sign-up, sign-in and token checks.

use crate::groups::delegated;
use crate::routing::{RouteGroup, RouteTable};

pub struct AuthRoutes;

impl RouteGroup for AuthRoutes {
    fn name(&self) -> &str {
        "auth"
    }

    fn routes(&self) -> RouteTable {
        RouteTable::new()
            .post("/api/signup", delegated("auth.signup"))
            .post("/api/signin", delegated("auth.signin"))
            .post("/tokenIsValid", delegated("auth.token_is_valid"))
    }
}
