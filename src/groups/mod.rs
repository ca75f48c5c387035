//! The five route groups served by the storefront.
//!
//! Each group owns its route table. The business operations behind the
//! routes live outside this crate; handlers here acquire the shared
//! database handle through [`RouteRequest::database`] and hand the request
//! to the business layer.
//!
//! Mount order is fixed: auth, admin, product, user, seller. Where two
//! groups declare overlapping routes, the earlier one answers.

pub mod admin;
pub mod auth;
pub mod product;
pub mod seller;
pub mod user;

use crate::error::ApiError;
use crate::routing::{Handler, RouteGroup, RouteRequest};

pub use admin::AdminRoutes;
pub use auth::AuthRoutes;
pub use product::ProductRoutes;
pub use seller::SellerRoutes;
pub use user::UserRoutes;

/// All groups, in mount order.
pub fn default_groups() -> Vec<Box<dyn RouteGroup>> {
    vec![
        Box::new(AuthRoutes),
        Box::new(AdminRoutes),
        Box::new(ProductRoutes),
        Box::new(UserRoutes),
        Box::new(SellerRoutes),
    ]
}

/// Handler for an operation owned by the business layer.
///
/// Answers 503 while the database is unavailable and 501 otherwise.
pub(crate) fn delegated(operation: &'static str) -> impl Handler + Clone {
    move |req: RouteRequest| async move {
        let database = req.database()?;
        tracing::debug!(
            operation,
            database = %database.name(),
            request_id = req.request_id().unwrap_or("unknown"),
            "No business handler registered"
        );
        Err::<(), _>(ApiError::NotImplemented(operation.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Dispatcher;
    use axum::http::Method;

    #[test]
    fn test_mount_order() {
        let names: Vec<String> = default_groups().iter().map(|g| g.name().to_string()).collect();
        assert_eq!(names, vec!["auth", "admin", "product", "user", "seller"]);
    }

    #[test]
    fn test_all_groups_compile() {
        let dispatcher = Dispatcher::builder()
            .mount_all(default_groups())
            .build()
            .unwrap();
        assert_eq!(dispatcher.group_names().len(), 5);
    }

    #[test]
    fn test_group_ownership() {
        let dispatcher = Dispatcher::builder()
            .mount_all(default_groups())
            .build()
            .unwrap();

        let cases = [
            (Method::POST, "/api/signin", "auth"),
            (Method::GET, "/admin/get-orders", "admin"),
            (Method::GET, "/api/products/search/phone", "product"),
            (Method::DELETE, "/api/remove-from-cart/abc", "user"),
            (Method::GET, "/seller/orders", "seller"),
        ];
        for (method, path, group) in cases {
            let found = dispatcher.find(&method, path).unwrap();
            assert_eq!(found.group, group, "{method} {path}");
        }

        assert!(dispatcher.find(&Method::GET, "/").is_none());
    }
}
