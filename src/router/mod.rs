//! Client-side routing: the route table, the navigation guard and the
//! router that ties them to the session.

pub mod guard;
pub mod navigation;
pub mod routes;

pub use guard::{Decision, Guard};
pub use navigation::{Location, NavigationError, Router};
pub use routes::{default_routes, MatchedRoute, RouteDescriptor, RouteRecord, RouteTable};
