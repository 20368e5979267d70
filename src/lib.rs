//! Role-gated route table for an admin console.

pub mod config;
pub mod observability;
pub mod routes;
pub mod routing;

pub use config::RoutesConfig;
pub use routing::{RouteNode, RouteTable, RouterEngine};
