//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the route
//! table. All types derive Serde traits for deserialization from config files.
//! Route tables default to the built-in console tables, so a config file only
//! needs the sections it changes.

use serde::{Deserialize, Serialize};

use crate::routes;
use crate::routing::RouteNode;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Navigation and fallback settings.
    pub router: RouterSettings,

    /// Role filtering settings.
    pub permission: PermissionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Routes present for every identity.
    pub constant_routes: Vec<RouteNode>,

    /// Routes attached according to the identity's roles.
    pub async_routes: Vec<RouteNode>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            router: RouterSettings::default(),
            permission: PermissionConfig::default(),
            observability: ObservabilityConfig::default(),
            constant_routes: routes::constant_routes(),
            async_routes: routes::async_routes(),
        }
    }
}

/// Navigation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterSettings {
    /// Path shown when nothing matches and no catch-all is attached.
    pub not_found_path: String,

    /// Path shown when a route exists but is filtered out for the identity.
    /// `None` treats such paths as not found.
    pub unauthorized_path: Option<String>,

    /// Maximum redirect hops before navigation is aborted.
    pub max_redirects: usize,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            not_found_path: "/404".to_string(),
            unauthorized_path: Some("/401".to_string()),
            max_redirects: 8,
        }
    }
}

/// Role filtering configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PermissionConfig {
    /// Role that receives the whole async table unfiltered.
    pub superuser_role: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
