//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation of route trees (serde handles syntactic)
//! - Check referential integrity (redirect targets exist)
//! - Detect duplicate names and unreachable routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function over node slices
//! - Runs before any table is accepted into the system

use std::collections::HashMap;
use std::fmt;

use crate::config::schema::{RouterSettings, RoutesConfig};
use crate::routing::matcher::{self, PathPattern, PatternError};
use crate::routing::router::{RouteTable, TableDiagnostic};
use crate::routing::{ComponentRef, RouteNode};

/// A single semantic error in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Two nodes share a name.
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },
    /// A node follows the catch-all and could never match.
    CatchAllNotLast { path: String },
    /// The catch-all is nested inside a group.
    CatchAllNested { parent: String },
    /// `meta.roles` is present but empty.
    EmptyRoles { path: String },
    /// A group node does not render a layout or outlet.
    GroupWithoutLayout { path: String },
    /// A leaf node has nothing to render and does not redirect.
    MissingComponent { path: String },
    /// An external link declares a component.
    ExternalWithComponent { url: String },
    /// An external link declares children.
    ExternalWithChildren { url: String },
    /// A path pattern does not compile.
    InvalidPattern { path: String, reason: PatternError },
    /// A redirect target is missing from the full table.
    DanglingRedirect { path: String, target: String },
    /// A router setting is out of range.
    InvalidSetting { field: &'static str, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateName { name, first, second } => {
                write!(f, "route name '{}' used by both {} and {}", name, first, second)
            }
            ValidationError::CatchAllNotLast { path } => {
                write!(f, "route {} follows the catch-all and is unreachable", path)
            }
            ValidationError::CatchAllNested { parent } => {
                write!(f, "catch-all nested under {}; it must be top level", parent)
            }
            ValidationError::EmptyRoles { path } => {
                write!(f, "route {} declares an empty roles list", path)
            }
            ValidationError::GroupWithoutLayout { path } => {
                write!(f, "group route {} must use Layout or Outlet", path)
            }
            ValidationError::MissingComponent { path } => {
                write!(f, "route {} has no component and no redirect", path)
            }
            ValidationError::ExternalWithComponent { url } => {
                write!(f, "external link {} must not declare a component", url)
            }
            ValidationError::ExternalWithChildren { url } => {
                write!(f, "external link {} must not declare children", url)
            }
            ValidationError::InvalidPattern { path, reason } => {
                write!(f, "route {} has an invalid path: {}", path, reason)
            }
            ValidationError::DanglingRedirect { path, target } => {
                write!(f, "route {} redirects to unknown target {}", path, target)
            }
            ValidationError::InvalidSetting { field, reason } => {
                write!(f, "router.{}: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a full configuration: settings, node trees and redirect targets
/// against the unfiltered table.
pub fn validate_config(config: &RoutesConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = validate_settings(&config.router);

    let nodes: Vec<RouteNode> = config
        .constant_routes
        .iter()
        .chain(config.async_routes.iter())
        .cloned()
        .collect();

    let route_errors = validate_routes(&nodes);
    if route_errors.is_empty() {
        // Only compile once the structure is sound.
        if let Ok(table) = RouteTable::compile(nodes) {
            errors.extend(table.diagnostics().iter().map(|d| match d {
                TableDiagnostic::DanglingRedirect { path, target } => {
                    ValidationError::DanglingRedirect {
                        path: path.clone(),
                        target: target.clone(),
                    }
                }
            }));
        }
    } else {
        errors.extend(route_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_settings(settings: &RouterSettings) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if !settings.not_found_path.starts_with('/') {
        errors.push(ValidationError::InvalidSetting {
            field: "not_found_path",
            reason: format!("'{}' must be absolute", settings.not_found_path),
        });
    }
    if let Some(path) = &settings.unauthorized_path {
        if !path.starts_with('/') {
            errors.push(ValidationError::InvalidSetting {
                field: "unauthorized_path",
                reason: format!("'{}' must be absolute", path),
            });
        }
    }
    if settings.max_redirects == 0 {
        errors.push(ValidationError::InvalidSetting {
            field: "max_redirects",
            reason: "must be greater than zero".to_string(),
        });
    }
    errors
}

/// Structural checks over an ordered top-level node list.
pub fn validate_routes(nodes: &[RouteNode]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut names: HashMap<&str, String> = HashMap::new();

    if let Some(pos) = nodes.iter().position(RouteNode::is_catch_all) {
        for node in &nodes[pos + 1..] {
            errors.push(ValidationError::CatchAllNotLast {
                path: node.path.clone(),
            });
        }
    }

    for node in nodes {
        check_node(node, "/", &mut names, &mut errors);
    }
    errors
}

fn check_node<'a>(
    node: &'a RouteNode,
    parent: &str,
    names: &mut HashMap<&'a str, String>,
    errors: &mut Vec<ValidationError>,
) {
    let full_path = matcher::join(parent, &node.path);

    if let Some(name) = node.name.as_deref() {
        if let Some(first) = names.get(name) {
            errors.push(ValidationError::DuplicateName {
                name: name.to_string(),
                first: first.clone(),
                second: full_path.clone(),
            });
        } else {
            names.insert(name, full_path.clone());
        }
    }

    if node.required_roles().is_some_and(|roles| roles.is_empty()) {
        errors.push(ValidationError::EmptyRoles {
            path: full_path.clone(),
        });
    }

    if node.is_external() {
        if node.component.is_some() {
            errors.push(ValidationError::ExternalWithComponent {
                url: full_path.clone(),
            });
        }
        if node.is_group() {
            errors.push(ValidationError::ExternalWithChildren { url: full_path });
        }
        return;
    }

    if let Err(reason) = PathPattern::parse(&full_path) {
        errors.push(ValidationError::InvalidPattern {
            path: full_path.clone(),
            reason,
        });
    }

    if node.is_group() {
        if !node.component.as_ref().is_some_and(ComponentRef::is_shell) {
            errors.push(ValidationError::GroupWithoutLayout {
                path: full_path.clone(),
            });
        }
        for child in &node.children {
            if child.is_catch_all() {
                errors.push(ValidationError::CatchAllNested {
                    parent: full_path.clone(),
                });
                continue;
            }
            check_node(child, &full_path, names, errors);
        }
    } else if node.component.is_none() && node.redirect.is_none() {
        errors.push(ValidationError::MissingComponent { path: full_path });
    }
}
