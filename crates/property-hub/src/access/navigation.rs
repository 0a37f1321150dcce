use serde::Serialize;

use super::guard::AccessRequirement;
use crate::accounts::domain::Role;

/// A client-side page and the access it demands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationRoute {
    pub name: &'static str,
    pub pattern: &'static str,
    pub requirement: AccessRequirement,
}

/// Route table used to answer "may this caller open that page?".
#[derive(Debug, Clone)]
pub struct NavigationTable {
    routes: Vec<NavigationRoute>,
}

impl NavigationTable {
    pub fn standard() -> Self {
        let route = |name, pattern, requirement| NavigationRoute {
            name,
            pattern,
            requirement,
        };

        Self {
            routes: vec![
                route("home", "/", AccessRequirement::PUBLIC),
                route("properties", "/properties", AccessRequirement::PUBLIC),
                route("property_detail", "/property/:id", AccessRequirement::PUBLIC),
                route(
                    "post_property",
                    "/post-property",
                    AccessRequirement::AUTHENTICATED,
                ),
                route("messages", "/messages", AccessRequirement::AUTHENTICATED),
                route("login", "/login", AccessRequirement::PUBLIC),
                route("register", "/register", AccessRequirement::PUBLIC),
                route("auth", "/auth", AccessRequirement::PUBLIC),
                route("admin", "/admin", AccessRequirement::role(Role::Admin)),
                // Plain sign-in page; admin authority still comes from the profile role.
                route("admin_login", "/admin/login", AccessRequirement::PUBLIC),
            ],
        }
    }

    pub fn routes(&self) -> &[NavigationRoute] {
        &self.routes
    }

    /// Matches a requested path (query string and trailing slash ignored) against the table.
    pub fn resolve(&self, path: &str) -> Option<&NavigationRoute> {
        let path = normalize(path);
        self.routes
            .iter()
            .find(|route| pattern_matches(route.pattern, &path))
    }
}

impl Default for NavigationTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default().trim();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut expected = pattern.split('/');
    let mut actual = path.split('/');

    loop {
        match (expected.next(), actual.next()) {
            (None, None) => return true,
            (Some(segment), Some(value)) if segment.starts_with(':') => {
                if value.is_empty() {
                    return false;
                }
            }
            (Some(segment), Some(value)) if segment == value => {}
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_static_and_parameterised_routes() {
        let table = NavigationTable::standard();

        assert_eq!(table.resolve("/").map(|route| route.name), Some("home"));
        assert_eq!(
            table.resolve("/property/abc-123").map(|route| route.name),
            Some("property_detail")
        );
        assert_eq!(
            table.resolve("/admin/login").map(|route| route.name),
            Some("admin_login")
        );
        assert_eq!(
            table.resolve("/admin/").map(|route| route.name),
            Some("admin")
        );
    }

    #[test]
    fn ignores_query_strings() {
        let table = NavigationTable::standard();
        let route = table
            .resolve("/properties?location=lagos")
            .expect("properties route");
        assert_eq!(route.requirement, AccessRequirement::PUBLIC);
    }

    #[test]
    fn unknown_paths_do_not_resolve() {
        let table = NavigationTable::standard();
        assert!(table.resolve("/property").is_none());
        assert!(table.resolve("/property/1/edit").is_none());
        assert!(table.resolve("/dashboard").is_none());
    }

    #[test]
    fn protected_routes_carry_requirements() {
        let table = NavigationTable::standard();
        assert_eq!(
            table.resolve("/post-property").map(|route| route.requirement),
            Some(AccessRequirement::AUTHENTICATED)
        );
        assert_eq!(
            table.resolve("/admin").map(|route| route.requirement),
            Some(AccessRequirement::role(Role::Admin))
        );
    }
}
