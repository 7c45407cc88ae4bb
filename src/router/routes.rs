use std::collections::HashMap;

/// Static requirements of a navigation target, as the guard sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: String,
    pub requires_auth: bool,
    pub requires_admin: bool,
}

/// One entry of the route configuration. Child paths are relative to their parent.
#[derive(Debug, Clone, Default)]
pub struct RouteRecord {
    pub path: String,
    pub name: Option<String>,
    pub title: Option<String>,
    pub requires_auth: bool,
    pub requires_admin: bool,
    pub redirect: Option<String>,
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    pub fn new(path: &str) -> Self {
        RouteRecord {
            path: path.to_string(),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    pub fn admin(mut self) -> Self {
        self.requires_auth = true;
        self.requires_admin = true;
        self
    }

    pub fn redirect(mut self, to: &str) -> Self {
        self.redirect = Some(to.to_string());
        self
    }

    pub fn children(mut self, children: Vec<RouteRecord>) -> Self {
        self.children = children;
        self
    }
}

/// The outcome of matching a path against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRoute {
    pub path: String,
    pub name: Option<String>,
    pub title: Option<String>,
    pub redirect: Option<String>,
    pub params: HashMap<String, String>,
    /// Requirements of every matched record, outermost first.
    pub chain: Vec<(bool, bool)>,
}

impl MatchedRoute {
    /// A route requires auth (or admin) when any record in its chain does.
    pub fn descriptor(&self) -> RouteDescriptor {
        RouteDescriptor {
            path: self.path.clone(),
            requires_auth: self.chain.iter().any(|(auth, _)| *auth),
            requires_admin: self.chain.iter().any(|(_, admin)| *admin),
        }
    }
}

#[derive(Debug, Clone)]
struct FlatRoute {
    segments: Vec<String>,
    catch_all: bool,
    name: Option<String>,
    title: Option<String>,
    redirect: Option<String>,
    chain: Vec<(bool, bool)>,
}

/// Routes flattened into match order: children before their parent,
/// declaration order otherwise, catch-alls last.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<FlatRoute>,
}

impl RouteTable {
    pub fn new(records: &[RouteRecord]) -> Self {
        let mut routes = Vec::new();
        for record in records {
            flatten(record, &[], &[], &mut routes);
        }
        let (mut regular, catch_all): (Vec<_>, Vec<_>) =
            routes.into_iter().partition(|r| !r.catch_all);
        regular.extend(catch_all);
        RouteTable { routes: regular }
    }

    /// Matches a path (query string ignored).
    pub fn resolve(&self, path: &str) -> Option<MatchedRoute> {
        let path = path_only(path);
        let segments = split(path);
        self.routes.iter().find_map(|route| {
            let params = match_segments(route, &segments)?;
            Some(MatchedRoute {
                path: normalize(path),
                name: route.name.clone(),
                title: route.title.clone(),
                redirect: route.redirect.clone(),
                params,
                chain: route.chain.clone(),
            })
        })
    }
}

fn flatten(record: &RouteRecord, parent: &[String], chain: &[(bool, bool)], out: &mut Vec<FlatRoute>) {
    let mut segments = if record.path.starts_with('/') {
        Vec::new()
    } else {
        parent.to_vec()
    };
    segments.extend(split(&record.path).into_iter().map(str::to_string));

    let mut chain = chain.to_vec();
    chain.push((record.requires_auth, record.requires_admin));

    for child in &record.children {
        flatten(child, &segments, &chain, out);
    }
    out.push(FlatRoute {
        catch_all: record.path == "*",
        segments,
        name: record.name.clone(),
        title: record.title.clone(),
        redirect: record.redirect.clone(),
        chain,
    });
}

fn match_segments(route: &FlatRoute, segments: &[&str]) -> Option<HashMap<String, String>> {
    if route.catch_all {
        return Some(HashMap::new());
    }
    if route.segments.len() != segments.len() {
        return None;
    }
    let mut params = HashMap::new();
    for (pattern, actual) in route.segments.iter().zip(segments) {
        if let Some(name) = pattern.strip_prefix(':') {
            params.insert(name.to_string(), actual.to_string());
        } else if pattern != actual {
            return None;
        }
    }
    Some(params)
}

fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

pub(crate) fn path_only(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or("")
}

fn normalize(path: &str) -> String {
    let segments = split(path);
    format!("/{}", segments.join("/"))
}

/// The application's route configuration.
pub fn default_routes() -> RouteTable {
    RouteTable::new(&[
        RouteRecord::new("/login").name("Login").title("Login"),
        RouteRecord::new("/register").name("Register").title("Register"),
        RouteRecord::new("/").redirect("/dashboard").children(vec![
            RouteRecord::new("dashboard").name("Dashboard").title("Dashboard").auth(),
            RouteRecord::new("websites").name("Websites").title("My Websites").auth(),
            RouteRecord::new("websites/add").name("AddWebsite").title("Add Website").auth(),
            RouteRecord::new("websites/edit/:id").name("EditWebsite").title("Edit Website").auth(),
            RouteRecord::new("websites/:id").name("WebsiteDetail").title("Website Details").auth(),
            RouteRecord::new("websites/:id/stats").name("WebsiteStats").title("Website Statistics").auth(),
            RouteRecord::new("websites/:id/code").name("TrackingCode").title("Tracking Code").auth(),
            RouteRecord::new("profile").name("Profile").title("Profile").auth(),
            RouteRecord::new("password").name("Password").title("Change Password").auth(),
            RouteRecord::new("test-echarts").name("TestECharts").title("ECharts Test").auth(),
        ]),
        RouteRecord::new("/admin").redirect("/admin/dashboard").admin().children(vec![
            RouteRecord::new("dashboard").name("AdminDashboard").title("Admin Console").admin(),
            RouteRecord::new("users").name("Users").title("User Management").admin(),
            RouteRecord::new("groups").name("Groups").title("Group Management").admin(),
            RouteRecord::new("groups/add").name("AddGroup").title("Add Group").admin(),
            RouteRecord::new("groups/edit/:id").name("EditGroup").title("Edit Group").admin(),
            RouteRecord::new("websites").name("AdminWebsites").title("Website Management").admin(),
        ]),
        RouteRecord::new("/404").title("404"),
        RouteRecord::new("*").redirect("/404"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes_do_not_require_auth() {
        let table = default_routes();
        for path in ["/login", "/register", "/404"] {
            let descriptor = table.resolve(path).unwrap().descriptor();
            assert!(!descriptor.requires_auth, "{} should be public", path);
        }
    }

    #[test]
    fn test_admin_requirement_from_chain() {
        let table = default_routes();
        let descriptor = table.resolve("/admin/users").unwrap().descriptor();
        assert_eq!(
            descriptor,
            RouteDescriptor {
                path: "/admin/users".to_string(),
                requires_auth: true,
                requires_admin: true,
            }
        );
    }

    #[test]
    fn test_literal_beats_param() {
        let table = default_routes();
        let add = table.resolve("/websites/add").unwrap();
        assert_eq!(add.name.as_deref(), Some("AddWebsite"));
        let detail = table.resolve("/websites/42").unwrap();
        assert_eq!(detail.name.as_deref(), Some("WebsiteDetail"));
        assert_eq!(detail.params.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn test_nested_param_route() {
        let table = default_routes();
        let stats = table.resolve("/websites/7/stats?range=week").unwrap();
        assert_eq!(stats.name.as_deref(), Some("WebsiteStats"));
        assert_eq!(stats.path, "/websites/7/stats");
        assert!(stats.descriptor().requires_auth);
        assert!(!stats.descriptor().requires_admin);
    }

    #[test]
    fn test_root_redirects_to_dashboard() {
        let table = default_routes();
        let root = table.resolve("/").unwrap();
        assert_eq!(root.redirect.as_deref(), Some("/dashboard"));
        assert!(!root.descriptor().requires_auth);
    }

    #[test]
    fn test_unknown_paths_hit_catch_all() {
        let table = default_routes();
        let unknown = table.resolve("/no/such/page").unwrap();
        assert_eq!(unknown.redirect.as_deref(), Some("/404"));
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        let table = default_routes();
        let profile = table.resolve("/profile/").unwrap();
        assert_eq!(profile.name.as_deref(), Some("Profile"));
        assert_eq!(profile.path, "/profile");
    }

    #[test]
    fn test_table_without_catch_all() {
        let table = RouteTable::new(&[RouteRecord::new("/login")]);
        assert!(table.resolve("/elsewhere").is_none());
    }
}
