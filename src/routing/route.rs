use axum::http::Method;
use serde::{Serialize, Serializer};

/// Flat description of one registrable route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    #[serde(serialize_with = "serialize_methods")]
    pub methods: Vec<Method>,
    pub pattern: String,
    /// Reference to the handler, e.g. `UsersController.show`
    pub handler: String,
    pub middleware: Vec<String>,
    pub name: Option<String>,
    /// Soft-deleted routes are never registered
    pub deleted: bool,
}

impl Route {
    pub fn new(
        methods: impl IntoIterator<Item = Method>,
        pattern: impl AsRef<str>,
        handler: impl Into<String>,
    ) -> Self {
        Self {
            methods: methods.into_iter().collect(),
            pattern: normalize_pattern(pattern.as_ref()),
            handler: handler.into(),
            middleware: Vec::new(),
            name: None,
            deleted: false,
        }
    }

    /// GET route, also answering HEAD
    pub fn get(pattern: impl AsRef<str>, handler: impl Into<String>) -> Self {
        Self::new([Method::GET, Method::HEAD], pattern, handler)
    }

    pub fn post(pattern: impl AsRef<str>, handler: impl Into<String>) -> Self {
        Self::new([Method::POST], pattern, handler)
    }

    pub fn put(pattern: impl AsRef<str>, handler: impl Into<String>) -> Self {
        Self::new([Method::PUT], pattern, handler)
    }

    pub fn patch(pattern: impl AsRef<str>, handler: impl Into<String>) -> Self {
        Self::new([Method::PATCH], pattern, handler)
    }

    pub fn delete(pattern: impl AsRef<str>, handler: impl Into<String>) -> Self {
        Self::new([Method::DELETE], pattern, handler)
    }

    pub fn any(pattern: impl AsRef<str>, handler: impl Into<String>) -> Self {
        Self::new(
            [
                Method::HEAD,
                Method::OPTIONS,
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ],
            pattern,
            handler,
        )
    }

    /// Append middleware, run after the ones already attached
    pub fn middleware<I, S>(mut self, middleware: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.middleware.extend(middleware.into_iter().map(Into::into));
        self
    }

    pub fn as_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn mark_deleted(mut self) -> Self {
        self.deleted = true;
        self
    }

    /// Prepend a path prefix to the pattern
    pub fn prefix(&mut self, prefix: &str) {
        self.pattern = normalize_pattern(&format!("{}/{}", prefix, self.pattern));
    }

    /// Insert middleware ahead of the route's own
    pub(crate) fn prepend_middleware(&mut self, middleware: &[String]) {
        let mut merged = middleware.to_vec();
        merged.append(&mut self.middleware);
        self.middleware = merged;
    }

    /// Qualify the route name, leaving unnamed routes alone
    pub(crate) fn prefix_name(&mut self, prefix: &str) {
        if let Some(name) = &self.name {
            self.name = Some(format!("{}.{}", prefix, name));
        }
    }
}

/// Leading slash, no empty segments, no trailing slash (except for `/`)
pub(crate) fn normalize_pattern(pattern: &str) -> String {
    let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

fn serialize_methods<S: Serializer>(methods: &[Method], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(methods.iter().map(Method::as_str))
}

/// A route declared by pattern whose handler is attached later
///
/// Until [`handler`](BriskRoute::handler) is called it contributes nothing
/// to the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BriskRoute {
    pattern: String,
    route: Option<Route>,
}

impl BriskRoute {
    pub fn new(pattern: impl AsRef<str>) -> Self {
        Self {
            pattern: normalize_pattern(pattern.as_ref()),
            route: None,
        }
    }

    /// Attach the handler; the route answers GET and HEAD
    pub fn handler(mut self, handler: impl Into<String>) -> Self {
        self.route = Some(Route::get(&self.pattern, handler));
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub(crate) fn route_mut(&mut self) -> Option<&mut Route> {
        self.route.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_pattern() {
        assert_eq!(normalize_pattern(""), "/");
        assert_eq!(normalize_pattern("/"), "/");
        assert_eq!(normalize_pattern("users"), "/users");
        assert_eq!(normalize_pattern("//users///{id}/"), "/users/{id}");
    }

    #[test]
    fn test_prefix() {
        let mut route = Route::get("/", "HomeController.index");
        route.prefix("/api/v1/");
        assert_eq!(route.pattern, "/api/v1");

        let mut route = Route::get("users/{id}", "UsersController.show");
        route.prefix("api");
        assert_eq!(route.pattern, "/api/users/{id}");
    }

    #[test]
    fn test_middleware_order() {
        let mut route = Route::post("/posts", "PostsController.store").middleware(["throttle"]);
        route.prepend_middleware(&["auth".to_string()]);
        assert_eq!(route.middleware, vec!["auth", "throttle"]);
    }

    #[test]
    fn test_prefix_name_skips_unnamed_routes() {
        let mut named = Route::get("/", "HomeController.index").as_name("home");
        named.prefix_name("admin");
        assert_eq!(named.name.as_deref(), Some("admin.home"));

        let mut unnamed = Route::get("/", "HomeController.index");
        unnamed.prefix_name("admin");
        assert_eq!(unnamed.name, None);
    }

    #[test]
    fn test_serialize() {
        let route = Route::get("/health", "HealthController.show").as_name("health");
        assert_eq!(
            serde_json::to_value(&route).unwrap(),
            json!({
                "methods": ["GET", "HEAD"],
                "pattern": "/health",
                "handler": "HealthController.show",
                "middleware": [],
                "name": "health",
                "deleted": false,
            })
        );
    }

    #[test]
    fn test_brisk_route() {
        let brisk = BriskRoute::new("welcome");
        assert_eq!(brisk.pattern(), "/welcome");
        assert!(brisk.route().is_none());

        let brisk = brisk.handler("WelcomeController.render");
        let route = brisk.route().unwrap();
        assert_eq!(route.pattern, "/welcome");
        assert_eq!(route.methods, vec![Method::GET, Method::HEAD]);
    }
}
