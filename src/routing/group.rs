use crate::routing::{Route, RouteNode};

/// Ordered routes sharing a prefix, middleware or name
///
/// Settings are pushed down into the nested routes when applied, so the
/// group itself is only a container by the time the table is flattened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteGroup {
    routes: Vec<RouteNode>,
}

impl RouteGroup {
    pub fn new(routes: Vec<RouteNode>) -> Self {
        Self { routes }
    }

    pub fn push(&mut self, node: impl Into<RouteNode>) -> &mut Self {
        self.routes.push(node.into());
        self
    }

    pub fn routes(&self) -> &[RouteNode] {
        &self.routes
    }

    pub(crate) fn routes_mut(&mut self) -> &mut [RouteNode] {
        &mut self.routes
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.for_each_route(&mut |route| route.prefix(prefix));
        self
    }

    /// Group middleware runs before the routes' own middleware
    pub fn middleware<I, S>(mut self, middleware: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let middleware: Vec<String> = middleware.into_iter().map(Into::into).collect();
        self.for_each_route(&mut |route| route.prepend_middleware(&middleware));
        self
    }

    /// Qualify every named route: `show` → `<name>.show`
    pub fn as_name(mut self, name: &str) -> Self {
        self.for_each_route(&mut |route| route.prefix_name(name));
        self
    }

    fn for_each_route(&mut self, f: &mut dyn FnMut(&mut Route)) {
        for node in &mut self.routes {
            node.for_each_route(f);
        }
    }
}
