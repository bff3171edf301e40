//! Route tree and flattening
//!
//! Routes are declared as a tree: plain routes, groups that share a prefix
//! or middleware, and resources that expand into the seven conventional
//! controller actions. The route table consumes a flat, ordered list, which
//! [`flatten`] produces.
//!
//! ```rust,ignore
//! use harbor::routing::{flatten, Route, RouteGroup, RouteNode, RouteResource};
//!
//! let tree: Vec<RouteNode> = vec![
//!     Route::get("/", "HomeController.index").into(),
//!     RouteGroup::new(vec![RouteResource::new("posts", "PostsController").api_only().into()])
//!         .prefix("/api")
//!         .middleware(["auth"])
//!         .into(),
//! ];
//!
//! for route in flatten(&tree) {
//!     println!("{:?} {} -> {}", route.methods, route.pattern, route.handler);
//! }
//! ```

mod group;
mod resource;
mod route;

pub use group::RouteGroup;
pub use resource::{ResourceAction, RouteResource};
pub use route::{BriskRoute, Route};

/// A node of the route tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteNode {
    Route(Route),
    Brisk(BriskRoute),
    Group(RouteGroup),
    Resource(RouteResource),
}

impl RouteNode {
    /// Flatten this node alone; see [`flatten`]
    pub fn flatten(&self) -> Vec<&Route> {
        flatten(std::slice::from_ref(self))
    }

    /// Visit every route below this node, deleted ones included
    pub(crate) fn for_each_route(&mut self, f: &mut dyn FnMut(&mut Route)) {
        match self {
            RouteNode::Route(route) => f(route),
            RouteNode::Brisk(brisk) => {
                if let Some(route) = brisk.route_mut() {
                    f(route);
                }
            }
            RouteNode::Group(group) => {
                for node in group.routes_mut() {
                    node.for_each_route(f);
                }
            }
            RouteNode::Resource(resource) => {
                for route in resource.routes_mut() {
                    f(route);
                }
            }
        }
    }
}

impl From<Route> for RouteNode {
    fn from(route: Route) -> Self {
        RouteNode::Route(route)
    }
}

impl From<BriskRoute> for RouteNode {
    fn from(brisk: BriskRoute) -> Self {
        RouteNode::Brisk(brisk)
    }
}

impl From<RouteGroup> for RouteNode {
    fn from(group: RouteGroup) -> Self {
        RouteNode::Group(group)
    }
}

impl From<RouteResource> for RouteNode {
    fn from(resource: RouteResource) -> Self {
        RouteNode::Resource(resource)
    }
}

/// Expand a route tree into the ordered list of routes to register.
///
/// Depth-first, left to right. Containers are expanded in place, deleted
/// routes and brisk routes without a handler are skipped. Uses an explicit
/// stack, so deeply nested groups cannot overflow the call stack.
pub fn flatten(nodes: &[RouteNode]) -> Vec<&Route> {
    let mut flat = Vec::new();
    let mut stack = vec![nodes.iter()];

    while let Some(level) = stack.last_mut() {
        let Some(node) = level.next() else {
            stack.pop();
            continue;
        };

        match node {
            RouteNode::Route(route) => {
                if !route.deleted {
                    flat.push(route);
                }
            }
            RouteNode::Brisk(brisk) => {
                if let Some(route) = brisk.route().filter(|route| !route.deleted) {
                    flat.push(route);
                }
            }
            RouteNode::Group(group) => stack.push(group.routes().iter()),
            RouteNode::Resource(resource) => {
                flat.extend(resource.routes().filter(|route| !route.deleted));
            }
        }
    }

    flat
}
