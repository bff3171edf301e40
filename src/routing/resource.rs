use crate::routing::Route;
use axum::http::Method;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// The conventional actions of a resourceful controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ResourceAction {
    Index,
    Create,
    Store,
    Show,
    Edit,
    Update,
    Destroy,
}

impl ResourceAction {
    fn methods(self) -> Vec<Method> {
        match self {
            ResourceAction::Index
            | ResourceAction::Create
            | ResourceAction::Show
            | ResourceAction::Edit => vec![Method::GET, Method::HEAD],
            ResourceAction::Store => vec![Method::POST],
            ResourceAction::Update => vec![Method::PUT, Method::PATCH],
            ResourceAction::Destroy => vec![Method::DELETE],
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            ResourceAction::Index | ResourceAction::Store => "",
            ResourceAction::Create => "/create",
            ResourceAction::Show | ResourceAction::Update | ResourceAction::Destroy => "/{id}",
            ResourceAction::Edit => "/{id}/edit",
        }
    }
}

/// The fixed set of routes for a named entity
///
/// `RouteResource::new("posts.comments", "CommentsController")` expands to
/// `/posts/{post_id}/comments`, `/posts/{post_id}/comments/{id}`, and so on.
/// Dropping actions marks their routes deleted rather than removing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteResource {
    name: String,
    routes: Vec<(ResourceAction, Route)>,
}

impl RouteResource {
    pub fn new(name: impl Into<String>, controller: impl AsRef<str>) -> Self {
        let name = name.into();
        let base = resource_pattern(&name);
        let controller = controller.as_ref();

        let routes = ResourceAction::iter()
            .map(|action| {
                let route = Route::new(
                    action.methods(),
                    format!("{}{}", base, action.suffix()),
                    format!("{}.{}", controller, action),
                )
                .as_name(format!("{}.{}", name, action));
                (action, route)
            })
            .collect();

        Self { name, routes }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Keep only the given actions
    pub fn only(mut self, actions: impl IntoIterator<Item = ResourceAction>) -> Self {
        let keep: Vec<ResourceAction> = actions.into_iter().collect();
        for (action, route) in &mut self.routes {
            if !keep.contains(action) {
                route.deleted = true;
            }
        }
        self
    }

    /// Drop the given actions
    pub fn except(mut self, actions: impl IntoIterator<Item = ResourceAction>) -> Self {
        let dropped: Vec<ResourceAction> = actions.into_iter().collect();
        for (action, route) in &mut self.routes {
            if dropped.contains(action) {
                route.deleted = true;
            }
        }
        self
    }

    /// Drop the form-rendering actions (`create`, `edit`)
    pub fn api_only(self) -> Self {
        self.except([ResourceAction::Create, ResourceAction::Edit])
    }

    pub fn middleware<I, S>(self, middleware: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.middleware_for(ResourceAction::iter(), middleware)
    }

    pub fn middleware_for<A, I, S>(mut self, actions: A, middleware: I) -> Self
    where
        A: IntoIterator<Item = ResourceAction>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let actions: Vec<ResourceAction> = actions.into_iter().collect();
        let middleware: Vec<String> = middleware.into_iter().map(Into::into).collect();
        for (action, route) in &mut self.routes {
            if actions.contains(action) {
                route.middleware.extend(middleware.iter().cloned());
            }
        }
        self
    }

    /// Replace the name prefix of every route (`posts.index` → `articles.index`)
    pub fn as_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        for (action, route) in &mut self.routes {
            route.name = Some(format!("{}.{}", self.name, action));
        }
        self
    }

    pub fn route(&self, action: ResourceAction) -> Option<&Route> {
        self.routes
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, route)| route)
    }

    /// All routes in action order, deleted ones included
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().map(|(_, route)| route)
    }

    pub(crate) fn routes_mut(&mut self) -> impl Iterator<Item = &mut Route> {
        self.routes.iter_mut().map(|(_, route)| route)
    }
}

/// `posts.comments` → `/posts/{post_id}/comments`
fn resource_pattern(name: &str) -> String {
    let segments: Vec<&str> = name.split('.').filter(|s| !s.is_empty()).collect();
    let mut pattern = String::new();
    for (i, segment) in segments.iter().enumerate() {
        pattern.push('/');
        pattern.push_str(segment);
        if i + 1 < segments.len() {
            pattern.push_str(&format!("/{{{}_id}}", singular(segment)));
        }
    }
    pattern
}

/// Naive English singular, good enough for parameter names
fn singular(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        format!("{}y", stem)
    } else if let Some(stem) = word.strip_suffix('s') {
        stem.to_string()
    } else {
        word.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expands_seven_routes() {
        let resource = RouteResource::new("posts", "PostsController");
        let patterns: Vec<(&str, &str)> = resource
            .routes()
            .map(|r| (r.name.as_deref().unwrap(), r.pattern.as_str()))
            .collect();

        assert_eq!(
            patterns,
            vec![
                ("posts.index", "/posts"),
                ("posts.create", "/posts/create"),
                ("posts.store", "/posts"),
                ("posts.show", "/posts/{id}"),
                ("posts.edit", "/posts/{id}/edit"),
                ("posts.update", "/posts/{id}"),
                ("posts.destroy", "/posts/{id}"),
            ]
        );

        let update = resource.route(ResourceAction::Update).unwrap();
        assert_eq!(update.methods, vec![Method::PUT, Method::PATCH]);
        assert_eq!(update.handler, "PostsController.update");
    }

    #[test]
    fn test_nested_resource() {
        let resource = RouteResource::new("categories.posts", "PostsController");
        let show = resource.route(ResourceAction::Show).unwrap();
        assert_eq!(show.pattern, "/categories/{category_id}/posts/{id}");
        assert_eq!(show.name.as_deref(), Some("categories.posts.show"));
    }

    #[test]
    fn test_only_and_except() {
        let resource = RouteResource::new("posts", "PostsController")
            .only([ResourceAction::Index, ResourceAction::Show]);
        let live: Vec<_> = resource.routes().filter(|r| !r.deleted).collect();
        assert_eq!(live.len(), 2);

        let resource = RouteResource::new("posts", "PostsController").api_only();
        assert!(resource.route(ResourceAction::Create).unwrap().deleted);
        assert!(resource.route(ResourceAction::Edit).unwrap().deleted);
        assert!(!resource.route(ResourceAction::Store).unwrap().deleted);
    }

    #[test]
    fn test_middleware_for_actions() {
        let resource = RouteResource::new("posts", "PostsController")
            .middleware(["log"])
            .middleware_for([ResourceAction::Store, ResourceAction::Destroy], ["auth"]);

        assert_eq!(
            resource.route(ResourceAction::Store).unwrap().middleware,
            vec!["log", "auth"]
        );
        assert_eq!(
            resource.route(ResourceAction::Index).unwrap().middleware,
            vec!["log"]
        );
    }

    #[test]
    fn test_as_name() {
        let resource = RouteResource::new("posts", "PostsController").as_name("articles");
        assert_eq!(resource.name(), "articles");
        assert_eq!(
            resource.route(ResourceAction::Index).unwrap().name.as_deref(),
            Some("articles.index")
        );
        assert_eq!(
            resource.route(ResourceAction::Index).unwrap().pattern,
            "/posts"
        );
    }

    #[test]
    fn test_singular() {
        assert_eq!(singular("categories"), "category");
        assert_eq!(singular("posts"), "post");
        assert_eq!(singular("sheep"), "sheep");
    }
}
