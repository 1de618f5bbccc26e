//! `NavigationSchema`, `Route`, `RouteGuard` (§3.1).

use serde::{Deserialize, Serialize};

use crate::node::NodeKind;

/// An enumerated transition style between routes (§4.3 Navigation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Transition {
    /// Cross-fade.
    Fade,
    /// Slide in from a direction.
    Slide {
        /// Direction the incoming route slides in from.
        direction: SlideDirection,
    },
    /// Scale in/out.
    Scale,
    /// Whatever the host platform's default transition is.
    PlatformDefault,
}

/// Direction a `Slide` transition enters from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideDirection {
    /// From the left.
    Left,
    /// From the right.
    Right,
    /// From the top.
    Up,
    /// From the bottom.
    Down,
}

/// A single named route (§3.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Name, unique within the `NavigationSchema` (invariant 5).
    pub name: String,
    /// Path pattern, e.g. `/users/:id`, unique within the schema (invariant 5).
    pub path: String,
    /// The component this route renders.
    pub component: NodeKind,
    /// Declared `:param` segment names, if any were extracted from `path`.
    pub params: Vec<String>,
    /// Optional transition descriptor for navigating to this route.
    pub transition: Option<Transition>,
}

impl Route {
    /// Extract `:param` segment names from a path pattern, in order.
    pub fn params_from_path(path: &str) -> Vec<String> {
        path.split('/')
            .filter_map(|segment| segment.strip_prefix(':').map(str::to_string))
            .collect()
    }
}

/// When a navigation guard runs relative to a route transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardPhase {
    /// Before the transition begins.
    Before,
    /// After the transition completes.
    After,
    /// While the destination route's data is resolving.
    Resolve,
}

/// A navigation guard (§3.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteGuard {
    /// Name, for diagnostics and emitted-code identifiers.
    pub name: String,
    /// When this guard runs.
    pub phase: GuardPhase,
    /// Designator of the guard's handler function.
    pub handler: String,
    /// Guards with a higher priority run first within the same phase.
    pub priority: i32,
}

/// The navigation side-table of an IR (§3.1).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationSchema {
    /// Every declared route.
    pub routes: Vec<Route>,
    /// The path navigated to on startup.
    pub initial_route: String,
    /// Route guards, evaluated by phase then priority (descending).
    pub guards: Vec<RouteGuard>,
}

impl NavigationSchema {
    /// Find a route by name.
    pub fn route(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    /// Guards active for a given phase, ordered by descending priority.
    pub fn guards_for_phase(&self, phase: GuardPhase) -> Vec<&RouteGuard> {
        let mut guards: Vec<&RouteGuard> =
            self.guards.iter().filter(|g| g.phase == phase).collect();
        guards.sort_by(|a, b| b.priority.cmp(&a.priority));
        guards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_named_params_in_order() {
        assert_eq!(
            Route::params_from_path("/users/:userId/posts/:postId"),
            vec!["userId".to_string(), "postId".to_string()]
        );
    }

    #[test]
    fn guards_sort_by_descending_priority() {
        let schema = NavigationSchema {
            routes: vec![],
            initial_route: "/".to_string(),
            guards: vec![
                RouteGuard {
                    name: "low".into(),
                    phase: GuardPhase::Before,
                    handler: "h1".into(),
                    priority: 1,
                },
                RouteGuard {
                    name: "high".into(),
                    phase: GuardPhase::Before,
                    handler: "h2".into(),
                    priority: 10,
                },
            ],
        };
        let ordered = schema.guards_for_phase(GuardPhase::Before);
        assert_eq!(ordered[0].name, "high");
        assert_eq!(ordered[1].name, "low");
    }
}
