//! Navigation bridge (§4.3 "Navigation").
//!
//! Builds a dialect-neutral dispatch plan from a `NavigationSchema` that
//! each back-end renders into its own idiom: a pattern-matched route table
//! on the JSX side, a named-routes map plus generated `onGenerateRoute`
//! dispatcher on the Dart side.

use uic_ir::{GuardPhase, NavigationSchema, Route, RouteGuard, SlideDirection, SourceLanguage, Transition};

use crate::error::{BridgeError, Result};

/// One route entry in a rendered dispatch plan.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDispatchEntry {
    /// Route name.
    pub name: String,
    /// Path pattern, e.g. `/users/:id`.
    pub path: String,
    /// `:param` segment names, in order.
    pub params: Vec<String>,
    /// Designator of the concrete transition builder function, if any.
    pub transition_builder: Option<String>,
}

/// A guard wired into the dispatch plan, with its dialect-specific shape
/// already decided.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardEmission {
    /// Guard name.
    pub name: String,
    /// Designator of the guard's handler function.
    pub handler: String,
    /// `"wrapper_component"` on the JSX side, `"before_navigate_hook"` on Dart.
    pub shape: &'static str,
}

/// The full navigation emission plan for one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationDispatchPlan {
    /// Route entries, in declaration order.
    pub routes: Vec<RouteDispatchEntry>,
    /// The initial route's path.
    pub initial_route: String,
    /// Guards, ordered by phase then descending priority.
    pub guards: Vec<GuardEmission>,
}

/// Map a `Transition` tag to the designator of the concrete animation
/// builder function each dialect emits (§4.3: "translate enumerated tags
/// ... into concrete animation builders in each dialect").
pub fn transition_builder_name(transition: &Transition, dialect: SourceLanguage) -> String {
    let suffix = match dialect {
        SourceLanguage::JsxTs => "Jsx",
        SourceLanguage::Dart => "Dart",
    };
    match transition {
        Transition::Fade => format!("fadeTransition{suffix}"),
        Transition::Slide { direction } => {
            let dir = match direction {
                SlideDirection::Left => "Left",
                SlideDirection::Right => "Right",
                SlideDirection::Up => "Up",
                SlideDirection::Down => "Down",
            };
            format!("slide{dir}Transition{suffix}")
        }
        Transition::Scale => format!("scaleTransition{suffix}"),
        Transition::PlatformDefault => format!("platformDefaultTransition{suffix}"),
    }
}

fn guard_shape(dialect: SourceLanguage) -> &'static str {
    match dialect {
        SourceLanguage::JsxTs => "wrapper_component",
        SourceLanguage::Dart => "before_navigate_hook",
    }
}

/// Build a dispatch plan for `schema`, targeting `dialect`'s idiom for
/// guards and transitions. Fails if `schema.initial_route` doesn't name a
/// declared route.
pub fn build_dispatch_plan(
    schema: &NavigationSchema,
    dialect: SourceLanguage,
) -> Result<NavigationDispatchPlan> {
    if schema.route(&schema.initial_route).is_none() && !schema.routes.is_empty() {
        return Err(BridgeError::UnknownRoute(schema.initial_route.clone()));
    }

    let routes = schema
        .routes
        .iter()
        .map(|route: &Route| RouteDispatchEntry {
            name: route.name.clone(),
            path: route.path.clone(),
            params: route.params.clone(),
            transition_builder: route
                .transition
                .as_ref()
                .map(|t| transition_builder_name(t, dialect)),
        })
        .collect();

    let mut guards = Vec::new();
    for phase in [GuardPhase::Before, GuardPhase::Resolve, GuardPhase::After] {
        for guard in schema.guards_for_phase(phase) {
            guards.push(emit_guard(guard, dialect));
        }
    }

    Ok(NavigationDispatchPlan {
        routes,
        initial_route: schema.initial_route.clone(),
        guards,
    })
}

fn emit_guard(guard: &RouteGuard, dialect: SourceLanguage) -> GuardEmission {
    GuardEmission {
        name: guard.name.clone(),
        handler: guard.handler.clone(),
        shape: guard_shape(dialect),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uic_ir::NodeKind;

    fn schema() -> NavigationSchema {
        NavigationSchema {
            routes: vec![
                Route {
                    name: "home".into(),
                    path: "/".into(),
                    component: NodeKind::View,
                    params: vec![],
                    transition: Some(Transition::Fade),
                },
                Route {
                    name: "profile".into(),
                    path: "/users/:id".into(),
                    component: NodeKind::View,
                    params: vec!["id".into()],
                    transition: Some(Transition::Slide {
                        direction: SlideDirection::Left,
                    }),
                },
            ],
            initial_route: "/".into(),
            guards: vec![RouteGuard {
                name: "auth".into(),
                phase: GuardPhase::Before,
                handler: "requireAuth".into(),
                priority: 0,
            }],
        }
    }

    #[test]
    fn builds_jsx_wrapper_guards_and_named_transitions() {
        let plan = build_dispatch_plan(&schema(), SourceLanguage::JsxTs).unwrap();
        assert_eq!(plan.routes.len(), 2);
        assert_eq!(
            plan.routes[1].transition_builder.as_deref(),
            Some("slideLeftTransitionJsx")
        );
        assert_eq!(plan.guards[0].shape, "wrapper_component");
    }

    #[test]
    fn builds_dart_before_navigate_guards() {
        let plan = build_dispatch_plan(&schema(), SourceLanguage::Dart).unwrap();
        assert_eq!(plan.guards[0].shape, "before_navigate_hook");
    }

    #[test]
    fn unknown_initial_route_is_an_error() {
        let mut bad = schema();
        bad.initial_route = "/missing".into();
        let err = build_dispatch_plan(&bad, SourceLanguage::JsxTs).unwrap_err();
        assert!(matches!(err, BridgeError::UnknownRoute(r) if r == "/missing"));
    }
}
