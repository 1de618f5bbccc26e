//! State-management bridge (§4.3 "State management").
//!
//! The IR's `StateDefinition` is dialect-neutral; each back-end picks one of
//! its own adapter targets to emit it as. This module decides which target
//! fits a given `StateDefinition` and implements the hot-reload state
//! migration rule used when a live update swaps in a new IR.

use uic_ir::{PropValue, SemanticType, StateDefinition, StateVariable};

/// Dart-side state adapter targets (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DartStateAdapter {
    /// Reducer-shaped state: actions become event types, branches become
    /// handlers, resulting state becomes an emitted state class.
    EventSourced,
    /// `ChangeNotifier`/`Provider`-style global state.
    NotifierWithProviders,
    /// Plain `State` fields with direct setters (the default for local state).
    ListenableWithSetters,
    /// A reactive stream exposing state changes (`Stream<T>`-style).
    ObservableWithReactiveStream,
}

/// JSX-side state adapter targets (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsxStateAdapter {
    /// A `useState`-style value/setter pair.
    LocalHookPair,
    /// A `useReducer`-style dispatch/action pair.
    ReducerWithDispatch,
}

/// Whether a `StateDefinition` reads more naturally as a reducer (multiple
/// variables updated together by named actions) or as independent local
/// variables. This front-end-facing IR doesn't carry a reducer marker
/// directly, so the heuristic is scope: `Global` state with more than one
/// variable is treated as reducer-shaped; everything else is local.
fn is_reducer_shaped(state: &StateDefinition) -> bool {
    matches!(state.scope, uic_ir::StateScope::Global) && state.variables.len() > 1
}

/// Pick the Dart adapter target for a `StateDefinition` (§4.3 mapping
/// rules: local ↔ setters, reducer ↔ event-sourced, global context ↔
/// notifier/provider).
pub fn dart_adapter_for(state: &StateDefinition) -> DartStateAdapter {
    match (state.scope, is_reducer_shaped(state)) {
        (_, true) => DartStateAdapter::EventSourced,
        (uic_ir::StateScope::Global, false) => DartStateAdapter::NotifierWithProviders,
        (uic_ir::StateScope::Local, false) => DartStateAdapter::ListenableWithSetters,
    }
}

/// Pick the JSX adapter target for a `StateDefinition`.
pub fn jsx_adapter_for(state: &StateDefinition) -> JsxStateAdapter {
    if is_reducer_shaped(state) {
        JsxStateAdapter::ReducerWithDispatch
    } else {
        JsxStateAdapter::LocalHookPair
    }
}

/// Attempt to coerce `value` so it satisfies `target`, applying only the
/// implicit widenings the hot-reload migration rule allows: integer→decimal,
/// string→integer (if parsable), string→boolean (if `"true"`/`"false"`).
/// Returns `None` if `value` already matches `target` or no widening
/// applies, leaving the caller to decide the fallback.
fn widen(value: &PropValue, target: &SemanticType) -> Option<PropValue> {
    match (value, target) {
        (PropValue::Int(i), SemanticType::Decimal) => Some(PropValue::Decimal(*i as f64)),
        (PropValue::Str(s), SemanticType::Integer) => s.parse::<i64>().ok().map(PropValue::Int),
        (PropValue::Str(s), SemanticType::Boolean) => match s.as_str() {
            "true" => Some(PropValue::Bool(true)),
            "false" => Some(PropValue::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

/// Apply the hot-reload state migration rule (§4.3 "Hot-reload
/// preservation"): for each variable retained by name in `new`, carry over
/// its current value from `current` when type-compatible (equal declared
/// type, or an allowed implicit widening); otherwise fall back to the new
/// variable's declared initial value.
pub fn migrate_state(current: &StateDefinition, new: &StateDefinition) -> StateDefinition {
    let variables = new
        .variables
        .iter()
        .map(|new_var| migrate_variable(current, new_var))
        .collect();
    StateDefinition {
        scope: new.scope,
        variables,
    }
}

fn migrate_variable(current: &StateDefinition, new_var: &StateVariable) -> StateVariable {
    let Some(old_var) = current.get(&new_var.name) else {
        return new_var.clone();
    };
    let carried = if old_var.ty == new_var.ty {
        Some(old_var.initial.clone())
    } else {
        widen(&old_var.initial, &new_var.ty)
    };
    StateVariable {
        name: new_var.name.clone(),
        ty: new_var.ty.clone(),
        initial: carried.unwrap_or_else(|| new_var.initial.clone()),
        mutable: new_var.mutable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uic_ir::StateScope;

    fn var(name: &str, ty: SemanticType, initial: PropValue) -> StateVariable {
        StateVariable {
            name: name.to_string(),
            ty,
            initial,
            mutable: true,
        }
    }

    #[test]
    fn carries_over_equal_typed_value() {
        let current = StateDefinition {
            scope: StateScope::Local,
            variables: vec![var("count", SemanticType::Integer, PropValue::Int(7))],
        };
        let new = StateDefinition {
            scope: StateScope::Local,
            variables: vec![var("count", SemanticType::Integer, PropValue::Int(0))],
        };
        let migrated = migrate_state(&current, &new);
        assert_eq!(migrated.variables[0].initial, PropValue::Int(7));
    }

    #[test]
    fn widens_integer_to_decimal() {
        let current = StateDefinition {
            scope: StateScope::Local,
            variables: vec![var("count", SemanticType::Integer, PropValue::Int(7))],
        };
        let new = StateDefinition {
            scope: StateScope::Local,
            variables: vec![var("count", SemanticType::Decimal, PropValue::Decimal(0.0))],
        };
        let migrated = migrate_state(&current, &new);
        assert_eq!(migrated.variables[0].initial, PropValue::Decimal(7.0));
    }

    #[test]
    fn incompatible_change_falls_back_to_new_initial() {
        let current = StateDefinition {
            scope: StateScope::Local,
            variables: vec![var("flag", SemanticType::String, PropValue::Str("x".into()))],
        };
        let new = StateDefinition {
            scope: StateScope::Local,
            variables: vec![var("flag", SemanticType::Boolean, PropValue::Bool(false))],
        };
        let migrated = migrate_state(&current, &new);
        assert_eq!(migrated.variables[0].initial, PropValue::Bool(false));
    }

    #[test]
    fn new_variable_not_present_before_uses_its_own_initial() {
        let current = StateDefinition {
            scope: StateScope::Local,
            variables: vec![],
        };
        let new = StateDefinition {
            scope: StateScope::Local,
            variables: vec![var("fresh", SemanticType::Integer, PropValue::Int(3))],
        };
        let migrated = migrate_state(&current, &new);
        assert_eq!(migrated.variables[0].initial, PropValue::Int(3));
    }

    #[test]
    fn reducer_shaped_global_state_maps_to_event_sourced() {
        let reducer = StateDefinition {
            scope: StateScope::Global,
            variables: vec![
                var("count", SemanticType::Integer, PropValue::Int(0)),
                var("step", SemanticType::Integer, PropValue::Int(1)),
            ],
        };
        assert_eq!(dart_adapter_for(&reducer), DartStateAdapter::EventSourced);
        assert_eq!(
            jsx_adapter_for(&reducer),
            JsxStateAdapter::ReducerWithDispatch
        );
    }

    #[test]
    fn local_state_maps_to_setters_and_hook_pair() {
        let local = StateDefinition {
            scope: StateScope::Local,
            variables: vec![var("count", SemanticType::Integer, PropValue::Int(0))],
        };
        assert_eq!(
            dart_adapter_for(&local),
            DartStateAdapter::ListenableWithSetters
        );
        assert_eq!(jsx_adapter_for(&local), JsxStateAdapter::LocalHookPair);
    }
}
