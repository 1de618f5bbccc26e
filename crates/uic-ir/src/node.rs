//! The [`Node`] tagged-variant tree and its prop values (§3.1).
//!
//! Nodes are stored in a flat arena ([`crate::ir::NodeTable`]) indexed by
//! [`NodeId`]; a `Node`'s `children` field is a sequence of ids rather than
//! owned sub-nodes (design note "Arena + indices, not pointer graphs").

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::diagnostics::SourceSpan;
use crate::platform::PlatformMap;

/// A stable node identifier, unique within one IR (invariant 1).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    /// Build a node id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a plain string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The kind of UI element a [`Node`] represents: a core widget tag, or a
/// user-declared component/widget identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", tag = "kind", content = "name")]
pub enum NodeKind {
    /// A layout/container primitive.
    View,
    /// A text primitive.
    Text,
    /// A tappable button.
    Button,
    /// An image primitive.
    Image,
    /// A scrollable container.
    ScrollView,
    /// A virtualized list.
    ListView,
    /// A text input field.
    TextInput,
    /// A boolean toggle switch.
    Switch,
    /// A checkbox input.
    Checkbox,
    /// A radio input.
    Radio,
    /// A user-declared component or widget, named by identifier.
    Custom(String),
}

impl NodeKind {
    /// Parse a tag/identifier string into the matching core kind, or
    /// `Custom` if it does not name a recognized core widget.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "View" => NodeKind::View,
            "Text" => NodeKind::Text,
            "Button" => NodeKind::Button,
            "Image" => NodeKind::Image,
            "ScrollView" => NodeKind::ScrollView,
            "ListView" => NodeKind::ListView,
            "TextInput" => NodeKind::TextInput,
            "Switch" => NodeKind::Switch,
            "Checkbox" => NodeKind::Checkbox,
            "Radio" => NodeKind::Radio,
            other => NodeKind::Custom(other.to_string()),
        }
    }

    /// The tag/identifier this kind lowers/emits as in source.
    pub fn as_tag(&self) -> &str {
        match self {
            NodeKind::View => "View",
            NodeKind::Text => "Text",
            NodeKind::Button => "Button",
            NodeKind::Image => "Image",
            NodeKind::ScrollView => "ScrollView",
            NodeKind::ListView => "ListView",
            NodeKind::TextInput => "TextInput",
            NodeKind::Switch => "Switch",
            NodeKind::Checkbox => "Checkbox",
            NodeKind::Radio => "Radio",
            NodeKind::Custom(name) => name.as_str(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// One value a prop can hold (§3.1).
///
/// `PlatformMap` is only produced by the recognizer in
/// [`crate::platform::recognize_platform_map`]; a plain `Map` with platform
/// tag keys does not become a `PlatformMap` until that recognition step runs
/// (invariant 6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    /// JSON `null`.
    Null,
    /// A boolean literal.
    Bool(bool),
    /// An integer literal.
    Int(i64),
    /// A floating-point literal.
    Decimal(f64),
    /// A string literal, or an opaque preserved expression.
    Str(String),
    /// An ordered list of values.
    List(Vec<PropValue>),
    /// A designator naming an in-scope `StateVariable`.
    StateRef(StateRef),
    /// A designator naming an `EventBinding` or a declared handler.
    EventRef(EventRef),
    /// A structurally-recognized per-platform value (invariant 6).
    PlatformMap(PlatformMap),
    /// An ordered string-keyed mapping (serialized with sorted keys, invariant 7).
    Map(IndexMap<String, PropValue>),
}

/// A designator naming a state variable by symbol (§3.1, §3.2 invariant 3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRef(pub String);

/// A designator naming an event handler by symbol (§3.1, §3.2 invariant 3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRef(pub String);

/// An event name bound to a handler on a [`Node`] (§3.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBinding {
    /// Event name, e.g. `press`, `change`, `submit`.
    pub name: String,
    /// Designator of the handler this event invokes.
    pub handler: String,
    /// Declared parameter names, in order.
    pub params: Vec<String>,
    /// Whether the handler is declared `async`.
    pub is_async: bool,
}

/// The point in a node's lifetime a [`LifecycleBinding`] fires at (§4.1 hook-2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    /// Runs once, when the node is first mounted (empty dependency list).
    Mount,
    /// Runs when the node is torn down (the effect body returns a function).
    Unmount,
    /// Runs after mount and again whenever a listed dependency changes.
    Update,
}

/// A lifecycle hook lowered onto its enclosing [`Node`] (§4.1 hook-2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleBinding {
    /// When this binding fires.
    pub phase: LifecyclePhase,
    /// Verbatim effect body text, preserved opaquely.
    pub handler: String,
    /// Verbatim dependency array entries, if a dependency list was declared.
    pub deps: Vec<String>,
}

/// A `useRef`-style designator recorded in a node's metadata (§4.1 hook-4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefBinding {
    /// Local binding name.
    pub name: String,
    /// Verbatim initializer expression text.
    pub initial: String,
}

/// A `useMemo`/`useCallback`-style helper binding recorded in a node's
/// metadata (§4.1 hook-5/hook-6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelperBinding {
    /// Local binding name.
    pub name: String,
    /// Which kind of helper this is: `"memo"` or `"callback"`.
    pub kind: String,
    /// Verbatim dependency array entries.
    pub deps: Vec<String>,
    /// Verbatim body/factory expression text.
    pub body: String,
}

/// Non-rendering metadata carried alongside a [`Node`] (§3.1).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Where this node originated in source, if known.
    pub span: Option<SourceSpan>,
    /// The verbatim original-source text, preserved opaquely when the
    /// front-end could not fully understand the construct.
    pub opaque_source: Option<String>,
    /// Diagnostics raised while lowering this specific node.
    pub warnings: Vec<String>,
    /// `useRef`-style designators declared on the enclosing component (§4.1 hook-4).
    pub refs: Vec<RefBinding>,
    /// `useMemo`/`useCallback`-style helper bindings declared on the
    /// enclosing component (§4.1 hook-5/hook-6).
    pub helpers: Vec<HelperBinding>,
    /// Free-form metadata (type annotations, custom widget parameter
    /// surfaces) keyed by name; see §4.1/§4.2.
    pub extra: IndexMap<String, serde_json::Value>,
}

/// One element of the UI tree (§3.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable identifier, unique within the IR (invariant 1).
    pub id: NodeId,
    /// Core widget tag or user-declared identifier.
    pub kind: NodeKind,
    /// Arbitrary string-keyed props; key set/semantics depend on `kind`.
    pub props: IndexMap<String, PropValue>,
    /// Ordered child node ids (order is significant).
    pub children: Vec<NodeId>,
    /// Event bindings, unique by event name.
    pub events: IndexMap<String, EventBinding>,
    /// Referenced `AnimationSchema` ids, sorted by id at canonicalization time.
    pub animations: BTreeSet<String>,
    /// Lifecycle bindings (§4.1 hook-2), in declaration order.
    pub lifecycle: Vec<LifecycleBinding>,
    /// Non-rendering metadata.
    pub metadata: NodeMetadata,
}

impl Node {
    /// Build a bare node with the given id and kind, empty otherwise.
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            props: IndexMap::new(),
            children: Vec::new(),
            events: IndexMap::new(),
            animations: BTreeSet::new(),
            lifecycle: Vec::new(),
            metadata: NodeMetadata::default(),
        }
    }

    /// Set a prop, returning `self` for chained construction.
    #[must_use]
    pub fn with_prop(mut self, key: impl Into<String>, value: PropValue) -> Self {
        self.props.insert(key.into(), value);
        self
    }

    /// Append a child id, returning `self` for chained construction.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<NodeId>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Bind an event, returning `self` for chained construction.
    #[must_use]
    pub fn with_event(mut self, binding: EventBinding) -> Self {
        self.events.insert(binding.name.clone(), binding);
        self
    }

    /// Append a lifecycle binding, returning `self` for chained construction.
    #[must_use]
    pub fn with_lifecycle(mut self, binding: LifecycleBinding) -> Self {
        self.lifecycle.push(binding);
        self
    }

    /// An `Unknown` placeholder node for a subtree the front-end could not
    /// lower, carrying the reason in `props["reason"]` (§4.1 error conditions).
    pub fn unknown(id: impl Into<NodeId>, reason: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Custom("Unknown".to_string()))
            .with_prop("reason", PropValue::Str(reason.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_kind_round_trips_through_tag() {
        for tag in [
            "View",
            "Text",
            "Button",
            "Image",
            "ScrollView",
            "ListView",
            "TextInput",
            "Switch",
            "Checkbox",
            "Radio",
        ] {
            assert_eq!(NodeKind::from_tag(tag).as_tag(), tag);
        }
        assert_eq!(
            NodeKind::from_tag("MyWidget"),
            NodeKind::Custom("MyWidget".to_string())
        );
    }

    #[test]
    fn events_are_unique_by_name_on_insert() {
        let node = Node::new("n1", NodeKind::Button)
            .with_event(EventBinding {
                name: "press".into(),
                handler: "onPressA".into(),
                params: vec![],
                is_async: false,
            })
            .with_event(EventBinding {
                name: "press".into(),
                handler: "onPressB".into(),
                params: vec![],
                is_async: false,
            });
        assert_eq!(node.events.len(), 1);
        assert_eq!(node.events["press"].handler, "onPressB");
    }

    #[test]
    fn unknown_placeholder_carries_reason() {
        let node = Node::unknown("n2", "unsupported JSX spread attribute");
        assert_eq!(node.kind, NodeKind::Custom("Unknown".to_string()));
        assert_eq!(
            node.props.get("reason"),
            Some(&PropValue::Str(
                "unsupported JSX spread attribute".to_string()
            ))
        );
    }
}
