//! The typed, dialect-independent intermediate representation shared by
//! every front-end, back-end, bridge, bundler, and session in this
//! workspace.
//!
//! Nodes live in a flat arena (`ir::NodeTable`) addressed by [`node::NodeId`]
//! rather than an owned pointer tree, which is what keeps delta computation
//! and canonical serialization cheap (see the design notes in `SPEC_FULL.md`).

pub mod animation;
pub mod canonical;
pub mod diagnostics;
pub mod error;
pub mod invariants;
pub mod ir;
pub mod navigation;
pub mod network;
pub mod node;
pub mod platform;
pub mod state;

pub use animation::{
    AnimatedProperty, AnimationKind, AnimationMetadata, AnimationSchema, DecayConfig, Easing,
    SpringConfig,
};
pub use diagnostics::{Diagnostic, Diagnostics, Severity, SourceSpan};
pub use error::{IrError, Result};
pub use ir::{CustomWidgetDescriptor, Ir, IrMetadata, NodeTable};
pub use navigation::{GuardPhase, NavigationSchema, Route, RouteGuard, SlideDirection, Transition};
pub use network::{
    AuthConfig, AuthRequirement, CacheConfig, CacheStrategy, Endpoint, HttpMethod, Interceptor,
    InterceptorPhase, NetworkSchema, RetryConfig,
};
pub use node::{
    EventBinding, EventRef, HelperBinding, LifecycleBinding, LifecyclePhase, Node, NodeId,
    NodeKind, NodeMetadata, PropValue, RefBinding, StateRef,
};
pub use platform::{
    recognize_platform_map, PlatformCodeBlock, PlatformImplementation, PlatformMap,
    PlatformSchema, PlatformTag, SourceLanguage,
};
pub use state::{SemanticType, StateDefinition, StateScope, StateVariable};
