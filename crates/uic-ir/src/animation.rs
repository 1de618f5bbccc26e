//! `AnimationSchema` and `AnimatedProperty` (§3.1).

use serde::{Deserialize, Serialize};

use crate::node::PropValue;

/// The physical model driving an animation (§3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    /// Fixed-duration interpolation.
    Timing,
    /// Mass/stiffness/damping spring simulation.
    Spring,
    /// Velocity-based decay.
    Decay,
}

/// An easing curve tag. Every variant maps total in both back-ends (§4.3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum Easing {
    /// Constant rate.
    Linear,
    /// Ease in and out.
    Ease,
    /// Ease in only.
    EaseIn,
    /// Ease out only.
    EaseOut,
    /// Ease in, then out.
    EaseInOut,
    /// Spring-based easing (distinct from `AnimationKind::Spring`, which
    /// governs the whole animation rather than just its curve).
    Spring,
    /// Overshoot-and-settle bounce.
    Bounce,
    /// Overshoot-and-oscillate elastic.
    Elastic,
    /// A four-parameter cubic bezier curve.
    CubicBezier {
        /// Control point x1.
        x1: f64,
        /// Control point y1.
        y1: f64,
        /// Control point x2.
        x2: f64,
        /// Control point y2.
        y2: f64,
    },
}

/// One property animated over the course of an `AnimationSchema` (§3.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatedProperty {
    /// Name of the animated prop.
    pub name: String,
    /// Starting value.
    pub from: PropValue,
    /// Ending value.
    pub to: PropValue,
    /// Optional unit (`"px"`, `"deg"`, ...).
    pub unit: Option<String>,
}

/// Spring physics parameters (§3.1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    /// Simulated mass.
    pub mass: f64,
    /// Spring stiffness.
    pub stiffness: f64,
    /// Damping coefficient.
    pub damping: f64,
    /// Initial velocity.
    pub initial_velocity: f64,
}

/// Decay physics parameters (§3.1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayConfig {
    /// Initial velocity.
    pub initial_velocity: f64,
    /// Deceleration rate.
    pub deceleration: f64,
}

/// Non-rendering metadata for an animation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationMetadata {
    /// Free-form notes (warnings, provenance).
    pub notes: Vec<String>,
}

/// One named animation definition, referenced by id from a `Node`'s
/// `animations` set (§3.1, invariant 4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSchema {
    /// Unique id within the IR.
    pub id: String,
    /// Timing, spring, or decay.
    pub kind: AnimationKind,
    /// Duration in milliseconds.
    pub duration_ms: u64,
    /// Optional start delay in milliseconds.
    pub delay_ms: Option<u64>,
    /// Easing curve.
    pub easing: Easing,
    /// Properties animated, in declaration order.
    pub properties: Vec<AnimatedProperty>,
    /// Repeat count; `-1` means infinite.
    pub iterations: i32,
    /// Spring physics parameters, present when `kind == Spring`.
    pub spring: Option<SpringConfig>,
    /// Decay physics parameters, present when `kind == Decay`.
    pub decay: Option<DecayConfig>,
    /// Designators of callbacks invoked on completion/iteration.
    pub callbacks: Vec<String>,
    /// Non-rendering metadata.
    pub metadata: AnimationMetadata,
}

impl AnimationSchema {
    /// Whether this animation repeats indefinitely.
    pub fn is_infinite(&self) -> bool {
        self.iterations < 0
    }
}
