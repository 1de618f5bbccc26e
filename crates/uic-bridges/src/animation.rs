//! Animation bridge (§4.3 "Animation").
//!
//! Maps `AnimationSchema` entries to a dialect-neutral emission plan: a
//! declarative binding on the JSX side, an animation-controller descriptor
//! on the Dart side. Easing tag mapping is total — every tag resolves in
//! both dialects (§4.3).

use uic_ir::{AnimationKind, AnimationSchema, Easing, SourceLanguage};

use crate::error::{BridgeError, Result};

/// The emission shape for one `AnimationSchema` entry.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationEmission {
    /// A declarative timing/spring/decay binding on a motion-capable
    /// component (JSX side).
    DeclarativeBinding {
        /// Animation id.
        id: String,
        /// Easing token resolved for this dialect.
        easing_token: String,
    },
    /// An animation controller driven by an analogous curve (Dart side).
    ControllerWithCurve {
        /// Animation id.
        id: String,
        /// Curve token resolved for this dialect.
        curve_token: String,
    },
}

/// Resolve an `Easing` tag to the token each dialect's animation library
/// uses for it. Total over every `Easing` variant.
pub fn easing_token(easing: &Easing, dialect: SourceLanguage) -> String {
    match (easing, dialect) {
        (Easing::Linear, SourceLanguage::JsxTs) => "Easing.linear".to_string(),
        (Easing::Linear, SourceLanguage::Dart) => "Curves.linear".to_string(),
        (Easing::Ease, SourceLanguage::JsxTs) => "Easing.ease".to_string(),
        (Easing::Ease, SourceLanguage::Dart) => "Curves.ease".to_string(),
        (Easing::EaseIn, SourceLanguage::JsxTs) => "Easing.in".to_string(),
        (Easing::EaseIn, SourceLanguage::Dart) => "Curves.easeIn".to_string(),
        (Easing::EaseOut, SourceLanguage::JsxTs) => "Easing.out".to_string(),
        (Easing::EaseOut, SourceLanguage::Dart) => "Curves.easeOut".to_string(),
        (Easing::EaseInOut, SourceLanguage::JsxTs) => "Easing.inOut".to_string(),
        (Easing::EaseInOut, SourceLanguage::Dart) => "Curves.easeInOut".to_string(),
        (Easing::Spring, SourceLanguage::JsxTs) => "Easing.elastic(1)".to_string(),
        (Easing::Spring, SourceLanguage::Dart) => "Curves.elasticOut".to_string(),
        (Easing::Bounce, SourceLanguage::JsxTs) => "Easing.bounce".to_string(),
        (Easing::Bounce, SourceLanguage::Dart) => "Curves.bounceOut".to_string(),
        (Easing::Elastic, SourceLanguage::JsxTs) => "Easing.elastic(2)".to_string(),
        (Easing::Elastic, SourceLanguage::Dart) => "Curves.elasticInOut".to_string(),
        (Easing::CubicBezier { x1, y1, x2, y2 }, SourceLanguage::JsxTs) => {
            format!("Easing.bezier({x1}, {y1}, {x2}, {y2})")
        }
        (Easing::CubicBezier { x1, y1, x2, y2 }, SourceLanguage::Dart) => {
            format!("Cubic({x1}, {y1}, {x2}, {y2})")
        }
    }
}

/// Build the emission plan for one animation. Returns an error if `kind`
/// claims a physics model the schema doesn't carry a matching config for.
pub fn emit_animation(
    animation: &AnimationSchema,
    dialect: SourceLanguage,
) -> Result<AnimationEmission> {
    if animation.kind == AnimationKind::Spring && animation.spring.is_none() {
        return Err(BridgeError::InconsistentAnimationConfig {
            id: animation.id.clone(),
            kind: animation.kind,
        });
    }
    if animation.kind == AnimationKind::Decay && animation.decay.is_none() {
        return Err(BridgeError::InconsistentAnimationConfig {
            id: animation.id.clone(),
            kind: animation.kind,
        });
    }

    Ok(match dialect {
        SourceLanguage::JsxTs => AnimationEmission::DeclarativeBinding {
            id: animation.id.clone(),
            easing_token: easing_token(&animation.easing, dialect),
        },
        SourceLanguage::Dart => AnimationEmission::ControllerWithCurve {
            id: animation.id.clone(),
            curve_token: easing_token(&animation.easing, dialect),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uic_ir::AnimationMetadata;

    fn timing_animation() -> AnimationSchema {
        AnimationSchema {
            id: "fade-in".into(),
            kind: AnimationKind::Timing,
            duration_ms: 300,
            delay_ms: None,
            easing: Easing::EaseInOut,
            properties: vec![],
            iterations: 1,
            spring: None,
            decay: None,
            callbacks: vec![],
            metadata: AnimationMetadata::default(),
        }
    }

    #[test]
    fn cubic_bezier_preserves_parameters_in_both_dialects() {
        let easing = Easing::CubicBezier {
            x1: 0.1,
            y1: 0.2,
            x2: 0.3,
            y2: 0.4,
        };
        assert_eq!(
            easing_token(&easing, SourceLanguage::JsxTs),
            "Easing.bezier(0.1, 0.2, 0.3, 0.4)"
        );
        assert_eq!(
            easing_token(&easing, SourceLanguage::Dart),
            "Cubic(0.1, 0.2, 0.3, 0.4)"
        );
    }

    #[test]
    fn emits_declarative_binding_for_jsx() {
        let emission = emit_animation(&timing_animation(), SourceLanguage::JsxTs).unwrap();
        assert!(matches!(
            emission,
            AnimationEmission::DeclarativeBinding { .. }
        ));
    }

    #[test]
    fn spring_kind_without_config_is_an_error() {
        let mut animation = timing_animation();
        animation.kind = AnimationKind::Spring;
        let err = emit_animation(&animation, SourceLanguage::Dart).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::InconsistentAnimationConfig { .. }
        ));
    }
}
