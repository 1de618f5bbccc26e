//! Thin composition of the front-ends, back-ends, bundler, and delta engine
//! behind one entry point per pipeline stage (§2, §4.1-§4.5).

use uic_ir::{Diagnostics, Ir, SourceLanguage};

use crate::error::Result;

/// Lower `source` (written in `from`) into the shared IR.
#[tracing::instrument(skip(source))]
pub fn lower(source: &str, path: &str, from: SourceLanguage, generated_at: &str) -> Result<(Ir, Diagnostics)> {
    match from {
        SourceLanguage::JsxTs => Ok(uic_frontend_jsx::lower_source(source, path, generated_at)?),
        SourceLanguage::Dart => Ok(uic_frontend_dart::lower_source(source, path, generated_at)?),
    }
}

/// Emit `ir` as idiomatic source in `to`, using that dialect's default
/// emission options.
#[tracing::instrument(skip(ir))]
pub fn emit(ir: &Ir, to: SourceLanguage) -> Result<String> {
    match to {
        SourceLanguage::JsxTs => Ok(uic_backend_jsx::emit_source(
            ir,
            &uic_backend_jsx::EmitOptions::default(),
        )?),
        SourceLanguage::Dart => Ok(uic_backend_dart::emit_source(
            ir,
            &uic_backend_dart::EmitOptions::default(),
        )?),
    }
}

/// The dialect opposite to `dialect`.
pub fn opposite(dialect: SourceLanguage) -> SourceLanguage {
    match dialect {
        SourceLanguage::JsxTs => SourceLanguage::Dart,
        SourceLanguage::Dart => SourceLanguage::JsxTs,
    }
}

/// Translate `source` (written in `from`) into its opposite dialect,
/// returning the emitted source plus any diagnostics raised while lowering.
#[tracing::instrument(skip(source))]
pub fn translate(source: &str, path: &str, from: SourceLanguage, generated_at: &str) -> Result<(String, Diagnostics)> {
    let (ir, diagnostics) = lower(source, path, from, generated_at)?;
    let emitted = emit(&ir, opposite(from))?;
    Ok((emitted, diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_JSX: &str =
        r#"function Greeting(){ return <View><Text text="Hello"/></View>; }"#;

    #[test]
    fn translating_jsx_yields_dart_source() {
        let (dart, diagnostics) = translate(
            SAMPLE_JSX,
            "greeting.tsx",
            SourceLanguage::JsxTs,
            "2026-01-01T00:00:00Z",
        )
        .unwrap();
        assert!(!dart.is_empty());
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn opposite_is_its_own_inverse() {
        assert_eq!(opposite(opposite(SourceLanguage::JsxTs)), SourceLanguage::JsxTs);
        assert_eq!(opposite(opposite(SourceLanguage::Dart)), SourceLanguage::Dart);
    }

    const COUNTER_JSX: &str = "function Counter(){ const [c,setC]=useState(0); return <View><Text text={c}/><Button title=\"+\" onPress={()=>setC(c+1)}/></View>; }";

    /// §4.2 invariant 1, "Round-trip fidelity for the core subset": lowering
    /// a component to IR, emitting it in the opposite dialect, and lowering
    /// that emission again must reproduce the original IR. Uses the same
    /// `path` on both lowers so the two IRs mint identical node ids (§4.1
    /// "Determinism" salts ids off the path string, not the dialect).
    #[test]
    fn core_subset_round_trips_through_the_opposite_dialect_and_back() {
        let (jsx_ir, jsx_diagnostics) =
            lower(COUNTER_JSX, "Counter", SourceLanguage::JsxTs, "2026-01-01T00:00:00Z").unwrap();
        assert!(!jsx_diagnostics.has_errors());

        let dart_src = emit(&jsx_ir, SourceLanguage::Dart).unwrap();
        let (dart_ir, dart_diagnostics) =
            lower(&dart_src, "Counter", SourceLanguage::Dart, "2026-01-01T00:00:00Z").unwrap();
        assert!(!dart_diagnostics.has_errors());

        // The two IRs were lowered from different dialects, so their own
        // dialect bookkeeping legitimately differs; neutralize it before
        // checking that everything else survived the round trip.
        let mut a = jsx_ir.clone();
        let mut b = dart_ir.clone();
        a.metadata.source_dialect = SourceLanguage::Dart;
        a.metadata.type_definitions.clear();
        b.metadata.type_definitions.clear();

        assert!(uic_ir::canonical::equals_modulo_spans(&a, &b).unwrap());
    }
}
