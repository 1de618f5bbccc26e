//! Structured diagnostics export, mirroring `dashflow-streaming`'s JSON
//! export of an execution trace.

use uic_ir::Diagnostics;

use crate::error::Result;

/// Serialize `diagnostics` to pretty-printed JSON, suitable for a CLI's
/// `--diagnostics-json` output or a build log artifact.
pub fn to_json(diagnostics: &Diagnostics) -> Result<String> {
    Ok(serde_json::to_string_pretty(&diagnostics.0)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uic_ir::Diagnostic;

    #[test]
    fn exports_a_json_array_of_diagnostics() {
        let diagnostics = Diagnostics(vec![
            Diagnostic::warning("unused prop `color`"),
            Diagnostic::error("unknown widget kind `Carousel`"),
        ]);
        let json = to_json(&diagnostics).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_array());
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[0]["severity"], "warning");
        assert_eq!(parsed[1]["severity"], "error");
    }

    #[test]
    fn exports_an_empty_array_for_no_diagnostics() {
        let json = to_json(&Diagnostics(vec![])).unwrap();
        assert_eq!(json.trim(), "[]");
    }
}
