//! Emitter optimization flags (§4.2 invariant 4).
//!
//! Every flag is independently optional; turning all of them off must still
//! produce valid, if less polished, source.

/// Optimization flags governing JSX/TS emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitOptions {
    /// Strip `console.log(...)` debug-marker call sites from handler bodies.
    pub strip_debug: bool,
    /// Emit components as `const Name = () => { ... }` rather than
    /// `function Name() { ... }`.
    pub const_qualify: bool,
    /// Merge same-module imports into a single `import { ... } from '...'`
    /// statement rather than one statement per symbol.
    pub dedupe_imports: bool,
    /// Pretty-print with stable indentation rather than emitting compact,
    /// minimally-spaced source.
    pub format: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            strip_debug: true,
            const_qualify: true,
            dedupe_imports: true,
            format: true,
        }
    }
}
