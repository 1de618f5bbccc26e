//! Golden-file snapshot testing for IR documents and other `Serialize`
//! values, wrapping `insta` (§1.4 "`golden_ir!` snapshot-test helper").

/// Assert that `$value` matches its stored snapshot, creating one on first
/// run. Forwards straight to `insta::assert_json_snapshot!` so canonical
/// JSON diffs read the same as the wire format (§6).
#[macro_export]
macro_rules! golden_ir {
    ($value:expr) => {
        insta::assert_json_snapshot!($value);
    };
    ($name:expr, $value:expr) => {
        insta::assert_json_snapshot!($name, $value);
    };
}
