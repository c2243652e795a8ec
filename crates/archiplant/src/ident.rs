//! Injective mapping of model ids onto restricted identifier alphabets.
//!
//! Characters accepted by `keep` pass through. An underscore becomes `__` and
//! every other character becomes one `_xHH_` per UTF-8 byte. These codewords
//! are prefix-free, so two distinct ids never share an escaped form, and an
//! escaped id never contains `_` followed by anything but `_` or `x`. Callers
//! rely on the latter to build derived identifiers that cannot clash with an
//! escaped id, such as `{owner}_note_1`.

use std::fmt::Write;

pub fn escape(id: &str, keep: impl Fn(char) -> bool) -> String {
    let mut escaped = String::with_capacity(id.len());
    for c in id.chars() {
        if c == '_' {
            escaped.push_str("__");
        } else if keep(c) {
            escaped.push(c);
        } else {
            let mut buf = [0; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                let _ = write!(escaped, "_x{byte:02X}_");
            }
        }
    }
    escaped
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn distinct_ids_stay_distinct(a in "[a-z_.x -]{0,8}", b in "[a-z_.x -]{0,8}") {
            prop_assume!(a != b);
            let keep = |c: char| c.is_ascii_alphanumeric();
            prop_assert_ne!(escape(&a, keep), escape(&b, keep));
        }
    }
}
