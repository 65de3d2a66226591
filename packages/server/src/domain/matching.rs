//! Solution-match detection.
//!
//! This module contains pure functions that implement the match heuristic
//! without side effects, making them easy to test.

/// Normalize code for comparison: remove all whitespace, unify single
/// quotes to double quotes, and strip backslash characters.
///
/// This is a character-level heuristic, not a semantic code comparison:
/// semantically-equivalent-but-textually-different code may miss, and
/// structurally different code may collide. Accepted by design.
pub fn normalize_code(code: &str) -> String {
    code.chars()
        .filter(|c| !c.is_whitespace() && *c != '\\')
        .map(|c| if c == '\'' { '"' } else { c })
        .collect()
}

/// Check whether the current code matches the reference solution under
/// [`normalize_code`].
pub fn codes_match(current_code: &str, solution: &str) -> bool {
    normalize_code(current_code) == normalize_code(solution)
}
