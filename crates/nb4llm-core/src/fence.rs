//! Fence selection for fenced blocks
//!
//! A block is closed by a line holding nothing but its fence, so the fence
//! must be longer than every run of backticks inside the block body.

/// Shortest fence ever emitted (the CommonMark minimum)
pub const MIN_FENCE_LENGTH: usize = 3;

/// Select a fence for `body` with the default minimum length.
///
/// ```
/// use nb4llm_core::fence::select_fence;
///
/// assert_eq!(select_fence("print(1)"), "```");
/// assert_eq!(select_fence("Here is code:\n```python\nx = 1\n```"), "````");
/// ```
pub fn select_fence(body: &str) -> String {
    select_fence_with_min(body, MIN_FENCE_LENGTH)
}

/// Select a fence for `body` that is at least `minimum_length` backticks long.
pub fn select_fence_with_min(body: &str, minimum_length: usize) -> String {
    "`".repeat(fence_length(body, minimum_length))
}

/// Length of the fence needed for `body`.
pub fn fence_length(body: &str, minimum_length: usize) -> usize {
    minimum_length.max(longest_backtick_run(body) + 1)
}

/// Length of the longest run of consecutive backticks in `body` (0 if none).
pub fn longest_backtick_run(body: &str) -> usize {
    let mut longest = 0;
    let mut current_run = 0;

    for c in body.chars() {
        if c == '`' {
            current_run += 1;
            longest = longest.max(current_run);
        } else {
            current_run = 0;
        }
    }

    longest
}
