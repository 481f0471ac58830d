//! Small hand-rolled Unicode property tables this crate's dependency stack
//! doesn't already expose (§6: "Unicode property provider"), scoped to
//! exactly what the itemizer, hyphenator, and shaper need.

pub mod format_chars;
pub mod joining_type;
pub mod nfd;
