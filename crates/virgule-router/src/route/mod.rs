//! Route pattern compilation.
//!
//! [`segment`] classifies individual directory names; [`compile`] folds a
//! whole directory path into a [`compile::CompiledPattern`].

pub mod compile;
pub mod segment;

pub use compile::{
    compile_pattern, priority_of, render_pattern, CompiledPattern, ParamInfo,
    PRIORITY_CATCH_ALL, PRIORITY_DYNAMIC, PRIORITY_STATIC,
};
pub use segment::{classify_segment, is_convention_token, is_group_segment, Segment};
