//! EGRET: given a regular expression, generates a set of test strings
//! intended to probe the regex implementation's handling of boundary
//! conditions, backreferences, and quantifier edge cases.
//!
//! The pipeline is: [`scanner`] → [`parse_tree`] → [`nfa`] → [`path`] →
//! [`generator`], wired together by [`engine::run_engine`].

pub mod ast;
pub mod charclass;
pub mod engine;
pub mod error;
pub mod generator;
pub mod loop_model;
pub mod nfa;
pub mod parse_tree;
pub mod path;
pub mod scanner;
pub mod stats;
pub mod token;
pub mod warnings;

/// 1-based capturing-group index, assigned left-to-right by opening
/// parenthesis.
pub type GroupId = u32;

/// 0-based quantified-node index, assigned left-to-right by the
/// quantifier's position in the regex.
pub type LoopId = u32;

/// Index into [`nfa::NFA`]'s state arena.
pub type StateId = usize;

/// Index into [`nfa::NFA`]'s transition arena.
pub type TransId = usize;

pub use engine::run_engine;
