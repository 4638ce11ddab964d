//! Rewrite `import.meta.env.NAME` references so that a Vite build can take its
//! environment values at deploy time.
//!
//! The matcher works on raw text, not a syntax tree. Aliased accessors
//! (`const env = import.meta.env`), computed access (`import.meta.env[key]`) and
//! declaration blocks with nested braces are not recognized.

pub mod cli;
pub mod config;
pub mod declarations;
pub mod edit;
pub mod files;
pub mod filter;
pub mod inject;
pub mod pattern;
pub mod rewrite;
pub mod session;
pub mod ui;

pub use session::{BuildSession, DisabledReason, SessionOptions};
