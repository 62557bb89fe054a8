//! Shared types for the Keel project store.

mod context;
mod decision;
mod objective;
mod project;
mod tag;
mod timestamp;

pub use context::*;
pub use decision::*;
pub use objective::*;
pub use project::*;
pub use tag::*;
pub use timestamp::*;
