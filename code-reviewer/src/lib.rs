//! Review-generation core.
//!
//! Flow of one review, each step in its own module:
//!
//! 1. [`target`]  : GitHub URL → owner / repo / PR number
//! 2. [`select`]  : which files to look at (PR files, explicit list or capped tree walk)
//! 3. [`fetch`]   : bytes → text or placeholder, per file, never failing the batch
//! 4. [`prompt`]  : files + settings → one deterministic prompt
//! 5. completion : live provider, or the synthetic [`mock`] strategy
//! 6. [`parser`]  : completion text → [`report::ReviewReport`], degrading on garbage
//!
//! [`pipeline::ReviewPipeline`] runs the steps in order. [`conversation`]
//! turns chat messages into pipeline requests and [`markdown`] renders the
//! result.
//!
//! Collaborators are injected through the traits in [`provider`]; they use
//! native `async fn` in traits, no `async-trait` and no boxed trait objects.

pub mod completion;
pub mod conversation;
pub mod errors;
pub mod fetch;
pub mod markdown;
pub mod mock;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod report;
pub mod select;
pub mod target;

#[cfg(test)]
mod testing;

pub use errors::{Error, RepositoryError, ReviewResult};
pub use pipeline::{CompletionMode, ReviewPipeline};
pub use report::{ReviewReport, ReviewSettings};
