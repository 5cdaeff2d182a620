// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod allocator;
mod dedup;
mod normalize;
mod transitions;

#[cfg(test)]
mod tests;

pub use allocator::BatchAllocator;
pub use dedup::{
    DuplicateReport, ResolutionMode, candidate_identifiers, classify, is_duplicate,
    requires_confirmation,
};
pub use normalize::{NormalizeContext, normalize_batch, normalize_draft};
pub use transitions::{StatusTransition, detect_transition};
