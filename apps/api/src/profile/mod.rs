// Profile: category scoring, implementation plans, profile export.
// Everything here is a pure function of (catalog, responses[, templates]).

pub mod export;
pub mod handlers;
pub mod plan;
pub mod scoring;
