// Templates: catalog sources, per-template matching, ranked recommendations.

pub mod handlers;
pub mod matching;
pub mod models;
pub mod ranking;
pub mod source;
