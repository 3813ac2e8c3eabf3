// Questionnaire: configuration document, question catalog, per-session response store.
// The catalog is immutable after startup; stores live in the session registry.

pub mod catalog;
pub mod handlers;
pub mod models;
pub mod responses;
