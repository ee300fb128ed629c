//! Matching layer: documents, the frozen artifact, its persistence and the
//! ranking queries served from it.
pub mod artifact;
pub mod builder;
pub mod document;
pub mod persist;
pub mod ranking;
pub mod rescore;
pub mod store;
