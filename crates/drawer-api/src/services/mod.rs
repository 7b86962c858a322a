//! Request-scoped services shared through application state.

pub mod ghost;

pub use ghost::GhostFeed;
