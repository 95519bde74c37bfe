//! Repositories - data operations against the injected stores.
//!
//! Each repository is built for one acting user, which is also the
//! authorization context for deletes.

pub mod comments;
pub mod posts;

pub use comments::CommentsRepository;
pub use posts::{PostFilter, PostsRepository};
