// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod comment;
pub mod favorite;
pub mod post;
pub mod user;

pub use comment::Comment;
pub use favorite::Favorite;
pub use post::Post;
pub use user::User;
