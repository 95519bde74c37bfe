//! Factory for the controllers shown once a user is signed in.

use crate::models::{Post, User};
use crate::repositories::{CommentsRepository, PostFilter, PostsRepository};
use crate::services::AuthService;
use crate::view_models::{CommentsViewModel, PostsViewModel, ProfileViewModel};
use crate::AppState;
use std::sync::Arc;

/// Builds signed-in controllers with their repositories bound to `user`.
#[derive(Clone)]
pub struct ViewModelFactory {
    user: User,
    state: AppState,
    auth: AuthService,
}

impl ViewModelFactory {
    pub fn new(user: User, state: AppState, auth: AuthService) -> Self {
        Self { user, state, auth }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn make_posts_view_model(&self, filter: PostFilter) -> PostsViewModel {
        let repository = PostsRepository::new(
            self.user.clone(),
            self.state.documents.clone(),
            Arc::clone(&self.state.blobs),
        );
        PostsViewModel::new(filter, repository)
    }

    pub fn make_comments_view_model(&self, post: Post) -> CommentsViewModel {
        let repository =
            CommentsRepository::new(self.user.clone(), post, self.state.documents.clone());
        CommentsViewModel::new(repository)
    }

    pub fn make_profile_view_model(&self) -> ProfileViewModel {
        ProfileViewModel::new(&self.user, self.auth.clone())
    }
}
