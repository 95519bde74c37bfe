//! Feed controller: holds the posts shown for one filter.

use crate::error::AppError;
use crate::models::Post;
use crate::repositories::{PostFilter, PostsRepository};
use crate::state::{AsyncAction, Loadable};
use crate::view_models::{FormAction, FormViewModel, PostRowViewModel, PublishedList};
use futures_util::FutureExt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use validator::Validate;

pub struct PostsViewModel {
    filter: PostFilter,
    feed: PostsFeed,
}

impl PostsViewModel {
    pub fn new(filter: PostFilter, repository: PostsRepository) -> Self {
        Self {
            filter,
            feed: PostsFeed {
                repository: Arc::new(repository),
                posts: PublishedList::new(),
            },
        }
    }

    pub fn filter(&self) -> &PostFilter {
        &self.filter
    }

    pub fn title(&self) -> String {
        self.filter.title()
    }

    /// Current list state.
    pub fn posts(&self) -> Loadable<Vec<Post>> {
        self.feed.posts.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Loadable<Vec<Post>>> {
        self.feed.posts.subscribe()
    }

    /// Reload the feed; the list reads `Loading` until the fetch settles.
    pub fn fetch_posts(&self) -> JoinHandle<()> {
        self.feed.posts.begin_fetch();
        let feed = self.feed.clone();
        let filter = self.filter.clone();
        tokio::spawn(async move {
            let result = feed.repository.fetch(&filter).await;
            if let Err(e) = &result {
                tracing::error!(filter = %filter.title(), error = %e, "Cannot fetch posts");
            }
            feed.posts.finish_fetch(result);
        })
    }

    /// Row controller for `post`, with a delete action only when allowed.
    pub fn make_post_row_view_model(&self, post: Post) -> PostRowViewModel {
        let delete_action: Option<AsyncAction> =
            self.feed.repository.can_delete(&post).then(|| {
                let feed = self.feed.clone();
                let post = post.clone();
                Arc::new(move || {
                    let feed = feed.clone();
                    let post = post.clone();
                    async move { feed.delete(&post).await }.boxed()
                }) as AsyncAction
            });

        let favorite_action: AsyncAction = {
            let feed = self.feed.clone();
            let post = post.clone();
            Arc::new(move || {
                let feed = feed.clone();
                let post = post.clone();
                async move { feed.toggle_favorite(&post).await }.boxed()
            })
        };

        PostRowViewModel::new(post, delete_action, favorite_action)
    }

    /// Form for a new post by the acting user.
    pub fn make_new_post_view_model(&self) -> FormViewModel<Post> {
        let author = self.feed.repository.user().clone();
        let feed = self.feed.clone();
        let action: FormAction<Post> = Arc::new(move |post| {
            let feed = feed.clone();
            async move { feed.create(post).await }.boxed()
        });
        FormViewModel::new(Post::new("", "", author), action)
    }
}

impl Drop for PostsViewModel {
    fn drop(&mut self) {
        self.feed.posts.cancel();
    }
}

/// Repository plus published list, shared with the actions handed out.
#[derive(Clone)]
struct PostsFeed {
    repository: Arc<PostsRepository>,
    posts: PublishedList<Post>,
}

impl PostsFeed {
    async fn create(&self, post: Post) -> Result<(), AppError> {
        post.validate()?;
        let stored = self.repository.create(post).await?;
        self.posts.mutate(|posts| posts.insert(0, stored));
        Ok(())
    }

    async fn delete(&self, post: &Post) -> Result<(), AppError> {
        self.repository.delete(post).await?;
        self.posts.mutate(|posts| posts.retain(|p| p.id != post.id));
        Ok(())
    }

    /// Flip the favorite state, starting from the list's current value.
    async fn toggle_favorite(&self, post: &Post) -> Result<(), AppError> {
        let is_favorite = self.posts.read(|posts| {
            posts
                .and_then(|posts| posts.iter().find(|p| p.id == post.id))
                .map_or(post.is_favorite, |p| p.is_favorite)
        });
        let new_value = !is_favorite;

        self.repository.toggle_favorite(new_value, post).await?;
        self.posts.mutate(|posts| {
            if let Some(p) = posts.iter_mut().find(|p| p.id == post.id) {
                p.is_favorite = new_value;
            }
        });
        Ok(())
    }
}
