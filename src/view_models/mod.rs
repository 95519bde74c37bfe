//! Screen controllers.
//!
//! Rendering-free view models: they hold the state a screen shows (published
//! through `tokio::sync::watch` channels) and turn user intents into managed
//! repository calls followed by optimistic local updates.

pub mod auth;
pub mod comment_row;
pub mod comments;
pub mod factory;
pub mod form;
pub mod post_row;
pub mod posts;
pub mod profile;

pub use auth::{AuthViewModel, CreateAccountForm, SignInForm};
pub use comment_row::CommentRowViewModel;
pub use comments::CommentsViewModel;
pub use factory::ViewModelFactory;
pub use form::{FormAction, FormViewModel};
pub use post_row::PostRowViewModel;
pub use posts::PostsViewModel;
pub use profile::ProfileViewModel;

use crate::error::AppError;
use crate::state::Loadable;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Published `Loadable` list shared between a list controller and the
/// actions it hands out.
///
/// Once cancelled (the owning controller was dropped), fetch results and
/// local mutations are discarded.
pub(crate) struct PublishedList<T> {
    state: Arc<watch::Sender<Loadable<Vec<T>>>>,
    cancel: CancellationToken,
}

impl<T> Clone for PublishedList<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            cancel: self.cancel.clone(),
        }
    }
}

impl<T: Clone> PublishedList<T> {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(Loadable::Loading);
        Self {
            state: Arc::new(state),
            cancel: CancellationToken::new(),
        }
    }

    pub(crate) fn snapshot(&self) -> Loadable<Vec<T>> {
        self.state.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Loadable<Vec<T>>> {
        self.state.subscribe()
    }

    /// Read the loaded list, if any.
    pub(crate) fn read<R>(&self, f: impl FnOnce(Option<&Vec<T>>) -> R) -> R {
        f(self.state.borrow().value())
    }

    pub(crate) fn begin_fetch(&self) {
        if !self.cancel.is_cancelled() {
            self.state.send_replace(Loadable::Loading);
        }
    }

    pub(crate) fn finish_fetch(&self, result: Result<Vec<T>, AppError>) {
        if !self.cancel.is_cancelled() {
            self.state.send_replace(result.into());
        }
    }

    /// Mutate the list in place; no-op unless loaded.
    pub(crate) fn mutate(&self, f: impl FnOnce(&mut Vec<T>)) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.state.send_if_modified(|loadable| match loadable.value_mut() {
            Some(list) => {
                f(list);
                true
            }
            None => false,
        });
    }

    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutate_ignored_until_loaded() {
        let list: PublishedList<i32> = PublishedList::new();
        list.mutate(|items| items.push(1));
        assert!(list.snapshot().is_loading());

        list.finish_fetch(Ok(vec![2]));
        list.mutate(|items| items.insert(0, 1));
        assert_eq!(list.snapshot(), Loadable::Loaded(vec![1, 2]));
    }

    #[test]
    fn test_cancelled_list_is_frozen() {
        let list: PublishedList<i32> = PublishedList::new();
        list.finish_fetch(Ok(vec![1]));
        list.cancel();

        list.mutate(|items| items.clear());
        list.finish_fetch(Ok(vec![]));
        list.begin_fetch();
        assert_eq!(list.snapshot(), Loadable::Loaded(vec![1]));
    }
}
