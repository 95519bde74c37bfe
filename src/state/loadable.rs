//! Three-state container for asynchronously fetched values.

use crate::error::AppError;
use std::fmt;

/// State of one fetch cycle.
///
/// `Loaded` and `Error` are terminal until the next fetch resets the
/// container to `Loading`.
#[derive(Debug, Clone)]
pub enum Loadable<T, E = AppError> {
    Loading,
    Error(E),
    Loaded(T),
}

impl<T, E> Default for Loadable<T, E> {
    fn default() -> Self {
        Loadable::Loading
    }
}

impl<T: Default, E> Loadable<T, E> {
    /// Loaded with an empty value, e.g. an empty list.
    pub fn empty() -> Self {
        Loadable::Loaded(T::default())
    }
}

impl<T, E> Loadable<T, E> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Loadable::Loaded(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// In-place access, only while loaded.
    pub fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// Replace the loaded value.
    ///
    /// No-op when `value` is `None` or when the container is not loaded, so a
    /// local write cannot overtake a fetch that is still in flight.
    pub fn set_value(&mut self, value: Option<T>) {
        if let (Some(value), Loadable::Loaded(current)) = (value, &mut *self) {
            *current = value;
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Loadable::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Start a new fetch cycle.
    pub fn reset(&mut self) {
        *self = Loadable::Loading;
    }
}

impl<T, E> From<Result<T, E>> for Loadable<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Loadable::Loaded(value),
            Err(error) => Loadable::Error(error),
        }
    }
}

/// Errors compare by message; values compare structurally.
impl<T: PartialEq, E: fmt::Display> PartialEq for Loadable<T, E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Loadable::Loading, Loadable::Loading) => true,
            (Loadable::Error(a), Loadable::Error(b)) => a.to_string() == b.to_string(),
            (Loadable::Loaded(a), Loadable::Loaded(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_none_leaves_loaded_unchanged() {
        let mut loadable: Loadable<Vec<i32>> = Loadable::Loaded(vec![1, 2]);
        loadable.set_value(None);
        assert_eq!(loadable, Loadable::Loaded(vec![1, 2]));
    }

    #[test]
    fn test_setting_while_loading_is_noop() {
        let mut loadable: Loadable<Vec<i32>> = Loadable::Loading;
        loadable.set_value(Some(vec![3]));
        assert!(loadable.is_loading());
        assert!(loadable.value_mut().is_none());
    }

    #[test]
    fn test_setting_while_error_is_noop() {
        let mut loadable: Loadable<Vec<i32>> =
            Loadable::Error(AppError::Store("offline".to_string()));
        loadable.set_value(Some(vec![3]));
        assert!(loadable.error().is_some());
    }

    #[test]
    fn test_setting_while_loaded_replaces() {
        let mut loadable: Loadable<Vec<i32>> = Loadable::empty();
        loadable.set_value(Some(vec![7]));
        assert_eq!(loadable.value(), Some(&vec![7]));

        if let Some(values) = loadable.value_mut() {
            values.insert(0, 6);
        }
        assert_eq!(loadable, Loadable::Loaded(vec![6, 7]));
    }

    #[test]
    fn test_errors_compare_by_message() {
        let a: Loadable<Vec<i32>> = Loadable::Error(AppError::Store("boom".to_string()));
        let b: Loadable<Vec<i32>> = Loadable::Error(AppError::Store("boom".to_string()));
        let c: Loadable<Vec<i32>> = Loadable::Error(AppError::Blob("boom".to_string()));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Loadable::Loading);
    }

    #[test]
    fn test_from_result_and_reset() {
        let mut loadable: Loadable<u8> = Ok(1).into();
        assert!(loadable.is_loaded());
        loadable.reset();
        assert_eq!(loadable, Loadable::Loading);

        let failed: Loadable<u8> = Err(AppError::Store("x".to_string())).into();
        assert!(failed.error().unwrap().is_store_error());
    }
}
