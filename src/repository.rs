//! Persistence boundary contract.
//!
//! The engine never performs I/O itself. An external repository owns review
//! items and performance windows; the session calls through this trait and
//! propagates failures unmodified.

use crate::adaptive::PerformanceWindow;
use crate::domain::ReviewItem;

/// Opaque persistence failure raised by a repository implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
  message: String,
}

impl RepositoryError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }

  pub fn message(&self) -> &str {
    &self.message
  }
}

impl std::fmt::Display for RepositoryError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "repository error: {}", self.message)
  }
}

impl std::error::Error for RepositoryError {}

/// Storage operations the session needs. Implementations may use interior
/// mutability or a connection handle; methods take `&self`.
pub trait Repository {
  fn load_review_items(&self, user_id: &str) -> Result<Vec<ReviewItem>, RepositoryError>;

  fn save_review_item(&self, item: &ReviewItem) -> Result<(), RepositoryError>;

  fn load_performance_window(
    &self,
    user_id: &str,
  ) -> Result<Option<PerformanceWindow>, RepositoryError>;

  fn save_performance_window(
    &self,
    user_id: &str,
    window: &PerformanceWindow,
  ) -> Result<(), RepositoryError>;
}

impl<T: Repository + ?Sized> Repository for &T {
  fn load_review_items(&self, user_id: &str) -> Result<Vec<ReviewItem>, RepositoryError> {
    (**self).load_review_items(user_id)
  }

  fn save_review_item(&self, item: &ReviewItem) -> Result<(), RepositoryError> {
    (**self).save_review_item(item)
  }

  fn load_performance_window(
    &self,
    user_id: &str,
  ) -> Result<Option<PerformanceWindow>, RepositoryError> {
    (**self).load_performance_window(user_id)
  }

  fn save_performance_window(
    &self,
    user_id: &str,
    window: &PerformanceWindow,
  ) -> Result<(), RepositoryError> {
    (**self).save_performance_window(user_id, window)
  }
}
