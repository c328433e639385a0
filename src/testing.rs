//! Test doubles for the repository and content-provider boundaries.
//!
//! Provides in-memory implementations used by the session tests and useful
//! to embedders writing their own integration tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use crate::adaptive::PerformanceWindow;
use crate::analysis::ErrorCategory;
use crate::content::{ContentProvider, ExerciseCandidate};
use crate::domain::{DifficultyTier, ItemKey, Person, ReviewItem, Tense};
use crate::repository::{Repository, RepositoryError};

/// In-memory repository. Saves can be toggled to fail for error-path tests.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    items: RefCell<HashMap<ItemKey, ReviewItem>>,
    windows: RefCell<HashMap<String, PerformanceWindow>>,
    fail_saves: Cell<bool>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<ReviewItem>) -> Self {
        let repo = Self::default();
        {
            let mut map = repo.items.borrow_mut();
            for item in items {
                map.insert(item.key(), item);
            }
        }
        repo
    }

    /// Make every save fail with a repository error until reset.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    pub fn saved_item(&self, key: &ItemKey) -> Option<ReviewItem> {
        self.items.borrow().get(key).cloned()
    }

    pub fn saved_window(&self, user_id: &str) -> Option<PerformanceWindow> {
        self.windows.borrow().get(user_id).cloned()
    }

    pub fn item_count(&self) -> usize {
        self.items.borrow().len()
    }
}

impl Repository for InMemoryRepository {
    fn load_review_items(&self, user_id: &str) -> Result<Vec<ReviewItem>, RepositoryError> {
        Ok(self
            .items
            .borrow()
            .values()
            .filter(|item| item.user_id == user_id)
            .cloned()
            .collect())
    }

    fn save_review_item(&self, item: &ReviewItem) -> Result<(), RepositoryError> {
        if self.fail_saves.get() {
            return Err(RepositoryError::new("simulated save failure"));
        }
        self.items.borrow_mut().insert(item.key(), item.clone());
        Ok(())
    }

    fn load_performance_window(
        &self,
        user_id: &str,
    ) -> Result<Option<PerformanceWindow>, RepositoryError> {
        Ok(self.windows.borrow().get(user_id).cloned())
    }

    fn save_performance_window(
        &self,
        user_id: &str,
        window: &PerformanceWindow,
    ) -> Result<(), RepositoryError> {
        if self.fail_saves.get() {
            return Err(RepositoryError::new("simulated save failure"));
        }
        self.windows
            .borrow_mut()
            .insert(user_id.to_string(), window.clone());
        Ok(())
    }
}

/// Content provider that serves a scripted queue of candidates.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    candidates: VecDeque<ExerciseCandidate>,
    templates: HashMap<(String, Tense, Person), String>,
    /// Difficulty values the session actually requested, for assertions.
    pub requested: Vec<(DifficultyTier, Option<ErrorCategory>)>,
}

impl ScriptedProvider {
    pub fn new(candidates: Vec<ExerciseCandidate>) -> Self {
        Self {
            candidates: candidates.into(),
            templates: HashMap::new(),
            requested: Vec::new(),
        }
    }

    pub fn with_template(
        mut self,
        infinitive: &str,
        tense: Tense,
        person: Person,
        template: &str,
    ) -> Self {
        self.templates.insert(
            (infinitive.to_string(), tense, person),
            template.to_string(),
        );
        self
    }

    pub fn remaining(&self) -> usize {
        self.candidates.len()
    }
}

impl ContentProvider for ScriptedProvider {
    fn next_exercise_candidate(
        &mut self,
        difficulty: DifficultyTier,
        emphasis: Option<ErrorCategory>,
    ) -> Option<ExerciseCandidate> {
        self.requested.push((difficulty, emphasis));
        self.candidates.pop_front()
    }

    fn template_for(&self, infinitive: &str, tense: Tense, person: Person) -> Option<String> {
        self.templates
            .get(&(infinitive.to_string(), tense, person))
            .cloned()
    }
}

/// Shorthand for building an exercise candidate in tests.
pub fn candidate(infinitive: &str, tense: Tense, person: Person, template: &str) -> ExerciseCandidate {
    ExerciseCandidate {
        infinitive: infinitive.to_string(),
        tense,
        person,
        sentence_template: template.to_string(),
    }
}
