//! Trainer configuration constants and loading.
//!
//! This module centralizes all tunable values. Embedders can override them
//! through `config.toml` or environment variables; defaults match the
//! values the product ships with.

use serde::Deserialize;

// ==================== Adaptive Difficulty ====================

/// Ring-buffer capacity of the per-user performance window
pub const DEFAULT_WINDOW_SIZE: usize = 20;

/// Minimum recorded outcomes before the tier may move
pub const DEFAULT_MIN_SAMPLES: usize = 5;

/// Rolling accuracy at or above which the tier escalates
pub const DEFAULT_ESCALATE_THRESHOLD: f64 = 0.85;

/// Rolling accuracy at or below which the tier de-escalates
pub const DEFAULT_DEESCALATE_THRESHOLD: f64 = 0.5;

/// Weight multiplier the content provider applies to the emphasized category
pub const DEFAULT_EMPHASIS_WEIGHT: f64 = 2.0;

// ==================== Session ====================

/// Retries after an unknown-verb candidate before giving up on the provider
pub const DEFAULT_MAX_CANDIDATE_RETRIES: u32 = 3;

/// Answers slower than this are "correct but slow" (quality 4 instead of 5)
pub const DEFAULT_FAST_RESPONSE_MS: i64 = 8_000;

/// Due items considered per present_next call
pub const DEFAULT_DUE_PAGE_LIMIT: usize = 50;

/// All trainer tunables in one place, injected into the session and the
/// difficulty controller.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub window_size: usize,
    pub min_samples: usize,
    pub escalate_threshold: f64,
    pub deescalate_threshold: f64,
    pub emphasis_weight: f64,
    pub max_candidate_retries: u32,
    pub fast_response_ms: i64,
    pub due_page_limit: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            min_samples: DEFAULT_MIN_SAMPLES,
            escalate_threshold: DEFAULT_ESCALATE_THRESHOLD,
            deescalate_threshold: DEFAULT_DEESCALATE_THRESHOLD,
            emphasis_weight: DEFAULT_EMPHASIS_WEIGHT,
            max_candidate_retries: DEFAULT_MAX_CANDIDATE_RETRIES,
            fast_response_ms: DEFAULT_FAST_RESPONSE_MS,
            due_page_limit: DEFAULT_DUE_PAGE_LIMIT,
        }
    }
}

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
    trainer: Option<TrainerConfig>,
}

/// Load trainer configuration with priority: config.toml > env > defaults
pub fn load_trainer_config() -> TrainerConfig {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Priority 1: config.toml [trainer] section
    if let Ok(contents) = std::fs::read_to_string("config.toml") {
        if let Ok(config) = toml::from_str::<AppConfig>(&contents) {
            if let Some(trainer) = config.trainer {
                tracing::info!("Using trainer config from config.toml");
                return trainer;
            }
        }
    }

    // Priority 2: individual environment overrides on top of defaults
    let mut config = TrainerConfig::default();
    if let Ok(size) = std::env::var("SUBJUNTIVO_WINDOW_SIZE") {
        if let Ok(parsed) = size.parse::<usize>() {
            tracing::info!("Using window size from SUBJUNTIVO_WINDOW_SIZE: {}", parsed);
            config.window_size = parsed;
        }
    }
    if let Ok(ms) = std::env::var("SUBJUNTIVO_FAST_RESPONSE_MS") {
        if let Ok(parsed) = ms.parse::<i64>() {
            tracing::info!("Using fast-response cutoff from SUBJUNTIVO_FAST_RESPONSE_MS: {}", parsed);
            config.fast_response_ms = parsed;
        }
    }

    config
}
