//! Application state: the immutable catalog, the optional editorial plan,
//! and per-process caches of results that never change once computed.
//!
//! The catalog is built once here and only ever borrowed afterwards.
//! Caches are an optimization; the engine is pure and recomputes the same
//! answer on a miss.

use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use crate::catalog::StreetCatalog;
use crate::config::{load_game_config_from_env, GameConfig};
use crate::domain::{QuizPlanBook, StreetRecord};
use crate::engine::{self, DailyQuiz};
use crate::hints::generate_hints;
use crate::seeds::seed_catalog;

/// Days either side of today whose quizzes are kept in memory. Other dates
/// are computed on every request.
pub const DAILY_CACHE_WINDOW_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<StreetCatalog>,
    pub plans: Option<Arc<QuizPlanBook>>,
    pub daily_cache: Arc<RwLock<HashMap<NaiveDate, DailyQuiz>>>,
    pub hint_cache: Arc<RwLock<HashMap<String, Vec<StreetRecord>>>>,
    pub config: GameConfig,
}

impl AppState {
    /// Build state from env: load config, catalog (or built-in seeds) and plan.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let config = load_game_config_from_env();

        let catalog = match StreetCatalog::from_path(&config.catalog_path) {
            Ok(c) => c,
            Err(e) => {
                error!(target: "carrers_backend", path = %config.catalog_path, error = %e, "Catalog unavailable; using built-in seed streets");
                seed_catalog()
            }
        };

        let plans = config.quiz_plan_path.as_ref().and_then(|path| match QuizPlanBook::from_path(path) {
            Ok(book) => Some(book),
            Err(e) => {
                warn!(target: "carrers_backend", %path, error = %e, "Quiz plan unavailable; algorithmic days only");
                None
            }
        });

        let mut by_tier = [0usize; 5];
        for s in catalog.iter() {
            by_tier[usize::from(s.tier.min(4))] += 1;
        }
        info!(
            target: "catalog",
            streets = catalog.len(),
            tier1 = by_tier[1], tier2 = by_tier[2], tier3 = by_tier[3], tier4 = by_tier[4], unranked = by_tier[0],
            "Startup catalog inventory"
        );

        Self::from_parts(catalog, plans, config)
    }

    pub fn from_parts(catalog: StreetCatalog, plans: Option<QuizPlanBook>, config: GameConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            plans: plans.map(Arc::new),
            daily_cache: Arc::new(RwLock::new(HashMap::new())),
            hint_cache: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// "Today" as the server sees it. The engine itself never reads the clock.
    pub fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    /// The day's streets. Dates near today are computed once; the cache
    /// never holds more than the window around today.
    #[instrument(level = "debug", skip(self))]
    pub async fn daily(&self, date: NaiveDate) -> DailyQuiz {
        self.daily_around(date, self.today()).await
    }

    async fn daily_around(&self, date: NaiveDate, today: NaiveDate) -> DailyQuiz {
        let in_window = |d: &NaiveDate| (*d - today).num_days().abs() <= DAILY_CACHE_WINDOW_DAYS;

        if let Some(q) = { self.daily_cache.read().await.get(&date).cloned() } {
            return q;
        }
        let quiz = engine::select_daily(&self.catalog, date, self.plans.as_deref());
        if in_window(&date) {
            let mut cache = self.daily_cache.write().await;
            cache.retain(|d, _| in_window(d));
            cache.insert(date, quiz.clone());
        }
        quiz
    }

    /// Target and options for question `index` of `date`; `None` past the day's end.
    #[instrument(level = "debug", skip(self))]
    pub async fn options(&self, date: NaiveDate, index: usize) -> Option<(StreetRecord, Vec<StreetRecord>)> {
        let quiz = self.daily(date).await;
        let target = quiz.streets.get(index)?.clone();
        let options = engine::generate_options(&target, &self.catalog, date, index, self.plans.as_deref());
        Some((target, options))
    }

    /// Hints for a street id, cached per id (they never vary by day).
    /// `None` for unknown ids.
    #[instrument(level = "debug", skip(self))]
    pub async fn hints(&self, street_id: &str) -> Option<Vec<StreetRecord>> {
        if let Some(h) = { self.hint_cache.read().await.get(street_id).cloned() } {
            return Some(h);
        }
        let target = self.catalog.get(street_id)?.clone();

        // Geometry over the whole catalog: keep it off the async workers.
        let catalog = self.catalog.clone();
        let hints = match tokio::task::spawn_blocking(move || generate_hints(&target, &catalog)).await {
            Ok(h) => h,
            Err(e) => {
                error!(target: "hints", %street_id, error = %e, "Hint task failed; serving none");
                return Some(Vec::new());
            }
        };
        self.hint_cache.write().await.insert(street_id.to_string(), hints.clone());
        Some(hints)
    }
}
