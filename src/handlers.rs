//! Form handlers
//!
//! Each handler takes the typed request for one form, applies the business
//! rules and talks to the [`AchievementStore`]. Validation failures come back
//! as user-facing [`LoyaltyError`] variants; storage failures propagate
//! unchanged.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::config::AppConfig;
use crate::error::{LoyaltyError, Result};
use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::{Achievement, NewAchievement};
use crate::repository::AchievementStore;
use crate::validation::InputValidator;

/// Submission of the "add achievement" form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddAchievementForm {
    pub employee: String,
    /// Explicitly chosen department; empty counts as absent
    pub department: Option<String>,
    pub achievement: String,
    pub point: String,
}

/// Submission of the "view achievements" form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewAchievementsForm {
    /// Substring of the employee name; empty or absent lists everything
    pub employee: Option<String>,
}

/// Submission of the "remove achievement" form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveAchievementForm {
    pub id: String,
}

/// Rows matched by a view request together with their point total
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOutcome {
    pub achievements: Vec<Achievement>,
    pub points: i64,
    /// Same rows as a JSON array, ready for download
    pub achievements_json: serde_json::Value,
}

/// Result of a remove request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveOutcome {
    pub id: i64,
    /// Whether a row with that id existed
    pub removed: bool,
}

/// Handles the "add achievement" form, including department inference
pub struct AddAchievementHandler {
    store: Arc<dyn AchievementStore>,
    config: Arc<AppConfig>,
    metrics: MetricsCollector,
    // Held across the inference read and the insert.
    submit_lock: Mutex<()>,
}

impl AddAchievementHandler {
    pub fn new(store: Arc<dyn AchievementStore>, config: Arc<AppConfig>) -> Self {
        Self {
            store,
            config,
            metrics: MetricsCollector::default(),
            submit_lock: Mutex::new(()),
        }
    }

    /// Validate and persist one submission.
    ///
    /// An explicit department is used when it is one of the configured
    /// names. Otherwise the employee's most recent department is inherited;
    /// when there is none the submission is rejected and nothing is stored.
    #[instrument(skip(self, form), fields(employee = %form.employee))]
    pub async fn handle(&self, form: AddAchievementForm) -> Result<Achievement> {
        let timer = OperationTimer::new("add_achievement");
        let result = self.add(form).await;
        self.metrics.record_submission("add", result.is_ok());
        timer.finish();
        result
    }

    async fn add(&self, form: AddAchievementForm) -> Result<Achievement> {
        InputValidator::validate_employee_name(&form.employee)?;
        InputValidator::validate_achievement(&form.achievement)?;
        let point = InputValidator::parse_point(&form.point)?;

        let _guard = self.submit_lock.lock().await;

        let department = match form.department.filter(|d| !d.is_empty()) {
            Some(department) if self.config.is_known_department(&department) => department,
            requested => {
                if let Some(unknown) = requested {
                    warn!(department = %unknown, "Ignoring unknown department");
                }
                let inherited = self
                    .store
                    .most_recent_department(form.employee.clone())
                    .await?
                    .ok_or_else(|| LoyaltyError::DepartmentNotFound {
                        employee: form.employee.clone(),
                    })?;
                info!(department = %inherited, "Inherited department from previous entry");
                inherited
            }
        };

        let achievement = self
            .store
            .insert(NewAchievement::new(form.employee, department, form.achievement, point.to_string()))
            .await?;

        info!(id = achievement.id, "Achievement added");
        Ok(achievement)
    }
}

/// Handles the "view achievements" form
pub struct ViewAchievementsHandler {
    store: Arc<dyn AchievementStore>,
    metrics: MetricsCollector,
}

impl ViewAchievementsHandler {
    pub fn new(store: Arc<dyn AchievementStore>) -> Self {
        Self {
            store,
            metrics: MetricsCollector::default(),
        }
    }

    /// Search by employee substring and total the points of the matches
    #[instrument(skip(self))]
    pub async fn handle(&self, form: ViewAchievementsForm) -> Result<ViewOutcome> {
        let timer = OperationTimer::new("view_achievements");

        let achievements = self.store.search(form.employee).await?;
        let points = InputValidator::sum_points(&achievements);
        self.metrics.record_submission("view", points.is_ok());
        let points = points?;
        self.metrics.record_points_summed(points);

        let achievements_json = serde_json::to_value(&achievements)?;

        info!(rows = achievements.len(), points, "Achievements found");
        timer.finish();
        Ok(ViewOutcome {
            achievements,
            points,
            achievements_json,
        })
    }
}

/// Handles the "remove achievement" form
pub struct RemoveAchievementHandler {
    store: Arc<dyn AchievementStore>,
    metrics: MetricsCollector,
}

impl RemoveAchievementHandler {
    pub fn new(store: Arc<dyn AchievementStore>) -> Self {
        Self {
            store,
            metrics: MetricsCollector::default(),
        }
    }

    /// Delete the achievement whose id was submitted; no confirmation step
    #[instrument(skip(self))]
    pub async fn handle(&self, form: RemoveAchievementForm) -> Result<RemoveOutcome> {
        let timer = OperationTimer::new("remove_achievement");

        let id = InputValidator::parse_id(&form.id);
        self.metrics.record_submission("remove", id.is_ok());
        let id = id?;

        let removed = self.store.delete_by_id(id).await?;
        if removed {
            info!(id, "Achievement removed");
        } else {
            info!(id, "No achievement with this id");
        }

        timer.finish();
        Ok(RemoveOutcome { id, removed })
    }
}

/// The three form handlers sharing one store and configuration
pub struct FormHandlers {
    pub add: AddAchievementHandler,
    pub view: ViewAchievementsHandler,
    pub remove: RemoveAchievementHandler,
}

impl FormHandlers {
    pub fn new(store: Arc<dyn AchievementStore>, config: Arc<AppConfig>) -> Self {
        Self {
            add: AddAchievementHandler::new(Arc::clone(&store), config),
            view: ViewAchievementsHandler::new(Arc::clone(&store)),
            remove: RemoveAchievementHandler::new(store),
        }
    }
}
