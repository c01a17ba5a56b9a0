//! Hooks for the persistence layer
//!
//! Crediting a user's balance or recording submission history lives outside
//! this service. The orchestrator reports each successful classification
//! through `RewardReporter`; deployments plug in their own implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A reward computed for one successful submission
#[derive(Debug, Clone, PartialEq)]
pub struct RewardEvent {
    pub category: String,
    pub confidence: f64,
    pub coins: u32,
    pub raw_label: Option<String>,
    pub classified_at: DateTime<Utc>,
}

/// Trait for reporting rewards to the persistence layer
#[async_trait]
pub trait RewardReporter: Send + Sync {
    async fn report_reward(&self, event: RewardEvent) -> Result<(), String>;
}

/// No-op implementation for when no persistence layer is attached
pub struct NoOpRewardReporter;

#[async_trait]
impl RewardReporter for NoOpRewardReporter {
    async fn report_reward(&self, _event: RewardEvent) -> Result<(), String> {
        Ok(())
    }
}
