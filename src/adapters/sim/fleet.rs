//! Fleet controller simulator.
//!
//! Converges toward the desired capacity by a fixed step on every
//! membership query, which makes convergence timing a pure function of
//! the poll count. Records an activity entry for every capacity change
//! and every launch or termination, like a real controller's history.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::errors::VerifyResult;
use crate::domain::models::{ActivityRecord, FleetMember};
use crate::domain::ports::FleetControl;

struct SimState {
    members: Vec<FleetMember>,
    desired: usize,
    launched_total: usize,
    activities: Vec<ActivityRecord>,
}

impl SimState {
    fn record(&mut self, description: String, cause: String) {
        let now = Utc::now();
        self.activities.push(ActivityRecord {
            id: Uuid::new_v4().to_string(),
            description,
            cause,
            started_at: now,
            ended_at: Some(now),
            status_code: "Successful".to_string(),
        });
    }

    fn launch(&mut self) {
        self.launched_total += 1;
        let id = format!("sim-{:04}", self.launched_total);
        self.record(
            format!("Launching a new instance: {id}"),
            "simulated demand increased the desired capacity".to_string(),
        );
        self.members.push(FleetMember::running(id));
    }

    fn terminate(&mut self) {
        if let Some(member) = self.members.pop() {
            self.record(
                format!("Terminating instance: {}", member.id),
                "simulated demand decreased the desired capacity".to_string(),
            );
        }
    }
}

/// Deterministic in-process [`FleetControl`].
pub struct SimFleetControl {
    state: RwLock<SimState>,
    /// Members launched or terminated per membership query.
    step_per_poll: usize,
}

impl SimFleetControl {
    /// A fleet of `initial` running members that moves toward the
    /// desired capacity by `step_per_poll` on each membership query.
    pub fn new(initial: usize, step_per_poll: usize) -> Self {
        let mut state = SimState {
            members: Vec::new(),
            desired: initial,
            launched_total: 0,
            activities: Vec::new(),
        };
        for _ in 0..initial {
            state.launch();
        }
        state.activities.clear(); // initial membership is not history
        Self {
            state: RwLock::new(state),
            step_per_poll,
        }
    }

    /// A fleet that accepts capacity changes but never acts on them.
    pub fn frozen(initial: usize) -> Self {
        Self::new(initial, 0)
    }

    pub async fn member_count(&self) -> usize {
        self.state.read().await.members.len()
    }
}

#[async_trait]
impl FleetControl for SimFleetControl {
    async fn list_running_members(&self, _fleet_tag: &str) -> VerifyResult<Vec<FleetMember>> {
        let mut state = self.state.write().await;
        for _ in 0..self.step_per_poll {
            if state.members.len() < state.desired {
                state.launch();
            } else if state.members.len() > state.desired {
                state.terminate();
            }
        }
        Ok(state
            .members
            .iter()
            .filter(|m| m.state.is_running())
            .cloned()
            .collect())
    }

    async fn set_desired_capacity(&self, _fleet_tag: &str, count: usize) -> VerifyResult<()> {
        let mut state = self.state.write().await;
        let previous = state.desired;
        state.desired = count;
        state.record(
            format!("Setting desired capacity from {previous} to {count}"),
            "a user request explicitly set group desired capacity".to_string(),
        );
        Ok(())
    }

    async fn list_recent_activity(
        &self,
        _fleet_tag: &str,
        since: DateTime<Utc>,
    ) -> VerifyResult<Vec<ActivityRecord>> {
        let state = self.state.read().await;
        let mut recent: Vec<ActivityRecord> = state
            .activities
            .iter()
            .filter(|a| a.started_at >= since)
            .cloned()
            .collect();
        recent.reverse(); // newest first
        Ok(recent)
    }
}
