//! Client-side aggregations over fetched work orders and plans.
//!
//! These back the supervisor and technician report views. Inputs are the
//! lists returned by the backend; nothing here talks to the network.

#[cfg(test)]
#[path = "reports_test.rs"]
mod tests;

use std::collections::HashMap;

use serde::Serialize;

use crate::api::{Frequency, WorkOrder};
use crate::session::EntityId;

/// Work order lifecycle as shown to technicians.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum WorkOrderStatus {
    /// Assigned but not started.
    Assigned,
    /// Started; the backend calls this `Pending`.
    InProgress,
    Done,
    /// Anything else, including unassigned requests.
    Other,
}

impl WorkOrderStatus {
    /// Classify a backend status string. `Done` and `Completed` both count
    /// as done; matching ignores case and surrounding whitespace.
    #[must_use]
    pub fn classify(status: Option<&str>) -> Self {
        let Some(status) = status else {
            return Self::Other;
        };
        match status.trim().to_ascii_lowercase().as_str() {
            "assigned" => Self::Assigned,
            "pending" | "in progress" | "in_progress" => Self::InProgress,
            "done" | "completed" => Self::Done,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub fn of(order: &WorkOrder) -> Self {
        Self::classify(order.status.as_deref())
    }
}

// =============================================================================
// SUPERVISOR VIEWS
// =============================================================================

/// Per-technician tally of assigned work orders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TechnicianSummary {
    pub assigned_to: Option<String>,
    pub assigned_to_id: Option<EntityId>,
    pub total: usize,
    pub in_progress: usize,
    pub done: usize,
}

/// Group assigned work orders by technician, in first-seen order. Every
/// order that is not done counts as in progress.
#[must_use]
pub fn technician_summary(orders: &[WorkOrder]) -> Vec<TechnicianSummary> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut summaries: Vec<TechnicianSummary> = Vec::new();

    for order in orders {
        let Some(key) = order.assignee_key() else {
            continue;
        };
        let slot = *index.entry(key).or_insert_with(|| {
            summaries.push(TechnicianSummary {
                assigned_to: order.assigned_to.clone(),
                assigned_to_id: order.assigned_to_id.clone(),
                total: 0,
                in_progress: 0,
                done: 0,
            });
            summaries.len() - 1
        });
        let summary = &mut summaries[slot];
        summary.total += 1;
        if WorkOrderStatus::of(order) == WorkOrderStatus::Done {
            summary.done += 1;
        } else {
            summary.in_progress += 1;
        }
    }
    summaries
}

/// One line of the asset history log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub id: Option<EntityId>,
    pub description: Option<String>,
    pub requested_by_id: Option<EntityId>,
    pub assigned_to_id: Option<EntityId>,
    pub status: Option<String>,
    pub scheduled_date: Option<String>,
}

#[must_use]
pub fn asset_history(orders: &[WorkOrder]) -> Vec<HistoryEntry> {
    orders
        .iter()
        .map(|o| HistoryEntry {
            id: o.work_id.clone(),
            description: o.description.clone(),
            requested_by_id: o.requested_by_id.clone(),
            assigned_to_id: o.assigned_to_id.clone(),
            status: o.status.clone(),
            scheduled_date: o.scheduled_date.clone(),
        })
        .collect()
}

// =============================================================================
// TECHNICIAN VIEWS
// =============================================================================

/// Counts shown on a technician's report cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatusOverview {
    pub yet_to_start: usize,
    pub in_progress: usize,
    pub completed: usize,
}

#[must_use]
pub fn status_overview(orders: &[WorkOrder]) -> StatusOverview {
    orders.iter().fold(StatusOverview::default(), |mut acc, order| {
        match WorkOrderStatus::of(order) {
            WorkOrderStatus::Assigned => acc.yet_to_start += 1,
            WorkOrderStatus::InProgress => acc.in_progress += 1,
            WorkOrderStatus::Done => acc.completed += 1,
            WorkOrderStatus::Other => {}
        }
        acc
    })
}

/// Orders still on the technician's work list.
#[must_use]
pub fn open_orders(orders: &[WorkOrder]) -> Vec<&WorkOrder> {
    orders.iter().filter(|o| WorkOrderStatus::of(o) != WorkOrderStatus::Done).collect()
}

/// The technician's work history.
#[must_use]
pub fn completed_orders(orders: &[WorkOrder]) -> Vec<&WorkOrder> {
    orders.iter().filter(|o| WorkOrderStatus::of(o) == WorkOrderStatus::Done).collect()
}

// =============================================================================
// PLANS
// =============================================================================

/// Display label for a maintenance interval in days.
#[must_use]
pub fn frequency_label(days: u32) -> String {
    match days {
        7 => "Weekly".to_owned(),
        30 => "Monthly".to_owned(),
        90 => "Quarterly".to_owned(),
        365 => "Yearly".to_owned(),
        n => format!("Every {n} days"),
    }
}

impl Frequency {
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Days(days) => frequency_label(*days),
            Self::Label(label) => label.clone(),
        }
    }
}
