use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::navigation::View;

/// The four remote-backed user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Workflow {
    IngredientAnalysis,
    PhotoAnalysis,
    MealPlan,
    PdfExport,
}

pub(crate) struct Messages {
    pub invalid: &'static str,
    pub loading: &'static str,
    pub success: &'static str,
    pub failure: &'static str,
    pub cancelled: &'static str,
}

impl Workflow {
    pub const ALL: [Workflow; 4] = [
        Workflow::IngredientAnalysis,
        Workflow::PhotoAnalysis,
        Workflow::MealPlan,
        Workflow::PdfExport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Workflow::IngredientAnalysis => "ingredient_analysis",
            Workflow::PhotoAnalysis => "photo_analysis",
            Workflow::MealPlan => "meal_plan",
            Workflow::PdfExport => "pdf_export",
        }
    }

    /// View forced active after a successful run.
    pub fn destination(&self) -> Option<View> {
        match self {
            Workflow::IngredientAnalysis | Workflow::PhotoAnalysis | Workflow::MealPlan => {
                Some(View::Dashboard)
            }
            Workflow::PdfExport => None,
        }
    }

    pub(crate) fn messages(&self) -> Messages {
        match self {
            Workflow::IngredientAnalysis => Messages {
                invalid: "Please fill in all required fields",
                loading: "Analyzing ingredients...",
                success: "Analysis complete!",
                failure: "Failed to analyze ingredients",
                cancelled: "Ingredient analysis cancelled",
            },
            Workflow::PhotoAnalysis => Messages {
                invalid: "Please select a photo and fill in your profile",
                loading: "Analyzing photo...",
                success: "Photo analyzed successfully!",
                failure: "Failed to analyze photo",
                cancelled: "Photo analysis cancelled",
            },
            Workflow::MealPlan => Messages {
                invalid: "Please fill in your profile first",
                loading: "Generating meal plan...",
                success: "Meal plan generated!",
                failure: "Failed to generate meal plan",
                cancelled: "Meal plan generation cancelled",
            },
            Workflow::PdfExport => Messages {
                invalid: "Generate a meal plan first",
                loading: "Generating PDF...",
                success: "PDF downloaded!",
                failure: "Failed to export PDF",
                cancelled: "PDF export cancelled",
            },
        }
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Workflow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ingredients" | "ingredient_analysis" => Ok(Workflow::IngredientAnalysis),
            "photo" | "scan" | "photo_analysis" => Ok(Workflow::PhotoAnalysis),
            "plan" | "meal_plan" => Ok(Workflow::MealPlan),
            "pdf" | "pdf_export" => Ok(Workflow::PdfExport),
            other => Err(format!("unknown workflow `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowStatus {
    #[default]
    Idle,
    Running {
        request_id: RequestId,
    },
    Succeeded {
        request_id: RequestId,
    },
    Failed {
        request_id: RequestId,
    },
}

impl WorkflowStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, WorkflowStatus::Running { .. })
    }
}

/// Handle for one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub workflow: Workflow,
    pub request_id: RequestId,
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    latest: Option<RequestId>,
    status: WorkflowStatus,
}

/// Per-workflow state tokens. Only the latest request of a workflow may
/// write results; anything older is stale.
#[derive(Debug, Clone, Default)]
pub struct WorkflowTracker {
    last_id: u64,
    slots: BTreeMap<Workflow, Slot>,
}

impl WorkflowTracker {
    fn next_id(&mut self) -> RequestId {
        self.last_id += 1;
        RequestId(self.last_id)
    }

    pub fn start(&mut self, workflow: Workflow) -> Ticket {
        let request_id = self.next_id();
        let slot = self.slots.entry(workflow).or_default();
        slot.latest = Some(request_id);
        slot.status = WorkflowStatus::Running { request_id };
        Ticket {
            workflow,
            request_id,
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.slots
            .get(&ticket.workflow)
            .is_some_and(|s| s.latest == Some(ticket.request_id))
    }

    /// Records the outcome; returns false when the ticket was superseded.
    pub fn settle(&mut self, ticket: Ticket, succeeded: bool) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        let request_id = ticket.request_id;
        let status = if succeeded {
            WorkflowStatus::Succeeded { request_id }
        } else {
            WorkflowStatus::Failed { request_id }
        };
        self.slots.entry(ticket.workflow).or_default().status = status;
        true
    }

    /// The request was dropped before it resolved. Returns whether it was
    /// still the current one.
    pub fn abandon(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.slots.entry(ticket.workflow).or_default().status = WorkflowStatus::Idle;
        true
    }

    /// Invalidates whatever is in flight for `workflow`. Returns whether
    /// anything was running.
    pub fn cancel(&mut self, workflow: Workflow) -> bool {
        let fence = self.next_id();
        let slot = self.slots.entry(workflow).or_default();
        let was_running = slot.status.is_running();
        slot.latest = Some(fence);
        slot.status = WorkflowStatus::Idle;
        was_running
    }

    pub fn status(&self, workflow: Workflow) -> WorkflowStatus {
        self.slots
            .get(&workflow)
            .map(|s| s.status)
            .unwrap_or_default()
    }

    pub fn running(&self) -> Vec<Workflow> {
        self.slots
            .iter()
            .filter(|(_, s)| s.status.is_running())
            .map(|(w, _)| *w)
            .collect()
    }

    pub fn is_busy(&self) -> bool {
        self.slots.values().any(|s| s.status.is_running())
    }
}
