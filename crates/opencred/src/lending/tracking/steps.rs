use serde::Serialize;

use crate::lending::domain::TimelineEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Processing,
    Completed,
}

impl StepState {
    pub const fn label(self) -> &'static str {
        match self {
            StepState::Processing => "processing",
            StepState::Completed => "completed",
        }
    }
}

/// Timeline entry prepared for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayStep {
    pub icon: &'static str,
    pub title: String,
    pub description: String,
    pub state: StepState,
}

/// Map a timeline to display steps. Only the last step reflects `loading`.
pub fn derive_steps(timeline: &[TimelineEvent], loading: bool) -> Vec<DisplayStep> {
    let last = timeline.len().saturating_sub(1);
    timeline
        .iter()
        .enumerate()
        .map(|(index, event)| DisplayStep {
            icon: step_icon(&event.step),
            title: event.step.clone(),
            description: event.detail.clone(),
            state: if index == last && loading {
                StepState::Processing
            } else {
                StepState::Completed
            },
        })
        .collect()
}

/// First matching label fragment wins.
pub fn step_icon(step: &str) -> &'static str {
    const ICONS: [(&[&str], &str); 7] = [
        (&["Submitted"], "📝"),
        (&["Document", "Received"], "📄"),
        (&["OCR"], "🔍"),
        (&["PAN"], "🆔"),
        (&["KYC"], "✓"),
        (&["Underwriting"], "📊"),
        (&["AI"], "🤖"),
    ];

    ICONS
        .iter()
        .find(|(fragments, _)| fragments.iter().any(|fragment| step.contains(fragment)))
        .map(|(_, icon)| *icon)
        .unwrap_or("•")
}
