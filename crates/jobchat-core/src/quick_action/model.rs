//! Quick Action catalog.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// One of the fixed prompt buttons.
///
/// `Display`/`FromStr` use the button label, e.g. `"Find Jobs"`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
pub enum QuickAction {
    #[strum(serialize = "Find Jobs")]
    FindJobs,
    #[strum(serialize = "How to Apply")]
    HowToApply,
    #[strum(serialize = "Resume Tips")]
    ResumeTips,
    #[strum(serialize = "Job Alerts")]
    JobAlerts,
    #[strum(serialize = "Contact Support")]
    ContactSupport,
    #[strum(serialize = "Profile Help")]
    ProfileHelp,
}

impl QuickAction {
    /// All actions in display order.
    pub fn all() -> Vec<QuickAction> {
        QuickAction::iter().collect()
    }

    /// Button label.
    pub fn label(&self) -> &'static str {
        (*self).into()
    }

    /// Question sent on the user's behalf.
    pub fn prompt(&self) -> &'static str {
        match self {
            QuickAction::FindJobs => "How can I search for jobs?",
            QuickAction::HowToApply => "How do I apply for a job?",
            QuickAction::ResumeTips => "Can you give me some tips for my resume?",
            QuickAction::JobAlerts => "How do I set up job alerts?",
            QuickAction::ContactSupport => "How can I contact customer support?",
            QuickAction::ProfileHelp => "How do I update my profile?",
        }
    }
}

/// Maps a button label to the text to send.
///
/// Known labels map to their canned question; anything else is sent as is.
pub fn resolve_prompt(label: &str) -> String {
    match QuickAction::from_str(label.trim()) {
        Ok(action) => action.prompt().to_string(),
        Err(_) => label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_and_labels() {
        let labels: Vec<&str> = QuickAction::all().iter().map(|a| a.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Find Jobs",
                "How to Apply",
                "Resume Tips",
                "Job Alerts",
                "Contact Support",
                "Profile Help"
            ]
        );
    }

    #[test]
    fn test_label_round_trips_through_strum() {
        for action in QuickAction::all() {
            assert_eq!(action.to_string(), action.label());
            assert_eq!(action.as_ref(), action.label());
            assert_eq!(QuickAction::from_str(action.label()).unwrap(), action);
        }
    }

    #[test]
    fn test_find_jobs_prompt() {
        assert_eq!(resolve_prompt("Find Jobs"), "How can I search for jobs?");
    }

    #[test]
    fn test_unknown_label_is_sent_verbatim() {
        assert_eq!(resolve_prompt("Salary Insights"), "Salary Insights");
    }
}
