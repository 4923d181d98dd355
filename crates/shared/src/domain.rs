use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(TaskId);
id_newtype!(EntryId);

/// Task lifecycle state. The backend encodes this as an integer column:
/// `1` is active, `0` is completed; anything else is treated as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum TaskState {
    Active,
    Completed,
}

impl From<i64> for TaskState {
    fn from(value: i64) -> Self {
        if value == 0 {
            Self::Completed
        } else {
            Self::Active
        }
    }
}

impl From<TaskState> for i64 {
    fn from(value: TaskState) -> Self {
        match value {
            TaskState::Active => 1,
            TaskState::Completed => 0,
        }
    }
}

/// Urgency/importance classification code, wire-encoded as `0..=4`.
/// Unknown codes normalize to `Unclassified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum UiBucket {
    #[default]
    Unclassified,
    UrgentImportant,
    ImportantNotUrgent,
    UrgentNotImportant,
    NotUrgentNotImportant,
}

impl UiBucket {
    pub fn code(self) -> i64 {
        self.into()
    }

    /// Strict parse for user input; unlike the wire mapping, out-of-range
    /// codes are rejected instead of normalized.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Unclassified),
            1 => Some(Self::UrgentImportant),
            2 => Some(Self::ImportantNotUrgent),
            3 => Some(Self::UrgentNotImportant),
            4 => Some(Self::NotUrgentNotImportant),
            _ => None,
        }
    }
}

impl From<i64> for UiBucket {
    fn from(value: i64) -> Self {
        Self::from_code(value).unwrap_or_default()
    }
}

impl From<UiBucket> for i64 {
    fn from(value: UiBucket) -> Self {
        match value {
            UiBucket::Unclassified => 0,
            UiBucket::UrgentImportant => 1,
            UiBucket::ImportantNotUrgent => 2,
            UiBucket::UrgentNotImportant => 3,
            UiBucket::NotUrgentNotImportant => 4,
        }
    }
}

impl fmt::Display for UiBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unclassified => "Uncategorized",
            Self::UrgentImportant => "Urgent + Important",
            Self::ImportantNotUrgent => "Important + Not-Urgent",
            Self::UrgentNotImportant => "Urgent + Not-Important",
            Self::NotUrgentNotImportant => "Not-Urgent + Not-Important",
        };
        f.write_str(label)
    }
}

/// Which task list the UI is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskView {
    Active,
    Completed,
}

/// Grouping dimension for the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDimension {
    #[default]
    Ui,
    Due,
}

impl FilterDimension {
    /// Value of the `filter_by` query parameter.
    pub fn query_value(self) -> &'static str {
        match self {
            Self::Ui => "Filter_UI",
            Self::Due => "Filter_Date",
        }
    }
}

#[derive(Debug, Error)]
#[error("unrecognized filter dimension: {0}")]
pub struct ParseFilterDimensionError(String);

impl FromStr for FilterDimension {
    type Err = ParseFilterDimensionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ui" | "filter_ui" => Ok(Self::Ui),
            "due" | "date" | "filter_date" => Ok(Self::Due),
            _ => Err(ParseFilterDimensionError(raw.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_state_wire_mapping() {
        assert_eq!(TaskState::from(0), TaskState::Completed);
        assert_eq!(TaskState::from(1), TaskState::Active);
        // Anything nonzero reads as active.
        assert_eq!(TaskState::from(7), TaskState::Active);
        assert_eq!(i64::from(TaskState::Completed), 0);
    }

    #[test]
    fn ui_bucket_normalizes_unknown_codes() {
        assert_eq!(UiBucket::from(3), UiBucket::UrgentNotImportant);
        assert_eq!(UiBucket::from(99), UiBucket::Unclassified);
        assert_eq!(UiBucket::from_code(99), None);
    }

    #[test]
    fn filter_dimension_parses_aliases() {
        assert_eq!("ui".parse::<FilterDimension>().unwrap(), FilterDimension::Ui);
        assert_eq!(
            "Filter_Date".parse::<FilterDimension>().unwrap(),
            FilterDimension::Due
        );
        assert!("priority".parse::<FilterDimension>().is_err());
    }
}
