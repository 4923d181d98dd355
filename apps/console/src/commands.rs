//! Line-oriented commands accepted by the console frontend.

use chrono::NaiveDate;
use shared::domain::{FilterDimension, TaskId, UiBucket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    ShowActive,
    ShowCompleted,
    Filter(FilterDimension),
    Select(TaskId),
    Add(String),
    EditTitle(String),
    EditSummary(String),
    EditBucket(UiBucket),
    EditDue(Option<NaiveDate>),
    Save,
    Complete,
    Log(String),
    Refresh,
    Help,
    Quit,
}

pub fn parse(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    match command {
        "active" => Ok(ReplCommand::ShowActive),
        "completed" | "done" => Ok(ReplCommand::ShowCompleted),
        "filter" => rest
            .parse()
            .map(ReplCommand::Filter)
            .map_err(|_| "usage: filter <ui|due>".to_string()),
        "select" | "open" => {
            if rest.is_empty() {
                Err("usage: select <task-id>".to_string())
            } else {
                Ok(ReplCommand::Select(TaskId::new(rest)))
            }
        }
        "add" => Ok(ReplCommand::Add(rest.to_string())),
        "title" => Ok(ReplCommand::EditTitle(rest.to_string())),
        "summary" => Ok(ReplCommand::EditSummary(rest.to_string())),
        "bucket" | "ui" => rest
            .parse::<i64>()
            .ok()
            .and_then(UiBucket::from_code)
            .map(ReplCommand::EditBucket)
            .ok_or_else(|| "usage: bucket <0-4>".to_string()),
        "due" => match rest {
            "" => Err("usage: due <YYYY-MM-DD|clear>".to_string()),
            "clear" | "none" => Ok(ReplCommand::EditDue(None)),
            raw => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(|date| ReplCommand::EditDue(Some(date)))
                .map_err(|_| format!("not a date (expected YYYY-MM-DD): {raw}")),
        },
        "save" => Ok(ReplCommand::Save),
        "complete" => Ok(ReplCommand::Complete),
        "log" | "note" => Ok(ReplCommand::Log(rest.to_string())),
        "refresh" | "reload" => Ok(ReplCommand::Refresh),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
        "" => Err("type 'help' for the command list".to_string()),
        other => Err(format!("unknown command: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_view_and_filter_switches() {
        assert_eq!(parse("active"), Ok(ReplCommand::ShowActive));
        assert_eq!(parse("completed"), Ok(ReplCommand::ShowCompleted));
        assert_eq!(
            parse("filter due"),
            Ok(ReplCommand::Filter(FilterDimension::Due))
        );
        assert!(parse("filter priority").is_err());
    }

    #[test]
    fn parses_select_and_edit_commands() {
        assert_eq!(
            parse("select a1b2c3d4"),
            Ok(ReplCommand::Select(TaskId::new("a1b2c3d4")))
        );
        assert_eq!(
            parse("add Replace pump seals"),
            Ok(ReplCommand::Add("Replace pump seals".to_string()))
        );
        assert_eq!(
            parse("bucket 2"),
            Ok(ReplCommand::EditBucket(UiBucket::ImportantNotUrgent))
        );
        assert!(parse("bucket 9").is_err());
    }

    #[test]
    fn parses_due_dates_and_clearing() {
        assert_eq!(
            parse("due 2024-05-01"),
            Ok(ReplCommand::EditDue(NaiveDate::from_ymd_opt(2024, 5, 1)))
        );
        assert_eq!(parse("due clear"), Ok(ReplCommand::EditDue(None)));
        assert!(parse("due soon").is_err());
        assert!(parse("due").is_err());
    }

    #[test]
    fn rejects_unknown_and_empty_input() {
        assert!(parse("").is_err());
        assert!(parse("frobnicate").is_err());
    }
}
