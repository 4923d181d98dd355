//! ANSI renderers backing the client's render seams.

use std::io::{self, BufRead, Write};

use chrono::Local;
use client_core::render::{
    MslLogRenderer, Notifier, TaskDetail, TaskDetailRenderer, TaskGroup, TaskListRenderer,
};
use owo_colors::OwoColorize;
use shared::{domain::TaskView, protocol::MslEntryRecord};

pub struct ConsoleTaskList;

impl TaskListRenderer for ConsoleTaskList {
    fn render(&self, view: TaskView, groups: &[TaskGroup]) {
        let heading = match view {
            TaskView::Active => "Active Tasks",
            TaskView::Completed => "Completed Tasks",
        };
        println!("\n{}", heading.bold());
        if groups.is_empty() {
            let empty = match view {
                TaskView::Active => "No active tasks found.",
                TaskView::Completed => "No completed tasks found.",
            };
            println!("  {empty}");
            return;
        }
        for group in groups {
            println!("{}", group.label.underline());
            for item in &group.tasks {
                let line = format!("  [{}] {}", item.id, item.display_title());
                if item.is_completed() {
                    println!("{}", line.strikethrough().dimmed());
                } else {
                    println!("{line}");
                }
            }
        }
    }
}

pub struct ConsoleTaskDetail;

impl TaskDetailRenderer for ConsoleTaskDetail {
    fn render(&self, detail: &TaskDetail) {
        let task = &detail.task;
        println!("\n{}", format!("Task {}", task.id).bold());
        println!("  Title:   {}", task.title);
        println!("  Summary: {}", task.summary);
        println!("  Bucket:  {}", task.ui);
        let due = task
            .due
            .map(|datetime| datetime.date_naive().to_string())
            .unwrap_or_default();
        println!("  Due:     {due}");
        if !detail.editable {
            println!("  {}", "(completed; fields are read-only)".dimmed());
        }
    }

    fn clear(&self) {
        println!("\nSelect a task to see details.");
    }
}

pub struct ConsoleMslLog;

impl MslLogRenderer for ConsoleMslLog {
    fn render(&self, entries: &[MslEntryRecord]) {
        println!("\n{}", "MSL Log".bold());
        if entries.is_empty() {
            println!("  No MSL entries yet.");
            return;
        }
        for entry in entries {
            let stamp = entry
                .date
                .map(|datetime| {
                    datetime
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                })
                .unwrap_or_default();
            println!(
                "  {} - {}",
                stamp.dimmed(),
                entry.submitter_display().bold()
            );
            for line in entry.text.lines() {
                println!("    {line}");
            }
        }
    }

    fn clear(&self) {}
}

pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        eprintln!("{}", message.red());
    }

    fn info(&self, message: &str) {
        println!("{}", message.green());
    }

    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes")
    }
}
