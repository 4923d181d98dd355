use std::{
    io::{self, BufRead, Write},
    sync::Arc,
};

use anyhow::Result;
use clap::Parser;
use client_core::{ApiClient, Renderers, ViewStateController};
use shared::domain::TaskView;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;
mod settings;

use commands::ReplCommand;
use render::{ConsoleMslLog, ConsoleNotifier, ConsoleTaskDetail, ConsoleTaskList};

/// Console frontend for the task board backend.
#[derive(Parser, Debug)]
struct Args {
    /// Backend base URL; overrides console.toml and environment settings.
    #[arg(long)]
    server_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let mut settings = settings::load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }

    let renderers = Renderers {
        task_list: Arc::new(ConsoleTaskList),
        task_detail: Arc::new(ConsoleTaskDetail),
        msl_log: Arc::new(ConsoleMslLog),
        notifier: Arc::new(ConsoleNotifier),
    };
    let controller = ViewStateController::with_filter(
        ApiClient::new(&settings.server_url),
        renderers,
        settings.filter,
    );

    println!(
        "Connected to {}. Type 'help' for the command list.",
        settings.server_url
    );
    // Initial paint; a failure is already surfaced as an alert.
    let _ = controller.reload_tasks().await;

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match commands::parse(&line) {
            Ok(ReplCommand::Quit) => break,
            Ok(ReplCommand::Help) => print_help(),
            Ok(command) => run_command(&controller, command).await,
            Err(usage) => eprintln!("{usage}"),
        }
    }
    Ok(())
}

/// Dispatch one command. Failures were already surfaced through the
/// notifier, so results are not re-reported here.
async fn run_command(controller: &ViewStateController, command: ReplCommand) {
    match command {
        ReplCommand::ShowActive => {
            let _ = controller.select_view(TaskView::Active).await;
        }
        ReplCommand::ShowCompleted => {
            let _ = controller.select_view(TaskView::Completed).await;
        }
        ReplCommand::Filter(dimension) => {
            let _ = controller.select_filter(dimension).await;
        }
        ReplCommand::Select(id) => {
            let _ = controller.select_task(id).await;
        }
        ReplCommand::Add(title) => {
            let _ = controller.create_task(&title).await;
        }
        ReplCommand::EditTitle(title) => note_edit(controller.edit_title(title).await),
        ReplCommand::EditSummary(summary) => note_edit(controller.edit_summary(summary).await),
        ReplCommand::EditBucket(bucket) => note_edit(controller.edit_bucket(bucket).await),
        ReplCommand::EditDue(due) => note_edit(controller.edit_due(due).await),
        ReplCommand::Save => {
            let _ = controller.save_task().await;
        }
        ReplCommand::Complete => {
            let _ = controller.complete_task().await;
        }
        ReplCommand::Log(text) => {
            let _ = controller.add_msl_entry(&text).await;
        }
        ReplCommand::Refresh => {
            let _ = controller.reload_tasks().await;
        }
        ReplCommand::Help | ReplCommand::Quit => {}
    }
}

fn note_edit(accepted: bool) {
    if !accepted {
        eprintln!("No editable task selected.");
    }
}

fn print_help() {
    println!(
        "\
Commands:
  active                 show the active task list
  completed              show the completed task list
  filter <ui|due>        group tasks by bucket or by due date
  select <task-id>       open a task's detail and MSL log
  add <title>            create a task
  title <text>           edit the selected task's title
  summary <text>         edit the selected task's summary
  bucket <0-4>           edit the urgency/importance bucket
  due <YYYY-MM-DD|clear> edit or clear the due date
  save                   save the edited fields
  complete               mark the selected task completed
  log <text>             append an MSL entry to the selected task
  refresh                reload the task list
  quit                   exit"
    );
}
