//! Line-oriented front-end over [`Session`].
//!
//! Lines come from a rustyline editor on its own thread. Workflow actions run
//! as tasks, so the shell keeps reading while a call is in flight and
//! `cancel` can reach it.

mod command;
mod render;

use std::sync::Arc;
use std::thread;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{error, warn};

use crate::images::media_type_for_path;
use crate::session::{Outcome, Session, Workflow};

pub use command::{Command, CommandError, HELP};

const PROMPT: &str = "> ";
const END_OF_INGREDIENTS: &str = ".";

type InFlight = JoinSet<(Workflow, Outcome)>;

pub async fn run(session: Arc<Session>) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel(16);
    thread::Builder::new()
        .name("console-input".into())
        .spawn(move || read_lines(tx))?;
    println!("{HELP}");
    drive(session, rx).await
}

/// Blocking reader; ends on EOF or when the shell stops listening.
fn read_lines(tx: mpsc::Sender<String>) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            error!(error = %e, "cannot start line editor");
            return;
        }
    };
    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                error!(error = %e, "readline failed");
                break;
            }
        }
    }
}

async fn drive(session: Arc<Session>, mut input: mpsc::Receiver<String>) -> anyhow::Result<()> {
    let mut in_flight = InFlight::new();

    loop {
        tokio::select! {
            line = input.recv() => {
                let Some(line) = line else { break };
                let command = match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => command,
                    Err(CommandError::Empty) => continue,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                execute(&session, command, &mut input, &mut in_flight).await;
            }
            Some(done) = in_flight.join_next(), if !in_flight.is_empty() => match done {
                Ok((workflow, outcome)) => show_after(&session, workflow, outcome),
                Err(e) => warn!(error = %e, "workflow task ended abnormally"),
            },
        }
        for note in session.take_notifications() {
            println!("{}", render::notification(&note));
        }
    }
    Ok(())
}

async fn execute(
    session: &Arc<Session>,
    command: Command,
    input: &mut mpsc::Receiver<String>,
    in_flight: &mut InFlight,
) {
    match command {
        Command::Profile(field) => session.set_profile_field(field),
        Command::Allergy(allergen) => session.toggle_allergy(allergen),
        Command::Ingredients => {
            session.open_overlay();
            println!("one ingredient per line, `{END_OF_INGREDIENTS}` to finish");
            let text = read_block(input).await;
            session.set_ingredients(text);
            session.close_overlay();
            start(session, Workflow::IngredientAnalysis, in_flight);
        }
        Command::Photo(path) => match tokio::fs::read(&path).await {
            Ok(body) => {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "upload".into());
                let media_type = media_type_for_path(&path);
                if let Err(reason) = session.select_image(&file_name, media_type, body.into()) {
                    println!("{}: {reason}", path.display());
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read photo");
                println!("cannot read {}: {e}", path.display());
            }
        },
        Command::Scan => start(session, Workflow::PhotoAnalysis, in_flight),
        Command::Plan => start(session, Workflow::MealPlan, in_flight),
        Command::Pdf => start(session, Workflow::PdfExport, in_flight),
        Command::View(view) => {
            session.select_view(view);
            println!("{}", render::view(&session.snapshot()));
        }
        Command::Show => println!("{}", render::view(&session.snapshot())),
        Command::Status => println!("{}", render::status(&session.snapshot())),
        Command::Cancel(workflow) => {
            if session.cancel(workflow) {
                println!("{workflow} cancelled");
            } else {
                println!("{workflow} is not running");
            }
        }
        Command::Health => match session.check_service().await {
            Ok(health) => println!(
                "{} ({})",
                health.status,
                health.service.as_deref().unwrap_or("unknown service")
            ),
            Err(e) => println!("service unreachable: {e}"),
        },
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

fn start(session: &Arc<Session>, workflow: Workflow, in_flight: &mut InFlight) {
    let session = Arc::clone(session);
    in_flight.spawn(async move {
        let outcome = match workflow {
            Workflow::IngredientAnalysis => session.analyze_ingredients().await,
            Workflow::PhotoAnalysis => session.analyze_photo().await,
            Workflow::MealPlan => session.generate_meal_plan().await,
            Workflow::PdfExport => session.export_pdf().await,
        };
        (workflow, outcome)
    });
}

fn show_after(session: &Session, workflow: Workflow, outcome: Outcome) {
    if !outcome.is_completed() {
        return;
    }
    let state = session.snapshot();
    match workflow {
        Workflow::PdfExport => {
            if let Some(path) = state.last_download {
                println!("saved to {}", path.display());
            }
        }
        _ => println!("{}", render::view(&state)),
    }
}

async fn read_block(input: &mut mpsc::Receiver<String>) -> String {
    let mut text = String::new();
    while let Some(line) = input.recv().await {
        if line.trim() == END_OF_INGREDIENTS {
            break;
        }
        text.push_str(&line);
        text.push('\n');
    }
    text
}
