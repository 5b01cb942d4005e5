//! `santa`: drives the Secret Santa screens from the terminal.
//!
//! Each subcommand opens one screen against the in-memory backend, performs
//! the requested user interactions and prints every state change and action
//! the screen produces. Configuration via CLI flags, environment variables,
//! or config file (`~/.config/santa/config.toml`).
//!
//! ```bash
//! # Profile screen (default)
//! cargo run --bin santa
//!
//! # Submit the room form
//! cargo run --bin santa -- create-room --name Office --date 2026-12-24 --max-price 500
//!
//! # Delete the account, slowly
//! SANTA_LATENCY_MS=1000 cargo run --bin santa -- profile --delete
//! ```

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::runtime::Handle;
use tracing_appender::non_blocking::WorkerGuard;

use santa::config::{CliArgs, ClientConfig, Command};
use santa::profile::{ProfileAction, ProfileController, ProfileState};
use santa::room::{CreateRoomAction, CreateRoomController, CreateRoomState};
use santa::screen::{Actions, StateWatcher};
use santa::usecase::memory::MemoryBackend;

/// How long to keep listening once the screen has gone quiet.
const SETTLE_GRACE: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Logs go to a file so stdout only carries screen output.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("santa starting");

    let backend = Arc::new(MemoryBackend::from_config(&config.backend));
    let settled = match cli.command.unwrap_or_default() {
        Command::CreateRoom {
            name,
            password,
            date,
            max_price,
        } => {
            let controller =
                CreateRoomController::with_config(backend, Handle::current(), &config.screen);
            run_create_room(
                &controller,
                &name,
                password.as_deref(),
                date,
                max_price.as_deref(),
            )
            .await
        }
        Command::Profile {
            edit,
            logout,
            delete,
        } => {
            let controller =
                ProfileController::with_config(backend, Handle::current(), &config.screen);
            run_profile(&controller, edit, logout, delete).await
        }
    };

    tracing::info!("santa exiting");
    if settled {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("santa.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Submits the room form and reports until the screen settles.
///
/// Returns `true` if the room was created.
async fn run_create_room(
    controller: &CreateRoomController<MemoryBackend>,
    name: &str,
    password: Option<&str>,
    date: Option<chrono::NaiveDate>,
    max_price: Option<&str>,
) -> bool {
    let mut state = controller.state();
    let actions = controller.actions();

    controller.set_date(date);
    if let Some(date) = controller.current_date() {
        println!("date: {date}");
    }
    println!("state: {:?}", state.current());

    controller.create_room(name, password, controller.current_date(), max_price);

    let mut created = false;
    loop {
        tokio::select! {
            next = state.changed() => match next {
                Some(CreateRoomState::Loaded(room)) => {
                    println!("state: Loaded");
                    println!(
                        "  room {:?} owned by {}, {} member(s), max price {}, date {}",
                        room.name,
                        room.owner_id,
                        room.members_count,
                        room.max_price.map_or_else(|| "-".to_string(), |p| p.to_string()),
                        room.date.map_or_else(|| "-".to_string(), |d| d.to_string()),
                    );
                    created = true;
                }
                Some(CreateRoomState::Error(error)) => {
                    println!("state: Error({error})");
                    break;
                }
                Some(other) => println!("state: {other:?}"),
                None => break,
            },
            action = actions.next() => match action {
                Some(CreateRoomAction::ShowError(text)) => println!("action: ShowError({text})"),
                Some(CreateRoomAction::ShowSuccess) => println!("action: ShowSuccess"),
                None => break,
            },
            () = tokio::time::sleep(SETTLE_GRACE), if !is_busy(&state) => break,
        }
    }

    drain(&actions, |action| println!("action: {action:?}"));
    controller.close();
    created
}

/// Opens the profile screen, waits for the name, then presses the requested
/// buttons in order: edit, log out, delete.
///
/// Returns `true` if the name was loaded.
async fn run_profile(
    controller: &ProfileController<MemoryBackend>,
    edit: bool,
    logout: bool,
    delete: bool,
) -> bool {
    let mut state = controller.state();
    let actions = controller.actions();
    println!("state: {:?}", state.current());

    let loaded = tokio::select! {
        name = state.wait_for(|s| matches!(s, ProfileState::Loaded(_))) => {
            if let Some(ProfileState::Loaded(name)) = name {
                println!("state: Loaded({name})");
                true
            } else {
                false
            }
        }
        action = actions.next() => {
            if let Some(action) = action {
                println!("action: {action:?}");
            }
            false
        }
    };

    if edit {
        controller.edit_username();
    }
    if logout {
        controller.logout();
    }
    if delete {
        controller.delete_account();
        if let Some(action) = next_action(&actions).await {
            println!("action: {action:?}");
        }
    }

    drain(&actions, |action: ProfileAction| {
        println!("action: {action:?}");
    });
    controller.close();
    loaded
}

/// Waits for the next action, giving up after a quiet period.
async fn next_action<A: Send + 'static>(actions: &Actions<A>) -> Option<A> {
    let deadline = SETTLE_GRACE * 20;
    tokio::time::timeout(deadline, actions.next())
        .await
        .ok()
        .flatten()
}

/// Prints every action still queued.
fn drain<A: Send + 'static>(actions: &Actions<A>, mut print: impl FnMut(A)) {
    while let Some(action) = actions.try_next() {
        print(action);
    }
}

fn is_busy(state: &StateWatcher<CreateRoomState>) -> bool {
    state.current() == CreateRoomState::Loading
}
