use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use tuner_core::{update, AppState, Msg};
use tuner_engine::{ensure_dir, HttpServiceClient, JobStore, PollSettings, ServiceSettings};
use tuner_logging::{tuner_info, tuner_warn};

use super::commands;
use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::render;

pub(crate) fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::File);

    let base_url =
        std::env::var("TUNER_API").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
    let state_dir = std::env::var("TUNER_STATE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./state"));
    ensure_dir(&state_dir).context("state directory")?;
    tuner_info!("service {base_url}, state dir {:?}", state_dir);

    let api = Arc::new(
        HttpServiceClient::new(ServiceSettings {
            base_url,
            ..ServiceSettings::default()
        })
        .context("service client")?,
    );
    let store = Arc::new(JobStore::new(state_dir.clone()));

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(
        msg_tx.clone(),
        api,
        store.clone(),
        PollSettings::default(),
        state_dir,
    );

    spawn_command_reader(msg_tx.clone());
    spawn_render_tick(msg_tx);

    println!("{}", render::usage());

    // Seed the state machine from the persistent store; this also starts
    // the poll loop and pulls the model listings.
    let mut state = dispatch(
        AppState::new(),
        Msg::RegistryRestored {
            jobs: store.load(),
            last_dataset: store.last_dataset(),
        },
        &runner,
    );

    while let Ok(msg) = msg_rx.recv() {
        let is_tick = matches!(msg, Msg::Tick);
        let is_quit = matches!(msg, Msg::QuitRequested);
        state = dispatch(state, msg, &runner);
        if is_tick && state.consume_dirty() {
            render::render(&state.view());
        }
        if is_quit {
            break;
        }
    }

    tuner_info!("shutting down");
    Ok(())
}

fn dispatch(state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    let (state, effects) = update(state, msg);
    runner.run(effects);
    state
}

fn spawn_command_reader(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.read_line(&mut line) {
                // EOF behaves like quit so the poll loop still stops.
                Ok(0) => {
                    let _ = msg_tx.send(Msg::QuitRequested);
                    break;
                }
                Ok(_) => match commands::parse(line.trim()) {
                    Ok(msg) => {
                        let quit = matches!(msg, Msg::QuitRequested);
                        if msg_tx.send(msg).is_err() || quit {
                            break;
                        }
                    }
                    Err(message) => {
                        eprintln!("{message}");
                        eprintln!("{}", render::usage());
                    }
                },
                Err(err) => {
                    tuner_warn!("stdin read failed: {err}");
                    break;
                }
            }
        }
    });
}

// Background tick to throttle rendering and UI updates.
fn spawn_render_tick(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let interval = Duration::from_millis(250);
        while msg_tx.send(Msg::Tick).is_ok() {
            thread::sleep(interval);
        }
    });
}
