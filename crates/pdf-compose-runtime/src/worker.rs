use std::sync::Arc;

use pdf_compose::{
    CounterStore, GenerateOptions, IngestOutcome, LayoutConfig, Rasterizer, Selection, generate,
    save_pdf,
};
use tokio::sync::mpsc;

use crate::{SelectionSnapshot, SessionCommand, SessionUpdate};

/// State owned exclusively by the worker
struct Session<C> {
    config: LayoutConfig,
    selection: Selection,
    counter: C,
    rasterizer: Arc<dyn Rasterizer>,
    options: GenerateOptions,
}

/// Async worker task that owns one session and processes its commands in order
pub async fn worker_task<C: CounterStore>(
    mut command_rx: mpsc::UnboundedReceiver<SessionCommand>,
    update_tx: mpsc::UnboundedSender<SessionUpdate>,
    config: LayoutConfig,
    counter: C,
    rasterizer: Arc<dyn Rasterizer>,
    options: GenerateOptions,
) {
    let mut session = Session {
        selection: Selection::for_layout(&config),
        config,
        counter,
        rasterizer,
        options,
    };

    while let Some(cmd) = command_rx.recv().await {
        if let SessionCommand::Shutdown = cmd {
            log::debug!("Session worker shutting down");
            break;
        }
        process_command(cmd, &mut session, &update_tx).await;
    }
}

async fn process_command<C: CounterStore>(
    cmd: SessionCommand,
    session: &mut Session<C>,
    update_tx: &mpsc::UnboundedSender<SessionUpdate>,
) {
    match cmd {
        SessionCommand::Ingest { files } => match session.selection.ingest(files) {
            Ok(IngestOutcome::PickerRequired { .. }) => {
                let _ = update_tx.send(SessionUpdate::PickerRequired {
                    candidates: session
                        .selection
                        .candidates()
                        .iter()
                        .map(|f| f.name.clone())
                        .collect(),
                    capacity: session.selection.capacity(),
                });
            }
            Ok(IngestOutcome::Queued { .. }) => send_snapshot(session, update_tx),
            Err(e) => send_error(update_tx, e),
        },
        SessionCommand::TogglePick { index } => {
            match session.selection.toggle_candidate(index) {
                Ok(outcome) => {
                    log::debug!("Toggled candidate {}: {:?}", index, outcome);
                    send_snapshot(session, update_tx);
                }
                Err(e) => send_error(update_tx, e),
            }
        }
        SessionCommand::ConfirmPick => match session.selection.confirm_pick() {
            Ok(()) => send_snapshot(session, update_tx),
            Err(e) => send_error(update_tx, e),
        },
        SessionCommand::CancelPick => match session.selection.cancel_pick() {
            Ok(()) => send_snapshot(session, update_tx),
            Err(e) => send_error(update_tx, e),
        },
        SessionCommand::Remove { index } => {
            if session.selection.remove(index).is_none() {
                log::debug!("Remove index {} out of range", index);
            }
            send_snapshot(session, update_tx);
        }
        SessionCommand::ClearAll => {
            session.selection.clear_all();
            send_snapshot(session, update_tx);
        }
        SessionCommand::SetLayout { config } => {
            if let Err(e) = config.validate() {
                send_error(update_tx, e);
                return;
            }
            log::debug!("Switching layout to '{}'", config.name);
            session.selection = Selection::for_layout(&config);
            session.config = config;
            send_snapshot(session, update_tx);
        }
        SessionCommand::Generate { output_dir } => {
            let result = generate(
                &mut session.selection,
                &session.config,
                &session.counter,
                Arc::clone(&session.rasterizer),
                session.options,
            )
            .await;

            let pdf = match result {
                Ok(pdf) => pdf,
                Err(e) => {
                    send_error(update_tx, e);
                    return;
                }
            };

            let path = match output_dir {
                Some(dir) => match save_pdf(&pdf, dir).await {
                    Ok(path) => Some(path),
                    Err(e) => {
                        send_error(update_tx, e);
                        return;
                    }
                },
                None => None,
            };

            let _ = update_tx.send(SessionUpdate::Generated { pdf, path });
            send_snapshot(session, update_tx);
        }
        SessionCommand::Shutdown => {}
    }
}

fn send_snapshot<C>(session: &Session<C>, update_tx: &mpsc::UnboundedSender<SessionUpdate>) {
    let _ = update_tx.send(SessionUpdate::SelectionChanged {
        snapshot: SelectionSnapshot::capture(&session.selection, &session.config),
    });
}

fn send_error(update_tx: &mpsc::UnboundedSender<SessionUpdate>, error: impl std::fmt::Display) {
    log::warn!("{}", error);
    let _ = update_tx.send(SessionUpdate::Error {
        message: error.to_string(),
    });
}
