use crossterm::event::Event;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use crate::command::{ActionId, CommandOutcome};
use crate::error::AppResult;
use crate::event::DomainEvent;
use crate::export::{ExportCompletion, ExportOptions, PendingExport, spawn_export};
use crate::session::{Action, Effect};

use super::core::App;
use super::state::Mode;
use super::event_bus::EventBusRuntime;
use super::terminal_session::{TerminalSession, TerminalSurface};

struct LoopRuntime {
    session: TerminalSession,
    loop_event_rx: UnboundedReceiver<DomainEvent>,
    loop_event_runtime: EventBusRuntime,
    pending_export: Option<PendingExport>,
    needs_redraw: bool,
    needs_clear: bool,
}

enum WaitEvent {
    Event(DomainEvent),
    ExportComplete(ExportCompletion),
    Closed,
}

enum LoopControl {
    Continue,
    Break,
}

impl App {
    pub async fn run(&mut self) -> AppResult<()> {
        let mut runtime = self.initialize_loop_runtime()?;

        loop {
            if self.interaction.apply_prompt_requests(&mut self.state) {
                runtime.needs_redraw = true;
            }
            if runtime.needs_clear {
                // Graphics protocols leave images behind closed overlays.
                runtime.session.clear()?;
                self.render.presenter.clear();
                runtime.needs_clear = false;
                runtime.needs_redraw = true;
            }
            if runtime.needs_redraw {
                self.render_frame(&mut runtime.session)?;
                runtime.needs_redraw = false;
            }

            let waited =
                wait_next_event(&mut runtime.loop_event_rx, &mut runtime.pending_export).await;
            let overlay_before = self.overlay_visible();
            let resized = matches!(
                waited,
                WaitEvent::Event(DomainEvent::Input(Event::Resize(_, _)))
            );
            let control = self.handle_waited_event(waited, &mut runtime)?;
            if resized || (overlay_before && !self.overlay_visible()) {
                runtime.needs_clear = true;
            }
            if matches!(control, LoopControl::Break) {
                break;
            }
        }

        runtime.loop_event_runtime.shutdown();
        runtime.session.restore()?;
        info!("terminal ui closed");
        Ok(())
    }

    fn initialize_loop_runtime(&mut self) -> AppResult<LoopRuntime> {
        let session = TerminalSession::enter()?;
        self.render.presenter.initialize_terminal()?;
        let (_loop_event_tx, loop_event_rx, loop_event_runtime) = EventBusRuntime::spawn();
        info!(
            presenter = %self.render.presenter.status_label(),
            "terminal ui started"
        );

        Ok(LoopRuntime {
            session,
            loop_event_rx,
            loop_event_runtime,
            pending_export: None,
            needs_redraw: true,
            needs_clear: false,
        })
    }

    fn handle_waited_event(
        &mut self,
        waited: WaitEvent,
        runtime: &mut LoopRuntime,
    ) -> AppResult<LoopControl> {
        match waited {
            WaitEvent::Event(DomainEvent::Input(event)) => {
                let outcome = self.handle_input_event(event);
                if outcome.redraw {
                    runtime.needs_redraw = true;
                }
                if let Some(command) = outcome.command {
                    return self.handle_waited_event(
                        WaitEvent::Event(DomainEvent::Command(command)),
                        runtime,
                    );
                }
            }
            WaitEvent::Event(DomainEvent::InputError(message)) => {
                self.state
                    .set_status(ActionId::Input, format!("input error: {message}"));
                runtime.needs_redraw = true;
            }
            WaitEvent::Event(DomainEvent::Command(command)) => {
                let dispatch = self.dispatch_command(command)?;
                if let Some(effect) = dispatch.effect {
                    self.run_effect(effect, &mut runtime.pending_export);
                }
                runtime.needs_redraw = true;
                if dispatch.outcome == CommandOutcome::QuitRequested {
                    return Ok(LoopControl::Break);
                }
            }
            WaitEvent::ExportComplete(completion) => {
                runtime.pending_export = None;
                self.finish_export(completion);
                runtime.needs_redraw = true;
            }
            WaitEvent::Closed => return Ok(LoopControl::Break),
        }
        Ok(LoopControl::Continue)
    }

    fn overlay_visible(&self) -> bool {
        self.state.mode == Mode::Prompt || self.state.session.alert().is_some()
    }

    /// Starts the background finalize. A newer export replaces the pending one;
    /// its completion is never awaited.
    pub(crate) fn run_effect(&mut self, effect: Effect, pending: &mut Option<PendingExport>) {
        match effect {
            Effect::Export(job) => {
                if let Some(previous) = pending.as_ref() {
                    warn!(
                        superseded = previous.revision(),
                        revision = job.revision,
                        "replacing pending export"
                    );
                }
                *pending = Some(spawn_export(job, ExportOptions::from(&self.config.export)));
            }
        }
    }

    pub(crate) fn finish_export(&mut self, completion: ExportCompletion) {
        let ExportCompletion { revision, result } = completion;
        match result {
            Ok(document) => {
                self.state.apply(Action::ExportFinished { revision, document });
            }
            Err(err) => {
                self.state.apply(Action::ExportFailed {
                    revision,
                    message: err.to_string(),
                });
            }
        }

        let message = if self.state.session.can_save() {
            "pdf ready: press w to save"
        } else if self.state.session.alert().is_some() {
            "export failed"
        } else {
            "discarded outdated export"
        };
        self.state.set_status(ActionId::ExportComplete, message);
        self.render.preview = None;
    }
}

async fn next_completion(pending: &mut Option<PendingExport>) -> ExportCompletion {
    match pending.as_mut() {
        Some(pending) => pending.completion().await,
        None => std::future::pending().await,
    }
}

async fn wait_next_event(
    loop_event_rx: &mut UnboundedReceiver<DomainEvent>,
    pending_export: &mut Option<PendingExport>,
) -> WaitEvent {
    tokio::select! {
        biased;
        completion = next_completion(pending_export) => WaitEvent::ExportComplete(completion),
        maybe_loop = loop_event_rx.recv() => {
            match maybe_loop {
                Some(event) => WaitEvent::Event(event),
                None => WaitEvent::Closed,
            }
        },
    }
}
