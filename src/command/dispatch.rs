use std::collections::VecDeque;

use tracing::warn;

use crate::app::{AppState, Mode, PromptRequest, ViewState};
use crate::backend::SourceImage;
use crate::config::Config;
use crate::error::AppResult;
use crate::export::{default_output_path, save_document};
use crate::prompt::PromptKind;
use crate::scale::{PixelPoint, round2};
use crate::session::{Action, Effect, PointSlot};

use super::types::{ActionId, Command, CommandOutcome};

pub(crate) const ZOOM_MIN: f64 = 0.1;
pub(crate) const ZOOM_MAX: f64 = 16.0;

#[derive(Debug, Clone)]
pub struct CommandDispatchResult {
    pub outcome: CommandOutcome,
    pub effect: Option<Effect>,
}

impl CommandDispatchResult {
    fn applied() -> Self {
        Self {
            outcome: CommandOutcome::Applied,
            effect: None,
        }
    }

    fn noop() -> Self {
        Self {
            outcome: CommandOutcome::Noop,
            effect: None,
        }
    }
}

pub fn dispatch(
    app: &mut AppState,
    cmd: Command,
    config: &Config,
    prompt_requests: &mut VecDeque<PromptRequest>,
) -> AppResult<CommandDispatchResult> {
    let action_id = cmd.action_id();
    if app.session.alert().is_some() && !cmd.allowed_during_alert() {
        app.set_status(action_id, "dismiss the alert first (Esc)");
        return Ok(CommandDispatchResult::noop());
    }

    let result = match cmd {
        Command::OpenImage { path } => {
            match SourceImage::open(&path) {
                Ok(image) => {
                    let size = image.dimensions();
                    let name = image.file_name();
                    app.apply(Action::LoadImage(image));
                    app.view = ViewState::centered_on(size);
                    app.set_status(
                        action_id,
                        format!("opened {name} ({}x{})", size.0, size.1),
                    );
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to open image");
                    app.apply(Action::ShowAlert(err.to_string()));
                    app.set_status(action_id, "failed to open image");
                }
            }
            CommandDispatchResult::applied()
        }
        Command::SelectTarget { slot } => {
            app.apply(Action::SelectTarget(slot));
            app.set_status(action_id, format!("next mark sets the {} point", slot.name()));
            CommandDispatchResult::applied()
        }
        Command::MarkAt { slot, x, y } => mark(app, Some(slot), PixelPoint::new(x, y)),
        Command::MarkAtCursor => {
            let cursor = app.view.cursor;
            mark(app, None, cursor)
        }
        Command::MoveCursor { dx, dy } => {
            let Some(image) = app.session.image() else {
                app.set_status(action_id, "open an image first");
                return Ok(CommandDispatchResult::noop());
            };
            let (width, height) = image.dimensions();
            let step = f64::from(config.view.cursor_step_px);
            app.view.cursor = app
                .view
                .cursor
                .offset(f64::from(dx) * step, f64::from(dy) * step)
                .clamped_to(width, height);
            let cursor = app.view.cursor;
            app.set_status(action_id, format!("cursor ({}, {})", cursor.x, cursor.y));
            CommandDispatchResult::applied()
        }
        Command::Scroll { dx, dy } => {
            let step = f64::from(config.view.scroll_step_px);
            app.view.scroll = app
                .view
                .scroll
                .offset(f64::from(dx) * step, f64::from(dy) * step);
            app.set_status(action_id, "scrolled");
            CommandDispatchResult::applied()
        }
        Command::SetZoom { value } => set_zoom(app, value, action_id),
        Command::ZoomIn => {
            let value = app.view.zoom + config.view.zoom_step;
            set_zoom(app, value, action_id)
        }
        Command::ZoomOut => {
            let value = app.view.zoom - config.view.zoom_step;
            set_zoom(app, value, action_id)
        }
        Command::SetPhysicalDistance { value } => {
            app.set_status(action_id, format!("physical distance: {value} ft"));
            app.apply(Action::SetPhysicalDistance(value));
            CommandDispatchResult::applied()
        }
        Command::SetDesiredScale { value } => {
            app.set_status(action_id, format!("desired scale: {value} ft per inch"));
            app.apply(Action::SetDesiredScale(value));
            CommandDispatchResult::applied()
        }
        Command::OpenPrompt { kind, seed } => {
            prompt_requests.push_back(PromptRequest::Open { kind, seed });
            app.set_status(action_id, format!("editing {}", kind.id()));
            CommandDispatchResult::applied()
        }
        Command::ClosePrompt => {
            prompt_requests.push_back(PromptRequest::Close);
            app.set_status(action_id, "closing prompt");
            CommandDispatchResult::applied()
        }
        Command::Export => {
            let effect = app.apply(Action::RequestExport);
            let alert = app.session.alert().map(str::to_string);
            match (&effect, alert) {
                (Some(_), _) => app.set_status(action_id, "finalizing pdf..."),
                (None, Some(alert)) => app.set_status(action_id, alert),
                (None, None) => app.set_status(action_id, "pdf is already finalizing"),
            }
            CommandDispatchResult {
                outcome: if effect.is_some() {
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::Noop
                },
                effect,
            }
        }
        Command::Save { path } => save(app, path, config),
        Command::TogglePreview => {
            if app.session.ready_document().is_none() {
                app.view.preview = false;
                app.set_status(action_id, "nothing to preview: export first");
                return Ok(CommandDispatchResult::noop());
            }
            app.view.preview = !app.view.preview;
            let message = if app.view.preview {
                "showing pdf preview"
            } else {
                "showing image"
            };
            app.set_status(action_id, message);
            CommandDispatchResult::applied()
        }
        Command::DismissAlert => {
            if app.session.alert().is_none() {
                return Ok(CommandDispatchResult::noop());
            }
            app.apply(Action::DismissAlert);
            app.set_status(action_id, "alert dismissed");
            CommandDispatchResult::applied()
        }
        Command::Cancel => {
            if app.session.alert().is_some() {
                app.apply(Action::DismissAlert);
            } else if app.mode == Mode::Prompt {
                prompt_requests.push_back(PromptRequest::Close);
            } else {
                app.view.preview = false;
            }
            app.set_status(action_id, "canceled");
            CommandDispatchResult::applied()
        }
        Command::Quit => {
            app.set_status(action_id, "quit requested");
            CommandDispatchResult {
                outcome: CommandOutcome::QuitRequested,
                effect: None,
            }
        }
    };
    Ok(result)
}

/// Command-line seed for editing one of the numeric fields.
pub fn field_prompt_seed(app: &AppState, kind: PromptKind) -> String {
    match kind {
        PromptKind::Command => String::new(),
        PromptKind::PhysicalDistance => app.session.physical_distance_text().to_string(),
        PromptKind::DesiredScale => app.session.desired_scale_text().to_string(),
    }
}

fn mark(app: &mut AppState, slot: Option<PointSlot>, point: PixelPoint) -> CommandDispatchResult {
    let Some(image) = app.session.image() else {
        app.set_status(ActionId::Mark, "open an image first");
        return CommandDispatchResult::noop();
    };
    if !point.is_within(image.width(), image.height()) {
        app.set_status(
            ActionId::Mark,
            format!("({}, {}) is outside the image", point.x, point.y),
        );
        return CommandDispatchResult::noop();
    }

    if let Some(slot) = slot {
        app.apply(Action::SelectTarget(slot));
    }
    let slot = app.session.target();
    app.apply(Action::Mark(point));
    app.view.cursor = point;
    app.set_status(
        ActionId::Mark,
        format!("{} point set to ({}, {})", slot.name(), point.x, point.y),
    );
    CommandDispatchResult::applied()
}

fn set_zoom(app: &mut AppState, value: f64, id: ActionId) -> CommandDispatchResult {
    if !value.is_finite() {
        return CommandDispatchResult::noop();
    }
    let clamped = value.clamp(ZOOM_MIN, ZOOM_MAX);
    if (clamped - app.view.zoom).abs() < f64::EPSILON {
        app.set_status(id, format!("zoom {:.2}x", app.view.zoom));
        return CommandDispatchResult::noop();
    }
    app.view.zoom = clamped;
    app.set_status(id, format!("zoom {:.2}x", clamped));
    CommandDispatchResult::applied()
}

fn save(
    app: &mut AppState,
    path: Option<std::path::PathBuf>,
    config: &Config,
) -> CommandDispatchResult {
    let Some(document) = app.session.ready_document().cloned() else {
        let message = if app.session.is_finalizing() {
            "pdf is still finalizing"
        } else {
            "nothing to save: export first"
        };
        app.set_status(ActionId::Save, message);
        return CommandDispatchResult::noop();
    };
    let target = match (path, app.session.image()) {
        (Some(path), _) => path,
        (None, Some(image)) => default_output_path(image.path(), &config.export),
        (None, None) => {
            app.set_status(ActionId::Save, "nothing to save: export first");
            return CommandDispatchResult::noop();
        }
    };

    match save_document(&document, &target) {
        Ok(()) => {
            let (width_in, height_in) = document.size_on_paper_inches();
            app.set_status(
                ActionId::Save,
                format!(
                    "saved {} ({} x {} in)",
                    target.display(),
                    round2(width_in),
                    round2(height_in)
                ),
            );
            app.apply(Action::DocumentSaved(target));
        }
        Err(err) => {
            warn!(path = %target.display(), error = %err, "save failed");
            app.apply(Action::ShowAlert(format!("Save failed: {err}")));
            app.set_status(ActionId::Save, "save failed");
        }
    }
    CommandDispatchResult::applied()
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::fs;

    use image::{Rgba, RgbaImage};

    use crate::app::{AppState, Mode, PromptRequest};
    use crate::command::{ActionId, Command, CommandOutcome};
    use crate::config::Config;
    use crate::config::tests::unique_temp_path;
    use crate::session::{Action, Effect, PointSlot};

    use super::dispatch;

    fn run(app: &mut AppState, cmd: Command) -> super::CommandDispatchResult {
        let mut requests = VecDeque::new();
        dispatch(app, cmd, &Config::default(), &mut requests).expect("dispatch should succeed")
    }

    fn loaded_app() -> (AppState, std::path::PathBuf) {
        let path = unique_temp_path("dispatch").with_extension("png");
        RgbaImage::from_pixel(200, 100, Rgba([255, 255, 255, 255]))
            .save(&path)
            .expect("fixture image should be written");
        let mut app = AppState::default();
        let result = run(&mut app, Command::OpenImage { path: path.clone() });
        assert_eq!(result.outcome, CommandOutcome::Applied);
        (app, path)
    }

    #[test]
    fn open_image_loads_and_centers_cursor() {
        let (app, path) = loaded_app();
        assert_eq!(
            app.session.image().map(|image| image.dimensions()),
            Some((200, 100))
        );
        assert_eq!(app.view.cursor.x, 100.0);
        assert_eq!(app.view.cursor.y, 50.0);
        assert_eq!(app.status.last_action_id, Some(ActionId::OpenImage));
        fs::remove_file(path).expect("fixture should be removed");
    }

    #[test]
    fn open_missing_image_raises_alert() {
        let mut app = AppState::default();
        run(
            &mut app,
            Command::OpenImage {
                path: unique_temp_path("absent.png"),
            },
        );
        assert!(app.session.alert().is_some());
        assert!(app.session.image().is_none());
    }

    #[test]
    fn alert_blocks_commands_until_dismissed() {
        let mut app = AppState::default();
        let result = run(&mut app, Command::Export);
        assert!(result.effect.is_none());
        assert_eq!(app.session.alert(), Some("You must select an image first"));

        let blocked = run(&mut app, Command::ZoomIn);
        assert_eq!(blocked.outcome, CommandOutcome::Noop);
        assert_eq!(app.view.zoom, 1.0);

        run(&mut app, Command::DismissAlert);
        assert_eq!(app.session.alert(), None);
        run(&mut app, Command::ZoomIn);
        assert_eq!(app.view.zoom, 1.25);
    }

    #[test]
    fn mark_commands_set_points_and_export_yields_job() {
        let (mut app, path) = loaded_app();
        run(
            &mut app,
            Command::MarkAt {
                slot: PointSlot::Start,
                x: 0.0,
                y: 0.0,
            },
        );
        run(
            &mut app,
            Command::MarkAt {
                slot: PointSlot::End,
                x: 72.0,
                y: 0.0,
            },
        );
        run(
            &mut app,
            Command::SetPhysicalDistance {
                value: "10".to_string(),
            },
        );
        run(
            &mut app,
            Command::SetDesiredScale {
                value: "5".to_string(),
            },
        );

        let result = run(&mut app, Command::Export);
        let Some(Effect::Export(job)) = result.effect else {
            panic!("export effect expected");
        };
        assert_eq!(job.request.zoom_factor(), 2.0);
        assert_eq!(app.status.message, "finalizing pdf...");
        fs::remove_file(path).expect("fixture should be removed");
    }

    #[test]
    fn cursor_moves_in_steps_and_marks_the_current_target() {
        let (mut app, path) = loaded_app();
        run(&mut app, Command::MoveCursor { dx: 2, dy: -1 });
        assert_eq!((app.view.cursor.x, app.view.cursor.y), (120.0, 40.0));

        run(&mut app, Command::MoveCursor { dx: 100, dy: 100 });
        assert_eq!((app.view.cursor.x, app.view.cursor.y), (199.0, 99.0));

        run(&mut app, Command::MarkAtCursor);
        let start = app.session.point(PointSlot::Start);
        assert!(start.updated);
        assert_eq!((start.location.x, start.location.y), (199.0, 99.0));
        assert_eq!(app.session.target(), PointSlot::End);
        fs::remove_file(path).expect("fixture should be removed");
    }

    #[test]
    fn marking_outside_the_image_is_ignored() {
        let (mut app, path) = loaded_app();
        let result = run(
            &mut app,
            Command::MarkAt {
                slot: PointSlot::Start,
                x: 500.0,
                y: 5.0,
            },
        );
        assert_eq!(result.outcome, CommandOutcome::Noop);
        assert!(!app.session.point(PointSlot::Start).updated);
        fs::remove_file(path).expect("fixture should be removed");
    }

    #[test]
    fn save_and_preview_wait_for_a_ready_document() {
        let mut app = AppState::default();
        assert_eq!(
            run(&mut app, Command::Save { path: None }).outcome,
            CommandOutcome::Noop
        );
        assert_eq!(app.status.message, "nothing to save: export first");
        assert_eq!(
            run(&mut app, Command::TogglePreview).outcome,
            CommandOutcome::Noop
        );
        assert!(!app.view.preview);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut app = AppState::default();
        run(&mut app, Command::SetZoom { value: 100.0 });
        assert_eq!(app.view.zoom, super::ZOOM_MAX);
        run(&mut app, Command::SetZoom { value: 0.0001 });
        assert_eq!(app.view.zoom, super::ZOOM_MIN);
    }

    #[test]
    fn cancel_closes_prompt_before_anything_else() {
        let mut app = AppState {
            mode: Mode::Prompt,
            ..AppState::default()
        };
        let mut requests = VecDeque::new();
        dispatch(&mut app, Command::Cancel, &Config::default(), &mut requests)
            .expect("dispatch should succeed");
        assert_eq!(requests.pop_front(), Some(PromptRequest::Close));

        app.apply(Action::ShowAlert("boom".to_string()));
        dispatch(&mut app, Command::Cancel, &Config::default(), &mut requests)
            .expect("dispatch should succeed");
        assert_eq!(app.session.alert(), None);
        assert!(requests.is_empty());
    }

    #[test]
    fn quit_requests_exit() {
        let mut app = AppState::default();
        assert_eq!(
            run(&mut app, Command::Quit).outcome,
            CommandOutcome::QuitRequested
        );
    }
}
