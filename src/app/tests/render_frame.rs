use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::{Event, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use image::{Rgba, RgbaImage};

use crate::app::App;
use crate::backend::PdfPreview;
use crate::command::{Command, CommandOutcome};
use crate::config::Config;
use crate::config::tests::unique_temp_path;
use crate::presenter::PresenterKind;
use crate::scale::PixelPoint;
use crate::prompt::PromptKind;
use crate::session::{ExportState, PointSlot};

use super::terminal_surface::TestTerminalSurface;

fn app_with_image(tag: &str, width: u32, height: u32) -> (App, PathBuf) {
    let path = unique_temp_path(tag).with_extension("png");
    RgbaImage::from_pixel(width, height, Rgba([240, 240, 240, 255]))
        .save(&path)
        .expect("fixture image should be written");
    let mut app = App::new_with_config(PresenterKind::RatatuiImage, Config::default())
        .expect("app init");
    app.open_image(path.clone()).expect("open should not error");
    assert!(app.state.session.image().is_some());
    (app, path)
}

fn run(app: &mut App, command: Command) -> CommandOutcome {
    app.dispatch_command(command)
        .expect("dispatch should succeed")
        .outcome
}

fn left_click(column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

#[test]
fn empty_app_renders_placeholder_and_panel() {
    let mut app = App::new_with_config(PresenterKind::RatatuiImage, Config::default())
        .expect("app init");
    let mut surface = TestTerminalSurface::new(100, 30).expect("test terminal should initialize");

    app.render_frame(&mut surface).expect("render should succeed");

    let text = surface.buffer_text();
    assert!(text.contains("No image loaded"));
    assert!(text.contains("[o] Open an image"));
    assert!(text.contains("NORMAL"));
    assert!(app.render.geometry.is_none());
}

#[test]
fn click_on_rendered_image_marks_the_pixel_under_it() {
    let (mut app, path) = app_with_image("render_click", 200, 100);
    let mut surface = TestTerminalSurface::new(100, 30).expect("test terminal should initialize");
    app.render_frame(&mut surface).expect("render should succeed");

    let geometry = app.render.geometry.expect("image geometry should be recorded");
    assert_eq!(geometry.image_size, (200, 100));
    assert_eq!(geometry.area.x, 0);

    let outcome = app.handle_input_event(left_click(3, 2));
    let Some(Command::MarkAt { slot, x, y }) = outcome.command.clone() else {
        panic!("click should mark, got {:?}", outcome.command);
    };
    assert_eq!(slot, PointSlot::Start);
    let cell = geometry.cell_px;
    let expected_x = ((3.5 * f64::from(cell.0)) / geometry.transform.scale).floor();
    let expected_y = ((2.5 * f64::from(cell.1)) / geometry.transform.scale).floor();
    assert_eq!((x, y), (expected_x, expected_y));

    let command = outcome.command.expect("command should be present");
    assert_eq!(run(&mut app, command), CommandOutcome::Applied);
    assert_eq!(
        app.state.session.point(PointSlot::Start).location(),
        Some(PixelPoint::new(expected_x, expected_y))
    );
    assert_eq!(app.state.session.target(), PointSlot::End);
    fs::remove_file(&path).expect("fixture should be removed");
}

#[test]
fn clicks_are_ignored_while_prompt_is_open() {
    let (mut app, path) = app_with_image("render_prompt_click", 200, 100);
    let mut surface = TestTerminalSurface::new(100, 30).expect("test terminal should initialize");
    app.render_frame(&mut surface).expect("render should succeed");

    run(
        &mut app,
        Command::OpenPrompt {
            kind: PromptKind::PhysicalDistance,
            seed: None,
        },
    );
    app.render_frame(&mut surface).expect("render should succeed");
    assert!(surface.buffer_text().contains("Physical distance (ft)"));
    assert_eq!(app.handle_input_event(left_click(3, 2)).command, None);
    fs::remove_file(&path).expect("fixture should be removed");
}

#[tokio::test]
async fn export_save_and_preview_flow() {
    let (mut app, path) = app_with_image("render_export", 144, 72);
    run(&mut app, Command::MarkAt { slot: PointSlot::Start, x: 0.0, y: 0.0 });
    run(&mut app, Command::MarkAt { slot: PointSlot::End, x: 72.0, y: 0.0 });
    run(&mut app, Command::SetPhysicalDistance { value: "10".to_string() });
    run(&mut app, Command::SetDesiredScale { value: "5".to_string() });

    let dispatch = app
        .dispatch_command(Command::Export)
        .expect("dispatch should succeed");
    let effect = dispatch.effect.expect("export should yield an effect");
    assert!(app.state.session.is_finalizing());
    assert_eq!(run(&mut app, Command::Save { path: None }), CommandOutcome::Noop);

    let mut pending = None;
    app.run_effect(effect, &mut pending);
    let completion = pending
        .as_mut()
        .expect("export should be pending")
        .completion()
        .await;
    app.finish_export(completion);
    assert!(app.state.session.can_save());

    let output = unique_temp_path("render_export_out").with_extension("pdf");
    assert_eq!(
        run(&mut app, Command::Save { path: Some(output.clone()) }),
        CommandOutcome::Applied
    );
    let bytes = fs::read(&output).expect("saved pdf should be readable");
    let preview = PdfPreview::from_bytes(Arc::new(bytes)).expect("saved pdf should parse");
    let (width, height) = preview.page_dimensions(0).expect("page should exist");
    assert!((width - (144.0 * 2.0 + 144.0)).abs() < 0.5);
    assert!((height - (72.0 * 2.0 + 144.0)).abs() < 0.5);

    assert_eq!(run(&mut app, Command::TogglePreview), CommandOutcome::Applied);
    let mut surface = TestTerminalSurface::new(100, 30).expect("test terminal should initialize");
    app.render_frame(&mut surface).expect("render should succeed");
    assert!(app.state.view.preview);
    assert!(app.render.preview.is_some());
    assert!(app.render.geometry.is_none());

    fs::remove_file(&output).expect("output should be removed");
    fs::remove_file(&path).expect("fixture should be removed");
}

#[tokio::test]
async fn completion_for_outdated_inputs_does_not_enable_saving() {
    let (mut app, path) = app_with_image("render_stale", 100, 100);
    run(&mut app, Command::MarkAt { slot: PointSlot::Start, x: 10.0, y: 10.0 });
    run(&mut app, Command::MarkAt { slot: PointSlot::End, x: 60.0, y: 10.0 });
    run(&mut app, Command::SetPhysicalDistance { value: "3".to_string() });
    let effect = app
        .dispatch_command(Command::Export)
        .expect("dispatch should succeed")
        .effect
        .expect("export should yield an effect");

    let mut pending = None;
    app.run_effect(effect, &mut pending);
    run(&mut app, Command::MarkAt { slot: PointSlot::End, x: 80.0, y: 10.0 });

    let completion = pending
        .as_mut()
        .expect("export should be pending")
        .completion()
        .await;
    app.finish_export(completion);
    assert!(!app.state.session.can_save());
    assert!(matches!(app.state.session.export_state(), ExportState::Idle));
    fs::remove_file(&path).expect("fixture should be removed");
}
