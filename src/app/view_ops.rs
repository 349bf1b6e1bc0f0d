use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use ratatui::layout::Rect;
use ratatui::widgets::Clear;

use crate::backend::PdfPreview;
use crate::command::ActionId;
use crate::error::{AppError, AppResult};
use crate::input::mouse::ViewerGeometry;
use crate::overlay::{ViewportTransform, clamp_scroll, fit_scale};
use crate::presenter::{DisplayRequest, FrameKey, build_display_frame};
use crate::scale::PixelPoint;
use crate::ui;

use super::core::{App, PreviewFrame};
use super::terminal_session::TerminalSurface;

const NO_IMAGE_MESSAGE: &str = "No image loaded. Press o to open one.";

enum ViewerContent {
    Frame,
    Placeholder(&'static str),
}

impl App {
    pub(crate) fn render_frame(&mut self, session: &mut impl TerminalSurface) -> AppResult<()> {
        let size = session.size()?;
        let layout = ui::split_layout(Rect::new(0, 0, size.width, size.height));
        let content = self.prepare_viewer(layout.viewer);
        let prompt_view = self.interaction.prompt_view();
        let presenter_label = self.render.presenter.status_label();
        let state = &self.state;
        let presenter = self.render.presenter.as_mut();
        let mut render_error: Option<String> = None;

        session.draw(|frame| {
            frame.render_widget(Clear, layout.viewer);
            match content {
                ViewerContent::Frame => match presenter.render(frame, layout.viewer) {
                    Ok(true) => {}
                    Ok(false) => ui::draw_placeholder(frame, layout.viewer, "rendering..."),
                    Err(err) => render_error = Some(err.to_string()),
                },
                ViewerContent::Placeholder(message) => {
                    ui::draw_placeholder(frame, layout.viewer, message);
                }
            }
            ui::draw_settings_panel(frame, layout.panel, state);
            ui::draw_status(frame, layout.status, state, &presenter_label);

            if let Some(view) = prompt_view.as_ref() {
                ui::draw_prompt_overlay(frame, layout.viewer, view);
            }
            if let Some(alert) = state.session.alert() {
                ui::draw_alert_overlay(frame, frame.area(), alert);
            }
        })?;

        if let Some(err) = render_error {
            self.state
                .set_status(ActionId::RenderFrame, format!("render error: {err}"));
        }
        Ok(())
    }

    /// Hands the presenter the frame for the current view and records the
    /// click geometry that goes with it.
    fn prepare_viewer(&mut self, viewer: Rect) -> ViewerContent {
        let cell_px = self.render.presenter.capabilities().cell_px;
        let viewer_px = (
            u32::from(viewer.width) * u32::from(cell_px.0),
            u32::from(viewer.height) * u32::from(cell_px.1),
        );
        self.render.geometry = None;
        if viewer_px.0 == 0 || viewer_px.1 == 0 {
            return ViewerContent::Placeholder("");
        }

        if self.state.view.preview {
            return match self.prepare_preview(viewer_px) {
                Ok(()) => ViewerContent::Frame,
                Err(err) => {
                    self.state.view.preview = false;
                    self.state
                        .set_status(ActionId::TogglePreview, format!("preview failed: {err}"));
                    ViewerContent::Placeholder("preview unavailable")
                }
            };
        }

        let Some(annotated) = self.state.session.annotated().cloned() else {
            self.render.presenter.clear();
            return ViewerContent::Placeholder(NO_IMAGE_MESSAGE);
        };
        let image_size = annotated.dimensions();
        let scale = fit_scale(viewer_px, image_size) * self.state.view.zoom;
        let clamped = clamp_scroll(self.state.view.scroll, scale, viewer_px, image_size);
        let scroll = PixelPoint::new(clamped.x.floor(), clamped.y.floor());
        self.state.view.scroll = scroll;

        let origin = (
            f64::from(viewer.x) * f64::from(cell_px.0),
            f64::from(viewer.y) * f64::from(cell_px.1),
        );
        self.render.geometry = Some(ViewerGeometry {
            area: viewer,
            cell_px,
            transform: ViewportTransform::new(origin, scroll, scale),
            image_size,
        });

        let cursor = self.state.view.cursor;
        let key = frame_key(&(
            "image",
            Arc::as_ptr(&annotated) as usize,
            self.state.session.revision(),
            scroll.x.to_bits(),
            scroll.y.to_bits(),
            scale.to_bits(),
            viewer_px,
            cursor.x.to_bits(),
            cursor.y.to_bits(),
        ));
        if self.render.presenter.is_prepared(key) {
            return ViewerContent::Frame;
        }

        let prepared = build_display_frame(DisplayRequest {
            source: &annotated,
            scroll,
            scale,
            viewer_px,
            cursor: Some(cursor),
        })
        .and_then(|frame| self.render.presenter.prepare(key, frame));
        match prepared {
            Ok(()) => ViewerContent::Frame,
            Err(err) => {
                self.state
                    .set_status(ActionId::RenderFrame, format!("render error: {err}"));
                ViewerContent::Placeholder("image could not be displayed")
            }
        }
    }

    fn prepare_preview(&mut self, viewer_px: (u32, u32)) -> AppResult<()> {
        let Some(document) = self.state.session.ready_document().cloned() else {
            return Err(AppError::invalid_argument("no finalized document"));
        };
        let document_id = Arc::as_ptr(&document.bytes) as usize;
        let cached = self
            .render
            .preview
            .as_ref()
            .is_some_and(|preview| preview.document == document_id && preview.viewer_px == viewer_px);
        if !cached {
            let pdf = PdfPreview::from_bytes(Arc::clone(&document.bytes))?;
            let image = pdf.render_fit(0, viewer_px.0, viewer_px.1)?;
            self.render.preview = Some(PreviewFrame {
                document: document_id,
                viewer_px,
                image,
            });
        }

        let Some(preview) = self.render.preview.as_ref() else {
            return Ok(());
        };
        let key = frame_key(&("preview", document_id, viewer_px));
        if !self.render.presenter.is_prepared(key) {
            self.render.presenter.prepare(key, preview.image.clone())?;
        }
        Ok(())
    }
}

fn frame_key(parts: &impl Hash) -> FrameKey {
    let mut hasher = DefaultHasher::new();
    parts.hash(&mut hasher);
    FrameKey(hasher.finish())
}
