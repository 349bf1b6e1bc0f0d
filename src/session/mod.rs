//! Point-selection session: every user action produces the next session and,
//! at most, one effect for the event loop to run.

use std::path::PathBuf;
use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::backend::SourceImage;
use crate::export::{ExportJob, OutputDocument};
use crate::overlay::{MarkerStyle, annotate};
use crate::scale::{MarkedPoint, PixelPoint, ScaleInputs};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointSlot {
    Start,
    End,
}

impl PointSlot {
    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }

    pub fn label(self, already_set: bool) -> &'static str {
        match (self, already_set) {
            (Self::Start, false) => "Select Start",
            (Self::Start, true) => "Re-select Start",
            (Self::End, false) => "Select End",
            (Self::End, true) => "Re-select End",
        }
    }
}

#[derive(Debug, Clone)]
pub enum ExportState {
    Idle,
    Finalizing { revision: u64 },
    Ready(Arc<OutputDocument>),
}

#[derive(Debug, Clone)]
pub enum Action {
    LoadImage(SourceImage),
    SelectTarget(PointSlot),
    Mark(PixelPoint),
    SetPhysicalDistance(String),
    SetDesiredScale(String),
    RequestExport,
    ExportFinished {
        revision: u64,
        document: OutputDocument,
    },
    ExportFailed {
        revision: u64,
        message: String,
    },
    DocumentSaved(PathBuf),
    ShowAlert(String),
    DismissAlert,
}

#[derive(Debug, Clone)]
pub enum Effect {
    Export(ExportJob),
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub session: Session,
    pub effect: Option<Effect>,
}

#[derive(Debug, Clone)]
pub struct Session {
    image: Option<SourceImage>,
    start: MarkedPoint,
    end: MarkedPoint,
    target: PointSlot,
    physical_distance: String,
    desired_scale: String,
    annotated: Option<Arc<RgbaImage>>,
    export: ExportState,
    revision: u64,
    alert: Option<String>,
    saved_to: Option<PathBuf>,
    style: MarkerStyle,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(4.0, MarkerStyle::default())
    }
}

impl Session {
    pub fn new(default_scale: f64, style: MarkerStyle) -> Self {
        Self {
            image: None,
            start: MarkedPoint::UNSET,
            end: MarkedPoint::UNSET,
            target: PointSlot::Start,
            physical_distance: String::new(),
            desired_scale: format!("{default_scale}"),
            annotated: None,
            export: ExportState::Idle,
            revision: 0,
            alert: None,
            saved_to: None,
            style,
        }
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn point(&self, slot: PointSlot) -> MarkedPoint {
        match slot {
            PointSlot::Start => self.start,
            PointSlot::End => self.end,
        }
    }

    pub fn target(&self) -> PointSlot {
        self.target
    }

    pub fn slot_label(&self, slot: PointSlot) -> &'static str {
        slot.label(self.point(slot).updated)
    }

    pub fn physical_distance_text(&self) -> &str {
        &self.physical_distance
    }

    pub fn desired_scale_text(&self) -> &str {
        &self.desired_scale
    }

    /// Source image with the markers drawn in.
    pub fn annotated(&self) -> Option<&Arc<RgbaImage>> {
        self.annotated.as_ref()
    }

    pub fn export_state(&self) -> &ExportState {
        &self.export
    }

    pub fn ready_document(&self) -> Option<&Arc<OutputDocument>> {
        match &self.export {
            ExportState::Ready(document) => Some(document),
            ExportState::Idle | ExportState::Finalizing { .. } => None,
        }
    }

    pub fn can_save(&self) -> bool {
        self.ready_document().is_some()
    }

    pub fn is_finalizing(&self) -> bool {
        matches!(self.export, ExportState::Finalizing { .. })
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn saved_to(&self) -> Option<&PathBuf> {
        self.saved_to.as_ref()
    }

    pub fn scale_inputs(&self) -> ScaleInputs {
        ScaleInputs {
            image_size: self.image.as_ref().map(SourceImage::dimensions),
            start: self.start,
            end: self.end,
            physical_distance: parse_field(&self.physical_distance),
            desired_scale: parse_field(&self.desired_scale),
        }
    }

    pub fn apply(mut self, action: Action) -> Transition {
        let effect = match action {
            Action::LoadImage(image) => {
                info!(
                    path = %image.path().display(),
                    width = image.width(),
                    height = image.height(),
                    "image loaded"
                );
                self.annotated = Some(image.shared_pixels());
                self.image = Some(image);
                self.start = MarkedPoint::UNSET;
                self.end = MarkedPoint::UNSET;
                self.target = PointSlot::Start;
                self.inputs_changed();
                None
            }
            Action::SelectTarget(slot) => {
                self.target = slot;
                None
            }
            Action::Mark(point) => {
                self.mark(point);
                None
            }
            Action::SetPhysicalDistance(text) => {
                if text != self.physical_distance {
                    self.physical_distance = text;
                    self.inputs_changed();
                }
                None
            }
            Action::SetDesiredScale(text) => {
                if text != self.desired_scale {
                    self.desired_scale = text;
                    self.inputs_changed();
                }
                None
            }
            Action::RequestExport => self.request_export(),
            Action::ExportFinished { revision, document } => {
                if self.accepts_completion(revision) {
                    info!(
                        revision,
                        zoom = document.zoom_factor(),
                        bytes = document.byte_len(),
                        "export ready"
                    );
                    self.export = ExportState::Ready(Arc::new(document));
                } else {
                    debug!(revision, current = self.revision, "discarding stale export");
                }
                None
            }
            Action::ExportFailed { revision, message } => {
                if self.accepts_completion(revision) {
                    warn!(revision, %message, "export failed");
                    self.export = ExportState::Idle;
                    self.alert = Some(format!("Export failed: {message}"));
                }
                None
            }
            Action::DocumentSaved(path) => {
                info!(path = %path.display(), "document saved");
                self.saved_to = Some(path);
                None
            }
            Action::ShowAlert(message) => {
                self.alert = Some(message);
                None
            }
            Action::DismissAlert => {
                self.alert = None;
                None
            }
        };
        Transition {
            session: self,
            effect,
        }
    }

    fn mark(&mut self, point: PixelPoint) {
        let Some(image) = self.image.as_ref() else {
            return;
        };
        if !point.is_within(image.width(), image.height()) {
            return;
        }

        let marked = MarkedPoint::at(point);
        let slot = self.target;
        match slot {
            PointSlot::Start => {
                let first_time = !self.start.updated;
                self.start = marked;
                if first_time {
                    self.target = PointSlot::End;
                }
            }
            PointSlot::End => self.end = marked,
        }
        debug!(slot = slot.name(), x = point.x, y = point.y, "point marked");
        self.redraw();
        self.inputs_changed();
    }

    fn request_export(&mut self) -> Option<Effect> {
        if matches!(self.export, ExportState::Finalizing { revision } if revision == self.revision)
        {
            return None;
        }

        let request = match self.scale_inputs().validate() {
            Ok(request) => request,
            Err(blocked) => {
                warn!(reason = %blocked, "export blocked");
                self.alert = Some(blocked.to_string());
                return None;
            }
        };
        let image = self.image.clone()?;

        self.export = ExportState::Finalizing {
            revision: self.revision,
        };
        info!(
            revision = self.revision,
            zoom = request.zoom_factor(),
            "export requested"
        );
        Some(Effect::Export(ExportJob {
            revision: self.revision,
            image,
            request,
        }))
    }

    fn accepts_completion(&self, revision: u64) -> bool {
        revision == self.revision
            && matches!(self.export, ExportState::Finalizing { revision: pending } if pending == revision)
    }

    fn inputs_changed(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        self.export = ExportState::Idle;
        self.saved_to = None;
    }

    fn redraw(&mut self) {
        let Some(image) = self.image.as_ref() else {
            self.annotated = None;
            return;
        };
        self.annotated = Some(Arc::new(annotate(
            image.pixels(),
            self.start.location(),
            self.end.location(),
            self.style,
        )));
    }
}

/// Text that does not parse as a number counts as unset.
pub fn parse_field(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}
