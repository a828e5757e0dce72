use super::{Frame, LabelRole, Point, Rect, RenderTarget};
use crate::error::SpResult;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Cell {
        rect: Rect,
        occupant: Option<String>,
    },
    Label {
        at: Point,
        text: String,
        role: LabelRole,
    },
    Arrow {
        from: Point,
        to: Point,
        label: String,
    },
}

/// Keeps every draw call in memory instead of producing an image.
/// Backs `--dry-run` and the renderer tests.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    pending: Vec<DrawCall>,
    frames: Vec<(Frame, Vec<DrawCall>)>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[(Frame, Vec<DrawCall>)] {
        &self.frames
    }

    pub fn frame_keys(&self) -> Vec<&str> {
        self.frames.iter().map(|(f, _)| f.key.as_str()).collect()
    }

    pub fn calls(&self, step: usize) -> Option<&[DrawCall]> {
        self.frames
            .iter()
            .find(|(f, _)| f.step == step)
            .map(|(_, calls)| calls.as_slice())
    }

    pub fn labels(&self, step: usize, role: LabelRole) -> Vec<&str> {
        self.calls(step)
            .unwrap_or_default()
            .iter()
            .filter_map(|c| match c {
                DrawCall::Label { text, role: r, .. } if *r == role => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl RenderTarget for RecordingTarget {
    fn draw_cell(&mut self, rect: Rect, occupant: Option<&str>) {
        self.pending.push(DrawCall::Cell {
            rect,
            occupant: occupant.map(str::to_string),
        });
    }

    fn draw_label(&mut self, at: Point, text: &str, role: LabelRole) {
        self.pending.push(DrawCall::Label {
            at,
            text: text.to_string(),
            role,
        });
    }

    fn draw_arrow(&mut self, from: Point, to: Point, label: &str) {
        self.pending.push(DrawCall::Arrow {
            from,
            to,
            label: label.to_string(),
        });
    }

    fn finish(&mut self, frame: &Frame) -> SpResult<()> {
        let calls = std::mem::take(&mut self.pending);
        self.frames.push((frame.clone(), calls));
        Ok(())
    }
}
