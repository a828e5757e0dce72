pub mod recording;
pub mod svg;

pub use self::recording::{DrawCall, RecordingTarget};
pub use self::svg::SvgTarget;

use crate::core_types::{Location, Move, SlotPos};
use crate::domain::DomainModel;
use crate::error::{SlotPlanError, SpResult};
use crate::state::ScenarioState;
use std::path::Path;

// Layout constants, in grid units (one cell = 1x1).
const LOCATION_LABEL_Y: f32 = -0.6;
const SLOT_LABEL_X: f32 = -0.3;
const DISTANCE_LABEL_Y: f32 = -1.05;
const ARROW_Y: f32 = -1.35;
const MARGIN_LEFT: f32 = 0.8;
const MARGIN_BOTTOM: f32 = 1.8;
const MARGIN_FAR: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box; `(x, y)` is the lower-left corner, y grows upward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRole {
    Location,
    Slot,
    Distance,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

/// Identity and framing of one rendered snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub step: usize,
    pub key: String,
    pub caption: String,
    pub bounds: Bounds,
}

/// Drawing surface a frame is projected onto.
///
/// Calls for one frame arrive in order and are closed by `finish`.
pub trait RenderTarget {
    fn draw_cell(&mut self, rect: Rect, occupant: Option<&str>);
    fn draw_label(&mut self, at: Point, text: &str, role: LabelRole);
    fn draw_arrow(&mut self, from: Point, to: Point, label: &str);
    fn finish(&mut self, frame: &Frame) -> SpResult<()>;

    /// Where finished frames end up, if anywhere.
    fn destination(&self) -> Option<&Path> {
        None
    }
}

/// Digits needed so every key of a plan with `plan_len` steps has the same
/// width. Never less than three.
pub fn key_width(plan_len: usize) -> usize {
    plan_len.to_string().len().max(3)
}

/// Output key for a step, zero-padded to `width` so keys sort in step order.
pub fn frame_key(step: usize, width: usize) -> String {
    format!("step_{:0width$}", step, width = width)
}

/// Projects a [`ScenarioState`] onto a [`RenderTarget`].
///
/// Columns are the state's locations in lexical order, rows its slot
/// positions from lowest to highest. Nothing about the layout is fixed:
/// any number of locations and slots renders the same way.
pub struct FrameRenderer<'a> {
    domain: &'a DomainModel,
    key_width: usize,
}

impl<'a> FrameRenderer<'a> {
    pub fn new(domain: &'a DomainModel) -> Self {
        Self {
            domain,
            key_width: key_width(0),
        }
    }

    /// Widens frame keys to fit every step of a plan of this length.
    pub fn for_plan(mut self, plan_len: usize) -> Self {
        self.key_width = key_width(plan_len);
        self
    }

    pub fn render(
        &self,
        state: &ScenarioState,
        step: usize,
        title: &str,
        annotation: Option<&Move>,
        target: &mut dyn RenderTarget,
    ) -> SpResult<Frame> {
        let locs: Vec<&Location> = state.locations().collect();
        let slots: Vec<SlotPos> = state.slots();

        for (xi, loc) in locs.iter().enumerate() {
            for (yi, &slot) in slots.iter().enumerate() {
                let Some(value) = state.get(loc, slot) else {
                    continue;
                };
                let rect = Rect {
                    x: xi as f32,
                    y: yi as f32,
                    w: 1.0,
                    h: 1.0,
                };
                target.draw_cell(rect, value.item().map(|i| i.as_str()));
            }
            target.draw_label(
                Point::new(xi as f32 + 0.5, LOCATION_LABEL_Y),
                loc.as_str(),
                LabelRole::Location,
            );
        }

        for (yi, slot) in slots.iter().enumerate() {
            target.draw_label(
                Point::new(SLOT_LABEL_X, yi as f32 + 0.5),
                &format!("pos {}", slot),
                LabelRole::Slot,
            );
        }

        for (i, pair) in locs.windows(2).enumerate() {
            let text = match self.domain.distance_entry(pair[0], pair[1]) {
                Some(d) => format!("dist={}", d),
                None => "dist=?".to_string(),
            };
            target.draw_label(
                Point::new(i as f32 + 1.0, DISTANCE_LABEL_Y),
                &text,
                LabelRole::Distance,
            );
        }

        if let Some(mv) = annotation {
            let column = |loc: &Location| {
                locs.iter()
                    .position(|l| *l == loc)
                    .map(|i| i as f32 + 0.5)
                    .ok_or_else(|| SlotPlanError::unknown_key("location", loc))
            };
            let x1 = column(&mv.from.location)?;
            let x2 = column(&mv.to.location)?;
            target.draw_arrow(
                Point::new(x1, ARROW_Y),
                Point::new(x2, ARROW_Y),
                &mv.to_string(),
            );
        }

        let frame = Frame {
            step,
            key: frame_key(step, self.key_width),
            caption: format!("{} — step {}", title, step),
            bounds: Bounds {
                x_min: -MARGIN_LEFT,
                x_max: locs.len() as f32 + MARGIN_FAR,
                y_min: -MARGIN_BOTTOM,
                y_max: slots.len() as f32 + MARGIN_FAR,
            },
        };
        target.finish(&frame)?;
        Ok(frame)
    }
}

