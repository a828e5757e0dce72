use super::{Bounds, Frame, LabelRole, Point, Rect, RenderTarget};
use crate::error::SpResult;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const PX_PER_UNIT: f32 = 80.0;
const TITLE_BAND: f32 = 36.0;

// Shapes are kept in grid units and projected in `finish`, once the
// frame's bounds are known.
enum Shape {
    Cell(Rect, Option<String>),
    Label(Point, String, LabelRole),
    Arrow(Point, Point, String),
}

/// Writes each finished frame as `<dir>/<key>.svg`.
pub struct SvgTarget {
    dir: PathBuf,
    pending: Vec<Shape>,
}

impl SvgTarget {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            pending: Vec::new(),
        }
    }

    pub fn frame_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.svg", key))
    }

    fn document(&self, frame: &Frame) -> String {
        let p = Projection {
            bounds: frame.bounds,
        };
        let mut svg = String::new();

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" font-family="sans-serif">"#,
            w = p.width(),
            h = p.height()
        );
        svg.push_str(concat!(
            r#"<defs><marker id="head" markerWidth="10" markerHeight="8" refX="9" refY="4" orient="auto">"#,
            r#"<path d="M0,0 L10,4 L0,8 z"/></marker></defs>"#,
            "\n"
        ));
        let _ = writeln!(
            svg,
            r#"<rect width="100%" height="100%" fill="white"/>"#
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="24" text-anchor="middle" font-size="16">{}</text>"#,
            p.width() / 2.0,
            escape(&frame.caption)
        );

        for shape in &self.pending {
            match shape {
                Shape::Cell(rect, occupant) => {
                    let _ = writeln!(
                        svg,
                        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="black"/>"#,
                        p.x(rect.x),
                        p.y(rect.y + rect.h),
                        rect.w * PX_PER_UNIT,
                        rect.h * PX_PER_UNIT
                    );
                    if let Some(item) = occupant {
                        let c = rect.center();
                        let _ = writeln!(
                            svg,
                            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" dominant-baseline="middle" font-size="24">{}</text>"#,
                            p.x(c.x),
                            p.y(c.y),
                            escape(item)
                        );
                    }
                }
                Shape::Label(at, text, role) => {
                    let (anchor, size, extra) = match role {
                        LabelRole::Location => ("middle", 16, r#" font-weight="bold""#),
                        LabelRole::Slot => ("end", 13, ""),
                        LabelRole::Distance => ("middle", 13, r#" fill="gray""#),
                    };
                    let _ = writeln!(
                        svg,
                        r#"<text x="{:.1}" y="{:.1}" text-anchor="{}" dominant-baseline="middle" font-size="{}"{}>{}</text>"#,
                        p.x(at.x),
                        p.y(at.y),
                        anchor,
                        size,
                        extra,
                        escape(text)
                    );
                }
                Shape::Arrow(from, to, label) => {
                    let _ = writeln!(
                        svg,
                        r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black" stroke-width="2" marker-end="url(#head)"/>"#,
                        p.x(from.x),
                        p.y(from.y),
                        p.x(to.x),
                        p.y(to.y)
                    );
                    let _ = writeln!(
                        svg,
                        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" dominant-baseline="hanging" font-size="13">{}</text>"#,
                        p.x((from.x + to.x) / 2.0),
                        p.y(from.y - 0.15),
                        escape(label)
                    );
                }
            }
        }

        svg.push_str("</svg>\n");
        svg
    }
}

impl RenderTarget for SvgTarget {
    fn draw_cell(&mut self, rect: Rect, occupant: Option<&str>) {
        self.pending
            .push(Shape::Cell(rect, occupant.map(str::to_string)));
    }

    fn draw_label(&mut self, at: Point, text: &str, role: LabelRole) {
        self.pending.push(Shape::Label(at, text.to_string(), role));
    }

    fn draw_arrow(&mut self, from: Point, to: Point, label: &str) {
        self.pending.push(Shape::Arrow(from, to, label.to_string()));
    }

    fn finish(&mut self, frame: &Frame) -> SpResult<()> {
        let doc = self.document(frame);
        self.pending.clear();

        fs::create_dir_all(&self.dir)?;
        let path = self.frame_path(&frame.key);
        fs::write(&path, doc)?;
        debug!("wrote {}", path.display());
        Ok(())
    }

    fn destination(&self) -> Option<&Path> {
        Some(&self.dir)
    }
}

struct Projection {
    bounds: Bounds,
}

impl Projection {
    fn x(&self, x: f32) -> f32 {
        (x - self.bounds.x_min) * PX_PER_UNIT
    }

    // Grid y points up, SVG y points down.
    fn y(&self, y: f32) -> f32 {
        (self.bounds.y_max - y) * PX_PER_UNIT + TITLE_BAND
    }

    fn width(&self) -> f32 {
        (self.bounds.x_max - self.bounds.x_min) * PX_PER_UNIT
    }

    fn height(&self) -> f32 {
        (self.bounds.y_max - self.bounds.y_min) * PX_PER_UNIT + TITLE_BAND
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
