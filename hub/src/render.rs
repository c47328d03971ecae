//! Rendering: per-frame declarative draw lists.
//!
//! `compose` turns the hub state into a flat list of [`DrawCommand`]s; a
//! [`Renderer`] consumes it.  The provided [`SexpRenderer`] writes each
//! list as one s-expression line, which is what a display client (or a
//! test) reads.

use std::io::Write;

use anyhow::Context;
use tracing::trace;

use crate::actions::StatusColor;
use crate::gesture::landmarks::HAND_CONNECTIONS;
use crate::gesture::LandmarkFrame;
use crate::modes::regions::TEXT_BOX;
use crate::modes::{AppMode, Rect, Region, RegionId};
use crate::sexp::{bool_sexp, escape_string};
use crate::state::HubState;

/// One primitive for the display.  Coordinates are frame pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    CameraThumbnail { width: u32, height: u32 },
    Hand { points: Vec<(f32, f32)>, primary: bool },
    Banner { text: String },
    Button { label: String, rect: Rect, hovered: bool, progress: f32 },
    TypedText { text: String, rect: Rect },
    Strokes { strokes: Vec<Vec<(f32, f32)>> },
    Dialog { prompt: String },
    Cursor { x: f32, y: f32 },
    Status { text: String, color: StatusColor },
}

fn points_sexp(points: &[(f32, f32)]) -> String {
    let inner: Vec<String> = points
        .iter()
        .map(|(x, y)| format!("({:.1} {:.1})", x, y))
        .collect();
    format!("({})", inner.join(" "))
}

fn rect_sexp(r: &Rect) -> String {
    format!("({:.0} {:.0} {:.0} {:.0})", r.x, r.y, r.width, r.height)
}

impl DrawCommand {
    pub fn to_sexp(&self) -> String {
        match self {
            Self::CameraThumbnail { width, height } => {
                format!("(:camera :width {} :height {})", width, height)
            }
            Self::Hand { points, primary } => {
                let bones: Vec<String> = HAND_CONNECTIONS
                    .iter()
                    .filter_map(|&(a, b)| Some((points.get(a)?, points.get(b)?)))
                    .map(|(a, b)| format!("({:.1} {:.1} {:.1} {:.1})", a.0, a.1, b.0, b.1))
                    .collect();
                format!(
                    "(:hand :primary {} :points {} :bones ({}))",
                    bool_sexp(*primary),
                    points_sexp(points),
                    bones.join(" ")
                )
            }
            Self::Banner { text } => format!("(:banner \"{}\")", escape_string(text)),
            Self::Button {
                label,
                rect,
                hovered,
                progress,
            } => format!(
                "(:button \"{}\" :rect {} :hovered {} :progress {:.2})",
                escape_string(label),
                rect_sexp(rect),
                bool_sexp(*hovered),
                progress
            ),
            Self::TypedText { text, rect } => format!(
                "(:text \"{}\" :rect {})",
                escape_string(text),
                rect_sexp(rect)
            ),
            Self::Strokes { strokes } => {
                let inner: Vec<String> = strokes.iter().map(|s| points_sexp(s)).collect();
                format!("(:strokes ({}))", inner.join(" "))
            }
            Self::Dialog { prompt } => format!("(:dialog \"{}\")", escape_string(prompt)),
            Self::Cursor { x, y } => format!("(:cursor {:.1} {:.1})", x, y),
            Self::Status { text, color } => format!(
                "(:status \"{}\" :color {})",
                escape_string(text),
                color.as_str()
            ),
        }
    }
}

fn buttons(regions: &[Region], hover: Option<(RegionId, f32)>, out: &mut Vec<DrawCommand>) {
    for region in regions {
        let progress = match hover {
            Some((id, p)) if id == region.id => p,
            _ => 0.0,
        };
        out.push(DrawCommand::Button {
            label: region.label.clone(),
            rect: region.rect,
            hovered: progress > 0.0,
            progress,
        });
    }
}

/// Build this frame's draw list.
pub fn compose(state: &HubState, frame: Option<&LandmarkFrame>, now_ms: f64) -> Vec<DrawCommand> {
    let mut out = Vec::new();

    if let Some(frame) = frame {
        out.push(DrawCommand::CameraThumbnail {
            width: frame.width,
            height: frame.height,
        });
        for (i, points) in frame.hands_in_pixels().into_iter().enumerate() {
            out.push(DrawCommand::Hand {
                points,
                primary: i == 0,
            });
        }
    }

    out.push(DrawCommand::Banner {
        text: state.mode().title().to_string(),
    });

    let layout = state.layout();
    let hover = state.hover_state(now_ms);
    let dialog_open = state.dialog().is_open();

    match state.mode() {
        AppMode::Touchpad => {
            if !dialog_open {
                buttons(&layout.mode_switch, hover, &mut out);
            }
        }
        AppMode::Keyboard => {
            if !dialog_open {
                buttons(&layout.keys, hover, &mut out);
            }
            out.push(DrawCommand::TypedText {
                text: state.text().as_str().to_string(),
                rect: TEXT_BOX,
            });
        }
        AppMode::Drawing => {
            out.push(DrawCommand::Strokes {
                strokes: state
                    .canvas()
                    .strokes()
                    .iter()
                    .map(|s| s.points.clone())
                    .collect(),
            });
            if !dialog_open {
                buttons(&layout.drawing, hover, &mut out);
            }
        }
    }

    if let Some(action) = state.dialog().pending() {
        out.push(DrawCommand::Dialog {
            prompt: action.prompt().to_string(),
        });
        buttons(&layout.dialog, hover, &mut out);
    }

    if let Some(reading) = state.reading() {
        out.push(DrawCommand::Cursor {
            x: reading.pointer.0,
            y: reading.pointer.1,
        });
    }

    if let Some(status) = state.dispatcher().status(now_ms) {
        out.push(DrawCommand::Status {
            text: status.text.clone(),
            color: status.color,
        });
    }

    out
}

/// Consumer of draw lists.
pub trait Renderer {
    fn render(&mut self, now_ms: f64, commands: &[DrawCommand]) -> anyhow::Result<()>;
}

/// Writes one s-expression line per frame.
pub struct SexpRenderer {
    out: Option<Box<dyn Write>>,
}

impl SexpRenderer {
    pub fn new(out: Option<Box<dyn Write>>) -> Self {
        Self { out }
    }

    pub fn frame_sexp(now_ms: f64, commands: &[DrawCommand]) -> String {
        let inner: Vec<String> = commands.iter().map(DrawCommand::to_sexp).collect();
        format!("(:t-ms {:.0} :commands ({}))", now_ms, inner.join(" "))
    }
}

impl Renderer for SexpRenderer {
    fn render(&mut self, now_ms: f64, commands: &[DrawCommand]) -> anyhow::Result<()> {
        let line = Self::frame_sexp(now_ms, commands);
        trace!("{}", line);
        if let Some(out) = self.out.as_mut() {
            writeln!(out, "{}", line).context("writing render log")?;
        }
        Ok(())
    }
}

impl Drop for SexpRenderer {
    fn drop(&mut self) {
        if let Some(out) = self.out.as_mut() {
            let _ = out.flush();
        }
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::actions::testing::Recorder;
    use crate::config::HubConfig;
    use crate::gesture::landmarks::open_hand;
    use crate::gesture::HandPoints;

    /// Write sink readable after the renderer takes ownership.
    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn state() -> HubState {
        HubState::new(HubConfig::default(), Recorder::default().dispatcher())
    }

    #[test]
    fn test_touchpad_draw_list() {
        let mut s = state();
        let frame = LandmarkFrame::new(vec![HandPoints::new(open_hand())], 1280, 720);
        s.tick(Some(&frame), 0.0);
        let cmds = compose(&s, Some(&frame), 0.0);

        assert!(matches!(cmds[0], DrawCommand::CameraThumbnail { width: 1280, .. }));
        assert!(matches!(cmds[1], DrawCommand::Hand { primary: true, .. }));
        assert!(cmds.contains(&DrawCommand::Banner {
            text: "TOUCHPAD MODE".into()
        }));
        let labels: Vec<&str> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Button { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["KEYBOARD", "DRAW"]);
        assert!(cmds.iter().any(|c| matches!(c, DrawCommand::Cursor { .. })));
    }

    #[test]
    fn test_no_frame_draw_list() {
        let mut s = state();
        s.tick(None, 0.0);
        let cmds = compose(&s, None, 0.0);
        assert!(!cmds
            .iter()
            .any(|c| matches!(c, DrawCommand::CameraThumbnail { .. } | DrawCommand::Cursor { .. })));
    }

    #[test]
    fn test_second_hand_rendered() {
        let s = state();
        let frame = LandmarkFrame::new(
            vec![HandPoints::new(open_hand()), HandPoints::new(open_hand())],
            1280,
            720,
        );
        let cmds = compose(&s, Some(&frame), 0.0);
        let hands: Vec<bool> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Hand { primary, .. } => Some(*primary),
                _ => None,
            })
            .collect();
        assert_eq!(hands, vec![true, false]);
    }

    #[test]
    fn test_hand_sexp_has_bones() {
        let points: Vec<(f32, f32)> = (0..21).map(|i| (i as f32, 0.0)).collect();
        let sexp = DrawCommand::Hand {
            points,
            primary: false,
        }
        .to_sexp();
        assert!(sexp.starts_with("(:hand :primary nil"));
        assert!(sexp.contains("(0.0 0.0 1.0 0.0)"));
        assert!(sexp.contains("(5.0 0.0 9.0 0.0)"));

        let partial = DrawCommand::Hand {
            points: vec![(0.0, 0.0), (1.0, 1.0)],
            primary: true,
        }
        .to_sexp();
        assert!(partial.ends_with(":bones ((0.0 0.0 1.0 1.0)))"));
    }

    #[test]
    fn test_command_sexp() {
        let b = DrawCommand::Button {
            label: "YES".into(),
            rect: Rect::new(390.0, 320.0, 220.0, 110.0),
            hovered: true,
            progress: 0.5,
        };
        assert_eq!(
            b.to_sexp(),
            "(:button \"YES\" :rect (390 320 220 110) :hovered t :progress 0.50)"
        );
        let s = DrawCommand::Status {
            text: "Saved \"x\"".into(),
            color: StatusColor::Green,
        };
        assert_eq!(s.to_sexp(), "(:status \"Saved \\\"x\\\"\" :color green)");
    }

    #[test]
    fn test_sexp_renderer_writes_lines() {
        let buf = SharedBuf::default();
        let mut r = SexpRenderer::new(Some(Box::new(buf.clone())));
        r.render(10.0, &[DrawCommand::Cursor { x: 1.0, y: 2.0 }]).unwrap();
        r.render(20.0, &[]).unwrap();
        let text = String::from_utf8(buf.0.borrow().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "(:t-ms 10 :commands ((:cursor 1.0 2.0)))");
        assert_eq!(lines[1], "(:t-ms 20 :commands ())");
        // Every line parses back as an s-expression.
        for line in lines {
            assert!(lexpr::from_str(line).is_ok());
        }
    }
}
