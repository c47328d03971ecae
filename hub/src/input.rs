//! Frame sources: where landmark frames come from.
//!
//! The pose estimator runs out of process and hands frames over as one
//! s-expression per line:
//!
//! ```text
//! (:type :frame :t-ms 33 :width 1280 :height 720 :hands (((x y z) ...) ...))
//! (:type :no-frame :t-ms 66)
//! (:type :quit)
//! ```
//!
//! Blank lines and `;` comments are skipped.  End of input is a quit.

use std::io::BufRead;

use anyhow::{bail, Context};
use lexpr::Value;
use tracing::{debug, warn};

use crate::gesture::{HandPoints, Landmark, LandmarkFrame};
use crate::sexp;

/// One tick's worth of input.  Timestamps are milliseconds when the
/// source provides them.
#[derive(Debug, Clone)]
pub enum SourceEvent {
    Frame(LandmarkFrame, Option<f64>),
    NoFrame(Option<f64>),
    Quit,
}

/// Producer of landmark frames.
pub trait FrameSource {
    /// Block until the next event.  Errors are unrecoverable source
    /// failures.
    fn next_event(&mut self) -> anyhow::Result<SourceEvent>;

    /// Records dropped as malformed so far.
    fn skipped(&self) -> u64 {
        0
    }
}

/// Line-oriented s-expression reader over any buffered input.
pub struct ReplaySource<R> {
    reader: R,
    line_no: u64,
    skipped: u64,
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            skipped: 0,
        }
    }
}

impl<R: BufRead> FrameSource for ReplaySource<R> {
    fn next_event(&mut self) -> anyhow::Result<SourceEvent> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = self
                .reader
                .read_until(b'\n', &mut buf)
                .context("reading frame source")?;
            if n == 0 {
                debug!("frame source exhausted after {} lines", self.line_no);
                return Ok(SourceEvent::Quit);
            }
            self.line_no += 1;

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    self.skipped += 1;
                    warn!("skipping line {}: not UTF-8 ({})", self.line_no, e);
                    continue;
                }
            };
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(';') {
                continue;
            }
            match parse_event(trimmed) {
                Ok(event) => return Ok(event),
                Err(e) => {
                    self.skipped += 1;
                    warn!("skipping line {}: {:#}", self.line_no, e);
                }
            }
        }
    }

    fn skipped(&self) -> u64 {
        self.skipped
    }
}

/// Parse one record.
pub fn parse_event(raw: &str) -> anyhow::Result<SourceEvent> {
    let value = lexpr::from_str(raw).context("malformed s-expression")?;
    let t_ms = sexp::get_float(&value, "t-ms");

    let Some(kind) = sexp::get_keyword(&value, "type") else {
        bail!("missing :type");
    };
    match kind.as_str() {
        "frame" => Ok(SourceEvent::Frame(parse_frame(&value)?, t_ms)),
        "no-frame" => Ok(SourceEvent::NoFrame(t_ms)),
        "quit" => Ok(SourceEvent::Quit),
        other => bail!("unknown record type {:?}", other),
    }
}

fn parse_frame(value: &Value) -> anyhow::Result<LandmarkFrame> {
    let width = sexp::get_uint(value, "width").context("frame without :width")?;
    let height = sexp::get_uint(value, "height").context("frame without :height")?;
    if width == 0 || height == 0 {
        bail!("frame size must be positive ({}x{})", width, height);
    }

    let mut hands = Vec::new();
    if let Some(list) = sexp::get_value(value, "hands") {
        for (h, hand) in sexp::list_items(list).into_iter().enumerate() {
            let mut points = Vec::new();
            for (p, point) in sexp::list_items(hand).into_iter().enumerate() {
                let coords: Vec<f32> = sexp::list_items(point)
                    .into_iter()
                    .map(sexp::as_f32)
                    .collect::<Option<_>>()
                    .with_context(|| format!("hand {} point {}: non-numeric coordinate", h, p))?;
                if coords.iter().any(|c| !c.is_finite()) {
                    bail!("hand {} point {}: coordinate out of range", h, p);
                }
                let point = match coords.as_slice() {
                    [x, y] => Landmark::new(*x, *y, 0.0),
                    [x, y, z] => Landmark::new(*x, *y, *z),
                    _ => bail!("hand {} point {}: expected (x y [z])", h, p),
                };
                points.push(point);
            }
            hands.push(HandPoints::new(points));
        }
    }

    Ok(LandmarkFrame::new(
        hands,
        u32::try_from(width).context("width out of range")?,
        u32::try_from(height).context("height out of range")?,
    ))
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_sexp(n: usize) -> String {
        let pts: Vec<String> = (0..n)
            .map(|i| format!("({:.2} 0.5 0.0)", i as f32 / 100.0))
            .collect();
        format!("({})", pts.join(" "))
    }

    fn source(text: &str) -> ReplaySource<&[u8]> {
        ReplaySource::new(text.as_bytes())
    }

    #[test]
    fn test_parse_frame() {
        let line = format!(
            "(:type :frame :t-ms 33 :width 1280 :height 720 :hands ({}))",
            hand_sexp(21)
        );
        match parse_event(&line).unwrap() {
            SourceEvent::Frame(frame, t) => {
                assert_eq!(t, Some(33.0));
                assert_eq!((frame.width, frame.height), (1280, 720));
                assert_eq!(frame.hands.len(), 1);
                assert_eq!(frame.hands[0].points.len(), 21);
                assert!(frame.primary_hand().is_some());
                assert!((frame.hands[0].points[20].x - 0.2).abs() < 0.001);
            }
            other => panic!("expected frame, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_and_missing_hands() {
        for line in [
            "(:type :frame :width 640 :height 480 :hands ())",
            "(:type :frame :width 640 :height 480)",
        ] {
            match parse_event(line).unwrap() {
                SourceEvent::Frame(frame, t) => {
                    assert!(frame.hands.is_empty());
                    assert!(t.is_none());
                }
                other => panic!("expected frame, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_two_dimensional_points() {
        let line = "(:type :frame :width 10 :height 10 :hands (((0.1 0.2) (0.3 0.4))))";
        let SourceEvent::Frame(frame, _) = parse_event(line).unwrap() else {
            panic!("expected frame");
        };
        assert_eq!(frame.hands[0].points[1], Landmark::new(0.3, 0.4, 0.0));
        // A partial hand parses; it is only ignored for control.
        assert!(frame.primary_hand().is_none());
    }

    #[test]
    fn test_parse_other_records() {
        assert!(matches!(
            parse_event("(:type :no-frame :t-ms 66)").unwrap(),
            SourceEvent::NoFrame(Some(t)) if t == 66.0
        ));
        assert!(matches!(parse_event("(:type :quit)").unwrap(), SourceEvent::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_event("(:type :frame").is_err());
        assert!(parse_event("(:t-ms 1)").is_err());
        assert!(parse_event("(:type :bogus)").is_err());
        assert!(parse_event("(:type :frame :width 0 :height 10)").is_err());
        assert!(parse_event("(:type :frame :width 10 :height 10 :hands (((a b))))").is_err());
        assert!(parse_event("(:type :frame :width 10 :height 10 :hands (((1))))").is_err());
    }

    #[test]
    fn test_source_skips_noise() {
        let mut src = source(
            "; recorded session\n\n(:type :no-frame :t-ms 1)\ngarbage (\n(:type :quit)\n(:type :no-frame)\n",
        );
        assert!(matches!(src.next_event().unwrap(), SourceEvent::NoFrame(Some(_))));
        assert!(matches!(src.next_event().unwrap(), SourceEvent::Quit));
        assert_eq!(src.skipped(), 1);
        assert!(matches!(src.next_event().unwrap(), SourceEvent::NoFrame(None)));
        assert!(matches!(src.next_event().unwrap(), SourceEvent::Quit));
    }

    #[test]
    fn test_non_finite_coordinates_rejected() {
        for bad in ["1e39", "-1e39", "+inf.0", "+nan.0"] {
            let line = format!(
                "(:type :frame :width 10 :height 10 :hands (((0.1 {}))))",
                bad
            );
            assert!(parse_event(&line).is_err(), "{} accepted", bad);
        }
    }

    #[test]
    fn test_invalid_utf8_line_skipped() {
        let mut src = ReplaySource::new(&b"\xff\xfe garbage\n(:type :no-frame :t-ms 5)\n"[..]);
        assert!(matches!(src.next_event().unwrap(), SourceEvent::NoFrame(Some(t)) if t == 5.0));
        assert_eq!(src.skipped(), 1);
        assert!(matches!(src.next_event().unwrap(), SourceEvent::Quit));
    }

    #[test]
    fn test_eof_is_quit() {
        let mut src = source("");
        assert!(matches!(src.next_event().unwrap(), SourceEvent::Quit));
    }
}
