//! Replay backend: drives the hub from a line-oriented frame stream.
//!
//! Reads frames from a file or stdin as fast as they arrive (or paced by
//! their timestamps with `realtime`), with graceful signal handling and
//! periodic status logging.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::input::{FrameSource, SourceEvent};
use crate::render::{self, Renderer};
use crate::state::HubState;

/// Global flag set by SIGTERM/SIGINT handlers.
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Install signal handlers for graceful shutdown (SIGTERM, SIGINT).
fn install_signal_handlers() {
    unsafe {
        libc::signal(libc::SIGTERM, signal_handler as libc::sighandler_t);
        libc::signal(libc::SIGINT, signal_handler as libc::sighandler_t);
    }
}

extern "C" fn signal_handler(_sig: libc::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

/// Replay loop options.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Sleep so that frames are processed at their recorded timestamps.
    pub realtime: bool,
    /// Interval between status log lines.
    pub status_interval: Duration,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            realtime: false,
            status_interval: Duration::from_secs(60),
        }
    }
}

/// Turns optional source timestamps into one monotonic session clock.
///
/// Source timestamps are used as given; records without one fall back to
/// wall time since start.  The result never goes backwards.
#[derive(Debug)]
pub struct SessionClock {
    start: Instant,
    last_ms: f64,
    first_source_ms: Option<f64>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last_ms: 0.0,
            first_source_ms: None,
        }
    }

    pub fn now(&mut self, source_ms: Option<f64>) -> f64 {
        let t = match source_ms {
            Some(t) => {
                self.first_source_ms.get_or_insert(t);
                t
            }
            None => self.start.elapsed().as_secs_f64() * 1000.0,
        };
        if t < self.last_ms {
            debug!("timestamp {:.1} went backwards, holding at {:.1}", t, self.last_ms);
        }
        self.last_ms = self.last_ms.max(t);
        self.last_ms
    }

    /// Wall time to wait before handling a record stamped `source_ms`.
    pub fn pacing_delay(&self, source_ms: f64) -> Duration {
        let Some(first) = self.first_source_ms else {
            return Duration::ZERO;
        };
        let due = Duration::from_secs_f64(((source_ms - first) / 1000.0).max(0.0));
        due.saturating_sub(self.start.elapsed())
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

fn source_time(event: &SourceEvent) -> Option<f64> {
    match event {
        SourceEvent::Frame(_, t) | SourceEvent::NoFrame(t) => *t,
        SourceEvent::Quit => None,
    }
}

/// Run the hub until the source quits or a signal arrives.
pub fn run(
    state: &mut HubState,
    source: &mut dyn FrameSource,
    renderer: &mut dyn Renderer,
    config: &ReplayConfig,
) -> anyhow::Result<()> {
    install_signal_handlers();

    let mut clock = SessionClock::new();
    let mut last_status_log = Instant::now();
    let mut render_failures: u64 = 0;
    info!(
        "replay backend initialized (realtime: {}), entering frame loop",
        config.realtime
    );

    loop {
        if SHUTDOWN_REQUESTED.load(Ordering::SeqCst) {
            info!("Shutdown signal received, exiting");
            break;
        }

        let event = source.next_event()?;
        if config.realtime {
            if let Some(t) = source_time(&event) {
                clock.now(Some(t));
                let delay = clock.pacing_delay(t);
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
            }
        }

        let (frame, now_ms) = match event {
            SourceEvent::Quit => {
                info!("frame source requested quit");
                break;
            }
            SourceEvent::Frame(frame, t) => {
                let now = clock.now(t);
                (Some(frame), now)
            }
            SourceEvent::NoFrame(t) => (None, clock.now(t)),
        };

        state.tick(frame.as_ref(), now_ms);
        let commands = render::compose(state, frame.as_ref(), now_ms);
        if let Err(e) = renderer.render(now_ms, &commands) {
            render_failures += 1;
            if render_failures == 1 {
                warn!("render failed, continuing without output: {:#}", e);
            } else {
                debug!("render failed ({} so far): {:#}", render_failures, e);
            }
        }

        // Periodic status logging
        if last_status_log.elapsed() >= config.status_interval {
            info!("hub status: {}", state.status_sexp());
            info!("session: {}", state.stats_sexp());
            last_status_log = Instant::now();
        }
    }

    if render_failures > 0 {
        warn!("{} frame(s) failed to render", render_failures);
    }
    if source.skipped() > 0 {
        warn!("{} malformed record(s) skipped", source.skipped());
    }
    info!(
        "replay backend shutting down after {} frame(s): {}",
        state.frames(),
        state.stats_sexp()
    );
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────
