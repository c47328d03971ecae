//! Gesture layer: landmark frames in, poses and debounced triggers out.
//!
//! Provides:
//! - `landmarks`: 21-point hand frames from the external pose estimator
//! - `pose`: finger predicates, composite poses and pixel measurements
//! - `debounce`: persistence counters for zoom/swipe
//! - `hover`: hover-to-fire timers over region tables
//! - `cooldown`: spacing between discrete triggers

pub mod cooldown;
pub mod debounce;
pub mod hover;
pub mod landmarks;
pub mod pose;

pub use cooldown::Cooldown;
pub use debounce::{PersistenceDebouncer, Trend};
pub use hover::HoverTimer;
pub use landmarks::{HandPoints, Landmark, LandmarkFrame};
pub use pose::HandReading;
