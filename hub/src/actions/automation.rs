//! OS-level pointer and keyboard primitives.
//!
//! The default build only logs what it would do.  With the `automation`
//! feature the enigo backend drives the real desktop.

use tracing::info;

/// Fire-and-forget desktop automation.
pub trait ScreenAutomation {
    fn move_pointer(&mut self, x: i32, y: i32) -> anyhow::Result<()>;
    fn click(&mut self) -> anyhow::Result<()>;
    /// Press and release one named key ("a", ";", "backspace", "space").
    fn press_key(&mut self, name: &str) -> anyhow::Result<()>;
    /// Hold `modifier` ("ctrl", "alt") while tapping `key`.
    fn send_hotkey(&mut self, modifier: &str, key: &str) -> anyhow::Result<()>;
    fn name(&self) -> &'static str;
}

// ── Logging backend ────────────────────────────────────────

/// Records intended actions through tracing only.
#[derive(Debug, Default)]
pub struct LoggingAutomation {
    last_pointer: Option<(i32, i32)>,
}

impl LoggingAutomation {
    pub fn new() -> Self {
        info!("screen automation: logging only (built without 'automation' feature)");
        Self::default()
    }
}

impl ScreenAutomation for LoggingAutomation {
    fn move_pointer(&mut self, x: i32, y: i32) -> anyhow::Result<()> {
        // Pointer moves every frame; only note actual changes.
        if self.last_pointer != Some((x, y)) {
            tracing::trace!("pointer -> ({}, {})", x, y);
            self.last_pointer = Some((x, y));
        }
        Ok(())
    }

    fn click(&mut self) -> anyhow::Result<()> {
        info!("click at {:?}", self.last_pointer);
        Ok(())
    }

    fn press_key(&mut self, name: &str) -> anyhow::Result<()> {
        info!("key press: {}", name);
        Ok(())
    }

    fn send_hotkey(&mut self, modifier: &str, key: &str) -> anyhow::Result<()> {
        info!("hotkey: {}+{}", modifier, key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "logging"
    }
}

// ── enigo backend ──────────────────────────────────────────

#[cfg(feature = "automation")]
pub use self::desktop::EnigoAutomation;

#[cfg(feature = "automation")]
mod desktop {
    use anyhow::{anyhow, bail};
    use enigo::{Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};
    use tracing::{debug, info};

    use super::ScreenAutomation;

    /// Real pointer and keyboard through enigo.
    pub struct EnigoAutomation {
        enigo: Enigo,
    }

    impl EnigoAutomation {
        pub fn new() -> anyhow::Result<Self> {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| anyhow!("enigo init failed: {:?}", e))?;
            let automation = Self { enigo };
            match automation.enigo.main_display() {
                Ok((w, h)) => info!("screen automation: enigo, main display {}x{}", w, h),
                Err(e) => debug!("enigo could not query display size: {:?}", e),
            }
            Ok(automation)
        }

        fn key_for(name: &str) -> anyhow::Result<Key> {
            let key = match name {
                "backspace" => Key::Backspace,
                "space" => Key::Space,
                "ctrl" => Key::Control,
                "alt" => Key::Alt,
                "left" => Key::LeftArrow,
                "right" => Key::RightArrow,
                other => {
                    let mut chars = other.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Key::Unicode(c),
                        _ => bail!("unknown key name {:?}", other),
                    }
                }
            };
            Ok(key)
        }
    }

    impl ScreenAutomation for EnigoAutomation {
        fn move_pointer(&mut self, x: i32, y: i32) -> anyhow::Result<()> {
            self.enigo
                .move_mouse(x, y, Coordinate::Abs)
                .map_err(|e| anyhow!("move_mouse failed: {:?}", e))
        }

        fn click(&mut self) -> anyhow::Result<()> {
            self.enigo
                .button(Button::Left, Direction::Click)
                .map_err(|e| anyhow!("click failed: {:?}", e))
        }

        fn press_key(&mut self, name: &str) -> anyhow::Result<()> {
            let key = Self::key_for(name)?;
            self.enigo
                .key(key, Direction::Click)
                .map_err(|e| anyhow!("key {} failed: {:?}", name, e))
        }

        fn send_hotkey(&mut self, modifier: &str, key: &str) -> anyhow::Result<()> {
            let modifier_key = Self::key_for(modifier)?;
            let key_key = Self::key_for(key)?;
            self.enigo
                .key(modifier_key, Direction::Press)
                .map_err(|e| anyhow!("hotkey press {} failed: {:?}", modifier, e))?;
            let tapped = self
                .enigo
                .key(key_key, Direction::Click)
                .map_err(|e| anyhow!("hotkey {}+{} failed: {:?}", modifier, key, e));
            // Always release the modifier, even if the tap failed.
            self.enigo
                .key(modifier_key, Direction::Release)
                .map_err(|e| anyhow!("hotkey release {} failed: {:?}", modifier, e))?;
            tapped
        }

        fn name(&self) -> &'static str {
            "enigo"
        }
    }
}

/// Pick the best backend compiled in.
pub fn default_backend() -> anyhow::Result<Box<dyn ScreenAutomation>> {
    #[cfg(feature = "automation")]
    {
        Ok(Box::new(EnigoAutomation::new()?))
    }
    #[cfg(not(feature = "automation"))]
    {
        Ok(Box::new(LoggingAutomation::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_backend_accepts_everything() {
        let mut a = LoggingAutomation::new();
        assert!(a.move_pointer(10, 20).is_ok());
        assert!(a.move_pointer(10, 20).is_ok());
        assert!(a.click().is_ok());
        assert!(a.press_key("a").is_ok());
        assert!(a.send_hotkey("ctrl", "+").is_ok());
        assert_eq!(a.name(), "logging");
        assert_eq!(a.last_pointer, Some((10, 20)));
    }
}
