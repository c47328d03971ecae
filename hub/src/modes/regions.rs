//! Declarative region tables for everything the pointer can hover.
//!
//! Keys, mode-switch buttons, drawing buttons and the YES/NO dialog are all
//! plain (id, rectangle, label) rows in frame-pixel coordinates, hit-tested
//! by the generic hover timer.  Adding a button is a table edit.

// ── Geometry ───────────────────────────────────────────────

/// Axis-aligned rectangle in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Strict interior test; a pointer exactly on an edge is outside.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px > self.x && px < self.x + self.width && py > self.y && py < self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

// ── Identifiers ────────────────────────────────────────────

/// What a keyboard key does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Backspace,
    Space,
}

impl Key {
    /// Key name handed to the OS automation layer.
    pub fn os_name(&self) -> String {
        match self {
            Self::Char(c) => c.to_lowercase().to_string(),
            Self::Backspace => "backspace".to_string(),
            Self::Space => "space".to_string(),
        }
    }

    /// Label drawn on the key.
    pub fn label(&self) -> String {
        match self {
            Self::Char(c) => c.to_string(),
            Self::Backspace => "<-".to_string(),
            Self::Space => "Space".to_string(),
        }
    }
}

/// Every hoverable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionId {
    Key(Key),
    SwitchKeyboard,
    SwitchDrawing,
    Save,
    Clear,
    Yes,
    No,
}

/// One row of a region table.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: RegionId,
    pub rect: Rect,
    pub label: String,
}

impl Region {
    pub fn new(id: RegionId, rect: Rect, label: &str) -> Self {
        Self {
            id,
            rect,
            label: label.to_string(),
        }
    }
}

/// First region containing the point.
pub fn hit_test(regions: &[Region], point: (f32, f32)) -> Option<RegionId> {
    regions
        .iter()
        .find(|r| r.rect.contains(point.0, point.1))
        .map(|r| r.id)
}

// ── Layout ─────────────────────────────────────────────────

const KEY_ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL;", "ZXCVBNM,."];
const KEY_SIZE: f32 = 85.0;
const KEY_PITCH: f32 = 100.0;
const KEY_ORIGIN: (f32, f32) = (50.0, 50.0);

/// Area where the typed text is echoed.
pub const TEXT_BOX: Rect = Rect::new(50.0, 450.0, 1000.0, 100.0);

/// All region tables, one per usage.
#[derive(Debug, Clone)]
pub struct Layout {
    pub keys: Vec<Region>,
    pub mode_switch: Vec<Region>,
    pub drawing: Vec<Region>,
    pub dialog: Vec<Region>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    pub fn new() -> Self {
        let side = |row: f32| Rect::new(1000.0, 50.0 + row * 100.0, 230.0, 85.0);
        Self {
            keys: generate_keys(),
            mode_switch: vec![
                Region::new(RegionId::SwitchKeyboard, side(0.0), "KEYBOARD"),
                Region::new(RegionId::SwitchDrawing, side(1.0), "DRAW"),
            ],
            drawing: vec![
                Region::new(RegionId::Save, side(0.0), "SAVE"),
                Region::new(RegionId::Clear, side(1.0), "CLEAR"),
            ],
            // Must not overlap any key or side button.
            dialog: vec![
                Region::new(RegionId::Yes, Rect::new(390.0, 570.0, 220.0, 110.0), "YES"),
                Region::new(RegionId::No, Rect::new(670.0, 570.0, 220.0, 110.0), "NO"),
            ],
        }
    }

    pub fn key_at(&self, point: (f32, f32)) -> Option<Key> {
        match hit_test(&self.keys, point)? {
            RegionId::Key(k) => Some(k),
            _ => None,
        }
    }

    /// Region rectangle by id, searching every table.
    pub fn rect_of(&self, id: RegionId) -> Option<Rect> {
        self.keys
            .iter()
            .chain(&self.mode_switch)
            .chain(&self.drawing)
            .chain(&self.dialog)
            .find(|r| r.id == id)
            .map(|r| r.rect)
    }
}

/// Three QWERTY rows of square keys, a backspace closing the last row, and
/// a wide space bar underneath.
pub fn generate_keys() -> Vec<Region> {
    let mut keys = Vec::new();
    for (row_idx, row) in KEY_ROWS.iter().enumerate() {
        let y = KEY_ORIGIN.1 + row_idx as f32 * KEY_PITCH;
        for (col_idx, ch) in row.chars().enumerate() {
            let x = KEY_ORIGIN.0 + col_idx as f32 * KEY_PITCH;
            let key = Key::Char(ch);
            keys.push(Region::new(
                RegionId::Key(key),
                Rect::new(x, y, KEY_SIZE, KEY_SIZE),
                &key.label(),
            ));
        }
    }

    let last_row = KEY_ROWS.len() - 1;
    let bksp_x = KEY_ORIGIN.0 + KEY_ROWS[last_row].chars().count() as f32 * KEY_PITCH;
    let bksp_y = KEY_ORIGIN.1 + last_row as f32 * KEY_PITCH;
    keys.push(Region::new(
        RegionId::Key(Key::Backspace),
        Rect::new(bksp_x, bksp_y, KEY_SIZE, KEY_SIZE),
        &Key::Backspace.label(),
    ));

    keys.push(Region::new(
        RegionId::Key(Key::Space),
        Rect::new(250.0, 350.0, 400.0, KEY_SIZE),
        &Key::Space.label(),
    ));
    keys
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(10.0, 20.0, 20.0, 20.0);
        assert!(r.contains(15.0, 25.0));
        assert!(!r.contains(10.0, 25.0), "edge is outside");
        assert!(!r.contains(31.0, 25.0));
        assert_eq!(r.center(), (20.0, 30.0));
    }

    #[test]
    fn test_key_count() {
        let keys = generate_keys();
        // 10 + 10 + 9 letters, backspace, space
        assert_eq!(keys.len(), 31);
    }

    #[test]
    fn test_key_positions() {
        let layout = Layout::new();
        assert_eq!(layout.key_at((92.0, 92.0)), Some(Key::Char('Q')));
        assert_eq!(layout.key_at((92.0, 192.0)), Some(Key::Char('A')));
        assert_eq!(layout.key_at((992.0, 292.0)), Some(Key::Backspace));
        assert_eq!(layout.key_at((450.0, 390.0)), Some(Key::Space));
        // Gap between Q and W
        assert_eq!(layout.key_at((140.0, 92.0)), None);
    }

    #[test]
    fn test_hit_test_tables_are_separate() {
        let layout = Layout::new();
        let p = layout.mode_switch[0].rect.center();
        assert_eq!(hit_test(&layout.mode_switch, p), Some(RegionId::SwitchKeyboard));
        // The drawing SAVE button shares the spot but lives in its own table.
        assert_eq!(hit_test(&layout.drawing, p), Some(RegionId::Save));
        assert_eq!(hit_test(&layout.dialog, p), None);
    }

    #[test]
    fn test_rect_of() {
        let layout = Layout::new();
        let yes = layout.rect_of(RegionId::Yes).unwrap();
        assert!(yes.contains(500.0, 625.0));
        assert!(layout.rect_of(RegionId::Key(Key::Char('#'))).is_none());
    }

    #[test]
    fn test_dialog_clear_of_other_regions() {
        let layout = Layout::new();
        let overlaps = |a: &Rect, b: &Rect| {
            a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
        };
        for button in &layout.dialog {
            for other in layout.keys.iter().chain(&layout.mode_switch).chain(&layout.drawing) {
                assert!(
                    !overlaps(&button.rect, &other.rect),
                    "{} overlaps {}",
                    button.label,
                    other.label
                );
            }
            assert!(!overlaps(&button.rect, &TEXT_BOX));
            assert!(button.rect.y + button.rect.height <= 720.0);
        }
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::Char('A').os_name(), "a");
        assert_eq!(Key::Char(';').os_name(), ";");
        assert_eq!(Key::Backspace.os_name(), "backspace");
        assert_eq!(Key::Space.label(), "Space");
    }
}
