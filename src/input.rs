use winit::keyboard::KeyCode;

/// The four logical keys the maze reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    pub const COUNT: usize = 4;
    pub const ALL: [Key; Key::COUNT] = [Key::Up, Key::Down, Key::Left, Key::Right];

    #[inline]
    fn index(self) -> usize {
        match self {
            Key::Up => 0,
            Key::Down => 1,
            Key::Left => 2,
            Key::Right => 3,
        }
    }

    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::ArrowUp => Some(Key::Up),
            KeyCode::ArrowDown => Some(Key::Down),
            KeyCode::ArrowLeft => Some(Key::Left),
            KeyCode::ArrowRight => Some(Key::Right),
            _ => None,
        }
    }
}

/// Held and edge-triggered state per key.
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    pressed: [bool; Key::COUNT],
    just_pressed: [bool; Key::COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key-down event. OS auto-repeat sends repeated presses; only the first
    /// one after a release counts as "just pressed".
    pub fn press(&mut self, key: Key) {
        let i = key.index();
        self.just_pressed[i] = !self.pressed[i];
        self.pressed[i] = true;
    }

    pub fn release(&mut self, key: Key) {
        let i = key.index();
        self.just_pressed[i] = false;
        self.pressed[i] = false;
    }

    #[inline]
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed[key.index()]
    }

    #[inline]
    pub fn was_just_pressed(&self, key: Key) -> bool {
        self.just_pressed[key.index()]
    }

    /// Drop all held keys, e.g. when the window loses focus and releases
    /// would otherwise be missed.
    pub fn release_all(&mut self) {
        self.pressed = [false; Key::COUNT];
        self.just_pressed = [false; Key::COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_twice_is_edge_triggered() {
        let mut kb = Keyboard::new();
        kb.press(Key::Up);
        assert!(kb.is_pressed(Key::Up));
        assert!(kb.was_just_pressed(Key::Up));

        kb.press(Key::Up);
        assert!(kb.is_pressed(Key::Up));
        assert!(!kb.was_just_pressed(Key::Up));
    }

    #[test]
    fn test_release_clears_both_flags() {
        let mut kb = Keyboard::new();
        kb.press(Key::Left);
        kb.release(Key::Left);
        assert!(!kb.is_pressed(Key::Left));
        assert!(!kb.was_just_pressed(Key::Left));

        // Release without a press is harmless.
        kb.release(Key::Right);
        assert!(!kb.is_pressed(Key::Right));

        // A press after release is a fresh edge.
        kb.press(Key::Left);
        assert!(kb.was_just_pressed(Key::Left));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut kb = Keyboard::new();
        kb.press(Key::Up);
        kb.press(Key::Right);
        kb.release(Key::Up);
        for key in Key::ALL {
            assert_eq!(kb.is_pressed(key), key == Key::Right, "{key:?}");
        }
        kb.release_all();
        assert!(Key::ALL.iter().all(|&k| !kb.is_pressed(k)));
    }

    #[test]
    fn test_arrow_key_mapping() {
        assert_eq!(Key::from_key_code(KeyCode::ArrowUp), Some(Key::Up));
        assert_eq!(Key::from_key_code(KeyCode::ArrowDown), Some(Key::Down));
        assert_eq!(Key::from_key_code(KeyCode::ArrowLeft), Some(Key::Left));
        assert_eq!(Key::from_key_code(KeyCode::ArrowRight), Some(Key::Right));
        assert_eq!(Key::from_key_code(KeyCode::KeyW), None);
    }
}
