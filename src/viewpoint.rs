use crate::grid::Grid;
use crate::input::{Key, Keyboard};

/// Movement tunables, per millisecond of elapsed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speeds {
    pub move_per_ms: f32, // tiles
    pub turn_per_ms: f32, // radians
}

impl Default for Speeds {
    fn default() -> Self {
        Self {
            move_per_ms: 0.003,
            turn_per_ms: 0.001,
        }
    }
}

/// First-person pose on the grid.
///
/// `dir` is the forward unit vector, `plane` is the camera plane perpendicular
/// to it; its length relative to `dir` sets the field of view (0.66 is ~66°).
#[derive(Debug, Clone, PartialEq)]
pub struct Viewpoint {
    pub pos: [f32; 2],   // (x, y) in tile units
    pub dir: [f32; 2],   // facing direction
    pub plane: [f32; 2], // camera plane
    pub speeds: Speeds,
}

impl Default for Viewpoint {
    fn default() -> Self {
        let start = (crate::grid::MAZE_SIDE - 3) as f32;
        Self::new([start, start], [-1.0, 0.0], [0.0, 0.66], Speeds::default())
    }
}

impl Viewpoint {
    pub fn new(pos: [f32; 2], dir: [f32; 2], plane: [f32; 2], speeds: Speeds) -> Self {
        Self {
            pos,
            dir,
            plane,
            speeds,
        }
    }

    /// Apply one tick of held keys: forward, backward, rotate right, rotate left,
    /// in that order. Opposite keys held together both apply.
    pub fn advance(&mut self, elapsed_ms: u32, keys: &Keyboard, grid: &Grid) {
        let move_step = elapsed_ms as f32 * self.speeds.move_per_ms;
        let turn_step = elapsed_ms as f32 * self.speeds.turn_per_ms;

        if keys.is_pressed(Key::Up) {
            self.translate(move_step, grid);
        }
        if keys.is_pressed(Key::Down) {
            self.translate(-move_step, grid);
        }
        if keys.is_pressed(Key::Right) {
            self.rotate_by(-turn_step);
        }
        if keys.is_pressed(Key::Left) {
            self.rotate_by(turn_step);
        }
    }

    /// Move `distance` tiles along `dir`, one axis at a time so that a blocked
    /// axis still lets the other slide along the wall.
    pub fn translate(&mut self, distance: f32, grid: &Grid) {
        let candidate_x = self.pos[0] + self.dir[0] * distance;
        if !grid.is_wall_at(candidate_x, self.pos[1]) {
            self.pos[0] = candidate_x;
        }

        // Uses the x committed above.
        let candidate_y = self.pos[1] + self.dir[1] * distance;
        if !grid.is_wall_at(self.pos[0], candidate_y) {
            self.pos[1] = candidate_y;
        }
    }

    /// Rotate `dir` and `plane` together by `angle` radians (positive turns left).
    pub fn rotate_by(&mut self, angle: f32) {
        let (s, c) = angle.sin_cos();
        self.dir = rotate(self.dir, s, c);
        self.plane = rotate(self.plane, s, c);
    }

    /// Ray direction for a camera-space column coordinate in [-1, 1).
    #[inline]
    pub fn ray_dir(&self, camera_x: f32) -> [f32; 2] {
        [
            self.dir[0] + self.plane[0] * camera_x,
            self.dir[1] + self.plane[1] * camera_x,
        ]
    }
}

#[inline]
fn rotate(v: [f32; 2], s: f32, c: f32) -> [f32; 2] {
    [v[0] * c - v[1] * s, v[0] * s + v[1] * c]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    fn held(keys: &[Key]) -> Keyboard {
        let mut kb = Keyboard::new();
        for &k in keys {
            kb.press(k);
        }
        kb
    }

    fn len(v: [f32; 2]) -> f32 {
        (v[0] * v[0] + v[1] * v[1]).sqrt()
    }

    fn dot(a: [f32; 2], b: [f32; 2]) -> f32 {
        a[0] * b[0] + a[1] * b[1]
    }

    #[test]
    fn test_forward_moves_along_direction() {
        let grid = Grid::maze();
        let mut view = Viewpoint::default();
        view.advance(100, &held(&[Key::Up]), &grid);
        assert!((view.pos[0] - 18.7).abs() < 1e-4);
        assert_eq!(view.pos[1], 19.0);
    }

    #[test]
    fn test_backward_blocked_by_wall() {
        let grid = Grid::maze();
        let mut view = Viewpoint::default();
        // Tile x = 20 is wall, so moving back by a whole tile is rejected.
        view.advance(400, &held(&[Key::Down]), &grid);
        assert_eq!(view.pos, [19.0, 19.0]);
        // A small step stays inside tile 19.
        view.advance(100, &held(&[Key::Down]), &grid);
        assert!((view.pos[0] - 19.3).abs() < 1e-4);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let grid = Grid::maze();
        let mut view = Viewpoint::default();
        view.advance(50, &held(&[Key::Up, Key::Down]), &grid);
        assert!((view.pos[0] - 19.0).abs() < 1e-5);

        let dir = view.dir;
        view.advance(50, &held(&[Key::Left, Key::Right]), &grid);
        assert!((view.dir[0] - dir[0]).abs() < 1e-5);
        assert!((view.dir[1] - dir[1]).abs() < 1e-5);
    }

    #[test]
    fn test_slides_along_wall() {
        let grid = Grid::maze();
        // Facing diagonally into the x = 20 wall from just inside tile 19.
        let d = std::f32::consts::FRAC_1_SQRT_2;
        let mut view = Viewpoint::new([19.9, 18.5], [d, d], [-0.46, 0.46], Speeds::default());
        view.translate(0.5, &grid);
        assert_eq!(view.pos[0], 19.9);
        assert!((view.pos[1] - (18.5 + 0.5 * d)).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_left_turns_counter_clockwise() {
        let grid = Grid::maze();
        let mut view = Viewpoint::default();
        let quarter = (PI / 2.0 / 0.001).round() as u32;
        view.advance(quarter, &held(&[Key::Left]), &grid);
        // (-1, 0) rotated +90 degrees is (0, -1); the plane follows.
        assert!(view.dir[0].abs() < 1e-3);
        assert!((view.dir[1] + 1.0).abs() < 1e-3);
        assert!((view.plane[0] + 0.66).abs() < 1e-3);
        assert!(view.plane[1].abs() < 1e-3);
    }

    #[test]
    fn test_zero_elapsed_is_noop() {
        let grid = Grid::maze();
        let mut view = Viewpoint::default();
        let before = view.clone();
        view.advance(0, &held(&Key::ALL), &grid);
        assert_eq!(view, before);
    }

    proptest! {
        #[test]
        fn prop_position_never_enters_wall(
            heading in 0.0f32..(2.0 * PI),
            steps in prop::collection::vec((0u32..2000, 0u8..16), 1..40),
        ) {
            let grid = Grid::maze();
            let mut view = Viewpoint::default();
            view.rotate_by(heading);
            for (elapsed, mask) in steps {
                let mut kb = Keyboard::new();
                for (bit, key) in Key::ALL.into_iter().enumerate() {
                    if mask & (1 << bit) != 0 {
                        kb.press(key);
                    }
                }
                view.advance(elapsed, &kb, &grid);
                prop_assert!(!grid.is_wall_at(view.pos[0], view.pos[1]), "{:?}", view.pos);
            }
        }

        #[test]
        fn prop_rotation_preserves_geometry(angles in prop::collection::vec(-1.0f32..1.0, 1..200)) {
            let mut view = Viewpoint::default();
            let dir_len = len(view.dir);
            let plane_len = len(view.plane);
            let cos_between = dot(view.dir, view.plane) / (dir_len * plane_len);
            for a in angles {
                view.rotate_by(a);
            }
            prop_assert!((len(view.dir) - dir_len).abs() < 1e-3);
            prop_assert!((len(view.plane) - plane_len).abs() < 1e-3);
            let after = dot(view.dir, view.plane) / (len(view.dir) * len(view.plane));
            prop_assert!((after - cos_between).abs() < 1e-3);
        }
    }
}
