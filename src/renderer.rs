use rayon::{
    iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::{grid::Grid, viewpoint::Viewpoint};

/// Step distance used for an axis the ray does not move along.
const FAR: f32 = 1e30;

/// Abstract dot colors. The display decides what the patterns look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Black,
    White,
    VerticalStripe,
    HorizontalStripe,
    Alternating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub north_south: Color,
    pub east_west: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::Black,
            north_south: Color::White,
            east_west: Color::Alternating,
        }
    }
}

/// Which grid axis the ray crossed last before hitting a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Crossed a tile boundary along x; the face looks north or south.
    NorthSouth,
    /// Crossed a tile boundary along y; the face looks east or west.
    EastWest,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub tile: [i32; 2],
    pub side: Side,
    /// Distance along the view direction, not the ray length (no fisheye).
    pub perp_dist: f32,
}

/// Inclusive vertical run of a wall slice, already clipped to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub top: usize,
    pub bottom: usize,
}

impl Span {
    #[inline]
    pub fn contains(&self, y: usize) -> bool {
        self.top <= y && y <= self.bottom
    }
}

/// Cast one ray through the grid with DDA stepping.
///
/// `camera_x` is -1 at the left screen edge, 0 in the centre. Returns `None`
/// if the ray leaves the step budget without hitting a wall.
pub fn cast_ray(grid: &Grid, view: &Viewpoint, camera_x: f32) -> Option<Hit> {
    let ray = view.ray_dir(camera_x);
    let pos = view.pos;

    let mut tile = [pos[0].floor() as i32, pos[1].floor() as i32];
    let mut step = [0i32; 2];
    let mut delta = [0f32; 2]; // ray length per whole tile on each axis
    let mut side_dist = [0f32; 2]; // ray length to the next boundary on each axis

    for axis in 0..2 {
        // Tiny components overflow 1/x to inf, and inf * 0 is NaN.
        let d = (1.0 / ray[axis]).abs();
        delta[axis] = if d.is_finite() && d <= FAR { d } else { FAR };
        if ray[axis] < 0.0 {
            step[axis] = -1;
            side_dist[axis] = (pos[axis] - tile[axis] as f32) * delta[axis];
        } else {
            step[axis] = 1;
            side_dist[axis] = (tile[axis] as f32 + 1.0 - pos[axis]) * delta[axis];
        }
    }

    let mut side = Side::EastWest;
    let mut hit = false;
    for _ in 0..grid.max_ray_steps() {
        if side_dist[0] < side_dist[1] {
            side_dist[0] += delta[0];
            tile[0] += step[0];
            side = Side::NorthSouth;
        } else {
            side_dist[1] += delta[1];
            tile[1] += step[1];
            side = Side::EastWest;
        }
        if grid.is_wall(tile[0], tile[1]) {
            hit = true;
            break;
        }
    }
    if !hit {
        log::trace!("ray at camera_x {camera_x} ran out of steps");
        return None;
    }

    let axis = match side {
        Side::NorthSouth => 0,
        Side::EastWest => 1,
    };
    let perp_dist = (tile[axis] as f32 - pos[axis] + ((1 - step[axis]) / 2) as f32) / ray[axis];

    Some(Hit {
        tile,
        side,
        perp_dist,
    })
}

/// Project a hit distance onto a screen column of `height` dots.
///
/// A distance of zero (standing on the boundary) or anything non-finite fills
/// the whole column.
pub fn column_span(height: usize, perp_dist: f32) -> Option<Span> {
    if height == 0 {
        return None;
    }
    let h = height as i32;
    let line = if perp_dist > 0.0 && perp_dist.is_finite() {
        (h as f32 / perp_dist) as i32 // saturating
    } else {
        i32::MAX
    };

    let top = (-line / 2 + h / 2).max(0);
    let bottom = (line / 2 + h / 2).min(h - 1);
    Some(Span {
        top: top as usize,
        bottom: bottom as usize,
    })
}

/// Per-column ray caster writing into an abstract color buffer.
#[derive(Debug, Clone)]
pub struct Renderer {
    width: usize,
    height: usize,
    palette: Palette,
}

impl Renderer {
    pub fn new(width: usize, height: usize, palette: Palette) -> Self {
        Self {
            width,
            height,
            palette,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Wall slice and its color for screen column `x`.
    pub fn cast_column(&self, x: usize, grid: &Grid, view: &Viewpoint) -> Option<(Span, Color)> {
        let camera_x = 2.0 * x as f32 / self.width as f32 - 1.0;
        let hit = cast_ray(grid, view, camera_x)?;
        let span = column_span(self.height, hit.perp_dist)?;
        let color = match hit.side {
            Side::NorthSouth => self.palette.north_south,
            Side::EastWest => self.palette.east_west,
        };
        Some((span, color))
    }

    /// Overwrite every cell of `buf` with the current view.
    ///
    /// Columns are cast in parallel, then rows are filled in parallel; every
    /// cell not covered by a wall slice gets the background color.
    pub fn cast_and_draw(&self, buf: &mut [Color], grid: &Grid, view: &Viewpoint) {
        let (width, height) = (self.width, self.height);
        debug_assert_eq!(buf.len(), width * height, "color buffer size");
        if width == 0 || height == 0 {
            return;
        }
        let len = buf.len().min(width * height);
        let buf = &mut buf[..len];

        let columns: Vec<Option<(Span, Color)>> = (0..width)
            .into_par_iter()
            .map(|x| self.cast_column(x, grid, view))
            .collect();

        let background = self.palette.background;
        buf.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
            for (cell, column) in row.iter_mut().zip(&columns) {
                *cell = match column {
                    Some((span, color)) if span.contains(y) => *color,
                    _ => background,
                };
            }
        });
    }
}
