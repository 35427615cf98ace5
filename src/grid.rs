use std::fmt;

/// Side length of the built-in maze, in tiles.
pub const MAZE_SIDE: usize = 22;

#[rustfmt::skip]
const MAZE_TILES: [[u8; MAZE_SIDE]; MAZE_SIDE] = [
    [1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],
    [1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],
    [1,1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1,1],
    [1,1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1,1],
    [1,1,0,0,1,1,1,1,1,1,1,1,1,1,1,1,1,1,0,0,1,1],
    [1,1,0,0,1,1,1,1,1,1,1,1,1,1,1,1,1,1,0,0,1,1],
    [1,1,0,0,1,1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1,1],
    [1,1,0,0,1,1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1,1],
    [1,1,0,0,1,1,1,1,1,1,0,0,1,1,0,0,1,1,1,1,1,1],
    [1,1,0,0,1,1,1,1,1,1,0,0,1,1,0,0,1,1,1,1,1,1],
    [1,1,0,0,1,1,0,0,1,1,0,0,1,1,0,0,0,0,0,0,1,1],
    [1,1,0,0,1,1,0,0,1,1,0,0,1,1,0,0,0,0,0,0,1,1],
    [1,1,0,0,1,1,0,0,1,1,0,0,1,1,1,1,1,1,0,0,1,1],
    [1,1,0,0,1,1,0,0,1,1,0,0,1,1,1,1,1,1,0,0,1,1],
    [1,1,0,0,1,1,0,0,0,0,0,0,0,0,0,0,1,1,0,0,1,1],
    [1,1,0,0,1,1,0,0,0,0,0,0,0,0,0,0,1,1,0,0,1,1],
    [1,1,0,0,1,1,0,0,1,1,1,1,1,1,0,0,1,1,0,0,1,1],
    [1,1,0,0,1,1,0,0,1,1,1,1,1,1,0,0,1,1,0,0,1,1],
    [1,1,0,0,0,0,0,0,1,1,0,0,0,0,0,0,0,0,0,0,1,1],
    [1,1,0,0,0,0,0,0,1,1,0,0,0,0,0,0,0,0,0,0,1,1],
    [1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],
    [1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Tile count does not match `side * side`.
    SizeMismatch { side: usize, tiles: usize },
    Empty,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::SizeMismatch { side, tiles } => write!(
                f,
                "grid of side {side} needs {} tiles, got {tiles}",
                side * side
            ),
            GridError::Empty => write!(f, "grid must have at least one tile"),
        }
    }
}

impl std::error::Error for GridError {}

/// Square, immutable tile map. 0 is open floor, anything else is wall.
///
/// Tiles are addressed as `(tile_x, tile_y)` where `tile_x` selects the row of
/// the source table and `tile_y` the column within it.
#[derive(Debug, Clone)]
pub struct Grid {
    side: usize,
    tiles: Vec<u8>, // row-major, index = tile_x * side + tile_y
}

impl Grid {
    pub fn new(side: usize, tiles: Vec<u8>) -> Result<Self, GridError> {
        if side == 0 {
            return Err(GridError::Empty);
        }
        if tiles.len() != side * side {
            return Err(GridError::SizeMismatch {
                side,
                tiles: tiles.len(),
            });
        }
        Ok(Self { side, tiles })
    }

    /// The built-in 22x22 maze. Its outer two rings are solid wall.
    pub fn maze() -> Self {
        Self {
            side: MAZE_SIDE,
            tiles: MAZE_TILES.iter().flatten().copied().collect(),
        }
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Upper bound on DDA steps for one ray.
    ///
    /// A grid walk visits at most `side` tiles per axis, so twice the side
    /// covers the diagonal with room to spare.
    #[inline]
    pub fn max_ray_steps(&self) -> usize {
        2 * self.side
    }

    #[inline]
    pub fn tile(&self, tile_x: i32, tile_y: i32) -> Option<u8> {
        if tile_x < 0 || tile_y < 0 {
            return None;
        }
        let (x, y) = (tile_x as usize, tile_y as usize);
        if x >= self.side || y >= self.side {
            return None;
        }
        Some(self.tiles[x * self.side + y])
    }

    /// Anything outside the grid counts as wall.
    #[inline]
    pub fn is_wall(&self, tile_x: i32, tile_y: i32) -> bool {
        self.tile(tile_x, tile_y).is_none_or(|t| t != 0)
    }

    /// Wall test for a continuous position in tile units.
    #[inline]
    pub fn is_wall_at(&self, x: f32, y: f32) -> bool {
        self.is_wall(x.floor() as i32, y.floor() as i32)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::maze()
    }
}
