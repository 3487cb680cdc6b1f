//! Rasterizer: maze walls and solution overlay into an RGBA buffer.
//!
//! Closed walls become 1-px black segments on a white background, offset
//! by a fixed border. Open walls are simply not drawn, which is what makes
//! the entrance/exit boundary gaps visible. The pixel buffer lives on the
//! rasterizer and is reallocated only when the output dimensions change;
//! a same-size render clears and redraws in place.

use crate::maze::{Maze, Position};
use crate::maze::Direction::{East, North, South, West};

/// Width/height in pixels of a single cell.
pub const CELL_SIZE: usize = 12;
const HALF_CELL: usize = CELL_SIZE / 2;
/// Margin in pixels around the maze.
pub const BORDER: usize = 40;
/// Floor on the image width, keeps narrow mazes legible.
pub const MIN_IMAGE_WIDTH: usize = CELL_SIZE * 4 + BORDER * 2;

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];
const RED: [u8; 4] = [255, 0, 0, 255];

pub struct Rasterizer {
    width_px: usize,
    height_px: usize,
    pixels: Vec<u8>,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            width_px: 0,
            height_px: 0,
            pixels: Vec::new(),
        }
    }

    /// Output width in pixels.
    pub fn width_px(&self) -> usize {
        self.width_px
    }

    /// Output height in pixels.
    pub fn height_px(&self) -> usize {
        self.height_px
    }

    /// RGBA8, row-major, no padding.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Draw the maze walls over a white background.
    pub fn render(&mut self, maze: &Maze) {
        let width_px = (maze.width() * CELL_SIZE + BORDER * 2).max(MIN_IMAGE_WIDTH);
        let height_px = maze.height() * CELL_SIZE + BORDER * 2;

        if self.width_px != width_px || self.height_px != height_px {
            self.width_px = width_px;
            self.height_px = height_px;
            self.pixels = vec![0; width_px * height_px * 4];
        }
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&WHITE);
        }

        for y in 0..maze.height() {
            for x in 0..maze.width() {
                self.draw_cell(maze, x, y);
            }
        }
    }

    /// Overlay the solution path: one straight segment per consecutive
    /// pair of positions, connecting cell centers.
    pub fn render_path(&mut self, path: &[Position]) {
        for pair in path.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a.x == b.x {
                let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
                self.v_line(center(a.x), center(y0), center(y1), RED);
            }
            if a.y == b.y {
                let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
                self.h_line(center(x0), center(a.y), center(x1), RED);
            }
        }
    }

    fn draw_cell(&mut self, maze: &Maze, x: usize, y: usize) {
        let cell = maze.at(Position::new(x, y));
        let (x0, y0) = (x * CELL_SIZE + BORDER, y * CELL_SIZE + BORDER);
        let (x1, y1) = (x0 + CELL_SIZE, y0 + CELL_SIZE);

        if !cell.is_open(North) {
            self.h_line(x0, y0, x1, BLACK);
        }
        if !cell.is_open(South) {
            self.h_line(x0, y1, x1, BLACK);
        }
        if !cell.is_open(West) {
            self.v_line(x0, y0, y1, BLACK);
        }
        if !cell.is_open(East) {
            self.v_line(x1, y0, y1, BLACK);
        }
    }

    /// Horizontal 1-px segment from (x0, y) to (x1, y), endpoints inclusive.
    fn h_line(&mut self, x0: usize, y: usize, x1: usize, color: [u8; 4]) {
        for x in x0..=x1 {
            self.put(x, y, color);
        }
    }

    /// Vertical 1-px segment from (x, y0) to (x, y1), endpoints inclusive.
    fn v_line(&mut self, x: usize, y0: usize, y1: usize, color: [u8; 4]) {
        for y in y0..=y1 {
            self.put(x, y, color);
        }
    }

    fn put(&mut self, x: usize, y: usize, color: [u8; 4]) {
        let idx = (y * self.width_px + x) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&color);
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Pixel coordinate of a cell center along either axis.
fn center(cell: usize) -> usize {
    cell * CELL_SIZE + BORDER + HALF_CELL
}
