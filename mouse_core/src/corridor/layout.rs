// mouse_core/src/corridor/layout.rs

use crate::corridor::{Corridor, WallSegment};
use crate::error::CoreError;
use crate::geometry::Vec2;
use std::path::PathBuf;

/// Where a layout grid comes from. Files are re-read on every reset.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutSource {
    File(PathBuf),
    Inline(String),
}

impl LayoutSource {
    fn label(&self) -> String {
        match self {
            LayoutSource::File(path) => path.display().to_string(),
            LayoutSource::Inline(_) => "<inline>".to_string(),
        }
    }

    fn read(&self) -> Result<String, CoreError> {
        match self {
            LayoutSource::File(path) => {
                std::fs::read_to_string(path).map_err(|source| CoreError::Io {
                    path: path.clone(),
                    source,
                })
            }
            LayoutSource::Inline(text) => Ok(text.clone()),
        }
    }
}

/// A maze described by a character grid.
///
/// Characters sit on a doubled grid: positions where row and column parity
/// match are nodes (corners / cell interiors) and are ignored; the remaining
/// positions may carry a `|` (wall on the west side of a cell) or a `-` (wall
/// on the far side of a cell, towards -y). Row 0 of the text is the far edge of
/// the grid. Rows past the last cell row land at negative cell indices, closer
/// to the robot; the first of them is usually the near boundary.
#[derive(Debug, Clone)]
pub struct LayoutMaze {
    source: LayoutSource,
    cell_size: f64,
    grid_rows: usize,
    segments: Vec<WallSegment>,
}

impl LayoutMaze {
    pub fn new(source: LayoutSource, cell_size: f64, grid_rows: usize) -> Result<Self, CoreError> {
        if cell_size <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "layout cell_size must be positive, got {cell_size}"
            )));
        }
        if grid_rows == 0 {
            return Err(CoreError::InvalidConfig(
                "layout grid_rows must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            source,
            cell_size,
            grid_rows,
            segments: Vec::new(),
        })
    }

    fn to_world(&self, cell_x: f64, cell_y: f64) -> Vec2 {
        Vec2::new(cell_x * self.cell_size, -cell_y * self.cell_size)
    }

    /// Converts the text grid into wall segments.
    pub fn parse(&self, text: &str) -> Result<Vec<WallSegment>, CoreError> {
        let half = self.cell_size / 2.0;
        let mut walls = Vec::new();

        for (row, line) in text.lines().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if col % 2 == row % 2 || (ch != '|' && ch != '-') {
                    continue;
                }
                let cell_y = self.grid_rows as f64 - 1.0 - (row / 2) as f64;
                let center = self.to_world((col / 2) as f64, cell_y);
                let corner = center + Vec2::new(-half, -half);
                let end = if ch == '|' {
                    center + Vec2::new(-half, half)
                } else {
                    center + Vec2::new(half, -half)
                };
                walls.push(WallSegment::visible(corner, end));
            }
        }

        if walls.is_empty() {
            return Err(CoreError::EmptyLayout {
                source_name: self.source.label(),
            });
        }
        Ok(walls)
    }
}

impl Corridor for LayoutMaze {
    fn name(&self) -> &str {
        "layout-maze"
    }

    fn reset(&mut self) -> Result<(), CoreError> {
        let text = self.source.read()?;
        self.segments = self.parse(&text)?;
        Ok(())
    }

    fn segments(&self) -> &[WallSegment] {
        &self.segments
    }

    fn segments_mut(&mut self) -> &mut [WallSegment] {
        &mut self.segments
    }
}
