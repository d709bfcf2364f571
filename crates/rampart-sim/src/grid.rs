//! Placement grid: which cells are free, which carry the path, which hold a
//! tower.

use hecs::Entity;

use rampart_core::config::FieldConfig;
use rampart_core::error::PlacementBlock;
use rampart_core::types::Position;

use crate::path::Path;

#[derive(Debug, Clone)]
pub struct Cell {
    pub col: usize,
    pub row: usize,
    pub center: Position,
    pub on_path: bool,
    pub tower: Option<Entity>,
}

#[derive(Debug, Clone)]
pub struct Grid {
    cols: usize,
    rows: usize,
    cell_size: f64,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(field: &FieldConfig) -> Self {
        let cs = field.cell_size;
        let mut cells = Vec::with_capacity(field.cols * field.rows);
        for row in 0..field.rows {
            for col in 0..field.cols {
                cells.push(Cell {
                    col,
                    row,
                    center: Position::new(col as f64 * cs + cs / 2.0, row as f64 * cs + cs / 2.0),
                    on_path: false,
                    tower: None,
                });
            }
        }
        Self {
            cols: field.cols,
            rows: field.rows,
            cell_size: cs,
            cells,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Index of the cell containing `(x, y)`, if it lies on the field.
    pub fn cell_index(&self, x: f64, y: f64) -> Option<usize> {
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x / self.cell_size).floor() as usize;
        let row = (y / self.cell_size).floor() as usize;
        (col < self.cols && row < self.rows).then(|| row * self.cols + col)
    }

    pub fn cell_at(&self, x: f64, y: f64) -> Option<&Cell> {
        self.cell_index(x, y).map(|i| &self.cells[i])
    }

    /// Mark every cell the path touches. Each segment is sampled finely
    /// enough that no crossed cell is skipped.
    pub fn mark_path(&mut self, path: &Path) {
        for cell in &mut self.cells {
            cell.on_path = false;
        }
        let step = self.cell_size / 4.0;
        for pair in path.waypoints().windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let length = a.range_to(&b);
            let samples = (length / step).ceil().max(1.0) as usize;
            for i in 0..=samples {
                let t = i as f64 / samples as f64;
                self.mark_point(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
            }
        }
        if let Some(only) = path.waypoints().first() {
            self.mark_point(only.x, only.y);
        }
    }

    fn mark_point(&mut self, x: f64, y: f64) {
        if let Some(i) = self.cell_index(x, y) {
            self.cells[i].on_path = true;
        }
    }

    /// Whether a tower may be built at `(x, y)`; on success, the cell index.
    pub fn placement_check(&self, x: f64, y: f64) -> Result<usize, PlacementBlock> {
        let index = self.cell_index(x, y).ok_or(PlacementBlock::OutOfBounds)?;
        let cell = &self.cells[index];
        if cell.on_path {
            return Err(PlacementBlock::OnPath);
        }
        if cell.tower.is_some() {
            return Err(PlacementBlock::Occupied);
        }
        Ok(index)
    }

    pub fn occupy(&mut self, index: usize, tower: Entity) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.tower = Some(tower);
        }
    }

    /// Free whichever cell holds `tower`.
    pub fn vacate(&mut self, tower: Entity) {
        for cell in &mut self.cells {
            if cell.tower == Some(tower) {
                cell.tower = None;
            }
        }
    }

    /// Cells a tower could be built on right now.
    pub fn free_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells
            .iter()
            .filter(|cell| !cell.on_path && cell.tower.is_none())
    }
}
