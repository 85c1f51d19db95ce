use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Cell contents of a table element, row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    cells: Vec<Vec<String>>,
    pub has_header: bool,
}

impl TableData {
    /// Creates an empty `rows` x `cols` table. Zero dimensions are raised to one.
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            cells: vec![vec![String::new(); cols]; rows],
            has_header: true,
        }
    }

    /// Builds a table from rows of text, padding short rows to the widest one.
    pub fn from_rows(rows: Vec<Vec<String>>, has_header: bool) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0).max(1);
        let mut cells: Vec<Vec<String>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(cols, String::new());
                row
            })
            .collect();
        if cells.is_empty() {
            cells.push(vec![String::new(); cols]);
        }
        Self { cells, has_header }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.cells.get(row)?.get(col).map(String::as_str)
    }

    /// Replaces one cell. Returns `false` if the cell does not exist.
    pub fn set_cell(&mut self, row: usize, col: usize, text: impl Into<String>) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = text.into();
                true
            }
            None => false,
        }
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[String]> {
        self.cells.iter().map(Vec::as_slice)
    }

    pub fn is_header_row(&self, row: usize) -> bool {
        self.has_header && row == 0
    }

    /// Zebra striping applies to odd rows, header excluded
    pub fn is_striped_row(&self, row: usize) -> bool {
        !self.is_header_row(row) && row % 2 == 1
    }

    /// Rect of a cell when the table is laid out evenly inside `bounds`.
    pub fn cell_rect(&self, bounds: Rect, row: usize, col: usize) -> Rect {
        let cell_size = Vec2::new(
            bounds.width() / self.cols().max(1) as f32,
            bounds.height() / self.rows().max(1) as f32,
        );
        Rect::from_min_size(
            Pos2::new(
                bounds.min.x + cell_size.x * col as f32,
                bounds.min.y + cell_size.y * row as f32,
            ),
            cell_size,
        )
    }

    /// Cell under `point`, with the table laid out inside `bounds`.
    pub fn cell_at(&self, bounds: Rect, point: Pos2) -> Option<(usize, usize)> {
        if !bounds.contains(point) || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return None;
        }
        let fraction = (point - bounds.min) / bounds.size();
        let row = ((fraction.y * self.rows() as f32) as usize).min(self.rows().saturating_sub(1));
        let col = ((fraction.x * self.cols() as f32) as usize).min(self.cols().saturating_sub(1));
        Some((row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_has_requested_shape() {
        let t = TableData::new(3, 4);
        assert_eq!(t.rows(), 3);
        assert_eq!(t.cols(), 4);
        assert_eq!(t.cell(2, 3), Some(""));
        assert_eq!(t.cell(3, 0), None);
    }

    #[test]
    fn set_cell_only_touches_existing_cells() {
        let mut t = TableData::new(2, 2);
        assert!(t.set_cell(1, 1, "x"));
        assert!(!t.set_cell(5, 0, "y"));
        assert_eq!(t.cell(1, 1), Some("x"));
    }

    #[test]
    fn ragged_rows_are_padded() {
        let t = TableData::from_rows(vec![vec!["a".into()], vec!["b".into(), "c".into()]], false);
        assert_eq!(t.cols(), 2);
        assert_eq!(t.cell(0, 1), Some(""));
    }

    #[test]
    fn striping_skips_header() {
        let t = TableData::new(4, 1);
        assert!(t.is_header_row(0));
        assert!(!t.is_striped_row(0));
        assert!(t.is_striped_row(1));
        assert!(!t.is_striped_row(2));
        assert!(t.is_striped_row(3));
    }

    #[test]
    fn cells_tile_the_bounds() {
        let t = TableData::new(2, 4);
        let bounds = Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(400.0, 100.0));
        let r = t.cell_rect(bounds, 1, 2);
        assert_eq!(r.min, Pos2::new(300.0, 100.0));
        assert_eq!(r.size(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn cell_at_inverts_cell_rect() {
        let t = TableData::new(3, 3);
        let bounds = Rect::from_min_size(Pos2::new(100.0, 100.0), Vec2::new(300.0, 150.0));
        assert_eq!(t.cell_at(bounds, Pos2::new(101.0, 101.0)), Some((0, 0)));
        assert_eq!(t.cell_at(bounds, t.cell_rect(bounds, 2, 1).center()), Some((2, 1)));
        // The far edge belongs to the last cell
        assert_eq!(t.cell_at(bounds, bounds.max), Some((2, 2)));
        assert_eq!(t.cell_at(bounds, Pos2::new(50.0, 120.0)), None);
    }
}
