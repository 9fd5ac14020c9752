//! Sparse tile grid for one pyramid layer.

/// One cell of a [`TileGrid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileCell {
    /// A tile reference, resolved against the tile root by a tile source
    Present(String),

    /// No tile at this grid position; the region stays transparent
    Absent,
}

impl TileCell {
    /// Build a cell from a raw descriptor token. Blank tokens are absent cells.
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() {
            TileCell::Absent
        } else {
            TileCell::Present(token.to_string())
        }
    }

    /// The tile reference, if this cell holds one.
    pub fn reference(&self) -> Option<&str> {
        match self {
            TileCell::Present(reference) => Some(reference),
            TileCell::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, TileCell::Absent)
    }
}

/// Row-major grid of tile cells.
///
/// Rows may differ in length as written in the descriptor. The column count
/// used for canvas sizing is the length of the first row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileGrid {
    rows: Vec<Vec<TileCell>>,
}

impl TileGrid {
    pub fn new(rows: Vec<Vec<TileCell>>) -> Self {
        Self { rows }
    }

    /// Build a grid from raw token rows.
    pub fn from_tokens<R, T>(rows: R) -> Self
    where
        R: IntoIterator<Item = Vec<T>>,
        T: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.iter().map(|t| TileCell::from_token(t.as_ref())).collect())
            .collect();
        Self { rows }
    }

    /// Number of rows actually present.
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, taken from the first row.
    pub fn cols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// True when the grid has no rows or its first row has no columns.
    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.cols() == 0
    }

    /// Bounds-checked cell access. `None` means the position is outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<&TileCell> {
        self.rows.get(row)?.get(col)
    }

    /// Present tiles in row-major order as `(row, col, reference)`.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, &str)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(c, cell)| cell.reference().map(|name| (r, c, name)))
        })
    }

    /// Number of present tiles.
    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }
}
