//! A1-style cell coordinates.

use std::fmt;

/// Zero-based cell coordinate, displayed in A1 notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    /// Zero-based row (`0` is spreadsheet row 1).
    pub row: usize,
    /// Zero-based column (`0` is column A).
    pub col: usize,
}

impl CellRef {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Column letters for a zero-based column index (`0 -> A`, `26 -> AA`).
    pub fn column_name(col: usize) -> String {
        let mut n = col + 1;
        let mut out = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            out.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        out.reverse();
        String::from_utf8_lossy(&out).into_owned()
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_name(self.col), self.row + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::CellRef;

    #[test]
    fn prints_a1_notation() {
        assert_eq!(CellRef::new(0, 1).to_string(), "B1");
        assert_eq!(CellRef::new(4, 10).to_string(), "K5");
        assert_eq!(CellRef::new(9, 26).to_string(), "AA10");
        assert_eq!(CellRef::new(1, 12).to_string(), "M2");
        assert_eq!(CellRef::new(0, 27).to_string(), "AB1");
    }
}
