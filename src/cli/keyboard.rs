//! On-screen QWERTY keyboard layout and mouse hit-testing

use crate::session::Letter;
use rustc_hash::FxHashMap;

pub const QWERTY_ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];

/// Columns per key, including the gap after it: `[Q] `
pub const KEY_WIDTH: u16 = 4;
/// Extra indent per row, like a physical keyboard's stagger
const ROW_STAGGER: u16 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyCell {
    pub letter: Letter,
    pub column: u16,
    pub row: u16,
}

impl KeyCell {
    /// Clickable span excludes the trailing gap
    fn contains(&self, column: u16, row: u16) -> bool {
        row == self.row && column >= self.column && column < self.column + KEY_WIDTH - 1
    }
}

/// Keys placed on screen
#[derive(Clone, Debug)]
pub struct KeyboardLayout {
    cells: Vec<KeyCell>,
    by_letter: FxHashMap<Letter, usize>,
}

impl KeyboardLayout {
    /// Lay the keyboard out centred in a terminal `width` wide, first row at `top`
    pub fn centered(width: u16, top: u16) -> Self {
        let widest = QWERTY_ROWS[0].len() as u16 * KEY_WIDTH;
        let left = width.saturating_sub(widest) / 2;

        let mut cells = Vec::with_capacity(26);
        let mut by_letter = FxHashMap::default();
        for (row_idx, row) in QWERTY_ROWS.iter().enumerate() {
            let indent = left + row_idx as u16 * ROW_STAGGER;
            for (col_idx, c) in row.chars().enumerate() {
                let Some(letter) = Letter::from_char(c) else {
                    continue;
                };
                by_letter.insert(letter, cells.len());
                cells.push(KeyCell {
                    letter,
                    column: indent + col_idx as u16 * KEY_WIDTH,
                    row: top + row_idx as u16,
                });
            }
        }

        KeyboardLayout { cells, by_letter }
    }

    pub fn cells(&self) -> &[KeyCell] {
        &self.cells
    }

    pub fn cell(&self, letter: Letter) -> Option<&KeyCell> {
        self.by_letter.get(&letter).map(|&idx| &self.cells[idx])
    }

    /// Key under a mouse click, if any
    pub fn hit(&self, column: u16, row: u16) -> Option<Letter> {
        self.cells
            .iter()
            .find(|cell| cell.contains(column, row))
            .map(|cell| cell.letter)
    }
}
