//! 5x5 block glyphs for the large letter in rich presentation

use crate::session::Letter;

pub const GLYPH_WIDTH: usize = 5;
pub const GLYPH_HEIGHT: usize = 5;
/// Terminal columns per glyph cell
pub const CELL_WIDTH: u16 = 2;
/// Screen row of the glyph's top edge
pub const LETTER_TOP: u16 = 5;

#[rustfmt::skip]
const GLYPHS: [[&str; GLYPH_HEIGHT]; 26] = [
    [" ### ", "#   #", "#####", "#   #", "#   #"], // A
    ["#### ", "#   #", "#### ", "#   #", "#### "], // B
    [" ####", "#    ", "#    ", "#    ", " ####"], // C
    ["#### ", "#   #", "#   #", "#   #", "#### "], // D
    ["#####", "#    ", "#### ", "#    ", "#####"], // E
    ["#####", "#    ", "#### ", "#    ", "#    "], // F
    [" ####", "#    ", "#  ##", "#   #", " ### "], // G
    ["#   #", "#   #", "#####", "#   #", "#   #"], // H
    ["#####", "  #  ", "  #  ", "  #  ", "#####"], // I
    ["#####", "   # ", "   # ", "#  # ", " ##  "], // J
    ["#   #", "#  # ", "###  ", "#  # ", "#   #"], // K
    ["#    ", "#    ", "#    ", "#    ", "#####"], // L
    ["#   #", "## ##", "# # #", "#   #", "#   #"], // M
    ["#   #", "##  #", "# # #", "#  ##", "#   #"], // N
    [" ### ", "#   #", "#   #", "#   #", " ### "], // O
    ["#### ", "#   #", "#### ", "#    ", "#    "], // P
    [" ### ", "#   #", "# # #", "#  # ", " ## #"], // Q
    ["#### ", "#   #", "#### ", "#  # ", "#   #"], // R
    [" ####", "#    ", " ### ", "    #", "#### "], // S
    ["#####", "  #  ", "  #  ", "  #  ", "  #  "], // T
    ["#   #", "#   #", "#   #", "#   #", " ### "], // U
    ["#   #", "#   #", "#   #", " # # ", "  #  "], // V
    ["#   #", "#   #", "# # #", "## ##", "#   #"], // W
    ["#   #", " # # ", "  #  ", " # # ", "#   #"], // X
    ["#   #", " # # ", "  #  ", "  #  ", "  #  "], // Y
    ["#####", "   # ", "  #  ", " #   ", "#####"], // Z
];

/// Rows of the block glyph for `letter`
pub fn rows(letter: Letter) -> &'static [&'static str; GLYPH_HEIGHT] {
    &GLYPHS[letter.ordinal()]
}

/// Top-left screen position of a glyph centred in a terminal `width` wide
pub fn origin(width: u16) -> (u16, u16) {
    let glyph_cols = GLYPH_WIDTH as u16 * CELL_WIDTH;
    (width.saturating_sub(glyph_cols) / 2, LETTER_TOP)
}

/// Filled cells of the glyph as (column, row) offsets
pub fn filled_cells(letter: Letter) -> impl Iterator<Item = (usize, usize)> {
    rows(letter).iter().enumerate().flat_map(|(y, row)| {
        row.bytes()
            .enumerate()
            .filter(|(_, b)| *b == b'#')
            .map(move |(x, _)| (x, y))
    })
}
