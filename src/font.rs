pub const C8_FONT_BASE: u16 = 0x050;
pub const C8_GLYPH_SIZE: usize = 5;

/// Hex digit glyphs 0-F, one 4x5 sprite per digit.
pub const C8_FONT: [u8; 0x10 * C8_GLYPH_SIZE] = [
    0xf0, 0x90, 0x90, 0x90, 0xf0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xf0, 0x10, 0xf0, 0x80, 0xf0, // 2
    0xf0, 0x10, 0xf0, 0x10, 0xf0, // 3
    0x90, 0x90, 0xf0, 0x10, 0x10, // 4
    0xf0, 0x80, 0xf0, 0x10, 0xf0, // 5
    0xf0, 0x80, 0xf0, 0x90, 0xf0, // 6
    0xf0, 0x10, 0x20, 0x40, 0x40, // 7
    0xf0, 0x90, 0xf0, 0x90, 0xf0, // 8
    0xf0, 0x90, 0xf0, 0x10, 0xf0, // 9
    0xf0, 0x90, 0xf0, 0x90, 0x90, // A
    0xe0, 0x90, 0xe0, 0x90, 0xe0, // B
    0xf0, 0x80, 0x80, 0x80, 0xf0, // C
    0xe0, 0x90, 0x90, 0x90, 0xe0, // D
    0xf0, 0x80, 0xf0, 0x80, 0xf0, // E
    0xf0, 0x80, 0xf0, 0x80, 0x80, // F
];

/// Address of the glyph for `digit`. Digits above 0xF are not masked, the
/// result just points past the table.
pub fn glyph_address(digit: u8) -> u16 {
    C8_FONT_BASE + digit as u16 * C8_GLYPH_SIZE as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_addresses() {
        assert_eq!(glyph_address(0x0), 0x050);
        assert_eq!(glyph_address(0x1), 0x055);
        assert_eq!(glyph_address(0xf), 0x09b);
    }

    #[test]
    fn test_font_ends_before_0xa0() {
        let end = C8_FONT_BASE as usize + C8_FONT.len();
        assert_eq!(end, 0xa0);
    }
}
