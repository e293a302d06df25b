/// Splits a 16-bit instruction word into its four nibbles, high to low.
pub fn nibbles(word: u16) -> (u8, u8, u8, u8) {
    (
        ((word & 0xF000) >> 12) as u8,
        ((word & 0x0F00) >> 8) as u8,
        ((word & 0x00F0) >> 4) as u8,
        (word & 0x000F) as u8,
    )
}
