pub const FRAME_WIDTH: usize = 64;
pub const FRAME_HEIGHT: usize = 32;
pub const OPCODE_BYTES: u16 = 2;
pub const MEM_SIZE: usize = 4096;
pub const REG_COUNT: usize = 16;
pub const STACK_DEPTH: usize = 16;
pub const KEY_COUNT: usize = 16;
pub const FLAG_REG: usize = 0xF;

pub const LOAD_ADDR: u16 = 0x200;
pub const PROGRAM_CAPACITY: usize = MEM_SIZE - LOAD_ADDR as usize;

pub const GLYPH_BYTES: usize = 5;
pub const FONT_SET_SIZE: usize = 80;

// The reference machine paced instructions at 100 Hz and timers at 50 Hz.
// The conventional platform ticks timers at 60 Hz instead; kept as constants
// so either can be matched against test ROMs.
pub const STEP_HZ: u32 = 100;
pub const TICK_HZ: u32 = 50;

pub const DISPLAY_SCALE: u32 = 10;

pub const FONT_SET: [u8; FONT_SET_SIZE] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
