use crate::error::VmError;
use crate::utils;

/// One decoded instruction. Register selectors are plain indices; the
/// machine's bounded accessors re-check them at execution time.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XNN
    SkipEqImm(usize, u8),
    /// 4XNN
    SkipNeImm(usize, u8),
    /// 5XY0
    SkipEqReg(usize, usize),
    /// 6XNN
    LoadImm(usize, u8),
    /// 7XNN
    AddImm(usize, u8),
    /// 8XY0
    Move(usize, usize),
    /// 8XY1
    Or(usize, usize),
    /// 8XY2
    And(usize, usize),
    /// 8XY3
    Xor(usize, usize),
    /// 8XY4
    AddReg(usize, usize),
    /// 8XY5
    SubReg(usize, usize),
    /// 8XY6
    ShiftRight(usize),
    /// 8XY7
    SubFrom(usize, usize),
    /// 8XYE
    ShiftLeft(usize),
    /// 9XY0
    SkipNeReg(usize, usize),
    /// ANNN
    LoadIndex(u16),
    /// BNNN
    JumpOffset(u16),
    /// CXNN
    Random(usize, u8),
    /// DXYN
    Draw(usize, usize, u8),
    /// EX9E
    SkipKeyDown(usize),
    /// EXA1
    SkipKeyUp(usize),
    /// FX07
    ReadDelay(usize),
    /// FX0A
    WaitKey(usize),
    /// FX15
    SetDelay(usize),
    /// FX18
    SetSound(usize),
    /// FX1E
    AddIndex(usize),
    /// FX29
    FontIndex(usize),
    /// FX33
    StoreBcd(usize),
    /// FX55
    StoreRegs(usize),
    /// FX65
    LoadRegs(usize),
}

impl Instruction {
    /// Decodes an instruction word, or reports a `DecodeFault` for any
    /// word whose nibbles match none of the 35 baseline opcodes.
    pub fn decode(word: u16) -> Result<Instruction, VmError> {
        let (op, x, y, n) = utils::nibbles(word);
        let x = x as usize;
        let y = y as usize;
        let nn = (word & 0x00FF) as u8;
        let nnn = word & 0x0FFF;

        let instr = match (op, x, y, n) {
            (0x0, 0x0, 0xE, 0x0) => Instruction::ClearScreen,
            (0x0, 0x0, 0xE, 0xE) => Instruction::Return,
            (0x1, _, _, _) => Instruction::Jump(nnn),
            (0x2, _, _, _) => Instruction::Call(nnn),
            (0x3, _, _, _) => Instruction::SkipEqImm(x, nn),
            (0x4, _, _, _) => Instruction::SkipNeImm(x, nn),
            (0x5, _, _, 0x0) => Instruction::SkipEqReg(x, y),
            (0x6, _, _, _) => Instruction::LoadImm(x, nn),
            (0x7, _, _, _) => Instruction::AddImm(x, nn),
            (0x8, _, _, 0x0) => Instruction::Move(x, y),
            (0x8, _, _, 0x1) => Instruction::Or(x, y),
            (0x8, _, _, 0x2) => Instruction::And(x, y),
            (0x8, _, _, 0x3) => Instruction::Xor(x, y),
            (0x8, _, _, 0x4) => Instruction::AddReg(x, y),
            (0x8, _, _, 0x5) => Instruction::SubReg(x, y),
            (0x8, _, _, 0x6) => Instruction::ShiftRight(x),
            (0x8, _, _, 0x7) => Instruction::SubFrom(x, y),
            (0x8, _, _, 0xE) => Instruction::ShiftLeft(x),
            (0x9, _, _, 0x0) => Instruction::SkipNeReg(x, y),
            (0xA, _, _, _) => Instruction::LoadIndex(nnn),
            (0xB, _, _, _) => Instruction::JumpOffset(nnn),
            (0xC, _, _, _) => Instruction::Random(x, nn),
            (0xD, _, _, _) => Instruction::Draw(x, y, n),
            (0xE, _, 0x9, 0xE) => Instruction::SkipKeyDown(x),
            (0xE, _, 0xA, 0x1) => Instruction::SkipKeyUp(x),
            (0xF, _, 0x0, 0x7) => Instruction::ReadDelay(x),
            (0xF, _, 0x0, 0xA) => Instruction::WaitKey(x),
            (0xF, _, 0x1, 0x5) => Instruction::SetDelay(x),
            (0xF, _, 0x1, 0x8) => Instruction::SetSound(x),
            (0xF, _, 0x1, 0xE) => Instruction::AddIndex(x),
            (0xF, _, 0x2, 0x9) => Instruction::FontIndex(x),
            (0xF, _, 0x3, 0x3) => Instruction::StoreBcd(x),
            (0xF, _, 0x5, 0x5) => Instruction::StoreRegs(x),
            (0xF, _, 0x6, 0x5) => Instruction::LoadRegs(x),
            _ => return Err(VmError::DecodeFault(word)),
        };
        Ok(instr)
    }
}
