use rand::rngs::ThreadRng;
use rand::Rng;

use log::{debug, trace};

use crate::consts;
use crate::core::decode::Instruction;
use crate::core::machine::Machine;
use crate::error::VmError;

/// What a step did beyond mutating machine state.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StepOutcome {
    Continue,
    /// A clear or draw ran; the framebuffer changed.
    Redraw,
    /// A key-wait instruction parked the program counter.
    Waiting,
}

/// The interpreter engine. Owns the machine state and drives it one
/// fetch-decode-execute step at a time; the caller paces step and timer
/// ticks against wall-clock time.
pub struct Cpu {
    pub machine: Machine,
    rng: ThreadRng,
}

impl Cpu {
    pub fn new(machine: Machine) -> Self {
        Cpu {
            machine,
            rng: rand::thread_rng(),
        }
    }

    /// Executes exactly one instruction. The program counter advances by 2
    /// unless the instruction redirected it; skips end up 4 ahead. The
    /// keypad press latch is cleared at the end of every step.
    pub fn step(&mut self) -> Result<StepOutcome, VmError> {
        let pc = self.machine.pc;
        let hi = self.machine.read_byte(pc as usize)?;
        let lo = self.machine.read_byte(pc as usize + 1)?;
        let word = ((hi as u16) << 8) | lo as u16;
        trace!("executing {:04X} at {:04X}", word, pc);

        let instr = Instruction::decode(word)?;
        self.machine.pc = pc + consts::OPCODE_BYTES;
        let outcome = self.execute(instr);
        self.machine.clear_key_latch();
        outcome
    }

    pub fn tick_timers(&mut self) {
        self.machine.tick_timers();
    }

    fn execute(&mut self, instr: Instruction) -> Result<StepOutcome, VmError> {
        match instr {
            Instruction::ClearScreen => {
                self.machine.clear_frame();
                self.machine.mark_repaint();
                return Ok(StepOutcome::Redraw);
            }
            Instruction::Return => {
                self.machine.pc = self.machine.pop()?;
            }
            Instruction::Jump(nnn) => {
                self.machine.pc = nnn;
            }
            Instruction::Call(nnn) => {
                let ret = self.machine.pc;
                self.machine.push(ret)?;
                self.machine.pc = nnn;
            }

            // Conditional skips
            Instruction::SkipEqImm(x, nn) => {
                if self.machine.read_reg(x)? == nn {
                    self.machine.pc += consts::OPCODE_BYTES;
                }
            }
            Instruction::SkipNeImm(x, nn) => {
                if self.machine.read_reg(x)? != nn {
                    self.machine.pc += consts::OPCODE_BYTES;
                }
            }
            Instruction::SkipEqReg(x, y) => {
                if self.machine.read_reg(x)? == self.machine.read_reg(y)? {
                    self.machine.pc += consts::OPCODE_BYTES;
                }
            }
            Instruction::SkipNeReg(x, y) => {
                if self.machine.read_reg(x)? != self.machine.read_reg(y)? {
                    self.machine.pc += consts::OPCODE_BYTES;
                }
            }

            // Register loads and arithmetic
            Instruction::LoadImm(x, nn) => {
                self.machine.write_reg(x, nn)?;
            }
            Instruction::AddImm(x, nn) => {
                let vx = self.machine.read_reg(x)?;
                self.machine.write_reg(x, vx.wrapping_add(nn))?;
            }
            Instruction::Move(x, y) => {
                let vy = self.machine.read_reg(y)?;
                self.machine.write_reg(x, vy)?;
            }
            Instruction::Or(x, y) => {
                let v = self.machine.read_reg(x)? | self.machine.read_reg(y)?;
                self.machine.write_reg(x, v)?;
            }
            Instruction::And(x, y) => {
                let v = self.machine.read_reg(x)? & self.machine.read_reg(y)?;
                self.machine.write_reg(x, v)?;
            }
            Instruction::Xor(x, y) => {
                let v = self.machine.read_reg(x)? ^ self.machine.read_reg(y)?;
                self.machine.write_reg(x, v)?;
            }
            Instruction::AddReg(x, y) => {
                let (sum, carry) = self
                    .machine
                    .read_reg(x)?
                    .overflowing_add(self.machine.read_reg(y)?);
                self.machine.write_reg(x, sum)?;
                self.machine.write_reg(consts::FLAG_REG, carry as u8)?;
            }
            Instruction::SubReg(x, y) => {
                let vx = self.machine.read_reg(x)?;
                let vy = self.machine.read_reg(y)?;
                self.machine.write_reg(consts::FLAG_REG, (vx >= vy) as u8)?;
                self.machine.write_reg(x, vx.wrapping_sub(vy))?;
            }
            Instruction::SubFrom(x, y) => {
                let vx = self.machine.read_reg(x)?;
                let vy = self.machine.read_reg(y)?;
                self.machine.write_reg(consts::FLAG_REG, (vy >= vx) as u8)?;
                self.machine.write_reg(x, vy.wrapping_sub(vx))?;
            }
            Instruction::ShiftRight(x) => {
                let vx = self.machine.read_reg(x)?;
                self.machine.write_reg(consts::FLAG_REG, vx & 0x01)?;
                self.machine.write_reg(x, vx >> 1)?;
            }
            Instruction::ShiftLeft(x) => {
                let vx = self.machine.read_reg(x)?;
                self.machine.write_reg(consts::FLAG_REG, vx >> 7)?;
                self.machine.write_reg(x, vx << 1)?;
            }

            Instruction::LoadIndex(nnn) => {
                self.machine.index = nnn;
            }
            Instruction::JumpOffset(nnn) => {
                let addr = nnn as usize + self.machine.read_reg(0)? as usize;
                if addr >= consts::MEM_SIZE {
                    return Err(VmError::OutOfRange {
                        entity: "jump address",
                        value: addr,
                        max: consts::MEM_SIZE - 1,
                    });
                }
                self.machine.pc = addr as u16;
            }
            Instruction::Random(x, nn) => {
                let sample: u8 = self.rng.gen();
                self.machine.write_reg(x, sample & nn)?;
            }

            Instruction::Draw(x, y, n) => {
                let x0 = self.machine.read_reg(x)? as usize % consts::FRAME_WIDTH;
                let y0 = self.machine.read_reg(y)? as usize % consts::FRAME_HEIGHT;
                let base = self.machine.index as usize;
                let rows = n as usize;
                if rows > 0 && base + rows - 1 >= consts::MEM_SIZE {
                    return Err(VmError::OutOfRange {
                        entity: "memory address",
                        value: base + rows - 1,
                        max: consts::MEM_SIZE - 1,
                    });
                }
                let mut turned_off = false;
                for row in 0..rows {
                    let py = y0 + row;
                    if py >= consts::FRAME_HEIGHT {
                        break;
                    }
                    let bits = self.machine.read_byte(base + row)?;
                    for col in 0..8 {
                        if bits & (0x80 >> col) == 0 {
                            continue;
                        }
                        let px = x0 + col;
                        if px >= consts::FRAME_WIDTH {
                            break;
                        }
                        if self.machine.toggle_pixel(px, py)? {
                            turned_off = true;
                        }
                    }
                }
                self.machine.write_reg(consts::FLAG_REG, turned_off as u8)?;
                self.machine.mark_repaint();
                return Ok(StepOutcome::Redraw);
            }

            // Skip on key state
            Instruction::SkipKeyDown(x) => {
                let key = self.machine.read_reg(x)?;
                if self.machine.key_down(key as usize)? {
                    self.machine.pc += consts::OPCODE_BYTES;
                }
            }
            Instruction::SkipKeyUp(x) => {
                let key = self.machine.read_reg(x)?;
                if !self.machine.key_down(key as usize)? {
                    self.machine.pc += consts::OPCODE_BYTES;
                }
            }
            Instruction::WaitKey(x) => {
                if !self.machine.key_latched() {
                    debug!("parked at {:04X} waiting for a key press", self.machine.pc);
                    self.machine.pc -= consts::OPCODE_BYTES;
                    return Ok(StepOutcome::Waiting);
                }
                // lowest-indexed held key; if it was already released again,
                // the wait still completes and the register keeps its value
                if let Some(key) = self.machine.first_key_down() {
                    self.machine.write_reg(x, key)?;
                }
            }

            // Timers
            Instruction::ReadDelay(x) => {
                let t = self.machine.delay_timer;
                self.machine.write_reg(x, t)?;
            }
            Instruction::SetDelay(x) => {
                self.machine.delay_timer = self.machine.read_reg(x)?;
            }
            Instruction::SetSound(x) => {
                self.machine.sound_timer = self.machine.read_reg(x)?;
            }

            Instruction::AddIndex(x) => {
                let vx = self.machine.read_reg(x)? as u16;
                // the index register is deliberately left unmasked; only the
                // flag records that it ran past the 12-bit address space
                self.machine.index = self.machine.index.wrapping_add(vx);
                let overflow = self.machine.index as usize >= consts::MEM_SIZE;
                self.machine.write_reg(consts::FLAG_REG, overflow as u8)?;
            }
            Instruction::FontIndex(x) => {
                let glyph = self.machine.read_reg(x)? as usize;
                if glyph >= 0xF {
                    return Err(VmError::OutOfRange {
                        entity: "font index",
                        value: glyph,
                        max: 0xE,
                    });
                }
                self.machine.index = (glyph * consts::GLYPH_BYTES) as u16;
            }

            // Memory transfers
            Instruction::StoreBcd(x) => {
                let vx = self.machine.read_reg(x)?;
                let base = self.machine.index as usize;
                if base + 2 >= consts::MEM_SIZE {
                    return Err(VmError::OutOfRange {
                        entity: "memory address",
                        value: base + 2,
                        max: consts::MEM_SIZE - 1,
                    });
                }
                self.machine.write_byte(base, vx / 100)?;
                self.machine.write_byte(base + 1, (vx / 10) % 10)?;
                self.machine.write_byte(base + 2, vx % 10)?;
            }
            Instruction::StoreRegs(x) => {
                let base = self.machine.index as usize;
                if base + x >= consts::MEM_SIZE {
                    return Err(VmError::OutOfRange {
                        entity: "memory address",
                        value: base + x,
                        max: consts::MEM_SIZE - 1,
                    });
                }
                for reg in 0..=x {
                    let v = self.machine.read_reg(reg)?;
                    self.machine.write_byte(base + reg, v)?;
                }
            }
            Instruction::LoadRegs(x) => {
                let base = self.machine.index as usize;
                if base + x >= consts::MEM_SIZE {
                    return Err(VmError::OutOfRange {
                        entity: "memory address",
                        value: base + x,
                        max: consts::MEM_SIZE - 1,
                    });
                }
                for reg in 0..=x {
                    let v = self.machine.read_byte(base + reg)?;
                    self.machine.write_reg(reg, v)?;
                }
            }
        }
        Ok(StepOutcome::Continue)
    }
}
