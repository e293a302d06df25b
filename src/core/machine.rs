use std::cell::RefCell;
use std::rc::Rc;

use log::info;

use crate::consts;
use crate::core::rom::Rom;
use crate::error::VmError;

/// Monochrome 64x32 cell grid. Cells are 0 or 1; the display driver owns
/// turning them into pixels.
#[derive(Debug)]
pub struct FrameBuffer {
    pub cells: [[u8; consts::FRAME_WIDTH]; consts::FRAME_HEIGHT],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        FrameBuffer {
            cells: [[0; consts::FRAME_WIDTH]; consts::FRAME_HEIGHT],
        }
    }
}

/// Snapshot of the hex keypad plus a one-step latch that records whether any
/// key transitioned to pressed since the engine last looked.
#[derive(Default, Debug)]
pub struct Keypad {
    pub keys: [bool; consts::KEY_COUNT],
    pub pressed: bool,
}

impl Keypad {
    pub fn press(&mut self, key: usize) {
        if key < consts::KEY_COUNT {
            self.keys[key] = true;
            self.pressed = true;
        }
    }

    pub fn release(&mut self, key: usize) {
        if key < consts::KEY_COUNT {
            self.keys[key] = false;
        }
    }
}

/// The whole mutable machine state. Memory, registers and the call stack sit
/// behind bounded accessors; every accessor validates its operand before
/// touching anything, so a rejected access leaves the state exactly as it
/// was. The framebuffer and keypad are shared with the external drivers.
#[derive(Debug)]
pub struct Machine {
    memory: [u8; consts::MEM_SIZE],
    registers: [u8; consts::REG_COUNT],
    stack: [u16; consts::STACK_DEPTH],
    sp: u8,
    pub index: u16,
    pub pc: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub frame: Rc<RefCell<FrameBuffer>>,
    pub keypad: Rc<RefCell<Keypad>>,
    repaint: bool,
}

impl Machine {
    pub fn new(frame: Rc<RefCell<FrameBuffer>>, keypad: Rc<RefCell<Keypad>>) -> Self {
        let mut memory = [0; consts::MEM_SIZE];
        memory[..consts::FONT_SET_SIZE].copy_from_slice(&consts::FONT_SET);
        Machine {
            memory,
            registers: [0; consts::REG_COUNT],
            stack: [0; consts::STACK_DEPTH],
            sp: 0,
            index: 0,
            pc: consts::LOAD_ADDR,
            delay_timer: 0,
            sound_timer: 0,
            frame,
            keypad,
            repaint: false,
        }
    }

    /// Copies a ROM image into memory at the load address.
    pub fn load_rom(&mut self, rom: &Rom) -> Result<(), VmError> {
        let size = rom.bytes.len();
        if size > consts::PROGRAM_CAPACITY {
            return Err(VmError::LoadTooLarge {
                size,
                capacity: consts::PROGRAM_CAPACITY,
            });
        }
        let start = consts::LOAD_ADDR as usize;
        self.memory[start..start + size].copy_from_slice(&rom.bytes);
        info!("loaded {} byte ROM at {:#05X}", size, consts::LOAD_ADDR);
        Ok(())
    }

    pub fn read_byte(&self, addr: usize) -> Result<u8, VmError> {
        if addr >= consts::MEM_SIZE {
            return Err(VmError::OutOfRange {
                entity: "memory address",
                value: addr,
                max: consts::MEM_SIZE - 1,
            });
        }
        Ok(self.memory[addr])
    }

    pub fn write_byte(&mut self, addr: usize, value: u8) -> Result<(), VmError> {
        if addr >= consts::MEM_SIZE {
            return Err(VmError::OutOfRange {
                entity: "memory address",
                value: addr,
                max: consts::MEM_SIZE - 1,
            });
        }
        self.memory[addr] = value;
        Ok(())
    }

    pub fn read_reg(&self, reg: usize) -> Result<u8, VmError> {
        if reg >= consts::REG_COUNT {
            return Err(VmError::OutOfRange {
                entity: "register index",
                value: reg,
                max: consts::REG_COUNT - 1,
            });
        }
        Ok(self.registers[reg])
    }

    pub fn write_reg(&mut self, reg: usize, value: u8) -> Result<(), VmError> {
        if reg >= consts::REG_COUNT {
            return Err(VmError::OutOfRange {
                entity: "register index",
                value: reg,
                max: consts::REG_COUNT - 1,
            });
        }
        self.registers[reg] = value;
        Ok(())
    }

    pub fn push(&mut self, addr: u16) -> Result<(), VmError> {
        if self.sp as usize >= consts::STACK_DEPTH {
            return Err(VmError::OutOfRange {
                entity: "stack depth",
                value: self.sp as usize,
                max: consts::STACK_DEPTH - 1,
            });
        }
        self.stack[self.sp as usize] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, VmError> {
        if self.sp == 0 {
            return Err(VmError::OutOfRange {
                entity: "stack depth",
                value: 0,
                max: consts::STACK_DEPTH - 1,
            });
        }
        self.sp -= 1;
        Ok(self.stack[self.sp as usize])
    }

    pub fn stack_depth(&self) -> usize {
        self.sp as usize
    }

    /// XORs the cell at (x, y) and reports whether it was set beforehand,
    /// i.e. whether this toggle turned a lit cell off.
    pub fn toggle_pixel(&mut self, x: usize, y: usize) -> Result<bool, VmError> {
        if x >= consts::FRAME_WIDTH {
            return Err(VmError::OutOfRange {
                entity: "framebuffer column",
                value: x,
                max: consts::FRAME_WIDTH - 1,
            });
        }
        if y >= consts::FRAME_HEIGHT {
            return Err(VmError::OutOfRange {
                entity: "framebuffer row",
                value: y,
                max: consts::FRAME_HEIGHT - 1,
            });
        }
        let mut frame = self.frame.borrow_mut();
        let was_set = frame.cells[y][x] == 1;
        frame.cells[y][x] ^= 1;
        Ok(was_set)
    }

    pub fn clear_frame(&mut self) {
        self.frame
            .borrow_mut()
            .cells
            .iter_mut()
            .for_each(|row| *row = [0; consts::FRAME_WIDTH]);
    }

    pub fn mark_repaint(&mut self) {
        self.repaint = true;
    }

    pub fn repaint_pending(&self) -> bool {
        self.repaint
    }

    pub fn clear_repaint(&mut self) {
        self.repaint = false;
    }

    pub fn key_down(&self, key: usize) -> Result<bool, VmError> {
        if key >= consts::KEY_COUNT {
            return Err(VmError::OutOfRange {
                entity: "keypad index",
                value: key,
                max: consts::KEY_COUNT - 1,
            });
        }
        Ok(self.keypad.borrow().keys[key])
    }

    pub fn key_latched(&self) -> bool {
        self.keypad.borrow().pressed
    }

    pub fn clear_key_latch(&mut self) {
        self.keypad.borrow_mut().pressed = false;
    }

    /// Lowest-indexed key currently held down, if any.
    pub fn first_key_down(&self) -> Option<u8> {
        let keypad = self.keypad.borrow();
        (0..consts::KEY_COUNT)
            .find(|&k| keypad.keys[k])
            .map(|k| k as u8)
    }

    /// One timer tick: both timers count down independently and stop at 0.
    pub fn tick_timers(&mut self) {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }
        if self.sound_timer > 0 {
            self.sound_timer -= 1;
        }
    }
}
