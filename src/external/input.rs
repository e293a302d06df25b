use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use crate::core::machine::Keypad;
use std::cell::RefCell;
use std::rc::Rc;

/// Conventional 4x4 keypad layout on the left of a QWERTY keyboard:
/// 1234 / QWER / ASDF / ZXCV.
fn keypad_index(key: Keycode) -> Option<usize> {
    match key {
        Keycode::Num1 => Some(0x1),
        Keycode::Num2 => Some(0x2),
        Keycode::Num3 => Some(0x3),
        Keycode::Num4 => Some(0xC),
        Keycode::Q => Some(0x4),
        Keycode::W => Some(0x5),
        Keycode::E => Some(0x6),
        Keycode::R => Some(0xD),
        Keycode::A => Some(0x7),
        Keycode::S => Some(0x8),
        Keycode::D => Some(0x9),
        Keycode::F => Some(0xE),
        Keycode::Z => Some(0xA),
        Keycode::X => Some(0x0),
        Keycode::C => Some(0xB),
        Keycode::V => Some(0xF),
        _ => None,
    }
}

pub struct KeyboardDriver {
    events: sdl2::EventPump,
    pub keypad: Rc<RefCell<Keypad>>,
}

impl KeyboardDriver {
    pub fn new(context: &sdl2::Sdl, keypad: &Rc<RefCell<Keypad>>) -> Result<Self, String> {
        Ok(KeyboardDriver {
            events: context.event_pump()?,
            keypad: Rc::clone(keypad),
        })
    }

    /// Drains pending events into the shared keypad snapshot. Key-down
    /// transitions set the press latch; key repeat is ignored. Returns false
    /// once the user asked to quit.
    pub fn poll(&mut self) -> bool {
        for event in self.events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return false,
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => {
                    if let Some(i) = keypad_index(key) {
                        self.keypad.borrow_mut().press(i);
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(i) = keypad_index(key) {
                        self.keypad.borrow_mut().release(i);
                    }
                }
                _ => continue,
            }
        }
        true
    }
}
