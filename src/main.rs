use std::cell::RefCell;
use std::env;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use log::{error, info};

use chipvm::consts;
use chipvm::core::cpu::Cpu;
use chipvm::core::machine::{FrameBuffer, Keypad, Machine};
use chipvm::core::rom::Rom;
use chipvm::external::input::KeyboardDriver;
use chipvm::external::output::DisplayDriver;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        Err("Need to specify rom path")?;
    }
    let rom = Rom::from_file(&args[1])?;

    let sdl = sdl2::init()?;
    let frame = Rc::new(RefCell::new(FrameBuffer::default()));
    let keypad = Rc::new(RefCell::new(Keypad::default()));
    let mut display = DisplayDriver::new(&sdl, &frame)?;
    let mut input = KeyboardDriver::new(&sdl, &keypad)?;

    let mut machine = Machine::new(Rc::clone(&frame), Rc::clone(&keypad));
    machine.load_rom(&rom)?;
    let mut cpu = Cpu::new(machine);

    let step_period = Duration::from_secs(1) / consts::STEP_HZ;
    let tick_period = Duration::from_secs(1) / consts::TICK_HZ;
    let mut last_step = Instant::now();
    let mut last_tick = last_step;

    info!(
        "running at {} instruction Hz, {} timer Hz",
        consts::STEP_HZ,
        consts::TICK_HZ
    );
    while input.poll() {
        let now = Instant::now();

        if now.duration_since(last_step) >= step_period {
            last_step = now;
            if let Err(err) = cpu.step() {
                error!("fatal fault: {err}");
                return Err(err.into());
            }
            if cpu.machine.repaint_pending() {
                display.draw()?;
                cpu.machine.clear_repaint();
            }
        }

        if now.duration_since(last_tick) >= tick_period {
            last_tick = now;
            cpu.tick_timers();
        }

        thread::sleep(Duration::from_millis(1));
    }

    Ok(())
}
