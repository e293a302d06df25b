use crate::consts;
use crate::core::machine::FrameBuffer;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;
use std::cell::RefCell;
use std::rc::Rc;

const OFF_COLOR: Color = Color::RGB(0, 0, 0);
const ON_COLOR: Color = Color::RGB(0, 255, 0);

pub struct DisplayDriver {
    screen: Canvas<Window>,
    pub frame: Rc<RefCell<FrameBuffer>>,
}

impl DisplayDriver {
    pub fn new(context: &sdl2::Sdl, frame: &Rc<RefCell<FrameBuffer>>) -> Result<Self, String> {
        let video = context.video()?;
        let window = video
            .window(
                "chipvm",
                consts::FRAME_WIDTH as u32 * consts::DISPLAY_SCALE,
                consts::FRAME_HEIGHT as u32 * consts::DISPLAY_SCALE,
            )
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;
        let mut canvas = window
            .into_canvas()
            .present_vsync()
            .build()
            .map_err(|e| e.to_string())?;

        canvas.set_draw_color(OFF_COLOR);
        canvas.clear();
        canvas.present();

        Ok(DisplayDriver {
            screen: canvas,
            frame: Rc::clone(frame),
        })
    }

    /// Rasterizes the cell grid: one scaled rectangle per cell.
    pub fn draw(&mut self) -> Result<(), String> {
        self.screen.set_draw_color(OFF_COLOR);
        self.screen.clear();
        self.screen.set_draw_color(ON_COLOR);
        for (y, row) in self.frame.borrow().cells.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                if cell == 0 {
                    continue;
                }
                self.screen.fill_rect(Rect::new(
                    (x as u32 * consts::DISPLAY_SCALE) as i32,
                    (y as u32 * consts::DISPLAY_SCALE) as i32,
                    consts::DISPLAY_SCALE,
                    consts::DISPLAY_SCALE,
                ))?;
            }
        }
        self.screen.present();
        Ok(())
    }
}
