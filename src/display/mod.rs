mod font;
mod pixel_buffer;

pub use font::{draw_text, draw_text_centered_scaled, draw_text_scaled};
pub use pixel_buffer::{BlendMode, PixelBuffer};

use sdl2::event::Event;
use sdl2::keyboard::Scancode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

use crate::error::GameError;

pub struct Display {
    canvas: Canvas<Window>,
    event_pump: EventPump,
}

pub struct RenderTarget<'a> {
    texture: Texture<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Scancode),
}

impl Display {
    /// Create the window. The framebuffer is `width` x `height`; the window
    /// is `scale` times larger and SDL stretches the texture to fit.
    pub fn with_options(
        title: &str,
        width: u32,
        height: u32,
        scale: u32,
        vsync: bool,
    ) -> Result<(Self, TextureCreator<WindowContext>), GameError> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let scale = scale.max(1);
        let window = video_subsystem
            .window(title, width * scale, height * scale)
            .position_centered()
            .build()
            .map_err(|e| GameError::Display(e.to_string()))?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let mut canvas = canvas_builder
            .build()
            .map_err(|e| GameError::Display(e.to_string()))?;
        canvas
            .set_logical_size(width, height)
            .map_err(|e| GameError::Display(e.to_string()))?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump()?;

        Ok((
            Self { canvas, event_pump },
            texture_creator,
        ))
    }

    pub fn present(&mut self, target: &mut RenderTarget, buffer: &PixelBuffer) -> Result<(), GameError> {
        target
            .texture
            .update(None, buffer.as_bytes(), (buffer.width() * 4) as usize)
            .map_err(|e| GameError::Display(e.to_string()))?;

        self.canvas.copy(&target.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    scancode: Some(code),
                    repeat: false,
                    ..
                } => events.push(InputEvent::KeyDown(code)),
                _ => {},
            }
        }

        events
    }

    /// Level-triggered key state as of the last `poll_events`
    pub fn is_key_down(&self, key: Scancode) -> bool {
        self.event_pump.keyboard_state().is_scancode_pressed(key)
    }
}

impl<'a> RenderTarget<'a> {
    pub fn with_size(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self, GameError> {
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, width, height)
            .map_err(|e| GameError::Display(e.to_string()))?;
        Ok(Self { texture })
    }
}

/// Resolve an SDL scancode name from the config ("Return", "Space", ...)
pub fn resolve_key(name: &str) -> Result<Scancode, GameError> {
    Scancode::from_name(name).ok_or_else(|| GameError::UnknownKey(name.to_string()))
}
