//! SDL2 window presenter.
//!
//! Plugs into [`FrontBufferSink`](crate::display::FrontBufferSink): the
//! window is created on the presentation thread, each frame is uploaded to
//! an ARGB8888 streaming texture and events are pumped between frames.

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;
use tracing::debug;

use crate::display::Presenter;
use crate::error::DisplayError;

pub struct SdlPresenter {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    // Field order matters: the texture borrows from the creator and must drop first.
    texture: sdl2::render::Texture<'static>,
    _texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    event_pump: sdl2::EventPump,
    width: u32,
    height: u32,
}

impl SdlPresenter {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, DisplayError> {
        let sdl_context = sdl2::init().map_err(DisplayError::Init)?;
        let video_subsystem = sdl_context.video().map_err(DisplayError::Init)?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| DisplayError::Init(e.to_string()))?;

        let canvas = window
            .into_canvas()
            .build()
            .map_err(|e| DisplayError::Init(e.to_string()))?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump().map_err(DisplayError::Init)?;

        // SAFETY: texture_creator is heap-allocated and owned by the presenter.
        // The texture is declared before it, so it is dropped first.
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| DisplayError::Init(e.to_string()))?;

        debug!(title, width, height, "sdl window created");

        Ok(Self {
            canvas,
            texture,
            _texture_creator: texture_creator,
            event_pump,
            width,
            height,
        })
    }

    /// Drain pending events. Returns `false` on quit or escape.
    fn pump_events(&mut self) -> bool {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return false,
                _ => {}
            }
        }
        true
    }
}

impl Presenter for SdlPresenter {
    fn present(&mut self, pixels: &[u32]) -> Result<bool, DisplayError> {
        self.texture
            .update(None, bytemuck::cast_slice(pixels), (self.width * 4) as usize)
            .map_err(|e| DisplayError::Present(e.to_string()))?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, Some(Rect::new(0, 0, self.width, self.height)))
            .map_err(DisplayError::Present)?;
        self.canvas.present();

        Ok(self.pump_events())
    }

    fn poll(&mut self) -> bool {
        self.pump_events()
    }
}
