use ::log::{debug, error};
use std::error::Error;

mod gapi;
mod log;
mod window;

use crate::gapi::graphics::Graphics;
use crate::log::log::init_log;
use anyhow::Result;
use window::window::EngineWindow;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;

fn main() -> Result<()> {
    if let Err(err) = run() {
        error!("Oops! Something went wrong: {}", err);

        let mut source = err.source();
        while let Some(cause) = source {
            error!("Caused by: {}", cause);
            source = cause.source();
        }

        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    init_log()?;

    let event_loop = EventLoop::new()?;
    debug!("Creating window...");
    let window = EngineWindow::new(&event_loop)?;
    info_success!("Window created!");

    debug!("Creating graphics context...");
    let mut graphics = Graphics::new(&window)?;
    info_success!("Graphics context created!");

    debug!("Creating window surface...");
    let surface = window.create_surface(&graphics.handles())?;
    graphics.adopt_surface(surface)?;
    info_success!(
        "Window surface validated! Present queue: {:?}",
        graphics.present_queue()
    );

    let mut graphics = Some(graphics);
    event_loop.run(move |event, elwt| match event {
        Event::AboutToWait => window.get().request_redraw(),
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => {
                elwt.exit();
                if let Some(graphics) = graphics.take() {
                    graphics.destroy();
                }
            }
            _ => {}
        },
        _ => {}
    })?;

    Ok(())
}
