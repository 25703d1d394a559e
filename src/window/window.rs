use crate::gapi::errors::Result;
use crate::gapi::graphics::GraphicsHandles;
use crate::gapi::surface::Surface;
use anyhow::Context;
use log::trace;
use vulkanalia::vk::ExtensionName;
use vulkanalia::window as vk_window;
use winit::dpi::LogicalSize;
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

const DEFAULT_TITLE: &str = "RaveEngine";
const DEFAULT_WIDTH: u32 = 800;
const DEFAULT_HEIGHT: u32 = 600;

/// The windowing collaborator. The graphics core never talks to winit
/// directly: it asks this type for the platform's required instance
/// extensions, and this type asks the core's handle snapshot for a surface.
pub struct EngineWindow {
    winit_window: Window,
}

impl EngineWindow {
    pub fn new(event_loop: &EventLoop<()>) -> anyhow::Result<Self> {
        let winit_window = WindowBuilder::new()
            .with_title(DEFAULT_TITLE)
            .with_inner_size(LogicalSize::new(DEFAULT_WIDTH, DEFAULT_HEIGHT))
            .build(event_loop)
            .context("Failed to create the window")?;
        Ok(Self { winit_window })
    }

    pub fn get(&self) -> &Window {
        &self.winit_window
    }

    /// The instance extensions this platform's window system requires.
    pub fn required_extensions(&self) -> &'static [&'static ExtensionName] {
        vk_window::get_required_instance_extensions(&self.winit_window)
    }

    /// Creates a presentable surface for this window against the instance
    /// handle exposed by the graphics context.
    pub(crate) fn create_surface(&self, gfx: &GraphicsHandles) -> Result<Surface> {
        trace!("Creating surface against {gfx:?}.");
        Surface::new(gfx.instance, self)
    }
}
