use crate::gapi::entry::Entry;
use crate::gapi::errors::Result;
use crate::gapi::instance::Instance;
use crate::gapi::logical_device::LogicalDevice;
use crate::gapi::physical_device::PhysicalDevice;
use crate::gapi::surface::{self, Surface};
use crate::gapi::{queues, validation_layers};
use crate::info_success;
use crate::window::window::EngineWindow;
use log::{debug, info, warn};
use std::fmt;
use vulkanalia::vk::DeviceV1_0;
use vulkanalia::{Device, Instance as VkInstance, vk};

/// Read-only snapshot of the handles the window collaborator needs to create
/// a surface and its present-queue binding. Deliberately narrow: nothing in
/// here allows destroying what the graphics context owns.
pub(crate) struct GraphicsHandles<'a> {
    pub instance: &'a VkInstance,
    pub device: &'a Device,
    pub graphics_queue: vk::Queue,
}

impl fmt::Debug for GraphicsHandles<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphicsHandles")
            .field("instance", &std::ptr::from_ref(self.instance))
            .field("device", &std::ptr::from_ref(self.device))
            .field("graphics_queue", &self.graphics_queue)
            .finish()
    }
}

/// The composition root of the Vulkan bring-up: owns the instance, the
/// selected physical device handle, the logical device and its graphics
/// queue, and, once validated, the window surface.
///
/// Not `Clone`: duplicating a context and dropping the copy would double
/// free the backend resources. Nothing outside this type destroys the
/// handles it owns.
///
/// Construction performs, in order: create instance → select physical
/// device → create logical device. A failure at any step drops whatever was
/// already acquired, in reverse order, so a partial context is never
/// observable.
pub struct Graphics {
    // Field order fixes teardown: surface, then device, then instance
    // (which destroys its messenger before the raw instance handle).
    surface: Option<Surface>,
    present_queue: Option<vk::Queue>,
    device: LogicalDevice,
    physical_device: PhysicalDevice,
    instance: Instance,
    // Kept alive so the loader stays mapped for the instance's lifetime.
    #[allow(dead_code)]
    entry: Entry,
}

impl Graphics {
    pub fn new(window: &EngineWindow) -> Result<Self> {
        info!("Creating Entry...");
        let entry = Entry::new()?;
        info_success!("Entry created! Loader version: {}", entry.version()?);

        let layers = validation_layers();
        info!("Creating instance...");
        let instance = Instance::new(&entry, window, &layers)?;
        info_success!("Instance created!");

        info!("Selecting physical device...");
        let physical_device = PhysicalDevice::pick(&instance)?;
        info_success!("Physical device selected: {}", physical_device.name());

        let indices =
            queues::find_queue_families(instance.get(), *physical_device.get_vk(), None)?;
        info!("Creating logical device...");
        let device = LogicalDevice::new(&instance, &physical_device, &indices, &layers)?;
        info_success!(
            "Logical device created! Graphics queue family: {}",
            device.graphics_family()
        );

        instance.check_diagnostics()?;

        Ok(Self {
            surface: None,
            present_queue: None,
            device,
            physical_device,
            instance,
            entry,
        })
    }

    /// The capability-scoped accessor for the window collaborator.
    pub(crate) fn handles(&self) -> GraphicsHandles<'_> {
        GraphicsHandles {
            instance: self.instance.get(),
            device: self.device.get(),
            graphics_queue: self.device.graphics_queue(),
        }
    }

    /// Validates that the selected device can present to `surface` and, on
    /// success, takes ownership of it so teardown order stays enforced here.
    /// Also resolves the present queue handle for the window's binding.
    ///
    /// # Errors
    /// - [`GraphicsError`](crate::gapi::errors::GraphicsError::UnsupportedSurface)
    ///   if no queue family of the selected device can present to the
    ///   surface. The rejected surface is released before the error
    ///   propagates.
    pub(crate) fn adopt_surface(&mut self, surface: Surface) -> Result<()> {
        let present_family = surface::validate(
            self.instance.get(),
            *self.physical_device.get_vk(),
            &surface,
        )?;
        debug!("Surface is presentable from queue family {present_family}.");

        if self.surface.is_some() {
            warn!("Replacing an already-adopted surface.");
        }
        self.present_queue =
            Some(unsafe { self.device.get().get_device_queue(present_family, 0) });
        self.surface = Some(surface);

        self.instance.check_diagnostics()
    }

    pub(crate) fn present_queue(&self) -> Option<vk::Queue> {
        self.present_queue
    }

    /// Tears the context down. Equivalent to dropping it; exists so the
    /// application shell can be explicit about when the handles go away.
    pub fn destroy(self) {
        info!("Destroying graphics context...");
    }
}
