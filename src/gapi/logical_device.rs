use crate::gapi::errors::{GraphicsError, Result};
use crate::gapi::instance::Instance;
use crate::gapi::physical_device::PhysicalDevice;
use crate::gapi::queues::QueueFamilyIndices;
use log::debug;
use vulkanalia::vk::{DeviceV1_0, HasBuilder, InstanceV1_0};
use vulkanalia::{Device, vk};

/// Wraps the Vulkan logical device and the graphics queue handle it was
/// given at creation.
///
/// Dropped strictly before the [`Instance`] that created it; the graphics
/// context guarantees that ordering by construction.
pub(crate) struct LogicalDevice {
    device: Device,
    graphics_queue: vk::Queue,
    graphics_family: u32,
}

impl LogicalDevice {
    /// Creates the logical device with exactly one queue (priority 1.0) on
    /// the resolved graphics family, zero device-level extensions, and the
    /// same validation-layer set as the instance, for parity with the debug
    /// tooling.
    ///
    /// A missing graphics family is a broken caller contract (the selector
    /// only ever returns devices with one), not a runtime condition.
    ///
    /// # Errors
    /// - [`GraphicsError::DeviceCreation`] if the backend rejects device
    ///   creation.
    pub fn new(
        instance: &Instance,
        physical_device: &PhysicalDevice,
        indices: &QueueFamilyIndices,
        layers: &[vk::ExtensionName],
    ) -> Result<Self> {
        let graphics_family = indices
            .graphics()
            .expect("device selection guarantees a graphics queue family");

        let queue_priorities = [1.0f32];
        let queue_infos = [vk::DeviceQueueCreateInfo::builder()
            .queue_family_index(graphics_family)
            .queue_priorities(&queue_priorities)];

        let layer_names = layers.iter().map(|l| l.as_ptr()).collect::<Vec<_>>();
        // Geometry shader support was a hard selection requirement, so ask
        // for the feature on the device as well.
        let features = vk::PhysicalDeviceFeatures::builder().geometry_shader(true);

        let info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_infos)
            .enabled_layer_names(&layer_names)
            .enabled_features(&features);

        debug!("Creating logical device on queue family {graphics_family}...");
        let device = unsafe {
            instance
                .get()
                .create_device(*physical_device.get_vk(), &info, None)
        }
        .map_err(GraphicsError::DeviceCreation)?;

        let graphics_queue = unsafe { device.get_device_queue(graphics_family, 0) };

        Ok(Self {
            device,
            graphics_queue,
            graphics_family,
        })
    }

    pub fn get(&self) -> &Device {
        &self.device
    }

    pub fn graphics_queue(&self) -> vk::Queue {
        self.graphics_queue
    }

    pub fn graphics_family(&self) -> u32 {
        self.graphics_family
    }
}

impl Drop for LogicalDevice {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_device(None);
        }
    }
}
