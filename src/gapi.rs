use vulkanalia::vk;

pub mod debug;
pub mod entry;
pub mod errors;
pub mod graphics;
pub mod instance;
pub mod logical_device;
pub mod physical_device;
pub mod queues;
pub mod surface;

/// Whether validation layers and the debug messenger are compiled in at all.
pub(crate) const VALIDATION_ENABLED: bool = cfg!(feature = "validation");
pub(crate) const API_DUMP_ENABLED: bool = cfg!(feature = "api_dump");

pub(crate) const VALIDATION_LAYER: vk::ExtensionName =
    vk::ExtensionName::from_bytes(b"VK_LAYER_KHRONOS_validation");
pub(crate) const API_DUMP_LAYER: vk::ExtensionName =
    vk::ExtensionName::from_bytes(b"VK_LAYER_LUNARG_api_dump");

/// The layer set requested for both the instance and the logical device.
/// Empty unless the matching features are compiled in.
pub(crate) fn validation_layers() -> Vec<vk::ExtensionName> {
    let mut layers = Vec::new();
    if VALIDATION_ENABLED {
        layers.push(VALIDATION_LAYER);
    }
    if API_DUMP_ENABLED {
        layers.push(API_DUMP_LAYER);
    }
    layers
}
