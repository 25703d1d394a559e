use crate::gapi::errors::{GraphicsError, Result};
use std::collections::HashSet;
use vulkanalia::loader::{LIBRARY, LibloadingLoader};
use vulkanalia::vk::EntryV1_0;
use vulkanalia::{Entry as VkEntry, Instance as VkInstance, Version, VkResult, vk};

/// # Vulkan Entry
/// A Vulkan Entry is the entry point for Vulkan.
/// It is the object that dynamically loads the Vulkan API.
///
/// # Details
/// At the point of creating the `Entry`, the ICDs have not been loaded yet
/// (the ICDs are Vulkan front-ends for the GPU driver), so no Vulkan symbols
/// are available either.
///
/// What `Entry` does is find the loader in the system (i.e. `vulkan-1.dll`
/// or `libvulkan.so.1`) and pull the global symbols out of it: the handful
/// of functions needed before an instance exists, such as `vkCreateInstance`
/// and the layer enumeration calls.
pub(crate) struct Entry {
    entry: VkEntry,
}

impl Entry {
    /// Finds the platform's Vulkan loader and dispatches its global symbols.
    ///
    /// # Errors
    /// - [`GraphicsError::Loader`] if the loader library is not found, or if
    ///   the global symbols cannot be resolved from it.
    pub fn new() -> Result<Self> {
        // Finds the dynamic library (e.g. `.so` or `.dll`)
        let loader = unsafe { LibloadingLoader::new(LIBRARY) }
            .map_err(|e| GraphicsError::Loader(format!("{LIBRARY}: {e}")))?;
        // Dynamically dispatches the Vulkan functions
        let entry =
            unsafe { VkEntry::new(loader) }.map_err(|e| GraphicsError::Loader(e.to_string()))?;
        Ok(Self { entry })
    }

    /// Creates the raw Vulkan instance from a fully-assembled create info.
    /// Called by [`Instance::new`](crate::gapi::instance::Instance::new),
    /// which owns the configuration (layers, extensions, debug chain).
    pub fn create_instance(
        &self,
        info: &vk::InstanceCreateInfo,
        allocation_callbacks: Option<&vk::AllocationCallbacks>,
    ) -> VkResult<VkInstance> {
        unsafe { self.entry.create_instance(info, allocation_callbacks) }
    }

    /// The (maximum) Vulkan version the loader supports.
    ///
    /// > Note: the ICDs could support a different version. If they support a
    /// > lower one, instance creation fails with an incompatible-driver error.
    pub fn version(&self) -> Result<Version> {
        Ok(self.entry.version()?)
    }

    /// Queries the global layers the loader knows about, so requested layers
    /// can be rejected up front instead of failing inside `vkCreateInstance`.
    pub fn available_layers(&self) -> Result<HashSet<vk::ExtensionName>> {
        let available = unsafe { self.entry.enumerate_instance_layer_properties() }?
            .iter()
            .map(|l| l.layer_name)
            .collect::<HashSet<_>>();
        Ok(available)
    }
}
