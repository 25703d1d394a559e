use crate::gapi::errors::{GraphicsError, Result};
use crate::gapi::queues;
use crate::window::window::EngineWindow;
use vulkanalia::Instance as VkInstance;
use vulkanalia::vk;
use vulkanalia::vk::KhrSurfaceExtension;
use vulkanalia::window as vk_window;

/// Abstract type of surface to present rendered images to, backed by the
/// window already opened with winit.
///
/// Although the `vk::SurfaceKHR` object and its usage is platform-agnostic,
/// its creation isn't, because it depends on window system details. The
/// vulkanalia crate handles the platform differences for us.
///
/// The surface must be destroyed before the instance that created it; it
/// carries its owning instance handle so dropping it is always safe on its
/// own, and the graphics context keeps it ahead of the device and instance
/// in teardown order once adopted.
pub(crate) struct Surface {
    vk_surface: vk::SurfaceKHR,
    instance: VkInstance,
}

impl Surface {
    /// Creates a surface for `window` against the given instance handle.
    pub(crate) fn new(instance: &VkInstance, window: &EngineWindow) -> Result<Self> {
        let vk_surface =
            unsafe { vk_window::create_surface(instance, window.get(), window.get()) }
                .map_err(GraphicsError::SurfaceCreation)?;
        Ok(Self {
            vk_surface,
            instance: instance.clone(),
        })
    }

    pub fn get(&self) -> vk::SurfaceKHR {
        self.vk_surface
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        unsafe {
            self.instance.destroy_surface_khr(self.vk_surface, None);
        }
    }
}

/// Confirms that `device` can present to `surface` by re-running the queue
/// family scan with the surface supplied, and returns the present-capable
/// family index.
///
/// Device creation is surface-agnostic, so this check has to happen
/// explicitly once the window surface exists, even though the logical device
/// was already created successfully.
///
/// # Errors
/// - [`GraphicsError::UnsupportedSurface`] if no family of `device` can
///   present to `surface`.
pub(crate) fn validate(
    instance: &VkInstance,
    device: vk::PhysicalDevice,
    surface: &Surface,
) -> Result<u32> {
    let indices = queues::find_queue_families(instance, device, Some(surface))?;
    present_family(&indices)
}

fn present_family(indices: &queues::QueueFamilyIndices) -> Result<u32> {
    indices.present().ok_or(GraphicsError::UnsupportedSurface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gapi::queues::FamilySupport;

    #[test]
    fn missing_present_family_is_unsupported() {
        // A graphics-complete device can still fail surface validation:
        // device creation never looked at presentation.
        let families = [FamilySupport { graphics: true, present: false }];
        let indices = queues::scan(&families, true);
        assert!(indices.is_complete());
        assert!(matches!(
            present_family(&indices),
            Err(GraphicsError::UnsupportedSurface)
        ));
    }

    #[test]
    fn present_family_index_is_returned() {
        let families = [
            FamilySupport { graphics: true, present: false },
            FamilySupport { graphics: false, present: true },
        ];
        let indices = queues::scan(&families, true);
        assert_eq!(present_family(&indices).unwrap(), 1);
    }
}
