use crate::gapi::errors::Result;
use crate::gapi::surface::Surface;
use vulkanalia::Instance as VkInstance;
use vulkanalia::vk;
use vulkanalia::vk::{InstanceV1_0, KhrSurfaceExtension};

/// What a single queue family can do, as far as this engine cares.
/// `present` is only meaningful when the scan was given a surface.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FamilySupport {
    pub graphics: bool,
    pub present: bool,
}

/// Stores indices (numbers that point to the queue family)
/// of the queue families that the engine will use.
///
/// # Notes
/// * The graphics queue family and the presentation queue family are stored
///   separately, but it is very likely that they will be the same index.
/// * "Complete" only requires a graphics family: a present family matters
///   once a surface exists and is enforced at surface validation, not here.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct QueueFamilyIndices {
    graphics: Option<u32>,
    present: Option<u32>,
}

impl QueueFamilyIndices {
    pub fn graphics(&self) -> Option<u32> {
        self.graphics
    }

    pub fn present(&self) -> Option<u32> {
        self.present
    }

    pub fn is_complete(&self) -> bool {
        self.graphics.is_some()
    }
}

/// Scans families in ascending index order, recording the first
/// graphics-capable family and (when asked for) the first present-capable
/// family independently. Stops as soon as everything requested is found.
///
/// There is no failure mode here: an all-unset result is a valid return
/// value, and callers decide whether that is fatal.
pub(crate) fn scan(families: &[FamilySupport], wants_present: bool) -> QueueFamilyIndices {
    let mut indices = QueueFamilyIndices::default();
    for (index, family) in families.iter().enumerate() {
        if family.graphics && indices.graphics.is_none() {
            indices.graphics = Some(index as u32);
        }
        if wants_present && family.present && indices.present.is_none() {
            indices.present = Some(index as u32);
        }
        if indices.graphics.is_some() && (!wants_present || indices.present.is_some()) {
            break;
        }
    }
    indices
}

/// Collects per-family capability flags from the backend. Present support is
/// queried per family against the supplied surface; without a surface no
/// present query is made at all.
pub(crate) fn family_support(
    instance: &VkInstance,
    device: vk::PhysicalDevice,
    surface: Option<&Surface>,
) -> Result<Vec<FamilySupport>> {
    let properties = unsafe { instance.get_physical_device_queue_family_properties(device) };
    let mut families = Vec::with_capacity(properties.len());
    for (index, family) in properties.iter().enumerate() {
        let present = match surface {
            Some(surface) => unsafe {
                instance.get_physical_device_surface_support_khr(
                    device,
                    index as u32,
                    surface.get(),
                )?
            },
            None => false,
        };
        families.push(FamilySupport {
            graphics: family.queue_flags.contains(vk::QueueFlags::GRAPHICS),
            present,
        });
    }
    Ok(families)
}

/// Finds the queue family indices of `device` that satisfy the engine's
/// capabilities, considering presentation only when a surface is supplied.
pub(crate) fn find_queue_families(
    instance: &VkInstance,
    device: vk::PhysicalDevice,
    surface: Option<&Surface>,
) -> Result<QueueFamilyIndices> {
    Ok(scan(&family_support(instance, device, surface)?, surface.is_some()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(graphics: bool, present: bool) -> FamilySupport {
        FamilySupport { graphics, present }
    }

    #[test]
    fn records_first_graphics_and_present_independently() {
        // transfer-only, graphics-only, present-only: the surface is only
        // presentable from family 2.
        let families = [family(false, false), family(true, false), family(false, true)];
        let indices = scan(&families, true);
        assert_eq!(indices.graphics(), Some(1));
        assert_eq!(indices.present(), Some(2));
        assert!(indices.is_complete());
    }

    #[test]
    fn stops_at_first_combined_family() {
        let families = [family(true, true), family(true, true)];
        let indices = scan(&families, true);
        assert_eq!(indices.graphics(), Some(0));
        assert_eq!(indices.present(), Some(0));
    }

    #[test]
    fn without_surface_present_stays_unset() {
        let families = [family(false, false), family(true, false)];
        let indices = scan(&families, false);
        assert_eq!(indices.graphics(), Some(1));
        assert_eq!(indices.present(), None);
        assert!(indices.is_complete());
    }

    #[test]
    fn all_unset_is_a_valid_result() {
        let families = [family(false, false), family(false, false)];
        let indices = scan(&families, true);
        assert_eq!(indices.graphics(), None);
        assert_eq!(indices.present(), None);
        assert!(!indices.is_complete());
    }

    #[test]
    fn empty_family_list_is_incomplete() {
        assert!(!scan(&[], false).is_complete());
    }
}
