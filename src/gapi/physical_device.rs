use crate::gapi::errors::{GraphicsError, Result};
use crate::gapi::instance::Instance;
use crate::gapi::queues::{self, FamilySupport};
use log::{debug, info};
use vulkanalia::Instance as VkInstance;
use vulkanalia::vk;
use vulkanalia::vk::InstanceV1_0;

/// Everything device selection looks at, pulled out of the backend up front
/// so scoring and selection stay plain data transforms.
#[derive(Clone, Debug)]
pub(crate) struct DeviceProfile {
    pub name: String,
    pub device_type: vk::PhysicalDeviceType,
    pub max_image_dimension_2d: u32,
    pub geometry_shader: bool,
    pub families: Vec<FamilySupport>,
}

impl DeviceProfile {
    fn query(instance: &VkInstance, device: vk::PhysicalDevice) -> Result<Self> {
        let properties = unsafe { instance.get_physical_device_properties(device) };
        let features = unsafe { instance.get_physical_device_features(device) };
        let families = queues::family_support(instance, device, None)?;
        Ok(Self {
            name: properties.device_name.to_string(),
            device_type: properties.device_type,
            max_image_dimension_2d: properties.limits.max_image_dimension_2d,
            geometry_shader: features.geometry_shader == vk::TRUE,
            families,
        })
    }
}

/// A non-owned handle to the winning device. Only valid while the
/// [`Instance`] that enumerated it is alive.
#[derive(Clone, Debug)]
pub(crate) struct PhysicalDevice {
    vk_physical_device: vk::PhysicalDevice,
    name: String,
}

impl PhysicalDevice {
    /// Enumerates all devices visible to the instance, scores them and picks
    /// the best match meeting the hard requirements.
    ///
    /// # Errors
    /// - [`GraphicsError::NoGpuFound`] if zero devices are enumerable.
    /// - [`GraphicsError::NoSuitableDevice`] if no device passes the hard
    ///   requirements with a non-zero score.
    pub(in crate::gapi) fn pick(instance: &Instance) -> Result<Self> {
        let devices = unsafe { instance.get().enumerate_physical_devices() }?;
        let mut profiles = Vec::with_capacity(devices.len());
        for &device in &devices {
            profiles.push(DeviceProfile::query(instance.get(), device)?);
        }
        debug!(
            "Picking physical device between available devices: {:?}.",
            profiles.iter().map(|p| p.name.as_str()).collect::<Vec<_>>()
        );

        let winner = select_best(&profiles)?;
        info!("Selected physical device (`{}`).", profiles[winner].name);
        Ok(Self {
            vk_physical_device: devices[winner],
            name: profiles[winner].name.clone(),
        })
    }

    pub(in crate::gapi) fn get_vk(&self) -> &vk::PhysicalDevice {
        &self.vk_physical_device
    }

    pub(in crate::gapi) fn name(&self) -> &str {
        &self.name
    }
}

/// Score of a device that passed the hard requirements.
/// Discrete GPUs have a significant performance advantage; beyond that, the
/// maximum possible size of textures affects graphics quality.
pub(crate) fn score_device(profile: &DeviceProfile) -> u32 {
    let mut score = 0;
    if profile.device_type == vk::PhysicalDeviceType::DISCRETE_GPU {
        score += 1000;
    }
    score + profile.max_image_dimension_2d
}

/// Picks the index of the best candidate. Devices missing the
/// geometry-shader feature or a graphics-capable queue family are skipped
/// outright. Among the rest, a later device that ties the running maximum
/// replaces it, so ties favor the last enumerated device. A zero score is
/// never accepted, even as the only candidate.
pub(crate) fn select_best(profiles: &[DeviceProfile]) -> Result<usize> {
    if profiles.is_empty() {
        return Err(GraphicsError::NoGpuFound);
    }

    let mut best = None;
    let mut max = 0u32;
    for (index, profile) in profiles.iter().enumerate() {
        if !profile.geometry_shader {
            debug!("Skipping physical device (`{}`): no geometry shader support.", profile.name);
            continue;
        }
        if !queues::scan(&profile.families, false).is_complete() {
            debug!("Skipping physical device (`{}`): no graphics queue family.", profile.name);
            continue;
        }

        let score = score_device(profile);
        if score > 0 && score >= max {
            best = Some(index);
            max = score;
        }
    }

    best.ok_or(GraphicsError::NoSuitableDevice)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graphics_family() -> Vec<FamilySupport> {
        vec![FamilySupport { graphics: true, present: false }]
    }

    fn profile(name: &str, device_type: vk::PhysicalDeviceType, max_dim: u32) -> DeviceProfile {
        DeviceProfile {
            name: name.into(),
            device_type,
            max_image_dimension_2d: max_dim,
            geometry_shader: true,
            families: graphics_family(),
        }
    }

    #[test]
    fn discrete_gpu_scores_exactly_1000_higher() {
        let discrete = profile("discrete", vk::PhysicalDeviceType::DISCRETE_GPU, 4096);
        let integrated = profile("integrated", vk::PhysicalDeviceType::INTEGRATED_GPU, 4096);
        assert_eq!(score_device(&discrete), score_device(&integrated) + 1000);
    }

    #[test]
    fn discrete_gpu_beats_integrated() {
        let profiles = vec![
            profile("discrete", vk::PhysicalDeviceType::DISCRETE_GPU, 4096),
            profile("integrated", vk::PhysicalDeviceType::INTEGRATED_GPU, 4096),
        ];
        assert_eq!(select_best(&profiles).unwrap(), 0);
    }

    #[test]
    fn tie_goes_to_the_last_enumerated_device() {
        let profiles = vec![
            profile("first", vk::PhysicalDeviceType::DISCRETE_GPU, 4096),
            profile("second", vk::PhysicalDeviceType::DISCRETE_GPU, 4096),
            profile("third", vk::PhysicalDeviceType::DISCRETE_GPU, 4096),
        ];
        assert_eq!(select_best(&profiles).unwrap(), 2);
    }

    #[test]
    fn missing_geometry_shader_is_never_selected() {
        let mut strong = profile("strong", vk::PhysicalDeviceType::DISCRETE_GPU, 16384);
        strong.geometry_shader = false;
        let weak = profile("weak", vk::PhysicalDeviceType::OTHER, 1024);
        assert_eq!(select_best(&[strong, weak]).unwrap(), 1);
    }

    #[test]
    fn missing_graphics_family_is_never_selected() {
        let mut strong = profile("strong", vk::PhysicalDeviceType::DISCRETE_GPU, 16384);
        strong.families = vec![FamilySupport { graphics: false, present: false }];
        let weak = profile("weak", vk::PhysicalDeviceType::OTHER, 1024);
        assert_eq!(select_best(&[strong, weak]).unwrap(), 1);
    }

    #[test]
    fn empty_enumeration_reports_no_gpu() {
        assert!(matches!(select_best(&[]), Err(GraphicsError::NoGpuFound)));
    }

    #[test]
    fn all_ineligible_reports_no_suitable_device() {
        let mut a = profile("a", vk::PhysicalDeviceType::DISCRETE_GPU, 4096);
        a.families = vec![FamilySupport { graphics: false, present: false }];
        let mut b = profile("b", vk::PhysicalDeviceType::INTEGRATED_GPU, 4096);
        b.families = Vec::new();
        assert!(matches!(
            select_best(&[a, b]),
            Err(GraphicsError::NoSuitableDevice)
        ));
    }

    #[test]
    fn zero_score_is_never_selected() {
        // Eligible in every other way, but scores exactly zero.
        let candidate = profile("zero", vk::PhysicalDeviceType::OTHER, 0);
        assert!(matches!(
            select_best(&[candidate]),
            Err(GraphicsError::NoSuitableDevice)
        ));
    }
}
