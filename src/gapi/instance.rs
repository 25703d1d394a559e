use crate::gapi::debug::{self, Listener};
use crate::gapi::entry::Entry;
use crate::gapi::errors::{GraphicsError, Result};
use crate::gapi::VALIDATION_ENABLED;
use crate::window::window::EngineWindow;
use log::debug;
use vulkanalia::vk::{ExtDebugUtilsExtension, HasBuilder, InstanceV1_0};
use vulkanalia::{Instance as VkInstance, Version, vk};

/// Required by Vulkan SDK on macOS since 1.3.216.
pub(crate) const PORTABILITY_MACOS_VERSION: Version = Version::new(1, 3, 216);

/// # Vulkan Instance
/// The Vulkan instance is the connection between this program and the Vulkan
/// driver. It is the first object created and the last one destroyed, and
/// everything else acquired through it lives strictly inside its lifetime.
///
/// # Details
/// - Allows global queries for physical devices (GPUs), layers, and
///   extensions.
/// - Allows the creation of surfaces and debug utils, which are instance
///   extensions.
///
/// In validation builds it also owns the debug messenger and the diagnostic
/// [`Listener`]: the messenger descriptor is chained into the instance
/// create info, so diagnostics emitted during creation itself are captured
/// as well, and the messenger is destroyed strictly before the instance.
///
/// Instances are never duplicated: the type is not `Clone`, so the handle
/// can only be moved, and teardown runs exactly once.
pub(crate) struct Instance {
    instance: VkInstance,
    messenger: Option<vk::DebugUtilsMessengerEXT>,
    // Boxed so the address handed to the messenger user-data stays stable.
    listener: Box<Listener>,
}

impl Instance {
    /// Creates the instance with the platform extensions the window
    /// collaborator requires plus, in validation builds, the debug-utils
    /// extension, the requested layers, and the chained messenger
    /// descriptor.
    ///
    /// The listener starts out disarmed and is armed only once both the
    /// instance and the messenger exist, so bring-up noise is never
    /// escalated.
    ///
    /// # Errors
    /// - [`GraphicsError::Loader`] on a macOS loader too old for
    ///   portability.
    /// - [`GraphicsError::LayerUnavailable`] if a requested layer is not
    ///   installed.
    /// - [`GraphicsError::InstanceCreation`] if the backend refuses
    ///   creation; a created instance is released again if the messenger
    ///   cannot be installed afterwards.
    pub fn new(entry: &Entry, window: &EngineWindow, layers: &[vk::ExtensionName]) -> Result<Self> {
        let entry_version = entry.version()?;
        if cfg!(target_os = "macos") && entry_version < PORTABILITY_MACOS_VERSION {
            return Err(GraphicsError::Loader(format!(
                "macOS portability requires Vulkan {PORTABILITY_MACOS_VERSION}"
            )));
        }

        if !layers.is_empty() {
            let available = entry.available_layers()?;
            for layer in layers {
                if !available.contains(layer) {
                    return Err(GraphicsError::LayerUnavailable(layer.to_string()));
                }
            }
        }

        let application_info = vk::ApplicationInfo::builder()
            .application_name(b"RaveEngine Application\0")
            .application_version(vk::make_version(1, 0, 0))
            .engine_name(b"RaveEngine\0")
            .engine_version(vk::make_version(1, 0, 0))
            .api_version(vk::make_version(1, 0, 0));

        // Query for the extensions required by the window system.
        let mut extensions = window
            .required_extensions()
            .iter()
            .map(|e| e.as_ptr())
            .collect::<Vec<_>>();
        if VALIDATION_ENABLED {
            extensions.push(vk::EXT_DEBUG_UTILS_EXTENSION.name.as_ptr());
        }
        let flags = if cfg!(target_os = "macos") {
            // Allow querying extended physical device properties and enable
            // macOS support for the physical device.
            extensions.push(vk::KHR_GET_PHYSICAL_DEVICE_PROPERTIES2_EXTENSION.name.as_ptr());
            extensions.push(vk::KHR_PORTABILITY_ENUMERATION_EXTENSION.name.as_ptr());
            vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR
        } else {
            vk::InstanceCreateFlags::empty()
        };
        let layer_names = layers.iter().map(|l| l.as_ptr()).collect::<Vec<_>>();

        let listener = Box::new(Listener::new());

        let mut info = vk::InstanceCreateInfo::builder()
            .application_info(&application_info)
            .enabled_layer_names(&layer_names)
            .enabled_extension_names(&extensions)
            .flags(flags);

        // Chained via the create info so creation and destruction of the
        // instance itself are covered by the callback too.
        let mut debug_info = debug::messenger_info(&listener);
        if VALIDATION_ENABLED {
            info = info.push_next(&mut debug_info);
        }

        debug!("Creating instance...");
        let instance = entry
            .create_instance(&info, None)
            .map_err(GraphicsError::InstanceCreation)?;

        let mut this = Self {
            instance,
            messenger: None,
            listener,
        };
        if VALIDATION_ENABLED {
            debug!("Adding debug callback.");
            let messenger_info = debug::messenger_info(&this.listener);
            let messenger = unsafe {
                this.instance
                    .create_debug_utils_messenger_ext(&messenger_info, None)
            }
            .map_err(GraphicsError::InstanceCreation)?;
            this.messenger = Some(messenger);
            this.listener.arm();
        }
        Ok(this)
    }

    /// Escalates the oldest diagnostic captured while armed, if any.
    /// Called at the construction checkpoints of the graphics context.
    pub fn check_diagnostics(&self) -> Result<()> {
        match self.listener.take_captured() {
            Some(message) => Err(GraphicsError::DiagnosticEscalation(message)),
            None => Ok(()),
        }
    }

    pub fn get(&self) -> &VkInstance {
        &self.instance
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        // Teardown noise must not escalate anymore.
        self.listener.retire();
        unsafe {
            if let Some(messenger) = self.messenger.take() {
                debug!("Destroying messenger.");
                self.instance
                    .destroy_debug_utils_messenger_ext(messenger, None);
            }
            self.instance.destroy_instance(None);
        }
    }
}
