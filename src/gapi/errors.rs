use thiserror::Error;
use vulkanalia::vk;

pub type Result<T> = std::result::Result<T, GraphicsError>;

/// Everything that can go wrong while acquiring the Vulkan resources the
/// engine needs. None of these are recoverable locally: each one aborts the
/// construction step it occurred in and propagates to the caller of
/// [`Graphics::new`](crate::gapi::graphics::Graphics::new), with every
/// partially-acquired resource already released.
#[derive(Debug, Error)]
pub enum GraphicsError {
    /// The Vulkan loader library could not be found or loaded.
    #[error("failed to load the Vulkan library: {0}")]
    Loader(String),

    /// A requested layer is not installed on this system.
    #[error("requested layer is not available: {0}")]
    LayerUnavailable(String),

    /// The backend refused instance creation (missing extension,
    /// incompatible driver, out of memory).
    #[error("the backend refused instance creation")]
    InstanceCreation(#[source] vk::ErrorCode),

    /// Zero physical devices are enumerable through the instance.
    #[error("failed to find GPUs with Vulkan support")]
    NoGpuFound,

    /// Every enumerated device failed the hard requirements or scored zero.
    #[error("failed to find a suitable GPU")]
    NoSuitableDevice,

    /// The backend refused logical device creation.
    #[error("the backend refused logical device creation")]
    DeviceCreation(#[source] vk::ErrorCode),

    /// The window collaborator could not create a surface.
    #[error("failed to create a window surface")]
    SurfaceCreation(#[source] vk::ErrorCode),

    /// The selected device has no queue family that can present to the
    /// created surface.
    #[error("the selected GPU cannot present to the window surface")]
    UnsupportedSurface,

    /// A validation message was captured while the debug messenger was
    /// armed and is escalated into a hard failure.
    #[error("validation diagnostic escalated to an error: {0}")]
    DiagnosticEscalation(String),

    /// A backend query outside the creation contracts failed.
    #[error("Vulkan call failed")]
    Vulkan(#[from] vk::ErrorCode),
}
