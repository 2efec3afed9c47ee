use candle_core::Device;
use tracing::debug;

use crate::error::{EmotionError, Result};

/// Loads a device to be used for the model.
/// If `index` is `Some(i)` it will attempt to load the specified CUDA device.
/// When `None` it defaults to CUDA device 0 if available and otherwise falls back
/// to CPU.
pub fn load_device_with(index: Option<usize>) -> Result<Device> {
    match index {
        Some(i) => Device::new_cuda(i).map_err(|e| EmotionError::Device(e.to_string())),
        None => Ok(Device::cuda_if_available(0).unwrap_or(Device::Cpu)),
    }
}

/// Selects CUDA 0 if available and otherwise falls back to CPU.
pub fn load_device() -> Result<Device> {
    load_device_with(None)
}

/// Request for a specific device, used by the context builder.
#[derive(Clone, Debug, Default)]
pub enum DeviceRequest {
    /// Use CUDA if available, otherwise CPU (default behavior).
    #[default]
    Default,
    /// Force CPU even if CUDA is available.
    Cpu,
    /// Select a specific CUDA device by index.
    Cuda(usize),
    /// Provide an already constructed device.
    Explicit(Device),
}

impl DeviceRequest {
    /// Resolve the request into an actual [`Device`].
    pub fn resolve(self) -> Result<Device> {
        let device = match self {
            DeviceRequest::Default => load_device()?,
            DeviceRequest::Cpu => Device::Cpu,
            DeviceRequest::Cuda(i) => load_device_with(Some(i))?,
            DeviceRequest::Explicit(d) => d,
        };
        debug!(location = ?device.location(), "resolved inference device");
        Ok(device)
    }
}

/// Convenience methods for builders that select a device.
pub trait DeviceSelectable: Sized {
    /// Returns a mutable reference to the builder's internal [`DeviceRequest`].
    fn device_request_mut(&mut self) -> &mut DeviceRequest;

    /// Force inference on CPU.
    fn cpu(mut self) -> Self {
        *self.device_request_mut() = DeviceRequest::Cpu;
        self
    }

    /// Select a specific CUDA device by index.
    fn cuda_device(mut self, index: usize) -> Self {
        *self.device_request_mut() = DeviceRequest::Cuda(index);
        self
    }

    /// Provide an explicit [`Device`].
    fn device(mut self, device: Device) -> Self {
        *self.device_request_mut() = DeviceRequest::Explicit(device);
        self
    }
}
