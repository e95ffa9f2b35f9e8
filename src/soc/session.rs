//! Holder of the currently loaded description.

use std::sync::Arc;

use tracing::info;

use crate::soc::description::Device;
use crate::soc::error::{RegError, RegResult};

/// Owns at most one loaded [`Device`]. Loading swaps the whole reference, so an
/// `Arc` handed out earlier keeps describing the device it was taken from.
#[derive(Clone, Debug, Default)]
pub struct Session {
    current: Option<Arc<Device>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> RegResult<Arc<Device>> {
        self.current.clone().ok_or(RegError::NotLoaded)
    }

    /// Replaces the current device and returns the new handle.
    pub fn load(&mut self, device: Device) -> Arc<Device> {
        info!(
            device = device.name(),
            peripherals = device.peripherals().len(),
            "description loaded"
        );
        let device = Arc::new(device);
        self.current = Some(Arc::clone(&device));
        device
    }

    /// Runs `loader`; the session only changes if it succeeds.
    pub fn load_with<F, E>(&mut self, loader: F) -> Result<Arc<Device>, E>
    where
        F: FnOnce() -> Result<Device, E>,
    {
        let device = loader()?;
        Ok(self.load(device))
    }
}
