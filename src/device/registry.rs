// Registry of supported device families

use std::collections::HashMap;
use std::sync::Mutex;

/// Information about one supported device family
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub vendor: String,
    pub model: String,
    pub description: String,
    pub image_size: usize,
}

impl DeviceInfo {
    pub fn new(
        vendor: impl Into<String>,
        model: impl Into<String>,
        description: impl Into<String>,
        image_size: usize,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            model: model.into(),
            description: description.into(),
            image_size,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.vendor, self.model)
    }
}

/// Global device registry
lazy_static::lazy_static! {
    static ref DEVICE_REGISTRY: Mutex<HashMap<String, DeviceInfo>> = {
        let mut registry = HashMap::new();
        for info in builtin_devices() {
            registry.insert(info.full_name(), info);
        }
        Mutex::new(registry)
    };
}

fn builtin_devices() -> Vec<DeviceInfo> {
    vec![DeviceInfo::new(
        "TYT",
        "MD-UV390",
        "Dual-band DMR handheld (also sold as Retevis RT3S)",
        super::uv390::IMAGE_SIZE,
    )]
}

/// Register an additional device family
pub fn register_device(info: DeviceInfo) {
    DEVICE_REGISTRY
        .lock()
        .unwrap()
        .insert(info.full_name(), info);
}

/// Get information about a specific device family
pub fn get_device(vendor: &str, model: &str) -> Option<DeviceInfo> {
    DEVICE_REGISTRY
        .lock()
        .unwrap()
        .get(&format!("{} {}", vendor, model))
        .cloned()
}

/// List all registered device families, sorted by name
pub fn list_devices() -> Vec<DeviceInfo> {
    let mut devices: Vec<DeviceInfo> = DEVICE_REGISTRY.lock().unwrap().values().cloned().collect();
    devices.sort_by(|a, b| a.full_name().cmp(&b.full_name()));
    devices
}
