use std::collections::BTreeMap;

use serde_json::Value;

use crate::runtime::action::DispatchError;

/// A named client exposing remotely invocable methods, addressed from the
/// `Action` property as `<service>.<method>`.
pub trait Capability: Send + Sync {
    /// Lowercase registry key, e.g. `s3`.
    fn service_name(&self) -> &str;

    fn methods(&self) -> &[&'static str];

    /// Runs `method` with `properties` as its keyword arguments. Only called
    /// with names returned by [`Capability::resolve_method`].
    fn invoke(&self, method: &str, properties: &Value) -> Result<(), String>;

    fn resolve_method(&self, method: &str) -> Result<&'static str, DispatchError> {
        self.methods()
            .iter()
            .copied()
            .find(|candidate| *candidate == method)
            .ok_or_else(|| DispatchError::UnknownMethod {
                service: self.service_name().to_string(),
                method: method.to_string(),
            })
    }
}

pub trait CapabilityRegistry {
    fn resolve_capability(&self, service: &str) -> Result<&dyn Capability, DispatchError>;
}

#[derive(Default)]
pub struct ServiceRegistry {
    capabilities: BTreeMap<String, Box<dyn Capability>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, capability: Box<dyn Capability>) {
        self.capabilities
            .insert(capability.service_name().to_lowercase(), capability);
    }

    pub fn with(mut self, capability: Box<dyn Capability>) -> Self {
        self.register(capability);
        self
    }

    pub fn service_names(&self) -> Vec<String> {
        self.capabilities.keys().cloned().collect()
    }
}

impl CapabilityRegistry for ServiceRegistry {
    fn resolve_capability(&self, service: &str) -> Result<&dyn Capability, DispatchError> {
        let key = service.to_lowercase();
        match self.capabilities.get(&key) {
            Some(capability) => Ok(capability.as_ref()),
            None => Err(DispatchError::UnknownService {
                service: key,
                available: self.service_names(),
            }),
        }
    }
}
