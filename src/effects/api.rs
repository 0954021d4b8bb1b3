//! Field effects API, guest side

use serde::Serialize;

use crate::bridge::{BridgeError, BridgeResult, HostAdapter, MemoryBridge, Outgoing};

pub struct FieldEffects<'b, H> {
    bridge: &'b mut MemoryBridge<H>,
}

impl<'b, H: HostAdapter> FieldEffects<'b, H> {
    pub fn new(bridge: &'b mut MemoryBridge<H>) -> Self {
        Self { bridge }
    }

    pub fn set_required(&mut self, field: &str, required: bool) -> BridgeResult<()> {
        self.bridge.send(Outgoing::SetRequired { field, required })
    }

    pub fn set_display(&mut self, field: &str, display: bool) -> BridgeResult<()> {
        self.bridge.send(Outgoing::SetDisplay { field, display })
    }

    /// Override a field's value. The value is sent as JSON text.
    pub fn set<T>(&mut self, field: &str, value: &T) -> BridgeResult<()>
    where
        T: Serialize + ?Sized,
    {
        let value_json = serde_json::to_string(value).map_err(|e| BridgeError::Encode {
            field: field.to_string(),
            reason: e.to_string(),
        })?;
        self.bridge.send(Outgoing::Set {
            field,
            value_json: &value_json,
        })
    }
}
