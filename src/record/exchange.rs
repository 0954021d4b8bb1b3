//! Record exchange: two-phase fetch followed by a JSON parse

use crate::bridge::{HostAdapter, MemoryBridge, Selector};

use super::errors::RecordResult;
use super::record::Record;

/// Reads the snapshots of the current request
pub struct RecordExchange<'b, H> {
    bridge: &'b mut MemoryBridge<H>,
}

impl<'b, H: HostAdapter> RecordExchange<'b, H> {
    pub fn new(bridge: &'b mut MemoryBridge<H>) -> Self {
        Self { bridge }
    }

    /// The listing being validated
    pub fn current(&mut self) -> RecordResult<Record> {
        self.fetch(Selector::Current)
    }

    /// The listing before this edit
    pub fn previous(&mut self) -> RecordResult<Record> {
        self.fetch(Selector::Previous)
    }

    fn fetch(&mut self, selector: Selector) -> RecordResult<Record> {
        let bytes = self.bridge.fetch_bytes(selector)?;
        Record::parse(selector.import_name(), &bytes)
    }
}
