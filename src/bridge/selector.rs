//! Names for every call that crosses the host boundary

use std::fmt;

/// Which record snapshot a two-phase fetch reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// The listing as it is being submitted
    Current,
    /// The listing as it was before this edit (JSON `null` when there is none)
    Previous,
}

impl Selector {
    /// Import name in the `reso` host module
    pub fn import_name(&self) -> &'static str {
        match self {
            Selector::Current => "data",
            Selector::Previous => "previous_data",
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.import_name())
    }
}

/// A single outgoing call. Strings are borrowed; the bridge encodes them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outgoing<'a> {
    /// Process-scoped finding
    Diagnostic { message: &'a str },
    /// Field-scoped error
    Error { field: &'a str, message: &'a str },
    /// Field-scoped warning
    Warn { field: &'a str, message: &'a str },
    /// Required flag for a field
    SetRequired { field: &'a str, required: bool },
    /// Display flag for a field
    SetDisplay { field: &'a str, display: bool },
    /// Value override, already serialized as JSON text
    Set { field: &'a str, value_json: &'a str },
}

impl Outgoing<'_> {
    /// Import name in the `reso` host module
    pub fn import_name(&self) -> &'static str {
        match self {
            Outgoing::Diagnostic { .. } => "diagnostic",
            Outgoing::Error { .. } => "error",
            Outgoing::Warn { .. } => "warn",
            Outgoing::SetRequired { .. } => "set_required",
            Outgoing::SetDisplay { .. } => "set_display",
            Outgoing::Set { .. } => "set",
        }
    }
}

/// The import module every validator links against
pub const IMPORT_MODULE: &str = "reso";

/// Flags travel as 0/1
pub fn encode_flag(value: bool) -> i32 {
    if value {
        1
    } else {
        0
    }
}

/// Any non-zero flag means true
pub fn decode_flag(value: i32) -> bool {
    value != 0
}
