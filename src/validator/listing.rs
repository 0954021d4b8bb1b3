//! Listing rules: list price must be positive, close price only applies to
//! closed listings.

use serde_json::Value;

use crate::bridge::HostAdapter;
use crate::record::Fields;

use super::entry::{Guest, Validator};
use super::errors::ValidationResult;

pub const LIST_PRICE: &str = "ListPrice";
pub const MLS_STATUS: &str = "MlsStatus";
pub const CLOSE_PRICE: &str = "ClosePrice";

/// Listing lifecycle status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MlsStatus {
    Active,
    Pending,
    Closed,
    Other(String),
}

impl MlsStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "Active" => MlsStatus::Active,
            "Pending" => MlsStatus::Pending,
            "Closed" => MlsStatus::Closed,
            other => MlsStatus::Other(other.to_string()),
        }
    }
}

/// Fields the rules read, with their defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    /// Absent, null or mistyped reads as 0.0
    pub list_price: f64,
    /// Absent, null or mistyped reads as no status
    pub mls_status: Option<MlsStatus>,
}

impl Listing {
    pub fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            list_price: fields.number(LIST_PRICE).unwrap_or(0.0),
            mls_status: fields.string(MLS_STATUS).present().map(MlsStatus::parse),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.mls_status == Some(MlsStatus::Closed)
    }
}

/// The built-in rule set
#[derive(Debug, Default, Clone, Copy)]
pub struct ListingValidator;

impl Validator for ListingValidator {
    fn validate<H: HostAdapter>(&self, guest: &mut Guest<H>) -> ValidationResult<()> {
        let current = guest.records().current()?;
        // Fetched for parity with hosts that expect both reads; no rule uses it yet.
        let _previous = guest.records().previous()?;

        let fields = current.fields()?;

        if fields.number(LIST_PRICE).is_wrong_type() {
            guest
                .diagnostics()
                .warn(LIST_PRICE, "List price should be a number")?;
        }
        if fields.string(MLS_STATUS).is_wrong_type() {
            guest
                .diagnostics()
                .warn(MLS_STATUS, "Mls status should be a string")?;
        }

        let listing = Listing::from_fields(&fields);

        if listing.list_price <= 0.0 {
            guest
                .diagnostics()
                .error(LIST_PRICE, "List price must be greater than $0")?;
        }

        let mut effects = guest.effects();
        if listing.is_closed() {
            effects.set_required(CLOSE_PRICE, true)?;
            effects.set_display(CLOSE_PRICE, true)?;
        } else {
            effects.set_required(CLOSE_PRICE, false)?;
            effects.set_display(CLOSE_PRICE, false)?;
            effects.set(CLOSE_PRICE, &Value::Null)?;
        }

        Ok(())
    }
}
