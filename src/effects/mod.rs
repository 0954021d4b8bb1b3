//! # Field Effects
//!
//! Required/display flags and value overrides, keyed by field name.
//!
//! The guest transmits each effect as it is decided. The host accumulates
//! them into an [`EffectMap`], which is authoritative only when the
//! request completes normally.

mod api;
mod effect;

pub use api::FieldEffects;
pub use effect::{EffectMap, FieldEffect};
