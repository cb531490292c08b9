//! Buffer clears synthesized from full-viewport draws.
//!
//! The hardware has no clear command. Each requested buffer gets one triangle fan
//! drawn with built-in programs, framed by hardware-only save/restore so the
//! client-visible state is never touched.

mod synth;

pub use synth::{synthesize_clear, ClearEnv, CLEAR_FAN_INDICES, CLEAR_FAN_POSITIONS};
