//! Audio server integration
//!
//! This module provides:
//! - The control interface to the audio server (`pactl`)
//! - Output device enumeration and parsing
//! - Background switching of the default output with stream relocation

pub mod control;
mod lister;
mod switcher;

pub use control::{AudioControl, Pactl};
pub use lister::DeviceLister;
pub use switcher::Switcher;
