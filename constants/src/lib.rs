//! Shared tuning values for the vehicle viewer.
//!
//! Everything here is a literal: the material library, the configurator and the
//! animation driver read these so that no runtime path can fail on missing data.

pub mod animation;
pub mod defaults;
pub mod palette;
pub mod path;
pub mod render_settings;
