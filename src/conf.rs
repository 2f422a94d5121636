//! Layered representer settings.
//!
//! # Examples
//!
//! ```rust,no_run
//! use hypercast::conf::SettingsBuilder;
//!
//! let settings = SettingsBuilder::standard("hypercast.toml").build().unwrap();
//! # let _ = settings;
//! ```

pub use hypercast_conf::*;
