//! Layered settings for hypercast representers.
//!
//! Settings are merged from prioritized sources:
//!
//! 1. Defaults ([`RepresenterSettings::default`])
//! 2. A TOML file or string ([`sources::TomlSource`])
//! 3. `HYPERCAST_*` environment variables ([`sources::EnvSource`])
//!
//! ## Quick Start
//!
//! ```no_run
//! use hypercast_conf::SettingsBuilder;
//!
//! let settings = SettingsBuilder::standard("hypercast.toml").build()?;
//! let codec = settings.codec();
//! println!("rendering as {}", codec.media_type());
//! # Ok::<(), hypercast_conf::SettingsError>(())
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Setting |
//! |----------|---------|
//! | `HYPERCAST_FORMAT` | `format` (`json`, `hal`, `collection-json`) |
//! | `HYPERCAST_PRETTY` | `pretty` |
//! | `HYPERCAST_MAX_DEPTH` | `max_depth` |
//! | `HYPERCAST_COLLECTION_JSON__VERSION` | `collection_json.version` |
//! | `HYPERCAST_COLLECTION_JSON__HREF` | `collection_json.href` |

pub mod builder;
pub mod error;
pub mod settings;
pub mod sources;

pub use builder::SettingsBuilder;
pub use error::{SettingsError, SettingsResult};
pub use settings::RepresenterSettings;
pub use sources::{DefaultSource, EnvSource, SettingsSource, TomlSource};
