//! Wire codecs.
//!
//! # Examples
//!
//! ```
//! use hypercast::formats::{Format, HalCodec};
//!
//! assert_eq!(Format::from_name("hal").unwrap(), Format::Hal);
//! # let _ = HalCodec::new();
//! ```

pub use hypercast_formats::*;
