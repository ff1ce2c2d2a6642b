//! Stateless component identifiers.
//!
//! [`IdCodec`] packs a component cookie and its typed field values into the
//! platform's opaque, length-limited identifier string and unpacks it again
//! when an interaction arrives. Field values are rendered by the converters
//! of a [`ConverterRegistry`](latch_convert::ConverterRegistry); the
//! component behind a cookie is found through [`HandlerLookup`].

mod codec;
mod config;
mod error;
mod escape;
mod lookup;

pub use codec::IdCodec;
pub use config::{CodecConfig, DEFAULT_MAX_LEN};
pub use error::{CodecError, ConfigError, Result};
pub use escape::Charset;
pub use lookup::{Component, HandlerLookup};
