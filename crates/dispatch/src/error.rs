use latch_codec::CodecError;
use thiserror::Error;

/// Errors that escape [`Dispatcher::dispatch`](crate::Dispatcher::dispatch).
///
/// Identifiers this application did not produce never surface here; see
/// [`DispatchOutcome::Ignored`](crate::DispatchOutcome::Ignored).
#[derive(Debug, Error)]
pub enum DispatchError {
	/// The identifier belongs to a registered component but cannot be decoded.
	#[error(transparent)]
	Codec(#[from] CodecError),
	/// The callback failed. Carries the component cookie as context.
	#[error(transparent)]
	Callback(anyhow::Error),
}

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;
