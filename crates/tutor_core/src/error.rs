//! crates/tutor_core/src/error.rs
//!
//! The error type returned by every operation handler.

use crate::audio::CodecError;
use crate::ports::ProviderError;
use crate::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

pub type FlowResult<T> = Result<T, FlowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_pass_through_unchanged() {
        let err: FlowError = ProviderError::NoAudio.into();
        assert_eq!(err.to_string(), "No media returned from TTS model.");

        let err: FlowError = ValidationError::Missing { field: "text" }.into();
        assert_eq!(err.to_string(), "Required field 'text' is missing.");

        let err: FlowError = CodecError::InvalidFormat.into();
        assert!(matches!(err, FlowError::Codec(_)));
    }
}
