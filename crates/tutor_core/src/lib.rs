pub mod audio;
pub mod domain;
pub mod error;
pub mod flows;
pub mod media;
pub mod ports;
pub mod prompt;
pub mod validation;

pub use domain::{
    EmotionInput, EmotionOutput, ImagineInput, ImagineOutput, Language, OperationKind,
    OperationRequest, OperationResult, QaInput, QaOutput, SpeechToTextInput, SpeechToTextOutput,
    SummarizeInput, SummarizeOutput, TextToSpeechInput, TextToSpeechOutput, TranslateInput,
    TranslateOutput, UsageRecord,
};
pub use error::{FlowError, FlowResult};
pub use ports::{GenerativeModel, ProviderError, ProviderResult, UsageHistoryService};
pub use validation::{Validate, ValidationError};
