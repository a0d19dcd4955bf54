//! Vision provider implementations

mod factory;
mod gemini;
pub mod http_client;
mod huggingface;
mod router;

pub use factory::VisionProviderFactory;
pub use gemini::{
    GeminiProvider, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, GEMINI_PROVIDER_NAME,
};
pub use http_client::{HttpClient, HttpClientTrait, HttpError, HttpResponse};
pub use huggingface::{
    HuggingFaceProvider, DEFAULT_HUGGINGFACE_BASE_URL, DEFAULT_HUGGINGFACE_MODEL,
    HUGGINGFACE_PROVIDER_NAME,
};
pub use router::{AnalysisOutcome, ProviderRouter};
