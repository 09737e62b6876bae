//! # Assistant
//!
//! Natural-language questions answered by a generative backend, grounded
//! with the catalog.
//!
//! ## Modules
//!
//! - `prompts` - Fixed prompt text and preset questions
//! - `grounding` - Catalog-to-context assembly with truncation bounds
//! - `exchange` - Question/answer state
//! - `backend` - Generative backend trait and the Gemini client
//! - `assembler` - The assistant itself

pub mod assembler;
pub mod backend;
pub mod exchange;
pub mod grounding;
pub mod prompts;

pub use assembler::{AskOutcome, QueryAssembler};
pub use backend::{GeminiBackend, GenerativeBackend, DEFAULT_MODEL};
pub use exchange::{ExchangeStatus, QueryExchange, MAX_QUESTION_CHARS};
pub use grounding::{build_context, GroundingContext, GroundingPolicy};
pub use prompts::PRESETS;
