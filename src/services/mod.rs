pub mod ai_service;
pub mod extraction;
pub mod gemini; // Google Gemini generateContent client
pub mod prompt;

pub use ai_service::AIService;
pub use extraction::extract_analysis;
pub use gemini::GeminiService;
