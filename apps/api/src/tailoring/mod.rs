// Tailoring pipeline: keyword ranking, skill-section rewriting, cover-letter generation,
// rendering and packaging.

pub mod bundle;
pub mod handlers;
pub mod keywords;
pub mod pipeline;
pub mod prompts;
pub mod sections;
