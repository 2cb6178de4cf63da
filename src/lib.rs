pub mod ai;
pub mod cli;
pub mod config;
pub mod infrastructure;
pub mod languages;
pub mod report;
pub mod review;

pub use languages::{LanguageOption, SUPPORTED_LANGUAGES};
pub use review::{
    interpret, Advisory, CodeReviewService, CompletedReview, Interpretation, ResponseInterpreter,
    ReviewRequest, ReviewResult,
};
