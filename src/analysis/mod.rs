pub mod aggregate;
pub mod format;
pub mod parser;
pub mod prompt;

pub use aggregate::{
    category_totals, group_by_month, milestone_probability, net_impact, recent_impact, reconcile,
};
pub use parser::{parse_response, ParsedAnalysis};
pub use prompt::{build_prompt, GenerationConfig, Prompt};
