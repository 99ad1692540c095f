//! Local stand-in for the inference endpoint
//!
//! Used whenever no API credential is configured. Responses come from a
//! small fixed set of canned replies, picked pseudo-randomly, after a
//! deliberate artificial wait. The wait is pure theater: nothing is
//! computed during it. Its band scales with whether the prompt carries
//! attached-file content and whether the model names the
//! higher-capability tier, so the pacing resembles a live endpoint. The
//! simulator never fails.

use crate::models::{is_advanced_tier, model_by_id};
use rand::Rng;
use std::time::Duration;

/// Canned replies for plain prompts
///
/// `{model}` is substituted with the raw model identifier.
const PLAIN_RESPONSES: [&str; 8] = [
    "Neural pathways activated. Your query has been processed through advanced quantum algorithms.",
    "System analysis complete. The AI core has generated an optimized response pattern.",
    "Data matrix accessed. Processing through {model} architecture yields the following insights.",
    "Cybernetic interface engaged. Your command has been executed via distributed processing nodes.",
    "Advanced reasoning protocols activated. The synthetic intelligence provides this analysis.",
    "Quantum processing complete. Neural network convergence achieved for optimal response.",
    "Digital consciousness online. Your inquiry has been resolved through predictive modeling.",
    "AI subsystem active. Computational matrix has processed your request successfully.",
];

/// Canned replies for prompts that reference attached files
const FILE_ANALYSIS_RESPONSES: [&str; 4] = [
    "File analysis complete. Neural networks have processed your uploaded content through \
     advanced pattern recognition algorithms.\n\n**ANALYSIS SUMMARY:**\n\u{2022} Content \
     structure identified and catalogued\n\u{2022} Key data points extracted and \
     indexed\n\u{2022} Potential optimization opportunities detected\n\u{2022} Security \
     patterns evaluated\n\n**RECOMMENDATIONS:**\n\u{2022} Consider implementing data \
     validation protocols\n\u{2022} Review current formatting standards\n\u{2022} Optimize \
     for cybernetic compatibility\n\nQuantum processors have successfully parsed your file \
     content. How would you like me to proceed with deeper analysis?",
    "File processing initiated through distributed neural networks. Content successfully \
     decoded and analyzed.\n\n**DIGITAL FORENSICS REPORT:**\n\u{2022} File integrity: \
     VERIFIED\n\u{2022} Data composition: ANALYZED\n\u{2022} Syntax validation: \
     COMPLETE\n\u{2022} Semantic extraction: SUCCESS\n\n**KEY FINDINGS:**\n\u{2022} Multiple \
     data patterns identified\n\u{2022} Structural consistency confirmed\n\u{2022} Potential \
     enhancement vectors located\n\nThe cybernetic core has completed initial scanning. \
     Advanced analysis protocols are now available for deployment.",
    "Advanced file analysis protocol executed. Your uploaded content has been processed \
     through the InterMAX quantum analysis engine.\n\n**TECHNICAL ASSESSMENT:**\n\u{2022} \
     Binary structure: DECODED\n\u{2022} Content mapping: COMPLETE\n\u{2022} Pattern \
     recognition: ACTIVE\n\u{2022} Optimization scan: FINISHED\n\n**SYSTEM \
     INSIGHTS:**\n\u{2022} File complexity index calculated\n\u{2022} Data flow patterns \
     identified\n\u{2022} Enhancement opportunities mapped\n\u{2022} Integration pathways \
     analyzed\n\nARIA neural networks recommend proceeding with detailed content \
     examination. Shall I initiate deep-dive analysis protocols?",
    "File upload processed through InterMAX cybernetic interface. Content successfully \
     integrated into analysis matrix.\n\n**PROCESSING REPORT:**\n\u{2022} Input validation: \
     SUCCESS\n\u{2022} Content parsing: COMPLETE\n\u{2022} Data extraction: \
     OPTIMIZED\n\u{2022} Pattern analysis: ACTIVE\n\n**DISCOVERED ELEMENTS:**\n\u{2022} \
     Structural components identified\n\u{2022} Functional blocks catalogued\n\u{2022} \
     Dependency chains mapped\n\u{2022} Optimization vectors calculated\n\nThe synthetic \
     intelligence core has catalogued your file content. Advanced analytical functions are \
     now available for deployment.",
];

/// Whether a prompt carries attached-file content
pub fn prompt_references_files(prompt: &str) -> bool {
    prompt.contains("[FILES ATTACHED:") || prompt.contains("File:")
}

/// Pick the artificial wait for a simulated round-trip
///
/// Bands: 3000-7000 ms for file-bearing prompts, 2000-5000 ms for the
/// higher-capability tier, 1000-3000 ms otherwise.
pub fn response_delay(prompt: &str, model: &str) -> Duration {
    let mut rng = rand::rng();
    let millis: u64 = if prompt_references_files(prompt) {
        rng.random_range(3_000..7_000)
    } else if is_advanced_tier(model) {
        rng.random_range(2_000..5_000)
    } else {
        rng.random_range(1_000..3_000)
    };
    Duration::from_millis(millis)
}

/// Compose a canned reply without waiting
///
/// Split out from [`simulate_response`] so the selection logic is
/// testable without sleeping.
pub fn compose_response(prompt: &str, model: &str) -> String {
    let info = model_by_id(model);
    let mut rng = rand::rng();

    if prompt_references_files(prompt) {
        let body = FILE_ANALYSIS_RESPONSES[rng.random_range(0..FILE_ANALYSIS_RESPONSES.len())];
        // Echo just the operator's message when the prompt was expanded
        // with file previews
        let context = prompt.split("User message: ").nth(1).unwrap_or(prompt);
        format!(
            "[{}] {}\n\n**Original query context:** \"{}\"\n\n[Simulated file analysis - \
             Configure API key for live AI file processing]",
            info.name, body, context
        )
    } else {
        let body = PLAIN_RESPONSES[rng.random_range(0..PLAIN_RESPONSES.len())]
            .replace("{model}", model);
        format!(
            "[{}] {}\n\nOriginal query: \"{}\"\n\n[Simulated response - Configure API key \
             for live AI interaction]",
            info.name, body, prompt
        )
    }
}

/// Simulate one chat round-trip
pub async fn simulate_response(prompt: &str, model: &str) -> String {
    let delay = response_delay(prompt, model);
    tracing::debug!("Simulator waiting {} ms before responding", delay.as_millis());
    tokio::time::sleep(delay).await;
    compose_response(prompt, model)
}
