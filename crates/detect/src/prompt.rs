//! The fixed instruction prompt the facts are embedded in.

use crate::DetectError;
use deckcheck_core::Fact;

/// Instruction template; `{facts}` is replaced with the indented JSON
/// fact list.
const PROMPT_TEMPLATE: &str = "\
You are an AI that finds inconsistencies in PowerPoint presentations.

Facts (JSON):
{facts}

Task:
1. Identify factual or logical contradictions across these statements.
2. Contradictions may be:
   - Numeric (different numbers for same metric)
   - Textual (claims that can't both be true)
   - Timeline/date mismatches
3. For each inconsistency, return:
   - \"slides\": list of slide numbers or image names
   - \"type\": \"numeric\", \"textual\", or \"timeline\"
   - \"description\": short explanation

Output JSON only.
";

/// Build the full prompt for the given facts.
pub fn build_prompt(facts: &[Fact]) -> Result<String, DetectError> {
    let json = serde_json::to_string_pretty(facts)?;
    Ok(PROMPT_TEMPLATE.replace("{facts}", &json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckcheck_core::Source;

    #[test]
    fn test_prompt_embeds_facts_and_instructions() {
        let facts = vec![
            Fact::new(Source::Slide(1), "Revenue was $5M in 2023"),
            Fact::new(Source::Image("chart.png".into()), "Q3 revenue: $6M"),
        ];
        let prompt = build_prompt(&facts).unwrap();

        assert!(prompt.contains("\"slide\": 1"));
        assert!(prompt.contains("Revenue was $5M in 2023"));
        assert!(prompt.contains("\"slide\": \"chart.png\""));
        assert!(prompt.contains("Output JSON only."));
        assert!(prompt.contains("\"numeric\", \"textual\", or \"timeline\""));
        assert!(!prompt.contains("{facts}"));
    }
}
