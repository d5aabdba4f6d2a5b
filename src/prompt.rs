use std::fmt;

pub const SYSTEM_INSTRUCTION: &str =
    "Return only a valid JSON object that matches the schema in the prior message. No prose outside JSON.";

pub const BASE_PROMPT: &str = r#"You are a respectful, non-preachy scripture study guide.
Task: Summarize a scripture chapter (or range) and provide life application for a general audience.

Return JSON in this exact shape:
{
  "reference": string,
  "overview": string,
  "historical_context": string,
  "summary": string,
  "key_verses": string[],
  "themes": string[],
  "life_application": string[],
  "reflection_questions": string[],
  "cross_references": string[]
}

Guidelines:
- Be accurate to the chapter's content. Avoid quoting long passages; paraphrase.
- Keep a warm, invitational tone.
- "Life application" should be practical and specific (habits, small steps, questions).
- If a theme is provided instead of a chapter, recommend 3-5 chapters and summarize the top one.
- If a range is provided (e.g., Mosiah 2-5), weave the arc concisely."#;

const BRIEF_GUIDANCE: &str = "CRITICAL: Keep responses VERY concise. \
Overview and context: 1-2 sentences each. \
Summary: 2-3 sentences max. Lists: 2-3 items each.";

const STANDARD_GUIDANCE: &str = "Provide balanced detail. Overview and context: 2-3 sentences each. \
Summary: 3-5 sentences. Lists: 3-5 items each.";

const DEEP_GUIDANCE: &str = "CRITICAL: Provide COMPREHENSIVE analysis. \
Overview and context: 3-5 sentences each with rich detail. \
Summary: 6+ sentences with thorough exploration. Lists: 5-8 items each with depth.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthTier {
    Brief,
    #[default]
    Standard,
    Deep,
}

impl LengthTier {
    // Anything other than exactly `brief` or `deep` is treated as `standard`.
    pub fn parse(s: &str) -> Self {
        match s {
            "brief" => LengthTier::Brief,
            "deep" => LengthTier::Deep,
            _ => LengthTier::Standard,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LengthTier::Brief => "brief",
            LengthTier::Standard => "standard",
            LengthTier::Deep => "deep",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            LengthTier::Brief => BRIEF_GUIDANCE,
            LengthTier::Standard => STANDARD_GUIDANCE,
            LengthTier::Deep => DEEP_GUIDANCE,
        }
    }
}

impl fmt::Display for LengthTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn length_guidance(length: &str) -> &'static str {
    LengthTier::parse(length).guidance()
}

pub fn build_prompt(reference: &str, focus: &str, length: &str) -> String {
    format!(
        "{BASE_PROMPT}\n\nNow respond for:\nREFERENCE: {reference}\nFOCUS: {focus}\nLENGTH REQUIREMENT: {}\nAUDIENCE: general\n",
        length_guidance(length)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_tier_gets_its_guidance() {
        assert!(build_prompt("John 3", "", "brief").contains("Keep responses VERY concise"));
        assert!(build_prompt("John 3", "", "standard").contains("Provide balanced detail"));
        assert!(build_prompt("John 3", "", "deep").contains("Provide COMPREHENSIVE analysis"));
    }

    #[test]
    fn unrecognized_tier_gets_standard_guidance() {
        for length in ["", "medium", "extra-long"] {
            let prompt = build_prompt("John 3", "", length);
            assert!(prompt.contains(STANDARD_GUIDANCE), "length {length:?}");
            assert!(!prompt.contains("CRITICAL"));
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        let a = build_prompt("Mosiah 2-5", "leadership", "deep");
        let b = build_prompt("Mosiah 2-5", "leadership", "deep");
        assert_eq!(a, b);
    }

    #[test]
    fn prompt_carries_request_fields() {
        let prompt = build_prompt("charity", "overcoming doubt", "brief");
        assert!(prompt.starts_with(BASE_PROMPT));
        assert!(prompt.contains("\nREFERENCE: charity\n"));
        assert!(prompt.contains("\nFOCUS: overcoming doubt\n"));
        assert!(prompt.ends_with("AUDIENCE: general\n"));
    }

    #[test]
    fn empty_focus_is_kept_as_empty_line() {
        let prompt = build_prompt("John 3", "", "standard");
        assert!(prompt.contains("\nFOCUS: \nLENGTH REQUIREMENT: "));
    }

    #[test]
    fn base_prompt_lists_all_fields() {
        for field in [
            "reference",
            "overview",
            "historical_context",
            "summary",
            "key_verses",
            "themes",
            "life_application",
            "reflection_questions",
            "cross_references",
        ] {
            assert!(BASE_PROMPT.contains(&format!("\"{field}\"")), "{field}");
        }
    }

    #[test]
    fn tier_parse_is_exact() {
        assert_eq!(LengthTier::parse("brief"), LengthTier::Brief);
        assert_eq!(LengthTier::parse("deep"), LengthTier::Deep);
        assert_eq!(LengthTier::parse("Deep"), LengthTier::Standard);
        assert_eq!(LengthTier::parse("whatever"), LengthTier::Standard);
    }
}
