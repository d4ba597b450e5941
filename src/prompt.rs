use serde::{Deserialize, Serialize};

/// What the model should produce from the transcript
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    #[default]
    Summary,
    KeyPoints,
    Keywords,
}

impl OutputMode {
    pub const ALL: [OutputMode; 3] = [OutputMode::Summary, OutputMode::KeyPoints, OutputMode::Keywords];

    /// Heading shown above the generated text
    pub fn label(&self) -> &'static str {
        match self {
            OutputMode::Summary => "Summary",
            OutputMode::KeyPoints => "Key Points",
            OutputMode::Keywords => "Keywords",
        }
    }

    /// Form/flag value, matching the serde and clap names
    pub fn value(&self) -> &'static str {
        match self {
            OutputMode::Summary => "summary",
            OutputMode::KeyPoints => "key-points",
            OutputMode::Keywords => "keywords",
        }
    }
}

/// Requested summary length. Only used when the mode is `Summary`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LengthTier {
    #[default]
    Short,
    Medium,
    Detailed,
}

impl LengthTier {
    pub const ALL: [LengthTier; 3] = [LengthTier::Short, LengthTier::Medium, LengthTier::Detailed];

    pub fn label(&self) -> &'static str {
        match self {
            LengthTier::Short => "Short (1-2 sentences)",
            LengthTier::Medium => "Medium",
            LengthTier::Detailed => "Detailed",
        }
    }

    /// First word of the label, lowercased: "short", "medium", "detailed"
    pub fn descriptor(&self) -> String {
        self.label()
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }

    pub fn max_tokens(&self) -> u32 {
        match self {
            LengthTier::Short => 100,
            LengthTier::Medium => 200,
            LengthTier::Detailed => 300,
        }
    }

    pub fn value(&self) -> &'static str {
        match self {
            LengthTier::Short => "short",
            LengthTier::Medium => "medium",
            LengthTier::Detailed => "detailed",
        }
    }
}

/// Output language. The display name goes into the prompt verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
    German,
    Chinese,
    Japanese,
    Korean,
    Hindi,
    Portuguese,
    Russian,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Chinese,
        Language::Japanese,
        Language::Korean,
        Language::Hindi,
        Language::Portuguese,
        Language::Russian,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Chinese => "Chinese",
            Language::Japanese => "Japanese",
            Language::Korean => "Korean",
            Language::Hindi => "Hindi",
            Language::Portuguese => "Portuguese",
            Language::Russian => "Russian",
        }
    }

    pub fn value(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Spanish => "spanish",
            Language::French => "french",
            Language::German => "german",
            Language::Chinese => "chinese",
            Language::Japanese => "japanese",
            Language::Korean => "korean",
            Language::Hindi => "hindi",
            Language::Portuguese => "portuguese",
            Language::Russian => "russian",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One user action's choices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryRequest {
    pub mode: OutputMode,
    pub length: Option<LengthTier>,
    pub language: Language,
}

/// Instruction text plus the output token cap for the completion call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub max_tokens: u32,
}

impl Prompt {
    pub fn build(request: &SummaryRequest, transcript: &str) -> Self {
        let language = request.language;
        match request.mode {
            OutputMode::Summary => {
                // An unset tier is the first option every front end offers.
                let tier = request.length.unwrap_or_default();
                Prompt {
                    text: format!(
                        "Write a {} summary of the following text in {language}.\n\n{transcript}",
                        tier.descriptor()
                    ),
                    max_tokens: tier.max_tokens(),
                }
            }
            OutputMode::KeyPoints => Prompt {
                text: format!(
                    "Extract the key points as bullet points from the following text in {language}:\n\n{transcript}"
                ),
                max_tokens: 300,
            },
            OutputMode::Keywords => Prompt {
                text: format!(
                    "List the main topics and keywords from the following text, separated by commas, in {language}:\n\n{transcript}"
                ),
                max_tokens: 100,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(mode: OutputMode, length: Option<LengthTier>, language: Language) -> SummaryRequest {
        SummaryRequest { mode, length, language }
    }

    #[test]
    fn test_tier_descriptor_strips_suffix() {
        assert_eq!(LengthTier::Short.label(), "Short (1-2 sentences)");
        assert_eq!(LengthTier::Short.descriptor(), "short");
        assert_eq!(LengthTier::Medium.descriptor(), "medium");
        assert_eq!(LengthTier::Detailed.descriptor(), "detailed");
    }

    #[test]
    fn test_short_summary() {
        let p = Prompt::build(&request(OutputMode::Summary, Some(LengthTier::Short), Language::French), "text");
        assert_eq!(p.max_tokens, 100);
        assert_eq!(p.text, "Write a short summary of the following text in French.\n\ntext");
    }

    #[test]
    fn test_medium_summary() {
        let p = Prompt::build(
            &request(OutputMode::Summary, Some(LengthTier::Medium), Language::English),
            "some transcript",
        );
        assert_eq!(p.max_tokens, 200);
        assert_eq!(
            p.text,
            "Write a medium summary of the following text in English.\n\nsome transcript"
        );
    }

    #[test]
    fn test_detailed_summary_budget() {
        let p = Prompt::build(&request(OutputMode::Summary, Some(LengthTier::Detailed), Language::Hindi), "x");
        assert_eq!(p.max_tokens, 300);
    }

    #[test]
    fn test_summary_without_tier_is_short() {
        let p = Prompt::build(&request(OutputMode::Summary, None, Language::English), "x");
        assert!(p.text.starts_with("Write a short summary"));
        assert_eq!(p.max_tokens, 100);
    }

    #[test]
    fn test_summary_prompt_names_language() {
        for language in Language::ALL {
            for tier in LengthTier::ALL {
                let p = Prompt::build(&request(OutputMode::Summary, Some(tier), language), "x");
                assert!(p.text.starts_with("Write a "));
                assert!(p.text.contains(language.name()));
            }
        }
    }

    #[test]
    fn test_key_points_ignores_tier() {
        for tier in [None, Some(LengthTier::Short), Some(LengthTier::Medium), Some(LengthTier::Detailed)] {
            let p = Prompt::build(&request(OutputMode::KeyPoints, tier, Language::Spanish), "t");
            assert_eq!(p.max_tokens, 300);
            assert_eq!(
                p.text,
                "Extract the key points as bullet points from the following text in Spanish:\n\nt"
            );
        }
    }

    #[test]
    fn test_keywords_ignores_tier() {
        for tier in [None, Some(LengthTier::Short), Some(LengthTier::Detailed)] {
            let p = Prompt::build(&request(OutputMode::Keywords, tier, Language::German), "t");
            assert_eq!(p.max_tokens, 100);
            assert_eq!(
                p.text,
                "List the main topics and keywords from the following text, separated by commas, in German:\n\nt"
            );
        }
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(OutputMode::Summary.label(), "Summary");
        assert_eq!(OutputMode::KeyPoints.label(), "Key Points");
        assert_eq!(OutputMode::Keywords.label(), "Keywords");
    }

    #[test]
    fn test_serde_values_match_value() {
        for mode in OutputMode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.value()));
        }
        for tier in LengthTier::ALL {
            let json = serde_json::to_string(&tier).unwrap();
            assert_eq!(json, format!("\"{}\"", tier.value()));
        }
        for language in Language::ALL {
            let json = serde_json::to_string(&language).unwrap();
            assert_eq!(json, format!("\"{}\"", language.value()));
        }
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(serde_json::from_str::<OutputMode>("\"essay\"").is_err());
    }
}
