//! Turn classification: keyword matching by default, with an optional
//! single-shot LLM path.

use std::sync::Arc;

use async_trait::async_trait;

use wxchat_core::Runnable;

use crate::Category;

/// How keywords are tested against the message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeywordMatch {
    /// Keyword appears anywhere in the lower-cased message, including inside
    /// a longer word ("deployments" matches "deployment", but "today" also
    /// matches "da").
    #[default]
    Substring,
    /// Keyword must match a whole word, split on non-alphanumeric characters.
    WholeWord,
}

/// Keyword sets are configuration, not fixed behavior: deployments tend to
/// grow their own slang for these services.
#[derive(Clone, Debug)]
pub struct ClassifierConfig {
    pub powervs_keywords: Vec<String>,
    pub schematics_keywords: Vec<String>,
    pub match_mode: KeywordMatch,
    pub default: Category,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            powervs_keywords: ["power", "powervs", "pvs"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            schematics_keywords: ["deployment", "schematics", "sch", "da", "das"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            match_mode: KeywordMatch::default(),
            default: Category::PowerVs,
        }
    }
}

/// Assigns a [`Category`] to the latest user message. Implementations never
/// fail; anything unclassifiable resolves to the configured default.
#[async_trait]
pub trait Classify: Send + Sync {
    async fn classify(&self, message: &str) -> Category;
}

/// Deterministic classifier: lower-cases the message and tests the configured
/// keyword sets against it, substring containment by default. A powervs hit
/// wins ties; no hit at all falls back to the default.
#[derive(Clone, Debug, Default)]
pub struct KeywordClassifier {
    config: ClassifierConfig,
}

impl KeywordClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Classify for KeywordClassifier {
    async fn classify(&self, message: &str) -> Category {
        let lowered = message.to_lowercase();
        let hit = |keywords: &[String]| {
            keywords.iter().any(|k| match self.config.match_mode {
                KeywordMatch::Substring => lowered.contains(k.as_str()),
                KeywordMatch::WholeWord => lowered
                    .split(|c: char| !c.is_alphanumeric())
                    .any(|word| word == k),
            })
        };

        if hit(&self.config.powervs_keywords) {
            Category::PowerVs
        } else if hit(&self.config.schematics_keywords) {
            Category::Schematics
        } else {
            self.config.default
        }
    }
}

/// One-shot LLM classifier. Sends a fixed instruction prompt through the
/// bare text-generation path and parses the trimmed, lower-cased completion.
/// A malformed reply or a provider failure is silently coerced to the
/// default category; no retries.
pub struct LlmClassifier {
    model: Arc<dyn Runnable<String, String> + Send + Sync>,
    default: Category,
}

impl LlmClassifier {
    pub fn new(model: Arc<dyn Runnable<String, String> + Send + Sync>) -> Self {
        Self {
            model,
            default: Category::PowerVs,
        }
    }

    pub fn with_default(mut self, default: Category) -> Self {
        self.default = default;
        self
    }

    fn prompt(message: &str) -> String {
        format!(
            "You are a classifier. Classify the following sentence as 'powervs' or 'schematics' for agent selection.\n\
             Respond with exactly one word: either 'powervs' or 'schematics'. No punctuation, no line breaks, no explanations.\n\
             Sentence: {message}\n\
             Response:"
        )
    }
}

#[async_trait]
impl Classify for LlmClassifier {
    async fn classify(&self, message: &str) -> Category {
        match self.model.invoke(Self::prompt(message)).await {
            Ok(response) => {
                let label = response.trim().to_lowercase();
                Category::from_label(&label).unwrap_or_else(|| {
                    tracing::warn!(reply = %label, "unparseable classification, using default");
                    self.default
                })
            }
            Err(err) => {
                tracing::warn!(error = %err, "classification call failed, using default");
                self.default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wxchat_core::WxchatError;

    #[tokio::test]
    async fn keyword_classifier_picks_schematics() {
        let classifier = KeywordClassifier::default();
        assert_eq!(
            classifier.classify("list schematics deployments").await,
            Category::Schematics
        );
        assert_eq!(classifier.classify("show my DAs").await, Category::Schematics);
    }

    #[tokio::test]
    async fn keyword_classifier_picks_powervs() {
        let classifier = KeywordClassifier::default();
        assert_eq!(
            classifier.classify("What PowerVS workspaces exist?").await,
            Category::PowerVs
        );
        assert_eq!(
            classifier.classify("pvs instances please").await,
            Category::PowerVs
        );
    }

    #[tokio::test]
    async fn keyword_classifier_defaults_when_no_match() {
        let classifier = KeywordClassifier::default();
        assert_eq!(classifier.classify("hello there").await, Category::PowerVs);
        assert_eq!(classifier.classify("").await, Category::PowerVs);
    }

    #[tokio::test]
    async fn keyword_classifier_powervs_wins_ties() {
        let classifier = KeywordClassifier::default();
        assert_eq!(
            classifier.classify("power schematics").await,
            Category::PowerVs
        );
    }

    #[tokio::test]
    async fn keyword_matching_uses_containment() {
        let classifier = KeywordClassifier::default();
        assert_eq!(
            classifier.classify("list deployments").await,
            Category::Schematics
        );
        // "today" contains "da"; containment trips the schematics set.
        assert_eq!(
            classifier.classify("what happened today").await,
            Category::Schematics
        );
    }

    #[tokio::test]
    async fn whole_word_mode_ignores_embedded_keywords() {
        let classifier = KeywordClassifier::new(ClassifierConfig {
            match_mode: KeywordMatch::WholeWord,
            ..Default::default()
        });
        assert_eq!(
            classifier.classify("what happened today").await,
            Category::PowerVs
        );
        assert_eq!(classifier.classify("show my das").await, Category::Schematics);
    }

    struct FixedModel(Result<String, String>);

    #[async_trait]
    impl Runnable<String, String> for FixedModel {
        async fn invoke(&self, _input: String) -> Result<String, WxchatError> {
            match &self.0 {
                Ok(content) => Ok(content.clone()),
                Err(msg) => Err(WxchatError::LlmProvider(msg.clone())),
            }
        }
    }

    #[tokio::test]
    async fn llm_classifier_parses_trimmed_reply() {
        let model = Arc::new(FixedModel(Ok(" Schematics \n".to_string())));
        let classifier = LlmClassifier::new(model);
        assert_eq!(classifier.classify("anything").await, Category::Schematics);
    }

    #[tokio::test]
    async fn llm_classifier_defaults_on_garbage() {
        let model = Arc::new(FixedModel(Ok("both, probably".to_string())));
        let classifier = LlmClassifier::new(model);
        assert_eq!(classifier.classify("anything").await, Category::PowerVs);
    }

    #[tokio::test]
    async fn llm_classifier_defaults_on_provider_error() {
        let model = Arc::new(FixedModel(Err("boom".to_string())));
        let classifier = LlmClassifier::new(model).with_default(Category::Schematics);
        assert_eq!(classifier.classify("anything").await, Category::Schematics);
    }
}
