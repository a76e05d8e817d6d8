//! Deterministic keyword classifier (fallback tier)
//!
//! Pure function of the complaint text and the catalog: junk screening, keyword priority
//! tiers and fuzzy category-name matching. All lengths count characters, not bytes.

use crate::classifier::ComplaintClassifier;
use aho_corasick::AhoCorasick;
use hakim_core::{
    Category, ClassificationRequest, ClassificationResult, Error, Priority, Rejection, Result,
    Tier, Verdict,
};
use regex::Regex;
use tracing::debug;

/// Reason shown to the submitter when the junk screen fires
pub const JUNK_REJECTION_REASON: &str = "الشكوى غير صالحة أو غير واضحة";

const MIN_TITLE_CHARS: usize = 5;
const MIN_DESCRIPTION_CHARS: usize = 10;
/// Spam tokens only count in texts shorter than this
const SPAM_WINDOW_CHARS: usize = 50;

const DEFAULT_CONFIDENCE: f32 = 0.7;
const FULL_NAME_CONFIDENCE: f32 = 0.8;
const WORD_MATCH_CONFIDENCE: f32 = 0.6;
const FALLBACK_CONFIDENCE: f32 = 0.5;
const MIN_MATCH_WORD_CHARS: usize = 3;
const SUMMARY_CHARS: usize = 100;

const SPAM_TOKENS: &[&str] = &[
    "test", "testing", "asdf", "qwerty", "aaaa", "1234", "xxxx", "تجربة", "تست", "اختبار فقط",
    "ههههه", "هاها", "lol", "haha",
];

const ABUSIVE_TOKENS: &[&str] = &["حمار", "غبي", "كلب", "خنزير", "لعنة"];

/// Five or more of the same character from a small mashing alphabet
const FLOOD_PATTERN: &str = r"a{5}|x{5}|ا{5}|ه{5}|\.{5}";

/// Checked in order; the first tier that matches wins
const PRIORITY_TIERS: &[(Priority, f32, &[&str])] = &[
    (
        Priority::Critical,
        0.85,
        &[
            "urgent", "emergency", "critical", "danger", "fire", "explosion", "طوارئ", "عاجل",
            "خطر", "حريق", "انفجار",
        ],
    ),
    (
        Priority::High,
        0.8,
        &["important", "serious", "outage", "مهم", "خطير", "انقطاع"],
    ),
    (
        Priority::Low,
        0.75,
        &["minor", "small", "inquiry", "بسيط", "صغير", "استفسار"],
    ),
];

/// Why the junk screen rejected a complaint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JunkReason {
    /// Title or description below the minimum length
    TooShort,
    /// Short text containing a placeholder or spam token
    SpamToken,
    /// Abusive language, regardless of length
    Abusive,
    /// Keyboard mashing such as "aaaaa" or "....."
    Flood,
}

/// Keyword-based fallback classifier
pub struct HeuristicClassifier {
    name: String,
    spam: AhoCorasick,
    abusive: AhoCorasick,
    flood: Regex,
    priority_tiers: Vec<(Priority, f32, AhoCorasick)>,
}

impl HeuristicClassifier {
    /// Create a new heuristic classifier
    pub fn new() -> Result<Self> {
        let priority_tiers = PRIORITY_TIERS
            .iter()
            .map(|(priority, confidence, keywords)| {
                Ok((*priority, *confidence, build_matcher(keywords)?))
            })
            .collect::<Result<Vec<_>>>()?;

        let flood = Regex::new(FLOOD_PATTERN)
            .map_err(|e| Error::internal(format!("Failed to build flood detector: {}", e)))?;

        Ok(Self {
            name: "heuristic".to_string(),
            spam: build_matcher(SPAM_TOKENS)?,
            abusive: build_matcher(ABUSIVE_TOKENS)?,
            flood,
            priority_tiers,
        })
    }

    /// Run the junk screen, returning the first rule that fires
    pub fn screen(&self, title: &str, description: &str) -> Option<JunkReason> {
        if char_len(title.trim()) < MIN_TITLE_CHARS
            || char_len(description.trim()) < MIN_DESCRIPTION_CHARS
        {
            return Some(JunkReason::TooShort);
        }

        let text = format!("{} {}", title, description).to_lowercase();

        if char_len(&text) < SPAM_WINDOW_CHARS && self.spam.is_match(&text) {
            return Some(JunkReason::SpamToken);
        }

        if self.abusive.is_match(&text) {
            return Some(JunkReason::Abusive);
        }

        if self.flood.is_match(&text) {
            return Some(JunkReason::Flood);
        }

        None
    }

    /// Whether the complaint is spam, abusive or too low-effort to process
    pub fn is_junk(&self, title: &str, description: &str) -> bool {
        self.screen(title, description).is_some()
    }

    /// Priority and its tier confidence for lowercased text
    pub fn infer_priority(&self, text: &str) -> (Priority, f32) {
        self.priority_tiers
            .iter()
            .find(|(_, _, matcher)| matcher.is_match(text))
            .map(|(priority, confidence, _)| (*priority, *confidence))
            .unwrap_or((Priority::Medium, DEFAULT_CONFIDENCE))
    }

    /// Classify synchronously
    pub fn evaluate(&self, request: &ClassificationRequest) -> Verdict {
        if let Some(reason) = self.screen(&request.title, &request.description) {
            debug!(?reason, "Complaint rejected by junk screen");
            return Verdict::Rejected(Rejection::new(Tier::Heuristic, JUNK_REJECTION_REASON));
        }

        let text = request.combined_text();
        let (priority, confidence) = self.infer_priority(&text);

        let mut result = ClassificationResult::new(
            Tier::Heuristic,
            priority,
            confidence,
            summarize(&request.description),
        );

        if let Some((category, confidence)) = infer_category(&text, &request.available_categories)
        {
            result.assign(category);
            result.set_confidence(confidence);
        }

        Verdict::Classified(result)
    }
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self::new().expect("Failed to create heuristic classifier")
    }
}

#[async_trait::async_trait]
impl ComplaintClassifier for HeuristicClassifier {
    async fn classify(&self, request: &ClassificationRequest) -> Result<Verdict> {
        Ok(self.evaluate(request))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tier(&self) -> Tier {
        Tier::Heuristic
    }
}

/// Match a category name against lowercased complaint text.
///
/// A full canonical or localized name match wins immediately. Otherwise every category is
/// scanned word by word and the last one with a matching word (longer than three
/// characters) is kept. With no match at all, the first category is the low-confidence
/// default.
pub fn infer_category<'a>(text: &str, categories: &'a [Category]) -> Option<(&'a Category, f32)> {
    let mut word_match = None;

    for category in categories {
        let name = category.name.to_lowercase();
        let localized = category.name_localized.to_lowercase();

        if contains_name(text, &name) || contains_name(text, &localized) {
            return Some((category, FULL_NAME_CONFIDENCE));
        }

        let words = name.split_whitespace().chain(localized.split_whitespace());
        for word in words {
            if char_len(word) > MIN_MATCH_WORD_CHARS && text.contains(word) {
                word_match = Some((category, WORD_MATCH_CONFIDENCE));
            }
        }
    }

    word_match.or_else(|| categories.first().map(|c| (c, FALLBACK_CONFIDENCE)))
}

/// The description, cut to 100 characters with a trailing "..." when longer
pub fn summarize(description: &str) -> String {
    if char_len(description) > SUMMARY_CHARS {
        let mut summary: String = description.chars().take(SUMMARY_CHARS).collect();
        summary.push_str("...");
        summary
    } else {
        description.to_string()
    }
}

fn contains_name(text: &str, name: &str) -> bool {
    !name.is_empty() && text.contains(name)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn build_matcher(patterns: &[&str]) -> Result<AhoCorasick> {
    AhoCorasick::new(patterns)
        .map_err(|e| Error::internal(format!("Failed to build keyword matcher: {}", e)))
}
