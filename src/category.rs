//! Category classification for channels that do not carry an explicit
//! category column. Rules are checked in order; the first match wins.

use serde::{Deserialize, Serialize};

/// One classification rule. It matches when the channel number falls inside
/// the configured bounds, or when the upper-cased code contains a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    #[serde(default)]
    pub min_number: Option<u32>,
    #[serde(default)]
    pub max_number: Option<u32>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CategoryRule {
    fn new(category: &str, keywords: &[&str]) -> Self {
        Self {
            category: category.to_string(),
            min_number: None,
            max_number: None,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn number_matches(&self, number: Option<u32>) -> bool {
        if self.min_number.is_none() && self.max_number.is_none() {
            return false;
        }
        match number {
            Some(n) => {
                self.min_number.map_or(true, |min| n >= min)
                    && self.max_number.map_or(true, |max| n <= max)
            }
            None => false,
        }
    }

    fn keyword_matches(&self, upper_code: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && upper_code.contains(&k.to_uppercase()))
    }

    pub fn matches(&self, number: Option<u32>, code: &str) -> bool {
        self.number_matches(number) || self.keyword_matches(&code.to_uppercase())
    }
}

/// Ordered rule list plus the category used when nothing matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classifier {
    #[serde(default = "Classifier::default_fallback")]
    pub fallback: String,
    #[serde(default = "Classifier::default_rules")]
    pub rules: Vec<CategoryRule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            fallback: Self::default_fallback(),
            rules: Self::default_rules(),
        }
    }
}

impl Classifier {
    fn default_fallback() -> String {
        "TV".to_string()
    }

    /// The lineup rules used for a typical US satellite package.
    pub fn default_rules() -> Vec<CategoryRule> {
        vec![
            CategoryRule {
                max_number: Some(69),
                ..CategoryRule::new("Local", &[])
            },
            CategoryRule::new(
                "News",
                &["CNN", "HLN", "MSNBC", "NEWS", "CSPAN", "CNBC", "OAN", "WEATH"],
            ),
            CategoryRule::new("Sports", &["ESPN", "NFL", "NHL", "MLB", "FOXS1"]),
            CategoryRule::new("Kids", &["NICK", "DIS", "TOON", "BABY"]),
            CategoryRule::new(
                "Faith",
                &["TBN", "BIBLE", "EWTN", "CTN", "INSP", "3ABN", "VICTR"],
            ),
            CategoryRule::new(
                "Shop",
                &["HSN", "QVC", "SHOP", "BUY", "MALL", "SALE", "JTV", "VALU"],
            ),
            CategoryRule {
                min_number: Some(900),
                ..CategoryRule::new("Music", &["AUD", "CD", "LMUSC", "OTTO"])
            },
            CategoryRule::new(
                "Intl",
                &["PRTGS", "VIX", "HITN", "TODOC", "TONOM", "ES24", "ENLC", "SIC", "RTPI"],
            ),
        ]
    }

    pub fn classify(&self, number: Option<u32>, code: &str) -> &str {
        self.rules
            .iter()
            .find(|r| r.matches(number, code))
            .map(|r| r.category.as_str())
            .unwrap_or(self.fallback.as_str())
    }
}
