use regex::Regex;

/// Label assigned to traffic that matches no crawler signature.
pub const OTHER: &str = "Other";

/// A single classification rule: user-agent pattern → crawler label.
pub struct BotRule {
    pub label: &'static str,
    pub pattern: Regex,
}

/// Labels request records by matching crawler signatures in the user-agent.
///
/// Rules are evaluated in order and the first match wins, so a user-agent
/// carrying several signatures always gets the earliest listed label.
pub struct BotClassifier {
    rules: Vec<BotRule>,
}

impl BotClassifier {
    /// Create a classifier with the built-in crawler signature set.
    pub fn with_defaults() -> Self {
        let signatures = [
            "Googlebot",
            "Bingbot",
            "YandexBot",
            "AhrefsBot",
            "DuckDuckBot",
            "Baiduspider",
            "MJ12bot",
            "SemrushBot",
            "Sogou",
            "Exabot",
            "facebookexternalhit",
            "Facebot",
            "ia_archiver",
        ];
        let rules = signatures
            .iter()
            .filter_map(|&label| {
                Regex::new(&format!("(?i){}", label))
                    .ok()
                    .map(|pattern| BotRule { label, pattern })
            })
            .collect();
        Self { rules }
    }

    /// Classify a user-agent string. Returns [`OTHER`] when nothing matches,
    /// including for an empty user-agent.
    pub fn classify(&self, user_agent: &str) -> &'static str {
        for rule in &self.rules {
            if rule.pattern.is_match(user_agent) {
                return rule.label;
            }
        }
        OTHER
    }
}

impl Default for BotClassifier {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_googlebot() {
        let c = BotClassifier::with_defaults();
        let ua = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
        assert_eq!(c.classify(ua), "Googlebot");
    }

    #[test]
    fn test_classify_case_insensitive() {
        let c = BotClassifier::with_defaults();
        assert_eq!(c.classify("mozilla compatible BINGBOT/2.0"), "Bingbot");
    }

    #[test]
    fn test_classify_first_match_wins() {
        let c = BotClassifier::with_defaults();
        // Both signatures present: Googlebot is listed before Bingbot
        assert_eq!(c.classify("Bingbot pretending to be Googlebot"), "Googlebot");
    }

    #[test]
    fn test_classify_browser_is_other() {
        let c = BotClassifier::with_defaults();
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
        assert_eq!(c.classify(ua), OTHER);
    }

    #[test]
    fn test_classify_empty_is_other() {
        let c = BotClassifier::with_defaults();
        assert_eq!(c.classify(""), OTHER);
    }

    #[test]
    fn test_classify_facebook_variants() {
        let c = BotClassifier::with_defaults();
        assert_eq!(
            c.classify("facebookexternalhit/1.1 (+http://www.facebook.com)"),
            "facebookexternalhit"
        );
        assert_eq!(c.classify("Facebot/1.0"), "Facebot");
    }
}
