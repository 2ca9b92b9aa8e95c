use configuration::error::ConfigError;
use configuration::{SegmentRuleConfig, SegmentationConfig};

/// A validated, ordered segment rule table.
///
/// Classification is total: rules are tried in order and any score triple
/// matched by none of them receives the fallback label.
#[derive(Debug, Clone)]
pub struct SegmentRules {
    rules: Vec<SegmentRuleConfig>,
    fallback: String,
}

impl SegmentRules {
    pub fn from_config(config: &SegmentationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rules: config.rules.clone(),
            fallback: config.fallback_label.clone(),
        })
    }

    /// The label of the first rule that contains all three scores.
    pub fn classify(&self, r: u8, f: u8, m: u8) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.r.contains(r) && rule.f.contains(f) && rule.m.contains(m))
            .map_or(self.fallback.as_str(), |rule| rule.label.as_str())
    }

    /// Every distinct label in rule order, the fallback last.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::with_capacity(self.rules.len() + 1);
        let candidates = self
            .rules
            .iter()
            .map(|rule| rule.label.as_str())
            .chain(std::iter::once(self.fallback.as_str()));
        for label in candidates {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }
}

impl Default for SegmentRules {
    fn default() -> Self {
        let config = SegmentationConfig::default();
        Self {
            rules: config.rules,
            fallback: config.fallback_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::ScoreRange;

    #[test]
    fn default_table_covers_every_combination() {
        let rules = SegmentRules::default();
        let labels = rules.labels();
        for r in 1..=5 {
            for f in 1..=5 {
                for m in 1..=5 {
                    let label = rules.classify(r, f, m);
                    assert!(labels.contains(&label), "({},{},{}) -> {}", r, f, m, label);
                }
            }
        }
    }

    #[test]
    fn default_table_matches_documented_rules() {
        let rules = SegmentRules::default();
        assert_eq!(rules.classify(5, 5, 5), "Champions");
        assert_eq!(rules.classify(4, 4, 4), "Champions");
        assert_eq!(rules.classify(5, 1, 5), "New Customers");
        assert_eq!(rules.classify(4, 3, 1), "Recent Customers");
        assert_eq!(rules.classify(5, 5, 3), "Recent Customers");
        assert_eq!(rules.classify(1, 5, 5), "At Risk");
        assert_eq!(rules.classify(2, 1, 1), "Lost");
        assert_eq!(rules.classify(3, 3, 3), "Others");
        assert_eq!(rules.classify(1, 2, 3), "Others");
    }

    #[test]
    fn first_matching_rule_wins() {
        let config = SegmentationConfig {
            fallback_label: "Rest".to_string(),
            rules: vec![
                SegmentRuleConfig {
                    label: "Big spenders".to_string(),
                    r: ScoreRange::default(),
                    f: ScoreRange::default(),
                    m: ScoreRange { min: 5, max: 5 },
                },
                SegmentRuleConfig::new("Recent", (5, 5), (1, 5), (1, 5)),
            ],
        };
        let rules = SegmentRules::from_config(&config).unwrap();

        assert_eq!(rules.classify(5, 1, 5), "Big spenders");
        assert_eq!(rules.classify(5, 1, 4), "Recent");
        assert_eq!(rules.classify(1, 1, 1), "Rest");
    }

    #[test]
    fn labels_are_unique_and_end_with_fallback() {
        let config = SegmentationConfig {
            fallback_label: "Others".to_string(),
            rules: vec![
                SegmentRuleConfig::new("Active", (5, 5), (1, 5), (1, 5)),
                SegmentRuleConfig::new("Active", (4, 4), (4, 5), (1, 5)),
            ],
        };
        let rules = SegmentRules::from_config(&config).unwrap();
        assert_eq!(rules.labels(), vec!["Active", "Others"]);
    }

    #[test]
    fn invalid_table_is_rejected() {
        let config = SegmentationConfig {
            fallback_label: "  ".to_string(),
            rules: vec![],
        };
        assert!(SegmentRules::from_config(&config).is_err());
    }
}
