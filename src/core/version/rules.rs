// ─── Rules ───
// Platform / feature gating for libraries and launch arguments.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::platform::{OsName, Platform};

/// Feature flags supplied by the caller (`is_demo_user`, `has_custom_resolution`, ...).
pub type FeatureSet = HashMap<String, bool>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rule {
    pub action: RuleAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<OsRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<HashMap<String, bool>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OsRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<OsName>,
    /// Accepted but never evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
}

impl Rule {
    pub fn allow() -> Self {
        Self {
            action: RuleAction::Allow,
            os: None,
            features: None,
        }
    }

    pub fn disallow() -> Self {
        Self {
            action: RuleAction::Disallow,
            os: None,
            features: None,
        }
    }

    pub fn with_os(mut self, name: OsName) -> Self {
        self.os.get_or_insert_with(OsRule::default).name = Some(name);
        self
    }

    pub fn with_arch(mut self, arch: &str) -> Self {
        self.os.get_or_insert_with(OsRule::default).arch = Some(arch.to_string());
        self
    }

    pub fn with_feature(mut self, key: &str, value: bool) -> Self {
        self.features
            .get_or_insert_with(HashMap::new)
            .insert(key.to_string(), value);
        self
    }

    /// Whether this rule's conditions hold. The action is not considered here.
    pub fn matches(&self, platform: &Platform, features: Option<&FeatureSet>) -> bool {
        let (os_ok, arch_ok) = match &self.os {
            None => (true, true),
            Some(os) => (
                os.name.map_or(true, |name| name == platform.os),
                os.arch
                    .as_deref()
                    .map_or(true, |arch| arch == platform.arch.as_str()),
            ),
        };

        let features_ok = match (&self.features, features) {
            (Some(required), Some(supplied)) => required
                .iter()
                .all(|(key, want)| supplied.get(key).map_or(true, |have| have == want)),
            _ => true,
        };

        os_ok && arch_ok && features_ok
    }
}

/// Evaluate a rule list for a platform and feature set.
///
/// - No rules → allowed.
/// - Rules are walked in order; a matching `disallow` denies immediately,
///   a matching `allow` allows immediately.
/// - Otherwise denied, whether or not an `allow` rule was present.
pub fn evaluate(rules: &[Rule], platform: &Platform, features: Option<&FeatureSet>) -> bool {
    if rules.is_empty() {
        return true;
    }

    let mut has_allow_rule = false;

    for rule in rules {
        let matched = rule.matches(platform, features);

        match rule.action {
            RuleAction::Disallow if matched => return false,
            RuleAction::Disallow => {}
            RuleAction::Allow => {
                has_allow_rule = true;
                if matched {
                    return true;
                }
            }
        }
    }

    if has_allow_rule {
        return false;
    }

    // Only non-matching disallow rules: still closed.
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::ArchBits;

    fn linux() -> Platform {
        Platform::new(OsName::Linux, ArchBits::X64)
    }

    fn windows() -> Platform {
        Platform::new(OsName::Windows, ArchBits::X64)
    }

    #[test]
    fn no_rules_means_allowed() {
        assert!(evaluate(&[], &linux(), None));
        assert!(evaluate(&[], &windows(), None));
    }

    #[test]
    fn unconditional_disallow_wins_over_later_allow() {
        let rules = vec![Rule::disallow(), Rule::allow()];
        assert!(!evaluate(&rules, &linux(), None));
        assert!(!evaluate(&rules, &windows(), None));
    }

    #[test]
    fn allow_for_other_os_denies() {
        let rules = vec![Rule::allow().with_os(OsName::Windows)];
        assert!(!evaluate(&rules, &linux(), None));
        assert!(evaluate(&rules, &windows(), None));
    }

    #[test]
    fn first_match_wins() {
        let rules = vec![Rule::allow(), Rule::disallow().with_os(OsName::Osx)];
        let osx = Platform::new(OsName::Osx, ArchBits::X64);
        assert!(evaluate(&rules, &linux(), None));
        // The unconditional allow is reached before the osx disallow.
        assert!(evaluate(&rules, &osx, None));

        let rules = vec![Rule::disallow().with_os(OsName::Osx), Rule::allow()];
        assert!(!evaluate(&rules, &osx, None));
        assert!(evaluate(&rules, &linux(), None));
    }

    #[test]
    fn non_matching_disallow_alone_is_closed() {
        let rules = vec![Rule::disallow().with_os(OsName::Windows)];
        assert!(!evaluate(&rules, &linux(), None));
    }

    #[test]
    fn arch_compares_against_bits() {
        let rules = vec![Rule::allow().with_arch("64")];
        assert!(evaluate(&rules, &linux(), None));
        let x32 = Platform::new(OsName::Linux, ArchBits::X32);
        assert!(!evaluate(&rules, &x32, None));
    }

    #[test]
    fn os_version_is_ignored() {
        let rule: Rule = serde_json::from_value(serde_json::json!({
            "action": "allow",
            "os": { "name": "linux", "version": "^10\\." }
        }))
        .unwrap();
        assert!(evaluate(&[rule], &linux(), None));
    }

    #[test]
    fn features_compare_only_supplied_keys() {
        let rules = vec![Rule::allow().with_feature("is_demo_user", true)];

        // No feature map: vacuously matched.
        assert!(evaluate(&rules, &linux(), None));

        let mut features = FeatureSet::new();
        features.insert("has_custom_resolution".into(), true);
        assert!(evaluate(&rules, &linux(), Some(&features)));

        features.insert("is_demo_user".into(), false);
        assert!(!evaluate(&rules, &linux(), Some(&features)));

        features.insert("is_demo_user".into(), true);
        assert!(evaluate(&rules, &linux(), Some(&features)));
    }

    #[test]
    fn unknown_action_is_rejected() {
        let parsed = serde_json::from_value::<Rule>(serde_json::json!({ "action": "maybe" }));
        assert!(parsed.is_err());
    }
}
