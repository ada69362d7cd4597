use lazy_static::lazy_static;
use regex::{NoExpand, Regex};

use crate::{error::RuleMismatch, TARGET_PRAGMA};

lazy_static! {
    static ref PRAGMA_REGEX: Regex =
        Regex::new(r"pragma solidity \^\d+\.\d+\.\d+").expect("valid pragma pattern");
    static ref CONTRACT_NAME_REGEX: Regex =
        Regex::new(r"\bcontract Verifier\b").expect("valid contract name pattern");
}

/// A single `(pattern, replacement)` pair. Only the first match of `pattern` is ever replaced.
#[derive(Clone, Debug)]
pub struct RewriteRule {
    pattern: Regex,
    replacement: String,
}

/// What happened when a rule was run against a text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleResult {
    /// The pattern matched and its first occurrence was replaced. The replacement may be identical
    /// to the matched text.
    Rewritten(String),
    /// The pattern is absent, but the replacement is already there.
    AlreadyApplied,
}

impl RewriteRule {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    /// Bumps a caret compiler pragma (`pragma solidity ^X.Y.Z`) to [`TARGET_PRAGMA`].
    pub fn pragma() -> Self {
        Self {
            pattern: PRAGMA_REGEX.clone(),
            replacement: TARGET_PRAGMA.to_string(),
        }
    }

    /// Renames the generic `contract Verifier` declaration to `contract <name>`.
    pub fn contract_name(name: &str) -> Self {
        Self {
            pattern: CONTRACT_NAME_REGEX.clone(),
            replacement: format!("contract {name}"),
        }
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn apply(&self, text: &str) -> Result<RuleResult, RuleMismatch> {
        if self.pattern.is_match(text) {
            let rewritten = self.pattern.replace(text, NoExpand(&self.replacement));
            return Ok(RuleResult::Rewritten(rewritten.into_owned()));
        }

        match text.contains(&self.replacement) {
            true => Ok(RuleResult::AlreadyApplied),
            false => Err(RuleMismatch {
                pattern: self.pattern.as_str().to_string(),
            }),
        }
    }
}

/// Result of running a whole rule set over one text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchedSource {
    pub text: String,
    /// Number of rules whose pattern matched.
    pub rewritten: usize,
    /// Number of rules that found the text already in patched form.
    pub already_applied: usize,
}

/// Run `rules` over `text` left to right, each rule seeing the output of the previous one.
pub fn patch_source(text: &str, rules: &[RewriteRule]) -> Result<PatchedSource, RuleMismatch> {
    let mut patched = PatchedSource {
        text: text.to_string(),
        rewritten: 0,
        already_applied: 0,
    };

    for rule in rules {
        match rule.apply(&patched.text)? {
            RuleResult::Rewritten(text) => {
                patched.text = text;
                patched.rewritten += 1;
            }
            RuleResult::AlreadyApplied => patched.already_applied += 1,
        }
    }

    Ok(patched)
}

#[cfg(test)]
mod tests {
    use assert2::assert;
    use rstest::rstest;

    use super::*;

    const GENERATED: &str = "// SPDX-License-Identifier: GPL-3.0\n\
        pragma solidity ^0.6.11;\n\
        library Pairing {\n    uint256 constant PRIME_Q = 1;\n}\n\
        contract Verifier {\n    using Pairing for *;\n}\n";

    fn init_rules() -> Vec<RewriteRule> {
        vec![RewriteRule::pragma(), RewriteRule::contract_name("InitVerifier")]
    }

    #[test]
    fn rewrites_pragma_and_declaration() {
        let patched = patch_source(GENERATED, &init_rules()).unwrap();

        let expected = GENERATED
            .replacen("pragma solidity ^0.6.11", "pragma solidity ^0.8.0", 1)
            .replacen("contract Verifier {", "contract InitVerifier {", 1);
        assert!(patched.text == expected);
        assert!(patched.rewritten == 2);
        assert!(patched.already_applied == 0);
    }

    #[test]
    fn only_first_occurrence_is_replaced() {
        let rule = RewriteRule::contract_name("InitVerifier");
        let text = "contract Verifier {}\ncontract Verifier {}\n";

        assert!(
            rule.apply(text).unwrap()
                == RuleResult::Rewritten("contract InitVerifier {}\ncontract Verifier {}\n".to_string())
        );
    }

    #[test]
    fn other_lines_are_untouched() {
        let patched = patch_source(GENERATED, &init_rules()).unwrap();

        let changed = GENERATED
            .lines()
            .zip(patched.text.lines())
            .filter(|(before, after)| before != after)
            .map(|(before, _)| before)
            .collect::<Vec<_>>();
        assert!(changed == vec!["pragma solidity ^0.6.11;", "contract Verifier {"]);
        assert!(GENERATED.lines().count() == patched.text.lines().count());
    }

    #[test]
    fn patching_is_idempotent() {
        let once = patch_source(GENERATED, &init_rules()).unwrap();
        let twice = patch_source(&once.text, &init_rules()).unwrap();

        assert!(twice.text.as_bytes() == once.text.as_bytes());
        // The pragma pattern still matches the bumped pragma and rewrites it to itself.
        assert!(twice.rewritten == 1);
        assert!(twice.already_applied == 1);
    }

    #[rstest]
    #[case::range_pragma("pragma solidity >=0.7.0 <0.9.0;\ncontract Verifier {}\n", r"\^")]
    #[case::renamed_upstream("pragma solidity ^0.6.11;\ncontract Groth16Verifier {}\n", "Verifier")]
    fn stale_rules_are_reported(#[case] source: &str, #[case] pattern_fragment: &str) {
        let mismatch = patch_source(source, &init_rules()).unwrap_err();
        assert!(mismatch.pattern.contains(pattern_fragment));
    }

    #[test]
    fn name_rule_respects_word_boundaries() {
        let rule = RewriteRule::contract_name("GuessVerifier");
        assert!(rule.apply("contract VerifierBase {}").is_err());
        assert!(
            rule.apply("contract Verifier {}").unwrap()
                == RuleResult::Rewritten("contract GuessVerifier {}".to_string())
        );
    }

    #[test]
    fn replacement_is_taken_literally() {
        let rule = RewriteRule::new("Verifier", "$0Renamed").unwrap();
        assert!(rule.apply("Verifier").unwrap() == RuleResult::Rewritten("$0Renamed".to_string()));
    }
}
