pub mod presets;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::debug;

use crate::core::error::{RestyleError, Result};

pub use presets::{lookup, missing_stylesheets, resolve, Preset, PRESETS};

/// How a rule's pattern is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Exact substring; replacement is inserted verbatim
    Literal,

    /// Regular expression; replacement may reference groups as `${1}`
    Regex,
}

/// Static definition of a substitution rule.
///
/// Specs are plain data so preset tables can live in `static` slices. They are
/// turned into matchers by [`RuleSet::compile`].
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RuleSpec {
    pub name: &'static str,
    pub kind: PatternKind,
    pub pattern: &'static str,
    pub replacement: &'static str,

    /// `^` and `$` match at line boundaries
    pub multi_line: bool,

    /// `.` also matches `\n`
    pub dot_all: bool,

    /// Skip the rule when the text already contains any of these
    pub unless: &'static [&'static str],

    /// Run the rule only when the text contains this
    pub only_if: Option<&'static str>,
}

impl RuleSpec {
    pub const fn literal(name: &'static str, pattern: &'static str, replacement: &'static str) -> Self {
        Self {
            name,
            kind: PatternKind::Literal,
            pattern,
            replacement,
            multi_line: false,
            dot_all: false,
            unless: &[],
            only_if: None,
        }
    }

    pub const fn regex(name: &'static str, pattern: &'static str, replacement: &'static str) -> Self {
        Self {
            kind: PatternKind::Regex,
            ..Self::literal(name, pattern, replacement)
        }
    }

    pub const fn multi_line(self) -> Self {
        Self {
            multi_line: true,
            ..self
        }
    }

    pub const fn dot_all(self) -> Self {
        Self {
            dot_all: true,
            ..self
        }
    }

    pub const fn unless(self, markers: &'static [&'static str]) -> Self {
        Self {
            unless: markers,
            ..self
        }
    }

    pub const fn only_if(self, marker: &'static str) -> Self {
        Self {
            only_if: Some(marker),
            ..self
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Literal(String),
    Regex(Regex),
}

/// A compiled rule
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    matcher: Matcher,
    replacement: String,
    unless: Vec<String>,
    only_if: Option<String>,
}

impl Rule {
    pub fn compile(spec: &RuleSpec) -> Result<Self> {
        if spec.pattern.is_empty() {
            return Err(RestyleError::EmptyPattern(spec.name.to_string()));
        }

        let matcher = match spec.kind {
            PatternKind::Literal => Matcher::Literal(spec.pattern.to_string()),
            PatternKind::Regex => {
                let regex = RegexBuilder::new(spec.pattern)
                    .multi_line(spec.multi_line)
                    .dot_matches_new_line(spec.dot_all)
                    .build()
                    .map_err(|source| RestyleError::InvalidPattern {
                        rule: spec.name.to_string(),
                        source,
                    })?;
                Matcher::Regex(regex)
            }
        };

        Ok(Self {
            name: spec.name.to_string(),
            matcher,
            replacement: spec.replacement.to_string(),
            unless: spec.unless.iter().map(|m| m.to_string()).collect(),
            only_if: spec.only_if.map(str::to_string),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, text: &str) -> bool {
        if let Some(ref marker) = self.only_if {
            if !text.contains(marker.as_str()) {
                return false;
            }
        }
        !self.unless.iter().any(|marker| text.contains(marker.as_str()))
    }

    /// Apply the rule to `text`.
    ///
    /// Returns the new text and the number of matches, or `None` when a guard
    /// disables the rule or nothing matched.
    pub fn apply(&self, text: &str) -> Option<(String, usize)> {
        if !self.is_enabled(text) {
            return None;
        }

        match &self.matcher {
            Matcher::Literal(needle) => {
                let count = text.matches(needle.as_str()).count();
                if count == 0 {
                    return None;
                }
                Some((text.replace(needle.as_str(), &self.replacement), count))
            }
            Matcher::Regex(regex) => {
                let count = regex.find_iter(text).count();
                if count == 0 {
                    return None;
                }
                let replaced = regex.replace_all(text, self.replacement.as_str());
                Some((replaced.into_owned(), count))
            }
        }
    }
}

/// Result of running a whole rule set over one blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,

    /// Matches replaced by rules that changed the text
    pub replacements: usize,

    /// Names of rules that changed the text, in order
    pub rules_applied: Vec<String>,
}

impl Rewrite {
    pub fn is_noop(&self) -> bool {
        self.rules_applied.is_empty()
    }
}

/// Ordered, non-empty list of compiled rules
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn compile<'a, I>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a RuleSpec>,
    {
        let rules = specs
            .into_iter()
            .map(Rule::compile)
            .collect::<Result<Vec<_>>>()?;

        if rules.is_empty() {
            return Err(RestyleError::EmptyRuleSet);
        }

        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Apply every rule in order, each one seeing the previous one's output.
    pub fn apply(&self, input: &str) -> Rewrite {
        let mut text = input.to_string();
        let mut replacements = 0;
        let mut rules_applied = Vec::new();

        for rule in &self.rules {
            let Some((output, count)) = rule.apply(&text) else {
                continue;
            };
            if output == text {
                continue;
            }
            debug!("rule '{}' replaced {} match(es)", rule.name(), count);
            replacements += count;
            rules_applied.push(rule.name().to_string());
            text = output;
        }

        Rewrite {
            text,
            replacements,
            rules_applied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn compile(specs: &[RuleSpec]) -> RuleSet {
        RuleSet::compile(specs).unwrap()
    }

    #[test]
    fn test_body_class_becomes_bare_body() {
        let rules = compile(&[RuleSpec::regex("body-class", r#"<body class="[^"]*">"#, "<body>")]);
        let out = rules.apply(r#"<body class="bg-white text-gray-800 antialiased">"#);
        assert_eq!(out.text, "<body>");
        assert_eq!(out.replacements, 1);
        assert_eq!(out.rules_applied, vec!["body-class"]);
    }

    #[test]
    fn test_literal_rule_leaves_surroundings_alone() {
        let rules = compile(&[RuleSpec::literal(
            "page-container",
            r#"<div class="flex min-h-screen">"#,
            r#"<div class="page-container">"#,
        )]);
        let input = "<main>\n  <div class=\"flex min-h-screen\">\n    <p>hi</p>\n</main>";
        let out = rules.apply(input);
        assert_eq!(
            out.text,
            "<main>\n  <div class=\"page-container\">\n    <p>hi</p>\n</main>"
        );
    }

    #[test]
    fn test_literal_replacement_is_not_a_template() {
        let rules = compile(&[RuleSpec::literal("price", "cost", "$1")]);
        assert_eq!(rules.apply("cost").text, "$1");
    }

    #[test]
    fn test_capture_groups_in_template() {
        let rules = compile(&[RuleSpec::regex(
            "toc-link",
            r#"<a href="([^"]+)" class="hover:text-indigo-600 transition-colors">([^<]+)</a>"#,
            r#"<a href="${1}" class="toc-link">${2}</a>"#,
        )]);
        let out = rules.apply(r##"<a href="#intro" class="hover:text-indigo-600 transition-colors">Intro</a>"##);
        assert_eq!(out.text, r##"<a href="#intro" class="toc-link">Intro</a>"##);
    }

    #[test]
    fn test_iter_keeps_rule_order() {
        let rules = compile(&[
            RuleSpec::literal("first", "a", "b"),
            RuleSpec::regex("second", "c+", "d"),
        ]);
        let names: Vec<_> = rules.iter().map(Rule::name).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_no_match_is_noop() {
        let rules = compile(&[RuleSpec::literal("x", "absent", "present")]);
        let out = rules.apply("nothing to see");
        assert!(out.is_noop());
        assert_eq!(out.replacements, 0);
        assert_eq!(out.text, "nothing to see");
    }

    #[test]
    fn test_rules_apply_in_order() {
        let r1 = RuleSpec::literal("a-to-b", "a", "b");
        let r2 = RuleSpec::literal("b-to-c", "b", "c");

        let forward = compile(&[r1, r2]).apply("a");
        let backward = compile(&[r2, r1]).apply("a");

        assert_eq!(forward.text, "c");
        assert_eq!(backward.text, "b");
        assert_ne!(forward.text, backward.text);
    }

    #[test]
    fn test_unless_guard_makes_insertion_idempotent() {
        let rules = compile(&[RuleSpec::literal(
            "head-stylesheet",
            "<head>",
            "<head>\n<link rel=\"stylesheet\" href=\"styles.css\">",
        )
        .unless(&["href=\"styles.css\""])]);

        let once = rules.apply("<head></head>");
        let twice = rules.apply(&once.text);
        assert!(!once.is_noop());
        assert!(twice.is_noop());
        assert_eq!(once.text, twice.text);
    }

    #[test]
    fn test_only_if_guard() {
        let rules = compile(&[RuleSpec::literal("cfg", "config", "").only_if("cdn")]);
        assert_eq!(rules.apply("config").text, "config");
        assert_eq!(rules.apply("cdn config").text, "cdn ");
    }

    #[test]
    fn test_multi_line_and_dot_all_flags() {
        let anchored = compile(&[RuleSpec::regex("indent", "^x", "y").multi_line()]);
        assert_eq!(anchored.apply("x\nx").text, "y\ny");

        let spanning = compile(&[RuleSpec::regex("block", "<a>.*</a>", "").dot_all()]);
        assert_eq!(spanning.apply("<a>\n\n</a>!").text, "!");
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let err = RuleSet::compile(&[RuleSpec::regex("broken", "(unclosed", "")]).unwrap_err();
        assert!(err.is_config());
        assert!(matches!(err, RestyleError::InvalidPattern { ref rule, .. } if rule == "broken"));
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert!(matches!(
            RuleSet::compile(&[] as &[RuleSpec]),
            Err(RestyleError::EmptyRuleSet)
        ));
        assert!(matches!(
            RuleSet::compile(&[RuleSpec::literal("blank", "", "x")]),
            Err(RestyleError::EmptyPattern(_))
        ));
    }
}
