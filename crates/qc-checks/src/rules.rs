//! Individual check rules.
//!
//! Each rule compares one source string with one target string and returns a
//! failure message, or `None` when the pair passes. Rules never see empty
//! targets: an untranslated plural form has nothing to check.

use std::sync::LazyLock;

use qc_core::enums::CheckCategory;
use regex::Regex;

/// One source/target pair as seen by a rule.
#[derive(Debug, Clone, Copy)]
pub struct CheckInput<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub language_code: &'a str,
    pub locations: &'a [String],
}

pub type RuleFn = fn(&CheckInput<'_>) -> Option<String>;

/// A named rule with its failure category.
#[derive(Debug, Clone, Copy)]
pub struct CheckDefinition {
    pub name: &'static str,
    pub category: CheckCategory,
    pub description: &'static str,
    pub test: RuleFn,
}

/// Every built-in rule.
pub const ALL_RULES: &[CheckDefinition] = &[
    CheckDefinition {
        name: "blank",
        category: CheckCategory::Functional,
        description: "Blank",
        test: blank,
    },
    CheckDefinition {
        name: "brackets",
        category: CheckCategory::Cosmetic,
        description: "Brackets",
        test: brackets,
    },
    CheckDefinition {
        name: "doublespacing",
        category: CheckCategory::Cosmetic,
        description: "Double spaces",
        test: doublespacing,
    },
    CheckDefinition {
        name: "endpunc",
        category: CheckCategory::Cosmetic,
        description: "Ending punctuation",
        test: endpunc,
    },
    CheckDefinition {
        name: "endwhitespace",
        category: CheckCategory::Cosmetic,
        description: "Ending whitespace",
        test: endwhitespace,
    },
    CheckDefinition {
        name: "newlines",
        category: CheckCategory::Functional,
        description: "Newlines",
        test: newlines,
    },
    CheckDefinition {
        name: "numbers",
        category: CheckCategory::Functional,
        description: "Numbers",
        test: numbers,
    },
    CheckDefinition {
        name: "printf",
        category: CheckCategory::Critical,
        description: "printf()",
        test: printf,
    },
    CheckDefinition {
        name: "startwhitespace",
        category: CheckCategory::Cosmetic,
        description: "Starting whitespace",
        test: startwhitespace,
    },
    CheckDefinition {
        name: "tabs",
        category: CheckCategory::Functional,
        description: "Tabs",
        test: tabs,
    },
    CheckDefinition {
        name: "unchanged",
        category: CheckCategory::Functional,
        description: "Unchanged",
        test: unchanged,
    },
];

static PRINTF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"%(?:(\d+)\$)?",
        r"[-+ 0#']*",
        r"(?:\d+|\*)?",
        r"(?:\.(?:\d+|\*))?",
        r"(?:hh|h|ll|l|L|q|j|z|t)?",
        r"([diouxXeEfFgGaAcspn%])",
    ))
    .expect("printf pattern compiles")
});

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)*").expect("number pattern compiles"));

const END_PUNCTUATION: &[char] = &[
    '.', '!', '?', ':', ';', ',', '…', '。', '！', '？', '：', '；', '，',
];

fn count_differs(input: &CheckInput<'_>, needle: &str) -> bool {
    input.source.matches(needle).count() != input.target.matches(needle).count()
}

fn blank(input: &CheckInput<'_>) -> Option<String> {
    (input.target.trim().is_empty() && !input.source.trim().is_empty())
        .then(|| "Translation is blank".to_string())
}

fn brackets(input: &CheckInput<'_>) -> Option<String> {
    let missing: Vec<String> = ['(', ')', '[', ']', '{', '}']
        .iter()
        .filter(|b| input.source.matches(**b).count() != input.target.matches(**b).count())
        .map(ToString::to_string)
        .collect();
    (!missing.is_empty()).then(|| format!("Different brackets: {}", missing.join(" ")))
}

fn doublespacing(input: &CheckInput<'_>) -> Option<String> {
    count_differs(input, "  ").then(|| "Double spaces differ".to_string())
}

fn ending_punctuation(text: &str) -> Option<char> {
    text.trim_end()
        .chars()
        .last()
        .filter(|c| END_PUNCTUATION.contains(c))
}

/// Fullwidth and ASCII forms of the same mark count as equal.
fn normalize_punctuation(c: char) -> char {
    match c {
        '。' => '.',
        '！' => '!',
        '？' => '?',
        '：' => ':',
        '；' => ';',
        '，' => ',',
        other => other,
    }
}

fn endpunc(input: &CheckInput<'_>) -> Option<String> {
    let source = ending_punctuation(input.source).map(normalize_punctuation);
    let target = ending_punctuation(input.target).map(normalize_punctuation);
    if source == target {
        return None;
    }
    let show = |c: Option<char>| c.map_or_else(|| "nothing".to_string(), |c| format!("'{c}'"));
    Some(format!(
        "Different punctuation at the end: {} vs {}",
        show(source),
        show(target)
    ))
}

fn trailing_whitespace(text: &str) -> &str {
    &text[text.trim_end().len()..]
}

fn leading_whitespace(text: &str) -> &str {
    &text[..text.len() - text.trim_start().len()]
}

fn endwhitespace(input: &CheckInput<'_>) -> Option<String> {
    (trailing_whitespace(input.source) != trailing_whitespace(input.target))
        .then(|| "Whitespace at the end differs".to_string())
}

fn startwhitespace(input: &CheckInput<'_>) -> Option<String> {
    (leading_whitespace(input.source) != leading_whitespace(input.target))
        .then(|| "Whitespace at the start differs".to_string())
}

fn newlines(input: &CheckInput<'_>) -> Option<String> {
    count_differs(input, "\n").then(|| "Different line endings".to_string())
}

fn tabs(input: &CheckInput<'_>) -> Option<String> {
    count_differs(input, "\t").then(|| "Different tabs".to_string())
}

fn sorted_matches<'t>(re: &Regex, text: &'t str) -> Vec<&'t str> {
    let mut found: Vec<&str> = re.find_iter(text).map(|m| m.as_str()).collect();
    found.sort_unstable();
    found
}

fn numbers(input: &CheckInput<'_>) -> Option<String> {
    let source = sorted_matches(&NUMBER, input.source);
    let target = sorted_matches(&NUMBER, input.target);
    (source != target).then(|| {
        let missing: Vec<&str> = source
            .iter()
            .filter(|n| !target.contains(n))
            .copied()
            .collect();
        if missing.is_empty() {
            "Different numbers".to_string()
        } else {
            format!("Different numbers: {}", missing.join(", "))
        }
    })
}

/// Placeholders in `text`, `%%` excluded, positional ones keyed by position.
fn printf_placeholders(text: &str) -> Vec<String> {
    let mut found: Vec<String> = PRINTF
        .captures_iter(text)
        .filter(|caps| &caps[2] != "%")
        .map(|caps| match caps.get(1) {
            Some(position) => format!("%{}${}", position.as_str(), &caps[2]),
            None => caps[0].to_string(),
        })
        .collect();
    found.sort_unstable();
    found
}

fn printf(input: &CheckInput<'_>) -> Option<String> {
    let source = printf_placeholders(input.source);
    let target = printf_placeholders(input.target);
    if source == target {
        return None;
    }
    if let Some(missing) = source.iter().find(|p| !target.contains(p)) {
        return Some(format!("Missing printf variable: {missing}"));
    }
    let extra = target
        .iter()
        .find(|p| !source.contains(p))
        .map_or("", String::as_str);
    if extra.is_empty() {
        Some("Different number of printf variables".to_string())
    } else {
        Some(format!("Unknown printf variable: {extra}"))
    }
}

fn unchanged(input: &CheckInput<'_>) -> Option<String> {
    let source = input.source.trim();
    let has_letters = source.chars().filter(|c| c.is_alphabetic()).count() > 1;
    (has_letters && source == input.target.trim())
        .then(|| "Translation is identical to the source".to_string())
}
