//! # Label Name Normalization
//!
//! Two pure transforms turn a raw label into names that are safe to use
//! elsewhere in a workflow:
//!
//! - [`name_to_identifier`] produces the lowercase, hyphen-delimited form used
//!   in the `labels` and `labels-object` outputs. Unicode letters and numbers
//!   survive unchanged.
//! - [`name_to_environment_variable_name`] produces the `GITHUB_PR_LABEL_*`
//!   variable name. Accents are stripped and everything outside ASCII word
//!   characters folds to underscores.
//!
//! Neither transform trims leading or trailing separators: `#1` becomes the
//! identifier `-1` and the variable `GITHUB_PR_LABEL__1`.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Prefix of every exported label variable.
pub const ENV_VAR_PREFIX: &str = "GITHUB_PR_LABEL_";

static QUOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"“‘”’]+"#).expect("valid quote regex"));

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("valid alphanumeric regex"));

static DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("valid dash regex"));

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("valid word regex"));

static UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("valid underscore regex"));

/// Convert a raw label name into a lowercase, hyphen-delimited identifier.
///
/// Quotes are dropped, every run of characters that are not Unicode letters or
/// numbers becomes a single `-`, and the result is lowercased.
///
/// ```
/// use pr_labels::normalize::name_to_identifier;
///
/// assert_eq!(name_to_identifier("WIP: feature"), "wip-feature");
/// assert_eq!(name_to_identifier("#1"), "-1");
/// ```
#[must_use]
pub fn name_to_identifier(name: &str) -> String {
    let unquoted = QUOTES.replace_all(name, "");
    let dashed = NON_ALPHANUMERIC.replace_all(&unquoted, "-");
    DASHES.replace_all(&dashed, "-").to_lowercase()
}

/// Convert a raw label name into a `GITHUB_PR_LABEL_*` environment variable name.
///
/// ```
/// use pr_labels::normalize::name_to_environment_variable_name;
///
/// assert_eq!(name_to_environment_variable_name("café"), "GITHUB_PR_LABEL_CAFE");
/// assert_eq!(name_to_environment_variable_name("needs $"), "GITHUB_PR_LABEL_NEEDS_");
/// ```
#[must_use]
pub fn name_to_environment_variable_name(name: &str) -> String {
    let deburred = deburr(name);
    let unquoted = QUOTES.replace_all(&deburred, "");
    let underscored = NON_WORD.replace_all(&unquoted, "_");
    let collapsed = UNDERSCORES.replace_all(&underscored, "_");
    format!("{ENV_VAR_PREFIX}{}", collapsed.to_uppercase())
}

/// Strip accents from Latin-1 Supplement and Latin Extended-A letters and drop
/// free-standing combining marks. Everything else passes through untouched.
fn deburr(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if is_combining_mark(ch) {
            continue;
        }
        if !('\u{C0}'..='\u{17F}').contains(&ch) {
            out.push(ch);
            continue;
        }
        if let Some(replacement) = undecomposable_letter(ch) {
            out.push_str(replacement);
            continue;
        }
        out.extend(std::iter::once(ch).nfd().filter(|c| !is_combining_mark(*c)));
    }
    out
}

fn is_combining_mark(ch: char) -> bool {
    matches!(ch, '\u{300}'..='\u{36F}' | '\u{FE20}'..='\u{FE2F}' | '\u{20D0}'..='\u{20FF}')
}

/// Letters in the deburred range with no canonical decomposition.
fn undecomposable_letter(ch: char) -> Option<&'static str> {
    let replacement = match ch {
        'Æ' => "Ae",
        'æ' => "ae",
        'Ð' | 'Đ' => "D",
        'ð' | 'đ' => "d",
        'Ø' => "O",
        'ø' => "o",
        'Þ' => "Th",
        'þ' => "th",
        'ß' => "ss",
        'Ħ' => "H",
        'ħ' => "h",
        'ı' => "i",
        'ĸ' => "k",
        'Ĳ' => "IJ",
        'ĳ' => "ij",
        'Ŀ' | 'Ł' => "L",
        'ŀ' | 'ł' => "l",
        'ŉ' => "'n",
        'Ŋ' => "N",
        'ŋ' => "n",
        'Œ' => "Oe",
        'œ' => "oe",
        'Ŧ' => "T",
        'ŧ' => "t",
        'ſ' => "s",
        _ => return None,
    };
    Some(replacement)
}
