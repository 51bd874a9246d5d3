//! Character-level checks: corrupted encodings, the output character set,
//! and ITS allowed-characters annotations.

use regex::Regex;
use tracing::warn;

use super::{Checker, CheckerScope};
use crate::charset::Charset;
use crate::config::compile_regex;
use crate::document::{Container, TextUnit};
use crate::error::ConfigError;
use crate::issues::{DisplaySeverity, Issue, IssueBuilder, IssueType};
use crate::utils::char_index;

/// Frequent signatures of UTF-8 text decoded as Latin-1.
const CORRUPTION_PATTERN: &str = "\u{00C3}[\u{00A4}-\u{00B6}]|\u{00C3}\u{201E}|\u{00C3}\u{2026}|\u{00C3}\u{2013}";

pub struct CharactersChecker {
    scope: CheckerScope,
    corruption: Option<Regex>,
    charset: Option<Charset>,
    extra_chars_allowed: Option<Regex>,
    /// Last ITS pattern seen, with its inverted compiled form.
    its_cache: Option<(String, Result<Regex, String>)>,
}

impl CharactersChecker {
    pub fn start(scope: CheckerScope) -> Result<Self, ConfigError> {
        let params = &scope.params;
        let corruption = if params.corrupted_characters {
            Some(compile_regex(CORRUPTION_PATTERN, "corrupted characters")?)
        } else {
            None
        };

        let mut charset = None;
        let mut extra_chars_allowed = None;
        if params.check_characters {
            if !params.charset.trim().is_empty() {
                charset = Some(Charset::for_name(&params.charset)?);
            }
            if !params.extra_chars_allowed.is_empty() {
                extra_chars_allowed = Some(compile_regex(&params.extra_chars_allowed, "'extraCharsAllowed'")?);
            }
        }

        Ok(Self {
            scope,
            corruption,
            charset,
            extra_chars_allowed,
            its_cache: None,
        })
    }

    /// The inverted ITS pattern, compiled once per distinct pattern string.
    fn its_regex(&mut self, pattern: &str) -> &Result<Regex, String> {
        let entry = match self.its_cache.take() {
            Some(entry) if entry.0 == pattern => entry,
            _ => {
                let compiled = invert_bracket_expression(pattern)
                    .and_then(|inverted| Regex::new(&inverted).map_err(|e| e.to_string()));
                (pattern.to_string(), compiled)
            }
        };
        &self.its_cache.insert(entry).1
    }

    fn check_its_allowed_chars(
        &mut self,
        tu: &TextUnit,
        container: &Container,
        is_source: bool,
        texts: (&str, &str),
        sink: &mut Vec<Issue>,
    ) {
        let Some(pattern) = container.annotations.allowed_characters.clone() else {
            return;
        };
        let plain = container.unsegmented().plain_text();

        let builder = match self.its_regex(&pattern) {
            Ok(regex) => {
                let Some(m) = regex.find(&plain) else {
                    return;
                };
                let start = char_index(&plain, m.start());
                let end = char_index(&plain, m.end());
                let builder = IssueBuilder::new(
                    IssueType::AllowedCharacters,
                    DisplaySeverity::High,
                    format!("Character not allowed: '{}' (pattern: '{}')", m.as_str(), pattern),
                );
                if is_source {
                    builder.source_span(start, end)
                } else {
                    builder.target_span(start, end)
                }
            }
            Err(message) => {
                warn!(
                    "Invalid ITS allowed characters pattern '{}' in text unit '{}': {}",
                    pattern, tu.id, message
                );
                IssueBuilder::new(
                    IssueType::AllowedCharacters,
                    DisplaySeverity::High,
                    format!(
                        "Error when trying to check ITS allowed characters pattern '{}'. {}",
                        pattern, message
                    ),
                )
            }
        };
        self.scope.report(tu, builder.texts(texts.0, texts.1), sink);
    }

    fn check_corrupted_characters(&self, tu: &TextUnit, texts: (&str, &str), sink: &mut Vec<Issue>) {
        let Some(corruption) = &self.corruption else {
            return;
        };
        if let Some(m) = corruption.find(texts.1) {
            self.scope.report(
                tu,
                IssueBuilder::new(
                    IssueType::SuspectPattern,
                    DisplaySeverity::High,
                    format!(
                        "Possible corrupted characters in the target (for example: \"{}\").",
                        m.as_str()
                    ),
                )
                .target_span(
                    char_index(texts.1, m.start()),
                    char_index(texts.1, m.end()),
                )
                .texts(texts.0, texts.1),
                sink,
            );
        }
    }

    fn is_allowed(&self, c: char) -> bool {
        if let Some(charset) = &self.charset
            && charset.can_encode(c)
        {
            return true;
        }
        self.extra_chars_allowed.as_ref().is_some_and(|extra| {
            let mut buf = [0u8; 4];
            extra.is_match(c.encode_utf8(&mut buf))
        })
    }

    fn check_characters(&self, tu: &TextUnit, texts: (&str, &str), sink: &mut Vec<Issue>) {
        if self.charset.is_none() && self.extra_chars_allowed.is_none() {
            return;
        }
        let mut first: Option<(usize, char)> = None;
        let mut others = String::new();

        for (pos, c) in texts.1.chars().enumerate() {
            if self.is_allowed(c) {
                continue;
            }
            match first {
                None => first = Some((pos, c)),
                Some(_) => {
                    if !others.contains(c) {
                        others.push(c);
                    }
                }
            }
        }

        let Some((pos, bad)) = first else {
            return;
        };
        let mut message = format!(
            "The character '{}' (U+{:04X}) is not allowed in the target text.",
            bad, bad as u32
        );
        if !others.is_empty() {
            message.push_str(" Other forbidden characters found: ");
            message.push_str(&others);
        }
        self.scope.report(
            tu,
            IssueBuilder::new(IssueType::AllowedCharacters, DisplaySeverity::Medium, message)
                .target_span(pos, pos + 1)
                .texts(texts.0, texts.1),
            sink,
        );
    }
}

/// Turns `[...]` into `[^...]` and back.
fn invert_bracket_expression(pattern: &str) -> Result<String, String> {
    if let Some(rest) = pattern.strip_prefix("[^") {
        Ok(format!("[{}", rest))
    } else if let Some(rest) = pattern.strip_prefix('[') {
        Ok(format!("[^{}", rest))
    } else {
        Err("Pattern should start with '[' or '[^'.".to_string())
    }
}

impl Checker for CharactersChecker {
    fn scope(&self) -> &CheckerScope {
        &self.scope
    }

    fn scope_mut(&mut self) -> &mut CheckerScope {
        &mut self.scope
    }

    fn check_text_unit(&mut self, tu: &TextUnit, sink: &mut Vec<Issue>) {
        let src_plain = tu.source.unsegmented().plain_text();
        let target = tu.target(&self.scope.target_locale);
        let trg_plain = target
            .map(|t| t.unsegmented().plain_text())
            .unwrap_or_default();
        let texts = (src_plain.as_str(), trg_plain.as_str());

        if self.scope.params.check_allowed_characters {
            self.check_its_allowed_chars(tu, &tu.source, true, texts, sink);
        }
        let Some(target) = target else {
            return;
        };
        if self.scope.params.check_allowed_characters {
            self.check_its_allowed_chars(tu, target, false, texts, sink);
        }

        self.check_corrupted_characters(tu, texts, sink);
        self.check_characters(tu, texts, sink);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::checkers::test_support::*;
    use crate::config::Parameters;

    fn check(params: Parameters, tu: &TextUnit) -> Vec<Issue> {
        let mut checker = CharactersChecker::start(scope_with(params)).unwrap();
        let mut sink = Vec::new();
        checker.on_text_unit(tu, &mut sink);
        sink
    }

    fn charset_params(charset: &str, extra: &str) -> Parameters {
        Parameters {
            check_characters: true,
            charset: charset.to_string(),
            extra_chars_allowed: extra.to_string(),
            ..quiet_params()
        }
    }

    fn with_its(text: &str, pattern: &str, on_source: bool) -> TextUnit {
        let mut container = Container::from_text(text);
        container.annotations.allowed_characters = Some(pattern.to_string());
        if on_source {
            TextUnit::new("1", container).with_target(&fr(), Container::from_text("x"))
        } else {
            TextUnit::new("1", Container::from_text("x")).with_target(&fr(), container)
        }
    }

    fn its_params() -> Parameters {
        Parameters {
            check_allowed_characters: true,
            ..quiet_params()
        }
    }

    #[test]
    fn test_corrupted_characters() {
        let params = Parameters {
            corrupted_characters: true,
            ..quiet_params()
        };
        let issues = check(params.clone(), &unit("été", "\u{00C3}\u{00A9}t\u{00C3}\u{00A9}"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type(), IssueType::SuspectPattern);
        assert_eq!(
            issues[0].message(),
            "Possible corrupted characters in the target (for example: \"\u{00C3}\u{00A9}\")."
        );
        assert_eq!((issues[0].target_start(), issues[0].target_end()), (0, 2));

        assert!(check(params, &unit("été", "été")).is_empty());
    }

    #[test]
    fn test_single_character_not_in_charset() {
        let issues = check(charset_params("ISO-8859-1", ""), &unit("oe", "\u{0153}uvre"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type(), IssueType::AllowedCharacters);
        assert_eq!(issues[0].display_severity(), DisplaySeverity::Medium);
        assert_eq!(
            issues[0].message(),
            "The character '\u{0153}' (U+0153) is not allowed in the target text."
        );
        assert_eq!((issues[0].target_start(), issues[0].target_end()), (0, 1));
    }

    #[test]
    fn test_several_characters_not_in_charset() {
        let issues = check(charset_params("ISO-8859-1", ""), &unit("x", "a\u{20AC}b\u{0153}\u{0153}\u{20AC}"));
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message(),
            "The character '\u{20AC}' (U+20AC) is not allowed in the target text. Other forbidden characters found: \u{0153}\u{20AC}"
        );
        assert_eq!(issues[0].target_start(), 1);
    }

    #[test]
    fn test_extra_characters_allowed() {
        assert!(check(charset_params("ISO-8859-1", "[\u{20AC}\u{0153}]"), &unit("x", "\u{0153}uvre \u{20AC}")).is_empty());
        // Without charset, only the extra characters are allowed
        let issues = check(charset_params("", "[a-z]"), &unit("x", "abc!"));
        assert_eq!(issues[0].target_start(), 3);
    }

    #[test]
    fn test_its_allowed_characters_on_target() {
        let issues = check(its_params(), &with_its("été et printemps", "[a-z ]", false));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].display_severity(), DisplaySeverity::High);
        assert_eq!(issues[0].message(), "Character not allowed: 'é' (pattern: '[a-z ]')");
        assert_eq!((issues[0].target_start(), issues[0].target_end()), (0, 1));
    }

    #[test]
    fn test_its_allowed_characters_on_source_without_target() {
        let mut source = Container::from_text("abc1");
        source.annotations.allowed_characters = Some("[^0-9]".to_string());
        let tu = TextUnit::new("1", source);

        let issues = check(its_params(), &tu);
        assert_eq!(issues.len(), 1);
        assert_eq!((issues[0].source_start(), issues[0].source_end()), (3, 4));
    }

    #[test]
    fn test_its_pattern_is_cached() {
        let mut checker = CharactersChecker::start(scope_with(its_params())).unwrap();
        let mut sink = Vec::new();
        checker.on_text_unit(&with_its("abc", "[a-z]", false), &mut sink);
        checker.on_text_unit(&with_its("ABC", "[a-z]", false), &mut sink);
        assert_eq!(sink.len(), 1);
        assert_eq!(checker.its_cache.as_ref().map(|(p, _)| p.as_str()), Some("[a-z]"));

        checker.on_text_unit(&with_its("ABC", "[A-Z]", false), &mut sink);
        assert_eq!(sink.len(), 1);
        assert_eq!(checker.its_cache.as_ref().map(|(p, _)| p.as_str()), Some("[A-Z]"));
    }

    #[test]
    fn test_invalid_its_pattern() {
        let issues = check(its_params(), &with_its("abc", "a-z", true));
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message(),
            "Error when trying to check ITS allowed characters pattern 'a-z'. Pattern should start with '[' or '[^'."
        );
        assert_eq!(issues[0].source_end(), -1);
    }

    #[test]
    fn test_invert_bracket_expression() {
        assert_eq!(invert_bracket_expression("[a-z]").unwrap(), "[^a-z]");
        assert_eq!(invert_bracket_expression("[^a-z]").unwrap(), "[a-z]");
        assert!(invert_bracket_expression("abc").is_err());
    }
}
