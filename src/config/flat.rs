//! Flat `key=value` parameter strings, as stored in session files.
//!
//! ```text
//! #v1
//! leadingWS.b=true
//! maxCharLengthBreak.i=20
//! serverURL=http://localhost:8081/
//! patternCount.i=8
//! sourcePattern0=[(\x{FF08}]
//! ```
//!
//! Booleans carry a `.b` suffix and integers a `.i` suffix. Unknown keys
//! are ignored and missing keys take their default, so strings written by
//! older or newer versions still load.

use std::collections::HashMap;

use super::{OutputType, Parameters, PatternItem, ReferencePath, Scope};
use crate::error::ConfigError;
use crate::issues::DisplaySeverity;

const HEADER: &str = "#v1";

impl Parameters {
    pub fn to_flat_string(&self) -> String {
        let mut w = FlatWriter::default();
        w.string("outputPath", &self.output_path);
        w.int("outputType", self.output_type.index() as i64);
        w.bool("autoOpen", self.auto_open);
        w.bool("leadingWS", self.leading_ws);
        w.bool("trailingWS", self.trailing_ws);
        w.bool("emptyTarget", self.empty_target);
        w.bool("emptySource", self.empty_source);
        w.bool("targetSameAsSource", self.target_same_as_source);
        w.bool(
            "targetSameAsSourceForSameLanguage",
            self.target_same_as_source_for_same_language,
        );
        w.bool(
            "targetSameAsSourceWithCodes",
            self.target_same_as_source_with_codes,
        );
        w.bool("doubledWord", self.doubled_word);
        w.string("doubledWordExceptions", &self.doubled_word_exceptions);
        w.bool("codeDifference", self.code_difference);
        w.bool("guessOpenClose", self.guess_open_close);
        w.string("typesToIgnore", &self.types_to_ignore);
        w.list("extraCodesAllowed", &self.extra_codes_allowed);
        w.list("missingCodesAllowed", &self.missing_codes_allowed);
        w.bool("checkPatterns", self.check_patterns);
        w.int("patternCount", self.patterns.len() as i64);
        for (i, item) in self.patterns.iter().enumerate() {
            w.bool(&format!("usePattern{}", i), item.enabled);
            w.bool(&format!("fromSourcePattern{}", i), item.from_source);
            w.int(&format!("severityPattern{}", i), item.severity.index() as i64);
            w.string(&format!("sourcePattern{}", i), &item.source);
            w.string(&format!("targetPattern{}", i), &item.target);
            w.string(&format!("descPattern{}", i), &item.description);
        }
        w.bool("corruptedCharacters", self.corrupted_characters);
        w.bool("checkAllowedCharacters", self.check_allowed_characters);
        w.bool("checkCharacters", self.check_characters);
        w.string("charset", &self.charset);
        w.string("extraCharsAllowed", &self.extra_chars_allowed);
        w.bool("checkMaxCharLength", self.check_max_char_length);
        w.int("maxCharLengthBreak", self.max_char_length_break as i64);
        w.int("maxCharLengthAbove", self.max_char_length_above as i64);
        w.int("maxCharLengthBelow", self.max_char_length_below as i64);
        w.bool("checkMinCharLength", self.check_min_char_length);
        w.int("minCharLengthBreak", self.min_char_length_break as i64);
        w.int("minCharLengthAbove", self.min_char_length_above as i64);
        w.int("minCharLengthBelow", self.min_char_length_below as i64);
        w.bool(
            "checkAbsoluteMaxCharLength",
            self.check_absolute_max_char_length,
        );
        w.int("absoluteMaxCharLength", self.absolute_max_char_length as i64);
        w.bool("checkStorageSize", self.check_storage_size);
        w.bool("checkLocalizables", self.check_localizables);
        w.int("scope", self.scope.index() as i64);
        w.bool("checkTerms", self.check_terms);
        w.string("termsPath", self.terms_path.as_str());
        w.bool("stringMode", self.string_mode);
        w.bool("betweenCodes", self.between_codes);
        w.bool("checkBlacklist", self.check_blacklist);
        w.string("blacklistPath", self.blacklist_path.as_str());
        w.bool("allowBlacklistSub", self.allow_blacklist_sub);
        w.bool("blacklistSrc", self.blacklist_src);
        w.bool("checkWithLT", self.check_with_lt);
        w.string("serverURL", &self.server_url);
        w.bool("ltBilingualMode", self.lt_bilingual_mode);
        w.string("ltUsername", &self.lt_username);
        w.string("ltApiKey", &self.lt_api_key);
        w.bool("saveSession", self.save_session);
        w.string("sessionPath", &self.session_path);
        w.bool("showFullPath", self.show_full_path);
        w.finish()
    }

    pub fn from_flat_string(text: &str) -> Result<Self, ConfigError> {
        let r = FlatReader::parse(text)?;
        let d = Parameters::default();

        let pattern_count = r.count("patternCount")?;
        let patterns = match pattern_count {
            None => d.patterns.clone(),
            Some(count) => (0..count)
                .map(|i| -> Result<PatternItem, ConfigError> {
                    Ok(PatternItem {
                        source: r.string(&format!("sourcePattern{}", i), ""),
                        target: r.string(&format!("targetPattern{}", i), ""),
                        enabled: r.bool(&format!("usePattern{}", i), true)?,
                        severity: DisplaySeverity::from_index(
                            r.int(&format!("severityPattern{}", i), 1)? as i32,
                        ),
                        from_source: r.bool(&format!("fromSourcePattern{}", i), true)?,
                        description: r.string(&format!("descPattern{}", i), ""),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(Parameters {
            output_path: r.string("outputPath", &d.output_path),
            output_type: OutputType::from_index(r.int("outputType", 0)? as i32),
            auto_open: r.bool("autoOpen", d.auto_open)?,
            leading_ws: r.bool("leadingWS", d.leading_ws)?,
            trailing_ws: r.bool("trailingWS", d.trailing_ws)?,
            empty_target: r.bool("emptyTarget", d.empty_target)?,
            empty_source: r.bool("emptySource", d.empty_source)?,
            target_same_as_source: r.bool("targetSameAsSource", d.target_same_as_source)?,
            target_same_as_source_for_same_language: r.bool(
                "targetSameAsSourceForSameLanguage",
                d.target_same_as_source_for_same_language,
            )?,
            target_same_as_source_with_codes: r.bool(
                "targetSameAsSourceWithCodes",
                d.target_same_as_source_with_codes,
            )?,
            doubled_word: r.bool("doubledWord", d.doubled_word)?,
            doubled_word_exceptions: r
                .string("doubledWordExceptions", &d.doubled_word_exceptions),
            code_difference: r.bool("codeDifference", d.code_difference)?,
            guess_open_close: r.bool("guessOpenClose", d.guess_open_close)?,
            types_to_ignore: r.string("typesToIgnore", &d.types_to_ignore),
            extra_codes_allowed: r.list("extraCodesAllowed")?,
            missing_codes_allowed: r.list("missingCodesAllowed")?,
            check_patterns: r.bool("checkPatterns", d.check_patterns)?,
            patterns,
            corrupted_characters: r.bool("corruptedCharacters", d.corrupted_characters)?,
            check_allowed_characters: r
                .bool("checkAllowedCharacters", d.check_allowed_characters)?,
            check_characters: r.bool("checkCharacters", d.check_characters)?,
            charset: r.string("charset", &d.charset),
            extra_chars_allowed: r.string("extraCharsAllowed", &d.extra_chars_allowed),
            check_max_char_length: r.bool("checkMaxCharLength", d.check_max_char_length)?,
            max_char_length_break: r.usize("maxCharLengthBreak", d.max_char_length_break)?,
            max_char_length_above: r.usize("maxCharLengthAbove", d.max_char_length_above)?,
            max_char_length_below: r.usize("maxCharLengthBelow", d.max_char_length_below)?,
            check_min_char_length: r.bool("checkMinCharLength", d.check_min_char_length)?,
            min_char_length_break: r.usize("minCharLengthBreak", d.min_char_length_break)?,
            min_char_length_above: r.usize("minCharLengthAbove", d.min_char_length_above)?,
            min_char_length_below: r.usize("minCharLengthBelow", d.min_char_length_below)?,
            check_absolute_max_char_length: r.bool(
                "checkAbsoluteMaxCharLength",
                d.check_absolute_max_char_length,
            )?,
            absolute_max_char_length: r
                .usize("absoluteMaxCharLength", d.absolute_max_char_length)?,
            check_storage_size: r.bool("checkStorageSize", d.check_storage_size)?,
            check_localizables: r.bool("checkLocalizables", d.check_localizables)?,
            scope: Scope::from_index(r.int("scope", 0)? as i32),
            check_terms: r.bool("checkTerms", d.check_terms)?,
            terms_path: ReferencePath::new(&r.string("termsPath", "")),
            string_mode: r.bool("stringMode", d.string_mode)?,
            between_codes: r.bool("betweenCodes", d.between_codes)?,
            check_blacklist: r.bool("checkBlacklist", d.check_blacklist)?,
            blacklist_path: ReferencePath::new(&r.string("blacklistPath", "")),
            allow_blacklist_sub: r.bool("allowBlacklistSub", d.allow_blacklist_sub)?,
            blacklist_src: r.bool("blacklistSrc", d.blacklist_src)?,
            check_with_lt: r.bool("checkWithLT", d.check_with_lt)?,
            server_url: r.string("serverURL", &d.server_url),
            lt_bilingual_mode: r.bool("ltBilingualMode", d.lt_bilingual_mode)?,
            lt_username: r.string("ltUsername", ""),
            lt_api_key: r.string("ltApiKey", ""),
            save_session: r.bool("saveSession", d.save_session)?,
            session_path: r.string("sessionPath", &d.session_path),
            show_full_path: r.bool("showFullPath", d.show_full_path)?,
        })
    }
}

// ============================================================
// Writer / Reader
// ============================================================

#[derive(Default)]
struct FlatWriter {
    out: String,
}

impl FlatWriter {
    fn line(&mut self, key: &str, value: &str) {
        if self.out.is_empty() {
            self.out.push_str(HEADER);
        }
        self.out.push('\n');
        self.out.push_str(key);
        self.out.push('=');
        self.out.push_str(&escape(value));
    }

    fn bool(&mut self, key: &str, value: bool) {
        self.line(&format!("{}.b", key), if value { "true" } else { "false" });
    }

    fn int(&mut self, key: &str, value: i64) {
        self.line(&format!("{}.i", key), &value.to_string());
    }

    fn string(&mut self, key: &str, value: &str) {
        self.line(key, value);
    }

    fn list(&mut self, key: &str, values: &[String]) {
        self.int(key, values.len() as i64);
        for (i, value) in values.iter().enumerate() {
            self.string(&format!("{}{}", key, i), value);
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

struct FlatReader {
    /// Key (suffix included) to (line number, value).
    values: HashMap<String, (usize, String)>,
}

impl FlatReader {
    fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (index, line) in text.lines().enumerate() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::ParameterString {
                    line: index + 1,
                    message: format!("missing '=' in \"{}\"", line),
                });
            };
            values.insert(key.to_string(), (index + 1, unescape(value)));
        }
        Ok(Self { values })
    }

    fn string(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .map_or_else(|| default.to_string(), |(_, v)| v.clone())
    }

    fn bool(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.values.get(&format!("{}.b", key)) {
            None => Ok(default),
            Some((_, v)) if v == "true" => Ok(true),
            Some((_, v)) if v == "false" => Ok(false),
            Some((line, v)) => Err(ConfigError::ParameterString {
                line: *line,
                message: format!("'{}' is not a boolean: \"{}\"", key, v),
            }),
        }
    }

    fn int(&self, key: &str, default: i64) -> Result<i64, ConfigError> {
        match self.values.get(&format!("{}.i", key)) {
            None => Ok(default),
            Some((line, v)) => v.trim().parse().map_err(|_| ConfigError::ParameterString {
                line: *line,
                message: format!("'{}' is not an integer: \"{}\"", key, v),
            }),
        }
    }

    fn usize(&self, key: &str, default: usize) -> Result<usize, ConfigError> {
        let value = self.int(key, default as i64)?;
        usize::try_from(value).map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("must not be negative (found {})", value),
        })
    }

    fn count(&self, key: &str) -> Result<Option<usize>, ConfigError> {
        if !self.values.contains_key(&format!("{}.i", key)) {
            return Ok(None);
        }
        self.usize(key, 0).map(Some)
    }

    fn list(&self, key: &str) -> Result<Vec<String>, ConfigError> {
        let count = self.count(key)?.unwrap_or(0);
        Ok((0..count)
            .map(|i| self.string(&format!("{}{}", key, i), ""))
            .collect())
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
