//! Locale-aware parsers for date/time patterns and numbers.

use chrono::{NaiveDate, NaiveTime};

use super::formats::LocaleFormats;
use crate::utils::is_white_space;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Date(NaiveDate),
    Time(NaiveTime),
    /// Canonical decimal form: no grouping, `.` separator, no redundant zeros.
    Number(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Element {
    Year,
    Month { names: bool },
    Day,
    Weekday,
    Hour { twelve: bool },
    Minute,
    Second,
    AmPm,
    Zone,
    Space,
    Literal(Vec<char>),
}

impl Element {
    /// A missing optional field ends the match at the previous field.
    fn is_optional(&self) -> bool {
        matches!(self, Element::AmPm | Element::Zone)
    }

    fn is_field(&self) -> bool {
        !matches!(self, Element::Space | Element::Literal(_))
    }
}

#[derive(Default)]
struct Fields {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    twelve_hour: bool,
    minute: Option<u32>,
    second: Option<u32>,
    pm: Option<bool>,
}

impl Fields {
    fn value(&self) -> Option<Value> {
        if let (Some(year), Some(month), Some(day)) = (self.year, self.month, self.day) {
            return NaiveDate::from_ymd_opt(year, month, day).map(Value::Date);
        }
        let hour = self.hour?;
        let hour = match (self.twelve_hour, self.pm) {
            (true, _) if !(1..=12).contains(&hour) => return None,
            (true, Some(true)) => hour % 12 + 12,
            (true, Some(false)) => hour % 12,
            _ => hour,
        };
        NaiveTime::from_hms_opt(hour, self.minute.unwrap_or(0), self.second.unwrap_or(0))
            .map(Value::Time)
    }
}

/// A compiled date or time pattern bound to a locale's names.
pub struct DatePattern {
    elements: Vec<Element>,
    /// Lowercased month names with their 1-based month, longest first.
    months: Vec<(Vec<char>, u32)>,
    weekdays: Vec<Vec<char>>,
    /// Lowercased markers with `true` for PM.
    am_pm: Vec<(Vec<char>, bool)>,
}

fn lower_chars(text: &str) -> Vec<char> {
    text.chars().flat_map(char::to_lowercase).collect()
}

impl DatePattern {
    pub fn compile(pattern: &str, formats: &LocaleFormats) -> Self {
        let mut months: Vec<(Vec<char>, u32)> = formats
            .months
            .iter()
            .chain(formats.short_months.iter())
            .enumerate()
            .map(|(index, name)| (lower_chars(name), (index % 12) as u32 + 1))
            .collect();
        months.sort_by_key(|(name, _)| std::cmp::Reverse(name.len()));

        let mut weekdays: Vec<Vec<char>> = formats
            .weekdays
            .iter()
            .chain(formats.short_weekdays.iter())
            .map(|name| lower_chars(name))
            .collect();
        weekdays.sort_by_key(|name| std::cmp::Reverse(name.len()));

        let am_pm = vec![
            (lower_chars(formats.am_pm[0]), false),
            (lower_chars(formats.am_pm[1]), true),
        ];

        Self {
            elements: tokenize(pattern),
            months,
            weekdays,
            am_pm,
        }
    }

    /// Parses at `start`, returning the end of the match and its value.
    pub fn parse_at(&self, text: &[char], start: usize) -> Option<(usize, Value)> {
        let mut fields = Fields::default();
        let mut pos = start;
        let mut last_field_end = start;

        for (index, element) in self.elements.iter().enumerate() {
            match self.match_element(element, text, pos, &mut fields) {
                Some(end) => {
                    pos = end;
                    if element.is_field() {
                        last_field_end = end;
                    }
                }
                None => {
                    let rest = &self.elements[index..];
                    let only_optional = rest.iter().all(|e| !e.is_field() || e.is_optional());
                    if only_optional && last_field_end > start {
                        return fields.value().map(|value| (last_field_end, value));
                    }
                    return None;
                }
            }
        }
        fields.value().map(|value| (pos, value))
    }

    fn match_element(&self, element: &Element, text: &[char], pos: usize, fields: &mut Fields) -> Option<usize> {
        match element {
            Element::Year => {
                let (end, value) = digits(text, pos, 1, 4)?;
                let year = if end - pos == 2 {
                    if value < 50 { 2000 + value } else { 1900 + value }
                } else {
                    value
                };
                fields.year = Some(year as i32);
                Some(end)
            }
            Element::Month { names: false } => {
                let (end, value) = digits(text, pos, 1, 2)?;
                fields.month = Some(value);
                Some(end)
            }
            Element::Month { names: true } => {
                let (name, month) = self
                    .months
                    .iter()
                    .find(|(name, _)| starts_with_ignore_case(text, pos, name))?;
                fields.month = Some(*month);
                Some(pos + name.len())
            }
            Element::Day => {
                let (end, value) = digits(text, pos, 1, 2)?;
                fields.day = Some(value);
                Some(end)
            }
            Element::Weekday => self
                .weekdays
                .iter()
                .find(|name| starts_with_ignore_case(text, pos, name))
                .map(|name| pos + name.len()),
            Element::Hour { twelve } => {
                let (end, value) = digits(text, pos, 1, 2)?;
                fields.hour = Some(value);
                fields.twelve_hour = *twelve;
                Some(end)
            }
            Element::Minute => {
                let (end, value) = digits(text, pos, 2, 2)?;
                fields.minute = Some(value);
                Some(end)
            }
            Element::Second => {
                let (end, value) = digits(text, pos, 2, 2)?;
                fields.second = Some(value);
                Some(end)
            }
            Element::AmPm => {
                let (marker, pm) = self
                    .am_pm
                    .iter()
                    .find(|(marker, _)| starts_with_ignore_case(text, pos, marker))?;
                fields.pm = Some(*pm);
                Some(pos + marker.len())
            }
            Element::Zone => zone(text, pos),
            Element::Space => {
                let count = text[pos.min(text.len())..]
                    .iter()
                    .take_while(|c| is_white_space(**c))
                    .count();
                (count > 0).then_some(pos + count)
            }
            Element::Literal(literal) => {
                let end = pos + literal.len();
                (end <= text.len() && text[pos..end] == literal[..]).then_some(end)
            }
        }
    }
}

fn tokenize(pattern: &str) -> Vec<Element> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut elements = Vec::new();
    let mut literal: Vec<char> = Vec::new();
    let mut i = 0;

    let flush = |literal: &mut Vec<char>, elements: &mut Vec<Element>| {
        if !literal.is_empty() {
            elements.push(Element::Literal(std::mem::take(literal)));
        }
    };

    while i < chars.len() {
        let c = chars[i];
        if c == '\'' {
            // Quoted literal, '' is an escaped quote
            let mut j = i + 1;
            while j < chars.len() {
                if chars[j] == '\'' {
                    if chars.get(j + 1) == Some(&'\'') {
                        literal.push('\'');
                        j += 2;
                        continue;
                    }
                    break;
                }
                literal.push(chars[j]);
                j += 1;
            }
            if j == i + 1 {
                literal.push('\'');
            }
            i = j + 1;
            continue;
        }
        if c.is_whitespace() {
            flush(&mut literal, &mut elements);
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            elements.push(Element::Space);
            continue;
        }
        if c.is_ascii_alphabetic() {
            let count = chars[i..].iter().take_while(|x| **x == c).count();
            let element = match c {
                'y' => Some(Element::Year),
                'M' => Some(Element::Month { names: count >= 3 }),
                'd' => Some(Element::Day),
                'E' => Some(Element::Weekday),
                'H' => Some(Element::Hour { twelve: false }),
                'h' => Some(Element::Hour { twelve: true }),
                'm' => Some(Element::Minute),
                's' => Some(Element::Second),
                'a' => Some(Element::AmPm),
                'z' => Some(Element::Zone),
                _ => None,
            };
            if let Some(element) = element {
                flush(&mut literal, &mut elements);
                elements.push(element);
                i += count;
                continue;
            }
        }
        literal.push(c);
        i += 1;
    }
    flush(&mut literal, &mut elements);
    elements
}

fn digits(text: &[char], pos: usize, min: usize, max: usize) -> Option<(usize, u32)> {
    let mut end = pos;
    let mut value: u32 = 0;
    while end < text.len() && end - pos < max {
        let Some(digit) = text[end].to_digit(10).filter(|_| text[end].is_ascii_digit()) else {
            break;
        };
        value = value * 10 + digit;
        end += 1;
    }
    (end - pos >= min).then_some((end, value))
}

/// Zone abbreviations such as `CET`, `UTC` or `GMT+01:00`.
fn zone(text: &[char], pos: usize) -> Option<usize> {
    let letters = text[pos.min(text.len())..]
        .iter()
        .take_while(|c| c.is_ascii_uppercase())
        .count();
    if !(1..=5).contains(&letters) {
        return None;
    }
    let mut end = pos + letters;
    if let Some(sign) = text.get(end)
        && (*sign == '+' || *sign == '-')
        && let Some((after, _)) = digits(text, end + 1, 1, 2)
    {
        end = after;
        if text.get(end) == Some(&':')
            && let Some((after, _)) = digits(text, end + 1, 2, 2)
        {
            end = after;
        }
    }
    Some(end)
}

fn starts_with_ignore_case(text: &[char], pos: usize, lowered: &[char]) -> bool {
    let end = pos + lowered.len();
    if end > text.len() {
        return false;
    }
    text[pos..end]
        .iter()
        .zip(lowered)
        .all(|(c, l)| c.to_lowercase().eq(std::iter::once(*l)))
}

/// Parses a number at `start` using the locale's separators.
///
/// A grouping separator must be followed by exactly three digits, otherwise
/// the number ends before it.
pub fn parse_number(text: &[char], start: usize, formats: &LocaleFormats) -> Option<(usize, Value)> {
    let mut pos = start;
    let negative = text.get(pos) == Some(&'-');
    if negative {
        pos += 1;
    }

    let mut integer = String::new();
    while let Some(c) = text.get(pos).filter(|c| c.is_ascii_digit()) {
        integer.push(*c);
        pos += 1;
    }
    if integer.is_empty() {
        return None;
    }
    loop {
        let Some(sep) = text.get(pos) else { break };
        if !formats.grouping_separators.contains(sep) {
            break;
        }
        let group = &text[pos + 1..(pos + 4).min(text.len())];
        let followed = text.get(pos + 4).is_some_and(|c| c.is_ascii_digit());
        if group.len() == 3 && group.iter().all(|c| c.is_ascii_digit()) && !followed {
            integer.extend(group);
            pos += 4;
        } else {
            break;
        }
    }

    let mut fraction = String::new();
    if text.get(pos) == Some(&formats.decimal_separator) {
        let mut end = pos + 1;
        while let Some(c) = text.get(end).filter(|c| c.is_ascii_digit()) {
            fraction.push(*c);
            end += 1;
        }
        if !fraction.is_empty() {
            pos = end;
        }
    }

    let integer = integer.trim_start_matches('0');
    let fraction = fraction.trim_end_matches('0');
    let mut key = if integer.is_empty() { "0".to_string() } else { integer.to_string() };
    if !fraction.is_empty() {
        key.push('.');
        key.push_str(fraction);
    }
    if negative && key != "0" {
        key.insert(0, '-');
    }
    Some((pos, Value::Number(key)))
}
