//! `%`-style format templates
//!
//! Templates use named placeholders such as `%(asctime)s` or
//! `%(levelname)-8s`. They are parsed once when a sink is configured, so a
//! bad template fails construction instead of every log call.

use std::borrow::Cow;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};

use crate::error::FacadeError;

/// Record attributes a template can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Asctime,
    Name,
    LevelName,
    LevelNo,
    Message,
    FuncName,
    LineNo,
    FileName,
    PathName,
    Module,
    Process,
    ThreadName,
}

impl Field {
    fn from_name(name: &str) -> Option<Field> {
        let field = match name {
            "asctime" => Field::Asctime,
            "name" => Field::Name,
            "levelname" => Field::LevelName,
            "levelno" => Field::LevelNo,
            "message" => Field::Message,
            "funcName" => Field::FuncName,
            "lineno" => Field::LineNo,
            "filename" => Field::FileName,
            "pathname" => Field::PathName,
            "module" => Field::Module,
            "process" => Field::Process,
            "threadName" => Field::ThreadName,
            _ => return None,
        };
        Some(field)
    }

    fn is_numeric(self) -> bool {
        matches!(self, Field::LevelNo | Field::LineNo | Field::Process)
    }
}

/// Value supplied for a field at render time
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Text(Cow<'a, str>),
    Number(i64),
}

/// Source of field values for [`Template::render`]
pub trait FieldValues {
    fn value(&self, field: Field) -> FieldValue<'_>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Text,
    Integer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Placeholder {
    field: Field,
    left_align: bool,
    zero_pad: bool,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: Conversion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// A parsed format template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template string
    pub fn parse(source: &str) -> Result<Self, FacadeError> {
        let fail = |reason: &str| FacadeError::Template {
            template: source.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }

            match chars.next() {
                Some('%') => {
                    literal.push('%');
                    continue;
                }
                Some('(') => {}
                Some(_) => return Err(fail("positional placeholders are not supported")),
                None => return Err(fail("template ends with a lone '%'")),
            }

            let mut name = String::new();
            loop {
                match chars.next() {
                    Some(')') => break,
                    Some(c) => name.push(c),
                    None => return Err(fail("unterminated placeholder name")),
                }
            }
            let field = Field::from_name(&name)
                .ok_or_else(|| fail(&format!("unknown field '{}'", name)))?;

            let mut left_align = false;
            let mut zero_pad = false;
            while let Some(&flag) = chars.peek() {
                match flag {
                    '-' => left_align = true,
                    '0' => zero_pad = true,
                    _ => break,
                }
                chars.next();
            }

            let width = take_number(&mut chars);
            let precision = if chars.peek() == Some(&'.') {
                chars.next();
                Some(take_number(&mut chars).unwrap_or(0))
            } else {
                None
            };

            let conversion = match chars.next() {
                Some('s') => Conversion::Text,
                Some('d') | Some('i') => Conversion::Integer,
                Some(other) => {
                    return Err(fail(&format!("unsupported conversion '{}'", other)));
                }
                None => return Err(fail("placeholder is missing its conversion")),
            };
            if conversion == Conversion::Integer && !field.is_numeric() {
                return Err(fail(&format!("field '{}' is not numeric", name)));
            }

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Placeholder(Placeholder {
                field,
                left_align,
                zero_pad,
                width,
                precision,
                conversion,
            }));
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The template as written
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether any placeholder references `field`
    pub fn uses(&self, field: Field) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Placeholder(p) if p.field == field))
    }

    /// Substitute every placeholder with the values from `values`
    pub fn render(&self, values: &dyn FieldValues) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(placeholder) => {
                    out.push_str(&placeholder.render(values.value(placeholder.field)));
                }
            }
        }
        out
    }
}

impl Placeholder {
    fn render(&self, value: FieldValue<'_>) -> String {
        let text = match (self.conversion, value) {
            (Conversion::Integer, FieldValue::Number(n)) => {
                match self.width {
                    Some(width) if self.zero_pad && !self.left_align => {
                        return format!("{:0width$}", n, width = width);
                    }
                    _ => n.to_string(),
                }
            }
            // Integer conversion on a text field is rejected at parse time
            (Conversion::Integer, FieldValue::Text(text)) => text.into_owned(),
            (Conversion::Text, FieldValue::Number(n)) => n.to_string(),
            (Conversion::Text, FieldValue::Text(text)) => text.into_owned(),
        };

        let text = match (self.conversion, self.precision) {
            (Conversion::Text, Some(precision)) => text.chars().take(precision).collect(),
            _ => text,
        };

        match self.width {
            Some(width) if self.left_align => format!("{:<width$}", text, width = width),
            Some(width) => format!("{:>width$}", text, width = width),
            None => text,
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits.parse().ok()
}

/// A validated strftime pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFormat(String);

impl TimeFormat {
    /// Validate `pattern` against chrono's strftime syntax
    pub fn new(pattern: &str) -> Result<Self, FacadeError> {
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(FacadeError::TimeFormat(pattern.to_string()));
        }
        Ok(Self(pattern.to_string()))
    }

    /// The pattern as written
    pub fn pattern(&self) -> &str {
        &self.0
    }

    /// Format a timestamp with this pattern
    pub fn format(&self, timestamp: &DateTime<Local>) -> String {
        timestamp.format(&self.0).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Fixed;

    impl FieldValues for Fixed {
        fn value(&self, field: Field) -> FieldValue<'_> {
            match field {
                Field::LevelName => FieldValue::Text(Cow::Borrowed("INFO")),
                Field::Message => FieldValue::Text(Cow::Borrowed("hello")),
                Field::LineNo => FieldValue::Number(42),
                Field::Name => FieldValue::Text(Cow::Borrowed("root")),
                _ => FieldValue::Text(Cow::Borrowed("?")),
            }
        }
    }

    #[test]
    fn test_render_padded_level() {
        let template = Template::parse("%(levelname)-8s | %(message)s").unwrap();
        assert_eq!(template.render(&Fixed), "INFO     | hello");
    }

    #[test]
    fn test_render_right_aligned_and_zero_padded() {
        let template = Template::parse("[%(levelname)6s] %(lineno)05d").unwrap();
        assert_eq!(template.render(&Fixed), "[  INFO] 00042");
    }

    #[test]
    fn test_render_precision_truncates_text() {
        let template = Template::parse("%(message).3s").unwrap();
        assert_eq!(template.render(&Fixed), "hel");
    }

    #[test]
    fn test_number_as_text() {
        let template = Template::parse("line %(lineno)s").unwrap();
        assert_eq!(template.render(&Fixed), "line 42");
    }

    #[test]
    fn test_escaped_percent() {
        let template = Template::parse("100%% %(name)s").unwrap();
        assert_eq!(template.render(&Fixed), "100% root");
    }

    #[test]
    fn test_uses() {
        let template = Template::parse("%(asctime)s %(message)s").unwrap();
        assert!(template.uses(Field::Asctime));
        assert!(!template.uses(Field::FuncName));
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            "%(nope)s",
            "%s",
            "trailing %",
            "%(message",
            "%(message)",
            "%(message)x",
            "%(message)d",
        ] {
            assert!(
                matches!(Template::parse(bad), Err(FacadeError::Template { .. })),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_time_format() {
        let format = TimeFormat::new("%Y-%m-%d %H:%M:%S").unwrap();
        let timestamp = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format.format(&timestamp), "2024-03-09 07:05:01");
    }

    #[test]
    fn test_time_format_rejects_unknown_specifier() {
        assert!(matches!(
            TimeFormat::new("%Y-%!"),
            Err(FacadeError::TimeFormat(_))
        ));
    }
}
