//! Front-matter parsing
//!
//! Splitting is loosely typed: the YAML block becomes a [`RawFrontMatter`]
//! mapping. [`FrontMatter::validate`] then checks it field by field and
//! produces the typed record a [`Post`](super::Post) is built from.

use chrono::{Duration, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde_yaml::{Mapping, Value};

use super::error::{ContentError, Result};

const OPEN_DELIMITER: &str = "---";
const CLOSE_DELIMITER: &str = "\n---";

lazy_static! {
    static ref DATE_FORMAT: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap();
    /// YAML timestamp with a time part, the form a YAML loader turns into a native date
    static ref YAML_TIMESTAMP: Regex = Regex::new(
        r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})(?:[Tt]|[ \t]+)([0-9]{1,2}):([0-9]{2}):([0-9]{2})(?:\.[0-9]*)?(?:[ \t]*(Z|[-+][0-9]{1,2}(?::?[0-9]{2})?))?$"
    )
    .unwrap();
}

/// Untyped front-matter: the YAML mapping exactly as the author wrote it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFrontMatter(Mapping);

impl RawFrontMatter {
    /// Split a source file into its front-matter block and body.
    ///
    /// The body is returned verbatim after the closing delimiter line. Text
    /// without a leading `---` has no front-matter and is all body; a block
    /// with no closing delimiter swallows the rest of the file.
    pub fn split(source: &str) -> std::result::Result<(Self, &str), serde_yaml::Error> {
        let text = source.strip_prefix('\u{feff}').unwrap_or(source);

        let Some(rest) = text.strip_prefix(OPEN_DELIMITER) else {
            return Ok((Self::default(), text));
        };
        // `----` is a thematic break, not a delimiter
        if rest.starts_with('-') {
            return Ok((Self::default(), text));
        }

        // Skip an optional language label on the opening line (`---yaml`)
        let rest = match rest.find('\n') {
            Some(pos) if !rest[..pos].trim().is_empty() => &rest[pos..],
            _ => rest,
        };

        let (block, body) = match rest.find(CLOSE_DELIMITER) {
            Some(pos) => {
                let body = &rest[pos + CLOSE_DELIMITER.len()..];
                let body = body.strip_prefix('\r').unwrap_or(body);
                let body = body.strip_prefix('\n').unwrap_or(body);
                (&rest[..pos], body)
            }
            None => (rest, ""),
        };

        Ok((Self::from_yaml(block)?, body))
    }

    fn from_yaml(block: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let has_content = block.lines().any(|line| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        });
        if !has_content {
            return Ok(Self::default());
        }

        match serde_yaml::from_str::<Value>(block)? {
            Value::Mapping(mapping) => Ok(Self(mapping)),
            _ => Ok(Self::default()),
        }
    }

    /// Look up a key; `Some(Value::Null)` means the key is present but empty
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validated front-matter of a post
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub title: String,
    /// Calendar day in `YYYY-MM-DD` form
    pub date: String,
    /// Resolved from `description`, falling back to `excerpt`
    pub summary: String,
    pub tags: Option<Vec<String>>,
    pub cover_image: Option<String>,
    /// `draft: true` or `published: false`
    pub draft: bool,
}

impl FrontMatter {
    /// Check raw front-matter field by field.
    ///
    /// Rules are applied in a fixed order and the first failure is returned,
    /// naming `file_name`.
    pub fn validate(raw: &RawFrontMatter, file_name: &str) -> Result<Self> {
        let file = || file_name.to_string();

        let title = trimmed_string(raw.get("title")).unwrap_or_default();
        if title.is_empty() {
            return Err(ContentError::InvalidTitle { file: file() });
        }

        let date = raw.get("date").and_then(coerce_date).unwrap_or_default();
        if !is_valid_date(&date) {
            return Err(ContentError::InvalidDate { file: file() });
        }

        let summary = [raw.get("description"), raw.get("excerpt")]
            .into_iter()
            .filter_map(trimmed_string)
            .find(|s| !s.is_empty())
            .ok_or_else(|| ContentError::MissingSummary { file: file() })?;

        let draft = match raw.get("draft") {
            None => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(_) => return Err(ContentError::InvalidDraft { file: file() }),
        };

        let published = match raw.get("published") {
            None => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(_) => return Err(ContentError::InvalidPublished { file: file() }),
        };

        let tags = match raw.get("tags") {
            None => None,
            Some(Value::Sequence(items)) => {
                let mut tags = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(tag) => tags.push(tag.trim().to_string()),
                        _ => return Err(ContentError::InvalidTags { file: file() }),
                    }
                }
                tags.retain(|tag| !tag.is_empty());
                Some(tags).filter(|tags| !tags.is_empty())
            }
            Some(_) => return Err(ContentError::InvalidTags { file: file() }),
        };

        let cover_image = trimmed_string(raw.get("coverImage")).filter(|s| !s.is_empty());

        Ok(Self {
            title,
            date,
            summary,
            tags,
            cover_image,
            draft: draft == Some(true) || published == Some(false),
        })
    }
}

fn trimmed_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Turn a `date` value into its `YYYY-MM-DD` candidate.
///
/// A YAML timestamp with a time part is a native date value and is reduced
/// to its UTC calendar day; any other string is only trimmed.
fn coerce_date(value: &Value) -> Option<String> {
    let Value::String(s) = value else {
        return None;
    };
    let s = s.trim();
    Some(timestamp_utc_day(s).unwrap_or_else(|| s.to_string()))
}

fn timestamp_utc_day(s: &str) -> Option<String> {
    let caps = YAML_TIMESTAMP.captures(s)?;
    let num = |i: usize| caps[i].parse::<u32>().ok();

    let date = NaiveDate::from_ymd_opt(caps[1].parse().ok()?, num(2)?, num(3)?)?;
    let local = date.and_hms_opt(num(4)?, num(5)?, num(6)?)?;

    // Timestamps without an offset are UTC
    let offset_minutes = match caps.get(7).map(|m| m.as_str()) {
        None | Some("Z") => 0,
        Some(tz) => parse_offset_minutes(tz)?,
    };

    let utc = local - Duration::minutes(offset_minutes);
    Some(utc.format("%Y-%m-%d").to_string())
}

fn parse_offset_minutes(tz: &str) -> Option<i64> {
    let (sign, digits) = match tz.split_at(1) {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => return None,
    };
    let digits = digits.replace(':', "");
    let (hours, minutes) = if digits.len() > 2 {
        digits.split_at(digits.len() - 2)
    } else {
        (digits.as_str(), "0")
    };
    Some(sign * (hours.parse::<i64>().ok()? * 60 + minutes.parse::<i64>().ok()?))
}

/// Strict `YYYY-MM-DD` that names a real day on the UTC calendar
pub(crate) fn is_valid_date(date: &str) -> bool {
    DATE_FORMAT.is_match(date)
        && NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(|d| d.format("%Y-%m-%d").to_string() == date)
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(yaml: &str) -> Result<FrontMatter> {
        let source = format!("---\n{}\n---\n", yaml);
        let (raw, _) = RawFrontMatter::split(&source).unwrap();
        FrontMatter::validate(&raw, "post.md")
    }

    const VALID: &str = "title: Hello\ndate: 2024-01-05\ndescription: Short";

    #[test]
    fn test_split_yaml_frontmatter() {
        let content = "---\ntitle: Hello World\ntags:\n  - rust\n---\n\nThis is the content.\n";

        let (raw, body) = RawFrontMatter::split(content).unwrap();
        assert_eq!(
            raw.get("title"),
            Some(&Value::String("Hello World".to_string()))
        );
        assert_eq!(body, "\nThis is the content.\n");
    }

    #[test]
    fn test_split_without_frontmatter() {
        let content = "# Just markdown\n\nNo metadata here.";
        let (raw, body) = RawFrontMatter::split(content).unwrap();
        assert!(raw.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_split_thematic_break_is_not_frontmatter() {
        let content = "----\ntitle: nope\n----\n";
        let (raw, body) = RawFrontMatter::split(content).unwrap();
        assert!(raw.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_split_strips_bom_and_crlf() {
        let content = "\u{feff}---\r\ntitle: Hi\r\n---\r\nBody\r\n";
        let (raw, body) = RawFrontMatter::split(content).unwrap();
        assert_eq!(raw.get("title"), Some(&Value::String("Hi".to_string())));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_split_unclosed_block_has_empty_body() {
        let (raw, body) = RawFrontMatter::split("---\ntitle: Open\n").unwrap();
        assert!(raw.get("title").is_some());
        assert_eq!(body, "");
    }

    #[test]
    fn test_split_comment_only_block() {
        let (raw, body) = RawFrontMatter::split("---\n# nothing yet\n---\nText").unwrap();
        assert!(raw.is_empty());
        assert_eq!(body, "Text");
    }

    #[test]
    fn test_split_invalid_yaml_is_an_error() {
        assert!(RawFrontMatter::split("---\ntitle: [unclosed\n---\nBody").is_err());
    }

    #[test]
    fn test_split_non_mapping_block() {
        let (raw, _) = RawFrontMatter::split("---\n- a\n- b\n---\nBody").unwrap();
        assert!(raw.is_empty());
    }

    #[test]
    fn test_validate_minimal() {
        let fm = validate(VALID).unwrap();
        assert_eq!(fm.title, "Hello");
        assert_eq!(fm.date, "2024-01-05");
        assert_eq!(fm.summary, "Short");
        assert_eq!(fm.tags, None);
        assert_eq!(fm.cover_image, None);
        assert!(!fm.draft);
    }

    #[test]
    fn test_validate_title() {
        let err = validate("date: 2024-01-05\ndescription: d").unwrap_err();
        assert!(matches!(err, ContentError::InvalidTitle { .. }));

        let err = validate("title: '   '\ndate: 2024-01-05\ndescription: d").unwrap_err();
        assert!(matches!(err, ContentError::InvalidTitle { .. }));

        let err = validate("title: 42\ndate: 2024-01-05\ndescription: d").unwrap_err();
        assert!(matches!(err, ContentError::InvalidTitle { .. }));
        assert_eq!(err.file_name(), Some("post.md"));
    }

    #[test]
    fn test_validate_rejects_impossible_dates() {
        for date in ["2024-02-30", "2024-13-40", "2024-1-5", "January 5", "20240105"] {
            let yaml = format!("title: T\ndate: '{}'\ndescription: d", date);
            let err = validate(&yaml).unwrap_err();
            assert!(
                matches!(err, ContentError::InvalidDate { .. }),
                "{} should be rejected",
                date
            );
        }
        let err = validate("title: T\ndescription: d").unwrap_err();
        assert_eq!(err.field(), Some("date"));
    }

    #[test]
    fn test_validate_accepts_leap_day() {
        let fm = validate("title: T\ndate: 2024-02-29\ndescription: d").unwrap();
        assert_eq!(fm.date, "2024-02-29");
        assert!(validate("title: T\ndate: 2023-02-29\ndescription: d").is_err());
    }

    #[test]
    fn test_validate_timestamp_normalized_to_utc_day() {
        let fm = validate("title: T\ndate: 2024-01-05T01:30:00+02:00\ndescription: d").unwrap();
        assert_eq!(fm.date, "2024-01-04");

        let fm = validate("title: T\ndate: 2024-01-05 10:00:00\ndescription: d").unwrap();
        assert_eq!(fm.date, "2024-01-05");

        let fm = validate("title: T\ndate: 2024-01-05T22:00:00-05:00\ndescription: d").unwrap();
        assert_eq!(fm.date, "2024-01-06");
    }

    #[test]
    fn test_quoted_timestamp_reads_as_timestamp() {
        // serde_yaml yields the same string for quoted and unquoted scalars
        let quoted = validate("title: T\ndate: '2024-01-05T10:00:00Z'\ndescription: d").unwrap();
        let plain = validate("title: T\ndate: 2024-01-05T10:00:00Z\ndescription: d").unwrap();
        assert_eq!(quoted.date, "2024-01-05");
        assert_eq!(quoted.date, plain.date);

        let fm = validate("title: T\ndate: \"2024-01-05 23:30:00 -01:00\"\ndescription: d").unwrap();
        assert_eq!(fm.date, "2024-01-06");
    }

    #[test]
    fn test_summary_fallback() {
        let fm = validate("title: T\ndate: 2024-01-05\nexcerpt: E").unwrap();
        assert_eq!(fm.summary, "E");

        let fm = validate("title: T\ndate: 2024-01-05\ndescription: D\nexcerpt: E").unwrap();
        assert_eq!(fm.summary, "D");

        let fm = validate("title: T\ndate: 2024-01-05\ndescription: '  '\nexcerpt: E").unwrap();
        assert_eq!(fm.summary, "E");

        let err = validate("title: T\ndate: 2024-01-05\nexcerpt: ''").unwrap_err();
        assert!(matches!(err, ContentError::MissingSummary { .. }));
        assert_eq!(err.field(), Some("summary"));
    }

    #[test]
    fn test_draft_and_published() {
        assert!(validate(&format!("{}\ndraft: true", VALID)).unwrap().draft);
        assert!(validate(&format!("{}\npublished: false", VALID)).unwrap().draft);
        assert!(!validate(&format!("{}\npublished: true", VALID)).unwrap().draft);
        assert!(!validate(&format!("{}\ndraft: false", VALID)).unwrap().draft);

        let err = validate(&format!("{}\ndraft: 'yes'", VALID)).unwrap_err();
        assert!(matches!(err, ContentError::InvalidDraft { .. }));

        let err = validate(&format!("{}\npublished:", VALID)).unwrap_err();
        assert!(matches!(err, ContentError::InvalidPublished { .. }));
    }

    #[test]
    fn test_tag_normalization() {
        let fm = validate(&format!("{}\ntags: ['  a  ', '', 'b']", VALID)).unwrap();
        assert_eq!(fm.tags, Some(vec!["a".to_string(), "b".to_string()]));

        let fm = validate(&format!("{}\ntags: []", VALID)).unwrap();
        assert_eq!(fm.tags, None);

        let fm = validate(&format!("{}\ntags: ['   ']", VALID)).unwrap();
        assert_eq!(fm.tags, None);
    }

    #[test]
    fn test_invalid_tags() {
        for tags in ["tags: rust", "tags: [rust, 3]", "tags:"] {
            let err = validate(&format!("{}\n{}", VALID, tags)).unwrap_err();
            assert!(matches!(err, ContentError::InvalidTags { .. }), "{}", tags);
        }
    }

    #[test]
    fn test_cover_image() {
        let fm = validate(&format!("{}\ncoverImage: ' /img/a.png '", VALID)).unwrap();
        assert_eq!(fm.cover_image.as_deref(), Some("/img/a.png"));

        let fm = validate(&format!("{}\ncoverImage: ''", VALID)).unwrap();
        assert_eq!(fm.cover_image, None);
    }

    #[test]
    fn test_is_valid_date() {
        assert!(is_valid_date("2024-01-05"));
        assert!(!is_valid_date("2024-02-30"));
        assert!(!is_valid_date(" 2024-01-05"));
        assert!(!is_valid_date(""));
    }
}
