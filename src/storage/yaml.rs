//! Block-style YAML emitter with explicit layout settings.
//!
//! Record files are meant to be reviewed as diffs, so the layout is fixed by a
//! [`YamlStyle`] value handed to every call instead of shared emitter state:
//!
//! ```text
//! ---
//! name: Vlinders tellen
//! tags:
//!   - insects
//!   - counting
//! ```

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{AppError, Result};

/// Layout settings for emitted YAML documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YamlStyle {
    /// Emit the `---` document start marker
    #[serde(default = "defaults::explicit_start")]
    pub explicit_start: bool,

    /// Indentation of nested mappings
    #[serde(default = "defaults::mapping_indent")]
    pub mapping_indent: usize,

    /// Column of sequence item content, relative to the parent key
    #[serde(default = "defaults::sequence_indent")]
    pub sequence_indent: usize,

    /// Column of the `-` indicator, relative to the parent key
    #[serde(default = "defaults::sequence_offset")]
    pub sequence_offset: usize,
}

impl Default for YamlStyle {
    fn default() -> Self {
        Self {
            explicit_start: defaults::explicit_start(),
            mapping_indent: defaults::mapping_indent(),
            sequence_indent: defaults::sequence_indent(),
            sequence_offset: defaults::sequence_offset(),
        }
    }
}

impl YamlStyle {
    /// Check that the indicator fits inside the sequence indentation.
    pub fn validate(&self) -> Result<()> {
        if self.mapping_indent == 0 {
            return Err(AppError::config("records.mapping_indent must be > 0"));
        }
        if self.sequence_offset + 2 > self.sequence_indent {
            return Err(AppError::config(
                "records.sequence_offset + 2 must not exceed records.sequence_indent",
            ));
        }
        Ok(())
    }

    /// Serialize a value to a YAML document using this layout.
    pub fn to_document<T: Serialize>(&self, value: &T) -> Result<String> {
        let value = serde_yaml::to_value(value)?;
        let mut out = String::new();
        if self.explicit_start {
            out.push_str("---\n");
        }
        match &value {
            Value::Mapping(map) if !map.is_empty() => self.write_mapping(&mut out, map, 0)?,
            Value::Sequence(seq) if !seq.is_empty() => self.write_sequence(&mut out, seq, 0)?,
            other => {
                out.push_str(&scalar(other)?);
                out.push('\n');
            }
        }
        Ok(out)
    }

    fn write_mapping(&self, out: &mut String, map: &Mapping, indent: usize) -> Result<()> {
        for (key, value) in map {
            out.push_str(&" ".repeat(indent));
            out.push_str(&scalar(key)?);
            out.push(':');
            match value {
                Value::Mapping(inner) if !inner.is_empty() => {
                    out.push('\n');
                    self.write_mapping(out, inner, indent + self.mapping_indent)?;
                }
                Value::Sequence(items) if !items.is_empty() => {
                    out.push('\n');
                    self.write_sequence(out, items, indent)?;
                }
                other => {
                    out.push(' ');
                    out.push_str(&scalar(other)?);
                    out.push('\n');
                }
            }
        }
        Ok(())
    }

    fn write_sequence(&self, out: &mut String, items: &[Value], indent: usize) -> Result<()> {
        let gap = self
            .sequence_indent
            .saturating_sub(self.sequence_offset + 1)
            .max(1);
        let prefix = format!(
            "{}-{}",
            " ".repeat(indent + self.sequence_offset),
            " ".repeat(gap)
        );
        let column = prefix.len();

        for item in items {
            match item {
                Value::Mapping(inner) if !inner.is_empty() => {
                    let mut nested = String::new();
                    self.write_mapping(&mut nested, inner, column)?;
                    out.push_str(&prefix);
                    out.push_str(&nested[column..]);
                }
                Value::Sequence(inner) if !inner.is_empty() => {
                    let base = column - self.sequence_offset;
                    let mut nested = String::new();
                    self.write_sequence(&mut nested, inner, base)?;
                    out.push_str(&prefix);
                    out.push_str(&nested[column..]);
                }
                other => {
                    out.push_str(&prefix);
                    out.push_str(&scalar(other)?);
                    out.push('\n');
                }
            }
        }
        Ok(())
    }
}

/// Render a scalar (or empty collection) on a single line.
fn scalar(value: &Value) -> Result<String> {
    match value {
        Value::Null => Ok("null".to_string()),
        Value::String(s) if s.contains('\n') => Ok(serde_json::to_string(s)?),
        Value::Mapping(map) if map.is_empty() => Ok("{}".to_string()),
        Value::Sequence(seq) if seq.is_empty() => Ok("[]".to_string()),
        other => {
            let rendered = serde_yaml::to_string(other)?;
            let line = rendered.trim_end_matches('\n');
            if line.contains('\n') {
                // JSON is valid flow-style YAML and always fits on one line
                return Ok(serde_json::to_string(other)?);
            }
            Ok(line.to_string())
        }
    }
}

mod defaults {
    pub fn explicit_start() -> bool {
        true
    }
    pub fn mapping_indent() -> usize {
        2
    }
    pub fn sequence_indent() -> usize {
        4
    }
    pub fn sequence_offset() -> usize {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_explicit_start_and_scalars() {
        let value = mapping("name: Vlinders tellen\nstart_date: 2020\nend_date: null\n");
        let text = YamlStyle::default().to_document(&value).unwrap();
        assert_eq!(
            text,
            "---\nname: Vlinders tellen\nstart_date: 2020\nend_date: null\n"
        );
    }

    #[test]
    fn test_sequence_indent_and_offset() {
        let value = mapping("tags: [insects, counting]\nnested: {a: 1}\n");
        let text = YamlStyle::default().to_document(&value).unwrap();
        assert_eq!(
            text,
            "---\ntags:\n  - insects\n  - counting\nnested:\n  a: 1\n"
        );
    }

    #[test]
    fn test_mapping_inside_sequence() {
        let value = mapping("people:\n- name: Ann\n  role: lead\n- name: Bob\n  role: dev\n");
        let text = YamlStyle::default().to_document(&value).unwrap();
        assert_eq!(
            text,
            "---\npeople:\n  - name: Ann\n    role: lead\n  - name: Bob\n    role: dev\n"
        );
        assert_eq!(serde_yaml::from_str::<Value>(&text).unwrap(), value);
    }

    #[test]
    fn test_strings_that_need_quoting_survive() {
        let value = mapping(
            "a: 'yes'\nb: '2020'\nc: \"line one\\nline two\"\nd: 'x: y'\ne: ''\nf: []\n",
        );
        let text = YamlStyle::default().to_document(&value).unwrap();
        assert_eq!(serde_yaml::from_str::<Value>(&text).unwrap(), value);
    }

    #[test]
    fn test_without_document_start() {
        let style = YamlStyle {
            explicit_start: false,
            ..YamlStyle::default()
        };
        let text = style.to_document(&mapping("a: 1\n")).unwrap();
        assert_eq!(text, "a: 1\n");
    }

    #[test]
    fn test_validate_rejects_offset_past_indent() {
        let style = YamlStyle {
            sequence_indent: 2,
            sequence_offset: 2,
            ..YamlStyle::default()
        };
        assert!(style.validate().is_err());
        assert!(YamlStyle::default().validate().is_ok());
    }
}
