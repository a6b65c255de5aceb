//! InfluxDB 1.x line protocol encoding for a single point.
//!
//! `measurement,tag=value field=value,...`
//!
//! No timestamp is written; the server stamps the point on arrival.

use crate::error::{NotifyError, Result};
use std::fmt::Write;

/// A field value of a stat point.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Count(usize),
    Text(String),
}

/// One report snapshot in line-protocol form.
#[derive(Debug, Clone, PartialEq)]
pub struct StatPoint {
    pub measurement: String,
    pub tags: Vec<(String, String)>,
    pub fields: Vec<(String, FieldValue)>,
}

impl StatPoint {
    pub fn new(measurement: &str) -> Self {
        Self {
            measurement: measurement.to_string(),
            tags: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.tags.push((key.to_string(), value.to_string()));
        self
    }

    pub fn field(mut self, key: &str, value: FieldValue) -> Self {
        self.fields.push((key.to_string(), value));
        self
    }

    /// Looks up a field by key.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Encodes the point as one line, without a trailing newline.
    pub fn to_line(&self) -> Result<String> {
        if self.measurement.is_empty() {
            return Err(NotifyError::Encoding("measurement is empty".into()));
        }
        if self.fields.is_empty() {
            return Err(NotifyError::Encoding("a point needs at least one field".into()));
        }

        let mut line = escape_measurement(&self.measurement)?;
        for (key, value) in &self.tags {
            if value.is_empty() {
                return Err(NotifyError::Encoding(format!("tag {} has an empty value", key)));
            }
            let _ = write!(line, ",{}={}", escape_key(key)?, escape_key(value)?);
        }

        let mut separator = ' ';
        for (key, value) in &self.fields {
            line.push(separator);
            separator = ',';
            line.push_str(&escape_key(key)?);
            line.push('=');
            match value {
                FieldValue::Count(n) => {
                    let _ = write!(line, "{}", n);
                }
                FieldValue::Text(text) => {
                    line.push('"');
                    line.push_str(&escape_string_field(text)?);
                    line.push('"');
                }
            }
        }
        Ok(line)
    }
}

fn reject_newline(value: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        return Err(NotifyError::Encoding(format!(
            "newline in {:?}",
            value
        )));
    }
    Ok(())
}

/// Escapes commas and spaces.
pub fn escape_measurement(value: &str) -> Result<String> {
    reject_newline(value)?;
    Ok(escape_chars(value, &[',', ' ']))
}

/// Escapes commas, equals signs and spaces in tag keys, tag values and field keys.
pub fn escape_key(value: &str) -> Result<String> {
    reject_newline(value)?;
    Ok(escape_chars(value, &[',', '=', ' ']))
}

/// Escapes double quotes and backslashes inside a quoted string field.
pub fn escape_string_field(value: &str) -> Result<String> {
    reject_newline(value)?;
    Ok(escape_chars(value, &['\\', '"']))
}

fn escape_chars(value: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
