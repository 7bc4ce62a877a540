use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Document is a flat mapping of field name to string value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: BTreeMap<String, String>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Join the given fields with single spaces, in the order given.
    /// Returns the first absent field name on failure.
    pub fn joined_text<'a>(&self, names: &'a [String]) -> Result<String, &'a str> {
        let mut parts = Vec::with_capacity(names.len());
        for name in names {
            match self.fields.get(name) {
                Some(value) => parts.push(value.as_str()),
                None => return Err(name.as_str()),
            }
        }
        Ok(parts.join(" "))
    }
}

/// A ranked copy of a document with its similarity score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub document: Document,
    pub score: f64,
}

impl SearchHit {
    pub fn new(document: Document, score: f64) -> Self {
        Self { document, score }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.document.get(name)
    }
}
