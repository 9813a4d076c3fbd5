use serde::{Deserialize, Serialize};

/// Snapshot of one row's keyset values, as text, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPosition {
    entries: Vec<(String, String)>,
}

impl CursorPosition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, column: &str, value: &str) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: &str, value: &str) {
        self.entries.push((column.to_string(), value.to_string()));
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<S: Into<String>> FromIterator<(S, S)> for CursorPosition {
    fn from_iter<I: IntoIterator<Item = (S, S)>>(iter: I) -> Self {
        CursorPosition {
            entries: iter
                .into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        }
    }
}
