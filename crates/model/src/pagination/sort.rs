use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Maps a `+`/`-` sort sign to a direction.
    pub fn from_sign(sign: char) -> Option<Self> {
        match sign {
            '+' => Some(SortDirection::Asc),
            '-' => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortColumn {
    pub column: String,
    pub direction: SortDirection,
}

impl SortColumn {
    pub fn asc(column: &str) -> Self {
        SortColumn {
            column: column.to_string(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: &str) -> Self {
        SortColumn {
            column: column.to_string(),
            direction: SortDirection::Desc,
        }
    }
}

/// Ordered list of sort columns; earlier columns take priority in tie-breaks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    columns: Vec<SortColumn>,
}

impl SortSpec {
    pub fn new(columns: Vec<SortColumn>) -> Self {
        SortSpec { columns }
    }

    /// Appends a column unless it is already part of the spec.
    pub fn push(&mut self, column: SortColumn) {
        if !self.contains(&column.column) {
            self.columns.push(column);
        }
    }

    pub fn columns(&self) -> &[SortColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.column.as_str()).collect()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.column == column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when the spec is non-empty and every column descends.
    pub fn is_all_descending(&self) -> bool {
        !self.columns.is_empty()
            && self
                .columns
                .iter()
                .all(|c| c.direction == SortDirection::Desc)
    }

    /// Descending only when strictly every column descends; mixed specs are
    /// treated as ascending.
    pub fn effective_direction(&self) -> SortDirection {
        if self.is_all_descending() {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    /// The same columns with every direction flipped.
    pub fn reversed(&self) -> SortSpec {
        SortSpec {
            columns: self
                .columns
                .iter()
                .map(|c| SortColumn {
                    column: c.column.clone(),
                    direction: c.direction.reversed(),
                })
                .collect(),
        }
    }
}
