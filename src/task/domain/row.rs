//! Spreadsheet rows and the columns the importer understands.

use std::fmt;

/// A column of the activity spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportColumn {
    /// "Attività": activity name, required.
    Name,
    /// "Azienda": customer company name.
    Company,
    /// "In carico a": assignee display name.
    Assignee,
    /// "Data": deadline.
    Date,
    /// "Tempo": planned time, accepted and ignored.
    Duration,
    /// "Fatta/da fare": status label.
    Status,
    /// "Macro ti": macro type tags.
    MacroType,
    /// "Commessa": project code.
    ProjectCode,
    /// "Descrizione attività": free-text description.
    Description,
    /// "Tipo attività": activity type tags.
    ActivityType,
    /// "Referente": contact person name.
    Contact,
}

impl ImportColumn {
    /// Column order assumed for files without a header row.
    pub const CANONICAL_ORDER: [Self; 11] = [
        Self::Name,
        Self::Company,
        Self::Assignee,
        Self::Date,
        Self::Duration,
        Self::Status,
        Self::MacroType,
        Self::ProjectCode,
        Self::Description,
        Self::ActivityType,
        Self::Contact,
    ];

    /// Returns the header label written by the spreadsheet export.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Attività",
            Self::Company => "Azienda",
            Self::Assignee => "In carico a",
            Self::Date => "Data",
            Self::Duration => "Tempo",
            Self::Status => "Fatta/da fare",
            Self::MacroType => "Macro ti",
            Self::ProjectCode => "Commessa",
            Self::Description => "Descrizione attività",
            Self::ActivityType => "Tipo attività",
            Self::Contact => "Referente",
        }
    }

    /// Returns alternative header labels seen in older exports.
    #[must_use]
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::MacroType => &["Macro tipo"],
            _ => &[],
        }
    }

    /// Returns whether a header cell names this column.
    #[must_use]
    pub fn matches_header(self, header: &str) -> bool {
        let trimmed = header.trim();
        trimmed == self.label() || self.aliases().contains(&trimmed)
    }
}

impl fmt::Display for ImportColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One spreadsheet line: header label to raw cell value, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportRow {
    line: usize,
    cells: Vec<(String, String)>,
}

impl ImportRow {
    /// Creates an empty row for the given 1-based source line.
    #[must_use]
    pub const fn new(line: usize) -> Self {
        Self {
            line,
            cells: Vec::new(),
        }
    }

    /// Creates a row from header/value pairs.
    #[must_use]
    pub fn from_cells<H, V>(line: usize, cells: impl IntoIterator<Item = (H, V)>) -> Self
    where
        H: Into<String>,
        V: Into<String>,
    {
        Self {
            line,
            cells: cells
                .into_iter()
                .map(|(header, value)| (header.into(), value.into()))
                .collect(),
        }
    }

    /// Adds a cell, keeping insertion order.
    #[must_use]
    pub fn with_cell(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.cells.push((header.into(), value.into()));
        self
    }

    /// Returns the 1-based source line (the header is line 1).
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Returns the raw value of a column, if the row carries it.
    #[must_use]
    pub fn raw(&self, column: ImportColumn) -> Option<&str> {
        self.cells
            .iter()
            .find(|(header, _)| column.matches_header(header))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the trimmed value of a column, or `None` when missing or
    /// blank.
    #[must_use]
    pub fn value(&self, column: ImportColumn) -> Option<&str> {
        self.raw(column)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}
