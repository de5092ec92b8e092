use serde::{Deserialize, Serialize};
use std::fmt;

/// The unified column set every source is mapped onto, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    #[serde(rename = "Cur. service")]
    CurService,
    Title,
    Genre,
    Premiere,
    Seasons,
    Status,
    Language,
    Runtime,
    Episodes,
    #[serde(rename = "Prev. network(s)")]
    PrevNetworks,
}

impl Column {
    /// Output header order of the final dataset
    pub const OUTPUT: [Column; 10] = [
        Column::CurService,
        Column::Title,
        Column::Genre,
        Column::Premiere,
        Column::Seasons,
        Column::Status,
        Column::Language,
        Column::Runtime,
        Column::Episodes,
        Column::PrevNetworks,
    ];

    pub const fn header(self) -> &'static str {
        match self {
            Column::CurService => "Cur. service",
            Column::Title => "Title",
            Column::Genre => "Genre",
            Column::Premiere => "Premiere",
            Column::Seasons => "Seasons",
            Column::Status => "Status",
            Column::Language => "Language",
            Column::Runtime => "Runtime",
            Column::Episodes => "Episodes",
            Column::PrevNetworks => "Prev. network(s)",
        }
    }

    pub fn from_header(header: &str) -> Option<Self> {
        Self::OUTPUT.into_iter().find(|c| c.header() == header)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// A wiki table flattened into a rectangular grid. Empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { headers, rows }
    }

    pub fn has_column(&self, header: &str) -> bool {
        self.headers.iter().any(|h| h == header)
    }

    /// Iterate rows keyed by header text
    pub fn records(&self) -> impl Iterator<Item = RawRecord<'_>> {
        self.rows.iter().map(move |row| {
            let mut cells: Vec<(&str, &str)> = Vec::with_capacity(row.len());
            for (header, cell) in self.headers.iter().zip(row) {
                let Some(value) = cell.as_deref() else {
                    continue;
                };
                // Repeated headers keep the leftmost cell
                if !cells.iter().any(|(h, _)| *h == header.as_str()) {
                    cells.push((header.as_str(), value));
                }
            }
            RawRecord { cells }
        })
    }
}

/// One row of a source table before normalization, filled cells in column order
#[derive(Debug, Clone, Default)]
pub struct RawRecord<'a> {
    cells: Vec<(&'a str, &'a str)>,
}

impl<'a> RawRecord<'a> {
    pub fn get(&self, header: &str) -> Option<&'a str> {
        self.cells
            .iter()
            .find(|(h, _)| *h == header)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.cells.iter().copied()
    }
}
