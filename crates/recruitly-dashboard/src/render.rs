//! Plain-text rendering of the record collection

use crate::collection::RecordCollection;
use recruitly_core::EmployeeRecord;
use std::fmt;

/// Column headings, in display order
pub const COLUMNS: [&str; 5] = ["Name", "Department", "Role", "Salary", "Status"];

/// Single row shown when the collection is empty
pub const EMPTY_MESSAGE: &str = "No employees found";

const ID_HEADING: &str = "ID";

/// Text table over a record collection
#[derive(Debug, Clone, Copy)]
pub struct Table<'a> {
    collection: &'a RecordCollection,
    show_ids: bool,
}

impl<'a> Table<'a> {
    /// Table with the standard columns
    pub const fn new(collection: &'a RecordCollection) -> Self {
        Self {
            collection,
            show_ids: false,
        }
    }

    /// Prepend an identifier column
    #[must_use]
    pub const fn with_ids(mut self, show_ids: bool) -> Self {
        self.show_ids = show_ids;
        self
    }

    fn header(&self) -> Vec<String> {
        let mut header: Vec<String> = COLUMNS.iter().map(ToString::to_string).collect();
        if self.show_ids {
            header.insert(0, ID_HEADING.to_string());
        }
        header
    }

    fn row(&self, record: &EmployeeRecord) -> Vec<String> {
        let mut row = vec![
            record.name.clone(),
            record.department.to_string(),
            record.role.clone(),
            record.salary.to_string(),
            record.status.to_string(),
        ];
        if self.show_ids {
            row.insert(0, record.id.to_string());
        }
        row
    }
}

impl fmt::Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.header();

        if self.collection.is_empty() {
            writeln!(f, "{}", header.join("  "))?;
            return writeln!(f, "{EMPTY_MESSAGE}");
        }

        let rows: Vec<Vec<String>> = self.collection.iter().map(|r| self.row(r)).collect();
        let widths: Vec<usize> = header
            .iter()
            .enumerate()
            .map(|(column, heading)| {
                rows.iter()
                    .filter_map(|row| row.get(column))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(heading.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        for line in std::iter::once(&header).chain(rows.iter()) {
            let padded: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect();
            writeln!(f, "{}", padded.join("  ").trim_end())?;
        }
        Ok(())
    }
}

/// Render the collection with the standard columns
pub fn render_table(collection: &RecordCollection) -> String {
    Table::new(collection).to_string()
}
