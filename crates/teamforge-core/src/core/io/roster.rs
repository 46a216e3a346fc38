use crate::core::models::person::PersonRecord;
use crate::core::models::roster::{Roster, RosterError};
use phf::{Map, phf_map};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Name,
    Role,
    Experience,
    Score,
}

impl Column {
    fn label(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Name => "name",
            Column::Role => "role",
            Column::Experience => "experience",
            Column::Score => "score",
        }
    }
}

#[rustfmt::skip]
static COLUMN_ALIASES: Map<&'static str, Column> = phf_map! {
    "id" => Column::Id, "person id" => Column::Id, "participant id" => Column::Id,

    "name" => Column::Name, "full name" => Column::Name, "participant" => Column::Name,

    "role" => Column::Role, "position" => Column::Role,

    "experience" => Column::Experience, "exp" => Column::Experience,
    "years of experience" => Column::Experience, "experience level" => Column::Experience,

    "score" => Column::Score, "evaluation score" => Column::Score,
    "evaluation" => Column::Score, "rating" => Column::Score,
};

#[derive(Debug, Error)]
pub enum RosterIoError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV parsing error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("Missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("Row {row}: invalid {field} value '{value}'")]
    InvalidValue {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("Row {row}: {source}")]
    Invalid {
        row: usize,
        #[source]
        source: RosterError,
    },
}

fn normalize_header(header: &str) -> String {
    header
        .replace(['_', '-'], " ")
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Default)]
struct ColumnMap {
    id: Option<usize>,
    name: Option<usize>,
    role: Option<usize>,
    experience: Option<usize>,
    score: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, RosterIoError> {
        let mut map = Self::default();
        for (idx, header) in headers.iter().enumerate() {
            let Some(column) = COLUMN_ALIASES.get(normalize_header(header).as_str()) else {
                continue;
            };
            let slot = match column {
                Column::Id => &mut map.id,
                Column::Name => &mut map.name,
                Column::Role => &mut map.role,
                Column::Experience => &mut map.experience,
                Column::Score => &mut map.score,
            };
            // First matching header wins.
            slot.get_or_insert(idx);
        }

        for (slot, column) in [
            (map.name, Column::Name),
            (map.role, Column::Role),
            (map.experience, Column::Experience),
            (map.score, Column::Score),
        ] {
            if slot.is_none() {
                return Err(RosterIoError::MissingColumn {
                    column: column.label(),
                });
            }
        }
        Ok(map)
    }
}

fn field<'r>(record: &'r csv::StringRecord, idx: Option<usize>) -> &'r str {
    idx.and_then(|i| record.get(i)).unwrap_or("").trim()
}

fn parse_number(raw: &str, row: usize, column: Column) -> Result<f64, RosterIoError> {
    raw.parse::<f64>().map_err(|_| RosterIoError::InvalidValue {
        row,
        field: column.label(),
        value: raw.to_string(),
    })
}

/// Reads a roster from CSV data with a header row.
///
/// Headers are matched case-insensitively through an alias table, so exports using
/// `evaluation score` or `Years of Experience` work unchanged. Unknown columns such as
/// email or phone are ignored. When no id column exists, ids are synthesized as
/// `row-<n>` using the 1-based data row number.
pub fn read_from<R: Read>(reader: R) -> Result<Roster, RosterIoError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = ColumnMap::from_headers(csv_reader.headers()?)?;

    let mut roster = Roster::new();
    for (idx, result) in csv_reader.records().enumerate() {
        let record = result?;
        let row = idx + 1;

        let id = match field(&record, columns.id) {
            "" => format!("row-{row}"),
            value => value.to_string(),
        };
        let experience = parse_number(field(&record, columns.experience), row, Column::Experience)?;
        let score = parse_number(field(&record, columns.score), row, Column::Score)?;

        let person = PersonRecord::new(
            id,
            field(&record, columns.name),
            field(&record, columns.role),
            experience,
            score,
        );
        roster
            .add(person)
            .map_err(|source| RosterIoError::Invalid { row, source })?;
    }
    Ok(roster)
}

/// Reads a roster from a CSV file on disk.
pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Roster, RosterIoError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| RosterIoError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    read_from(file)
}
