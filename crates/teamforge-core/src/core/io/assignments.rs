use crate::core::models::ids::PersonId;
use crate::core::models::roster::Roster;
use crate::core::models::team::Team;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssignmentWriteError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV writing error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },
    #[error("Person {0:?} is not part of the roster")]
    UnknownPerson(PersonId),
}

#[derive(Debug, Serialize)]
struct AssignmentRow<'a> {
    team: Option<usize>,
    template: &'a str,
    id: &'a str,
    name: &'a str,
    role: &'a str,
    experience: f64,
    score: f64,
}

/// Writes one CSV row per person: team members first (teams numbered from 1),
/// then leftover people with an empty `team` column.
pub fn write_to<W: Write>(
    writer: W,
    roster: &Roster,
    teams: &[Team],
    leftover: &[PersonId],
) -> Result<(), AssignmentWriteError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let placed = teams.iter().enumerate().flat_map(|(idx, team)| {
        team.members
            .iter()
            .map(move |&id| (Some(idx + 1), team.template.as_str(), id))
    });
    let unplaced = leftover.iter().map(|&id| (None, "", id));

    for (team, template, id) in placed.chain(unplaced) {
        let person = roster
            .person(id)
            .ok_or(AssignmentWriteError::UnknownPerson(id))?;
        csv_writer.serialize(AssignmentRow {
            team,
            template,
            id: &person.id,
            name: &person.name,
            role: person.role.display(),
            experience: person.experience,
            score: person.score,
        })?;
    }

    csv_writer.flush().map_err(|e| AssignmentWriteError::Io {
        path: "<writer>".to_string(),
        source: e,
    })?;
    Ok(())
}

pub fn write_to_path<P: AsRef<Path>>(
    path: P,
    roster: &Roster,
    teams: &[Team],
    leftover: &[PersonId],
) -> Result<(), AssignmentWriteError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| AssignmentWriteError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    write_to(file, roster, teams, leftover)
}
