use std::fmt::Write;
use teamforge::core::models::roster::Roster;
use teamforge::core::models::template::TemplateSet;
use teamforge::workflows::form::FormationResult;

const RULE: &str = "--------------------------------------------------";

/// Renders the human-readable summary of a formation run.
pub fn render(roster: &Roster, templates: &TemplateSet, result: &FormationResult) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, roster, templates, result);
    out
}

fn write_report(
    out: &mut String,
    roster: &Roster,
    templates: &TemplateSet,
    result: &FormationResult,
) -> std::fmt::Result {
    writeln!(out, "Final Teams:")?;
    for (index, team) in result.teams.iter().enumerate() {
        let max = templates
            .get(&team.template)
            .map_or_else(|| "?".to_string(), |t| t.max_members().to_string());
        writeln!(
            out,
            "\nTeam {} (Type: {}, Size: {}/{}):",
            index + 1,
            team.template,
            team.size(),
            max
        )?;
        writeln!(out, "{RULE}")?;

        let mut members: Vec<_> = team.members.clone();
        roster.sort_by_standing(&mut members);
        for person in members.iter().filter_map(|&id| roster.person(id)) {
            writeln!(
                out,
                "{} ({}, Exp: {}, Score: {})",
                person.name, person.role, person.experience, person.score
            )?;
        }

        if let Some(template) = templates.get(&team.template) {
            writeln!(out, "\nRole Distribution:")?;
            for slot in template.roles() {
                writeln!(
                    out,
                    "{}: {} (min: {}, max: {})",
                    slot.role,
                    team.role_count(roster, slot.role.key()),
                    slot.requirement.min,
                    slot.requirement.max
                )?;
            }
            // Floor-fill can seat roles the template never declared.
            let counts = team.role_counts(roster);
            let mut undeclared: Vec<&str> = Vec::new();
            for person in members.iter().filter_map(|&id| roster.person(id)) {
                let key = person.role.key();
                if template.requirement_for(key).is_some() || undeclared.contains(&key) {
                    continue;
                }
                undeclared.push(key);
                writeln!(
                    out,
                    "{}: {} (min: 0, max: 0, undeclared)",
                    person.role,
                    counts.get(key).copied().unwrap_or_default()
                )?;
            }
        }

        writeln!(
            out,
            "\nTotal Score: {:.1}, Average: {:.1}",
            team.total_score(roster),
            team.average_score(roster)
        )?;
        writeln!(out, "{RULE}")?;
    }

    if !result.floor_fills.is_empty() {
        writeln!(out, "\nFloor-fill:")?;
        for fill in &result.floor_fills {
            write!(
                out,
                "Team {} topped up with {} member(s)",
                fill.team_index + 1,
                fill.added.len()
            )?;
            if fill.violates_role_bounds() {
                let overflows: Vec<String> = fill
                    .role_overflows
                    .iter()
                    .map(|o| format!("{} {}/{}", o.role, o.count, o.max))
                    .collect();
                write!(out, "; over role maximum: {}", overflows.join(", "))?;
            }
            writeln!(out)?;
        }
    }

    if result.leftover.is_empty() {
        writeln!(out, "\nAll participants have been assigned to teams.")?;
    } else {
        writeln!(out, "\nRemaining Participants:")?;
        for person in result.leftover.iter().filter_map(|&id| roster.person(id)) {
            writeln!(out, "{} ({}, Score: {})", person.name, person.role, person.score)?;
        }
    }
    writeln!(out, "\nTeam creation stopped: {}.", result.stop_reason)?;

    if let Some(balance) = &result.balance {
        writeln!(
            out,
            "Balancing: {} swap(s), imbalance {:.3} -> {:.3}{}",
            balance.swaps.len(),
            balance.initial_imbalance,
            balance.final_imbalance,
            if balance.converged {
                ""
            } else {
                " (stopped at swap limit)"
            }
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamforge::core::models::person::PersonRecord;
    use teamforge::core::models::template::{RoleRequirement, TeamTemplate};
    use teamforge::engine::config::{BalancingConfig, FormationConfigBuilder};
    use teamforge::engine::progress::ProgressReporter;
    use teamforge::workflows::form;

    fn formation(people: Vec<PersonRecord>) -> (Roster, TemplateSet, FormationResult) {
        let duo = TeamTemplate::new(
            "duo",
            2,
            2,
            [
                ("Dev", RoleRequirement::new(1, 1)),
                ("Tester", RoleRequirement::new(1, 1)),
            ],
        )
        .unwrap();
        formation_with(duo, people)
    }

    fn formation_with(
        template: TeamTemplate,
        people: Vec<PersonRecord>,
    ) -> (Roster, TemplateSet, FormationResult) {
        let roster = Roster::from_records(people).unwrap();
        let templates = TemplateSet::new(vec![template]).unwrap();
        let config = FormationConfigBuilder::new()
            .templates(templates.clone())
            .redistribute(true)
            .balancing_config(Some(BalancingConfig::default()))
            .build()
            .unwrap();
        let result = form::run(&roster, &config, &ProgressReporter::new()).unwrap();
        (roster, templates, result)
    }

    #[test]
    fn report_lists_teams_roles_and_leftover() {
        let (roster, templates, result) = formation(vec![
            PersonRecord::new("1", "Ana", "Dev", 2.0, 90.0),
            PersonRecord::new("2", "Bo", "Tester", 1.0, 80.0),
            PersonRecord::new("3", "Cy", "Designer", 3.0, 70.0),
        ]);

        let text = render(&roster, &templates, &result);
        assert!(text.contains("Team 1 (Type: duo, Size: 2/2):"));
        assert!(text.contains("Ana (Dev, Exp: 2, Score: 90)"));
        assert!(text.contains("Tester: 1 (min: 1, max: 1)"));
        assert!(text.contains("Total Score: 170.0, Average: 85.0"));
        assert!(text.contains("Remaining Participants:\nCy (Designer, Score: 70)"));
        assert!(text.contains("Balancing: 0 swap(s)"));
    }

    #[test]
    fn report_notes_when_everyone_is_assigned() {
        let (roster, templates, result) = formation(vec![
            PersonRecord::new("1", "Ana", "Dev", 2.0, 90.0),
            PersonRecord::new("2", "Bo", "Tester", 1.0, 80.0),
        ]);
        let text = render(&roster, &templates, &result);
        assert!(text.contains("All participants have been assigned to teams."));
        assert!(text.contains("everyone was assigned"));
    }

    #[test]
    fn role_distribution_includes_roles_seated_by_floor_fill() {
        let trio = TeamTemplate::new("trio", 3, 3, [("Dev", RoleRequirement::new(1, 1))]).unwrap();
        let (roster, templates, result) = formation_with(
            trio,
            vec![
                PersonRecord::new("1", "Ana", "Dev", 2.0, 90.0),
                PersonRecord::new("2", "Bo", "Designer", 1.0, 80.0),
                PersonRecord::new("3", "Cy", "designer", 3.0, 70.0),
            ],
        );
        assert_eq!(result.floor_fills.len(), 1);

        let text = render(&roster, &templates, &result);
        let distribution = text
            .split("Role Distribution:\n")
            .nth(1)
            .and_then(|rest| rest.split("\n\n").next())
            .unwrap();
        assert_eq!(
            distribution,
            "Dev: 1 (min: 1, max: 1)\nDesigner: 2 (min: 0, max: 0, undeclared)"
        );
    }
}
