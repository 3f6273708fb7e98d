//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use chrono::NaiveDate;
use colored::*;
use friendzone_domain::{Person, Relationship};
use friendzone_validator::ValidationErrors;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a list of people.
    pub fn format_persons(&self, persons: &[Person]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(persons)?),
            OutputFormat::Quiet => Ok(persons.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                if persons.is_empty() {
                    return Ok(self.colorize("No friends found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["ID", "Name"]);
                for person in persons {
                    builder.push_record([&person.id.to_string()[..8], person.name.as_str()]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format a list of friendships; `today` decides the "recent" marker.
    pub fn format_relationships(&self, relationships: &[Relationship], today: NaiveDate) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = relationships
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "id": r.id.map(|id| id.to_string()),
                            "party_a": r.party_a.as_ref().map(|p| &p.name),
                            "party_b": r.party_b.as_ref().map(|p| &p.name),
                            "met_date": r.met_date,
                            "introducer": r.introducer.as_ref().map(|p| &p.name),
                            "met_recently": r.met_recently(today),
                            "summary": r.to_string(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(relationships
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if relationships.is_empty() {
                    return Ok(self.colorize("No friendships found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Friendship", "Introduced by", "Recent"]);
                for r in relationships {
                    let introducer = r.introducer.as_ref().map_or("-".to_string(), |p| p.name.clone());
                    let recent = if r.met_recently(today) { "yes" } else { "" };
                    builder.push_record([r.to_string(), introducer, recent.to_string()]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format a field-keyed error map.
    pub fn format_validation_errors(&self, errors: &ValidationErrors) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(errors)?),
            OutputFormat::Quiet => {
                let lines: Vec<String> = errors
                    .fields()
                    .flat_map(|field| {
                        errors
                            .messages(field)
                            .into_iter()
                            .map(move |m| format!("{}: {}", field, m))
                    })
                    .collect();
                Ok(lines.join("\n"))
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Error"]);
                for field in errors.fields() {
                    for message in errors.messages(field) {
                        builder.push_record([field.as_str(), message]);
                    }
                }
                Ok(format!("{}\n{}", self.error("Validation failed"), self.render(builder)))
            }
        }
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use friendzone_validator::{ErrorKind, Field};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn friendship() -> Relationship {
        Relationship::new()
            .between(Person::new("Jordan Fallon"), Person::new("Jordan Hagan"))
            .met_on(date("2017-05-05"))
            .introduced_by(Person::new("Scott Wiedemann"))
    }

    fn errors() -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.add(Field::MetDate, ErrorKind::TemporalViolation, "Date cannot be in the future.");
        errors.add(Field::PartyA, ErrorKind::InvalidRelation, "Jordan Fallon cannot be both friends.");
        errors
    }

    #[test]
    fn test_relationships_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_relationships(&[friendship()], date("2017-05-20")).unwrap();
        assert!(output.contains("Jordan Fallon met Jordan Hagan on May 05, 2017"));
        assert!(output.contains("Scott Wiedemann"));
        assert!(output.contains("yes"));
    }

    #[test]
    fn test_relationships_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_relationships(&[friendship()], date("2020-01-01")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["party_a"], "Jordan Fallon");
        assert_eq!(value[0]["met_date"], "2017-05-05");
        assert_eq!(value[0]["met_recently"], false);
    }

    #[test]
    fn test_relationships_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_relationships(&[friendship()], date("2020-01-01")).unwrap();
        assert_eq!(output, "Jordan Fallon met Jordan Hagan on May 05, 2017");
    }

    #[test]
    fn test_empty_lists() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert!(formatter.format_persons(&[]).unwrap().contains("No friends found"));
        assert!(formatter
            .format_relationships(&[], date("2020-01-01"))
            .unwrap()
            .contains("No friendships found"));
    }

    #[test]
    fn test_persons_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let persons = [Person::new("Jordan Fallon"), Person::new("Jordan Hagan")];
        assert_eq!(formatter.format_persons(&persons).unwrap(), "Jordan Fallon\nJordan Hagan");
    }

    #[test]
    fn test_validation_errors_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_validation_errors(&errors()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["met_date"][0], "Date cannot be in the future.");
        assert_eq!(value["party_a"][0], "Jordan Fallon cannot be both friends.");
    }

    #[test]
    fn test_validation_errors_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_validation_errors(&errors()).unwrap();
        assert_eq!(
            output,
            "met_date: Date cannot be in the future.\nparty_a: Jordan Fallon cannot be both friends."
        );
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.info("note"), "ℹ note");
    }
}
