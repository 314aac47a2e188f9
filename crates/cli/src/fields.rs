//! `bomsync fields`: show which sheet column feeds each record field.

use std::fmt::Write as _;

use bomsync_recon::{Config, Field, SheetMapping};
use serde::Serialize;

use crate::CliError;

#[derive(Debug, Serialize)]
struct FieldRow<'a> {
    field: Field,
    header: Option<&'a str>,
    kind: Option<String>,
    compared: bool,
    synced: bool,
}

fn rows<'a>(config: &Config, mapping: &'a SheetMapping) -> Vec<FieldRow<'a>> {
    Field::ALL
        .into_iter()
        .map(|field| {
            let binding = mapping.binding(field);
            FieldRow {
                field,
                header: binding.map(|b| b.header.as_str()),
                kind: binding.map(|b| b.kind.to_string()),
                compared: config.compare.fields.contains(&field),
                synced: config.sync.fields.contains(&field),
            }
        })
        .collect()
}

pub fn cmd_fields(config: &Config, json: bool) -> Result<(), CliError> {
    let mapping = config.sheet.mapping();

    if json {
        let out = serde_json::json!({
            "key_column": mapping.key_column,
            "fields": rows(config, &mapping),
        });
        let text = serde_json::to_string_pretty(&out)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{text}");
    } else {
        print!("{}", render_table(config, &mapping));
    }
    Ok(())
}

/// Headers are quoted so trailing spaces stay visible.
fn render_table(config: &Config, mapping: &SheetMapping) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Key column: {:?}\n", mapping.key_column);
    let _ = writeln!(out, "{:<22} {:<13} {:<8} {:<7} SHEET HEADER", "FIELD", "KIND", "COMPARE", "SYNC");

    for row in rows(config, mapping) {
        let header = row.header.map(|h| format!("{h:?}")).unwrap_or_else(|| "(unbound)".into());
        let _ = writeln!(
            out,
            "{:<22} {:<13} {:<8} {:<7} {}",
            row.field.name(),
            row.kind.as_deref().unwrap_or("-"),
            if row.compared { "yes" } else { "-" },
            if row.synced { "yes" } else { "-" },
            header,
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_shows_exact_headers() {
        let config = Config::default();
        let text = render_table(&config, &config.sheet.mapping());

        assert!(text.starts_with("Key column: \"Part name \"\n"));
        assert!(text.contains("\"number of employees \""));
        let line = text.lines().find(|l| l.starts_with("overhead_cost ")).unwrap();
        assert!(line.contains("currency"));
        assert!(line.contains(" -        yes "), "derived field is synced but not compared: {line}");
        assert_eq!(text.lines().count(), 2 + 1 + Field::COUNT);
    }

    #[test]
    fn unbound_fields_are_marked() {
        let config = Config::from_toml(
            r#"
            [[sheet.columns]]
            field = "total_cost"
            header = "Total"
            kind = "currency"
            "#,
        )
        .unwrap();
        let text = render_table(&config, &config.sheet.mapping());
        assert!(text.contains("\"Total\""));
        assert_eq!(text.matches("(unbound)").count(), Field::COUNT - 1);
    }
}
