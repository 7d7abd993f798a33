//! Output formatting for result sets.
//!
//! Columns are addressed by position, so result sets with repeated column
//! names render every column.

use crate::models::{ResultSet, Value};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

/// Output format for result sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// ASCII table format (like MySQL CLI)
    #[default]
    Table,
    /// JSON array of row objects
    Json,
    /// Markdown table format
    Markdown,
}

impl OutputFormat {
    pub fn render(self, result: &ResultSet, elapsed: Duration) -> String {
        match self {
            Self::Table => format_as_table(result, elapsed),
            Self::Json => format_as_json(result),
            Self::Markdown => format_as_markdown(result),
        }
    }
}

fn pad(text: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(text.width()));
    if right_align {
        format!("{fill}{text}")
    } else {
        format!("{text}{fill}")
    }
}

pub fn format_as_table(result: &ResultSet, elapsed: Duration) -> String {
    if result.num_columns() == 0 {
        return "Empty set".to_string();
    }

    let mut widths: Vec<usize> = result.fields().iter().map(|f| f.name().width()).collect();
    for row in result {
        for (i, value) in row.iter().enumerate() {
            widths[i] = widths[i].max(value.as_string().width());
        }
    }

    let mut output = String::new();
    let separator: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(w + 2)))
        .collect::<String>()
        + "+\n";

    output.push_str(&separator);
    let header: String = result
        .fields()
        .iter()
        .zip(&widths)
        .map(|(field, w)| format!("| {} ", pad(field.name(), *w, false)))
        .collect::<String>()
        + "|\n";
    output.push_str(&header);
    output.push_str(&separator);

    for row in result {
        let row_str: String = row
            .iter()
            .zip(&widths)
            .map(|(value, w)| {
                let right_align = matches!(value, Value::Int(_));
                format!("| {} ", pad(&value.as_string(), *w, right_align))
            })
            .collect::<String>()
            + "|\n";
        output.push_str(&row_str);
    }

    output.push_str(&separator);

    let row_text = if result.num_rows() == 1 { "row" } else { "rows" };
    output.push_str(&format!(
        "{} {} in set ({:.2} sec)\n",
        result.num_rows(),
        row_text,
        elapsed.as_secs_f64()
    ));

    output
}

pub fn format_as_markdown(result: &ResultSet) -> String {
    if result.num_columns() == 0 {
        return "*Empty set*".to_string();
    }

    let mut output = String::new();

    let header: String = result
        .fields()
        .iter()
        .map(|f| format!("| {} ", f.name()))
        .collect::<String>()
        + "|\n";
    output.push_str(&header);

    let sep: String = result.fields().iter().map(|_| "|---").collect::<String>() + "|\n";
    output.push_str(&sep);

    for row in result {
        let row_str: String = row
            .iter()
            .map(|value| format!("| {} ", value.as_string().replace('|', "\\|")))
            .collect::<String>()
            + "|\n";
        output.push_str(&row_str);
    }

    output.push_str(&format!("\n*{} rows*", result.num_rows()));

    output
}

pub fn format_as_json(result: &ResultSet) -> String {
    let rows: Vec<JsonValue> = result
        .iter()
        .map(|row| JsonValue::Object(row.to_json_map()))
        .collect();
    serde_json::to_string_pretty(&rows).unwrap_or_default()
}
