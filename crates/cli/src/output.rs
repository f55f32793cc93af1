//! Output formatting for CLI

use clap::ValueEnum;
use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Plain text format
    Plain,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

/// Render a single item
pub fn render_item<T: Serialize + TableDisplay>(item: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);

            table.set_header(T::headers());
            table.add_row(item.row());

            table.to_string()
        }
        OutputFormat::Json => serde_json::to_string_pretty(item).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(item).unwrap_or_default(),
        OutputFormat::Plain => T::headers()
            .iter()
            .zip(item.row())
            .map(|(header, value)| format!("{}: {}", header, value))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Print a single item
pub fn print_item<T: Serialize + TableDisplay>(item: &T, format: OutputFormat) {
    println!("{}", render_item(item, format));
}

/// Print success message
pub fn print_success(message: &str) {
    println!("✅ {}", message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("❌ {}", message);
}
