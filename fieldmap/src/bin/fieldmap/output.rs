use anyhow::Result;
use clap::ValueEnum;
use colored::{Color, Colorize};
use comfy_table::{Attribute, Cell, Color as TableColor, Table};
use fieldmap::FieldMapping;
use serde::Serialize;

/// How `--print` displays the mapping
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum DisplayFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
    /// Compact single-line output
    Compact,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub display_format: DisplayFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Trait for data that can be displayed as a table
pub trait TableDisplay {
    fn to_table(&self, options: &GlobalOptions) -> Table;
    fn to_compact(&self) -> String;
}

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// Display data according to the configured output format
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }

        match self.options.display_format {
            DisplayFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                println!("{json}");
            }
            DisplayFormat::Table => {
                let table = data.to_table(&self.options);
                println!("{table}");
            }
            DisplayFormat::Compact => {
                println!("{}", data.to_compact());
            }
        }
        Ok(())
    }

    /// Display a success message
    pub fn success(&self, message: &str) {
        if !self.options.quiet {
            println!("{}", self.status_line(Status::Success, message));
        }
    }

    /// Display an error message, even when quiet
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.status_line(Status::Error, message));
    }

    /// Display a warning message
    pub fn warning(&self, message: &str) {
        if !self.options.quiet {
            eprintln!("{}", self.status_line(Status::Warning, message));
        }
    }

    /// Display verbose information (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.options.verbose && !self.options.quiet {
            eprintln!("{}", self.status_line(Status::Step, message));
        }
    }

    /// Display info message
    pub fn info(&self, message: &str) {
        if !self.options.quiet {
            println!("{}", self.status_line(Status::Info, message));
        }
    }

    fn status_line(&self, status: Status, message: &str) -> String {
        let glyph = status.glyph();
        if self.options.no_color {
            format!("{glyph} {message}")
        } else {
            let color = status.color();
            format!("{} {}", glyph.color(color), message.color(color))
        }
    }
}

/// Kinds of one-line status messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Success,
    Error,
    Warning,
    Step,
    Info,
}

impl Status {
    fn glyph(self) -> &'static str {
        match self {
            Status::Success => "✓",
            Status::Error => "✗",
            Status::Warning => "⚠",
            Status::Step => palette::ARROW,
            Status::Info => "ℹ",
        }
    }

    fn color(self) -> Color {
        match self {
            Status::Success => Color::Green,
            Status::Error => Color::Red,
            Status::Warning => Color::Yellow,
            Status::Step => palette::MUTED,
            Status::Info => Color::Blue,
        }
    }
}

/// Colors for `--help`, shared with the status messages above.
pub mod palette {
    use colored::Color;

    pub const ARROW: &str = "→";
    pub const HEADING: Color = Color::Cyan;
    pub const USAGE: Color = Color::BrightBlue;
    pub const COMMAND: Color = Color::Magenta;
    pub const ENV_NAME: Color = Color::BrightCyan;
    pub const ENV_TEXT: Color = Color::White;
    pub const MUTED: Color = Color::BrightBlack;
    pub const VALID: Color = Color::Green;
    pub const INVALID: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;
}

/// Create a themed table
pub fn create_table(options: &GlobalOptions) -> Table {
    let mut table = Table::new();

    if !options.no_color {
        table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    } else {
        table.load_preset(comfy_table::presets::ASCII_FULL);
    }

    table
}

/// Add themed header to table
pub fn add_table_header(options: &GlobalOptions, table: &mut Table, headers: &[&str]) {
    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| {
            let cell = Cell::new(h).add_attribute(Attribute::Bold);
            if options.no_color { cell } else { cell.fg(TableColor::Cyan) }
        })
        .collect();
    table.set_header(header_cells);
}

/// A mapping as shown by `--print`.
#[derive(Serialize)]
#[serde(transparent)]
pub struct MappingView<'a>(pub &'a FieldMapping);

impl TableDisplay for MappingView<'_> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options);
        add_table_header(options, &mut table, &["Field", "Tag value"]);

        if self.0.is_empty() {
            table.add_row(vec![Cell::new("No tagged fields found"), Cell::new("")]);
            return table;
        }

        for (key, value) in self.0 {
            table.add_row(vec![Cell::new(key), Cell::new(value)]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.0
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
