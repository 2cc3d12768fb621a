mod config;
mod examples;
mod output;

use anyhow::Result;
use clap::{
    ColorChoice, Command, CommandFactory, FromArgMatches, Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Color as ClapColor, RgbColor, Style},
    },
    error::ErrorKind,
};

use colored::{Color as ThemeColor, Colorize, control::ShouldColorize};
use log::debug;
use std::fmt::Write;
use std::io::{self, Write as IoWrite};
use std::path::PathBuf;

use config::LoadedConfig;
use examples::{EXAMPLES, ExampleGroup};
use fieldmap::{FieldMapError, MappingGenerator, OutputFormat, parse_file_list};
use output::{DisplayFormat, GlobalOptions, MappingView, OutputManager, palette};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[(
    "RUST_LOG",
    "Log filter, e.g. fieldmap=trace (--verbose defaults it to debug)",
)];

#[derive(Parser)]
#[command(name = "fieldmap")]
#[command(version)]
#[command(
    about = "Generate a field-name to JSON-key mapping from Go struct tags",
    long_about = r#"Scans Go source files for struct declarations and records, for every
tagged field, the field name (first letter lowercased) and its json tag value.

The first value seen for a name wins. Inputs are processed in order:
  1. files matching --pattern (lexical order)
  2. files listed in --files (as given)
  3. .go files found under each --dir (sorted by path)

Settings may also come from fieldmap.toml; command-line flags take precedence.
"#
)]
struct Cli {
    /// The file pattern to match (e.g. ./graph/model/*.go)
    #[arg(long, value_name = "GLOB")]
    pattern: Option<String>,

    /// Comma-separated list of individual file paths (e.g. ./db/sqlc/models.go,./graph/model/auth.go)
    #[arg(long, value_name = "LIST")]
    files: Option<String>,

    /// Directory to scan recursively for .go files (repeatable)
    #[arg(long = "dir", value_name = "DIR")]
    dirs: Vec<PathBuf>,

    /// Output file path [default: ./generate/mapping/field_and_json_mapping.go]
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Generated file format [default: inferred from the output extension]
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Struct tag key to read [default: json]
    #[arg(long, value_name = "KEY")]
    tag: Option<String>,

    /// Package name of the generated Go file [default: mapping]
    #[arg(long, value_name = "NAME")]
    package: Option<String>,

    /// Variable name of the generated mapping [default: AllMappings]
    #[arg(long, value_name = "NAME")]
    var_name: Option<String>,

    /// Keep only the name part of tag values and skip "-" fields
    #[arg(long)]
    strip_options: bool,

    /// Config file [default: ./fieldmap.toml when present]
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the mapping instead of writing the output file
    #[arg(long)]
    print: bool,

    /// Display format for --print
    #[arg(long, value_enum, default_value = "table")]
    output_format: DisplayFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn parse_with_styles() -> Self {
        let command = build_cli_command();
        match command.styles(help_styles()).try_get_matches() {
            Ok(matches) => Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit()),
            Err(err) => match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = print_blank_line_stdout();
                    if let Err(print_err) = err.print()
                        && print_err.kind() != io::ErrorKind::BrokenPipe
                    {
                        eprintln!("Failed to display help: {print_err}");
                    }
                    let _ = print_blank_line_stdout();
                    std::process::exit(0);
                }
                _ => {
                    let exit_code = err.exit_code();
                    let _ = print_blank_line_stderr();
                    if let Err(print_err) = err.print()
                        && print_err.kind() != io::ErrorKind::BrokenPipe
                    {
                        eprintln!("Failed to display error: {print_err}");
                    }
                    let _ = print_blank_line_stderr();
                    std::process::exit(exit_code);
                }
            },
        }
    }
}

/// Report a usage problem detected after parsing and exit with clap's usage code.
fn usage_error(message: impl std::fmt::Display) -> ! {
    let mut command = build_cli_command().styles(help_styles());
    command.error(ErrorKind::MissingRequiredArgument, message).exit()
}

fn build_cli_command() -> Command {
    let use_color = detect_color_support();
    let appendix = render_appendix(use_color);
    let command = Cli::command().after_long_help(appendix);
    command.color(if use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    })
}

fn render_examples(groups: &[ExampleGroup], use_color: bool) -> String {
    let mut buffer = String::new();

    let heading = stylize("Examples:", palette::HEADING, true, use_color);
    let _ = writeln!(buffer, "{heading}");

    for (index, group) in groups.iter().enumerate() {
        let title = stylize(group.title, palette::USAGE, true, use_color);
        let _ = writeln!(buffer, "  {title}");

        for command in group.commands {
            let arrow = stylize(palette::ARROW, palette::COMMAND, false, use_color);
            let command_text = stylize(command, palette::COMMAND, false, use_color);
            let _ = writeln!(buffer, "    {arrow} {command_text}");
        }

        if index + 1 < groups.len() {
            buffer.push('\n');
        }
    }

    if !buffer.ends_with('\n') {
        buffer.push('\n');
    }

    buffer
}

fn render_appendix(use_color: bool) -> String {
    let mut buffer = render_examples(EXAMPLES, use_color);
    buffer.push('\n');

    let env_heading = stylize("Environment Variables:", palette::HEADING, true, use_color);
    let _ = writeln!(buffer, "{env_heading}");
    for (key, description) in ENVIRONMENT_VARIABLES {
        let key_text = stylize(key, palette::ENV_NAME, true, use_color);
        let value_text = stylize(description, palette::ENV_TEXT, false, use_color);
        let _ = writeln!(buffer, "  {key_text}  {value_text}");
    }

    buffer
}

fn print_blank_line_stdout() -> io::Result<()> {
    let mut stdout = io::stdout();
    IoWrite::write_all(&mut stdout, b"\n")?;
    IoWrite::flush(&mut stdout)
}

fn print_blank_line_stderr() -> io::Result<()> {
    let mut stderr = io::stderr();
    IoWrite::write_all(&mut stderr, b"\n")?;
    IoWrite::flush(&mut stderr)
}

fn stylize(text: &str, color: ThemeColor, bold: bool, use_color: bool) -> String {
    if use_color {
        let styled = text.color(color);
        if bold {
            styled.bold().to_string()
        } else {
            styled.to_string()
        }
    } else {
        text.to_string()
    }
}

fn detect_color_support() -> bool {
    ShouldColorize::from_env().should_colorize()
}

fn help_styles() -> Styles {
    Styles::styled()
        .usage(style_from_color(palette::USAGE).bold())
        .header(style_from_color(palette::HEADING).bold())
        .literal(style_from_color(palette::COMMAND))
        .placeholder(style_from_color(palette::MUTED))
        .valid(style_from_color(palette::VALID))
        .invalid(style_from_color(palette::INVALID))
        .error(style_from_color(palette::ERROR).bold())
}

fn style_from_color(color: ThemeColor) -> Style {
    Style::new().fg_color(Some(color_to_clap_color(color)))
}

fn color_to_clap_color(color: ThemeColor) -> ClapColor {
    match color {
        ThemeColor::Black => ClapColor::Ansi(AnsiColor::Black),
        ThemeColor::Red => ClapColor::Ansi(AnsiColor::Red),
        ThemeColor::Green => ClapColor::Ansi(AnsiColor::Green),
        ThemeColor::Yellow => ClapColor::Ansi(AnsiColor::Yellow),
        ThemeColor::Blue => ClapColor::Ansi(AnsiColor::Blue),
        ThemeColor::Magenta => ClapColor::Ansi(AnsiColor::Magenta),
        ThemeColor::Cyan => ClapColor::Ansi(AnsiColor::Cyan),
        ThemeColor::White => ClapColor::Ansi(AnsiColor::White),
        ThemeColor::BrightBlack => ClapColor::Ansi(AnsiColor::BrightBlack),
        ThemeColor::BrightRed => ClapColor::Ansi(AnsiColor::BrightRed),
        ThemeColor::BrightGreen => ClapColor::Ansi(AnsiColor::BrightGreen),
        ThemeColor::BrightYellow => ClapColor::Ansi(AnsiColor::BrightYellow),
        ThemeColor::BrightBlue => ClapColor::Ansi(AnsiColor::BrightBlue),
        ThemeColor::BrightMagenta => ClapColor::Ansi(AnsiColor::BrightMagenta),
        ThemeColor::BrightCyan => ClapColor::Ansi(AnsiColor::BrightCyan),
        ThemeColor::BrightWhite => ClapColor::Ansi(AnsiColor::BrightWhite),
        ThemeColor::TrueColor { r, g, b } => ClapColor::Rgb(RgbColor(r, g, b)),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

fn main() {
    let cli = Cli::parse_with_styles();
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let output = OutputManager::new(GlobalOptions {
        display_format: cli.output_format.clone(),
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    });

    if let Err(err) = execute(&cli, &output) {
        output.error(&error_message(&err));
        std::process::exit(1);
    }
}

fn execute(cli: &Cli, output: &OutputManager) -> Result<()> {
    let config = LoadedConfig::find(cli.config.as_deref())?;
    if let Some(loaded) = &config {
        debug!("using config {}", loaded.path.display());
    }

    let generator = configure(cli, config.as_ref());
    if generator.sources().is_empty() {
        usage_error(FieldMapError::MissingInput);
    }

    if cli.print {
        let generated = generator.generate()?;
        report_scanned(output, &generated.files);
        output.display(&MappingView(&generated.mapping))?;
        return Ok(());
    }

    let report = generator.run()?;
    report_scanned(output, &report.files);

    let summary = format!(
        "{} ({} entries from {} files)",
        report.output_file.display(),
        report.entries,
        report.files.len()
    );
    if report.written {
        output.success(&format!("Generated {summary}"));
    } else {
        output.info(&format!("Up to date: {summary}"));
    }

    Ok(())
}

/// Join the error chain, skipping causes already spelled out by their parent.
fn error_message(err: &anyhow::Error) -> String {
    let mut message = String::new();
    for cause in err.chain() {
        let text = cause.to_string();
        if message.contains(&text) {
            continue;
        }
        if !message.is_empty() {
            message.push_str(": ");
        }
        message.push_str(&text);
    }
    message
}

fn report_scanned(output: &OutputManager, files: &[PathBuf]) {
    if files.is_empty() {
        output.warning("No input files matched; the generated mapping is empty");
    }
    for file in files {
        output.verbose(&format!("scanned {}", file.display()));
    }
}

/// Merge command-line flags over config values into a generator.
fn configure(cli: &Cli, config: Option<&LoadedConfig>) -> MappingGenerator {
    let settings = config.map(|loaded| &loaded.config);
    let mut generator = MappingGenerator::new();

    let pattern = cli
        .pattern
        .clone()
        .filter(|pattern| !pattern.is_empty())
        .or_else(|| config.and_then(LoadedConfig::pattern));
    if let Some(pattern) = pattern {
        generator = generator.pattern(pattern);
    }

    let files = match &cli.files {
        Some(list) => parse_file_list(list),
        None => config.map(LoadedConfig::files).unwrap_or_default(),
    };
    for file in files {
        generator = generator.file(file);
    }

    let dirs = if cli.dirs.is_empty() {
        config.map(LoadedConfig::dirs).unwrap_or_default()
    } else {
        cli.dirs.clone()
    };
    for dir in dirs {
        generator = generator.scan_dir(dir);
    }

    if let Some(path) = cli.output.clone().or_else(|| config.and_then(LoadedConfig::output_path)) {
        generator = generator.output_file(path);
    }
    if let Some(format) = cli.format.or_else(|| settings.and_then(|s| s.output.format)) {
        generator = generator.format(format);
    }
    if let Some(package) = cli.package.clone().or_else(|| settings.and_then(|s| s.output.package.clone())) {
        generator = generator.package(package);
    }
    if let Some(var_name) = cli
        .var_name
        .clone()
        .or_else(|| settings.and_then(|s| s.output.var_name.clone()))
    {
        generator = generator.var_name(var_name);
    }
    if let Some(key) = cli.tag.clone().or_else(|| settings.and_then(|s| s.tag.key.clone())) {
        generator = generator.tag_key(key);
    }

    generator.strip_options(cli.strip_options || settings.is_some_and(|s| s.tag.strip_options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fieldmap").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_only() {
        let cli = parse(&["--pattern", "model/*.go", "--files", "a.go, b.go", "--dir", "x", "--dir", "y"]);
        let generator = configure(&cli, None);
        let sources = generator.sources();
        assert_eq!(sources.pattern.as_deref(), Some("model/*.go"));
        assert_eq!(sources.files, vec![PathBuf::from("a.go"), PathBuf::from("b.go")]);
        assert_eq!(sources.dirs, vec![PathBuf::from("x"), PathBuf::from("y")]);
        assert_eq!(generator.output_path(), Path::new(fieldmap::DEFAULT_OUTPUT));
        assert_eq!(generator.output_format(), OutputFormat::Go);
    }

    #[test]
    fn test_error_message_skips_repeated_causes() {
        let err = anyhow::Error::new(fieldmap::FieldMapError::Parse {
            path: PathBuf::from("bad.go"),
            source: fieldmap::ParseError::new(3, 1, "expected '}', found EOF"),
        });
        assert_eq!(error_message(&err), "failed to parse file bad.go: 3:1: expected '}', found EOF");

        let err = anyhow::anyhow!("inner").context("Failed to parse fieldmap.toml");
        assert_eq!(error_message(&err), "Failed to parse fieldmap.toml: inner");
    }

    #[test]
    fn test_no_inputs() {
        let cli = parse(&["--output", "out.go"]);
        assert!(configure(&cli, None).sources().is_empty());

        let cli = parse(&["--pattern", "", "--files", ""]);
        assert!(configure(&cli, None).sources().is_empty());
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fieldmap.toml");
        std::fs::write(
            &path,
            "[input]\npattern = \"model/*.go\"\nfiles = [\"a.go\"]\n\n[output]\npath = \"gen/map.json\"\n\n[tag]\nkey = \"db\"\n",
        )
        .unwrap();
        let loaded = LoadedConfig::load(&path).unwrap();

        let generator = configure(&parse(&[]), Some(&loaded));
        assert_eq!(generator.sources().files, vec![dir.path().join("a.go")]);
        assert_eq!(generator.output_path(), dir.path().join("gen/map.json"));
        assert_eq!(generator.output_format(), OutputFormat::Json);

        let generator = configure(&parse(&["--files", "b.go", "--output", "out.rs"]), Some(&loaded));
        assert_eq!(generator.sources().files, vec![PathBuf::from("b.go")]);
        assert!(generator.sources().pattern.is_some());
        assert_eq!(generator.output_format(), OutputFormat::Rust);
    }
}
