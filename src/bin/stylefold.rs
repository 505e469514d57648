use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use log::{LevelFilter, Log, Metadata, Record};
use stylefold::{compile, ChangeReport, CompileOptions, DeclarationWarning};

#[derive(Clone, Debug)]
enum Json {
    Num(usize),
    Float(f64),
    Str(String),
    Arr(Vec<Json>),
    Obj(Vec<(String, Json)>),
}

impl Json {
    fn render(&self, pretty: bool) -> String {
        let mut out = String::new();
        self.write_into(&mut out, pretty, 0);
        out
    }

    fn write_into(&self, out: &mut String, pretty: bool, depth: usize) {
        match self {
            Json::Num(v) => out.push_str(&v.to_string()),
            Json::Float(v) => out.push_str(&format!("{:.2}", v)),
            Json::Str(v) => write_json_string(out, v),
            Json::Arr(items) => {
                out.push('[');
                if !items.is_empty() && pretty {
                    out.push('\n');
                }
                for (idx, item) in items.iter().enumerate() {
                    if pretty {
                        write_indent(out, depth + 1);
                    }
                    item.write_into(out, pretty, depth + 1);
                    if idx + 1 != items.len() {
                        out.push(',');
                    }
                    if pretty {
                        out.push('\n');
                    }
                }
                if !items.is_empty() && pretty {
                    write_indent(out, depth);
                }
                out.push(']');
            }
            Json::Obj(fields) => {
                out.push('{');
                if !fields.is_empty() && pretty {
                    out.push('\n');
                }
                for (idx, (key, value)) in fields.iter().enumerate() {
                    if pretty {
                        write_indent(out, depth + 1);
                    }
                    write_json_string(out, key);
                    out.push(':');
                    if pretty {
                        out.push(' ');
                    }
                    value.write_into(out, pretty, depth + 1);
                    if idx + 1 != fields.len() {
                        out.push(',');
                    }
                    if pretty {
                        out.push('\n');
                    }
                }
                if !fields.is_empty() && pretty {
                    write_indent(out, depth);
                }
                out.push('}');
            }
        }
    }
}

fn write_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn write_json_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c <= '\u{1f}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Minimal logger writing to stderr, installed by `--verbose`.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logger(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    static LOGGER: StderrLogger = StderrLogger;
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

fn main() -> ExitCode {
    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let mut rest = args.into_iter().skip(1).collect::<Vec<_>>();
    if rest.is_empty() || pop_flag(&mut rest, "--help") || pop_flag(&mut rest, "-h") {
        print_help();
        return Ok(());
    }

    let alphabetical = pop_flag(&mut rest, "-a") | pop_flag(&mut rest, "--alphabetical");
    let unsafe_sort = pop_flag(&mut rest, "--unsafe");
    let json = pop_flag(&mut rest, "--json");
    let pretty = pop_flag(&mut rest, "--pretty");
    let verbose = pop_flag(&mut rest, "--verbose") | pop_flag(&mut rest, "-v");
    let output = match pop_value(&mut rest, "-o")? {
        Some(path) => Some(path),
        None => pop_value(&mut rest, "--output")?,
    };

    if let Some(unknown) = rest.iter().find(|a| a.starts_with('-') && a.len() > 1) {
        return Err(format!("unknown option `{}` (see --help)", unknown));
    }
    let input = PathBuf::from(first_arg(&rest, "missing <input.css> (see --help)")?);
    if rest.len() > 1 {
        return Err(format!("unexpected argument `{}`", rest[1]));
    }

    if verbose {
        init_logger(LevelFilter::Debug).map_err(|e| e.to_string())?;
    }

    let source = fs::read_to_string(&input)
        .map_err(|e| format!("cannot read {}: {}", input.display(), e))?;
    let options = CompileOptions::new()
        .with_alphabetical(alphabetical)
        .with_unsafe_sort(unsafe_sort);
    let result =
        compile(&source, &options).map_err(|e| format!("{}:{}", input.display(), e))?;

    let output = output.map_or_else(|| default_output(&input), PathBuf::from);
    let backup = write_with_backup(&output, &result.css)?;

    if json {
        println!(
            "{}",
            report_json(&input, &output, backup.as_deref(), &result.report).render(pretty)
        );
    } else {
        print_report(&input, &output, backup.as_deref(), &result.report);
    }
    Ok(())
}

/// `<dir>/<stem>_compiled.css` next to the input.
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "styles".to_string());
    input.with_file_name(format!("{}_compiled.css", stem))
}

/// `<dir>/<stem>.backup.css` next to the output.
fn backup_path(output: &Path) -> PathBuf {
    output.with_extension("backup.css")
}

/// Write `css` to `output`, first copying an existing file to its backup
/// path. Returns the backup path when one was written.
fn write_with_backup(output: &Path, css: &str) -> Result<Option<PathBuf>, String> {
    let backup = if output.exists() {
        let backup = backup_path(output);
        fs::copy(output, &backup)
            .map_err(|e| format!("cannot back up {}: {}", output.display(), e))?;
        log::debug!("[cli] backed up {} to {}", output.display(), backup.display());
        Some(backup)
    } else {
        None
    };
    fs::write(output, css).map_err(|e| format!("cannot write {}: {}", output.display(), e))?;
    Ok(backup)
}

fn print_report(input: &Path, output: &Path, backup: Option<&Path>, report: &ChangeReport) {
    println!("Compiled {} -> {}", input.display(), output.display());
    if let Some(backup) = backup {
        println!("Backup:                 {}", backup.display());
    }
    println!("{}", report);
    for warning in report.warnings() {
        println!("  warning: {}", warning);
    }
}

fn report_json(
    input: &Path,
    output: &Path,
    backup: Option<&Path>,
    report: &ChangeReport,
) -> Json {
    let mut fields = vec![
        ("input".to_string(), Json::Str(input.display().to_string())),
        ("output".to_string(), Json::Str(output.display().to_string())),
    ];
    if let Some(backup) = backup {
        fields.push(("backup".to_string(), Json::Str(backup.display().to_string())));
    }
    let counts = [
        ("bytes_before", report.bytes_before),
        ("bytes_after", report.bytes_after),
        ("bytes_saved", report.bytes_saved()),
        ("rules_parsed", report.rules_parsed),
        ("selectors_seen", report.selectors_seen),
        ("rules_merged", report.rules_merged),
        ("selectors_deduplicated", report.selectors_deduplicated),
        ("declarations_overridden", report.declarations_overridden),
        ("important_kept", report.important_kept),
        ("empty_rules_removed", report.empty_rules_removed),
        ("empty_declarations_removed", report.empty_declarations_removed),
        ("comments_removed", report.comments_removed),
        ("media_queries_merged", report.media_queries_merged),
        ("keyframes_removed", report.keyframes_removed),
        ("at_rules_preserved", report.at_rules_preserved),
    ];
    fields.extend(
        counts
            .iter()
            .map(|(key, value)| (key.to_string(), Json::Num(*value))),
    );
    fields.push((
        "reduction_percent".to_string(),
        Json::Float(report.reduction_percent()),
    ));
    fields.push((
        "warnings".to_string(),
        Json::Arr(report.warnings().iter().map(warning_json).collect()),
    ));
    Json::Obj(fields)
}

fn warning_json(warning: &DeclarationWarning) -> Json {
    Json::Obj(vec![
        ("code".to_string(), Json::Str(warning.kind.code().to_string())),
        ("line".to_string(), Json::Num(warning.position.line)),
        ("column".to_string(), Json::Num(warning.position.column)),
        ("text".to_string(), Json::Str(warning.text.clone())),
    ])
}

fn first_arg(args: &[String], msg: &str) -> Result<String, String> {
    args.first().cloned().ok_or_else(|| msg.to_string())
}

fn pop_flag(args: &mut Vec<String>, flag: &str) -> bool {
    if let Some(pos) = args.iter().position(|a| a == flag) {
        args.remove(pos);
        true
    } else {
        false
    }
}

fn pop_value(args: &mut Vec<String>, flag: &str) -> Result<Option<String>, String> {
    let Some(pos) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        return Err(format!("{} requires a value", flag));
    }
    args.remove(pos);
    Ok(Some(args.remove(pos)))
}

fn print_help() {
    let help = r#"stylefold - merge, consolidate and reorganize a CSS stylesheet

USAGE:
  stylefold <input.css> [options]

OPTIONS:
  -o, --output <path>   Output file (default: <input>_compiled.css)
  -a, --alphabetical    Sort component rules by selector
      --unsafe          Sort without keeping :link/:visited/:hover/:focus/:active order
      --json            Print statistics as JSON
      --pretty          Pretty-print JSON output
  -v, --verbose         Log pipeline details to stderr
  -h, --help            Show this help

NOTES:
  - An existing output file is copied to <output>.backup.css first.
  - On a syntax error nothing is written and the exit code is non-zero.
"#;
    println!("{}", help);
}
