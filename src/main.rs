use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use shoal::audit::{self, AuditConfig, AuditFormat, Severity};
use shoal::{trim_blank_lines, Input, Interpreter, InterpreterConfig, RngDirections, Value};

/// Run a ><> program.
#[derive(Parser)]
#[command(name = "shoal", version, about = "Interpreter for the ><> (fish) language")]
struct Args {
    /// Program file.
    file: PathBuf,

    /// Text made available to `i`, one character at a time.
    #[arg(short, long)]
    input: Option<String>,

    /// Initial stack contents, bottom first.
    #[arg(short, long, num_args = 1.., value_parser = parse_stack_value, allow_negative_numbers = true)]
    stack: Vec<Value>,

    /// Abort once this many cycles have run.
    #[arg(long)]
    max_steps: Option<u64>,

    /// Seed for `x`, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Truncate fractional values written to the codebox instead of rounding.
    #[arg(long)]
    no_round: bool,

    /// Allow `.` to jump outside the codebox.
    #[arg(long)]
    arbitrary_jump: bool,

    /// Divide into exact fractions instead of floating point.
    #[arg(long)]
    exact_fractions: bool,

    /// Print the codebox to stderr before running.
    #[arg(long)]
    show: bool,

    /// Enable audit logging, optionally to a file (default: stderr).
    #[arg(long, num_args = 0..=1, default_missing_value = "-")]
    audit: Option<PathBuf>,

    /// Use JSON Lines format for audit output.
    #[arg(long)]
    audit_json: bool,

    /// Lowest audit severity recorded (info, warn, error).
    #[arg(long, default_value = "info", value_parser = parse_severity)]
    audit_level: Severity,
}

fn parse_stack_value(text: &str) -> Result<Value, String> {
    if let Ok(i) = text.parse::<i64>() {
        return Ok(Value::Int(i));
    }
    text.parse::<f64>()
        .map(Value::from)
        .map_err(|_| format!("not a number: {}", text))
}

fn parse_severity(text: &str) -> Result<Severity, String> {
    Severity::parse(text).ok_or_else(|| format!("unknown severity: {}", text))
}

fn init_audit(args: &Args) -> Result<()> {
    let Some(path) = &args.audit else {
        return Ok(());
    };
    let to_stderr = path.as_os_str() == "-";
    let config = AuditConfig {
        log_path: (!to_stderr).then(|| path.clone()),
        min_severity: args.audit_level,
        echo_stderr: to_stderr,
        format: if args.audit_json { AuditFormat::JsonLines } else { AuditFormat::Text },
    };
    audit::init_global_logger(config)
        .with_context(|| format!("Failed to open audit log {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_audit(&args)?;

    let name = args.file.display().to_string();
    let loading = Instant::now();
    let text = match fs::read_to_string(&args.file) {
        Ok(text) => text,
        Err(e) => {
            audit::audit_error("LOAD", "Program", &name, &e.to_string());
            return Err(e).with_context(|| format!("Failed to read {}", name));
        }
    };
    let source = trim_blank_lines(&text);
    shoal::audit_log!(
        action = "LOAD",
        entity = ("Program", name.as_str()),
        description = "Loaded program text",
        category = Load,
        duration_us = u64::try_from(loading.elapsed().as_micros()).unwrap_or(u64::MAX),
        meta = { rows = source.lines().count() },
    );

    let mut config = InterpreterConfig::default()
        .with_round_values(!args.no_round)
        .with_arbitrary_jump(args.arbitrary_jump)
        .with_exact_fractions(args.exact_fractions);
    if let Some(limit) = args.max_steps {
        config = config.with_max_steps(limit);
    }

    let directions = match args.seed {
        Some(seed) => RngDirections::seeded(seed),
        None => RngDirections::from_entropy(),
    };
    let mut interpreter = Interpreter::new(source, config)
        .with_name(name.as_str())
        .with_directions(directions);

    if args.show {
        eprint!("{}", interpreter.render());
    }

    let input = Input::from(args.input.unwrap_or_default());
    let result = interpreter.run(input, Input::Values(args.stack));

    let mut stdout = io::stdout().lock();
    stdout.write_all(interpreter.output().as_bytes())?;
    stdout.flush()?;

    result.with_context(|| format!("{} did not halt cleanly", name))?;
    Ok(())
}
