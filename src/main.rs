mod report;

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use tempophrase::{Context, Dialect, Engine, EngineConfig, Instant, Options, ProcessConfig};

const LOG_ENV: &str = "TEMPOPHRASE_LOG";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    init_logging(config.verbosity);

    let engine = match build_engine(&config) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let ctx = Context { reference: config.reference };
    let res = engine.parse_verbose_with(&config.input, &ctx, &Options::default());
    report::print_run(&res.result, &res.details, config.color);
}

struct CliConfig {
    input: String,
    reference: Option<Instant>,
    dialect: Dialect,
    process: Option<ProcessConfig>,
    color: bool,
    verbosity: u8,
}

fn build_engine(config: &CliConfig) -> tempophrase::Result<Engine> {
    match &config.process {
        Some(process) => Engine::process(process),
        None => Engine::english(&EngineConfig { dialect: config.dialect }),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => std::env::var(LOG_ENV).ok().and_then(|v| v.parse().ok()).unwrap_or(LevelFilter::Warn),
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let log_config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    // Only fails if a logger is already installed.
    let _ = TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut reference: Option<Instant> = None;
    let mut dialect = Dialect::Us;
    let mut program: Option<String> = None;
    let mut engine_args: Vec<String> = Vec::new();
    let mut grammar: Option<PathBuf> = None;
    let mut color = io::stdout().is_terminal();
    let mut verbosity = 0u8;
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("tempophrase {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--uk" => dialect = Dialect::Uk,
            "-v" => verbosity = verbosity.saturating_add(1),
            "-vv" => verbosity = verbosity.saturating_add(2),
            "--reference" => {
                let value = args.next().ok_or_else(|| "error: --reference expects a value".to_string())?;
                reference = Some(parse_reference(&value)?);
            }
            "--engine" => {
                program = Some(args.next().ok_or_else(|| "error: --engine expects a program".to_string())?);
            }
            "--engine-arg" => {
                engine_args.push(args.next().ok_or_else(|| "error: --engine-arg expects a value".to_string())?);
            }
            "--grammar" => {
                let value = args.next().ok_or_else(|| "error: --grammar expects a path".to_string())?;
                grammar = Some(PathBuf::from(value));
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                set_input(value, &mut input)?;
            }
            "--" => {
                let rest = args.by_ref().collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    set_input(rest, &mut input)?;
                }
                break;
            }
            _ if arg.starts_with("--reference=") => {
                reference = Some(parse_reference(arg.trim_start_matches("--reference="))?);
            }
            _ if arg.starts_with("--input=") => {
                set_input(arg.trim_start_matches("--input=").to_string(), &mut input)?;
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args.by_ref()).collect::<Vec<_>>().join(" ");
                set_input(rest, &mut input)?;
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    let process = match program {
        Some(program) => Some(ProcessConfig { program, args: engine_args, grammar }),
        None if !engine_args.is_empty() || grammar.is_some() => {
            return Err("error: --engine-arg and --grammar require --engine".to_string());
        }
        None => None,
    };

    Ok(CliConfig { input, reference, dialect, process, color, verbosity })
}

fn set_input(value: String, input: &mut Option<String>) -> Result<(), String> {
    if input.is_some() {
        return Err("error: input provided multiple times".to_string());
    }
    *input = Some(value);
    Ok(())
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer.trim_end_matches(['\n', '\r']).to_string())
}

fn parse_reference(value: &str) -> Result<Instant, String> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map_err(|_| format!("error: invalid --reference '{value}' (expected RFC 3339, e.g. 2016-11-20T09:41:00-06:00)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "tempophrase {version}

Find the time phrase in a sentence and resolve it.

Usage:
  tempophrase [OPTIONS] [--] <input...>
  tempophrase [OPTIONS] --input <text>

Options:
  -i, --input <text>         Input text to parse. If omitted, reads remaining args
                             or stdin when no args are provided.
  --reference <timestamp>    Reference instant in RFC 3339
                             (e.g. 2016-11-20T09:41:00-06:00).
                             Default: the current time.
  --uk                       Use UK date conventions (30/06/17, \"next mon\").
  --engine <program>         Use an external engine speaking JSON lines.
  --engine-arg <arg>         Argument for the external engine (repeatable).
  --grammar <path>           Grammar resource passed to the external engine.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -v, -vv                    Debug / trace logging on stderr
                             (or set {log_env}=error|warn|info|debug|trace).
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  Recognition engine unavailable.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        log_env = LOG_ENV,
    )
}
