use clap::error::ErrorKind;
use clap::Parser;
use std::process::ExitCode;
use std::thread;

mod commands;
mod config;

use commands::{Options, Outcome, DEFAULT_CLI_MAX_CALL_DEPTH};
use config::Config;

/// Wrong or missing command-line arguments
const EXIT_USAGE: u8 = 1;
/// Source file could not be read
const EXIT_READ_FAILURE: u8 = 2;
/// Lexer, parser or runtime error in the program
const EXIT_PROGRAM_ERROR: u8 = 4;

/// Stack for the interpreter thread; sized for `DEFAULT_CLI_MAX_CALL_DEPTH` nested calls
const INTERPRETER_STACK_SIZE: usize = 256 * 1024 * 1024;

/// SPROLA interpreter.
///
/// Runs top-level statements of FILE, then calls its entry function and
/// prints `Returned value: N`.
///
/// EXAMPLES:
///     sprola program.spr              Run a program
///     sprola program.spr --check      Check for static errors only
///     sprola program.spr --dump-ast   Print the parsed program as JSON
///     sprola program.spr --entry main Call `main` instead of `entry`
///
/// ENVIRONMENT VARIABLES:
///     SPROLA_DIAGNOSTICS     Set to 'json' for JSON diagnostics by default
///     SPROLA_ENTRY           Default entry function name
///     SPROLA_MAX_CALL_DEPTH  Limit on nested function calls (default 1024)
///     SPROLA_LOG             Log filter, e.g. 'debug' or 'sprola_runtime=trace'
///     NO_COLOR               Set to disable colored output
#[derive(Parser, Debug)]
#[command(name = "sprola")]
#[command(version)]
struct Cli {
    /// Path to the SPROLA source file
    file: String,

    /// Lex and parse only; report static errors without running
    #[arg(long, conflicts_with = "dump_ast")]
    check: bool,

    /// Print the parsed program as versioned JSON instead of running it
    #[arg(long)]
    dump_ast: bool,

    /// Output diagnostics in JSON format
    #[arg(long)]
    json: bool,

    /// Name of the zero-argument function called after top-level code
    #[arg(long, value_name = "NAME")]
    entry: Option<String>,

    /// Limit on nested function calls [default: 1024]
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    max_call_depth: Option<u64>,

    /// Verbose output (debug logging on stderr)
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Cli {
    /// Merge flags with environment configuration; flags win
    fn options(&self, config: &Config) -> Options {
        Options {
            file: self.file.clone(),
            json: self.json || config.default_json,
            no_color: config.no_color,
            entry: self.entry.clone().or_else(|| config.entry.clone()),
            max_call_depth: self
                .max_call_depth
                .map(|depth| depth as usize)
                .or(config.max_call_depth)
                .unwrap_or(DEFAULT_CLI_MAX_CALL_DEPTH),
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_USAGE),
            };
        }
    };

    init_logging(cli.verbose);
    let config = Config::from_env();
    log::debug!("configuration: {:?}", config);

    let interpreter = thread::Builder::new()
        .name("sprola".to_string())
        .stack_size(INTERPRETER_STACK_SIZE)
        .spawn(move || execute(&cli, &config));

    match interpreter {
        Ok(handle) => match handle.join() {
            Ok(code) => ExitCode::from(code),
            Err(_) => ExitCode::FAILURE,
        },
        Err(err) => {
            eprintln!("error: failed to start interpreter thread: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Run the selected command and map its outcome to an exit code
fn execute(cli: &Cli, config: &Config) -> u8 {
    let options = cli.options(config);

    let source = match commands::read_source(&options.file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {:#}", err);
            return EXIT_READ_FAILURE;
        }
    };

    let result = if cli.check {
        commands::check::run(&source, &options)
    } else if cli.dump_ast {
        commands::ast::run(&source, &options)
    } else {
        commands::run::run(&source, &options)
    };

    match result {
        Ok(Outcome::Success) => 0,
        Ok(Outcome::Failed) => EXIT_PROGRAM_ERROR,
        Err(err) => {
            eprintln!("error: {:#}", err);
            EXIT_PROGRAM_ERROR
        }
    }
}

/// Install the stderr logger; `SPROLA_LOG` sets the filter, `--verbose` raises it to debug
fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::new().filter_or("SPROLA_LOG", "warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}
