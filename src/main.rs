use std::fs::read_to_string;
use std::io::{self, Write};
use std::process::exit;

use clap::{App, Arg, ArgMatches};
use tracing_subscriber::EnvFilter;

use ember::{Interpreter, Parser, Scanner};

/// Environment variable holding the log filter
const LOG_ENV: &str = "EMBER_LOG";

fn app() -> App<'static, 'static> {
    App::new("ember")
        .version(ember::VERSION)
        .about("Runs Ember scripts")
        .arg(
            Arg::with_name("FILE")
                .help("Source file to run")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("tokens")
                .long("tokens")
                .help("Print the token sequence and exit"),
        )
        .arg(
            Arg::with_name("ast")
                .long("ast")
                .help("Print the parsed program as JSON and exit")
                .conflicts_with("tokens"),
        )
}

fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("could not install logger: {}", err))
}

fn run(matches: &ArgMatches, source: &str) -> anyhow::Result<()> {
    let tokens = Scanner::new(source).scan_tokens();

    if matches.is_present("tokens") {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for token in &tokens {
            writeln!(out, "{}", token)?;
        }
        return Ok(());
    }

    let program = Parser::new(tokens).parse()?;

    if matches.is_present("ast") {
        println!("{}", serde_json::to_string_pretty(&program)?);
        return Ok(());
    }

    Interpreter::new().interpret(&program)?;
    Ok(())
}

fn main() {
    // Usage errors exit with status 1, --help and --version with 0
    let matches = app().get_matches();

    if let Err(err) = init_logging() {
        eprintln!("warning: {:#}", err);
    }

    let path = match matches.value_of("FILE") {
        Some(path) => path,
        None => exit(1),
    };
    let source = read_to_string(path).unwrap_or_else(|err| {
        eprintln!("could not open file {}: {}", path, err);
        exit(1);
    });

    if let Err(err) = run(&matches, &source) {
        eprintln!("error: {}", err);
        exit(1);
    }
}
