use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Arg, ArgAction, Command};

use imlformat::formatting::{self, Options};
use imlformat::parsing::ExternalParser;
use imlformat::problem;

const DEFAULT_PARSER: &str = "iml2json";

fn main() -> ExitCode {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("imlformat")
        .version(VERSION)
        .propagate_version(true)
        .about("Code formatter for the IML modeling language.")
        .disable_help_subcommand(true)
        .subcommand(
            Command::new("format")
                .about("Reformat the given IML file")
                .arg(
                    Arg::new("in-place")
                        .short('i')
                        .long("in-place")
                        .action(ArgAction::SetTrue)
                        .help("Rewrite the file instead of printing the result to standard output."),
                )
                .arg(
                    Arg::new("width")
                        .short('w')
                        .long("width")
                        .value_parser(clap::value_parser!(usize))
                        .help("Target line width, overriding the configuration file."),
                )
                .arg(
                    Arg::new("parser")
                        .long("parser")
                        .default_value(DEFAULT_PARSER)
                        .help("Parser command to run; it reads IML on stdin and writes parsetree JSON on stdout."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The IML file you want to reformat."),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Check whether the given IML file is already formatted")
                .arg(
                    Arg::new("width")
                        .short('w')
                        .long("width")
                        .value_parser(clap::value_parser!(usize))
                        .help("Target line width, overriding the configuration file."),
                )
                .arg(
                    Arg::new("parser")
                        .long("parser")
                        .default_value(DEFAULT_PARSER)
                        .help("Parser command to run; it reads IML on stdin and writes parsetree JSON on stdout."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The IML file you want to check."),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("format", submatches)) => {
            let filename = filename_argument(submatches);
            let in_place = submatches.get_flag("in-place");
            run_format(&filename, submatches, in_place)
        }
        Some(("check", submatches)) => {
            let filename = filename_argument(submatches);
            run_check(&filename, submatches)
        }
        _ => {
            println!("usage: imlformat [COMMAND] ...");
            println!("Try '--help' for more information.");
            ExitCode::FAILURE
        }
    }
}

fn filename_argument(submatches: &clap::ArgMatches) -> PathBuf {
    submatches
        .get_one::<String>("filename")
        .map(PathBuf::from)
        .unwrap_or_default()
}

/// Configuration is discovered next to the file being formatted, then
/// command-line options override it.
fn effective_options(filename: &Path, submatches: &clap::ArgMatches) -> Options {
    let root = filename
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut options = Options::load(root);
    if let Some(width) = submatches.get_one::<usize>("width") {
        options.width = *width;
    }
    options
}

fn reformat(
    filename: &Path,
    submatches: &clap::ArgMatches,
    concise: bool,
) -> Result<(String, String), ExitCode> {
    let source = std::fs::read_to_string(filename).map_err(|error| {
        eprintln!("{}", problem::concise_io_error(&error, filename));
        ExitCode::FAILURE
    })?;

    let options = effective_options(filename, submatches);
    let parser = ExternalParser::new(
        submatches
            .get_one::<String>("parser")
            .map(String::as_str)
            .unwrap_or(DEFAULT_PARSER),
    );

    let formatted = formatting::format_source(&parser, &source, &options).map_err(|error| {
        let message = if concise {
            problem::concise_format_error(&error, filename)
        } else {
            problem::full_format_error(&error, filename)
        };
        eprintln!("{}", message);
        ExitCode::FAILURE
    })?;

    Ok((source, formatted))
}

fn run_format(filename: &Path, submatches: &clap::ArgMatches, in_place: bool) -> ExitCode {
    let (source, formatted) = match reformat(filename, submatches, false) {
        Ok(result) => result,
        Err(code) => return code,
    };

    if in_place {
        if formatted != source {
            if let Err(error) = std::fs::write(filename, &formatted) {
                eprintln!("{}", problem::concise_io_error(&error, filename));
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", formatted);
    }
    ExitCode::SUCCESS
}

// check keeps its diagnostics to one line per file; format explains in full.
fn run_check(filename: &Path, submatches: &clap::ArgMatches) -> ExitCode {
    let (source, formatted) = match reformat(filename, submatches, true) {
        Ok(result) => result,
        Err(code) => return code,
    };

    if formatted == source {
        ExitCode::SUCCESS
    } else {
        println!("would reformat {}", filename.display());
        ExitCode::FAILURE
    }
}
