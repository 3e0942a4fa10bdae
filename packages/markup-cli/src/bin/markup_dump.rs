/**
 * Markup Parser CLI - markup-dump
 *
 * Parses a markup file and prints its syntax tree or diagnostics
 */
use std::fs;
use std::io::{self, Read, Write};
use std::process;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use markup_parser::parse_util::ParseSourceFile;
use markup_parser::{HtmlParser, ParseOptions};

fn main() {
    let matches = cli().get_matches();

    let level = match matches.get_count("verbose") {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let result = run(&matches, &mut io::stdin(), &mut io::stdout(), &mut io::stderr());
    if let Err(err) = &result {
        eprintln!("Error: {:#}", err);
    }
    process::exit(exit_code_from_result(&result));
}

fn cli() -> Command {
    Command::new("markup-dump")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse HTML-family markup into a concrete syntax tree")
        .arg(
            Arg::new("input")
                .value_name("FILE")
                .required(true)
                .help("Markup file to parse, or - for stdin"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("JSON file with parser options"),
        )
        .arg(
            Arg::new("placeholder")
                .long("placeholder")
                .value_name("NAME")
                .help("Completion placeholder; overrides the config file"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_parser(["tree", "json", "errors"])
                .default_value("tree")
                .help("Output format"),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .action(ArgAction::SetTrue)
                .help("Print tag stack statistics to stderr"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log parser decisions (-v debug, -vv trace)"),
        )
}

/// 0 for a clean document, 1 when it had diagnostics, 2 when it could not
/// be parsed at all
fn exit_code_from_result(result: &Result<bool>) -> i32 {
    match result {
        Ok(false) => 0,
        Ok(true) => 1,
        Err(_) => 2,
    }
}

/// Returns whether the document had diagnostics
fn run(matches: &ArgMatches, stdin: &mut dyn Read, out: &mut dyn Write, err: &mut dyn Write) -> Result<bool> {
    let mut options = match matches.get_one::<String>("config") {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
            ParseOptions::from_json(&json).with_context(|| format!("loading config {}", path))?
        }
        None => ParseOptions::default(),
    };
    if let Some(placeholder) = matches.get_one::<String>("placeholder") {
        options.completion_placeholder = Some(placeholder.clone());
    }

    let input = matches
        .get_one::<String>("input")
        .context("missing input file")?;
    let source = if input == "-" {
        let mut source = String::new();
        stdin.read_to_string(&mut source).context("reading stdin")?;
        source
    } else {
        fs::read_to_string(input).with_context(|| format!("reading {}", input))?
    };
    if options.url.is_empty() {
        options.url = input.clone();
    }

    let file = ParseSourceFile::new(source.clone(), options.url.clone());
    let result = HtmlParser::with_options(options).parse(&source);
    log::debug!("{} diagnostics", result.errors.len());

    match matches.get_one::<String>("format").map(String::as_str) {
        Some("json") => {
            let json = result.tree.to_json().context("serializing tree")?;
            write!(out, "{}", json)?;
        }
        Some("errors") => {
            for error in &result.errors {
                writeln!(out, "{}", error.to_string_in(&file))?;
            }
        }
        _ => write!(out, "{}", result.tree.debug_dump())?,
    }

    if matches.get_flag("stats") {
        let stats = serde_json::to_string(&result.stats).context("serializing stats")?;
        writeln!(err, "{}", stats)?;
    }

    Ok(result.has_errors())
}
