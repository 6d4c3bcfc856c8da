//! Command-line interface for pipp
//! This binary compiles pipp specifications into document models and exposes the earlier
//! pipeline stages for inspection.
//!
//! Usage:
//!   pipp compile `<path>` [--style `<style>`] [--compact]  - Compile a specification to JSON
//!   pipp ast `<path>`                                     - Print the parsed configuration tree
//!   pipp tokens `<path>`                                  - Print the scanner's token stream
//!   pipp list-styles                                      - List the registered style guides
//!
//! `compile` reads `pipp.toml` from the working directory when present, and
//! `--config <file>` layers another file on top.

use clap::{Arg, ArgAction, ArgMatches, Command};
use pipp::pipp::ast::ConfigNode;
use pipp::pipp::bridge::{compile_file, Bridge};
use pipp::pipp::config::{CliOverrides, Loader, PippConfig};
use pipp::pipp::processor::Processor;
use pipp::pipp::scanner::tokenize;
use pipp::pipp::style::StyleTable;

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .global(true)
        .help("Configuration file layered over the built-in defaults")
}

fn path_arg(help: &'static str) -> Arg {
    Arg::new("path").help(help).required(true).index(1)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = Command::new("pipp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A compiler for pipp document specifications")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(config_arg())
        .subcommand(
            Command::new("compile")
                .about("Compile a specification into a document model")
                .arg(path_arg("Path to the pipp file to compile"))
                .arg(
                    Arg::new("style")
                        .long("style")
                        .short('s')
                        .help("Style guide for documents that declare none (e.g., 'MLA9', 'Pipp')"),
                )
                .arg(
                    Arg::new("severity")
                        .long("severity")
                        .help("Lowest warning severity to report ('low', 'high', 'critical')"),
                )
                .arg(
                    Arg::new("compact")
                        .long("compact")
                        .action(ArgAction::SetTrue)
                        .help("Print the document model on a single line"),
                ),
        )
        .subcommand(
            Command::new("ast")
                .about("Print the parsed configuration tree")
                .arg(path_arg("Path to the pipp file to parse")),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the token stream")
                .arg(path_arg("Path to the pipp file to scan")),
        )
        .subcommand(Command::new("list-styles").about("List the registered style guides"))
        .get_matches();

    match matches.subcommand() {
        Some(("compile", compile_matches)) => {
            let config = load_config(compile_matches);
            let path = compile_matches.get_one::<String>("path").unwrap();
            handle_compile_command(path, &config);
        }
        Some(("ast", ast_matches)) => {
            let path = ast_matches.get_one::<String>("path").unwrap();
            handle_ast_command(path);
        }
        Some(("tokens", tokens_matches)) => {
            let path = tokens_matches.get_one::<String>("path").unwrap();
            handle_tokens_command(path);
        }
        Some(("list-styles", _)) => {
            handle_list_styles_command();
        }
        _ => unreachable!(),
    }
}

fn load_config(compile_matches: &ArgMatches) -> PippConfig {
    let mut loader = Loader::new().with_optional_file("pipp.toml");
    if let Some(path) = compile_matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }

    let overrides = CliOverrides {
        default_style: compile_matches.get_one::<String>("style").cloned(),
        minimum_severity: compile_matches.get_one::<String>("severity").cloned(),
        compact: compile_matches.get_flag("compact"),
    };
    loader = loader.with_cli(&overrides).unwrap_or_else(|e| {
        eprintln!("Invalid command line option: {}", e);
        std::process::exit(1);
    });

    loader.build().unwrap_or_else(|e| {
        eprintln!("Error loading configuration: {}", e);
        std::process::exit(1);
    })
}

fn read_source(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    })
}

/// Handle the compile command
fn handle_compile_command(path: &str, config: &PippConfig) {
    let processor = Processor::new(config.compiler.default_style.as_str());
    let compilation = compile_file(path, &processor).unwrap_or_else(|e| {
        eprintln!("Compilation failed: {}", e);
        std::process::exit(1);
    });

    for warning in compilation
        .warnings
        .at_least(config.diagnostics.minimum_severity)
    {
        eprintln!("warning {}", warning);
    }

    let output = compilation
        .document
        .to_json(config.output.pretty)
        .unwrap_or_else(|e| {
            eprintln!("Serialization error: {}", e);
            std::process::exit(1);
        });
    println!("{}", output);
}

/// Handle the ast command
fn handle_ast_command(path: &str) {
    let source = read_source(path);
    let configuration = Bridge::new(&source).parse().unwrap_or_else(|e| {
        eprintln!("Parse failed: {}", e);
        std::process::exit(1);
    });
    println!("{}", configuration.render_debug());
}

/// Handle the tokens command
fn handle_tokens_command(path: &str) {
    let source = read_source(path);
    let tokens = tokenize(&source).unwrap_or_else(|e| {
        eprintln!("Scan failed: {}", e);
        std::process::exit(1);
    });
    for token in tokens {
        println!("{}", token);
    }
}

/// Handle the list-styles command
fn handle_list_styles_command() {
    println!("Registered style guides:\n");
    for name in StyleTable::with_defaults().list_styles() {
        println!("  {}", name);
    }
}
