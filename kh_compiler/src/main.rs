use kh_compiler::config::runtime::RuntimeConfig;
use kh_compiler::pipeline::{self, PipelineError, PipelineResult};
use kh_compiler::symbols::SymbolError;
use kh_compiler::logging::codes;
use kh_compiler::{log_error, logging};
use std::env;

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Help,
    Compile(CliOptions),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    file: String,
    json: bool,
    config_path: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("kh_compiler", String::as_str);

    let options = match parse_args(args.get(1..).unwrap_or(&[])) {
        Ok(Command::Help) => {
            print_help(program);
            return Ok(());
        }
        Ok(Command::Compile(options)) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: {} <file.kh> [--json] [--config <prefs.toml>]", program);
            eprintln!("       {} --help", program);
            std::process::exit(1);
        }
    };

    // Preferences must be installed before the logger reads them
    let config = match &options.config_path {
        Some(path) => match RuntimeConfig::load_from_file(path) {
            Ok(config) => config,
            Err(error) => {
                let error = PipelineError::from(error);
                logging::safe_log_error(error.error_code(), &error.to_string());
                std::process::exit(1);
            }
        },
        None => RuntimeConfig::default(),
    };
    let initialized = logging::config::init_runtime_preferences(config.logging.clone())
        .and_then(|_| logging::init_global_logging());
    if let Err(message) = initialized {
        logging::safe_log_error(codes::system::INITIALIZATION_FAILURE, &message);
        std::process::exit(1);
    }
    pipeline::validate_pipeline()?;

    if !options.json {
        println!("Processing file: {}", options.file);
    }

    match pipeline::process_file_with_config(&options.file, &config) {
        Ok(result) => {
            if options.json {
                println!("{}", result.output().to_json()?);
            } else {
                print_report(&result);
                logging::print_cargo_style_summary();
            }
            if !result.success() {
                std::process::exit(1);
            }
        }
        Err(error) => {
            log_error!(error.error_code(), "Compilation aborted", "file" => options.file.as_str());
            eprintln!("\nFAILED: {}", error);
            logging::print_cargo_style_summary();
            std::process::exit(1);
        }
    }

    Ok(())
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut file = None;
    let mut json = false;
    let mut config_path = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--json" => json = true,
            "--config" => match iter.next() {
                Some(path) => config_path = Some(path.clone()),
                None => return Err("--config requires a path".to_string()),
            },
            option if option.starts_with("--") => {
                return Err(format!("Unknown option '{}'", option));
            }
            path => {
                if file.replace(path.to_string()).is_some() {
                    return Err("Only one input file may be given".to_string());
                }
            }
        }
    }

    file.map(|file| {
        Command::Compile(CliOptions {
            file,
            json,
            config_path,
        })
    })
    .ok_or_else(|| "Missing input file".to_string())
}

fn print_help(program: &str) {
    println!("KH Compiler v{}", env!("CARGO_PKG_VERSION"));
    println!("Limits: {}", kh_compiler::config::build_info::source_info());
    println!("Lexer, token automaton, symbol table and conditional validation for .kh sources");
    println!();
    println!("USAGE:");
    println!("    {} <file.kh> [--json] [--config <prefs.toml>]", program);
    println!();
    println!("OPTIONS:");
    println!("    --help              Show this help message");
    println!("    --json              Print the structured pipeline output as JSON");
    println!("    --config <FILE>     Load runtime preferences from a TOML file");
    println!();

    println!("PIPELINE CAPABILITIES:");
    for line in pipeline::get_pipeline_info().report().lines() {
        println!("    {}", line);
    }
}

fn print_report(result: &PipelineResult) {
    println!("\n=== Tokens ===");
    println!("{:<20} {}", "Token", "Type");
    println!("{}", "-".repeat(40));
    for token in &result.stream {
        println!("{:<20} {}", token.text, token.kind);
    }

    println!("\n=== NFA ===");
    print!("{}", result.automata.nfa.summary());
    println!("\n=== DFA ===");
    print!("{}", result.automata.dfa.summary());

    println!("\n=== Token Validation ===");
    for verdict in &result.validation.verdicts {
        let status = if verdict.accepted { "Accepted" } else { "Rejected" };
        println!("{:<20} {}", verdict.token, status);
    }
    println!(
        "Accepted: {}, Rejected: {}",
        result.validation.accepted, result.validation.rejected
    );

    println!("\n=== Symbol Table ===");
    print!("{}", result.symbols.table);
    for diagnostic in &result.symbols.diagnostics {
        match diagnostic {
            SymbolError::ScopeUnderflow { span, .. } => {
                print!("{}", result.source_map.format_error(span, &diagnostic.to_string()))
            }
            _ => println!("warning: {}", diagnostic),
        }
    }

    println!("\n=== Conditional Validation ===");
    match &result.conditional.error {
        None => println!(
            "Valid ({} if statement(s) checked)",
            result.conditional.if_statements
        ),
        Some(error) => {
            let message = format!("{} (expected '{}')", error, error.expected());
            match result.stream.get(error.position()) {
                Some(token) => print!("{}", result.source_map.format_error(&token.span, &message)),
                None => println!("error: {}", message),
            }
        }
    }

    if result.success() {
        println!("\nSUCCESS: All stages completed without errors");
    } else {
        println!("\nFAILED: One or more stages reported errors");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let command = parse_args(&args(&["prog.kh", "--json", "--config", "prefs.toml"]));
        assert_eq!(
            command,
            Ok(Command::Compile(CliOptions {
                file: "prog.kh".to_string(),
                json: true,
                config_path: Some("prefs.toml".to_string()),
            }))
        );

        assert_eq!(parse_args(&args(&["prog.kh", "--help"])), Ok(Command::Help));
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["a.kh", "b.kh"])).is_err());
        assert!(parse_args(&args(&["a.kh", "--config"])).is_err());
        assert!(parse_args(&args(&["a.kh", "--threads"])).is_err());
    }
}
