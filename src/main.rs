//! Command-line front end for the symbolic engine.
//!
//! Two subcommands, thin glue over the library:
//! - `--eval "<expression>" name=value ...` parses the expression, builds the
//!   binding environment and prints the numeric result
//! - `--diff "<expression>" --by <name>` parses the expression and prints the
//!   canonical rendering of its derivative
//!
//! Any failure prints a one-line message to stderr and exits with code 1.

use std::collections::HashMap;
use std::env;
use std::process::ExitCode;

use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

use symbolic_diff::symbolic::errors::ExprError;
use symbolic_diff::symbolic::symbolic_engine::Expr;

fn main() -> ExitCode {
    init_logger();
    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn init_logger() {
    let level = match env::var("SYMBOLIC_DIFF_LOG").as_deref() {
        Ok("debug") => LevelFilter::Debug,
        Ok("info") => LevelFilter::Info,
        _ => LevelFilter::Warn,
    };
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn run(args: &[String]) -> Result<String, String> {
    match args.first().map(String::as_str) {
        Some("--eval") if args.len() >= 2 => {
            let expr = Expr::parse_expression(&args[1]).map_err(|e| e.to_string())?;
            let bindings = parse_bindings(&args[2..])?;
            let result = expr.evaluate(&bindings).map_err(|e| describe_eval_error(e, &expr))?;
            Ok(format!("{}", result))
        }
        Some("--diff") if args.len() == 4 && args[2] == "--by" => {
            let expr = Expr::parse_expression(&args[1]).map_err(|e| e.to_string())?;
            let derivative = expr.diff(&args[3]).map_err(|e| e.to_string())?;
            Ok(derivative.render())
        }
        _ => Err(usage()),
    }
}

fn parse_bindings(args: &[String]) -> Result<HashMap<String, f64>, String> {
    let mut bindings = HashMap::new();
    for arg in args {
        let (name, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("invalid binding `{}` (expected name=value)", arg))?;
        let value: f64 = value
            .parse()
            .map_err(|_| format!("invalid numeric value in binding `{}`", arg))?;
        bindings.insert(name.to_string(), value);
    }
    Ok(bindings)
}

fn describe_eval_error(error: ExprError, expr: &Expr) -> String {
    match &error {
        ExprError::UndefinedVariable(_) => {
            format!(
                "{} (expression variables: {})",
                error,
                expr.variables().join(", ")
            )
        }
        _ => error.to_string(),
    }
}

fn usage() -> String {
    let prog = env::args()
        .next()
        .unwrap_or_else(|| "symbolic_diff".to_string());
    format!(
        "Usage:\n  {prog} --eval \"<expression>\" name=value ...\n  {prog} --diff \"<expression>\" --by <name>"
    )
}
