use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use owo_colors::OwoColorize;

use twig::cli::{generate_completions, AppConfig, Args, Commands};
use twig::diagnostic::{render_diagnostics, Diagnostic};
use twig::emit::emit_source;
use twig::format::display_value;
use twig::interpreter::Interpreter;
use twig::json;
use twig::Value;

fn main() {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);

    verbose_log(&config, "Starting twig");

    let text = match read_program_input(&args, &config) {
        Ok(text) => text,
        Err(message) => {
            error_message(&config, &message);
            std::process::exit(1);
        }
    };

    verbose_log(&config, &format!("Read {} bytes of program JSON", text.len()));

    let program = match json::parse_program(&text) {
        Ok(program) => {
            verbose_log(&config, "Successfully decoded program");
            program
        }
        Err(error) => {
            report(&config, None, &[error.to_diagnostic()]);
            std::process::exit(1);
        }
    };

    if args.emit {
        verbose_log(&config, "Emitting surface syntax");
        write_result(&emit_source(&program.expression), &args.out, &config);
        return;
    }

    let mut interpreter = Interpreter::new();
    match interpreter.run(&program.expression) {
        Ok(Value::Unit) => {
            verbose_log(&config, "Program finished with no final value");
        }
        Ok(value) => {
            let line = format!("{}\n", display_value(&value));
            write_result(&line, &args.out, &config);
        }
        Err(error) => {
            report(&config, program.name.as_deref(), &[error.to_diagnostic()]);
            std::process::exit(1);
        }
    }
}

fn read_program_input(args: &Args, config: &AppConfig) -> Result<String, String> {
    if let Some(file) = &args.file {
        verbose_log(config, &format!("Reading program from file: {}", file.display()));
        read_file(file)
    } else if let Some(program) = &args.program {
        verbose_log(config, "Reading program from command-line argument");
        Ok(program.clone())
    } else {
        verbose_log(config, "Reading program from stdin");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;

        if buffer.trim().is_empty() {
            return Err(
                "No input provided. Must provide --file, a PROGRAM argument, or JSON via stdin"
                    .to_string(),
            );
        }

        Ok(buffer)
    }
}

fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

/// Renders diagnostics to stderr. When the program records the surface
/// source it was parsed from and that file is readable, spans render as
/// annotated snippets; otherwise as bare byte ranges.
fn report(config: &AppConfig, source_name: Option<&str>, diagnostics: &[Diagnostic]) {
    let source = source_name.and_then(|name| fs::read_to_string(name).ok());
    let rendered = render_diagnostics(
        source.as_deref(),
        source_name.unwrap_or("program"),
        diagnostics,
        config.color_enabled,
    );
    eprint!("{}", rendered);
}

fn write_result(output: &str, out_file: &Option<PathBuf>, config: &AppConfig) {
    match out_file {
        Some(path) => {
            verbose_log(config, &format!("Writing output to file: {}", path.display()));
            if let Err(e) = fs::write(path, output) {
                error_message(config, &format!("Error writing to output file: {}", e));
                std::process::exit(1);
            }
        }
        None => {
            print!("{}", output);
            let _ = io::stdout().flush();
        }
    }
}

fn verbose_log(config: &AppConfig, message: &str) {
    if config.verbose {
        eprintln!("[twig:debug] {}", message);
    }
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
