//! # inictl
//!
//! Reads and edits INI files through a fixed-size window.

use ini_console::{run, Command, ConsoleConfig};
use ini_editor::{CommentMode, EditorConfig, LineEnding};
use std::env;
use std::fs;
use std::io;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    let (config, command) = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(&args[0]);
        process::exit(1);
    });

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if config.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", e);
    }

    let stdout = io::stdout();
    if let Err(e) = run(&config, &command, &mut stdout.lock()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<(ConsoleConfig, Command), String> {
    let mut window = None;
    let mut editor = EditorConfig::default();
    let mut overrides: Vec<fn(&mut EditorConfig)> = Vec::new();
    let mut verbose = false;
    let mut i = 1;

    while i < args.len() && args[i].starts_with("--") {
        match args[i].as_str() {
            "--window" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --window".to_string());
                }
                window = Some(
                    args[i]
                        .parse()
                        .map_err(|_| format!("Invalid window size: {}", args[i]))?,
                );
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --config".to_string());
                }
                let bytes = fs::read(&args[i])
                    .map_err(|e| format!("Failed to read config file: {}", e))?;
                editor = EditorConfig::from_json(&bytes).map_err(|e| e.to_string())?;
            }
            "--full-line-comments" => {
                overrides.push(|c| c.comment_mode = CommentMode::FullLine);
            }
            "--lf" => {
                overrides.push(|c| c.line_ending = LineEnding::Lf);
            }
            "--no-check" => {
                overrides.push(|c| c.validate_window = false);
            }
            "--verbose" => {
                verbose = true;
            }
            "--help" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    let path = args.get(i).ok_or_else(|| "Missing file argument".to_string())?;
    let command = Command::parse(&args[i + 1..]).map_err(|e| e.to_string())?;

    // Flags win over a config file regardless of order
    for apply in overrides {
        apply(&mut editor);
    }

    let mut config = ConsoleConfig::new(path);
    if let Some(window) = window {
        config.window = window;
    }
    config.editor = editor;
    config.verbose = verbose;
    Ok((config, command))
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS] <FILE> <COMMAND> [ARGS]", program);
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  get <SECTION> <KEY>                      Print a value");
    eprintln!("  set <SECTION> <KEY> <VALUE> [--reserve N] Write or create a value");
    eprintln!("  sections                                 List sections");
    eprintln!("  keys <SECTION>                           List key=value pairs");
    eprintln!("  dump                                     Print the file as JSON");
    eprintln!("  cat                                      Print the file verbatim");
    eprintln!("  check                                    Verify every line fits the window");
    eprintln!();
    eprintln!("  Use - as SECTION for the default section.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --window <BYTES>         Window size (default 256)");
    eprintln!("  --config <FILE>          Editor config as JSON");
    eprintln!("  --full-line-comments     Only leading ; and # start comments");
    eprintln!("  --lf                     Use LF instead of CRLF for new lines");
    eprintln!("  --no-check               Skip the window check on open");
    eprintln!("  --verbose                Debug logging on stderr");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} settings.ini get net port", program);
    eprintln!("  {} --window 64 settings.ini set wifi ssid home --reserve 32", program);
}
