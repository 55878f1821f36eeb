//! bytepatch command-line binary

use bytepatch::api::{PatchOptions, ReportFormat, run_patch};
use bytepatch::config::PatchConfig;
use bytepatch::exit_codes::{EXIT_INVALID_ARGS, EXIT_PANIC, EXIT_SUCCESS};
use bytepatch::logger::{JsonLogger, LOG_LEVEL_ENV};
use bytepatch::utils::is_env_true;
use clap::Parser;
use std::{env, panic, path::PathBuf, process};

const VERSION: &str = bytepatch::version::VERSION;

/// Environment variable selecting the dialog reporter
const DIALOG_ENV: &str = "BYTEPATCH_DIALOG";

#[derive(Parser, Debug)]
#[command(
    name = "bytepatch",
    version = VERSION,
    about = "Overwrite bytes at a fixed offset of an existing file"
)]
struct Args {
    /// JSON patch file with target, offset and payload
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// File to patch
    #[arg(short, long)]
    target: Option<PathBuf>,

    /// Raw file offset (decimal or 0x-prefixed hex)
    #[arg(short, long)]
    offset: Option<String>,

    /// Patch bytes as hex, e.g. "AA BB CC"
    #[arg(short, long)]
    bytes: Option<String>,

    /// Output format for the final message
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Show the final message in a dialog box (Windows only)
    #[arg(long)]
    dialog: bool,

    /// Log level (trace, debug, info, warn, error, json[:level])
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    // Set up panic handler to return specific exit code
    panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {}", panic_info);
        process::exit(EXIT_PANIC);
    }));

    // Wrap main logic in catch_unwind for extra safety
    let result = panic::catch_unwind(run);

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(_) => {
            eprintln!("Fatal: Unhandled panic in bytepatch");
            process::exit(EXIT_PANIC);
        }
    }
}

fn run() -> i32 {
    // Handle --version before clap to include build information
    if env::args().nth(1).as_deref() == Some("--version") {
        println!("bytepatch {}", bytepatch::version::full_version());
        return EXIT_SUCCESS;
    }

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return usage_exit_code(&e);
        }
    };

    if let Some(ref level) = args.log_level {
        JsonLogger::init_with_level(level);
    } else if let Ok(level) = env::var(LOG_LEVEL_ENV) {
        JsonLogger::init_with_level(&level);
    } else {
        JsonLogger::init();
    }

    log::trace!("📋 Arguments: {:?}", args);

    let config = PatchConfig {
        target: args.target,
        offset: args.offset,
        bytes: args.bytes,
        patch_file: args.config,
    };

    let request = match config.resolve() {
        Ok(request) => request,
        Err(e) => {
            log::debug!("Invalid configuration: {}", e);
            eprintln!("Error: {}", e);
            eprintln!("Usage: bytepatch --target <PATH> --offset <N> --bytes <HEX>");
            eprintln!("   or: bytepatch --config <patch.json>");
            return EXIT_INVALID_ARGS;
        }
    };

    let options = PatchOptions {
        format: args.format,
        dialog: args.dialog || is_env_true(DIALOG_ENV),
    };

    run_patch(&request, &options)
}

/// `--help` and `--version` exit cleanly; every other usage error is an invalid argument
fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.exit_code() == 0 {
        EXIT_SUCCESS
    } else {
        EXIT_INVALID_ARGS
    }
}
