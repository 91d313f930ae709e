use clap::{Parser, Subcommand};
use zetpkg::cli::{check_package, extract_package, pack, show_info, ExtractOptions, PackOptions};
use zetpkg::detect::detect_from_bytes;
use zetpkg::Validation;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Version info from build.rs
const VERSION: &str = env!("ZETPKG_VERSION");
const PROFILE: &str = env!("ZETPKG_PROFILE");
const GIT_HASH: &str = env!("ZETPKG_GIT_HASH");

/// Combined version string (compile-time concatenation not possible, so we build at runtime)
fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} ({})", PROFILE, VERSION, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "zetpkg")]
#[command(author, about = "Self-describing, content-verified package container", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack files or directories into a package
    #[command(alias = "p")]
    Pack {
        /// Files or directories to include
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Entry asset path (must be one of the packed files)
        #[arg(short, long)]
        entry: String,

        /// Output package file
        #[arg(short, long, default_value = "out.zetpkg")]
        output: PathBuf,

        /// Package version (defaults to 1.0.0)
        #[arg(long)]
        version: Option<String>,

        /// Extra metadata as key=value (repeatable)
        #[arg(long = "meta", value_parser = parse_key_value)]
        meta: Vec<(String, String)>,
    },

    /// Verify a package and write its assets to a directory
    #[command(alias = "x")]
    Extract {
        /// Package file
        input: PathBuf,

        /// Output directory
        #[arg(short = 'C', long, default_value = ".")]
        output_dir: PathBuf,

        /// Ignore non-alphabet characters in payload text
        #[arg(long)]
        lenient: bool,
    },

    /// Show information about a package
    #[command(alias = "i")]
    Info {
        /// Package file
        file: PathBuf,
    },

    /// Check a package (structure only unless --deep)
    Check {
        /// Package file
        file: PathBuf,

        /// Decode and verify every asset
        #[arg(long)]
        deep: bool,
    },

    /// Guess the content type of a file
    Detect {
        /// File to inspect
        file: PathBuf,
    },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Handle --version flag
    if cli.version {
        println!("zetpkg {}", get_version());
        return ExitCode::SUCCESS;
    }

    // Require a command if not showing version
    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            if let Err(e) = Cli::command().print_help() {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            println!();
            return ExitCode::SUCCESS;
        }
    };

    init_tracing(cli.verbose);

    let result: Result<(), Box<dyn std::error::Error>> = match command {
        Commands::Pack {
            inputs,
            entry,
            output,
            version,
            meta,
        } => {
            let options = PackOptions {
                entry,
                version,
                metadata: meta,
            };

            match pack(&inputs, &output, &options) {
                Ok(built) => {
                    println!("Created {} ({} bytes)", output.display(), built.size);
                    println!("SHA-256: {}", built.hash);
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        }

        Commands::Extract {
            input,
            output_dir,
            lenient,
        } => {
            let options = ExtractOptions { lenient };

            match extract_package(&input, &output_dir, &options) {
                Ok(count) => {
                    println!("Extracted {} assets to {}", count, output_dir.display());
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        }

        Commands::Info { file } => match show_info(&file) {
            Ok(info) => {
                print!("{}", info);
                Ok(())
            }
            Err(e) => Err(e.into()),
        },

        Commands::Check { file, deep } => match check_package(&file, deep) {
            Ok(Validation::Valid) => {
                println!("{}: valid", file.display());
                Ok(())
            }
            Ok(Validation::Invalid(failure)) => Err(failure.into()),
            Err(e) => Err(e.into()),
        },

        Commands::Detect { file } => match std::fs::read(&file) {
            Ok(bytes) => {
                let info = detect_from_bytes(&bytes);
                println!(
                    "{}: {:?} ({}, executable: {})",
                    file.display(),
                    info.kind,
                    info.mime_type,
                    info.is_executable
                );
                Ok(())
            }
            Err(e) => Err(e.into()),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
