use clap::{Parser, Subcommand};
use stegvault::cli::{hide_file, reveal_file, show_info, HideOptions, RevealOptions};
use std::path::PathBuf;
use std::process::ExitCode;

/// Version info from build.rs
const VERSION: &str = env!("STEGVAULT_VERSION");
const BUILD: &str = env!("STEGVAULT_BUILD");
const PROFILE: &str = env!("STEGVAULT_PROFILE");
const GIT_HASH: &str = env!("STEGVAULT_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} build {} ({})", PROFILE, VERSION, BUILD, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "stegvault")]
#[command(author, about = "Encrypted LSB steganography for lossless images", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file and hide it in a cover image
    #[command(alias = "h")]
    Hide {
        /// Cover image (PNG, BMP or JPEG; output is always PNG)
        #[arg(long, required = true)]
        cover: PathBuf,

        /// File to hide
        input: PathBuf,

        /// Output stego PNG
        output: PathBuf,

        /// Write the key to this file instead of printing it
        #[arg(long, conflicts_with = "raw")]
        key_out: Option<PathBuf>,

        /// Embed the file unencrypted
        #[arg(long)]
        raw: bool,
    },

    /// Recover a hidden file from a stego image
    #[command(alias = "r")]
    Reveal {
        /// Key printed by `hide`, as hex
        #[arg(long, conflicts_with = "key_file")]
        key: Option<String>,

        /// File containing the hex key
        #[arg(long)]
        key_file: Option<PathBuf>,

        /// Stego image
        input: PathBuf,

        /// Output file
        output: PathBuf,

        /// The image holds an unencrypted payload
        #[arg(long)]
        raw: bool,
    },

    /// Show capacity and hidden-data status of an image
    #[command(alias = "i")]
    Info {
        /// Image to inspect
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if cli.version {
        println!("stegvault {}", get_version());
        return ExitCode::SUCCESS;
    }

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

    let result = match command {
        Commands::Hide {
            cover,
            input,
            output,
            key_out,
            raw,
        } => {
            let options = HideOptions {
                cover,
                raw,
                key_out,
            };

            hide_file(&input, &output, &options).map(|report| {
                println!(
                    "Hidden {} bytes in {} ({} bits available)",
                    report.payload_bytes,
                    output.display(),
                    report.available_bits
                );
                if let Some(key) = report.key {
                    println!("Key: {}", key.to_hex());
                    println!("Keep this key separate from the image.");
                } else if let Some(path) = report.key_file {
                    println!("Key written to {}", path.display());
                }
            })
        }

        Commands::Reveal {
            key,
            key_file,
            input,
            output,
            raw,
        } => {
            let options = RevealOptions { key, key_file, raw };

            reveal_file(&input, &output, &options).map(|written| {
                println!("Revealed {} bytes to {}", written, output.display());
            })
        }

        Commands::Info { file } => show_info(&file).map(|info| print!("{}", info)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
