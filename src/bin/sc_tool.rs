//! Diagnostic CLI over `sc_pkcs15`'s public API. No business logic lives
//! here — every subcommand is a thin call into the library, printed either
//! as JSON (for machine consumption) or plain text.

use anyhow::{Context, Result};
use argh::FromArgs;
use sc_pkcs15::atr::parse_atr;
use sc_pkcs15::bytes::hex_to_bin;
use sc_pkcs15::config::Config;
use sc_pkcs15::path::Path;

#[derive(FromArgs)]
/// ISO 7816 / PKCS#15 diagnostic tool.
struct Cli {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Atr(AtrCmd),
    ParsePath(ParsePathCmd),
    CheckConfig(CheckConfigCmd),
}

#[derive(FromArgs)]
/// Parse an Answer-to-Reset and print its fields as JSON.
#[argh(subcommand, name = "atr")]
struct AtrCmd {
    #[argh(positional)]
    /// hex-encoded ATR bytes, e.g. 3BF711000081...
    hex: String,
}

#[derive(FromArgs)]
/// Parse a card file path and print its normalized form.
#[argh(subcommand, name = "parse-path")]
struct ParsePathCmd {
    #[argh(positional)]
    /// path string, e.g. i3F00 or 3F00:50:15
    path: String,
}

#[derive(FromArgs)]
/// Load a TOML config file and print the effective, defaulted config.
#[argh(subcommand, name = "check-config")]
struct CheckConfigCmd {
    #[argh(positional)]
    /// path to a TOML config file
    path: std::path::PathBuf,
}

fn main() -> Result<()> {
    let cli: Cli = argh::from_env();
    match cli.command {
        Command::Atr(cmd) => {
            let bytes = hex_to_bin(&cmd.hex).context("invalid hex ATR")?;
            let atr = parse_atr(&bytes).context("failed to parse ATR")?;
            println!("{}", serde_json::to_string_pretty(&atr)?);
        }
        Command::ParsePath(cmd) => {
            let path: Path = Path::parse_path(&cmd.path).context("invalid path")?;
            println!("{}", path.print_path());
        }
        Command::CheckConfig(cmd) => {
            let config = Config::from_path(&cmd.path).context("failed to load config")?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
