use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "artarget",
    about = "ARTarget: bind images to AR barcode markers",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML config file; `ARTARGET_*` variables override it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the bucket and the registry
    #[arg(long, global = true, default_value = ".artarget")]
    pub data_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Rebuild the registry from the bucket listing
    Sync,
    /// Upload an image and bind it to a barcode marker
    Upload(UploadArgs),
    /// List registry entries
    Targets,
    /// Print the AR view URL for a content type
    Launch(LaunchArgs),
    /// Check a signed URL against the configured key
    VerifyUrl(VerifyUrlArgs),
}

#[derive(Args)]
pub struct UploadArgs {
    pub file: PathBuf,
    /// Barcode value to bind
    #[arg(short, long)]
    pub marker: u32,
    /// MIME type; guessed from the extension when omitted
    #[arg(long)]
    pub mime: Option<String>,
}

#[derive(Args)]
pub struct LaunchArgs {
    /// image, box, sphere, cylinder or torus
    #[arg(default_value = "box")]
    pub content_type: String,
}

#[derive(Args)]
pub struct VerifyUrlArgs {
    pub url: String,
}
