use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use art_auth::InMemorySessionProvider;
use art_registry::{FileKeyValueStore, KvTargetRegistry};
use art_sdk::{AppConfig, ArApp, SyncOutcome, UploadFile};
use art_store::{LocalObjectStore, UrlSigner};
use colored::Colorize;
use serde_json::json;
use tracing::{debug, warn};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let format = cli.format;
    match &cli.command {
        Command::Sync => cmd_sync(&open_app(config, &cli.data_dir)?, format).await,
        Command::Upload(args) => cmd_upload(&open_app(config, &cli.data_dir)?, args, format).await,
        Command::Targets => cmd_targets(&open_app(config, &cli.data_dir)?, format),
        Command::Launch(args) => cmd_launch(&open_app(config, &cli.data_dir)?, args, format),
        Command::VerifyUrl(args) => cmd_verify_url(&config, args, format),
    }
}

fn signer(config: &AppConfig) -> UrlSigner {
    UrlSigner::from_secret(&config.store_url, &config.bucket, &config.store_key)
}

/// Bucket under `{data_dir}/objects`, registry under `{data_dir}/registry`.
fn open_app(config: AppConfig, data_dir: &Path) -> anyhow::Result<ArApp> {
    let store = LocalObjectStore::open(data_dir.join("objects"), signer(&config))
        .with_context(|| format!("opening bucket in {}", data_dir.display()))?;
    let kv = FileKeyValueStore::open(data_dir.join("registry"))
        .with_context(|| format!("opening registry in {}", data_dir.display()))?;
    let registry = KvTargetRegistry::new(Arc::new(kv), config.registry_key.clone());
    debug!(data_dir = %data_dir.display(), bucket = %config.bucket, "opened local store");
    Ok(ArApp::new(
        config,
        Arc::new(store),
        Arc::new(registry),
        Arc::new(InMemorySessionProvider::new()),
    )?)
}

fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

async fn cmd_sync(app: &ArApp, format: OutputFormat) -> anyhow::Result<()> {
    let outcome = match app.sync().await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(error = %e, "sync failed");
            anyhow::bail!("{}", e.user_notice());
        }
    };
    match (format, outcome) {
        (OutputFormat::Json, SyncOutcome::Replaced { count }) => {
            println!("{}", json!({ "status": "replaced", "count": count }))
        }
        (OutputFormat::Json, SyncOutcome::SkippedEmptyRemote) => {
            println!("{}", json!({ "status": "skipped_empty_remote" }))
        }
        (OutputFormat::Text, SyncOutcome::Replaced { count }) => {
            println!("{} Registry rebuilt with {} targets", "✓".green().bold(), count.to_string().bold())
        }
        (OutputFormat::Text, SyncOutcome::SkippedEmptyRemote) => {
            println!("{} Bucket is empty; registry left as is", "!".yellow().bold())
        }
    }
    Ok(())
}

async fn cmd_upload(app: &ArApp, args: &UploadArgs, format: OutputFormat) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("reading {}", args.file.display()))?;
    let mime = args
        .mime
        .clone()
        .unwrap_or_else(|| guess_mime(&args.file).to_string());
    let name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = UploadFile::new(bytes, mime, name);

    let registration = match app.upload_and_register(&file, args.marker).await {
        Ok(r) => r,
        Err(e) => anyhow::bail!("{}", e.user_notice()),
    };
    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "upload": registration.upload,
                "target": registration.target,
                "index": registration.outcome.index(),
            })
        ),
        OutputFormat::Text => {
            println!(
                "{} Marker {} bound to {}",
                "✓".green().bold(),
                registration.target.key().to_string().yellow(),
                registration.upload.path.bold()
            );
            println!("  Public URL: {}", registration.upload.public_url.blue());
            println!("  Signed URL: {}", registration.upload.signed_url.dimmed());
        }
    }
    Ok(())
}

fn cmd_targets(app: &ArApp, format: OutputFormat) -> anyhow::Result<()> {
    let targets = app.targets();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&targets)?),
        OutputFormat::Text => {
            if targets.is_empty() {
                println!("No targets registered.");
            }
            for (i, target) in targets.iter().enumerate() {
                println!(
                    "{:>3}  {:<12} {:<9} {}",
                    i,
                    target.key().to_string().yellow(),
                    target.content.content_type().to_string().cyan(),
                    target.content.src().unwrap_or("-")
                );
            }
        }
    }
    Ok(())
}

fn cmd_launch(app: &ArApp, args: &LaunchArgs, format: OutputFormat) -> anyhow::Result<()> {
    let launch = app.launch_hint(&args.content_type);
    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "type": launch.content_type().as_str(), "url": launch.url() })
        ),
        OutputFormat::Text => println!("{}", launch.url()),
    }
    Ok(())
}

fn cmd_verify_url(config: &AppConfig, args: &VerifyUrlArgs, format: OutputFormat) -> anyhow::Result<()> {
    let result = signer(config).verify(&args.url, chrono::Utc::now().timestamp());
    match (format, result) {
        (OutputFormat::Json, Ok(path)) => println!("{}", json!({ "valid": true, "path": path })),
        (OutputFormat::Json, Err(e)) => {
            println!("{}", json!({ "valid": false, "reason": e.to_string() }))
        }
        (OutputFormat::Text, Ok(path)) => println!("{} Valid signature for {}", "✓".green().bold(), path.bold()),
        (OutputFormat::Text, Err(e)) => anyhow::bail!("{} {e}", "✗".red().bold()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    fn workspace() -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let config = tmp.path().join("artarget.toml");
        std::fs::write(
            &config,
            "store_url = \"https://store.example\"\nstore_key = \"test-key\"\n",
        )
        .unwrap();
        (tmp, config)
    }

    fn cli(tmp: &Path, config: &Path, args: &[&str]) -> Cli {
        let mut argv = vec![
            "artarget".to_string(),
            "--config".into(),
            config.display().to_string(),
            "--data-dir".into(),
            tmp.join("data").display().to_string(),
        ];
        argv.extend(args.iter().map(|s| s.to_string()));
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(guess_mime(Path::new("a.PNG")), "image/png");
        assert_eq!(guess_mime(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("a.webp")), "image/webp");
        assert_eq!(guess_mime(Path::new("a.gif")), "image/gif");
        assert_eq!(guess_mime(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn upload_then_sync() {
        let (tmp, config) = workspace();
        let image = tmp.path().join("cat.png");
        std::fs::write(&image, vec![0u8; 256]).unwrap();

        let upload = cli(tmp.path(), &config, &["upload", image.to_str().unwrap(), "--marker", "5"]);
        run_command(upload).await.unwrap();
        run_command(cli(tmp.path(), &config, &["sync"])).await.unwrap();
        run_command(cli(tmp.path(), &config, &["--format", "json", "targets"]))
            .await
            .unwrap();

        let config = AppConfig::load(Some(&config)).unwrap();
        let app = open_app(config, &tmp.path().join("data")).unwrap();
        let targets = app.targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].value, Some(0));
    }

    #[tokio::test]
    async fn rejected_upload_is_an_error() {
        let (tmp, config) = workspace();
        let image = tmp.path().join("anim.gif");
        std::fs::write(&image, b"GIF89a").unwrap();
        let err = run_command(cli(tmp.path(), &config, &["upload", image.to_str().unwrap(), "-m", "1"]))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("invalid file type"));
    }

    #[tokio::test]
    async fn verify_url_round_trip() {
        let (tmp, config) = workspace();
        let loaded = AppConfig::load(Some(&config)).unwrap();
        let url = signer(&loaded).sign("marker-1-2.png", chrono::Utc::now().timestamp() + 60);
        run_command(cli(tmp.path(), &config, &["verify-url", &url])).await.unwrap();

        let tampered = url.replace("marker-1-2", "marker-9-2");
        assert!(run_command(cli(tmp.path(), &config, &["verify-url", &tampered])).await.is_err());
    }
}
