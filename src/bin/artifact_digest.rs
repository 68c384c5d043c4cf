//! Artifact digest utility.
//!
//! Validates model artifacts and writes the `<artifact>.sha256` sidecar that
//! the loader checks when `CARDIORISK_REQUIRE_ARTIFACT_DIGEST` is set.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin artifact_digest -- models/heart_model.json [more artifacts...]
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use cardiorisk::adapters::artifact::{digest_path, sha256_hex};
use cardiorisk::adapters::{ArtifactFormat, ModelArtifact};

#[derive(Parser, Debug)]
#[command(version, about = "Write SHA-256 sidecars for model artifacts")]
struct Args {
    /// Artifact files to digest.
    #[arg(required = true)]
    artifacts: Vec<PathBuf>,

    /// Skip decoding and schema checks.
    #[arg(long)]
    no_validate: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    for path in &args.artifacts {
        if !path.is_file() {
            bail!("Not a file: {}", path.display());
        }
        let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

        if !args.no_validate {
            let artifact = ModelArtifact::decode(&bytes, ArtifactFormat::from_path(path))
                .with_context(|| format!("Invalid artifact {}", path.display()))?;
            artifact
                .into_handle(path.clone())
                .with_context(|| format!("Invalid artifact {}", path.display()))?;
        }

        let digest = sha256_hex(&bytes);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let sidecar = digest_path(path);
        fs::write(&sidecar, format!("{digest}  {file_name}\n"))
            .with_context(|| format!("Failed to write {}", sidecar.display()))?;

        println!("{digest}  {}", path.display());
        println!("Wrote digest: {}", sidecar.display());
    }

    Ok(())
}
