//! Resource center CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::{build_context, save_download};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{Config, Material, ResourceLink};

#[derive(Args, Debug)]
pub struct ResourcesArgs {
    #[command(subcommand)]
    pub command: ResourcesCommands,
}

#[derive(Subcommand, Debug)]
pub enum ResourcesCommands {
    /// Show external learning resources
    Links,
    /// Store a learning file
    Upload {
        /// File to upload
        file: PathBuf,
    },
    /// List uploaded learning files
    List,
    /// Download an uploaded learning file
    Get {
        /// Name of the uploaded file
        filename: String,
        /// Where to save it; defaults to the same name in the current directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct LinksOutput {
    pub links: Vec<ResourceLink>,
}

impl CommandOutput for LinksOutput {
    fn to_human(&self) -> String {
        if self.links.is_empty() {
            return "No resource links configured.".to_string();
        }
        TableFormatter::new().format_links(&self.links)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct MaterialListOutput {
    pub materials: Vec<Material>,
    pub total: usize,
}

impl CommandOutput for MaterialListOutput {
    fn to_human(&self) -> String {
        if self.materials.is_empty() {
            return "No learning materials uploaded.".to_string();
        }
        format!(
            "Found {} file(s):\n{}",
            self.total,
            TableFormatter::new().format_materials(&self.materials)
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct UploadOutput {
    pub success: bool,
    pub message: String,
    pub material: Option<Material>,
}

impl CommandOutput for UploadOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct DownloadOutput {
    pub material: Material,
    pub saved_to: PathBuf,
}

impl CommandOutput for DownloadOutput {
    fn to_human(&self) -> String {
        format!(
            "Saved '{}' ({} bytes) to {}.",
            self.material.filename,
            self.material.size_bytes,
            self.saved_to.display()
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: ResourcesArgs, config: Config, json_mode: bool) -> Result<()> {
    let ctx = build_context(config)?;

    match args.command {
        ResourcesCommands::Links => {
            let output_data = LinksOutput {
                links: ctx.resources.links().to_vec(),
            };
            output(&output_data, json_mode);
        }

        ResourcesCommands::Upload { file } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let filename = file
                .file_name()
                .map_or_else(|| file.display().to_string(), |n| n.to_string_lossy().to_string());

            let material = ctx
                .resources
                .upload(&filename, &bytes)
                .await
                .context("Failed to store learning file")?;
            let output_data = match material {
                Some(material) => UploadOutput {
                    success: true,
                    message: format!("Stored '{}' ({} bytes).", material.filename, material.size_bytes),
                    material: Some(material),
                },
                None => UploadOutput {
                    success: false,
                    message: format!("Nothing to store: '{filename}' is empty."),
                    material: None,
                },
            };
            output(&output_data, json_mode);
        }

        ResourcesCommands::List => {
            let materials = ctx
                .resources
                .materials()
                .await
                .context("Failed to list learning files")?;
            output(
                &MaterialListOutput {
                    total: materials.len(),
                    materials,
                },
                json_mode,
            );
        }

        ResourcesCommands::Get { filename, output: target } => {
            let (material, bytes) = ctx
                .resources
                .download(&filename)
                .await
                .context("Failed to fetch learning file")?;
            let saved_to = save_download(target.as_deref(), &material.filename, &bytes).await?;
            output(&DownloadOutput { material, saved_to }, json_mode);
        }
    }

    Ok(())
}
