//! Implementation of the `teaching-assistant init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::cli::build_context;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::setup::{create_config_dir, create_config_file, create_data_dirs, SetupPaths};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long, short)]
    pub force: bool,

    /// Do not add the sample courses
    #[arg(long)]
    pub no_seed: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub initialized_path: PathBuf,
    pub config_written: bool,
    pub directories_created: Vec<String>,
    pub courses_seeded: usize,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push(format!(
                "\nConfiguration written to {}",
                SetupPaths::new(&self.initialized_path).config_file.display()
            ));
        }
        if !self.directories_created.is_empty() {
            lines.push("\nCreated directories:".to_string());
            for dir in &self.directories_created {
                lines.push(format!("  - {dir}"));
            }
        }
        if self.courses_seeded > 0 {
            lines.push(format!("\nAdded {} sample course(s)", self.courses_seeded));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: InitArgs, mut config: Config, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let paths = SetupPaths::new(&target_path);
    if paths.is_initialized() && !args.force {
        let output_data = InitOutput {
            success: false,
            message: "Project already initialized. Use --force to reinitialize.".to_string(),
            initialized_path: target_path,
            config_written: false,
            directories_created: vec![],
            courses_seeded: 0,
        };
        output(&output_data, json_mode);
        return Ok(());
    }

    create_config_dir(&paths)?;
    let config_written = create_config_file(&paths, args.force)?;

    // Data paths are relative to the target, not the working directory.
    if Path::new(&config.data_dir).is_relative() {
        config.data_dir = target_path.join(&config.data_dir).display().to_string();
    }
    let directories_created = create_data_dirs(&target_path, &config)?
        .iter()
        .map(|dir| {
            dir.strip_prefix(&target_path)
                .unwrap_or(dir)
                .to_string_lossy()
                .to_string()
        })
        .collect();

    let courses_seeded = if args.no_seed {
        0
    } else {
        let ctx = build_context(config)?;
        ctx.courses
            .seed_samples()
            .await
            .context("Failed to add sample courses")?
    };

    let output_data = InitOutput {
        success: true,
        message: if args.force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        initialized_path: target_path,
        config_written,
        directories_created,
        courses_seeded,
    };

    output(&output_data, json_mode);
    Ok(())
}
