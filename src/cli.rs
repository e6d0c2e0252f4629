use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::build::DEFAULT_MIN_BODY_CHARS;

#[derive(Parser, Debug)]
#[command(
    name = "hadith",
    version,
    about = "Tamil hadith corpus extraction, cleaning and loading"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    Clean(CleanArgs),
    Build(BuildArgs),
    Run(RunArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long, default_value = ".cache/hadith")]
    pub work_dir: PathBuf,

    #[arg(long)]
    pub pdf: PathBuf,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub max_pages: Option<usize>,

    /// External legacy-font decoder; reads raw text on stdin, writes Unicode on stdout.
    #[arg(long)]
    pub decoder_command: Option<String>,

    #[arg(long)]
    pub decoded_output: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    #[arg(long, default_value = ".cache/hadith")]
    pub work_dir: PathBuf,

    #[arg(long)]
    pub input: Option<PathBuf>,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub review_path: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[arg(long, default_value = ".cache/hadith")]
    pub work_dir: PathBuf,

    #[arg(long)]
    pub input: Option<PathBuf>,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_MIN_BODY_CHARS)]
    pub min_body_chars: usize,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(long, default_value = ".cache/hadith")]
    pub work_dir: PathBuf,

    #[arg(long)]
    pub input: Option<PathBuf>,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_MIN_BODY_CHARS)]
    pub min_body_chars: usize,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".cache/hadith")]
    pub work_dir: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Build manifest to report instead of the newest `build_run_*.json`
    /// under `<work-dir>/manifests`.
    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

impl RunArgs {
    pub fn clean_args(&self) -> CleanArgs {
        CleanArgs {
            work_dir: self.work_dir.clone(),
            input: self.input.clone(),
            output: None,
            review_path: None,
            manifest_path: None,
        }
    }

    pub fn build_args(&self, cleaned_path: PathBuf) -> BuildArgs {
        BuildArgs {
            work_dir: self.work_dir.clone(),
            input: Some(cleaned_path),
            db_path: self.db_path.clone(),
            min_body_chars: self.min_body_chars,
            manifest_path: None,
        }
    }
}
