use anyhow::Result;
use tracing::info;

use crate::cli::RunArgs;
use crate::commands::{build, clean};

pub fn run(args: RunArgs) -> Result<()> {
    info!(work_dir = %args.work_dir.display(), "starting clean and build");

    let cleaned_path = clean::clean_file(&args.clean_args())?;
    build::run(args.build_args(cleaned_path))?;

    info!("clean and build completed");
    Ok(())
}
