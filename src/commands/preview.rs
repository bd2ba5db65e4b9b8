use super::load_batch;
use crate::cli::Input;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use stamp_config::Config;

/// Print `original -> final` for every file, in batch order.
pub async fn preview(config: &Config, input: &Input) -> Result<()> {
    let mut batch = load_batch(config, input).await?;
    batch.generate_names().or_raise(|| ErrorKind::Naming)?;

    let width = batch.entries().iter().map(|e| e.name().len()).max().unwrap_or(0);
    for entry in batch.entries() {
        println!("{:<width$}  ->  {}", entry.name(), entry.final_name());
    }
    Ok(())
}
