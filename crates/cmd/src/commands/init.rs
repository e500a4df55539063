// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use anyhow::{Result, anyhow};
use diagnostics::*;

/// Write an example configuration to `path`. An existing file is never
/// overwritten.
pub async fn init_command(path: &Path) -> Result<()> {
    let display = path.display().to_string();
    if tokio::fs::try_exists(path).await? {
        return Err(anyhow!("Configuration file {display} already exists"));
    }

    readings::create_example_config(path).await?;
    info!("Wrote example configuration to {display}", display);
    Ok(())
}
