use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use mailproof_core::ContractCalldata;

pub fn read_email_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| anyhow!("Failed to open email file: {}", e))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| anyhow!("Failed to read email contents: {}", e))?;
    Ok(contents)
}

/// Write the calldata document as pretty-printed JSON, replacing any
/// existing file at `path`.
pub fn save_calldata(calldata: &ContractCalldata, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    serde_json::to_writer_pretty(file, calldata).context("Failed to write calldata JSON")?;
    Ok(())
}

/// Print the four verifier arguments as JSON literals plus the rendered
/// call string, ready for copy-paste into a contract-interaction tool.
pub fn display_calldata(calldata: &ContractCalldata) -> Result<()> {
    let raw = &calldata.raw_calldata;
    println!("_pA:\n{}", serde_json::to_string(&raw.p_a)?);
    println!("\n_pB:\n{}", serde_json::to_string(&raw.p_b)?);
    println!("\n_pC:\n{}", serde_json::to_string(&raw.p_c)?);
    println!("\n_pubSignals:\n{}", serde_json::to_string(&raw.pub_signals)?);
    println!("\nfunctionCall:\n{}", calldata.function_call);
    Ok(())
}
