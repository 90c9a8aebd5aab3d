use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::commands::CliError;

/// Parse a JSON payload from `--data-file` or, failing that, `--data`.
pub fn read_payload<T: DeserializeOwned>(
    data: Option<String>,
    file: Option<PathBuf>,
) -> Result<T, CliError> {
    let raw = if let Some(path) = file {
        fs::read_to_string(&path).map_err(|source| CliError::InputFile {
            path: path.display().to_string(),
            source,
        })?
    } else if let Some(inline) = data {
        inline
    } else {
        return Err(CliError::InvalidInput(
            "payload required (use --data or --data-file)".into(),
        ));
    };
    serde_json::from_str(&raw).map_err(|e| CliError::InvalidInput(format!("invalid payload: {e}")))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::InvalidInput(format!("failed to render output: {e}")))?;
    println!("{out}");
    Ok(())
}
