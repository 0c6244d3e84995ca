// src/output/writer.rs
//! Executes delivery by performing the actual I/O.

use super::DeliveryTarget;
use crate::error::AppError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Writes `content` to the target and returns the number of bytes written.
pub fn deliver(target: &DeliveryTarget, content: &str) -> Result<usize, AppError> {
    match target {
        DeliveryTarget::WriteFile { path } => write_file(path, content),
        DeliveryTarget::PrintToStdout => {
            print_to_stdout(content)?;
            Ok(content.len())
        }
    }
}

/// Writes content to a file, creating parent directories as needed.
fn write_file(path: &Path, content: &str) -> Result<usize, AppError> {
    log::debug!("Writing {} bytes to {}", content.len(), path.display());

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, content)?;

    log::info!("Wrote file: {}", path.display());
    Ok(content.len())
}

fn print_to_stdout(content: &str) -> Result<(), AppError> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_file_with_parent_directories() {
        let dir = std::env::temp_dir().join(format!("memdex_writer_{}", std::process::id()));
        let path = dir.join("nested").join("photos.json");

        let written = deliver(&DeliveryTarget::WriteFile { path: path.clone() }, "[]\n").unwrap();

        assert_eq!(written, 3);
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");
        fs::remove_dir_all(&dir).unwrap();
    }
}
