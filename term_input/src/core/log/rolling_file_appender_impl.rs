// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::PathBuf;

/// Creates a file appender that never rotates. The parent folder of `path_str` must
/// exist; the file is created if needed.
///
/// # Errors
///
/// Returns an error if `path_str` has no parent folder or no file name.
pub fn try_create(
    path_str: &str,
) -> miette::Result<tracing_appender::rolling::RollingFileAppender> {
    let path = PathBuf::from(path_str);

    let parent = match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
        Some(parent) => parent.to_path_buf(),
        None => {
            return Err(miette::miette!(
                "Can't access parent folder of {}. It might not exist, or you don't have the required permissions.",
                path.display()
            ));
        }
    };

    let file_name = path.file_name().ok_or_else(|| {
        miette::miette!(
            "Can't access file name {}. It might not exist, or you don't have the required permissions.",
            path.display()
        )
    })?;

    Ok(tracing_appender::rolling::never(parent, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_create_rejects_root() {
        assert!(try_create("/").is_err());
    }

    #[test]
    fn test_try_create_in_temp_dir() {
        let dir = std::env::temp_dir().join("term_input_rolling_file_appender_test");
        std::fs::create_dir_all(&dir).unwrap();
        let file_path = dir.join("log.txt");
        let result = try_create(file_path.to_str().unwrap());
        assert!(result.is_ok());
    }
}
