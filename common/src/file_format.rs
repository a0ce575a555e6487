use std::path::Path;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FileExtensionError {
    #[error("Failed to get file extension")]
    MissingFileExtension,
    #[error("Unsupported file extension for file: {0}")]
    UnsupportedFileExtension(String),
}

pub type FileFormatResult<T> = Result<T, FileExtensionError>;

/// Returns the lowercased extension of `path`, if it has a UTF-8 one.
pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|os_str| os_str.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Looks up the value registered for the extension of `path`.
///
/// Matching is case-insensitive; `table` keys must be lowercase.
pub fn format_from_extension<T: Copy>(path: &Path, table: &[(&str, T)]) -> FileFormatResult<T> {
    let extension = get_file_extension(path).ok_or(FileExtensionError::MissingFileExtension)?;

    table
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, value)| *value)
        .ok_or_else(|| FileExtensionError::UnsupportedFileExtension(path.display().to_string()))
}
