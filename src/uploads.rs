use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Allowed image extensions
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Maximum file size (10 MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// URL prefix the uploads directory is served under.
pub const PUBLIC_PREFIX: &str = "/uploads/";

/// Save an uploaded image into `uploads_dir` under a random name.
/// Returns the public path (e.g. "/uploads/abc123.jpg").
pub async fn save_uploaded_file(
    uploads_dir: &str,
    filename: &str,
    data: &[u8],
) -> Result<String> {
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::Validation("File too large (max 10 MB)".to_string()));
    }

    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .ok_or_else(|| AppError::Validation("Invalid filename".to_string()))?;

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::Validation(format!(
            "Invalid file type. Allowed: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    let uploads_path = PathBuf::from(uploads_dir);
    fs::create_dir_all(&uploads_path).await.map_err(|e| {
        AppError::Internal(format!("Failed to create uploads directory: {}", e))
    })?;

    let new_filename = format!("{}.{}", Uuid::new_v4(), extension);
    let file_path = uploads_path.join(&new_filename);

    let mut file = fs::File::create(&file_path).await.map_err(|e| {
        AppError::Internal(format!("Failed to create file: {}", e))
    })?;

    file.write_all(data).await.map_err(|e| {
        AppError::Internal(format!("Failed to write file: {}", e))
    })?;

    Ok(format!("{}{}", PUBLIC_PREFIX, new_filename))
}

/// Delete a file previously returned by [`save_uploaded_file`].
/// External URLs are left alone.
pub async fn delete_uploaded_file(uploads_dir: &str, public_path: &str) -> Result<()> {
    let Some(name) = public_path.strip_prefix(PUBLIC_PREFIX) else {
        return Ok(());
    };

    // Never follow a path out of the uploads directory
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return Ok(());
    }

    let path = PathBuf::from(uploads_dir).join(name);
    if fs::try_exists(&path).await.unwrap_or(false) {
        fs::remove_file(&path).await.map_err(|e| {
            AppError::Internal(format!("Failed to delete file: {}", e))
        })?;
    }

    Ok(())
}
