//! 待上传的图片文件
//!
//! MIME 类型优先根据文件头判断，无法识别时再看扩展名

use std::path::Path;

use phf::phf_map;
use tokio::fs;

use crate::error::{GradeError, Result};

/// 无法识别时使用的类型
pub const UNKNOWN_MIME: &str = "application/octet-stream";

static EXTENSION_MIME: phf::Map<&'static str, &'static str> = phf_map! {
    "png" => "image/png",
    "jpg" => "image/jpeg",
    "jpeg" => "image/jpeg",
    "gif" => "image/gif",
    "bmp" => "image/bmp",
    "webp" => "image/webp",
    "tif" => "image/tiff",
    "tiff" => "image/tiff",
};

/// 用户选择的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// 从磁盘读取文件并判断 MIME 类型
    pub async fn load(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if file_name.trim().is_empty() {
            return Err(GradeError::file(path.display().to_string(), "no selected file"));
        }

        let bytes = fs::read(path)
            .await
            .map_err(|e| GradeError::file(path.display().to_string(), e.to_string()))?;

        let mime_type = sniff_mime(&bytes)
            .or_else(|| mime_from_extension(&file_name))
            .unwrap_or(UNKNOWN_MIME);

        Ok(Self::new(file_name, mime_type, bytes))
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// 根据文件头判断图片类型
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.starts_with(b"BM") && bytes.len() >= 14 {
        Some("image/bmp")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else if bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*") {
        Some("image/tiff")
    } else {
        None
    }
}

/// 根据扩展名判断图片类型
pub fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    EXTENSION_MIME.get(ext.to_ascii_lowercase().as_str()).copied()
}
