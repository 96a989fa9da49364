use std::path::Path;

use super::ImageError;

/// Encoding chosen from the output path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn from_extension(ext: &str) -> Result<Self, ImageError> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            _ => Err(ImageError::UnsupportedFormat(ext.to_string())),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ImageError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_format_from_extension() {
        assert_eq!(
            OutputFormat::from_path(Path::new("Images/a.jpg")).unwrap(),
            OutputFormat::Jpeg
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("a.JPEG")).unwrap(),
            OutputFormat::Jpeg
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("a.png")).unwrap(),
            OutputFormat::Png
        );
    }

    #[test]
    fn other_extensions_are_unsupported() {
        assert!(matches!(
            OutputFormat::from_path(Path::new("a.gif")),
            Err(ImageError::UnsupportedFormat(ref e)) if e == "gif"
        ));
        assert!(matches!(
            OutputFormat::from_path(Path::new("noext")),
            Err(ImageError::UnsupportedFormat(_))
        ));
    }
}
