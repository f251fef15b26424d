use crate::error::Error;
use crate::model::{DimensionProbe, Dimensions};
use image::ImageReader;
use std::path::Path;
use tracing::{debug, warn};

/// Reads the pixel size from the image header. The format is sniffed from
/// the content, so a PNG saved with a `.jpg` name still measures.
pub fn read_dimensions(path: &Path) -> Result<Dimensions, Error> {
    let decode_err = |source| Error::Decode {
        path: path.to_path_buf(),
        source,
    };

    let (width, height) = ImageReader::open(path)
        .map_err(|e| decode_err(e.into()))?
        .with_guessed_format()
        .map_err(|e| decode_err(e.into()))?
        .into_dimensions()
        .map_err(decode_err)?;

    Ok(Dimensions::new(width, height))
}

/// Never fails: anything that cannot be measured gets `Dimensions::FALLBACK`.
pub fn probe_dimensions(path: &Path) -> DimensionProbe {
    let reason = match read_dimensions(path) {
        Ok(d) if d.width > 0 && d.height > 0 => {
            debug!("Measured {} as {}", path.display(), d);
            return DimensionProbe::Measured(d);
        }
        Ok(d) => format!("image reports zero-sized dimensions {}", d),
        Err(err) => err.to_string(),
    };

    warn!(
        "Error reading {}: {}; using {}",
        path.display(),
        reason,
        Dimensions::FALLBACK
    );
    DimensionProbe::Fallback {
        dimensions: Dimensions::FALLBACK,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_measures_valid_jpeg() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("photo.jpg");
        RgbImage::new(120, 45).save(&path).unwrap();

        let probe = probe_dimensions(&path);
        assert_eq!(probe, DimensionProbe::Measured(Dimensions::new(120, 45)));
        assert!(!probe.is_fallback());
    }

    #[test]
    fn test_sniffs_format_regardless_of_extension() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("actually_png.jpg");
        RgbImage::new(7, 9)
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        assert_eq!(read_dimensions(&path).unwrap(), Dimensions::new(7, 9));
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("broken.jpg");
        fs::write(&path, b"definitely not an image").unwrap();

        assert!(matches!(read_dimensions(&path), Err(Error::Decode { .. })));

        let probe = probe_dimensions(&path);
        assert!(probe.is_fallback());
        assert_eq!(probe.dimensions(), Dimensions::new(800, 600));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tmp = tempdir().unwrap();
        let probe = probe_dimensions(&tmp.path().join("nope.jpg"));
        match probe {
            DimensionProbe::Fallback { dimensions, reason } => {
                assert_eq!(dimensions, Dimensions::FALLBACK);
                assert!(!reason.is_empty());
            }
            other => panic!("expected fallback, got {:?}", other),
        }
    }
}
