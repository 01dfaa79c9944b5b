//! Face token resolution.
//!
//! A card face is stored as a token: either literal text, or a
//! `ref://<filename>` reference into a package's asset area. Resolution turns
//! a token into typed content by extension (`.png`/`.jpg` image, `.rtf` rich
//! text, `.txt` plain text). Unresolvable content degrades to `None` instead
//! of erroring; failure visibility stays with the caller.
//!
//! Decks derived directly from a folder of image files use a legacy naming
//! convention instead of explicit tokens: a front asset named `*.front.*`
//! pairs with the `*.back.*` file of the same name.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Token prefix marking a filename inside the package's asset area.
pub const REF_SCHEME: &str = "ref://";

/// Marker substring of a legacy front asset filename.
pub const FRONT_MARKER: &str = ".front.";

/// Marker substituted for [`FRONT_MARKER`] to locate the paired back asset.
pub const BACK_MARKER: &str = ".back.";

#[derive(Error, Debug)]
#[error("asset not found: {}", .0.display())]
pub struct ResourceNotFound(pub PathBuf);

/// Materialized content of a card face.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FaceContent {
    /// Inline text, or the contents of a referenced `.txt` file.
    Text(String),
    /// Raw bytes of a referenced `.rtf` document.
    RichText(Vec<u8>),
    /// Resolved path of a referenced image file.
    ImageRef(PathBuf),
}

/// Builds a `ref://` token for an asset filename.
pub fn ref_token(filename: &str) -> String {
    format!("{REF_SCHEME}{filename}")
}

/// The asset filename of a `ref://` token, or `None` for inline text.
pub fn ref_filename(token: &str) -> Option<&str> {
    token.strip_prefix(REF_SCHEME)
}

/// Resolves a face token against a package's asset directory.
///
/// Inline tokens resolve to themselves. Reference tokens are dispatched on
/// extension with a single read attempt; a missing or unreadable file, or an
/// unrecognized extension, yields `None`. Never panics.
pub fn resolve(token: &str, asset_dir: &Path) -> Option<FaceContent> {
    let Some(name) = ref_filename(token) else {
        return Some(FaceContent::Text(token.to_string()));
    };

    let path = asset_dir.join(name);
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("png") | Some("jpg") => fs::metadata(&path).ok().map(|_| FaceContent::ImageRef(path)),
        Some("rtf") => fs::read(&path).ok().map(FaceContent::RichText),
        Some("txt") => fs::read_to_string(&path).ok().map(FaceContent::Text),
        _ => None,
    }
}

/// Locates the back asset paired with a legacy `*.front.*` file.
///
/// The back filename is derived by substituting `.back.` for `.front.` in
/// the front filename, then probed once; a missing file is the sole failure
/// signal.
pub fn pair_back_file(front: &Path) -> Result<PathBuf, ResourceNotFound> {
    let name = front
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ResourceNotFound(front.to_path_buf()))?;
    let back = front.with_file_name(name.replace(FRONT_MARKER, BACK_MARKER));
    match fs::metadata(&back) {
        Ok(_) => Ok(back),
        Err(_) => Err(ResourceNotFound(back)),
    }
}

/// Whether a filename follows the legacy front-asset naming convention.
pub fn is_front_asset(filename: &str) -> bool {
    filename.contains(FRONT_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_inline_text_resolves_to_itself() {
        let dir = TempDir::new().unwrap();

        let content = resolve("What is the capital of France?", dir.path());
        assert_eq!(
            content,
            Some(FaceContent::Text("What is the capital of France?".into()))
        );
    }

    #[test]
    fn test_txt_reference_reads_file_contents() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("note.txt"), "Paris").unwrap();

        let content = resolve("ref://note.txt", dir.path());
        assert_eq!(content, Some(FaceContent::Text("Paris".into())));
    }

    #[test]
    fn test_rtf_reference_yields_raw_bytes() {
        let dir = TempDir::new().unwrap();
        let bytes = b"{\\rtf1 hello}".to_vec();
        fs::write(dir.path().join("face.rtf"), &bytes).unwrap();

        let content = resolve("ref://face.rtf", dir.path());
        assert_eq!(content, Some(FaceContent::RichText(bytes)));
    }

    #[test]
    fn test_image_reference_resolves_to_path() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("map.png"), b"png").unwrap();

        let content = resolve("ref://map.png", dir.path());
        assert_eq!(
            content,
            Some(FaceContent::ImageRef(dir.path().join("map.png")))
        );
    }

    #[test]
    fn test_missing_reference_degrades_to_none() {
        let dir = TempDir::new().unwrap();

        assert_eq!(resolve("ref://gone.png", dir.path()), None);
        assert_eq!(resolve("ref://gone.txt", dir.path()), None);
    }

    #[test]
    fn test_unknown_extension_is_unresolved_even_if_present() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("doc.pdf"), b"pdf").unwrap();

        assert_eq!(resolve("ref://doc.pdf", dir.path()), None);
    }

    #[test]
    fn test_pair_back_file_by_naming_convention() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("berlin.front.png"), b"f").unwrap();
        fs::write(dir.path().join("berlin.back.png"), b"b").unwrap();

        let back = pair_back_file(&dir.path().join("berlin.front.png")).unwrap();
        assert_eq!(back, dir.path().join("berlin.back.png"));
    }

    #[test]
    fn test_pair_back_file_missing_counterpart() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("rome.front.png"), b"f").unwrap();

        let err = pair_back_file(&dir.path().join("rome.front.png")).unwrap_err();
        assert_eq!(err.0, dir.path().join("rome.back.png"));
    }

    #[test]
    fn test_token_helpers() {
        assert_eq!(ref_token("a.png"), "ref://a.png");
        assert_eq!(ref_filename("ref://a.png"), Some("a.png"));
        assert_eq!(ref_filename("plain text"), None);
        assert!(is_front_asset("x.front.png"));
        assert!(!is_front_asset("x.back.png"));
    }
}
