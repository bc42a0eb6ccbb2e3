// Image collection module
// Lists a directory of candidate background images and picks one at random

use crate::composer::{self, OUTPUT_SUFFIX};
use log::{debug, error, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};

/// Collect the usable images in `dir`, sorted by path.
///
/// An entry is kept when it is a regular file with a png/jpg/jpeg extension,
/// is not an image previously generated for `terminal`, and decodes cleanly.
/// A path that cannot be listed as a directory yields an empty list.
pub fn scan(dir: &Path, terminal: &str) -> Vec<PathBuf> {
    if !dir.is_dir() {
        error!("'{}' is not a valid directory", dir.display());
        return Vec::new();
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to list '{}': {e}", dir.display());
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .collect();
    paths.sort();

    let reserved = format!("{terminal}{OUTPUT_SUFFIX}");
    paths
        .into_iter()
        .filter(|path| path.is_file() && has_image_extension(path))
        .filter(|path| {
            let generated = path.to_string_lossy().contains(&reserved);
            if generated {
                debug!("Ignoring generated image {}", path.display());
            }
            !generated
        })
        .filter(|path| verify(path))
        .collect()
}

/// Pick one image uniformly at random
pub fn choose<'a, R: Rng + ?Sized>(images: &'a [PathBuf], rng: &mut R) -> Option<&'a PathBuf> {
    images.choose(rng)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(composer::format_from_extension)
        .is_some()
}

fn verify(path: &Path) -> bool {
    let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
    let result = fs::read(path)
        .map_err(|e| e.to_string())
        .and_then(|data| composer::load_from_bytes(&data).map_err(|e| e.to_string()));
    match result {
        Ok(_) => true,
        Err(e) => {
            warn!("Skipping invalid image: {name} ({e})");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn write_png(path: &Path) {
        RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]))
            .save_with_format(path, image::ImageFormat::Png)
            .unwrap();
    }

    fn write_jpeg(path: &Path) {
        RgbImage::from_pixel(2, 2, Rgb([9, 8, 7]))
            .save_with_format(path, image::ImageFormat::Jpeg)
            .unwrap();
    }

    #[test]
    fn test_scan_filters_extensions_and_sorts() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("b.png"));
        write_jpeg(&dir.path().join("a.JPG"));
        write_jpeg(&dir.path().join("c.jpeg"));
        write_png(&dir.path().join("d.gif"));
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let found = scan(dir.path(), "qterminal");
        assert_eq!(
            found,
            vec![
                dir.path().join("a.JPG"),
                dir.path().join("b.png"),
                dir.path().join("c.jpeg"),
            ]
        );
    }

    #[test]
    fn test_scan_excludes_generated_output() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("sunset.png"));
        write_png(&dir.path().join("qterminal_bgimage.png"));

        assert_eq!(
            scan(dir.path(), "qterminal"),
            vec![dir.path().join("sunset.png")]
        );
        // Another terminal's reserved name does not apply
        assert_eq!(scan(dir.path(), "gnome").len(), 2);
    }

    #[test]
    fn test_scan_skips_undecodable_files() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("good.png"));
        fs::write(dir.path().join("bad.png"), b"\x89PNG truncated").unwrap();
        fs::write(dir.path().join("empty.jpg"), b"").unwrap();

        assert_eq!(
            scan(dir.path(), "qterminal"),
            vec![dir.path().join("good.png")]
        );
    }

    #[test]
    fn test_scan_invalid_directory_is_empty() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("single.png");
        write_png(&file);

        assert!(scan(&dir.path().join("missing"), "qterminal").is_empty());
        assert!(scan(&file, "qterminal").is_empty());
    }

    #[test]
    fn test_choose() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(choose(&[], &mut rng).is_none());

        let images = vec![PathBuf::from("/a.png"), PathBuf::from("/b.png")];
        for _ in 0..16 {
            let picked = choose(&images, &mut rng).unwrap();
            assert!(images.contains(picked));
        }
    }
}
