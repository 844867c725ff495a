//! Image source: which files in the images directory need annotating.
//!
//! Files are recognised by sniffing their contents, not their extension, and
//! only the configured formats are kept. Identifiers are paths relative to the
//! images directory, `/`-separated, which is what the record store keys on.

use std::{
    collections::HashSet,
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use ignore::WalkBuilder;
use image::{DynamicImage, ImageFormat, ImageReader};

/// Errors that can occur while reading the images directory.
#[derive(Debug, thiserror::Error)]
pub enum ImageSourceError {
    #[error("images directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to walk images directory: {0}")]
    Walk(#[from] ignore::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to decode {id}: {source}")]
    Decode {
        id: String,
        source: image::ImageError,
    },
}

pub type Result<T> = core::result::Result<T, ImageSourceError>;

pub struct ImageSource {
    root: PathBuf,
    formats: Vec<ImageFormat>,
    recursive: bool,
}

impl ImageSource {
    /// Opens an image source over `root`, which must be an existing directory.
    pub fn open(
        root: impl Into<PathBuf>,
        formats: Vec<ImageFormat>,
        recursive: bool,
    ) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ImageSourceError::NotFound(root));
        }
        Ok(Self {
            root,
            formats,
            recursive,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All images in the directory, sorted by path.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .hidden(true)
            .sort_by_file_name(Ord::cmp);
        if !self.recursive {
            builder.max_depth(Some(1));
        }

        let mut ids = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            match sniff(path) {
                Some(format) if self.formats.contains(&format) => match self.id_for(path) {
                    Some(id) => ids.push(id),
                    None => {
                        tracing::warn!(path = %path.display(), "skipping image with non-UTF-8 path");
                    }
                },
                Some(format) => {
                    tracing::trace!(path = %path.display(), ?format, "format not selected");
                }
                None => tracing::trace!(path = %path.display(), "not an image"),
            }
        }
        Ok(ids)
    }

    pub fn path_of(&self, id: &str) -> PathBuf {
        id.split('/').fold(self.root.clone(), |p, part| p.join(part))
    }

    /// Decode an image's pixels.
    pub fn decode(&self, id: &str) -> Result<DynamicImage> {
        content_reader(&self.path_of(id))?
            .decode()
            .map_err(|source| ImageSourceError::Decode {
                id: id.to_string(),
                source,
            })
    }

    /// `None` when a component is not UTF-8; such an id could never be resolved back.
    fn id_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let parts = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?;
        Some(parts.join("/"))
    }
}

/// Images not yet in `processed`, in listing order.
pub fn remaining(all: &[String], processed: &HashSet<String>) -> Vec<String> {
    all.iter()
        .filter(|id| !processed.contains(*id))
        .cloned()
        .collect()
}

/// A reader whose format comes from the file's magic bytes only.
///
/// `ImageReader::open` would seed the format from the extension, which a
/// mislabelled file could then keep.
fn content_reader(path: &Path) -> io::Result<ImageReader<BufReader<File>>> {
    let file = File::open(path)?;
    ImageReader::new(BufReader::new(file)).with_guessed_format()
}

fn sniff(path: &Path) -> Option<ImageFormat> {
    match content_reader(path) {
        Ok(reader) => reader.format(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable file");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use image::RgbImage;
    use tempfile::TempDir;

    fn write_png(path: &Path) {
        RgbImage::new(4, 3).save_with_format(path, ImageFormat::Png).unwrap();
    }

    fn setup_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_png(&root.join("b.png"));
        write_png(&root.join("a.png"));
        // Contents decide, not the extension.
        write_png(&root.join("disguised.dat"));
        fs::write(root.join("fake.png"), "not an image").unwrap();
        fs::write(root.join("notes.txt"), "hello").unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        write_png(&root.join("nested").join("c.png"));
        write_png(&root.join(".hidden.png"));
        dir
    }

    fn png_source(root: &Path, recursive: bool) -> ImageSource {
        ImageSource::open(root, vec![ImageFormat::Png], recursive).unwrap()
    }

    #[test]
    fn lists_images_by_content_sorted() {
        let dir = setup_dir();
        let ids = png_source(dir.path(), false).list().unwrap();
        assert_eq!(ids, ["a.png", "b.png", "disguised.dat"]);
    }

    #[test]
    fn recursive_walk_includes_subdirectories() {
        let dir = setup_dir();
        let ids = png_source(dir.path(), true).list().unwrap();
        assert_eq!(ids, ["a.png", "b.png", "disguised.dat", "nested/c.png"]);
    }

    #[test]
    fn unselected_formats_are_excluded() {
        let dir = setup_dir();
        let source = ImageSource::open(dir.path(), vec![ImageFormat::Jpeg], false).unwrap();
        assert!(source.list().unwrap().is_empty());
    }

    #[test]
    fn remaining_is_exact_set_difference() {
        let dir = setup_dir();
        let source = png_source(dir.path(), false);
        let all = source.list().unwrap();

        let processed: HashSet<String> = ["b.png".to_string(), "gone.png".to_string()].into();
        assert_eq!(remaining(&all, &processed), ["a.png", "disguised.dat"]);

        let everything: HashSet<String> = all.iter().cloned().collect();
        assert!(remaining(&all, &everything).is_empty());
    }

    #[test]
    fn decodes_pixels() {
        let dir = setup_dir();
        let source = png_source(dir.path(), true);
        let image = source.decode("nested/c.png").unwrap();
        assert_eq!((image.width(), image.height()), (4, 3));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_are_not_listed() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        write_png(&dir.path().join("a.png"));
        write_png(&dir.path().join(OsStr::from_bytes(b"b\xff.png")));

        let source = png_source(dir.path(), false);
        let ids = source.list().unwrap();
        assert_eq!(ids, ["a.png"]);
        for id in &ids {
            assert!(source.decode(id).is_ok());
        }
    }

    #[test]
    fn missing_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = ImageSource::open(dir.path().join("nope"), vec![ImageFormat::Png], false)
            .err()
            .unwrap();
        assert!(matches!(err, ImageSourceError::NotFound(_)));
    }
}
