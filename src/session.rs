//! An annotation session: every remaining image, one interview each.

use std::io::{self, BufRead, Write};

use jiff::Timestamp;

use crate::config::Config;
use crate::console::Console;
use crate::images::{self, ImageSource, ImageSourceError};
use crate::interview::Interview;
use crate::model::Schema;
use crate::storage::{RecordStore, StorageError};
use crate::viewer::Viewer;

/// Errors that end a session early.
///
/// Records appended before the error are already on disk.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Images(#[from] ImageSourceError),

    #[error("failed to save record: {0}")]
    Storage(#[from] StorageError),

    #[error("console error: {0}")]
    Console(#[from] io::Error),
}

/// What a session got through.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub annotated: usize,
    pub skipped: usize,
}

pub struct Session<'a> {
    schema: &'a Schema,
    config: &'a Config,
    images: ImageSource,
    store: RecordStore,
    viewer: Viewer,
}

impl<'a> Session<'a> {
    pub fn new(
        schema: &'a Schema,
        config: &'a Config,
        images: ImageSource,
        store: RecordStore,
        viewer: Viewer,
    ) -> Self {
        Self {
            schema,
            config,
            images,
            store,
            viewer,
        }
    }

    /// Print the banner and the `remaining/total` count.
    ///
    /// Returns the images still to annotate.
    pub fn prepare<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<Vec<String>, SessionError> {
        console.line(" - Image Labelling Tool - ")?;
        console.line(&format!("Source Directory: {}", self.images.root().display()))?;

        let all = self.images.list()?;
        let processed = self.store.processed(&self.config.image_column);
        let remaining = images::remaining(&all, &processed);

        console.line(&format!("{}/{}", remaining.len(), all.len()))?;
        tracing::info!(
            total = all.len(),
            remaining = remaining.len(),
            existing = self.store.records().len(),
            records = %self.store.path().display(),
            "session prepared"
        );

        Ok(remaining)
    }

    /// Interview `operator` about each image in `remaining`, saving as it goes.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
        operator: &str,
        remaining: &[String],
    ) -> Result<Summary, SessionError> {
        let columns = self.config.columns();
        let interview = Interview::new(self.schema, &columns);
        let mut summary = Summary {
            total: remaining.len(),
            ..Summary::default()
        };

        for (i, id) in remaining.iter().enumerate() {
            console.line(&format!("[{}/{}] {id}", i + 1, remaining.len()))?;

            let image = match self.images.decode(id) {
                Ok(image) => image,
                Err(e) => {
                    tracing::warn!(image = %id, error = %e, "skipping unreadable image");
                    console.line(&format!("Skipping {id}: {e}"))?;
                    summary.skipped += 1;
                    continue;
                }
            };
            tracing::debug!(image = %id, width = image.width(), height = image.height(), "decoded");

            if let Err(e) = self.viewer.show(&self.images.path_of(id)) {
                tracing::warn!(image = %id, error = %e, "could not display image");
            }

            let mut record = interview.run(console, operator, id)?;
            if let Some(column) = &self.config.timestamp_column {
                record.insert(column, Timestamp::now().to_string());
            }

            self.store.append(record)?;
            summary.annotated += 1;
            tracing::info!(image = %id, "record saved");
        }

        self.viewer.close();
        Ok(summary)
    }
}
