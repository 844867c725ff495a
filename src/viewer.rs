//! Image display through an external viewer.
//!
//! The configured command (e.g. `feh --auto-zoom`) is spawned with the image
//! path appended. One viewer runs at a time: showing the next image closes
//! the previous window.

use std::{
    path::Path,
    process::{Child, Command, Stdio},
};

pub struct Viewer {
    command: Option<Vec<String>>,
    child: Option<Child>,
}

impl Viewer {
    /// A viewer running `command`, or a no-op viewer when `None` or empty.
    pub fn new(command: Option<Vec<String>>) -> Self {
        Self {
            command: command.filter(|argv| !argv.is_empty()),
            child: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.command.is_some()
    }

    /// Show `path`, replacing whatever is currently displayed.
    pub fn show(&mut self, path: &Path) -> Result<(), String> {
        self.close();

        let Some(argv) = &self.command else {
            tracing::debug!(path = %path.display(), "no viewer configured");
            return Ok(());
        };

        let child = Command::new(&argv[0])
            .args(&argv[1..])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| format!("failed to run viewer '{}': {e}", argv[0]))?;

        tracing::debug!(pid = child.id(), path = %path.display(), "viewer started");
        self.child = Some(child);
        Ok(())
    }

    /// Close the current viewer window, if any.
    pub fn close(&mut self) {
        if let Some(mut child) = self.child.take() {
            // The viewer may already have been closed by the operator.
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_command_disables_viewer() {
        assert!(!Viewer::new(None).is_enabled());
        assert!(!Viewer::new(Some(vec![])).is_enabled());
        assert!(Viewer::new(Some(vec!["feh".into()])).is_enabled());
    }

    #[test]
    fn disabled_viewer_shows_nothing() {
        let mut viewer = Viewer::new(None);
        viewer.show(Path::new("a.png")).unwrap();
        assert!(viewer.child.is_none());
    }

    #[test]
    fn missing_program_is_an_error() {
        let mut viewer = Viewer::new(Some(vec!["definitely-not-a-viewer-binary".into()]));
        let err = viewer.show(Path::new("a.png")).unwrap_err();
        assert!(err.contains("definitely-not-a-viewer-binary"));
    }

    #[cfg(unix)]
    #[test]
    fn next_image_replaces_running_viewer() {
        let mut viewer = Viewer::new(Some(vec!["sleep".into(), "30".into()]));
        // `sleep 30 <path>` stands in for a long-running viewer window.
        viewer.show(Path::new("1")).unwrap();
        let first = viewer.child.as_ref().unwrap().id();
        viewer.show(Path::new("2")).unwrap();
        let second = viewer.child.as_ref().unwrap().id();
        assert_ne!(first, second);
        viewer.close();
        assert!(viewer.child.is_none());
    }
}
