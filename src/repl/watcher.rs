use crossbeam_channel::Sender;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};

/// Watches song files on notify's background thread and forwards events to a channel
pub struct FileWatcher {
    watcher: RecommendedWatcher,
    watched: Vec<PathBuf>,
}

impl FileWatcher {
    /// Create a new file watcher that sends events to the provided channel
    pub fn new(tx: Sender<notify::Result<Event>>) -> notify::Result<Self> {
        let watcher = notify::recommended_watcher(move |res| {
            // The receiver is gone once the session ends
            let _ = tx.send(res);
        })?;

        Ok(Self {
            watcher,
            watched: Vec::new(),
        })
    }

    /// Add a path to be watched
    pub fn watch<P: AsRef<Path>>(&mut self, path: P) -> notify::Result<()> {
        let path = path.as_ref();
        if self.is_watching(path) {
            return Ok(());
        }
        self.watcher.watch(path, RecursiveMode::NonRecursive)?;
        self.watched.push(path.to_path_buf());
        tracing::debug!(path = %path.display(), "watching");
        Ok(())
    }

    /// Remove a path from being watched
    pub fn unwatch<P: AsRef<Path>>(&mut self, path: P) -> notify::Result<()> {
        let path = path.as_ref();
        self.watcher.unwatch(path)?;
        self.watched.retain(|p| p != path);
        Ok(())
    }

    /// Watch `path` and stop watching everything else
    pub fn follow<P: AsRef<Path>>(&mut self, path: P) -> notify::Result<()> {
        let path = path.as_ref();
        self.watch(path)?;
        let others: Vec<PathBuf> = self
            .watched
            .iter()
            .filter(|p| p.as_path() != path)
            .cloned()
            .collect();
        for other in others {
            self.unwatch(&other)?;
            tracing::debug!(path = %other.display(), "stopped watching");
        }
        Ok(())
    }

    pub fn is_watching(&self, path: &Path) -> bool {
        self.watched.iter().any(|p| p == path)
    }
}

/// Whether an event means the file content may have changed
pub fn is_content_change(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Modify(_) | EventKind::Create(_))
}
