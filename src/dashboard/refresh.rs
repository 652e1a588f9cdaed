use chrono::Local;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// A persisted "dashboard is stale" marker shared by every process of one
/// session. Writers set it after mutating server state; the dashboard consumes
/// it once on its next load.
#[derive(Debug, Clone)]
pub struct RefreshSignal {
    path: PathBuf,
}

impl RefreshSignal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// One marker per user session in the system temp directory.
    pub fn for_session(session: &str) -> Self {
        let mut path = std::env::temp_dir();
        path.push(format!("job_dashboard_{session}.refresh"));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn signal_refresh_needed(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, Local::now().to_rfc3339()).await?;
        debug!(path = %self.path.display(), "refresh signal raised");
        Ok(())
    }

    /// Reads and clears the marker. Removing the file is the read, so of any
    /// number of concurrent consumers exactly one sees `true` per write.
    pub async fn consume_if_set(&self) -> io::Result<bool> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "refresh signal consumed");
                Ok(true)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(name: &str) -> RefreshSignal {
        RefreshSignal::for_session(&format!("test_{name}_{}", std::process::id()))
    }

    #[tokio::test]
    async fn unset_signal_reads_false() {
        let signal = signal("unset");
        assert!(!signal.consume_if_set().await.unwrap());
    }

    #[tokio::test]
    async fn one_write_is_consumed_exactly_once() {
        let signal = signal("once");
        signal.signal_refresh_needed().await.unwrap();
        assert!(signal.consume_if_set().await.unwrap());
        assert!(!signal.consume_if_set().await.unwrap());
    }

    #[tokio::test]
    async fn repeated_writes_collapse_into_one() {
        let signal = signal("collapse");
        signal.signal_refresh_needed().await.unwrap();
        signal.signal_refresh_needed().await.unwrap();
        assert!(signal.consume_if_set().await.unwrap());
        assert!(!signal.consume_if_set().await.unwrap());
    }

    #[tokio::test]
    async fn separate_handles_share_the_marker() {
        let writer = signal("shared");
        let reader = RefreshSignal::new(writer.path());
        writer.signal_refresh_needed().await.unwrap();
        assert!(reader.consume_if_set().await.unwrap());
        assert!(!writer.consume_if_set().await.unwrap());
    }
}
