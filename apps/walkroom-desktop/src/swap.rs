use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use walkroom_assets::{AssetError, MediaKind, TextureAsset};
use walkroom_scene::MediaTarget;

/// A finished decode, ready to be applied between frames.
#[derive(Debug)]
pub struct DecodedMedia {
    pub target: MediaTarget,
    pub path: PathBuf,
    pub result: Result<TextureAsset, AssetError>,
}

/// Decodes picked media files off the frame loop.
///
/// Each request runs on its own short-lived thread and reports back over a
/// channel that the frame loop drains without blocking.
pub struct MediaSwapper {
    tx: Sender<DecodedMedia>,
    rx: Receiver<DecodedMedia>,
    pending: usize,
}

impl MediaSwapper {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx, pending: 0 }
    }

    /// Number of decodes started but not yet collected.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn request(&mut self, target: MediaTarget, path: PathBuf) {
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name("media-decode".into())
            .spawn({
                let path = path.clone();
                move || {
                    let result = target.kind.decode(&path);
                    // The receiver only goes away on shutdown.
                    let _ = tx.send(DecodedMedia {
                        target,
                        path,
                        result,
                    });
                }
            });
        match spawned {
            Ok(_) => {
                self.pending += 1;
                tracing::debug!("decoding {} for {}", path.display(), target.object);
            }
            Err(e) => tracing::error!("failed to start decode thread: {e}"),
        }
    }

    /// Collect every decode that has finished since the last poll.
    pub fn poll(&mut self) -> Vec<DecodedMedia> {
        let done: Vec<_> = self.rx.try_iter().collect();
        self.pending = self.pending.saturating_sub(done.len());
        done
    }
}

impl Default for MediaSwapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Ask the user for a replacement file. `None` when the dialog is cancelled.
pub fn choose_file(kind: MediaKind, start_dir: &Path) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(format!("Choose {kind}"))
        .set_directory(start_dir)
        .add_filter(kind.filter_name(), kind.accept_extensions())
        .pick_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::time::{Duration, Instant};
    use walkroom_common::ObjectId;

    fn wait_for(swapper: &mut MediaSwapper) -> Vec<DecodedMedia> {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            let done = swapper.poll();
            if !done.is_empty() || Instant::now() > deadline {
                return done;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn decodes_off_thread_and_reports_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poster.png");
        RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let mut swapper = MediaSwapper::new();
        let target = MediaTarget {
            object: ObjectId(5),
            kind: MediaKind::Image,
        };
        swapper.request(target, path.clone());
        assert_eq!(swapper.pending(), 1);

        let done = wait_for(&mut swapper);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].target, target);
        assert_eq!(done[0].path, path);
        assert_eq!(done[0].result.as_ref().unwrap().dimensions(), (4, 4));
        assert_eq!(swapper.pending(), 0);
    }

    #[test]
    fn decode_failure_is_reported_not_panicked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.gif");
        std::fs::write(&path, b"not a gif").unwrap();

        let mut swapper = MediaSwapper::new();
        swapper.request(
            MediaTarget {
                object: ObjectId(6),
                kind: MediaKind::Video,
            },
            path,
        );
        let done = wait_for(&mut swapper);
        assert_eq!(done.len(), 1);
        assert!(done[0].result.is_err());
    }

    #[test]
    fn poll_without_requests_is_empty() {
        let mut swapper = MediaSwapper::new();
        assert!(swapper.poll().is_empty());
        assert_eq!(swapper.pending(), 0);
    }
}
