//! Declaration directory crawling.

use futures::future::BoxFuture;
use tracing::{debug, trace};

use typefeed_tspath::{is_declaration_file, join_normalized, to_project_path};
use typefeed_vfs::Filesystem;

use crate::engine::TypeEngine;
use crate::outcome::{CrawlStats, SkipReason};
use crate::session::Session;

impl<F: Filesystem, E: TypeEngine> Session<F, E> {
    /// Register the declaration files under `dir`, descending at most
    /// `max_depth` levels below it.
    ///
    /// Hidden entries, denylisted directories and oversized files are
    /// skipped. A failed listing or read only loses that one entry.
    pub async fn crawl(&mut self, dir: &str, max_depth: usize) -> CrawlStats {
        let mut stats = CrawlStats::default();
        self.crawl_at(to_project_path(dir), max_depth, 0, &mut stats)
            .await;
        stats
    }

    fn crawl_at<'a>(
        &'a mut self,
        dir: String,
        max_depth: usize,
        current: usize,
        stats: &'a mut CrawlStats,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let entries = match self.fs.read_dir(&dir).await {
                Ok(entries) => entries,
                Err(err) => {
                    debug!(dir = %dir, error = %err, "listing failed");
                    stats.failed += 1;
                    return;
                }
            };

            for entry in entries {
                let path = join_normalized(&dir, &entry.name);
                if entry.name.starts_with('.') {
                    stats.skipped.push((path, SkipReason::Hidden));
                    continue;
                }

                if entry.is_directory {
                    if self.config.is_denylisted(&entry.name) {
                        stats.skipped.push((path, SkipReason::Denylisted));
                    } else if current + 1 > max_depth {
                        stats.skipped.push((path, SkipReason::DepthExceeded));
                    } else {
                        self.crawl_at(path, max_depth, current + 1, stats).await;
                    }
                    continue;
                }

                if !is_declaration_file(&entry.name) {
                    continue;
                }
                match self.fs.read_file(&path).await {
                    Ok(content) if content.len() >= self.config.max_declaration_size => {
                        trace!(path = %path, size = content.len(), "declaration too large");
                        stats.skipped.push((
                            path,
                            SkipReason::TooLarge {
                                size: content.len(),
                            },
                        ));
                    }
                    Ok(content) => {
                        if self.register(&path, &content) {
                            stats.registered += 1;
                        }
                    }
                    Err(err) => {
                        debug!(path = %path, error = %err, "declaration read failed");
                        stats.failed += 1;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderConfig;
    use crate::engine::RecordingEngine;
    use std::sync::Arc;
    use typefeed_vfs::MemoryFs;

    #[tokio::test]
    async fn test_crawl_filters_and_skips() {
        let fs = MemoryFs::with_files([
            ("pkg/index.d.ts", ""),
            ("pkg/index.js", ""),
            ("pkg/.hidden.d.ts", ""),
            ("pkg/docs/api.d.ts", ""),
            ("pkg/lib/util.d.mts", ""),
            ("pkg/lib/deep/more.d.ts", ""),
        ]);
        let mut session = Session::new(Arc::new(fs), RecordingEngine::new());
        let stats = session.crawl("pkg", 1).await;

        assert_eq!(stats.registered, 2);
        assert_eq!(stats.failed, 0);
        assert!(session.corpus().contains("pkg/index.d.ts"));
        assert!(session.corpus().contains("pkg/lib/util.d.mts"));
        assert!(stats
            .skipped
            .contains(&("pkg/.hidden.d.ts".to_string(), SkipReason::Hidden)));
        assert!(stats
            .skipped
            .contains(&("pkg/docs".to_string(), SkipReason::Denylisted)));
        assert!(stats
            .skipped
            .contains(&("pkg/lib/deep".to_string(), SkipReason::DepthExceeded)));
    }

    #[tokio::test]
    async fn test_size_threshold_is_exclusive() {
        let fs = MemoryFs::with_files([("t/at.d.ts", "x".repeat(8)), ("t/below.d.ts", "x".repeat(7))]);
        let config = LoaderConfig {
            max_declaration_size: 8,
            ..LoaderConfig::default()
        };
        let mut session =
            Session::new(Arc::new(fs), RecordingEngine::new()).with_loader_config(config);
        let stats = session.crawl("t", 0).await;

        assert_eq!(stats.registered, 1);
        assert!(session.corpus().contains("t/below.d.ts"));
        assert_eq!(
            stats.skipped,
            vec![("t/at.d.ts".to_string(), SkipReason::TooLarge { size: 8 })]
        );
    }

    #[tokio::test]
    async fn test_failures_do_not_abort() {
        let fs = MemoryFs::with_files([
            ("p/a.d.ts", ""),
            ("p/b.d.ts", ""),
            ("p/sub/c.d.ts", ""),
        ]);
        fs.fail_on("p/a.d.ts");
        fs.fail_on("p/sub");
        let mut session = Session::new(Arc::new(fs), RecordingEngine::new());
        let stats = session.crawl("p", 2).await;

        assert_eq!(stats.failed, 2);
        assert_eq!(stats.registered, 1);
        assert!(session.corpus().contains("p/b.d.ts"));
    }
}
