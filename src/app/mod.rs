//! Startup orchestration: configuration, indexing, cache and serving.

pub mod browser;
pub mod tasks;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::settings::{apply_target_path, load_config};
use crate::config::ResolvedConfig;
use crate::core::{Cache, CoreError, Document, DocumentScanner, DocumentStore, IndexFingerprint};
use crate::utils::paths::absolutize;
use crate::web::{self, AppContext};
use crate::VERSION;
use browser::BrowserLauncher;

/// Command-line choices that shape startup.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub config_file: Option<PathBuf>,
    /// A file or directory to browse instead of the configured directories.
    pub target_path: Option<PathBuf>,
    pub use_cache: bool,
}

/// Where the document index came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrigin {
    Cache,
    Scan,
}

pub struct App {
    config: ResolvedConfig,
    store: DocumentStore,
    working_dir: PathBuf,
    target_file: Option<PathBuf>,
    origin: IndexOrigin,
}

impl App {
    /// Loads the configuration and builds the document index, from the
    /// cache when it is usable and by scanning otherwise.
    pub fn initialize(working_dir: &Path, options: &LaunchOptions) -> Result<Self> {
        let mut config = load_config(options.config_file.as_deref(), working_dir)?;

        let target_file = match &options.target_path {
            Some(target) => apply_target_path(&mut config, target, working_dir)?,
            None => None,
        };

        let config = ResolvedConfig::compile(&config).context("Invalid configuration")?;
        let cache = Cache::in_dir(working_dir);

        let fingerprint = config.fingerprint(working_dir);

        let cached = if options.use_cache {
            Self::read_cache(&cache, &fingerprint)
        } else {
            None
        };

        let (documents, origin) = match cached {
            Some(documents) => {
                tracing::info!("Loaded {} documents from cache", documents.len());
                (documents, IndexOrigin::Cache)
            }
            None => {
                let documents = Self::scan_directories(&config, working_dir)?;
                tracing::info!("Found {} documents", documents.len());
                if options.use_cache {
                    match cache.save(&documents, VERSION, &fingerprint) {
                        Ok(()) => tracing::info!("Saved cache to {:?}", cache.path()),
                        Err(e) => tracing::warn!("Failed to save cache: {}", e),
                    }
                }
                (documents, IndexOrigin::Scan)
            }
        };

        Ok(Self {
            config,
            store: DocumentStore::new(documents),
            working_dir: working_dir.to_path_buf(),
            target_file,
            origin,
        })
    }

    /// Returns cached documents only if the cache was written by this
    /// version with the same directories, names and patterns.
    fn read_cache(cache: &Cache, fingerprint: &IndexFingerprint) -> Option<Vec<Document>> {
        let data = match cache.read() {
            Ok(data) => data,
            Err(CoreError::Io(e, _)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No cache file at {:?}", cache.path());
                return None;
            }
            Err(e) => {
                tracing::info!("Ignoring unreadable cache: {}", e);
                return None;
            }
        };

        if data.version != VERSION {
            tracing::info!(
                "Cache version {} does not match {}, rescanning",
                data.version,
                VERSION
            );
            return None;
        }

        if data.fingerprint != *fingerprint {
            tracing::info!("Configuration changed since the cache was written, rescanning");
            return None;
        }

        Some(data.into_documents())
    }

    /// Scans every configured directory in order and concatenates the
    /// results. A directory that cannot be walked at all aborts the scan.
    pub fn scan_directories(config: &ResolvedConfig, working_dir: &Path) -> Result<Vec<Document>> {
        let scanner = DocumentScanner::new(working_dir);
        let mut documents = Vec::new();

        for source in &config.sources {
            tracing::info!("Scanning {:?} ({})", source.path, source.name);
            let found = scanner
                .scan(&source.path, &source.name, &source.file_pattern, &config.ignore)
                .with_context(|| format!("Failed to scan directory {}", source.path.display()))?;
            tracing::debug!("{} documents in {:?}", found.len(), source.path);
            documents.extend(found);
        }

        Ok(documents)
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    pub fn port(&self) -> u16 {
        self.config.port
    }

    pub fn origin(&self) -> IndexOrigin {
        self.origin
    }

    pub fn target_file(&self) -> Option<&Path> {
        self.target_file.as_deref()
    }

    pub fn context(&self) -> AppContext {
        AppContext::new(self.store.clone(), self.config.title.clone())
    }

    /// The path, below the server root, that the browser is opened on.
    ///
    /// A target file that was not indexed falls back to the index page.
    pub fn start_path(&self) -> String {
        let Some(target) = &self.target_file else {
            return "/".to_string();
        };

        let found = self
            .store
            .documents()
            .iter()
            .find(|doc| absolutize(&self.working_dir, &doc.path) == *target);

        match found {
            Some(doc) => web::render::doc_url(&doc.rel_path),
            None => {
                tracing::warn!(
                    "{} is not an indexed document, opening the index instead",
                    target.display()
                );
                "/".to_string()
            }
        }
    }

    /// The startup message printed once the port is bound.
    pub fn banner(&self, port: u16) -> String {
        let mut text = format!(
            "\nDimanDocs Server Started\n\
             ========================\n\
             Found {} documents\n\
             Server running at: http://localhost:{}\n",
            self.store.len(),
            port
        );
        if let Some(target) = &self.target_file {
            text.push_str(&format!("Opening file: {}\n", target.display()));
        }
        text.push_str("\nPress Ctrl+C to stop the server\n\n");
        text
    }

    /// Binds a port, starts background loading and serves until the process
    /// is stopped. Unless `serve_mode` is set the browser is opened first.
    pub async fn run(self, serve_mode: bool, launcher: &dyn BrowserLauncher) -> Result<()> {
        let (listener, port) = tasks::bind_available_port(self.config.port)
            .await
            .context("Failed to start server")?;

        let _loader = tasks::start_content_loading(&self.store);

        let url = format!("http://localhost:{port}{}", self.start_path());

        print!("{}", self.banner(port));

        if !serve_mode {
            browser::launch(launcher, &url);
        }

        axum::serve(listener, web::router(self.context()))
            .await
            .context("Server error")?;
        Ok(())
    }
}
