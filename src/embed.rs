//! Embedded third-party demo
//!
//! The demo is an opaque module: we check its assets are present, hand it a
//! mount point, and forward resizes. [`init`] returns a [`DemoHandle`] that
//! owns the running demo; dropping the handle tears it down.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmbedError {
    #[error("Missing demo asset: {0}")]
    MissingAsset(String),

    #[error("Demo runtime refused: {0}")]
    Runtime(String),

    #[error("Demo already torn down")]
    TornDown,
}

/// The demo's own entry points
pub trait DemoRuntime {
    /// Attach to `mount`; media is looked up under `media_base`
    fn configure(&mut self, mount: &str, media_base: &str) -> Result<(), EmbedError>;

    fn resize(&mut self);

    fn teardown(&mut self);
}

/// Answers whether an asset path can be loaded
pub trait AssetSource {
    fn exists(&self, path: &str) -> bool;
}

impl<F: Fn(&str) -> bool> AssetSource for F {
    fn exists(&self, path: &str) -> bool {
        self(path)
    }
}

/// Assets on the local filesystem
#[derive(Debug, Clone)]
pub struct DirAssets {
    pub root: PathBuf,
}

impl AssetSource for DirAssets {
    fn exists(&self, path: &str) -> bool {
        self.root.join(path).is_file()
    }
}

/// What the demo needs loaded, in load order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedManifest {
    pub base_path: String,
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
}

impl EmbedManifest {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            stylesheets: vec!["css/style.css".to_string()],
            // Library scripts before the demo itself
            scripts: vec![
                "js/contrib/pixi.min.js".to_string(),
                "js/contrib/sound.js".to_string(),
                "js/demoquest.js".to_string(),
            ],
        }
    }

    /// Every asset path, stylesheets first
    pub fn assets(&self) -> impl Iterator<Item = String> + '_ {
        let base = self.base_path.trim_end_matches('/');
        self.stylesheets
            .iter()
            .chain(&self.scripts)
            .map(move |rel| if base.is_empty() { rel.clone() } else { format!("{base}/{rel}") })
    }
}

/// A running demo. Resize through it; drop or [`DemoHandle::teardown`] it
/// to stop.
#[derive(Debug)]
pub struct DemoHandle<R: DemoRuntime> {
    runtime: Option<R>,
    mount: String,
}

impl<R: DemoRuntime> DemoHandle<R> {
    pub fn resize(&mut self) -> Result<(), EmbedError> {
        let runtime = self.runtime.as_mut().ok_or(EmbedError::TornDown)?;
        runtime.resize();
        Ok(())
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    pub fn is_active(&self) -> bool {
        self.runtime.is_some()
    }

    pub fn teardown(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(mut runtime) = self.runtime.take() {
            runtime.teardown();
            log::info!("Demo at {} torn down", self.mount);
        }
    }
}

impl<R: DemoRuntime> Drop for DemoHandle<R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Check assets, configure the runtime on `mount` and size it once.
///
/// A missing asset or a refused configure fails this screen only.
pub fn init<R, A>(
    mut runtime: R,
    manifest: &EmbedManifest,
    assets: &A,
    mount: &str,
) -> Result<DemoHandle<R>, EmbedError>
where
    R: DemoRuntime,
    A: AssetSource + ?Sized,
{
    for path in manifest.assets() {
        if !assets.exists(&path) {
            log::error!("Failed to load demo resource: {path}");
            return Err(EmbedError::MissingAsset(path));
        }
        log::debug!("Demo resource ready: {path}");
    }

    if let Err(e) = runtime.configure(mount, &manifest.base_path) {
        log::error!("Failed to configure demo: {e}");
        return Err(e);
    }
    runtime.resize();
    log::info!("Demo mounted at {mount}");

    Ok(DemoHandle {
        runtime: Some(runtime),
        mount: mount.to_string(),
    })
}
