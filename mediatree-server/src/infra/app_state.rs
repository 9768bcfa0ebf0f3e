use std::{fmt, sync::Arc};

use tracing::info;

use mediatree_config::Config;
use mediatree_core::{
    CollectionsStore, DirectoryCatalog, MediaClassifier, MediaRoot, Result,
    TreeSearch,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub root: MediaRoot,
    pub classifier: Arc<MediaClassifier>,
    pub catalog: DirectoryCatalog,
    pub search: Arc<TreeSearch>,
    pub collections: Arc<CollectionsStore>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires the domain services from validated configuration.
    pub fn from_config(config: Arc<Config>) -> Result<Self> {
        let root = MediaRoot::new(&config.media.root)?;
        let classifier = Arc::new(MediaClassifier::new(
            config.media.video_extensions.iter().cloned(),
            config.media.mime_types.clone(),
            config.media.hidden_names.iter().cloned(),
        ));

        let catalog = DirectoryCatalog::new(root.clone(), classifier.clone());
        let search = Arc::new(
            TreeSearch::new(root.clone(), classifier.clone())
                .with_max_term_length(config.search.max_term_length),
        );
        let collections = Arc::new(CollectionsStore::open(
            &config.storage.data_dir,
            root.clone(),
            classifier.clone(),
        )?);

        info!(
            media.root = %root.path().display(),
            storage.data_dir = %config.storage.data_dir.display(),
            video_extensions = config.media.video_extensions.len(),
            "application state ready"
        );

        Ok(Self {
            config,
            root,
            classifier,
            catalog,
            search,
            collections,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
