use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::LoadError;

use super::loader::load_records;
use super::model::{DataStatus, MacroDataset, NormalizedRecord};

// ---------------------------------------------------------------------------
// Where records come from
// ---------------------------------------------------------------------------

/// A source of normalized records. The production source reads a file;
/// tests substitute in-memory fixtures.
pub trait DatasetSource: Send + Sync {
    /// Human-readable name for logs and the status bar.
    fn describe(&self) -> String;

    fn load(&self) -> Result<Vec<NormalizedRecord>, LoadError>;
}

/// Reads the indicator table from a file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }
}

impl DatasetSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<NormalizedRecord>, LoadError> {
        load_records(&self.path)
    }
}

// ---------------------------------------------------------------------------
// Load-once cache
// ---------------------------------------------------------------------------

/// Holds the classified dataset for the lifetime of the process.
///
/// The source is read and classified on the first call to
/// [`DatasetCache::dataset`]; every later call returns the same value.
/// A failed load is cached too, as an empty dataset with its [`DataStatus`].
pub struct DatasetCache {
    source: Box<dyn DatasetSource>,
    dataset: OnceCell<Arc<MacroDataset>>,
}

impl DatasetCache {
    pub fn new(source: impl DatasetSource + 'static) -> Self {
        DatasetCache {
            source: Box::new(source),
            dataset: OnceCell::new(),
        }
    }

    pub fn source_name(&self) -> String {
        self.source.describe()
    }

    /// The classified dataset, loading it on first access.
    pub fn dataset(&self) -> Arc<MacroDataset> {
        self.dataset
            .get_or_init(|| Arc::new(build_dataset(self.source.as_ref())))
            .clone()
    }

    /// Forget the cached dataset; the next access reads the source again.
    pub fn invalidate(&mut self) {
        self.dataset.take();
    }
}

fn build_dataset(source: &dyn DatasetSource) -> MacroDataset {
    match source.load() {
        Ok(records) => {
            let dataset = MacroDataset::from_records(records);
            if dataset.is_empty() {
                log::warn!("{} contains no complete rows", source.describe());
            }
            log::info!(
                "Dataset ready: {} records, {} countries, {} years",
                dataset.len(),
                dataset.countries.len(),
                dataset.years.len()
            );
            dataset
        }
        Err(LoadError::SourceMissing { path }) => {
            log::warn!("Data file '{}' not found, continuing with no data", path.display());
            MacroDataset::empty(DataStatus::SourceMissing(path))
        }
        Err(e) => {
            log::error!("Failed to load {}: {e}", source.describe());
            MacroDataset::empty(DataStatus::Unreadable(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixture {
        records: Vec<NormalizedRecord>,
        loads: Arc<AtomicUsize>,
    }

    impl DatasetSource for Fixture {
        fn describe(&self) -> String {
            "fixture".to_string()
        }

        fn load(&self) -> Result<Vec<NormalizedRecord>, LoadError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.clone())
        }
    }

    fn fixture() -> (Fixture, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        let records = vec![NormalizedRecord {
            year: 2021,
            country: "Canada".into(),
            current_account_balance: 0.0,
            budget_balance: -4.4,
            gdp_per_capita: Some(52000.0),
        }];
        (
            Fixture {
                records,
                loads: loads.clone(),
            },
            loads,
        )
    }

    #[test]
    fn loads_once_and_reuses() {
        let (source, loads) = fixture();
        let cache = DatasetCache::new(source);
        assert_eq!(loads.load(Ordering::SeqCst), 0);

        let first = cache.dataset();
        let second = cache.dataset();
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn invalidate_reloads_equivalent_data() {
        let (source, loads) = fixture();
        let mut cache = DatasetCache::new(source);
        let before = cache.dataset();
        cache.invalidate();
        let after = cache.dataset();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
        assert_eq!(before.records, after.records);
        assert_eq!(before.income_index, after.income_index);
    }

    #[test]
    fn missing_file_yields_empty_dataset() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("donnees.xlsx");
        let cache = DatasetCache::new(FileSource::new(&path));
        let ds = cache.dataset();
        assert!(ds.is_empty());
        assert_eq!(ds.status, DataStatus::SourceMissing(path));
    }

    #[test]
    fn unreadable_file_yields_empty_dataset() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("macro.csv");
        std::fs::write(&path, "Pays,Année\nFrance,2020\n").unwrap();
        let ds = DatasetCache::new(FileSource::new(&path)).dataset();
        assert!(ds.is_empty());
        assert!(matches!(ds.status, DataStatus::Unreadable(_)));
    }
}
