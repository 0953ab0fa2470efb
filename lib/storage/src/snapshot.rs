// Corpus snapshots: bincode, gzip, written atomically
use anyhow::{anyhow, bail, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use chrono::{DateTime, Utc};
use codebuff_core::Corpus;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Bumped whenever the on-disk layout changes
pub const SNAPSHOT_VERSION: u32 = 1;

pub const SNAPSHOT_EXTENSION: &str = "corpus";

/// Snapshot description returned after a save or by a listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDescription {
    pub name: String,
    pub creation_time: Option<String>,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Trained corpus plus the metadata needed to trust it on reload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusSnapshot {
    pub version: u32,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub corpus: Corpus,
}

impl CorpusSnapshot {
    pub fn new(corpus: Corpus) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            language: corpus.language().to_string(),
            created_at: Utc::now(),
            corpus,
        }
    }
}

/// Write `corpus` to `path`, replacing any existing file atomically
pub fn save_corpus(path: &Path, corpus: &Corpus) -> Result<SnapshotDescription> {
    let snapshot = CorpusSnapshot::new(corpus.clone());
    let data = bincode::serialize(&snapshot).map_err(|e| anyhow!("Serialization error: {}", e))?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&data)?;
    let compressed = encoder.finish()?;

    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(&compressed))
        .map_err(|e| anyhow!("Failed to write snapshot {:?}: {}", path, e))?;

    info!(
        "Saved {} corpus ({} exemplars, {} bytes) to {:?}",
        snapshot.language,
        corpus.len(),
        compressed.len(),
        path
    );

    Ok(SnapshotDescription {
        name: file_name(path),
        creation_time: Some(format_time(&snapshot.created_at)),
        size: compressed.len() as u64,
        checksum: Some(format!("{:x}", Sha256::digest(&compressed))),
    })
}

/// Read a snapshot and re-validate its corpus
pub fn load_snapshot(path: &Path) -> Result<CorpusSnapshot> {
    let file = File::open(path).map_err(|e| anyhow!("Failed to open snapshot {:?}: {}", path, e))?;
    let mut decoder = GzDecoder::new(BufReader::new(file));
    let mut data = Vec::new();
    decoder.read_to_end(&mut data)?;

    let snapshot: CorpusSnapshot =
        bincode::deserialize(&data).map_err(|e| anyhow!("Deserialization error: {}", e))?;
    if snapshot.version != SNAPSHOT_VERSION {
        bail!(
            "Snapshot {:?} has version {}, expected {}",
            path,
            snapshot.version,
            SNAPSHOT_VERSION
        );
    }

    let corpus = snapshot.corpus;
    let corpus = Corpus::new(corpus.language(), corpus.schema().clone(), corpus.exemplars().to_vec())?;
    debug!("Loaded snapshot {:?}: {} exemplars", path, corpus.len());

    Ok(CorpusSnapshot { corpus, ..snapshot })
}

/// Load a corpus, refusing one trained for a different language
pub fn load_corpus(path: &Path, language: &str) -> Result<Corpus> {
    let snapshot = load_snapshot(path)?;
    if snapshot.language != language {
        bail!(
            "Snapshot {:?} holds a {} corpus, not {}",
            path,
            snapshot.language,
            language
        );
    }
    Ok(snapshot.corpus)
}

/// Describe an existing snapshot file
pub fn describe(path: &Path) -> Result<SnapshotDescription> {
    let metadata = fs::metadata(path)?;
    let file_data = fs::read(path)?;
    let checksum = format!("{:x}", Sha256::digest(&file_data));

    let creation_time = metadata
        .created()
        .or_else(|_| metadata.modified())
        .ok()
        .map(|t| format_time(&DateTime::<Utc>::from(t)));

    Ok(SnapshotDescription {
        name: file_name(path),
        creation_time,
        size: metadata.len(),
        checksum: Some(checksum),
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}

fn format_time(t: &DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Directory of corpus snapshots, named `<language>-<timestamp>.corpus`
pub struct CorpusStore {
    dir: PathBuf,
}

impl CorpusStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Generate snapshot filename with timestamp
    fn snapshot_name(language: &str) -> String {
        let now: DateTime<Utc> = Utc::now();
        format!(
            "{}-{}.{}",
            language,
            now.format("%Y-%m-%d-%H-%M-%S-%3f"),
            SNAPSHOT_EXTENSION
        )
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn save(&self, corpus: &Corpus) -> Result<SnapshotDescription> {
        let path = self.path_of(&Self::snapshot_name(corpus.language()));
        save_corpus(&path, corpus)
    }

    /// Snapshots in the store, newest first; optionally only one language
    pub fn list(&self, language: Option<&str>) -> Result<Vec<SnapshotDescription>> {
        let mut snapshots = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            let name = file_name(&path);
            if let Some(language) = language {
                if !name.starts_with(&format!("{}-", language)) {
                    continue;
                }
            }
            snapshots.push(describe(&path)?);
        }

        // Names embed the timestamp
        snapshots.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(snapshots)
    }

    /// Most recent snapshot for `language`
    pub fn load_latest(&self, language: &str) -> Result<Option<Corpus>> {
        match self.list(Some(language))?.first() {
            Some(latest) => load_corpus(&self.path_of(&latest.name), language).map(Some),
            None => Ok(None),
        }
    }

    pub fn load(&self, name: &str, language: &str) -> Result<Corpus> {
        let path = self.path_of(name);
        if !path.exists() {
            bail!("Snapshot '{}' not found in {:?}", name, self.dir);
        }
        load_corpus(&path, language)
    }

    pub fn delete(&self, name: &str) -> Result<bool> {
        let path = self.path_of(name);
        if path.exists() {
            fs::remove_file(&path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codebuff_core::{CorpusBuilder, FeatureMetaData, FeatureSchema, FeatureVector, Label};
    use tempfile::TempDir;

    fn create_test_corpus(language: &str) -> Corpus {
        let schema = FeatureSchema::new(vec![
            FeatureMetaData::token("prev", 2.0),
            FeatureMetaData::boolean("first", 0.5),
            FeatureMetaData::colwidth("width"),
        ])
        .with_colwidth_center(30.0);
        let mut builder = CorpusBuilder::new(language, schema);
        builder.push(FeatureVector::new(vec![1, 0, 10]), Label::space()).unwrap();
        builder.push(FeatureVector::new(vec![2, 1, 40]), Label::newline(-4)).unwrap();
        builder.push(FeatureVector::new(vec![3, 0, 12]), Label::none()).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("java.corpus");
        let corpus = create_test_corpus("java");

        let desc = save_corpus(&path, &corpus).unwrap();
        assert_eq!(desc.name, "java.corpus");
        assert_eq!(desc.size, fs::metadata(&path).unwrap().len());
        assert_eq!(desc.checksum, describe(&path).unwrap().checksum);

        let loaded = load_corpus(&path, "java").unwrap();
        assert_eq!(loaded, corpus);
        assert_eq!(loaded.schema().colwidth_center, 30.0);
    }

    #[test]
    fn test_overwrite_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c.corpus");
        save_corpus(&path, &create_test_corpus("c")).unwrap();

        let mut builder = CorpusBuilder::new("c", create_test_corpus("c").schema().clone());
        builder.push(FeatureVector::new(vec![9, 1, 3]), Label::space()).unwrap();
        let smaller = builder.build().unwrap();
        save_corpus(&path, &smaller).unwrap();

        assert_eq!(load_corpus(&path, "c").unwrap().len(), 1);
    }

    #[test]
    fn test_language_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("java.corpus");
        save_corpus(&path, &create_test_corpus("java")).unwrap();
        let err = load_corpus(&path, "c").unwrap_err();
        assert!(err.to_string().contains("not c"));
    }

    #[test]
    fn test_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.corpus");
        fs::write(&path, b"not a snapshot").unwrap();
        assert!(load_snapshot(&path).is_err());
        assert!(load_snapshot(&dir.path().join("missing.corpus")).is_err());
    }

    #[test]
    fn test_store_list_and_latest() {
        let dir = TempDir::new().unwrap();
        let store = CorpusStore::new(dir.path().join("snapshots")).unwrap();
        assert!(store.list(None).unwrap().is_empty());
        assert!(store.load_latest("java").unwrap().is_none());

        let java = store.save(&create_test_corpus("java")).unwrap();
        store.save(&create_test_corpus("c")).unwrap();
        fs::write(store.path_of("README.txt"), "ignored").unwrap();

        assert_eq!(store.list(None).unwrap().len(), 2);
        let only_java = store.list(Some("java")).unwrap();
        assert_eq!(only_java.len(), 1);
        assert_eq!(only_java[0].name, java.name);
        assert!(java.name.ends_with(".corpus"));

        let latest = store.load_latest("java").unwrap().unwrap();
        assert_eq!(latest.language(), "java");
        assert_eq!(store.load(&java.name, "java").unwrap().len(), 3);
    }

    #[test]
    fn test_store_delete() {
        let dir = TempDir::new().unwrap();
        let store = CorpusStore::new(dir.path()).unwrap();
        let desc = store.save(&create_test_corpus("java")).unwrap();
        assert!(store.delete(&desc.name).unwrap());
        assert!(!store.delete(&desc.name).unwrap());
        assert!(store.load(&desc.name, "java").is_err());
    }
}
