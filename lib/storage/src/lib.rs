pub mod snapshot;

pub use snapshot::{
    describe, load_corpus, load_snapshot, save_corpus, CorpusSnapshot, CorpusStore, SnapshotDescription,
    SNAPSHOT_VERSION,
};
