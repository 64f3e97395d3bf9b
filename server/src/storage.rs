use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

pub const LABELS_HEADER: &str = "filename,label,timestamp,ip\n";

/// One stored sample's metadata row.
#[derive(Clone, Debug)]
pub struct SampleRecord {
    pub filename: String,
    pub label: String,
    pub timestamp: String,
    pub ip: String,
}

pub fn csv_line(record: &SampleRecord) -> String {
    format!(
        "{},{},{},{}\n",
        record.filename, record.label, record.timestamp, record.ip
    )
}

#[async_trait]
pub trait Storage: Send + Sync {
    async fn store_sample(&self, record: &SampleRecord, bytes: &[u8]) -> Result<(), String>;
}

/// Writes rasters under `<data>/images/` and appends one CSV row per
/// sample to `<data>/labels.csv`, creating both on first use.
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn images_dir(&self) -> PathBuf {
        self.data_dir.join("images")
    }

    fn labels_path(&self) -> PathBuf {
        self.data_dir.join("labels.csv")
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn store_sample(&self, record: &SampleRecord, bytes: &[u8]) -> Result<(), String> {
        let images_dir = self.images_dir();
        tokio::fs::create_dir_all(&images_dir)
            .await
            .map_err(|error| format!("Failed to create images dir: {error}"))?;
        tokio::fs::write(images_dir.join(&record.filename), bytes)
            .await
            .map_err(|error| format!("Failed to write {}: {error}", record.filename))?;

        let labels_path = self.labels_path();
        let header_needed = !tokio::fs::try_exists(&labels_path).await.unwrap_or(false);
        let mut chunk = String::new();
        if header_needed {
            chunk.push_str(LABELS_HEADER);
        }
        chunk.push_str(&csv_line(record));

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&labels_path)
            .await
            .map_err(|error| format!("Failed to open labels file: {error}"))?;
        file.write_all(chunk.as_bytes())
            .await
            .map_err(|error| format!("Failed to append labels file: {error}"))?;
        Ok(())
    }
}
