use async_trait::async_trait;
use service_core::error::AppError;
use std::path::PathBuf;
use tokio::fs;

/// Where generated report files live. The only backend is the local upload
/// directory, which doubles as the statically-served `/uploads` root.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn upload(&self, key: &str, data: Vec<u8>) -> Result<(), AppError>;
    async fn download(&self, key: &str) -> Result<Vec<u8>, AppError>;
}

pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await?;
        }
        Ok(Self { base_path })
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(&self, key: &str, data: Vec<u8>) -> Result<(), AppError> {
        let path = self.base_path.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, data).await?;
        Ok(())
    }

    async fn download(&self, key: &str) -> Result<Vec<u8>, AppError> {
        let path = self.base_path.join(key);
        let data = fs::read(path).await?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_then_download_round_trips() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let storage = LocalStorage::new(dir.path())
            .await
            .expect("create storage");

        storage
            .upload("report.pdf", b"%PDF-test".to_vec())
            .await
            .expect("upload");
        let data = storage.download("report.pdf").await.expect("download");
        assert_eq!(data, b"%PDF-test");
    }

    #[tokio::test]
    async fn download_of_missing_key_fails() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let storage = LocalStorage::new(dir.path())
            .await
            .expect("create storage");

        assert!(storage.download("nope.pdf").await.is_err());
    }
}
