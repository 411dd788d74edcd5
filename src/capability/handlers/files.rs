//! File creation and deletion

use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::capability::implementation::{CapabilityHandler, HandlerError, HandlerOutput, StepInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Create,
    Delete,
}

pub struct FileHandler {
    action: FileAction,
    /// Base for relative paths
    base_dir: PathBuf,
}

impl FileHandler {
    pub fn new(action: FileAction, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            action,
            base_dir: base_dir.into(),
        }
    }

    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path.trim());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

#[async_trait]
impl CapabilityHandler for FileHandler {
    async fn invoke(&self, input: StepInput) -> Result<HandlerOutput, HandlerError> {
        let path = self.resolve_path(input.str_param("path")?);
        let shown = path.display().to_string();

        match self.action {
            FileAction::Create => {
                if tokio::fs::try_exists(&path).await? {
                    return Err(HandlerError::Failed(format!("{} already exists", shown)));
                }
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                let content = input.opt_str_param("content").unwrap_or_default();
                tokio::fs::write(&path, content).await?;
                Ok(HandlerOutput::new(format!("Created {}", shown))
                    .with_output("path", json!(shown))
                    .with_output("bytes", json!(content.len())))
            }
            FileAction::Delete => {
                tokio::fs::remove_file(&path).await?;
                Ok(HandlerOutput::new(format!("Deleted {}", shown)).with_output("path", json!(shown)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Params;

    fn input(path: &str, content: Option<&str>) -> StepInput {
        let mut params = Params::new();
        params.insert("path".into(), json!(path));
        if let Some(c) = content {
            params.insert("content".into(), json!(c));
        }
        StepInput::new("create_file", params)
    }

    #[tokio::test]
    async fn test_create_then_delete() {
        let dir = tempfile::tempdir().unwrap();
        let create = FileHandler::new(FileAction::Create, dir.path());
        let out = create
            .invoke(input("notes/todo.txt", Some("buy milk")))
            .await
            .unwrap();
        let written = dir.path().join("notes/todo.txt");
        assert_eq!(std::fs::read_to_string(&written).unwrap(), "buy milk");
        assert_eq!(out.outputs["path"], json!(written.display().to_string()));

        let delete = FileHandler::new(FileAction::Delete, dir.path());
        delete.invoke(input("notes/todo.txt", None)).await.unwrap();
        assert!(!written.exists());
    }

    #[tokio::test]
    async fn test_create_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "keep").unwrap();
        let create = FileHandler::new(FileAction::Create, dir.path());
        assert!(create.invoke(input("a.txt", Some("new"))).await.is_err());
        assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "keep");
    }

    #[tokio::test]
    async fn test_delete_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let delete = FileHandler::new(FileAction::Delete, dir.path());
        let err = delete.invoke(input("ghost.txt", None)).await.unwrap_err();
        assert!(matches!(err, HandlerError::Io(_)));
    }
}
