use crate::errors::GuardResult;
use std::path::Path;

/// Creates the directory that will hold `path`, including missing ancestors.
/// The final component itself is never created.
pub async fn ensure_parent_dir_exists(path: &Path) -> GuardResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_ancestors_only() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("a").join("b").join("out.json");
        ensure_parent_dir_exists(&target).await.unwrap();
        assert!(tmp.path().join("a/b").is_dir());
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn existing_parent_is_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("out.json");
        ensure_parent_dir_exists(&target).await.unwrap();
        ensure_parent_dir_exists(&target).await.unwrap();
        assert!(tmp.path().is_dir());
    }

    #[tokio::test]
    async fn file_in_the_way_propagates_os_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let err = ensure_parent_dir_exists(&blocker.join("child/out.json")).await.unwrap_err();
        assert_eq!(err.code(), "Io");
    }
}
