// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{error::Result, metadata};

use super::Storage;

/// JSON-encoded value in a file under the user's data directory.
pub(crate) struct File {
    path: PathBuf,
}

impl File {
    pub(crate) fn new<P: AsRef<Path>>(file: P) -> Option<Self> {
        metadata::PROJECT_DIRS
            .as_ref()
            .map(|dirs| Self::at(dirs.data_dir().join(file)))
    }

    pub(crate) fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl<T: Send + Serialize + Sync + for<'de> Deserialize<'de>> Storage<T> for File {
    async fn get(&mut self) -> Result<Option<T>> {
        match fs::File::open(&self.path) {
            Ok(fp) => Ok(Some(serde_json::from_reader::<fs::File, T>(fp)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&mut self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(&self.path)?;
        serde_json::to_writer(file, data)?;
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{env, process};

    use crate::error::Result;

    use super::*;

    #[tokio::test]
    async fn update_get_and_clear_twice() -> Result<()> {
        let path = env::temp_dir()
            .join(format!("taskdesk-test-{}", process::id()))
            .join("auth_token.json");
        let mut storage = File::at(&path);

        Storage::<String>::update(&mut storage, &"abc.def.ghi".to_owned()).await?;
        assert_eq!(
            Storage::<String>::get(&mut storage).await?.as_deref(),
            Some("abc.def.ghi")
        );

        Storage::<String>::clear(&mut storage).await?;
        Storage::<String>::clear(&mut storage).await?;
        assert_eq!(Storage::<String>::get(&mut storage).await?, None);
        Ok(())
    }
}
