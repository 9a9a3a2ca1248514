use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::PrefsStoreError;
use crate::paths::prefs_file;
use crate::schema::{Prefs, PREFS_VERSION};

#[derive(Debug)]
pub struct PrefsStore {
    path: PathBuf,
    prefs: Prefs,
}

impl PrefsStore {
    /// Opens the store rooted at `base`, loading existing preferences when
    /// present. A missing file yields defaults; corrupt JSON is an error.
    pub fn open(base: &Path) -> Result<Self, PrefsStoreError> {
        let path = prefs_file(base);

        let prefs = match fs::read_to_string(&path) {
            Ok(contents) => {
                let parsed: Prefs = serde_json::from_str(&contents).map_err(|source| {
                    PrefsStoreError::JsonParse {
                        path: path.clone(),
                        source,
                    }
                })?;
                if parsed.version != PREFS_VERSION {
                    return Err(PrefsStoreError::UnsupportedVersion {
                        path,
                        found: parsed.version,
                    });
                }

                parsed
            }
            Err(source) if source.kind() == io::ErrorKind::NotFound => Prefs::default(),
            Err(source) => {
                return Err(PrefsStoreError::io("reading preferences", &path, source));
            }
        };

        Ok(Self { path, prefs })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn prefs(&self) -> &Prefs {
        &self.prefs
    }

    #[must_use]
    pub fn source_text(&self) -> Option<&str> {
        self.prefs.source_text.as_deref()
    }

    #[must_use]
    pub fn font_size(&self) -> Option<u32> {
        self.prefs.font_size
    }

    #[must_use]
    pub fn theme(&self) -> Option<&str> {
        self.prefs.theme.as_deref()
    }

    pub fn set_source_text(&mut self, text: impl Into<String>) -> Result<(), PrefsStoreError> {
        self.prefs.source_text = Some(text.into());
        self.persist()
    }

    pub fn set_font_size(&mut self, font_size: u32) -> Result<(), PrefsStoreError> {
        self.prefs.font_size = Some(font_size);
        self.persist()
    }

    pub fn set_theme(&mut self, theme: impl Into<String>) -> Result<(), PrefsStoreError> {
        self.prefs.theme = Some(theme.into());
        self.persist()
    }

    // Writes go through a sibling temp file and a rename so a crash cannot
    // leave a half-written document behind.
    fn persist(&self) -> Result<(), PrefsStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| PrefsStoreError::io("creating preferences dir", parent, source))?;
        }

        let serialized =
            serde_json::to_string_pretty(&self.prefs).map_err(|source| {
                PrefsStoreError::JsonSerialize {
                    path: self.path.clone(),
                    source,
                }
            })?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, serialized)
            .map_err(|source| PrefsStoreError::io("writing preferences", &temp_path, source))?;
        fs::rename(&temp_path, &self.path)
            .map_err(|source| PrefsStoreError::io("replacing preferences", &self.path, source))?;

        Ok(())
    }
}
