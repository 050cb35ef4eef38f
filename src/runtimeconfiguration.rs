//! Process level engine settings applied per context.

use std::path::PathBuf;

use bon::bon;

use crate::context::Context;
use crate::Result;

/// Engine settings a deployment wants to pin: where resource files and the
/// authority database live, and whether the engine's own debug traces are
/// forwarded.
pub struct RuntimeConfiguration {
    search_paths: Option<Vec<PathBuf>>,
    database_path: Option<PathBuf>,
    debug_logging: Option<bool>,
}

#[bon]
impl RuntimeConfiguration {
    #[builder]
    pub fn new(
        search_paths: Option<Vec<PathBuf>>,
        database_path: Option<PathBuf>,
        debug_logging: Option<bool>,
    ) -> Self {
        Self {
            search_paths,
            database_path,
            debug_logging,
        }
    }

    /// Applies the configured settings to a context. Settings left
    /// unconfigured keep the engine's defaults, so applying an empty
    /// configuration is a no-op.
    pub fn apply_to(&self, context: &Context) -> Result {
        if let Some(paths) = &self.search_paths {
            let paths: Vec<String> = paths.iter().map(|p| p.to_string_lossy().into_owned()).collect();
            context.inner().set_search_paths(&paths)?;
        }
        if let Some(path) = &self.database_path {
            context.inner().open_database(&path.to_string_lossy())?;
        }
        if let Some(enabled) = self.debug_logging {
            context.inner().set_debug_logging(enabled)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::io::Write as _;

    #[test]
    fn empty_configuration_is_a_no_op() {
        let context = Context::new().expect("context creation");
        let config = RuntimeConfiguration::builder().build();
        config.apply_to(&context).expect("apply");
    }

    #[test]
    fn search_paths_apply() {
        let dir = tempfile::tempdir().expect("temp dir");
        let context = Context::new().expect("context creation");
        let config = RuntimeConfiguration::builder()
            .search_paths(vec![dir.path().to_path_buf()])
            .debug_logging(false)
            .build();
        config.apply_to(&context).expect("apply");
    }

    #[test]
    fn a_broken_database_is_reported() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"not a database").expect("write");

        let context = Context::new().expect("context creation");
        let config = RuntimeConfiguration::builder()
            .database_path(file.path().to_path_buf())
            .build();
        assert!(matches!(config.apply_to(&context), Err(Error::Database(_))));
    }
}
