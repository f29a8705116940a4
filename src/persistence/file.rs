use super::{decode, encode, PersistenceError, TaskRecord};
use log::*;
use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

/// Oversees reading and writing the task file of the current tab.
///
#[derive(Clone, Debug)]
pub struct TaskFile {
    path: PathBuf,
}

impl TaskFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        TaskFile {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every well-formed record. A missing file loads as empty.
    ///
    pub fn load(&self) -> Result<Vec<TaskRecord>, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let records = decode(&content);
                info!("Loaded {} task(s) from {}.", records.len(), self.path.display());
                Ok(records)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No task file at {}; starting empty.", self.path.display());
                Ok(vec![])
            }
            Err(e) => Err(PersistenceError::ReadFailed {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    /// Overwrite the file with the given records.
    ///
    pub fn save(&self, records: &[TaskRecord]) -> Result<(), PersistenceError> {
        let failed = |e: std::io::Error| PersistenceError::WriteFailed {
            path: self.path.clone(),
            source: e,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(failed)?;
            }
        }
        let mut file = fs::File::create(&self.path).map_err(failed)?;
        write!(file, "{}", encode(records)).map_err(failed)?;
        file.flush().map_err(failed)?;
        trace!("Saved {} task(s) to {}.", records.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let file = TaskFile::new(dir.path().join("Tasks.txt"));
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_reproduces_records() {
        let dir = tempdir().unwrap();
        let file = TaskFile::new(dir.path().join("nested").join("Tasks.txt"));
        let records = vec![
            TaskRecord {
                text: "Call mom".to_string(),
                done: false,
                priority: 2,
            },
            TaskRecord {
                text: "Write report".to_string(),
                done: true,
                priority: 0,
            },
        ];
        file.save(&records).unwrap();
        assert_eq!(file.load().unwrap(), records);
        file.save(&[]).unwrap();
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "");
    }

    #[test]
    fn write_failure_is_reported() {
        let dir = tempdir().unwrap();
        // a directory cannot be opened as a file
        let file = TaskFile::new(dir.path());
        assert!(matches!(
            file.save(&[]),
            Err(PersistenceError::WriteFailed { .. })
        ));
    }
}
