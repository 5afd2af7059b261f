use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use parking_lot::Mutex;
use uuid::Uuid;

use super::{
    validate_request, PersistenceError, PersistenceResult, ProjectRecord, ProjectStore,
    SaveRequest, SavedProject,
};

fn record_for(id: String, request: &SaveRequest) -> PersistenceResult<ProjectRecord> {
    Ok(ProjectRecord {
        id,
        title: request.title.clone(),
        project_json: serde_json::to_value(&request.project_json)?,
        thumbnail_url: request.thumbnail_url.clone(),
    })
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Keeps projects in process memory. Used for tests and offline sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    projects: Mutex<HashMap<String, ProjectRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw record as-is, bypassing validation
    pub fn insert_raw(&self, record: ProjectRecord) {
        self.projects.lock().insert(record.id.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.projects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.lock().is_empty()
    }
}

impl ProjectStore for MemoryStore {
    fn save(&self, id: Option<&str>, request: &SaveRequest) -> PersistenceResult<SavedProject> {
        validate_request(request)?;
        let id = id.map_or_else(new_id, str::to_owned);
        let record = record_for(id.clone(), request)?;
        self.projects.lock().insert(id.clone(), record);
        Ok(SavedProject { id })
    }

    fn fetch(&self, id: &str) -> PersistenceResult<ProjectRecord> {
        self.projects
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| PersistenceError::NotFound(id.to_owned()))
    }
}

/// One pretty-printed JSON file per project inside a directory
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    // serialises writes from concurrent save tasks
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn path_for(&self, id: &str) -> PersistenceResult<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PersistenceError::NotFound(id.to_owned()));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }
}

impl ProjectStore for FileStore {
    fn save(&self, id: Option<&str>, request: &SaveRequest) -> PersistenceResult<SavedProject> {
        validate_request(request)?;
        let id = id.map_or_else(new_id, str::to_owned);
        let path = self.path_for(&id)?;
        let record = record_for(id.clone(), request)?;
        let json = serde_json::to_string_pretty(&record)?;

        let _guard = self.write_lock.lock();
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, json)?;
        log::debug!("Wrote project file {}", path.display());
        Ok(SavedProject { id })
    }

    fn fetch(&self, id: &str) -> PersistenceResult<ProjectRecord> {
        let path = self.path_for(id)?;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PersistenceError::NotFound(id.to_owned()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&json)?)
    }
}
