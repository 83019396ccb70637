//! Project descriptors and artifact coordinates.
//!
//! Descriptors arrive already parsed. On disk they are JSON snapshots using
//! the build tool's own field names (`groupId`, `artifactId`, ...), one file
//! per repository.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result};

const COORDINATE_DELIMITER: char = ':';

/// A `group:artifact:version` triple where every part may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactCoordinate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ArtifactCoordinate {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: Option<&str>,
    ) -> Self {
        Self {
            group_id: non_blank(group_id.into()),
            artifact_id: non_blank(artifact_id.into()),
            version: version.map(str::to_string).and_then(non_blank),
        }
    }

    /// Parse `g`, `g:a` or `g:a:v`. Empty parts are treated as absent.
    pub fn parse(text: &str) -> Result<Self> {
        let parts: Vec<&str> = text.split(COORDINATE_DELIMITER).collect();
        if parts.len() > 3 {
            return Err(Error::InvalidQuery(format!(
                "coordinate '{}' has more than three parts",
                text
            )));
        }

        let part = |i: usize| parts.get(i).map(|p| p.to_string()).and_then(non_blank);
        Ok(Self {
            group_id: part(0),
            artifact_id: part(1),
            version: part(2),
        })
    }

    pub fn group_id(&self) -> Option<&str> {
        present(&self.group_id)
    }

    pub fn artifact_id(&self) -> Option<&str> {
        present(&self.artifact_id)
    }

    pub fn version(&self) -> Option<&str> {
        present(&self.version)
    }

    /// True when no part carries a value.
    pub fn is_empty(&self) -> bool {
        self.group_id().is_none() && self.artifact_id().is_none() && self.version().is_none()
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.group_id().unwrap_or(""),
            self.artifact_id().unwrap_or("")
        )?;
        if let Some(version) = self.version() {
            write!(f, ":{}", version)?;
        }
        Ok(())
    }
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

/// Build metadata for one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDescriptor {
    /// Repository the descriptor was read from, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,

    pub artifact_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ArtifactCoordinate>,

    #[serde(default)]
    pub dependencies: Vec<ArtifactCoordinate>,

    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl ProjectDescriptor {
    pub fn new(group_id: Option<&str>, artifact_id: impl Into<String>, version: Option<&str>) -> Self {
        Self {
            group_id: group_id.map(str::to_string),
            artifact_id: artifact_id.into(),
            version: version.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    pub fn with_parent(mut self, parent: ArtifactCoordinate) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_dependency(mut self, dependency: ArtifactCoordinate) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Group id, falling back to the parent's when the project does not
    /// declare one.
    pub fn effective_group_id(&self) -> Option<&str> {
        present(&self.group_id).or_else(|| self.parent.as_ref().and_then(|p| p.group_id()))
    }

    /// The project's own coordinate with the inherited group applied.
    pub fn coordinate(&self) -> ArtifactCoordinate {
        ArtifactCoordinate {
            group_id: self.effective_group_id().map(str::to_string),
            artifact_id: non_blank(self.artifact_id.clone()),
            version: present(&self.version).map(str::to_string),
        }
    }

    /// Name used when reporting this descriptor.
    pub fn display_name(&self) -> String {
        match &self.repository {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => self.coordinate().to_string(),
        }
    }
}

/// Read one descriptor snapshot.
///
/// A snapshot without a `repository` name takes the file stem.
pub fn load_descriptor(path: &Path) -> Result<ProjectDescriptor> {
    let contents = std::fs::read_to_string(path)?;
    let mut descriptor: ProjectDescriptor = serde_json::from_str(&contents)
        .map_err(|e| Error::InvalidDescriptor(path.to_path_buf(), e.to_string()))?;

    if descriptor.repository.is_none() {
        descriptor.repository = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string());
    }
    Ok(descriptor)
}

/// Read every `*.json` snapshot in `dir`, ordered by file name.
///
/// Files that cannot be read or parsed are logged and skipped.
pub fn load_descriptors(dir: &Path) -> Result<Vec<ProjectDescriptor>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut descriptors = Vec::with_capacity(paths.len());
    for path in paths {
        match load_descriptor(&path) {
            Ok(descriptor) => {
                debug!(path = %path.display(), "loaded descriptor");
                descriptors.push(descriptor);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "skipping descriptor"),
        }
    }
    Ok(descriptors)
}
