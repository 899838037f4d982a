#![deny(unsafe_code)]

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use xwalk_model::{LookupTables, RuleSet};

use crate::error::TablesError;
use crate::hash::sha256_hex;
use crate::loaders::{load_crosswalks, load_namespaces, load_ontology_terms, load_rules};
use crate::manifest::{MANIFEST_SCHEMA, MANIFEST_SCHEMA_VERSION, Manifest, ManifestFile, TableRole};

#[derive(Debug, Clone, serde::Serialize)]
pub struct VerifySummary {
    pub tables_dir: PathBuf,
    pub file_count: usize,
    pub verified_count: usize,
    pub crosswalk_count: usize,
    pub ontterm_count: usize,
    pub namespace_count: usize,
    pub override_count: usize,
    pub link_count: usize,
    pub group_count: usize,
}

#[derive(Debug, Clone)]
pub struct TableRegistry {
    pub manifest: Manifest,
    pub files: Vec<ManifestFile>,
    pub tables: LookupTables,
}

impl TableRegistry {
    pub fn verify_and_load(tables_dir: &Path) -> Result<(Self, VerifySummary), TablesError> {
        let manifest = load_manifest(&tables_dir.join("manifest.toml"))?;

        validate_manifest(&manifest)?;

        let mut files = manifest.files.clone();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let mut verified_count = 0;
        for file in &files {
            if verify_file(tables_dir, file)? {
                verified_count += 1;
            }
        }

        let crosswalks = {
            let file = role_file(&files, TableRole::Crosswalks)?;
            load_crosswalks(&tables_dir.join(&file.path), file.kind)?
        };
        let ontology_terms = {
            let file = role_file(&files, TableRole::Ontterms)?;
            load_ontology_terms(&tables_dir.join(&file.path), file.kind)?
        };
        let namespaces = {
            let file = role_file(&files, TableRole::Namespaces)?;
            load_namespaces(&tables_dir.join(&file.path), file.kind)?
        };
        let rules = match files.iter().find(|f| f.role == TableRole::Rules) {
            Some(file) => load_rules(&tables_dir.join(&file.path))?,
            None => RuleSet::default(),
        };

        let summary = VerifySummary {
            tables_dir: tables_dir.to_path_buf(),
            file_count: files.len(),
            verified_count,
            crosswalk_count: crosswalks.len(),
            ontterm_count: ontology_terms.len(),
            namespace_count: namespaces.len(),
            override_count: rules.overrides.len(),
            link_count: rules.links.len(),
            group_count: rules.groups.len(),
        };
        debug!(
            dir = %tables_dir.display(),
            crosswalks = summary.crosswalk_count,
            ontterms = summary.ontterm_count,
            namespaces = summary.namespace_count,
            "lookup tables loaded"
        );

        Ok((
            Self {
                manifest,
                files,
                tables: LookupTables {
                    crosswalks,
                    ontology_terms,
                    namespaces,
                    rules,
                },
            },
            summary,
        ))
    }
}

fn load_manifest(path: &Path) -> Result<Manifest, TablesError> {
    let contents = std::fs::read_to_string(path).map_err(|e| TablesError::io(path, e))?;
    toml::from_str(&contents).map_err(|e| TablesError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate_manifest(manifest: &Manifest) -> Result<(), TablesError> {
    if manifest.manifest.schema != MANIFEST_SCHEMA {
        return Err(TablesError::InvalidManifest {
            message: format!("unsupported schema: {}", manifest.manifest.schema),
        });
    }
    if manifest.manifest.schema_version != MANIFEST_SCHEMA_VERSION {
        return Err(TablesError::InvalidManifest {
            message: format!(
                "unsupported schema_version: {}",
                manifest.manifest.schema_version
            ),
        });
    }

    let mut roles: BTreeSet<TableRole> = BTreeSet::new();
    for file in &manifest.files {
        if !roles.insert(file.role) {
            return Err(TablesError::DuplicateRole {
                role: file.role.to_string(),
            });
        }
        if !file.role.accepts(file.kind) {
            return Err(TablesError::InvalidManifest {
                message: format!("unsupported kind {:?} for role {}", file.kind, file.role),
            });
        }
        if let Some(sha) = &file.sha256 {
            validate_sha(sha, &file.path)?;
        }
        validate_path(&file.path)?;
    }

    for role in TableRole::REQUIRED {
        if !roles.contains(&role) {
            return Err(TablesError::MissingRole {
                role: role.to_string(),
            });
        }
    }
    Ok(())
}

/// Returns whether a checksum was verified.
fn verify_file(tables_dir: &Path, file: &ManifestFile) -> Result<bool, TablesError> {
    let full_path = tables_dir.join(&file.path);
    let bytes = std::fs::read(&full_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TablesError::MissingFile {
                path: full_path.clone(),
            }
        } else {
            TablesError::io(full_path.clone(), e)
        }
    })?;

    let Some(expected) = &file.sha256 else {
        return Ok(false);
    };
    let actual = sha256_hex(&bytes);
    let expected = expected.to_ascii_lowercase();
    if actual != expected {
        return Err(TablesError::Sha256Mismatch {
            path: full_path,
            expected,
            actual,
        });
    }
    Ok(true)
}

fn role_file(files: &[ManifestFile], role: TableRole) -> Result<&ManifestFile, TablesError> {
    files
        .iter()
        .find(|f| f.role == role)
        .ok_or_else(|| TablesError::MissingRole {
            role: role.to_string(),
        })
}

fn validate_sha(sha: &str, path: &str) -> Result<(), TablesError> {
    if sha.len() != 64 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(TablesError::InvalidSha256 {
            path: PathBuf::from(path),
            message: "expected 64 hex characters".to_string(),
        });
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<(), TablesError> {
    if path.contains('\\') {
        return Err(TablesError::InvalidPath {
            path: PathBuf::from(path),
            message: "manifest path must use '/' separators".to_string(),
        });
    }

    let p = Path::new(path);
    if p.is_absolute() {
        return Err(TablesError::InvalidPath {
            path: p.to_path_buf(),
            message: "manifest path must be relative".to_string(),
        });
    }
    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(TablesError::InvalidPath {
            path: p.to_path_buf(),
            message: "manifest path must not traverse out of tables/".to_string(),
        });
    }
    Ok(())
}
