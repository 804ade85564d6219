//! @ai:module:intent JSON manifest loader for benchmark tasks
//! @ai:module:layer infrastructure
//! @ai:module:public_api DatasetLoader, DatasetLoaderTrait
//! @ai:module:stateless true

use crate::config::FilterConfig;
use crate::dataset::task::{Language, Task, TaskCategory, TaskKind};
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MANIFEST_SUFFIX: &str = "code_samples.json";

/// @ai:intent Trait for loading the task dataset
pub trait DatasetLoaderTrait: Send + Sync {
    /// @ai:intent Load all tasks from the dataset root
    fn load_all(&self, dataset_dir: &Path) -> Result<Vec<Task>>;

    /// @ai:intent Load tasks matching filter criteria
    fn load_filtered(&self, dataset_dir: &Path, filter: &FilterConfig) -> Result<Vec<Task>>;
}

/// @ai:intent One entry of a `*code_samples.json` manifest; fields vary by category
#[derive(Debug, Deserialize)]
struct RawDescriptor {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    code: Option<String>,
    mutated_code: Option<String>,
    function_name: Option<String>,
    code_path: Option<String>,
    mutated_path: Option<String>,
    full_code: Option<String>,
    #[serde(alias = "desription")]
    description: Option<String>,
}

/// Manifests use both numeric and string ids.
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// @ai:intent Where a manifest lives and what it holds
struct ManifestContext<'a> {
    category: TaskCategory,
    language: Language,
    set: &'a str,
    dir: &'a Path,
}

/// @ai:intent Loads task records from the category/set/manifest directory layout
/// @ai:effects pure (stateless)
pub struct DatasetLoader;

impl DatasetLoader {
    /// @ai:intent Create a new dataset loader
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent List direct subdirectories whose name starts with the language name
    /// @ai:effects fs:read
    fn find_sets(category_dir: &Path, language: Language) -> Vec<(String, PathBuf)> {
        WalkDir::new(category_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .filter_map(|e| {
                let name = e.file_name().to_str()?.to_string();
                name.starts_with(language.as_str())
                    .then(|| (name, e.path().to_path_buf()))
            })
            .collect()
    }

    /// @ai:intent Find manifest files directly inside a task set directory
    /// @ai:effects fs:read
    fn find_manifests(set_dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(set_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map(|name| name.ends_with(MANIFEST_SUFFIX))
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect()
    }

    /// @ai:intent Parse one manifest into tasks, skipping malformed descriptors
    /// @ai:pre path points to a JSON array of descriptors
    /// @ai:effects fs:read
    fn parse_manifest(path: &Path, ctx: &ManifestContext<'_>) -> Result<Vec<Task>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

        let descriptors: Vec<RawDescriptor> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))?;

        let mut tasks = Vec::with_capacity(descriptors.len());

        for raw in descriptors {
            let id = raw.id.clone();

            match Self::build_task(raw, ctx) {
                Ok(task) => tasks.push(task),
                Err(e) => {
                    tracing::warn!("Skipping task {} in {}: {:#}", id, path.display(), e);
                }
            }
        }

        Ok(tasks)
    }

    /// @ai:intent Turn a raw descriptor into a typed task for the manifest's category
    /// @ai:effects fs:read
    fn build_task(raw: RawDescriptor, ctx: &ManifestContext<'_>) -> Result<Task> {
        let kind = match ctx.category {
            TaskCategory::Unit => TaskKind::Unit {
                code: resolve_code(raw.code, raw.code_path.as_deref(), ctx, "code")?,
                mutated_code: resolve_code(
                    raw.mutated_code,
                    raw.mutated_path.as_deref(),
                    ctx,
                    "mutated_code",
                )?,
                function_name: raw.function_name.context("missing function_name")?,
            },
            TaskCategory::Integrational => TaskKind::Integrational {
                code: resolve_code(raw.code, raw.code_path.as_deref(), ctx, "code")?,
            },
            TaskCategory::Functional => TaskKind::Functional {
                code: raw.full_code.context("missing full_code")?,
                description: raw.description.context("missing description")?,
            },
        };

        Ok(Task {
            id: raw.id,
            language: ctx.language,
            set: ctx.set.to_string(),
            kind,
        })
    }
}

/// @ai:intent Inline code wins; otherwise read `<manifest dir>/<path>.<ext>`
/// @ai:effects fs:read
fn resolve_code(
    inline: Option<String>,
    relative: Option<&str>,
    ctx: &ManifestContext<'_>,
    field: &str,
) -> Result<String> {
    if let Some(code) = inline {
        return Ok(code);
    }

    let relative = relative.with_context(|| format!("missing {field} and its path"))?;
    let path = ctx
        .dir
        .join(format!("{}.{}", relative, ctx.language.extension()));

    std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read code file: {}", path.display()))
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetLoaderTrait for DatasetLoader {
    /// @ai:intent Load all tasks in category, language, set, manifest order
    /// @ai:effects fs:read
    fn load_all(&self, dataset_dir: &Path) -> Result<Vec<Task>> {
        if !dataset_dir.is_dir() {
            tracing::warn!("Dataset directory {} not found", dataset_dir.display());
            return Ok(Vec::new());
        }

        let mut tasks = Vec::new();

        for category in TaskCategory::ALL {
            let category_dir = dataset_dir.join(category.as_str());

            if !category_dir.is_dir() {
                tracing::debug!("No {} tasks under {}", category, dataset_dir.display());
                continue;
            }

            for language in Language::ALL {
                for (set, set_dir) in Self::find_sets(&category_dir, language) {
                    let ctx = ManifestContext {
                        category,
                        language,
                        set: &set,
                        dir: &set_dir,
                    };

                    for manifest in Self::find_manifests(&set_dir) {
                        match Self::parse_manifest(&manifest, &ctx) {
                            Ok(loaded) => tasks.extend(loaded),
                            Err(e) => {
                                tracing::warn!(
                                    "Skipping invalid manifest {}: {:#}",
                                    manifest.display(),
                                    e
                                );
                            }
                        }
                    }
                }
            }
        }

        Ok(tasks)
    }

    /// @ai:intent Load tasks matching filter criteria
    /// @ai:effects fs:read
    fn load_filtered(&self, dataset_dir: &Path, filter: &FilterConfig) -> Result<Vec<Task>> {
        let all_tasks = self.load_all(dataset_dir)?;

        let filtered: Vec<Task> = all_tasks
            .into_iter()
            .filter(|task| {
                filter.matches(task.category().as_str(), task.language.as_str(), &task.id)
            })
            .collect();

        Ok(filtered)
    }
}
