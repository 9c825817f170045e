//! Loading a repository manifest (and everything it links to) from disk.

use std::collections::{BTreeSet, VecDeque};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use actorgraph_core::Descriptor;
use actorgraph_error::{Error, Result};

/// File name marking a repository root.
pub const MANIFEST_FILE: &str = "repository.toml";

/// Common view over every kind of entity a manifest declares.
pub trait Entity {
    fn name(&self) -> &str;

    /// Path as written in the manifest, relative to its repository.
    fn path(&self) -> &str;

    /// Directory of the repository that declared this entity.
    fn repo_dir(&self) -> &Path;

    fn location(&self) -> PathBuf {
        self.repo_dir().join(self.path())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    pub scope: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorEntry {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: String,
    pub path: String,
    #[serde(default)]
    pub produces: Vec<String>,
    #[serde(default)]
    pub consumes: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub apis: Vec<String>,
    #[serde(default)]
    pub dialogs: Vec<Dialog>,
    #[serde(skip)]
    pub repo_dir: PathBuf,
}

impl ActorEntry {
    /// Short name: the explicit `label`, or the class name in snake_case.
    pub fn short_name(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| snake_case(&self.name))
    }
}

impl Descriptor for ActorEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn produces(&self) -> &[String] {
        &self.produces
    }

    fn consumes(&self) -> &[String] {
        &self.consumes
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    pub path: String,
    #[serde(skip)]
    pub repo_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopicEntry {
    pub name: String,
    pub path: String,
    #[serde(skip)]
    pub repo_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagEntry {
    pub name: String,
    pub path: String,
    #[serde(skip)]
    pub repo_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowEntry {
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub description: String,
    pub path: String,
    #[serde(default)]
    pub phases: Vec<String>,
    #[serde(skip)]
    pub repo_dir: PathBuf,
}

macro_rules! impl_entity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Entity for $ty {
                fn name(&self) -> &str {
                    &self.name
                }

                fn path(&self) -> &str {
                    &self.path
                }

                fn repo_dir(&self) -> &Path {
                    &self.repo_dir
                }
            }
        )*
    };
}

impl_entity!(ActorEntry, ModelEntry, TopicEntry, TagEntry, WorkflowEntry);

/// One `repository.toml`, as written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    pub name: String,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub actors: Vec<ActorEntry>,
    #[serde(default)]
    pub models: Vec<ModelEntry>,
    #[serde(default)]
    pub topics: Vec<TopicEntry>,
    #[serde(default)]
    pub tags: Vec<TagEntry>,
    #[serde(default)]
    pub workflows: Vec<WorkflowEntry>,
}

impl Manifest {
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|err| {
            Error::manifest_invalid(origin.display().to_string(), err.message().to_string())
                .with_operation("repository::parse_manifest")
                .set_source(err)
        })
    }

    pub fn from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let text = read_manifest_text(&path)?;
        let mut manifest = Self::parse(&text, &path)?;
        manifest.attach(dir);
        Ok(manifest)
    }

    fn attach(&mut self, dir: &Path) {
        for actor in &mut self.actors {
            actor.repo_dir = dir.to_path_buf();
        }
        for model in &mut self.models {
            model.repo_dir = dir.to_path_buf();
        }
        for topic in &mut self.topics {
            topic.repo_dir = dir.to_path_buf();
        }
        for tag in &mut self.tags {
            tag.repo_dir = dir.to_path_buf();
        }
        for workflow in &mut self.workflows {
            workflow.repo_dir = dir.to_path_buf();
        }
    }
}

pub(crate) fn read_manifest_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| {
        let error = match err.kind() {
            io::ErrorKind::NotFound => {
                Error::file_not_found(path.display().to_string()).set_source(err)
            }
            _ => Error::from(err).with_context("manifest", path.display().to_string()),
        };
        error.with_operation("repository::read_manifest")
    })
}

/// Walk up from `start` to the first directory holding a manifest.
pub fn find_repository_basedir(start: impl AsRef<Path>) -> Result<PathBuf> {
    let start = start.as_ref();
    let canonical = start.canonicalize().map_err(|err| {
        Error::repository_not_found(start.display().to_string())
            .with_operation("repository::find_basedir")
            .set_source(err)
    })?;

    canonical
        .ancestors()
        .find(|dir| dir.join(MANIFEST_FILE).is_file())
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            Error::repository_not_found(start.display().to_string())
                .with_operation("repository::find_basedir")
        })
}

/// A base repository plus every repository reachable through `links`.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    name: String,
    base_dir: PathBuf,
    repo_dirs: Vec<PathBuf>,
    actors: Vec<ActorEntry>,
    models: Vec<ModelEntry>,
    topics: Vec<TopicEntry>,
    tags: Vec<TagEntry>,
    workflows: Vec<WorkflowEntry>,
}

impl Repository {
    /// Load the manifest in `base_dir` and, breadth first, every linked
    /// repository. Each repository is read once even if linked repeatedly.
    pub fn load(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().canonicalize().map_err(|err| {
            Error::from(err)
                .with_operation("repository::load")
                .with_context("base_dir", base_dir.as_ref().display().to_string())
        })?;

        let mut repository = Repository {
            base_dir: base_dir.clone(),
            ..Repository::default()
        };
        let mut visited = BTreeSet::new();
        let mut pending = VecDeque::from([base_dir.clone()]);

        while let Some(dir) = pending.pop_front() {
            if !visited.insert(dir.clone()) {
                continue;
            }

            let manifest = Manifest::from_dir(&dir)?;
            debug!(repository = %manifest.name, dir = %dir.display(), "manifest loaded");

            for link in &manifest.links {
                let linked = dir.join(link).canonicalize().map_err(|err| {
                    Error::link_unresolved(link.clone())
                        .with_operation("repository::load")
                        .with_context("from", dir.display().to_string())
                        .set_source(err)
                })?;
                pending.push_back(linked);
            }

            if dir == base_dir {
                repository.name = manifest.name.clone();
            }
            repository.absorb(manifest, dir);
        }

        info!(
            repositories = repository.repo_dirs.len(),
            actors = repository.actors.len(),
            "repository loaded"
        );

        Ok(repository)
    }

    fn absorb(&mut self, manifest: Manifest, dir: PathBuf) {
        self.actors.extend(manifest.actors);
        self.models.extend(manifest.models);
        self.topics.extend(manifest.topics);
        self.tags.extend(manifest.tags);
        self.workflows.extend(manifest.workflows);
        self.repo_dirs.push(dir);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Base repository first, then linked ones in discovery order.
    pub fn repo_dirs(&self) -> &[PathBuf] {
        &self.repo_dirs
    }

    /// Actors from every loaded repository.
    pub fn actors(&self) -> &[ActorEntry] {
        &self.actors
    }

    pub fn models(&self, all_repos: bool) -> Vec<&ModelEntry> {
        self.local(&self.models, all_repos)
    }

    pub fn topics(&self, all_repos: bool) -> Vec<&TopicEntry> {
        self.local(&self.topics, all_repos)
    }

    pub fn tags(&self, all_repos: bool) -> Vec<&TagEntry> {
        self.local(&self.tags, all_repos)
    }

    pub fn workflows(&self, all_repos: bool) -> Vec<&WorkflowEntry> {
        self.local(&self.workflows, all_repos)
    }

    /// Names of actors carrying `tag`, sorted.
    pub fn actors_tagged(&self, tag: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .actors
            .iter()
            .filter(|actor| actor.tags.iter().any(|t| t == tag))
            .map(|actor| actor.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    fn local<'a, E: Entity>(&self, items: &'a [E], all_repos: bool) -> Vec<&'a E> {
        items
            .iter()
            .filter(|item| all_repos || item.repo_dir() == self.base_dir.as_path())
            .collect()
    }
}

/// `path` expressed relative to `base`, climbing with `..` where needed.
///
/// Both paths are expected to be absolute; paths on different roots come
/// back unchanged.
pub fn relative_path(path: &Path, base: &Path) -> PathBuf {
    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();

    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return path.to_path_buf();
    }

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part.as_os_str());
    }
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    relative
}

/// `CheckOsRelease` -> `check_os_release`.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();
    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            let next_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            let prev_upper = i > 0 && chars[i - 1].is_uppercase();
            if prev_lower || (prev_upper && next_lower) {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
