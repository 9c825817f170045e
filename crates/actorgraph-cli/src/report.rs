//! JSON discovery document.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use actorgraph_error::{Error, Result};

use crate::repository::{ActorEntry, Dialog, Entity, Repository, WorkflowEntry, relative_path};

/// Top-level keys, in output order.
#[derive(Debug, Serialize)]
pub struct DiscoveryReport<'a> {
    pub repository: &'a str,
    pub base_dir: String,
    pub topics: BTreeMap<&'a str, TopicDetails<'a>>,
    pub models: BTreeMap<&'a str, ModelDetails>,
    pub actors: BTreeMap<&'a str, ActorDetails<'a>>,
    pub tags: BTreeMap<&'a str, TagDetails<'a>>,
    pub workflows: BTreeMap<&'a str, WorkflowDetails<'a>>,
}

#[derive(Debug, Serialize)]
pub struct TopicDetails<'a> {
    pub name: &'a str,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct ModelDetails {
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct ActorDetails<'a> {
    pub name: String,
    pub class_name: &'a str,
    pub description: &'a str,
    pub produces: &'a [String],
    pub consumes: &'a [String],
    pub apis: &'a [String],
    pub tags: &'a [String],
    pub path: String,
    pub dialogs: &'a [Dialog],
}

#[derive(Debug, Serialize)]
pub struct TagDetails<'a> {
    pub actors: Vec<&'a str>,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct WorkflowDetails<'a> {
    pub name: &'a str,
    pub short_name: Option<&'a str>,
    pub description: &'a str,
    pub phases: &'a [String],
}

impl<'a> DiscoveryReport<'a> {
    pub fn new(repository: &'a Repository, all_repos: bool) -> Self {
        let base = repository.base_dir();

        let topics = repository
            .topics(all_repos)
            .into_iter()
            .map(|topic| {
                let details = TopicDetails {
                    name: &topic.name,
                    path: repo_relative(topic, base),
                };
                (topic.name.as_str(), details)
            })
            .collect();

        let models = repository
            .models(all_repos)
            .into_iter()
            .map(|model| {
                let details = ModelDetails {
                    path: repo_relative(model, base),
                };
                (model.name.as_str(), details)
            })
            .collect();

        let actors = repository
            .actors()
            .iter()
            .map(|actor| (actor.name.as_str(), actor_details(actor, base)))
            .collect();

        let tags = repository
            .tags(all_repos)
            .into_iter()
            .map(|tag| {
                let details = TagDetails {
                    actors: repository.actors_tagged(&tag.name),
                    name: &tag.name,
                };
                (tag.name.as_str(), details)
            })
            .collect();

        let workflows = repository
            .workflows(all_repos)
            .into_iter()
            .map(|workflow| (workflow.name.as_str(), workflow_details(workflow)))
            .collect();

        Self {
            repository: repository.name(),
            base_dir: base.display().to_string(),
            topics,
            models,
            actors,
            tags,
            workflows,
        }
    }

    /// Two-space indented JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(self).map_err(|err| {
            Error::serialization_failed(err.to_string())
                .with_operation("report::to_json")
                .set_source(err)
        })?;
        text.push('\n');
        Ok(text)
    }
}

fn repo_relative<E: Entity>(entity: &E, base: &Path) -> String {
    relative_path(&entity.location(), base).display().to_string()
}

fn actor_details<'a>(actor: &'a ActorEntry, base: &Path) -> ActorDetails<'a> {
    ActorDetails {
        name: actor.short_name(),
        class_name: &actor.name,
        description: &actor.description,
        produces: &actor.produces,
        consumes: &actor.consumes,
        apis: &actor.apis,
        tags: &actor.tags,
        path: repo_relative(actor, base),
        dialogs: &actor.dialogs,
    }
}

fn workflow_details(workflow: &WorkflowEntry) -> WorkflowDetails<'_> {
    WorkflowDetails {
        name: &workflow.name,
        short_name: workflow.short_name.as_deref(),
        description: &workflow.description,
        phases: &workflow.phases,
    }
}
