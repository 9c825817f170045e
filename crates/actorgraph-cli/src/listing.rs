//! Human-readable listing of everything a repository declares.

use std::fmt::Write;
use std::path::Path;

use crate::repository::{Entity, Repository, relative_path};

pub fn write_header(output: &mut String, name: &str, base_dir: &Path) {
    let _ = write!(
        output,
        "Repository:\n  Name: {}\n  Path: {}\n\n",
        name,
        base_dir.display()
    );
}

/// `Group(n):` followed by one line per item, sorted by name.
///
/// Paths are shown relative to `cwd`.
pub fn write_group<E: Entity>(output: &mut String, group: &str, items: &[&E], cwd: &Path) {
    let _ = writeln!(output, "{}({}):", group, items.len());

    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| a.name().cmp(b.name()));

    for item in sorted {
        let path = relative_path(&item.location(), cwd);
        let _ = writeln!(output, "   - {:<35} {}", item.name(), path.display());
    }
    output.push('\n');
}

pub fn render_listing(repository: &Repository, all_repos: bool, cwd: &Path) -> String {
    let mut output = String::new();
    write_header(&mut output, repository.name(), repository.base_dir());

    let actors: Vec<_> = repository.actors().iter().collect();
    write_group(&mut output, "Actors", &actors, cwd);
    write_group(&mut output, "Models", &repository.models(all_repos), cwd);
    write_group(&mut output, "Tags", &repository.tags(all_repos), cwd);
    write_group(&mut output, "Topics", &repository.topics(all_repos), cwd);
    write_group(&mut output, "Workflows", &repository.workflows(all_repos), cwd);

    output
}
