//! Refs command: show the references of a single form

use anyhow::{bail, Result};

use super::output::Output;
use crate::domain::extract_references;
use crate::storage::Project;

/// Prints the forms referenced by one form in the bundle
pub fn run(output: &Output, form_id: &str) -> Result<()> {
    let project = Project::open_current()?;
    let bundle = project.load_bundle()?;

    let form = match bundle.get(form_id) {
        Some(form) => form,
        None => bail!("No form '{}' in {}", form_id, project.forms_dir().display()),
    };

    let refs = extract_references(form);
    output.verbose_ctx("refs", &format!("Found {} references", refs.len()));

    if output.is_json() {
        let items: Vec<_> = refs
            .iter()
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "internal": bundle.get(id).is_some(),
                })
            })
            .collect();
        output.data(&items);
    } else if refs.is_empty() {
        output.line(&format!("{} references no other forms.", form_id));
    } else {
        output.line(&format!("{} references {} forms:", form_id, refs.len()));
        for id in &refs {
            let location = if bundle.get(id).is_some() {
                "in bundle"
            } else {
                "external"
            };
            output.line(&format!("  {} ({})", id, location));
        }
    }

    Ok(())
}
