//! Picks the node constructor out of a definition unit.
//!
//! There is no magic export name: the first export whose declared return kind
//! is a node kind wins, in the unit's declaration order. Files with no such
//! export are valid and simply contribute nothing.

use crate::catalog::{NodeDraft, NodeKind, Registry, ReturnKind, Story};
use crate::error::{CatalogError, Result};
use crate::unit::{DefinitionUnit, Export};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NodePayload {
    title: String,
    #[serde(default)]
    registry: Option<Registry>,
    #[serde(default)]
    stories: Vec<Story>,
}

/// Every export that would construct a node, paired with its kind, in
/// declaration order.
pub fn qualifying_exports(unit: &DefinitionUnit) -> impl Iterator<Item = (&Export, NodeKind)> {
    unit.exports().iter().filter_map(|export| {
        export
            .returns
            .as_ref()
            .and_then(ReturnKind::node_kind)
            .map(|kind| (export, kind))
    })
}

/// Construct the node declared by `unit`, or `None` when it declares none.
///
/// Subjects also collect every `story` export of the same file, appended after
/// the stories listed inline.
pub fn extract(unit: &DefinitionUnit) -> Result<Option<NodeDraft>> {
    let Some((export, kind)) = qualifying_exports(unit).next() else {
        return Ok(None);
    };

    let payload: NodePayload = export.invoke().map_err(|err| CatalogError::InvalidDefinition {
        path: unit.location().to_path_buf(),
        reason: format!("export '{}' does not construct a {kind}: {err}", export.name),
    })?;
    if kind != NodeKind::Subject && !payload.stories.is_empty() {
        return Err(CatalogError::InvalidDefinition {
            path: unit.location().to_path_buf(),
            reason: format!(
                "export '{}' declares stories but only a subject holds stories",
                export.name
            ),
        });
    }

    let mut draft = NodeDraft {
        kind,
        title: payload.title,
        registry: payload.registry.map(Arc::new),
        stories: payload.stories,
    };
    if kind == NodeKind::Subject {
        draft.stories.extend(story_exports(unit)?);
    }
    Ok(Some(draft))
}

fn story_exports(unit: &DefinitionUnit) -> Result<Vec<Story>> {
    unit.exports()
        .iter()
        .filter(|export| export.returns == Some(ReturnKind::Story))
        .map(|export| {
            export.invoke().map_err(|err| CatalogError::InvalidDefinition {
                path: unit.location().to_path_buf(),
                reason: format!("export '{}' does not construct a story: {err}", export.name),
            })
        })
        .collect()
}
