//! Embedded JSON Schema for definition files.
//!
//! The schema ships inside the binary so resolution never depends on the
//! working directory. Validation runs before decoding so authors get every
//! structural problem at once instead of the first serde error.

use anyhow::{Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;

const DEFINITION_SCHEMA: &str = include_str!("../../schema/definition.schema.json");

/// Version tag definition files may declare in `schema_version`.
pub const DEFINITION_SCHEMA_VERSION: &str = "storytime_definition_v1";

pub(crate) struct DefinitionSchema {
    compiled: JSONSchema,
}

impl DefinitionSchema {
    pub(crate) fn embedded() -> Result<Self> {
        let raw: Value = serde_json::from_str(DEFINITION_SCHEMA)
            .map_err(|err| anyhow!("parsing embedded definition schema: {err}"))?;
        let declared = raw
            .pointer("/properties/schema_version/const")
            .and_then(Value::as_str);
        if declared != Some(DEFINITION_SCHEMA_VERSION) {
            bail!(
                "embedded definition schema declares {:?}, expected {}",
                declared,
                DEFINITION_SCHEMA_VERSION
            );
        }
        let compiled = JSONSchema::compile(&raw)
            .map_err(|err| anyhow!("compiling embedded definition schema: {err}"))?;
        Ok(Self { compiled })
    }

    /// Check `instance` against the schema, reporting every violation.
    pub(crate) fn validate(&self, instance: &Value) -> Result<()> {
        if let Err(errors) = self.compiled.validate(instance) {
            let details = errors
                .map(|err| {
                    let pointer = err.instance_path.to_string();
                    if pointer.is_empty() {
                        err.to_string()
                    } else {
                        format!("{pointer}: {err}")
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            bail!("failed schema validation:\n{details}");
        }
        Ok(())
    }
}
