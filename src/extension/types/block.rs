//! Root block type
//!
//! Every built-in type descends from `block`. It declares the options shared
//! by all blocks, configures the data pipeline of the builder and sets the
//! view variables the renderer relies on (`id`, `full_name`,
//! `block_prefixes`, ...).

use serde_json::json;
use std::sync::Arc;

use crate::core::block::Block;
use crate::core::block_type::BlockType;
use crate::core::builder::BlockBuilder;
use crate::core::error::BlockError;
use crate::core::mapper::DataMapper;
use crate::core::options::{Options, OptionsResolver, ValueKind};
use crate::core::property_path::PropertyPath;
use crate::core::view::ViewMut;
use crate::core::Data;
use crate::extension::data_mapper::PropertyPathMapper;

/// Root type of the core extension
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseBlockType;

impl BlockType for BaseBlockType {
    fn name(&self) -> &str {
        "block"
    }

    fn configure_options(&self, resolver: &mut OptionsResolver) {
        resolver
            .set_default("data", Data::Null)
            .set_default("data_class", Data::Null)
            .set_allowed_kinds("data_class", &[ValueKind::Null, ValueKind::String])
            .set_default("mapped", true)
            .set_allowed_kinds("mapped", &[ValueKind::Bool])
            .set_default("property_path", Data::Null)
            .set_allowed_kinds("property_path", &[ValueKind::Null, ValueKind::String])
            .set_default("compound", true)
            .set_allowed_kinds("compound", &[ValueKind::Bool])
            .set_default("empty_data", Data::Null)
            .set_normalizer("empty_data", |options, value| {
                Ok(match value {
                    Data::Null if options.get_bool("compound").unwrap_or(false) => json!({}),
                    other => other,
                })
            })
            .set_default("required", true)
            .set_allowed_kinds("required", &[ValueKind::Bool])
            .set_default("label", Data::Null)
            .set_allowed_kinds("label", &[ValueKind::Null, ValueKind::String])
            .set_default("attr", json!({}))
            .set_allowed_kinds("attr", &[ValueKind::Object])
            .set_default("block_name", Data::Null)
            .set_allowed_kinds("block_name", &[ValueKind::Null, ValueKind::String])
            .set_default("allowed_children", Data::Null)
            .set_allowed_kinds("allowed_children", &[ValueKind::Null, ValueKind::Array]);
    }

    fn build_block(&self, builder: &mut BlockBuilder, options: &Options) -> Result<(), BlockError> {
        let compound = options.get_bool("compound").unwrap_or(true);
        let property_path = options
            .get_str("property_path")
            .map(PropertyPath::parse)
            .transpose()?;
        let allowed_children = options
            .get("allowed_children")
            .and_then(Data::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Data::as_str)
                    .map(str::to_string)
                    .collect()
            });
        let data = options.value("data");

        builder
            .set_compound(compound)
            .set_mapped(options.get_bool("mapped").unwrap_or(true))
            .set_property_path(property_path)
            .set_data_locked(!data.is_null())
            .set_data(data)
            .set_data_class(options.get_str("data_class").map(str::to_string))
            .set_empty_data(options.value("empty_data"))
            .set_allowed_children(allowed_children)
            .set_data_mapper(if compound {
                Some(Arc::new(PropertyPathMapper) as Arc<dyn DataMapper>)
            } else {
                None
            });
        Ok(())
    }

    fn build_view(&self, view: &mut ViewMut<'_>, block: &Block, options: &Options) {
        let name = block.name();
        let (id, full_name) = match view.parent() {
            Some(parent) => (
                format!("{}_{name}", parent.var_str("id").unwrap_or_default()),
                format!("{}[{name}]", parent.var_str("full_name").unwrap_or_default()),
            ),
            None => (name.to_string(), name.to_string()),
        };

        let block_name = options.get_str("block_name").unwrap_or(name).to_string();
        let mut prefixes: Vec<Data> = block
            .config()
            .resolved_type()
            .type_names()
            .into_iter()
            .map(Data::from)
            .collect();
        let unique_prefix = format!("_{id}");
        prefixes.push(Data::from(unique_prefix.as_str()));

        let label = match options.get_str("label") {
            Some(label) => Data::from(label),
            None => Data::from(humanize(name)),
        };
        let errors: Vec<Data> = block
            .transformation_failure()
            .map(|err| Data::from(err.root_cause().to_string()))
            .into_iter()
            .collect();

        view.set("id", id)
            .set("name", name)
            .set("full_name", full_name)
            .set("block_name", block_name)
            .set("value", block.view_data().clone())
            .set("data", block.norm_data().clone())
            .set("label", label)
            .set("attr", options.value("attr"))
            .set("compound", block.is_compound())
            .set("required", options.get_bool("required").unwrap_or(true))
            .set("valid", block.is_valid())
            .set("errors", errors)
            .set("block_prefixes", prefixes)
            .set("unique_block_prefix", unique_prefix);
    }
}

/// `first_name` → `First name`
pub fn humanize(name: &str) -> String {
    let spaced = name.replace(['_', '-'], " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
