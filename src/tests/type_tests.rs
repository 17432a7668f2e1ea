//! Type resolution, option schemas and builder assembly

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::sync::Arc;

    use crate::core::block_type::BlockType;
    use crate::core::builder::BlockBuilder;
    use crate::core::error::{BlockError, ErrorKind};
    use crate::core::factory::BlockFactory;
    use crate::core::mapper::DataMapper;
    use crate::core::options::{Options, OptionsResolver};
    use crate::core::Data;
    use crate::extension::data_mapper::WrapperMapper;
    use crate::tests::example_types::*;

    fn recording_factory(log: &Log) -> BlockFactory {
        BlockFactory::builder()
            .add_type(RecordingType {
                name: "base_t",
                parent: None,
                label: "base",
                log: Arc::clone(log),
            })
            .add_type(RecordingType {
                name: "child_t",
                parent: Some("base_t"),
                label: "child",
                log: Arc::clone(log),
            })
            .add_type_extension(RecordingExtension {
                target: "child_t",
                label: "child-ext-1",
                log: Arc::clone(log),
            })
            .add_type_extension(RecordingExtension {
                target: "base_t",
                label: "base-ext",
                log: Arc::clone(log),
            })
            .add_type_extension(RecordingExtension {
                target: "child_t",
                label: "child-ext-2",
                log: Arc::clone(log),
            })
            .build()
    }

    /// Later levels override earlier ones: root type, its extensions, then
    /// the leaf type and its extensions in registration order
    #[test]
    fn test_option_precedence_root_to_leaf() {
        let log = new_log();
        let factory = recording_factory(&log);
        let registry = factory.registry();

        let base = registry.resolve("base_t").unwrap();
        assert_eq!(base.options_resolver().default_value("label"), Some(&json!("base-ext")));

        let child = registry.resolve("child_t").unwrap();
        assert_eq!(child.options_resolver().default_value("label"), Some(&json!("child-ext-2")));
        assert_eq!(child.type_extensions().len(), 2);
        assert!(child.is_type_of("base_t"));
        assert!(!base.is_type_of("child_t"));
    }

    /// build_block hooks run parent first, each type before its extensions
    #[test]
    fn test_build_hook_order() {
        let log = new_log();
        let factory = recording_factory(&log);

        factory
            .create_named_builder("x", "child_t", Data::Null, Options::new())
            .unwrap();
        assert_eq!(
            entries(&log),
            vec!["build:base_t", "build:base-ext", "build:child_t", "build:child-ext-1", "build:child-ext-2"]
        );
    }

    /// Repeated resolution returns the cached snapshot
    #[test]
    fn test_resolution_is_stable() {
        let factory = factory();
        let a = factory.registry().resolve("collection").unwrap();
        let b = factory.registry().resolve("collection").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.type_names(), vec!["block", "collection"]);
        assert_eq!(
            a.options_resolver().defined_options().collect::<Vec<_>>(),
            b.options_resolver().defined_options().collect::<Vec<_>>()
        );
    }

    /// Unknown types are configuration errors
    #[test]
    fn test_unknown_type() {
        let err = factory()
            .create("no_such_type", Data::Null, Options::new())
            .unwrap_err();
        assert!(matches!(err, BlockError::InvalidArgument(_)));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    /// Options outside the merged schema are rejected before the block exists
    #[test]
    fn test_unknown_option() {
        let err = factory()
            .create("text", Data::Null, Options::new().with("colour", "red"))
            .unwrap_err();
        match err {
            BlockError::UnknownOption { option, known } => {
                assert_eq!(option, "colour");
                assert!(known.contains("trim"));
                assert!(known.contains("label"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    /// Option values are validated against their declared kinds
    #[test]
    fn test_invalid_option_kind() {
        let err = factory()
            .create("text", Data::Null, Options::new().with("required", "yes"))
            .unwrap_err();
        assert!(matches!(err, BlockError::InvalidOption { ref option, .. } if option == "required"));

        let err = factory()
            .create("date", Data::Null, Options::new().with("widget", "calendar"))
            .unwrap_err();
        assert!(matches!(err, BlockError::InvalidOption { ref option, .. } if option == "widget"));
    }

    /// Required options without a default must be supplied
    #[test]
    fn test_missing_required_option() {
        struct Needy;
        impl BlockType for Needy {
            fn name(&self) -> &str {
                "needy"
            }
            fn parent(&self) -> Option<&str> {
                Some("field")
            }
            fn configure_options(&self, resolver: &mut OptionsResolver) {
                resolver.set_required("source");
            }
        }

        let factory = BlockFactory::builder().add_type(Needy).build();
        let err = factory.create("needy", Data::Null, Options::new()).unwrap_err();
        assert!(matches!(err, BlockError::MissingOption { ref option } if option == "source"));
        assert!(factory
            .create("needy", Data::Null, Options::new().with("source", "db"))
            .is_ok());
    }

    /// A child outside the allowed set fails with both blocks and types named
    #[test]
    fn test_invalid_child() {
        let factory = factory();
        let mut builder = factory
            .create_named_builder(
                "profile",
                "object",
                Data::Null,
                Options::new().with("allowed_children", json!(["text"])),
            )
            .unwrap();
        builder.add_child("bio", "text", Options::new()).unwrap();
        builder.add_child("age", "integer", Options::new()).unwrap();

        let err = builder.get_block().unwrap_err();
        match &err {
            BlockError::InvalidChild {
                parent,
                parent_type,
                child,
                child_type,
            } => {
                assert_eq!(parent, "profile");
                assert_eq!(parent_type, "object");
                assert_eq!(child, "age");
                assert_eq!(child_type, "integer");
            }
            other => panic!("unexpected error {other:?}"),
        }
        let message = err.to_string();
        assert!(message.contains("profile") && message.contains("age"));
    }

    /// Allowed children match descendants of an allowed type
    #[test]
    fn test_allowed_children_accept_descendants() {
        let factory = factory();
        let mut builder = factory
            .create_named_builder(
                "profile",
                "object",
                Data::Null,
                Options::new().with("allowed_children", json!(["field"])),
            )
            .unwrap();
        builder.add_child("bio", "text", Options::new()).unwrap();
        builder.add_child("age", "integer", Options::new()).unwrap();
        assert_eq!(builder.get_block().unwrap().child_count(), 2);
    }

    /// Compound blocks need exactly one mapper, leaves none
    #[test]
    fn test_mapper_presence_matches_compound() {
        let factory = factory();

        let mut builder = factory
            .create_named_builder("box", "object", Data::Null, Options::new())
            .unwrap();
        builder.set_data_mapper(None);
        assert!(matches!(builder.get_block(), Err(BlockError::InvalidArgument(_))));

        let mut builder = factory
            .create_named_builder("title", "text", Data::Null, Options::new())
            .unwrap();
        builder.set_data_mapper(Some(Arc::new(WrapperMapper) as Arc<dyn DataMapper>));
        assert!(matches!(builder.get_block(), Err(BlockError::InvalidArgument(_))));
    }

    /// Leaves do not accept children
    #[test]
    fn test_non_compound_builder_rejects_children() {
        let factory = factory();
        let mut builder = factory
            .create_named_builder("title", "text", Data::Null, Options::new())
            .unwrap();
        let err = builder.add_child("x", "text", Options::new()).unwrap_err();
        assert!(matches!(err, BlockError::BadMethodCall(_)));
    }

    /// Builder children can be inspected and removed before freezing
    #[test]
    fn test_builder_child_management() {
        let factory = factory();
        let mut builder: BlockBuilder = object_builder(&factory, "user", &[("name", "text"), ("age", "integer")]);
        assert!(builder.has("name"));
        assert_eq!(builder.get("age").unwrap().resolved_type().name(), "integer");
        builder.remove("name");
        assert!(!builder.has("name"));
        builder
            .get_mut("age")
            .unwrap()
            .set_attribute("hint", "years");

        let block = builder.get_block().unwrap();
        assert_eq!(block.child_names().collect::<Vec<_>>(), vec!["age"]);
        assert_eq!(block.get("age").unwrap().config().attribute("hint"), Some(&json!("years")));
    }

    /// Block names are restricted to a safe character set
    #[test]
    fn test_invalid_block_name() {
        let err = factory()
            .create_named("first.name", "text", Data::Null, Options::new())
            .unwrap_err();
        assert!(matches!(err, BlockError::InvalidArgument(_)));
    }

    /// Unnamed blocks get unique generated names
    #[test]
    fn test_generated_names_are_unique() {
        let factory = factory();
        let a = factory.create("text", Data::Null, Options::new()).unwrap();
        let b = factory.create("text", Data::Null, Options::new()).unwrap();
        assert!(a.name().starts_with("block_"));
        assert_ne!(a.name(), b.name());
    }

    /// add_child and remove_child hooks of type extensions run on the block
    #[test]
    fn test_child_hooks() {
        let log = new_log();
        let factory = BlockFactory::builder()
            .add_type_extension(GuardExtension { log: Arc::clone(&log) })
            .build();
        let mut block = object_block(&factory, "user", &[("name", "text")]);

        let forbidden = factory
            .create_named("forbidden", "text", Data::Null, Options::new())
            .unwrap();
        assert!(block.add(forbidden).is_err());
        assert!(!block.has("forbidden"));

        block.remove("name").unwrap();
        assert_eq!(entries(&log), vec!["add:name", "remove:name"]);
    }
}
