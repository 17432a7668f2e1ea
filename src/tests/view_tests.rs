//! View compilation and rendering

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::sync::Arc;

    use crate::core::factory::BlockFactory;
    use crate::core::options::Options;
    use crate::core::view::{Vars, ViewRef};
    use crate::core::Data;
    use crate::render::{BlockRenderer, RendererEngine};
    use crate::tests::example_types::*;

    #[test]
    fn test_ids_and_names() {
        let factory = factory();
        let mut user = object_block(&factory, "user", &[("name", "text"), ("age", "integer")]);
        user.set_data(json!({"name": "Ada", "age": 36})).unwrap();
        let view = user.create_view();
        assert_eq!(view.len(), 3);

        let root = view.root();
        assert!(root.is_root());
        assert_eq!(root.var_str("id"), Some("user"));
        assert_eq!(root.var_str("full_name"), Some("user"));
        assert_eq!(root.var("compound"), Some(&json!(true)));

        let name = root.child("name").unwrap();
        assert_eq!(name.var_str("id"), Some("user_name"));
        assert_eq!(name.var_str("full_name"), Some("user[name]"));
        assert_eq!(name.var_str("value"), Some("Ada"));
        assert_eq!(name.var_str("type"), Some("text"));

        let age = root.child("age").unwrap();
        assert_eq!(age.var("value"), Some(&json!("36")));
        assert_eq!(age.var("data"), Some(&json!(36)));
        assert_eq!(age.var_str("type"), Some("number"));
    }

    #[test]
    fn test_block_prefixes() {
        let factory = factory();
        let user = object_block(&factory, "user", &[("name", "text")]);
        let view = user.create_view();
        let name = view.root().child("name").unwrap();

        assert_eq!(
            name.var("block_prefixes"),
            Some(&json!(["block", "field", "text", "_user_name"]))
        );
        assert_eq!(name.var_str("unique_block_prefix"), Some("_user_name"));
        assert_eq!(
            view.root().var("block_prefixes"),
            Some(&json!(["block", "object", "_user"]))
        );
    }

    #[test]
    fn test_parent_links() {
        let factory = factory();
        let mut builder = object_builder(&factory, "user", &[("name", "text")]);
        builder
            .add(object_builder(&factory, "address", &[("city", "text")]))
            .unwrap();
        let mut user = builder.get_block().unwrap();
        user.initialize().unwrap();
        let view = user.create_view();

        let city = view.root().child("address").unwrap().child("city").unwrap();
        assert_eq!(city.var_str("id"), Some("user_address_city"));
        assert_eq!(city.var_str("full_name"), Some("user[address][city]"));
        assert_eq!(city.parent().unwrap().name(), "address");
        let ancestors: Vec<&str> = city.ancestors().map(|v| v.name()).collect();
        assert_eq!(ancestors, vec!["address", "user"]);

        let children: Vec<&str> = view.root().children().map(|v| v.name()).collect();
        assert_eq!(children, vec!["name", "address"]);
        assert_eq!(view.get(city.id()).unwrap().name(), "city");
    }

    #[test]
    fn test_labels() {
        let factory = factory();
        let mut builder = object_builder(&factory, "user", &[("first_name", "text")]);
        builder
            .add_child("nick", "text", Options::new().with("label", "Nickname"))
            .unwrap();
        let mut user = builder.get_block().unwrap();
        user.initialize().unwrap();
        let view = user.create_view();

        assert_eq!(view.root().child("first_name").unwrap().var_str("label"), Some("First name"));
        assert_eq!(view.root().child("nick").unwrap().var_str("label"), Some("Nickname"));
    }

    /// Errors and validity reach the view after a failed bind
    #[test]
    fn test_errors_in_view() {
        let factory = factory();
        let mut user = object_block(&factory, "user", &[("age", "integer")]);
        user.bind(json!({"age": "abc"})).unwrap();
        let view = user.create_view();

        let age = view.root().child("age").unwrap();
        assert_eq!(age.var("valid"), Some(&json!(false)));
        let errors = age.var("errors").and_then(Data::as_array).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(view.root().var("valid"), Some(&json!(false)));
        assert_eq!(view.root().var("errors"), Some(&json!([])));
    }

    /// Extensions write after their type; finish_view sees every child
    #[test]
    fn test_view_hooks() {
        let log = new_log();
        let factory = BlockFactory::builder()
            .add_type(RecordingType {
                name: "card",
                parent: Some("object"),
                label: "Card",
                log: Arc::clone(&log),
            })
            .add_type_extension(RecordingExtension {
                target: "card",
                label: "card-ext",
                log: Arc::clone(&log),
            })
            .build();
        let mut builder = factory
            .create_named_builder("c", "card", Data::Null, Options::new())
            .unwrap();
        builder.add_child("title", "text", Options::new()).unwrap();
        builder.add_child("body", "text", Options::new()).unwrap();
        let mut card = builder.get_block().unwrap();
        card.initialize().unwrap();

        let view = card.create_view();
        let root = view.root();
        assert_eq!(root.var_str("written_by"), Some("card-ext"));
        assert_eq!(root.var("finished_children"), Some(&json!(2)));
        assert_eq!(root.var_str("label"), Some("Card"));
        assert_eq!(
            root.var("block_prefixes"),
            Some(&json!(["block", "object", "card", "_c"]))
        );

        let hooks: Vec<String> = entries(&log)
            .into_iter()
            .filter(|e| e.starts_with("view:") || e.starts_with("finish:"))
            .collect();
        assert_eq!(hooks, vec!["view:card", "finish:card"]);
    }

    struct FakeEngine {
        blocks: Vec<&'static str>,
    }

    impl RendererEngine for FakeEngine {
        fn has_block(&self, _view: ViewRef<'_>, block_name: &str) -> bool {
            self.blocks.iter().any(|known| *known == block_name)
        }

        fn render_block(&self, view: ViewRef<'_>, block_name: &str, variables: &Vars) -> anyhow::Result<String> {
            let label = variables.get("label").and_then(Data::as_str).unwrap_or_default();
            Ok(format!("{block_name}({}):{label}", view.name()))
        }
    }

    #[test]
    fn test_renderer_picks_most_specific_block() {
        let factory = factory();
        let user = object_block(&factory, "user", &[("name", "text")]);
        let view = user.create_view();
        let name = view.root().child("name").unwrap();

        let renderer = BlockRenderer::new(FakeEngine {
            blocks: vec!["block_widget", "text_widget", "block_label"],
        });
        assert_eq!(renderer.widget(name, Vars::new()).unwrap(), "text_widget(name):Name");
        assert_eq!(renderer.label(name, Vars::new()).unwrap(), "block_label(name):Name");

        let renderer = BlockRenderer::new(FakeEngine {
            blocks: vec!["text_widget", "_user_name_widget"],
        });
        assert_eq!(renderer.widget(name, Vars::new()).unwrap(), "_user_name_widget(name):Name");
    }

    #[test]
    fn test_renderer_layers_variables() {
        let factory = factory();
        let user = object_block(&factory, "user", &[("name", "text")]);
        let view = user.create_view();
        let name = view.root().child("name").unwrap();
        let renderer = BlockRenderer::new(FakeEngine {
            blocks: vec!["block_row"],
        });

        let mut vars = Vars::new();
        vars.insert("label".to_string(), json!("Your name"));
        assert_eq!(renderer.row(name, vars).unwrap(), "block_row(name):Your name");
        assert_eq!(name.var_str("label"), Some("Name"));
    }

    #[test]
    fn test_renderer_reports_missing_blocks() {
        let factory = factory();
        let user = object_block(&factory, "user", &[("name", "text")]);
        let view = user.create_view();
        let renderer = BlockRenderer::new(FakeEngine { blocks: vec![] });

        let err = renderer
            .search_and_render(view.root().child("name").unwrap(), "help", Vars::new())
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("_user_name_help"));
        assert!(message.contains("block_help"));
    }
}
