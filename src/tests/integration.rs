//! End-to-end scenarios: definitions, built-in types and views together

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::core::block::Block;
    use crate::core::factory::BlockDefinition;
    use crate::core::options::Options;
    use crate::core::Data;
    use crate::tests::example_types::*;

    fn signup_definition() -> BlockDefinition {
        serde_json::from_value(json!({
            "name": "signup",
            "type": "object",
            "children": [
                {"name": "email", "type": "text", "options": {"label": "E-mail"}},
                {"name": "age", "type": "integer"},
                {"name": "birthday", "type": "date", "options": {"widget": "parts"}},
                {"name": "tags", "type": "collection", "options": {"allow_add": true, "allow_delete": true}},
                {"name": "agree", "type": "checkbox", "options": {"mapped": false}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_definition_serde() {
        let definition = signup_definition();
        assert_eq!(definition.children.len(), 5);
        assert_eq!(definition.children[2].options.get_str("widget"), Some("parts"));

        let value = serde_json::to_value(&definition).unwrap();
        assert_eq!(value["children"][0]["type"], json!("text"));
        assert!(value["children"][1].get("children").is_none());
        let back: BlockDefinition = serde_json::from_value(value).unwrap();
        assert_eq!(back, definition);

        let built = BlockDefinition::new("signup", "object")
            .with_child(BlockDefinition::new("email", "text").with_options(Options::new().with("label", "E-mail")));
        assert_eq!(built.children[0], definition.children[0]);
    }

    #[test]
    fn test_signup_round_trip() {
        let factory = factory();
        let mut signup = factory.create_from_definition(&signup_definition()).unwrap();
        assert_eq!(signup.child_count(), 5);
        assert_eq!(signup.get("birthday").unwrap().child_count(), 3);

        signup
            .set_data(json!({
                "email": "ada@example.com",
                "age": 36,
                "birthday": "1815-12-10",
                "tags": ["math"]
            }))
            .unwrap();
        let birthday = signup.get("birthday").unwrap();
        assert_eq!(birthday.view_data(), &json!({"year": 1815, "month": 12, "day": 10}));
        assert_eq!(birthday.get("month").unwrap().view_data(), &json!("12"));
        assert_eq!(signup.get("tags").unwrap().child_count(), 1);

        signup
            .bind(json!({
                "email": " ada@lovelace.org ",
                "age": "37",
                "birthday": {"year": "1815", "month": "12", "day": "11"},
                "tags": ["math", "engines"],
                "agree": "1"
            }))
            .unwrap();

        assert!(signup.errors().is_empty());
        assert!(signup.is_valid());
        assert_eq!(
            signup.data(),
            &json!({
                "email": "ada@lovelace.org",
                "age": 37,
                "birthday": "1815-12-11",
                "tags": ["math", "engines"]
            })
        );
        assert_eq!(signup.get("agree").unwrap().data(), &json!(true));
    }

    #[test]
    fn test_signup_view() {
        let factory = factory();
        let mut signup = factory.create_from_definition(&signup_definition()).unwrap();
        signup.set_data(json!({"birthday": "2000-01-31", "tags": ["a", "b"]})).unwrap();

        let view = signup.create_view();
        // signup, 5 children, 3 date parts, 2 tags
        assert_eq!(view.len(), 11);
        let root = view.root();
        assert_eq!(root.child("email").unwrap().var_str("label"), Some("E-mail"));

        let year = root.child("birthday").unwrap().child("year").unwrap();
        assert_eq!(year.var_str("full_name"), Some("signup[birthday][year]"));
        assert_eq!(year.var_str("value"), Some("2000"));

        let tags = root.child("tags").unwrap();
        assert_eq!(tags.var("allow_add"), Some(&json!(true)));
        assert_eq!(tags.child("1").unwrap().var_str("id"), Some("signup_tags_1"));
        assert_eq!(root.child("agree").unwrap().var("checked"), Some(&json!(false)));
    }

    /// An incomplete date is a bind failure of the date block only
    #[test]
    fn test_partial_date_fails() {
        let factory = factory();
        let mut signup = factory.create_from_definition(&signup_definition()).unwrap();
        signup.set_data(json!({"email": "a@b.c", "birthday": "2000-01-31"})).unwrap();

        signup
            .bind(json!({"email": "a@b.c", "birthday": {"year": "2000", "month": "", "day": "2"}}))
            .unwrap();
        let errors = signup.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "signup.birthday");
        assert_eq!(signup.data()["birthday"], json!("2000-01-31"));
    }

    fn date(options: Options) -> Block {
        factory()
            .create_named("when", "date", Data::Null, options)
            .unwrap()
    }

    #[test]
    fn test_single_text_date_format() {
        let mut when = date(Options::new().with("format", "%d/%m/%Y"));
        assert!(!when.is_compound());

        when.set_data(json!("2024-03-09")).unwrap();
        assert_eq!(when.view_data(), &json!("09/03/2024"));

        when.bind(json!("10/04/2024")).unwrap();
        assert_eq!(when.data(), &json!("2024-04-10"));

        when.set_data(json!("2024-03-09")).unwrap();
        when.bind(json!("2024-04-10")).unwrap();
        assert!(!when.is_synchronized());
        assert_eq!(when.data(), &json!("2024-03-09"));
    }

    #[test]
    fn test_checkbox() {
        let factory = factory();
        let mut agree = factory
            .create_named("agree", "checkbox", Data::Null, Options::new().with("value", "yes"))
            .unwrap();
        assert_eq!(agree.view_data(), &Data::Null);

        agree.bind(json!("yes")).unwrap();
        assert_eq!(agree.data(), &json!(true));

        agree.set_data(json!(true)).unwrap();
        assert_eq!(agree.view_data(), &json!("yes"));
        agree.bind(Data::Null).unwrap();
        assert_eq!(agree.data(), &json!(false));
    }

    /// Options can be read back from every level of the built tree
    #[test]
    fn test_resolved_options_are_complete() {
        let factory = factory();
        let signup = factory.create_from_definition(&signup_definition()).unwrap();
        let tags = signup.get("tags").unwrap();
        let options = tags.config().options();
        assert_eq!(options.get_str("entry_type"), Some("text"));
        assert_eq!(options.get("empty_data"), Some(&json!([])));
        assert_eq!(signup.config().options().get("empty_data"), Some(&json!({})));
        assert_eq!(signup.get("agree").unwrap().config().options().get_bool("required"), Some(false));
    }
}
