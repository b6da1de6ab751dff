use serde_json::json;

use crate::{
    ChoiceOption, Clause, Dependency, FieldCommon, FieldConfig, FormConfig, GroupConfig,
    MatrixItem, MatrixScale, Operator, REQUIRED_MESSAGE, RuleAction, compile,
};

fn contact_config() -> FormConfig {
    FormConfig::new()
        .field(
            "name",
            FieldConfig::Text {
                common: FieldCommon::labeled("Name"),
                schema: json!({"type": "string", "minLength": 1}),
            },
        )
        .field(
            "contactMethod",
            FieldConfig::RadioGroup {
                common: FieldCommon::labeled("Contact method").with_dependencies(vec![
                    Dependency::new(
                        Clause::new("name", Operator::NotEquals, json!("")),
                        RuleAction::Require,
                    ),
                ]),
                options: vec![
                    ChoiceOption::new("Email", "email"),
                    ChoiceOption::new("Phone", "phone"),
                ],
                schema: json!({"enum": ["email", "phone"]}),
            },
        )
}

#[test]
fn round_trip_accepts_a_satisfying_value() {
    let compiled = compile(&contact_config()).expect("config compiles");
    let report = compiled.validate(&json!({"name": "Ben", "contactMethod": "email"}));
    assert!(report.is_valid(), "unexpected issues: {:?}", report.issues);
}

#[test]
fn conditional_requirement_fires_once_the_trigger_is_answered() {
    let compiled = compile(&contact_config()).expect("config compiles");
    let report = compiled.validate(&json!({"name": "Ben"}));
    assert_eq!(report.issue_count(), 1);
    let issue = &report.issues[0];
    assert_eq!(issue.path, "contactMethod");
    assert_eq!(issue.message, REQUIRED_MESSAGE);
    assert!(!report.has_issue_at("name"));
}

#[test]
fn empty_trigger_fails_its_own_schema_without_requiring_the_dependent() {
    let compiled = compile(&contact_config()).expect("config compiles");
    let report = compiled.validate(&json!({"name": ""}));
    assert!(report.has_issue_at("name"));
    // "name" equals "", so the not-equals rule does not fire
    assert!(!report.has_issue_at("contactMethod"));
}

#[test]
fn compilation_is_deterministic() {
    let first = compile(&contact_config()).expect("first compile");
    let second = compile(&contact_config()).expect("second compile");
    assert_eq!(first.schema_json(), second.schema_json());
    assert_eq!(first.partial_schema_json(), second.partial_schema_json());

    let samples = [
        json!({"name": "Ben", "contactMethod": "email"}),
        json!({"name": "Ben"}),
        json!({"name": ""}),
        json!({"contactMethod": "fax"}),
        json!({}),
    ];
    for sample in &samples {
        assert_eq!(
            first.validate(sample).issue_count(),
            second.validate(sample).issue_count()
        );
    }
}

#[test]
fn matrix_auto_schema_rejects_values_outside_the_scale() {
    let config = FormConfig::new().field(
        "feedback",
        FieldConfig::RatingMatrix {
            common: FieldCommon::labeled("Feedback"),
            items: vec![MatrixItem::new("item1", "Item one")],
            scales: vec![MatrixScale::new(
                "a",
                "Scale A",
                vec![ChoiceOption::new("One", 1), ChoiceOption::new("Two", 2)],
            )],
            schema: None,
        },
    );
    let compiled = compile(&config).expect("config compiles");

    let bad = compiled.validate(&json!({"feedback": {"item1": {"a": 3}}}));
    assert!(!bad.is_valid());

    let good = compiled.validate(&json!({"feedback": {"item1": {"a": 1}}}));
    assert!(good.is_valid(), "unexpected issues: {:?}", good.issues);
}

#[test]
fn ranking_auto_schema_rejects_repeats_and_strangers() {
    let config = FormConfig::new().field(
        "priorities",
        FieldConfig::Ranking {
            common: FieldCommon::labeled("Priorities"),
            options: vec![
                ChoiceOption::new("Speed", "speed"),
                ChoiceOption::new("Cost", "cost"),
            ],
            schema: None,
        },
    );
    let compiled = compile(&config).expect("config compiles");
    assert!(compiled.is_valid(&json!({"priorities": ["cost", "speed"]})));
    assert!(!compiled.is_valid(&json!({"priorities": ["cost", "cost"]})));
    assert!(!compiled.is_valid(&json!({"priorities": ["weight"]})));
}

#[test]
fn unrecognized_schema_value_fails_compilation_naming_the_field() {
    let config = FormConfig::new().field(
        "bio",
        FieldConfig::Text {
            common: FieldCommon::labeled("Bio"),
            schema: json!(42),
        },
    );
    let error = compile(&config).expect_err("compilation must fail");
    let rendered = format!("{error:#}");
    assert!(rendered.contains("bio"), "error does not name field: {rendered}");
    assert!(rendered.contains("not a recognized validator"));
}

#[test]
fn mismatched_schema_shape_fails_compilation() {
    let config = FormConfig::new().field(
        "tags",
        FieldConfig::CheckboxGroup {
            common: FieldCommon::labeled("Tags"),
            options: vec![ChoiceOption::new("A", "a")],
            schema: json!({"type": "string"}),
        },
    );
    let error = compile(&config).expect_err("compilation must fail");
    assert!(format!("{error:#}").contains("tags"));
}

#[test]
fn dependency_on_unknown_path_fails_compilation() {
    let config = FormConfig::new().field(
        "details",
        FieldConfig::Text {
            common: FieldCommon::labeled("Details").with_dependencies(vec![Dependency::new(
                Clause::new("missing.field", Operator::Equals, json!("x")),
                RuleAction::Hide,
            )]),
            schema: json!({"type": "string"}),
        },
    );
    let error = compile(&config).expect_err("compilation must fail");
    let rendered = format!("{error:#}");
    assert!(rendered.contains("missing.field"));
    assert!(rendered.contains("does not resolve"));
}

#[test]
fn partial_schema_makes_required_fields_optional() {
    let config = FormConfig::new().field(
        "name",
        FieldConfig::Text {
            common: FieldCommon::labeled("Name").required(),
            schema: json!({"type": "string", "minLength": 1}),
        },
    );
    let compiled = compile(&config).expect("config compiles");
    assert!(!compiled.validate(&json!({})).is_valid());
    assert!(compiled.validate_partial(&json!({})).is_valid());
    // present values are still checked in the partial pass
    assert!(!compiled.validate_partial(&json!({"name": ""})).is_valid());
}

#[test]
fn missing_required_fields_report_at_the_field_path() {
    let config = FormConfig::new()
        .field(
            "name",
            FieldConfig::Text {
                common: FieldCommon::labeled("Name").required(),
                schema: json!({"type": "string"}),
            },
        )
        .field(
            "contact",
            FieldConfig::Object(GroupConfig {
                label: "Contact".into(),
                description: None,
                offer_not_applicable: false,
                fields: [(
                    "email".to_string(),
                    FieldConfig::Text {
                        common: FieldCommon::labeled("Email").required(),
                        schema: json!({"type": "string"}),
                    },
                )]
                .into_iter()
                .collect(),
            }),
        );
    let compiled = compile(&config).expect("config compiles");

    let report = compiled.validate(&json!({"contact": {}}));
    assert!(report.has_issue_at("name"));
    assert!(report.has_issue_at("contact.email"));
    assert!(!report.has_issue_at(""));
    assert!(!report.has_issue_at("contact"));
}

#[test]
fn not_applicable_groups_accept_the_sentinel_on_every_child() {
    let config = FormConfig::new().field(
        "availability",
        FieldConfig::Object(GroupConfig {
            label: "Availability".into(),
            description: None,
            offer_not_applicable: true,
            fields: [
                (
                    "weekdays".to_string(),
                    FieldConfig::CheckboxGroup {
                        common: FieldCommon::labeled("Weekdays"),
                        options: vec![
                            ChoiceOption::new("Monday", "mon"),
                            ChoiceOption::new("Tuesday", "tue"),
                        ],
                        schema: json!({"type": "array", "items": {"enum": ["mon", "tue"]}}),
                    },
                ),
                (
                    "notes".to_string(),
                    FieldConfig::Text {
                        common: FieldCommon::labeled("Notes"),
                        schema: json!({"type": "string"}),
                    },
                ),
            ]
            .into_iter()
            .collect(),
        }),
    );
    let compiled = compile(&config).expect("config compiles");

    let stamped = json!({
        "availability": {"weekdays": "not_applicable", "notes": "not_applicable"}
    });
    assert!(compiled.is_valid(&stamped));

    let answered = json!({"availability": {"weekdays": ["mon"], "notes": "mornings"}});
    assert!(compiled.is_valid(&answered));

    let stranger = json!({"availability": {"weekdays": "whenever"}});
    assert!(!compiled.is_valid(&stranger));
}

#[test]
fn nested_groups_mirror_the_config_tree() {
    let config = FormConfig::new().field(
        "contact",
        FieldConfig::Object(GroupConfig {
            label: "Contact".into(),
            description: None,
            offer_not_applicable: false,
            fields: [(
                "email".to_string(),
                FieldConfig::Text {
                    common: FieldCommon::labeled("Email").required(),
                    schema: json!({"type": "string", "format": "email"}),
                },
            )]
            .into_iter()
            .collect(),
        }),
    );
    let compiled = compile(&config).expect("config compiles");
    let schema = compiled.schema_json();
    assert_eq!(
        schema["properties"]["contact"]["properties"]["email"]["type"],
        json!("string")
    );
    assert_eq!(
        schema["properties"]["contact"]["required"],
        json!(["email"])
    );
}
