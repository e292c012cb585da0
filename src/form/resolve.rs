//! Widget selection: a pure function of the field descriptor, the render
//! options and the read-only flag.

use serde_json::Value;

use super::choices::{as_choices, option_text, record_label, Choice};
use super::descriptor::FieldDescriptor;
use super::display::{format_date, format_datetime, format_time};
use super::error::FieldError;
use super::options::RenderOptions;
use super::widget::{Checkable, GridLayout, Widget};
use crate::config::FormboxConfig;
use crate::record::{is_truthy, value_to_string, Record};
use crate::schema::TypeTag;

/// Resolve the widget for a field with default settings.
pub fn resolve(
    desc: &FieldDescriptor,
    opts: &RenderOptions,
    read_only: bool,
) -> Result<Widget, FieldError> {
    resolve_with(desc, opts, read_only, &FormboxConfig::default())
}

/// Resolve the widget for a field.
///
/// `read_only` is the form-level flag; `opts.read_only` makes a single
/// field read-only. `binary` fields fail in both modes.
pub fn resolve_with(
    desc: &FieldDescriptor,
    opts: &RenderOptions,
    read_only: bool,
    config: &FormboxConfig,
) -> Result<Widget, FieldError> {
    if desc.declared_type == TypeTag::Binary {
        return Err(FieldError::UnsupportedFieldType {
            field: desc.name.clone(),
            ty: TypeTag::Binary,
        });
    }
    if let Some(kind) = desc.relation_kind() {
        if kind.type_tag().is_none() {
            return Err(FieldError::UnsupportedRelationKind {
                field: desc.name.clone(),
                kind,
            });
        }
    }

    // Explicit choices win over the descriptor's candidate set.
    let choices = opts
        .choices
        .as_ref()
        .map(|c| as_choices(c, opts.show.as_deref(), &config.showers))
        .or_else(|| desc.choices.clone());

    if read_only || opts.read_only {
        constant_widget(desc, opts, choices.as_deref(), config)
    } else {
        input_widget(desc, opts, choices, config)
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn input_widget(
    desc: &FieldDescriptor,
    opts: &RenderOptions,
    choices: Option<Vec<Choice>>,
    config: &FormboxConfig,
) -> Result<Widget, FieldError> {
    let current = value_to_string(&desc.value);
    let widget = match desc.declared_type {
        TypeTag::Text => Widget::TextArea {
            value: current,
            rows: opts.rows,
            cols: opts.cols,
        },
        TypeTag::String if opts.rows.is_some() => Widget::TextArea {
            value: current,
            rows: opts.rows,
            cols: opts.cols,
        },
        TypeTag::String | TypeTag::Integer => match choices {
            Some(choices) if opts.radio => Widget::RadioGroup {
                options: choices
                    .into_iter()
                    .map(|choice| Checkable {
                        checked: choice.value == current,
                        choice,
                    })
                    .collect(),
            },
            Some(choices) => Widget::Select {
                choices,
                selected: opts.selected.clone().or_else(|| non_empty(current)),
                include_blank: !opts.required,
            },
            None if desc.declared_type == TypeTag::Integer => Widget::TextInput {
                value: current,
                size: opts.width().or(Some(config.numeric_size)),
            },
            None => Widget::TextInput {
                value: current,
                size: opts.width(),
            },
        },
        TypeTag::Float | TypeTag::Decimal => Widget::TextInput {
            value: current,
            size: opts.width().or(Some(config.numeric_size)),
        },
        TypeTag::Boolean if opts.radio => boolean_radio_group(desc, choices)?,
        TypeTag::Boolean => Widget::CheckBox {
            checked: is_truthy(&desc.value),
        },
        TypeTag::Date | TypeTag::DateTime | TypeTag::Time | TypeTag::Timestamp => {
            Widget::DateTimePicker {
                value: current,
                size: opts.size.unwrap_or(config.date_size),
            }
        }
        TypeTag::BelongsTo => {
            let foreign_key = desc
                .relation
                .as_ref()
                .map(|r| r.foreign_key.clone())
                .unwrap_or_else(|| format!("{}_id", desc.name));
            Widget::AssociationSelect {
                foreign_key,
                choices: choices.unwrap_or_default(),
                selected: opts.selected.clone().or_else(|| non_empty(current)),
                include_blank: !opts.required,
            }
        }
        TypeTag::HasMany => {
            let elected: Vec<String> = match &desc.value {
                Value::Array(items) => items.iter().map(value_to_string).collect(),
                Value::Null => Vec::new(),
                other => vec![value_to_string(other)],
            };
            let layout = match (opts.rows, opts.cols) {
                (Some(rows), _) if rows > 0 => GridLayout::Rows(rows),
                (_, Some(cols)) if cols > 0 => GridLayout::Cols(cols),
                _ => GridLayout::Stacked,
            };
            Widget::AssociationMultiSelect {
                options: choices
                    .unwrap_or_default()
                    .into_iter()
                    .map(|choice| Checkable {
                        checked: elected.contains(&choice.value),
                        choice,
                    })
                    .collect(),
                layout,
            }
        }
        TypeTag::Binary => {
            return Err(FieldError::UnsupportedFieldType {
                field: desc.name.clone(),
                ty: TypeTag::Binary,
            })
        }
    };
    Ok(widget)
}

/// Two-way radio group for a boolean: the first choice stands for false,
/// the second for true.
fn boolean_radio_group(
    desc: &FieldDescriptor,
    choices: Option<Vec<Choice>>,
) -> Result<Widget, FieldError> {
    let choices = choices.unwrap_or_else(|| vec![Choice::new("No", "0"), Choice::new("Yes", "1")]);
    if choices.len() != 2 {
        return Err(FieldError::InvalidChoiceSet {
            field: desc.name.clone(),
            expected: 2,
            found: choices.len(),
        });
    }
    let truthy = is_truthy(&desc.value);
    Ok(Widget::RadioGroup {
        options: choices
            .into_iter()
            .enumerate()
            .map(|(i, choice)| Checkable {
                choice,
                checked: (i == 1) == truthy,
            })
            .collect(),
    })
}

fn constant_widget(
    desc: &FieldDescriptor,
    opts: &RenderOptions,
    choices: Option<&[Choice]>,
    config: &FormboxConfig,
) -> Result<Widget, FieldError> {
    let value = &desc.value;
    let show = opts.show.as_deref();
    let mut icon = None;
    let text = match desc.declared_type {
        TypeTag::String | TypeTag::Integer | TypeTag::BelongsTo if choices.is_some() => {
            match value {
                Value::Object(map) => {
                    record_label(&Record::from(map.clone()), show, &config.showers)
                }
                _ => {
                    let raw = value_to_string(value);
                    choices
                        .and_then(|c| option_text(c, &raw))
                        .map(str::to_string)
                        .unwrap_or(raw)
                }
            }
        }
        TypeTag::String | TypeTag::Text | TypeTag::Integer | TypeTag::Float | TypeTag::Decimal => {
            value_to_string(value)
        }
        TypeTag::Boolean => {
            let truthy = is_truthy(value);
            if opts.icon {
                icon = Some(config.boolean_icon(truthy));
            }
            let text = if truthy { "Yes" } else { "No" };
            text.to_string()
        }
        TypeTag::Date => format_date(value, &config.date_format),
        TypeTag::DateTime | TypeTag::Timestamp => format_datetime(value, &config.time_format),
        TypeTag::Time => format_time(value, &config.time_of_day_format),
        TypeTag::BelongsTo => match value {
            Value::Object(map) => record_label(&Record::from(map.clone()), show, &config.showers),
            other => value_to_string(other),
        },
        TypeTag::HasMany => {
            // Bare ids are looked up among the candidates
            let label = |item: &Value| match item {
                Value::Object(map) => record_label(&Record::from(map.clone()), show, &config.showers),
                other => {
                    let raw = value_to_string(other);
                    choices
                        .and_then(|c| option_text(c, &raw))
                        .map(str::to_string)
                        .unwrap_or(raw)
                }
            };
            match value {
                Value::Array(items) => items.iter().map(label).collect::<Vec<_>>().join(","),
                Value::Null => String::new(),
                other => label(other),
            }
        }
        TypeTag::Binary => {
            return Err(FieldError::UnsupportedFieldType {
                field: desc.name.clone(),
                ty: TypeTag::Binary,
            })
        }
    };
    Ok(Widget::ConstantDisplay { text, icon })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::widget::WidgetKind;
    use serde_json::json;

    #[test]
    fn test_worked_examples() {
        let title = FieldDescriptor::new("title", TypeTag::String);
        assert_eq!(
            resolve(&title, &RenderOptions::new(), false).unwrap().kind(),
            WidgetKind::TextInput
        );

        let bio = FieldDescriptor::new("bio", TypeTag::Text);
        assert_eq!(
            resolve(&bio, &RenderOptions::new(), false).unwrap().kind(),
            WidgetKind::TextArea
        );

        let active = FieldDescriptor::new("active", TypeTag::Boolean).with_value(true);
        let widget = resolve(&active, &RenderOptions::new(), true).unwrap();
        assert_eq!(widget.constant_text(), Some("Yes"));
        let inactive = FieldDescriptor::new("active", TypeTag::Boolean).with_value(false);
        let widget = resolve(&inactive, &RenderOptions::new(), true).unwrap();
        assert_eq!(widget.constant_text(), Some("No"));
    }

    #[test]
    fn test_numeric_inputs_are_narrow() {
        let price = FieldDescriptor::new("price", TypeTag::Decimal).with_value(json!("9.50"));
        assert_eq!(
            resolve(&price, &RenderOptions::new(), false).unwrap(),
            Widget::TextInput {
                value: "9.50".into(),
                size: Some(10)
            }
        );
        let qty = FieldDescriptor::new("qty", TypeTag::Integer);
        assert_eq!(
            resolve(&qty, &RenderOptions::new().size(4), false).unwrap(),
            Widget::TextInput {
                value: String::new(),
                size: Some(4)
            }
        );
    }

    #[test]
    fn test_select_blank_unless_required() {
        let desc = FieldDescriptor::new("color", TypeTag::String).with_value("g");
        let opts = RenderOptions::new().choices(vec![Choice::new("Red", "r"), Choice::new("Green", "g")]);
        match resolve(&desc, &opts, false).unwrap() {
            Widget::Select {
                selected,
                include_blank,
                choices,
            } => {
                assert_eq!(selected.as_deref(), Some("g"));
                assert!(include_blank);
                assert_eq!(choices.len(), 2);
            }
            other => panic!("expected select, got {other:?}"),
        }
        match resolve(&desc, &opts.clone().required(), false).unwrap() {
            Widget::Select { include_blank, .. } => assert!(!include_blank),
            other => panic!("expected select, got {other:?}"),
        }
    }

    #[test]
    fn test_radio_group_checks_current_value() {
        let desc = FieldDescriptor::new("size", TypeTag::Integer).with_value(2);
        let opts = RenderOptions::new()
            .radio()
            .choices(vec![Choice::new("S", "1"), Choice::new("M", "2"), Choice::new("L", "3")]);
        match resolve(&desc, &opts, false).unwrap() {
            Widget::RadioGroup { options } => {
                let checked: Vec<_> = options.iter().filter(|o| o.checked).collect();
                assert_eq!(checked.len(), 1);
                assert_eq!(checked[0].choice.label, "M");
            }
            other => panic!("expected radio group, got {other:?}"),
        }
    }

    #[test]
    fn test_boolean_radio_defaults_and_checked_state() {
        let desc = FieldDescriptor::new("notified", TypeTag::Boolean).with_value(false);
        match resolve(&desc, &RenderOptions::new().radio(), false).unwrap() {
            Widget::RadioGroup { options } => {
                assert_eq!(options.len(), 2);
                assert_eq!(options[0].choice, Choice::new("No", "0"));
                assert!(options[0].checked);
                assert!(!options[1].checked);
            }
            other => panic!("expected radio group, got {other:?}"),
        }
    }

    #[test]
    fn test_boolean_radio_rejects_three_choices() {
        let desc = FieldDescriptor::new("notified", TypeTag::Boolean);
        let opts = RenderOptions::new().radio().choices(vec![
            Choice::new("No", "0"),
            Choice::new("Yes", "1"),
            Choice::new("Maybe", "2"),
        ]);
        assert_eq!(
            resolve(&desc, &opts, false).unwrap_err(),
            FieldError::InvalidChoiceSet {
                field: "notified".into(),
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_belongs_to_select_uses_foreign_key() {
        let desc = FieldDescriptor::new("category", TypeTag::BelongsTo)
            .with_relation(crate::schema::RelationKind::BelongsTo, "Category")
            .with_value(json!({"id": 2, "name": "Toys"}))
            .with_choices(vec![Choice::new("Tools", "1"), Choice::new("Toys", "2")]);
        match resolve(&desc, &RenderOptions::new(), false).unwrap() {
            Widget::AssociationSelect {
                foreign_key,
                selected,
                choices,
                ..
            } => {
                assert_eq!(foreign_key, "category_id");
                assert_eq!(selected.as_deref(), Some("2"));
                assert_eq!(choices.len(), 2);
            }
            other => panic!("expected association select, got {other:?}"),
        }
    }

    #[test]
    fn test_explicit_choices_beat_descriptor_choices() {
        let desc = FieldDescriptor::new("category", TypeTag::BelongsTo)
            .with_relation(crate::schema::RelationKind::BelongsTo, "Category")
            .with_value(9)
            .with_choices(vec![Choice::new("Tools", "1"), Choice::new("Toys", "2")]);
        let opts = RenderOptions::new().choices(vec![Choice::new("Only", "9")]);
        match resolve(&desc, &opts, false).unwrap() {
            Widget::AssociationSelect { choices, selected, .. } => {
                assert_eq!(choices, vec![Choice::new("Only", "9")]);
                assert_eq!(selected.as_deref(), Some("9"));
            }
            other => panic!("expected association select, got {other:?}"),
        }
    }

    #[test]
    fn test_has_many_grid_and_elects() {
        let desc = FieldDescriptor::new("tags", TypeTag::HasMany)
            .with_value(json!([{"id": 1, "name": "a"}, {"id": 3, "name": "c"}]))
            .with_choices(vec![
                Choice::new("a", "1"),
                Choice::new("b", "2"),
                Choice::new("c", "3"),
            ]);
        match resolve(&desc, &RenderOptions::new().cols(2), false).unwrap() {
            Widget::AssociationMultiSelect { options, layout } => {
                assert_eq!(layout, GridLayout::Cols(2));
                let checked: Vec<bool> = options.iter().map(|o| o.checked).collect();
                assert_eq!(checked, vec![true, false, true]);
            }
            other => panic!("expected multi select, got {other:?}"),
        }
    }

    #[test]
    fn test_read_only_formats() {
        let config = FormboxConfig::default();
        let date = FieldDescriptor::new("published_on", TypeTag::Date).with_value("2024-05-01");
        assert_eq!(
            resolve_with(&date, &RenderOptions::new(), true, &config)
                .unwrap()
                .constant_text(),
            Some("2024-05-01")
        );

        let cat = FieldDescriptor::new("category", TypeTag::BelongsTo)
            .with_value(json!({"id": 2, "name": "Toys"}));
        assert_eq!(
            resolve(&cat, &RenderOptions::new(), true).unwrap().constant_text(),
            Some("Toys")
        );

        let tags = FieldDescriptor::new("tags", TypeTag::HasMany)
            .with_value(json!([{"id": 1, "name": "a"}, {"id": 3, "name": "c"}]));
        assert_eq!(
            resolve(&tags, &RenderOptions::new(), true).unwrap().constant_text(),
            Some("a,c")
        );

        let color = FieldDescriptor::new("color", TypeTag::String).with_value("g");
        let opts = RenderOptions::new().choices(vec![Choice::new("Green", "g")]);
        assert_eq!(
            resolve(&color, &opts, true).unwrap().constant_text(),
            Some("Green")
        );
    }

    #[test]
    fn test_field_level_read_only() {
        let desc = FieldDescriptor::new("title", TypeTag::String).with_value("Hi");
        assert_eq!(
            resolve(&desc, &RenderOptions::new().read_only(), false)
                .unwrap()
                .constant_text(),
            Some("Hi")
        );
    }

    #[test]
    fn test_boolean_icon() {
        let desc = FieldDescriptor::new("active", TypeTag::Boolean).with_value(1);
        assert_eq!(
            resolve(&desc, &RenderOptions::new().icon(), true).unwrap(),
            Widget::ConstantDisplay {
                text: "Yes".into(),
                icon: Some("/images/true.png".into())
            }
        );
    }
}
