//! HTML fragments for resolved widgets and the `irow` row around them.

use askama::Template;

use super::error::FieldError;
use super::widget::{Checkable, GridLayout, Widget};
use crate::config::FormboxConfig;
use crate::form::choices::Choice;

/// `name` and `id` attributes of a form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    pub name: String,
    pub id: String,
}

impl FieldNames {
    /// `obj[field]` / `obj_field`
    pub fn new(object: &str, field: &str) -> Self {
        FieldNames {
            name: format!("{object}[{field}]"),
            id: field_id(object, field),
        }
    }

    /// `obj[field][]`, for controls submitting several values
    pub fn multiple(object: &str, field: &str) -> Self {
        FieldNames {
            name: format!("{object}[{field}][]"),
            id: field_id(object, field),
        }
    }
}

/// DOM id of a control: nested object names like `order[customer]` collapse
/// to `order_customer`.
pub fn field_id(object: &str, field: &str) -> String {
    let object = object.replace(']', "").replace('[', "_");
    sanitize(&format!("{object}_{field}"))
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}

/// A choice prepared for a template: its own DOM id and checked state.
struct OptionView {
    id: String,
    label: String,
    value: String,
    checked: bool,
}

impl OptionView {
    fn from_checkable(base_id: &str, item: &Checkable) -> Self {
        OptionView {
            id: sanitize(&format!("{base_id}_{}", item.choice.value)),
            label: item.choice.label.clone(),
            value: item.choice.value.clone(),
            checked: item.checked,
        }
    }

    fn from_choice(base_id: &str, choice: &Choice, selected: Option<&str>) -> Self {
        OptionView {
            id: sanitize(&format!("{base_id}_{}", choice.value)),
            label: choice.label.clone(),
            value: choice.value.clone(),
            checked: selected == Some(choice.value.as_str()),
        }
    }
}

#[derive(Template)]
#[template(path = "form/text_input.html")]
struct TextInputTemplate<'a> {
    input_type: &'a str,
    id: &'a str,
    name: &'a str,
    value: &'a str,
    size: Option<u32>,
}

#[derive(Template)]
#[template(path = "form/text_area.html")]
struct TextAreaTemplate<'a> {
    id: &'a str,
    name: &'a str,
    value: &'a str,
    rows: Option<u32>,
    cols: Option<u32>,
}

#[derive(Template)]
#[template(path = "form/select.html")]
struct SelectTemplate<'a> {
    id: &'a str,
    name: &'a str,
    include_blank: bool,
    options: Vec<OptionView>,
}

#[derive(Template)]
#[template(path = "form/radio_group.html")]
struct RadioGroupTemplate<'a> {
    name: &'a str,
    options: Vec<OptionView>,
}

#[derive(Template)]
#[template(path = "form/check_box.html")]
struct CheckBoxTemplate<'a> {
    id: &'a str,
    name: &'a str,
    checked: bool,
}

#[derive(Template)]
#[template(path = "form/calendar.html")]
struct CalendarTemplate<'a> {
    id: &'a str,
    name: &'a str,
    value: &'a str,
    size: u32,
    icon: &'a str,
    format: &'a str,
}

#[derive(Template)]
#[template(path = "form/multi_select.html")]
struct MultiSelectTemplate<'a> {
    name: &'a str,
    options: Vec<OptionView>,
    grid: Option<Vec<Vec<Option<OptionView>>>>,
}

#[derive(Template)]
#[template(path = "form/constant.html")]
struct ConstantTemplate<'a> {
    text: &'a str,
    lines: Vec<&'a str>,
    icon: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "form/label.html")]
struct LabelTemplate<'a> {
    target: &'a str,
    text: &'a str,
    read_only: bool,
    required: bool,
    error: bool,
}

#[derive(Template)]
#[template(path = "form/row.html")]
struct RowTemplate<'a> {
    id: &'a str,
    label: &'a str,
    input: &'a str,
}

#[derive(Template)]
#[template(path = "form/submit.html")]
struct SubmitTemplate<'a> {
    caption: &'a str,
}

#[derive(Template)]
#[template(path = "form/form.html")]
struct FormTemplate<'a> {
    id: &'a str,
    read_only: bool,
    rows: &'a [String],
}

fn finish(field: &str, rendered: askama::Result<String>) -> Result<String, FieldError> {
    rendered
        .map(|html| html.trim_end().to_string())
        .map_err(|e| FieldError::render(field, e))
}

/// Lay out `options` in a grid, filled row by row.
fn grid_cells(options: Vec<OptionView>, layout: GridLayout) -> Option<Vec<Vec<Option<OptionView>>>> {
    let (rows, cols) = layout.dimensions(options.len())?;
    let mut items = options.into_iter();
    Some(
        (0..rows)
            .map(|_| (0..cols).map(|_| items.next()).collect())
            .collect(),
    )
}

/// Render the markup of a resolved widget for `field` of `object`.
pub fn render_widget(
    object: &str,
    field: &str,
    widget: &Widget,
    config: &FormboxConfig,
) -> Result<String, FieldError> {
    let names = FieldNames::new(object, field);
    let rendered = match widget {
        Widget::TextInput { value, size } => TextInputTemplate {
            input_type: "text",
            id: &names.id,
            name: &names.name,
            value,
            size: *size,
        }
        .render(),
        Widget::TextArea { value, rows, cols } => TextAreaTemplate {
            id: &names.id,
            name: &names.name,
            value,
            rows: *rows,
            cols: *cols,
        }
        .render(),
        Widget::Select {
            choices,
            selected,
            include_blank,
        } => SelectTemplate {
            id: &names.id,
            name: &names.name,
            include_blank: *include_blank,
            options: choices
                .iter()
                .map(|c| OptionView::from_choice(&names.id, c, selected.as_deref()))
                .collect(),
        }
        .render(),
        Widget::RadioGroup { options } => RadioGroupTemplate {
            name: &names.name,
            options: options
                .iter()
                .map(|o| OptionView::from_checkable(&names.id, o))
                .collect(),
        }
        .render(),
        Widget::CheckBox { checked } => CheckBoxTemplate {
            id: &names.id,
            name: &names.name,
            checked: *checked,
        }
        .render(),
        Widget::DateTimePicker { value, size } => CalendarTemplate {
            id: &names.id,
            name: &names.name,
            value,
            size: *size,
            icon: &config.calendar_icon,
            format: &config.calendar_format,
        }
        .render(),
        Widget::AssociationSelect {
            foreign_key,
            choices,
            selected,
            include_blank,
        } => {
            let names = FieldNames::new(object, foreign_key);
            SelectTemplate {
                id: &names.id,
                name: &names.name,
                include_blank: *include_blank,
                options: choices
                    .iter()
                    .map(|c| OptionView::from_choice(&names.id, c, selected.as_deref()))
                    .collect(),
            }
            .render()
        }
        Widget::AssociationMultiSelect { options, layout } => {
            let names = FieldNames::multiple(object, field);
            let views: Vec<OptionView> = options
                .iter()
                .map(|o| OptionView::from_checkable(&names.id, o))
                .collect();
            match layout {
                GridLayout::Stacked => MultiSelectTemplate {
                    name: &names.name,
                    options: views,
                    grid: None,
                }
                .render(),
                _ => MultiSelectTemplate {
                    name: &names.name,
                    options: Vec::new(),
                    grid: grid_cells(views, *layout),
                }
                .render(),
            }
        }
        Widget::ConstantDisplay { text, icon } => ConstantTemplate {
            text,
            lines: text.lines().collect(),
            icon: icon.as_deref(),
        }
        .render(),
    };
    finish(field, rendered)
}

/// Password input; never echoes the current value.
pub fn render_password(object: &str, field: &str, size: Option<u32>) -> Result<String, FieldError> {
    let names = FieldNames::new(object, field);
    finish(
        field,
        TextInputTemplate {
            input_type: "password",
            id: &names.id,
            name: &names.name,
            value: "",
            size,
        }
        .render(),
    )
}

/// Inputs of the label cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelParts<'a> {
    /// DOM id of the labelled control
    pub target: &'a str,
    pub text: &'a str,
    pub read_only: bool,
    pub required: bool,
    /// The record has validation errors on this field
    pub error: bool,
}

pub fn render_label(field: &str, parts: LabelParts<'_>) -> Result<String, FieldError> {
    finish(
        field,
        LabelTemplate {
            target: parts.target,
            text: parts.text,
            read_only: parts.read_only,
            required: parts.required,
            error: parts.error,
        }
        .render(),
    )
}

/// Wrap a label cell and an input cell in an `irow` div. An empty label
/// leaves the label cell out.
pub fn render_row(field: &str, id: &str, label: &str, input: &str) -> Result<String, FieldError> {
    finish(field, RowTemplate { id, label, input }.render())
}

pub fn render_submit(caption: &str) -> Result<String, FieldError> {
    finish("commit", SubmitTemplate { caption }.render())
}

/// Wrap rendered rows in the form container.
pub fn render_form(object: &str, read_only: bool, rows: &[String]) -> Result<String, FieldError> {
    let id = field_id(object, "form");
    finish(
        object,
        FormTemplate {
            id: &id,
            read_only,
            rows,
        }
        .render(),
    )
}
