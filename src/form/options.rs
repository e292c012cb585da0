use serde::{Deserialize, Serialize};

use super::choices::ChoiceSource;

/// Per-field rendering options.
///
/// Deserializes from the keys of a form layout entry, e.g.
/// `{ name: product, choices: [...], required: true, show: full_name }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Marks the label with ` *` and drops the blank option from selects
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    /// Render this field as a constant display even in an editable form
    #[serde(skip_serializing_if = "is_false")]
    pub read_only: bool,
    /// Use a radio group instead of a select / check box
    #[serde(skip_serializing_if = "is_false")]
    pub radio: bool,
    /// Explicit candidate values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<ChoiceSource>,
    /// Attribute used to label record choices and associations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<String>,
    /// Text area rows, or grid rows for a has-many checkbox set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    /// Text area columns / input width, or grid columns for a checkbox set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cols: Option<u32>,
    /// Input width, wins over `cols`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// Label text override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Suppress the label entirely
    #[serde(skip_serializing_if = "is_false")]
    pub no_label: bool,
    /// Show booleans as an icon in read-only mode
    #[serde(skip_serializing_if = "is_false")]
    pub icon: bool,
    /// Preselected value for selects, instead of the record's value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl RenderOptions {
    pub fn new() -> Self {
        RenderOptions::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn radio(mut self) -> Self {
        self.radio = true;
        self
    }

    pub fn choices(mut self, choices: impl Into<ChoiceSource>) -> Self {
        self.choices = Some(choices.into());
        self
    }

    pub fn show(mut self, attr: impl Into<String>) -> Self {
        self.show = Some(attr.into());
        self
    }

    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn cols(mut self, cols: u32) -> Self {
        self.cols = Some(cols);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn no_label(mut self) -> Self {
        self.no_label = true;
        self
    }

    pub fn icon(mut self) -> Self {
        self.icon = true;
        self
    }

    pub fn selected(mut self, value: impl Into<String>) -> Self {
        self.selected = Some(value.into());
        self
    }

    /// Input width: `size` wins over `cols`.
    pub fn width(&self) -> Option<u32> {
        self.size.or(self.cols)
    }
}
