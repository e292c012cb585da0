use serde::Serialize;
use std::fmt;

use super::choices::Choice;

/// A choice paired with its checked state, for radio groups and checkbox sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checkable {
    pub choice: Choice,
    pub checked: bool,
}

/// How a has-many checkbox set is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GridLayout {
    /// One checkbox per line
    Stacked,
    /// Fixed number of rows, as many columns as needed
    Rows(u32),
    /// Fixed number of columns, as many rows as needed
    Cols(u32),
}

impl GridLayout {
    /// `(rows, cols)` of the table holding `items` checkboxes, or `None`
    /// for the stacked layout. Cells are filled row by row; trailing cells
    /// may stay empty.
    pub fn dimensions(&self, items: usize) -> Option<(usize, usize)> {
        let spread = |fixed: usize| if items == 0 { 0 } else { 1 + (items - 1) / fixed };
        match *self {
            GridLayout::Stacked => None,
            GridLayout::Rows(rows) => {
                let rows = rows.max(1) as usize;
                Some((rows, spread(rows)))
            }
            GridLayout::Cols(cols) => {
                let cols = cols.max(1) as usize;
                Some((spread(cols), cols))
            }
        }
    }
}

/// The control chosen for a field, independent of markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Widget {
    TextInput {
        value: String,
        size: Option<u32>,
    },
    TextArea {
        value: String,
        rows: Option<u32>,
        cols: Option<u32>,
    },
    Select {
        choices: Vec<Choice>,
        selected: Option<String>,
        include_blank: bool,
    },
    RadioGroup {
        options: Vec<Checkable>,
    },
    CheckBox {
        checked: bool,
    },
    DateTimePicker {
        value: String,
        size: u32,
    },
    /// Single association edited through its foreign key column
    AssociationSelect {
        foreign_key: String,
        choices: Vec<Choice>,
        selected: Option<String>,
        include_blank: bool,
    },
    /// Checkbox set over every candidate of a has-many association
    AssociationMultiSelect {
        options: Vec<Checkable>,
        layout: GridLayout,
    },
    /// Formatted snapshot of the current value; `icon` is an image path for
    /// booleans shown as icons
    ConstantDisplay {
        text: String,
        icon: Option<String>,
    },
}

/// Discriminant of [`Widget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WidgetKind {
    TextInput,
    TextArea,
    Select,
    RadioGroup,
    CheckBox,
    DateTimePicker,
    AssociationSelect,
    AssociationMultiSelect,
    ConstantDisplay,
}

impl Widget {
    pub fn kind(&self) -> WidgetKind {
        match self {
            Widget::TextInput { .. } => WidgetKind::TextInput,
            Widget::TextArea { .. } => WidgetKind::TextArea,
            Widget::Select { .. } => WidgetKind::Select,
            Widget::RadioGroup { .. } => WidgetKind::RadioGroup,
            Widget::CheckBox { .. } => WidgetKind::CheckBox,
            Widget::DateTimePicker { .. } => WidgetKind::DateTimePicker,
            Widget::AssociationSelect { .. } => WidgetKind::AssociationSelect,
            Widget::AssociationMultiSelect { .. } => WidgetKind::AssociationMultiSelect,
            Widget::ConstantDisplay { .. } => WidgetKind::ConstantDisplay,
        }
    }

    /// Text of a constant display, if this is one.
    pub fn constant_text(&self) -> Option<&str> {
        match self {
            Widget::ConstantDisplay { text, .. } => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WidgetKind::TextInput => "text_input",
            WidgetKind::TextArea => "text_area",
            WidgetKind::Select => "select",
            WidgetKind::RadioGroup => "radio_group",
            WidgetKind::CheckBox => "check_box",
            WidgetKind::DateTimePicker => "date_time_picker",
            WidgetKind::AssociationSelect => "association_select",
            WidgetKind::AssociationMultiSelect => "association_multi_select",
            WidgetKind::ConstantDisplay => "constant_display",
        };
        f.write_str(s)
    }
}
