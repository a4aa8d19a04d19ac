//! Small form helpers used across storefront pages
//!
//! Library-only: nothing in the CLI or the page controller drives these;
//! they are for embedders rendering their own buttons and forms.

pub const LOADING_LABEL: &str = "Loading...";

/// A button that can show a spinner while its action runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingButton {
    pub label: String,
    pub disabled: bool,
    pub spinner: bool,
}

impl LoadingButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            disabled: false,
            spinner: false,
        }
    }

    /// Swap the label for the spinner and disable the button. Returns the
    /// label to restore later.
    pub fn show_spinner(&mut self) -> String {
        self.spinner = true;
        self.disabled = true;
        std::mem::replace(&mut self.label, LOADING_LABEL.to_string())
    }

    pub fn hide_spinner(&mut self, original: String) {
        self.label = original;
        self.spinner = false;
        self.disabled = false;
    }
}

/// Validation mark on a form field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldState {
    #[default]
    Untouched,
    Valid,
    Invalid,
}

impl FieldState {
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            Self::Untouched => None,
            Self::Valid => Some("is-valid"),
            Self::Invalid => Some("is-invalid"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
    pub required: bool,
    pub state: FieldState,
}

impl FormField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            required,
            state: FieldState::Untouched,
        }
    }
}

/// Mark every required field valid or invalid. Returns whether all
/// required fields have a non-blank value; a missing form is never valid.
pub fn validate_form(form: Option<&mut [FormField]>) -> bool {
    let Some(fields) = form else {
        return false;
    };

    let mut valid = true;
    for field in fields.iter_mut().filter(|f| f.required) {
        if field.value.trim().is_empty() {
            field.state = FieldState::Invalid;
            valid = false;
        } else {
            field.state = FieldState::Valid;
        }
    }
    valid
}
