//! Options supplied to `Select` and `Combobox`

/// An option in the dropdown panel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropdownOption {
    /// The value committed when selected
    pub value: String,
    /// The label shown in the panel and the trigger
    pub label: String,
    /// Whether this option can be committed
    pub disabled: bool,
}

impl DropdownOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    /// Mark this option as disabled
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

pub type SelectOption = DropdownOption;
pub type ComboboxOption = DropdownOption;
