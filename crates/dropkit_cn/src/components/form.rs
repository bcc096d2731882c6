//! Hidden form inputs mirroring the selected value

use dropkit_core::Dropdown;

use crate::node::RenderNode;

/// One `<input type="hidden">` per selected value
///
/// Empty when the dropdown has no `name`, is disabled, or has nothing
/// selected, so the field is left out of form submission.
pub fn hidden_inputs(dropdown: &Dropdown) -> Vec<RenderNode> {
    dropdown
        .form_entries()
        .into_iter()
        .map(|entry| {
            RenderNode::new("input")
                .attr("type", "hidden")
                .attr("name", entry.name)
                .attr("value", entry.value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropkit_core::DropdownConfig;

    #[test]
    fn test_one_input_per_value() {
        let config = DropdownConfig {
            name: Some("tags".to_string()),
            multiple: true,
            ..DropdownConfig::select()
        };
        let dropdown = Dropdown::builder(config)
            .default_value(vec!["news", "events"])
            .build();

        let inputs = hidden_inputs(&dropdown);
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].get_attr("name"), Some("tags"));
        assert_eq!(inputs[0].get_attr("value"), Some("news"));
        assert_eq!(inputs[1].get_attr("value"), Some("events"));
    }

    #[test]
    fn test_unset_value_has_no_input() {
        let config = DropdownConfig {
            name: Some("country".to_string()),
            ..DropdownConfig::combobox()
        };
        let dropdown = Dropdown::builder(config).build();
        assert!(hidden_inputs(&dropdown).is_empty());
    }
}
