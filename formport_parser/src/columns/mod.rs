//! Pass 4: Data Column Consolidation
//!
//! Cross-view aggregation of every parsed control into deduplicated logical
//! data columns. Columns are keyed by `(column_name, owning grouping)`; the
//! same field rendered in two views merges non-destructively, while the same
//! field under two different repeating scopes stays two columns.

use crate::config::constants::compile_time::columns::*;
use crate::dynamics::VisibilityMap;
use crate::logging::codes;
use crate::model::{Control, DataColumn, ViewModel};
use crate::naming::binding_leaf;
use crate::{log_error, log_info, log_success};
use indexmap::IndexMap;

/// Module version
pub const VERSION: &str = "1.0.0";

/// Pass number
pub const PASS_NUMBER: u8 = 4;

/// Consolidate all views' controls into the final data column list
pub fn consolidate(views: &[ViewModel], visibility: &VisibilityMap) -> Vec<DataColumn> {
    log_info!("Starting Pass 4: Data column consolidation",
        "views" => views.len(),
        "condition_fields" => visibility.len()
    );

    let mut columns: IndexMap<(String, String), (DataColumn, Vec<String>)> = IndexMap::new();
    let mut limit_logged = false;

    for view in views {
        for control in &view.controls {
            if !control.kind.is_data() || control.merged_into_parent {
                continue;
            }

            let column_name =
                binding_leaf(&control.binding_path).unwrap_or_else(|| control.name.clone());
            let owning = owning_name(control);
            let key = (
                column_name.to_ascii_lowercase(),
                owning.as_deref().unwrap_or_default().to_ascii_lowercase(),
            );

            match columns.get_mut(&key) {
                Some((existing, ids)) => {
                    merge_into(existing, control);
                    if let Some(id) = control.id.clone() {
                        ids.push(id);
                    }
                }
                None => {
                    if columns.len() >= MAX_DATA_COLUMNS {
                        if !limit_logged {
                            limit_logged = true;
                            log_error!(codes::columns::COLUMN_LIMIT_EXCEEDED,
                                "Consolidated column limit reached; remaining controls skipped",
                                "limit" => MAX_DATA_COLUMNS
                            );
                        }
                        continue;
                    }
                    let ids = control.id.clone().into_iter().collect();
                    columns.insert(key, (new_column(column_name, owning, control), ids));
                }
            }
        }
    }

    let mut data = Vec::with_capacity(columns.len());
    for (_, (mut column, ids)) in columns {
        apply_visibility(&mut column, &ids, visibility);
        data.push(column);
    }

    log_success!(codes::success::CONSOLIDATION_COMPLETE,
        "Data column consolidation completed",
        "columns" => data.len()
    );

    data
}

/// The owning grouping of a control: its repeating scope when repeating,
/// its cosmetic section otherwise
fn owning_name(control: &Control) -> Option<String> {
    if control.repeating.is_repeating {
        control.repeating.repeating_section_name.clone()
    } else {
        control.section.parent_section.clone()
    }
}

fn new_column(column_name: String, owning: Option<String>, control: &Control) -> DataColumn {
    let default_value = control
        .choice_options
        .iter()
        .find(|option| option.is_default)
        .map(|option| option.value.clone());

    DataColumn {
        display_name: if control.label.is_empty() {
            column_name.clone()
        } else {
            control.label.clone()
        },
        column_name,
        column_type: control.kind.column_type().to_string(),
        owning_name: owning,
        is_repeating: control.repeating.is_repeating,
        is_conditional: false,
        conditional_on_field: None,
        valid_values: control.choice_options.clone(),
        default_value,
    }
}

/// Merge a repeat occurrence non-destructively: the first non-empty value
/// wins per field, and choice options are unioned by value.
fn merge_into(column: &mut DataColumn, control: &Control) {
    if column.display_name.is_empty() || column.display_name == column.column_name {
        if !control.label.is_empty() {
            column.display_name = control.label.clone();
        }
    }

    if column.column_type.is_empty() {
        column.column_type = control.kind.column_type().to_string();
    }

    for option in &control.choice_options {
        if column.valid_values.len() >= MAX_CHOICE_OPTIONS {
            break;
        }
        if !column.valid_values.iter().any(|v| v.value == option.value) {
            column.valid_values.push(option.clone());
        }
    }

    if column.default_value.is_none() {
        column.default_value = control
            .choice_options
            .iter()
            .find(|option| option.is_default)
            .map(|option| option.value.clone());
    }

    column.is_repeating = column.is_repeating || control.repeating.is_repeating;
}

/// Mark a column conditional when any contributing control's stable id
/// appears in the form-wide visibility index
fn apply_visibility(column: &mut DataColumn, contributing_ids: &[String], visibility: &VisibilityMap) {
    for id in contributing_ids {
        for (field, members) in visibility {
            if members.contains(id) {
                column.is_conditional = true;
                if column.conditional_on_field.is_none() {
                    column.conditional_on_field = Some(field.clone());
                }
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChoiceOption, Control, ControlKind, RepeatingMembership, SectionMembership};

    fn bound_control(name: &str, binding: &str, kind: ControlKind) -> Control {
        let mut control = Control::new(name, kind);
        control.binding_path = binding.to_string();
        control
    }

    fn in_scope(mut control: Control, scope: &str) -> Control {
        control.repeating = RepeatingMembership {
            is_repeating: true,
            repeating_section_name: Some(scope.to_string()),
            repeating_section_binding: None,
        };
        control
    }

    fn view(name: &str, controls: Vec<Control>) -> ViewModel {
        let mut view = ViewModel::new(name);
        view.controls = controls;
        view
    }

    #[test]
    fn test_same_field_in_two_views_merges() {
        let mut first = bound_control("city", "my:trip/my:city", ControlKind::TextField);
        first.label = "Destination City".to_string();
        let second = bound_control("city", "my:trip/my:city", ControlKind::TextField);

        let views = [view("v1", vec![first]), view("v2", vec![second])];
        let columns = consolidate(&views, &VisibilityMap::new());

        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].column_name, "city");
        assert_eq!(columns[0].display_name, "Destination City");
        assert_eq!(columns[0].column_type, "Text");
    }

    #[test]
    fn test_same_field_in_two_scopes_stays_distinct() {
        // my:Category rendered inside "Expenses" in one view and
        // inside "Trips" in another must yield two columns
        let views = [
            view(
                "v1",
                vec![in_scope(
                    bound_control("Category", "my:Category", ControlKind::TextField),
                    "Expenses",
                )],
            ),
            view(
                "v2",
                vec![in_scope(
                    bound_control("Category", "my:Category", ControlKind::TextField),
                    "Trips",
                )],
            ),
        ];

        let columns = consolidate(&views, &VisibilityMap::new());
        assert_eq!(columns.len(), 2);

        let owners: Vec<_> = columns
            .iter()
            .map(|c| c.owning_name.as_deref().unwrap())
            .collect();
        assert!(owners.contains(&"Expenses"));
        assert!(owners.contains(&"Trips"));
        assert!(columns.iter().all(|c| c.is_repeating));
    }

    #[test]
    fn test_merge_never_loses_nonempty_fields_and_unions_options() {
        let mut first = bound_control("priority", "my:priority", ControlKind::DropDown);
        first.choice_options = vec![
            ChoiceOption::new("High", "High", 0),
            ChoiceOption::new("Low", "Low", 1),
        ];

        let mut second = bound_control("priority", "my:priority", ControlKind::DropDown);
        second.label = "Priority".to_string();
        let mut medium = ChoiceOption::new("Medium", "Medium", 0);
        medium.is_default = true;
        second.choice_options = vec![ChoiceOption::new("High", "High priority", 0), medium];

        let views = [view("v1", vec![first]), view("v2", vec![second])];
        let columns = consolidate(&views, &VisibilityMap::new());

        assert_eq!(columns.len(), 1);
        let column = &columns[0];
        assert_eq!(column.display_name, "Priority");
        assert_eq!(column.default_value.as_deref(), Some("Medium"));

        // Union by value: no duplicate values, nothing lost
        let values: Vec<_> = column.valid_values.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(values, vec!["High", "Low", "Medium"]);
    }

    #[test]
    fn test_non_data_controls_skipped() {
        let mut label = Control::new("caption", ControlKind::Label);
        label.label = "Caption".to_string();
        let mut merged = bound_control("gone", "my:gone", ControlKind::TextField);
        merged.merged_into_parent = true;
        let table = Control::new("Expenses", ControlKind::RepeatingTable);

        let views = [view("v1", vec![label, merged, table])];
        let columns = consolidate(&views, &VisibilityMap::new());
        assert!(columns.is_empty());
    }

    #[test]
    fn test_cosmetic_section_owns_non_repeating_columns() {
        let mut control = bound_control("note", "my:note", ControlKind::TextField);
        control.section = SectionMembership {
            parent_section: Some("Summary".to_string()),
            section_kind: None,
        };

        let columns = consolidate(&[view("v1", vec![control])], &VisibilityMap::new());
        assert_eq!(columns[0].owning_name.as_deref(), Some("Summary"));
        assert!(!columns[0].is_repeating);
    }

    #[test]
    fn test_visibility_marks_conditional_columns() {
        let mut control = bound_control("returnDate", "my:returnDate", ControlKind::DatePicker);
        control.id = Some("CTRL31".to_string());

        let mut visibility = VisibilityMap::new();
        visibility.insert("tripType".to_string(), vec!["CTRL31".to_string()]);

        let columns = consolidate(&[view("v1", vec![control])], &visibility);
        assert!(columns[0].is_conditional);
        assert_eq!(columns[0].conditional_on_field.as_deref(), Some("tripType"));
        assert_eq!(columns[0].column_type, "DateTime");
    }

    #[test]
    fn test_unconditional_columns_stay_unconditional() {
        let mut control = bound_control("name", "my:name", ControlKind::TextField);
        control.id = Some("CTRL1".to_string());

        let mut visibility = VisibilityMap::new();
        visibility.insert("other".to_string(), vec!["CTRL99".to_string()]);

        let columns = consolidate(&[view("v1", vec![control])], &visibility);
        assert!(!columns[0].is_conditional);
        assert!(columns[0].conditional_on_field.is_none());
    }
}
