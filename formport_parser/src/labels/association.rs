//! Label-to-control association
//!
//! For every unbound label, find the best data control and set both sides'
//! cross-reference fields. Search order: same row at a greater column
//! (lowest column first), then the next row (lowest column first), then the
//! next control by capture order. First match wins. A pure function of the
//! control list.

use crate::log_warning;
use crate::model::Control;

/// Associate standalone labels with data controls; returns how many labels
/// found a target.
pub fn associate_labels(controls: &mut [Control]) -> usize {
    let mut associations: Vec<(usize, usize)> = Vec::new();

    for (label_idx, label) in controls.iter().enumerate() {
        if !label.is_unbound_label() || label.merged_into_parent {
            continue;
        }

        match find_target(controls, label_idx) {
            Some(target_idx) => associations.push((label_idx, target_idx)),
            None => {
                log_warning!("Standalone label found no data control to associate",
                    "label" => label.name
                );
            }
        }
    }

    let count = associations.len();
    for (label_idx, target_idx) in associations {
        let label_ref = controls[label_idx].reference_id().to_string();
        let label_text = controls[label_idx].label.clone();
        let target_ref = controls[target_idx].reference_id().to_string();

        controls[label_idx].associated_control_id = Some(target_ref);
        controls[target_idx].associated_label_id = Some(label_ref);
        if controls[target_idx].label.is_empty() {
            controls[target_idx].label = label_text;
        }
    }

    count
}

/// Whether a control can be the target of a label association
fn is_association_target(control: &Control) -> bool {
    control.kind.is_data() && control.is_emitting()
}

fn find_target(controls: &[Control], label_idx: usize) -> Option<usize> {
    let label = &controls[label_idx];
    let (row, col) = (label.grid.row, label.grid.col);

    // (1) same row, greater column, lowest column wins
    let same_row = controls
        .iter()
        .enumerate()
        .filter(|(idx, c)| {
            *idx != label_idx
                && is_association_target(c)
                && c.grid.row == row
                && c.grid.col > col
        })
        .min_by_key(|(_, c)| c.grid.col)
        .map(|(idx, _)| idx);
    if same_row.is_some() {
        return same_row;
    }

    // (2) next row, lowest column wins
    let next_row = controls
        .iter()
        .enumerate()
        .filter(|(idx, c)| *idx != label_idx && is_association_target(c) && c.grid.row == row + 1)
        .min_by_key(|(_, c)| c.grid.col)
        .map(|(idx, _)| idx);
    if next_row.is_some() {
        return next_row;
    }

    // (3) next control by capture order, regardless of position
    controls
        .iter()
        .enumerate()
        .filter(|(idx, c)| {
            *idx != label_idx
                && is_association_target(c)
                && c.doc_index > label.doc_index
        })
        .min_by_key(|(_, c)| c.doc_index)
        .map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ControlKind;
    use crate::utils::GridPos;

    fn label_at(text: &str, doc_index: usize, row: usize, col: usize) -> Control {
        let mut control = Control::new(crate::utils::sanitize_identifier(text), ControlKind::Label);
        control.label = text.to_string();
        control.doc_index = doc_index;
        control.grid = GridPos::new(row, col);
        control
    }

    fn field_at(name: &str, doc_index: usize, row: usize, col: usize) -> Control {
        let mut control = Control::new(name, ControlKind::TextField);
        control.binding_path = format!("my:{}", name);
        control.id = Some(format!("CTRL_{}", name));
        control.doc_index = doc_index;
        control.grid = GridPos::new(row, col);
        control
    }

    #[test]
    fn test_same_row_lowest_column_wins() {
        let mut controls = vec![
            label_at("Name:", 1, 0, 0),
            field_at("far", 2, 0, 5),
            field_at("near", 3, 0, 1),
        ];

        assert_eq!(associate_labels(&mut controls), 1);
        assert_eq!(
            controls[0].associated_control_id.as_deref(),
            Some("CTRL_near")
        );
        assert_eq!(
            controls[2].associated_label_id.as_deref(),
            Some(controls[0].reference_id())
        );
    }

    #[test]
    fn test_next_row_fallback() {
        // An unbound caption immediately followed in document
        // order by a bound field on the next row
        let mut controls = vec![
            label_at("First Name:", 1, 0, 0),
            field_at("firstName", 2, 1, 0),
        ];

        associate_labels(&mut controls);
        assert_eq!(
            controls[0].associated_control_id.as_deref(),
            Some("CTRL_firstName")
        );
        // The data control's empty label is backfilled from the label text
        assert_eq!(controls[1].label, "First Name:");
    }

    #[test]
    fn test_doc_order_fallback() {
        let mut controls = vec![
            label_at("Notes:", 1, 0, 0),
            field_at("remark", 5, 4, 2),
        ];

        associate_labels(&mut controls);
        assert_eq!(
            controls[0].associated_control_id.as_deref(),
            Some("CTRL_remark")
        );
    }

    #[test]
    fn test_backfill_does_not_overwrite_existing_label() {
        let mut controls = vec![label_at("Alias:", 1, 0, 0), {
            let mut f = field_at("name", 2, 0, 1);
            f.label = "Full Name".to_string();
            f
        }];

        associate_labels(&mut controls);
        assert_eq!(controls[1].label, "Full Name");
    }

    #[test]
    fn test_labels_never_associate_to_labels_or_structure() {
        let mut controls = vec![
            label_at("A:", 1, 0, 0),
            label_at("B:", 2, 0, 1),
            {
                let mut t = Control::new("table", ControlKind::RepeatingTable);
                t.doc_index = 3;
                t.grid = GridPos::new(0, 2);
                t
            },
        ];

        assert_eq!(associate_labels(&mut controls), 0);
        assert!(controls[0].associated_control_id.is_none());
    }

    #[test]
    fn test_bound_labels_are_not_associated() {
        let mut controls = vec![
            {
                let mut l = label_at("Computed:", 1, 0, 0);
                l.binding_path = "my:computed".to_string();
                l
            },
            field_at("target", 2, 0, 1),
        ];

        assert_eq!(associate_labels(&mut controls), 0);
    }
}
