//! Multi-line label merging
//!
//! Adjacent label controls that render one wrapped caption are merged: the
//! first keeps the concatenated text and is flagged multiline, the second is
//! flagged merged. Merged controls stay in the list as non-emitting
//! placeholders so capture indexes remain stable.

use crate::model::{Control, ControlKind};

/// Merge adjacent related label fragments; returns how many fragments were
/// folded into a preceding label.
pub fn merge_multiline_labels(controls: &mut [Control]) -> usize {
    let mut merged = 0;
    let mut head: Option<usize> = None;

    for idx in 0..controls.len() {
        if controls[idx].kind != ControlKind::Label || controls[idx].merged_into_parent {
            head = None;
            continue;
        }

        match head {
            Some(head_idx) if related(&controls[head_idx], &controls[idx]) => {
                let fragment = controls[idx].label.clone();
                let target = &mut controls[head_idx];
                if !fragment.is_empty() {
                    if !target.label.is_empty() {
                        target.label.push(' ');
                    }
                    target.label.push_str(&fragment);
                }
                target.is_multiline_label = true;
                controls[idx].merged_into_parent = true;
                merged += 1;
                // head stays: a third fragment folds into the same label
            }
            _ => head = Some(idx),
        }
    }

    merged
}

/// Two consecutive labels are related if they share a grid position, or are
/// adjacent in capture order with a row difference of at most one.
fn related(first: &Control, second: &Control) -> bool {
    if first.grid == second.grid {
        return true;
    }
    second.doc_index == first.doc_index + 1 && second.grid.row.abs_diff(first.grid.row) <= 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::GridPos;

    fn label(text: &str, doc_index: usize, row: usize, col: usize) -> Control {
        let mut control = Control::new("label", ControlKind::Label);
        control.label = text.to_string();
        control.doc_index = doc_index;
        control.grid = GridPos::new(row, col);
        control
    }

    fn field(doc_index: usize, row: usize, col: usize) -> Control {
        let mut control = Control::new("field", ControlKind::TextField);
        control.doc_index = doc_index;
        control.grid = GridPos::new(row, col);
        control
    }

    #[test]
    fn test_same_grid_position_merges() {
        let mut controls = vec![label("Expense", 1, 2, 0), label("Report", 4, 2, 0)];

        assert_eq!(merge_multiline_labels(&mut controls), 1);
        assert_eq!(controls[0].label, "Expense Report");
        assert!(controls[0].is_multiline_label);
        assert!(controls[1].merged_into_parent);
        // The merged fragment is a placeholder, not a deletion
        assert_eq!(controls.len(), 2);
    }

    #[test]
    fn test_adjacent_doc_order_within_one_row_merges() {
        let mut controls = vec![label("Travel", 1, 0, 0), label("Details", 2, 1, 0)];

        assert_eq!(merge_multiline_labels(&mut controls), 1);
        assert_eq!(controls[0].label, "Travel Details");
    }

    #[test]
    fn test_distant_rows_do_not_merge() {
        let mut controls = vec![label("Top", 1, 0, 0), label("Bottom", 2, 4, 0)];

        assert_eq!(merge_multiline_labels(&mut controls), 0);
        assert!(!controls[0].is_multiline_label);
        assert!(!controls[1].merged_into_parent);
    }

    #[test]
    fn test_non_adjacent_doc_indexes_different_cells_do_not_merge() {
        let mut controls = vec![label("One", 1, 0, 0), label("Two", 5, 0, 3)];

        assert_eq!(merge_multiline_labels(&mut controls), 0);
    }

    #[test]
    fn test_field_breaks_the_chain() {
        let mut controls = vec![
            label("Left", 1, 0, 0),
            field(2, 0, 1),
            label("Right", 3, 0, 2),
        ];

        assert_eq!(merge_multiline_labels(&mut controls), 0);
    }

    #[test]
    fn test_three_fragments_fold_into_one() {
        let mut controls = vec![
            label("A", 1, 0, 0),
            label("B", 2, 0, 0),
            label("C", 3, 0, 0),
        ];

        assert_eq!(merge_multiline_labels(&mut controls), 2);
        assert_eq!(controls[0].label, "A B C");
        assert!(controls[1].merged_into_parent);
        assert!(controls[2].merged_into_parent);
    }
}
