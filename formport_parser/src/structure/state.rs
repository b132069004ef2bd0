//! Mutable traversal state for one view parse
//!
//! `ParserState` bundles the counters, stacks, and lookup tables the walk
//! threads through by mutable reference. It is created at the start of a view
//! parse and discarded at the end, so independent views can parse on
//! independent workers. The two scope stacks live in `WalkContext` instead:
//! they are passed down the recursion and restored for free on return, so an
//! early-return branch can never leave a stray entry behind.

use crate::config::constants::compile_time::structure::*;
use crate::model::{Control, ControlKind, ControlOrigin, RepeatingScope, SectionKind, SectionScope};
use crate::naming::NameRegistry;
use std::collections::{HashMap, HashSet, VecDeque};

/// A caption fragment remembered for the current grid neighborhood
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCandidate {
    pub text: String,
    pub row: usize,
    pub col: usize,
}

/// Typed guard key for template expansion, compared structurally so string
/// formatting can never collide two distinct call sites
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpansionKey {
    pub mode: String,
    pub select: String,
    pub repeating_path: String,
    pub section_path: String,
}

/// The scope context passed down the recursive walk.
///
/// Cosmetic/conditional sections and repeating scopes are two independent
/// stacks; a control can be inside both at once, and the innermost entry of
/// each always wins when tagging.
#[derive(Debug, Clone, Default)]
pub struct WalkContext {
    pub sections: Vec<(String, SectionKind)>,
    pub repeating: Vec<RepeatingScope>,
    pub origin: ControlOrigin,
    pub depth: usize,
}

impl WalkContext {
    /// One level deeper, same scopes
    pub fn deeper(&self) -> Self {
        let mut next = self.clone();
        next.depth += 1;
        next
    }

    /// One level deeper with a section entry appended
    pub fn with_section(&self, name: String, kind: SectionKind) -> Self {
        let mut next = self.deeper();
        next.sections.push((name, kind));
        next
    }

    /// One level deeper with a repeating scope appended
    pub fn with_repeating(&self, scope: RepeatingScope) -> Self {
        let mut next = self.deeper();
        next.repeating.push(scope);
        next
    }

    /// Same depth and scopes, different capture origin
    pub fn with_origin(&self, origin: ControlOrigin) -> Self {
        let mut next = self.clone();
        next.origin = origin;
        next
    }

    pub fn current_section(&self) -> Option<&(String, SectionKind)> {
        self.sections.last()
    }

    pub fn current_repeating(&self) -> Option<&RepeatingScope> {
        self.repeating.last()
    }

    /// The enclosing repeating bindings joined into a path, for guard keys
    pub fn repeating_path(&self) -> String {
        self.repeating
            .iter()
            .map(|s| s.binding.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// The enclosing section names joined into a path, for guard keys
    pub fn section_path(&self) -> String {
        self.sections
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// The mutable per-view traversal state
#[derive(Debug)]
pub struct ParserState {
    next_doc_index: usize,
    pub row: usize,
    pub col: usize,
    repeating_counter: usize,
    section_counter: usize,
    control_counters: HashMap<ControlKind, usize>,
    pub names: NameRegistry,
    seen_ids: HashMap<String, usize>,
    lookback: VecDeque<LabelCandidate>,
    expanding: HashSet<ExpansionKey>,
    expanded_modes: HashSet<String>,
    pub expansions: usize,
    pub controls: Vec<Control>,
    pub sections: Vec<SectionScope>,
    control_limit_logged: bool,
    section_limit_logged: bool,
}

impl ParserState {
    pub fn new() -> Self {
        Self {
            next_doc_index: 0,
            row: 0,
            col: 0,
            repeating_counter: 0,
            section_counter: 0,
            control_counters: HashMap::new(),
            names: NameRegistry::new(),
            seen_ids: HashMap::new(),
            lookback: VecDeque::with_capacity(LABEL_LOOKBACK_CAPACITY),
            expanding: HashSet::new(),
            expanded_modes: HashSet::new(),
            expansions: 0,
            controls: Vec::new(),
            sections: Vec::new(),
            control_limit_logged: false,
            section_limit_logged: false,
        }
    }

    /// The next monotonic capture index
    pub fn next_doc_index(&mut self) -> usize {
        self.next_doc_index += 1;
        self.next_doc_index
    }

    /// Advance the row counter and reset the column counter
    pub fn advance_row(&mut self) {
        self.row += 1;
        self.col = 0;
    }

    /// The next ordinal for a repeating scope fallback name
    pub fn next_repeating_ordinal(&mut self) -> usize {
        self.repeating_counter += 1;
        self.repeating_counter
    }

    /// The next ordinal for a cosmetic section fallback name
    pub fn next_section_ordinal(&mut self) -> usize {
        self.section_counter += 1;
        self.section_counter
    }

    /// The next per-kind ordinal for a control fallback name
    pub fn next_control_ordinal(&mut self, kind: ControlKind) -> usize {
        let counter = self.control_counters.entry(kind).or_insert(0);
        *counter += 1;
        *counter
    }

    // ── Label lookback ──────────────────────────────────────────────────

    /// Remember a caption candidate, evicting the oldest past capacity
    pub fn push_lookback(&mut self, candidate: LabelCandidate) {
        if self.lookback.len() >= LABEL_LOOKBACK_CAPACITY {
            self.lookback.pop_front();
        }
        self.lookback.push_back(candidate);
    }

    /// Take the most recent caption candidate, regardless of position
    pub fn take_recent_caption(&mut self) -> Option<LabelCandidate> {
        self.lookback.pop_back()
    }

    /// Take the most recent caption candidate on the given row
    pub fn take_caption_for_row(&mut self, row: usize) -> Option<LabelCandidate> {
        let idx = self.lookback.iter().rposition(|c| c.row == row)?;
        self.lookback.remove(idx)
    }

    pub fn lookback_len(&self) -> usize {
        self.lookback.len()
    }

    // ── Expansion guards ────────────────────────────────────────────────

    /// Register an expansion; false if this key is already being expanded
    pub fn begin_expansion(&mut self, key: ExpansionKey) -> bool {
        if self.expanding.insert(key) {
            self.expansions += 1;
            true
        } else {
            false
        }
    }

    /// Release an expansion guard
    pub fn end_expansion(&mut self, key: &ExpansionKey) {
        self.expanding.remove(key);
    }

    /// Record that a mode's template body has been walked at least once
    pub fn mark_mode_expanded(&mut self, mode: &str) {
        self.expanded_modes.insert(mode.to_string());
    }

    /// Whether a mode's template body has already been walked
    pub fn was_mode_expanded(&self, mode: &str) -> bool {
        self.expanded_modes.contains(mode)
    }

    // ── Dedup bookkeeping ───────────────────────────────────────────────

    pub fn seen_index(&self, ctrl_id: &str) -> Option<usize> {
        self.seen_ids.get(ctrl_id).copied()
    }

    pub fn record_seen(&mut self, ctrl_id: String, index: usize) {
        self.seen_ids.entry(ctrl_id).or_insert(index);
    }

    // ── Capacity checks ─────────────────────────────────────────────────

    /// Whether another control may be captured; logs once on first overflow
    pub fn control_capacity_left(&mut self) -> bool {
        if self.controls.len() < MAX_CONTROLS_PER_VIEW {
            return true;
        }
        if !self.control_limit_logged {
            self.control_limit_logged = true;
            crate::log_error!(
                crate::logging::codes::structure::CONTROL_LIMIT_EXCEEDED,
                "Control capture limit reached; remaining controls dropped",
                "limit" => MAX_CONTROLS_PER_VIEW
            );
        }
        false
    }

    /// Whether another section may be recorded; logs once on first overflow
    pub fn section_capacity_left(&mut self) -> bool {
        if self.sections.len() < MAX_SECTIONS_PER_VIEW {
            return true;
        }
        if !self.section_limit_logged {
            self.section_limit_logged = true;
            crate::log_error!(
                crate::logging::codes::structure::SECTION_LIMIT_EXCEEDED,
                "Section scope limit reached; remaining sections flattened",
                "limit" => MAX_SECTIONS_PER_VIEW
            );
        }
        false
    }

    // ── Section snapshots ───────────────────────────────────────────────

    /// Record a section snapshot, returning its index for the matching close
    pub fn open_section(&mut self, scope: SectionScope) -> Option<usize> {
        if !self.section_capacity_left() {
            return None;
        }
        self.sections.push(scope);
        Some(self.sections.len() - 1)
    }

    /// Fill in the end row of a previously opened section
    pub fn close_section(&mut self, index: Option<usize>) {
        if let Some(idx) = index {
            if let Some(section) = self.sections.get_mut(idx) {
                section.end_row = Some(self.row);
            }
        }
    }
}

impl Default for ParserState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_index_strictly_increases() {
        let mut state = ParserState::new();
        let a = state.next_doc_index();
        let b = state.next_doc_index();
        let c = state.next_doc_index();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_row_advancement_resets_column() {
        let mut state = ParserState::new();
        state.col = 4;
        state.advance_row();
        assert_eq!(state.row, 1);
        assert_eq!(state.col, 0);
    }

    #[test]
    fn test_lookback_bounded() {
        let mut state = ParserState::new();
        for i in 0..8 {
            state.push_lookback(LabelCandidate {
                text: format!("caption {}", i),
                row: i,
                col: 0,
            });
        }
        assert_eq!(state.lookback_len(), LABEL_LOOKBACK_CAPACITY);
        // Oldest entries were evicted
        let recent = state.take_recent_caption().unwrap();
        assert_eq!(recent.text, "caption 7");
    }

    #[test]
    fn test_lookback_row_match() {
        let mut state = ParserState::new();
        state.push_lookback(LabelCandidate {
            text: "row2".to_string(),
            row: 2,
            col: 0,
        });
        state.push_lookback(LabelCandidate {
            text: "row3".to_string(),
            row: 3,
            col: 0,
        });

        assert!(state.take_caption_for_row(5).is_none());
        let hit = state.take_caption_for_row(2).unwrap();
        assert_eq!(hit.text, "row2");
        assert_eq!(state.lookback_len(), 1);
    }

    #[test]
    fn test_expansion_guard_blocks_reentry() {
        let mut state = ParserState::new();
        let key = ExpansionKey {
            mode: "_1".to_string(),
            select: "my:items/my:item".to_string(),
            repeating_path: String::new(),
            section_path: String::new(),
        };

        assert!(state.begin_expansion(key.clone()));
        assert!(!state.begin_expansion(key.clone()));
        state.end_expansion(&key);
        assert!(state.begin_expansion(key));
    }

    #[test]
    fn test_expansion_keys_compared_structurally() {
        let mut state = ParserState::new();
        let a = ExpansionKey {
            mode: "_1".to_string(),
            select: "my:a".to_string(),
            repeating_path: "x/y".to_string(),
            section_path: String::new(),
        };
        // Same strings distributed differently across fields must not collide
        let b = ExpansionKey {
            mode: "_1".to_string(),
            select: "my:a".to_string(),
            repeating_path: "x".to_string(),
            section_path: "y".to_string(),
        };

        assert!(state.begin_expansion(a));
        assert!(state.begin_expansion(b));
    }

    #[test]
    fn test_walk_context_scope_stacks_are_independent() {
        let ctx = WalkContext::default();
        let with_section = ctx.with_section("Details".to_string(), SectionKind::Cosmetic);
        assert_eq!(with_section.sections.len(), 1);
        assert!(with_section.repeating.is_empty());
        // The original context is untouched
        assert!(ctx.sections.is_empty());
        assert_eq!(with_section.depth, 1);
    }

    #[test]
    fn test_seen_id_first_index_wins() {
        let mut state = ParserState::new();
        state.record_seen("CTRL1".to_string(), 0);
        state.record_seen("CTRL1".to_string(), 5);
        assert_eq!(state.seen_index("CTRL1"), Some(0));
    }
}
