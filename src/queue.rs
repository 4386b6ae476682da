use crate::token::Token;
use crate::unit::{Annotation, Category, StatementKind, WorkUnit};

/// The ordered sequence of work units one pipeline run owns. Taggers edit
/// units in place; units are never added, removed or reordered after the
/// queue is built.
#[derive(Debug, Clone, Default)]
pub struct WorkQueue {
    units: Vec<WorkUnit>,
}

impl WorkQueue {
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            units: tokens.into_iter().map(WorkUnit::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WorkUnit> {
        self.units.get(index)
    }

    pub fn units(&self) -> &[WorkUnit] {
        &self.units
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WorkUnit> {
        self.units.iter()
    }

    /// Assign `kind` to the unit at `index` if it is still unclassified.
    /// Returns whether the claim took effect; units claimed by an earlier
    /// tagger are left alone.
    pub fn claim(&mut self, index: usize, kind: StatementKind) -> bool {
        match self.units.get_mut(index) {
            Some(unit) if unit.category == Category::Unclassified => {
                unit.category = Category::Tagged(kind);
                true
            }
            _ => false,
        }
    }

    /// Record spacing decisions for the unit at `index`.
    pub fn annotate(&mut self, index: usize, annotation: Annotation) {
        if let Some(unit) = self.units.get_mut(index) {
            unit.vertical_space = annotation.vertical_space;
            unit.indent_level = annotation.indent_level;
            unit.leading_space = annotation.leading_space;
        }
    }

    /// Replace the rendered value of the unit at `index`.
    pub fn set_value(&mut self, index: usize, value: compact_str::CompactString) {
        if let Some(unit) = self.units.get_mut(index) {
            unit.value = value;
        }
    }

    /// Index of the last non-comment unit before `index`.
    pub fn previous_significant(&self, index: usize) -> Option<usize> {
        self.units[..index.min(self.units.len())]
            .iter()
            .rposition(|u| !u.is_comment())
    }

    /// Index of the next non-comment unit after `index`.
    pub fn next_significant(&self, index: usize) -> Option<usize> {
        let start = index + 1;
        if start >= self.units.len() {
            return None;
        }
        self.units[start..]
            .iter()
            .position(|u| !u.is_comment())
            .map(|offset| start + offset)
    }

    pub fn unclassified_count(&self) -> usize {
        self.units
            .iter()
            .filter(|u| u.category == Category::Unclassified)
            .count()
    }
}
