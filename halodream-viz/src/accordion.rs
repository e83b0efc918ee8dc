//! FAQ accordion state
//!
//! Each question/answer pair is collapsed or expanded on its own; opening one
//! pair never closes another.

/// Expanded flags, one per question/answer pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accordion {
    expanded: Vec<bool>,
}

impl Accordion {
    /// All `count` pairs start collapsed
    pub fn new(count: usize) -> Self {
        Self {
            expanded: vec![false; count],
        }
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Flip pair `index`; returns its new state, or `None` if out of range
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let slot = self.expanded.get_mut(index)?;
        *slot = !*slot;
        Some(*slot)
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.get(index).copied().unwrap_or(false)
    }

    /// Indices of currently expanded pairs
    pub fn expanded(&self) -> impl Iterator<Item = usize> + '_ {
        self.expanded
            .iter()
            .enumerate()
            .filter_map(|(i, open)| open.then_some(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_collapsed() {
        let faq = Accordion::new(3);
        assert_eq!(faq.len(), 3);
        assert_eq!(faq.expanded().count(), 0);
    }

    #[test]
    fn toggle_expands_then_collapses() {
        let mut faq = Accordion::new(2);
        assert_eq!(faq.toggle(0), Some(true));
        assert!(faq.is_expanded(0));
        assert_eq!(faq.toggle(0), Some(false));
        assert!(!faq.is_expanded(0));
    }

    #[test]
    fn pairs_are_independent() {
        let mut faq = Accordion::new(4);
        faq.toggle(1);
        faq.toggle(3);

        assert_eq!(faq.expanded().collect::<Vec<_>>(), vec![1, 3]);

        faq.toggle(3);
        assert!(faq.is_expanded(1));
        assert!(!faq.is_expanded(3));
        assert!(!faq.is_expanded(0));
    }

    #[test]
    fn out_of_range_is_a_no_op() {
        let mut faq = Accordion::new(1);
        assert_eq!(faq.toggle(5), None);
        assert!(!faq.is_expanded(5));
        assert_eq!(faq, Accordion::new(1));
    }

    #[test]
    fn empty_accordion() {
        let mut faq = Accordion::default();
        assert!(faq.is_empty());
        assert_eq!(faq.toggle(0), None);
    }
}
