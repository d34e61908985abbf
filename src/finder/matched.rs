//! Successful search payload

/// Elements found by a search: one element, or several in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matched<E> {
    One(E),
    /// Always holds at least two elements
    Many(Vec<E>),
}

impl<E> Matched<E> {
    /// `None` for an empty round
    pub(crate) fn from_matches(mut matches: Vec<E>) -> Option<Self> {
        match matches.len() {
            0 => None,
            1 => matches.pop().map(Matched::One),
            _ => Some(Matched::Many(matches)),
        }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Matched::One(_) => 1,
            Matched::Many(all) => all.len(),
        }
    }

    #[must_use]
    pub fn is_many(&self) -> bool {
        matches!(self, Matched::Many(_))
    }

    /// First element in document order
    #[must_use]
    pub fn first(&self) -> Option<&E> {
        match self {
            Matched::One(element) => Some(element),
            Matched::Many(all) => all.first(),
        }
    }

    /// The element when exactly one matched
    #[must_use]
    pub fn into_single(self) -> Option<E> {
        match self {
            Matched::One(element) => Some(element),
            Matched::Many(_) => None,
        }
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<E> {
        match self {
            Matched::One(element) => vec![element],
            Matched::Many(all) => all,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        match self {
            Matched::One(element) => std::slice::from_ref(element).iter(),
            Matched::Many(all) => all.iter(),
        }
    }
}

impl<E> IntoIterator for Matched<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}
