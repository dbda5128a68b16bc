//! Ordered collections of TREs

use derive_more::derive::{Deref, IntoIterator};
use indexmap::IndexSet;

use crate::tre::{Tre, TreSource};

/// The TREs of one or more header areas, in the order they were read or added
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, IntoIterator)]
pub struct TreCollection {
    #[into_iterator(owned, ref)]
    tres: Vec<Tre>,
}

impl TreCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a TRE
    pub fn add(&mut self, tre: Tre) {
        self.tres.push(tre);
    }

    /// Remove and return the TRE at `index`, if there is one
    pub fn remove(&mut self, index: usize) -> Option<Tre> {
        (index < self.tres.len()).then(|| self.tres.remove(index))
    }

    /// Keep only the TREs for which `keep` returns true
    pub fn retain(&mut self, keep: impl FnMut(&Tre) -> bool) {
        self.tres.retain(keep);
    }

    /// Append every TRE of `other`
    pub fn merge(&mut self, other: TreCollection) {
        self.tres.extend(other.tres);
    }

    /// The TREs belonging to `source`
    pub fn tres_for_source(&self, source: TreSource) -> impl Iterator<Item = &Tre> {
        self.tres.iter().filter(move |tre| tre.source() == source)
    }

    /// The TREs tagged `name`
    pub fn tres_with_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Tre> {
        self.tres.iter().filter(move |tre| tre.name() == name)
    }

    /// Every tag in the collection, once, in order of first appearance
    pub fn unique_names(&self) -> IndexSet<&str> {
        self.tres.iter().map(Tre::name).collect()
    }

    /// Every header area in the collection, once, in order of first appearance
    pub fn sources(&self) -> IndexSet<TreSource> {
        self.tres.iter().map(Tre::source).collect()
    }
}

impl FromIterator<Tre> for TreCollection {
    fn from_iter<T: IntoIterator<Item = Tre>>(iter: T) -> Self {
        TreCollection {
            tres: iter.into_iter().collect(),
        }
    }
}

impl Extend<Tre> for TreCollection {
    fn extend<T: IntoIterator<Item = Tre>>(&mut self, iter: T) {
        self.tres.extend(iter);
    }
}
