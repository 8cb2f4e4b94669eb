use crate::{
    db::record::Record,
    key::{Key, KeyRange, KeySelector},
    value::Value,
};

///
/// KeyOrdered
///
/// A sequence element addressable by the binary search. Implemented by
/// primary records and by secondary index entries, so both kinds of ordered
/// sequence share one location model.
///

pub trait KeyOrdered {
    fn sort_key(&self) -> &Key;
}

impl KeyOrdered for Record {
    fn sort_key(&self) -> &Key {
        self.key()
    }
}

///
/// Location
///
/// A binary-search result over an ordered sequence: the index of the nearest
/// element strictly less than the probe (`ls`), the first exact match (`eq`),
/// and the nearest element strictly greater (`gt`, the sequence length when
/// none exists).
///
/// Invariants: `ls < eq < gt` when a match exists; otherwise `ls + 1 == gt`
/// and `gt` is the insertion point for the probe. A location is a disposable
/// query result borrowing the sequence it was computed over - never stored.
///

#[derive(Debug)]
pub struct Location<'a, T: KeyOrdered> {
    seq: &'a [T],
    ls: Option<usize>,
    eq: Option<usize>,
    gt: usize,
}

impl<'a, T: KeyOrdered> Location<'a, T> {
    /// Binary-search the sequence for an exact key.
    ///
    /// O(log n); with duplicate keys `eq` resolves to the first occurrence
    /// and `ls`/`gt` to the tightest surrounding bounds.
    #[must_use]
    pub fn search(seq: &'a [T], probe: &Key) -> Self {
        let lower = seq.partition_point(|element| element.sort_key() < probe);
        let upper = seq.partition_point(|element| element.sort_key() <= probe);

        Self {
            seq,
            ls: lower.checked_sub(1),
            eq: (lower < upper).then_some(lower),
            gt: upper,
        }
    }

    /// Locate the first element whose key falls inside the range.
    ///
    /// When a match exists the location brackets that single element
    /// (`gt == eq + 1`); when none does, `gt` is where the range's lower
    /// edge would splice in.
    #[must_use]
    pub fn search_range(seq: &'a [T], range: &KeyRange) -> Self {
        let start = match range.lower() {
            Some(lower) if range.lower_open() => {
                seq.partition_point(|element| element.sort_key() <= lower)
            }
            Some(lower) => seq.partition_point(|element| element.sort_key() < lower),
            None => 0,
        };

        let matched = seq
            .get(start)
            .is_some_and(|element| range.contains(element.sort_key()));

        Self {
            seq,
            ls: start.checked_sub(1),
            eq: matched.then_some(start),
            gt: if matched { start + 1 } else { start },
        }
    }

    /// Locate by key or by range.
    #[must_use]
    pub fn search_selector(seq: &'a [T], selector: &KeySelector) -> Self {
        match selector {
            KeySelector::Key(key) => Self::search(seq, key),
            KeySelector::Range(range) => Self::search_range(seq, range),
        }
    }

    /// Assemble a location from indices a caller already holds.
    #[must_use]
    pub fn from_parts(seq: &'a [T], ls: Option<usize>, eq: Option<usize>, gt: usize) -> Self {
        debug_assert!(
            match eq {
                Some(eq) => ls.is_none_or(|ls| ls < eq) && eq < gt,
                None => ls.map_or(0, |ls| ls + 1) == gt,
            },
            "inconsistent location indices"
        );

        Self { seq, ls, eq, gt }
    }

    #[must_use]
    pub const fn ls(&self) -> Option<usize> {
        self.ls
    }

    #[must_use]
    pub const fn eq(&self) -> Option<usize> {
        self.eq
    }

    #[must_use]
    pub const fn gt(&self) -> usize {
        self.gt
    }

    #[must_use]
    pub const fn found(&self) -> bool {
        self.eq.is_some()
    }

    /// Where a non-matching probe would splice into the sequence.
    #[must_use]
    pub fn insertion_index(&self) -> usize {
        self.eq.unwrap_or(self.gt)
    }

    /// The matched element, when one exists.
    #[must_use]
    pub fn element(&self) -> Option<&'a T> {
        self.eq.and_then(|index| self.seq.get(index))
    }

    /// The matched element's key.
    #[must_use]
    pub fn key(&self) -> Option<&'a Key> {
        self.element().map(KeyOrdered::sort_key)
    }
}

impl<'a> Location<'a, Record> {
    /// The matched record.
    #[must_use]
    pub fn record(&self) -> Option<&'a Record> {
        self.element()
    }

    /// The matched record's payload.
    #[must_use]
    pub fn value(&self) -> Option<&'a Value> {
        self.element().map(Record::value)
    }
}

///
/// TESTS
///
