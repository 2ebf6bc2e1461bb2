use std::num::NonZeroU64;

/// A selection of atoms to include in an analysis.
///
/// Selections are resolved against the species table of a
/// [`Trajectory`](crate::Trajectory), so the same selection value can be reused across
/// trajectories that share a labeling convention.
#[derive(Debug, Default, Clone)]
pub enum AtomSelection {
    /// Include all atoms.
    #[default]
    All,
    /// Include atoms whose species label matches any of these.
    Species(Vec<String>),
    /// A mask of the atoms to include in the selection.
    ///
    /// If the value of the mask at an index `n` is `true`, the atom at that same index `n` is
    /// included in the selection. Atoms beyond the end of the mask are excluded.
    Mask(Vec<bool>),
}

impl AtomSelection {
    /// Select a single species by label.
    pub fn species(label: impl Into<String>) -> Self {
        Self::Species(vec![label.into()])
    }

    /// Create a boolean mask from a list of indices.
    pub fn from_index_list(indices: &[u32]) -> Self {
        let max = match indices.iter().max() {
            Some(&max) => max as usize + 1,
            None => return Self::Mask(Vec::new()),
        };
        let mut mask = Vec::with_capacity(max);
        mask.resize(max, false);

        for &idx in indices {
            mask[idx as usize] = true;
        }

        Self::Mask(mask)
    }

    /// Determine whether the atom at `idx` with the label `species` is included.
    pub fn is_included(&self, idx: usize, species: &str) -> bool {
        match self {
            AtomSelection::All => true,
            AtomSelection::Species(labels) => labels.iter().any(|l| l == species),
            AtomSelection::Mask(mask) => mask.get(idx).copied().unwrap_or(false),
        }
    }

    /// Resolve this selection into the indices of the matching atoms.
    pub fn indices(&self, species: &[String]) -> Vec<usize> {
        species
            .iter()
            .enumerate()
            .filter(|&(idx, label)| self.is_included(idx, label))
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// A selection of [`Frame`](crate::Frame)s to include in an analysis.
#[derive(Debug, Default, Clone)]
pub enum FrameSelection {
    /// Include all frames that are in a trajectory.
    #[default]
    All,
    /// Include frames that lie within a certain [`Range`].
    Range(Range),
    /// Include frames that match the indices in this list.
    ///
    /// Invariant: The indices in the FrameList are _unique_ and _consecutive_.
    FrameList(Vec<usize>),
}

impl FrameSelection {
    /// Determine whether some index `idx` is included in this [`FrameSelection`].
    ///
    /// Will return [`None`] once the index is beyond the scope of this `FrameSelection`.
    pub fn is_included(&self, idx: usize) -> Option<bool> {
        match self {
            FrameSelection::All => Some(true),
            FrameSelection::Range(range) => range.is_included(idx as u64),
            FrameSelection::FrameList(indices) => {
                if *indices.last()? < idx {
                    None
                } else {
                    Some(indices.contains(&idx))
                }
            }
        }
    }

    /// The exclusive upper bound of this selection, if one exists.
    pub fn until(&self) -> Option<usize> {
        match self {
            FrameSelection::All => None,
            FrameSelection::Range(range) => range.end.map(|end| end as usize),
            FrameSelection::FrameList(list) => list.iter().max().map(|&max| max + 1),
        }
    }
}

/// A range of frames to be drawn from a trajectory.
///
/// The `start` of a range is always bounded, and is zero by default.
/// The `end` may be bounded or unbounded. In case the end is unbounded ([`None`]), all frames
/// up to and including the last one are considered. If it is bounded by [`Some`] value, that
/// bound is exclusive.
/// The `step` describes the number of frames that passed in each stride.
/// The number of skipped frames is equal to `step` - 1.
/// For instance, given a `step` of four, one frame is considered and the following three are
/// skipped.
///
/// # Note
///
/// An instance where `start` > `end` is a valid `Range`, but it will not make much sense,
/// since it will be understood to produce zero frames.
#[derive(Debug, Clone, Copy)]
pub struct Range {
    /// The `start` of a [`Range`] is always bounded, and is zero by default.
    pub start: u64,
    /// The `end` may be bounded or unbounded.
    ///
    /// When `end` is bounded, it is an exclusive bound.
    pub end: Option<u64>,
    /// The `step` describes the number of frames that passed in each stride.
    pub step: NonZeroU64,
}

impl Range {
    pub fn new(start: Option<u64>, end: Option<u64>, step: Option<NonZeroU64>) -> Self {
        let mut sel = Self {
            end,
            ..Self::default()
        };
        if let Some(start) = start {
            sel.start = start;
        }
        if let Some(step) = step {
            sel.step = step;
        }
        sel
    }

    fn is_included(&self, idx: u64) -> Option<bool> {
        if let Some(end) = self.end {
            // Determine whether `idx` is already beyond the defined range.
            if end <= idx {
                return None;
            }
        }
        let in_range = self.start <= idx;
        let in_step = self.step.get() == 1 || (idx + self.start) % self.step == 0;
        Some(in_range && in_step)
    }
}

impl Default for Range {
    fn default() -> Self {
        Self {
            start: 0,
            end: None,
            step: NonZeroU64::new(1).unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod frame {
        use std::num::NonZeroU64;

        use super::{FrameSelection, Range};

        #[test]
        fn zero_selection() {
            let list_empty = FrameSelection::FrameList(vec![]);
            let list_zero = FrameSelection::FrameList(vec![0]);
            let range_empty = FrameSelection::Range(Range::new(None, Some(0), None));

            for idx in 0..1000 {
                assert!(list_empty.is_included(idx).is_none());
                if idx > 0 {
                    assert!(list_zero.is_included(idx).is_none());
                }
                assert!(range_empty.is_included(idx).is_none());
            }
        }

        #[test]
        fn first_n() {
            let n = 100;
            let step = NonZeroU64::new(17).unwrap();

            let list = FrameSelection::FrameList((0..=n).collect());
            let until = FrameSelection::Range(Range::new(None, Some(n as u64), None));
            let from_n = FrameSelection::Range(Range::new(Some(n as u64), None, None));
            let until_stepped = FrameSelection::Range(Range::new(None, Some(n as u64), Some(step)));
            let from_n_stepped =
                FrameSelection::Range(Range::new(Some(n as u64), None, Some(step)));
            let all = FrameSelection::All;

            for idx in 0..2 * n {
                if idx < n {
                    assert_eq!(list.is_included(idx), Some(true));
                    assert_eq!(until.is_included(idx), Some(true));
                    assert_eq!(
                        until_stepped.is_included(idx),
                        Some(idx as u64 % step.get() == 0),
                    );
                } else {
                    assert!(list.is_included(idx).is_none());
                    assert!(until.is_included(idx).is_none());
                    assert!(until_stepped.is_included(idx).is_none());
                }
                let from_n_included = idx >= n;
                assert_eq!(from_n.is_included(idx), Some(from_n_included));
                assert_eq!(
                    from_n_stepped.is_included(idx),
                    Some(from_n_included && (n as u64 + idx as u64) % step.get() == 0),
                );
                assert_eq!(all.is_included(idx), Some(true));
            }
        }

        #[test]
        fn until_bounds() {
            assert_eq!(FrameSelection::All.until(), None);
            assert_eq!(
                FrameSelection::Range(Range::new(None, Some(42), None)).until(),
                Some(42)
            );
            assert_eq!(FrameSelection::FrameList(vec![3, 7, 11]).until(), Some(12));
            assert_eq!(FrameSelection::FrameList(vec![]).until(), None);
        }
    }

    mod atom {
        use super::AtomSelection;

        fn labels(names: &[&str]) -> Vec<String> {
            names.iter().map(|s| s.to_string()).collect()
        }

        #[test]
        fn zero_selection() {
            let species = labels(&["CA", "F", "F", "CA"]);

            let mask_empty = AtomSelection::Mask(vec![]);
            let mask_false = AtomSelection::Mask(vec![false; species.len()]);
            let list_empty = AtomSelection::from_index_list(&[]);
            let no_such_species = AtomSelection::species("XX");

            assert!(mask_empty.indices(&species).is_empty());
            assert!(mask_false.indices(&species).is_empty());
            assert!(list_empty.indices(&species).is_empty());
            assert!(no_such_species.indices(&species).is_empty());
        }

        #[test]
        fn by_species() {
            let species = labels(&["CA", "F", "F", "CA", "F"]);

            let calcium = AtomSelection::species("CA");
            let fluorine = AtomSelection::species("F");
            let both = AtomSelection::Species(vec!["CA".to_string(), "F".to_string()]);
            let all = AtomSelection::All;

            assert_eq!(calcium.indices(&species), vec![0, 3]);
            assert_eq!(fluorine.indices(&species), vec![1, 2, 4]);
            assert_eq!(both.indices(&species), vec![0, 1, 2, 3, 4]);
            assert_eq!(all.indices(&species), vec![0, 1, 2, 3, 4]);
        }

        #[test]
        fn by_mask() {
            let species = labels(&["CA", "F", "F", "CA", "F"]);

            let mask = AtomSelection::Mask(vec![true, false, true]);
            let list = AtomSelection::from_index_list(&[4, 0]);

            // A short mask excludes everything past its end.
            assert_eq!(mask.indices(&species), vec![0, 2]);
            assert_eq!(list.indices(&species), vec![0, 4]);
        }
    }
}
