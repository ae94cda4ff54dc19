//! Sequence diff for repeated rules.

use std::ops::{Index, IndexMut, Range};

/// The changed positions between two snapshots of an array.
///
/// Deletions are indices into the old array. Insertions and modifications
/// are indices into the new array. Applying deletions from the highest index
/// down, then insertions from the lowest index up, then modifications turns
/// the old array into the new one (see [`Delta::apply`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    /// Removed positions, ascending, in the old array.
    pub deletions: Vec<usize>,
    /// Added positions, ascending, in the new array.
    pub insertions: Vec<usize>,
    /// Positions whose value was replaced in place, ascending, in the new array.
    pub modifications: Vec<usize>,
}

impl Delta {
    /// Check if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.insertions.is_empty() && self.modifications.is_empty()
    }

    /// Replay this delta on `items`, taking new values from `new`.
    pub fn apply<T: Clone>(&self, items: &mut Vec<T>, new: &[T]) {
        for &index in self.deletions.iter().rev() {
            items.remove(index);
        }
        for &index in &self.insertions {
            items.insert(index, new[index].clone());
        }
        for &index in &self.modifications {
            items[index] = new[index].clone();
        }
    }
}

/// Compute the changes that turn `old` into `new`.
///
/// The alignment is a shortest edit script (Myers, linear space), so a
/// reorder costs time proportional to the array size times the number of
/// edits and memory proportional to the array size. Between two unchanged
/// items, deleted and inserted items are paired up in order; each pair is
/// reported as one modification at the new index.
///
/// # Example
///
/// ```
/// use tessera_style::foreach::diff;
///
/// let delta = diff(&[1, 2, 3], &[1, 3, 4]);
/// assert_eq!(delta.deletions, [1]);
/// assert_eq!(delta.insertions, [2]);
/// assert!(delta.modifications.is_empty());
/// ```
pub fn diff<T: PartialEq>(old: &[T], new: &[T]) -> Delta {
    let max_d = (old.len() + new.len() + 1) / 2 + 1;
    let mut script = Script::default();
    let mut forward = Frontier::new(max_d);
    let mut backward = Frontier::new(max_d);
    conquer(
        old,
        0..old.len(),
        new,
        0..new.len(),
        &mut forward,
        &mut backward,
        &mut script,
    );
    script.finish()
}

/// Furthest x reached on each diagonal `k = x - y`.
struct Frontier {
    offset: isize,
    reach: Vec<usize>,
}

impl Frontier {
    fn new(max_d: usize) -> Self {
        Self {
            offset: max_d as isize,
            reach: vec![0; 2 * max_d + 1],
        }
    }

    fn slot(&self, k: isize) -> usize {
        (k + self.offset) as usize
    }
}

impl Index<isize> for Frontier {
    type Output = usize;

    fn index(&self, k: isize) -> &usize {
        &self.reach[self.slot(k)]
    }
}

impl IndexMut<isize> for Frontier {
    fn index_mut(&mut self, k: isize) -> &mut usize {
        let slot = self.slot(k);
        &mut self.reach[slot]
    }
}

fn common_prefix<T: PartialEq>(old: &[T], new: &[T]) -> usize {
    old.iter().zip(new).take_while(|(a, b)| a == b).count()
}

fn common_suffix<T: PartialEq>(old: &[T], new: &[T]) -> usize {
    old.iter()
        .rev()
        .zip(new.iter().rev())
        .take_while(|(a, b)| a == b)
        .count()
}

/// Split both ranges on a stretch of equal items in the middle of an
/// optimal path, searching from both ends at once.
///
/// Both ranges must be non-empty and share no common prefix or suffix.
fn middle_snake<T: PartialEq>(
    old: &[T],
    old_range: Range<usize>,
    new: &[T],
    new_range: Range<usize>,
    forward: &mut Frontier,
    backward: &mut Frontier,
) -> Option<(usize, usize)> {
    let n = old_range.len();
    let m = new_range.len();
    let delta = n as isize - m as isize;
    let odd = delta & 1 == 1;
    let max_d = ((n + m + 1) / 2 + 1) as isize;
    forward[1] = 0;
    backward[1] = 0;

    for d in 0..max_d {
        for k in (-d..=d).rev().step_by(2) {
            let mut x = if k == -d || (k != d && forward[k - 1] < forward[k + 1]) {
                forward[k + 1]
            } else {
                forward[k - 1] + 1
            };
            let y = (x as isize - k) as usize;
            let start = (x, y);
            if x < n && y < m {
                x += common_prefix(
                    &old[old_range.start + x..old_range.end],
                    &new[new_range.start + y..new_range.end],
                );
            }
            forward[k] = x;
            if odd && (k - delta).abs() < d && forward[k] + backward[-(k - delta)] >= n {
                return Some((old_range.start + start.0, new_range.start + start.1));
            }
        }

        for k in (-d..=d).rev().step_by(2) {
            let mut x = if k == -d || (k != d && backward[k - 1] < backward[k + 1]) {
                backward[k + 1]
            } else {
                backward[k - 1] + 1
            };
            let mut y = (x as isize - k) as usize;
            if x < n && y < m {
                let advance = common_suffix(
                    &old[old_range.start..old_range.start + n - x],
                    &new[new_range.start..new_range.start + m - y],
                );
                x += advance;
                y += advance;
            }
            backward[k] = x;
            if !odd && (k - delta).abs() <= d && backward[k] + forward[-(k - delta)] >= n {
                return Some((old_range.start + n - x, new_range.start + m - y));
            }
        }
    }
    None
}

fn conquer<T: PartialEq>(
    old: &[T],
    mut old_range: Range<usize>,
    new: &[T],
    mut new_range: Range<usize>,
    forward: &mut Frontier,
    backward: &mut Frontier,
    script: &mut Script,
) {
    let prefix = common_prefix(&old[old_range.clone()], &new[new_range.clone()]);
    script.equal(prefix);
    old_range.start += prefix;
    new_range.start += prefix;

    let suffix = common_suffix(&old[old_range.clone()], &new[new_range.clone()]);
    old_range.end -= suffix;
    new_range.end -= suffix;

    if old_range.is_empty() || new_range.is_empty() {
        script.delete(old_range);
        script.insert(new_range);
    } else if let Some((x, y)) = middle_snake(
        old,
        old_range.clone(),
        new,
        new_range.clone(),
        forward,
        backward,
    ) {
        conquer(old, old_range.start..x, new, new_range.start..y, forward, backward, script);
        conquer(old, x..old_range.end, new, y..new_range.end, forward, backward, script);
    } else {
        script.delete(old_range);
        script.insert(new_range);
    }

    script.equal(suffix);
}

/// Edit script builder; each run of equal items closes the pending hunk.
#[derive(Default)]
struct Script {
    delta: Delta,
    deleted: Vec<usize>,
    inserted: Vec<usize>,
}

impl Script {
    fn equal(&mut self, len: usize) {
        if len > 0 {
            self.flush();
        }
    }

    fn delete(&mut self, old: Range<usize>) {
        self.deleted.extend(old);
    }

    fn insert(&mut self, new: Range<usize>) {
        self.inserted.extend(new);
    }

    fn flush(&mut self) {
        let paired = self.deleted.len().min(self.inserted.len());
        self.delta.modifications.extend(&self.inserted[..paired]);
        self.delta.deletions.extend(&self.deleted[paired..]);
        self.delta.insertions.extend(&self.inserted[paired..]);
        self.deleted.clear();
        self.inserted.clear();
    }

    fn finish(mut self) -> Delta {
        self.flush();
        self.delta
    }
}
