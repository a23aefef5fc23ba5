//! Oblivious sorting of secret columns with Batcher's odd-even merge sort.
//!
//! The comparators of a sorting network are fixed by the number of cells alone, so the cells
//! that are compared and exchanged do not depend on the data. For lengths that are not a power of
//! two, the network for the next power of two is pruned: comparators touching an index beyond the
//! end of the column are dropped, as if the missing cells held an infinitely large value.
//!
//! See <https://en.wikipedia.org/wiki/Batcher_odd%E2%80%93even_mergesort>.

use tracing::{Level, debug, instrument};

use crate::{
    column::{Cell, SecretColumn},
    substrate::Substrate,
};

/// A comparator network, as a sequence of layers of disjoint index pairs `(low, high)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortingNetwork {
    layers: Vec<Vec<(usize, usize)>>,
}

impl SortingNetwork {
    /// The (pruned) Batcher odd-even merge sort network for `size` elements.
    pub fn batcher(size: usize) -> Self {
        let mut layers = vec![];
        let mut p = 1;
        while p < size {
            let mut k = p;
            while k >= 1 {
                let mut layer = vec![];
                let mut j = k % p;
                while j + k < size {
                    for i in 0..k.min(size - j - k) {
                        if (i + j) / (2 * p) == (i + j + k) / (2 * p) {
                            layer.push((i + j, i + j + k));
                        }
                    }
                    j += 2 * k;
                }
                if !layer.is_empty() {
                    layers.push(layer);
                }
                k /= 2;
            }
            p *= 2;
        }
        Self { layers }
    }

    /// The layers of the network; comparators within a layer are independent of each other.
    pub fn layers(&self) -> &[Vec<(usize, usize)>] {
        &self.layers
    }

    /// The total number of comparators.
    pub fn comparators(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }
}

/// Obliviously orders a pair of cells: present cells before absent ones, ascending by value.
fn compare_exchange<S: Substrate>(s: &mut S, a: &Cell<S>, b: &Cell<S>) -> (Cell<S>, Cell<S>) {
    let a_missing = s.not(&a.present);
    let b_smaller = s.lt(&b.value, &a.value);
    let b_first = s.or(&a_missing, &b_smaller);
    let swap = s.and(&b.present, &b_first);
    let low = Cell::select(s, &swap, b, a);
    let high = Cell::select(s, &swap, a, b);
    (low, high)
}

/// Returns the present cells of a column in ascending order, followed by all absent cells.
#[instrument(level = Level::DEBUG, skip_all, fields(rows = column.len()))]
pub fn sort<S: Substrate>(s: &mut S, column: &SecretColumn<S>) -> SecretColumn<S> {
    let network = SortingNetwork::batcher(column.len());
    debug!(comparators = network.comparators(), "Sorting column");
    let mut cells = column.cells().to_vec();
    for layer in network.layers() {
        for &(i, j) in layer {
            let (low, high) = compare_exchange(s, &cells[i], &cells[j]);
            cells[i] = low;
            cells[j] = high;
        }
    }
    SecretColumn::from_cells(cells)
}
