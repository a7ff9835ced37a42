
// imports
use crate::corpus::{Corpus, NTOK};

use ndarray::prelude::*;
use ndarray::Array;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;

// squared euclidean distance between two vectors
pub fn sqdist(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    let mut sum = 0.0;
    for (ai, bi) in a.iter().zip(b.iter()) {
        let d = ai - bi;
        sum += d * d;
    }
    sum
}

// per-slot embedding matrices, one row per id. A row exists for every id
// the corpus observed in that slot; the presence mask replaces the nullable
// per-id pointers of a sparser layout, absent rows stay zero and are never
// read or written.
#[derive(Clone)]
pub struct EmbeddingStore {
    pub vec: [Array2<f32>; NTOK],
    pub present: [Vec<bool>; NTOK],
    pub ndim: usize,
}

impl EmbeddingStore {

    pub fn new(corpus: &Corpus, ndim: usize) -> EmbeddingStore {
        let rows = corpus.qmax + 1;
        let present = [
            corpus.cnt[0].iter().map(|c| *c > 0).collect(),
            corpus.cnt[1].iter().map(|c| *c > 0).collect(),
        ];
        Self {
            vec: [Array2::zeros((rows, ndim)), Array2::zeros((rows, ndim))],
            present,
            ndim,
        }
    }

    // draws fresh uniform components for every present row and rescales
    // each row to unit norm; invoked once per restart
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        for slot in 0..NTOK {
            for id in 1..self.present[slot].len() {
                if !self.present[slot][id] {
                    continue;
                }
                let row = Array::random_using(self.ndim, Uniform::new(-0.5, 0.5), rng);
                self.vec[slot].row_mut(id).assign(&row);
                self.normalize(slot, id);
            }
        }
    }

    // rescales one row to unit euclidean norm
    pub fn normalize(&mut self, slot: usize, id: usize) {
        let mut row = self.vec[slot].row_mut(id);
        let norm = row.iter().map(|v| v * v).sum::<f32>().sqrt();
        row.mapv_inplace(|v| v / norm);
    }

    // deep copy of the whole current store, used for best-restart retention
    pub fn snapshot_from(&mut self, other: &EmbeddingStore) {
        self.clone_from(other);
    }

    pub fn row(&self, slot: usize, id: usize) -> ArrayView1<f32> {
        self.vec[slot].row(id)
    }

}

#[cfg(test)]
mod tests {

    use super::{sqdist, EmbeddingStore};
    use crate::corpus::{Corpus, LineSource};
    use crate::vocab::Vocab;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn toy_corpus() -> Corpus {
        let mut source = LineSource::from_reader(Cursor::new("a x\na y\nb x\n".to_owned()));
        let mut vocab = Vocab::new();
        Corpus::read(&mut source, &mut vocab).unwrap()
    }

    #[test]
    fn sqdist_matches_hand_value() {
        let a = array![1.0f32, 0.0, 2.0];
        let b = array![0.0f32, 2.0, 0.0];
        assert!((sqdist(a.view(), b.view()) - 9.0).abs() < 1e-6);
    }

    #[test]
    fn randomize_yields_unit_rows_for_present_ids_only() {
        let corpus = toy_corpus();
        let mut store = EmbeddingStore::new(&corpus, 5);
        let mut rng = StdRng::seed_from_u64(3);
        store.randomize(&mut rng);

        for slot in 0..2 {
            for id in 1..=corpus.qmax {
                let norm2: f32 = store.row(slot, id).iter().map(|v| v * v).sum();
                if store.present[slot][id] {
                    assert!((norm2 - 1.0).abs() < 1e-5, "slot {} id {} norm2 {}", slot, id, norm2);
                } else {
                    assert_eq!(norm2, 0.0);
                }
            }
        }
        // a (id 1) only occurs in slot 0, x (id 2) only in slot 1
        assert!(store.present[0][1] && !store.present[1][1]);
        assert!(!store.present[0][2] && store.present[1][2]);
    }

    #[test]
    fn snapshot_copies_every_row() {
        let corpus = toy_corpus();
        let mut store = EmbeddingStore::new(&corpus, 4);
        let mut best = EmbeddingStore::new(&corpus, 4);
        let mut rng = StdRng::seed_from_u64(9);
        store.randomize(&mut rng);
        best.snapshot_from(&store);
        assert_eq!(best.vec[0], store.vec[0]);
        assert_eq!(best.vec[1], store.vec[1]);
        // mutating the snapshot leaves the original alone
        best.vec[0][[1, 0]] += 1.0;
        assert_ne!(best.vec[0], store.vec[0]);
    }

}
