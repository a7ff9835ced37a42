
// imports
use crate::config::Params;
use crate::corpus::{Corpus, NTOK};
use crate::embeddings::{sqdist, EmbeddingStore};

use ndarray::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// learning rate schedule constants: rate(n) = NU0 * PHI0 / (PHI0 + n).
// hyperbolic decay, no floor; frequently visited ids take ever-smaller steps.
pub const PHI0: f32 = 50.0;
pub const NU0: f32 = 0.2;

// receives training progress events; stdout stays reserved for the
// final vector table
pub trait ProgressSink {
    fn log(&mut self, msg: String);
}

pub struct StderrSink;

impl ProgressSink for StderrSink {
    fn log(&mut self, msg: String) {
        eprintln!("{}", msg);
    }
}

// owns every piece of restart-scoped mutable training state: the current
// and best stores, the per-slot visit counters and the rng. The corpus and
// params stay frozen for the trainer's lifetime.
pub struct Trainer<'a> {
    corpus: &'a Corpus,
    params: &'a Params,
    store: EmbeddingStore,
    best: EmbeddingStore,
    visits: [Vec<u32>; NTOK],
    rng: StdRng,
    best_logl: f64,
    pub restart_scores: Vec<f64>,
}

// one contrastive step for a single vector: attract x toward y, repel it
// from y2 with weight exp(-|x - y2|^2) / z, accumulating every dimension's
// move before rescaling with the post-update norm. Returns the summed
// squared movement, a convergence signal.
fn nudge(
    mut x: ArrayViewMut1<f32>,
    y: ArrayView1<f32>,
    y2: ArrayView1<f32>,
    xy2: f32,
    rate: f32,
    z: f32,
) -> f32 {
    let w = (-xy2).exp() / z;
    let mut sum_move2 = 0.0;
    let mut sum_x2 = 0.0;
    for i in 0..x.len() {
        let mv = rate * (y[i] - x[i] + w * (x[i] - y2[i]));
        x[i] += mv;
        sum_move2 += mv * mv;
        sum_x2 += x[i] * x[i];
    }
    let inv = 1.0 / sum_x2.sqrt();
    x.mapv_inplace(|v| v * inv);
    sum_move2
}

impl<'a> Trainer<'a> {

    pub fn new(corpus: &'a Corpus, params: &'a Params) -> Trainer<'a> {
        Self {
            corpus,
            params,
            store: EmbeddingStore::new(corpus, params.ndim),
            best: EmbeddingStore::new(corpus, params.ndim),
            visits: [vec![0u32; corpus.qmax + 1], vec![0u32; corpus.qmax + 1]],
            rng: StdRng::seed_from_u64(params.seed),
            best_logl: 0.0,
            restart_scores: Vec::new(),
        }
    }

    // visit counters are restart-scoped; they never persist across restarts
    fn reset_visits(&mut self) {
        for slot in 0..NTOK {
            self.visits[slot].iter_mut().for_each(|c| *c = 0);
        }
    }

    // applies the contrastive update to one observed tuple. The negative
    // sampling is deliberately cross-wise: a random row's slot-0 id repels
    // the y side, a second random row's slot-1 id repels the x side. Both
    // squared distances are taken before either vector moves, and the y
    // update then attracts toward the already-moved x vector.
    pub fn update_pair(&mut self, x1: usize, y1: usize) -> f32 {

        let cx = self.visits[0][x1];
        self.visits[0][x1] += 1;
        let cy = self.visits[1][y1];
        self.visits[1][y1] += 1;
        let rate_x = NU0 * (PHI0 / (PHI0 + cx as f32));
        let rate_y = NU0 * (PHI0 / (PHI0 + cy as f32));

        let rx = self.rng.gen_range(0..self.corpus.len());
        let x2 = self.corpus.pairs[rx][0];
        let ry = self.rng.gen_range(0..self.corpus.len());
        let y2 = self.corpus.pairs[ry][1];

        let z = self.params.z as f32;
        let [v0, v1] = &mut self.store.vec;
        let x1y2 = sqdist(v0.row(x1), v1.row(y2));
        let y1x2 = sqdist(v0.row(x2), v1.row(y1));
        let dx = nudge(v0.row_mut(x1), v1.row(y1), v1.row(y2), x1y2, rate_x, z);
        let dy = nudge(v1.row_mut(y1), v0.row(x1), v0.row(x2), y1x2, rate_y, z);
        if dx > dy { dx } else { dy }
    }

    // average log-likelihood of the corpus under the given store, modeling
    // pair probability as frq(x) * frq(y) * exp(-dist(x, y)) / z
    fn logl_of(&self, store: &EmbeddingStore) -> f64 {
        let mut l = 0.0f64;
        for tuple in &self.corpus.pairs {
            let [x, y] = *tuple;
            let px = self.corpus.frq(0, x);
            let py = self.corpus.frq(1, y);
            let xy = sqdist(store.row(0, x), store.row(1, y)) as f64;
            l += (px * py).ln() - xy;
        }
        l / self.corpus.len() as f64 - self.params.z.ln()
    }

    pub fn log_likelihood(&self) -> f64 {
        self.logl_of(&self.store)
    }

    // exact partition function, a double sum over every present id pair
    // across the two slots. O(|ids0| * |ids1|), diagnostic only; the result
    // is never fed back into training.
    pub fn calc_z(&self) -> f64 {
        let mut z = 0.0f64;
        for x in 1..=self.corpus.qmax {
            if self.corpus.cnt[0][x] == 0 {
                continue;
            }
            let px = self.corpus.frq(0, x);
            for y in 1..=self.corpus.qmax {
                if self.corpus.cnt[1][y] == 0 {
                    continue;
                }
                let py = self.corpus.frq(1, y);
                let xy = sqdist(self.store.row(0, x), self.store.row(1, y)) as f64;
                z += px * py * (-xy).exp();
            }
        }
        z
    }

    // the restart loop: randomize, iterate over the corpus in input order,
    // and keep the store of the restart with the highest final
    // log-likelihood (the first restart wins ties)
    pub fn train(&mut self, sink: &mut dyn ProgressSink) {

        let restarts = self.params.restarts;
        let iterations = self.params.iterations;

        for start in 0..restarts {
            self.store.randomize(&mut self.rng);
            self.reset_visits();

            let mut ll = self.log_likelihood();
            sink.log(format!(
                "restart {}/{} logL0={:.6} best={:.6}", 1 + start, restarts, ll, self.best_logl
            ));
            if self.params.calcz {
                sink.log(format!("Z={:.6} (approx {})", self.calc_z(), self.params.z));
            }

            for iter in 0..iterations {
                for di in 0..self.corpus.len() {
                    let [x, y] = self.corpus.pairs[di];
                    self.update_pair(x, y);
                }
                ll = self.log_likelihood();
                sink.log(format!("iteration {}/{} logL={:.6}", 1 + iter, iterations, ll));
            }

            if start == 0 || ll > self.best_logl {
                sink.log(format!("updating best vectors with logL={:.6}", ll));
                self.best_logl = ll;
                self.best.snapshot_from(&self.store);
            }
            self.restart_scores.push(ll);
            sink.log(format!(
                "restart {}/{} logL1={:.6} best={:.6}", 1 + start, restarts, ll, self.best_logl
            ));
            if self.params.calcz {
                sink.log(format!("Z={:.6} (approx {})", self.calc_z(), self.params.z));
            }
        }
    }

    pub fn best(&self) -> &EmbeddingStore {
        &self.best
    }

    pub fn best_logl(&self) -> f64 {
        self.best_logl
    }

}
