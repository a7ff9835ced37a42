
use clap::Parser;
use std::fmt::Display;

// fully resolved run configuration. Parsed once at startup, read-only
// everywhere else.
#[derive(Parser, Clone, Debug)]
#[command(name = "scode_trainer", about = "spherical co-occurrence embedding trainer")]
pub struct Params {

    /// number of restarts from fresh random vectors; only the best one is kept
    #[arg(short = 'r', long = "restarts", default_value_t = 1)]
    pub restarts: usize,

    /// passes over the corpus per restart
    #[arg(short = 'i', long = "iterations", default_value_t = 20)]
    pub iterations: usize,

    /// dimensionality of the embedding
    #[arg(short = 'd', long = "dims", default_value_t = 25)]
    pub ndim: usize,

    /// partition function approximation
    #[arg(short = 'z', long = "partition", default_value_t = 0.166)]
    pub z: f64,

    /// also compute the exact partition function (slow, diagnostic only)
    #[arg(short = 'c', long = "calc-z", default_value_t = false)]
    pub calcz: bool,

    /// append each token's slot-1 vector to its output row
    #[arg(short = '2', long = "vmerge", default_value_t = false)]
    pub vmerge: bool,

    /// random seed
    #[arg(short = 's', long = "seed", default_value_t = 0)]
    pub seed: u64,

    /// input tuples: a file path, "" for stdin, or "< cmd" for a command's output
    #[arg(default_value = "")]
    pub input: String,

}

impl Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "using hyper-params:
        restarts: {},
        iterations: {},
        ndim: {},
        z: {},
        calcz: {},
        vmerge: {},
        seed: {},
        input: {:?}",
        self.restarts, self.iterations, self.ndim, self.z, self.calcz, self.vmerge, self.seed, self.input
        )
    }
}
