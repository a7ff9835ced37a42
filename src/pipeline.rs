

// imports
use crate::config::Params;
use crate::corpus::{Corpus, LineSource};
use crate::output;
use crate::train::{ProgressSink, StderrSink, Trainer};
use crate::vocab::Vocab;

use clap::Parser;
use core::panic;
use std::error::Error;
use std::io::{self, BufWriter, Write};
use std::time::Instant;

pub struct Pipeline {}

impl Pipeline {

    // runs the main procedure of 3 steps -
    // -> configuration of arguments
    // -> corpus ingestion
    // -> training and emission of the best vectors

    pub fn run() {

        let params = Params::parse();
        let mut sink = StderrSink;
        sink.log(format!("{}", params));

        let source = match LineSource::open(&params.input) {
            Ok(source) => source,
            Err(e) => panic!("{}", e),
        };

        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        if let Err(e) = Pipeline::execute(&params, source, &mut out, &mut sink) {
            panic!("{}", e)
        }
    }

    // the full resolved-configuration run, separated from process setup so
    // tests can drive it with an in-memory source and output buffer
    pub fn execute<W: Write>(
        params: &Params,
        mut source: LineSource,
        out: &mut W,
        sink: &mut dyn ProgressSink,
    ) -> Result<(), Box<dyn Error>> {

        let timer = Instant::now();
        let mut vocab = Vocab::new();
        let corpus = Corpus::read(&mut source, &mut vocab)?;
        sink.log(format!(
            "read {} tuples, {} distinct tokens, took {} seconds",
            corpus.len(), corpus.qmax, timer.elapsed().as_secs()
        ));

        let timer = Instant::now();
        let mut trainer = Trainer::new(&corpus, params);
        trainer.train(sink);
        sink.log(format!(
            "finished training, best logL={:.6}, took {} seconds",
            trainer.best_logl(), timer.elapsed().as_secs()
        ));

        output::emit(out, &vocab, &corpus, trainer.best(), params.vmerge)?;
        Ok(())
    }

}
