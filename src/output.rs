
// imports
use crate::corpus::Corpus;
use crate::embeddings::EmbeddingStore;
use crate::vocab::Vocab;

use std::error::Error;
use std::io::Write;

// writes the final vector table: a `<rows>\t<width>` header, then one row
// per slot-0 token with a nonzero count, in ascending id order. Each row is
// token, count and the tab-separated vector components; with vmerge the
// slot-1 components follow on the same row.
pub fn emit<W: Write>(
    out: &mut W,
    vocab: &Vocab,
    corpus: &Corpus,
    best: &EmbeddingStore,
    vmerge: bool,
) -> Result<(), Box<dyn Error>> {

    // vmerge needs a slot-1 vector for every emitted token; check before
    // the header so an abort leaves the stream empty
    if vmerge {
        for q in 1..=corpus.qmax {
            if best.present[0][q] && !best.present[1][q] {
                return Err(format!(
                    "token {:?} has no slot-1 vector to merge", vocab.string_of(q)
                ).into());
            }
        }
    }

    let nz = (1..=corpus.qmax).filter(|q| best.present[0][*q]).count();
    let width = if vmerge { 2 * best.ndim } else { best.ndim };
    writeln!(out, "{}\t{}", nz, width)?;

    for q in 1..=corpus.qmax {
        if !best.present[0][q] {
            continue;
        }
        write!(out, "{}\t{}", vocab.string_of(q), corpus.cnt[0][q])?;
        for v in best.row(0, q).iter() {
            write!(out, "\t{}", v)?;
        }
        if vmerge {
            for v in best.row(1, q).iter() {
                write!(out, "\t{}", v)?;
            }
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {

    use super::emit;
    use crate::corpus::{Corpus, LineSource};
    use crate::embeddings::EmbeddingStore;
    use crate::vocab::Vocab;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn setup(input: &str, ndim: usize) -> (Corpus, Vocab, EmbeddingStore) {
        let mut source = LineSource::from_reader(Cursor::new(input.to_owned()));
        let mut vocab = Vocab::new();
        let corpus = Corpus::read(&mut source, &mut vocab).unwrap();
        let mut store = EmbeddingStore::new(&corpus, ndim);
        let mut rng = StdRng::seed_from_u64(2);
        store.randomize(&mut rng);
        (corpus, vocab, store)
    }

    #[test]
    fn rows_follow_header_and_id_order() {
        let (corpus, vocab, store) = setup("a x\na y\nb x\n", 2);
        let mut out: Vec<u8> = Vec::new();
        emit(&mut out, &vocab, &corpus, &store, false).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "2\t2");
        assert_eq!(lines.len(), 3);

        let row_a: Vec<&str> = lines[1].split('\t').collect();
        assert_eq!(row_a[0], "a");
        assert_eq!(row_a[1], "2");
        assert_eq!(row_a.len(), 4);
        let norm2: f32 = row_a[2..].iter().map(|c| {
            let v: f32 = c.parse().unwrap();
            v * v
        }).sum();
        assert!((norm2 - 1.0).abs() < 1e-4);

        let row_b: Vec<&str> = lines[2].split('\t').collect();
        assert_eq!(row_b[0], "b");
        assert_eq!(row_b[1], "1");
    }

    #[test]
    fn vmerge_doubles_the_component_count() {
        let (corpus, vocab, store) = setup("a b\nb a\n", 3);
        let mut out: Vec<u8> = Vec::new();
        emit(&mut out, &vocab, &corpus, &store, true).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "2\t6");
        for row in &lines[1..] {
            assert_eq!(row.split('\t').count(), 2 + 6);
        }
    }

    #[test]
    fn vmerge_without_slot1_vector_is_fatal_before_any_output() {
        let (corpus, vocab, store) = setup("a x\n", 2);
        let mut out: Vec<u8> = Vec::new();
        assert!(emit(&mut out, &vocab, &corpus, &store, true).is_err());
        assert!(out.is_empty());
    }

}
