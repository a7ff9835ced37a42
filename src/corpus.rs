
// imports
use crate::vocab::Vocab;

use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::process::{Child, Command, Stdio};

// number of tokens required on every input line
pub const NTOK: usize = 2;

// longest input line accepted, in bytes
pub const LINE_MAX: usize = 1 << 20;

// a lazy, finite sequence of input lines. The spec string selects the
// backing stream: "" reads stdin, a leading '<' runs the rest through
// `sh -c` and reads its stdout, anything else is opened as a file.
pub struct LineSource {
    reader: Box<dyn BufRead>,
    _child: Option<Child>,
}

impl LineSource {

    pub fn open(spec: &str) -> Result<LineSource, Box<dyn Error>> {

        if spec.is_empty() {
            return Ok(Self { reader: Box::new(BufReader::new(io::stdin())), _child: None });
        }

        if let Some(cmd) = spec.strip_prefix('<') {
            let mut child = Command::new("sh")
                .arg("-c")
                .arg(cmd.trim_start())
                .stdout(Stdio::piped())
                .spawn()?;
            let stdout = child.stdout.take().ok_or("no stdout handle on child process")?;
            return Ok(Self { reader: Box::new(BufReader::new(stdout)), _child: Some(child) });
        }

        let f = File::open(spec)?;
        Ok(Self { reader: Box::new(BufReader::new(f)), _child: None })
    }

    // wrap any in-memory reader, used by tests
    pub fn from_reader<R: BufRead + 'static>(reader: R) -> LineSource {
        Self { reader: Box::new(reader), _child: None }
    }

    // next line without its terminator, None at end of stream.
    // a line overrunning LINE_MAX is fatal.
    pub fn next_line(&mut self) -> Result<Option<String>, Box<dyn Error>> {

        let mut buf: Vec<u8> = Vec::new();
        let n = self.reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Ok(None);
        }
        if buf.len() > LINE_MAX {
            return Err(format!("line too long ({} bytes, limit {})", buf.len(), LINE_MAX).into());
        }
        while matches!(buf.last(), Some(&b'\n') | Some(&b'\r')) {
            buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

}

// defines the behavior needed for tokenizing an input line
pub trait Tokenizer {
    fn tokenize(line: &str) -> Vec<&str>;
}

impl Tokenizer for Corpus {
    // simple tokenizer by the whitespace class
    fn tokenize(line: &str) -> Vec<&str> {
        return line.split_whitespace().collect();
    }
}

// the ingested corpus: the ordered tuple sequence plus the per-slot
// per-id occurrence counts derived once after the full scan.
pub struct Corpus {
    pub pairs: Vec<[usize; NTOK]>,
    pub cnt: [Vec<u32>; NTOK],
    pub qmax: usize,
}

impl Corpus {

    // scans the source to the end, interning every token. Any line that
    // does not hold exactly NTOK tokens aborts ingestion.
    pub fn read(source: &mut LineSource, vocab: &mut Vocab) -> Result<Corpus, Box<dyn Error>> {

        let mut pairs: Vec<[usize; NTOK]> = Vec::new();
        let mut lineno = 0usize;

        while let Some(line) = source.next_line()? {
            lineno += 1;
            let tokens = Corpus::tokenize(&line);
            if tokens.len() != NTOK {
                return Err(format!(
                    "line {}: expected {} tokens, found {}", lineno, NTOK, tokens.len()
                ).into());
            }
            let mut tuple = [0usize; NTOK];
            for (j, tok) in tokens.iter().enumerate() {
                tuple[j] = vocab.intern(tok);
            }
            pairs.push(tuple);
        }

        if pairs.is_empty() {
            return Err("empty input: no tuples to train on".into());
        }

        let qmax = vocab.max_id();
        let mut cnt = [vec![0u32; qmax + 1], vec![0u32; qmax + 1]];
        for tuple in &pairs {
            for j in 0..NTOK {
                cnt[j][tuple[j]] += 1;
            }
        }

        Ok(Corpus { pairs, cnt, qmax })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    // relative frequency of an id within a slot
    pub fn frq(&self, slot: usize, id: usize) -> f64 {
        self.cnt[slot][id] as f64 / self.pairs.len() as f64
    }

}
