
use std::collections::HashMap;

// token interning. Every distinct string gets one dense id shared across
// both slots; ids start at 1, id 0 is the "none" sentinel and never assigned.

pub struct Vocab {
    t2i: HashMap<String, usize>,
    i2t: Vec<String>,
}

impl Vocab {

    pub fn new() -> Vocab {
        Self {
            t2i: HashMap::new(),
            i2t: vec![String::new()], // index 0 reserved
        }
    }

    // returns the existing id if the token was seen before, otherwise
    // assigns the next unused one
    pub fn intern(&mut self, token: &str) -> usize {
        match self.t2i.get(token) {
            Some(id) => *id,
            None => {
                let id = self.i2t.len();
                self.t2i.insert(token.to_owned(), id);
                self.i2t.push(token.to_owned());
                id
            }
        }
    }

    // the largest id handed out so far
    pub fn max_id(&self) -> usize {
        self.i2t.len() - 1
    }

    pub fn string_of(&self, id: usize) -> &str {
        &self.i2t[id]
    }

}
