//! The encoding dictionary, a prefix trie from byte sequences to codes.
//!
//! Nodes live in one arena and are addressed by index, each node owning the edges to its
//! successors. The encoder never builds a full sequence as a key: it keeps a [`Cursor`] on the
//! longest match so far and advances it one symbol at a time with [`Dictionary::step`].
use crate::alphabet;
use crate::Code;

/// A position in the trie, standing for the sequence spelled by the path from the root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor(u32);

/// A prefix trie with a code bound to some of its nodes.
///
/// To avoid using too much memory we keep nodes with few successors in optimized form. This form
/// doesn't offer lookup by indexing but instead does a linear search. A node that outgrows it is
/// moved to a full table with one slot per symbol.
#[derive(Clone, Debug)]
pub struct Dictionary {
    nodes: Vec<Node>,
    simples: Vec<Simple>,
    complex: Vec<Full>,
    /// Number of nodes with a bound code.
    bound: usize,
}

#[derive(Clone, Copy, Debug)]
struct Node {
    code: Option<Code>,
    successors: Successors,
}

#[derive(Clone, Copy, Debug)]
enum Successors {
    None,
    Simple(u32),
    Full(u32),
}

const SHORT: usize = 16;

/// Marks an unused slot of a full table.
const NO_NODE: u32 = u32::MAX;

#[derive(Clone, Copy, Debug)]
struct Simple {
    nodes: [u32; SHORT],
    chars: [u8; SHORT],
    count: u8,
}

#[derive(Clone, Copy, Debug)]
struct Full {
    char_continuation: [u32; 256],
}

impl Dictionary {
    /// An empty trie, holding only the root for the empty sequence.
    pub fn new() -> Self {
        Dictionary {
            nodes: vec![Node {
                code: None,
                successors: Successors::None,
            }],
            simples: Vec::new(),
            complex: Vec::new(),
            bound: 0,
        }
    }

    /// A trie with every single byte bound to the code of its value.
    pub fn with_alphabet() -> Self {
        let mut dict = Dictionary::new();
        // The root has a successor for every symbol, give it the full table right away.
        dict.complex.push(Full {
            char_continuation: [NO_NODE; 256],
        });
        dict.nodes[0].successors = Successors::Full(0);
        for (byte, code) in alphabet::symbols() {
            dict.insert(&[byte], code);
        }
        dict
    }

    /// The cursor for the empty sequence.
    pub fn root(&self) -> Cursor {
        Cursor(0)
    }

    /// Number of sequences with a bound code.
    pub fn len(&self) -> usize {
        self.bound
    }

    pub fn is_empty(&self) -> bool {
        self.bound == 0
    }

    /// The code bound to the sequence at `at`, if any.
    pub fn code(&self, at: Cursor) -> Option<Code> {
        self.nodes[at.index()].code
    }

    /// Follow the edge for `ch`, without creating it.
    pub fn step(&self, at: Cursor, ch: u8) -> Option<Cursor> {
        match self.nodes[at.index()].successors {
            Successors::None => None,
            Successors::Simple(idx) => {
                let nexts = &self.simples[idx as usize];
                nexts
                    .nodes
                    .iter()
                    .zip(nexts.chars.iter())
                    .take(usize::from(nexts.count))
                    .find(|&(_, &sch)| sch == ch)
                    .map(|(&node, _)| Cursor(node))
            }
            Successors::Full(idx) => {
                let node = self.complex[idx as usize].char_continuation[usize::from(ch)];
                if node == NO_NODE {
                    None
                } else {
                    Some(Cursor(node))
                }
            }
        }
    }

    /// Register the sequence at `at` followed by `ch` under `code`.
    ///
    /// A sequence keeps the first code it was registered with.
    pub fn extend(&mut self, at: Cursor, ch: u8, code: Code) -> Cursor {
        let next = match self.step(at, ch) {
            Some(next) => next,
            None => self.append(at, ch),
        };
        self.bind(next, code);
        next
    }

    /// Register `sequence` under `code`, creating any missing nodes on its path.
    pub fn insert(&mut self, sequence: &[u8], code: Code) {
        let mut at = self.root();
        for &ch in sequence {
            at = match self.step(at, ch) {
                Some(next) => next,
                None => self.append(at, ch),
            };
        }
        self.bind(at, code);
    }

    /// The code of `sequence`, stopping at the first missing edge.
    pub fn lookup(&self, sequence: &[u8]) -> Option<Code> {
        let mut at = self.root();
        for &ch in sequence {
            at = self.step(at, ch)?;
        }
        self.code(at)
    }

    fn bind(&mut self, at: Cursor, code: Code) {
        let node = &mut self.nodes[at.index()];
        if node.code.is_none() {
            node.code = Some(code);
            self.bound += 1;
        }
    }

    fn append(&mut self, at: Cursor, ch: u8) -> Cursor {
        let next = self.nodes.len() as u32;
        self.nodes.push(Node {
            code: None,
            successors: Successors::None,
        });

        let key = self.nodes[at.index()].successors;
        match key {
            Successors::None => {
                let new_key = Successors::Simple(self.simples.len() as u32);
                let mut simple = Simple::default();
                simple.nodes[0] = next;
                simple.chars[0] = ch;
                simple.count = 1;
                self.simples.push(simple);
                self.nodes[at.index()].successors = new_key;
            }
            Successors::Simple(idx) if usize::from(self.simples[idx as usize].count) < SHORT => {
                let nexts = &mut self.simples[idx as usize];
                let nidx = usize::from(nexts.count);
                nexts.chars[nidx] = ch;
                nexts.nodes[nidx] = next;
                nexts.count += 1;
            }
            Successors::Simple(idx) => {
                let new_key = Successors::Full(self.complex.len() as u32);
                let simple = &self.simples[idx as usize];
                let mut full = Full {
                    char_continuation: [NO_NODE; 256],
                };
                for (&pch, &pnode) in simple.chars.iter().zip(simple.nodes.iter()) {
                    full.char_continuation[usize::from(pch)] = pnode;
                }
                full.char_continuation[usize::from(ch)] = next;
                self.complex.push(full);
                self.nodes[at.index()].successors = new_key;
            }
            Successors::Full(idx) => {
                self.complex[idx as usize].char_continuation[usize::from(ch)] = next;
            }
        }

        Cursor(next)
    }
}

impl Cursor {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Dictionary::new()
    }
}

impl Default for Simple {
    fn default() -> Self {
        Simple {
            nodes: [0; SHORT],
            chars: [0; SHORT],
            count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Dictionary, SHORT};

    #[test]
    fn alphabet_is_bound() {
        let dict = Dictionary::with_alphabet();
        assert_eq!(dict.len(), 256);
        for byte in 0..=255u8 {
            assert_eq!(dict.lookup(&[byte]), Some(u16::from(byte)));
        }
        assert_eq!(dict.lookup(b"AB"), None);
        assert_eq!(dict.lookup(b""), None);
    }

    #[test]
    fn insert_and_lookup() {
        let mut dict = Dictionary::new();
        assert!(dict.is_empty());
        dict.insert(b"TOBE", 300);
        assert_eq!(dict.lookup(b"TOBE"), Some(300));
        // Path nodes exist but carry no code.
        assert_eq!(dict.lookup(b"TOB"), None);
        assert_eq!(dict.lookup(b"TOBEX"), None);
        assert_eq!(dict.len(), 1);

        dict.insert(b"TOB", 301);
        assert_eq!(dict.lookup(b"TOB"), Some(301));
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn first_binding_is_kept() {
        let mut dict = Dictionary::with_alphabet();
        dict.insert(b"AB", 256);
        dict.insert(b"AB", 257);
        assert_eq!(dict.lookup(b"AB"), Some(256));
        assert_eq!(dict.len(), 257);
    }

    #[test]
    fn cursor_walk() {
        let mut dict = Dictionary::with_alphabet();
        let a = dict.step(dict.root(), b'A').unwrap();
        assert_eq!(dict.code(a), Some(65));
        assert_eq!(dict.step(a, b'B'), None);

        let ab = dict.extend(a, b'B', 256);
        assert_eq!(dict.step(a, b'B'), Some(ab));
        assert_eq!(dict.code(ab), Some(256));
        assert_eq!(dict.lookup(b"AB"), Some(256));
    }

    #[test]
    fn many_successors_promote_to_full() {
        let mut dict = Dictionary::with_alphabet();
        let a = dict.step(dict.root(), b'A').unwrap();
        for (i, ch) in (0..=255u8).enumerate() {
            dict.extend(a, ch, 256 + i as u16);
            if i == SHORT {
                // The node just switched representation, everything must still be found.
                for prev in 0..=i as u8 {
                    assert_eq!(dict.lookup(&[b'A', prev]), Some(256 + u16::from(prev)));
                }
            }
        }
        for ch in 0..=255u8 {
            assert_eq!(dict.lookup(&[b'A', ch]), Some(256 + u16::from(ch)));
        }
        assert_eq!(dict.len(), 512);
    }
}
