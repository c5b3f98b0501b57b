//! A standalone Huffman coder: builds a frequency-weighted binary tree and
//! assigns each input byte a variable-length code. Independent of the
//! DEFLATE critical path — it shares no state or types with
//! `block_decoder`/`translator`, only the general idea of prefix codes.
//!
//! The tree is built as a `Vec<Node>` arena with a `BinaryHeap`-backed
//! min-heap merge over byte frequencies, the standard bottom-up Huffman
//! construction.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{DeflateError, Result};

#[derive(Debug, Clone, Copy)]
enum Node {
    Leaf { byte: u8 },
    Branch { left: usize, right: usize },
}

/// A Huffman tree plus the per-byte code table derived by walking it once.
/// `encode`/`decode` are exact inverses for any byte sequence whose
/// alphabet is the one the tree was built from.
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: usize,
    codes: [Option<(u32, u8)>; 256],
}

/// One entry in the frequency-ordered priority queue used while building
/// the tree. Reverse-ordered so `BinaryHeap`, a max-heap, pops the lowest
/// frequency first, matching Go's `container/heap` min-heap.
struct QueueItem {
    frequency: usize,
    node: usize,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.frequency == other.frequency
    }
}
impl Eq for QueueItem {}
impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        other.frequency.cmp(&self.frequency)
    }
}

impl HuffmanTree {
    /// Builds a tree from the byte frequencies observed in `data`. Fails on
    /// empty input (no tree to build) via `InvalidSymbol(0)`, the closest
    /// fit among `DeflateError`'s variants for "no alphabet to encode".
    pub fn build(data: &[u8]) -> Result<Self> {
        let mut freqs = [0usize; 256];
        for &b in data {
            freqs[b as usize] += 1;
        }

        let mut nodes = Vec::new();
        let mut heap = BinaryHeap::new();
        for (byte, &freq) in freqs.iter().enumerate() {
            if freq == 0 {
                continue;
            }
            let idx = nodes.len();
            nodes.push(Node::Leaf { byte: byte as u8 });
            heap.push(QueueItem {
                frequency: freq,
                node: idx,
            });
        }

        if heap.is_empty() {
            return Err(DeflateError::InvalidSymbol(0));
        }

        // A single distinct byte still needs one bit to decode "are we at
        // the leaf yet", so give it a trivial two-node tree.
        if heap.len() == 1 {
            let only = heap.pop().unwrap();
            let idx = nodes.len();
            nodes.push(Node::Branch {
                left: only.node,
                right: only.node,
            });
            let tree = Self {
                nodes,
                root: idx,
                codes: [None; 256],
            };
            return Ok(tree.with_codes());
        }

        while heap.len() > 1 {
            let a = heap.pop().unwrap();
            let b = heap.pop().unwrap();
            let idx = nodes.len();
            nodes.push(Node::Branch {
                left: a.node,
                right: b.node,
            });
            heap.push(QueueItem {
                frequency: a.frequency + b.frequency,
                node: idx,
            });
        }
        let root = heap.pop().unwrap().node;

        let tree = Self {
            nodes,
            root,
            codes: [None; 256],
        };
        Ok(tree.with_codes())
    }

    fn with_codes(mut self) -> Self {
        let mut codes = [None; 256];
        self.collect_codes(self.root, 0, 0, &mut codes);
        self.codes = codes;
        self
    }

    fn collect_codes(&self, node: usize, encoding: u32, nbits: u8, codes: &mut [Option<(u32, u8)>; 256]) {
        match self.nodes[node] {
            Node::Leaf { byte } => {
                codes[byte as usize] = Some((encoding, nbits.max(1)));
            }
            Node::Branch { left, right } => {
                self.collect_codes(left, encoding, nbits + 1, codes);
                self.collect_codes(right, encoding | (1 << nbits), nbits + 1, codes);
            }
        }
    }

    /// Encodes `data` using this tree's codes. Returns the packed bits
    /// (LSB-first within each byte, matching `bitstream.Writer`'s packing
    /// in the Go original) and the number of meaningful bits produced —
    /// the last byte may be zero-padded.
    pub fn encode(&self, data: &[u8]) -> Result<(Vec<u8>, usize)> {
        let mut out = Vec::new();
        let mut cur_byte = 0u8;
        let mut cur_bits = 0u8;
        let mut total_bits = 0usize;

        for &b in data {
            let (encoding, nbits) = self.codes[b as usize].ok_or(DeflateError::InvalidSymbol(b as u16))?;
            for i in 0..nbits {
                if (encoding >> i) & 1 != 0 {
                    cur_byte |= 1 << cur_bits;
                }
                cur_bits += 1;
                total_bits += 1;
                if cur_bits == 8 {
                    out.push(cur_byte);
                    cur_byte = 0;
                    cur_bits = 0;
                }
            }
        }
        if cur_bits > 0 {
            out.push(cur_byte);
        }
        Ok((out, total_bits))
    }

    /// Decodes exactly `nbits` bits of `encoded` back into bytes by walking
    /// the tree from the root on each new symbol.
    pub fn decode(&self, encoded: &[u8], nbits: usize) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut node = self.root;
        let mut consumed = 0usize;

        for bit_idx in 0..nbits {
            let byte = *encoded
                .get(bit_idx / 8)
                .ok_or(DeflateError::UnexpectedEnd)?;
            let bit = (byte >> (bit_idx % 8)) & 1;

            node = match self.nodes[node] {
                Node::Branch { left, right } => {
                    if bit == 0 {
                        left
                    } else {
                        right
                    }
                }
                Node::Leaf { .. } => return Err(DeflateError::InvalidPrefixCode),
            };

            if let Node::Leaf { byte } = self.nodes[node] {
                out.push(byte);
                node = self.root;
            }
            consumed += 1;
        }

        if consumed != nbits {
            return Err(DeflateError::UnexpectedEnd);
        }
        Ok(out)
    }
}
