use std::{
    cmp::Reverse,
    collections::{BTreeMap, BinaryHeap},
};

use ordered_float::OrderedFloat;

use crate::{
    ast::{StructureKind, TraversalOrder},
    error::{StructureError, StructureResult},
    interpreter::value::core::Value,
    structures::{
        core::{Encoding, EncodingStats, HuffmanOps, NodeId, SearchHit, Snapshot, Structure, TreeData, TreeOps},
        step::{AnimationType, Step, StepKind},
        tree::{Node, TreeCore},
    },
    util::num::{usize_to_f64_checked, usize_to_i64_checked},
};

/// Huffman coding tree.
///
/// Leaves carry a label and a weight; internal nodes carry the combined
/// weight and a `[left+right]` label. Left edges encode `0`, right edges `1`.
/// Nodes are merged lightest first; among equal weights the node created
/// earlier wins, so leaves keep the order in which their labels first
/// appeared and merged nodes queue behind them.
#[derive(Debug, Clone, Default)]
pub struct HuffmanTree {
    core:  TreeCore,
    codes: BTreeMap<String, String>,
}

impl HuffmanTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn unsupported(operation: &'static str) -> StructureError {
        StructureError::Unsupported { operation,
                                      structure: StructureKind::Huffman.backend_name() }
    }

    /// Builds the tree from `(label, weight)` leaves and recomputes the codes.
    fn build_leaves(&mut self, leaves: Vec<(String, f64)>) {
        self.core.reset();
        self.codes.clear();

        let leaf_count = leaves.len();
        let mut arena: Vec<Option<Box<Node>>> = Vec::with_capacity(leaf_count * 2);
        let mut heap = BinaryHeap::new();
        for (label, weight) in leaves {
            heap.push(Reverse((OrderedFloat(weight), arena.len())));
            arena.push(Some(self.core.node(Value::Text(label), Some(weight))));
        }

        let mut merges = Vec::new();
        while heap.len() > 1 {
            let (Some(Reverse((_, a))), Some(Reverse((_, b)))) = (heap.pop(), heap.pop()) else {
                break;
            };
            let (Some(left), Some(right)) = (arena[a].take(), arena[b].take()) else {
                break;
            };
            let weight = left.weight.unwrap_or(0.0) + right.weight.unwrap_or(0.0);
            let mut parent = self.core.node(Value::Text(format!("[{}+{}]", left.value, right.value)), Some(weight));
            merges.push((format!("Merge {} ({}) and {} ({}) into {weight}",
                                 left.value,
                                 left.weight.unwrap_or(0.0),
                                 right.value,
                                 right.weight.unwrap_or(0.0)),
                         [parent.id, left.id, right.id]));
            parent.left = Some(left);
            parent.right = Some(right);
            heap.push(Reverse((OrderedFloat(weight), arena.len())));
            arena.push(Some(parent));
        }
        self.core.root = heap.pop().and_then(|Reverse((_, index))| arena[index].take());

        if let Some(root) = &self.core.root {
            assign_codes(root, String::new(), &mut self.codes);
        }
        for (description, ids) in merges {
            self.core.record(StepKind::Merge, description, ids, AnimationType::Move);
        }
        self.core.record(StepKind::Build,
                         format!("Built Huffman tree from {leaf_count} symbols"),
                         [],
                         AnimationType::Instant);
    }

    fn data(&self) -> TreeData {
        TreeData { huffman_codes: Some(self.codes.clone()),
                   ..self.core.tree_data() }
    }
}

fn assign_codes(node: &Node, prefix: String, codes: &mut BTreeMap<String, String>) {
    if node.is_leaf() {
        // A lone leaf still needs a one bit code.
        let code = if prefix.is_empty() { "0".to_string() } else { prefix };
        codes.insert(node.value.to_string(), code);
        return;
    }
    if let Some(left) = &node.left {
        assign_codes(left, format!("{prefix}0"), codes);
    }
    if let Some(right) = &node.right {
        assign_codes(right, format!("{prefix}1"), codes);
    }
}

impl Structure for HuffmanTree {
    fn kind(&self) -> StructureKind {
        StructureKind::Huffman
    }

    fn size(&self) -> usize {
        self.core.size()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::Tree(self.data())
    }

    fn search(&mut self, value: &Value) -> SearchHit {
        self.core.search_level_order(value)
    }

    fn clear(&mut self) {
        self.core.reset();
        self.codes.clear();
        self.core.record(StepKind::Clear, "Cleared tree".to_string(), [], AnimationType::Fade);
    }

    fn operation_history(&self) -> &[Step] {
        self.core.log.steps()
    }

    fn clear_operation_history(&mut self) {
        self.core.log.clear();
    }

    fn as_tree(&mut self) -> Option<&mut dyn TreeOps> {
        Some(self)
    }

    fn as_huffman(&mut self) -> Option<&mut dyn HuffmanOps> {
        Some(self)
    }
}

impl TreeOps for HuffmanTree {
    fn insert(&mut self, _value: Value) -> StructureResult<NodeId> {
        Err(Self::unsupported("insert"))
    }

    fn delete(&mut self, _value: &Value) -> StructureResult<()> {
        Err(Self::unsupported("delete"))
    }

    fn traverse(&mut self, order: TraversalOrder) -> Vec<Value> {
        self.core.traverse_summary(order)
    }

    fn height(&self) -> usize {
        self.core.height()
    }

    fn build(&mut self, values: Vec<Value>) -> Option<StructureResult<()>> {
        Some(self.build_from_numbers(values))
    }

    fn tree_data(&self) -> TreeData {
        self.data()
    }
}

impl HuffmanOps for HuffmanTree {
    fn build_from_text(&mut self, text: &str) -> StructureResult<()> {
        let mut frequencies: Vec<(char, usize)> = Vec::new();
        for c in text.chars() {
            match frequencies.iter_mut().find(|(seen, _)| *seen == c) {
                Some((_, count)) => *count += 1,
                None => frequencies.push((c, 1)),
            }
        }
        if frequencies.is_empty() {
            return Err(StructureError::InvalidArgument("cannot build a Huffman tree from empty text".into()));
        }
        let too_long = || StructureError::InvalidArgument("text is too long".into());
        let leaves: Vec<(String, f64)> =
            frequencies.into_iter()
                       .map(|(c, count)| Ok((c.to_string(), usize_to_f64_checked(count, too_long())?)))
                       .collect::<StructureResult<_>>()?;
        self.build_leaves(leaves);
        Ok(())
    }

    fn build_from_numbers(&mut self, weights: Vec<Value>) -> StructureResult<()> {
        if weights.is_empty() {
            return Err(StructureError::InvalidArgument("cannot build a Huffman tree from no weights".into()));
        }
        let mut leaves: Vec<(String, f64)> = Vec::with_capacity(weights.len());
        let mut seen: BTreeMap<String, usize> = BTreeMap::new();
        for value in weights {
            let weight = value.as_real()
                              .filter(|w| *w > 0.0 && w.is_finite())
                              .ok_or_else(|| {
                                  StructureError::InvalidArgument(format!("weight {value} must be a positive number"))
                              })?;
            let base = value.to_string();
            let occurrences = seen.entry(base.clone()).or_insert(0);
            *occurrences += 1;
            let label = if *occurrences == 1 { base } else { format!("{base}#{occurrences}") };
            leaves.push((label, weight));
        }
        self.build_leaves(leaves);
        Ok(())
    }

    fn encode(&mut self, text: &str) -> StructureResult<Encoding> {
        if self.core.root.is_none() {
            return Err(StructureError::Empty("huffman tree"));
        }
        let mut bits = String::new();
        let mut symbols = 0usize;
        for c in text.chars() {
            let code = self.codes
                           .get(&c.to_string())
                           .ok_or_else(|| StructureError::InvalidArgument(format!("character {c:?} has no code")))?;
            bits.push_str(code);
            symbols += 1;
        }

        let original_bits = symbols * 8;
        let compressed_bits = bits.len();
        let too_long = || StructureError::InvalidArgument("text is too long".into());
        let saved = if original_bits == 0 {
            0.0
        } else {
            (1.0 - usize_to_f64_checked(compressed_bits, too_long())?
                   / usize_to_f64_checked(original_bits, too_long())?)
            * 100.0
        };
        let savings_bits = usize_to_i64_checked(original_bits, too_long())?
                           - usize_to_i64_checked(compressed_bits, too_long())?;
        let stats = EncodingStats { original_bits,
                                    compressed_bits,
                                    compression_ratio: format!("{saved:.2}%"),
                                    savings_bits };
        self.core.record(StepKind::Encode,
                         format!("Encoded {symbols} characters into {compressed_bits} bits"),
                         [],
                         AnimationType::Highlight);
        Ok(Encoding { bits, stats })
    }

    fn decode(&mut self, bits: &str) -> StructureResult<String> {
        let Some(root) = self.core.root.as_deref() else {
            return Err(StructureError::Empty("huffman tree"));
        };
        let invalid = |c: char| StructureError::InvalidArgument(format!("invalid bit {c:?}"));
        let mut decoded = String::new();

        if root.is_leaf() {
            for c in bits.chars() {
                if c != '0' {
                    return Err(invalid(c));
                }
                decoded.push_str(&root.value.to_string());
            }
        } else {
            let mut current = root;
            for c in bits.chars() {
                let next = match c {
                    '0' => current.left.as_deref(),
                    '1' => current.right.as_deref(),
                    _ => return Err(invalid(c)),
                };
                let Some(next) = next else {
                    return Err(invalid(c));
                };
                if next.is_leaf() {
                    decoded.push_str(&next.value.to_string());
                    current = root;
                } else {
                    current = next;
                }
            }
            if !std::ptr::eq(current, root) {
                return Err(StructureError::InvalidArgument("trailing bits do not form a complete code".into()));
            }
        }

        self.core.record(StepKind::Decode,
                         format!("Decoded {} bits into {decoded:?}", bits.len()),
                         [],
                         AnimationType::Highlight);
        Ok(decoded)
    }

    fn codes(&self) -> BTreeMap<String, String> {
        self.codes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abracadabra_codes() {
        let mut tree = HuffmanTree::new();
        tree.build_from_text("ABRACADABRA").unwrap();
        let codes = tree.codes();
        assert_eq!(codes["A"], "0");
        assert_eq!(codes["C"], "100");
        assert_eq!(codes["D"], "101");
        assert_eq!(codes["B"], "110");
        assert_eq!(codes["R"], "111");
        assert_eq!(tree.size(), 9);

        let encoded = tree.encode("ABRA").unwrap();
        assert_eq!(encoded.bits, "01101110");
        assert_eq!(encoded.stats.original_bits, 32);
        assert_eq!(encoded.stats.compressed_bits, 8);
        assert_eq!(encoded.stats.compression_ratio, "75.00%");
        assert_eq!(tree.decode("01101110").unwrap(), "ABRA");
    }

    #[test]
    fn single_symbol_gets_one_bit() {
        let mut tree = HuffmanTree::new();
        tree.build_from_text("aaa").unwrap();
        assert_eq!(tree.codes()["a"], "0");
        assert_eq!(tree.encode("aa").unwrap().bits, "00");
        assert_eq!(tree.decode("000").unwrap(), "aaa");
    }

    #[test]
    fn rejects_bad_input() {
        let mut tree = HuffmanTree::new();
        assert!(tree.build_from_text("").is_err());
        assert!(tree.encode("a").is_err());
        tree.build_from_text("ab").unwrap();
        assert!(tree.encode("z").is_err());
        assert!(tree.decode("012").is_err());
        assert!(TreeOps::insert(&mut tree, Value::from(1_i64)).is_err());
    }

    #[test]
    fn numbers_become_weighted_leaves() {
        let mut tree = HuffmanTree::new();
        tree.build_from_numbers(vec![Value::from(5_i64), Value::from(5_i64), Value::from(2_i64)]).unwrap();
        let codes = tree.codes();
        assert_eq!(codes.len(), 3);
        assert!(codes.contains_key("5#2"));
        assert!(tree.build_from_numbers(vec![Value::from(-1_i64)]).is_err());
    }
}
