//! Signing groups.

use ckb_types::packed::{Byte32, CellOutput, Script};
use std::collections::HashMap;

/// The inputs one lock has to sign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptGroup {
    /// The lock script.
    pub script: Script,
    /// Indices of the inputs consuming cells locked by `script`.
    pub input_indices: Vec<usize>,
}

impl ScriptGroup {
    fn new(script: Script) -> Self {
        ScriptGroup {
            script,
            input_indices: Vec::new(),
        }
    }
}

/// Partitions input indices by the lock hash of the consumed cells.
///
/// Every lock in `supplied` gets a group, even one without inputs, in supply
/// order. Locks only found among the inputs follow in order of first
/// appearance.
pub fn group_inputs(supplied: &[Script], input_cells: &[CellOutput]) -> Vec<ScriptGroup> {
    let mut groups: Vec<ScriptGroup> = Vec::new();
    let mut positions: HashMap<Byte32, usize> = HashMap::new();
    let mut position_of = |script: Script, groups: &mut Vec<ScriptGroup>| {
        *positions
            .entry(script.calc_script_hash())
            .or_insert_with(|| {
                groups.push(ScriptGroup::new(script));
                groups.len() - 1
            })
    };
    for script in supplied {
        position_of(script.clone(), &mut groups);
    }
    for (index, cell) in input_cells.iter().enumerate() {
        let position = position_of(cell.lock(), &mut groups);
        groups[position].input_indices.push(index);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use ckb_types::{bytes::Bytes, core::ScriptHashType, h256, prelude::*};
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn lock(byte: u8) -> Script {
        Script::new_builder()
            .code_hash(h256!("0x1").pack())
            .hash_type(ScriptHashType::Type.into())
            .args(Bytes::from(vec![byte; 20]).pack())
            .build()
    }

    fn cell(byte: u8) -> CellOutput {
        CellOutput::new_builder().lock(lock(byte)).build()
    }

    #[test]
    fn supplied_locks_come_first_even_when_empty() {
        let groups = group_inputs(&[lock(9), lock(1)], &[cell(1), cell(2), cell(1)]);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].script, lock(9));
        assert!(groups[0].input_indices.is_empty());
        assert_eq!(groups[1].script, lock(1));
        assert_eq!(groups[1].input_indices, vec![0, 2]);
        assert_eq!(groups[2].script, lock(2));
        assert_eq!(groups[2].input_indices, vec![1]);
    }

    #[test]
    fn duplicated_supplied_lock_has_one_group() {
        let groups = group_inputs(&[lock(1), lock(1)], &[cell(1)]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].input_indices, vec![0]);
    }

    proptest! {
        #[test]
        fn groups_partition_the_inputs(
            supplied in prop::collection::vec(0u8..6, 0..4),
            owners in prop::collection::vec(0u8..6, 0..40),
        ) {
            let supplied: Vec<_> = supplied.into_iter().map(lock).collect();
            let cells: Vec<_> = owners.iter().copied().map(cell).collect();
            let groups = group_inputs(&supplied, &cells);

            let mut seen = BTreeSet::new();
            for group in &groups {
                for index in &group.input_indices {
                    prop_assert!(seen.insert(*index), "input {} grouped twice", index);
                    prop_assert_eq!(cells[*index].lock(), group.script.clone());
                }
            }
            prop_assert_eq!(seen, (0..cells.len()).collect::<BTreeSet<_>>());
            for script in &supplied {
                prop_assert!(groups.iter().any(|group| &group.script == script));
            }
        }
    }
}
