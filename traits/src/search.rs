//! Live cell search parameters and results, shaped after the indexer's
//! `get_cells` interface.

use ckb_types::{
    bytes::Bytes,
    core::{BlockNumber, Capacity},
    packed::{CellOutput, OutPoint, Script},
    prelude::*,
};

/// Which script of a cell the search key's script is matched against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScriptType {
    /// Match the lock script.
    #[default]
    Lock,
    /// Match the type script.
    Type,
}

/// How the search key's script is compared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScriptSearchMode {
    /// `code_hash` and `hash_type` must be equal and the cell's args must start
    /// with the key's args.
    #[default]
    Prefix,
    /// The whole script must be equal.
    Exact,
}

/// Result order of a search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Order {
    /// Oldest cells first.
    #[default]
    Asc,
    /// Newest cells first.
    Desc,
}

/// Secondary filters applied after the primary script match.
///
/// Ranges are half-open: `[start, end)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchKeyFilter {
    /// Prefix of the script on the other side (the type script when searching
    /// by lock, the lock script when searching by type).
    pub script: Option<Script>,
    /// Length range of the other side's script, `[0, 1)` means "absent".
    pub script_len_range: Option<[usize; 2]>,
    /// Length range of the output data.
    pub output_data_len_range: Option<[usize; 2]>,
    /// Capacity range of the cell.
    pub output_capacity_range: Option<[Capacity; 2]>,
    /// Range of the block number the cell was created in.
    pub block_range: Option<[BlockNumber; 2]>,
}

/// Describes a set of live cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchKey {
    /// The primary script.
    pub script: Script,
    /// Whether [`script`](Self::script) is a lock or a type script.
    pub script_type: ScriptType,
    /// Comparison mode for the primary script.
    pub script_search_mode: ScriptSearchMode,
    /// Optional secondary filters.
    pub filter: Option<SearchKeyFilter>,
    /// Whether output data should be returned.
    pub with_data: bool,
}

impl SearchKey {
    /// Cells locked by `lock`.
    pub fn by_lock(lock: Script) -> Self {
        SearchKey {
            script: lock,
            script_type: ScriptType::Lock,
            script_search_mode: ScriptSearchMode::Prefix,
            filter: None,
            with_data: true,
        }
    }

    /// Cells locked by `lock` that carry neither a type script nor data,
    /// i.e. cells holding nothing but capacity.
    pub fn plain_by_lock(lock: Script) -> Self {
        SearchKey {
            filter: Some(SearchKeyFilter {
                script_len_range: Some([0, 1]),
                output_data_len_range: Some([0, 1]),
                ..Default::default()
            }),
            ..Self::by_lock(lock)
        }
    }

    /// Cells locked by `lock` whose type script starts with `type_script`.
    pub fn by_lock_and_type(lock: Script, type_script: Script) -> Self {
        SearchKey {
            filter: Some(SearchKeyFilter {
                script: Some(type_script),
                ..Default::default()
            }),
            ..Self::by_lock(lock)
        }
    }

    /// Compares the search mode against `script`.
    pub fn matches_script(&self, script: &Script) -> bool {
        match self.script_search_mode {
            ScriptSearchMode::Exact => self.script.as_slice() == script.as_slice(),
            ScriptSearchMode::Prefix => script_starts_with(script, &self.script),
        }
    }
}

/// Returns true when `script` has the same code hash and hash type as
/// `prefix` and its args start with `prefix`'s args.
pub fn script_starts_with(script: &Script, prefix: &Script) -> bool {
    script.code_hash() == prefix.code_hash()
        && script.hash_type().as_slice() == prefix.hash_type().as_slice()
        && script
            .args()
            .raw_data()
            .starts_with(&prefix.args().raw_data())
}

/// A live (unspent) cell as reported by the search service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiveCell {
    /// Where the cell is.
    pub out_point: OutPoint,
    /// The cell output.
    pub output: CellOutput,
    /// The cell data.
    pub output_data: Bytes,
    /// Number of the block that created the cell.
    pub block_number: BlockNumber,
    /// Position of the creating transaction in its block.
    pub tx_index: u32,
}

impl LiveCell {
    /// Capacity held by the cell, in shannons.
    pub fn capacity(&self) -> u64 {
        self.output.capacity().unpack()
    }
}

/// A page of search results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pagination<T> {
    /// Objects of this page.
    pub objects: Vec<T>,
    /// Cursor to pass as `after_cursor` for the next page.
    pub last_cursor: Bytes,
}

impl<T> Pagination<T> {
    /// Creates a page.
    pub fn new(objects: Vec<T>, last_cursor: Bytes) -> Self {
        Pagination {
            objects,
            last_cursor,
        }
    }
}
