use serde::{Deserialize, Serialize};
use std::fmt;

/// Height of a block on the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockHeight(pub u64);

impl BlockHeight {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for BlockHeight {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryParam {
    BlockNumber(BlockHeight),
}

/// A named, parameterized query: `text` uses positional placeholders bound from `params`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceQuery {
    pub name: &'static str,
    pub text: String,
    pub params: Vec<QueryParam>,
}

impl TraceQuery {
    pub const GET_TRACES: &'static str = "get-traces";
    pub const RELATION: &'static str = "trace";
    pub const COLUMNS: [&'static str; 3] = ["timestamp", "transaction_hash", "traces"];

    /// Rows of one block, in storage order.
    pub fn for_block(height: BlockHeight) -> Self {
        let text = format!(
            "select {} from {} where block_number = ?1 order by rowid",
            Self::COLUMNS.join(", "),
            Self::RELATION,
        );
        Self {
            name: Self::GET_TRACES,
            text,
            params: vec![QueryParam::BlockNumber(height)],
        }
    }

    pub fn block_number(&self) -> Option<BlockHeight> {
        self.params.iter().find_map(|param| match param {
            QueryParam::BlockNumber(height) => Some(*height),
        })
    }
}
