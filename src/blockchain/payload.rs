//! Entry function payloads.
//!
//! Arguments are typed here and only become JSON at the edge, using the
//! node's encoding: `u64` as a decimal string, bytes as `0x` hex, vectors as
//! arrays.

use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use crate::blockchain::types::{AccountAddress, BlockchainError};

/// Fully qualified `address::module::function`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFunctionId {
    pub address: AccountAddress,
    pub module: String,
    pub function: String,
}

impl EntryFunctionId {
    pub fn new(address: AccountAddress, module: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            address,
            module: module.into(),
            function: function.into(),
        }
    }
}

impl fmt::Display for EntryFunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.function)
    }
}

impl FromStr for EntryFunctionId {
    type Err = BlockchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split("::").collect();
        match parts.as_slice() {
            [address, module, function] if !module.is_empty() && !function.is_empty() => {
                Ok(Self::new(address.parse()?, *module, *function))
            }
            _ => Err(BlockchainError::Config(format!(
                "invalid entry function '{}': expected address::module::function",
                s
            ))),
        }
    }
}

/// A typed Move argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveArg {
    String(String),
    U64(u64),
    Bool(bool),
    Address(AccountAddress),
    Bytes(Vec<u8>),
    Vector(Vec<MoveArg>),
}

impl MoveArg {
    pub fn string(value: impl Into<String>) -> Self {
        MoveArg::String(value.into())
    }

    /// `vector<String>` from any list of strings.
    pub fn strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MoveArg::Vector(values.into_iter().map(|v| MoveArg::String(v.into())).collect())
    }

    pub fn addresses(values: &[AccountAddress]) -> Self {
        MoveArg::Vector(values.iter().copied().map(MoveArg::Address).collect())
    }

    pub fn to_json(&self) -> Value {
        match self {
            MoveArg::String(s) => Value::String(s.clone()),
            MoveArg::U64(n) => Value::String(n.to_string()),
            MoveArg::Bool(b) => Value::Bool(*b),
            MoveArg::Address(a) => Value::String(a.to_hex_literal()),
            MoveArg::Bytes(bytes) => Value::String(format!("0x{}", hex::encode(bytes))),
            MoveArg::Vector(items) => Value::Array(items.iter().map(MoveArg::to_json).collect()),
        }
    }
}

/// An entry function call. Built fresh per submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPayload {
    pub function: EntryFunctionId,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<MoveArg>,
}

impl TransactionPayload {
    pub fn entry_function(function: EntryFunctionId, arguments: Vec<MoveArg>) -> Self {
        Self {
            function,
            type_arguments: Vec::new(),
            arguments,
        }
    }

    /// JSON body in the node's `entry_function_payload` format.
    pub fn to_json(&self) -> Value {
        json!({
            "type": "entry_function_payload",
            "function": self.function.to_string(),
            "type_arguments": self.type_arguments,
            "arguments": self.arguments.iter().map(MoveArg::to_json).collect::<Vec<_>>(),
        })
    }
}
