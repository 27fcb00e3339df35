//! Transaction data model for programmable transaction blocks that may still
//! carry symbolic package names.
//!
//! Commands mirror the PTB command shapes; only the string-typed package and
//! type-argument fields matter for name resolution, the rest is carried
//! through untouched.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Transaction under construction: a sender and an ordered command list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionData {
    /// Sender address (optional while building)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,

    /// The PTB commands in build order
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl TransactionData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command and return its index (usable as `Argument::Result`).
    pub fn add_command(&mut self, command: Command) -> u16 {
        self.commands.push(command);
        (self.commands.len() - 1) as u16
    }

    /// Iterate over the move calls in command order.
    pub fn move_calls(&self) -> impl Iterator<Item = &MoveCall> {
        self.commands.iter().filter_map(|c| match c {
            Command::MoveCall(call) => Some(call),
            _ => None,
        })
    }
}

/// A command in a Programmable Transaction Block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Move function call
    MoveCall(MoveCall),

    /// Make move vector
    MakeMoveVec {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        type_arg: Option<String>,
        elements: Vec<Argument>,
    },

    /// Split coins
    SplitCoins {
        coin: Argument,
        amounts: Vec<Argument>,
    },

    /// Merge coins
    MergeCoins {
        destination: Argument,
        sources: Vec<Argument>,
    },

    /// Transfer objects
    TransferObjects {
        objects: Vec<Argument>,
        address: Argument,
    },
}

/// A Move call. `package` is either a hex address or a symbolic name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCall {
    pub package: String,
    pub module: String,
    pub function: String,
    #[serde(default)]
    pub type_arguments: Vec<String>,
    #[serde(default)]
    pub arguments: Vec<Argument>,
}

impl MoveCall {
    /// Build a call from a combined `package::module::function` target.
    ///
    /// ```
    /// use sui_mvr_types::MoveCall;
    ///
    /// let call = MoveCall::from_target("nft@sample::demo::new_nft").unwrap();
    /// assert_eq!(call.package, "nft@sample");
    /// assert_eq!(call.function, "new_nft");
    /// ```
    pub fn from_target(target: &str) -> Result<Self> {
        let parts: Vec<&str> = target.split("::").collect();
        let [package, module, function] = parts.as_slice() else {
            return Err(anyhow!(
                "invalid move call target '{}': expected package::module::function",
                target
            ));
        };
        if package.is_empty() || module.is_empty() || function.is_empty() {
            return Err(anyhow!("invalid move call target '{}'", target));
        }
        Ok(Self {
            package: package.to_string(),
            module: module.to_string(),
            function: function.to_string(),
            type_arguments: Vec::new(),
            arguments: Vec::new(),
        })
    }

    pub fn with_type_arguments<I, S>(mut self, type_arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_arguments = type_arguments.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_arguments(mut self, arguments: Vec<Argument>) -> Self {
        self.arguments = arguments;
        self
    }

    /// The combined `package::module::function` target.
    pub fn target(&self) -> String {
        format!("{}::{}::{}", self.package, self.module, self.function)
    }
}

/// Argument reference in a PTB command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Argument {
    GasCoin,
    Input(u16),
    Result(u16),
    NestedResult(u16, u16),
}
