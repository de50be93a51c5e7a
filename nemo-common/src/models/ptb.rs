//! Programmable call sequence model.
//!
//! A `CallSequence` is the in-process representation of one programmable transaction
//! block: a list of inputs (pure BCS values and object references) and an ordered list of
//! commands whose arguments refer to inputs or to the results of earlier commands.
//! The sequence is append-only; later commands may consume the outputs of earlier ones,
//! so the append order is the execution order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{
    descriptor::CallDescriptor, error::ReferenceError, ObjectId, TypeTag,
};

/// Handle to a value available inside a call sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Argument {
    /// The coin paying for gas.
    GasCoin,
    /// An entry of the sequence inputs.
    Input(u16),
    /// The single result of a command.
    Result(u16),
    /// One of several results of a command.
    NestedResult(u16, u16),
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::GasCoin => write!(f, "GasCoin"),
            Argument::Input(idx) => write!(f, "Input({idx})"),
            Argument::Result(idx) => write!(f, "Result({idx})"),
            Argument::NestedResult(idx, slot) => write!(f, "NestedResult({idx}, {slot})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectArg {
    /// Owned or immutable object. Version and digest are resolved by the ledger client.
    Owned(ObjectId),
    Shared { id: ObjectId, mutable: bool },
}

impl ObjectArg {
    pub fn id(&self) -> &ObjectId {
        match self {
            ObjectArg::Owned(id) => id,
            ObjectArg::Shared { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
    /// BCS encoded pure value.
    Pure(Vec<u8>),
    Object(ObjectArg),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCall {
    pub package: ObjectId,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveCall(Box<MoveCall>),
    SplitCoins(Argument, Vec<Argument>),
    MergeCoins(Argument, Vec<Argument>),
    TransferObjects(Vec<Argument>, Argument),
}

impl Command {
    fn arguments(&self) -> Vec<Argument> {
        match self {
            Command::MoveCall(call) => call.arguments.clone(),
            Command::SplitCoins(coin, amounts) => {
                std::iter::once(*coin)
                    .chain(amounts.iter().copied())
                    .collect()
            }
            Command::MergeCoins(target, sources) => {
                std::iter::once(*target)
                    .chain(sources.iter().copied())
                    .collect()
            }
            Command::TransferObjects(objects, recipient) => objects
                .iter()
                .copied()
                .chain(std::iter::once(*recipient))
                .collect(),
        }
    }
}

/// Most inputs a single transaction block may carry.
pub const MAX_INPUTS: usize = 2048;
/// Most commands a single transaction block may carry.
pub const MAX_COMMANDS: usize = 1024;

/// Handle index for the element at `position`. Positions past `u16::MAX` saturate; such a
/// sequence is far over the block limits and fails `validate_references`.
fn handle_index(position: usize) -> u16 {
    u16::try_from(position).unwrap_or(u16::MAX)
}

/// Ordered, append-only list of pending calls forming one atomic unit of work.
///
/// Owned by exactly one builder at a time; all mutation goes through `&mut self`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSequence {
    inputs: Vec<CallArg>,
    commands: Vec<Command>,
    /// Descriptor for every move call appended, in append order.
    trail: Vec<CallDescriptor>,
}

impl CallSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a BCS encoded value as a pure input.
    pub fn pure<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<Argument, bcs::Error> {
        let bytes = bcs::to_bytes(value)?;
        Ok(self.pure_bytes(bytes))
    }

    pub fn pure_bytes(&mut self, bytes: Vec<u8>) -> Argument {
        self.inputs.push(CallArg::Pure(bytes));
        Argument::Input(handle_index(self.inputs.len() - 1))
    }

    /// References an owned or immutable object. The same id always maps to the same input.
    pub fn object(&mut self, id: ObjectId) -> Argument {
        if let Some(idx) = self.find_object(&id) {
            return Argument::Input(handle_index(idx));
        }
        self.inputs
            .push(CallArg::Object(ObjectArg::Owned(id)));
        Argument::Input(handle_index(self.inputs.len() - 1))
    }

    /// References a shared object. Re-adding an object already referenced as immutable
    /// with `mutable = true` upgrades the existing input.
    pub fn shared_object(&mut self, id: ObjectId, mutable: bool) -> Argument {
        if let Some(idx) = self.find_object(&id) {
            match &mut self.inputs[idx] {
                CallArg::Object(ObjectArg::Shared { mutable: existing, .. }) => {
                    *existing |= mutable;
                }
                other => *other = CallArg::Object(ObjectArg::Shared { id, mutable }),
            }
            return Argument::Input(handle_index(idx));
        }
        self.inputs
            .push(CallArg::Object(ObjectArg::Shared { id, mutable }));
        Argument::Input(handle_index(self.inputs.len() - 1))
    }

    fn find_object(&self, id: &ObjectId) -> Option<usize> {
        self.inputs
            .iter()
            .position(|input| matches!(input, CallArg::Object(obj) if obj.id() == id))
    }

    /// Appends a command and returns the handle to its (first) result.
    pub fn command(&mut self, command: Command) -> Argument {
        self.commands.push(command);
        Argument::Result(handle_index(self.commands.len() - 1))
    }

    /// Records the audit descriptor of the most recently appended call.
    pub fn record(&mut self, descriptor: CallDescriptor) {
        self.trail.push(descriptor);
    }

    pub fn inputs(&self) -> &[CallArg] {
        &self.inputs
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn descriptors(&self) -> &[CallDescriptor] {
        &self.trail
    }

    /// Number of commands appended so far.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Index the next appended command will receive.
    pub fn next_index(&self) -> u16 {
        handle_index(self.commands.len())
    }

    /// Checks that the sequence fits in one transaction block and that every handle used
    /// by a command resolves to an existing input or to a command appended before it.
    pub fn validate_references(&self) -> Result<(), ReferenceError> {
        if self.inputs.len() > MAX_INPUTS {
            return Err(ReferenceError::InputLimit { count: self.inputs.len(), limit: MAX_INPUTS });
        }
        if self.commands.len() > MAX_COMMANDS {
            return Err(ReferenceError::CommandLimit {
                count: self.commands.len(),
                limit: MAX_COMMANDS,
            });
        }
        for (position, command) in self.commands.iter().enumerate() {
            for argument in command.arguments() {
                match argument {
                    Argument::GasCoin => {}
                    Argument::Input(input) => {
                        if input as usize >= self.inputs.len() {
                            return Err(ReferenceError::UnknownInput {
                                command: position,
                                input,
                                available: self.inputs.len(),
                            });
                        }
                    }
                    Argument::Result(result) | Argument::NestedResult(result, _) => {
                        if result as usize >= position {
                            return Err(ReferenceError::ForwardResult { command: position, result });
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
