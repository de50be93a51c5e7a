//! Fluent construction of single contract calls on a [`CallSequence`].
//!
//! Builders only append; they never validate what a call means. A call that makes no sense
//! to the ledger is still appended and fails at simulation time.

use std::fmt;

use nemo_common::{
    models::{
        descriptor::CallDescriptor,
        ptb::{Argument, CallSequence, Command, MoveCall},
        simulation::SimulationOutcome,
    },
    ObjectId, TypeTag,
};
use serde::Serialize;

use crate::{decode, errors::PtbError, simulation::DryRunSimulator};

/// Fully qualified `<package>::<module>::<function>` of a contract call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTarget {
    pub package: ObjectId,
    pub module: &'static str,
    pub function: &'static str,
}

impl MoveTarget {
    pub const fn new(package: ObjectId, module: &'static str, function: &'static str) -> Self {
        Self { package, module, function }
    }
}

impl fmt::Display for MoveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.package, self.module, self.function)
    }
}

pub trait CallSequenceExt {
    /// Starts a new call on this sequence. Nothing is appended until
    /// [`MoveCallBuilder::finish`].
    fn move_call(&mut self, target: MoveTarget, type_arguments: Vec<TypeTag>) -> MoveCallBuilder<'_>;
}

impl CallSequenceExt for CallSequence {
    fn move_call(&mut self, target: MoveTarget, type_arguments: Vec<TypeTag>) -> MoveCallBuilder<'_> {
        MoveCallBuilder::new(self, target, type_arguments)
    }
}

/// Collects the arguments of one call in declaration order.
#[must_use = "a call is only appended by `finish`"]
pub struct MoveCallBuilder<'a> {
    seq: &'a mut CallSequence,
    target: MoveTarget,
    arguments: Vec<Argument>,
    descriptor: CallDescriptor,
}

impl<'a> MoveCallBuilder<'a> {
    fn new(seq: &'a mut CallSequence, target: MoveTarget, type_arguments: Vec<TypeTag>) -> Self {
        Self {
            seq,
            target,
            arguments: Vec::new(),
            descriptor: CallDescriptor::new(target.to_string(), type_arguments),
        }
    }

    /// Owned or immutable object argument.
    pub fn object(self, name: &str, id: ObjectId) -> Self {
        let handle = self.seq.object(id);
        self.push(name, handle, id.to_string())
    }

    /// Mutable shared object argument.
    pub fn shared(self, name: &str, id: ObjectId) -> Self {
        let handle = self.seq.shared_object(id, true);
        self.push(name, handle, id.to_string())
    }

    /// Read-only shared object argument, e.g. the clock.
    pub fn shared_ref(self, name: &str, id: ObjectId) -> Self {
        let handle = self.seq.shared_object(id, false);
        self.push(name, handle, id.to_string())
    }

    /// BCS encoded pure argument. Nothing is added to the sequence when encoding fails.
    pub fn pure<T>(self, operation: &'static str, name: &str, value: &T) -> Result<Self, PtbError>
    where
        T: Serialize + fmt::Display + ?Sized,
    {
        let target = self.target;
        let handle = self
            .seq
            .pure(value)
            .map_err(|source| PtbError::Encoding {
                operation,
                target: target.to_string(),
                argument: name.to_string(),
                source,
            })?;
        let rendered = value.to_string();
        Ok(self.push(name, handle, rendered))
    }

    /// Output of an earlier call or another existing handle.
    pub fn arg(self, name: &str, handle: Argument) -> Self {
        self.push(name, handle, handle.to_string())
    }

    fn push(mut self, name: &str, handle: Argument, rendered: String) -> Self {
        self.arguments.push(handle);
        self.descriptor = self
            .descriptor
            .with_argument(name, rendered);
        self
    }

    /// Like [`finish`](Self::finish), also returning a copy of the recorded descriptor.
    pub fn finish_with_descriptor(self) -> (CallHandle, CallDescriptor) {
        let descriptor = self.descriptor.clone();
        (self.finish(), descriptor)
    }

    /// Appends exactly one call and records its descriptor.
    pub fn finish(self) -> CallHandle {
        let MoveCallBuilder { seq, target, arguments, descriptor } = self;
        let call = MoveCall {
            package: target.package,
            module: target.module.to_string(),
            function: target.function.to_string(),
            type_arguments: descriptor.type_arguments.clone(),
            arguments,
        };
        let index = seq.next_index();
        seq.command(Command::MoveCall(Box::new(call)));
        seq.record(descriptor);
        CallHandle { index }
    }
}

/// Position of an appended call, used to address its return values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallHandle {
    index: u16,
}

impl CallHandle {
    /// Handle to the call's only return value.
    pub fn result(&self) -> Argument {
        Argument::Result(self.index)
    }

    /// Handle to return value `slot` of a call with several returns.
    pub fn nested(&self, slot: u16) -> Argument {
        Argument::NestedResult(self.index, slot)
    }

    /// Command index inside the sequence; also the index of its simulation result.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// Which optional diagnostics to attach to a [`CallResult`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceOptions {
    /// Attach the descriptor trail of the built sequence.
    pub descriptors: bool,
    /// Attach the raw simulation outcome, when there was one.
    pub outcome: bool,
}

impl TraceOptions {
    pub fn all() -> Self {
        Self { descriptors: true, outcome: true }
    }
}

/// A value produced by a builder or query, plus whatever diagnostics were requested.
///
/// `outcome` and `descriptors` are `None` unless the matching [`TraceOptions`] flag was
/// set. Callers must not rely on them otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallResult<T> {
    pub value: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<SimulationOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptors: Option<Vec<CallDescriptor>>,
}

impl<T> CallResult<T> {
    pub fn new(value: T) -> Self {
        Self { value, outcome: None, descriptors: None }
    }

    /// Attaches the requested diagnostics.
    pub fn traced(
        value: T,
        trace: TraceOptions,
        descriptors: &[CallDescriptor],
        outcome: Option<&SimulationOutcome>,
    ) -> Self {
        Self {
            value,
            outcome: outcome
                .filter(|_| trace.outcome)
                .cloned(),
            descriptors: trace
                .descriptors
                .then(|| descriptors.to_vec()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CallResult<U> {
        CallResult { value: f(self.value), outcome: self.outcome, descriptors: self.descriptors }
    }
}

/// Builds a sequence holding exactly one call, dry-runs it and decodes its first return
/// value as a `u64`.
pub async fn probe_u64<F>(
    simulator: &DryRunSimulator<'_>,
    operation: &'static str,
    trace: TraceOptions,
    build: F,
) -> Result<CallResult<u64>, PtbError>
where
    F: FnOnce(&mut CallSequence) -> Result<CallHandle, PtbError>,
{
    let mut seq = CallSequence::new();
    let handle = build(&mut seq)?;
    let outcome = simulator
        .run(operation, &seq)
        .await?;
    let (bytes, type_tag) = simulator.return_value(operation, &seq, &outcome, handle.index(), 0)?;
    let value = decode::decode_u64(operation, bytes, Some(type_tag))?;
    Ok(CallResult::traced(value, trace, seq.descriptors(), Some(&outcome)))
}

#[cfg(test)]
mod tests {
    use nemo_common::models::ptb::CallArg;
    use pretty_assertions::assert_eq;

    use super::*;

    const PACKAGE: ObjectId = ObjectId::from_low_u64(0xbeef);

    /// A value whose serializer always fails.
    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("not representable"))
        }
    }

    impl fmt::Display for Unencodable {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "unencodable")
        }
    }

    #[test]
    fn test_finish_appends_one_call_with_descriptor() {
        let mut seq = CallSequence::new();
        let state = ObjectId::from_low_u64(0x51);

        let handle = seq
            .move_call(MoveTarget::new(PACKAGE, "vault", "deposit"), vec!["0x2::sui::SUI".into()])
            .shared("state", state)
            .pure("test", "amount", &500u64)
            .unwrap()
            .finish();

        assert_eq!(handle.index(), 0);
        assert_eq!(handle.result(), Argument::Result(0));
        assert_eq!(handle.nested(1), Argument::NestedResult(0, 1));
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.inputs()[1], CallArg::Pure(500u64.to_le_bytes().to_vec()));

        let descriptor = &seq.descriptors()[0];
        assert_eq!(descriptor.target, format!("{PACKAGE}::vault::deposit"));
        assert_eq!(descriptor.argument("amount"), Some("500"));
        assert_eq!(descriptor.argument("state"), Some(state.to_string().as_str()));
        assert_eq!(descriptor.type_arguments, vec!["0x2::sui::SUI".to_string()]);
    }

    #[test]
    fn test_encoding_failure_names_operation_and_appends_nothing() {
        let mut seq = CallSequence::new();

        let err = seq
            .move_call(MoveTarget::new(PACKAGE, "vault", "deposit"), vec![])
            .pure("redeem", "amount", &Unencodable)
            .err()
            .unwrap();

        assert!(matches!(err, PtbError::Encoding { operation: "redeem", .. }));
        assert!(
            err.to_string()
                .starts_with(&format!("redeem: failed to encode argument `amount` of {PACKAGE}::vault::deposit")),
            "{err}"
        );
        assert!(seq.is_empty());
        assert!(seq.inputs().is_empty());
    }

    #[test]
    fn test_later_calls_reference_earlier_results() {
        let mut seq = CallSequence::new();
        let first = seq
            .move_call(MoveTarget::new(PACKAGE, "a", "make"), vec![])
            .finish();
        let second = seq
            .move_call(MoveTarget::new(PACKAGE, "a", "consume"), vec![])
            .arg("input", first.result())
            .finish();

        assert_eq!(second.index(), 1);
        assert_eq!(seq.descriptors()[1].argument("input"), Some("Result(0)"));
        assert!(seq.validate_references().is_ok());
    }

    #[test]
    fn test_traced_respects_flags() {
        let descriptors = vec![CallDescriptor::new("0x1::m::f", vec![])];
        let outcome = SimulationOutcome::success(vec![]);

        let bare = CallResult::traced(1u64, TraceOptions::default(), &descriptors, Some(&outcome));
        assert_eq!(bare, CallResult::new(1u64));

        let full = CallResult::traced(1u64, TraceOptions::all(), &descriptors, Some(&outcome));
        assert_eq!(full.descriptors, Some(descriptors));
        assert_eq!(full.outcome, Some(outcome));
        assert_eq!(full.map(|v| v.to_string()).value, "1");
    }
}
