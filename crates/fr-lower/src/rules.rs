//! Rewrite rules — relational operators to iterator operations

use std::collections::HashMap;

use fr_ir::{OpId, RelOp, RelPlan, StreamGraph, StreamOpId};

use crate::convert::convert_bag;
use crate::error::{LowerError, LowerResult};
use crate::reducer::{sum_reducer_layout, SUM_STRUCT};

/// Rows emitted for every lowered scan until scans bind to storage
const SCAN_PLACEHOLDER_ROWS: usize = 4;

/// Shared state of one rewrite sweep
///
/// The relational plan is read-only; replacements land in the stream
/// graph and are recorded in the substitution map keyed by the old
/// operator's id. Old nodes stay around for diagnostics.
pub(crate) struct RewriteCtx<'a> {
    pub plan: &'a RelPlan,
    pub graph: &'a mut StreamGraph,
    pub subst: &'a HashMap<OpId, StreamOpId>,
}

impl RewriteCtx<'_> {
    /// Replacement of an already-processed operand
    fn lowered(&self, input: OpId) -> LowerResult<StreamOpId> {
        self.subst
            .get(&input)
            .copied()
            .ok_or_else(|| LowerError::UnsupportedOperator {
                kind: self.plan.op(input).kind(),
            })
    }
}

/// One local rewrite over a single relational operator kind
///
/// Rules match disjoint kinds, read only the matched node and its
/// operands' replacements, and emit iterator-dialect ops that no rule
/// re-matches, so one ordered sweep reaches the fixed point.
pub(crate) trait RewriteRule {
    /// Rule name (logging and display)
    fn name(&self) -> &'static str;
    /// Whether this rule applies to the given operator
    fn matches(&self, op: &RelOp) -> bool;
    /// Emit the replacement for a matched operator
    fn rewrite(&self, op: &RelOp, ctx: &mut RewriteCtx<'_>) -> LowerResult<StreamOpId>;
}

/// FullTableScan -> ConstantStream
///
/// No physical storage binding exists, so every scan becomes a fixed
/// placeholder stream: four rows, the row index replicated across each
/// field of the converted layout. A storage-backed implementation
/// would rewrite the scan into a read from its table collaborator
/// instead; this rule isolates that seam.
pub(crate) struct ScanToConstantStream;

impl RewriteRule for ScanToConstantStream {
    fn name(&self) -> &'static str {
        "scan_to_constant_stream"
    }

    fn matches(&self, op: &RelOp) -> bool {
        matches!(op, RelOp::FullTableScan { .. })
    }

    fn rewrite(&self, op: &RelOp, ctx: &mut RewriteCtx<'_>) -> LowerResult<StreamOpId> {
        let result = convert_bag(op.result())?;
        let width = result.elem.len();
        let rows = (0..SCAN_PLACEHOLDER_ROWS)
            .map(|i| vec![i as i64; width])
            .collect();
        Ok(ctx.graph.constant_stream(rows, result)?)
    }
}

/// Aggregate -> Reduce
///
/// A "sum" aggregate becomes a reduce whose merge-function reference
/// names the synthesized struct-sum reducer. The reducer's signature is
/// fixed at `(record<i32>, record<i32>) -> record<i32>`; any other
/// converted layout needs a reducer of its own and is rejected rather
/// than silently shared.
pub(crate) struct AggregateToReduce;

impl RewriteRule for AggregateToReduce {
    fn name(&self) -> &'static str {
        "aggregate_to_reduce"
    }

    fn matches(&self, op: &RelOp) -> bool {
        matches!(op, RelOp::Aggregate { .. })
    }

    fn rewrite(&self, op: &RelOp, ctx: &mut RewriteCtx<'_>) -> LowerResult<StreamOpId> {
        let input = match op {
            RelOp::Aggregate { input, .. } => *input,
            other => {
                return Err(LowerError::UnsupportedOperator { kind: other.kind() });
            }
        };
        let result = convert_bag(op.result())?;
        if result.elem != sum_reducer_layout() {
            return Err(LowerError::UnsupportedReducerLayout {
                layout: result.elem,
            });
        }
        let lowered_input = ctx.lowered(input)?;
        Ok(ctx.graph.reduce(lowered_input, SUM_STRUCT, result)?)
    }
}

/// Applies the rule set over a plan until no operator is left unrewritten
pub(crate) struct GreedyRewriter {
    rules: Vec<Box<dyn RewriteRule>>,
}

impl GreedyRewriter {
    /// Rewriter with the built-in lowering rules
    pub fn with_default_rules() -> Self {
        Self {
            rules: vec![Box::new(ScanToConstantStream), Box::new(AggregateToReduce)],
        }
    }

    /// Rewrite every operator of `plan` into `graph`
    ///
    /// Operators are taken in arena order, so an operator's operands
    /// are always rewritten before the operator itself. The first
    /// operator no rule matches aborts the sweep; lowering never
    /// produces a partially rewritten program.
    pub fn rewrite_plan(
        &self,
        plan: &RelPlan,
        graph: &mut StreamGraph,
    ) -> LowerResult<HashMap<OpId, StreamOpId>> {
        let mut subst: HashMap<OpId, StreamOpId> = HashMap::new();
        let worklist: Vec<OpId> = plan.ops().map(|(id, _)| id).collect();
        for id in worklist {
            let op = plan.op(id);
            let rule = self
                .rules
                .iter()
                .find(|r| r.matches(op))
                .ok_or(LowerError::UnsupportedOperator { kind: op.kind() })?;
            let replacement = {
                let mut ctx = RewriteCtx {
                    plan,
                    graph,
                    subst: &subst,
                };
                rule.rewrite(op, &mut ctx)?
            };
            log::debug!(
                "rule '{}' rewrote %{} ({}) into stream op %{}",
                rule.name(),
                id.index(),
                op.kind(),
                replacement.index()
            );
            subst.insert(id, replacement);
        }
        Ok(subst)
    }
}

#[cfg(test)]
#[path = "rules_test.rs"]
mod tests;
