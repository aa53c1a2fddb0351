//! Driver — finalizes a rewritten plan into an executable module

use fr_ir::{EntryFunc, Module, RelPlan, StreamGraph};

use crate::error::{LowerError, LowerResult};
use crate::reducer::synthesize_sum_reducer;
use crate::rules::GreedyRewriter;

/// Name of the entry function wrapping a lowered program
pub const ENTRY_SYMBOL: &str = "main";

/// Lower a relational plan into a streaming iterator module
///
/// Rewrites every operator, terminates the root operator's replacement
/// stream with a sink, wraps the body in the parameterless entry
/// function, appends the synthesized reducer table, and verifies the
/// result against the execution-engine contract before returning it.
/// Fails without partial output if any step does.
pub fn lower_plan(plan: &RelPlan) -> LowerResult<Module> {
    let root = plan.root().ok_or(LowerError::EmptyPlan)?;

    let mut graph = StreamGraph::new();
    let subst = GreedyRewriter::with_default_rules().rewrite_plan(plan, &mut graph)?;

    let terminal = subst
        .get(&root)
        .copied()
        .ok_or(LowerError::UnsupportedOperator {
            kind: plan.op(root).kind(),
        })?;
    graph.sink(terminal)?;
    graph.ret();

    let module = Module::new(
        EntryFunc::new(ENTRY_SYMBOL, graph),
        vec![synthesize_sum_reducer()?],
    );
    module.verify()?;
    log::debug!(
        "lowered {} relational operator(s) into '@{ENTRY_SYMBOL}'",
        plan.len()
    );
    Ok(module)
}

#[cfg(test)]
#[path = "driver_test.rs"]
mod tests;
