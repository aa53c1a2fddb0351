//! Stable textual forms for plans and modules
//!
//! The printed form is the interchange surface: operator name plus its
//! ordered parameter list, with schema field order and type identity
//! preserved. Printing is total and deterministic; a plan or module
//! always prints, whatever state the program is in.

use crate::rel::expr::{Expr, Region};
use crate::rel::operator::{RelOp, RelPlan};
use crate::stream::func::{Module, RecordInstr, ReducerFunc};
use crate::stream::ops::StreamOp;
use crate::stream::types::FieldType;

/// Render a relational plan, one operator per line, regions inline
pub fn print_plan(plan: &RelPlan) -> String {
    let mut out = String::new();
    for (id, op) in plan.ops() {
        match op {
            RelOp::FullTableScan { table_name, result } => {
                out.push_str(&format!(
                    "%{} = rel.full_table_scan [\"{}\"] : {}\n",
                    id.index(),
                    table_name,
                    result
                ));
            }
            RelOp::Select {
                input,
                predicate,
                result,
            } => {
                out.push_str(&format!("%{} = rel.select %{} {{\n", id.index(), input.index()));
                push_region(&mut out, predicate);
                out.push_str(&format!("}} : {result}\n"));
            }
            RelOp::Project {
                input,
                projection,
                result,
            } => {
                out.push_str(&format!(
                    "%{} = rel.project %{} {{\n",
                    id.index(),
                    input.index()
                ));
                push_region(&mut out, projection);
                out.push_str(&format!("}} : {result}\n"));
            }
            RelOp::Aggregate {
                input,
                col_names,
                functions,
                result,
            } => {
                out.push_str(&format!(
                    "%{} = rel.aggregate %{} [cols = [{}], fns = [{}]] : {}\n",
                    id.index(),
                    input.index(),
                    quoted_list(col_names),
                    quoted_list(functions),
                    result
                ));
            }
        }
    }
    out
}

fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("\"{s}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_region(out: &mut String, region: &Region) {
    out.push_str(&format!("  ^(%arg : {}):\n", region.param()));
    for (i, expr) in region.exprs().iter().enumerate() {
        let line = match expr {
            Expr::IndexByName { col_name, ty, .. } => {
                format!("%e{i} = rel.index_by_name %arg [\"{col_name}\"] : {ty}")
            }
            Expr::Literal { value, ty } => {
                format!("%e{i} = rel.literal [{value}] : {ty}")
            }
            Expr::BinOp { lhs, rhs, op, ty } => {
                format!(
                    "%e{i} = rel.bin_op %e{}, %e{} [\"{op}\"] : {ty}",
                    lhs.index(),
                    rhs.index()
                )
            }
            Expr::Compare { lhs, rhs, cmp } => {
                format!(
                    "%e{i} = rel.compare %e{}, %e{} [\"{cmp}\"] : bool",
                    lhs.index(),
                    rhs.index()
                )
            }
            Expr::And { lhs, rhs } => {
                format!("%e{i} = rel.and %e{}, %e{} : bool", lhs.index(), rhs.index())
            }
        };
        out.push_str(&format!("    {line}\n"));
    }
    let yielded = region
        .yielded()
        .iter()
        .map(|id| format!("%e{}", id.index()))
        .collect::<Vec<_>>()
        .join(", ");
    if yielded.is_empty() {
        out.push_str("    rel.yield\n");
    } else {
        out.push_str(&format!("    rel.yield {yielded}\n"));
    }
}

/// Render a module: the entry function followed by the reducer table
pub fn print_module(module: &Module) -> String {
    let mut out = String::new();
    out.push_str(&format!("func @{}() {{\n", module.entry().name()));
    for (id, op) in module.entry().body().ops() {
        let line = match op {
            StreamOp::SampleInput { result } => {
                format!("%{} = stream.sample_input : {result}", id.index())
            }
            StreamOp::ConstantStream { rows, result } => {
                format!(
                    "%{} = stream.constant_stream {} : {result}",
                    id.index(),
                    rows_literal(rows)
                )
            }
            StreamOp::Reduce {
                input,
                func,
                result,
            } => {
                format!(
                    "%{} = stream.reduce %{} @{func} : {result}",
                    id.index(),
                    input.index()
                )
            }
            StreamOp::Sink { input } => format!("stream.sink %{}", input.index()),
            StreamOp::Return => "return".to_string(),
        };
        out.push_str(&format!("  {line}\n"));
    }
    out.push_str("}\n");
    for reducer in module.reducers() {
        out.push('\n');
        push_reducer(&mut out, reducer);
    }
    out
}

fn rows_literal(rows: &[Vec<i64>]) -> String {
    let inner = rows
        .iter()
        .map(|row| {
            format!(
                "[{}]",
                row.iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{inner}]")
}

fn push_reducer(out: &mut String, func: &ReducerFunc) {
    let layout = func.layout();
    out.push_str(&format!(
        "func @{}({layout}, {layout}) -> {layout} {{\n",
        func.name()
    ));

    // recompute each value's field type the way the builder assigned
    // them: ids 0 and 1 are the record parameters
    let mut kinds: Vec<Option<FieldType>> = vec![None, None];
    for instr in func.body() {
        let line = match instr {
            RecordInstr::ExtractValue { src, index } => {
                let ty = layout.fields[*index];
                kinds.push(Some(ty));
                format!(
                    "%{} = extract_value %{} [{index}] : {ty}",
                    kinds.len() - 1,
                    src.index()
                )
            }
            RecordInstr::Add { lhs, rhs } => {
                let ty = kinds[lhs.index()];
                kinds.push(ty);
                let ty = ty.map(|t| t.to_string()).unwrap_or_default();
                format!(
                    "%{} = add %{}, %{} : {ty}",
                    kinds.len() - 1,
                    lhs.index(),
                    rhs.index()
                )
            }
            RecordInstr::InsertValue { dst, value, index } => {
                kinds.push(None);
                format!(
                    "%{} = insert_value %{}, %{} [{index}] : {layout}",
                    kinds.len() - 1,
                    dst.index(),
                    value.index()
                )
            }
            RecordInstr::Return { value } => format!("return %{}", value.index()),
        };
        out.push_str(&format!("  {line}\n"));
    }
    out.push_str("}\n");
}

#[cfg(test)]
#[path = "print_test.rs"]
mod tests;
