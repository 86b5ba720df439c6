//! Textual dump of a module in an LLVM-like syntax.

use crate::entities::{FuncId, Inst};
use crate::function::Function;
use crate::instructions::{Callee, InstData, InstructionData};
use crate::metadata::Metadata;
use crate::module::Module;
use crate::values::Value;
use std::fmt::{self, Write};

pub fn format_module(module: &Module) -> String {
    let mut output = String::new();
    // Writing into a String cannot fail.
    let _ = write_module(&mut output, module);
    output
}

pub fn format_function(module: &Module, func: FuncId) -> String {
    let mut output = String::new();
    let _ = write_function(&mut output, module, func);
    output
}

pub fn write_module(out: &mut impl Write, module: &Module) -> fmt::Result {
    writeln!(out, "; ModuleID = '{}'", module.name)?;

    for (_, global) in module.globals.iter() {
        write!(
            out,
            "@{} = {} {}",
            global.name,
            if global.constant { "constant" } else { "global" },
            global.ty
        )?;
        if let Some(init) = &global.initializer {
            write!(out, " {}", init)?;
        }
        writeln!(out)?;
    }

    for (func, _) in module.functions.iter() {
        writeln!(out)?;
        write_function(out, module, func)?;
    }

    if !module.metadata.is_empty() {
        writeln!(out)?;
    }
    for (node, data) in module.metadata.iter() {
        let operands = data
            .operands
            .iter()
            .map(format_metadata)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            out,
            "{} = {}!{{{}}}",
            node,
            if data.distinct { "distinct " } else { "" },
            operands
        )?;
    }
    Ok(())
}

pub fn write_function(out: &mut impl Write, module: &Module, func: FuncId) -> fmt::Result {
    let function = module.function(func);
    let params = function
        .ty
        .params
        .iter()
        .enumerate()
        .map(|(i, ty)| format!("{} %arg{}", ty, i))
        .collect::<Vec<_>>()
        .join(", ");

    if function.is_declaration() {
        return writeln!(out, "declare {} @{}({})", function.ty.ret, function.name, params);
    }

    writeln!(out, "define {} @{}({}) {{", function.ty.ret, function.name, params)?;
    for (block, data) in function.blocks.iter() {
        writeln!(out, "{}:", block)?;
        for inst in &data.insts {
            write!(out, "  ")?;
            write_inst(out, module, function, *inst)?;
            writeln!(out)?;
        }
    }
    writeln!(out, "}}")
}

fn format_value(module: &Module, value: &Value) -> String {
    match value {
        Value::Inst(inst) => format!("%{}", inst),
        Value::Argument { index, .. } => format!("%arg{}", index),
        Value::Constant(c) => c.to_string(),
        Value::Global(global) => format!("@{}", module.global(*global).name),
        Value::Function(func) => format!("@{}", module.function(*func).name),
    }
}

fn format_values(module: &Module, values: &[Value]) -> String {
    values
        .iter()
        .map(|v| format_value(module, v))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_callee(module: &Module, callee: &Callee) -> String {
    match callee {
        Callee::Direct(func) => format!("@{}", module.function(*func).name),
        Callee::Indirect(value) => format_value(module, value),
        Callee::InlineAsm(asm) => format!(
            "asm {}{}\"{}\", \"{}\"",
            if asm.side_effects { "sideeffect " } else { "" },
            if asm.align_stack { "alignstack " } else { "" },
            asm.asm,
            asm.constraints
        ),
    }
}

fn format_metadata(md: &Metadata) -> String {
    match md {
        Metadata::String(s) => format!("!\"{}\"", s),
        Metadata::Constant(c) => format!("{} {}", c.ty(), c),
        Metadata::Node(node) => node.to_string(),
        Metadata::Temporary => "<temporary>".to_string(),
    }
}

fn write_inst(
    out: &mut impl Write,
    module: &Module,
    function: &Function,
    inst: Inst,
) -> fmt::Result {
    let data: &InstData = &function.insts[inst];
    if !data.ty.is_void() {
        write!(out, "%{} = ", inst)?;
    }
    let flags = if data.fast_math.is_empty() {
        String::new()
    } else {
        format!("{} ", data.fast_math)
    };

    match &data.kind {
        InstructionData::Call { callee, fn_ty, args } => write!(
            out,
            "call {}{} {}({})",
            flags,
            fn_ty.ret,
            format_callee(module, callee),
            format_values(module, args)
        )?,
        InstructionData::Invoke {
            callee,
            fn_ty,
            args,
            normal,
            unwind,
        } => write!(
            out,
            "invoke {} {}({}) to label %{} unwind label %{}",
            fn_ty.ret,
            format_callee(module, callee),
            format_values(module, args),
            normal,
            unwind
        )?,
        InstructionData::LandingPad { cleanup, clauses } => {
            write!(out, "landingpad {}", data.ty)?;
            if *cleanup {
                write!(out, " cleanup")?;
            }
            for clause in clauses {
                write!(out, " catch {}", format_value(module, clause))?;
            }
        }
        InstructionData::Br { dest } => write!(out, "br label %{}", dest)?,
        InstructionData::CondBr {
            cond,
            then_dest,
            else_dest,
        } => write!(
            out,
            "br i1 {}, label %{}, label %{}",
            format_value(module, cond),
            then_dest,
            else_dest
        )?,
        InstructionData::Switch {
            value,
            default,
            cases,
        } => {
            write!(
                out,
                "switch {}, label %{} [",
                format_value(module, value),
                default
            )?;
            for (case, dest) in cases {
                write!(out, " {} {}, label %{}", case.ty(), case, dest)?;
            }
            write!(out, " ]")?;
        }
        InstructionData::Phi { incoming } => {
            let pairs = incoming
                .iter()
                .map(|(v, b)| format!("[ {}, %{} ]", format_value(module, v), b))
                .collect::<Vec<_>>()
                .join(", ");
            write!(out, "phi {}{} {}", flags, data.ty, pairs)?;
        }
        InstructionData::Ret { value: Some(value) } => {
            write!(out, "ret {}", format_value(module, value))?
        }
        InstructionData::Ret { value: None } => write!(out, "ret void")?,
        InstructionData::Unreachable => write!(out, "unreachable")?,
        InstructionData::Binary { op, lhs, rhs } => write!(
            out,
            "{} {}{} {}, {}",
            op.as_ref(),
            flags,
            data.ty,
            format_value(module, lhs),
            format_value(module, rhs)
        )?,
        InstructionData::ICmp { pred, lhs, rhs } => write!(
            out,
            "icmp {} {}, {}",
            pred.as_ref(),
            format_value(module, lhs),
            format_value(module, rhs)
        )?,
        InstructionData::FCmp { pred, lhs, rhs } => write!(
            out,
            "fcmp {}{} {}, {}",
            flags,
            pred.as_ref(),
            format_value(module, lhs),
            format_value(module, rhs)
        )?,
        InstructionData::AtomicRmw {
            op,
            ptr,
            value,
            ordering,
        } => write!(
            out,
            "atomicrmw {} {}, {} {}",
            op.as_ref(),
            format_value(module, ptr),
            format_value(module, value),
            ordering.as_ref()
        )?,
        InstructionData::Load { ptr } => {
            write!(out, "load {}, {}", data.ty, format_value(module, ptr))?
        }
        InstructionData::Store { value, ptr } => write!(
            out,
            "store {}, {}",
            format_value(module, value),
            format_value(module, ptr)
        )?,
    }

    for index in data.attributes.indices() {
        for attr in data.attributes.at_index(index) {
            write!(out, " #{}:{}", index, attr)?;
        }
    }
    for (kind, node) in &data.metadata {
        let name = module.md_kinds.name(*kind).unwrap_or("unknown");
        write!(out, ", !{} {}", name, node)?;
    }
    Ok(())
}
