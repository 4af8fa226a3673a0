//! Per-operator evaluation, one small module per operator family, all
//! reached through [`eval`] — the single switch `Engine::dispatch` calls.

mod alt;
mod anchor;
mod backref;
mod cat;
mod lookaround;
mod rep;
mod rnm_udt;
mod terminal;

use crate::error::ParseError;
use crate::grammar::{OpKind, Opcode};
use crate::trace::TraceContext;

use super::{Engine, Outcome};

pub(super) fn eval<U>(
    engine: &mut Engine<'_, U>,
    rule_index: usize,
    op_index: usize,
    op: &Opcode,
    begin: usize,
) -> Result<Outcome, ParseError> {
    let kind = OpKind::of(op);
    let traced_name = match op {
        Opcode::Rnm { index } => Some(engine.grammar.rule(*index).name.clone()),
        Opcode::Udt { index, .. } => Some(engine.grammar.udt(*index).name.clone()),
        _ => None,
    };
    let (look_around_kind, look_anchor) = match engine.sys.current_look_around() {
        Some((kind, anchor)) => (Some(kind), Some(anchor)),
        None => (None, None),
    };
    let ctx = TraceContext {
        direction: engine.sys.direction(),
        tree_depth: engine.tree_depth,
        look_anchor,
        look_around_kind,
    };
    let mark = engine.trace.down(kind, traced_name.as_deref(), begin, ctx);

    let outcome = match op {
        Opcode::Alt { children } => alt::eval(engine, rule_index, children, begin),
        Opcode::Cat { children } => cat::eval(engine, rule_index, children, begin),
        Opcode::Rep { min, max } => rep::eval(engine, rule_index, op_index, *min, *max, begin),
        Opcode::Rnm { index } => rnm_udt::eval_rnm(engine, *index, begin),
        Opcode::Udt { index, .. } => rnm_udt::eval_udt(engine, *index, begin),
        Opcode::And => lookaround::eval_and(engine, rule_index, op_index, begin),
        Opcode::Not => lookaround::eval_not(engine, rule_index, op_index, begin),
        Opcode::Bka => lookaround::eval_bka(engine, rule_index, op_index, begin),
        Opcode::Bkn => lookaround::eval_bkn(engine, rule_index, op_index, begin),
        Opcode::Trg { min, max } => terminal::eval_trg(engine, *min, *max, begin),
        Opcode::Tbs { bytes } => terminal::eval_tbs(engine, bytes, begin),
        Opcode::Tls { bytes } => terminal::eval_tls(engine, bytes, begin),
        Opcode::Bkr {
            index,
            case,
            mode,
            target,
        } => backref::eval(engine, *index, *case, *mode, *target, begin),
        Opcode::Abg => anchor::eval_abg(engine, begin),
        Opcode::Aen => anchor::eval_aen(engine, begin),
    }?;

    engine.stats.record_opcode(kind, outcome.state);
    if let Some(mark) = mark {
        engine
            .trace
            .up(mark, kind, traced_name.as_deref(), begin, outcome.state, outcome.length, ctx);
    }
    Ok(outcome)
}
