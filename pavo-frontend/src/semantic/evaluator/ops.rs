use pavo_ast as ast;
use pavo_ir::Opcode;

// Fixed tables mapping script operators to IR opcodes. Each table is a
// total match, so an unmapped operator cannot slip through.

pub(super) fn binary_opcode(op: ast::BinOp) -> Opcode {
    match op {
        ast::BinOp::Add => Opcode::Add,
        ast::BinOp::Sub => Opcode::Sub,
        ast::BinOp::Mult => Opcode::Mult,
        ast::BinOp::Div => Opcode::Div,
        ast::BinOp::Mod => Opcode::Mod,
    }
}

pub(super) fn bool_opcode(op: ast::BoolOp) -> Opcode {
    match op {
        ast::BoolOp::And => Opcode::And,
        ast::BoolOp::Or => Opcode::Or,
    }
}

pub(super) fn compare_opcode(op: ast::CmpOp) -> Opcode {
    match op {
        ast::CmpOp::Eq => Opcode::Eq,
        ast::CmpOp::NotEq => Opcode::NotEq,
        ast::CmpOp::Lt => Opcode::Lt,
        ast::CmpOp::LtEq => Opcode::LtEq,
        ast::CmpOp::Gt => Opcode::Gt,
        ast::CmpOp::GtEq => Opcode::GtEq,
    }
}

/// `None` for unary plus, which passes its operand through unchanged.
pub(super) fn unary_opcode(op: ast::UnaryOp) -> Option<Opcode> {
    match op {
        ast::UnaryOp::UAdd => None,
        ast::UnaryOp::USub => Some(Opcode::Negate),
        ast::UnaryOp::Not => Some(Opcode::Not),
        ast::UnaryOp::Invert => Some(Opcode::Invert),
    }
}
