use std::collections::HashMap;

use lazy_static::lazy_static;

/// Precedence tiers, loosest first.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub enum Precedence {
    Assignment = 1,
    LogicalOr = 2,
    LogicalAnd = 3,
    Equality = 4,
    Relational = 5,
    Additive = 6,
    Multiplicative = 7,
    Power = 8,
    Unary = 9,
}

impl Precedence {
    pub fn tier(&self) -> u8 {
        *self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Unary,
    Binary,
}

/// What an operator does to its operands' types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorClass {
    Assignment,
    Logical,
    Comparison,
    Arithmetic,
    Increment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub symbol: String,
    pub precedence: Precedence,
    pub associativity: Associativity,
    pub arity: Arity,
    pub class: OperatorClass,
}

impl Operator {
    pub fn new(
        symbol: &str,
        precedence: Precedence,
        associativity: Associativity,
        arity: Arity,
        class: OperatorClass,
    ) -> Self {
        Operator {
            symbol: symbol.to_string(),
            precedence,
            associativity,
            arity,
            class,
        }
    }

    fn binary(symbol: &str, precedence: Precedence, class: OperatorClass) -> Self {
        Operator::new(symbol, precedence, Associativity::Left, Arity::Binary, class)
    }

    pub fn is_binary(&self) -> bool {
        self.arity == Arity::Binary
    }
}

lazy_static! {
    pub static ref PREDEFINED_OPERATORS: Vec<Operator> = vec![
        Operator::new("=", Precedence::Assignment, Associativity::Right, Arity::Binary, OperatorClass::Assignment),
        Operator::binary("||", Precedence::LogicalOr, OperatorClass::Logical),
        Operator::binary("&&", Precedence::LogicalAnd, OperatorClass::Logical),
        Operator::binary("==", Precedence::Equality, OperatorClass::Comparison),
        Operator::binary("!=", Precedence::Equality, OperatorClass::Comparison),
        Operator::binary("<", Precedence::Relational, OperatorClass::Comparison),
        Operator::binary(">", Precedence::Relational, OperatorClass::Comparison),
        Operator::binary(">=", Precedence::Relational, OperatorClass::Comparison),
        Operator::binary("<=", Precedence::Relational, OperatorClass::Comparison),
        Operator::binary("+", Precedence::Additive, OperatorClass::Arithmetic),
        Operator::binary("-", Precedence::Additive, OperatorClass::Arithmetic),
        Operator::binary("*", Precedence::Multiplicative, OperatorClass::Arithmetic),
        Operator::binary("/", Precedence::Multiplicative, OperatorClass::Arithmetic),
        Operator::binary("%", Precedence::Multiplicative, OperatorClass::Arithmetic),
        Operator::new("^", Precedence::Power, Associativity::Right, Arity::Binary, OperatorClass::Arithmetic),
        Operator::new("++", Precedence::Unary, Associativity::Right, Arity::Unary, OperatorClass::Increment),
        Operator::new("--", Precedence::Unary, Associativity::Right, Arity::Unary, OperatorClass::Increment),
    ];
}

/// Symbol → operator table. Starts with the predefined set; registration is
/// append-only.
#[derive(Debug, Clone)]
pub struct OperatorRegistry {
    operators: HashMap<String, Operator>,
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OperatorRegistry {
    pub fn new() -> Self {
        let operators = PREDEFINED_OPERATORS
            .iter()
            .map(|operator| (operator.symbol.clone(), operator.clone()))
            .collect();

        OperatorRegistry { operators }
    }

    pub fn resolve(&self, symbol: &str) -> Option<&Operator> {
        self.operators.get(symbol)
    }

    /// Registers a custom operator. Returns `false`, leaving the table
    /// unchanged, if the symbol is already taken.
    pub fn register(&mut self, operator: Operator) -> bool {
        if self.operators.contains_key(&operator.symbol) {
            return false;
        }
        self.operators.insert(operator.symbol.clone(), operator);
        true
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}
