//! Style expression trees.
//!
//! Expressions arrive as JSON arrays whose first element names the operator.
//! Parsing never fails: unknown operators and malformed argument lists become
//! nodes that report their problem when evaluated, so a layer that is never
//! drawn cannot abort a render.

use crate::style::value::Value;

/// Comparison operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
}

/// Binary arithmetic operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
    /// `+`, also concatenates two strings.
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

/// A parsed style expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Constant.
    Literal(Value),
    /// `!`
    Not(Box<Expr>),
    /// Comparison of two operands.
    Compare(CompareOp, Box<Expr>, Box<Expr>),
    /// Binary arithmetic.
    Arith(ArithOp, Box<Expr>, Box<Expr>),
    /// `sqrt`
    Sqrt(Box<Expr>),
    /// Render zoom.
    Zoom,
    /// True when every operand is truthy.
    All(Vec<Expr>),
    /// True when some operand is truthy.
    Any(Vec<Expr>),
    /// Arguments as written; evaluation reproduces a known arity mismatch.
    At(Vec<serde_json::Value>),
    /// Feature property, 0 when absent.
    Get(String),
    /// Whether the feature has a property.
    Has(String),
    /// Integer conversion.
    ToNumber(Box<Expr>),
    /// Text conversion.
    ToString(Box<Expr>),
    /// Output of the first arm whose label matches the input.
    Match {
        /// Value to match.
        input: Box<Expr>,
        /// Raw labels; an array label matches any of its members.
        arms: Vec<(Value, Expr)>,
        /// Output when no arm matches.
        default: Box<Expr>,
    },
    /// Output of the first truthy condition.
    Case {
        /// Condition and output pairs.
        branches: Vec<(Expr, Expr)>,
        /// Output when no condition holds.
        default: Box<Expr>,
    },
    /// First truthy operand.
    Coalesce(Vec<Expr>),
    /// Output of the last threshold not above the input.
    Step {
        /// Numeric input.
        input: Box<Expr>,
        /// Output below the first threshold.
        base: Box<Expr>,
        /// Ascending threshold and output pairs.
        stops: Vec<(f64, Expr)>,
    },
    /// Linear blend between the stops bracketing the input.
    Interpolate {
        /// Interpolation method as written.
        method: Value,
        /// Numeric input.
        input: Box<Expr>,
        /// Ascending input and output pairs.
        stops: Vec<(f64, Expr)>,
    },
    /// Feature geometry type without a `Multi` prefix.
    GeometryType,
    /// Operator this evaluator does not implement.
    Unsupported(String),
    /// Known operator with unusable arguments.
    Malformed(String),
}

impl Expr {
    /// Parse a JSON expression.
    pub fn parse(json: &serde_json::Value) -> Self {
        let Some(items) = json.as_array() else {
            return Self::Literal(Value::from_json(json));
        };
        let Some(op) = items.first().and_then(|v| v.as_str()) else {
            return Self::Literal(Value::from_json(json));
        };
        parse_op(op, &items[1..])
    }
}

fn boxed(json: &serde_json::Value) -> Box<Expr> {
    Box::new(Expr::parse(json))
}

fn malformed(op: &str, why: &str) -> Expr {
    Expr::Malformed(format!("\"{op}\" {why}"))
}

fn binary(args: &[serde_json::Value]) -> Option<(Box<Expr>, Box<Expr>)> {
    match args {
        [a, b, ..] => Some((boxed(a), boxed(b))),
        _ => None,
    }
}

fn numeric_stops(args: &[serde_json::Value]) -> Option<Vec<(f64, Expr)>> {
    args.chunks(2)
        .map(|pair| match pair {
            [k, v] => k.as_f64().map(|k| (k, Expr::parse(v))),
            _ => None,
        })
        .collect()
}

fn parse_op(op: &str, args: &[serde_json::Value]) -> Expr {
    let compare = |cmp: CompareOp| match binary(args) {
        Some((a, b)) => Expr::Compare(cmp, a, b),
        None => malformed(op, "needs two arguments"),
    };
    let arith = |arith: ArithOp| match binary(args) {
        Some((a, b)) => Expr::Arith(arith, a, b),
        None => malformed(op, "needs two arguments"),
    };
    let unary = |make: fn(Box<Expr>) -> Expr| match args.first() {
        Some(a) => make(boxed(a)),
        None => malformed(op, "needs an argument"),
    };
    let key = |make: fn(String) -> Expr| match args.first().and_then(|k| k.as_str()) {
        Some(k) => make(k.to_string()),
        None => malformed(op, "needs a property name"),
    };

    match op {
        "!" => unary(Expr::Not),
        "==" => compare(CompareOp::Eq),
        "!=" => compare(CompareOp::Ne),
        "<" => compare(CompareOp::Lt),
        ">" => compare(CompareOp::Gt),
        "<=" => compare(CompareOp::Le),
        ">=" => compare(CompareOp::Ge),
        "+" => arith(ArithOp::Add),
        "-" => arith(ArithOp::Sub),
        "*" => arith(ArithOp::Mul),
        "/" => arith(ArithOp::Div),
        "sqrt" => unary(Expr::Sqrt),
        "zoom" => Expr::Zoom,
        "all" => Expr::All(args.iter().map(Expr::parse).collect()),
        "any" => Expr::Any(args.iter().map(Expr::parse).collect()),
        "at" => Expr::At(args.to_vec()),
        "get" => key(Expr::Get),
        "has" => {
            if args.len() == 1 {
                key(Expr::Has)
            } else {
                malformed(op, "takes exactly one argument")
            }
        }
        "literal" => match args.first() {
            Some(v) => Expr::Literal(Value::from_json(v)),
            None => malformed(op, "needs a value"),
        },
        "to-number" => unary(Expr::ToNumber),
        "to-string" => unary(Expr::ToString),
        "match" => parse_match(op, args),
        "case" => parse_case(op, args),
        "coalesce" => {
            if args.is_empty() {
                malformed(op, "needs at least one argument")
            } else {
                Expr::Coalesce(args.iter().map(Expr::parse).collect())
            }
        }
        "step" => parse_step(op, args),
        "interpolate" => parse_interpolate(op, args),
        "geometry-type" => Expr::GeometryType,
        other => Expr::Unsupported(other.to_string()),
    }
}

fn parse_match(op: &str, args: &[serde_json::Value]) -> Expr {
    // input, (label, output)*, default
    let [input, rest @ .., default] = args else {
        return malformed(op, "needs an input and a default");
    };
    if rest.len() % 2 != 0 {
        return malformed(op, "has a label without an output");
    }
    Expr::Match {
        input: boxed(input),
        arms: rest
            .chunks(2)
            .map(|pair| (Value::from_json(&pair[0]), Expr::parse(&pair[1])))
            .collect(),
        default: boxed(default),
    }
}

fn parse_case(op: &str, args: &[serde_json::Value]) -> Expr {
    let [rest @ .., default] = args else {
        return malformed(op, "needs a default");
    };
    if rest.len() % 2 != 0 {
        return malformed(op, "has a condition without an output");
    }
    Expr::Case {
        branches: rest
            .chunks(2)
            .map(|pair| (Expr::parse(&pair[0]), Expr::parse(&pair[1])))
            .collect(),
        default: boxed(default),
    }
}

fn parse_step(op: &str, args: &[serde_json::Value]) -> Expr {
    let [input, base, rest @ ..] = args else {
        return malformed(op, "needs an input and a base output");
    };
    match numeric_stops(rest) {
        Some(stops) => Expr::Step {
            input: boxed(input),
            base: boxed(base),
            stops,
        },
        None => malformed(op, "needs numeric threshold/output pairs"),
    }
}

fn parse_interpolate(op: &str, args: &[serde_json::Value]) -> Expr {
    let [method, input, rest @ ..] = args else {
        return malformed(op, "needs a method and an input");
    };
    if rest.is_empty() {
        return malformed(op, "needs at least one stop");
    }
    match numeric_stops(rest) {
        Some(stops) => Expr::Interpolate {
            method: Value::from_json(method),
            input: boxed(input),
            stops,
        },
        None => malformed(op, "needs an even list of numeric input/output stops"),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/expr.rs"]
mod tests;
