use std::cmp::Ordering;

use crate::foundation::error::{RouteMapError, RouteMapResult};
use crate::geo::projection::TileCoord;
use crate::style::color::parse_color;
use crate::style::expr::{ArithOp, CompareOp, Expr};
use crate::style::value::Value;
use crate::tile::model::Feature;

/// Render context an expression is evaluated in.
///
/// Passed explicitly to every evaluation so concurrent tile renders never
/// share state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvalCtx {
    /// Zoom the tile is rendered at.
    pub zoom: u8,
    /// Tile column.
    pub x: u32,
    /// Tile row.
    pub y: u32,
}

impl EvalCtx {
    /// Context for rendering `tile`.
    pub fn new(tile: TileCoord) -> Self {
        Self {
            zoom: tile.zoom,
            x: tile.x,
            y: tile.y,
        }
    }
}

/// Evaluate `expr` for `feature` (absent for background layers).
pub fn evaluate(expr: &Expr, feature: Option<&Feature>, ctx: &EvalCtx) -> RouteMapResult<Value> {
    Evaluator { feature, ctx }.eval(expr)
}

/// Evaluate `expr` to a color and normalize it to `#rrggbb`.
pub fn evaluate_color(
    expr: &Expr,
    feature: Option<&Feature>,
    ctx: &EvalCtx,
) -> RouteMapResult<String> {
    match evaluate(expr, feature, ctx)? {
        Value::String(s) => Ok(parse_color(&s)?.to_hex()),
        other => Err(RouteMapError::color(format!(
            "expected a color string, got {}",
            other.type_name()
        ))),
    }
}

/// Evaluate `expr` to a number.
pub fn evaluate_number(expr: &Expr, feature: Option<&Feature>, ctx: &EvalCtx) -> RouteMapResult<f64> {
    let v = evaluate(expr, feature, ctx)?;
    v.as_number().ok_or_else(|| {
        RouteMapError::evaluation(format!("expected a number, got {}", v.type_name()))
    })
}

struct Evaluator<'a> {
    feature: Option<&'a Feature>,
    ctx: &'a EvalCtx,
}

impl Evaluator<'_> {
    fn eval(&self, expr: &Expr) -> RouteMapResult<Value> {
        match expr {
            Expr::Literal(v) => Ok(v.clone()),
            Expr::Not(a) => Ok(Value::Bool(!self.eval(a)?.is_truthy())),
            Expr::Compare(op, a, b) => {
                let (a, b) = (self.eval(a)?, self.eval(b)?);
                compare(*op, &a, &b).map(Value::Bool)
            }
            Expr::Arith(op, a, b) => {
                let (a, b) = (self.eval(a)?, self.eval(b)?);
                arith(*op, a, b)
            }
            Expr::Sqrt(a) => {
                let n = self.number(a, "sqrt")?;
                if n < 0.0 {
                    return Err(RouteMapError::evaluation(format!("sqrt of negative number {n}")));
                }
                Ok(Value::Number(n.sqrt()))
            }
            Expr::Zoom => Ok(Value::Number(f64::from(self.ctx.zoom))),
            Expr::All(args) => {
                for a in args {
                    if !self.eval(a)?.is_truthy() {
                        return Ok(Value::Bool(false));
                    }
                }
                Ok(Value::Bool(true))
            }
            Expr::Any(args) => {
                for a in args {
                    if self.eval(a)?.is_truthy() {
                        return Ok(Value::Bool(true));
                    }
                }
                Ok(Value::Bool(false))
            }
            Expr::At(args) => {
                // Declared with two arguments but reads a third; no input can succeed.
                if args.len() != 2 {
                    return Err(RouteMapError::evaluation(format!(
                        "\"at\" takes 2 arguments, got {}",
                        args.len()
                    )));
                }
                Err(RouteMapError::evaluation(
                    "\"at\" reads its array from argument 3 of 2",
                ))
            }
            Expr::Get(key) => Ok(self
                .feature
                .and_then(|f| f.property(key))
                .unwrap_or(Value::Number(0.0))),
            Expr::Has(key) => Ok(Value::Bool(
                self.feature.is_some_and(|f| f.properties.contains_key(key)),
            )),
            Expr::ToNumber(a) => to_number(self.eval(a)?).map(Value::Number),
            Expr::ToString(a) => Ok(Value::String(self.eval(a)?.to_string())),
            Expr::Match {
                input,
                arms,
                default,
            } => {
                let label = self.eval(input)?;
                for (candidate, output) in arms {
                    let hit = match candidate {
                        Value::Array(set) => set.iter().any(|c| c.loose_eq(&label)),
                        single => single.loose_eq(&label),
                    };
                    if hit {
                        return self.eval(output);
                    }
                }
                self.eval(default)
            }
            Expr::Case { branches, default } => {
                for (cond, output) in branches {
                    if self.eval(cond)?.is_truthy() {
                        return self.eval(output);
                    }
                }
                self.eval(default)
            }
            Expr::Coalesce(args) => {
                let mut last = Value::Null;
                for a in args {
                    last = self.eval(a)?;
                    if last.is_truthy() {
                        break;
                    }
                }
                Ok(last)
            }
            Expr::Step { input, base, stops } => {
                let v = self.number(input, "step")?;
                let mut output: &Expr = base;
                for (threshold, next) in stops {
                    if *threshold > v {
                        break;
                    }
                    output = next;
                }
                self.eval(output)
            }
            Expr::Interpolate {
                method,
                input,
                stops,
            } => self.interpolate(method, input, stops),
            Expr::GeometryType => {
                let feature = self.feature.ok_or_else(|| {
                    RouteMapError::evaluation("\"geometry-type\" needs a feature")
                })?;
                Ok(Value::String(feature.geometry.base_type().to_string()))
            }
            Expr::Unsupported(op) => Err(RouteMapError::expression(format!(
                "unsupported expression \"{op}\""
            ))),
            Expr::Malformed(msg) => Err(RouteMapError::expression(msg.clone())),
        }
    }

    fn number(&self, expr: &Expr, op: &str) -> RouteMapResult<f64> {
        let v = self.eval(expr)?;
        v.as_number().ok_or_else(|| {
            RouteMapError::evaluation(format!("\"{op}\" expects a number, got {}", v.type_name()))
        })
    }

    fn interpolate(&self, method: &Value, input: &Expr, stops: &[(f64, Expr)]) -> RouteMapResult<Value> {
        let is_linear = matches!(method, Value::Array(m) if m.first().and_then(Value::as_str) == Some("linear"));
        if !is_linear {
            tracing::debug!(%method, "interpolation method treated as linear");
        }

        let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
            return Err(RouteMapError::expression("\"interpolate\" needs at least one stop"));
        };
        let v = self.number(input, "interpolate")?;
        if v < first.0 {
            return self.eval(&first.1);
        }
        if v >= last.0 {
            return self.eval(&last.1);
        }

        let Some(i) = stops.iter().position(|(k, _)| v < *k) else {
            return self.eval(&last.1);
        };
        let (lo, hi) = (&stops[i - 1], &stops[i]);
        let t = (v - lo.0) / (hi.0 - lo.0);

        match (self.eval(&lo.1)?, self.eval(&hi.1)?) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + (b - a) * t)),
            (Value::String(a), Value::String(b)) => {
                let blended = parse_color(&a)?.lerp(parse_color(&b)?, t);
                Ok(Value::String(blended.to_hex()))
            }
            (a, b) => Err(RouteMapError::evaluation(format!(
                "cannot interpolate between {} and {}",
                a.type_name(),
                b.type_name()
            ))),
        }
    }
}

fn compare(op: CompareOp, a: &Value, b: &Value) -> RouteMapResult<bool> {
    let accepts: fn(Ordering) -> bool = match op {
        CompareOp::Eq => return Ok(a.loose_eq(b)),
        CompareOp::Ne => return Ok(!a.loose_eq(b)),
        CompareOp::Lt => Ordering::is_lt,
        CompareOp::Gt => Ordering::is_gt,
        CompareOp::Le => Ordering::is_le,
        CompareOp::Ge => Ordering::is_ge,
    };
    let ordering = match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => x.partial_cmp(&y),
            _ => {
                return Err(RouteMapError::evaluation(format!(
                    "cannot order {} against {}",
                    a.type_name(),
                    b.type_name()
                )));
            }
        },
    };

    // NaN compares false either way.
    Ok(ordering.is_some_and(accepts))
}

fn arith(op: ArithOp, a: Value, b: Value) -> RouteMapResult<Value> {
    if let (ArithOp::Add, Value::String(x), Value::String(y)) = (op, &a, &b) {
        return Ok(Value::String(format!("{x}{y}")));
    }
    let (Some(x), Some(y)) = (a.as_number(), b.as_number()) else {
        return Err(RouteMapError::evaluation(format!(
            "arithmetic on {} and {}",
            a.type_name(),
            b.type_name()
        )));
    };
    let n = match op {
        ArithOp::Add => x + y,
        ArithOp::Sub => x - y,
        ArithOp::Mul => x * y,
        ArithOp::Div => {
            if y == 0.0 {
                return Err(RouteMapError::evaluation("division by zero"));
            }
            x / y
        }
    };
    Ok(Value::Number(n))
}

/// Integer conversion: numbers truncate, booleans are 0/1, strings must hold an integer.
fn to_number(v: Value) -> RouteMapResult<f64> {
    match v {
        Value::Number(n) => Ok(n.trunc()),
        Value::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(|n| n as f64)
            .map_err(|_| RouteMapError::evaluation(format!("cannot convert \"{s}\" to a number"))),
        other => Err(RouteMapError::evaluation(format!(
            "cannot convert {} to a number",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/eval.rs"]
mod tests;
