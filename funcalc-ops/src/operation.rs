//! Operation variants

use funcalc_core::{CalcError, SquareMatrix};
use std::fmt;
use std::rc::Rc;

/// Shared handle to an operation.
///
/// Composites hold these to their operands, so an operand outlives its
/// registry slot.
pub type OpRef = Rc<Operation>;

/// Largest number of input matrices a single operation may take
pub const MAX_INPUTS: usize = 256;

/// Largest number of terms in an operation's expanded expression tree.
///
/// Shared operands are counted once per use, so this bounds the work done by
/// `compute`, `describe` and `render`.
pub const MAX_NODES: usize = 4096;

/// A transformation from an ordered list of matrices to one matrix
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Identity,
    Transpose,
    Scalar(i64),
    Add(OpRef, OpRef),
    Sub(OpRef, OpRef),
    /// `Comp(f, g)` applies `f` to the result of `g`
    Comp(OpRef, OpRef),
}

impl Operation {
    /// Sum of two operations, each fed its own share of the inputs
    pub fn add(a: OpRef, b: OpRef) -> Result<Self, CalcError> {
        check_inputs(a.input_count() + b.input_count())?;
        check_nodes(&a, &b)?;
        Ok(Operation::Add(a, b))
    }

    /// Difference of two operations, split like `add`
    pub fn sub(a: OpRef, b: OpRef) -> Result<Self, CalcError> {
        check_inputs(a.input_count() + b.input_count())?;
        check_nodes(&a, &b)?;
        Ok(Operation::Sub(a, b))
    }

    /// `f` after `g`. `f` must take exactly one matrix.
    pub fn comp(f: OpRef, g: OpRef) -> Result<Self, CalcError> {
        let inputs = f.input_count();
        if inputs != 1 {
            return Err(CalcError::not_unary(inputs));
        }
        check_nodes(&f, &g)?;
        Ok(Operation::Comp(f, g))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Identity => "identity",
            Operation::Transpose => "transpose",
            Operation::Scalar(_) => "scalar",
            Operation::Add(..) => "add",
            Operation::Sub(..) => "sub",
            Operation::Comp(..) => "comp",
        }
    }

    /// Number of matrices one evaluation consumes
    pub fn input_count(&self) -> usize {
        match self {
            Operation::Identity | Operation::Transpose | Operation::Scalar(_) => 1,
            Operation::Add(a, b) | Operation::Sub(a, b) => a.input_count() + b.input_count(),
            Operation::Comp(_, g) => g.input_count(),
        }
    }

    /// Terms in the fully expanded expression tree
    pub fn node_count(&self) -> usize {
        match self {
            Operation::Identity | Operation::Transpose | Operation::Scalar(_) => 1,
            Operation::Add(a, b) | Operation::Sub(a, b) | Operation::Comp(a, b) => {
                1 + a.node_count() + b.node_count()
            }
        }
    }

    /// Compute the result for exactly `input_count()` matrices.
    ///
    /// # Panics
    ///
    /// If `inputs.len()` differs from `input_count()`.
    pub fn compute(&self, inputs: &[SquareMatrix]) -> SquareMatrix {
        assert_eq!(
            inputs.len(),
            self.input_count(),
            "{} expects {} input matrices",
            self.name(),
            self.input_count()
        );
        match self {
            Operation::Identity => inputs[0].clone(),
            Operation::Transpose => inputs[0].transpose(),
            Operation::Scalar(k) => inputs[0].scale(*k),
            Operation::Add(a, b) => {
                let (lhs, rhs) = inputs.split_at(a.input_count());
                &a.compute(lhs) + &b.compute(rhs)
            }
            Operation::Sub(a, b) => {
                let (lhs, rhs) = inputs.split_at(a.input_count());
                &a.compute(lhs) - &b.compute(rhs)
            }
            Operation::Comp(f, g) => {
                let inner = g.compute(inputs);
                f.compute(std::slice::from_ref(&inner))
            }
        }
    }

    /// Definition over placeholder names, e.g. `(A + Transpose(B))`
    pub fn describe(&self) -> String {
        let names: Vec<String> = (0..self.input_count()).map(placeholder).collect();
        self.expression(&names)
    }

    /// Fully expanded expression over concrete inputs
    pub fn render(&self, inputs: &[SquareMatrix]) -> String {
        let args: Vec<String> = inputs.iter().map(SquareMatrix::to_inline_string).collect();
        self.expression(&args)
    }

    fn expression(&self, args: &[String]) -> String {
        match self {
            Operation::Identity => args[0].clone(),
            Operation::Transpose => format!("Transpose({})", args[0]),
            Operation::Scalar(k) => format!("({} * {})", args[0], k),
            Operation::Add(a, b) => {
                let (lhs, rhs) = args.split_at(a.input_count());
                format!("({} + {})", a.expression(lhs), b.expression(rhs))
            }
            Operation::Sub(a, b) => {
                let (lhs, rhs) = args.split_at(a.input_count());
                format!("({} - {})", a.expression(lhs), b.expression(rhs))
            }
            Operation::Comp(f, g) => f.expression(&[g.expression(args)]),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

fn check_inputs(inputs: usize) -> Result<(), CalcError> {
    if inputs > MAX_INPUTS {
        return Err(CalcError::too_many_inputs(inputs, MAX_INPUTS));
    }
    Ok(())
}

fn check_nodes(a: &Operation, b: &Operation) -> Result<(), CalcError> {
    let nodes = 1 + a.node_count() + b.node_count();
    if nodes > MAX_NODES {
        return Err(CalcError::too_complex(nodes, MAX_NODES));
    }
    Ok(())
}

/// `A`..`Z`, then `M27`, `M28`, ...
fn placeholder(i: usize) -> String {
    match u8::try_from(i) {
        Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
        _ => format!("M{}", i + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[i64]]) -> SquareMatrix {
        SquareMatrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn sample() -> SquareMatrix {
        m(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]])
    }

    #[test]
    fn test_identity() {
        let a = sample();
        assert_eq!(Operation::Identity.compute(&[a.clone()]), a);
    }

    #[test]
    fn test_transpose_twice() {
        let a = sample();
        let t = Operation::Transpose;
        assert_eq!(t.compute(&[t.compute(&[a.clone()])]), a);
    }

    #[test]
    fn test_scalar() {
        let a = m(&[&[1, -2], &[0, 4]]);
        assert_eq!(Operation::Scalar(-3).compute(&[a]), m(&[&[-3, 6], &[0, -12]]));
    }

    #[test]
    fn test_comp_of_scalars_multiplies() {
        let a = sample();
        let comp = Operation::comp(Rc::new(Operation::Scalar(2)), Rc::new(Operation::Scalar(5))).unwrap();
        assert_eq!(comp.compute(&[a.clone()]), Operation::Scalar(10).compute(&[a]));
    }

    #[test]
    fn test_comp_is_f_after_g() {
        let f: OpRef = Rc::new(Operation::Transpose);
        let g: OpRef = Rc::new(Operation::sub(Rc::new(Operation::Identity), Rc::new(Operation::Scalar(2))).unwrap());
        let comp = Operation::comp(f.clone(), g.clone()).unwrap();
        let inputs = [sample(), m(&[&[1, 1, 1], &[0, 0, 0], &[2, 2, 2]])];
        assert_eq!(comp.input_count(), 2);
        assert_eq!(comp.compute(&inputs), f.compute(&[g.compute(&inputs)]));
    }

    #[test]
    fn test_comp_rejects_binary_outer() {
        let outer: OpRef = Rc::new(Operation::add(Rc::new(Operation::Identity), Rc::new(Operation::Identity)).unwrap());
        let err = Operation::comp(outer, Rc::new(Operation::Identity)).unwrap_err();
        assert_eq!(err.code, funcalc_core::codes::NOT_UNARY);
        assert!(err.is_input());
    }

    #[test]
    fn test_add_splits_inputs() {
        let a: OpRef = Rc::new(Operation::add(Rc::new(Operation::Identity), Rc::new(Operation::Transpose)).unwrap());
        let b: OpRef = Rc::new(Operation::Scalar(10));
        let sum = Operation::add(a.clone(), b.clone()).unwrap();
        assert_eq!(sum.input_count(), 3);

        let x = m(&[&[1, 2], &[3, 4]]);
        let y = m(&[&[0, 1], &[0, 0]]);
        let z = m(&[&[1, 0], &[0, 1]]);
        let inputs = [x.clone(), y.clone(), z.clone()];
        let expected = &a.compute(&[x, y]) + &b.compute(&[z]);
        assert_eq!(sum.compute(&inputs), expected);
        assert_eq!(sum.compute(&inputs), m(&[&[11, 2], &[4, 14]]));
    }

    #[test]
    fn test_sub_order_matters() {
        let diff = Operation::sub(Rc::new(Operation::Identity), Rc::new(Operation::Scalar(2))).unwrap();
        let x = m(&[&[5]]);
        let y = m(&[&[1]]);
        assert_eq!(diff.compute(&[x.clone(), y.clone()]), m(&[&[3]]));
        assert_eq!(diff.compute(&[y, x]), m(&[&[-9]]));
    }

    #[test]
    #[should_panic(expected = "expects 2 input matrices")]
    fn test_wrong_input_count_panics() {
        let sum = Operation::add(Rc::new(Operation::Identity), Rc::new(Operation::Identity)).unwrap();
        sum.compute(&[sample()]);
    }

    #[test]
    fn test_too_many_inputs() {
        let mut op: OpRef = Rc::new(Operation::Identity);
        let mut result = Ok(());
        for _ in 0..10 {
            match Operation::add(op.clone(), op.clone()) {
                Ok(next) => op = Rc::new(next),
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }
        assert_eq!(op.input_count(), MAX_INPUTS);
        assert_eq!(result.unwrap_err().code, funcalc_core::codes::TOO_MANY_INPUTS);
    }

    #[test]
    fn test_self_composition_is_bounded() {
        let mut op: OpRef = Rc::new(Operation::Scalar(1));
        let mut levels = 0;
        let err = loop {
            match Operation::comp(op.clone(), op.clone()) {
                Ok(next) => {
                    op = Rc::new(next);
                    levels += 1;
                }
                Err(e) => break e,
            }
        };
        // 2^(levels + 1) - 1 terms after `levels` doublings
        assert_eq!(levels, 11);
        assert_eq!(op.node_count(), 4095);
        assert_eq!(op.input_count(), 1);
        assert_eq!(err.code, funcalc_core::codes::TOO_COMPLEX);
        assert!(err.is_input());
        assert_eq!(op.compute(&[m(&[&[3]])]), m(&[&[3]]));
    }

    #[test]
    fn test_node_count() {
        let scal: OpRef = Rc::new(Operation::Scalar(2));
        assert_eq!(scal.node_count(), 1);
        let sum = Operation::add(Rc::new(Operation::Identity), scal.clone()).unwrap();
        assert_eq!(sum.node_count(), 3);
        let comp = Operation::comp(scal, Rc::new(sum)).unwrap();
        assert_eq!(comp.node_count(), 5);
    }

    #[test]
    fn test_describe() {
        let scal: OpRef = Rc::new(Operation::Scalar(3));
        let add = Operation::add(Rc::new(Operation::Identity), scal.clone()).unwrap();
        assert_eq!(add.describe(), "(A + (B * 3))");

        let sum: OpRef = Rc::new(Operation::add(Rc::new(Operation::Identity), Rc::new(Operation::Transpose)).unwrap());
        assert_eq!(sum.describe(), "(A + Transpose(B))");

        let comp = Operation::comp(scal, sum).unwrap();
        assert_eq!(comp.to_string(), "((A + Transpose(B)) * 3)");
    }

    #[test]
    fn test_render_inlines_matrices() {
        let sum = Operation::add(Rc::new(Operation::Identity), Rc::new(Operation::Transpose)).unwrap();
        let a = m(&[&[1, 2], &[3, 4]]);
        let b = m(&[&[0, 1], &[1, 0]]);
        assert_eq!(sum.render(&[a, b]), "([[1, 2], [3, 4]] + Transpose([[0, 1], [1, 0]]))");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholder(0), "A");
        assert_eq!(placeholder(25), "Z");
        assert_eq!(placeholder(26), "M27");
    }
}
