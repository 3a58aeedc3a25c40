use crate::error::Error;
use crate::lexer::is_variable;
use crate::token::{Op, Token};
use crate::util::{CONSTANTS, FUNCTIONS};

/// Ast nodes for the expressions
#[derive(Debug, Clone)]
pub enum Ast {
    /// A variable, to be resolved later
    Variable(String),
    /// A constant value
    Value(f64),
    /// <left> + <right>
    Add(Box<Ast>, Box<Ast>),
    /// <left> - <right>
    Sub(Box<Ast>, Box<Ast>),
    /// <left> * <right>
    Mul(Box<Ast>, Box<Ast>),
    /// <left> / <right>
    Div(Box<Ast>, Box<Ast>),
    /// <left> ^ <right>
    Exp(Box<Ast>, Box<Ast>),
    /// -<arg>
    Neg(Box<Ast>),
    /// name(<arg>)
    Function(String, fn(f64) -> f64, Box<Ast>),
}

impl PartialEq<Self> for Ast {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Ast::Variable(str), Ast::Variable(str2)) => str == str2,
            (Ast::Value(v), Ast::Value(v2)) => v.to_le_bytes() == v2.to_le_bytes(),
            (Ast::Add(a, b), Ast::Add(a2, b2))
            | (Ast::Sub(a, b), Ast::Sub(a2, b2))
            | (Ast::Mul(a, b), Ast::Mul(a2, b2))
            | (Ast::Div(a, b), Ast::Div(a2, b2))
            | (Ast::Exp(a, b), Ast::Exp(a2, b2)) => a == a2 && b == b2,
            (Ast::Neg(a), Ast::Neg(a2)) => a == a2,
            // function pointers are not reliably comparable, names are unique
            (Ast::Function(name, _, a), Ast::Function(name2, _, a2)) => name == name2 && a == a2,
            _ => false,
        }
    }
}

/// Deepest syntax tree accepted. Evaluation recurses once per level.
pub const MAX_DEPTH: usize = 256;

impl Ast {
    /// Construct the AST for a vector of tokens in reverse polish notation.
    ///
    /// Constant sub-expressions are computed while the tree is built, so a
    /// long chain of constants stays a single value. Trees deeper than
    /// [`MAX_DEPTH`] are rejected.
    pub fn from_tokens(tokens: Vec<Token>) -> Result<Self, Error> {
        // every entry is a node with its depth
        let mut stack: Vec<(Self, usize)> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let (node, depth) = match token {
                Token::Value(value) => (Self::from_value(value)?, 0),
                Token::Function(name) => {
                    let func = *FUNCTIONS
                        .get(&name)
                        .ok_or_else(|| Error::ParseError(format!("unknown function {}", name)))?;
                    let (arg, depth) = pop_operand(&mut stack, " in function call")?;
                    (Self::Function(name, func, Box::new(arg)), depth + 1)
                }
                Token::Op(Op::Neg) => {
                    let (arg, depth) = pop_operand(&mut stack, " after operator")?;
                    (Self::Neg(Box::new(arg)), depth + 1)
                }
                Token::Op(op) => {
                    let (right, right_depth) = pop_operand(&mut stack, " after operator")?;
                    let (left, left_depth) = pop_operand(&mut stack, " before operator")?;
                    let (left, right) = (Box::new(left), Box::new(right));
                    let node = match op {
                        Op::Plus => Self::Add(left, right),
                        Op::Minus => Self::Sub(left, right),
                        Op::Mul => Self::Mul(left, right),
                        Op::Div => Self::Div(left, right),
                        Op::Exp => Self::Exp(left, right),
                        Op::Neg => unreachable!("unary operator handled above"),
                    };
                    (node, left_depth.max(right_depth) + 1)
                }
                other => {
                    return Err(Error::ParseError(format!(
                        "unexpected {:?} after shunting yard",
                        other
                    )))
                }
            };

            let node = node.fold();
            let depth = if node.value().is_some() { 0 } else { depth };
            if depth > MAX_DEPTH {
                return Err(Error::ParseError("expression too deeply nested".into()));
            }
            stack.push((node, depth));
        }

        let (ast, _) = pop_operand(&mut stack, "")?;
        if !stack.is_empty() {
            return Err(Error::ParseError("unexpected trailing values".into()));
        }
        Ok(ast)
    }

    /// Resolve a value token: constant, variable, or number literal
    fn from_value(value: String) -> Result<Self, Error> {
        if let Some(&constant) = CONSTANTS.get(&value) {
            Ok(Self::Value(constant))
        } else if is_variable(&value) {
            Ok(Self::Variable(value))
        } else {
            value
                .parse()
                .map(Self::Value)
                .map_err(|_| Error::ParseError(format!("invalid value {}", value)))
        }
    }

    /// If the AST node correspond to a constant, get `Some(constant)`. Else,
    /// get `None`
    pub fn value(&self) -> Option<f64> {
        if let Self::Value(value) = *self {
            Some(value)
        } else {
            None
        }
    }

    /// Compute the node when its direct children are constants. Children are
    /// folded before their parent is built, so this propagates constants
    /// through the whole tree.
    fn fold(self) -> Self {
        let folded = match self {
            Self::Variable(_) | Self::Value(_) => None,
            Self::Neg(ref arg) => arg.value().map(|value| -value),
            Self::Function(_, func, ref arg) => arg.value().map(func),
            Self::Add(ref left, ref right) => constants(left, right).map(|(l, r)| l + r),
            Self::Sub(ref left, ref right) => constants(left, right).map(|(l, r)| l - r),
            Self::Mul(ref left, ref right) => constants(left, right).map(|(l, r)| l * r),
            Self::Div(ref left, ref right) => constants(left, right).map(|(l, r)| l / r),
            Self::Exp(ref left, ref right) => constants(left, right).map(|(l, r)| l.powf(r)),
        };
        folded.map_or(self, Self::Value)
    }
}

fn constants(left: &Ast, right: &Ast) -> Option<(f64, f64)> {
    Some((left.value()?, right.value()?))
}

fn pop_operand(stack: &mut Vec<(Ast, usize)>, context: &str) -> Result<(Ast, usize), Error> {
    stack
        .pop()
        .ok_or_else(|| Error::ParseError(format!("empty expression{}", context)))
}

#[cfg(test)]
mod tests {
    use super::{Ast, MAX_DEPTH};
    use crate::error::Error;
    use crate::lexer::Lexer;
    use crate::token::Op;

    fn ast(input: &str) -> Ast {
        Ast::from_tokens(Lexer::new(input).parse().unwrap()).unwrap()
    }

    #[test]
    // Verifies that we have reduced the input to a single value token when possible
    fn folds_constants() {
        assert_eq!(ast("3 + 5").value(), Some(8.0));
        assert_eq!(ast("(3 + 5^2)*45").value(), Some(1260.0));
        assert_eq!(ast("sqrt(9)").value(), Some(3.0));
        assert_eq!(ast("(-3)^2").value(), Some(9.0));
        assert_eq!(ast("-3^2").value(), Some(-9.0));
        assert_eq!(ast("pi").value(), Some(std::f64::consts::PI));
    }

    #[test]
    fn keeps_variables() {
        let tree = ast("2 * mass");
        assert_eq!(tree.value(), None);
        assert_eq!(
            tree,
            Ast::Mul(
                Box::new(Ast::Value(2.0)),
                Box::new(Ast::Variable("mass".into()))
            )
        );
    }

    #[test]
    fn trailing_values() {
        // the lexer always joins operands, so craft the token stream directly
        use crate::token::Token;
        let tokens = vec![Token::Value("1".into()), Token::Value("2".into())];
        assert!(Ast::from_tokens(tokens).is_err());
        let tokens = vec![Token::Value("1".into()), Token::Op(Op::Plus)];
        assert!(Ast::from_tokens(tokens).is_err());
    }

    #[test]
    fn long_constant_chains_fold() {
        let sum = vec!["1"; 10_000].join("+");
        assert_eq!(ast(&sum).value(), Some(10_000.0));

        let negated = format!("{}2", "-".repeat(1001));
        assert_eq!(ast(&negated).value(), Some(-2.0));

        let calls = format!("{}16{}", "sqrt(".repeat(2), ")".repeat(2));
        assert_eq!(ast(&calls).value(), Some(2.0));
    }

    #[test]
    fn depth_is_limited() {
        let chain = |n: usize| vec!["x"; n].join("+");
        assert!(Ast::from_tokens(Lexer::new(&chain(MAX_DEPTH + 1)).parse().unwrap()).is_ok());
        assert_eq!(
            Ast::from_tokens(Lexer::new(&chain(MAX_DEPTH + 2)).parse().unwrap()),
            Err(Error::ParseError("expression too deeply nested".into()))
        );

        let negated = format!("{}x", "-".repeat(1000));
        assert!(Ast::from_tokens(Lexer::new(&negated).parse().unwrap()).is_err());
    }
}
