use crate::error::Error;
use crate::token::{Op, Token};
use crate::util::FUNCTIONS;

#[must_use]
/// Check if `ident` is a valid variable name
///
/// # Examples
///
/// ```
/// # use scicalc::is_variable;
///
/// assert_eq!(is_variable("__abc3"), true);
/// assert_eq!(is_variable("k.1"), true);
/// assert_eq!(is_variable("34zb"), false);
/// ```
pub fn is_variable(ident: &str) -> bool {
    let mut chars = ident.chars();
    // Check first char
    if !chars.next().map_or(false, is_variable_start) {
        return false;
    }
    // Check all others
    return chars.all(is_variable_part);
}

/// An helper struct for lexing the input and reordering it in reverse polish
/// notation
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(string: &'a str) -> Lexer<'a> {
        Lexer {
            input: string,
            position: 0,
        }
    }

    /// Run the shunting-yard algorithm over the input, producing the tokens in
    /// reverse polish notation.
    pub fn parse(&mut self) -> Result<Vec<Token>, Error> {
        let mut output = Vec::new();
        let mut operators = Vec::new();
        let mut previous: Option<Token> = None;

        'tokens: while let Some(token) = self.next_token()? {
            if let Some(Token::Function(ref name)) = previous {
                if token != Token::LParen {
                    return Err(Error::ParseError(format!(
                        "expected '(' after function {}",
                        name
                    )));
                }
            }

            let expects_operand = previous.as_ref().map_or(true, |token| {
                matches!(token, Token::Op(_) | Token::LParen | Token::Function(_))
            });

            let token = match token {
                Token::Op(Op::Minus) if expects_operand => Token::Op(Op::Neg),
                // unary plus is a no-op
                Token::Op(Op::Plus) if expects_operand => continue 'tokens,
                other => other,
            };

            if !expects_operand && token.starts_operand() {
                push_operator(Op::Mul, &mut output, &mut operators);
            }

            match token {
                Token::Value(_) => output.push(token.clone()),
                Token::Function(_) | Token::LParen | Token::Op(Op::Neg) => {
                    operators.push(token.clone());
                }
                Token::Op(op) => {
                    if expects_operand {
                        return Err(Error::ParseError(format!(
                            "missing operand before {}",
                            op.symbol()
                        )));
                    }
                    push_operator(op, &mut output, &mut operators);
                }
                Token::RParen => {
                    if expects_operand {
                        return Err(Error::ParseError("missing operand before ')'".into()));
                    }
                    loop {
                        match operators.pop() {
                            Some(Token::LParen) => {
                                if let Some(Token::Function(_)) = operators.last() {
                                    if let Some(function) = operators.pop() {
                                        output.push(function);
                                    }
                                }
                                break;
                            }
                            Some(op @ Token::Op(_)) => output.push(op),
                            Some(other) => {
                                return Err(Error::ParseError(format!(
                                    "unexpected {:?} in operators stack",
                                    other
                                )));
                            }
                            None => {
                                return Err(Error::ParseError("mismatched parenthesis".into()))
                            }
                        }
                    }
                }
            }
            previous = Some(token);
        }

        match previous {
            Some(Token::Op(op)) => {
                return Err(Error::ParseError(format!(
                    "missing operand after {}",
                    op.symbol()
                )));
            }
            Some(Token::Function(name)) => {
                return Err(Error::ParseError(format!(
                    "expected '(' after function {}",
                    name
                )));
            }
            _ => {}
        }

        while let Some(token) = operators.pop() {
            match token {
                Token::LParen => return Err(Error::ParseError("mismatched parenthesis".into())),
                Token::Op(_) => output.push(token),
                other => {
                    return Err(Error::ParseError(format!(
                        "unexpected {:?} in operators stack",
                        other
                    )));
                }
            }
        }
        Ok(output)
    }

    fn next_token(&mut self) -> Result<Option<Token>, Error> {
        let input = self.input;
        let rest = &input[self.position..];
        let trimmed = rest.trim_start();
        self.position += rest.len() - trimmed.len();

        let c = match trimmed.chars().next() {
            Some(c) => c,
            None => return Ok(None),
        };

        let token = match c {
            c if c.is_ascii_digit() || c == '.' => {
                let number = self.take(number_length(trimmed));
                if input[self.position..].starts_with('.') {
                    return Err(Error::ParseError(format!(
                        "invalid number {}.",
                        number
                    )));
                }
                Token::Value(number.to_owned())
            }
            c if is_variable_start(c) => {
                let length = trimmed
                    .find(|c| !is_variable_part(c))
                    .unwrap_or_else(|| trimmed.len());
                let ident = self.take(length);
                if FUNCTIONS.contains_key(ident) {
                    Token::Function(ident.to_owned())
                } else {
                    Token::Value(ident.to_owned())
                }
            }
            other => {
                let token = match other {
                    '+' => Token::Op(Op::Plus),
                    '-' => Token::Op(Op::Minus),
                    '*' => Token::Op(Op::Mul),
                    '/' => Token::Op(Op::Div),
                    '^' => Token::Op(Op::Exp),
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    other => {
                        return Err(Error::ParseError(format!(
                            "unexpected character in input: {}",
                            other
                        )));
                    }
                };
                self.take(other.len_utf8());
                token
            }
        };
        Ok(Some(token))
    }

    fn take(&mut self, length: usize) -> &'a str {
        let input = self.input;
        let slice = &input[self.position..self.position + length];
        self.position += length;
        slice
    }
}

/// Pop operators with higher precedence to the output, then push `o1`
fn push_operator(o1: Op, output: &mut Vec<Token>, operators: &mut Vec<Token>) {
    while let Some(&Token::Op(o2)) = operators.last() {
        let pop_me = o1.is_left_associative() && o1.precedence() <= o2.precedence();
        let pop_me = pop_me || o1.is_right_associative() && o1.precedence() < o2.precedence();
        if pop_me {
            operators.pop();
            output.push(Token::Op(o2));
        } else {
            break;
        }
    }
    operators.push(Token::Op(o1));
}

/// Length in bytes of the numeric literal at the start of `input`: digits,
/// an optional fraction and an optional exponent.
pub(crate) fn number_length(input: &str) -> usize {
    let bytes = input.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut length = digits_from(0);
    if bytes.get(length) == Some(&b'.') {
        length += 1 + digits_from(length + 1);
    }
    if matches!(bytes.get(length), Some(b'e') | Some(b'E')) {
        let sign = usize::from(matches!(bytes.get(length + 1), Some(b'+') | Some(b'-')));
        let exponent = digits_from(length + 1 + sign);
        if exponent > 0 {
            length += 1 + sign + exponent;
        }
    }
    length
}

/// Check if `c` can appear at the first character of a variable
pub(crate) fn is_variable_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

/// Check if `c` can appear inside a variable
pub(crate) fn is_variable_part(c: char) -> bool {
    c == '_' || c == '.' || c.is_ascii_alphanumeric()
}
