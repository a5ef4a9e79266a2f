//! Recursive-descent parser for selector expressions
//!
//! ```text
//! expr  := term (WS term)*
//! term  := group (',' group)*
//! group := [DIGITS] ['+'] atom ['+' [DIGITS]]
//! ```

use super::{Atom, SelectionQuery, SelectorTerm, TraversalDepth};
use crate::error::{CoreError, CoreResult};
use crate::node::NodeKind;
use glob::Pattern;

pub(super) fn parse(selector: &str) -> CoreResult<SelectionQuery> {
    Parser {
        input: selector,
        pos: 0,
    }
    .parse_expr()
}

struct Parser<'a> {
    input: &'a str,
    /// Byte offset of the next unread character
    pos: usize,
}

impl<'a> Parser<'a> {
    fn parse_expr(mut self) -> CoreResult<SelectionQuery> {
        let mut terms = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek().is_none() {
                break;
            }
            terms.push(self.parse_term()?);
        }

        Ok(match terms.len() {
            0 => SelectionQuery::All,
            1 => terms.swap_remove(0),
            _ => SelectionQuery::Union(terms),
        })
    }

    fn parse_term(&mut self) -> CoreResult<SelectionQuery> {
        let mut groups = vec![self.parse_group()?];

        while self.peek() == Some(',') {
            let comma = self.pos;
            self.pos += 1;
            match self.peek() {
                None | Some(',') => {
                    return Err(self.error(comma, comma + 1, "dangling comma"));
                }
                Some(c) if c.is_whitespace() => {
                    return Err(self.error(comma, comma + 1, "dangling comma"));
                }
                Some(_) => groups.push(self.parse_group()?),
            }
        }

        Ok(if groups.len() == 1 {
            groups.swap_remove(0)
        } else {
            SelectionQuery::Intersect(groups)
        })
    }

    fn parse_group(&mut self) -> CoreResult<SelectionQuery> {
        let start = self.pos;
        let end = self.input[start..]
            .find(|c: char| c == ',' || c.is_whitespace())
            .map_or(self.input.len(), |offset| start + offset);
        self.pos = end;

        let token = &self.input[start..end];
        if token.is_empty() {
            // Only reachable when the term begins with a comma
            return Err(self.error(start, start + 1, "dangling comma"));
        }

        let (ancestors, body_start) = self.leading_operator(token, start)?;
        let body = &token[body_start..];
        let (body, descendants) = self.trailing_operator(body, start + body_start)?;

        if body.is_empty() {
            return Err(self.error(start, end, "graph operator without a selector"));
        }
        if let Some(plus) = body.find('+') {
            let at = start + body_start + plus;
            return Err(self.error(at, at + 1, "unexpected '+' inside selector"));
        }

        let atom = self.parse_atom(body, start + body_start)?;
        Ok(SelectionQuery::Term(SelectorTerm {
            atom,
            ancestors,
            descendants,
        }))
    }

    /// `[DIGITS] '+'` prefix. Digits without a following `+` belong to the
    /// name (`2024_orders`).
    fn leading_operator(
        &self,
        token: &str,
        offset: usize,
    ) -> CoreResult<(Option<TraversalDepth>, usize)> {
        let digits = token.bytes().take_while(u8::is_ascii_digit).count();
        if !token[digits..].starts_with('+') {
            return Ok((None, 0));
        }
        let depth = self.depth(&token[..digits], offset)?;
        Ok((Some(depth), digits + 1))
    }

    /// `'+' [DIGITS]` suffix
    fn trailing_operator<'t>(
        &self,
        body: &'t str,
        offset: usize,
    ) -> CoreResult<(&'t str, Option<TraversalDepth>)> {
        let without_digits = body.trim_end_matches(|c: char| c.is_ascii_digit());
        let Some(name) = without_digits.strip_suffix('+') else {
            return Ok((body, None));
        };
        let digits = &body[without_digits.len()..];
        let depth = self.depth(digits, offset + without_digits.len())?;
        Ok((name, Some(depth)))
    }

    fn depth(&self, digits: &str, offset: usize) -> CoreResult<TraversalDepth> {
        if digits.is_empty() {
            return Ok(TraversalDepth::Unbounded);
        }
        digits
            .parse::<usize>()
            .map(TraversalDepth::Bounded)
            .map_err(|_| self.error(offset, offset + digits.len(), "traversal depth out of range"))
    }

    fn parse_atom(&self, body: &str, offset: usize) -> CoreResult<Atom> {
        if let Some((method, value)) = body.split_once(':') {
            if value.is_empty() {
                if self.peek() == Some(',') {
                    return Err(self.error(
                        self.pos,
                        self.pos + 1,
                        format!("dangling comma after '{}:'", method),
                    ));
                }
                return Err(self.error(
                    offset,
                    offset + body.len(),
                    format!("'{}:' requires a value", method),
                ));
            }

            let value_at = offset + method.len() + 1;
            return match method {
                "tag" => Ok(Atom::Tag(value.to_string())),
                "path" => Pattern::new(value).map(Atom::Path).map_err(|e| {
                    let at = value_at + e.pos.min(value.len());
                    self.error(at, at + 1, format!("invalid path pattern: {}", e.msg))
                }),
                "package" => Ok(Atom::Package(value.to_string())),
                "resource_type" => NodeKind::parse(value)
                    .map(Atom::ResourceType)
                    .ok_or_else(|| {
                        self.error(
                            value_at,
                            value_at + value.len(),
                            format!("unknown resource type '{}', expected 'model' or 'source'", value),
                        )
                    }),
                _ => Err(self.error(
                    offset,
                    offset + method.len() + 1,
                    format!("unknown selector method '{}'", method),
                )),
            };
        }

        if let Some(path) = body.strip_prefix("source.") {
            let parts: Vec<&str> = path.split('.').collect();
            if parts.iter().any(|p| p.is_empty()) {
                return Err(self.error(
                    offset,
                    offset + body.len(),
                    "expected 'source.<schema>.<table>'",
                ));
            }
            return match parts.as_slice() {
                [schema, table] => Ok(Atom::Source {
                    schema: schema.to_string(),
                    table: table.to_string(),
                }),
                // source.<package>.<schema>.<table> is a full node id
                [_, _, _] => Ok(Atom::Name(body.to_string())),
                _ => Err(self.error(
                    offset,
                    offset + body.len(),
                    "expected 'source.<schema>.<table>'",
                )),
            };
        }

        Ok(Atom::Name(body.to_string()))
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    fn error(&self, start: usize, end: usize, reason: impl Into<String>) -> CoreError {
        let end = end.min(self.input.len());
        CoreError::SelectorSyntax {
            selector: self.input.to_string(),
            fragment: self.input.get(start..end).unwrap_or_default().to_string(),
            position: start,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
