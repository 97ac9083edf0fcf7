//! Preprocessor engine
//!
//! Single forward pass over the source lines, no backtracking. A stack of
//! conditional frames tracks `#if`/`#elif`/`#else` nesting; at most one
//! branch per chain is ever emitted. `#include` splices fragment-table
//! text in place, recursively preprocessed with the same macro table
//! under a fixed depth bound. Non-directive lines in taken regions get
//! single-pass object-macro substitution.

use glfwgen_core::{Error, Result};
use tracing::{debug, trace};

use crate::expr;
use crate::fragments::FragmentTable;
use crate::macros::MacroTable;

/// Default bound on nested fragment inclusion
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 32;

/// Branch state of one open conditional chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BranchState {
    /// Current branch is emitted
    Taken,
    /// Current branch is skipped, a later branch may still be taken
    Skipped,
    /// A branch was already taken (or the chain sits inside a skipped
    /// region); every remaining branch is skipped
    Done,
}

#[derive(Debug)]
struct Frame {
    state: BranchState,
    has_else: bool,
}

/// The line-oriented preprocessor
///
/// Stateless between calls; all per-run state lives in the macro table
/// and the conditional stack of one `process` invocation.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    max_include_depth: usize,
    strict_redefinition: bool,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor {
    pub fn new() -> Self {
        Self {
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            strict_redefinition: false,
        }
    }

    /// Override the include recursion bound
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    /// Fail on `#define` lines that change an existing definition's
    /// replacement text. Off by default; redefinition overwrites.
    pub fn strict_redefinition(mut self, strict: bool) -> Self {
        self.strict_redefinition = strict;
        self
    }

    /// Expand `source` against the given macro and fragment tables
    ///
    /// The macro table is mutated by in-source `#define`/`#undef` lines,
    /// which is what lets definitions made in one template remain visible
    /// to the next. Output lines are newline-joined with exactly one
    /// trailing newline.
    pub fn process(
        &self,
        source: &str,
        macros: &mut MacroTable,
        fragments: &FragmentTable,
    ) -> Result<String> {
        let mut out = Vec::new();
        self.process_into(source, macros, fragments, 0, &mut out)?;
        let mut text = out.join("\n");
        text.push('\n');
        Ok(text)
    }

    fn process_into(
        &self,
        source: &str,
        macros: &mut MacroTable,
        fragments: &FragmentTable,
        depth: usize,
        out: &mut Vec<String>,
    ) -> Result<()> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut last_line = 0;

        for (idx, raw) in source.lines().enumerate() {
            let line = idx + 1;
            last_line = line;
            let active = stack.iter().all(|f| f.state == BranchState::Taken);

            let trimmed = raw.trim_start();
            let Some(directive) = trimmed.strip_prefix('#') else {
                if active {
                    out.push(substitute(raw, macros));
                }
                continue;
            };

            let directive = directive.trim_start();
            let (keyword, rest) = split_keyword(directive);

            match keyword {
                // Conditionals are tracked even in skipped regions so
                // nesting stays balanced.
                "ifdef" | "ifndef" => {
                    let state = if !active {
                        BranchState::Done
                    } else {
                        let name = require_name(line, keyword, rest)?;
                        let defined = macros.is_defined(name);
                        let taken = defined == (keyword == "ifdef");
                        if taken {
                            BranchState::Taken
                        } else {
                            BranchState::Skipped
                        }
                    };
                    stack.push(Frame {
                        state,
                        has_else: false,
                    });
                }
                "if" => {
                    let state = if !active {
                        BranchState::Done
                    } else if expr::eval_condition(rest, macros)
                        .map_err(|msg| Error::directive(line, msg))?
                    {
                        BranchState::Taken
                    } else {
                        BranchState::Skipped
                    };
                    stack.push(Frame {
                        state,
                        has_else: false,
                    });
                }
                "elif" => {
                    let frame = stack
                        .last_mut()
                        .ok_or_else(|| Error::directive(line, "#elif without matching #if"))?;
                    if frame.has_else {
                        return Err(Error::directive(line, "#elif after #else"));
                    }
                    frame.state = match frame.state {
                        BranchState::Taken => BranchState::Done,
                        BranchState::Done => BranchState::Done,
                        BranchState::Skipped => {
                            if expr::eval_condition(rest, macros)
                                .map_err(|msg| Error::directive(line, msg))?
                            {
                                BranchState::Taken
                            } else {
                                BranchState::Skipped
                            }
                        }
                    };
                }
                "else" => {
                    let frame = stack
                        .last_mut()
                        .ok_or_else(|| Error::directive(line, "#else without matching #if"))?;
                    if frame.has_else {
                        return Err(Error::directive(line, "duplicate #else"));
                    }
                    frame.has_else = true;
                    frame.state = match frame.state {
                        BranchState::Skipped => BranchState::Taken,
                        BranchState::Taken | BranchState::Done => BranchState::Done,
                    };
                }
                "endif" => {
                    if stack.pop().is_none() {
                        return Err(Error::directive(line, "#endif without matching #if"));
                    }
                }

                // Everything below only acts inside taken regions.
                _ if !active => {}

                "define" => self.handle_define(line, rest, macros)?,
                "undef" => {
                    let name = require_name(line, "undef", rest)?;
                    macros.undefine(name);
                }
                "include" => {
                    let name = parse_include_name(line, rest)?;
                    if depth + 1 > self.max_include_depth {
                        return Err(Error::IncludeDepthExceeded(
                            self.max_include_depth,
                            name.to_string(),
                        ));
                    }
                    trace!("splicing fragment {name:?} at depth {}", depth + 1);
                    let text = fragments.resolve(name).to_string();
                    self.process_into(&text, macros, fragments, depth + 1, out)?;
                }

                // Null directive (a lone `#`) is a no-op in C.
                "" => {}

                other => {
                    return Err(Error::directive(line, format!("unknown directive #{other}")));
                }
            }
        }

        if let Some(frame) = stack.last() {
            debug!("unterminated conditional, state {:?}", frame.state);
            return Err(Error::directive(last_line, "unterminated #if"));
        }

        Ok(())
    }

    fn handle_define(&self, line: usize, rest: &str, macros: &mut MacroTable) -> Result<()> {
        let (name, remainder) = split_keyword(rest);
        if name.is_empty() {
            return Err(Error::directive(line, "#define requires a macro name"));
        }
        let value = match remainder {
            "" => None,
            text => Some(text),
        };
        if self.strict_redefinition {
            if let Some(existing) = macros.get(name) {
                if existing != value {
                    return Err(Error::MacroRedefinition {
                        name: name.to_string(),
                        line,
                    });
                }
            }
        }
        macros.define(name, value)
    }
}

fn split_keyword(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(|c: char| c.is_whitespace()) {
        Some(pos) => (&text[..pos], text[pos..].trim()),
        None => (text, ""),
    }
}

fn require_name<'a>(line: usize, keyword: &str, rest: &'a str) -> Result<&'a str> {
    let (name, trailing) = split_keyword(rest);
    if name.is_empty() {
        return Err(Error::directive(
            line,
            format!("#{keyword} requires a macro name"),
        ));
    }
    if !trailing.is_empty() {
        return Err(Error::directive(
            line,
            format!("unexpected text after #{keyword} {name}"),
        ));
    }
    Ok(name)
}

/// Parse `"name.h"` or `<name.h>` from an `#include` line
fn parse_include_name(line: usize, rest: &str) -> Result<&str> {
    let rest = rest.trim();
    let inner = if let Some(body) = rest.strip_prefix('"') {
        body.split_once('"').map(|(name, _)| name)
    } else if let Some(body) = rest.strip_prefix('<') {
        body.split_once('>').map(|(name, _)| name)
    } else {
        None
    };
    inner.ok_or_else(|| Error::directive(line, format!("malformed #include: {rest:?}")))
}

/// Single-pass object-macro substitution over one line
///
/// Every maximal identifier token that names a defined macro is replaced
/// by its value (empty if the macro has no value). Replacement text is
/// not rescanned, so self-referential defines cannot loop.
fn substitute(line: &str, macros: &MacroTable) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_ascii_alphabetic() || c == '_' {
            let mut end = start;
            while let Some(&(pos, c)) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    end = pos + c.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let ident = &line[start..end];
            match macros.get(ident) {
                Some(Some(value)) => out.push_str(value),
                Some(None) => {}
                None => out.push_str(ident),
            }
        } else {
            out.push(c);
            chars.next();
        }
    }

    out
}
