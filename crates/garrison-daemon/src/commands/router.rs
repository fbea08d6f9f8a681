//! Command router: resolves message text into a command name and arguments.
//!
//! Candidate names are tried longest-first so a name that is a prefix of
//! another (`deploy` vs `deploystart`) cannot shadow the more specific
//! match. A candidate only matches when followed by a boundary — end of
//! input, whitespace, or `|` — which keeps a short name from matching as a
//! fragment of an unrelated word. When nothing matches, the first
//! whitespace token is taken as the command name verbatim; the caller's
//! registry lookup decides whether that means anything.

use super::registry::CommandRegistry;

/// The outcome of resolving one message body.
///
/// Ephemeral, recomputed per message. `name` is lowercase but not
/// necessarily registered: the naive fallback produces whatever the first
/// token was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInvocation {
    /// Resolved command name.
    pub name: String,
    /// Argument tokens after the command name, split on runs of whitespace.
    pub args: Vec<String>,
}

/// A matched name must be followed by end-of-input, whitespace, or a pipe.
fn is_boundary(c: char) -> bool {
    c.is_whitespace() || c == '|'
}

/// Resolve a message body (prefix already stripped) against the registry.
///
/// Returns `None` for an empty body. The returned name may be unregistered;
/// the caller performs the final lookup and silently ignores unknown names.
pub fn resolve(body: &str, registry: &CommandRegistry) -> Option<ParsedInvocation> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    // Longest first; the sort is stable, so equal-length names stay in
    // registration order and the first registered wins.
    let mut candidates: Vec<&String> = registry.all_names().iter().collect();
    candidates.sort_by(|a, b| b.len().cmp(&a.len()));

    for name in candidates {
        // `get` returns None when the name length lands inside a multi-byte
        // character, which also cannot be a match.
        let Some(head) = body.get(..name.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(name) {
            continue;
        }
        let rest = &body[name.len()..];
        match rest.chars().next() {
            None => {}
            Some(c) if is_boundary(c) => {}
            Some(_) => continue,
        }
        return Some(ParsedInvocation {
            name: name.clone(),
            args: rest.split_whitespace().map(String::from).collect(),
        });
    }

    // Naive fallback: first whitespace token is the command name, whether or
    // not it is registered.
    let mut tokens = body.split_whitespace();
    let first = tokens.next()?;
    Some(ParsedInvocation {
        name: first.to_lowercase(),
        args: tokens.map(String::from).collect(),
    })
}
