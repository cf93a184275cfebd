//! Gamedata text-format compiler.
//!
//! Converted from: examples/original_source/src/build/mkgamedata.c. The C
//! tool's character-at-a-time state machine (`BOL`/`KEY`/`KWS`/`VAL`/`COM`)
//! is replaced with a line-oriented scan -- Rust's `str` slicing makes the
//! per-character transition table unnecessary -- but the grammar, the
//! nesting-depth bookkeeping, and the "`_GAMES_WITH_<entry>` elision
//! bitmask" optimisation (`knowngames()` in the original) are preserved.
//!
//! Unlike the C tool, indentation here must be tabs: a line that starts
//! with a space is a hard parse error rather than being silently accepted
//! as one indent level (the original's character class table treats space
//! and tab identically).

use crate::error::{ParseError, ParseResult};
use sst_gamedata::Identity;

/// One parsed line of a gamedata file: either a top-level `<name> <expr>`
/// declaration or an indented `<tag> <expr>` override underneath one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// Variable name at indent 0, tag name at indent > 0.
    pub key: String,
    pub expr: Option<String>,
    pub indent: u8,
    pub line: usize,
}

fn split_comment(s: &str) -> &str {
    match s.find('#') {
        Some(i) => s[..i].trim_end(),
        None => s.trim_end(),
    }
}

fn parse_line(raw: &str, line: usize) -> ParseResult<Option<RawEntry>> {
    let stripped = split_comment(raw);
    if stripped.trim().is_empty() {
        return Ok(None);
    }

    let mut chars = stripped.char_indices();
    let mut indent = 0u8;
    let mut key_start = 0;
    for (i, c) in chars.by_ref() {
        match c {
            '\t' => {
                indent = indent.checked_add(1).ok_or(ParseError::TooDeep { line })?;
            }
            ' ' => return Err(ParseError::SpaceIndent { line }),
            _ => {
                key_start = i;
                break;
            }
        }
    }
    if indent as usize > 255 {
        return Err(ParseError::TooDeep { line });
    }

    let rest = &stripped[key_start..];
    let key_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let key = &rest[..key_end];
    if key.is_empty() {
        return Err(ParseError::EmptyKey { line });
    }
    let expr = rest[key_end..].trim();
    let expr = if expr.is_empty() { None } else { Some(expr.to_string()) };

    Ok(Some(RawEntry { key: key.to_string(), expr, indent, line }))
}

/// Parses a gamedata source file into its flat list of entries, validating
/// indentation and the "no children, no default" rule as it goes.
pub fn parse(text: &str) -> ParseResult<Vec<RawEntry>> {
    if !text.is_empty() && !text.ends_with('\n') {
        return Err(ParseError::MissingEol { line: text.lines().count() });
    }

    let mut entries: Vec<RawEntry> = Vec::new();
    for (lineno, raw) in text.lines().enumerate() {
        let line = lineno + 1;
        let Some(entry) = parse_line(raw, line)? else { continue };

        if let Some(prev) = entries.last() {
            if entry.indent > prev.indent + 1 {
                return Err(ParseError::ExcessiveIndent { line });
            }
            if entry.indent == prev.indent && prev.expr.is_none() {
                return Err(ParseError::MissingValue { line: prev.line });
            }
        } else if entry.indent != 0 {
            return Err(ParseError::ExcessiveIndent { line });
        }
        entries.push(entry);
    }
    Ok(entries)
}

/// One resolved top-level gamedata variable: its expression (if the
/// variable has an unconditional default) and the ordered list of
/// `(Identity, expr)` overrides nested beneath it.
struct Resolved<'a> {
    name: &'a str,
    default: Option<&'a str>,
    rules: Vec<(Identity, &'a str)>,
    line: usize,
}

fn resolve(entries: &[RawEntry]) -> Vec<Resolved<'_>> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < entries.len() {
        let top = &entries[i];
        if top.indent != 0 {
            i += 1;
            continue;
        }
        let mut rules = Vec::new();
        let mut j = i + 1;
        while j < entries.len() && entries[j].indent > 0 {
            if entries[j].indent == 1 {
                if let Some(tag) = Identity::by_name(&entries[j].key) {
                    if let Some(expr) = &entries[j].expr {
                        rules.push((tag, expr.as_str()));
                    }
                }
            }
            j += 1;
        }
        out.push(Resolved { name: &top.key, default: top.expr.as_deref(), rules, line: top.line });
        i = j;
    }
    out
}

/// Emits Rust source that populates an `sst_gamedata::Store` with every
/// entry in `entries`, plus one `pub const _GAMES_WITH_<entry>: u32`
/// per entry that has game-specific rules and no default -- mirroring
/// `knowngames()`'s compile-time elision optimisation, so a feature's
/// `REQUIRE_GAMEDATA` check can skip the runtime lookup entirely when its
/// own `GAMESPECIFIC` tag mask doesn't overlap the entry's covering tags.
pub fn gen_gamedata(entries: &[RawEntry]) -> String {
    let resolved = resolve(entries);
    let mut out = String::new();
    out.push_str("// generated by sst-codegen's gamedata compiler. do not edit.\n\n");

    for r in &resolved {
        if r.rules.is_empty() {
            continue;
        }
        if r.default.is_some() {
            continue;
        }
        let mask: u32 = r.rules.iter().fold(0u32, |acc, (tag, _)| acc | tag.0);
        out.push_str(&format!(
            "pub const _GAMES_WITH_{name}: u32 = {mask};\n",
            name = r.name,
            mask = mask
        ));
    }
    out.push('\n');

    out.push_str("pub fn populate(store: &mut sst_gamedata::Store) {\n");
    for r in &resolved {
        // line directive equivalent: kept as a comment since Rust has no
        // #line for build-script-generated code included via include!().
        out.push_str(&format!("    // from line {}\n", r.line));
        if r.rules.is_empty() {
            let expr = r.default.unwrap_or("0");
            out.push_str(&format!(
                "    store.declare_const({name:?}, {expr});\n",
                name = r.name,
                expr = expr
            ));
        } else {
            out.push_str(&format!("    store.declare_tagged({name:?}, ", name = r.name));
            match r.default {
                Some(expr) => out.push_str(&format!("Some({expr}), vec![\n")),
                None => out.push_str("None, vec![\n"),
            }
            for (tag, expr) in &r.rules {
                out.push_str(&format!(
                    "        (sst_gamedata::Identity({bits}), {expr}),\n",
                    bits = tag.0,
                    expr = expr
                ));
            }
            out.push_str("    ]);\n");
        }
    }
    out.push_str("}\n");
    out
}
