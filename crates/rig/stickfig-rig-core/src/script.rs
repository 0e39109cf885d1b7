//! The skeleton description language: parsing and writing.
//!
//! Grammar (informal):
//!   bone      := "stick" "(" property ("," property)* ")" ("{" bone* "}")?
//!   property  := identifier "=" atom
//!   atom      := string | number | boolean | list
//!   list      := "[" atom ("," atom)* "]"
//!   number    := ["-"] digit+ ["." digit+] ["d"]   ; trailing "d" = degrees
//!   string    := "'" <any chars except "'"> "'"
//!   boolean   := "true" | "false"                  ; case-insensitive;
//!                                                  ; other identifiers pass
//!                                                  ; through as raw tokens
//!
//! Whitespace is insignificant between tokens and skipped eagerly. A nested
//! `{ ... }` block parses child bones attached to the enclosing bone. The
//! `name` property is required; unrecognized properties are accepted and
//! ignored (forward-compatible superset parsing). A source text may contain
//! several top-level sticks; each becomes a root of the returned skeleton.
//!
//! Parsing is recursive-descent over a character cursor, no backtracking.
//! Errors carry line/column and never leave a half-built tree behind: the
//! parse builds into a fresh arena that is returned only on success.

use std::f32::consts::PI;

use hashbrown::HashMap;

use crate::error::ScriptError;
use crate::skeleton::{BoneId, Shape, Skeleton};

const DEFAULT_WIDTH: f32 = 12.0;

/// Parse description-language text into a fresh skeleton.
pub fn parse(source: &str) -> Result<Skeleton, ScriptError> {
    let mut cursor = Cursor::new(source);
    let mut skeleton = Skeleton::new();
    cursor.skip_spaces();
    loop {
        parse_stick(&mut cursor, &mut skeleton, None)?;
        cursor.skip_spaces();
        if cursor.at_end() {
            break;
        }
    }
    Ok(skeleton)
}

/// Render a skeleton back to description-language text.
///
/// Only properties differing from the parser defaults are written; rotations
/// are written in radians. Names containing a single quote cannot be
/// represented by the grammar and round-trip truncated at the quote.
pub fn write(skeleton: &Skeleton) -> String {
    let mut out = String::new();
    for &root in skeleton.roots() {
        write_stick(skeleton, root, 0, &mut out);
    }
    out
}

// ----- cursor -----

struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

impl Cursor {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_spaces(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn read_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while matches!(self.peek(), Some(c) if pred(c)) {
            if let Some(c) = self.bump() {
                out.push(c);
            }
        }
        out
    }

    fn position(&self) -> (u32, u32) {
        (self.line, self.column)
    }

    fn unexpected(&self, expected: &str) -> ScriptError {
        let (line, column) = self.position();
        match self.peek() {
            Some(found) => ScriptError::UnexpectedChar {
                expected: expected.to_string(),
                found,
                line,
                column,
            },
            None => ScriptError::UnexpectedEnd {
                context: expected.to_string(),
                line,
                column,
            },
        }
    }

    fn expect(&mut self, wanted: char, expected: &str) -> Result<(), ScriptError> {
        if self.peek() == Some(wanted) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }
}

// ----- atoms -----

/// A property value as read from the source text.
#[derive(Clone, Debug, PartialEq)]
enum Atom {
    Number(f32),
    Text(String),
    Flag(bool),
    Ident(String),
    List(Vec<Atom>),
}

impl Atom {
    fn as_number(&self) -> Option<f32> {
        match self {
            Atom::Number(n) => Some(*n),
            _ => None,
        }
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            Atom::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn read_identifier(cursor: &mut Cursor) -> String {
    cursor.read_while(is_ident_char)
}

fn read_number(cursor: &mut Cursor) -> Result<f32, ScriptError> {
    let (line, column) = cursor.position();
    let mut text = String::new();
    if cursor.peek() == Some('-') {
        cursor.bump();
        text.push('-');
    }
    let digits = cursor.read_while(|c| c.is_ascii_digit());
    if digits.is_empty() {
        return Err(ScriptError::MalformedNumber { line, column });
    }
    text.push_str(&digits);
    if cursor.peek() == Some('.') {
        cursor.bump();
        let frac = cursor.read_while(|c| c.is_ascii_digit());
        if frac.is_empty() {
            return Err(ScriptError::MalformedNumber { line, column });
        }
        text.push('.');
        text.push_str(&frac);
    }
    let mut value: f32 = text
        .parse()
        .map_err(|_| ScriptError::MalformedNumber { line, column })?;
    if matches!(cursor.peek(), Some('d') | Some('D')) {
        cursor.bump();
        value = value * PI / 180.0;
    }
    Ok(value)
}

fn read_string(cursor: &mut Cursor) -> Result<String, ScriptError> {
    let (line, column) = cursor.position();
    cursor.expect('\'', "an opening single quote")?;
    let text = cursor.read_while(|c| c != '\'');
    if cursor.at_end() {
        return Err(ScriptError::UnterminatedString { line, column });
    }
    cursor.bump();
    Ok(text)
}

fn read_atom(cursor: &mut Cursor) -> Result<Atom, ScriptError> {
    cursor.skip_spaces();
    match cursor.peek() {
        Some('\'') => Ok(Atom::Text(read_string(cursor)?)),
        Some('[') => read_list(cursor),
        Some(c) if c.is_ascii_digit() || c == '-' => Ok(Atom::Number(read_number(cursor)?)),
        Some(c) if is_ident_char(c) => {
            let ident = read_identifier(cursor);
            if ident.eq_ignore_ascii_case("true") {
                Ok(Atom::Flag(true))
            } else if ident.eq_ignore_ascii_case("false") {
                Ok(Atom::Flag(false))
            } else {
                Ok(Atom::Ident(ident))
            }
        }
        _ => Err(cursor.unexpected("a value")),
    }
}

fn read_list(cursor: &mut Cursor) -> Result<Atom, ScriptError> {
    cursor.expect('[', "an opening bracket")?;
    let mut items = Vec::new();
    loop {
        items.push(read_atom(cursor)?);
        cursor.skip_spaces();
        match cursor.peek() {
            Some(',') => {
                cursor.bump();
            }
            Some(']') => {
                cursor.bump();
                break;
            }
            _ => return Err(cursor.unexpected("a comma or end of list")),
        }
    }
    Ok(Atom::List(items))
}

fn read_property(cursor: &mut Cursor) -> Result<(String, Atom), ScriptError> {
    cursor.skip_spaces();
    let ident = read_identifier(cursor);
    if ident.is_empty() {
        return Err(cursor.unexpected("a property name"));
    }
    cursor.skip_spaces();
    cursor.expect('=', "an equals symbol")?;
    let value = read_atom(cursor)?;
    Ok((ident, value))
}

// ----- sticks -----

const RECOGNIZED: [&str; 10] = [
    "name", "x", "y", "rotation", "width", "length", "shape", "color", "ik", "bendy",
];

fn parse_stick(
    cursor: &mut Cursor,
    skeleton: &mut Skeleton,
    parent: Option<BoneId>,
) -> Result<BoneId, ScriptError> {
    cursor.skip_spaces();
    let (line, column) = cursor.position();
    if cursor.at_end() {
        return Err(ScriptError::UnexpectedEnd {
            context: "a stick".to_string(),
            line,
            column,
        });
    }
    let ident = read_identifier(cursor);
    if !ident.eq_ignore_ascii_case("stick") {
        return Err(ScriptError::ExpectedStick {
            found: ident,
            line,
            column,
        });
    }

    cursor.skip_spaces();
    cursor.expect('(', "a left paren")?;

    let mut props: HashMap<String, Atom> = HashMap::new();
    loop {
        let (key, value) = read_property(cursor)?;
        props.insert(key, value);
        cursor.skip_spaces();
        match cursor.peek() {
            Some(',') => {
                cursor.bump();
            }
            Some(')') => {
                cursor.bump();
                break;
            }
            _ => return Err(cursor.unexpected("a comma or end of stick")),
        }
    }

    let name = match props.get("name").and_then(Atom::as_text) {
        Some(name) => name.to_string(),
        None => return Err(ScriptError::MissingName { line, column }),
    };

    for key in props.keys() {
        if !RECOGNIZED.contains(&key.as_str()) {
            log::debug!("script: ignoring unknown property '{key}'");
        }
    }

    let num = |key: &str, default: f32| props.get(key).and_then(Atom::as_number).unwrap_or(default);

    let id = match parent {
        Some(p) => skeleton.add_child(p, 0.0, 0.0, DEFAULT_WIDTH, [0.0; 3]),
        None => skeleton.add_root(&name),
    };
    let color = props.get("color").map(list_color).unwrap_or([0.0; 3]);
    let shape = match props.get("shape").and_then(Atom::as_text) {
        Some(s) if s.eq_ignore_ascii_case("circle") => Shape::Circle,
        _ => Shape::Line,
    };
    let ik_depth = num("ik", 0.0).max(0.0) as u32;
    let bendy_depth = num("bendy", 0.0).max(0.0) as u32;

    let bone = skeleton.bone_mut(id);
    bone.name = name;
    bone.pose.x = num("x", 0.0);
    bone.pose.y = num("y", 0.0);
    bone.pose.rotation = num("rotation", 0.0);
    bone.width = num("width", DEFAULT_WIDTH);
    bone.length = num("length", 0.0);
    bone.shape = shape;
    bone.color = color;
    bone.ik_depth = ik_depth;
    bone.bendy_depth = bendy_depth;

    cursor.skip_spaces();
    if cursor.peek() == Some('{') {
        cursor.bump();
        loop {
            cursor.skip_spaces();
            match cursor.peek() {
                Some('}') => {
                    cursor.bump();
                    break;
                }
                Some(_) => {
                    parse_stick(cursor, skeleton, Some(id))?;
                }
                None => return Err(cursor.unexpected("a closing bracket")),
            }
        }
    }

    Ok(id)
}

/// First three numeric elements of a list, zero-padded.
fn list_color(atom: &Atom) -> [f32; 3] {
    let mut color = [0.0; 3];
    if let Atom::List(items) = atom {
        for (slot, item) in color.iter_mut().zip(items.iter()) {
            *slot = item.as_number().unwrap_or(0.0);
        }
    }
    color
}

// ----- writer -----

fn write_stick(skeleton: &Skeleton, id: BoneId, depth: usize, out: &mut String) {
    use std::fmt::Write as _;

    let bone = skeleton.bone(id);
    let pad = "    ".repeat(depth);
    let _ = write!(out, "{pad}stick(name='{}'", bone.name);
    if bone.pose.x != 0.0 {
        let _ = write!(out, ", x={}", bone.pose.x);
    }
    if bone.pose.y != 0.0 {
        let _ = write!(out, ", y={}", bone.pose.y);
    }
    if bone.pose.rotation != 0.0 {
        let _ = write!(out, ", rotation={}", bone.pose.rotation);
    }
    if bone.length != 0.0 {
        let _ = write!(out, ", length={}", bone.length);
    }
    if bone.width != DEFAULT_WIDTH {
        let _ = write!(out, ", width={}", bone.width);
    }
    if bone.shape == Shape::Circle {
        let _ = write!(out, ", shape='circle'");
    }
    if bone.color != [0.0; 3] {
        let _ = write!(
            out,
            ", color=[{}, {}, {}]",
            bone.color[0], bone.color[1], bone.color[2]
        );
    }
    if bone.ik_depth != 0 {
        let _ = write!(out, ", ik={}", bone.ik_depth);
    }
    if bone.bendy_depth != 0 {
        let _ = write!(out, ", bendy={}", bone.bendy_depth);
    }

    if bone.children().is_empty() {
        let _ = writeln!(out, ")");
    } else {
        let _ = writeln!(out, ") {{");
        for &child in bone.children() {
            write_stick(skeleton, child, depth + 1, out);
        }
        let _ = writeln!(out, "{pad}}}");
    }
}
