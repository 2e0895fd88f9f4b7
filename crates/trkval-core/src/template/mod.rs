//! Typed templates with whole-identifier substitution.
//!
//! Template text is split once into literal runs and named fields. A field only matches a
//! complete identifier (`[A-Za-z0-9_]+`), so `SAMPLE` never rewrites part of `MYSAMPLE`
//! and `NEW_FILE` never touches `NEW_FILES`. Identifiers that are not fields stay literal.
mod fields;
pub use fields::{JobField, MacroBindings, MacroField};

/// A set of named placeholders a template may contain.
pub trait Field: Copy + Eq + 'static {
    /// Every field of the set.
    const ALL: &'static [Self];

    /// Literal token marking the field in template text.
    fn token(&self) -> &'static str;
}

/// Supplies a value for every field of a set.
pub trait Bindings<F: Field> {
    fn value(&self, field: F) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<F> {
    Literal(String),
    Field(F),
}

/// Parsed template over the field set `F`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template<F> {
    segments: Vec<Segment<F>>,
}

#[inline]
fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<F: Field> Template<F> {
    pub fn parse(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = text;

        while let Some(c) = rest.chars().next() {
            if is_ident(c) {
                let end = rest.find(|c: char| !is_ident(c)).unwrap_or(rest.len());
                let word = &rest[..end];
                match F::ALL.iter().find(|f| f.token() == word) {
                    Some(field) => {
                        if !literal.is_empty() {
                            segments.push(Segment::Literal(std::mem::take(&mut literal)));
                        }
                        segments.push(Segment::Field(*field));
                    }
                    None => literal.push_str(word),
                }
                rest = &rest[end..];
            } else {
                literal.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Self { segments }
    }

    /// Fields referenced by the template, in order of appearance (with repeats).
    pub fn fields(&self) -> impl Iterator<Item = F> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(f) => Some(*f),
            Segment::Literal(_) => None,
        })
    }

    pub fn render<B: Bindings<F>>(&self, bindings: &B) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Field(f) => out.push_str(&bindings.value(*f)),
            }
        }
        out
    }
}
