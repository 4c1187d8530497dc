//! Shared helpers: a minimal reader for the rendered Scheme text, so tests
//! check structure instead of grepping substrings.

#![allow(dead_code)]

use relex_atomese::{Parse, ParseBuilder};

#[derive(Debug, Clone, PartialEq)]
pub enum Sexp {
    Atom(String),
    Str(String),
    List(Vec<Sexp>),
}

impl Sexp {
    /// Leading keyword of a list, e.g. `ParseLink`.
    pub fn head(&self) -> Option<&str> {
        match self {
            Sexp::List(items) => match items.first() {
                Some(Sexp::Atom(a)) => Some(a),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn items(&self) -> &[Sexp] {
        match self {
            Sexp::List(items) => items,
            _ => &[],
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Sexp::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The quoted argument of a `(Keyword "...")` leaf.
    pub fn leaf_str(&self) -> Option<&str> {
        self.items().get(1).and_then(Sexp::as_str)
    }

    /// Every string inside a `ConceptNode`, depth first.
    pub fn concept_strings(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_concepts(&mut out);
        out
    }

    fn collect_concepts(&self, out: &mut Vec<String>) {
        if self.head() == Some("ConceptNode") {
            if let Some(s) = self.leaf_str() {
                out.push(s.to_string());
            }
        }
        for item in self.items() {
            item.collect_concepts(out);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Comment(String),
    Form(Sexp),
}

impl Item {
    pub fn form(&self) -> Option<&Sexp> {
        match self {
            Item::Form(f) => Some(f),
            Item::Comment(_) => None,
        }
    }

    /// `;` for comments, the link keyword for forms.
    pub fn label(&self) -> String {
        match self {
            Item::Comment(_) => ";".to_string(),
            Item::Form(f) => f.head().unwrap_or("?").to_string(),
        }
    }
}

/// Read top-level comments and forms. Panics on malformed input.
pub fn read_items(text: &str) -> Vec<Item> {
    let chars: Vec<char> = text.chars().collect();
    let mut pos = 0;
    let mut items = Vec::new();
    loop {
        skip_ws(&chars, &mut pos);
        if pos >= chars.len() {
            break;
        }
        if chars[pos] == ';' {
            let start = pos;
            while pos < chars.len() && chars[pos] != '\n' {
                pos += 1;
            }
            items.push(Item::Comment(chars[start..pos].iter().collect()));
        } else {
            items.push(Item::Form(read_sexp(&chars, &mut pos)));
        }
    }
    items
}

pub fn labels(items: &[Item]) -> Vec<String> {
    items.iter().map(Item::label).collect()
}

fn skip_ws(chars: &[char], pos: &mut usize) {
    while *pos < chars.len() && chars[*pos].is_whitespace() {
        *pos += 1;
    }
}

fn read_sexp(chars: &[char], pos: &mut usize) -> Sexp {
    skip_ws(chars, pos);
    match chars[*pos] {
        '(' => {
            *pos += 1;
            let mut items = Vec::new();
            loop {
                skip_ws(chars, pos);
                assert!(*pos < chars.len(), "unbalanced parentheses");
                if chars[*pos] == ')' {
                    *pos += 1;
                    return Sexp::List(items);
                }
                items.push(read_sexp(chars, pos));
            }
        }
        '"' => {
            *pos += 1;
            let mut s = String::new();
            loop {
                assert!(*pos < chars.len(), "unterminated string");
                match chars[*pos] {
                    '\\' => {
                        s.push(chars[*pos + 1]);
                        *pos += 2;
                    }
                    '"' => {
                        *pos += 1;
                        return Sexp::Str(s);
                    }
                    c => {
                        s.push(c);
                        *pos += 1;
                    }
                }
            }
        }
        ')' => panic!("unexpected ')' at {}", pos),
        _ => {
            let start = *pos;
            while *pos < chars.len()
                && !chars[*pos].is_whitespace()
                && chars[*pos] != '('
                && chars[*pos] != ')'
            {
                *pos += 1;
            }
            Sexp::Atom(chars[start..*pos].iter().collect())
        }
    }
}

/// Replace the random suffix of every `word@suffix` identifier with `*`.
pub fn mask_ids(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(at) = rest.find('@') {
        out.push_str(&rest[..=at]);
        let tail = &rest[at + 1..];
        let end = tail.find('"').unwrap_or(tail.len());
        out.push('*');
        rest = &tail[end..];
    }
    out.push_str(rest);
    out
}

/// "the dog chased the cat": two distinct `the` instances, two relations
/// touching `chased`, `dog` both target and source.
pub fn chased_parse(confidence: f64) -> Parse {
    let mut b = ParseBuilder::new("sentence@42_parse_0", "sentence@42", confidence);
    let the1 = b.word("the").unwrap();
    let dog = b.word("dog").unwrap();
    let chased = b.word("chased").unwrap();
    let the2 = b.word("the").unwrap();
    let cat = b.word("cat").unwrap();

    b.attribute(dog, "pos", "noun").unwrap();
    b.attribute(dog, "noun_number", "singular").unwrap();
    b.attribute(dog, "DEFINITE-FLAG", "T").unwrap();
    b.attribute(chased, "pos", "verb").unwrap();
    b.attribute(chased, "tense", "past").unwrap();
    b.attribute(cat, "pos", "noun").unwrap();
    b.attribute(the1, "pos", "det").unwrap();
    b.attribute(the2, "pos", "det").unwrap();

    b.relation("_subj", chased, dog).unwrap();
    b.relation("_obj", chased, cat).unwrap();
    b.relation("_det", dog, the1).unwrap();
    b.relation("_det", cat, the2).unwrap();
    b.build().unwrap()
}
