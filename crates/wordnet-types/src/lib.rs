//! Value types shared by the WordNet reader, the morphology helpers and the
//! question generator.
//!
//! Records borrow their text from whatever buffer the database keeps alive
//! (`&str`), while identifiers stay small `Copy` values so they can cross
//! service boundaries freely. [`SynsetId`] is the handle callers pass around;
//! [`Relation`] classifies the raw pointer symbols found in `data.*` lines.
//!
//! ```rust
//! use wordnet_types::{Pos, Relation, SynsetId};
//!
//! let id = SynsetId { pos: Pos::Noun, offset: 6906439 };
//! assert_eq!(id.pos.to_char(), 'n');
//! assert_eq!(Relation::from_symbol("@"), Relation::Hypernym);
//! ```

use std::fmt;

/// Part of speech as written in WordNet files (`n`, `v`, `a`/`s`, `r`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Pos {
    Noun,
    Verb,
    Adj,
    Adv,
}

impl Pos {
    pub const ALL: [Pos; 4] = [Pos::Noun, Pos::Verb, Pos::Adj, Pos::Adv];

    /// Parse a WordNet POS character. Satellite adjectives fold into `Adj`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(Pos::Noun),
            'v' => Some(Pos::Verb),
            'a' | 's' => Some(Pos::Adj),
            'r' => Some(Pos::Adv),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Pos::Noun => 'n',
            Pos::Verb => 'v',
            Pos::Adj => 'a',
            Pos::Adv => 'r',
        }
    }

    /// Suffix used in dictionary file names (`data.noun`, `noun.exc`, ...).
    pub fn file_suffix(self) -> &'static str {
        match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_suffix())
    }
}

/// `(pos, offset)` pair uniquely identifying a synset.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SynsetId {
    pub pos: Pos,
    pub offset: u32,
}

impl fmt::Display for SynsetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08}-{}", self.offset, self.pos.to_char())
    }
}

/// Semantic relation carried by a pointer symbol.
///
/// Only the taxonomy edges get their own variant; everything else (antonyms,
/// meronyms, domain links, ...) is `Other`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Relation {
    Hypernym,
    InstanceHypernym,
    Hyponym,
    InstanceHyponym,
    Other,
}

impl Relation {
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "@" => Relation::Hypernym,
            "@i" => Relation::InstanceHypernym,
            "~" => Relation::Hyponym,
            "~i" => Relation::InstanceHyponym,
            _ => Relation::Other,
        }
    }
}

/// A lemma as stored in a synset.
#[derive(Clone, Debug)]
pub struct Lemma<'a> {
    pub text: &'a str,
}

impl<'a> Lemma<'a> {
    /// Lemma text without a trailing syntactic marker such as `(a)` or `(ip)`.
    pub fn name(&self) -> &'a str {
        match self.text.find('(') {
            Some(idx) if self.text.ends_with(')') => &self.text[..idx],
            _ => self.text,
        }
    }
}

/// Borrowed view of one `data.*` record.
#[derive(Clone, Debug)]
pub struct Synset<'a> {
    pub id: SynsetId,
    pub words: Vec<Lemma<'a>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_taxonomy_symbols() {
        assert_eq!(Relation::from_symbol("@"), Relation::Hypernym);
        assert_eq!(Relation::from_symbol("@i"), Relation::InstanceHypernym);
        assert_eq!(Relation::from_symbol("~"), Relation::Hyponym);
        assert_eq!(Relation::from_symbol("~i"), Relation::InstanceHyponym);
        assert_eq!(Relation::from_symbol("!"), Relation::Other);
    }

    #[test]
    fn name_strips_syntactic_markers() {
        let noun = Lemma {
            text: "programming_language",
        };
        assert_eq!(noun.name(), "programming_language");

        let adj = Lemma { text: "galore(ip)" };
        assert_eq!(adj.name(), "galore");
    }

    #[test]
    fn synset_id_formats_like_sense_offsets() {
        let id = SynsetId {
            pos: Pos::Noun,
            offset: 1740,
        };
        assert_eq!(id.to_string(), "00001740-n");
    }
}
