//! Reduce inflected words to WordNet base forms ("morphy").
//!
//! Lookups are driven by a caller-provided existence predicate, so the crate
//! never depends on a concrete dictionary loader. The procedure:
//!
//! 1. If the surface form is listed in the POS exception file (`noun.exc`,
//!    `verb.exc`, ...), the answer is the surface form plus its listed base
//!    forms, whichever exist.
//! 2. Otherwise the surface form and every single suffix detachment are
//!    checked; existing ones are returned.
//! 3. If nothing exists yet, detachments are applied again to the previous
//!    round's candidates, a bounded number of times.
//!
//! Results are deduplicated and keep the order in which they were found.
//!
//! # Example
//! ```no_run
//! use wordnet_db::WordNet;
//! use wordnet_morphy::Morphy;
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dict = "/path/to/wordnet";
//! let wn = WordNet::load(dict)?;
//! let morphy = Morphy::load(dict)?;
//! let forms = morphy.base_forms(Pos::Noun, "wolves", |pos, lemma| wn.lemma_exists(pos, lemma));
//! assert_eq!(forms[0].lemma, "wolf");
//! # Ok(()) }
//! ```

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use wordnet_types::Pos;

const MAX_DETACHMENT_ROUNDS: usize = 3;

/// How a base form was derived from the surface form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FormSource {
    Surface,
    Exception,
    Detachment {
        suffix: &'static str,
        ending: &'static str,
    },
}

/// A dictionary form of the input word.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BaseForm {
    pub pos: Pos,
    pub lemma: String,
    pub source: FormSource,
}

/// Exception lists keyed by POS, plus the fixed detachment rules.
#[derive(Debug, Default)]
pub struct Morphy {
    exceptions: HashMap<Pos, HashMap<String, Vec<String>>>,
}

impl Morphy {
    /// A morphy without exception lists; only detachment rules apply.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load `<pos>.exc` files from a WordNet dict directory.
    ///
    /// Missing files are treated as empty lists.
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dict_dir.as_ref();
        let mut exceptions = HashMap::new();
        for pos in Pos::ALL {
            let path = dir.join(format!("{}.exc", pos.file_suffix()));
            exceptions.insert(pos, load_exceptions(&path)?);
        }
        Ok(Self { exceptions })
    }

    /// Base forms of `surface` under `pos` that satisfy `exists`.
    pub fn base_forms<F>(&self, pos: Pos, surface: &str, exists: F) -> Vec<BaseForm>
    where
        F: Fn(Pos, &str) -> bool,
    {
        let form = normalize(surface);
        let mut found = Found::new(pos, &exists);

        if let Some(listed) = self.exceptions.get(&pos).and_then(|m| m.get(&form)) {
            found.offer(form.clone(), FormSource::Surface);
            for lemma in listed {
                found.offer(lemma.clone(), FormSource::Exception);
            }
            return found.into_forms();
        }

        found.offer(form.clone(), FormSource::Surface);
        let mut frontier = detach(pos, &[form]);
        for (lemma, source) in &frontier {
            found.offer(lemma.clone(), source.clone());
        }

        let mut rounds = 1;
        while found.is_empty() && !frontier.is_empty() && rounds < MAX_DETACHMENT_ROUNDS {
            let stems: Vec<String> = frontier.into_iter().map(|(lemma, _)| lemma).collect();
            frontier = detach(pos, &stems);
            for (lemma, source) in &frontier {
                found.offer(lemma.clone(), source.clone());
            }
            rounds += 1;
        }

        found.into_forms()
    }

    /// Convenience wrapper returning only the lemma strings.
    pub fn lemmas<F>(&self, pos: Pos, surface: &str, exists: F) -> Vec<String>
    where
        F: Fn(Pos, &str) -> bool,
    {
        self.base_forms(pos, surface, exists)
            .into_iter()
            .map(|f| f.lemma)
            .collect()
    }
}

/// Ordered, deduplicated accumulator of existing forms.
struct Found<'f, F> {
    pos: Pos,
    exists: &'f F,
    seen: HashSet<String>,
    forms: Vec<BaseForm>,
}

impl<'f, F: Fn(Pos, &str) -> bool> Found<'f, F> {
    fn new(pos: Pos, exists: &'f F) -> Self {
        Self {
            pos,
            exists,
            seen: HashSet::new(),
            forms: Vec::new(),
        }
    }

    fn offer(&mut self, lemma: String, source: FormSource) {
        if !(self.exists)(self.pos, &lemma) || !self.seen.insert(lemma.clone()) {
            return;
        }
        self.forms.push(BaseForm {
            pos: self.pos,
            lemma,
            source,
        });
    }

    fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    fn into_forms(self) -> Vec<BaseForm> {
        self.forms
    }
}

fn detach(pos: Pos, forms: &[String]) -> Vec<(String, FormSource)> {
    let mut out = Vec::new();
    for form in forms {
        for &(suffix, ending) in detachments(pos) {
            if let Some(stem) = form.strip_suffix(suffix)
                && !stem.is_empty()
            {
                out.push((
                    format!("{stem}{ending}"),
                    FormSource::Detachment { suffix, ending },
                ));
            }
        }
    }
    out
}

fn detachments(pos: Pos) -> &'static [(&'static str, &'static str)] {
    match pos {
        Pos::Noun => &[
            ("s", ""),
            ("ses", "s"),
            ("ves", "f"),
            ("xes", "x"),
            ("zes", "z"),
            ("ches", "ch"),
            ("shes", "sh"),
            ("men", "man"),
            ("ies", "y"),
        ],
        Pos::Verb => &[
            ("s", ""),
            ("ies", "y"),
            ("es", "e"),
            ("es", ""),
            ("ed", "e"),
            ("ed", ""),
            ("ing", "e"),
            ("ing", ""),
        ],
        Pos::Adj => &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")],
        Pos::Adv => &[],
    }
}

fn load_exceptions(path: &Path) -> Result<HashMap<String, Vec<String>>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut map = HashMap::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("read {}:{}", path.display(), lineno + 1))?;
        let mut parts = line.split_whitespace().map(normalize);
        let Some(surface) = parts.next() else {
            continue;
        };
        let lemmas: Vec<String> = parts.collect();
        if !lemmas.is_empty() {
            map.insert(surface, lemmas);
        }
    }
    Ok(map)
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase().replace(' ', "_")
}
