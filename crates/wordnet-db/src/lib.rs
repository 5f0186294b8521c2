//! Read-only WordNet dictionary with taxonomy traversal.
//!
//! Loads the canonical `data.*`/`index.*` files of a Princeton-format WordNet
//! (including Open English WordNet releases), keeps every lemma as a borrowed
//! `&str` into the loaded bytes, and answers the questions a distractor
//! generator asks: which senses does a lemma have, what is a sense's
//! hypernym, and which hyponyms hang below it.
//!
//! Backing storage is chosen at runtime with [`LoadMode`]: memory-mapped files
//! or owned buffers.
//!
//! # Example
//! ```no_run
//! use wordnet_db::{LoadMode, WordNet};
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let wn = WordNet::load_with_mode("/path/to/wordnet", LoadMode::Mmap)?;
//! if let Some(first) = wn.synsets_for_lemma(Pos::Noun, "python").first() {
//!     for parent in wn.hypernyms(*first) {
//!         for sibling in wn.hyponyms(parent) {
//!             if let Some(syn) = wn.get_synset(sibling) {
//!                 println!("{}", syn.words[0].name());
//!             }
//!         }
//!     }
//! }
//! # Ok(()) }
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use memmap2::Mmap;
use wordnet_types::{Lemma, Pos, Relation, Synset, SynsetId};

/// Strategy for bringing dictionary files into memory.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map each file.
    Mmap,
    /// Read each file into an owned buffer.
    Owned,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
enum FileKind {
    Data(Pos),
    Index(Pos),
}

impl FileKind {
    fn file_name(self) -> String {
        match self {
            FileKind::Data(pos) => format!("data.{}", pos.file_suffix()),
            FileKind::Index(pos) => format!("index.{}", pos.file_suffix()),
        }
    }
}

/// Byte range inside one of the loaded data files.
#[derive(Clone, Copy)]
struct TextRef {
    file: FileKind,
    start: usize,
    len: usize,
}

struct DictFiles {
    buffers: HashMap<FileKind, Buffer>,
}

impl DictFiles {
    fn load(dict_dir: &Path, mode: LoadMode) -> Result<Self> {
        let mut buffers = HashMap::new();
        for pos in Pos::ALL {
            for kind in [FileKind::Data(pos), FileKind::Index(pos)] {
                let path = dict_dir.join(kind.file_name());
                if !path.exists() {
                    anyhow::bail!("missing required WordNet file: {}", path.display());
                }
                buffers.insert(kind, load_file(&path, mode)?);
            }
        }
        Ok(Self { buffers })
    }

    fn bytes(&self, file: FileKind) -> &[u8] {
        self.buffers
            .get(&file)
            .map(Buffer::as_slice)
            .unwrap_or(&[])
    }

    fn text(&self, r: TextRef) -> &str {
        let slice = &self.bytes(r.file)[r.start..r.start + r.len];
        // Every TextRef is cut from a line that already passed utf8 validation.
        std::str::from_utf8(slice).expect("wordnet text is valid utf8")
    }
}

struct PointerData {
    relation: Relation,
    target: SynsetId,
}

struct SynsetData {
    words: Vec<TextRef>,
    pointers: Vec<PointerData>,
}

/// In-memory WordNet backed by mmap or owned buffers.
pub struct WordNet {
    files: DictFiles,
    /// Synset offsets per `(pos, normalized lemma)`, in index order.
    index: HashMap<(Pos, String), Vec<u32>>,
    synsets: HashMap<SynsetId, SynsetData>,
}

impl WordNet {
    /// Load from a directory containing `data.*` and `index.*`, memory-mapped.
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(dict_dir, LoadMode::Mmap)
    }

    /// Load choosing the backing storage at runtime.
    pub fn load_with_mode(dict_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let files = DictFiles::load(dict_dir.as_ref(), mode)?;

        let mut index = HashMap::new();
        let mut synsets = HashMap::new();
        for pos in Pos::ALL {
            let kind = FileKind::Index(pos);
            parse_index(files.bytes(kind), kind, pos, &mut index)?;
            let kind = FileKind::Data(pos);
            parse_data(files.bytes(kind), kind, pos, &mut synsets)?;
        }

        Ok(Self {
            files,
            index,
            synsets,
        })
    }

    /// Whether the index files list `lemma` under `pos`.
    pub fn lemma_exists(&self, pos: Pos, lemma: &str) -> bool {
        self.index.contains_key(&(pos, normalize_lemma(lemma)))
    }

    /// Senses of a lemma in index order (most frequent first), or empty.
    pub fn synsets_for_lemma(&self, pos: Pos, lemma: &str) -> Vec<SynsetId> {
        self.index
            .get(&(pos, normalize_lemma(lemma)))
            .map(|offsets| {
                offsets
                    .iter()
                    .map(|&offset| SynsetId { pos, offset })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get_synset(&self, id: SynsetId) -> Option<Synset<'_>> {
        let data = self.synsets.get(&id)?;
        Some(Synset {
            id,
            words: data
                .words
                .iter()
                .map(|w| Lemma {
                    text: self.files.text(*w),
                })
                .collect(),
        })
    }

    /// Pointer targets of `id` carrying `relation`, in file order.
    ///
    /// Unknown synsets have no relations.
    pub fn related(&self, id: SynsetId, relation: Relation) -> Vec<SynsetId> {
        self.synsets
            .get(&id)
            .map(|syn| {
                syn.pointers
                    .iter()
                    .filter(|p| p.relation == relation)
                    .map(|p| p.target)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Direct (non-instance) hypernyms.
    pub fn hypernyms(&self, id: SynsetId) -> Vec<SynsetId> {
        self.related(id, Relation::Hypernym)
    }

    /// Direct (non-instance) hyponyms.
    pub fn hyponyms(&self, id: SynsetId) -> Vec<SynsetId> {
        self.related(id, Relation::Hyponym)
    }
}

fn load_file(path: &Path, mode: LoadMode) -> Result<Buffer> {
    let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    match mode {
        LoadMode::Mmap => unsafe { Mmap::map(&file) }
            .map(Buffer::Mmap)
            .with_context(|| format!("mmap {}", path.display())),
        LoadMode::Owned => {
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}

/// Lines that carry records: non-empty and not part of the license preamble,
/// which WordNet indents with spaces.
fn record_lines(bytes: &[u8]) -> impl Iterator<Item = (usize, &[u8])> {
    bytes
        .split(|b| *b == b'\n')
        .map(strip_cr)
        .enumerate()
        .filter(|(_, line)| !line.is_empty() && !matches!(line.first(), Some(b' ' | b'\t')))
        .map(|(idx, line)| (idx + 1, line))
}

/// `lemma pos synset_cnt p_cnt [ptr_symbol...] sense_cnt tagsense_cnt offset...`
fn parse_index(
    bytes: &[u8],
    file: FileKind,
    pos: Pos,
    index: &mut HashMap<(Pos, String), Vec<u32>>,
) -> Result<()> {
    for (lineno, line) in record_lines(bytes) {
        let line_str = std::str::from_utf8(line)
            .with_context(|| format!("{}:{} invalid utf8", file.file_name(), lineno))?;
        let tokens: Vec<&str> = line_str.split_ascii_whitespace().collect();
        let at = |field: &str| format!("{}:{} {}", file.file_name(), lineno, field);
        if tokens.len() < 6 {
            anyhow::bail!("{} (too few tokens)", at("malformed index line"));
        }

        let synset_cnt: usize = tokens[2].parse().with_context(|| at("synset_cnt"))?;
        let p_cnt: usize = tokens[3].parse().with_context(|| at("p_cnt"))?;

        // Pointer symbols, then sense_cnt and tagsense_cnt.
        let offsets_start = 4 + p_cnt + 2;
        if tokens.len() < offsets_start {
            anyhow::bail!("{}", at("pointer count mismatch"));
        }
        let synset_offsets = tokens[offsets_start..]
            .iter()
            .map(|t| t.parse::<u32>().with_context(|| at("synset_offsets")))
            .collect::<Result<Vec<_>>>()?;
        if synset_offsets.len() != synset_cnt {
            anyhow::bail!(
                "{} (expected {}, got {})",
                at("synset_cnt mismatch"),
                synset_cnt,
                synset_offsets.len()
            );
        }

        index.insert((pos, normalize_lemma(tokens[0])), synset_offsets);
    }

    Ok(())
}

/// `offset lex_filenum ss_type w_cnt [word lex_id...] p_cnt [ptr...] ... | gloss`
fn parse_data(
    bytes: &[u8],
    file: FileKind,
    pos: Pos,
    synsets: &mut HashMap<SynsetId, SynsetData>,
) -> Result<()> {
    for (lineno, line) in record_lines(bytes) {
        let line_str = std::str::from_utf8(line)
            .with_context(|| format!("{}:{} invalid utf8", file.file_name(), lineno))?;
        let at = |field: &str| format!("{}:{} {}", file.file_name(), lineno, field);
        let left = line_str
            .split_once('|')
            .map_or(line_str, |(left, _gloss)| left);

        let tokens: Vec<&str> = left.split_ascii_whitespace().collect();
        if tokens.len() < 4 {
            anyhow::bail!("{}", at("malformed data line"));
        }

        let offset: u32 = tokens[0].parse().with_context(|| at("offset"))?;
        let w_cnt = usize::from_str_radix(tokens[3], 16).with_context(|| at("w_cnt"))?;

        let mut idx = 4;
        if tokens.len() < idx + w_cnt * 2 + 1 {
            anyhow::bail!("{}", at("not enough word/lex_id pairs"));
        }
        let words = tokens[idx..idx + w_cnt * 2]
            .chunks_exact(2)
            .map(|pair| text_ref(file, bytes, pair[0]))
            .collect();
        idx += w_cnt * 2;

        let p_cnt: usize = tokens[idx].parse().with_context(|| at("p_cnt"))?;
        idx += 1;
        if tokens.len() < idx + p_cnt * 4 {
            anyhow::bail!("{}", at("incomplete pointer block"));
        }
        let mut pointers = Vec::with_capacity(p_cnt);
        // symbol offset pos source/target; the source/target word numbers
        // do not change which synset a pointer reaches.
        for block in tokens[idx..idx + p_cnt * 4].chunks_exact(4) {
            let target_offset: u32 = block[1]
                .parse()
                .with_context(|| at("pointer target offset"))?;
            let target_pos = block[2]
                .chars()
                .next()
                .and_then(Pos::from_char)
                .ok_or_else(|| anyhow::anyhow!("{}", at("pointer target pos")))?;
            pointers.push(PointerData {
                relation: Relation::from_symbol(block[0]),
                target: SynsetId {
                    pos: target_pos,
                    offset: target_offset,
                },
            });
        }
        // Verb frame blocks follow the pointers; nothing here reads them.

        synsets.insert(SynsetId { pos, offset }, SynsetData { words, pointers });
    }

    Ok(())
}

/// Record where `token` (a subslice of `root`) lives.
fn text_ref(file: FileKind, root: &[u8], token: &str) -> TextRef {
    TextRef {
        file,
        start: token.as_ptr() as usize - root.as_ptr() as usize,
        len: token.len(),
    }
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn normalize_lemma(text: &str) -> String {
    text.trim().to_lowercase().replace(' ', "_")
}
