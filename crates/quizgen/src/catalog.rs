use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::pipeline::{GeneratorConfig, ObjectiveTest, load_corpus};
use crate::subjective::SubjectiveTest;
use crate::toolkit::Toolkit;

/// Both generators over one subject corpus.
pub struct Subject {
    pub objective: ObjectiveTest,
    pub subjective: SubjectiveTest,
}

impl Subject {
    pub fn new(corpus: impl Into<Arc<str>>, toolkit: &Toolkit, config: &GeneratorConfig) -> Self {
        let corpus = corpus.into();
        Self {
            objective: ObjectiveTest::new(Arc::clone(&corpus), toolkit, config),
            subjective: SubjectiveTest::new(corpus, toolkit, config),
        }
    }

    /// Runs both extractions now instead of on the first request.
    /// Returns the number of question records and subjective keywords.
    pub fn prepare(&self) -> (usize, usize) {
        (
            self.objective.question_records().len(),
            self.subjective.keyword_answers().len(),
        )
    }
}

/// Subjects keyed by name, sorted.
#[derive(Default)]
pub struct SubjectCatalog {
    subjects: BTreeMap<String, Arc<Subject>>,
}

impl SubjectCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// One subject per `*.txt` file in `dir`, named after the file stem.
    ///
    /// An unreadable directory gives an empty catalog.
    pub fn load_dir(dir: impl AsRef<Path>, toolkit: &Toolkit, config: &GeneratorConfig) -> Self {
        let dir = dir.as_ref();
        let mut catalog = Self::empty();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "corpus directory not readable");
                return catalog;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let subject = Subject::new(load_corpus(&path), toolkit, config);
            info!(subject = name, bytes = subject.objective.corpus().len(), "loaded subject");
            catalog.insert(name, subject);
        }
        catalog
    }

    pub fn insert(&mut self, name: impl Into<String>, subject: Subject) {
        self.subjects.insert(name.into(), Arc::new(subject));
    }

    pub fn get(&self, name: &str) -> Option<Arc<Subject>> {
        self.subjects.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.subjects.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Subject)> {
        self.subjects.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}
