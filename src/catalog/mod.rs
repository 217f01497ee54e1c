pub mod challenge;
pub mod validate;

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use rand::Rng;
use rust_embed::Embed;
use tracing::{debug, info, warn};

use crate::catalog::challenge::{Challenge, Difficulty, Language};
use crate::catalog::validate::{CatalogError, validate_challenge};

#[derive(Embed)]
#[folder = "assets/challenges/"]
struct ChallengeAssets;

/// Restricts which challenges a random pick may return.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChallengeFilter {
    pub difficulty: Option<Difficulty>,
    pub language: Option<Language>,
}

impl ChallengeFilter {
    pub fn matches(&self, challenge: &Challenge) -> bool {
        self.difficulty.is_none_or(|d| challenge.difficulty == d)
            && self.language.is_none_or(|l| challenge.language == l)
    }

    pub fn is_unrestricted(&self) -> bool {
        self.difficulty.is_none() && self.language.is_none()
    }
}

/// Immutable set of validated challenges. Never empty.
#[derive(Clone, Debug)]
pub struct Catalog {
    challenges: Vec<Rc<Challenge>>,
}

impl Catalog {
    /// Challenges compiled into the binary. A broken bundled file is an error,
    /// not a skip.
    pub fn bundled() -> Result<Self, CatalogError> {
        let mut names: Vec<String> = ChallengeAssets::iter().map(|f| f.to_string()).collect();
        names.sort();

        let mut challenges = Vec::with_capacity(names.len());
        for name in names {
            let Some(file) = ChallengeAssets::get(&name) else {
                continue;
            };
            challenges.push(parse_bytes(&name, file.data.as_ref())?);
        }
        let catalog = Self::from_challenges(challenges)?;
        info!(target: "catalog", count = catalog.len(), "Loaded bundled challenges");
        Ok(catalog)
    }

    pub fn from_challenges(challenges: Vec<Challenge>) -> Result<Self, CatalogError> {
        let mut ids: HashSet<String> = HashSet::new();
        for challenge in &challenges {
            validate_challenge(challenge)?;
            if !ids.insert(challenge.id.clone()) {
                return Err(CatalogError::DuplicateChallenge(challenge.id.clone()));
            }
        }
        if challenges.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self {
            challenges: challenges.into_iter().map(Rc::new).collect(),
        })
    }

    /// Merge every `.toml` / `.json` challenge in `dir`. Files that fail to
    /// parse or validate, or reuse an existing id, are skipped with a warning.
    /// Returns the number of challenges added.
    pub fn load_dir(&mut self, dir: &Path) -> usize {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(target: "catalog", dir = %dir.display(), error = %err, "Cannot read challenge directory");
                return 0;
            }
        };

        let mut paths: Vec<_> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("toml") | Some("json")
                )
            })
            .collect();
        paths.sort();

        let mut added = 0;
        for path in paths {
            match load_file(&path) {
                Ok(challenge) => {
                    if self.get(&challenge.id).is_some() {
                        warn!(target: "catalog", file = %path.display(), id = %challenge.id, "Skipping duplicate challenge id");
                        continue;
                    }
                    debug!(target: "catalog", file = %path.display(), id = %challenge.id, "Loaded user challenge");
                    self.challenges.push(Rc::new(challenge));
                    added += 1;
                }
                Err(err) => {
                    warn!(target: "catalog", file = %path.display(), error = %err, "Skipping invalid challenge file");
                }
            }
        }
        added
    }

    pub fn challenges(&self) -> &[Rc<Challenge>] {
        &self.challenges
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<Rc<Challenge>> {
        self.challenges.iter().find(|c| c.id == id).cloned()
    }

    pub fn by_difficulty(&self, difficulty: Difficulty) -> Vec<Rc<Challenge>> {
        self.challenges
            .iter()
            .filter(|c| c.difficulty == difficulty)
            .cloned()
            .collect()
    }

    pub fn by_language(&self, language: Language) -> Vec<Rc<Challenge>> {
        self.challenges
            .iter()
            .filter(|c| c.language == language)
            .cloned()
            .collect()
    }

    /// Uniform pick among the challenges matching `filter`.
    pub fn random_challenge<R: Rng>(
        &self,
        rng: &mut R,
        filter: &ChallengeFilter,
    ) -> Option<Rc<Challenge>> {
        let pool: Vec<&Rc<Challenge>> =
            self.challenges.iter().filter(|c| filter.matches(c)).collect();
        if pool.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..pool.len());
        Some(Rc::clone(pool[idx]))
    }
}

fn load_file(path: &Path) -> Result<Challenge, CatalogError> {
    let name = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        file: name.clone(),
        source,
    })?;
    parse_challenge(&name, &content)
}

/// Like `parse_challenge`, but refuses bytes that are not UTF-8.
pub fn parse_bytes(name: &str, data: &[u8]) -> Result<Challenge, CatalogError> {
    let content = std::str::from_utf8(data).map_err(|_| CatalogError::Encoding {
        file: name.to_string(),
    })?;
    parse_challenge(name, content)
}

/// Parse and validate one challenge; the format follows the file extension.
pub fn parse_challenge(name: &str, content: &str) -> Result<Challenge, CatalogError> {
    let challenge: Challenge = if name.ends_with(".toml") {
        toml::from_str(content).map_err(|source| CatalogError::Toml {
            file: name.to_string(),
            source,
        })?
    } else if name.ends_with(".json") {
        serde_json::from_str(content).map_err(|source| CatalogError::Json {
            file: name.to_string(),
            source,
        })?
    } else {
        return Err(CatalogError::UnsupportedFormat {
            file: name.to_string(),
        });
    };
    validate_challenge(&challenge)?;
    Ok(challenge)
}
