//! Named fact definitions and the dependency-ordered loader.
//!
//! Facts form a directed acyclic graph: each definition names its
//! dependencies and its loader sees every declared dependency already in
//! the map. Loading is a depth-first topological visit; cycles and
//! references to undeclared facts fail fast with the offending name.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{PolicyError, Result};

/// The loaded fact map handed to loaders, rules, and resolvers.
pub type FactMap = BTreeMap<String, Value>;

type Loader<I> = Box<dyn Fn(&I, &FactMap) -> Result<Value> + Send + Sync>;

/// A named fact producer with declared dependencies.
pub struct FactDefinition<I> {
    name: String,
    deps: Vec<String>,
    loader: Loader<I>,
}

impl<I> FactDefinition<I> {
    pub fn new(
        name: impl Into<String>,
        loader: impl Fn(&I, &FactMap) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            deps: Vec::new(),
            loader: Box::new(loader),
        }
    }

    pub fn with_deps(
        name: impl Into<String>,
        deps: &[&str],
        loader: impl Fn(&I, &FactMap) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            deps: deps.iter().map(|d| d.to_string()).collect(),
            loader: Box::new(loader),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn deps(&self) -> &[String] {
        &self.deps
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    InProgress,
    Done,
}

/// Load every fact in dependency order. Sequential by contract: a loader
/// observes all of its declared dependencies in the map it receives.
pub fn load_facts<I>(definitions: &[FactDefinition<I>], input: &I) -> Result<FactMap> {
    let by_name: BTreeMap<&str, &FactDefinition<I>> = definitions
        .iter()
        .map(|def| (def.name.as_str(), def))
        .collect();

    let mut marks: BTreeMap<&str, Mark> = BTreeMap::new();
    let mut loaded = FactMap::new();

    for def in definitions {
        visit(def.name.as_str(), &by_name, input, &mut marks, &mut loaded)?;
    }
    Ok(loaded)
}

fn visit<'a, I>(
    name: &'a str,
    by_name: &BTreeMap<&'a str, &'a FactDefinition<I>>,
    input: &I,
    marks: &mut BTreeMap<&'a str, Mark>,
    loaded: &mut FactMap,
) -> Result<()> {
    match marks.get(name) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::InProgress) => return Err(PolicyError::FactCycle(name.to_string())),
        None => {}
    }

    let def = by_name
        .get(name)
        .ok_or_else(|| PolicyError::UnknownFact(name.to_string()))?;

    marks.insert(name, Mark::InProgress);
    for dep in &def.deps {
        visit(dep.as_str(), by_name, input, marks, loaded)?;
    }

    let value = (def.loader)(input, loaded)?;
    loaded.insert(name.to_string(), value);
    marks.insert(name, Mark::Done);
    Ok(())
}
