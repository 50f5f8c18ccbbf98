use std::collections::HashSet;

use super::QueryKey;

/// Cross-resource invalidation edges.
///
/// An edge `ratings -> meals` means that invalidating any key under
/// `ratings` also invalidates every key under `meals`. Expansion follows
/// edges transitively and tolerates cycles.
#[derive(Debug, Clone, Default)]
pub struct InvalidationGraph {
    edges: Vec<(QueryKey, Vec<QueryKey>)>,
}

impl InvalidationGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_edge(mut self, from: QueryKey, to: QueryKey) -> Self {
        self.add_edge(from, to);
        self
    }

    pub fn add_edge(&mut self, from: QueryKey, to: QueryKey) {
        if let Some((_, deps)) = self.edges.iter_mut().find(|(src, _)| *src == from) {
            if !deps.contains(&to) {
                deps.push(to);
            }
        } else {
            self.edges.push((from, vec![to]));
        }
    }

    /// The given keys followed by every dependent prefix, without duplicates.
    #[must_use]
    pub fn expand(&self, keys: &[QueryKey]) -> Vec<QueryKey> {
        let mut seen: HashSet<QueryKey> = HashSet::new();
        let mut ordered = Vec::new();
        let mut queue: Vec<QueryKey> = keys.to_vec();
        let mut cursor = 0;

        while cursor < queue.len() {
            let key = queue[cursor].clone();
            cursor += 1;

            if !seen.insert(key.clone()) {
                continue;
            }

            for (source, deps) in &self.edges {
                if key.starts_with(source) {
                    queue.extend(deps.iter().filter(|d| !seen.contains(*d)).cloned());
                }
            }
            ordered.push(key);
        }

        ordered
    }
}
