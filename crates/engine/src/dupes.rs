/// Tracked paths sharing one content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub hash: String,
    /// Lexicographically ordered; index 0 is the canonical original
    pub paths: Vec<String>,
}

impl DuplicateGroup {
    #[inline]
    pub fn canonical(&self) -> &str {
        &self.paths[0]
    }

    /// Every member after the canonical one.
    #[inline]
    pub fn duplicates(&self) -> &[String] {
        &self.paths[1..]
    }
}

/// Group `(path, hash)` pairs by hash, keeping only hashes seen at least twice.
///
/// Pairs are sorted by `(hash, path)` first, so the canonical member is the
/// lexicographically smallest path and the result does not depend on input
/// order. Empty hashes never participate. Groups come out in hash order.
pub fn find_duplicates<'a, I>(hashed: I) -> Vec<DuplicateGroup>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut sorted: Vec<(&str, &str)> = hashed
        .into_iter()
        .filter(|(_, hash)| !hash.is_empty())
        .map(|(path, hash)| (hash, path))
        .collect();
    sorted.sort_unstable();

    let mut groups: Vec<DuplicateGroup> = Vec::new();
    let mut prev: Option<(&str, &str)> = None;

    for (hash, path) in sorted {
        if let Some((prev_hash, prev_path)) = prev
            && prev_hash == hash
        {
            match groups.last_mut() {
                Some(group) if group.hash == hash => group.paths.push(path.to_owned()),
                _ => groups.push(DuplicateGroup {
                    hash: hash.to_owned(),
                    paths: vec![prev_path.to_owned(), path.to_owned()],
                }),
            }
        }
        prev = Some((hash, path));
    }

    groups
}

#[cfg(test)]
#[path = "dupes_tests.rs"]
mod tests;
