//! Stack-based namespace prefix resolution.

/// Namespace binding (prefix -> URI) declared at some element depth.
#[derive(Debug, Clone)]
struct Binding {
    prefix: String,
    uri: String,
    depth: usize,
}

/// The prefix-to-URI mapping in scope at the current element.
///
/// Bindings are pushed when an element declares `xmlns` / `xmlns:prefix`
/// and removed when that element closes. The default namespace is bound to
/// the empty prefix.
#[derive(Debug, Default, Clone)]
pub struct Namespaces {
    bindings: Vec<Binding>,
    depth: usize,
}

impl Namespaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// URI bound to `prefix`, innermost declaration first.
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.prefix == prefix)
            .map(|b| b.uri.as_str())
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.get(prefix).is_some()
    }

    /// In-scope `(prefix, uri)` pairs, innermost first, shadowed bindings
    /// omitted.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings
            .iter()
            .enumerate()
            .rev()
            .filter(|(idx, b)| !self.bindings[idx + 1..].iter().any(|o| o.prefix == b.prefix))
            .map(|(_, b)| (b.prefix.as_str(), b.uri.as_str()))
    }

    pub(crate) fn push_scope(&mut self) {
        self.depth += 1;
    }

    /// Leaves an element scope, removing any bindings declared in it.
    pub(crate) fn pop_scope(&mut self) {
        while let Some(binding) = self.bindings.last() {
            if binding.depth < self.depth {
                break;
            }
            self.bindings.pop();
        }
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn bind(&mut self, prefix: &str, uri: &str) {
        self.bindings.push(Binding {
            prefix: prefix.to_string(),
            uri: uri.to_string(),
            depth: self.depth,
        });
    }
}
