//! Override scopes.
//!
//! A [`Scope`] is built once from its parent and a set of local overrides and
//! never changes afterwards. The flattened mapping is computed at creation, so
//! lookups do not walk the chain.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::node::Target;

/// Flattened name to binding mapping.
pub type Mapping = HashMap<String, Target>;

type Factory = Arc<dyn Fn(&Mapping) -> Mapping + Send + Sync>;

/// Local overrides supplied when creating a scope.
#[derive(Clone)]
pub enum Overrides {
    /// Shallow-merged over the parent mapping; local entries win.
    Static(Mapping),
    /// Called with the parent mapping; the result replaces it entirely.
    Factory(Factory),
}

impl Overrides {
    /// No local overrides.
    pub fn none() -> Self {
        Self::Static(Mapping::new())
    }

    /// Overrides computed from the parent mapping.
    pub fn factory<F>(f: F) -> Self
    where
        F: Fn(&Mapping) -> Mapping + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(f))
    }

    /// Add a binding.
    ///
    /// On a factory the binding is applied on top of the factory's result.
    pub fn bind(self, key: impl Into<String>, target: impl Into<Target>) -> Self {
        let key = key.into();
        let target = target.into();
        match self {
            Self::Static(mut map) => {
                map.insert(key, target);
                Self::Static(map)
            }
            Self::Factory(f) => Self::factory(move |parent| {
                let mut map = f(parent);
                map.insert(key.clone(), target.clone());
                map
            }),
        }
    }

    /// Whether these overrides are certain to add nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Static(map) if map.is_empty())
    }

    fn apply(&self, parent: &Mapping) -> Mapping {
        match self {
            Self::Static(local) => {
                let mut merged = parent.clone();
                merged.extend(local.iter().map(|(k, v)| (k.clone(), v.clone())));
                merged
            }
            Self::Factory(f) => f(parent),
        }
    }
}

impl Default for Overrides {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(map) => f.debug_tuple("Static").field(map).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

impl From<Mapping> for Overrides {
    fn from(map: Mapping) -> Self {
        Self::Static(map)
    }
}

impl<K: Into<String>, T: Into<Target>> FromIterator<(K, T)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        Self::Static(
            iter.into_iter()
                .map(|(k, t)| (k.into(), t.into()))
                .collect(),
        )
    }
}

#[derive(Debug)]
struct ScopeInner {
    parent: Option<Scope>,
    effective: Mapping,
    depth: usize,
}

/// An immutable override scope, cheap to clone and share between threads.
#[derive(Debug, Clone)]
pub struct Scope(Arc<ScopeInner>);

impl Scope {
    /// The root scope. Binds nothing; built-in defaults still apply.
    pub fn root() -> Self {
        Self(Arc::new(ScopeInner {
            parent: None,
            effective: Mapping::new(),
            depth: 0,
        }))
    }

    /// Create a child scope with `overrides` applied to this scope's mapping.
    pub fn child(&self, overrides: &Overrides) -> Self {
        let effective = overrides.apply(&self.0.effective);
        let depth = self.0.depth + 1;

        tracing::debug!(depth, bindings = effective.len(), "created override scope");

        Self(Arc::new(ScopeInner {
            parent: Some(self.clone()),
            effective,
            depth,
        }))
    }

    /// The flattened mapping visible at this scope.
    pub fn effective(&self) -> &Mapping {
        &self.0.effective
    }

    /// Binding for `key`, if any.
    pub fn lookup(&self, key: &str) -> Option<&Target> {
        self.0.effective.get(key)
    }

    pub fn parent(&self) -> Option<&Scope> {
        self.0.parent.as_ref()
    }

    /// Number of ancestors; zero for the root.
    pub fn depth(&self) -> usize {
        self.0.depth
    }

    /// Scopes from this one up to the root, innermost first.
    pub fn chain(&self) -> impl Iterator<Item = &Scope> {
        std::iter::successors(Some(self), |&scope| scope.parent())
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::from_fn;
    use crate::html::RenderNode;

    fn comp(name: &'static str) -> Target {
        Target::Component(from_fn(name, |_, children| RenderNode::Fragment(children)))
    }

    #[test]
    fn static_overrides_merge_over_parent() {
        let code = comp("CodeBlock");
        let parent = Scope::root().child(&Overrides::from_iter([
            ("p", Target::from("div")),
            ("code", code.clone()),
        ]));
        let local = Overrides::none().bind("p", "section");
        let child = parent.child(&local);

        assert_eq!(child.lookup("p"), Some(&Target::from("section")));
        assert_eq!(child.lookup("code"), Some(&code));
        assert_eq!(child.lookup("em"), None);
        assert_eq!(parent.lookup("p"), Some(&Target::from("div")));
    }

    #[test]
    fn factory_result_replaces_parent_mapping() {
        let parent = Scope::root().child(&Overrides::from_iter([("p", "div"), ("em", "i")]));

        let factory = Overrides::factory(|parent: &Mapping| {
            let mut map = Mapping::new();
            if let Some(p) = parent.get("p") {
                map.insert("blockquote".to_string(), p.clone());
            }
            map
        });
        let child = parent.child(&factory);

        let mut expected = Mapping::new();
        expected.insert("blockquote".to_string(), Target::from("div"));
        assert_eq!(child.effective(), &expected);
        assert_eq!(child.lookup("em"), None);
    }

    #[test]
    fn bind_on_factory_applies_after_factory() {
        let parent = Scope::root().child(&Overrides::from_iter([("p", "div")]));
        let overrides = Overrides::factory(|_| Mapping::new()).bind("em", "i");
        let child = parent.child(&overrides);

        assert_eq!(child.effective().len(), 1);
        assert_eq!(child.lookup("em"), Some(&Target::from("i")));
    }

    #[test]
    fn chain_runs_innermost_first() {
        let root = Scope::root();
        let a = root.child(&Overrides::none());
        let b = a.child(&Overrides::none());

        let depths: Vec<usize> = b.chain().map(Scope::depth).collect();
        assert_eq!(depths, vec![2, 1, 0]);
        assert!(root.parent().is_none());
    }

    #[test]
    fn empty_overrides() {
        assert!(Overrides::none().is_empty());
        assert!(!Overrides::factory(|m| m.clone()).is_empty());
        assert!(!Overrides::none().bind("a", "b").is_empty());
    }

    #[test]
    fn scopes_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Scope>();
        assert_send_sync::<Overrides>();
    }
}
