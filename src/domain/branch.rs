/// Source branch of a pull request, e.g. `feat/login-form`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
}

impl BranchContext {
    /// Create a new branch context
    pub fn new(name: impl Into<String>) -> Self {
        BranchContext { name: name.into() }
    }

    /// Change-type keyword carried by the branch name.
    ///
    /// This is the segment before the first `/`; a name without a separator
    /// is its own keyword. Empty names and names starting with `/` carry no
    /// keyword.
    pub fn change_type(&self) -> Option<&str> {
        let keyword = self
            .name
            .split_once('/')
            .map_or(self.name.as_str(), |(prefix, _)| prefix)
            .trim();

        if keyword.is_empty() {
            None
        } else {
            Some(keyword)
        }
    }
}
