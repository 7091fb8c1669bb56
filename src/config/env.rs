/// Process-wide configuration properties backed by environment variables.
///
/// A property key is mapped to a variable name by joining the prefix and the
/// upper-cased key with the separator. Dots inside the key become separators,
/// so with the default source `config` reads `LEALONE_CONFIG`.
#[derive(Debug, Clone)]
pub struct PropertySource {
    prefix: String,
    separator: String,
}

impl PropertySource {
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        assert!(!separator.is_empty(), "separator must not be empty");
        Self {
            prefix: prefix.into(),
            separator,
        }
    }

    /// Returns the value of `key` from the process environment.
    ///
    /// A value that is not valid UTF-8 is treated as unset.
    pub fn get(&self, key: &str) -> Option<String> {
        std::env::var(self.var_name(key))
            .ok()
            .filter(|v| !v.is_empty())
    }

    /// Same as [`get`](Self::get), against an explicit set of variables.
    ///
    /// Empty values are treated as unset.
    pub fn lookup_in<I>(&self, vars: I, key: &str) -> Option<String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let name = self.var_name(key);
        vars.into_iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
            .filter(|v| !v.is_empty())
    }

    /// The environment variable that backs `key`.
    pub fn var_name(&self, key: &str) -> String {
        let path: Vec<String> = key.split('.').map(|s| s.to_uppercase()).collect();
        format!("{}{}{}", self.prefix, self.separator, path.join(&self.separator))
    }

    /// The dotted name of `key` as shown to operators, e.g. `lealone.config`.
    pub fn property_name(&self, key: &str) -> String {
        format!("{}.{}", self.prefix.to_lowercase(), key)
    }
}

impl Default for PropertySource {
    fn default() -> Self {
        Self::new("LEALONE", "_")
    }
}
