use crate::external::find_command_path;
use std::collections::HashMap;
use std::env as stdenv;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// The parts of the process environment the shell depends on.
///
/// Only two capabilities are exposed: resolving a program name against the
/// search path, and looking up the home directory. Both read from `vars`, which is
/// snapshotted from the real environment by [`Environment::new`] and can be built
/// by hand in tests.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Key-value store of environment variables (only `PATH` and `HOME` are read).
    pub vars: HashMap<String, String>,
}

impl Environment {
    /// Capture `PATH` and `HOME` from the current process.
    pub fn new() -> Self {
        let mut vars = HashMap::new();
        for key in ["PATH", "HOME"] {
            if let Ok(value) = stdenv::var(key) {
                vars.insert(key.to_string(), value);
            }
        }
        Self { vars }
    }

    /// Build an environment from explicit variables.
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Get the value of an environment variable.
    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Locate an executable by name. Names containing a separator are not searched.
    pub fn resolve_executable(&self, name: &str) -> Option<PathBuf> {
        let search_paths = self.get_var("PATH").unwrap_or_default();
        find_command_path(OsStr::new(search_paths), Path::new(name)).map(|p| p.into_owned())
    }

    /// The user's home directory, if `HOME` is set and non-empty.
    pub fn home_dir(&self) -> Option<PathBuf> {
        self.get_var("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
    }

    /// Expand a leading `~` or `~/` to the home directory.
    ///
    /// Other forms (`~user`, `a/~`) and an unknown home are returned unchanged.
    pub fn expand_tilde(&self, path: &str) -> String {
        let rest = if path == "~" {
            ""
        } else if let Some(rest) = path.strip_prefix("~/") {
            rest
        } else {
            return path.to_string();
        };
        match self.home_dir() {
            Some(home) if rest.is_empty() => home.to_string_lossy().into_owned(),
            Some(home) => home.join(rest).to_string_lossy().into_owned(),
            None => path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::env::Environment;

    #[test]
    fn test_env_get_var() {
        let env = Environment::with_vars([("KEY", "VALUE")]);

        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);
        assert_eq!(env.get_var("KEY"), Some("VALUE"));
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
    }

    #[test]
    fn test_expand_tilde() {
        let env = Environment::with_vars([("HOME", "/home/user")]);
        assert_eq!(env.expand_tilde("~"), "/home/user");
        assert_eq!(env.expand_tilde("~/docs/a"), "/home/user/docs/a");
        assert_eq!(env.expand_tilde("~other"), "~other");
        assert_eq!(env.expand_tilde("/tmp/~"), "/tmp/~");
        assert_eq!(env.expand_tilde("rel"), "rel");
    }

    #[test]
    fn test_expand_tilde_without_home() {
        let env = Environment::default();
        assert_eq!(env.home_dir(), None);
        assert_eq!(env.expand_tilde("~/x"), "~/x");
    }

    #[test]
    #[cfg(unix)]
    fn test_resolve_executable_uses_path_var() {
        let env = Environment::with_vars([("PATH", "/nonexistent_dir_for_test:/bin")]);
        let found = env.resolve_executable("sh").expect("sh in /bin");
        assert!(found.starts_with("/bin"));

        let empty = Environment::default();
        assert_eq!(empty.resolve_executable("sh"), None);
    }
}
