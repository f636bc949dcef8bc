//! TOML bootstrap document parsing and validation.
//!
//! The whole desired state lives in a single `bootstrap.toml`. Every section
//! is optional — an empty file is a valid (if useless) configuration. Hard
//! errors are reserved for unreadable/unparseable files and for a `[git]`
//! table with missing identity fields; everything else surfaces as a
//! [`ConfigWarning`] at load time.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Git identity settings applied via `git config --global`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    #[serde(default = "default_true")]
    pub auto_setup_remote: bool,
}

fn default_branch() -> String {
    "main".to_string()
}

const fn default_true() -> bool {
    true
}

/// A dnf repository definition: either a `.repo` URL, or a file name plus
/// inline content destined for `/etc/yum.repos.d/`.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageRepo {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl PackageRepo {
    /// The file name this repo definition materialises as, when derivable.
    #[must_use]
    pub fn repo_file_name(&self) -> Option<String> {
        if let Some(file) = &self.file {
            return Some(file.clone());
        }
        self.url
            .as_deref()
            .and_then(|u| u.rsplit('/').next())
            .filter(|n| n.ends_with(".repo"))
            .map(String::from)
    }
}

/// A repository to clone: filesystem target plus git source URL.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoSpec {
    pub target: String,
    pub src: String,
}

impl RepoSpec {
    /// Tilde-expanded clone target.
    #[must_use]
    pub fn target_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.target).into_owned())
    }
}

/// Font lists by provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fonts {
    #[serde(default)]
    pub nerd: Vec<String>,
    #[serde(default)]
    pub fontsource: Vec<String>,
}

impl Fonts {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nerd.is_empty() && self.fontsource.is_empty()
    }
}

/// A program installed from a GitHub release RPM.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubPackage {
    pub owner: String,
    pub repo: String,
    /// Binary name to probe on PATH; defaults to the repo name.
    #[serde(default)]
    pub name: Option<String>,
}

impl GithubPackage {
    /// The program name checked against PATH.
    #[must_use]
    pub fn program(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.repo)
    }
}

/// Dotfiles reconciliation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DotfilesSection {
    /// Source tree, relative to the config file's directory unless absolute.
    #[serde(default = "default_dotfiles_source")]
    pub source: String,
}

fn default_dotfiles_source() -> String {
    "home".to_string()
}

impl Default for DotfilesSection {
    fn default() -> Self {
        Self {
            source: default_dotfiles_source(),
        }
    }
}

/// All loaded configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub packages: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub toolchains: Vec<String>,
    #[serde(default)]
    pub npm_global: Vec<String>,
    #[serde(default)]
    pub go_install: Vec<String>,
    #[serde(default)]
    pub git: Option<GitIdentity>,
    #[serde(default)]
    pub package_repos: Vec<PackageRepo>,
    #[serde(default)]
    pub repos: Vec<RepoSpec>,
    #[serde(default)]
    pub fonts: Fonts,
    #[serde(default)]
    pub github_packages: Vec<GithubPackage>,
    #[serde(default)]
    pub dotfiles: DotfilesSection,

    /// Directory containing the config file; set by [`Config::load`].
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// A non-fatal configuration problem surfaced at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// Config section the warning originates from.
    pub source: String,
    /// The offending item, for display.
    pub item: String,
    /// Human-readable description.
    pub message: String,
}

impl Config {
    /// Load and validate the bootstrap document at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, is not valid
    /// TOML, or declares a `[git]` table with empty identity fields.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::InvalidToml {
                file: path.display().to_string(),
                message: e.message().to_string(),
            })?;

        config.base_dir = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        if let Some(git) = &config.git {
            for (field, value) in [("name", &git.name), ("email", &git.email)] {
                if value.trim().is_empty() {
                    return Err(ConfigError::MissingField {
                        section: "git".to_string(),
                        field: field.to_string(),
                    });
                }
            }
        }

        Ok(config)
    }

    /// Absolute path of the dotfiles source tree.
    #[must_use]
    pub fn dotfiles_source(&self) -> PathBuf {
        let source = Path::new(&self.dotfiles.source);
        if source.is_absolute() {
            source.to_path_buf()
        } else {
            self.base_dir.join(source)
        }
    }

    /// Check for suspicious-but-legal content.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for (i, repo) in self.package_repos.iter().enumerate() {
            let has_url = repo.url.is_some();
            let has_file = repo.file.is_some() && repo.content.is_some();
            if !has_url && !has_file {
                warnings.push(ConfigWarning {
                    source: "package_repos".to_string(),
                    item: format!("entry {i}"),
                    message: "needs either 'url' or both 'file' and 'content'".to_string(),
                });
            }
        }

        for repo in &self.repos {
            if !repo.src.starts_with("https://") && !repo.src.starts_with("git@") {
                warnings.push(ConfigWarning {
                    source: "repos".to_string(),
                    item: repo.target.clone(),
                    message: format!("'{}' does not look like a git URL", repo.src),
                });
            }
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bootstrap.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn load_empty_file_is_valid() {
        let (_dir, path) = write_config("");
        let config = Config::load(&path).unwrap();
        assert!(config.packages.is_empty());
        assert!(config.git.is_none());
        assert!(config.fonts.is_empty());
    }

    #[test]
    fn load_full_document() {
        let (_dir, path) = write_config(
            r#"
            packages = ["git", "zsh"]
            groups = ["Development Tools"]
            toolchains = ["python@3.12", "node@22"]
            npm_global = ["typescript"]
            go_install = ["github.com/jesseduffield/lazygit@latest"]

            [git]
            name = "Jane Doe"
            email = "jane@example.com"

            [[package_repos]]
            url = "https://pkgs.tailscale.com/stable/fedora/tailscale.repo"

            [[repos]]
            target = "~/src/notes"
            src = "https://github.com/example/notes.git"

            [fonts]
            nerd = ["SourceCodePro"]
            fontsource = ["inter"]

            [[github_packages]]
            owner = "cli"
            repo = "cli"
            name = "gh"

            [dotfiles]
            source = "home"
            "#,
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.packages, vec!["git", "zsh"]);
        assert_eq!(config.groups.len(), 1);
        assert_eq!(config.toolchains.len(), 2);
        let git = config.git.unwrap();
        assert_eq!(git.name, "Jane Doe");
        assert_eq!(git.default_branch, "main");
        assert!(git.auto_setup_remote);
        assert_eq!(config.github_packages[0].program(), "gh");
        assert_eq!(config.fonts.nerd, vec!["SourceCodePro"]);
    }

    #[test]
    fn load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn load_invalid_toml_errors() {
        let (_dir, path) = write_config("packages = [");
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid TOML"));
    }

    #[test]
    fn git_section_requires_identity() {
        let (_dir, path) = write_config("[git]\nname = \"\"\nemail = \"a@b.c\"\n");
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("'name'"));
    }

    #[test]
    fn github_package_program_defaults_to_repo() {
        let pkg = GithubPackage {
            owner: "helmfile".to_string(),
            repo: "helmfile".to_string(),
            name: None,
        };
        assert_eq!(pkg.program(), "helmfile");
    }

    #[test]
    fn dotfiles_source_resolves_relative_to_config() {
        let (_dir, path) = write_config("[dotfiles]\nsource = \"home\"\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.dotfiles_source(), path.parent().unwrap().join("home"));
    }

    #[test]
    fn dotfiles_source_defaults_to_home() {
        let (_dir, path) = write_config("");
        let config = Config::load(&path).unwrap();
        assert!(config.dotfiles_source().ends_with("home"));
    }

    #[test]
    fn dotfiles_source_absolute_passes_through() {
        let (_dir, path) = write_config("[dotfiles]\nsource = \"/srv/dotfiles\"\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.dotfiles_source(), PathBuf::from("/srv/dotfiles"));
    }

    #[test]
    fn validate_flags_incomplete_package_repo() {
        let (_dir, path) = write_config("[[package_repos]]\nfile = \"k8s.repo\"\n");
        let config = Config::load(&path).unwrap();
        let warnings = config.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].source, "package_repos");
    }

    #[test]
    fn validate_flags_odd_repo_url() {
        let (_dir, path) = write_config(
            "[[repos]]\ntarget = \"~/src/x\"\nsrc = \"ftp://example.com/x\"\n",
        );
        let config = Config::load(&path).unwrap();
        let warnings = config.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("git URL"));
    }

    #[test]
    fn validate_clean_config_has_no_warnings() {
        let (_dir, path) = write_config(
            "[[package_repos]]\nurl = \"https://example.com/x.repo\"\n",
        );
        let config = Config::load(&path).unwrap();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn repo_file_name_from_url() {
        let repo = PackageRepo {
            url: Some("https://pkgs.tailscale.com/stable/fedora/tailscale.repo".to_string()),
            file: None,
            content: None,
        };
        assert_eq!(repo.repo_file_name(), Some("tailscale.repo".to_string()));
    }

    #[test]
    fn repo_file_name_prefers_explicit_file() {
        let repo = PackageRepo {
            url: None,
            file: Some("kubernetes.repo".to_string()),
            content: Some("name=Kubernetes\n".to_string()),
        };
        assert_eq!(repo.repo_file_name(), Some("kubernetes.repo".to_string()));
    }

    #[test]
    fn repo_spec_target_expands_tilde() {
        let repo = RepoSpec {
            target: "~/src/notes".to_string(),
            src: "https://example.com/notes.git".to_string(),
        };
        assert!(!repo.target_path().to_string_lossy().contains('~'));
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        let (_dir, path) = write_config("pakcages = [\"git\"]\n");
        assert!(Config::load(&path).is_err());
    }
}
