//! Declarative workstation bootstrap engine.
//!
//! Reads a `bootstrap.toml` document and idempotently brings a Fedora
//! workstation into the declared state: system update, package repos,
//! packages and groups, cloned repositories, git identity, zsh + oh-my-zsh,
//! the mise toolchain manager, Nerd Font / Fontsource fonts, GitHub-release
//! RPMs, npm/go globals, and finally a compare-and-reconcile copy of the
//! dotfiles tree into the home directory.
//!
//! The public API is organised into five layers:
//!
//! - **[`config`]** — parse and validate the TOML bootstrap document
//! - **[`sync`]** — the dotfile reconciler (walk, classify, copy, prompt)
//! - **[`tasks`]** — named units of work wired to external tools
//! - **[`commands`]** — top-level subcommand orchestration (`install`, `sync`)
//! - **[`github`]** — release metadata lookup and asset downloads
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod github;
pub mod logging;
pub mod platform;
pub mod sync;
pub mod tasks;
