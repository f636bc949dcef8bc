use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult, TaskStats};
use crate::github;

/// Release tag used when the GitHub API cannot be reached.
const NERD_FONTS_FALLBACK_TAG: &str = "v3.2.1";

/// Install Nerd Font families from the nerd-fonts GitHub releases.
pub struct InstallNerdFonts;

impl Task for InstallNerdFonts {
    fn name(&self) -> &str {
        "Install Nerd Fonts"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.fonts.nerd.is_empty() && ctx.platform.is_linux()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut stats = TaskStats::default();

        let pending: Vec<&String> = ctx
            .config
            .fonts
            .nerd
            .iter()
            .filter(|font| {
                if font_installed(&font_dir(ctx, font)) {
                    ctx.log.debug(&format!("ok: {font} (already installed)"));
                    stats.already_ok += 1;
                    false
                } else {
                    true
                }
            })
            .collect();

        if pending.is_empty() {
            return Ok(stats.finish(ctx));
        }

        if ctx.dry_run {
            for font in pending {
                ctx.log.dry_run(&format!("would install {font}"));
                stats.changed += 1;
            }
            return Ok(stats.finish(ctx));
        }

        let tag = match github::latest_release_tag("ryanoasis", "nerd-fonts") {
            Ok(tag) => tag,
            Err(e) => {
                ctx.log.warn(&format!(
                    "cannot resolve latest nerd-fonts release ({e:#}), using {NERD_FONTS_FALLBACK_TAG}"
                ));
                NERD_FONTS_FALLBACK_TAG.to_string()
            }
        };

        for font in pending {
            let url = format!(
                "https://github.com/ryanoasis/nerd-fonts/releases/download/{tag}/{font}.zip"
            );
            match install_zip(ctx, &url, &font_dir(ctx, font)) {
                Ok(()) => {
                    ctx.log.info(&format!("Installed {font}"));
                    stats.changed += 1;
                }
                Err(e) => {
                    ctx.log.warn(&format!("failed to install {font}: {e:#}"));
                    stats.skipped += 1;
                }
            }
        }

        Ok(stats.finish(ctx))
    }
}

/// Install fonts from the Fontsource CDN.
pub struct InstallFontsourceFonts;

impl Task for InstallFontsourceFonts {
    fn name(&self) -> &str {
        "Install Fontsource fonts"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.fonts.fontsource.is_empty() && ctx.platform.is_linux()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut stats = TaskStats::default();

        for font in &ctx.config.fonts.fontsource {
            let dir = font_dir(ctx, font);
            if font_installed(&dir) {
                ctx.log.debug(&format!("ok: {font} (already installed)"));
                stats.already_ok += 1;
                continue;
            }

            if ctx.dry_run {
                ctx.log.dry_run(&format!("would install {font}"));
                stats.changed += 1;
                continue;
            }

            let url = format!("https://r2.fontsource.org/fonts/{font}@latest/download.zip");
            match install_zip(ctx, &url, &dir) {
                Ok(()) => {
                    ctx.log.info(&format!("Installed {font}"));
                    stats.changed += 1;
                }
                Err(e) => {
                    ctx.log.warn(&format!("failed to install {font}: {e:#}"));
                    stats.skipped += 1;
                }
            }
        }

        Ok(stats.finish(ctx))
    }
}

/// Rebuild the fontconfig cache after font installs.
pub struct UpdateFontCache;

impl Task for UpdateFontCache {
    fn name(&self) -> &str {
        "Update font cache"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.fonts.is_empty() && ctx.executor.which("fc-cache")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        if ctx.dry_run {
            ctx.log.dry_run("would run: fc-cache -f");
            return Ok(TaskResult::DryRun);
        }

        ctx.executor.run("fc-cache", &["-f"])?;
        Ok(TaskResult::Ok)
    }
}

/// Per-family install directory under the user font path.
fn font_dir(ctx: &Context, font: &str) -> PathBuf {
    ctx.home.join(".local/share/fonts").join(font)
}

/// A family counts as installed when its directory holds at least one font
/// file.
fn font_installed(dir: &Path) -> bool {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return false;
    };
    entries.flatten().any(|e| {
        e.path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ttf") || ext.eq_ignore_ascii_case("otf"))
    })
}

/// Download a zip archive and extract it into `dir`.
fn install_zip(ctx: &Context, url: &str, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut archive = tempfile::Builder::new()
        .suffix(".zip")
        .tempfile()
        .context("creating temp archive")?;
    github::download(url, &mut archive)?;

    let archive_path = archive.path().to_string_lossy().into_owned();
    let dir_str = dir.to_string_lossy().into_owned();
    ctx.executor
        .run("unzip", &["-o", &archive_path, "-d", &dir_str])?;
    Ok(())
}
