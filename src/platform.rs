use std::fmt;

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    Other,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Os::Linux => write!(f, "linux"),
            Os::Other => write!(f, "other"),
        }
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone)]
pub struct Platform {
    pub os: Os,
    pub is_fedora: bool,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
            is_fedora: Self::detect_fedora(),
        }
    }

    /// Create a platform with explicit values (for testing).
    #[must_use]
    pub fn new(os: Os, is_fedora: bool) -> Self {
        Self { os, is_fedora }
    }

    #[must_use]
    pub fn is_linux(&self) -> bool {
        self.os == Os::Linux
    }

    /// The architecture label used in release asset names (`amd64` or
    /// `arm64`; anything else yields `unknown` and will match no asset).
    #[must_use]
    pub fn release_arch(&self) -> &'static str {
        release_arch_for(std::env::consts::ARCH)
    }

    fn detect_os() -> Os {
        if cfg!(target_os = "linux") {
            Os::Linux
        } else {
            Os::Other
        }
    }

    fn detect_fedora() -> bool {
        if cfg!(target_os = "linux") {
            std::path::Path::new("/etc/fedora-release").exists()
        } else {
            false
        }
    }
}

/// Map a Rust target architecture to the naming common in software releases.
fn release_arch_for(arch: &str) -> &'static str {
    match arch {
        "x86_64" | "amd64" => "amd64",
        "aarch64" | "arm64" => "arm64",
        other => {
            tracing::debug!("unmapped architecture: {other}");
            "unknown"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_detect_returns_valid() {
        let p = Platform::detect();
        assert!(p.is_linux() || p.os == Os::Other);
    }

    #[test]
    fn platform_new_linux() {
        let p = Platform::new(Os::Linux, false);
        assert!(p.is_linux());
        assert!(!p.is_fedora);
    }

    #[test]
    fn platform_new_fedora() {
        let p = Platform::new(Os::Linux, true);
        assert!(p.is_fedora);
    }

    #[test]
    fn release_arch_maps_x86_64() {
        assert_eq!(release_arch_for("x86_64"), "amd64");
        assert_eq!(release_arch_for("amd64"), "amd64");
    }

    #[test]
    fn release_arch_maps_aarch64() {
        assert_eq!(release_arch_for("aarch64"), "arm64");
        assert_eq!(release_arch_for("arm64"), "arm64");
    }

    #[test]
    fn release_arch_unknown() {
        assert_eq!(release_arch_for("riscv64"), "unknown");
    }

    #[test]
    fn os_display() {
        assert_eq!(Os::Linux.to_string(), "linux");
        assert_eq!(Os::Other.to_string(), "other");
    }
}
