/// SDKMAN platform id for the running machine, as used by the versions API.
#[must_use]
pub fn sdkman_platform() -> &'static str {
    sdkman_platform_for(std::env::consts::OS, std::env::consts::ARCH)
}

#[must_use]
pub fn sdkman_platform_for(os: &str, arch: &str) -> &'static str {
    match (os, arch) {
        ("linux", "x86_64") => "linuxx64",
        ("linux", "aarch64") => "linuxarm64",
        ("macos", "x86_64") => "darwinx64",
        ("macos", "aarch64") => "darwinarm64",
        ("windows", "x86_64") => "windowsx64",
        _ => "exotic",
    }
}
