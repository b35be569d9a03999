use sdkui_shell::{ProfileFile, ProfileStatus, ShellConfig, ensure_profile_snippets};
use tempfile::tempdir;

const SDKMAN_SNIPPET: &str = "export SDKMAN_DIR=\"$HOME/.sdkman\"\n[[ -s \"$SDKMAN_DIR/bin/sdkman-init.sh\" ]] && source \"$SDKMAN_DIR/bin/sdkman-init.sh\"";

fn status_of(outcomes: &[sdkui_shell::ProfileOutcome], file: ProfileFile) -> ProfileStatus {
    outcomes
        .iter()
        .find(|outcome| outcome.file == file)
        .map(|outcome| outcome.status.clone())
        .expect("every profile file has an outcome")
}

#[test]
fn appends_to_existing_profiles_and_skips_missing_ones() {
    let home = tempdir().expect("create temp dir");
    std::fs::write(home.path().join(".bashrc"), "export PATH=$PATH:/usr/local/bin\n")
        .expect("write bashrc");
    std::fs::write(home.path().join(".profile"), "umask 022").expect("write profile");

    let outcomes = ensure_profile_snippets(home.path(), SDKMAN_SNIPPET, "SDKMAN_DIR", "SDKMAN");

    assert_eq!(status_of(&outcomes, ProfileFile::Bashrc), ProfileStatus::Added);
    assert_eq!(status_of(&outcomes, ProfileFile::Profile), ProfileStatus::Added);
    assert_eq!(status_of(&outcomes, ProfileFile::Zshrc), ProfileStatus::Missing);
    assert!(!home.path().join(".zshrc").exists());

    let bashrc = std::fs::read_to_string(home.path().join(".bashrc")).expect("read bashrc");
    assert!(bashrc.starts_with("export PATH=$PATH:/usr/local/bin\n"));
    assert!(bashrc.contains("# SDKMAN\n"));
    assert!(bashrc.ends_with(&format!("{SDKMAN_SNIPPET}\n")));

    let profile = std::fs::read_to_string(home.path().join(".profile")).expect("read profile");
    assert!(profile.starts_with("umask 022\n"));
}

#[test]
fn second_run_leaves_configured_profiles_untouched() {
    let home = tempdir().expect("create temp dir");
    let zshrc = home.path().join(".zshrc");
    std::fs::write(&zshrc, "# keep me\n").expect("write zshrc");

    ensure_profile_snippets(home.path(), SDKMAN_SNIPPET, "SDKMAN_DIR", "SDKMAN");
    let first = std::fs::read_to_string(&zshrc).expect("read zshrc");

    let outcomes = ensure_profile_snippets(home.path(), SDKMAN_SNIPPET, "SDKMAN_DIR", "SDKMAN");
    let second = std::fs::read_to_string(&zshrc).expect("read zshrc again");

    assert_eq!(
        status_of(&outcomes, ProfileFile::Zshrc),
        ProfileStatus::AlreadyConfigured
    );
    assert_eq!(first, second);
    assert_eq!(second.matches("SDKMAN_DIR=").count(), 1);
}

#[test]
fn load_then_apply_edit_persists_to_disk() {
    let home = tempdir().expect("create temp dir");
    let path = home.path().join(".bashrc");
    std::fs::write(&path, "alias ll='ls -l'\n").expect("write bashrc");

    let mut config = ShellConfig::load(ProfileFile::Bashrc, path.clone()).expect("load config");
    let edit = config.ensure_init(
        "export NVM_DIR",
        "export NVM_DIR=\"$HOME/.nvm\"",
        "nvm",
    );
    assert!(edit.has_changes());
    config.apply_edit(&edit).expect("apply edit");

    let reloaded = ShellConfig::load(ProfileFile::Bashrc, path).expect("reload config");
    assert!(reloaded.has_init("export NVM_DIR"));
    assert!(reloaded.content.contains("alias ll='ls -l'"));
}
